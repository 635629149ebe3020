//! Title feature extraction.
//!
//! The vocabulary is an explicit, versioned list. Adding a feature means adding
//! a [`Feature`] variant (and bumping [`FEATURE_VOCABULARY_VERSION`]); nothing is
//! inferred from the data.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{AsRefStr, Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

pub const FEATURE_VOCABULARY_VERSION: u32 = 1;

static NUMBERED_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+\s+(?:ways|tips|things|reasons|steps|mistakes)\b")
        .expect("numbered list pattern is valid")
});

static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year pattern is valid"));

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumCountMacro,
    EnumString,
    Display,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    // Punctuation & characters
    HasNumber,
    HasQuestion,
    HasExclamation,
    HasPipe,
    HasColon,
    HasDash,
    HasParentheses,
    HasQuotes,
    HasAllCaps,

    // Leading words
    StartsWithHow,
    StartsWithWhy,
    StartsWithWhat,
    StartsWithNumber,

    // Phrases
    HasNumberedList,
    HasYear,
    HasSecondPerson,

    // Hook words
    MentionsSecret,
    MentionsUltimate,
    MentionsNever,
    MentionsMistake,
    MentionsBest,
    MentionsWorst,
    MentionsTruth,
    MentionsStop,
    MentionsHack,
    MentionsEasy,
    MentionsBeginner,
    MentionsVersus,

    // Numeric
    WordCount,
    CharCount,
}

impl Feature {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::WordCount | Self::CharCount)
    }

    /// The boolean features, in vocabulary order.
    pub fn flags() -> impl Iterator<Item = Feature> {
        Feature::iter().filter(|f| !f.is_numeric())
    }

    /// Token spellings that trigger a hook-word feature.
    fn lexical_forms(&self) -> &'static [&'static str] {
        match self {
            Self::HasSecondPerson => &["you", "your", "you're", "youre", "yours", "yourself"],
            Self::MentionsSecret => &["secret", "secrets"],
            Self::MentionsUltimate => &["ultimate"],
            Self::MentionsNever => &["never"],
            Self::MentionsMistake => &["mistake", "mistakes"],
            Self::MentionsBest => &["best"],
            Self::MentionsWorst => &["worst"],
            Self::MentionsTruth => &["truth"],
            Self::MentionsStop => &["stop"],
            Self::MentionsHack => &["hack", "hacks"],
            Self::MentionsEasy => &["easy", "easiest"],
            Self::MentionsBeginner => &["beginner", "beginners"],
            Self::MentionsVersus => &["vs", "versus"],
            _ => &[],
        }
    }

    /// Word a mutation can splice into a title to exhibit this feature.
    pub fn hook_word(&self) -> Option<&'static str> {
        match self {
            Self::MentionsSecret => Some("Secret"),
            Self::MentionsUltimate => Some("Ultimate"),
            Self::MentionsNever => Some("Never"),
            Self::MentionsMistake => Some("Mistakes"),
            Self::MentionsBest => Some("Best"),
            Self::MentionsWorst => Some("Worst"),
            Self::MentionsTruth => Some("Truth"),
            Self::MentionsStop => Some("Stop"),
            Self::MentionsHack => Some("Hacks"),
            Self::MentionsEasy => Some("Easy"),
            Self::MentionsBeginner => Some("Beginner"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Count(usize),
}

impl FeatureValue {
    pub fn is_present(&self) -> bool {
        match *self {
            Self::Flag(b) => b,
            Self::Count(n) => n > 0,
        }
    }
}

/// A value for every [`Feature`], indexed by vocabulary position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    values: Vec<FeatureValue>,
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> FeatureValue {
        self.values[feature as usize]
    }

    pub fn has(&self, feature: Feature) -> bool {
        self.get(feature).is_present()
    }

    pub fn word_count(&self) -> usize {
        match self.get(Feature::WordCount) {
            FeatureValue::Count(n) => n,
            FeatureValue::Flag(_) => 0,
        }
    }

    pub fn char_count(&self) -> usize {
        match self.get(Feature::CharCount) {
            FeatureValue::Count(n) => n,
            FeatureValue::Flag(_) => 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, FeatureValue)> + '_ {
        Feature::iter().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (feature, value) in self.iter() {
            map.serialize_entry(feature.as_ref(), &value)?;
        }
        map.end()
    }
}

/// Lowercased words with surrounding punctuation removed.
pub fn tokenize(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn has_caps_run(title: &str, min_run: usize) -> bool {
    let mut run = 0;
    for c in title.chars() {
        if c.is_uppercase() {
            run += 1;
            if run >= min_run {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Maps a title to a value for every feature in the vocabulary. Total and
/// deterministic: the empty string gets a full vector too.
pub fn extract_features(title: &str) -> FeatureVector {
    let trimmed = title.trim();
    let tokens = tokenize(trimmed);
    let first = tokens.first().map(String::as_str).unwrap_or("");
    let has_token = |forms: &[&str]| tokens.iter().any(|t| forms.contains(&t.as_str()));
    let has_char = |set: &[char]| trimmed.chars().any(|c| set.contains(&c));

    let mut values = Vec::with_capacity(Feature::COUNT);
    for feature in Feature::iter() {
        let value = match feature {
            Feature::HasNumber => FeatureValue::Flag(trimmed.chars().any(|c| c.is_ascii_digit())),
            Feature::HasQuestion => FeatureValue::Flag(has_char(&['?'])),
            Feature::HasExclamation => FeatureValue::Flag(has_char(&['!'])),
            Feature::HasPipe => FeatureValue::Flag(has_char(&['|'])),
            Feature::HasColon => FeatureValue::Flag(has_char(&[':'])),
            Feature::HasDash => FeatureValue::Flag(has_char(&['-', '–', '—'])),
            Feature::HasParentheses => FeatureValue::Flag(has_char(&['(', ')', '[', ']'])),
            Feature::HasQuotes => FeatureValue::Flag(has_char(&['"', '“', '”', '«', '»'])),
            Feature::HasAllCaps => FeatureValue::Flag(has_caps_run(trimmed, 3)),
            Feature::StartsWithHow => FeatureValue::Flag(first == "how"),
            Feature::StartsWithWhy => FeatureValue::Flag(first == "why"),
            Feature::StartsWithWhat => FeatureValue::Flag(first == "what"),
            Feature::StartsWithNumber => FeatureValue::Flag(
                trimmed.chars().next().is_some_and(|c| c.is_ascii_digit()),
            ),
            Feature::HasNumberedList => FeatureValue::Flag(NUMBERED_LIST.is_match(trimmed)),
            Feature::HasYear => FeatureValue::Flag(YEAR.is_match(trimmed)),
            Feature::WordCount => FeatureValue::Count(trimmed.split_whitespace().count()),
            Feature::CharCount => FeatureValue::Count(trimmed.chars().count()),
            lexical => FeatureValue::Flag(has_token(lexical.lexical_forms())),
        };
        values.push(value);
    }

    FeatureVector { values }
}
