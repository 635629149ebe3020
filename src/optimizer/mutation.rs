use crate::config::SearchParams;
use crate::features::{extract_features, Feature};
use crate::patterns::PatternSet;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::{Display, EnumIter};

const FALLBACK_HOOKS: &[&str] = &["Ultimate", "Secret", "Best", "Easy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    PrependListCount,
    AppendQuestion,
    PrependQuestion,
    AppendYear,
    PrependHook,
    AppendHook,
    SubstituteFirstWord,
    SubstituteLastWord,
    ShuffleWords,
    ListicleFrame,
    TrimTail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub kind: MutationKind,
    pub text: String,
}

/// Vocabulary and limits the mutation catalogue draws from.
#[derive(Debug, Clone)]
pub struct MutationContext {
    pub hook_words: Vec<String>,
    pub top_words: Vec<String>,
    pub year: i32,
    pub min_chars: usize,
    pub max_chars: usize,
    pub trim_ceiling: usize,
}

impl MutationContext {
    pub fn new(patterns: &PatternSet, params: &SearchParams, year: i32) -> Self {
        let mut hook_words: Vec<String> = patterns
            .positive
            .iter()
            .filter_map(|p| p.feature_name.hook_word())
            .map(str::to_string)
            .collect();
        if hook_words.is_empty() {
            hook_words = FALLBACK_HOOKS.iter().map(|s| s.to_string()).collect();
        }

        Self {
            hook_words,
            top_words: patterns.profile.top_words.clone(),
            year,
            min_chars: params.min_title_chars,
            max_chars: params.max_title_chars,
            trim_ceiling: params.trim_ceiling_chars,
        }
    }

    pub fn in_window(&self, text: &str) -> bool {
        let len = text.chars().count();
        len >= self.min_chars && len <= self.max_chars
    }
}

fn pick<'a>(rng: &mut Rng, words: &'a [String]) -> Option<&'a str> {
    if words.is_empty() {
        None
    } else {
        Some(words[rng.usize(0..words.len())].as_str())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn strip_terminal(title: &str) -> &str {
    title.trim_end_matches(|c: char| matches!(c, '.' | '!' | '?') || c.is_whitespace())
}

/// Applies the whole catalogue to `title` and keeps the mutations that change
/// the text and land inside the length window. The RNG is consumed in a fixed
/// order so a seeded generator reproduces the same list.
pub fn generate_mutations(rng: &mut Rng, title: &str, ctx: &MutationContext) -> Vec<Mutation> {
    let title = title.trim();
    let fv = extract_features(title);
    let words: Vec<&str> = title.split_whitespace().collect();
    let lower = title.to_lowercase();
    let mut out = Vec::new();

    // 1. Leading list count
    let n = rng.u32(3..=10);
    if !fv.has(Feature::StartsWithNumber) {
        out.push(Mutation {
            kind: MutationKind::PrependListCount,
            text: format!("{} {}", n, title),
        });
    }

    // 2. Question forms
    if !fv.has(Feature::HasQuestion) {
        let base = strip_terminal(title);
        out.push(Mutation {
            kind: MutationKind::AppendQuestion,
            text: format!("{}?", base),
        });
        if !(fv.has(Feature::StartsWithWhy)
            || fv.has(Feature::StartsWithHow)
            || fv.has(Feature::StartsWithWhat))
        {
            out.push(Mutation {
                kind: MutationKind::PrependQuestion,
                text: format!("Why {}?", base),
            });
        }
    }

    // 3. Year
    if !fv.has(Feature::HasYear) {
        out.push(Mutation {
            kind: MutationKind::AppendYear,
            text: format!("{} ({})", title, ctx.year),
        });
    }

    // 4. Hook words
    if let Some(hook) = pick(rng, &ctx.hook_words) {
        if !lower.contains(&hook.to_lowercase()) {
            out.push(Mutation {
                kind: MutationKind::PrependHook,
                text: format!("{} {}", hook, title),
            });
        }
    }
    if let Some(hook) = pick(rng, &ctx.hook_words) {
        if !lower.contains(&hook.to_lowercase()) {
            out.push(Mutation {
                kind: MutationKind::AppendHook,
                text: format!("{} | {}", title, hook),
            });
        }
    }

    // 5. Outlier vocabulary
    if words.len() >= 2 {
        if let Some(word) = pick(rng, &ctx.top_words) {
            let cap = capitalize(word);
            let mut replaced = words.clone();
            replaced[0] = &cap;
            out.push(Mutation {
                kind: MutationKind::SubstituteFirstWord,
                text: replaced.join(" "),
            });
        }
        if let Some(word) = pick(rng, &ctx.top_words) {
            let cap = capitalize(word);
            let mut replaced = words.clone();
            let last = replaced.len() - 1;
            replaced[last] = &cap;
            out.push(Mutation {
                kind: MutationKind::SubstituteLastWord,
                text: replaced.join(" "),
            });
        }
    }

    // 6. Word order
    if words.len() >= 3 {
        let mut shuffled = words.clone();
        rng.shuffle(&mut shuffled);
        out.push(Mutation {
            kind: MutationKind::ShuffleWords,
            text: shuffled.join(" "),
        });
    }

    // 7. Listicle frame
    let n = rng.u32(3..=10);
    if !fv.has(Feature::HasNumberedList) {
        out.push(Mutation {
            kind: MutationKind::ListicleFrame,
            text: format!("{} Ways to {}", n, title),
        });
    }

    // 8. Trim overlong titles
    if fv.char_count() > ctx.trim_ceiling && words.len() >= 4 {
        out.push(Mutation {
            kind: MutationKind::TrimTail,
            text: words[..words.len() - 2].join(" "),
        });
    }

    let mut seen = HashSet::new();
    out.retain(|m| m.text != title && ctx.in_window(&m.text) && seen.insert(m.text.clone()));
    out
}
