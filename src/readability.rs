//! Readability signals for titles and descriptions.
//!
//! Titles are scored with a character-class heuristic: Flesch-Kincaid assumes
//! multi-sentence prose and swings wildly on a single short phrase. The full
//! Flesch-Kincaid calculator is kept for description-length text.

use crate::config::StatsParams;
use crate::item::ScoredItem;
use crate::stats::moments::{mean, sample_variance};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

// Character heuristic tuning
const IDEAL_AVG_WORD_LEN: f64 = 5.0;
const LONG_WORD_LEN: usize = 9;
const VOWEL_BAND: (f64, f64) = (0.30, 0.45);
const PUNCTUATION_ALLOWANCE: f64 = 0.10;
const COMFORTABLE_WORDS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterReadability {
    /// 0 (hard) to 100 (easy).
    pub score: f64,
    pub word_count: usize,
    pub average_word_length: f64,
    pub long_word_ratio: f64,
    pub vowel_density: f64,
    pub punctuation_density: f64,
}

/// Syllable-free readability for short strings, from character-class ratios.
/// Always returns a finite score in [0, 100]; text with no letters scores 0.
pub fn character_readability(text: &str) -> CharacterReadability {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    let letters: Vec<char> = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(|c| c.to_lowercase())
        .collect();

    if words.is_empty() || letters.is_empty() {
        return CharacterReadability {
            word_count: words.len(),
            ..Default::default()
        };
    }

    let non_space = text.chars().filter(|c| !c.is_whitespace()).count().max(1);
    let punctuation = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();

    let lengths: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();
    let average_word_length = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
    let long_word_ratio =
        lengths.iter().filter(|&&l| l >= LONG_WORD_LEN).count() as f64 / lengths.len() as f64;
    let vowel_density =
        letters.iter().filter(|c| VOWELS.contains(c)).count() as f64 / letters.len() as f64;
    let punctuation_density = punctuation as f64 / non_space as f64;

    let mut score = 100.0;
    score -= (average_word_length - IDEAL_AVG_WORD_LEN).max(0.0) * 8.0;
    score -= long_word_ratio * 30.0;
    if vowel_density < VOWEL_BAND.0 {
        score -= (VOWEL_BAND.0 - vowel_density) * 100.0;
    } else if vowel_density > VOWEL_BAND.1 {
        score -= (vowel_density - VOWEL_BAND.1) * 100.0;
    }
    score -= (punctuation_density - PUNCTUATION_ALLOWANCE).max(0.0) * 100.0;
    score -= words.len().saturating_sub(COMFORTABLE_WORDS) as f64 * 2.0;

    CharacterReadability {
        score: score.clamp(0.0, 100.0),
        word_count: words.len(),
        average_word_length,
        long_word_ratio,
        vowel_density,
        punctuation_density,
    }
}

/// Vowel-group syllable estimate with silent-e, -le and -ed adjustments.
pub fn count_syllables(word: &str) -> usize {
    let w: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(|c| c.to_lowercase())
        .collect();

    if w.is_empty() {
        return 0;
    }
    if w.len() <= 3 {
        return 1;
    }

    let is_vowel = |c: char| VOWELS.contains(&c) || c == 'y';
    let mut groups = 0;
    let mut prev_vowel = false;
    for &c in &w {
        let v = is_vowel(c);
        if v && !prev_vowel {
            groups += 1;
        }
        prev_vowel = v;
    }

    let n = w.len();
    let last = w[n - 1];
    let before = w[n - 2];
    if last == 'e' && groups > 1 {
        let consonant_le = before == 'l' && n >= 3 && !is_vowel(w[n - 3]);
        if !consonant_le {
            groups -= 1;
        }
    } else if last == 'd' && before == 'e' && groups > 1 && n >= 3 && !matches!(w[n - 3], 't' | 'd') {
        groups -= 1;
    }

    groups.max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleschKincaid {
    /// Flesch reading ease, clamped to [0, 100].
    pub reading_ease: f64,
    /// Flesch-Kincaid grade level, floored at 0.
    pub grade_level: f64,
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
}

/// Flesch reading ease and Flesch-Kincaid grade. Meant for descriptions,
/// not titles. Text without words scores 0 on both.
pub fn flesch_kincaid(text: &str) -> FleschKincaid {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().any(|c| c.is_alphabetic()))
        .collect();
    if words.is_empty() {
        return FleschKincaid::default();
    }

    let sentences = text
        .split(|c: char| matches!(c, '.' | '!' | '?'))
        .filter(|s| s.chars().any(|c| c.is_alphabetic()))
        .count()
        .max(1);
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let wps = words.len() as f64 / sentences as f64;
    let spw = syllables as f64 / words.len() as f64;

    FleschKincaid {
        reading_ease: (206.835 - 1.015 * wps - 84.6 * spw).clamp(0.0, 100.0),
        grade_level: (0.39 * wps + 11.8 * spw - 15.59).max(0.0),
        words: words.len(),
        sentences,
        syllables,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeanDifferenceCi {
    /// `mean(a) - mean(b)`
    pub difference: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub standard_error: f64,
    /// The interval excludes zero.
    pub significant: bool,
    /// Both samples reached the minimum size.
    pub sample_sufficient: bool,
}

/// Confidence interval on the difference of two means, with the standard
/// error taken from the pooled variance and a Student-t critical value.
pub fn mean_difference_ci(a: &[f64], b: &[f64], params: &StatsParams) -> MeanDifferenceCi {
    let difference = mean(a) - mean(b);
    let sample_sufficient = a.len() >= params.min_ci_sample && b.len() >= params.min_ci_sample;

    let degenerate = MeanDifferenceCi {
        difference,
        lower_bound: difference,
        upper_bound: difference,
        standard_error: 0.0,
        significant: false,
        sample_sufficient,
    };

    if a.is_empty() || b.is_empty() || a.len() + b.len() < 3 {
        return degenerate;
    }

    let (na, nb) = (a.len() as f64, b.len() as f64);
    let df = na + nb - 2.0;
    let pooled = ((na - 1.0) * sample_variance(a) + (nb - 1.0) * sample_variance(b)) / df;
    let standard_error = pooled.sqrt() * (1.0 / na + 1.0 / nb).sqrt();

    let critical = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.inverse_cdf(1.0 - (1.0 - params.confidence_level) / 2.0),
        Err(_) => return degenerate,
    };

    let margin = critical * standard_error;
    let lower_bound = difference - margin;
    let upper_bound = difference + margin;

    MeanDifferenceCi {
        difference,
        lower_bound,
        upper_bound,
        standard_error,
        significant: lower_bound > 0.0 || upper_bound < 0.0,
        sample_sufficient,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityComparison {
    pub outlier_mean: f64,
    pub others_mean: f64,
    pub interval: MeanDifferenceCi,
}

/// Character readability of outlier titles against every other title.
pub fn compare_title_readability(
    items: &[ScoredItem],
    params: &StatsParams,
) -> ReadabilityComparison {
    let (outliers, others): (Vec<&ScoredItem>, Vec<&ScoredItem>) =
        items.iter().partition(|i| i.is_outlier());

    let score = |set: &[&ScoredItem]| -> Vec<f64> {
        set.iter()
            .map(|i| character_readability(i.title()).score)
            .collect()
    };
    let a = score(&outliers);
    let b = score(&others);

    ReadabilityComparison {
        outlier_mean: mean(&a),
        others_mean: mean(&b),
        interval: mean_difference_ci(&a, &b, params),
    }
}
