use crate::config::FitnessWeights;
use crate::features::{extract_features, Feature, FeatureVector};
use crate::patterns::PatternSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub pattern_match: f64,
    pub saturation_penalty: f64,
    pub length_score: f64,
    pub hook_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleScore {
    /// `clamp(pattern_match - saturation_penalty + length_score + hook_bonus, 0, 100)`
    pub total: f64,
    pub breakdown: ScoreBreakdown,
    pub matched_positive: usize,
    /// Share of learned positive patterns the title exhibits, in percent.
    pub confidence_percent: f64,
}

struct WeightedFeature {
    feature: Feature,
    weight: f64,
}

/// Fitness function the title walk maximizes, built from one [`PatternSet`].
pub struct FitnessScorer {
    positive: Vec<WeightedFeature>,
    negative: Vec<WeightedFeature>,
    target_words: usize,
    weights: FitnessWeights,
}

impl FitnessScorer {
    pub fn new(patterns: &PatternSet, weights: &FitnessWeights) -> Self {
        let outlier_avg_z = patterns.profile.average_z_score;

        // Patterns backed by stronger-than-average outliers count for more
        let positive = patterns
            .positive
            .iter()
            .map(|p| {
                let relative = if outlier_avg_z > 0.0 {
                    p.average_z_score / outlier_avg_z
                } else {
                    1.0
                };
                WeightedFeature {
                    feature: p.feature_name,
                    weight: p.weight * relative,
                }
            })
            .collect();

        let negative = patterns
            .negative
            .iter()
            .map(|p| WeightedFeature {
                feature: p.feature_name,
                weight: p.weight,
            })
            .collect();

        let target_words = if patterns.profile.outlier_count > 0 {
            patterns.profile.average_word_count.round() as usize
        } else {
            weights.default_target_words
        };

        Self {
            positive,
            negative,
            target_words,
            weights: weights.clone(),
        }
    }

    pub fn target_words(&self) -> usize {
        self.target_words
    }

    pub fn positive_pattern_count(&self) -> usize {
        self.positive.len()
    }

    pub fn score(&self, text: &str) -> TitleScore {
        let fv = extract_features(text);
        self.score_features(&fv)
    }

    pub fn score_features(&self, fv: &FeatureVector) -> TitleScore {
        let w = &self.weights;

        let mut matched_positive = 0;
        let mut pattern_match = 0.0;
        for p in &self.positive {
            if fv.has(p.feature) {
                matched_positive += 1;
                pattern_match += p.weight;
            }
        }
        let pattern_match = pattern_match.clamp(0.0, w.pattern_match_cap);

        let saturation_penalty = self
            .negative
            .iter()
            .filter(|p| fv.has(p.feature))
            .map(|p| p.weight)
            .sum::<f64>()
            .clamp(0.0, w.saturation_cap);

        let length_score = self.length_score(fv.word_count(), fv.char_count());
        let hook_bonus = self.hook_bonus(fv);

        let total =
            (pattern_match - saturation_penalty + length_score + hook_bonus).clamp(0.0, 100.0);

        let confidence_percent = if self.positive.is_empty() {
            0.0
        } else {
            matched_positive as f64 / self.positive.len() as f64 * 100.0
        };

        TitleScore {
            total,
            breakdown: ScoreBreakdown {
                pattern_match,
                saturation_penalty,
                length_score,
                hook_bonus,
            },
            matched_positive,
            confidence_percent,
        }
    }

    fn length_score(&self, words: usize, chars: usize) -> f64 {
        let w = &self.weights;
        let lo = self.target_words.saturating_sub(w.word_window);
        let hi = self.target_words + w.word_window;

        let word_distance = if words < lo {
            lo - words
        } else if words > hi {
            words - hi
        } else {
            0
        };

        let mut score = w.length_score_max - word_distance as f64 * w.word_deviation_penalty;
        if chars < w.comfortable_min_chars || chars > w.comfortable_max_chars {
            score -= w.char_band_penalty;
        }
        score.clamp(0.0, w.length_score_max)
    }

    fn hook_bonus(&self, fv: &FeatureVector) -> f64 {
        let w = &self.weights;
        let mut bonus = 0.0;
        if fv.has(Feature::HasNumber) {
            bonus += w.bonus_number;
        }
        if fv.has(Feature::HasQuestion) {
            bonus += w.bonus_question;
        }
        if fv.has(Feature::StartsWithNumber) {
            bonus += w.bonus_leading_number;
        }
        if fv.has(Feature::HasYear) {
            bonus += w.bonus_year;
        }
        if fv.has(Feature::HasNumberedList) {
            bonus += w.bonus_list_phrase;
        }
        bonus.clamp(0.0, w.hook_bonus_cap)
    }
}
