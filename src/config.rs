use crate::error::{TfResult, TitleForgeError};
use clap::{parser::ValueSource, ArgMatches, Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::Display;

/// Which z-score formula classifies outliers and underperformers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ZScoreMethod {
    /// MAD-based modified z-score on `ln(x + 1)` values.
    LogMad,
    /// Plain mean/stddev z-score on raw values.
    Classic,
}

/// How the walk picks its proposal from the surviving mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProposalStrategy {
    /// Score every mutation and propose the highest.
    Best,
    /// Propose one mutation drawn uniformly at random.
    Sample,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    #[serde(default)]
    pub stats: StatsParams,
    #[command(flatten)]
    #[serde(default)]
    pub patterns: PatternParams,
    #[command(flatten)]
    #[serde(default)]
    pub search: SearchParams,
    #[command(flatten)]
    #[serde(default)]
    pub fitness: FitnessWeights,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsParams {
    #[arg(long, default_value_t = 1.5, allow_negative_numbers = true)]
    pub outlier_threshold: f64,
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub underperformer_threshold: f64,
    #[arg(long, value_enum, default_value_t = ZScoreMethod::LogMad)]
    pub z_method: ZScoreMethod,
    // Spreads below this count as zero
    #[arg(long, default_value_t = 1e-9)]
    pub spread_floor: f64,
    #[arg(long, default_value_t = 0.1)]
    pub alpha: f64,
    #[arg(long, default_value_t = 0.95)]
    pub confidence_level: f64,
    #[arg(long, default_value_t = 5)]
    pub min_ci_sample: usize,
}

impl Default for StatsParams {
    fn default() -> Self {
        Self {
            outlier_threshold: 1.5,
            underperformer_threshold: -1.0,
            z_method: ZScoreMethod::LogMad,
            spread_floor: 1e-9,
            alpha: 0.1,
            confidence_level: 0.95,
            min_ci_sample: 5,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternParams {
    #[arg(long, default_value_t = 2)]
    pub min_subset_occurrences: usize,
    #[arg(long, default_value_t = 3)]
    pub min_population_occurrences: usize,
    #[arg(long, default_value_t = 10.0)]
    pub pattern_weight_scale: f64,
    #[arg(long, default_value_t = 10)]
    pub top_word_count: usize,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            min_subset_occurrences: 2,
            min_population_occurrences: 3,
            pattern_weight_scale: 10.0,
            top_word_count: 10,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = 20)]
    pub iterations: usize,
    #[arg(long, default_value_t = 50)]
    pub max_iterations: usize,
    #[arg(long, default_value_t = 0.3)]
    pub temperature: f64,
    // 1.0 keeps the walk at a fixed temperature
    #[arg(long, default_value_t = 1.0)]
    pub cooling_rate: f64,
    #[arg(long, default_value_t = 20)]
    pub min_title_chars: usize,
    #[arg(long, default_value_t = 80)]
    pub max_title_chars: usize,
    #[arg(long, default_value_t = 60)]
    pub trim_ceiling_chars: usize,
    #[arg(long, value_enum, default_value_t = ProposalStrategy::Best)]
    pub proposal: ProposalStrategy,
    #[arg(long, default_value_t = 1)]
    pub replicas: usize,
    #[arg(long, default_value_t = 10)]
    pub top_n: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            iterations: 20,
            max_iterations: 50,
            temperature: 0.3,
            cooling_rate: 1.0,
            min_title_chars: 20,
            max_title_chars: 80,
            trim_ceiling_chars: 60,
            proposal: ProposalStrategy::Best,
            replicas: 1,
            top_n: 10,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    // === CAPS ===
    #[arg(long, default_value_t = 40.0)]
    pub pattern_match_cap: f64,
    #[arg(long, default_value_t = 20.0)]
    pub saturation_cap: f64,
    #[arg(long, default_value_t = 20.0)]
    pub length_score_max: f64,
    #[arg(long, default_value_t = 20.0)]
    pub hook_bonus_cap: f64,

    // === LENGTH ===
    #[arg(long, default_value_t = 2)]
    pub word_window: usize,
    #[arg(long, default_value_t = 3.0)]
    pub word_deviation_penalty: f64,
    // Used when there are no outliers to learn a word count from
    #[arg(long, default_value_t = 8)]
    pub default_target_words: usize,
    #[arg(long, default_value_t = 25)]
    pub comfortable_min_chars: usize,
    #[arg(long, default_value_t = 60)]
    pub comfortable_max_chars: usize,
    #[arg(long, default_value_t = 5.0)]
    pub char_band_penalty: f64,

    // === HOOKS ===
    #[arg(long, default_value_t = 5.0)]
    pub bonus_number: f64,
    #[arg(long, default_value_t = 5.0)]
    pub bonus_question: f64,
    #[arg(long, default_value_t = 5.0)]
    pub bonus_leading_number: f64,
    #[arg(long, default_value_t = 3.0)]
    pub bonus_year: f64,
    #[arg(long, default_value_t = 5.0)]
    pub bonus_list_phrase: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            pattern_match_cap: 40.0,
            saturation_cap: 20.0,
            length_score_max: 20.0,
            hook_bonus_cap: 20.0,
            word_window: 2,
            word_deviation_penalty: 3.0,
            default_target_words: 8,
            comfortable_min_chars: 25,
            comfortable_max_chars: 60,
            char_band_penalty: 5.0,
            bonus_number: 5.0,
            bonus_question: 5.0,
            bonus_leading_number: 5.0,
            bonus_year: 3.0,
            bonus_list_phrase: 5.0,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TitleForgeError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlays every flag the user typed on top of `self`, leaving file values
    /// for anything that only carried its clap default.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(stats.outlier_threshold);
        update_if_present!(stats.underperformer_threshold);
        update_if_present!(stats.z_method);
        update_if_present!(stats.spread_floor);
        update_if_present!(stats.alpha);
        update_if_present!(stats.confidence_level);
        update_if_present!(stats.min_ci_sample);

        update_if_present!(patterns.min_subset_occurrences);
        update_if_present!(patterns.min_population_occurrences);
        update_if_present!(patterns.pattern_weight_scale);
        update_if_present!(patterns.top_word_count);

        update_if_present!(search.iterations);
        update_if_present!(search.max_iterations);
        update_if_present!(search.temperature);
        update_if_present!(search.cooling_rate);
        update_if_present!(search.min_title_chars);
        update_if_present!(search.max_title_chars);
        update_if_present!(search.trim_ceiling_chars);
        update_if_present!(search.proposal);
        update_if_present!(search.replicas);
        update_if_present!(search.top_n);

        update_if_present!(fitness.pattern_match_cap);
        update_if_present!(fitness.saturation_cap);
        update_if_present!(fitness.length_score_max);
        update_if_present!(fitness.hook_bonus_cap);
        update_if_present!(fitness.word_window);
        update_if_present!(fitness.word_deviation_penalty);
        update_if_present!(fitness.default_target_words);
        update_if_present!(fitness.comfortable_min_chars);
        update_if_present!(fitness.comfortable_max_chars);
        update_if_present!(fitness.char_band_penalty);
        update_if_present!(fitness.bonus_number);
        update_if_present!(fitness.bonus_question);
        update_if_present!(fitness.bonus_leading_number);
        update_if_present!(fitness.bonus_year);
        update_if_present!(fitness.bonus_list_phrase);
    }

    pub fn validate(&self) -> TfResult<()> {
        let s = &self.stats;
        if s.underperformer_threshold >= s.outlier_threshold {
            return Err(TitleForgeError::Config(format!(
                "underperformer_threshold ({}) must be below outlier_threshold ({})",
                s.underperformer_threshold, s.outlier_threshold
            )));
        }
        if !(s.alpha > 0.0 && s.alpha < 1.0) {
            return Err(TitleForgeError::Config(format!(
                "alpha must be in (0, 1), got {}",
                s.alpha
            )));
        }
        if !(s.confidence_level > 0.0 && s.confidence_level < 1.0) {
            return Err(TitleForgeError::Config(format!(
                "confidence_level must be in (0, 1), got {}",
                s.confidence_level
            )));
        }
        if s.spread_floor <= 0.0 {
            return Err(TitleForgeError::Config(
                "spread_floor must be positive".to_string(),
            ));
        }

        let q = &self.search;
        if q.temperature <= 0.0 || !q.temperature.is_finite() {
            return Err(TitleForgeError::Config(format!(
                "temperature must be positive, got {}",
                q.temperature
            )));
        }
        if !(q.cooling_rate > 0.0 && q.cooling_rate <= 1.0) {
            return Err(TitleForgeError::Config(format!(
                "cooling_rate must be in (0, 1], got {}",
                q.cooling_rate
            )));
        }
        if q.min_title_chars > q.max_title_chars {
            return Err(TitleForgeError::Config(format!(
                "title window is inverted: {}..{}",
                q.min_title_chars, q.max_title_chars
            )));
        }
        if q.replicas == 0 {
            return Err(TitleForgeError::Config(
                "replicas must be at least 1".to_string(),
            ));
        }

        let f = &self.fitness;
        if f.comfortable_min_chars > f.comfortable_max_chars {
            return Err(TitleForgeError::Config(format!(
                "comfortable character band is inverted: {}..{}",
                f.comfortable_min_chars, f.comfortable_max_chars
            )));
        }
        Ok(())
    }
}
