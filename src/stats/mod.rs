pub mod lift;
pub(crate) mod moments;
pub mod robust;

pub use lift::{calculate_pattern_lift, welch_t_test, LiftResult, WelchTest};
pub use robust::{
    compute_z_scores, exp_transform, log_mean, log_modified_z_score, log_std_dev,
    log_transform, mad, mean, median, niche_normalized_velocity, std_dev, z_score, Baseline,
    NicheComparison, PopulationSummary,
};
