//! Monte Carlo estimation of the percolation threshold.
//!
//! A trial opens random sites of a fresh n×n [`Percolation`] until it
//! percolates; the fraction of open sites at that moment is one threshold
//! sample. [`PercolationStats`] runs many independent trials and reduces
//! the samples to a mean, sample standard deviation and 95% confidence
//! interval.
//!
//! # Reproducibility
//!
//! Trial `t` draws from its own generator seeded with
//! [`trial_seed`]`(seed, t)`. A run is therefore fully determined by its
//! [`SimulationSettings`], and sequential and parallel execution produce
//! identical samples in identical order.

use derive_builder::Builder;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::percolation::{Percolation, PercolationError};
use crate::random::{create_rng, random_site, shuffled_sites, trial_seed};
use crate::stats::{ConfidenceInterval, WelfordAccumulator, Z_95};

/// Default grid dimension.
pub const DEFAULT_GRID_SIZE: usize = 30;
/// Default number of trials.
pub const DEFAULT_TRIALS: usize = 1000;
/// Default run seed.
pub const DEFAULT_SEED: u64 = 0;

/// Error type returned by simulation setup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("grid size must be > 0")]
    InvalidGridSize,
    #[error("number of trials must be > 0")]
    InvalidTrials,
    #[error(transparent)]
    Grid(#[from] PercolationError),
}

/// How a trial chooses the next site to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sampling {
    /// Draw uniformly from all n² sites each step, repeats included.
    #[default]
    WithReplacement,
    /// Open the sites of one random permutation in order, no repeats.
    Permutation,
}

/// Settings for a Monte Carlo run.
///
/// # Examples
/// ```
/// use u_percolation::simulation::{Sampling, SimulationSettingsBuilder};
///
/// let settings = SimulationSettingsBuilder::default()
///     .grid_size(10)
///     .trials(50)
///     .seed(7)
///     .sampling(Sampling::Permutation)
///     .build()
///     .unwrap();
/// assert_eq!(settings.grid_size, 10);
/// assert!(!settings.parallel);
///
/// assert!(SimulationSettingsBuilder::default().trials(0).build().is_err());
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct SimulationSettings {
    /// grid dimension n
    #[builder(default = "DEFAULT_GRID_SIZE")]
    pub grid_size: usize,

    /// number of independent trials
    #[builder(default = "DEFAULT_TRIALS")]
    pub trials: usize,

    /// run seed, expanded into one seed per trial
    #[builder(default = "DEFAULT_SEED")]
    pub seed: u64,

    /// site selection strategy
    #[builder(default)]
    pub sampling: Sampling,

    /// run trials on the rayon thread pool
    #[builder(default = "false")]
    pub parallel: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
            sampling: Sampling::default(),
            parallel: false,
        }
    }
}

impl SimulationSettings {
    /// Checks that the grid size and trial count are positive.
    pub fn validate(&self) -> Result<(), SimulationError> {
        check_counts(self.grid_size, self.trials)
    }
}

/// Shared by the settings and their builder.
fn check_counts(grid_size: usize, trials: usize) -> Result<(), SimulationError> {
    if grid_size == 0 {
        return Err(SimulationError::InvalidGridSize);
    }
    if trials == 0 {
        return Err(SimulationError::InvalidTrials);
    }
    Ok(())
}

impl From<SimulationError> for SimulationSettingsBuilderError {
    fn from(e: SimulationError) -> Self {
        SimulationSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl SimulationSettingsBuilder {
    fn validate(&self) -> Result<(), SimulationError> {
        check_counts(
            self.grid_size.unwrap_or(DEFAULT_GRID_SIZE),
            self.trials.unwrap_or(DEFAULT_TRIALS),
        )
    }
}

/// Runs one trial on an n×n grid and returns its threshold sample,
/// `open sites / n²` at the moment the grid first percolates.
///
/// # Errors
/// Returns [`PercolationError::InvalidGridSize`] if `n == 0`.
///
/// # Examples
/// ```
/// use u_percolation::random::create_rng;
/// use u_percolation::simulation::{run_trial, Sampling};
///
/// let mut rng = create_rng(1);
/// let p = run_trial(8, Sampling::WithReplacement, &mut rng).unwrap();
/// assert!(p > 0.0 && p <= 1.0);
/// ```
pub fn run_trial<R: Rng>(
    n: usize,
    sampling: Sampling,
    rng: &mut R,
) -> Result<f64, PercolationError> {
    let mut perc = Percolation::new(n)?;
    match sampling {
        Sampling::WithReplacement => {
            while !perc.percolates() {
                let (row, col) = random_site(n, rng);
                perc.open(row, col)?;
            }
        }
        Sampling::Permutation => {
            for (row, col) in shuffled_sites(n, rng) {
                perc.open(row, col)?;
                if perc.percolates() {
                    break;
                }
            }
        }
    }
    trace!(open_sites = perc.number_of_open_sites(), "grid percolates");
    Ok(perc.open_fraction())
}

/// Threshold samples from a Monte Carlo run and their summary statistics.
#[derive(Debug, Clone)]
pub struct PercolationStats {
    grid_size: usize,
    samples: Vec<f64>,
    mean: f64,
    stddev: f64,
}

impl PercolationStats {
    /// Runs `settings.trials` independent trials.
    ///
    /// # Errors
    /// Returns a [`SimulationError`] if the settings are invalid.
    pub fn run(settings: &SimulationSettings) -> Result<Self, SimulationError> {
        settings.validate()?;
        let n = settings.grid_size;
        info!(
            grid_size = n,
            trials = settings.trials,
            seed = settings.seed,
            sampling = ?settings.sampling,
            parallel = settings.parallel,
            "starting percolation simulation"
        );

        let trial = |t: usize| -> Result<f64, PercolationError> {
            let mut rng = create_rng(trial_seed(settings.seed, t as u64));
            let threshold = run_trial(n, settings.sampling, &mut rng)?;
            debug!(trial = t, threshold, "trial finished");
            Ok(threshold)
        };

        let samples: Vec<f64> = if settings.parallel {
            (0..settings.trials)
                .into_par_iter()
                .map(trial)
                .collect::<Result<_, _>>()?
        } else {
            (0..settings.trials).map(trial).collect::<Result<_, _>>()?
        };

        let stats = Self::from_samples(n, samples);
        info!(
            mean = stats.mean,
            stddev = stats.stddev,
            "percolation simulation finished"
        );
        Ok(stats)
    }

    /// Summarizes threshold samples gathered elsewhere.
    ///
    /// `stddev` is NaN with fewer than two samples, and `mean` is NaN with none.
    pub fn from_samples(grid_size: usize, samples: Vec<f64>) -> Self {
        let mut acc = WelfordAccumulator::new();
        for &x in &samples {
            acc.update(x);
        }
        Self {
            grid_size,
            mean: acc.mean().unwrap_or(f64::NAN),
            stddev: acc.sample_std_dev().unwrap_or(f64::NAN),
            samples,
        }
    }

    /// Returns the grid dimension the trials ran on.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Returns the number of trials.
    pub fn trials(&self) -> usize {
        self.samples.len()
    }

    /// Returns the threshold samples in trial order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample mean of the percolation threshold.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation of the percolation threshold.
    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// 95% confidence interval for the threshold.
    pub fn confidence_interval(&self) -> ConfidenceInterval {
        ConfidenceInterval::normal(self.mean, self.stddev, self.trials(), Z_95)
    }

    /// Low endpoint of the 95% confidence interval.
    pub fn confidence_lo(&self) -> f64 {
        self.confidence_interval().lo
    }

    /// High endpoint of the 95% confidence interval.
    pub fn confidence_hi(&self) -> f64 {
        self.confidence_interval().hi
    }

    /// Snapshot for serialization.
    pub fn report(&self) -> StatsReport {
        StatsReport {
            grid_size: self.grid_size,
            trials: self.trials(),
            mean: self.mean,
            stddev: self.stddev,
            confidence_interval: self.confidence_interval(),
        }
    }
}

/// Serializable summary of a [`PercolationStats`] run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub grid_size: usize,
    pub trials: usize,
    pub mean: f64,
    pub stddev: f64,
    pub confidence_interval: ConfidenceInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(grid_size: usize, trials: usize, seed: u64) -> SimulationSettings {
        SimulationSettingsBuilder::default()
            .grid_size(grid_size)
            .trials(trials)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let built = SimulationSettingsBuilder::default().build().unwrap();
        assert_eq!(built, SimulationSettings::default());
        assert_eq!(built.grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(built.trials, DEFAULT_TRIALS);
        assert_eq!(built.sampling, Sampling::WithReplacement);
    }

    #[test]
    fn test_builder_rejects_zero() {
        assert!(SimulationSettingsBuilder::default().grid_size(0).build().is_err());
        assert!(SimulationSettingsBuilder::default().trials(0).build().is_err());
    }

    #[test]
    fn test_builder_and_settings_report_same_error() {
        for (grid_size, trials, expected) in [
            (0, 10, SimulationError::InvalidGridSize),
            (10, 0, SimulationError::InvalidTrials),
            (0, 0, SimulationError::InvalidGridSize),
        ] {
            let literal = SimulationSettings {
                grid_size,
                trials,
                ..SimulationSettings::default()
            };
            assert_eq!(literal.validate(), Err(expected.clone()));

            match SimulationSettingsBuilder::default()
                .grid_size(grid_size)
                .trials(trials)
                .build()
            {
                Err(SimulationSettingsBuilderError::ValidationError(msg)) => {
                    assert_eq!(msg, expected.to_string());
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_run_rejects_invalid_literal_settings() {
        let mut s = SimulationSettings::default();
        s.grid_size = 0;
        assert_eq!(
            PercolationStats::run(&s).unwrap_err(),
            SimulationError::InvalidGridSize
        );
        s.grid_size = 3;
        s.trials = 0;
        assert_eq!(
            PercolationStats::run(&s).unwrap_err(),
            SimulationError::InvalidTrials
        );
    }

    #[test]
    fn test_run_trial_zero_grid() {
        let mut rng = create_rng(0);
        assert_eq!(
            run_trial(0, Sampling::WithReplacement, &mut rng),
            Err(PercolationError::InvalidGridSize(0))
        );
    }

    #[test]
    fn test_single_cell_threshold_is_one() {
        let stats = PercolationStats::run(&settings(1, 25, 3)).unwrap();
        assert_eq!(stats.trials(), 25);
        assert!(stats.samples().iter().all(|&p| p == 1.0));
        assert_eq!(stats.mean(), 1.0);
        assert_eq!(stats.stddev(), 0.0);
        assert_eq!(stats.confidence_lo(), 1.0);
        assert_eq!(stats.confidence_hi(), 1.0);
    }

    #[test]
    fn test_two_by_two_thresholds() {
        // A 2×2 grid percolates after 2 or 3 opens.
        let mut rng = create_rng(11);
        for _ in 0..50 {
            let p = run_trial(2, Sampling::Permutation, &mut rng).unwrap();
            assert!(p == 0.5 || p == 0.75, "unexpected threshold {p}");
        }
    }

    #[test]
    fn test_single_trial_has_undefined_spread() {
        let stats = PercolationStats::run(&settings(4, 1, 0)).unwrap();
        assert!(stats.mean() > 0.0);
        assert!(stats.stddev().is_nan());
        assert!(stats.confidence_lo().is_nan());
    }

    #[test]
    fn test_same_seed_same_samples() {
        let a = PercolationStats::run(&settings(8, 20, 99)).unwrap();
        let b = PercolationStats::run(&settings(8, 20, 99)).unwrap();
        assert_eq!(a.samples(), b.samples());

        let c = PercolationStats::run(&settings(8, 20, 100)).unwrap();
        assert_ne!(a.samples(), c.samples());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = settings(10, 40, 5);
        let parallel = SimulationSettings {
            parallel: true,
            ..sequential.clone()
        };
        let a = PercolationStats::run(&sequential).unwrap();
        let b = PercolationStats::run(&parallel).unwrap();
        assert_eq!(a.samples(), b.samples());
        assert_eq!(a.mean(), b.mean());
    }

    #[test]
    fn test_threshold_estimate_near_known_value() {
        // Site percolation on the square lattice: p* ≈ 0.5927.
        for sampling in [Sampling::WithReplacement, Sampling::Permutation] {
            let s = SimulationSettings {
                grid_size: 20,
                trials: 200,
                seed: 2024,
                sampling,
                parallel: true,
            };
            let stats = PercolationStats::run(&s).unwrap();
            assert!(
                (0.55..0.64).contains(&stats.mean()),
                "{sampling:?}: mean {} far from 0.593",
                stats.mean()
            );
            assert!(stats.confidence_lo() < stats.mean());
            assert!(stats.confidence_hi() > stats.mean());
        }
    }

    #[test]
    fn test_confidence_interval_formula() {
        let stats = PercolationStats::from_samples(5, vec![0.5, 0.6, 0.7, 0.6]);
        let half = 1.96 * stats.stddev() / 2.0;
        assert!((stats.confidence_lo() - (stats.mean() - half)).abs() < 1e-15);
        assert!((stats.confidence_hi() - (stats.mean() + half)).abs() < 1e-15);
        assert!((stats.mean() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_summary_matches_batch_statistics() {
        let s = SimulationSettings {
            grid_size: 6,
            trials: 30,
            seed: 17,
            parallel: true,
            ..SimulationSettings::default()
        };
        let stats = PercolationStats::run(&s).unwrap();
        let batch_mean = crate::stats::mean(stats.samples()).unwrap();
        let batch_sd = crate::stats::std_dev(stats.samples()).unwrap();
        assert!((stats.mean() - batch_mean).abs() < 1e-12);
        assert!((stats.stddev() - batch_sd).abs() < 1e-12);

        let ci = stats.confidence_interval();
        assert!(ci.lo <= stats.mean() && stats.mean() <= ci.hi);
        assert_eq!(stats.report().confidence_interval, ci);
    }

    #[test]
    fn test_report_serializes() {
        let stats = PercolationStats::from_samples(2, vec![0.5, 0.75]);
        let json = serde_json::to_value(stats.report()).unwrap();
        assert_eq!(json["grid_size"], 2);
        assert_eq!(json["trials"], 2);
        assert_eq!(json["mean"], 0.625);
        assert!(json["confidence_interval"]["lo"].is_number());
    }

    #[test]
    fn test_sampling_serializes_kebab_case() {
        let json = serde_json::to_string(&Sampling::WithReplacement).unwrap();
        assert_eq!(json, "\"with-replacement\"");
    }
}
