//! # u-percolation
//!
//! Percolation threshold estimation on an n×n grid.
//!
//! Sites of a grid open at random until an open path joins the top row to
//! the bottom row. The fraction of open sites at that moment is one sample
//! of the percolation threshold; repeating the experiment gives a Monte
//! Carlo estimate with a confidence interval.
//!
//! ## Modules
//!
//! - [`collections`]: weighted union-find with path halving
//! - [`percolation`]: the grid model (open, is-open, is-full, percolates)
//! - [`random`]: seeded RNG and random-site samplers
//! - [`stats`]: mean, sample standard deviation, confidence intervals
//! - [`simulation`]: Monte Carlo trials and their summary
//!
//! ## Design Philosophy
//!
//! - **No backwash**: fullness and percolation are answered by two
//!   separate union-find structures, only one of which has a virtual bottom
//! - **Explicit randomness**: every trial owns a seeded generator, so runs
//!   reproduce exactly, sequential or parallel
//! - **Property-based testing**: model invariants verified via proptest

pub mod collections;
pub mod percolation;
pub mod random;
pub mod simulation;
pub mod stats;

pub use percolation::{Percolation, PercolationError};
pub use simulation::{PercolationStats, Sampling, SimulationError, SimulationSettings};
