//! Numerical helpers shared by the pricing layers.
//!
//! - [`statistics`]: sample mean, variance and standard error of Monte Carlo estimators

pub mod statistics;
