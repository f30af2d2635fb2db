//! Core traits for priceable instruments.
//!
//! Traits are designed for static dispatch: instruments are enums, and the
//! pricing layer is generic over the contract type rather than holding
//! `Box<dyn Trait>`.

/// Generic floating-point trait for numeric computations.
///
/// # Examples
/// ```
/// use pricer_core::traits::Float;
///
/// fn growth<T: Float>(rate: T, time: T) -> T {
///     (rate * time).exp()
/// }
///
/// let g: f64 = growth(0.03, 2.0);
/// assert!((g - 1.061837).abs() < 1e-5);
/// ```
pub use num_traits::Float;

pub mod priceable;

pub use priceable::PriceableContract;
