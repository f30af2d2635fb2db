//! Capability trait for contracts that can be valued from a terminal price.
//!
//! The Monte Carlo aggregator only needs one thing from a contract: the payoff
//! it pays given where the underlying finished. [`PriceableContract`] captures
//! exactly that, so the aggregator is independent of how contracts are built.
//!
//! The trait is intended for static dispatch over an `enum` of contract
//! variants rather than `Box<dyn PriceableContract>`; the aggregator calls it
//! once per trial inside a tight parallel loop.

use num_traits::Float;

/// A contract whose value at maturity depends only on the terminal price.
///
/// # Type Parameters
/// * `T` - Floating-point type (f32 or f64)
///
/// # Invariants
/// - `evaluate_at` is pure: no side effects, no randomness
/// - the returned payoff is non-negative and finite for finite input
///
/// # Examples
///
/// ```
/// use pricer_core::traits::priceable::PriceableContract;
/// use num_traits::Float;
///
/// struct Forward<T> {
///     strike: T,
/// }
///
/// // A long forward floored at zero behaves like a call.
/// impl<T: Float> PriceableContract<T> for Forward<T> {
///     fn evaluate_at(&self, terminal_price: T) -> T {
///         (terminal_price - self.strike).max(T::zero())
///     }
/// }
///
/// let fwd = Forward { strike: 1.0_f64 };
/// assert_eq!(fwd.evaluate_at(1.25), 0.25);
/// assert_eq!(fwd.evaluate_at(0.75), 0.0);
/// ```
pub trait PriceableContract<T: Float> {
    /// Payoff of the contract when the underlying finishes at `terminal_price`.
    fn evaluate_at(&self, terminal_price: T) -> T;

    /// Whether the contract has a payoff attached at all.
    ///
    /// Contracts that always pay zero can report `false` so the aggregator may
    /// skip path simulation entirely. The default is `true`.
    #[inline]
    fn has_payoff(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unpriced;

    impl PriceableContract<f64> for Unpriced {
        fn evaluate_at(&self, _terminal_price: f64) -> f64 {
            0.0
        }

        fn has_payoff(&self) -> bool {
            false
        }
    }

    struct Digital {
        barrier: f64,
    }

    impl PriceableContract<f64> for Digital {
        fn evaluate_at(&self, terminal_price: f64) -> f64 {
            if terminal_price > self.barrier {
                1.0
            } else {
                0.0
            }
        }
    }

    #[test]
    fn test_default_has_payoff() {
        let d = Digital { barrier: 1.0 };
        assert!(d.has_payoff());
        assert_eq!(d.evaluate_at(2.0), 1.0);
        assert_eq!(d.evaluate_at(0.5), 0.0);
    }

    #[test]
    fn test_overridden_has_payoff() {
        assert!(!Unpriced.has_payoff());
        assert_eq!(Unpriced.evaluate_at(123.0), 0.0);
    }

    #[test]
    fn test_generic_dispatch() {
        fn mean_payoff<C: PriceableContract<f64>>(c: &C, terminals: &[f64]) -> f64 {
            terminals.iter().map(|&s| c.evaluate_at(s)).sum::<f64>() / terminals.len() as f64
        }

        let d = Digital { barrier: 1.0 };
        let mean = mean_payoff(&d, &[0.5, 1.5, 2.0, 0.9]);
        assert_eq!(mean, 0.5);
    }
}
