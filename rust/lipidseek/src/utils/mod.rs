mod tuple_range;

pub use tuple_range::{
    TupleRange,
    TupleRangeError,
};

/// Rounds a mass to the 1e-6 grid used to compare theoretical fragments.
///
/// ```
/// use lipidseek::utils::round_mass;
/// assert_eq!(round_mass(184.07332045), 184.07332);
/// ```
pub fn round_mass(mass: f64) -> f64 {
    (mass * 1e6).round() / 1e6
}
