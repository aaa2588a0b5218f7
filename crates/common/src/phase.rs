/// `rate * t` reduced into `[0, period)` before narrowing to `f32`.
///
/// Elapsed time stays in `f64` so periodic motion keeps sub-millisecond
/// resolution however long the run has been going.
pub fn periodic(t: f64, rate: f64, period: f64) -> f32 {
    (rate * t).rem_euclid(period) as f32
}
