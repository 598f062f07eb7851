//! ABOUTME: Turns a cycle's diff count into a motion decision

/// Fraction of samples that must differ before motion is declared
pub const MOTION_FRACTION: f64 = 0.01;

/// Motion when strictly more than 1% of samples changed
///
/// An empty grid never reports motion.
pub fn is_motion(diff_count: usize, sample_count: usize) -> bool {
    diff_count as f64 > sample_count as f64 * MOTION_FRACTION
}
