/// Timers within this distance of zero are treated as expired.
pub const EPSILON: f64 = 1e-9;

/// Smallest step taken when nothing is pending, so an idle actor still makes progress.
pub const MIN_STEP: f64 = 0.1;

/// Counts `timer` down by `elapsed`, snapping to exactly zero instead of going negative.
#[inline]
pub fn decay(timer: f64, elapsed: f64) -> f64 {
    let remaining = timer - elapsed;
    if remaining <= EPSILON {
        0.0
    } else {
        remaining
    }
}

#[inline]
pub fn is_expired(timer: f64) -> bool {
    timer <= EPSILON
}
