//! Shuffle draws
//!
//! Picks the next queue index uniformly at random, never repeating the
//! current one when there is a choice.

use rand::Rng;

/// Draw a random index in `[0, len)` different from `current`
///
/// Rejection sampling: each try succeeds with probability `(len - 1) / len`,
/// so the expected number of draws is below 2 for any `len > 1`. A queue of
/// one song always yields index 0.
pub fn draw_index<R: Rng + ?Sized>(rng: &mut R, len: usize, current: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    loop {
        let candidate = rng.gen_range(0..len);
        if candidate != current {
            return candidate;
        }
    }
}
