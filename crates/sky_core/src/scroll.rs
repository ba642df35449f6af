//! Maps held keys to a camera scroll delta for one fixed simulation step.
//!
//! Left and Right contribute symmetric steps of opposite sign; holding both
//! nets to zero. The step is a constant amount per *fixed step*, not per
//! rendered frame, so scroll speed does not vary with display refresh rate.

use crate::input::{InputState, Key};

/// Horizontal scroll applied per fixed step while a direction key is held,
/// in normalized device units (the backdrop quad spans [-1, 1]).
pub const SCROLL_STEP: f32 = 0.01;

pub fn scroll_delta(input: &InputState) -> f32 {
    let mut delta = 0.0;
    if input.is_held(Key::Left) || input.is_held(Key::A) {
        delta -= SCROLL_STEP;
    }
    if input.is_held(Key::Right) || input.is_held(Key::D) {
        delta += SCROLL_STEP;
    }
    delta
}
