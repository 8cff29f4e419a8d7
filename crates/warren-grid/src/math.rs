//! Small numeric helpers shared across the toolkit.

use std::f64::consts::{FRAC_PI_4, TAU};

/// Wraps `number` into `[0, wrap_to)`.
pub fn wrap_around(number: i32, wrap_to: i32) -> i32 {
    ((number % wrap_to) + wrap_to) % wrap_to
}

/// Wraps `number` into `[0.0, wrap_to)`.
pub fn wrap_around_f64(number: f64, wrap_to: f64) -> f64 {
    ((number % wrap_to) + wrap_to) % wrap_to
}

/// Rounds `number` up (toward positive infinity) to the next multiple of
/// `multiple`.
pub fn round_to_multiple(number: i32, multiple: i32) -> i32 {
    let toward_ceiling = i32::from(number >= 0);
    (number + toward_ceiling * (multiple - 1)) / multiple * multiple
}

/// Fast `atan2` approximation scaled to a fraction of a full turn.
///
/// Returns a value in `[0, 1)`: 0 on the positive x axis, 0.25 on the
/// positive y axis, increasing clockwise on a y-down grid. Accurate to a few
/// thousandths of a turn, which is plenty for arc membership tests.
pub fn scaled_atan2_approx(y: f64, x: f64) -> f64 {
    if x.abs() < 1e-10 && y.abs() < 1e-10 {
        return 0.0;
    }
    let coeff_1 = FRAC_PI_4;
    let coeff_2 = 3.0 * FRAC_PI_4;
    let abs_y = y.abs();
    let angle = if x >= 0.0 {
        let ratio = (x - abs_y) / (x + abs_y);
        coeff_1 - coeff_1 * ratio
    } else {
        let ratio = (x + abs_y) / (abs_y - x);
        coeff_2 - coeff_1 * ratio
    };
    let signed = if y < 0.0 { -angle } else { angle };
    wrap_around_f64(signed, TAU) / TAU
}
