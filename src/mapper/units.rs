//! Unit conversions from N2K to AIS

/// Knots per metre per second
pub const MPS_TO_KNOTS: f64 = 1.9438444924574;

/// Degrees per minute per radian per second
pub const RAD_PER_SEC_TO_DEG_PER_MIN: f64 = 3437.74677078493;

/// Scale factor of the AIS rate of turn indicator
const ROT_SCALE: f64 = 4.733;

pub fn mps_to_knots(mps: f64) -> f64 {
    mps * MPS_TO_KNOTS
}

/// Convert radians to whole degrees, rounding to nearest
pub fn radians_to_degrees(radians: f64) -> i32 {
    radians.to_degrees().round() as i32
}

/// Encode rate of turn as the AIS ROT indicator
///
/// ROT[AIS] = 4.733 * SQRT(ROT[IND]), where ROT[IND] is the rate of turn in
/// degrees per minute. `rate` is in radians per second; the sign is kept and
/// the fractional part is dropped. The value is not limited to the 8-bit
/// ROT field, packing it is left to the sentence encoder.
pub fn rate_of_turn_code(rate: f64) -> i32 {
    if rate == 0.0 {
        return 0;
    }
    let magnitude = (ROT_SCALE * (rate.abs() * RAD_PER_SEC_TO_DEG_PER_MIN).sqrt()).trunc() as i32;
    if rate < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}
