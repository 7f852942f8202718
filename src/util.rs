//!
//! Fixed point helpers shared by the control laws
//!

/// Linear interpolation with clamped ends.  The output range may run
/// downward (`out_min > out_max`); the ramp shaping and the derating maps
/// rely on that.  Division truncates toward zero, which is part of the
/// observable behavior of every stage built on this.
pub fn linear_map_u8(value: u8, in_min: u8, in_max: u8, out_min: u8, out_max: u8) -> u8 {
    linear_map(
        value as i32,
        in_min as i32,
        in_max as i32,
        out_min as i32,
        out_max as i32,
    ) as u8
}

/// See [`linear_map_u8`].
pub fn linear_map_u16(value: u16, in_min: u16, in_max: u16, out_min: u16, out_max: u16) -> u16 {
    linear_map(
        value as i32,
        in_min as i32,
        in_max as i32,
        out_min as i32,
        out_max as i32,
    ) as u16
}

fn linear_map(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if value <= in_min {
        out_min
    } else if value >= in_max {
        out_max
    } else {
        out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
    }
}

/// First order low pass: `alpha - 1` parts old value to one part new value.
/// `alpha` of 1 passes the new value straight through.
pub fn ema_filter_u16(new_value: u16, old_value: u16, alpha: u8) -> u16 {
    debug_assert!(alpha >= 1);
    ((old_value as u32 * (alpha as u32 - 1) + new_value as u32) / alpha as u32) as u16
}
