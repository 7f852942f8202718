//!
//! PI controller holding the wheel speed at the value captured when cruise
//! was engaged
//!

use defmt::Format;

use crate::util::linear_map_u8;

/// Proportional gain.
const CRUISE_PID_KP: i16 = 14;
/// Integral gain numerator; the gain is 0.7 applied in tenths.
const CRUISE_PID_KI_NUMERATOR: i16 = 7;
const CRUISE_PID_KI_DENOMINATOR: i16 = 10;
/// Derivative term is tuned out but kept in the control law.
const CRUISE_PID_KD: i16 = 0;
/// Integral accumulator clamp.
const CRUISE_PID_INTEGRAL_LIMIT: i16 = 1000;
/// Controller output clamp.
const CRUISE_PID_OUTPUT_LIMIT: i16 = 1000;
/// Integral preload on engagement so the duty cycle does not collapse while
/// the integral winds up.
const CRUISE_PID_INTEGRAL_SEED: i16 = 320;

#[derive(Format, Debug, Clone, PartialEq, Eq)]
pub struct CruisePid {
    needs_init: bool,
    error: i16,
    last_error: i16,
    integral: i16,
    derivative: i16,
    wheel_speed_target_x10: u16,
}

impl CruisePid {
    pub fn new() -> Self {
        Self {
            needs_init: true,
            error: 0,
            last_error: 0,
            integral: 0,
            derivative: 0,
            wheel_speed_target_x10: 0,
        }
    }

    /// Arm the controller for re-initialization; called every tick the bike
    /// is not in cruise so that re-entering always captures a fresh target.
    pub fn request_init(&mut self) {
        self.needs_init = true;
    }

    #[cfg(test)]
    pub(crate) fn integral(&self) -> i16 {
        self.integral
    }

    /// One controller step.  A nonzero `target_param` cruises at that speed
    /// in km/h; zero cruises at the speed the bike had on engagement.
    /// Returns the duty cycle target.
    pub fn update(&mut self, wheel_speed_x10: u16, target_param: u8) -> u8 {
        if self.needs_init {
            self.needs_init = false;
            self.error = 0;
            self.last_error = 0;
            self.integral = CRUISE_PID_INTEGRAL_SEED;
            self.derivative = 0;
            self.wheel_speed_target_x10 = if target_param > 0 {
                target_param as u16 * 10
            } else {
                wheel_speed_x10
            };
        }

        self.error = self.wheel_speed_target_x10 as i16 - wheel_speed_x10 as i16;
        self.integral = (self.integral + self.error).clamp(0, CRUISE_PID_INTEGRAL_LIMIT);
        self.derivative = self.error - self.last_error;
        self.last_error = self.error;

        let output = CRUISE_PID_KP as i32 * self.error as i32
            + (CRUISE_PID_KI_NUMERATOR as i32 * self.integral as i32)
                / CRUISE_PID_KI_DENOMINATOR as i32
            + CRUISE_PID_KD as i32 * self.derivative as i32;
        let output = output.clamp(0, CRUISE_PID_OUTPUT_LIMIT as i32);

        linear_map_u8((output >> 2) as u8, 0, 250, 0, 253)
    }
}

impl Default for CruisePid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_engagement_captures_current_speed() {
        let mut pid = CruisePid::new();
        pid.update(200, 0);
        assert_eq!(pid.wheel_speed_target_x10, 200);
    }

    #[test]
    fn test_engagement_with_explicit_target() {
        let mut pid = CruisePid::new();
        pid.update(200, 25);
        assert_eq!(pid.wheel_speed_target_x10, 250);
    }

    #[test]
    fn test_reinit_reseeds_integral() {
        let mut pid = CruisePid::new();
        // wind the integral well past the seed
        for _ in 0..50 {
            pid.update(100, 25);
        }
        assert!(pid.integral() > CRUISE_PID_INTEGRAL_SEED);

        pid.request_init();
        pid.update(250, 25);
        // on-target step after reseed leaves only the preload
        assert_eq!(pid.integral(), CRUISE_PID_INTEGRAL_SEED);
    }

    #[test]
    fn test_integral_clamps() {
        let mut pid = CruisePid::new();
        for _ in 0..200 {
            pid.update(0, 25);
        }
        assert_eq!(pid.integral(), CRUISE_PID_INTEGRAL_LIMIT);

        // large overspeed drains the integral but never below zero
        for _ in 0..200 {
            pid.update(2500, 25);
        }
        assert_eq!(pid.integral(), 0);
    }

    #[test]
    fn test_output_saturates_at_max_duty() {
        let mut pid = CruisePid::new();
        // far below target: output rails at the limit
        let duty = pid.update(0, 25);
        assert_eq!(duty, 253);
    }

    #[test]
    fn test_output_floors_at_zero() {
        let mut pid = CruisePid::new();
        let duty = pid.update(2500, 25);
        assert_eq!(duty, 0);
    }
}
