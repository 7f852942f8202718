//!
//! Optional-function overlay: the throttle override and the motor
//! temperature derating share one physical ADC channel, so at most one of
//! them runs, selected by configuration.
//!

use defmt::Format;

use crate::assist::AssistOutput;
use crate::config::{
    ADC_THROTTLE_MAX_VALUE, ADC_THROTTLE_MIN_VALUE, PWM_DUTY_CYCLE_MAX,
    RAMP_DOWN_INVERSE_STEP_DEFAULT, RAMP_DOWN_INVERSE_STEP_MIN, RAMP_UP_INVERSE_STEP_MIN,
    THROTTLE_RAMP_UP_INVERSE_STEP_DEFAULT, THROTTLE_RAMP_UP_INVERSE_STEP_MIN,
};
use crate::util::{ema_filter_u16, linear_map_u8, linear_map_u16};

/// Owner of the shared optional ADC channel.
#[derive(Format, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OptionalAdcFunction {
    #[default]
    None,
    Throttle,
    Temperature,
}

impl OptionalAdcFunction {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => Self::Throttle,
            2 => Self::Temperature,
            _ => Self::None,
        }
    }
}

/// Throttle override.  Only ever raises the current target; a throttle
/// request below what the assist law already asks for is ignored.  Returns
/// the 0-255 mapped throttle value for telemetry.
pub fn apply_throttle(
    output: &mut AssistOutput,
    adc_throttle: u16,
    wheel_speed_x10: u16,
    adc_battery_current_max: u8,
) -> u8 {
    let throttle_mapped = linear_map_u8(
        (adc_throttle >> 2) as u8,
        ADC_THROTTLE_MIN_VALUE,
        ADC_THROTTLE_MAX_VALUE,
        0,
        255,
    );
    let battery_current_target =
        linear_map_u8(throttle_mapped, 0, 255, 0, adc_battery_current_max);

    if battery_current_target > output.battery_current_target {
        if wheel_speed_x10 >= 255 {
            output.ramp_up_inverse_step = RAMP_UP_INVERSE_STEP_MIN;
            output.ramp_down_inverse_step = RAMP_DOWN_INVERSE_STEP_MIN;
        } else {
            output.ramp_up_inverse_step = linear_map_u16(
                wheel_speed_x10,
                40,
                255,
                THROTTLE_RAMP_UP_INVERSE_STEP_DEFAULT as u16,
                THROTTLE_RAMP_UP_INVERSE_STEP_MIN as u16,
            ) as u8;
            output.ramp_down_inverse_step = linear_map_u16(
                wheel_speed_x10,
                40,
                255,
                RAMP_DOWN_INVERSE_STEP_DEFAULT as u16,
                RAMP_DOWN_INVERSE_STEP_MIN as u16,
            ) as u8;
        }
        output.battery_current_target = battery_current_target;
        output.duty_cycle_target = PWM_DUTY_CYCLE_MAX;
    }

    throttle_mapped
}

/// Filter coefficient of the temperature proxy low pass.
const TEMPERATURE_FILTER_ALPHA: u8 = 8;

#[derive(Format, Debug, Default, Clone, PartialEq, Eq)]
/// Motor temperature derating: linearly reduces the current target between
/// the configured limits, never raises it
pub struct TemperatureLimiter {
    adc_filtered: u16,
    /// Filtered motor temperature (degrees x10), exported in telemetry
    pub temperature_x10: u16,
    pub min_limit: u8,
    pub max_limit: u8,
}

impl TemperatureLimiter {
    pub fn update(&mut self, adc_temperature: u16, output: &mut AssistOutput) {
        self.adc_filtered = ema_filter_u16(adc_temperature, self.adc_filtered, TEMPERATURE_FILTER_ALPHA);
        self.temperature_x10 = (self.adc_filtered as u32 * 10_000 / 2_048) as u16;

        // a min limit at or above the max limit is a broken configuration;
        // fail safe rather than guess
        if self.min_limit >= self.max_limit {
            output.battery_current_target = 0;
        } else {
            output.battery_current_target = linear_map_u16(
                self.temperature_x10,
                self.min_limit as u16 * 10,
                self.max_limit as u16 * 10,
                output.battery_current_target as u16,
                0,
            ) as u8;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assist_at(current: u8) -> AssistOutput {
        AssistOutput {
            battery_current_target: current,
            duty_cycle_target: if current != 0 { PWM_DUTY_CYCLE_MAX } else { 0 },
            ..AssistOutput::idle()
        }
    }

    #[test]
    fn test_throttle_only_raises_current() {
        let mut output = assist_at(100);
        // closed throttle maps to zero request: no effect
        apply_throttle(&mut output, 0, 0, 112);
        assert_eq!(output.battery_current_target, 100);

        // wide open throttle overrides a smaller assist target
        let mapped = apply_throttle(&mut output, 1023, 0, 112);
        assert_eq!(mapped, 255);
        assert_eq!(output.battery_current_target, 112);
        assert_eq!(output.duty_cycle_target, PWM_DUTY_CYCLE_MAX);
    }

    #[test]
    fn test_throttle_ramps_snap_at_speed() {
        let mut output = assist_at(0);
        apply_throttle(&mut output, 1023, 300, 112);
        assert_eq!(output.ramp_up_inverse_step, RAMP_UP_INVERSE_STEP_MIN);
        assert_eq!(output.ramp_down_inverse_step, RAMP_DOWN_INVERSE_STEP_MIN);
    }

    #[test]
    fn test_throttle_ramps_shape_below_speed_ceiling() {
        let mut output = assist_at(0);
        apply_throttle(&mut output, 1023, 0, 112);
        assert_eq!(
            output.ramp_up_inverse_step,
            THROTTLE_RAMP_UP_INVERSE_STEP_DEFAULT
        );
        assert_eq!(output.ramp_down_inverse_step, RAMP_DOWN_INVERSE_STEP_DEFAULT);
    }

    #[test]
    fn test_temperature_derates_across_band() {
        let mut limiter = TemperatureLimiter {
            min_limit: 60,
            max_limit: 80,
            ..TemperatureLimiter::default()
        };
        // drive the filter with an ADC code between the limits: 70.0
        // degrees -> adc = 700 * 2048 / 10000 = 143.  The truncating low
        // pass settles one code lower, at 136 (66.4 degrees).
        let mut output = assist_at(100);
        for _ in 0..200 {
            output.battery_current_target = 100;
            limiter.update(143, &mut output);
        }
        assert_eq!(limiter.temperature_x10, 664);
        // 64 of the 200 x10-degree band gone: 100 - 64 * 100 / 200
        assert_eq!(output.battery_current_target, 68);
    }

    #[test]
    fn test_temperature_cool_motor_untouched() {
        let mut limiter = TemperatureLimiter {
            min_limit: 60,
            max_limit: 80,
            ..TemperatureLimiter::default()
        };
        let mut output = assist_at(100);
        limiter.update(0, &mut output);
        assert_eq!(output.battery_current_target, 100);
    }

    #[test]
    fn test_temperature_hot_motor_cut_off() {
        let mut limiter = TemperatureLimiter {
            min_limit: 60,
            max_limit: 80,
            ..TemperatureLimiter::default()
        };
        let mut output = assist_at(100);
        for _ in 0..200 {
            output.battery_current_target = 100;
            // 90 degrees -> adc = 900 * 2048 / 10000 = 184
            limiter.update(184, &mut output);
        }
        assert_eq!(output.battery_current_target, 0);
    }

    #[test]
    fn test_temperature_bad_config_fails_safe() {
        let mut limiter = TemperatureLimiter {
            min_limit: 80,
            max_limit: 80,
            ..TemperatureLimiter::default()
        };
        let mut output = assist_at(100);
        limiter.update(0, &mut output);
        assert_eq!(output.battery_current_target, 0);
    }
}
