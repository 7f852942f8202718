//!
//! The seven assist laws and the wheel speed limiter.
//!
//! Exactly one law runs per tick, keyed by the riding mode, and produces the
//! candidate current/duty/ramp tuple the safety arbiter later clamps and
//! commits.
//!

use common::display::RidingMode;
use defmt::Format;

use crate::config::{
    BATTERY_CURRENT_PER_ADC_STEP_X100, CRUISE_RAMP_UP_INVERSE_STEP,
    CRUISE_THRESHOLD_SPEED_X10, PWM_DUTY_CYCLE_MAX, RAMP_DOWN_INVERSE_STEP_DEFAULT,
    RAMP_DOWN_INVERSE_STEP_MIN, RAMP_UP_INVERSE_STEP_CADENCE_OFFSET, RAMP_UP_INVERSE_STEP_DEFAULT,
    RAMP_UP_INVERSE_STEP_MIN, WALK_ASSIST_RAMP_UP_INVERSE_STEP, WALK_ASSIST_THRESHOLD_SPEED_X10,
};
use crate::cruise::CruisePid;
use crate::emtb::emtb_current_target;
use crate::sensors::SensorSample;
use crate::util::{linear_map_u8, linear_map_u16};

/// Cadence assist parameter ceiling; the parameter counts 2 watt steps, so
/// this caps the target power at 400 W.
const CADENCE_ASSIST_MAX_POWER: u8 = 200;
/// Duty cycle ceiling in walk assist mode.
const WALK_ASSIST_DUTY_CYCLE_MAX: u8 = 80;
/// Battery current ceiling in walk assist mode (ADC steps).
const WALK_ASSIST_ADC_BATTERY_CURRENT_MAX: u8 = 80;
/// Divisor turning torque delta times user factor into ADC current steps.
const TORQUE_ASSIST_FACTOR_DENOMINATOR: u16 = 110;
/// Above this wheel speed (km/h x10) ramps snap to their fastest step.
const RAMP_SHAPING_SPEED_CEILING_X10: u16 = 200;

#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
/// Candidate output of one assist law, before the safety arbiter
pub struct AssistOutput {
    /// Target battery current (ADC steps)
    pub battery_current_target: u8,
    /// Target duty cycle
    pub duty_cycle_target: u8,
    pub ramp_up_inverse_step: u8,
    pub ramp_down_inverse_step: u8,
}

impl AssistOutput {
    /// No assist requested; ramps at their slow defaults.
    pub fn idle() -> Self {
        Self {
            battery_current_target: 0,
            duty_cycle_target: 0,
            ramp_up_inverse_step: RAMP_UP_INVERSE_STEP_DEFAULT,
            ramp_down_inverse_step: RAMP_DOWN_INVERSE_STEP_DEFAULT,
        }
    }
}

/// Run the assist law for the active riding mode.
pub fn select_assist(
    riding_mode: RidingMode,
    riding_mode_parameter: u8,
    sample: &SensorSample,
    cruise: &mut CruisePid,
    adc_battery_current_max: u8,
    ramp_up_inverse_step_default: u8,
    standstill_boost_threshold: u8,
) -> AssistOutput {
    let mut output = AssistOutput::idle();
    match riding_mode {
        RidingMode::PowerAssist | RidingMode::CadenceAssist => apply_power_assist(
            riding_mode,
            riding_mode_parameter,
            sample,
            adc_battery_current_max,
            ramp_up_inverse_step_default,
            standstill_boost_threshold,
            &mut output,
        ),
        RidingMode::TorqueAssist => apply_torque_assist(
            riding_mode_parameter,
            sample,
            adc_battery_current_max,
            ramp_up_inverse_step_default,
            standstill_boost_threshold,
            &mut output,
        ),
        RidingMode::EmtbAssist => apply_emtb_assist(
            riding_mode_parameter,
            sample,
            adc_battery_current_max,
            ramp_up_inverse_step_default,
            standstill_boost_threshold,
            &mut output,
        ),
        RidingMode::WalkAssist => {
            apply_walk_assist(riding_mode_parameter, sample, adc_battery_current_max, &mut output)
        }
        RidingMode::Cruise => {
            apply_cruise(riding_mode_parameter, sample, cruise, adc_battery_current_max, &mut output)
        }
        RidingMode::Calibration => {
            apply_calibration_assist(riding_mode_parameter, adc_battery_current_max, &mut output)
        }
        RidingMode::Off => {}
    }
    output
}

/// Wheel speed limiter, applied unconditionally after the overlay.  Derates
/// the current target linearly across a 4 km/h band centered on the limit.
pub fn apply_speed_limit(output: &mut AssistOutput, wheel_speed_x10: u16, wheel_speed_max: u8) {
    if wheel_speed_max > 0 {
        let limit_x10 = wheel_speed_max as u16 * 10;
        output.battery_current_target = linear_map_u16(
            wheel_speed_x10,
            limit_x10 - 20,
            limit_x10 + 20,
            output.battery_current_target as u16,
            0,
        ) as u8;
    }
}

/// Synthesize a small cadence when a standing start torque spike exceeds the
/// configured threshold, so assist can engage before the cranks turn.
fn cadence_with_standstill_boost(
    sample: &SensorSample,
    standstill_boost_threshold: u8,
    boost_rpm: u8,
) -> u8 {
    if standstill_boost_threshold != 0
        && sample.pedal_cadence_rpm == 0
        && sample.wheel_speed_x10 == 0
        && sample.adc_pedal_torque_delta > (110 - standstill_boost_threshold as u16)
    {
        boost_rpm
    } else {
        sample.pedal_cadence_rpm
    }
}

/// Ramp shaping shared by the pedalling laws: the faster of the wheel speed
/// and cadence interpolations wins, and above the speed ceiling both ramps
/// snap to their fastest step.
fn shape_ramps(output: &mut AssistOutput, sample: &SensorSample, ramp_up_inverse_step_max: u8) {
    if sample.wheel_speed_x10 >= RAMP_SHAPING_SPEED_CEILING_X10 {
        output.ramp_up_inverse_step = RAMP_UP_INVERSE_STEP_MIN;
        output.ramp_down_inverse_step = RAMP_DOWN_INVERSE_STEP_MIN;
        return;
    }

    let from_speed = linear_map_u8(
        (sample.wheel_speed_x10 >> 2) as u8,
        10, // 4 km/h
        50, // 20 km/h
        ramp_up_inverse_step_max,
        RAMP_UP_INVERSE_STEP_MIN,
    );
    let from_cadence = linear_map_u8(
        sample.pedal_cadence_rpm,
        20,
        70,
        ramp_up_inverse_step_max,
        RAMP_UP_INVERSE_STEP_MIN,
    );
    output.ramp_up_inverse_step = from_speed.min(from_cadence);

    let from_speed = linear_map_u8(
        (sample.wheel_speed_x10 >> 2) as u8,
        10,
        50,
        RAMP_DOWN_INVERSE_STEP_DEFAULT,
        RAMP_DOWN_INVERSE_STEP_MIN,
    );
    let from_cadence = linear_map_u8(
        sample.pedal_cadence_rpm,
        20,
        70,
        RAMP_DOWN_INVERSE_STEP_DEFAULT,
        RAMP_DOWN_INVERSE_STEP_MIN,
    );
    output.ramp_down_inverse_step = from_speed.min(from_cadence);
}

fn commit_current_target(output: &mut AssistOutput, target: u16, adc_battery_current_max: u8) {
    output.battery_current_target = target.min(adc_battery_current_max as u16) as u8;
    output.duty_cycle_target = if output.battery_current_target != 0 {
        PWM_DUTY_CYCLE_MAX
    } else {
        0
    };
}

fn apply_power_assist(
    riding_mode: RidingMode,
    riding_mode_parameter: u8,
    sample: &SensorSample,
    adc_battery_current_max: u8,
    ramp_up_inverse_step_default: u8,
    standstill_boost_threshold: u8,
    output: &mut AssistOutput,
) {
    let mut ramp_up_inverse_step_max = ramp_up_inverse_step_default;

    let (cadence_rpm, power_assist_x100): (u8, u32) = if riding_mode == RidingMode::CadenceAssist {
        // parameter is half the target power in watts
        ramp_up_inverse_step_max =
            ramp_up_inverse_step_max.saturating_add(RAMP_UP_INVERSE_STEP_CADENCE_OFFSET);
        let power = if sample.pedal_cadence_rpm != 0 {
            riding_mode_parameter.min(CADENCE_ASSIST_MAX_POWER) as u32 * 2 * 100
        } else {
            0
        };
        (sample.pedal_cadence_rpm, power)
    } else {
        // parameter is the human power multiplier; assist power x100 =
        // torque x100 * RPM * multiplier / 480, the unit constants folded
        // into the divisor
        let cadence_rpm = cadence_with_standstill_boost(sample, standstill_boost_threshold, 4);
        let power = (cadence_rpm as u32 * riding_mode_parameter as u32)
            * sample.pedal_torque_x100 as u32
            / 480;
        (cadence_rpm, power)
    };

    let battery_current_target_x100 = if sample.battery_voltage_x1000 != 0 {
        (power_assist_x100 as u64 * 1000 / sample.battery_voltage_x1000 as u64) as u16
    } else {
        0
    };
    let adc_battery_current_target =
        battery_current_target_x100 / BATTERY_CURRENT_PER_ADC_STEP_X100;

    let shaped_sample = SensorSample {
        pedal_cadence_rpm: cadence_rpm,
        ..*sample
    };
    shape_ramps(output, &shaped_sample, ramp_up_inverse_step_max);
    commit_current_target(output, adc_battery_current_target, adc_battery_current_max);
}

fn apply_torque_assist(
    riding_mode_parameter: u8,
    sample: &SensorSample,
    adc_battery_current_max: u8,
    ramp_up_inverse_step_default: u8,
    standstill_boost_threshold: u8,
    output: &mut AssistOutput,
) {
    let cadence_rpm = cadence_with_standstill_boost(sample, standstill_boost_threshold, 1);
    if sample.adc_pedal_torque_delta == 0 || cadence_rpm == 0 {
        return;
    }

    let adc_battery_current_target = (sample.adc_pedal_torque_delta as u32
        * riding_mode_parameter as u32
        / TORQUE_ASSIST_FACTOR_DENOMINATOR as u32) as u16;

    let shaped_sample = SensorSample {
        pedal_cadence_rpm: cadence_rpm,
        ..*sample
    };
    shape_ramps(output, &shaped_sample, ramp_up_inverse_step_default);
    commit_current_target(output, adc_battery_current_target, adc_battery_current_max);
}

fn apply_emtb_assist(
    riding_mode_parameter: u8,
    sample: &SensorSample,
    adc_battery_current_max: u8,
    ramp_up_inverse_step_default: u8,
    standstill_boost_threshold: u8,
    output: &mut AssistOutput,
) {
    let cadence_rpm = cadence_with_standstill_boost(sample, standstill_boost_threshold, 1);
    if sample.adc_pedal_torque_delta == 0 || cadence_rpm == 0 {
        return;
    }

    // a delta past the curve domain or a bad sensitivity leaves the output
    // idle, same as an unhandled riding mode
    let Some(adc_battery_current_target) =
        emtb_current_target(riding_mode_parameter, sample.adc_pedal_torque_delta)
    else {
        return;
    };

    let shaped_sample = SensorSample {
        pedal_cadence_rpm: cadence_rpm,
        ..*sample
    };
    shape_ramps(output, &shaped_sample, ramp_up_inverse_step_default);
    commit_current_target(
        output,
        adc_battery_current_target as u16,
        adc_battery_current_max,
    );
}

fn apply_walk_assist(
    riding_mode_parameter: u8,
    sample: &SensorSample,
    adc_battery_current_max: u8,
    output: &mut AssistOutput,
) {
    if sample.wheel_speed_x10 >= WALK_ASSIST_THRESHOLD_SPEED_X10 {
        return;
    }

    output.ramp_up_inverse_step = WALK_ASSIST_RAMP_UP_INVERSE_STEP;
    output.ramp_down_inverse_step = RAMP_DOWN_INVERSE_STEP_DEFAULT;
    output.battery_current_target =
        WALK_ASSIST_ADC_BATTERY_CURRENT_MAX.min(adc_battery_current_max);
    output.duty_cycle_target = riding_mode_parameter.min(WALK_ASSIST_DUTY_CYCLE_MAX);
}

fn apply_cruise(
    riding_mode_parameter: u8,
    sample: &SensorSample,
    cruise: &mut CruisePid,
    adc_battery_current_max: u8,
    output: &mut AssistOutput,
) {
    if sample.wheel_speed_x10 <= CRUISE_THRESHOLD_SPEED_X10 {
        return;
    }

    output.duty_cycle_target = cruise.update(sample.wheel_speed_x10, riding_mode_parameter);
    output.ramp_up_inverse_step = CRUISE_RAMP_UP_INVERSE_STEP;
    output.ramp_down_inverse_step = RAMP_DOWN_INVERSE_STEP_DEFAULT;
    output.battery_current_target = adc_battery_current_max;
}

fn apply_calibration_assist(
    riding_mode_parameter: u8,
    adc_battery_current_max: u8,
    output: &mut AssistOutput,
) {
    output.duty_cycle_target = riding_mode_parameter.min(PWM_DUTY_CYCLE_MAX - 1);
    output.ramp_up_inverse_step = RAMP_UP_INVERSE_STEP_MIN;
    output.ramp_down_inverse_step = RAMP_DOWN_INVERSE_STEP_MIN;
    output.battery_current_target = adc_battery_current_max;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::ADC_BATTERY_CURRENT_MAX;

    fn pedalling_sample() -> SensorSample {
        SensorSample {
            battery_voltage_x1000: 36120,
            battery_current_x10: 0,
            adc_pedal_torque: 156,
            adc_pedal_torque_delta: 50,
            pedal_torque_x100: 3350,
            pedal_cadence_rpm: 80,
            wheel_speed_x10: 0,
            cadence_ticks_count_min: 0,
        }
    }

    #[test]
    fn test_power_assist_formula() {
        let mut cruise = CruisePid::new();
        let output = select_assist(
            RidingMode::PowerAssist,
            100,
            &pedalling_sample(),
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        // 80 RPM * 100 * 3350 / 480 = 55833 -> 55833 * 1000 / 36120 = 1545
        // -> 1545 / 16 = 96 ADC steps
        assert_eq!(output.battery_current_target, 96);
        assert_eq!(output.duty_cycle_target, PWM_DUTY_CYCLE_MAX);
    }

    #[test]
    fn test_power_assist_clamps_to_current_max() {
        let mut cruise = CruisePid::new();
        let output = select_assist(
            RidingMode::PowerAssist,
            255,
            &pedalling_sample(),
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output.battery_current_target, ADC_BATTERY_CURRENT_MAX);
    }

    #[test]
    fn test_power_assist_zero_voltage_is_safe() {
        let mut cruise = CruisePid::new();
        let sample = SensorSample {
            battery_voltage_x1000: 0,
            ..pedalling_sample()
        };
        let output = select_assist(
            RidingMode::PowerAssist,
            100,
            &sample,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output.battery_current_target, 0);
        assert_eq!(output.duty_cycle_target, 0);
    }

    #[test]
    fn test_cadence_assist_caps_power_and_needs_rotation() {
        let mut cruise = CruisePid::new();
        let still = SensorSample {
            pedal_cadence_rpm: 0,
            ..pedalling_sample()
        };
        let output = select_assist(
            RidingMode::CadenceAssist,
            255,
            &still,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output.battery_current_target, 0);

        let output = select_assist(
            RidingMode::CadenceAssist,
            255,
            &pedalling_sample(),
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        // parameter capped at 200 -> 400 W: 40000 x100 * 1000 / 36120 = 1107
        // -> 1107 / 16 = 69 ADC steps
        assert_eq!(output.battery_current_target, 69);
    }

    #[test]
    fn test_power_assist_extreme_inputs_clamp() {
        let mut cruise = CruisePid::new();
        let extreme = SensorSample {
            pedal_cadence_rpm: 255,
            pedal_torque_x100: u16::MAX,
            ..pedalling_sample()
        };
        let output = select_assist(
            RidingMode::PowerAssist,
            255,
            &extreme,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        // far past the hardware ceiling
        assert_eq!(output.battery_current_target, ADC_BATTERY_CURRENT_MAX);
    }

    #[test]
    fn test_torque_assist_needs_cadence() {
        let mut cruise = CruisePid::new();
        let still = SensorSample {
            pedal_cadence_rpm: 0,
            ..pedalling_sample()
        };
        let output = select_assist(
            RidingMode::TorqueAssist,
            110,
            &still,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output, AssistOutput::idle());
    }

    #[test]
    fn test_torque_assist_factor() {
        let mut cruise = CruisePid::new();
        let output = select_assist(
            RidingMode::TorqueAssist,
            110,
            &pedalling_sample(),
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        // delta 50 * factor 110 / 110 = 50 ADC steps
        assert_eq!(output.battery_current_target, 50);
    }

    #[test]
    fn test_torque_assist_full_scale_delta() {
        let mut cruise = CruisePid::new();
        let stomping = SensorSample {
            adc_pedal_torque: 706,
            adc_pedal_torque_delta: 600,
            ..pedalling_sample()
        };
        let output = select_assist(
            RidingMode::TorqueAssist,
            110,
            &stomping,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        // 600 * 110 / 110 = 600 ADC steps, clamped to the hardware ceiling
        assert_eq!(output.battery_current_target, ADC_BATTERY_CURRENT_MAX);
    }

    #[test]
    fn test_standstill_boost_engages_torque_assist() {
        let mut cruise = CruisePid::new();
        let still = SensorSample {
            pedal_cadence_rpm: 0,
            adc_pedal_torque_delta: 90,
            ..pedalling_sample()
        };
        // threshold 30: boost engages above delta 80
        let output = select_assist(
            RidingMode::TorqueAssist,
            110,
            &still,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            30,
        );
        assert_eq!(output.battery_current_target, 90);
    }

    #[test]
    fn test_emtb_uses_curve() {
        let mut cruise = CruisePid::new();
        let output = select_assist(
            RidingMode::EmtbAssist,
            20,
            &pedalling_sample(),
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        let expected = emtb_current_target(20, 50).unwrap().min(ADC_BATTERY_CURRENT_MAX);
        assert_eq!(output.battery_current_target, expected);
    }

    #[test]
    fn test_emtb_out_of_range_sensitivity_is_idle() {
        let mut cruise = CruisePid::new();
        let output = select_assist(
            RidingMode::EmtbAssist,
            21,
            &pedalling_sample(),
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output, AssistOutput::idle());
    }

    #[test]
    fn test_walk_assist_only_below_threshold() {
        let mut cruise = CruisePid::new();
        let walking = SensorSample {
            wheel_speed_x10: 40,
            ..SensorSample::default()
        };
        let output = select_assist(
            RidingMode::WalkAssist,
            100,
            &walking,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output.duty_cycle_target, WALK_ASSIST_DUTY_CYCLE_MAX);
        assert_eq!(
            output.battery_current_target,
            WALK_ASSIST_ADC_BATTERY_CURRENT_MAX
        );
        assert_eq!(output.ramp_up_inverse_step, WALK_ASSIST_RAMP_UP_INVERSE_STEP);

        let rolling = SensorSample {
            wheel_speed_x10: WALK_ASSIST_THRESHOLD_SPEED_X10,
            ..SensorSample::default()
        };
        let output = select_assist(
            RidingMode::WalkAssist,
            100,
            &rolling,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output, AssistOutput::idle());
    }

    #[test]
    fn test_cruise_only_above_threshold() {
        let mut cruise = CruisePid::new();
        let slow = SensorSample {
            wheel_speed_x10: CRUISE_THRESHOLD_SPEED_X10,
            ..SensorSample::default()
        };
        let output = select_assist(
            RidingMode::Cruise,
            0,
            &slow,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output, AssistOutput::idle());

        let fast = SensorSample {
            wheel_speed_x10: 150,
            ..SensorSample::default()
        };
        let output = select_assist(
            RidingMode::Cruise,
            0,
            &fast,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output.battery_current_target, ADC_BATTERY_CURRENT_MAX);
        assert_eq!(output.ramp_up_inverse_step, CRUISE_RAMP_UP_INVERSE_STEP);
    }

    #[test]
    fn test_calibration_is_open_loop() {
        let mut cruise = CruisePid::new();
        let output = select_assist(
            RidingMode::Calibration,
            255,
            &SensorSample::default(),
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output.duty_cycle_target, PWM_DUTY_CYCLE_MAX - 1);
        assert_eq!(output.battery_current_target, ADC_BATTERY_CURRENT_MAX);
        assert_eq!(output.ramp_up_inverse_step, RAMP_UP_INVERSE_STEP_MIN);
    }

    #[test]
    fn test_ramp_shaping_snaps_to_min_at_speed() {
        let mut cruise = CruisePid::new();
        let fast = SensorSample {
            wheel_speed_x10: 200,
            ..pedalling_sample()
        };
        let output = select_assist(
            RidingMode::PowerAssist,
            100,
            &fast,
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        assert_eq!(output.ramp_up_inverse_step, RAMP_UP_INVERSE_STEP_MIN);
        assert_eq!(output.ramp_down_inverse_step, RAMP_DOWN_INVERSE_STEP_MIN);
    }

    #[test]
    fn test_ramp_shaping_takes_faster_of_speed_and_cadence() {
        let mut cruise = CruisePid::new();
        // stationary wheel but fast cadence: the cadence map wins
        let output = select_assist(
            RidingMode::PowerAssist,
            100,
            &pedalling_sample(),
            &mut cruise,
            ADC_BATTERY_CURRENT_MAX,
            RAMP_UP_INVERSE_STEP_DEFAULT,
            0,
        );
        let expected = linear_map_u8(80, 20, 70, RAMP_UP_INVERSE_STEP_DEFAULT, RAMP_UP_INVERSE_STEP_MIN);
        assert_eq!(output.ramp_up_inverse_step, expected);
    }

    #[test]
    fn test_speed_limit_band() {
        let mut output = AssistOutput {
            battery_current_target: 100,
            ..AssistOutput::idle()
        };
        // below the band: untouched
        apply_speed_limit(&mut output, 229, 25);
        assert_eq!(output.battery_current_target, 100);

        // center of the band: half the target
        apply_speed_limit(&mut output, 250, 25);
        assert_eq!(output.battery_current_target, 50);

        // above the band: forced to zero
        output.battery_current_target = 100;
        apply_speed_limit(&mut output, 271, 25);
        assert_eq!(output.battery_current_target, 0);
    }

    #[test]
    fn test_speed_limit_disabled_when_zero() {
        let mut output = AssistOutput {
            battery_current_target: 100,
            ..AssistOutput::idle()
        };
        apply_speed_limit(&mut output, 500, 0);
        assert_eq!(output.battery_current_target, 100);
    }
}
