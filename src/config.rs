//!
//! Hardware scaling factors, control loop tuning values, and the
//! display-adjustable configuration variables
//!

use defmt::Format;

use crate::overlay::OptionalAdcFunction;

/// Period of one control loop tick (milliseconds).
pub const CONTROL_LOOP_PERIOD_MS: u16 = 25;

/// Firmware version reported in every status frame.
pub const FIRMWARE_VERSION: u8 = 12;

/// PWM carrier cycles per second; the cadence and wheel speed sensor tick
/// counters count in units of this clock.
pub const PWM_CYCLES_SECOND: u16 = 18_018;

/// Highest duty cycle the drive accepts.
pub const PWM_DUTY_CYCLE_MAX: u8 = 254;
/// Duty cycle seeded into the drive when the motor is re-enabled.
pub const PWM_DUTY_CYCLE_STARTUP: u8 = 30;

/// Absolute battery current ceiling in 10 bit ADC steps (18 amps).
pub const ADC_BATTERY_CURRENT_MAX: u8 = 112;
/// Battery current per ADC step (amps x100).
pub const BATTERY_CURRENT_PER_ADC_STEP_X100: u16 = 16;
/// Battery voltage per ADC step (volts x1000).
pub const BATTERY_VOLTAGE_PER_ADC_STEP_X1000: u16 = 86;
/// Battery current limit before the display sends its own (amps).
pub const DEFAULT_BATTERY_CURRENT_MAX: u8 = 17;

/// Slowest ramp-up inverse step; larger values ramp the duty cycle slower.
pub const RAMP_UP_INVERSE_STEP_DEFAULT: u8 = 194;
/// Fastest ramp-up inverse step the safety arbiter allows.
pub const RAMP_UP_INVERSE_STEP_MIN: u8 = 24;
/// Extra ramp-up inverse step applied on top of the default in cadence mode.
pub const RAMP_UP_INVERSE_STEP_CADENCE_OFFSET: u8 = 50;
/// Slowest ramp-down inverse step.
pub const RAMP_DOWN_INVERSE_STEP_DEFAULT: u8 = 73;
/// Fastest ramp-down inverse step the safety arbiter allows.
pub const RAMP_DOWN_INVERSE_STEP_MIN: u8 = 9;

/// Walk assist ramps up very slowly by design.
pub const WALK_ASSIST_RAMP_UP_INVERSE_STEP: u8 = 200;
/// Walk assist only engages below this wheel speed (km/h x10).
pub const WALK_ASSIST_THRESHOLD_SPEED_X10: u16 = 60;

/// Cruise only engages above this wheel speed (km/h x10).
pub const CRUISE_THRESHOLD_SPEED_X10: u16 = 80;
/// Cruise ramp-up inverse step.
pub const CRUISE_RAMP_UP_INVERSE_STEP: u8 = 80;

/// Throttle overlay ramp-up inverse step range.
pub const THROTTLE_RAMP_UP_INVERSE_STEP_DEFAULT: u8 = 80;
pub const THROTTLE_RAMP_UP_INVERSE_STEP_MIN: u8 = 40;
/// Calibrated throttle ADC window (upper 8 bits of the 10 bit code).
pub const ADC_THROTTLE_MIN_VALUE: u8 = 47;
pub const ADC_THROTTLE_MAX_VALUE: u8 = 176;

/// Correction added to the filtered torque offset when calibration ends.
pub const ADC_TORQUE_SENSOR_CALIBRATION_OFFSET: u16 = 6;
/// Torque delta below the calibrated offset that infers backward pedalling.
pub const COASTER_BRAKE_TORQUE_THRESHOLD: u16 = 40;
/// Boot torque offset acquisition window, in control loop ticks.
pub const TORQUE_OFFSET_START_CYCLES: u8 = 160;
pub const TORQUE_OFFSET_END_CYCLES: u8 = 200;

/// Magnets on the cadence sensor ring.
pub const CADENCE_SENSOR_NUMBER_MAGNETS: u32 = 20;
/// Cadence tick count past which a stationary reading is reported, at rest
/// and at speed; the conditioner interpolates between the two.
pub const CADENCE_TICKS_COUNTER_MIN: u16 = 4_266;
pub const CADENCE_TICKS_COUNTER_MIN_AT_SPEED: u16 = 341;

/// Hall reference angles used until a calibration is received.
pub const HALL_REF_ANGLES_DEFAULT: [u8; 6] = [21, 64, 107, 149, 192, 235];
/// Hall counter offsets used until a calibration is received.
pub const HALL_COUNTER_OFFSETS_DEFAULT: [u8; 6] = [44, 23, 44, 23, 44, 23];

#[derive(Format, Debug, Clone, PartialEq, Eq)]
/// Configuration the display unit may rewrite at runtime
pub struct ConfigurationVariables {
    /// Battery low voltage cutoff (volts x10)
    pub battery_low_voltage_cut_off_x10: u16,
    /// Wheel perimeter (millimeters)
    pub wheel_perimeter: u16,
    /// Maximum wheel speed (km/h), 0 disables the speed limiter
    pub wheel_speed_max: u8,
    /// FOC angle multiplier handed to the commutation layer
    pub foc_angle_multiplier: u8,
    /// Pedal torque conversion (Nm x100 per 10 bit ADC step)
    pub pedal_torque_per_adc_step_x100: u8,
    /// Maximum battery power divided by 25 (watts / 25)
    pub target_battery_max_power_div25: u8,
    /// Which optional function owns the shared throttle/temperature channel
    pub optional_adc_function: OptionalAdcFunction,
    /// Field weakening enable, only changed while the motor is stopped
    pub field_weakening_enabled: bool,
    pub hall_ref_angles: [u8; 6],
    pub hall_counter_offsets: [u8; 6],
}

impl Default for ConfigurationVariables {
    fn default() -> Self {
        Self {
            battery_low_voltage_cut_off_x10: 300, // 36 V battery, 30.0 V
            wheel_perimeter: 2050,                // 26'' wheel
            wheel_speed_max: 25,
            foc_angle_multiplier: 24, // 36 V motor value
            pedal_torque_per_adc_step_x100: 67,
            target_battery_max_power_div25: 20, // 500 W
            optional_adc_function: OptionalAdcFunction::None,
            field_weakening_enabled: false,
            hall_ref_angles: HALL_REF_ANGLES_DEFAULT,
            hall_counter_offsets: HALL_COUNTER_OFFSETS_DEFAULT,
        }
    }
}
