//!
//! Per-tick control pipeline: sensor conditioning, health checks, the
//! display exchange, lights, one assist law, the overlay, the speed limiter
//! and the safety arbiter, in that order.
//!

use common::display::{
    ConfigPayload, DisplayCommand, RidingMode, StatusReport, SystemState, Telemetry,
};
use defmt::Format;

use crate::assist::{AssistOutput, apply_speed_limit, select_assist};
use crate::config::{
    ADC_BATTERY_CURRENT_MAX, BATTERY_CURRENT_PER_ADC_STEP_X100,
    BATTERY_VOLTAGE_PER_ADC_STEP_X1000, CADENCE_SENSOR_NUMBER_MAGNETS, ConfigurationVariables,
    DEFAULT_BATTERY_CURRENT_MAX, FIRMWARE_VERSION, HALL_COUNTER_OFFSETS_DEFAULT,
    HALL_REF_ANGLES_DEFAULT, RAMP_UP_INVERSE_STEP_DEFAULT, RAMP_UP_INVERSE_STEP_MIN,
};
use crate::cruise::CruisePid;
use crate::health::SystemHealth;
use crate::lights::LightsController;
use crate::motor::{MotorInterface, PwmTransition};
use crate::overlay::{OptionalAdcFunction, TemperatureLimiter, apply_throttle};
use crate::sensors::SensorConditioner;
use crate::transport::Communications;
use crate::util::linear_map_u8;

#[derive(Format, Debug, Default, Clone, PartialEq, Eq)]
/// Raw collaborator inputs sampled once per tick
pub struct TickInputs {
    pub adc_battery_voltage: u16,
    /// Battery current ADC value, filtered at a higher rate by the ADC layer
    pub adc_battery_current_filtered: u8,
    pub adc_pedal_torque: u16,
    /// Shared throttle/temperature ADC channel
    pub adc_optional: u16,
    /// PWM clock ticks between cadence sensor transitions, 0 when stale
    pub cadence_sensor_ticks: u16,
    /// PWM clock ticks between wheel sensor transitions, 0 when stale
    pub wheel_speed_sensor_ticks: u16,
    /// Free-running wheel sensor tick total, for odometry telemetry
    pub wheel_speed_sensor_ticks_total: u32,
    /// Crank revolutions times the cadence magnet count
    pub crank_revolutions_x20: u32,
    pub braking: bool,
    /// Motor speed from the commutation layer (electrical revs per second)
    pub motor_speed_erps: u16,
    /// Live duty cycle the commutation layer is applying
    pub motor_duty_cycle: u8,
    pub foc_angle: u8,
    /// Hall calibration counters, reported while in calibration mode
    pub hall_calibration_counters: [u16; 6],
}

#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
/// Commands for the collaborators this tick
pub struct TickOutputs {
    pub lights_on: bool,
    /// PWM enable/disable action, if the motor state machine transitioned
    pub pwm: Option<PwmTransition>,
}

#[derive(Format, Debug, Clone, PartialEq, Eq)]
/// The whole control core: every piece of state the pipeline latches across
/// ticks, owned in one place and stepped by [`Controller::tick`]
pub struct Controller {
    pub config: ConfigurationVariables,

    riding_mode: RidingMode,
    riding_mode_parameter: u8,
    lights_configuration: u8,
    lights_state: bool,
    assist_without_pedal_rotation_threshold: u8,

    /// Battery current limit from the display (amps)
    battery_current_max: u8,
    /// Working battery current ceiling (ADC steps), the lesser of the
    /// current and power limits
    adc_battery_current_max: u8,
    /// Low voltage cutoff exported to the ADC layer (ADC steps)
    adc_battery_voltage_cut_off: u16,
    /// Ramp-up default after the display's motor acceleration adjustment
    ramp_up_inverse_step_default: u8,
    /// Throttle after the calibrated window, kept for telemetry
    throttle_mapped: u8,

    sensors: SensorConditioner,
    health: SystemHealth,
    cruise: CruisePid,
    temperature: TemperatureLimiter,
    motor: MotorInterface,
    lights: LightsController,
    pub comms: Communications,
    tick_counter: u8,
}

impl Controller {
    pub fn new() -> Self {
        let config = ConfigurationVariables::default();
        let adc_battery_voltage_cut_off = (config.battery_low_voltage_cut_off_x10 as u32 * 100
            / BATTERY_VOLTAGE_PER_ADC_STEP_X1000 as u32)
            as u16;
        Self {
            config,
            riding_mode: RidingMode::Off,
            riding_mode_parameter: 0,
            lights_configuration: 0,
            lights_state: false,
            assist_without_pedal_rotation_threshold: 0,
            battery_current_max: DEFAULT_BATTERY_CURRENT_MAX,
            adc_battery_current_max: ADC_BATTERY_CURRENT_MAX,
            adc_battery_voltage_cut_off,
            ramp_up_inverse_step_default: RAMP_UP_INVERSE_STEP_DEFAULT,
            throttle_mapped: 0,
            sensors: SensorConditioner::new(),
            health: SystemHealth::new(),
            cruise: CruisePid::new(),
            temperature: TemperatureLimiter::default(),
            motor: MotorInterface::new(),
            lights: LightsController::new(),
            comms: Communications::new(),
            tick_counter: 0,
        }
    }

    pub fn riding_mode(&self) -> RidingMode {
        self.riding_mode
    }

    pub fn system_state(&self) -> SystemState {
        self.health.state()
    }

    pub fn motor(&self) -> &MotorInterface {
        &self.motor
    }

    /// Low voltage cutoff for the ADC layer (ADC steps).
    pub fn adc_battery_voltage_cut_off(&self) -> u16 {
        self.adc_battery_voltage_cut_off
    }

    /// Run one control loop tick.
    pub fn tick(&mut self, inputs: &TickInputs) -> TickOutputs {
        self.motor.duty_cycle = inputs.motor_duty_cycle;

        let sample = self.sensors.update(inputs, &self.config);

        self.health.update(
            sample.battery_current_x10,
            inputs.motor_speed_erps,
            self.sensors.adc_pedal_torque_offset(),
            sample.adc_pedal_torque,
            self.riding_mode,
        );

        // exchange with the display every 4th tick
        if self.tick_counter & 0x03 == 0 {
            if let Some(command) = self.comms.receive() {
                self.apply_display_command(&command, sample.battery_voltage_x1000);
            }
            let report = self.build_status_report(inputs, &sample);
            self.comms.send(report);

            // lost link means no rider commands; drop to no assist
            if self.comms.link_lost() {
                self.riding_mode = RidingMode::Off;
            }
        }
        self.tick_counter = self.tick_counter.wrapping_add(1);

        let lights_on =
            self.lights
                .update(self.lights_configuration, self.lights_state, inputs.braking);

        if self.riding_mode != RidingMode::Cruise {
            self.cruise.request_init();
        }

        let mut output = select_assist(
            self.riding_mode,
            self.riding_mode_parameter,
            &sample,
            &mut self.cruise,
            self.adc_battery_current_max,
            self.ramp_up_inverse_step_default,
            self.assist_without_pedal_rotation_threshold,
        );

        match self.config.optional_adc_function {
            OptionalAdcFunction::Throttle => {
                self.throttle_mapped = apply_throttle(
                    &mut output,
                    inputs.adc_optional,
                    sample.wheel_speed_x10,
                    self.adc_battery_current_max,
                );
            }
            OptionalAdcFunction::Temperature => {
                self.temperature.update(inputs.adc_optional, &mut output);
            }
            OptionalAdcFunction::None => {}
        }

        apply_speed_limit(&mut output, sample.wheel_speed_x10, self.config.wheel_speed_max);

        let pwm = self.motor.arbitrate(
            &mut output,
            &mut self.adc_battery_current_max,
            inputs.braking,
            self.health.state(),
            inputs.motor_speed_erps,
        );

        TickOutputs { lights_on, pwm }
    }

    fn apply_display_command(&mut self, command: &DisplayCommand, battery_voltage_x1000: u16) {
        self.riding_mode = command.riding_mode;
        self.riding_mode_parameter = command.riding_mode_parameter;
        self.lights_configuration = command.lights_configuration;
        self.lights_state = command.lights_state;

        match command.payload {
            ConfigPayload::BatteryLimits {
                low_voltage_cut_off_x10,
                battery_current_max,
                target_max_power_div25,
                foc_angle_multiplier,
                motor_acceleration,
            } => {
                self.config.battery_low_voltage_cut_off_x10 = low_voltage_cut_off_x10;
                self.adc_battery_voltage_cut_off = (low_voltage_cut_off_x10 as u32 * 100
                    / BATTERY_VOLTAGE_PER_ADC_STEP_X1000 as u32)
                    as u16;

                self.battery_current_max = battery_current_max;
                self.config.target_battery_max_power_div25 = target_max_power_div25;

                // the working current ceiling is the lesser of the current
                // limit and the power limit at the present battery voltage
                let from_current = battery_current_max as u16 * 100
                    / BATTERY_CURRENT_PER_ADC_STEP_X100;
                let from_power = if battery_voltage_x1000 != 0 {
                    (target_max_power_div25 as u32 * 2_500_000
                        / battery_voltage_x1000 as u32
                        / BATTERY_CURRENT_PER_ADC_STEP_X100 as u32)
                        .min(u8::MAX as u32) as u16
                } else {
                    0
                };
                self.adc_battery_current_max = from_current.min(from_power).min(255) as u8;

                self.config.foc_angle_multiplier = foc_angle_multiplier.min(50);

                self.ramp_up_inverse_step_default = linear_map_u8(
                    motor_acceleration,
                    0,
                    100,
                    RAMP_UP_INVERSE_STEP_DEFAULT,
                    RAMP_UP_INVERSE_STEP_MIN,
                );
            }
            ConfigPayload::BikeSetup {
                field_weakening_enabled,
                wheel_perimeter,
                wheel_speed_max,
                assist_without_pedal_rotation_threshold,
            } => {
                // field weakening only changes while the motor is stopped
                if !self.motor.enabled() {
                    self.config.field_weakening_enabled = field_weakening_enabled;
                }
                self.config.wheel_perimeter = wheel_perimeter;
                self.config.wheel_speed_max = wheel_speed_max;
                self.assist_without_pedal_rotation_threshold =
                    if assist_without_pedal_rotation_threshold > 100 {
                        0
                    } else {
                        assist_without_pedal_rotation_threshold
                    };
            }
            ConfigPayload::OptionalFunction {
                function,
                temperature_min_limit,
                temperature_max_limit,
                torque_offset_override,
                pedal_torque_per_adc_step_x100,
            } => {
                self.config.optional_adc_function = OptionalAdcFunction::from_byte(function);
                self.temperature.min_limit = temperature_min_limit;
                self.temperature.max_limit = temperature_max_limit;
                if let Some(offset) = torque_offset_override {
                    self.sensors.set_torque_offset(offset);
                }
                self.config.pedal_torque_per_adc_step_x100 = pedal_torque_per_adc_step_x100;
            }
            ConfigPayload::HallReferenceAngles(angles) => {
                // all zero means the motor was never calibrated
                self.config.hall_ref_angles = if angles[0] != 0 {
                    angles
                } else {
                    HALL_REF_ANGLES_DEFAULT
                };
            }
            ConfigPayload::HallCounterOffsets(offsets) => {
                self.config.hall_counter_offsets = if offsets[0] != 0 {
                    offsets
                } else {
                    HALL_COUNTER_OFFSETS_DEFAULT
                };
            }
            ConfigPayload::Unknown => {}
        }
    }

    fn build_status_report(
        &self,
        inputs: &TickInputs,
        sample: &crate::sensors::SensorSample,
    ) -> StatusReport {
        let telemetry = if self.riding_mode == RidingMode::Calibration {
            Telemetry::HallCalibration(inputs.hall_calibration_counters)
        } else {
            Telemetry::Riding {
                adc_pedal_torque: sample.adc_pedal_torque,
                pedal_torque_x100: sample.pedal_torque_x100,
                optional_adc: (inputs.adc_optional >> 2) as u8,
                throttle: if self.config.optional_adc_function == OptionalAdcFunction::Throttle {
                    self.throttle_mapped
                } else {
                    0
                },
                wheel_ticks: inputs.wheel_speed_sensor_ticks_total & 0x000F_FFFF,
                crank_revolutions: (inputs.crank_revolutions_x20 / CADENCE_SENSOR_NUMBER_MAGNETS)
                    as u16,
            }
        };

        StatusReport {
            battery_voltage_x1000: sample.battery_voltage_x1000,
            battery_current_x10: sample.battery_current_x10,
            wheel_speed_x10: sample.wheel_speed_x10,
            pedal_cadence_rpm: sample.pedal_cadence_rpm,
            braking: inputs.braking,
            firmware_version: FIRMWARE_VERSION,
            system_state: self.health.state(),
            motor_temperature: (self.temperature.temperature_x10 / 10) as u8,
            duty_cycle: inputs.motor_duty_cycle,
            motor_speed_erps: inputs.motor_speed_erps,
            foc_angle: inputs.foc_angle,
            field_weakening_offset: self.motor.field_weakening_offset,
            telemetry,
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
