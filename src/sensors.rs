//!
//! Sensor conditioning: raw ADC codes and sensor tick counts in, calibrated
//! fixed point physical quantities out
//!

use defmt::Format;

use crate::config::{
    ADC_TORQUE_SENSOR_CALIBRATION_OFFSET, BATTERY_CURRENT_PER_ADC_STEP_X100,
    BATTERY_VOLTAGE_PER_ADC_STEP_X1000, CADENCE_TICKS_COUNTER_MIN,
    CADENCE_TICKS_COUNTER_MIN_AT_SPEED, COASTER_BRAKE_TORQUE_THRESHOLD, ConfigurationVariables,
    PWM_CYCLES_SECOND, TORQUE_OFFSET_END_CYCLES, TORQUE_OFFSET_START_CYCLES,
};
use crate::controller::TickInputs;
use crate::util::{ema_filter_u16, linear_map_u16};

/// Shift based coefficient of the battery voltage low pass; the filter time
/// constant is about `2^K` ticks.
const BATTERY_VOLTAGE_FILTER_COEFFICIENT: u16 = 2;
/// Low pass coefficient of the torque offset acquisition.
const TORQUE_OFFSET_FILTER_ALPHA: u8 = 2;

#[derive(Format, Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Conditioned sensor quantities, recomputed every tick
pub struct SensorSample {
    /// Filtered battery voltage (volts x1000)
    pub battery_voltage_x1000: u16,
    /// Filtered battery current (amps x10)
    pub battery_current_x10: u8,
    /// Torque sensor ADC value after offset handling
    pub adc_pedal_torque: u16,
    /// Torque sensor ADC value above the calibrated zero offset
    pub adc_pedal_torque_delta: u16,
    /// Pedal torque (Nm x100)
    pub pedal_torque_x100: u16,
    /// Pedal cadence (RPM)
    pub pedal_cadence_rpm: u8,
    /// Wheel speed (km/h x10)
    pub wheel_speed_x10: u16,
    /// Speed-adjusted stale threshold for the cadence tick counter, exported
    /// to the tick counting layer
    pub cadence_ticks_count_min: u16,
}

#[derive(Format, Debug, Clone, PartialEq, Eq)]
/// Filter accumulators and the torque zero-offset calibration state
pub struct SensorConditioner {
    adc_battery_voltage_accumulated: u16,
    adc_pedal_torque_offset: u16,
    adc_coaster_brake_threshold: u16,
    torque_offset_cycle_counter: u8,
}

impl SensorConditioner {
    pub fn new() -> Self {
        Self {
            adc_battery_voltage_accumulated: 0,
            adc_pedal_torque_offset: 100,
            adc_coaster_brake_threshold: 100 - COASTER_BRAKE_TORQUE_THRESHOLD,
            torque_offset_cycle_counter: 0,
        }
    }

    /// Calibrated torque sensor zero offset.
    pub fn adc_pedal_torque_offset(&self) -> u16 {
        self.adc_pedal_torque_offset
    }

    /// Torque delta floor below which backward pedalling is inferred,
    /// exported to the coaster brake handling in the commutation layer.
    pub fn adc_coaster_brake_threshold(&self) -> u16 {
        self.adc_coaster_brake_threshold
    }

    /// Replace the boot-time calibrated offset with a fixed value from the
    /// display configuration.
    pub fn set_torque_offset(&mut self, offset: u16) {
        self.adc_pedal_torque_offset = offset;
        self.adc_coaster_brake_threshold =
            offset.saturating_sub(COASTER_BRAKE_TORQUE_THRESHOLD);
    }

    /// Condition one tick worth of raw inputs.
    pub fn update(&mut self, inputs: &TickInputs, config: &ConfigurationVariables) -> SensorSample {
        let mut sample = SensorSample::default();

        self.update_battery_voltage(inputs.adc_battery_voltage, &mut sample);

        sample.battery_current_x10 = (inputs.adc_battery_current_filtered as u16
            * BATTERY_CURRENT_PER_ADC_STEP_X100
            / 10) as u8;

        self.update_wheel_speed(inputs.wheel_speed_sensor_ticks, config, &mut sample);
        self.update_cadence(inputs.cadence_sensor_ticks, &mut sample);
        self.update_pedal_torque(inputs.adc_pedal_torque, config, &mut sample);

        sample
    }

    fn update_battery_voltage(&mut self, adc_voltage: u16, sample: &mut SensorSample) {
        // low pass the raw reading to suppress fast spikes and noise
        self.adc_battery_voltage_accumulated -=
            self.adc_battery_voltage_accumulated >> BATTERY_VOLTAGE_FILTER_COEFFICIENT;
        self.adc_battery_voltage_accumulated += adc_voltage;
        sample.battery_voltage_x1000 = (self.adc_battery_voltage_accumulated
            >> BATTERY_VOLTAGE_FILTER_COEFFICIENT)
            * BATTERY_VOLTAGE_PER_ADC_STEP_X1000;
    }

    fn update_wheel_speed(
        &mut self,
        ticks: u16,
        config: &ConfigurationVariables,
        sample: &mut SensorSample,
    ) {
        // km/h x10 = rev/s * perimeter_mm * 3600 / 1_000_000 * 10
        sample.wheel_speed_x10 = if ticks != 0 {
            (config.wheel_perimeter as u32 * ((PWM_CYCLES_SECOND as u32 / 1000) * 36)
                / ticks as u32) as u16
        } else {
            0
        };
    }

    fn update_cadence(&mut self, ticks: u16, sample: &mut SensorSample) {
        // the stale threshold the tick counter uses shrinks as the bike
        // speeds up, so a coasting crank drops to zero sooner
        sample.cadence_ticks_count_min = linear_map_u16(
            sample.wheel_speed_x10,
            40,
            400,
            CADENCE_TICKS_COUNTER_MIN,
            CADENCE_TICKS_COUNTER_MIN_AT_SPEED,
        );

        // RPM = 60 * tick rate / magnets / ticks, with the magnet count
        // folded into the constant
        sample.pedal_cadence_rpm = if ticks != 0 {
            ((PWM_CYCLES_SECOND as u32 * 3 / ticks as u32).min(u8::MAX as u32)) as u8
        } else {
            0
        };
    }

    fn update_pedal_torque(
        &mut self,
        adc_torque: u16,
        config: &ConfigurationVariables,
        sample: &mut SensorSample,
    ) {
        if self.torque_offset_cycle_counter < TORQUE_OFFSET_END_CYCLES {
            if self.torque_offset_cycle_counter > TORQUE_OFFSET_START_CYCLES {
                self.adc_pedal_torque_offset = ema_filter_u16(
                    adc_torque,
                    self.adc_pedal_torque_offset,
                    TORQUE_OFFSET_FILTER_ALPHA,
                );
            }
            self.torque_offset_cycle_counter += 1;
            if self.torque_offset_cycle_counter == TORQUE_OFFSET_END_CYCLES {
                self.adc_pedal_torque_offset += ADC_TORQUE_SENSOR_CALIBRATION_OFFSET;
                self.adc_coaster_brake_threshold = self
                    .adc_pedal_torque_offset
                    .saturating_sub(COASTER_BRAKE_TORQUE_THRESHOLD);
            }
            // no torque reading is trusted while the offset is still settling
            sample.adc_pedal_torque = self.adc_pedal_torque_offset;
        } else {
            sample.adc_pedal_torque = adc_torque;
        }

        sample.adc_pedal_torque_delta = sample
            .adc_pedal_torque
            .saturating_sub(self.adc_pedal_torque_offset);
        sample.pedal_torque_x100 = (sample.adc_pedal_torque_delta as u32
            * config.pedal_torque_per_adc_step_x100 as u32) as u16;
    }
}

impl Default for SensorConditioner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run_ticks(
        conditioner: &mut SensorConditioner,
        inputs: &TickInputs,
        config: &ConfigurationVariables,
        ticks: u32,
    ) -> SensorSample {
        let mut sample = SensorSample::default();
        for _ in 0..ticks {
            sample = conditioner.update(inputs, config);
        }
        sample
    }

    #[test]
    fn test_battery_voltage_filter_converges() {
        let config = ConfigurationVariables::default();
        let mut conditioner = SensorConditioner::new();
        let inputs = TickInputs {
            adc_battery_voltage: 420,
            ..TickInputs::default()
        };
        let sample = run_ticks(&mut conditioner, &inputs, &config, 64);
        // steady state accumulator is 4x the raw reading
        assert_eq!(sample.battery_voltage_x1000, 420 * 86);
    }

    #[test]
    fn test_battery_current_scaling() {
        let config = ConfigurationVariables::default();
        let mut conditioner = SensorConditioner::new();
        let inputs = TickInputs {
            adc_battery_current_filtered: 100,
            ..TickInputs::default()
        };
        let sample = conditioner.update(&inputs, &config);
        // 100 steps * 0.16 A = 16.0 A
        assert_eq!(sample.battery_current_x10, 160);
    }

    #[test]
    fn test_zero_ticks_mean_stationary() {
        let config = ConfigurationVariables::default();
        let mut conditioner = SensorConditioner::new();
        let sample = conditioner.update(&TickInputs::default(), &config);
        assert_eq!(sample.wheel_speed_x10, 0);
        assert_eq!(sample.pedal_cadence_rpm, 0);
    }

    #[test]
    fn test_wheel_speed_from_ticks() {
        let config = ConfigurationVariables::default();
        let mut conditioner = SensorConditioner::new();
        let inputs = TickInputs {
            wheel_speed_sensor_ticks: 5000,
            ..TickInputs::default()
        };
        let sample = conditioner.update(&inputs, &config);
        // 2050 mm * 648 / 5000 = 265 -> 26.5 km/h
        assert_eq!(sample.wheel_speed_x10, 265);
    }

    #[test]
    fn test_cadence_from_ticks() {
        let config = ConfigurationVariables::default();
        let mut conditioner = SensorConditioner::new();
        let inputs = TickInputs {
            cadence_sensor_ticks: 675,
            ..TickInputs::default()
        };
        let sample = conditioner.update(&inputs, &config);
        // 54054 / 675 = 80 RPM
        assert_eq!(sample.pedal_cadence_rpm, 80);
    }

    #[test]
    fn test_cadence_stale_threshold_tracks_speed() {
        let config = ConfigurationVariables::default();
        let mut conditioner = SensorConditioner::new();
        let slow = conditioner.update(&TickInputs::default(), &config);
        assert_eq!(slow.cadence_ticks_count_min, CADENCE_TICKS_COUNTER_MIN);

        let inputs = TickInputs {
            // 2050 * 648 / 3000 = 442 -> above the 40 km/h breakpoint
            wheel_speed_sensor_ticks: 3000,
            ..TickInputs::default()
        };
        let fast = conditioner.update(&inputs, &config);
        assert_eq!(
            fast.cadence_ticks_count_min,
            CADENCE_TICKS_COUNTER_MIN_AT_SPEED
        );
    }

    #[test]
    fn test_torque_offset_calibration_window() {
        let config = ConfigurationVariables::default();
        let mut conditioner = SensorConditioner::new();
        let inputs = TickInputs {
            adc_pedal_torque: 150,
            ..TickInputs::default()
        };

        // before the window opens the initial offset holds
        let sample = run_ticks(
            &mut conditioner,
            &inputs,
            &config,
            TORQUE_OFFSET_START_CYCLES as u32,
        );
        assert_eq!(sample.adc_pedal_torque, 100);
        assert_eq!(sample.adc_pedal_torque_delta, 0);

        // by the end of the window the offset has settled on the live
        // reading plus the calibration correction
        run_ticks(
            &mut conditioner,
            &inputs,
            &config,
            (TORQUE_OFFSET_END_CYCLES - TORQUE_OFFSET_START_CYCLES) as u32,
        );
        let offset = conditioner.adc_pedal_torque_offset();
        assert_eq!(offset, 149 + ADC_TORQUE_SENSOR_CALIBRATION_OFFSET);
        assert_eq!(
            conditioner.adc_coaster_brake_threshold(),
            offset - COASTER_BRAKE_TORQUE_THRESHOLD
        );

        // after the window the offset is frozen and raw torque passes through
        let pedalling = TickInputs {
            adc_pedal_torque: offset + 50,
            ..TickInputs::default()
        };
        let sample = conditioner.update(&pedalling, &config);
        assert_eq!(sample.adc_pedal_torque, offset + 50);
        assert_eq!(sample.adc_pedal_torque_delta, 50);
        assert_eq!(sample.pedal_torque_x100, 50 * 67);
    }

    #[test]
    fn test_torque_below_offset_clamps_to_zero() {
        let config = ConfigurationVariables::default();
        let mut conditioner = SensorConditioner::new();
        let inputs = TickInputs {
            adc_pedal_torque: 100,
            ..TickInputs::default()
        };
        run_ticks(
            &mut conditioner,
            &inputs,
            &config,
            TORQUE_OFFSET_END_CYCLES as u32,
        );
        // offset is now above the live reading because of the correction
        let sample = conditioner.update(&inputs, &config);
        assert_eq!(sample.adc_pedal_torque_delta, 0);
        assert_eq!(sample.pedal_torque_x100, 0);
    }

    #[test]
    fn test_torque_full_scale_with_steep_factor() {
        let config = ConfigurationVariables {
            pedal_torque_per_adc_step_x100: 255,
            ..ConfigurationVariables::default()
        };
        let mut conditioner = SensorConditioner::new();
        let resting = TickInputs {
            adc_pedal_torque: 100,
            ..TickInputs::default()
        };
        run_ticks(
            &mut conditioner,
            &resting,
            &config,
            TORQUE_OFFSET_END_CYCLES as u32,
        );

        // ADC railed against the steepest display-set factor
        let stomping = TickInputs {
            adc_pedal_torque: 1023,
            ..TickInputs::default()
        };
        let sample = conditioner.update(&stomping, &config);
        assert_eq!(sample.adc_pedal_torque_delta, 917);
        // 917 * 255 = 233835, truncated into the 16-bit field
        assert_eq!(sample.pedal_torque_x100, 37_227);
    }
}
