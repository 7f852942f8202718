//!
//! Fault latching for motor blocked and torque sensor failure
//!

use common::display::{RidingMode, SystemState};
use defmt::Format;

/// Battery current above which a stalled motor counts as blocked (amps x10).
const MOTOR_BLOCKED_CURRENT_X10: u8 = 50;
/// Motor electrical speed below which the motor counts as stalled (ERPS).
const MOTOR_BLOCKED_ERPS: u16 = 10;
/// Ticks the blocked condition must persist before the fault latches.
const MOTOR_BLOCKED_COUNTER_THRESHOLD: u8 = 10;
/// Ticks after latching before the fault auto-clears, condition or not.
const MOTOR_BLOCKED_RESET_COUNTER_THRESHOLD: u8 = 100;

/// Plausible torque sensor zero offset range (ADC steps).
const TORQUE_OFFSET_MIN: u16 = 10;
const TORQUE_OFFSET_MAX: u16 = 300;
/// Instantaneous torque reading above this is implausible (ADC steps).
const TORQUE_READING_MAX: u16 = 500;

#[derive(Format, Debug, Default, Clone, PartialEq, Eq)]
pub struct SystemHealth {
    state: SystemState,
    motor_blocked_counter: u8,
    motor_blocked_reset_counter: u8,
}

impl SystemHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Run both fault detectors for one tick.
    pub fn update(
        &mut self,
        battery_current_x10: u8,
        motor_speed_erps: u16,
        adc_pedal_torque_offset: u16,
        adc_pedal_torque: u16,
        riding_mode: RidingMode,
    ) {
        self.check_motor_blocked(battery_current_x10, motor_speed_erps);
        self.check_torque_sensor(adc_pedal_torque_offset, adc_pedal_torque, riding_mode);
    }

    fn check_motor_blocked(&mut self, battery_current_x10: u8, motor_speed_erps: u16) {
        if self.state == SystemState::MotorBlocked {
            // latched: recovery is a fixed timeout, whether or not the
            // blocking condition is still present
            self.motor_blocked_reset_counter += 1;
            if self.motor_blocked_reset_counter >= MOTOR_BLOCKED_RESET_COUNTER_THRESHOLD {
                self.motor_blocked_counter = 0;
                self.motor_blocked_reset_counter = 0;
                self.state = SystemState::NoError;
            }
        } else if battery_current_x10 > MOTOR_BLOCKED_CURRENT_X10
            && motor_speed_erps < MOTOR_BLOCKED_ERPS
        {
            self.motor_blocked_counter += 1;
            if self.motor_blocked_counter >= MOTOR_BLOCKED_COUNTER_THRESHOLD {
                self.state = SystemState::MotorBlocked;
                self.motor_blocked_reset_counter = 0;
            }
        } else {
            self.motor_blocked_counter = 0;
        }
    }

    fn check_torque_sensor(
        &mut self,
        adc_pedal_torque_offset: u16,
        adc_pedal_torque: u16,
        riding_mode: RidingMode,
    ) {
        let implausible = !(TORQUE_OFFSET_MIN..=TORQUE_OFFSET_MAX).contains(&adc_pedal_torque_offset)
            || adc_pedal_torque > TORQUE_READING_MAX;

        if implausible && riding_mode.uses_pedal_torque() {
            self.state = SystemState::TorqueSensorFault;
        } else if self.state == SystemState::TorqueSensorFault {
            // level sensitive: clears as soon as readings are plausible again
            self.state = SystemState::NoError;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PLAUSIBLE_OFFSET: u16 = 150;

    fn tick_blocked(health: &mut SystemHealth) {
        health.update(60, 0, PLAUSIBLE_OFFSET, 200, RidingMode::PowerAssist);
    }

    fn tick_nominal(health: &mut SystemHealth) {
        health.update(20, 100, PLAUSIBLE_OFFSET, 200, RidingMode::PowerAssist);
    }

    #[test]
    fn test_motor_blocked_latches_after_threshold() {
        let mut health = SystemHealth::new();
        for _ in 0..9 {
            tick_blocked(&mut health);
            assert_eq!(health.state(), SystemState::NoError);
        }
        tick_blocked(&mut health);
        assert_eq!(health.state(), SystemState::MotorBlocked);
    }

    #[test]
    fn test_motor_blocked_counter_resets_on_recovery() {
        let mut health = SystemHealth::new();
        for _ in 0..9 {
            tick_blocked(&mut health);
        }
        tick_nominal(&mut health);
        // the streak was broken, so nine more blocked ticks do not latch
        for _ in 0..9 {
            tick_blocked(&mut health);
        }
        assert_eq!(health.state(), SystemState::NoError);
    }

    #[test]
    fn test_motor_blocked_clears_after_timeout_even_if_still_blocked() {
        let mut health = SystemHealth::new();
        for _ in 0..10 {
            tick_blocked(&mut health);
        }
        assert_eq!(health.state(), SystemState::MotorBlocked);

        for _ in 0..99 {
            tick_blocked(&mut health);
            assert_eq!(health.state(), SystemState::MotorBlocked);
        }
        tick_blocked(&mut health);
        assert_eq!(health.state(), SystemState::NoError);
    }

    #[test]
    fn test_torque_fault_only_in_torque_consuming_modes() {
        let mut health = SystemHealth::new();
        // offset out of range, but walk assist does not consume torque
        health.update(0, 100, 5, 100, RidingMode::WalkAssist);
        assert_eq!(health.state(), SystemState::NoError);

        health.update(0, 100, 5, 100, RidingMode::TorqueAssist);
        assert_eq!(health.state(), SystemState::TorqueSensorFault);
    }

    #[test]
    fn test_torque_fault_from_implausible_reading() {
        let mut health = SystemHealth::new();
        health.update(0, 100, PLAUSIBLE_OFFSET, 501, RidingMode::EmtbAssist);
        assert_eq!(health.state(), SystemState::TorqueSensorFault);
    }

    #[test]
    fn test_torque_fault_clears_level_sensitively() {
        let mut health = SystemHealth::new();
        health.update(0, 100, 5, 100, RidingMode::PowerAssist);
        assert_eq!(health.state(), SystemState::TorqueSensorFault);

        health.update(0, 100, PLAUSIBLE_OFFSET, 100, RidingMode::PowerAssist);
        assert_eq!(health.state(), SystemState::NoError);
    }
}
