//!
//! Safety arbiter and motor enable state machine.
//!
//! Last stage of the pipeline: clamps the assist pipeline's candidate
//! output against the hardware limits, gates everything off on brake, fault
//! or administrative disable, commits the result for the commutation layer,
//! and manages the hysteretic enable/disable transitions.
//!

use common::display::SystemState;
use defmt::Format;

use crate::assist::AssistOutput;
use crate::config::{
    ADC_BATTERY_CURRENT_MAX, PWM_DUTY_CYCLE_MAX, PWM_DUTY_CYCLE_STARTUP,
    RAMP_DOWN_INVERSE_STEP_MIN, RAMP_UP_INVERSE_STEP_DEFAULT, RAMP_UP_INVERSE_STEP_MIN,
};

/// The motor is only (re)enabled while rotating slower than this (ERPS).
const MOTOR_ENABLE_ERPS_THRESHOLD: u16 = 50;

/// PWM action the board support layer must carry out this tick.
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmTransition {
    Enable,
    Disable,
}

#[derive(Format, Debug, Clone, PartialEq, Eq)]
/// Committed drive command plus the enable state the commutation layer runs
/// under.  `duty_cycle` mirrors the live value the commutation layer reports
/// back each tick.
pub struct MotorInterface {
    enabled: bool,
    /// Live duty cycle as reported by the commutation layer
    pub duty_cycle: u8,
    /// Field weakening Hall counter offset; reset on every enable
    pub field_weakening_offset: u8,
    pub battery_current_target: u8,
    pub duty_cycle_target: u8,
    pub ramp_up_inverse_step: u8,
    pub ramp_down_inverse_step: u8,
}

impl MotorInterface {
    pub fn new() -> Self {
        Self {
            enabled: true,
            duty_cycle: 0,
            field_weakening_offset: 0,
            battery_current_target: 0,
            duty_cycle_target: 0,
            ramp_up_inverse_step: RAMP_UP_INVERSE_STEP_DEFAULT,
            ramp_down_inverse_step: RAMP_DOWN_INVERSE_STEP_MIN,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Clamp and commit one tick's candidate output, then evaluate the
    /// enable/disable transitions.  Returns the PWM action to apply, if any.
    pub fn arbitrate(
        &mut self,
        output: &mut AssistOutput,
        adc_battery_current_max: &mut u8,
        braking: bool,
        system_state: SystemState,
        motor_speed_erps: u16,
    ) -> Option<PwmTransition> {
        if braking || system_state != SystemState::NoError || !self.enabled {
            // last resort gate: whatever the pipeline computed, the drive
            // gets zero current and the slowest spin-up
            self.ramp_up_inverse_step = RAMP_UP_INVERSE_STEP_DEFAULT;
            self.ramp_down_inverse_step = RAMP_DOWN_INVERSE_STEP_MIN;
            self.battery_current_target = 0;
            self.duty_cycle_target = 0;
        } else {
            *adc_battery_current_max = (*adc_battery_current_max).min(ADC_BATTERY_CURRENT_MAX);
            output.battery_current_target =
                output.battery_current_target.min(*adc_battery_current_max);
            output.duty_cycle_target = output.duty_cycle_target.min(PWM_DUTY_CYCLE_MAX);
            output.ramp_up_inverse_step =
                output.ramp_up_inverse_step.max(RAMP_UP_INVERSE_STEP_MIN);
            output.ramp_down_inverse_step =
                output.ramp_down_inverse_step.max(RAMP_DOWN_INVERSE_STEP_MIN);

            self.ramp_up_inverse_step = output.ramp_up_inverse_step;
            self.ramp_down_inverse_step = output.ramp_down_inverse_step;
            self.battery_current_target = output.battery_current_target;
            self.duty_cycle_target = output.duty_cycle_target;
        }

        if self.enabled
            && motor_speed_erps == 0
            && output.battery_current_target == 0
            && self.duty_cycle == 0
        {
            self.enabled = false;
            Some(PwmTransition::Disable)
        } else if !self.enabled
            && motor_speed_erps < MOTOR_ENABLE_ERPS_THRESHOLD
            && output.battery_current_target != 0
            && !braking
        {
            self.enabled = true;
            self.ramp_up_inverse_step = RAMP_UP_INVERSE_STEP_MIN;
            self.ramp_down_inverse_step = RAMP_DOWN_INVERSE_STEP_MIN;
            self.duty_cycle = PWM_DUTY_CYCLE_STARTUP;
            self.field_weakening_offset = 0;
            Some(PwmTransition::Enable)
        } else {
            None
        }
    }
}

impl Default for MotorInterface {
    fn default() -> Self {
        Self::new()
    }
}
