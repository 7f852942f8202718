//!
//! Control core for a pedal assist mid-drive motor controller.
//!
//! Runs the per-tick pipeline that turns conditioned sensor readings into a
//! committed battery current and duty cycle command: sensor conditioning,
//! one of seven assist laws, the optional throttle/temperature overlay, the
//! wheel speed limiter, and the safety arbiter with the motor enable state
//! machine.  The crate has no fixed compilation target so the control laws
//! can be unit tested on the host; peripheral bring-up (ADC, PWM, UART
//! interrupts, FOC commutation) lives with the board support code.
//!

#![no_std]

pub mod assist;
pub mod config;
pub mod controller;
pub mod cruise;
pub mod emtb;
pub mod health;
pub mod lights;
pub mod motor;
pub mod overlay;
pub mod sensors;
pub mod transport;
pub mod util;

pub use controller::{Controller, TickInputs, TickOutputs};
