//!
//! Wire protocol shared between the motor controller and the display unit
//!

#![no_std]

pub mod crc;
pub mod display;
