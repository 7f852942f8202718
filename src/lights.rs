//!
//! Lights policy: turns the logical lights switch, the brake state, and two
//! free-running flashers into the on/off value handed to the lights driver
//!

use defmt::Format;

#[derive(Format, Debug, Clone, PartialEq, Eq)]
struct Flasher {
    state: bool,
    counter: u8,
    on_ticks: u8,
    off_ticks: u8,
}

impl Flasher {
    fn new(on_ticks: u8, off_ticks: u8) -> Self {
        Self {
            state: false,
            counter: 0,
            on_ticks,
            off_ticks,
        }
    }

    fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.state && self.counter > self.on_ticks {
            self.counter = 0;
            self.state = false;
        } else if !self.state && self.counter > self.off_ticks {
            self.counter = 0;
            self.state = true;
        }
        self.state
    }
}

#[derive(Format, Debug, Clone, PartialEq, Eq)]
pub struct LightsController {
    default_flasher: Flasher,
    braking_flasher: Flasher,
}

impl LightsController {
    pub fn new() -> Self {
        Self {
            default_flasher: Flasher::new(3, 1),
            braking_flasher: Flasher::new(1, 1),
        }
    }

    /// Advance both flashers and resolve the configured policy for this
    /// tick.  Configurations 0-8 select how the lights switch and the brake
    /// interact; anything else falls back to the plain switch.
    pub fn update(&mut self, configuration: u8, lights_on: bool, braking: bool) -> bool {
        let default_flash = self.default_flasher.tick();
        let braking_flash = self.braking_flasher.tick();

        match configuration {
            0 => lights_on,
            1 => {
                if lights_on {
                    default_flash
                } else {
                    lights_on
                }
            }
            2 => {
                if lights_on && braking {
                    braking_flash
                } else {
                    lights_on
                }
            }
            3 => {
                if lights_on && braking {
                    true
                } else if lights_on {
                    default_flash
                } else {
                    lights_on
                }
            }
            4 => {
                if lights_on && braking {
                    braking_flash
                } else if lights_on {
                    default_flash
                } else {
                    lights_on
                }
            }
            5 => {
                if braking {
                    true
                } else {
                    lights_on
                }
            }
            6 => {
                if braking {
                    braking_flash
                } else {
                    lights_on
                }
            }
            7 => {
                if braking {
                    true
                } else if lights_on {
                    default_flash
                } else {
                    lights_on
                }
            }
            8 => {
                if braking {
                    braking_flash
                } else if lights_on {
                    default_flash
                } else {
                    lights_on
                }
            }
            _ => lights_on,
        }
    }
}

impl Default for LightsController {
    fn default() -> Self {
        Self::new()
    }
}
