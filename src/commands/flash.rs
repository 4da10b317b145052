//! `flash N`: flash the actuator N times.

use crate::command::args::parse_count;
use crate::command::{Command, Context, Step};
use crate::io::Actuator;

/// Keyword the line is scanned against.
const KEYWORD: &str = "flash";

/// Resume points of [`Flash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashState {
    /// Scan the count from the input line.
    Parse,
    /// Drive the actuator on.
    On,
    /// Hold it on for `flash_delay_ticks` ticks.
    HoldOn,
    /// Drive the actuator off.
    Off,
    /// Hold it off.
    HoldOff,
    /// One cycle done: decrement and loop or finish.
    Next,
}

/// Flashes the actuator a number of times given on the command line.
///
/// Every state transition costs one tick. A malformed, zero or negative
/// count ends the command on its first step without touching the actuator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    state: FlashState,
    remaining: u32,
    delay: u32,
}

impl Flash {
    /// A unit waiting to parse its argument.
    pub const fn new() -> Self {
        Self {
            state: FlashState::Parse,
            remaining: 0,
            delay: 0,
        }
    }

    /// Current resume point.
    pub fn state(&self) -> FlashState {
        self.state
    }

    /// Cycles left, including the one in progress.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Default for Flash {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Actuator> Command<H> for Flash {
    fn step(&mut self, ctx: &mut Context<'_, H>) -> Step {
        match self.state {
            FlashState::Parse => {
                let line = ctx.input().unwrap_or("");
                match parse_count(line, KEYWORD) {
                    Ok(count) => {
                        log::debug!("flashing {} times", count);
                        self.remaining = count;
                        self.state = FlashState::On;
                        Step::Yield
                    }
                    Err(err) => {
                        log::warn!("flash: {} in {:?}", err, line);
                        Step::Done
                    }
                }
            }
            FlashState::On => {
                ctx.hardware().set(true);
                self.delay = ctx.config().flash_delay_ticks;
                self.state = FlashState::HoldOn;
                Step::Yield
            }
            FlashState::HoldOn => {
                self.delay = self.delay.saturating_sub(1);
                if self.delay == 0 {
                    self.state = FlashState::Off;
                }
                Step::Yield
            }
            FlashState::Off => {
                ctx.hardware().set(false);
                self.delay = ctx.config().flash_delay_ticks;
                self.state = FlashState::HoldOff;
                Step::Yield
            }
            FlashState::HoldOff => {
                self.delay = self.delay.saturating_sub(1);
                if self.delay == 0 {
                    self.state = FlashState::Next;
                }
                Step::Yield
            }
            FlashState::Next => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    Step::Done
                } else {
                    self.state = FlashState::On;
                    Step::Yield
                }
            }
        }
    }

    fn cancel(&mut self, ctx: &mut Context<'_, H>) {
        if matches!(self.state, FlashState::HoldOn | FlashState::Off) {
            ctx.hardware().set(false);
        }
    }
}
