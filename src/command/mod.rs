//! The resumable command contract.
//!
//! A command is a small state machine advanced by the
//! [`Dispatcher`](crate::system::shell::Dispatcher) exactly once per tick. Each call to
//! [`Command::step`] performs at most one bounded piece of work (one actuator
//! write, one buffer fill, one counter decrement) and reports what the
//! dispatcher should do next through a [`Step`].
//!
//! # Writing a command
//!
//! ```rust
//! use core::fmt::Write;
//! use tickshell::command::{Command, Context, Step};
//!
//! #[derive(Debug)]
//! enum HelloState {
//!     Greet,
//!     Finish,
//! }
//!
//! #[derive(Debug)]
//! struct Hello {
//!     state: HelloState,
//! }
//!
//! impl<H> Command<H> for Hello {
//!     fn step(&mut self, ctx: &mut Context<'_, H>) -> Step {
//!         match self.state {
//!             HelloState::Greet => {
//!                 let Some(out) = ctx.output() else {
//!                     return Step::Yield;
//!                 };
//!                 let _ = write!(out, "\r\nhello");
//!                 self.state = HelloState::Finish;
//!                 Step::Flush
//!             }
//!             HelloState::Finish => Step::Done,
//!         }
//!     }
//! }
//! ```

use crate::config::EngineConfig;

pub mod args;

/// Capacity of the shared output buffer in bytes.
pub const OUTPUT_CAPACITY: usize = 128;

/// Shared output buffer lent to the active unit.
pub type OutputBuffer = heapless::String<OUTPUT_CAPACITY>;

/// What the dispatcher should do after a unit's step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep the unit active and step it again next tick.
    Yield,
    /// Flush the output buffer, then keep stepping the unit.
    Flush,
    /// The unit has finished. Pending output is flushed and the prompt shown.
    Done,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Step {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Step::Yield => defmt::write!(f, "Yield"),
            Step::Flush => defmt::write!(f, "Flush"),
            Step::Done => defmt::write!(f, "Done"),
        }
    }
}

/// Everything a unit may touch during one step.
///
/// `H` is the application's hardware handle (for the built-in commands, an
/// [`Actuator`](crate::io::Actuator)).
#[derive(Debug)]
pub struct Context<'a, H> {
    input: Option<&'a str>,
    output: &'a mut OutputBuffer,
    busy: bool,
    hardware: &'a mut H,
    config: &'a EngineConfig,
    activations: u32,
}

impl<'a, H> Context<'a, H> {
    /// Build a context for a step that follows the first one.
    ///
    /// The dispatcher does this internally; it is public so that units can
    /// be driven in isolation.
    pub fn new(output: &'a mut OutputBuffer, hardware: &'a mut H, config: &'a EngineConfig) -> Self {
        Self {
            input: None,
            output,
            busy: false,
            hardware,
            config,
            activations: 0,
        }
    }

    /// Attach the raw input line (first step only).
    pub fn with_input(mut self, line: &'a str) -> Self {
        self.input = Some(line);
        self
    }

    /// Report the transport's busy flag for this step.
    pub fn with_busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Record how many times this entry was activated before.
    pub fn with_activations(mut self, activations: u32) -> Self {
        self.activations = activations;
        self
    }

    /// The raw input line that activated the unit.
    ///
    /// Only available on the very first step; `None` afterwards.
    pub fn input(&self) -> Option<&'a str> {
        self.input
    }

    /// The shared output buffer, or `None` while the transport is busy.
    pub fn output(&mut self) -> Option<&mut OutputBuffer> {
        if self.busy {
            None
        } else {
            Some(&mut *self.output)
        }
    }

    /// Whether an output write is still in flight.
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// The application's hardware handle.
    pub fn hardware(&mut self) -> &mut H {
        &mut *self.hardware
    }

    /// Engine tunables.
    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    /// Number of earlier activations of the entry that started this unit.
    pub fn activations(&self) -> u32 {
        self.activations
    }
}

/// A resumable command unit.
///
/// Implementors hold their resume point and locals in `self`. The dispatcher
/// creates a fresh value on every activation and drops it after
/// [`Step::Done`], so no state leaks from one run into the next.
pub trait Command<H> {
    /// Advance the state machine by one tick. Must never block.
    fn step(&mut self, ctx: &mut Context<'_, H>) -> Step;

    /// Called when the dispatcher aborts the unit before it finished.
    ///
    /// The default does nothing; override it to leave hardware in a safe state.
    fn cancel(&mut self, _ctx: &mut Context<'_, H>) {}
}
