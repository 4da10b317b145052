//! `cnt`: report how many times the command ran before.

use core::fmt::Write;

use crate::command::{Command, Context, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountState {
    Report,
    Finish,
}

/// Prints `Called N times`, N being the number of earlier activations.
///
/// The count comes from the dispatcher's activation ledger, so it keeps
/// growing across runs even though each run gets a fresh unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count {
    state: CountState,
}

impl Count {
    /// A unit about to report.
    pub const fn new() -> Self {
        Self {
            state: CountState::Report,
        }
    }
}

impl Default for Count {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Command<H> for Count {
    fn step(&mut self, ctx: &mut Context<'_, H>) -> Step {
        match self.state {
            CountState::Report => {
                let calls = ctx.activations();
                let Some(out) = ctx.output() else {
                    return Step::Yield;
                };
                out.clear();
                let _ = write!(out, "\r\nCalled {calls} times");
                self.state = CountState::Finish;
                Step::Flush
            }
            CountState::Finish => Step::Done,
        }
    }
}
