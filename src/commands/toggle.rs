//! `led`: toggle the actuator.

use crate::command::{Command, Context, Step};
use crate::io::Actuator;

/// Single-step command: toggles the actuator and finishes immediately.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Toggle;

impl<H: Actuator> Command<H> for Toggle {
    fn step(&mut self, ctx: &mut Context<'_, H>) -> Step {
        ctx.hardware().toggle();
        Step::Done
    }
}
