//! Built-in commands.
//!
//! Ready-made units for boards with a status LED:
//!
//! | Keyword   | Unit       | Behaviour                                        |
//! |-----------|------------|--------------------------------------------------|
//! | `cnt`     | [`Count`]  | prints how many times it ran before              |
//! | `led`     | [`Toggle`] | toggles the actuator                             |
//! | `flash N` | [`Flash`]  | flashes the actuator N times                     |
//! | `load`    | [`Load`]   | CPU and output load test                         |
//!
//! [`Builtin`] wraps all of them so a block tree can hold any mix. An
//! application with its own commands typically defines a similar enum that
//! embeds `Builtin` next to its own units.

use crate::command::{Command, Context, Step};
use crate::io::Actuator;

pub mod count;
pub mod flash;
pub mod load;
pub mod toggle;

pub use count::Count;
pub use flash::{Flash, FlashState};
pub use load::Load;
pub use toggle::Toggle;

/// Any of the built-in units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin {
    /// `cnt`
    Count(Count),
    /// `led`
    Toggle(Toggle),
    /// `flash N`
    Flash(Flash),
    /// `load`
    Load(Load),
}

impl Builtin {
    /// Factory for registry entries running [`Count`].
    pub fn count() -> Self {
        Builtin::Count(Count::new())
    }

    /// Factory for registry entries running [`Toggle`].
    pub fn toggle() -> Self {
        Builtin::Toggle(Toggle)
    }

    /// Factory for registry entries running [`Flash`].
    pub fn flash() -> Self {
        Builtin::Flash(Flash::new())
    }

    /// Factory for registry entries running [`Load`].
    pub fn load() -> Self {
        Builtin::Load(Load::new())
    }
}

impl<H: Actuator> Command<H> for Builtin {
    fn step(&mut self, ctx: &mut Context<'_, H>) -> Step {
        match self {
            Builtin::Count(unit) => unit.step(ctx),
            Builtin::Toggle(unit) => unit.step(ctx),
            Builtin::Flash(unit) => unit.step(ctx),
            Builtin::Load(unit) => unit.step(ctx),
        }
    }

    fn cancel(&mut self, ctx: &mut Context<'_, H>) {
        match self {
            Builtin::Count(unit) => unit.cancel(ctx),
            Builtin::Toggle(unit) => unit.cancel(ctx),
            Builtin::Flash(unit) => unit.cancel(ctx),
            Builtin::Load(unit) => unit.cancel(ctx),
        }
    }
}
