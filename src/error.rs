//! Common error type for the shell engine

use core::fmt;

/// A common error type for registry, dispatcher and command operations.
///
/// The enum is small and `Copy` so it can be passed around freely in
/// `no_std` environments. None of these errors is fatal to the engine:
/// the dispatcher always returns to a well-defined state after reporting one.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A command argument was malformed, zero or negative.
    ParseError,
    /// No entry of the current block matches the typed keyword.
    CommandNotFound,
    /// A unit was activated while another one is still in flight.
    ReentrantActivation,
    /// A line was submitted while output from the previous one is still pending.
    NotReady,
    /// The block tree is malformed (title count mismatch, misplaced title,
    /// or nesting deeper than the navigation stack allows).
    RegistryConfiguration,
    /// `back` was issued at the root block.
    NoParent,
    /// The navigation stack is full.
    NavigationDepth,
    /// The input line does not fit in the line buffer.
    LineTooLong,
    /// The transport rejected a write.
    Transport,
    /// The engine configuration could not be parsed.
    Config,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::ParseError => "invalid argument",
            Error::CommandNotFound => "command not found",
            Error::ReentrantActivation => "a command is already running",
            Error::NotReady => "output still pending",
            Error::RegistryConfiguration => "malformed command registry",
            Error::NoParent => "already at the root menu",
            Error::NavigationDepth => "menu nesting too deep",
            Error::LineTooLong => "input line too long",
            Error::Transport => "transport write failed",
            Error::Config => "invalid configuration",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ParseError => defmt::write!(f, "ParseError"),
            Error::CommandNotFound => defmt::write!(f, "CommandNotFound"),
            Error::ReentrantActivation => defmt::write!(f, "ReentrantActivation"),
            Error::NotReady => defmt::write!(f, "NotReady"),
            Error::RegistryConfiguration => defmt::write!(f, "RegistryConfiguration"),
            Error::NoParent => defmt::write!(f, "NoParent"),
            Error::NavigationDepth => defmt::write!(f, "NavigationDepth"),
            Error::LineTooLong => defmt::write!(f, "LineTooLong"),
            Error::Transport => defmt::write!(f, "Transport"),
            Error::Config => defmt::write!(f, "Config"),
        }
    }
}
