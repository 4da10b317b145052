//! System-level shell plumbing.
//!
//! Everything here is `no_std`, allocation-free and driven by the
//! application's main loop:
//!
//! - **[`shell`]**: the tick-driven [`Dispatcher`](shell::Dispatcher) that
//!   resolves command lines against the registry and runs one command unit
//!   at a time without ever blocking
//!
//! # Usage
//!
//! ```rust,no_run
//! use tickshell::demo::ROOT_BLOCK;
//! use tickshell::io::{NoActuator, NullTransport};
//! use tickshell::system::shell::Dispatcher;
//!
//! let mut shell = Dispatcher::new(&ROOT_BLOCK, NoActuator, NullTransport).unwrap();
//! loop {
//!     // Feed complete lines from the UART line editor:
//!     // shell.submit(line)?;
//!     shell.tick().unwrap();
//!     // ... the rest of the firmware's main loop
//! }
//! ```

/// Cooperative command dispatcher.
///
/// Resolves input lines, owns the active command unit and gates output on the
/// transport's busy flag.
pub mod shell;
