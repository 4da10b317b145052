//! # tickshell - cooperative command engine for embedded shells
//!
//! A small engine that lets a serial shell run long or hardware-paced
//! commands (flashing an LED, printing hundreds of lines, load tests) without
//! ever blocking the firmware's main loop, together with a hierarchical menu
//! registry for organising those commands.
//!
//! ## Features
//!
//! ### Resumable commands
//! - Each command is an explicit state machine implementing [`Command`]
//! - One bounded step per tick: no blocking waits, no busy loops
//! - Fresh per-activation state; no hidden globals
//!
//! ### Command registry
//! - Static block tree of titles, runnable entries and submenus
//! - Validated once at start-up
//! - Navigation stack with `back`, entry listing with `help`
//!
//! ### Output coordination
//! - Output gated on the transport's busy flag, suited to DMA-driven UARTs
//! - Single shared output buffer, single writer at a time
//!
//! ## Usage
//!
//! ```rust
//! use tickshell::config::EngineConfig;
//! use tickshell::demo::ROOT_BLOCK;
//! use tickshell::io::{Actuator, Transport};
//! use tickshell::Dispatcher;
//!
//! struct Led(bool);
//!
//! impl Actuator for Led {
//!     fn set(&mut self, on: bool) {
//!         self.0 = on;
//!     }
//!
//!     fn toggle(&mut self) {
//!         self.0 = !self.0;
//!     }
//! }
//!
//! struct Console;
//!
//! impl Transport for Console {
//!     type Error = ();
//!
//!     fn busy(&self) -> bool {
//!         false
//!     }
//!
//!     fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
//!         let _ = bytes;
//!         Ok(())
//!     }
//! }
//!
//! let config = EngineConfig::new().with_flash_delay_ticks(2);
//! let mut shell = Dispatcher::new(&ROOT_BLOCK, Led(false), Console)
//!     .unwrap()
//!     .with_config(config);
//!
//! shell.run_until_idle(8).unwrap();
//! shell.submit("flash 3").unwrap();
//! shell.run_until_idle(1_000).unwrap();
//! assert!(!shell.hardware().0);
//! ```
//!
//! ## Platform Support
//!
//! The crate only depends on `core` and fixed-capacity `heapless`
//! containers, so it runs on any microcontroller as well as on a host.
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt formatting of the public error and status types

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Engine tunables, loadable from JSON.
pub mod config;

/// Crate-wide error type.
pub mod error;

/// Transport and actuator collaborator traits.
pub mod io;

/// The resumable command contract and its per-step context.
pub mod command;

/// Built-in commands: call counter, LED toggle, LED flash and load test.
pub mod commands;

/// Hierarchical block registry.
pub mod registry;

/// Tick-driven dispatcher.
pub mod system;

/// The reference firmware's demonstration menu tree.
pub mod demo;

pub use command::{Command, Context, Step};
pub use error::Error;
pub use registry::{BlockEntry, EntryKind, Registry};
pub use system::shell::{Dispatcher, Selection, Tick};

