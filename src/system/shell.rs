//! Cooperative command dispatcher for embedded shells.
//!
//! The [`Dispatcher`] ties the command registry, the active command unit and
//! the output transport together. It never blocks: the application calls
//! [`Dispatcher::tick`] from its main loop and every call performs exactly one
//! small action, so a command that flashes an LED for seconds or prints
//! hundreds of lines never stalls the rest of the firmware.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Line editor   │───▶│    Registry     │───▶│  Active Unit    │
//! │  (application)  │    │  (block tree)   │    │     Slot        │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                                                        │ step()
//!                                                        ▼
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Transport     │◀───│  Output phase   │◀───│  Output buffer  │
//! │ (busy + write)  │    │  (busy gated)   │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! A complete line is handed to [`Dispatcher::submit`], which either
//! activates a command, moves through the menu tree, or queues a notice. From
//! then on each [`tick`](Dispatcher::tick) does one of:
//!
//! - step the active unit once,
//! - hand the output buffer to the transport once it is no longer busy,
//! - print the prompt, a notice or one line of the menu listing.
//!
//! Only one unit can be active at a time. `submit` refuses new lines until
//! the dispatcher is back at the prompt.
//!
//! # Usage
//!
//! ```rust
//! use tickshell::demo::ROOT_BLOCK;
//! use tickshell::io::{NoActuator, NullTransport};
//! use tickshell::system::shell::{Dispatcher, Selection};
//!
//! let mut shell = Dispatcher::new(&ROOT_BLOCK, NoActuator, NullTransport).unwrap();
//! shell.run_until_idle(16).unwrap(); // prints the first prompt
//!
//! assert_eq!(shell.submit("cnt").unwrap(), Selection::Started("cnt - displays its own call count"));
//! while !shell.is_idle() {
//!     shell.tick().unwrap();
//! }
//! ```
//!
//! # Built-in keywords
//!
//! When no entry of the current block matches, two keywords are handled by
//! the dispatcher itself:
//!
//! - `back` or `..` returns to the parent block
//! - `help` or `?` lists the entries of the current block

use core::fmt::{self, Write};

use heapless::{FnvIndexMap, Vec};

use crate::command::{Command, Context, OutputBuffer, Step};
use crate::config::EngineConfig;
use crate::error::Error;
use crate::io::Transport;
use crate::registry::{
    Block, BlockEntry, EntryKind, MAX_BLOCK_DEPTH, MAX_TRACKED_COMMANDS, Registry, UnitFactory, title,
};

/// Maximum length of a submitted command line.
pub const MAX_LINE: usize = 128;

/// Capacity of the rendered prompt.
pub const PROMPT_CAPACITY: usize = 64;

/// Notice printed when no entry matches the typed keyword.
pub const NOT_FOUND_NOTICE: &str = "\r\nCommand not found";

/// Notice printed when `back` is issued at the root block.
pub const NO_PARENT_NOTICE: &str = "\r\nAlready at the root menu";

/// Stored copy of the line that activated the current unit.
pub type Line = heapless::String<MAX_LINE>;

const PROMPT_SUFFIX: &str = "> ";

/// Rendered prompt text.
pub type Prompt = heapless::String<PROMPT_CAPACITY>;

/// Outcome of a successful [`Dispatcher::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A runnable entry was activated. Holds its label.
    Started(&'static str),
    /// A submenu was entered. Holds the new block's title.
    Entered(&'static str),
    /// Navigation went back to the parent. Holds the parent's title.
    Left(&'static str),
    /// The current block's entries are being listed.
    Menu,
    /// The line was blank; the prompt is printed again.
    Empty,
}

/// What a single [`Dispatcher::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing to do: waiting for input.
    Idle,
    /// Output is pending but the transport is busy.
    Waiting,
    /// The active unit was stepped and is still running.
    Stepped,
    /// The active unit was stepped and finished.
    Completed,
    /// Text was handed to the transport.
    Flushed,
    /// The prompt was handed to the transport.
    Prompted,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Tick {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Tick::Idle => defmt::write!(f, "Idle"),
            Tick::Waiting => defmt::write!(f, "Waiting"),
            Tick::Stepped => defmt::write!(f, "Stepped"),
            Tick::Completed => defmt::write!(f, "Completed"),
            Tick::Flushed => defmt::write!(f, "Flushed"),
            Tick::Prompted => defmt::write!(f, "Prompted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// At the prompt, waiting for a line.
    Idle,
    /// Prompt must be printed.
    Prompt,
    /// The active unit is stepped every tick.
    Running,
    /// The output buffer must be flushed before anything else happens.
    Output,
    /// A fixed message must be printed, then the prompt.
    Notice(&'static str),
    /// Listing the current block, next entry index.
    Menu(usize),
}

/// A unit in flight.
struct Active<U> {
    unit: U,
    label: &'static str,
    activations: u32,
    first_step: bool,
}

/// Tick-driven command dispatcher.
///
/// Generic over:
/// - `U`: the unit type produced by the registry's runnable entries
/// - `H`: hardware handle lent to units (for the built-ins, an actuator)
/// - `T`: output [`Transport`]
/// - `DEPTH`: capacity of the navigation stack
pub struct Dispatcher<U: 'static, H, T, const DEPTH: usize = MAX_BLOCK_DEPTH> {
    registry: Registry<U>,
    current: Block<U>,
    parents: Vec<Block<U>, DEPTH>,
    slot: Option<Active<U>>,
    phase: Phase,
    line: Line,
    output: OutputBuffer,
    ledger: FnvIndexMap<&'static str, u32, MAX_TRACKED_COMMANDS>,
    hardware: H,
    transport: T,
    config: EngineConfig,
}

impl<U: 'static, H, T, const DEPTH: usize> fmt::Debug for Dispatcher<U, H, T, DEPTH> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("current", &title(self.current))
            .field("depth", &self.parents.len())
            .field("phase", &self.phase)
            .field("active", &self.slot.as_ref().map(|active| active.label))
            .field("output", &self.output.as_str())
            .finish_non_exhaustive()
    }
}

impl<U, H, T> Dispatcher<U, H, T>
where
    U: Command<H> + 'static,
    T: Transport,
{
    /// Create a dispatcher over the tree rooted at `root`.
    ///
    /// The tree is validated up front; a malformed tree is rejected here and
    /// never at dispatch time. The first tick prints the prompt.
    ///
    /// # Returns
    ///
    /// * `Ok(dispatcher)` - Ready to tick
    /// * `Err(Error::RegistryConfiguration)` - The block tree is malformed
    pub fn new(root: Block<U>, hardware: H, transport: T) -> Result<Self, Error> {
        Self::with_nesting(root, hardware, transport)
    }
}

impl<U, H, T, const DEPTH: usize> Dispatcher<U, H, T, DEPTH>
where
    U: Command<H> + 'static,
    T: Transport,
{
    /// Like [`Dispatcher::new`] with a custom navigation stack capacity.
    pub fn with_nesting(root: Block<U>, hardware: H, transport: T) -> Result<Self, Error> {
        let registry = Registry::new(root)?;
        let mut ledger = FnvIndexMap::new();
        registry.for_each_runnable(|label| {
            // Cannot fail: the registry caps distinct labels at the ledger's capacity.
            let _ = ledger.insert(label, 0);
        });
        Ok(Self {
            registry,
            current: root,
            parents: Vec::new(),
            slot: None,
            phase: Phase::Prompt,
            line: Line::new(),
            output: OutputBuffer::new(),
            ledger,
            hardware,
            transport,
            config: EngineConfig::default(),
        })
    }

    /// Replace the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve and act on a complete input line.
    ///
    /// The first whitespace-delimited token is matched against the keywords
    /// of the current block. Runnable entries are activated with the whole
    /// line available to their first step; submenu entries are entered.
    ///
    /// # Returns
    ///
    /// * `Ok(selection)` - What the line selected
    /// * `Err(Error::ReentrantActivation)` - A unit is still running
    /// * `Err(Error::NotReady)` - Output of the previous line is still pending
    /// * `Err(Error::LineTooLong)` - The line exceeds [`MAX_LINE`]
    /// * `Err(Error::CommandNotFound)` - Nothing matched; a notice is queued
    /// * `Err(Error::NoParent)` - `back` at the root; a notice is queued
    /// * `Err(Error::NavigationDepth)` - The navigation stack is full
    pub fn submit(&mut self, line: &str) -> Result<Selection, Error> {
        if let Some(active) = &self.slot {
            log::warn!("rejecting '{}': '{}' is still running", line, active.label);
            return Err(Error::ReentrantActivation);
        }
        if !matches!(self.phase, Phase::Idle | Phase::Prompt) {
            log::warn!("rejecting '{}': output pending", line);
            return Err(Error::NotReady);
        }

        let line = line.trim();
        let Some(token) = line.split_whitespace().next() else {
            self.phase = Phase::Prompt;
            return Ok(Selection::Empty);
        };

        match self.registry.resolve(self.current, token) {
            Ok(entry) => match entry.kind {
                EntryKind::Runnable(factory) => self.activate(entry, factory, line),
                EntryKind::Submenu(child) => self.enter(child),
                EntryKind::Title(_) => self.builtin(token),
            },
            Err(_) => self.builtin(token),
        }
    }

    /// Advance the engine by one step.
    ///
    /// # Returns
    ///
    /// * `Ok(tick)` - What was done
    /// * `Err(Error::Transport)` - The transport rejected a write; the text
    ///   is dropped and the dispatcher moves on as if it had been sent
    pub fn tick(&mut self) -> Result<Tick, Error> {
        match self.phase {
            Phase::Idle => Ok(Tick::Idle),
            Phase::Running => Ok(self.step_active()),
            Phase::Output => {
                if self.transport.busy() {
                    log::trace!("output pending, transport busy");
                    return Ok(Tick::Waiting);
                }
                self.phase = if self.slot.is_some() {
                    Phase::Running
                } else {
                    Phase::Prompt
                };
                if self.output.is_empty() {
                    return Ok(Tick::Stepped);
                }
                let result = send(&mut self.transport, self.output.as_bytes());
                self.output.clear();
                result.map(|_| Tick::Flushed)
            }
            Phase::Prompt => {
                if self.transport.busy() {
                    return Ok(Tick::Waiting);
                }
                self.phase = Phase::Idle;
                let prompt = self.prompt();
                send(&mut self.transport, prompt.as_bytes()).map(|_| Tick::Prompted)
            }
            Phase::Notice(text) => {
                if self.transport.busy() {
                    return Ok(Tick::Waiting);
                }
                self.phase = Phase::Prompt;
                send(&mut self.transport, text.as_bytes()).map(|_| Tick::Flushed)
            }
            Phase::Menu(index) => {
                if self.transport.busy() {
                    return Ok(Tick::Waiting);
                }
                let Some(entry) = self.current.get(index) else {
                    self.phase = Phase::Prompt;
                    return Ok(Tick::Idle);
                };
                self.phase = if index + 1 < self.current.len() {
                    Phase::Menu(index + 1)
                } else {
                    Phase::Prompt
                };
                self.output.clear();
                let _ = write!(self.output, "\r\n  {}", entry.label);
                let result = send(&mut self.transport, self.output.as_bytes());
                self.output.clear();
                result.map(|_| Tick::Flushed)
            }
        }
    }

    /// Tick until the dispatcher is idle at the prompt, at most `max_ticks` times.
    ///
    /// Returns the number of ticks performed. Hitting the limit is not an
    /// error: a long command simply keeps running on the next call.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> Result<usize, Error> {
        let mut ticks = 0;
        while ticks < max_ticks && !self.is_idle() {
            self.tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }

    /// Abort the active unit.
    ///
    /// The unit's [`Command::cancel`] hook runs first, then the unit is
    /// dropped, pending output is discarded and the prompt is queued.
    /// Returns `false` when no unit was active.
    pub fn cancel(&mut self) -> bool {
        let Some(mut active) = self.slot.take() else {
            return false;
        };
        log::debug!("cancelling '{}'", active.label);
        let busy = self.transport.busy();
        let mut ctx = Context::new(&mut self.output, &mut self.hardware, &self.config)
            .with_busy(busy)
            .with_activations(active.activations);
        active.unit.cancel(&mut ctx);
        self.output.clear();
        self.phase = Phase::Prompt;
        true
    }

    /// Prompt text: the root title, plus the current block's title when
    /// nested, followed by `"> "`.
    ///
    /// A label too long for [`PROMPT_CAPACITY`] is cut short; the `"> "`
    /// suffix is always present.
    pub fn prompt(&self) -> Prompt {
        let mut prompt = Prompt::new();
        let _ = prompt.push_str("\r\n");
        let mut label = Truncate {
            out: &mut prompt,
            limit: PROMPT_CAPACITY - PROMPT_SUFFIX.len(),
        };
        let _ = write!(label, "{}", self.registry.prompt_label(self.current));
        let _ = prompt.push_str(PROMPT_SUFFIX);
        prompt
    }

    /// Whether a unit occupies the Active Unit Slot.
    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }

    /// Whether the dispatcher sits at the prompt with nothing left to do.
    pub fn is_idle(&self) -> bool {
        self.slot.is_none() && self.phase == Phase::Idle
    }

    /// Label of the active unit's entry.
    pub fn active_label(&self) -> Option<&'static str> {
        self.slot.as_ref().map(|active| active.label)
    }

    /// Title of the block currently shown.
    pub fn current_title(&self) -> &'static str {
        title(self.current)
    }

    /// Entries of the block currently shown, title first.
    pub fn entries(&self) -> Block<U> {
        self.current
    }

    /// Number of parent blocks on the navigation stack.
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    /// How many times the entry labelled `label` has been activated.
    pub fn activations(&self, label: &str) -> u32 {
        self.ledger.get(label).copied().unwrap_or(0)
    }

    /// The validated registry.
    pub fn registry(&self) -> &Registry<U> {
        &self.registry
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Hardware handle.
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Mutable hardware handle.
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    /// Output transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable output transport, e.g. to signal write completion.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn activate(
        &mut self,
        entry: &'static BlockEntry<U>,
        factory: UnitFactory<U>,
        line: &str,
    ) -> Result<Selection, Error> {
        self.line.clear();
        self.line.push_str(line).map_err(|_| Error::LineTooLong)?;

        let activations = self.record_activation(entry.label);
        log::debug!("activating '{}' (run #{})", entry.label, activations + 1);

        self.output.clear();
        self.slot = Some(Active {
            unit: factory(),
            label: entry.label,
            activations,
            first_step: true,
        });
        self.phase = Phase::Running;
        Ok(Selection::Started(entry.label))
    }

    /// Bump the ledger and return the count before this activation.
    fn record_activation(&mut self, label: &'static str) -> u32 {
        let Some(count) = self.ledger.get_mut(label) else {
            log::warn!("'{}' has no ledger slot", label);
            return 0;
        };
        let previous = *count;
        *count = count.saturating_add(1);
        previous
    }

    fn enter(&mut self, child: Block<U>) -> Result<Selection, Error> {
        if self.parents.push(self.current).is_err() {
            log::warn!("navigation stack full at '{}'", title(self.current));
            self.phase = Phase::Prompt;
            return Err(Error::NavigationDepth);
        }
        self.current = child;
        self.phase = Phase::Prompt;
        log::debug!("entered '{}'", title(child));
        Ok(Selection::Entered(title(child)))
    }

    fn builtin(&mut self, token: &str) -> Result<Selection, Error> {
        match token {
            "back" | ".." => match self.parents.pop() {
                Some(parent) => {
                    log::debug!("back to '{}'", title(parent));
                    self.current = parent;
                    self.phase = Phase::Prompt;
                    Ok(Selection::Left(title(parent)))
                }
                None => {
                    self.phase = Phase::Notice(NO_PARENT_NOTICE);
                    Err(Error::NoParent)
                }
            },
            "help" | "?" => {
                self.phase = if self.current.len() > 1 {
                    Phase::Menu(1)
                } else {
                    Phase::Prompt
                };
                Ok(Selection::Menu)
            }
            _ => {
                log::debug!("no command '{}' in '{}'", token, title(self.current));
                self.phase = Phase::Notice(NOT_FOUND_NOTICE);
                Err(Error::CommandNotFound)
            }
        }
    }

    fn step_active(&mut self) -> Tick {
        let busy = self.transport.busy();
        let Some(active) = self.slot.as_mut() else {
            self.phase = Phase::Prompt;
            return Tick::Idle;
        };

        let mut ctx = Context::new(&mut self.output, &mut self.hardware, &self.config)
            .with_busy(busy)
            .with_activations(active.activations);
        if active.first_step {
            ctx = ctx.with_input(self.line.as_str());
            active.first_step = false;
        }

        match active.unit.step(&mut ctx) {
            Step::Yield => Tick::Stepped,
            Step::Flush => {
                if !self.output.is_empty() {
                    self.phase = Phase::Output;
                }
                Tick::Stepped
            }
            Step::Done => {
                log::debug!("'{}' finished", active.label);
                self.slot = None;
                self.phase = if self.output.is_empty() {
                    Phase::Prompt
                } else {
                    Phase::Output
                };
                Tick::Completed
            }
        }
    }
}

/// Writer that keeps whole characters up to `limit` bytes and drops the rest.
struct Truncate<'a> {
    out: &'a mut Prompt,
    limit: usize,
}

impl Write for Truncate<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.out.len() + ch.len_utf8() > self.limit {
                break;
            }
            let _ = self.out.push(ch);
        }
        Ok(())
    }
}

fn send<T: Transport>(transport: &mut T, bytes: &[u8]) -> Result<(), Error> {
    transport.write(bytes).map_err(|_| {
        log::warn!("transport rejected {} bytes", bytes.len());
        Error::Transport
    })
}
