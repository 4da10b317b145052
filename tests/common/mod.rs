#![allow(dead_code)]

use tickshell::commands::Builtin;
use tickshell::config::EngineConfig;
use tickshell::demo::ROOT_BLOCK;
use tickshell::io::{Actuator, Transport};
use tickshell::{Dispatcher, Tick};

/// Transport capturing everything written, with a controllable busy flag.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub written: String,
    pub writes: usize,
    pub busy: bool,
    /// Raise the busy flag after every write, like a DMA transfer would.
    pub auto_busy: bool,
    pub fail: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dma() -> Self {
        Self {
            auto_busy: true,
            ..Self::default()
        }
    }

    /// Simulate the transfer-complete interrupt.
    pub fn complete(&mut self) {
        self.busy = false;
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.written)
    }
}

impl Transport for MockTransport {
    type Error = ();

    fn busy(&self) -> bool {
        self.busy
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        assert!(!self.busy, "write started while transport busy");
        if self.fail {
            return Err(());
        }
        self.written.push_str(std::str::from_utf8(bytes).unwrap());
        self.writes += 1;
        if self.auto_busy {
            self.busy = true;
        }
        Ok(())
    }
}

/// Actuator recording every state it was driven to.
#[derive(Debug, Default)]
pub struct RecordingLed {
    pub on: bool,
    pub events: Vec<bool>,
}

impl RecordingLed {
    pub fn ons(&self) -> usize {
        self.events.iter().filter(|&&on| on).count()
    }

    pub fn offs(&self) -> usize {
        self.events.iter().filter(|&&on| !on).count()
    }
}

impl Actuator for RecordingLed {
    fn set(&mut self, on: bool) {
        self.on = on;
        self.events.push(on);
    }

    fn toggle(&mut self) {
        let on = !self.on;
        self.set(on);
    }
}

pub type DemoShell = Dispatcher<Builtin, RecordingLed, MockTransport>;

/// Demo shell with short delays, already idle at the first prompt.
pub fn demo_shell() -> DemoShell {
    demo_shell_with(MockTransport::new())
}

pub fn demo_shell_with(transport: MockTransport) -> DemoShell {
    let config = EngineConfig::new()
        .with_flash_delay_ticks(3)
        .with_load_iterations(4)
        .with_load_work(100);
    let mut shell = Dispatcher::new(&ROOT_BLOCK, RecordingLed::default(), transport)
        .unwrap()
        .with_config(config);
    run_to_idle(&mut shell);
    shell.transport_mut().take();
    shell
}

/// Tick until idle, completing DMA transfers as soon as they start.
pub fn run_to_idle(shell: &mut DemoShell) -> usize {
    let mut ticks = 0;
    while !shell.is_idle() {
        assert!(ticks < 100_000, "shell never returned to the prompt");
        shell.tick().unwrap();
        shell.transport_mut().complete();
        ticks += 1;
    }
    ticks
}

/// Run one complete command line and return what it printed.
pub fn run_line(shell: &mut DemoShell, line: &str) -> String {
    let _ = shell.submit(line);
    run_to_idle(shell);
    shell.transport_mut().take()
}

pub fn count_ticks(shell: &mut DemoShell, expected: Tick) -> usize {
    let mut seen = 0;
    while !shell.is_idle() {
        if shell.tick().unwrap() == expected {
            seen += 1;
        }
        shell.transport_mut().complete();
    }
    seen
}
