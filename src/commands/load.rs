//! `load`: performance test that keeps the CPU and the output path busy.

use core::fmt::Write;
use core::hint::black_box;

use crate::command::{Command, Context, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    /// Wait for the previous write to complete.
    Drain,
    Report,
    Work,
}

/// Prints a running counter together with an accumulator fed by busy work.
///
/// Each cycle waits for the transport, reports `Values : <i> <accu / 10000>`,
/// then either finishes after `load_iterations` reports or burns
/// `load_work` multiply-adds before the next cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Load {
    state: LoadState,
    reports: u32,
    accu: i64,
}

impl Load {
    /// A fresh unit with a zeroed counter and accumulator.
    pub const fn new() -> Self {
        Self {
            state: LoadState::Drain,
            reports: 0,
            accu: 0,
        }
    }

    /// Reports emitted so far.
    pub fn reports(&self) -> u32 {
        self.reports
    }
}

impl Default for Load {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Command<H> for Load {
    fn step(&mut self, ctx: &mut Context<'_, H>) -> Step {
        match self.state {
            LoadState::Drain => {
                if !ctx.busy() {
                    self.state = LoadState::Report;
                }
                Step::Yield
            }
            LoadState::Report => {
                let (reports, accu) = (self.reports, self.accu / 10_000);
                let Some(out) = ctx.output() else {
                    self.state = LoadState::Drain;
                    return Step::Yield;
                };
                out.clear();
                let _ = write!(out, "\r\nValues : {reports} {accu}");
                self.reports += 1;
                self.state = LoadState::Work;
                Step::Flush
            }
            LoadState::Work => {
                self.state = LoadState::Drain;
                if self.reports >= ctx.config().load_iterations {
                    log::debug!("load finished after {} reports", self.reports);
                    return Step::Done;
                }
                let scale = i64::from(self.reports);
                for k in 0..i64::from(ctx.config().load_work) {
                    self.accu = black_box(self.accu.wrapping_add(k.wrapping_mul(scale)));
                }
                Step::Yield
            }
        }
    }
}
