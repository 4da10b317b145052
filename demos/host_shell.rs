//! Interactive host demo: runs the demonstration menu on stdin/stdout.
//!
//! ```text
//! cargo run --example host_shell --features std
//! ```
//!
//! The "LED" is printed as a state change on stderr. Output is written
//! straight to stdout, so the transport is never busy.

use std::io::{self, BufRead, Write};

use tickshell::config::EngineConfig;
use tickshell::demo::ROOT_BLOCK;
use tickshell::io::{Actuator, Transport};
use tickshell::{Dispatcher, Error};

struct Stdout;

impl Transport for Stdout {
    type Error = io::Error;

    fn busy(&self) -> bool {
        false
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }
}

#[derive(Default)]
struct ConsoleLed {
    on: bool,
}

impl Actuator for ConsoleLed {
    fn set(&mut self, on: bool) {
        self.on = on;
        eprintln!("[led {}]", if on { "on" } else { "off" });
    }

    fn toggle(&mut self) {
        let on = !self.on;
        self.set(on);
    }
}

fn main() -> Result<(), Error> {
    let config = std::env::var("TICKSHELL_CONFIG")
        .ok()
        .map(|json| EngineConfig::from_json(&json))
        .transpose()?
        .unwrap_or_else(|| EngineConfig::new().with_flash_delay_ticks(200_000));

    let mut shell = Dispatcher::new(&ROOT_BLOCK, ConsoleLed::default(), Stdout)?.with_config(config);
    shell.run_until_idle(usize::MAX)?;

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if let Err(err) = shell.submit(&line) {
            eprintln!("[{err}]");
        }
        shell.run_until_idle(usize::MAX)?;
    }
    println!();
    Ok(())
}
