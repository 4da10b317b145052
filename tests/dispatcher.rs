mod common;

use common::*;
use tickshell::command::{Command, Context, Step};
use tickshell::commands::Builtin;
use tickshell::config::EngineConfig;
use tickshell::demo::ROOT_BLOCK;
use tickshell::io::NoActuator;
use tickshell::registry::BlockEntry;
use tickshell::system::shell::PROMPT_CAPACITY;
use tickshell::{Dispatcher, Error, Selection, Tick};

static MISCOUNTED: [BlockEntry<Builtin>; 2] = [
    BlockEntry::title("Broken", 3),
    BlockEntry::runnable("led - toggles the LED", Builtin::toggle),
];

static CROWDED: [BlockEntry<Builtin>; 17] = [
    BlockEntry::title("Board", 16),
    BlockEntry::runnable("a0 - toggle", Builtin::toggle),
    BlockEntry::runnable("a1 - toggle", Builtin::toggle),
    BlockEntry::runnable("a2 - toggle", Builtin::toggle),
    BlockEntry::runnable("a3 - toggle", Builtin::toggle),
    BlockEntry::runnable("a4 - toggle", Builtin::toggle),
    BlockEntry::runnable("a5 - toggle", Builtin::toggle),
    BlockEntry::runnable("a6 - toggle", Builtin::toggle),
    BlockEntry::runnable("a7 - toggle", Builtin::toggle),
    BlockEntry::runnable("a8 - toggle", Builtin::toggle),
    BlockEntry::runnable("a9 - toggle", Builtin::toggle),
    BlockEntry::runnable("a10 - toggle", Builtin::toggle),
    BlockEntry::runnable("a11 - toggle", Builtin::toggle),
    BlockEntry::runnable("a12 - toggle", Builtin::toggle),
    BlockEntry::runnable("a13 - toggle", Builtin::toggle),
    BlockEntry::runnable("a14 - toggle", Builtin::toggle),
    BlockEntry::runnable("cnt - displays its own call count", Builtin::count),
];

static OVERCROWDED: [BlockEntry<Builtin>; 3] = [
    BlockEntry::title("Board", 2),
    BlockEntry::submenu("more - sixteen commands", &CROWDED),
    BlockEntry::runnable("a15 - toggle", Builtin::toggle),
];

static LONG_TITLE: [BlockEntry<Builtin>; 2] = [
    BlockEntry::title("ABCDEFGHIJABCDEFGHIJABCDEFGHIJABCDEFGHIJABCDEFGHIJABCDEFGHIJAB", 1),
    BlockEntry::runnable("led - toggles the LED", Builtin::toggle),
];

/// Requests a flush without writing anything, then finishes.
#[derive(Debug)]
struct Silent {
    flushed: bool,
}

fn silent() -> Silent {
    Silent { flushed: false }
}

impl<H> Command<H> for Silent {
    fn step(&mut self, _ctx: &mut Context<'_, H>) -> Step {
        if self.flushed {
            return Step::Done;
        }
        self.flushed = true;
        Step::Flush
    }
}

static SILENT_BLOCK: [BlockEntry<Silent>; 2] = [
    BlockEntry::title("Quiet", 1),
    BlockEntry::runnable("hush - flushes nothing", silent),
];

#[test]
fn test_first_tick_prints_prompt() {
    let mut shell = Dispatcher::new(&ROOT_BLOCK, RecordingLed::default(), MockTransport::new())
        .unwrap();
    assert!(!shell.is_idle());
    assert_eq!(shell.tick().unwrap(), Tick::Prompted);
    assert_eq!(shell.transport().written, "\r\nSTM32> ");
    assert!(shell.is_idle());
    assert_eq!(shell.tick().unwrap(), Tick::Idle);
}

#[test]
fn test_rejects_misconfigured_registry() {
    let result = Dispatcher::new(&MISCOUNTED, RecordingLed::default(), MockTransport::new());
    assert_eq!(result.unwrap_err(), Error::RegistryConfiguration);
}

#[test]
fn test_single_flight() {
    let mut shell = demo_shell();
    shell.submit("flash 3").unwrap();
    shell.tick().unwrap();

    assert_eq!(shell.submit("cnt"), Err(Error::ReentrantActivation));
    assert_eq!(shell.submit("sm1"), Err(Error::ReentrantActivation));
    assert_eq!(
        shell.active_label(),
        Some("flash N - flash the LED 'N' times")
    );
    assert_eq!(shell.activations("cnt - displays its own call count"), 0);

    run_to_idle(&mut shell);
    assert!(!shell.is_active());
    assert!(shell.submit("cnt").is_ok());
}

#[test]
fn test_at_most_one_unit_every_tick() {
    let mut shell = demo_shell();
    for line in ["flash 2", "cnt", "load", "led"] {
        shell.submit(line).unwrap();
        while !shell.is_idle() {
            shell.tick().unwrap();
            shell.transport_mut().complete();
            if shell.is_active() {
                assert_eq!(shell.submit("led"), Err(Error::ReentrantActivation));
            }
        }
    }
}

#[test]
fn test_unknown_command_reports_and_keeps_state() {
    let mut shell = demo_shell();
    assert_eq!(shell.submit("reboot now"), Err(Error::CommandNotFound));
    assert!(!shell.is_active());
    assert_eq!(shell.depth(), 0);

    // The notice is still pending.
    assert_eq!(shell.submit("cnt"), Err(Error::NotReady));

    run_to_idle(&mut shell);
    assert_eq!(
        shell.transport_mut().take(),
        "\r\nCommand not found\r\nSTM32> "
    );
}

#[test]
fn test_keywords_are_case_sensitive() {
    let mut shell = demo_shell();
    assert_eq!(shell.submit("CNT"), Err(Error::CommandNotFound));
    run_to_idle(&mut shell);
    assert_eq!(shell.submit("Led"), Err(Error::CommandNotFound));
}

#[test]
fn test_blank_line_reprompts() {
    let mut shell = demo_shell();
    assert_eq!(shell.submit("   "), Ok(Selection::Empty));
    assert_eq!(shell.tick().unwrap(), Tick::Prompted);
    assert_eq!(shell.transport_mut().take(), "\r\nSTM32> ");
}

#[test]
fn test_overlong_line_is_rejected() {
    let mut shell = demo_shell();
    let line = format!("flash {}", "1".repeat(200));
    assert_eq!(shell.submit(&line), Err(Error::LineTooLong));
    assert!(!shell.is_active());
    assert!(shell.is_idle());
}

#[test]
fn test_busy_transport_blocks_output() {
    let mut shell = demo_shell();
    let baseline = shell.transport().writes;
    shell.transport_mut().busy = true;
    shell.submit("cnt").unwrap();

    // The unit cannot fill the buffer while busy, so it keeps yielding.
    for _ in 0..3 {
        assert_eq!(shell.tick().unwrap(), Tick::Stepped);
    }
    assert_eq!(shell.transport().writes, baseline);

    shell.transport_mut().complete();
    assert_eq!(shell.tick().unwrap(), Tick::Stepped); // buffer filled, flush requested

    shell.transport_mut().busy = true;
    assert_eq!(shell.tick().unwrap(), Tick::Waiting);
    assert_eq!(shell.tick().unwrap(), Tick::Waiting);
    assert_eq!(shell.transport().writes, baseline);

    shell.transport_mut().complete();
    assert_eq!(shell.tick().unwrap(), Tick::Flushed);
    assert_eq!(shell.transport().written, "\r\nCalled 0 times");
}

#[test]
fn test_prompt_waits_for_transport() {
    let mut shell = demo_shell_with(MockTransport::dma());
    shell.submit("led").unwrap();
    shell.transport_mut().busy = true;

    assert_eq!(shell.tick().unwrap(), Tick::Completed);
    assert_eq!(shell.tick().unwrap(), Tick::Waiting);
    assert!(!shell.is_idle());

    shell.transport_mut().complete();
    assert_eq!(shell.tick().unwrap(), Tick::Prompted);
    assert!(shell.is_idle());
}

#[test]
fn test_transport_error_is_reported_and_skipped() {
    let mut shell = demo_shell();
    shell.submit("cnt").unwrap();
    shell.tick().unwrap();

    shell.transport_mut().fail = true;
    assert_eq!(shell.tick(), Err(Error::Transport));

    shell.transport_mut().fail = false;
    run_to_idle(&mut shell);
    assert_eq!(shell.transport_mut().take(), "\r\nSTM32> ");
}

#[test]
fn test_cancel_turns_actuator_off() {
    let config = EngineConfig::new().with_flash_delay_ticks(1_000);
    let mut shell = demo_shell().with_config(config);

    assert!(!shell.cancel());

    shell.submit("flash 5").unwrap();
    shell.tick().unwrap();
    shell.tick().unwrap();
    shell.tick().unwrap();
    assert!(shell.hardware().on);

    assert!(shell.cancel());
    assert!(!shell.is_active());
    assert!(!shell.hardware().on);

    assert_eq!(shell.tick().unwrap(), Tick::Prompted);
    assert!(shell.is_idle());
}

#[test]
fn test_config_from_json() {
    let config = EngineConfig::from_json(r#"{"flash_delay_ticks": 1}"#).unwrap();
    let mut shell = demo_shell().with_config(config);
    assert_eq!(shell.config().flash_delay_ticks, 1);

    shell.submit("flash 1").unwrap();
    // Parse, On, HoldOn, Off, HoldOff, Next
    let mut ticks = 0;
    while shell.is_active() {
        shell.tick().unwrap();
        ticks += 1;
    }
    assert_eq!(ticks, 6);
}

#[test]
fn test_run_until_idle_is_bounded() {
    let mut shell = demo_shell();
    shell.submit("flash 10").unwrap();
    assert_eq!(shell.run_until_idle(5).unwrap(), 5);
    assert!(shell.is_active());

    shell.run_until_idle(10_000).unwrap();
    assert!(shell.is_idle());
}

#[test]
fn test_cnt_counts_with_full_ledger() {
    let mut shell = Dispatcher::new(&CROWDED, RecordingLed::default(), MockTransport::new())
        .unwrap();
    shell.run_until_idle(10).unwrap();

    for n in 0..15 {
        run_line(&mut shell, &format!("a{n}"));
    }
    for expected in 0..3 {
        assert_eq!(
            run_line(&mut shell, "cnt"),
            format!("\r\nCalled {expected} times\r\nBoard> ")
        );
    }
    assert_eq!(shell.activations("a14 - toggle"), 1);
}

#[test]
fn test_rejects_too_many_commands() {
    let result = Dispatcher::new(&OVERCROWDED, RecordingLed::default(), MockTransport::new());
    assert_eq!(result.unwrap_err(), Error::RegistryConfiguration);
}

#[test]
fn test_long_title_keeps_prompt_suffix() {
    let shell = Dispatcher::new(&LONG_TITLE, RecordingLed::default(), MockTransport::new())
        .unwrap();
    let prompt = shell.prompt();
    assert!(prompt.ends_with("> "), "{prompt:?}");
    assert!(prompt.starts_with("\r\nABCDEFGHIJ"));
    assert_eq!(prompt.len(), PROMPT_CAPACITY);
}

#[test]
fn test_empty_flush_writes_nothing() {
    let mut shell = Dispatcher::new(&SILENT_BLOCK, NoActuator, MockTransport::new()).unwrap();
    shell.run_until_idle(10).unwrap();
    let writes = shell.transport().writes;

    shell.submit("hush").unwrap();
    assert_eq!(shell.tick().unwrap(), Tick::Stepped);
    assert_eq!(shell.tick().unwrap(), Tick::Completed);
    assert_eq!(shell.transport().writes, writes);
    assert_eq!(shell.tick().unwrap(), Tick::Prompted);
}

#[test]
fn test_registry_and_hardware_access() {
    let mut shell = demo_shell();
    assert!(std::ptr::eq(shell.registry().root(), &ROOT_BLOCK[..]));

    shell.hardware_mut().on = true;
    run_line(&mut shell, "led");
    assert_eq!(shell.hardware().events, vec![false]);
}
