//! Demonstration command tree.
//!
//! Mirrors the menu shipped with the reference firmware: a root block named
//! after the board with the four built-in commands and two levels of
//! submenus used to exercise navigation. Applications declare their own
//! `ROOT_BLOCK` the same way.

use crate::commands::Builtin;
use crate::registry::BlockEntry;

/// Innermost submenu.
pub static LEVEL_2_BLOCK: [BlockEntry<Builtin>; 3] = [
    BlockEntry::title("Submenu 2", 2),
    BlockEntry::runnable("load - performance test", Builtin::load),
    BlockEntry::runnable("load - performance test", Builtin::load),
];

/// First-level submenu.
pub static LEVEL_1_BLOCK: [BlockEntry<Builtin>; 4] = [
    BlockEntry::title("Submenu 1", 3),
    BlockEntry::runnable("load - performance test", Builtin::load),
    BlockEntry::runnable("load - performance test", Builtin::load),
    BlockEntry::submenu("sm2 - nested submenu example", &LEVEL_2_BLOCK),
];

/// Root block. Its title is the prompt prefix.
pub static ROOT_BLOCK: [BlockEntry<Builtin>; 6] = [
    BlockEntry::title("STM32", 5),
    BlockEntry::submenu("sm1 - submenu example", &LEVEL_1_BLOCK),
    BlockEntry::runnable("led - toggles the blue LED", Builtin::toggle),
    BlockEntry::runnable("flash N - flash the LED 'N' times", Builtin::flash),
    BlockEntry::runnable("cnt - displays its own call count", Builtin::count),
    BlockEntry::runnable("load - performance test", Builtin::load),
];
