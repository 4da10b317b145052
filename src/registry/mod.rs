//! Hierarchical command registry.
//!
//! Commands are organised in **blocks**: static slices of [`BlockEntry`]
//! values. Index 0 of every block is its title, which also records how many
//! entries follow. The remaining entries are either runnable commands or links
//! to child blocks, so the blocks form a tree rooted at the block handed to
//! [`Registry::new`].
//!
//! ```text
//! ROOT ─┬─ "STM32"            Title(3)
//!       ├─ "sm1 - submenu"    Submenu ──▶ SUB ─┬─ "Submenu 1"  Title(1)
//!       ├─ "led - toggle"     Runnable         └─ "load - ..." Runnable
//!       └─ "cnt - counter"    Runnable
//! ```
//!
//! Parent links are not stored: the dispatcher keeps a navigation stack.
//!
//! # Declaring a tree
//!
//! ```rust
//! use tickshell::registry::{BlockEntry, Registry};
//!
//! fn make() -> u8 {
//!     0
//! }
//!
//! static SUB: [BlockEntry<u8>; 2] = [
//!     BlockEntry::title("Submenu", 1),
//!     BlockEntry::runnable("make - builds a unit", make),
//! ];
//!
//! static ROOT: [BlockEntry<u8>; 3] = [
//!     BlockEntry::title("Device", 2),
//!     BlockEntry::submenu("sub - nested menu", &SUB),
//!     BlockEntry::runnable("make - builds a unit", make),
//! ];
//!
//! let registry = Registry::new(&ROOT).unwrap();
//! assert_eq!(registry.resolve(registry.root(), "sub").unwrap().label, "sub - nested menu");
//! ```

use core::fmt;

use heapless::FnvIndexSet;

use crate::error::Error;


/// Deepest nesting accepted by [`Registry::new`]. Also bounds cycle detection.
pub const MAX_BLOCK_DEPTH: usize = 8;

/// Distinct runnable labels a tree may hold.
///
/// Every label gets a slot in the dispatcher's activation ledger. Must be a
/// power of two (`FnvIndexMap` requirement).
pub const MAX_TRACKED_COMMANDS: usize = 16;

/// A block: a title entry followed by its children.
pub type Block<U> = &'static [BlockEntry<U>];

/// Factory producing a fresh unit in its initial state.
pub type UnitFactory<U> = fn() -> U;

/// What a block entry stands for.
pub enum EntryKind<U: 'static> {
    /// Block title. Holds the number of entries that follow it.
    Title(usize),
    /// A runnable command, created anew at every activation.
    Runnable(UnitFactory<U>),
    /// A link to a child block.
    Submenu(Block<U>),
}

// Manual impls: `U` itself never needs to be `Clone` or `Debug`.
impl<U: 'static> Clone for EntryKind<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: 'static> Copy for EntryKind<U> {}

impl<U: 'static> fmt::Debug for EntryKind<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Title(count) => f.debug_tuple("Title").field(count).finish(),
            EntryKind::Runnable(_) => f.write_str("Runnable"),
            EntryKind::Submenu(block) => f
                .debug_tuple("Submenu")
                .field(&block.first().map(|entry| entry.label))
                .finish(),
        }
    }
}

/// One row of a block.
pub struct BlockEntry<U: 'static> {
    /// Menu text. Its first word is the keyword typed by the user; for a
    /// title entry it is the block name shown in the prompt.
    pub label: &'static str,
    /// Title, runnable command or submenu link.
    pub kind: EntryKind<U>,
}

impl<U: 'static> BlockEntry<U> {
    /// Title entry announcing `count` following entries.
    pub const fn title(label: &'static str, count: usize) -> Self {
        Self {
            label,
            kind: EntryKind::Title(count),
        }
    }

    /// Runnable entry.
    pub const fn runnable(label: &'static str, factory: UnitFactory<U>) -> Self {
        Self {
            label,
            kind: EntryKind::Runnable(factory),
        }
    }

    /// Submenu entry linking to `block`.
    pub const fn submenu(label: &'static str, block: Block<U>) -> Self {
        Self {
            label,
            kind: EntryKind::Submenu(block),
        }
    }

    /// The keyword this entry answers to.
    pub fn keyword(&self) -> &'static str {
        keyword(self.label)
    }
}

impl<U: 'static> fmt::Debug for BlockEntry<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockEntry")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .finish()
    }
}

/// First space-delimited word of a label.
pub fn keyword(label: &str) -> &str {
    label.split(' ').next().unwrap_or("")
}

/// Title of a block, or an empty string for an empty slice.
pub fn title<U: 'static>(block: Block<U>) -> &'static str {
    block.first().map(|entry| entry.label).unwrap_or("")
}

/// The block a submenu entry links to. `None` for any other kind of entry.
pub fn child_block_of<U: 'static>(entry: &BlockEntry<U>) -> Option<Block<U>> {
    match entry.kind {
        EntryKind::Submenu(block) => Some(block),
        _ => None,
    }
}

/// A validated block tree.
pub struct Registry<U: 'static> {
    root: Block<U>,
}

impl<U: 'static> Clone for Registry<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: 'static> Copy for Registry<U> {}

impl<U: 'static> fmt::Debug for Registry<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("root", &title(self.root))
            .finish()
    }
}

impl<U: 'static> Registry<U> {
    /// Validate the tree rooted at `root` and wrap it.
    ///
    /// # Returns
    ///
    /// * `Ok(registry)` - Every block is well formed
    /// * `Err(Error::RegistryConfiguration)` - A block is empty, does not start
    ///   with a title, carries a second title, declares a child count that
    ///   differs from its actual length, the tree nests deeper than
    ///   [`MAX_BLOCK_DEPTH`], or it holds more than [`MAX_TRACKED_COMMANDS`]
    ///   distinct runnable labels
    pub fn new(root: Block<U>) -> Result<Self, Error> {
        validate_block(root, 0)?;

        let mut labels = FnvIndexSet::<&'static str, MAX_TRACKED_COMMANDS>::new();
        let mut overflow = None;
        walk_runnables(root, &mut |label| {
            if overflow.is_none() && labels.insert(label).is_err() {
                overflow = Some(label);
            }
        });
        if let Some(label) = overflow {
            log::error!(
                "'{}' exceeds the limit of {} distinct commands",
                label,
                MAX_TRACKED_COMMANDS
            );
            return Err(Error::RegistryConfiguration);
        }

        Ok(Self { root })
    }

    /// Call `f` with the label of every runnable entry in the tree.
    ///
    /// Blocks reachable through several submenus are visited once per path,
    /// so a label may be reported more than once.
    pub fn for_each_runnable(&self, mut f: impl FnMut(&'static str)) {
        walk_runnables(self.root, &mut f);
    }

    /// The root block.
    pub fn root(&self) -> Block<U> {
        self.root
    }

    /// Find the entry of `block` whose keyword equals `token`.
    ///
    /// Matching is case-sensitive and the title entry never matches. When
    /// several entries share a keyword the first one wins.
    pub fn resolve(&self, block: Block<U>, token: &str) -> Result<&'static BlockEntry<U>, Error> {
        block
            .iter()
            .skip(1)
            .find(|entry| entry.keyword() == token)
            .ok_or(Error::CommandNotFound)
    }

    /// Prompt label for `current`: the root title, plus the current block's
    /// title when nested.
    pub fn prompt_label(&self, current: Block<U>) -> PromptLabel {
        let nested = !core::ptr::eq(current, self.root);
        PromptLabel {
            root: title(self.root),
            current: nested.then(|| title(current)),
        }
    }
}

/// Displayable prompt label as produced by [`Registry::prompt_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptLabel {
    root: &'static str,
    current: Option<&'static str>,
}

impl fmt::Display for PromptLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root)?;
        if let Some(current) = self.current {
            write!(f, "/{current}")?;
        }
        Ok(())
    }
}

fn walk_runnables<U: 'static>(block: Block<U>, f: &mut impl FnMut(&'static str)) {
    for entry in block.iter().skip(1) {
        match entry.kind {
            EntryKind::Runnable(_) => f(entry.label),
            EntryKind::Submenu(child) => walk_runnables(child, f),
            EntryKind::Title(_) => {}
        }
    }
}

fn validate_block<U: 'static>(block: Block<U>, depth: usize) -> Result<(), Error> {
    if depth >= MAX_BLOCK_DEPTH {
        log::error!("block nesting exceeds {}", MAX_BLOCK_DEPTH);
        return Err(Error::RegistryConfiguration);
    }

    let Some((head, children)) = block.split_first() else {
        log::error!("empty block");
        return Err(Error::RegistryConfiguration);
    };

    match head.kind {
        EntryKind::Title(count) if count == children.len() => {}
        EntryKind::Title(count) => {
            log::error!(
                "block '{}' declares {} entries but has {}",
                head.label,
                count,
                children.len()
            );
            return Err(Error::RegistryConfiguration);
        }
        _ => {
            log::error!("block starting with '{}' has no title", head.label);
            return Err(Error::RegistryConfiguration);
        }
    }

    for entry in children {
        match entry.kind {
            EntryKind::Title(_) => {
                log::error!("misplaced title '{}' in block '{}'", entry.label, head.label);
                return Err(Error::RegistryConfiguration);
            }
            EntryKind::Submenu(child) => validate_block(child, depth + 1)?,
            EntryKind::Runnable(_) => {}
        }
    }

    Ok(())
}
