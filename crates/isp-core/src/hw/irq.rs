//! Ordered interrupt dispatch table.
//!
//! Each entry pairs a predicate over the raw status word with a handler.
//! Entries run in declaration order and several may fire for one status
//! word, so combined conditions (start and end in one word) are expressed as
//! their own entry ahead of the single-bit ones.

/// When an entry fires.
#[derive(Debug, Clone, Copy)]
pub enum IrqMatch {
    /// Any of the bits is set.
    Any(u32),
    /// All of the bits are set.
    All(u32),
    Custom(fn(u32) -> bool),
}

impl IrqMatch {
    pub fn matches(&self, status: u32) -> bool {
        match *self {
            Self::Any(mask) => status & mask != 0,
            Self::All(mask) => mask != 0 && status & mask == mask,
            Self::Custom(pred) => pred(status),
        }
    }
}

pub struct IrqEntry<C> {
    pub name: &'static str,
    pub when: IrqMatch,
    pub handler: fn(&C, u32),
}

impl<C> Clone for IrqEntry<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for IrqEntry<C> {}

/// Fixed-capacity table of up to `N` entries.
pub struct InterruptDispatcher<C, const N: usize> {
    entries: heapless::Vec<IrqEntry<C>, N>,
}

impl<C, const N: usize> Default for InterruptDispatcher<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, const N: usize> InterruptDispatcher<C, N> {
    pub fn new() -> Self {
        Self {
            entries: heapless::Vec::new(),
        }
    }

    /// Build a table from `entries`, dropping any beyond capacity.
    pub fn from_entries(entries: &[IrqEntry<C>]) -> Self {
        let mut table = Self::new();
        for entry in entries {
            if table.push(*entry).is_err() {
                break;
            }
        }
        table
    }

    pub fn push(&mut self, entry: IrqEntry<C>) -> Result<(), IrqEntry<C>> {
        self.entries.push(entry)
    }

    /// Run every entry matching `status & enabled`. Returns how many fired.
    pub fn dispatch(&self, ctx: &C, status: u32, enabled: u32) -> usize {
        let status = status & enabled;
        let mut fired = 0;
        for entry in &self.entries {
            if entry.when.matches(status) {
                (entry.handler)(ctx, status);
                fired += 1;
            }
        }
        fired
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }
}
