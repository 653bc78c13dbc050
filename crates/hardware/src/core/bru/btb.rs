//! Branch Target Buffer.
//!
//! Direct-mapped cache from branch PC to the last observed target address.

use crate::common::Addr;

/// Direct-mapped branch target buffer.
pub struct Btb {
    entries: Vec<Option<(Addr, Addr)>>,
}

impl Btb {
    /// Creates a BTB with `size` entries (rounded up to at least one).
    pub fn new(size: usize) -> Self {
        Self {
            entries: vec![None; size.max(1)],
        }
    }

    fn index(&self, pc: Addr) -> usize {
        ((pc >> 2) as usize) % self.entries.len()
    }

    /// Returns the recorded target for `pc`, if the entry matches.
    pub fn lookup(&self, pc: Addr) -> Option<Addr> {
        match self.entries[self.index(pc)] {
            Some((tag, target)) if tag == pc => Some(target),
            _ => None,
        }
    }

    /// Records `target` for `pc`, evicting whatever shared the slot.
    pub fn update(&mut self, pc: Addr, target: Addr) {
        let idx = self.index(pc);
        self.entries[idx] = Some((pc, target));
    }
}
