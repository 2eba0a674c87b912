use std::sync::{atomic, Arc};


// Resource contraints:
pub struct Budget {
    conflict_budget: i64,    // -1 means no budget.
    propagation_budget: i64, // -1 means no budget.
    asynch_interrupt: Arc<atomic::AtomicBool>,
}

impl Default for Budget {
    fn default() -> Self {
        Budget::new()
    }
}

impl Budget {
    pub fn new() -> Budget {
        Budget {
            conflict_budget: -1,
            propagation_budget: -1,
            asynch_interrupt: Arc::new(atomic::AtomicBool::new(false)),
        }
    }

    /// Budget whose interrupt flag is shared with the caller.
    pub fn with_interrupt(flag: Arc<atomic::AtomicBool>) -> Budget {
        Budget {
            asynch_interrupt: flag,
            ..Budget::new()
        }
    }

    pub fn within(&self, conflicts: u64, propagations: u64) -> bool {
        !self.interrupted()
            && (self.conflict_budget < 0 || conflicts < self.conflict_budget as u64)
            && (self.propagation_budget < 0 || propagations < self.propagation_budget as u64)
    }

    pub fn interrupted(&self) -> bool {
        self.asynch_interrupt.load(atomic::Ordering::Relaxed)
    }

    /// Conflicts allowed per solve call; budgets are relative to the
    /// counters at the start of the call.
    pub fn set_conflict_budget(&mut self, conflicts: Option<u64>) {
        self.conflict_budget = conflicts.map_or(-1, |x| x as i64);
    }

    pub fn set_propagation_budget(&mut self, propagations: Option<u64>) {
        self.propagation_budget = propagations.map_or(-1, |x| x as i64);
    }

    pub fn off(&mut self) {
        self.conflict_budget = -1;
        self.propagation_budget = -1;
    }
}
