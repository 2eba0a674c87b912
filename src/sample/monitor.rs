use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};


/// Progress sink and cancellation source of a sampling run.
pub trait Monitor {
    fn set_remaining_work(&mut self, work: usize);

    fn worked(&mut self, work: usize);

    fn step(&mut self) {
        self.worked(1);
    }

    fn is_cancelled(&self) -> bool;

    /// Flag the solver polls during long searches, if the monitor has one.
    fn interrupt_flag(&self) -> Option<Arc<AtomicBool>> {
        None
    }
}


/// Cloneable cancellation handle; all clones share one flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn flag(&self) -> Arc<AtomicBool> {
        self.0.clone()
    }
}


pub struct NullMonitor;

impl Monitor for NullMonitor {
    fn set_remaining_work(&mut self, _: usize) {}

    fn worked(&mut self, _: usize) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}


/// Reports progress through the log every tenth of the expected work.
pub struct LogMonitor {
    token: CancelToken,
    total: usize,
    done: usize,
    next_report: usize,
}

impl LogMonitor {
    pub fn new(token: CancelToken) -> Self {
        LogMonitor {
            token,
            total: 0,
            done: 0,
            next_report: 0,
        }
    }

    pub fn done(&self) -> usize {
        self.done
    }
}

impl Monitor for LogMonitor {
    fn set_remaining_work(&mut self, work: usize) {
        self.total = self.done + work;
        self.next_report = self.done + (work / 10).max(1);
        debug!("expecting {} units of work", work);
    }

    fn worked(&mut self, work: usize) {
        self.done += work;
        if self.done >= self.next_report {
            info!("| progress: {:8} / {:8} |", self.done, self.total);
            self.next_report = self.done + (self.total / 10).max(1);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn interrupt_flag(&self) -> Option<Arc<AtomicBool>> {
        Some(self.token.flag())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let token = CancelToken::new();
        let monitor = LogMonitor::new(token.clone());
        assert!(!monitor.is_cancelled());
        token.cancel();
        assert!(monitor.is_cancelled());
        assert!(monitor.interrupt_flag().unwrap().load(Ordering::Relaxed));
    }

    #[test]
    fn counts_steps() {
        let mut monitor = LogMonitor::new(CancelToken::new());
        monitor.set_remaining_work(3);
        monitor.step();
        monitor.step();
        assert_eq!(monitor.done(), 2);
    }
}
