use std::mem;
use crate::sat::formula::{assignment::Assignment, clause::*, Lit, LitVec, Var};


#[derive(Clone, Copy, Debug)]
struct Watcher {
    pub cref: ClauseRef,
    pub blocker: Lit,
}


#[derive(Default, Debug)]
struct WatchesLine {
    watchers: Vec<Watcher>,
    dirty: bool,
}


// 'watches[lit]' is a list of constraints watching 'lit' (will go there if literal becomes true).
pub struct Watches {
    watches: LitVec<WatchesLine>,
    pub propagations: u64,
}

impl Watches {
    pub fn new() -> Self {
        Watches {
            watches: LitVec::new(),
            propagations: 0,
        }
    }

    pub fn init_var(&mut self, v: Var) {
        self.watches.init(v.pos_lit());
        self.watches.init(v.neg_lit());
    }

    pub fn watch_clause(&mut self, c: &Clause, cr: ClauseRef) {
        let (c0, c1) = c.head_pair();
        self.watches[!c0].watchers.push(Watcher { cref: cr, blocker: c1 });
        self.watches[!c1].watchers.push(Watcher { cref: cr, blocker: c0 });
    }

    pub fn unwatch_clause_lazy(&mut self, c: &Clause) {
        let (c0, c1) = c.head_pair();
        self.watches[!c0].dirty = true;
        self.watches[!c1].dirty = true;
    }

    // Description:
    //   Propagates all enqueued facts. If a conflict arises, the conflicting clause is returned,
    //   otherwise None.
    //
    //   Post-conditions:
    //     * the propagation queue is empty, even if there was a conflict.
    pub fn propagate(&mut self, ca: &mut ClauseAllocator, assigns: &mut Assignment) -> Option<ClauseRef> {
        let mut confl = None;
        while let Some(p) = assigns.dequeue() {
            self.propagations += 1;
            let false_lit = !p;

            let mut ws = {
                let line = &mut self.watches[p];
                if line.dirty {
                    line.watchers.retain(|w| !ca.is_deleted(w.cref));
                    line.dirty = false;
                }
                mem::replace(&mut line.watchers, Vec::new())
            };

            let mut head = 0;
            let mut tail = 0;
            while head < ws.len() {
                let pwi = ws[head];
                head += 1;

                if assigns.is_assigned_pos(pwi.blocker) {
                    ws[tail] = pwi;
                    tail += 1;
                    continue;
                }

                let c = ca.edit(pwi.cref);
                if c.head() == false_lit {
                    c.swap(0, 1);
                }

                // If 0th watch is true, then clause is already satisfied.
                let cw = Watcher { cref: pwi.cref, blocker: c.head() };
                if cw.blocker != pwi.blocker && assigns.is_assigned_pos(cw.blocker) {
                    ws[tail] = cw;
                    tail += 1;
                    continue;
                }

                // Look for new watch:
                match c.pull_literal(1, |lit| !assigns.is_assigned_neg(lit)) {
                    Some(lit) => {
                        self.watches[!lit].watchers.push(cw);
                    }

                    // Did not find watch -- clause is unit under assignment:
                    None => {
                        ws[tail] = cw;
                        tail += 1;

                        if assigns.is_assigned_neg(cw.blocker) {
                            assigns.dequeue_all();

                            // Copy the remaining watches:
                            while head < ws.len() {
                                ws[tail] = ws[head];
                                head += 1;
                                tail += 1;
                            }

                            confl = Some(cw.cref);
                        } else {
                            assigns.assign_lit(cw.blocker, Some(cw.cref));
                        }
                    }
                }
            }

            ws.truncate(tail);
            self.watches[p].watchers = ws;
        }

        confl
    }

    pub fn reloc_gc(&mut self, from: &mut ClauseAllocator, to: &mut ClauseAllocator) {
        for line in self.watches.iter_mut() {
            line.dirty = false;
            line.watchers.retain(|w| !from.is_deleted(w.cref));
            for w in line.watchers.iter_mut() {
                if let Some(cr) = from.reloc_to(to, w.cref) {
                    w.cref = cr;
                }
            }
        }
    }
}
