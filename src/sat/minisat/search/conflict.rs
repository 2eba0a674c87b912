use crate::sat::formula::assignment::*;
use crate::sat::formula::clause::*;
use crate::sat::formula::{Lit, Var, VarMap};


#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum CCMinMode {
    None,
    Basic,
    Deep,
}

impl Default for CCMinMode {
    fn default() -> Self {
        CCMinMode::Deep
    }
}


#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[repr(u8)]
enum Seen {
    Undef = 0,
    Source = 1,
    Removable = 2,
    Failed = 3,
}


pub enum Conflict {
    Ground,
    Unit(DecisionLevel, Lit),
    Learned(DecisionLevel, Lit, Box<[Lit]>),
}


pub struct AnalyzeContext {
    ccmin_mode: CCMinMode, // Controls conflict clause minimization
    seen: VarMap<Seen>,
    analyze_toclear: Vec<Lit>,
    pub max_literals: u64,
    pub tot_literals: u64,
}

impl AnalyzeContext {
    pub fn new(ccmin_mode: CCMinMode) -> AnalyzeContext {
        AnalyzeContext {
            ccmin_mode,
            seen: VarMap::new(),
            analyze_toclear: Vec::new(),
            max_literals: 0,
            tot_literals: 0,
        }
    }

    pub fn init_var(&mut self, v: Var) {
        self.seen.insert(&v, Seen::Undef);
    }

    // Description:
    //   Analyze conflict and produce a reason clause.
    //
    //   Pre-conditions:
    //     * Current decision level must be greater than root level.
    //
    //   Post-conditions:
    //     * 'out_learnt[0]' is the asserting literal at level 'out_btlevel'.
    //     * If out_learnt.size() > 1 then 'out_learnt[1]' has the greatest decision level of the
    //       rest of literals. There may be others from the same level though.
    //
    pub fn analyze<BV, BC>(
        &mut self,
        assigns: &Assignment,
        ca: &mut ClauseAllocator,
        confl0: ClauseRef,
        mut bump_var: BV,
        mut bump_cla: BC,
    ) -> Conflict
    where
        BV: FnMut(Var),
        BC: FnMut(&mut ClauseAllocator, ClauseRef),
    {
        if assigns.is_ground_level() {
            return Conflict::Ground;
        }

        // Generate conflict clause:
        let mut out_learnt = Vec::new();
        {
            let mut confl = confl0;
            let mut path_c = 0;
            let mut index = assigns.number_of_assigns();
            loop {
                bump_cla(ca, confl);

                let from = if confl == confl0 { 0 } else { 1 };
                for &q in &ca.view(confl).lits()[from..] {
                    let v = q.var();
                    if self.seen[&v] == Seen::Undef {
                        let level = assigns.vardata(q).level;
                        if level > GROUND_LEVEL {
                            self.seen[&v] = Seen::Source;
                            bump_var(v);
                            if level >= assigns.decision_level() {
                                path_c += 1;
                            } else {
                                out_learnt.push(q);
                            }
                        }
                    }
                }

                // Select next clause to look at:
                let pl = loop {
                    index -= 1;
                    let lit = assigns.assign_at(index);
                    if self.seen[&lit.var()] != Seen::Undef {
                        break lit;
                    }
                };

                self.seen[&pl.var()] = Seen::Undef;

                path_c -= 1;
                if path_c <= 0 {
                    out_learnt.insert(0, !pl);
                    break;
                }

                match assigns.vardata(pl).reason {
                    Some(cr) => confl = cr,
                    None => {
                        // Only the decision literal of a level lacks a reason.
                        out_learnt.insert(0, !pl);
                        break;
                    }
                }
            }
        }

        // Simplify conflict clause:
        self.analyze_toclear = out_learnt.clone();
        self.max_literals += out_learnt.len() as u64;
        match self.ccmin_mode {
            CCMinMode::Deep => {
                let head = out_learnt[0];
                let mut kept = vec![head];
                for &l in &out_learnt[1..] {
                    if !self.lit_redundant(ca, assigns, l) {
                        kept.push(l);
                    }
                }
                out_learnt = kept;
            }
            CCMinMode::Basic => {
                let head = out_learnt[0];
                let mut kept = vec![head];
                for &l in &out_learnt[1..] {
                    if !self.lit_redundant_basic(ca, assigns, l) {
                        kept.push(l);
                    }
                }
                out_learnt = kept;
            }
            CCMinMode::None => {}
        }
        self.tot_literals += out_learnt.len() as u64;

        for l in self.analyze_toclear.iter() {
            self.seen[&l.var()] = Seen::Undef; // ('seen[]' is now cleared)
        }

        // Find correct backtrack level:
        if out_learnt.len() == 1 {
            Conflict::Unit(GROUND_LEVEL, out_learnt[0])
        } else {
            // Find the first literal assigned at the next-highest level:
            let mut max_i = 1;
            let mut max_level = assigns.vardata(out_learnt[1]).level;
            for (i, &lit) in out_learnt.iter().enumerate().skip(2) {
                let level = assigns.vardata(lit).level;
                if level > max_level {
                    max_i = i;
                    max_level = level;
                }
            }

            // Swap-in this literal at index 1:
            out_learnt.swap(1, max_i);
            Conflict::Learned(max_level, out_learnt[0], out_learnt.into_boxed_slice())
        }
    }

    fn lit_redundant_basic(&self, ca: &ClauseAllocator, assigns: &Assignment, literal: Lit) -> bool {
        match assigns.vardata(literal).reason {
            None => false,
            Some(cr) => ca.view(cr).lits()[1..].iter().all(|&lit| {
                self.seen[&lit.var()] != Seen::Undef || assigns.vardata(lit).level == GROUND_LEVEL
            }),
        }
    }

    // Check if 'p' can be removed from a conflict clause.
    fn lit_redundant(&mut self, ca: &ClauseAllocator, assigns: &Assignment, literal: Lit) -> bool {
        debug_assert!({
            let s = self.seen[&literal.var()];
            s == Seen::Undef || s == Seen::Source
        });

        let mut analyze_stack = match assigns.vardata(literal).reason {
            None => {
                return false;
            }
            Some(cr) => vec![(literal, &ca.view(cr).lits()[1..])],
        };

        while let Some((p, lits)) = analyze_stack.pop() {
            match lits.split_first() {
                Some((&l, tail)) => {
                    analyze_stack.push((p, tail));
                    let vd = assigns.vardata(l);
                    let seen = self.seen[&l.var()];

                    // Variable at level 0 or previously removable:
                    if vd.level == GROUND_LEVEL || seen == Seen::Source || seen == Seen::Removable {
                        continue;
                    }

                    match vd.reason {
                        // Recursively check 'l':
                        Some(cr) if seen == Seen::Undef => {
                            analyze_stack.push((l, &ca.view(cr).lits()[1..]));
                        }

                        // Check variable can not be removed for some local reason:
                        _ => {
                            for &(l, _) in analyze_stack.iter() {
                                if self.seen[&l.var()] == Seen::Undef {
                                    self.seen[&l.var()] = Seen::Failed;
                                    self.analyze_toclear.push(l);
                                }
                            }
                            return false;
                        }
                    }
                }

                None => {
                    // Finished with current element 'p' and reason 'c':
                    if self.seen[&p.var()] == Seen::Undef {
                        self.seen[&p.var()] = Seen::Removable;
                        self.analyze_toclear.push(p);
                    }
                }
            }
        }

        true
    }
}
