use std::{cmp, fmt};
use super::{Lit, Var};
use super::clause::{ClauseAllocator, ClauseRef};


#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct DecisionLevel(usize);

pub const GROUND_LEVEL: DecisionLevel = DecisionLevel(0);

impl DecisionLevel {
    pub fn offset(&self) -> usize {
        self.0
    }
}


#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[repr(u8)]
pub enum LitVal {
    Undef,
    False,
    True,
}


#[derive(Clone, Copy, Debug)]
pub struct VarData {
    pub reason: Option<ClauseRef>,
    pub level: DecisionLevel,
}


struct VarLine {
    assign: [LitVal; 2],
    vd: VarData,
}


/// Trail of assigned literals split into decision levels, plus the
/// propagation queue head.
pub struct Assignment {
    assignment: Vec<VarLine>,
    trail: Vec<Lit>,
    lim: Vec<usize>,
    qhead: usize,
}

impl Assignment {
    pub fn new() -> Assignment {
        Assignment {
            assignment: Vec::new(),
            trail: Vec::new(),
            lim: Vec::new(),
            qhead: 0,
        }
    }


    #[inline]
    pub fn number_of_vars(&self) -> usize {
        self.assignment.len()
    }

    #[inline]
    pub fn number_of_assigns(&self) -> usize {
        self.trail.len()
    }

    #[inline]
    pub fn number_of_ground_assigns(&self) -> usize {
        match self.lim.first() {
            Some(&lim) => lim,
            None => self.trail.len(),
        }
    }


    pub fn new_var(&mut self) -> Var {
        self.assignment.push(VarLine {
            assign: [LitVal::Undef, LitVal::Undef],
            vd: VarData {
                reason: None,
                level: GROUND_LEVEL,
            },
        });
        Var::from_index(self.assignment.len() - 1)
    }


    #[inline]
    pub fn decision_level(&self) -> DecisionLevel {
        DecisionLevel(self.lim.len())
    }

    #[inline]
    pub fn is_ground_level(&self) -> bool {
        self.lim.is_empty()
    }

    #[inline]
    pub fn new_decision_level(&mut self) {
        self.lim.push(self.trail.len());
    }


    #[inline]
    pub fn assign_lit(&mut self, lit: Lit, reason: Option<ClauseRef>) {
        let level = DecisionLevel(self.lim.len());
        let line = &mut self.assignment[lit.var_index()];

        debug_assert!(line.assign[0] == LitVal::Undef);
        line.assign[lit.sign_index()] = LitVal::True;
        line.assign[lit.sign_index() ^ 1] = LitVal::False;
        line.vd.level = level;
        line.vd.reason = reason;
        self.trail.push(lit);
    }

    /// Undoes every level above `target_level`; `f` sees each removed literal
    /// together with the level it was removed from.
    pub fn rewind_until_level<F: FnMut(DecisionLevel, Lit)>(&mut self, DecisionLevel(target_level): DecisionLevel, mut f: F) {
        while self.lim.len() > target_level {
            let level = DecisionLevel(self.lim.len());
            let bottom = self.lim.pop().unwrap_or(0);
            while self.trail.len() > bottom {
                if let Some(lit) = self.trail.pop() {
                    f(level, lit);

                    let line = &mut self.assignment[lit.var_index()];
                    line.assign = [LitVal::Undef, LitVal::Undef];
                    line.vd.reason = None;
                }
            }
        }

        self.qhead = cmp::min(self.qhead, self.trail.len());
    }

    #[inline]
    pub fn dequeue_all(&mut self) {
        self.qhead = self.trail.len()
    }

    #[inline]
    pub fn dequeue(&mut self) -> Option<Lit> {
        if self.qhead < self.trail.len() {
            let p = self.trail[self.qhead];
            self.qhead += 1;
            Some(p)
        } else {
            None
        }
    }

    #[inline]
    pub fn assign_at(&self, index: usize) -> Lit {
        self.trail[index]
    }


    #[inline]
    pub fn is_undef(&self, var: Var) -> bool {
        self.assignment[var.index()].assign[0] == LitVal::Undef
    }

    #[inline]
    pub fn is_assigned_pos(&self, p: Lit) -> bool {
        self.of_lit(p) == LitVal::True
    }

    #[inline]
    pub fn is_assigned_neg(&self, p: Lit) -> bool {
        self.of_lit(p) == LitVal::False
    }

    #[inline]
    pub fn of_lit(&self, lit: Lit) -> LitVal {
        self.assignment[lit.var_index()].assign[lit.sign_index()]
    }

    #[inline]
    pub fn vardata(&self, lit: Lit) -> &VarData {
        &self.assignment[lit.var_index()].vd
    }

    pub fn is_reason_for(&self, cr: ClauseRef, lit: Lit) -> bool {
        let line = &self.assignment[lit.var_index()];
        line.assign[lit.sign_index()] == LitVal::True && line.vd.reason == Some(cr)
    }


    pub fn reloc_gc(&mut self, from: &mut ClauseAllocator, to: &mut ClauseAllocator) {
        for lit in self.trail.iter() {
            let reason = &mut self.assignment[lit.var_index()].vd.reason;
            *reason = reason.and_then(|cr| from.reloc_to(to, cr));
        }
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for level in 0..1 + self.lim.len() {
            let l = if level > 0 { self.lim[level - 1] } else { 0 };
            let r = if level < self.lim.len() {
                self.lim[level]
            } else {
                self.trail.len()
            };

            if r > l {
                write!(f, "[{}:", level)?;
                for lit in self.trail[l..r].iter() {
                    write!(f, " {:?}", lit)?;
                }
                write!(f, " ]")?;
            }
        }

        Ok(())
    }
}


pub fn progress_estimate(assigns: &Assignment) -> f64 {
    if assigns.number_of_vars() == 0 {
        return 1.0;
    }

    let f = 1.0 / (assigns.number_of_vars() as f64);
    let mut progress = 0.0;

    let cl = assigns.lim.len();
    for level in 0..cl + 1 {
        let l = if level == 0 { 0 } else { assigns.lim[level - 1] };
        let r = if level == cl {
            assigns.trail.len()
        } else {
            assigns.lim[level]
        };
        progress += f.powi(level as i32) * ((r - l) as f64);
    }
    progress * f
}


/// Current value of every assigned variable, in variable order.
pub fn extract_model(assigns: &Assignment) -> Vec<Lit> {
    let mut model = Vec::with_capacity(assigns.assignment.len());
    for (i, line) in assigns.assignment.iter().enumerate() {
        let v = Var::from_index(i);
        match line.assign[0] {
            LitVal::Undef => {}
            LitVal::False => {
                model.push(v.neg_lit());
            }
            LitVal::True => {
                model.push(v.pos_lit());
            }
        }
    }
    model
}
