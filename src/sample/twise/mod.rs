//! Covering arrays: every feasible combination of `t` expressions ends up in
//! some configuration.

use std::collections::VecDeque;
use crate::cnf::{Cnf, LiteralSet};
use crate::error::{Error, Result};
use crate::sat::Solver;
use super::{Completion, Solved, Step, StepContext, Strategy};
use self::combinations::{consistent_total, Cursor};

pub mod combinations;


/// Order in which working configurations are tried for extension.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ExtensionPolicy {
    /// Oldest configuration first.
    FirstFit,
    /// Newest configuration first.
    LastFit,
    /// Fresh order per combination, drawn from the run's seed.
    Shuffled,
}

impl Default for ExtensionPolicy {
    fn default() -> Self {
        ExtensionPolicy::Shuffled
    }
}


#[derive(Clone, Debug)]
pub struct TWiseSettings {
    pub t: usize,
    pub policy: ExtensionPolicy,
    /// Expressions to combine, per group. `None` is one group holding every
    /// literal: `+1, -1, +2, -2, ...`.
    pub groups: Option<Vec<Vec<LiteralSet>>>,
}


/// Candidate counts of a covering run.
///
/// A run stopped by the size limit counts the candidates it never reached
/// without solving them: `uncovered` then also holds combinations that may
/// be infeasible. For groups of compound expressions the unreached part is
/// bounded rather than counted, so `candidates` and `uncovered` are upper
/// bounds there.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Coverage {
    pub candidates: usize,
    pub covered: usize,
    pub infeasible: usize,
    pub uncovered: usize,
}

impl Coverage {
    /// Covered share of the feasible candidates.
    pub fn ratio(&self) -> f64 {
        let feasible = self.candidates - self.infeasible;
        if feasible == 0 {
            1.0
        } else {
            self.covered as f64 / feasible as f64
        }
    }
}


// A configuration under construction: the literals it has to keep and one
// full model that contains them.
struct Working {
    partial: LiteralSet,
    witness: LiteralSet,
}


enum Phase {
    Covering,
    Emitting,
}


pub struct TWiseStrategy {
    t: usize,
    policy: ExtensionPolicy,
    groups: Vec<Vec<LiteralSet>>,
    max_configs: usize,
    cursor: Cursor,
    pending: Option<LiteralSet>,
    working: VecDeque<Working>,
    coverage: Coverage,
    phase: Phase,
    truncated: bool,
}

impl TWiseStrategy {
    pub fn new(cnf: &Cnf, settings: TWiseSettings, max_configs: usize) -> Result<Self> {
        if settings.t == 0 {
            return Err(Error::InvalidStrength(settings.t));
        }

        let groups = match settings.groups {
            Some(groups) => {
                for lit in groups.iter().flatten().flat_map(|e| e.literals()) {
                    cnf.check_literal(lit)?;
                }
                groups
            }
            None => {
                let n = cnf.n_vars() as i32;
                vec![(1..=n).flat_map(|v| vec![LiteralSet::new(vec![v]), LiteralSet::new(vec![-v])]).collect()]
            }
        };

        let mut coverage = Coverage::default();
        let mut truncated = false;
        if max_configs == 0 {
            coverage.candidates = consistent_total(&groups, settings.t);
            truncated = coverage.candidates > 0;
        }

        Ok(TWiseStrategy {
            cursor: Cursor::new(&groups, settings.t),
            t: settings.t,
            policy: settings.policy,
            groups,
            max_configs,
            pending: None,
            working: VecDeque::new(),
            coverage,
            phase: Phase::Covering,
            truncated,
        })
    }

    // The candidate in progress, or the next one from the enumeration.
    fn take_candidate(&mut self) -> Option<LiteralSet> {
        if self.pending.is_none() {
            self.pending = self.cursor.next_in(&self.groups);
            if self.pending.is_some() {
                self.coverage.candidates += 1;
            }
        }
        self.pending.clone()
    }

    fn extension_order<S: Solver>(&self, cx: &mut StepContext<S>) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.working.len()).collect();
        match self.policy {
            ExtensionPolicy::FirstFit => {}
            ExtensionPolicy::LastFit => order.reverse(),
            ExtensionPolicy::Shuffled => cx.rand.shuffle(&mut order),
        }
        order
    }

    fn cover<S: Solver>(&mut self, cx: &mut StepContext<S>, combination: &LiteralSet) -> Result<Option<Step>> {
        if self.working.iter().any(|w| w.partial.contains_all(combination)) {
            self.coverage.covered += 1;
            return Ok(None);
        }

        let order = self.extension_order(cx);

        // A witness that already holds the combination extends without solving.
        let holds = order.iter().cloned().find(|&i| {
            let w = &self.working[i];
            !w.partial.has_conflict(combination) && w.witness.contains_all(combination)
        });
        if let Some(i) = holds {
            let w = &mut self.working[i];
            w.partial = w.partial.union(combination);
            self.coverage.covered += 1;
            return Ok(None);
        }

        for i in order {
            let w = &mut self.working[i];
            if w.partial.has_conflict(combination) {
                continue;
            }

            let partial = w.partial.union(combination);
            match cx.solve(partial.as_slice())? {
                Solved::Model(witness) => {
                    *w = Working { partial, witness };
                    self.coverage.covered += 1;
                    return Ok(None);
                }
                Solved::NoModel => {}
                Solved::Cancelled => return Ok(Some(Step::Pending)),
            }
        }

        if self.working.len() >= self.max_configs {
            self.truncated = true;
            return Ok(None);
        }

        match cx.solve(combination.as_slice())? {
            Solved::Model(witness) => {
                trace!("new configuration for {:?}", combination);
                self.working.push_back(Working {
                    partial: combination.clone(),
                    witness,
                });
                self.coverage.covered += 1;
            }
            Solved::NoModel => {
                trace!("infeasible {:?}", combination);
                self.coverage.infeasible += 1;
            }
            Solved::Cancelled => return Ok(Some(Step::Pending)),
        }
        Ok(None)
    }

    fn finish_covering<S: Solver>(&mut self, cx: &mut StepContext<S>) {
        if self.truncated {
            // What is left is counted, not solved.
            let total = consistent_total(&self.groups, self.t);
            self.coverage.candidates = self.coverage.candidates.max(total);
        }
        debug!(
            "| t = {}: {} configurations cover {} of {} candidates ({} infeasible)",
            self.t,
            self.working.len(),
            self.coverage.covered,
            self.coverage.candidates,
            self.coverage.infeasible
        );
        cx.set_remaining_work(self.working.len());
        self.phase = Phase::Emitting;
    }

    fn emit<S: Solver>(&mut self, cx: &mut StepContext<S>) -> Result<Step> {
        let config = match self.working.front() {
            None => return Ok(Step::Done),
            Some(w) if cx.settings.allow_duplicates || !cx.accepted.contains(&w.witness) => Some(w.witness.clone()),
            // The solver already excludes every accepted configuration.
            Some(w) => match cx.solve(w.partial.as_slice())? {
                Solved::Model(model) => Some(model),
                Solved::NoModel => None,
                Solved::Cancelled => return Ok(Step::Pending),
            },
        };

        self.working.pop_front();
        Ok(match config {
            Some(config) => Step::Batch(vec![config]),
            None => Step::Pending,
        })
    }
}

impl Strategy for TWiseStrategy {
    /// One unit per candidate combination, then one per emitted configuration.
    fn work_estimate(&self, max: usize) -> usize {
        let candidates = consistent_total(&self.groups, self.t);
        candidates.saturating_add(candidates.min(max))
    }

    fn step<S: Solver>(&mut self, cx: &mut StepContext<S>) -> Result<Step> {
        if let Phase::Emitting = self.phase {
            if self.working.is_empty() {
                return Ok(Step::Done);
            }
        }
        if cx.solver.is_contradicted() {
            return Ok(Step::Exhausted);
        }

        match self.phase {
            Phase::Covering => {
                let next = if self.truncated { None } else { self.take_candidate() };
                let combination = match next {
                    Some(c) => c,
                    None => {
                        self.finish_covering(cx);
                        return Ok(Step::Pending);
                    }
                };

                if let Some(step) = self.cover(cx, &combination)? {
                    return Ok(step);
                }
                self.pending = None;
                if !self.truncated {
                    cx.worked(1);
                }
                Ok(Step::Pending)
            }

            Phase::Emitting => self.emit(cx),
        }
    }

    fn finished(&self) -> Completion {
        if self.truncated {
            Completion::Truncated
        } else {
            Completion::Complete
        }
    }

    fn coverage(&self) -> Option<Coverage> {
        let c = self.coverage;
        Some(Coverage {
            uncovered: c.candidates - c.covered - c.infeasible,
            ..c
        })
    }
}
