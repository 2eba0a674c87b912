//! Incremental SAT solving over 1-based signed-integer literals.

use crate::cnf::LiteralSet;
use crate::error::Result;
use self::random::Random;

pub mod formula;
pub mod minisat;
pub mod random;


/// Polarity given to a variable when the solver decides it freely.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SelectionStrategy {
    Random,
    Positive,
    Negative,
}


pub enum SolveRes {
    /// Full assignment in `Order::Index`.
    SAT(LiteralSet),
    UnSAT,
    Interrupted,
}


#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ClauseRes {
    Consistent,
    /// The clause set can no longer be satisfied.
    Contradiction,
}


#[derive(Clone, Copy, Default, Debug)]
pub struct Stats {
    pub solves: u64,
    pub restarts: u64,
    pub decisions: u64,
    pub rnd_decisions: u64,
    pub conflicts: u64,
    pub propagations: u64,
    pub tot_literals: u64,
    pub del_literals: u64,
}

impl Stats {
    pub fn log(&self, cpu_time: f64) {
        info!("restarts              : {:12}", self.restarts);
        info!("solves                : {:12}", self.solves);
        info!(
            "conflicts             : {:12}   ({:.0} / sec)",
            self.conflicts,
            (self.conflicts as f64) / cpu_time
        );
        info!(
            "decisions             : {:12}   ({:4.2} % random) ({:.0} / sec)",
            self.decisions,
            (self.rnd_decisions as f64) * 100.0 / (self.decisions.max(1) as f64),
            (self.decisions as f64) / cpu_time
        );
        info!(
            "propagations          : {:12}   ({:.0} / sec)",
            self.propagations,
            (self.propagations as f64) / cpu_time
        );
        info!(
            "conflict literals     : {:12}   ({:4.2} % deleted)",
            self.tot_literals,
            (self.del_literals as f64) * 100.0 / ((self.del_literals + self.tot_literals).max(1) as f64)
        );
        info!("CPU time              : {:.3} s", cpu_time);
    }
}


/// Solver owning its own copy of the clause set. Every call leaves the
/// solver ready for the next one; learnt clauses are kept.
pub trait Solver {
    fn n_vars(&self) -> usize;
    fn n_clauses(&self) -> usize;

    /// Adds a clause for the rest of the solver's life. Fails only on a
    /// literal naming no variable.
    fn add_clause(&mut self, clause: &[i32]) -> Result<ClauseRes>;

    /// Looks for a model extending `assumptions`. UNSAT under non-empty
    /// assumptions leaves the clause set usable.
    fn solve(&mut self, assumptions: &[i32]) -> Result<SolveRes>;

    fn find_solution(&mut self) -> Result<Option<LiteralSet>> {
        match self.solve(&[])? {
            SolveRes::SAT(model) => Ok(Some(model)),
            _ => Ok(None),
        }
    }

    /// Redraws the decision order from `rand`.
    fn shuffle_order(&mut self, rand: &mut Random);

    fn selection_strategy(&self) -> SelectionStrategy;
    fn set_selection_strategy(&mut self, strategy: SelectionStrategy);

    /// True once the clause set is known to be unsatisfiable.
    fn is_contradicted(&self) -> bool;

    fn stats(&self) -> Stats;
}
