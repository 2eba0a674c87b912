use std::sync::{atomic::AtomicBool, Arc};
use crate::cnf::{Cnf, LiteralSet, Order};
use crate::error::{Error, Result};
use crate::sat::formula::Lit;
use crate::sat::random::Random;
use crate::sat::{ClauseRes, SelectionStrategy, SolveRes, Solver, Stats};
pub use self::search::clause_db::ClauseDBSettings;
pub use self::search::conflict::CCMinMode;
pub use self::search::decision_heuristic::DecisionHeuristicSettings;
use self::search::*;
pub use self::search::{RestartStrategy, SearchSettings, SearcherSettings};
pub use self::budget::Budget;

pub mod budget;
mod search;


#[derive(Default)]
pub struct CoreSettings {
    pub heur: DecisionHeuristicSettings,
    pub db: ClauseDBSettings,
    pub ccmin_mode: CCMinMode,
    pub search: SearchSettings,
    pub core: SearcherSettings,
}


/// Incremental CDCL solver.
pub struct CoreSolver {
    ok: bool, // If FALSE, the constraints are already unsatisfiable. No part of the solver state may be used!
    ss: SearchSettings,
    search: Searcher,
    budget: Budget,
}

impl CoreSolver {
    pub fn new(settings: CoreSettings) -> Self {
        CoreSolver {
            ok: true,
            ss: settings.search,
            search: Searcher::new(settings.core, settings.db, settings.heur, settings.ccmin_mode),
            budget: Budget::new(),
        }
    }

    /// Solver over a private copy of `cnf`'s clauses.
    pub fn from_cnf(cnf: &Cnf, settings: CoreSettings) -> Self {
        let mut solver = CoreSolver::new(settings);
        solver.reserve_vars(cnf.n_vars());
        for clause in cnf.clauses() {
            let lits: Vec<Lit> = clause.literals().map(Lit::from_dimacs).collect();
            solver.add_lits(&lits);
        }
        solver
    }

    /// Shares `flag` with the search loop; setting it stops the running solve.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.budget = Budget::with_interrupt(flag);
        self
    }

    pub fn budget_mut(&mut self) -> &mut Budget {
        &mut self.budget
    }

    fn reserve_vars(&mut self, n: usize) {
        while self.search.number_of_vars() < n {
            self.search.new_var(true);
        }
    }

    fn to_lits(&self, clause: &[i32]) -> Result<Vec<Lit>> {
        let n_vars = self.search.number_of_vars();
        clause
            .iter()
            .map(|&lit| {
                if lit == 0 {
                    Err(Error::ZeroLiteral)
                } else if lit.unsigned_abs() as usize > n_vars {
                    Err(Error::LiteralOutOfRange(lit))
                } else {
                    Ok(Lit::from_dimacs(lit))
                }
            })
            .collect()
    }

    fn add_lits(&mut self, lits: &[Lit]) -> bool {
        if self.ok {
            if let AddClauseRes::UnSAT = self.search.add_clause(lits) {
                self.ok = false;
            }
        }
        self.ok
    }
}

impl Solver for CoreSolver {
    fn n_vars(&self) -> usize {
        self.search.number_of_vars()
    }

    fn n_clauses(&self) -> usize {
        self.search.number_of_clauses()
    }

    fn add_clause(&mut self, clause: &[i32]) -> Result<ClauseRes> {
        let lits = self.to_lits(clause)?;
        if self.add_lits(&lits) {
            Ok(ClauseRes::Consistent)
        } else {
            trace!("clause {:?} contradicts the clause set", clause);
            Ok(ClauseRes::Contradiction)
        }
    }

    fn solve(&mut self, assumptions: &[i32]) -> Result<SolveRes> {
        let assumps = self.to_lits(assumptions)?;
        if !self.ok {
            return Ok(SolveRes::UnSAT);
        }

        match self.search.search(&self.ss, &self.budget, &assumps) {
            SearchRes::SAT(model) => {
                let raw: Vec<i32> = model.iter().map(Lit::to_dimacs).collect();
                Ok(SolveRes::SAT(LiteralSet::from_model(&raw, self.n_vars(), Order::Index)))
            }

            // Conflict without any decision: no assumption involved.
            SearchRes::UnSAT => {
                self.ok = false;
                Ok(SolveRes::UnSAT)
            }

            SearchRes::AssumpsConfl => Ok(SolveRes::UnSAT),

            SearchRes::Interrupted(progress) => {
                debug!("solve interrupted at {:.3} % progress", progress * 100.0);
                Ok(SolveRes::Interrupted)
            }
        }
    }

    fn shuffle_order(&mut self, rand: &mut Random) {
        self.search.shuffle_order(rand);
    }

    fn selection_strategy(&self) -> SelectionStrategy {
        self.search.strategy()
    }

    fn set_selection_strategy(&mut self, strategy: SelectionStrategy) {
        self.search.set_strategy(strategy);
    }

    fn is_contradicted(&self) -> bool {
        !self.ok
    }

    fn stats(&self) -> Stats {
        self.search.stats()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::Variables;

    fn solver(n: usize, clauses: &[&[i32]]) -> CoreSolver {
        let mut cnf = Cnf::new(Variables::anonymous(n));
        for c in clauses {
            cnf.add_clause(c.iter().cloned()).unwrap();
        }
        CoreSolver::from_cnf(&cnf, CoreSettings::default())
    }

    fn model(res: SolveRes) -> LiteralSet {
        match res {
            SolveRes::SAT(m) => m,
            _ => panic!("expected a model"),
        }
    }

    #[test]
    fn finds_model_respecting_units() {
        let mut s = solver(2, &[&[1, 2], &[-1]]);
        let m = model(s.solve(&[]).unwrap());
        assert_eq!(m.as_slice(), &[-1, 2]);
        assert_eq!(m.order(), Order::Index);
    }

    #[test]
    fn unsat_under_assumptions_keeps_solver_usable() {
        let mut s = solver(2, &[&[1, 2]]);
        assert!(matches!(s.solve(&[-1, -2]).unwrap(), SolveRes::UnSAT));
        assert!(!s.is_contradicted());
        let m = model(s.solve(&[-1]).unwrap());
        assert!(m.contains(2));
    }

    #[test]
    fn contradicting_clause_is_a_value() {
        let mut s = solver(1, &[&[1]]);
        assert_eq!(s.add_clause(&[-1]).unwrap(), ClauseRes::Contradiction);
        assert!(s.is_contradicted());
        assert!(matches!(s.solve(&[]).unwrap(), SolveRes::UnSAT));
    }

    #[test]
    fn malformed_literals_are_errors() {
        let mut s = solver(2, &[]);
        assert!(matches!(s.add_clause(&[1, 3]), Err(Error::LiteralOutOfRange(3))));
        assert!(matches!(s.add_clause(&[0]), Err(Error::ZeroLiteral)));
        assert!(matches!(s.solve(&[-5]), Err(Error::LiteralOutOfRange(-5))));
    }

    #[test]
    fn strategy_sets_free_polarity() {
        let mut s = solver(4, &[]);
        s.set_selection_strategy(SelectionStrategy::Positive);
        assert_eq!(model(s.solve(&[]).unwrap()).as_slice(), &[1, 2, 3, 4]);
        s.set_selection_strategy(SelectionStrategy::Negative);
        assert_eq!(model(s.solve(&[]).unwrap()).as_slice(), &[-1, -2, -3, -4]);
    }

    #[test]
    fn pigeonhole_is_unsat() {
        // Three pigeons, two holes: p(i, h) = 2 * i + h + 1.
        let p = |i: i32, h: i32| 2 * i + h + 1;
        let mut clauses: Vec<Vec<i32>> = (0..3).map(|i| vec![p(i, 0), p(i, 1)]).collect();
        for h in 0..2 {
            for i in 0..3 {
                for j in i + 1..3 {
                    clauses.push(vec![-p(i, h), -p(j, h)]);
                }
            }
        }
        let refs: Vec<&[i32]> = clauses.iter().map(|c| &c[..]).collect();
        let mut s = solver(6, &refs);
        assert!(matches!(s.solve(&[]).unwrap(), SolveRes::UnSAT));
        assert!(s.is_contradicted());
        assert!(s.stats().conflicts > 0);
    }

    #[test]
    fn blocking_clauses_enumerate_all_models() {
        let mut s = solver(3, &[]);
        let mut rand = Random::from_seed(3);
        s.set_selection_strategy(SelectionStrategy::Random);
        let mut seen = Vec::new();
        loop {
            s.shuffle_order(&mut rand);
            match s.solve(&[]).unwrap() {
                SolveRes::SAT(m) => {
                    assert!(!seen.contains(&m));
                    let block = m.negate();
                    seen.push(m);
                    if s.add_clause(block.as_slice()).unwrap() == ClauseRes::Contradiction {
                        break;
                    }
                }
                _ => break,
            }
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn interrupt_flag_stops_search() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut s = solver(2, &[&[1, 2]]).with_interrupt(flag);
        assert!(matches!(s.solve(&[]).unwrap(), SolveRes::Interrupted));
        assert!(!s.is_contradicted());
    }

    #[test]
    fn budgets_apply_per_call() {
        let mut s = solver(2, &[&[1, 2]]);
        s.budget_mut().set_conflict_budget(Some(0));
        assert!(matches!(s.solve(&[]).unwrap(), SolveRes::Interrupted));

        s.budget_mut().off();
        s.budget_mut().set_propagation_budget(Some(0));
        assert!(matches!(s.solve(&[]).unwrap(), SolveRes::Interrupted));

        s.budget_mut().off();
        model(s.solve(&[]).unwrap());
        assert_eq!(s.stats().solves, 3);
    }
}
