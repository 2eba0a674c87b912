use crate::error::Result;
use crate::sat::{SelectionStrategy, Solver};
use super::{Solved, Step, StepContext, Strategy};


/// Independent random configurations: each step reshuffles the decision
/// order and asks for one model with random polarities.
pub struct RandomStrategy {
    count: usize,
    iterations: usize,
}

impl RandomStrategy {
    pub fn new(count: usize) -> Self {
        RandomStrategy { count, iterations: 0 }
    }
}

impl Strategy for RandomStrategy {
    fn work_estimate(&self, max: usize) -> usize {
        self.count.min(max)
    }

    fn step<S: Solver>(&mut self, cx: &mut StepContext<S>) -> Result<Step> {
        if self.iterations >= self.count {
            return Ok(Step::Done);
        }

        cx.solver.set_selection_strategy(SelectionStrategy::Random);
        cx.solver.shuffle_order(cx.rand);
        match cx.solve(&[])? {
            Solved::Model(config) => {
                self.iterations += 1;
                Ok(Step::Batch(vec![config]))
            }
            Solved::NoModel => Ok(Step::Exhausted),
            Solved::Cancelled => Ok(Step::Pending),
        }
    }
}
