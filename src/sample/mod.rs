//! Sampling driver: runs a `Strategy` against an owned solver and collects
//! the accepted configurations.

use crate::cnf::{Cnf, LiteralSet};
use crate::error::{Error, Result};
use crate::sat::minisat::{CoreSettings, CoreSolver};
use crate::sat::random::Random;
use crate::sat::{ClauseRes, SolveRes, Solver, Stats};
pub use self::monitor::{CancelToken, LogMonitor, Monitor, NullMonitor};
pub use self::random::RandomStrategy;
pub use self::twise::{Coverage, ExtensionPolicy, TWiseSettings, TWiseStrategy};

pub mod monitor;
mod random;
pub mod twise;


#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Completion {
    /// The strategy reached its goal.
    Complete,
    /// No further distinct configuration exists.
    Exhausted,
    /// The size limit stopped a t-wise run before full coverage.
    Truncated,
    Cancelled,
}


#[derive(Clone, Debug)]
pub struct Sample {
    pub configurations: Vec<LiteralSet>,
    pub completion: Completion,
    pub coverage: Option<Coverage>,
    pub stats: Stats,
}

impl Sample {
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiteralSet> {
        self.configurations.iter()
    }
}


#[derive(Clone, Debug)]
pub struct GeneratorSettings {
    pub max_sample_size: usize,
    pub allow_duplicates: bool,
    pub seed: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            max_sample_size: usize::MAX,
            allow_duplicates: false,
            seed: 0,
        }
    }
}


pub enum Step {
    /// Configurations to accept, in order.
    Batch(Vec<LiteralSet>),
    /// Work was done but nothing is ready yet.
    Pending,
    Done,
    Exhausted,
}


pub enum Solved {
    Model(LiteralSet),
    NoModel,
    Cancelled,
}


/// What a strategy sees during one step.
pub struct StepContext<'a, S: Solver> {
    pub solver: &'a mut S,
    pub rand: &'a mut Random,
    pub accepted: &'a [LiteralSet],
    pub settings: &'a GeneratorSettings,
    monitor: &'a mut dyn Monitor,
}

impl<'a, S: Solver> StepContext<'a, S> {
    /// Solves under `assumptions`, telling a cancelled search apart from an
    /// exhausted resource budget.
    pub fn solve(&mut self, assumptions: &[i32]) -> Result<Solved> {
        match self.solver.solve(assumptions)? {
            SolveRes::SAT(model) => Ok(Solved::Model(model)),
            SolveRes::UnSAT => Ok(Solved::NoModel),
            SolveRes::Interrupted => {
                if self.monitor.is_cancelled() {
                    Ok(Solved::Cancelled)
                } else {
                    Err(Error::BudgetExhausted)
                }
            }
        }
    }

    /// Progress in the strategy's own units, between accepted configurations.
    pub fn worked(&mut self, work: usize) {
        self.monitor.worked(work);
    }

    pub fn set_remaining_work(&mut self, work: usize) {
        self.monitor.set_remaining_work(work);
    }
}


pub trait Strategy {
    /// Expected units of progress for a sample of at most `max` configurations.
    /// The driver reports one unit per accepted configuration.
    fn work_estimate(&self, max: usize) -> usize;

    fn step<S: Solver>(&mut self, cx: &mut StepContext<S>) -> Result<Step>;

    /// Status reported when the strategy is done or the sample is full.
    fn finished(&self) -> Completion {
        Completion::Complete
    }

    fn coverage(&self) -> Option<Coverage> {
        None
    }
}


/// Drives one sampling run. Owns the solver; blocking clauses it adds stay
/// local to the run.
pub struct Generator<S: Solver, G: Strategy> {
    solver: S,
    strategy: G,
    settings: GeneratorSettings,
    rand: Random,
}

impl<S: Solver, G: Strategy> Generator<S, G> {
    pub fn new(solver: S, strategy: G, settings: GeneratorSettings) -> Self {
        let rand = Random::from_seed(settings.seed);
        Generator {
            solver,
            strategy,
            settings,
            rand,
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn run<M: Monitor>(&mut self, monitor: &mut M) -> Result<Sample> {
        let max = self.settings.max_sample_size;
        monitor.set_remaining_work(self.strategy.work_estimate(max));

        let mut accepted: Vec<LiteralSet> = Vec::new();
        let completion = 'run: loop {
            if monitor.is_cancelled() {
                break Completion::Cancelled;
            }
            if accepted.len() >= max {
                break self.strategy.finished();
            }

            let step = {
                let mut cx = StepContext {
                    solver: &mut self.solver,
                    rand: &mut self.rand,
                    accepted: &accepted,
                    settings: &self.settings,
                    monitor: &mut *monitor,
                };
                self.strategy.step(&mut cx)?
            };

            match step {
                Step::Pending => {}
                Step::Done => break self.strategy.finished(),
                Step::Exhausted => break Completion::Exhausted,
                Step::Batch(configs) => {
                    for config in configs {
                        if monitor.is_cancelled() {
                            break 'run Completion::Cancelled;
                        }
                        if accepted.len() >= max {
                            break;
                        }

                        trace!("accepted {:?}", config);
                        let block: Vec<i32> = config.literals().map(|l| -l).collect();
                        accepted.push(config);
                        monitor.step();

                        if !self.settings.allow_duplicates && self.solver.add_clause(&block)? == ClauseRes::Contradiction {
                            debug!("no configuration left after {}", accepted.len());
                            if accepted.len() >= max {
                                break 'run self.strategy.finished();
                            }
                            break 'run Completion::Exhausted;
                        }
                    }
                }
            }
        };

        info!("| sampled {} configurations ({:?})", accepted.len(), completion);
        Ok(Sample {
            configurations: accepted,
            completion,
            coverage: self.strategy.coverage(),
            stats: self.solver.stats(),
        })
    }
}


pub enum SampleRequest {
    Random { count: usize },
    /// `groups` of expressions to combine; `None` means every literal.
    TWise { t: usize, groups: Option<Vec<Vec<LiteralSet>>>, max: usize },
    /// One configuration with `feature` and one without it.
    Module { feature: String },
}


/// Samples `cnf` with a fresh solver. `cnf` itself is left untouched.
pub fn generate<M: Monitor>(
    cnf: &Cnf,
    request: &SampleRequest,
    settings: &GeneratorSettings,
    policy: ExtensionPolicy,
    monitor: &mut M,
) -> Result<Sample> {
    let mut solver = CoreSolver::from_cnf(cnf, CoreSettings::default());
    if let Some(flag) = monitor.interrupt_flag() {
        solver = solver.with_interrupt(flag);
    }

    match *request {
        SampleRequest::Random { count } => {
            let settings = GeneratorSettings {
                max_sample_size: count.min(settings.max_sample_size),
                ..settings.clone()
            };
            Generator::new(solver, RandomStrategy::new(count), settings).run(monitor)
        }

        SampleRequest::TWise { t, ref groups, max } => {
            let tw = TWiseSettings {
                t,
                policy,
                groups: groups.clone(),
            };
            let settings = GeneratorSettings {
                max_sample_size: max.min(settings.max_sample_size),
                ..settings.clone()
            };
            let strategy = TWiseStrategy::new(cnf, tw, settings.max_sample_size)?;
            Generator::new(solver, strategy, settings).run(monitor)
        }

        SampleRequest::Module { ref feature } => {
            let var = cnf.variables().index_of(feature)? as i32;
            let tw = TWiseSettings {
                t: 1,
                policy,
                groups: Some(vec![vec![LiteralSet::new(vec![var]), LiteralSet::new(vec![-var])]]),
            };
            let strategy = TWiseStrategy::new(cnf, tw, settings.max_sample_size)?;
            Generator::new(solver, strategy, settings.clone()).run(monitor)
        }
    }
}
