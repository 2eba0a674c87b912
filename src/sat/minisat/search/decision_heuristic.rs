use crate::sat::formula::{assignment::Assignment, Lit, Var, VarHeap, VarMap};
use crate::sat::random::Random;
use crate::sat::SelectionStrategy;


pub struct DecisionHeuristicSettings {
    pub var_decay: f64,
    pub random_seed: f64,
    pub random_var_freq: f64,
    pub rnd_init_act: bool, // Initialize variable activities with a small random value.
    pub strategy: SelectionStrategy,
}

impl Default for DecisionHeuristicSettings {
    fn default() -> Self {
        DecisionHeuristicSettings {
            var_decay: 0.95,
            random_seed: 91648253.0,
            random_var_freq: 0.0,
            rnd_init_act: false,
            strategy: SelectionStrategy::Negative,
        }
    }
}


#[derive(Debug)]
struct VarLine {
    rank: u32,      // Position in the decision order; breaks activity ties.
    decision: bool, // Declares if a variable is eligible for selection in the decision heuristic.
}


#[inline]
fn before(act: &VarMap<f64>, var: &VarMap<VarLine>, a: &Var, b: &Var) -> bool {
    let (x, y) = (act[a], act[b]);
    x > y || (x == y && var[a].rank < var[b].rank)
}


/// VSIDS variable selection over a shuffleable base order, with the polarity
/// of each decision chosen by a `SelectionStrategy`.
pub struct DecisionHeuristic {
    settings: DecisionHeuristicSettings,
    var_inc: f64, // Amount to bump next variable with.
    rand: Random,
    var: VarMap<VarLine>,
    activity: VarMap<f64>,
    queue: VarHeap, // A priority queue of variables ordered with respect to the variable activity.

    pub dec_vars: usize,
    pub rnd_decisions: u64,
}

impl DecisionHeuristic {
    pub fn new(settings: DecisionHeuristicSettings) -> DecisionHeuristic {
        let seed = settings.random_seed;
        DecisionHeuristic {
            settings,
            var_inc: 1.0,
            rand: Random::new(seed),
            var: VarMap::new(),
            activity: VarMap::new(),
            queue: VarHeap::new(),
            dec_vars: 0,
            rnd_decisions: 0,
        }
    }

    pub fn init_var(&mut self, v: Var, dvar: bool) {
        let act = if self.settings.rnd_init_act {
            self.rand.drand() * 0.00001
        } else {
            0.0
        };
        self.activity.insert(&v, act);
        let rank = self.var.len() as u32;
        self.var.insert(&v, VarLine { rank, decision: false });
        self.set_decision_var(v, dvar);
    }

    pub fn set_decision_var(&mut self, v: Var, b: bool) {
        let ln = &mut self.var[&v];
        if b != ln.decision {
            ln.decision = b;
            if b {
                self.dec_vars += 1;
                let (act, var) = (&self.activity, &self.var);
                self.queue.insert(v, |a, b| before(act, var, a, b));
            } else {
                self.dec_vars -= 1;
            }
        }
    }

    #[inline]
    pub fn strategy(&self) -> SelectionStrategy {
        self.settings.strategy
    }

    pub fn set_strategy(&mut self, strategy: SelectionStrategy) {
        self.settings.strategy = strategy;
    }

    /// Draws a new base order and polarity stream from `rand` and forgets
    /// accumulated activity. Must be called at ground level.
    pub fn shuffle_order(&mut self, rand: &mut Random, assigns: &Assignment) {
        let mut order: Vec<Var> = self.var.iter().map(|(v, _)| v).collect();
        rand.shuffle(&mut order);
        for (rank, v) in order.iter().enumerate() {
            self.var[v].rank = rank as u32;
        }

        self.var_inc = 1.0;
        for act in self.activity.values_mut() {
            *act = 0.0;
        }
        self.rand = rand.fork();
        self.rebuild_order_heap(assigns);
    }

    pub fn cancel(&mut self, lit: Lit) {
        let v = lit.var();
        if self.var[&v].decision {
            let (act, var) = (&self.activity, &self.var);
            self.queue.insert(v, |a, b| before(act, var, a, b));
        }
    }

    pub fn bump_activity(&mut self, v: &Var) {
        let new = self.activity[v] + self.var_inc;
        if new > 1e100 {
            self.var_inc *= 1e-100;
            for act in self.activity.values_mut() {
                *act *= 1e-100;
            }
            self.activity[v] = new * 1e-100;
        } else {
            self.activity[v] = new;
        }

        let (act, var) = (&self.activity, &self.var);
        self.queue.update(v, |a, b| before(act, var, a, b));
    }

    pub fn decay_activity(&mut self) {
        self.var_inc *= 1.0 / self.settings.var_decay;
    }

    pub fn rebuild_order_heap(&mut self, assigns: &Assignment) {
        let mut tmp = Vec::with_capacity(self.queue.len());
        for (v, vl) in self.var.iter() {
            if vl.decision && assigns.is_undef(v) {
                tmp.push(v);
            }
        }

        let (act, var) = (&self.activity, &self.var);
        self.queue.heapify_from(tmp, |a, b| before(act, var, a, b));
    }

    fn pick_branch_var(&mut self, assigns: &Assignment) -> Option<Var> {
        // Random decision:
        if self.rand.chance(self.settings.random_var_freq) && !self.queue.is_empty() {
            let v = self.queue[self.rand.irand(self.queue.len())];
            if assigns.is_undef(v) && self.var[&v].decision {
                self.rnd_decisions += 1;
                return Some(v);
            }
        }

        // Activity based decision:
        while let Some(v) = {
            let (act, var) = (&self.activity, &self.var);
            self.queue.pop(|a, b| before(act, var, a, b))
        } {
            if assigns.is_undef(v) && self.var[&v].decision {
                return Some(v);
            }
        }

        None
    }

    pub fn pick_branch_lit(&mut self, assigns: &Assignment) -> Option<Lit> {
        let v = self.pick_branch_var(assigns)?;
        let negated = match self.settings.strategy {
            SelectionStrategy::Positive => false,
            SelectionStrategy::Negative => true,
            SelectionStrategy::Random => self.rand.chance(0.5),
        };
        Some(v.sign_lit(negated))
    }
}
