//! Propositional formulas over named feature variables.

use std::collections::HashMap;
use crate::error::{Error, Result};
pub use self::literal_set::{LiteralSet, Order};

pub mod dimacs;
mod literal_set;


/// Dense table of variable names; indices start at 1.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    names: Vec<String>,
    index: HashMap<String, u32>,
}

impl Variables {
    pub fn new() -> Self {
        Variables::default()
    }

    /// `n` variables named after their own index.
    pub fn anonymous(n: usize) -> Self {
        let mut vars = Variables::new();
        for i in 1..=n {
            vars.push(i.to_string());
        }
        vars
    }

    pub fn register(&mut self, name: &str) -> Result<u32> {
        if self.index.contains_key(name) {
            return Err(Error::DuplicateVariable(name.to_string()));
        }
        Ok(self.push(name.to_string()))
    }

    fn push(&mut self, name: String) -> u32 {
        let idx = (self.names.len() + 1) as u32;
        self.index.insert(name.clone(), idx);
        self.names.push(name);
        idx
    }

    pub fn index_of(&self, name: &str) -> Result<u32> {
        self.index
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownVariable(name.to_string()))
    }

    pub fn name(&self, idx: u32) -> Option<&str> {
        if idx == 0 {
            None
        } else {
            self.names.get((idx - 1) as usize).map(|s| &s[..])
        }
    }

    /// Renames an already registered variable (DIMACS name comments arrive
    /// after the variables were implicitly created).
    pub(crate) fn rename(&mut self, idx: u32, name: &str) -> Result<()> {
        if let Some(&other) = self.index.get(name) {
            if other != idx {
                return Err(Error::DuplicateVariable(name.to_string()));
            }
            return Ok(());
        }
        let slot = (idx as usize).checked_sub(1).ok_or(Error::ZeroLiteral)?;
        match self.names.get_mut(slot) {
            None => Err(Error::LiteralOutOfRange(idx as i32)),
            Some(old) => {
                self.index.remove(old);
                *old = name.to_string();
                self.index.insert(name.to_string(), idx);
                Ok(())
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Literal for `name` with the given polarity.
    pub fn literal(&self, name: &str, selected: bool) -> Result<i32> {
        let idx = self.index_of(name)? as i32;
        Ok(if selected { idx } else { -idx })
    }
}


/// Conjunction of clauses over a fixed variable table.
#[derive(Clone, Debug, Default)]
pub struct Cnf {
    variables: Variables,
    clauses: Vec<LiteralSet>,
}

impl Cnf {
    pub fn new(variables: Variables) -> Self {
        Cnf {
            variables,
            clauses: Vec::new(),
        }
    }

    #[inline]
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub(crate) fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    #[inline]
    pub fn clauses(&self) -> &[LiteralSet] {
        &self.clauses[..]
    }

    #[inline]
    pub fn n_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn check_literal(&self, lit: i32) -> Result<()> {
        if lit == 0 {
            Err(Error::ZeroLiteral)
        } else if lit.unsigned_abs() as usize > self.variables.len() {
            Err(Error::LiteralOutOfRange(lit))
        } else {
            Ok(())
        }
    }

    /// Appends a clause. Repeated literals collapse; a tautology is dropped
    /// since it constrains nothing.
    pub fn add_clause<I: IntoIterator<Item = i32>>(&mut self, literals: I) -> Result<()> {
        let mut lits = Vec::new();
        for lit in literals {
            self.check_literal(lit)?;
            lits.push(lit);
        }

        let clause = LiteralSet::new(lits);
        if clause.is_contradictory() {
            trace!("dropping tautology {:?}", clause);
            return Ok(());
        }
        self.clauses.push(clause);
        Ok(())
    }

    /// Clause by variable names: `("A", true)` is `A`, `("B", false)` is `¬B`.
    pub fn add_named_clause(&mut self, literals: &[(&str, bool)]) -> Result<()> {
        let lits = literals
            .iter()
            .map(|&(name, selected)| self.variables.literal(name, selected))
            .collect::<Result<Vec<_>>>()?;
        self.add_clause(lits)
    }

    /// True if every clause has a literal in `config`.
    pub fn is_satisfied_by(&self, config: &LiteralSet) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.literals().any(|l| config.contains(l)))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_look_up() {
        let mut vars = Variables::new();
        assert_eq!(vars.register("A").unwrap(), 1);
        assert_eq!(vars.register("B").unwrap(), 2);
        assert_eq!(vars.index_of("B").unwrap(), 2);
        assert_eq!(vars.name(1), Some("A"));

        match vars.register("A") {
            Err(Error::DuplicateVariable(name)) => assert_eq!(name, "A"),
            _ => panic!("duplicate accepted"),
        }
        match vars.index_of("C") {
            Err(Error::UnknownVariable(name)) => assert_eq!(name, "C"),
            _ => panic!("unknown variable resolved"),
        }
    }

    #[test]
    fn clauses_are_validated() {
        let mut cnf = Cnf::new(Variables::anonymous(2));
        cnf.add_clause(vec![1, -2]).unwrap();
        cnf.add_clause(vec![1, -1]).unwrap();
        assert_eq!(cnf.clauses().len(), 1);

        assert!(matches!(cnf.add_clause(vec![0]), Err(Error::ZeroLiteral)));
        assert!(matches!(cnf.add_clause(vec![3]), Err(Error::LiteralOutOfRange(3))));
        assert_eq!(cnf.clauses().len(), 1);
    }

    #[test]
    fn named_clauses_and_satisfaction() {
        let mut vars = Variables::new();
        for name in &["A", "B", "C"] {
            vars.register(name).unwrap();
        }
        let mut cnf = Cnf::new(vars);
        cnf.add_named_clause(&[("A", true), ("B", true)]).unwrap();

        assert!(cnf.is_satisfied_by(&LiteralSet::from_model(&[-1, 2, -3], 3, Order::Index)));
        assert!(!cnf.is_satisfied_by(&LiteralSet::from_model(&[-1, -2, 3], 3, Order::Index)));
        assert!(cnf.add_named_clause(&[("D", true)]).is_err());
    }
}
