use std::{fmt, ops};


#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Order {
    // Slot `i - 1` holds `i`, `-i` or 0.
    Index,
    // Literals kept in insertion order.
    Unordered,
}


/// A full or partial assignment of feature variables.
///
/// Positive entries select a variable, negative ones deselect it and 0 is a
/// don't-care slot (only meaningful in `Order::Index`).
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct LiteralSet {
    literals: Vec<i32>,
    order: Order,
}

impl LiteralSet {
    pub fn new<I: IntoIterator<Item = i32>>(literals: I) -> Self {
        let mut lits: Vec<i32> = Vec::new();
        for lit in literals {
            if lit != 0 && !lits.contains(&lit) {
                lits.push(lit);
            }
        }
        LiteralSet {
            literals: lits,
            order: Order::Unordered,
        }
    }

    /// Wraps a raw solver output. For `Order::Index` the vector is re-laid so
    /// that slot `i - 1` belongs to variable `i`; `n_vars` bounds the length.
    pub fn from_model(raw: &[i32], n_vars: usize, order: Order) -> Self {
        match order {
            Order::Unordered => LiteralSet::new(raw.iter().cloned()),
            Order::Index => {
                let mut literals = vec![0; n_vars];
                for &lit in raw {
                    let slot = lit.abs() as usize;
                    if lit != 0 && slot <= n_vars {
                        literals[slot - 1] = lit;
                    }
                }
                LiteralSet { literals, order }
            }
        }
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Raw slots, including don't-care zeros of an indexed set.
    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.literals[..]
    }

    pub fn literals(&self) -> impl Iterator<Item = i32> + '_ {
        self.literals.iter().cloned().filter(|&l| l != 0)
    }

    pub fn len(&self) -> usize {
        self.literals().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn negate(&self) -> LiteralSet {
        LiteralSet {
            literals: self.literals.iter().map(|&l| -l).collect(),
            order: self.order,
        }
    }

    /// Value of variable `var` in this set: `Some(true)` if selected,
    /// `Some(false)` if deselected, `None` if not mentioned.
    pub fn value_of(&self, var: u32) -> Option<bool> {
        let var = var as i32;
        match self.order {
            Order::Index => match self.literals.get((var - 1) as usize) {
                Some(&l) if l == var => Some(true),
                Some(&l) if l == -var => Some(false),
                _ => None,
            },
            Order::Unordered => self.literals.iter().find(|l| l.abs() == var).map(|&l| l > 0),
        }
    }

    #[inline]
    pub fn contains(&self, lit: i32) -> bool {
        lit != 0 && self.value_of(lit.unsigned_abs()) == Some(lit > 0)
    }

    pub fn contains_all(&self, other: &LiteralSet) -> bool {
        other.literals().all(|l| self.contains(l))
    }

    /// True if some literal of `other` is the complement of one of ours.
    pub fn has_conflict(&self, other: &LiteralSet) -> bool {
        other.literals().any(|l| self.contains(-l))
    }

    /// Union of two conflict-free sets, keeping insertion order.
    pub fn union(&self, other: &LiteralSet) -> LiteralSet {
        LiteralSet::new(self.literals().chain(other.literals()))
    }

    /// True if the set contains a literal together with its complement.
    pub fn is_contradictory(&self) -> bool {
        self.literals().any(|l| self.contains(-l))
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.literals
    }
}

impl ops::Neg for &LiteralSet {
    type Output = LiteralSet;

    fn neg(self) -> LiteralSet {
        self.negate()
    }
}

impl fmt::Debug for LiteralSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for lit in self.literals() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{}", lit)?;
        }
        write!(f, "}}")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_model_is_laid_out_by_variable() {
        let set = LiteralSet::from_model(&[-3, 1, 2], 3, Order::Index);
        assert_eq!(set.as_slice(), &[1, 2, -3]);
        assert_eq!(set.value_of(3), Some(false));
        assert_eq!(set.value_of(4), None);
    }

    #[test]
    fn negation_flips_every_sign() {
        let set = LiteralSet::from_model(&[1, -2, 3], 3, Order::Index);
        assert_eq!(set.negate().as_slice(), &[-1, 2, -3]);
        assert_eq!((-&set).order(), Order::Index);
    }

    #[test]
    fn conflicts_and_containment() {
        let config = LiteralSet::from_model(&[1, -2, 3], 3, Order::Index);
        assert!(config.contains_all(&LiteralSet::new(vec![1, 3])));
        assert!(!config.contains_all(&LiteralSet::new(vec![1, 2])));
        assert!(config.has_conflict(&LiteralSet::new(vec![2])));
        assert!(!config.has_conflict(&LiteralSet::new(vec![-2, 4])));
    }

    #[test]
    fn unordered_sets_drop_zero_and_repeats() {
        let set = LiteralSet::new(vec![2, 0, -1, 2]);
        assert_eq!(set.as_slice(), &[2, -1]);
        assert!(!set.is_contradictory());
        assert!(LiteralSet::new(vec![1, -1]).is_contradictory());
    }
}
