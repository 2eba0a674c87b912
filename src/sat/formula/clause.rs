use std::fmt;
use super::Lit;


pub const MIN_CLAUSE_SIZE: usize = 2;


#[derive(Clone, Copy, Debug)]
struct ClauseHeader {
    deleted: bool,
    learnt: bool,
    activity: f32,
    reloced: Option<ClauseRef>,
}

/// Disjunction of at least two literals. The first two literals are the
/// watched ones.
pub struct Clause {
    header: ClauseHeader,
    lits: Vec<Lit>,
}

impl Clause {
    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    #[inline]
    pub fn lits(&self) -> &[Lit] {
        &self.lits[..]
    }

    #[inline]
    pub fn head(&self) -> Lit {
        self.lits[0]
    }

    #[inline]
    pub fn head_pair(&self) -> (Lit, Lit) {
        (self.lits[0], self.lits[1])
    }

    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.lits.swap(i, j);
    }

    pub fn is_deleted(&self) -> bool {
        self.header.deleted
    }

    pub fn is_learnt(&self) -> bool {
        self.header.learnt
    }

    pub fn activity(&self) -> f64 {
        self.header.activity as f64
    }

    pub fn set_activity(&mut self, act: f64) {
        self.header.activity = act as f32;
    }

    /// Keeps literals from `base` on only if `f` holds; order of the kept
    /// suffix is not preserved.
    pub fn retain_suffix<F: Fn(Lit) -> bool>(&mut self, base: usize, f: F) {
        let mut i = base;
        while i < self.lits.len() {
            if f(self.lits[i]) {
                i += 1;
            } else {
                self.lits.swap_remove(i);
            }
        }
    }

    /// Finds a literal after `place` satisfying `f` and swaps it into `place`.
    #[inline]
    pub fn pull_literal<F: FnMut(Lit) -> bool>(&mut self, place: usize, mut f: F) -> Option<Lit> {
        for i in place + 1..self.lits.len() {
            if f(self.lits[i]) {
                self.lits.swap(i, place);
                return Some(self.lits[place]);
            }
        }
        None
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_deleted() {
            write!(f, "<deleted>")?;
        }
        write!(f, "(")?;
        let mut first = true;
        for lit in self.lits() {
            if !first {
                write!(f, " ∨ ")?;
            }
            first = false;
            write!(f, "{:?}", lit)?;
        }
        write!(f, ")")
    }
}


#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub struct ClauseRef(u32);


/// Arena of clauses addressed by `ClauseRef`. Freed clauses stay in place,
/// marked deleted, until the arena is compacted into a fresh one.
pub struct ClauseAllocator {
    clauses: Vec<Clause>,
    size: usize,
    wasted: usize,
}

impl ClauseAllocator {
    pub fn new_empty() -> ClauseAllocator {
        ClauseAllocator {
            clauses: Vec::new(),
            size: 0,
            wasted: 0,
        }
    }

    pub fn new_for_gc(old: &ClauseAllocator) -> ClauseAllocator {
        ClauseAllocator {
            clauses: Vec::with_capacity(old.clauses.len()),
            size: 0,
            wasted: 0,
        }
    }

    fn words(len: usize, learnt: bool) -> usize {
        1 + len + (learnt as usize)
    }

    pub fn alloc(&mut self, literals: &[Lit], learnt: bool) -> ClauseRef {
        assert!(literals.len() >= MIN_CLAUSE_SIZE);
        let cr = ClauseRef(self.clauses.len() as u32);
        self.clauses.push(Clause {
            header: ClauseHeader {
                deleted: false,
                learnt,
                activity: 0.0,
                reloced: None,
            },
            lits: literals.to_vec(),
        });
        self.size += Self::words(literals.len(), learnt);
        cr
    }

    pub fn reloc_to(&mut self, to: &mut ClauseAllocator, src: ClauseRef) -> Option<ClauseRef> {
        let c = self.edit(src);
        if c.is_deleted() {
            return None;
        }

        if c.header.reloced.is_none() {
            let cr = to.alloc(&c.lits[..], c.header.learnt);
            to.edit(cr).header.activity = c.header.activity;
            c.header.reloced = Some(cr);
        }
        c.header.reloced
    }

    pub fn free(&mut self, cr: ClauseRef) {
        let c = self.edit(cr);
        debug_assert!(!c.is_deleted());
        c.header.deleted = true;
        let words = Self::words(c.len(), c.header.learnt);
        self.wasted += words;
    }

    #[inline]
    pub fn is_deleted(&self, cr: ClauseRef) -> bool {
        self.view(cr).is_deleted()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn check_garbage(&self, gf: f64) -> bool {
        (self.wasted as f64) > (self.size as f64) * gf
    }

    #[inline]
    pub fn view(&self, ClauseRef(cr): ClauseRef) -> &Clause {
        &self.clauses[cr as usize]
    }

    #[inline]
    pub fn edit(&mut self, ClauseRef(cr): ClauseRef) -> &mut Clause {
        &mut self.clauses[cr as usize]
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::formula::Lit;

    fn lits(raw: &[i32]) -> Vec<Lit> {
        raw.iter().map(|&l| Lit::from_dimacs(l)).collect()
    }

    #[test]
    fn relocation_skips_deleted_clauses() {
        let mut ca = ClauseAllocator::new_empty();
        let a = ca.alloc(&lits(&[1, 2]), false);
        let b = ca.alloc(&lits(&[-1, 3, 4]), true);
        ca.free(a);
        assert!(ca.check_garbage(0.2));

        let mut to = ClauseAllocator::new_for_gc(&ca);
        assert_eq!(ca.reloc_to(&mut to, a), None);
        let nb = ca.reloc_to(&mut to, b).unwrap();
        assert_eq!(ca.reloc_to(&mut to, b), Some(nb));
        assert_eq!(to.view(nb).lits(), &lits(&[-1, 3, 4])[..]);
        assert!(to.view(nb).is_learnt());
    }

    #[test]
    fn pull_literal_moves_into_place() {
        let mut ca = ClauseAllocator::new_empty();
        let cr = ca.alloc(&lits(&[1, 2, 3, 4]), false);
        let found = ca.edit(cr).pull_literal(1, |l| l.to_dimacs() == 4);
        assert_eq!(found.map(|l| l.to_dimacs()), Some(4));
        assert_eq!(ca.view(cr).head_pair().1.to_dimacs(), 4);
    }
}
