use std::{fmt, ops};
pub use self::index_map::*;

pub mod assignment;
pub mod clause;
mod index_map;
pub mod util;


/// Solver-internal variable, 0-based. External variable `i` is `Var(i - 1)`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Var(u32);

impl Var {
    #[inline]
    pub fn sign_lit(&self, sign: bool) -> Lit {
        Lit((self.0 << 1) | (sign as u32))
    }

    #[inline]
    pub fn pos_lit(&self) -> Lit {
        Lit(self.0 << 1)
    }

    #[inline]
    pub fn neg_lit(&self) -> Lit {
        Lit((self.0 << 1) | 1)
    }

    /// 1-based index used in DIMACS and in `LiteralSet`s.
    #[inline]
    pub fn external(&self) -> u32 {
        self.0 + 1
    }


    #[inline]
    fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline]
    fn from_index(index: usize) -> Var {
        if index <= 0x7FFFFFFF {
            Var(index as u32)
        } else {
            panic!("Var index {} is out of bound", index)
        }
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x{}", self.external())
    }
}


/// Variable with a sign bit; `sign() == true` means negated.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Lit(u32);

impl Lit {
    #[inline]
    pub fn sign(&self) -> bool {
        (self.0 & 1) != 0
    }

    #[inline]
    pub fn var(&self) -> Var {
        Var(self.0 >> 1)
    }

    /// `lit` must be non-zero.
    #[inline]
    pub fn from_dimacs(lit: i32) -> Lit {
        debug_assert!(lit != 0);
        Var::from_index(lit.unsigned_abs() as usize - 1).sign_lit(lit < 0)
    }

    #[inline]
    pub fn to_dimacs(&self) -> i32 {
        let v = self.var().external() as i32;
        if self.sign() {
            -v
        } else {
            v
        }
    }


    #[inline]
    fn var_index(&self) -> usize {
        (self.0 >> 1) as usize
    }

    #[inline]
    fn sign_index(&self) -> usize {
        (self.0 & 1) as usize
    }
}

impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit(self.0 ^ 1)
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.sign() {
            write!(f, "¬")?;
        }
        write!(f, "{:?}", self.var())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimacs_conversion() {
        let l = Lit::from_dimacs(-3);
        assert!(l.sign());
        assert_eq!(l.var().external(), 3);
        assert_eq!(l.to_dimacs(), -3);
        assert_eq!((!l).to_dimacs(), 3);
        assert_eq!(Lit::from_dimacs(1), Var(0).pos_lit());
    }
}
