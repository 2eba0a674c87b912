/// Deterministic pseudo-random source (Park–Miller style, as in MiniSat).
/// Two sources built from the same seed yield the same sequence.
#[derive(Clone, Debug)]
pub struct Random {
    seed: f64,
}

impl Random {
    // Seed must never be 0.
    pub fn new(seed: f64) -> Random {
        Random {
            seed: if seed > 0.0 { seed } else { 91648253.0 },
        }
    }

    /// Maps any integer seed onto the valid range of the generator.
    pub fn from_seed(seed: u64) -> Random {
        Random::new((seed % 2147483646 + 1) as f64)
    }

    // Returns a random float 0 <= x < 1.
    pub fn drand(&mut self) -> f64 {
        self.seed *= 1389796.0;
        let q = (self.seed / 2147483647.0) as i32;
        self.seed -= (q as f64) * 2147483647.0;
        self.seed / 2147483647.0
    }

    // Returns a random integer 0 <= x < size.
    pub fn irand(&mut self, size: usize) -> usize {
        (self.drand() * (size as f64)) as usize
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.drand() < p
    }

    /// Seed for a derived generator.
    pub fn fork(&mut self) -> Random {
        Random::new(1.0 + self.drand() * 2147483645.0)
    }

    /// Fisher–Yates.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.irand(i + 1);
            items.swap(i, j);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::Random;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Random::from_seed(42);
        let mut b = Random::from_seed(42);
        for _ in 0..100 {
            let x = a.drand();
            assert!(0.0 <= x && x < 1.0);
            assert_eq!(x, b.drand());
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rand = Random::from_seed(7);
        let mut items: Vec<usize> = (0..50).collect();
        rand.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted);
    }
}
