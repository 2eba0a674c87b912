use std::collections::HashMap;
use crate::cnf::LiteralSet;


/// Number of `k`-subsets of `n` elements, saturating.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: usize = 1;
    for i in 0..k {
        acc = match acc.checked_mul(n - i) {
            Some(x) => x / (i + 1),
            None => return usize::MAX,
        };
    }
    acc
}


/// Position in the enumeration of `t`-combinations of expression indices,
/// group after group. Within a group the order is colexicographic: every
/// combination ending at expression `k` comes before any that reaches past
/// it. Holds no reference to the groups so it can live next to them.
#[derive(Clone, Debug)]
pub struct Cursor {
    t: usize,
    group: usize,
    indices: Option<Vec<usize>>,
}

impl Cursor {
    pub fn new(groups: &[Vec<LiteralSet>], t: usize) -> Self {
        let mut cursor = Cursor {
            t,
            group: 0,
            indices: None,
        };
        cursor.enter_group(groups);
        cursor
    }

    // Moves to the first group, from the current one on, with at least `t` expressions.
    fn enter_group(&mut self, groups: &[Vec<LiteralSet>]) {
        while self.group < groups.len() {
            if self.t > 0 && groups[self.group].len() >= self.t {
                self.indices = Some((0..self.t).collect());
                return;
            }
            self.group += 1;
        }
        self.indices = None;
    }

    fn advance(&mut self, groups: &[Vec<LiteralSet>]) {
        let n = groups[self.group].len();
        if let Some(ref mut idx) = self.indices {
            // Bump the lowest index that has room below its successor and
            // pack everything under it.
            for i in 0..idx.len() {
                let bound = if i + 1 < idx.len() { idx[i + 1] } else { n };
                if idx[i] + 1 < bound {
                    idx[i] += 1;
                    for (j, slot) in idx.iter_mut().enumerate().take(i) {
                        *slot = j;
                    }
                    return;
                }
            }
        }
        self.group += 1;
        self.enter_group(groups);
    }

    /// Next union of expressions; unions holding a literal and its
    /// complement are skipped.
    pub fn next_in(&mut self, groups: &[Vec<LiteralSet>]) -> Option<LiteralSet> {
        loop {
            let combination = {
                let idx = self.indices.as_ref()?;
                let group = &groups[self.group];
                LiteralSet::new(idx.iter().flat_map(|&i| group[i].literals()))
            };
            self.advance(groups);

            if !combination.is_contradictory() {
                return Some(combination);
            }
        }
    }
}


/// Number of candidates `groups` yields for strength `t`, without building
/// them. Exact for groups of single literals; a group holding a compound
/// expression contributes its binomial, an upper bound.
pub fn consistent_total(groups: &[Vec<LiteralSet>], t: usize) -> usize {
    groups.iter().fold(0usize, |acc, group| {
        let n = if group.iter().all(|e| e.len() == 1) {
            consistent_singletons(group, t)
        } else {
            binomial(group.len(), t)
        };
        acc.saturating_add(n)
    })
}

// Coefficient of x^t in the product over variables of
// (1 + x)^pos + (1 + x)^neg - 1, where pos and neg count the expressions
// holding each polarity.
fn consistent_singletons(group: &[LiteralSet], t: usize) -> usize {
    let mut polarities: HashMap<u32, (usize, usize)> = HashMap::new();
    for lit in group.iter().flat_map(|e| e.literals()) {
        let entry = polarities.entry(lit.unsigned_abs()).or_insert((0, 0));
        if lit > 0 {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    let mut coeffs = vec![0usize; t + 1];
    coeffs[0] = 1;
    for &(pos, neg) in polarities.values() {
        let factor: Vec<usize> = (0..=t)
            .map(|k| {
                let c = binomial(pos, k).saturating_add(binomial(neg, k));
                if k == 0 {
                    c - 1
                } else {
                    c
                }
            })
            .collect();

        let mut next = vec![0usize; t + 1];
        for (i, &a) in coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in factor.iter().enumerate().take(t + 1 - i) {
                next[i + j] = next[i + j].saturating_add(a.saturating_mul(b));
            }
        }
        coeffs = next;
    }
    coeffs[t]
}


#[cfg(test)]
mod tests {
    use super::*;

    fn singletons(lits: &[i32]) -> Vec<LiteralSet> {
        lits.iter().map(|&l| LiteralSet::new(vec![l])).collect()
    }

    fn enumerate(groups: &[Vec<LiteralSet>], t: usize) -> Vec<Vec<i32>> {
        let mut cursor = Cursor::new(groups, t);
        let mut out = Vec::new();
        while let Some(c) = cursor.next_in(groups) {
            out.push(c.into_vec());
        }
        out
    }

    #[test]
    fn binomials() {
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(6, 3), 20);
        assert_eq!(binomial(3, 0), 1);
        assert_eq!(binomial(2, 3), 0);
    }

    #[test]
    fn pairs_in_colex_order_without_conflicts() {
        let groups = vec![singletons(&[1, -1, 2, -2])];
        let pairs: Vec<Vec<i32>> = enumerate(&groups, 2);
        assert_eq!(pairs, vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]);
        assert_eq!(consistent_total(&groups, 2), 4);
    }

    #[test]
    fn triples_end_at_each_expression_in_turn() {
        let groups = vec![singletons(&[1, 2, 3, 4])];
        let triples: Vec<Vec<i32>> = enumerate(&groups, 3);
        assert_eq!(triples, vec![vec![1, 2, 3], vec![1, 2, 4], vec![1, 3, 4], vec![2, 3, 4]]);
    }

    #[test]
    fn consistent_total_matches_enumeration() {
        let domain: Vec<i32> = (1..=5).flat_map(|v| vec![v, -v]).collect();
        let groups = vec![singletons(&domain), singletons(&[1, 1, -1, 2]), singletons(&[3])];
        for t in 1..=4 {
            assert_eq!(consistent_total(&groups, t), enumerate(&groups, t).len(), "t = {}", t);
        }
        // C(n, t) * 2^t over a full literal domain.
        assert_eq!(consistent_total(&[singletons(&domain)], 3), 10 * 8);
    }

    #[test]
    fn consistent_total_bounds_compound_groups() {
        let groups = vec![vec![LiteralSet::new(vec![1, 2]), LiteralSet::new(vec![-1]), LiteralSet::new(vec![3])]];
        assert_eq!(enumerate(&groups, 2).len(), 2);
        assert_eq!(consistent_total(&groups, 2), 3);
    }

    #[test]
    fn consistent_total_of_large_domain_is_arithmetic() {
        let domain: Vec<i32> = (1..=400).flat_map(|v| vec![v, -v]).collect();
        assert_eq!(consistent_total(&[singletons(&domain)], 3), binomial(400, 3) * 8);
    }

    #[test]
    fn groups_are_combined_separately() {
        let groups = vec![singletons(&[1]), singletons(&[2, 3]), singletons(&[-4, 5])];
        let singles: Vec<Vec<i32>> = enumerate(&groups, 1);
        assert_eq!(singles, vec![vec![1], vec![2], vec![3], vec![-4], vec![5]]);

        let pairs: Vec<Vec<i32>> = enumerate(&groups, 2);
        assert_eq!(pairs, vec![vec![2, 3], vec![-4, 5]]);
    }

    #[test]
    fn strength_above_group_size_yields_nothing() {
        let groups = vec![singletons(&[1, 2])];
        assert_eq!(enumerate(&groups, 3).len(), 0);
    }
}
