use feature_sampler::sample::{ExtensionPolicy, GeneratorSettings, NullMonitor, SampleRequest};
use feature_sampler::{generate, Cnf, Completion, LiteralSet, Order, Variables};
use proptest::prelude::*;


fn build(n: usize, clauses: &[Vec<i32>]) -> Cnf {
    let mut cnf = Cnf::new(Variables::anonymous(n));
    for c in clauses {
        cnf.add_clause(c.iter().cloned()).unwrap();
    }
    cnf
}

fn models(cnf: &Cnf) -> Vec<LiteralSet> {
    let n = cnf.n_vars();
    (0..1u32 << n)
        .map(|bits| {
            let raw: Vec<i32> = (0..n)
                .map(|i| if bits & (1 << i) != 0 { i as i32 + 1 } else { -(i as i32 + 1) })
                .collect();
            LiteralSet::from_model(&raw, n, Order::Index)
        })
        .filter(|m| cnf.is_satisfied_by(m))
        .collect()
}

// Up to six variables with up to ten clauses of one to three literals.
fn formula() -> impl Strategy<Value = (usize, Vec<Vec<i32>>)> {
    (1usize..=6).prop_flat_map(|n| {
        let lit = (1..=n as i32, any::<bool>()).prop_map(|(v, neg)| if neg { -v } else { v });
        (Just(n), prop::collection::vec(prop::collection::vec(lit, 1..=3), 0..=10))
    })
}


proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_sample_is_valid_and_distinct((n, clauses) in formula(), count in 0usize..20, seed in any::<u64>()) {
        let cnf = build(n, &clauses);
        let settings = GeneratorSettings { seed, ..GeneratorSettings::default() };
        let sample = generate(&cnf, &SampleRequest::Random { count }, &settings, ExtensionPolicy::FirstFit, &mut NullMonitor).unwrap();

        let all = models(&cnf);
        prop_assert_eq!(sample.len(), count.min(all.len()));
        if count > all.len() {
            prop_assert_eq!(sample.completion, Completion::Exhausted);
        }
        for (i, config) in sample.iter().enumerate() {
            prop_assert!(cnf.is_satisfied_by(config));
            prop_assert!(sample.configurations[..i].iter().all(|c| c != config));
        }
    }

    #[test]
    fn pairwise_sample_covers_feasible_pairs((n, clauses) in formula(), seed in any::<u64>()) {
        let cnf = build(n, &clauses);
        let settings = GeneratorSettings { seed, ..GeneratorSettings::default() };
        let request = SampleRequest::TWise { t: 2, groups: None, max: usize::MAX };
        let sample = generate(&cnf, &request, &settings, ExtensionPolicy::Shuffled, &mut NullMonitor).unwrap();

        let all = models(&cnf);
        for config in sample.iter() {
            prop_assert!(cnf.is_satisfied_by(config));
        }

        let mut infeasible = 0;
        for a in 1..=n as i32 {
            for b in a + 1..=n as i32 {
                for &(x, y) in &[(a, b), (a, -b), (-a, b), (-a, -b)] {
                    let feasible = all.iter().any(|m| m.contains(x) && m.contains(y));
                    let covered = sample.iter().any(|c| c.contains(x) && c.contains(y));
                    prop_assert_eq!(feasible, covered);
                    if !feasible {
                        infeasible += 1;
                    }
                }
            }
        }

        if !all.is_empty() {
            let coverage = sample.coverage.unwrap();
            prop_assert_eq!(coverage.infeasible, infeasible);
            prop_assert_eq!(coverage.uncovered, 0);
        }
    }
}
