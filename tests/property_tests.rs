use std::collections::{BTreeSet, HashSet};

use erlink::{ClusterPartition, LinkOutcome};
use proptest::prelude::*;

/// Both indexes agree, clusters are disjoint and hold at least two members.
fn check_partition(p: &ClusterPartition) -> Result<(), TestCaseError> {
    for (entity, id) in p.elements() {
        prop_assert!(p.get(id).is_some_and(|m| m.contains(entity)));
    }
    let mut seen = HashSet::new();
    for (id, members) in p.iter() {
        prop_assert!(members.len() >= 2);
        for m in members {
            prop_assert_eq!(p.cluster_of(m), Some(id));
            prop_assert!(seen.insert(m.clone()), "{} in two clusters", m);
        }
    }
    prop_assert_eq!(seen.len(), p.num_elements());
    Ok(())
}

fn entity() -> impl Strategy<Value = String> {
    (0u8..30).prop_map(|i| format!("e{i}"))
}

#[derive(Debug, Clone)]
enum Op {
    Link(String, String),
    Remove(String),
    RemoveClusterOf(String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (entity(), entity()).prop_map(|(a, b)| Op::Link(a, b)),
        1 => entity().prop_map(Op::Remove),
        1 => entity().prop_map(Op::RemoveClusterOf),
    ]
}

proptest! {
    #[test]
    fn prop_from_sets_is_a_partition(
        groups in prop::collection::vec(prop::collection::vec(entity(), 2..5), 0..12)
    ) {
        // Groups that dedupe to a single member are rejected; skip those inputs.
        prop_assume!(groups.iter().all(|g| g.iter().collect::<BTreeSet<_>>().len() >= 2));
        let p = ClusterPartition::from_sets(groups.clone()).unwrap();
        check_partition(&p)?;

        // Members of one input group always end up together.
        for g in &groups {
            for w in g.windows(2) {
                prop_assert!(w[0] == w[1] || p.contains_pair(&w[0], &w[1]));
            }
        }
        let universe: BTreeSet<&String> = groups.iter().flatten().collect();
        prop_assert_eq!(universe.len(), p.num_elements());
    }

    #[test]
    fn prop_pairs_match_containment(ops in prop::collection::vec(op(), 0..60)) {
        let mut p = ClusterPartition::new();
        for op in ops {
            match op {
                Op::Link(a, b) => {
                    let before = p.clone();
                    match p.add_link(a.clone(), b.clone()) {
                        Ok(LinkOutcome::AlreadyLinked) => prop_assert_eq!(&p, &before),
                        Ok(_) => prop_assert!(p.contains_pair(&a, &b)),
                        Err(_) => {
                            prop_assert_eq!(&a, &b);
                            prop_assert_eq!(&p, &before);
                        }
                    }
                }
                Op::Remove(e) => {
                    let before = p.clone();
                    if p.remove(&e).is_err() {
                        prop_assert_eq!(&p, &before);
                    }
                    prop_assert!(!p.contains_entity(&e));
                }
                Op::RemoveClusterOf(e) => {
                    if let Some(id) = p.cluster_of(&e) {
                        let removed = p.remove_cluster(id).unwrap();
                        prop_assert!(removed.contains(&e));
                        prop_assert!(!p.contains_cluster(id));
                    }
                }
            }
            check_partition(&p)?;
        }

        let pairs: Vec<(&str, &str)> = p.all_pairs().collect();
        prop_assert_eq!(pairs.len(), p.number_of_links());
        for (a, b) in &pairs {
            prop_assert!(p.contains_pair(a, b));
        }

        let pair_set: HashSet<(&str, &str)> = pairs.iter().copied().collect();
        let ids: Vec<(&str, _)> = p.elements().collect();
        for (a, ca) in &ids {
            for (b, cb) in &ids {
                let listed = pair_set.contains(&(*a, *b)) || pair_set.contains(&(*b, *a));
                prop_assert_eq!(listed, a != b && ca == cb);
                prop_assert_eq!(p.contains_pair(a, b), a != b && ca == cb);
            }
        }
    }

    #[test]
    fn prop_sample_is_sub_partition(
        n_clusters in 1usize..15,
        seed in any::<u64>(),
        frac in 0.0f64..=1.0
    ) {
        let p = ClusterPartition::from_sets(
            (0..n_clusters).map(|i| vec![format!("a{i}"), format!("b{i}"), format!("c{i}")]),
        )
        .unwrap();
        let n = ((n_clusters as f64) * frac).floor() as usize;
        let s = p.sample(n, Some(seed)).unwrap();
        prop_assert_eq!(s.len(), n);
        check_partition(&s)?;
        for (id, members) in s.iter() {
            prop_assert_eq!(p.get(id), Some(members));
        }
        prop_assert_eq!(s, p.sample(n, Some(seed)).unwrap());
    }
}
