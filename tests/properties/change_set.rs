//! Property tests for batch deduplication.

use proptest::prelude::*;

use microsync::domain::entities::{ChangeAction, ChangeSet, PathChange};

#[derive(Debug, Clone)]
enum Op {
    Add(usize, Vec<u8>),
    Modify(usize, Vec<u8>),
    Delete(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let path = 0usize..6;
    let bytes = proptest::collection::vec(any::<u8>(), 0..8);
    prop_oneof![
        (path.clone(), bytes.clone()).prop_map(|(p, b)| Op::Add(p, b)),
        (path.clone(), bytes).prop_map(|(p, b)| Op::Modify(p, b)),
        path.prop_map(Op::Delete),
    ]
}

fn name(index: usize) -> String {
    format!("dir/file{}.py", index)
}

fn to_change(op: &Op) -> PathChange {
    match op {
        Op::Add(p, b) => PathChange::add(name(*p), b.clone()),
        Op::Modify(p, b) => PathChange::modify(name(*p), b.clone()),
        Op::Delete(p) => PathChange::delete(name(*p)),
    }
}

fn index_of(op: &Op) -> usize {
    match op {
        Op::Add(p, _) | Op::Modify(p, _) | Op::Delete(p) => *p,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a drained batch holds each path once, in first-seen order,
    /// carrying the last observation for that path.
    #[test]
    fn property_drain_is_deduplicated_and_ordered(
        ops in proptest::collection::vec(op(), 0..40)
    ) {
        let mut set = ChangeSet::new();
        for op in &ops {
            set.apply(to_change(op));
        }

        let mut first_seen: Vec<usize> = Vec::new();
        for op in &ops {
            if !first_seen.contains(&index_of(op)) {
                first_seen.push(index_of(op));
            }
        }

        prop_assert_eq!(set.len(), first_seen.len());
        let drained = set.drain();
        prop_assert!(set.is_empty());

        let paths: Vec<String> = drained.iter().map(|c| c.relative_path().to_string()).collect();
        let expected: Vec<String> = first_seen.iter().map(|i| name(*i)).collect();
        prop_assert_eq!(paths, expected);

        for change in &drained {
            let last = ops
                .iter()
                .rev()
                .find(|op| name(index_of(op)) == change.relative_path())
                .map(to_change);
            let last = last.unwrap();
            prop_assert_eq!(change.action(), last.action());
            prop_assert_eq!(change.content(), last.content());
            if change.action() == ChangeAction::Delete {
                prop_assert!(change.content().is_none());
            }
        }
    }
}
