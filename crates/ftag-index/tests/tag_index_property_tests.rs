use ftag_index::{decode_index, encode_index, Record, TagIndex};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn tag_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["work", "home", "urgent", "draft", "x", "y"]).prop_map(String::from)
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(vec!["a.txt", "b.txt", "c.md", "dir/d.rs"]),
        prop::collection::vec(tag_strategy(), 0..6),
    )
        .prop_map(|(path, tags)| Record::new(path, tags))
}

/// Indexes built only through `add_or_merge`, so paths are unique.
fn index_strategy() -> impl Strategy<Value = TagIndex> {
    prop::collection::vec(record_strategy(), 0..12).prop_map(|records| {
        let mut index = TagIndex::new();
        for r in records {
            index.add_or_merge(r);
        }
        index
    })
}

fn tag_set(record: &Record) -> BTreeSet<&str> {
    record.tags().iter().map(String::as_str).collect()
}

proptest! {
    #[test]
    fn prop_round_trip(index in index_strategy()) {
        let bytes = encode_index(&index).unwrap();
        prop_assert_eq!(decode_index(&bytes).unwrap(), index);
    }

    #[test]
    fn prop_paths_stay_unique(index in index_strategy()) {
        let paths: BTreeSet<&str> = index.iter().map(Record::path).collect();
        prop_assert_eq!(paths.len(), index.len());
    }

    #[test]
    fn prop_tags_stay_unique(index in index_strategy()) {
        for r in &index {
            prop_assert_eq!(tag_set(r).len(), r.tags().len());
        }
    }

    #[test]
    fn prop_re_add_is_idempotent(index in index_strategy(), r in record_strategy()) {
        let mut once = index.clone();
        once.add_or_merge(r.clone());
        let mut twice = once.clone();
        twice.add_or_merge(r.clone());

        let last = twice.records().last().unwrap();
        prop_assert_eq!(last.path(), r.path());
        prop_assert_eq!(tag_set(last), tag_set(once.get(r.path()).unwrap()));
        prop_assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn prop_merge_keeps_old_and_new_tags(index in index_strategy(), r in record_strategy()) {
        let before: BTreeSet<String> = index
            .get(r.path())
            .map(|old| old.tags().iter().cloned().collect())
            .unwrap_or_default();

        let mut after = index.clone();
        let merged = after.add_or_merge(r.clone()).clone();

        let mut expected = before;
        expected.extend(r.tags().iter().cloned());
        let got: BTreeSet<String> = merged.tags().iter().cloned().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_query_matches_naive_filter(index in index_strategy(), tag in tag_strategy()) {
        let got: Vec<&Record> = index.query(&tag).collect();
        let expected: Vec<&Record> = index
            .records()
            .iter()
            .filter(|r| r.tags().iter().any(|t| *t == tag))
            .collect();
        prop_assert_eq!(got, expected);
    }
}
