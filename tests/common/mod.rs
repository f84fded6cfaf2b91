//! Shared test fixtures for the crate-level integration suite.
//!
//! Builds a small English-like dictionary ({"the", "these", "there", "them"}
//! with REP rule `hte -> the`, no compound) matching the one spec.md §8's
//! concrete scenarios are defined against, using only `spellsuggest_core`'s
//! public API (the trie, language and rule-table constructors).
use std::collections::BTreeMap;
use std::sync::Once;

use spellsuggest_core::{CompoundRules, Language, RepRule, RepTable, SoundBuffer, Trie, WordFlags};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber once per test binary, honoring `RUST_LOG`
/// (e.g. `RUST_LOG=spellsuggest_core=trace cargo test -- --nocapture`) so the
/// walk's per-state `trace!`/`debug!` output is visible while debugging a
/// failing scenario.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Default)]
struct TrieNodeBuilder {
    children: BTreeMap<u8, TrieNodeBuilder>,
    terminal: bool,
}

/// Build a correctly-encoded compact trie over an arbitrary word list, by
/// assembling a conventional tree first and flattening it into the
/// `byts`/`idxs` two-array form (spec.md §4.1), with each node's terminal
/// `0` byte entry sorted first.
pub fn build_trie(words: &[&str]) -> Trie {
    let mut root = TrieNodeBuilder::default();
    for word in words {
        let mut cur = &mut root;
        for &b in word.as_bytes() {
            cur = cur.children.entry(b).or_default();
        }
        cur.terminal = true;
    }

    let mut byts: Vec<u8> = Vec::new();
    let mut idxs: Vec<u32> = Vec::new();
    fn alloc(node: &TrieNodeBuilder, byts: &mut Vec<u8>, idxs: &mut Vec<u32>) -> usize {
        let mut entries: Vec<(u8, Option<&TrieNodeBuilder>)> = Vec::new();
        if node.terminal {
            entries.push((0, None));
        }
        for (&b, child) in &node.children {
            entries.push((b, Some(child)));
        }
        let my_offset = byts.len();
        byts.push(entries.len() as u8);
        idxs.push(0);
        for _ in &entries {
            byts.push(0);
            idxs.push(0);
        }
        for (i, (b, child)) in entries.iter().enumerate() {
            byts[my_offset + 1 + i] = *b;
            idxs[my_offset + 1 + i] = match child {
                None => WordFlags::empty().to_raw(0, 0),
                Some(child_node) => alloc(child_node, byts, idxs) as u32,
            };
        }
        my_offset
    }
    alloc(&root, &mut byts, &mut idxs);
    Trie::new(byts, idxs).expect("well-formed test trie")
}

/// The dictionary spec.md §8's concrete scenarios are defined against.
pub fn scenario_language() -> Language {
    let fold_trie = build_trie(&["the", "these", "there", "them"]);
    let rep_rules =
        RepTable::build(vec![RepRule { from: "hte".into(), to: "the".into() }]).expect("valid rep table");
    Language::from_parts(
        fold_trie,
        None,
        None,
        None,
        SoundBuffer::default(),
        rep_rules,
        RepTable::new(),
        CompoundRules::default(),
        0,
    )
}

/// A single-word dictionary, for scenarios that only need one target word
/// and no REP rules.
pub fn single_word_language(word: &str) -> Language {
    let fold_trie = build_trie(&[word]);
    Language::from_parts(
        fold_trie,
        None,
        None,
        None,
        SoundBuffer::default(),
        RepTable::new(),
        RepTable::new(),
        CompoundRules::default(),
        0,
    )
}
