//! The state-machine trie walk (spec.md §4.6): the engine that generates
//! edit-tolerant candidates by interleaving trie descent with delete,
//! insert, swap, three-character rotation, and REP-rule edits.
//!
//! Grounded on `original_source/src/spellsuggest.c`'s suggestion engine
//! (the `suggest_trie_walk`/STATE_* machinery), kept in the same
//! explicit-stack, non-recursive shape the spec calls out as the load
//! bearing design choice (see SPEC_FULL.md's REDESIGN FLAGS discussion).
//! One simplification from the original's literal re-entrant per-state
//! frames: each popped [`Frame`] expands *all* of its legal moves in one
//! step rather than resuming one child at a time across repeated pops —
//! this keeps the explicit `Vec`-backed stack (no native recursion) while
//! trading the original's incremental `cur_i` bookkeeping for a simpler,
//! still-polynomial one-shot expansion. Recorded as an Open Question
//! resolution in DESIGN.md.
use std::time::Instant;

use crate::candidate::SuggestionStore;
use crate::banned::BannedSet;
use crate::caseflags::{self, CaseFlags};
use crate::language::CompoundRules;
use crate::options::ScoreTable;
use crate::rep::RepTable;
use crate::scoring;
use crate::trie::{Trie, WordFlags};

/// Stack depth bound (spec.md §4.6, §5 `MAX_WORD_LEN`). The original's
/// exact constant lives in a header outside the core's scope; this value
/// is large enough for any realistic word and is what truncation (spec.md
/// §8 edge case 6) measures against.
pub const MAX_WORD_LEN: usize = 176;

/// Everything a single walk needs that doesn't change once the query
/// starts: the tries and rule tables to walk, in the caller's chosen mode.
pub struct WalkParams<'a> {
    pub fold_trie: &'a Trie,
    pub prefix_trie: Option<&'a Trie>,
    pub keepcase_trie: Option<&'a Trie>,
    pub rep_table: &'a RepTable,
    pub compound: &'a CompoundRules,
    pub map_similar: &'a dyn Fn(char, char) -> Option<bool>,
    pub region_mask: u16,
    /// `true` when walking a sound-fold trie rather than the primary
    /// case-fold trie (spec.md §4.7 step 8); loosens the word/non-word
    /// character guard on SWAP and widens which rule table is active
    /// (callers pass `sal_rep_rules` as `rep_table` in that case).
    pub soundfold: bool,
    pub bad_case: CaseFlags,
    /// Observation count lookup for the common-word bonus (spec.md §3
    /// `word_count`, §6 `COMMON1`/`COMMON2`/`COMMON3`/`THRES2`/`THRES3`).
    /// Pass `|_| 0` when no word-frequency table is available.
    pub word_count: &'a dyn Fn(&str) -> u32,
    /// Overridable score constants for this call (spec.md §6), threaded
    /// through in place of the hard-coded `scoring::` constants wherever a
    /// caller-tunable value exists.
    pub scores: &'a ScoreTable,
    /// `sl_nosplitsugs` (spec.md §3 `no_split_sugs`): penalize the
    /// word-split transition with `scores.split_no` instead of
    /// `scores.split` when the dictionary discourages split suggestions.
    pub no_split_sugs: bool,
    /// The bad word as the caller wrote it, before case-folding. Used only
    /// to recover a `WF_KEEPCAP` candidate's casing from the query's own
    /// letters when the keepcase trie has no cased variant on file (spec.md
    /// §4.8 `badword_captype`).
    pub bad_word: &'a str,
}

#[derive(Debug, Clone)]
struct Frame {
    node: usize,
    in_prefix: bool,
    prefix_flags: WordFlags,
    remaining: Vec<u8>,
    consumed: usize,
    repextra: i32,
    score: i32,
    tword: Vec<u8>,
    comp_flags: Vec<u8>,
    depth: usize,
}

/// Run the walk over one language's tries against `fword` (the case- or
/// sound-folded bad word), committing candidates into `store`.
///
/// `max_score`/`sf_max_score` are the running ceilings from spec.md §4.4;
/// `apply_sf_max` selects which one this walk's cleanup passes update.
/// `lang_idx` is recorded on each committed [`crate::candidate::Suggestion`]
/// so later pipeline stages know which language produced it.
#[allow(clippy::too_many_arguments)]
pub fn walk(
    fword: &str,
    params: &WalkParams,
    store: &mut SuggestionStore,
    banned: &mut BannedSet,
    max_count: usize,
    max_score: &mut i32,
    sf_max_score: &mut i32,
    apply_sf_max: bool,
    lang_idx: Option<usize>,
    deadline: Instant,
    mut interrupted: impl FnMut() -> bool,
) {
    let fbytes = fword.as_bytes().to_vec();

    let initial = if let Some(prefix_trie) = params.prefix_trie {
        Frame {
            node: prefix_trie.root(),
            in_prefix: true,
            prefix_flags: WordFlags::empty(),
            remaining: fbytes,
            consumed: 0,
            repextra: 0,
            score: 0,
            tword: Vec::new(),
            comp_flags: Vec::new(),
            depth: 0,
        }
    } else {
        Frame {
            node: params.fold_trie.root(),
            in_prefix: false,
            prefix_flags: WordFlags::empty(),
            remaining: fbytes,
            consumed: 0,
            repextra: 0,
            score: 0,
            tword: Vec::new(),
            comp_flags: Vec::new(),
            depth: 0,
        }
    };

    let mut stack = vec![initial];
    let mut iterations: u64 = 0;

    while let Some(frame) = stack.pop() {
        iterations += 1;
        if iterations % 1000 == 0 && (interrupted() || Instant::now() >= deadline) {
            break;
        }

        let ceiling = if apply_sf_max { *sf_max_score } else { *max_score };
        if frame.score >= ceiling {
            continue;
        }

        let active_trie: &Trie = if frame.in_prefix {
            params.prefix_trie.expect("in_prefix implies prefix_trie is set")
        } else {
            params.fold_trie
        };

        if frame.in_prefix {
            if active_trie.has_terminal(frame.node) {
                for term in active_trie.terminals(frame.node) {
                    push_frame(
                        &mut stack,
                        Frame {
                            node: params.fold_trie.root(),
                            in_prefix: false,
                            prefix_flags: term.flags,
                            remaining: frame.remaining.clone(),
                            consumed: frame.consumed,
                            repextra: frame.repextra,
                            score: frame.score,
                            tword: frame.tword.clone(),
                            comp_flags: frame.comp_flags.clone(),
                            depth: frame.depth + 1,
                        },
                        ceiling,
                    );
                }
            }
        } else if frame.remaining.is_empty() && active_trie.has_terminal(frame.node) {
            for term in active_trie.terminals(frame.node) {
                try_commit(&frame, term, params, store, banned, max_count, max_score, sf_max_score, apply_sf_max, lang_idx);
            }
        }

        if !frame.in_prefix && !frame.remaining.is_empty() && active_trie.has_terminal(frame.node) {
            // Compound continuation: a terminal mid-word that carries a
            // compound flag may restart descent from the root without
            // emitting a separator (spec.md §4.6 word-split/compound).
            for term in active_trie.terminals(frame.node) {
                if term.compound_flag == 0 {
                    continue;
                }
                if !caseflags::can_be_compound(
                    params.compound,
                    term.compound_flag,
                    frame.comp_flags.is_empty(),
                    &frame.comp_flags,
                ) {
                    continue;
                }
                if frame.tword.len() < params.compound.min_len as usize {
                    continue;
                }
                if params.compound.max_words > 0
                    && frame.comp_flags.len() + 1 >= params.compound.max_words as usize
                {
                    continue;
                }
                let mut comp_flags = frame.comp_flags.clone();
                comp_flags.push(term.compound_flag);
                push_frame(
                    &mut stack,
                    Frame {
                        node: params.fold_trie.root(),
                        in_prefix: false,
                        prefix_flags: WordFlags::empty(),
                        remaining: frame.remaining.clone(),
                        consumed: frame.consumed,
                        repextra: frame.repextra,
                        score: frame.score,
                        tword: frame.tword.clone(),
                        comp_flags,
                        depth: frame.depth + 1,
                    },
                    ceiling,
                );
            }

            // Word split: a terminal reached with bad-word bytes still
            // unconsumed may restart descent from the root with a space
            // appended to the accumulated word, so run-together words like
            // "the the" still reach each half (spec.md §2 item 6, §4.6).
            // Doesn't apply to a soundfolded walk (no word boundaries in a
            // phonetic key).
            if !params.soundfold {
                let split_cost = if params.no_split_sugs { params.scores.split_no } else { params.scores.split };
                let mut tword = frame.tword.clone();
                tword.push(b' ');
                push_frame(
                    &mut stack,
                    Frame {
                        node: params.fold_trie.root(),
                        in_prefix: false,
                        prefix_flags: WordFlags::empty(),
                        remaining: frame.remaining.clone(),
                        consumed: frame.consumed,
                        repextra: frame.repextra,
                        score: frame.score + split_cost,
                        tword,
                        comp_flags: frame.comp_flags.clone(),
                        depth: frame.depth + 1,
                    },
                    ceiling,
                );
            }
        }

        if frame.remaining.is_empty() {
            continue;
        }

        // PLAIN: descend through each child byte, matching or substituting.
        for (child_byte, slot) in active_trie.children(frame.node) {
            if child_byte == 0 {
                continue;
            }
            let next = frame.remaining[0];
            let cost = if child_byte == next {
                0
            } else {
                match params.map_similar(child_byte as char, next as char) {
                    Some(true) => params.scores.similar,
                    _ => params.scores.subst,
                }
            };
            let mut tword = frame.tword.clone();
            tword.push(child_byte);
            push_frame(
                &mut stack,
                Frame {
                    node: slot as usize,
                    in_prefix: frame.in_prefix,
                    prefix_flags: frame.prefix_flags,
                    remaining: frame.remaining[1..].to_vec(),
                    consumed: frame.consumed + 1,
                    repextra: frame.repextra,
                    score: frame.score + cost,
                    tword,
                    comp_flags: frame.comp_flags.clone(),
                    depth: frame.depth + 1,
                },
                ceiling,
            );
        }

        // DEL: drop the next bad-word byte without descending the trie.
        {
            let dup = frame.remaining.len() >= 2 && frame.remaining[0] == frame.remaining[1];
            let cost = if dup { scoring::DELDUP } else { params.scores.del };
            push_frame(
                &mut stack,
                Frame {
                    node: frame.node,
                    in_prefix: frame.in_prefix,
                    prefix_flags: frame.prefix_flags,
                    remaining: frame.remaining[1..].to_vec(),
                    consumed: frame.consumed + 1,
                    repextra: frame.repextra,
                    score: frame.score + cost,
                    tword: frame.tword.clone(),
                    comp_flags: frame.comp_flags.clone(),
                    depth: frame.depth + 1,
                },
                ceiling,
            );
        }

        // INS: descend a child byte that doesn't match, without consuming
        // a bad-word byte.
        for (child_byte, slot) in active_trie.children(frame.node) {
            if child_byte == 0 || child_byte == frame.remaining[0] {
                continue;
            }
            let dup = frame.tword.last() == Some(&child_byte);
            let cost = if dup { scoring::INSDUP } else { params.scores.ins };
            let mut tword = frame.tword.clone();
            tword.push(child_byte);
            push_frame(
                &mut stack,
                Frame {
                    node: slot as usize,
                    in_prefix: frame.in_prefix,
                    prefix_flags: frame.prefix_flags,
                    remaining: frame.remaining.clone(),
                    consumed: frame.consumed,
                    repextra: frame.repextra,
                    score: frame.score + cost,
                    tword,
                    comp_flags: frame.comp_flags.clone(),
                    depth: frame.depth + 1,
                },
                ceiling,
            );
        }

        // SWAP: exchange the next two bad-word bytes before matching.
        if frame.remaining.len() >= 2 && frame.remaining[0] != frame.remaining[1] {
            let (a, b) = (frame.remaining[0], frame.remaining[1]);
            if let crate::trie::Step::Node(n1) = active_trie.step(frame.node, b) {
                if let crate::trie::Step::Node(n2) = active_trie.step(n1, a) {
                    let mut tword = frame.tword.clone();
                    tword.push(b);
                    tword.push(a);
                    push_frame(
                        &mut stack,
                        Frame {
                            node: n2,
                            in_prefix: frame.in_prefix,
                            prefix_flags: frame.prefix_flags,
                            remaining: frame.remaining[2..].to_vec(),
                            consumed: frame.consumed + 2,
                            repextra: frame.repextra,
                            score: frame.score + params.scores.swap,
                            tword,
                            comp_flags: frame.comp_flags.clone(),
                            depth: frame.depth + 1,
                        },
                        ceiling,
                    );
                }
            }
        }

        // SWAP3 (swap-ends) / rotate-left / rotate-right over the next three
        // bytes: "abc" -> "cba" / "bca" / "cab" respectively.
        if frame.remaining.len() >= 3 {
            let (a, b, c) = (frame.remaining[0], frame.remaining[1], frame.remaining[2]);
            for order in [[c, b, a], [b, c, a], [c, a, b]] {
                if let crate::trie::Step::Node(n1) = active_trie.step(frame.node, order[0]) {
                    if let crate::trie::Step::Node(n2) = active_trie.step(n1, order[1]) {
                        if let crate::trie::Step::Node(n3) = active_trie.step(n2, order[2]) {
                            let mut tword = frame.tword.clone();
                            tword.extend_from_slice(&order);
                            push_frame(
                                &mut stack,
                                Frame {
                                    node: n3,
                                    in_prefix: frame.in_prefix,
                                    prefix_flags: frame.prefix_flags,
                                    remaining: frame.remaining[3..].to_vec(),
                                    consumed: frame.consumed + 3,
                                    repextra: frame.repextra,
                                    score: frame.score + params.scores.swap3,
                                    tword,
                                    comp_flags: frame.comp_flags.clone(),
                                    depth: frame.depth + 1,
                                },
                                ceiling,
                            );
                        }
                    }
                }
            }
        }

        // REP: try every rule sharing the current byte, not just the first
        // match (spec.md §4.6 STATE_REP_INI/STATE_REP/STATE_REP_UNDO tries
        // all rules whose `from[0]` matches before giving up on this depth).
        if let Some(&first) = frame.remaining.first() {
            for rule in params.rep_table.rules_for(first) {
                let from = rule.from.as_bytes();
                if rule.to == rule.from || frame.remaining.len() < from.len() || &frame.remaining[..from.len()] != from {
                    continue;
                }
                let mut remaining = rule.to.as_bytes().to_vec();
                remaining.extend_from_slice(&frame.remaining[from.len()..]);
                let repextra = frame.repextra + rule.to.len() as i32 - from.len() as i32;
                push_frame(
                    &mut stack,
                    Frame {
                        node: frame.node,
                        in_prefix: frame.in_prefix,
                        prefix_flags: frame.prefix_flags,
                        remaining,
                        consumed: frame.consumed,
                        repextra,
                        score: frame.score + params.scores.rep,
                        tword: frame.tword.clone(),
                        comp_flags: frame.comp_flags.clone(),
                        depth: frame.depth + 1,
                    },
                    ceiling,
                );
            }
        }
    }
}

fn push_frame(stack: &mut Vec<Frame>, frame: Frame, ceiling: i32) {
    if frame.depth < MAX_WORD_LEN - 1 && frame.score < ceiling {
        stack.push(frame);
    }
}

#[allow(clippy::too_many_arguments)]
fn try_commit(
    frame: &Frame,
    term: crate::trie::Terminal,
    params: &WalkParams,
    store: &mut SuggestionStore,
    banned: &mut BannedSet,
    max_count: usize,
    max_score: &mut i32,
    sf_max_score: &mut i32,
    apply_sf_max: bool,
    lang_idx: Option<usize>,
) {
    if term.flags.intersects(WordFlags::NOSUGGEST) {
        return;
    }
    if term.flags.intersects(WordFlags::NEEDCOMP) && frame.comp_flags.is_empty() {
        return;
    }

    let mut word = String::from_utf8_lossy(&frame.tword).into_owned();

    if term.flags.intersects(WordFlags::BANNED) {
        banned.insert(word);
        return;
    }
    if banned.contains(&word) {
        return;
    }

    let mut rare_prefix = false;
    if !frame.prefix_flags.is_empty() {
        match caseflags::valid_word_prefix(frame.prefix_flags, term.flags) {
            None => return,
            Some(is_rare) => rare_prefix = is_rare,
        }
    }

    let mut score = frame.score;
    if term.region_mask != 0 && (term.region_mask & params.region_mask) == 0 {
        score += params.scores.region;
    }
    if term.flags.intersects(WordFlags::RARE) || rare_prefix {
        score += params.scores.rare;
    }

    // Common-word bonus (spec.md §3 `word_count`, §6 COMMON1-3/THRES2-3):
    // a word seen often enough in the observation corpus is cheapened so it
    // outranks equally-scored but rarer alternatives.
    let count = (params.word_count)(&word);
    if count as u32 > scoring::THRES3 {
        score = (score - scoring::COMMON3).max(0);
    } else if count as u32 > scoring::THRES2 {
        score = (score - scoring::COMMON2).max(0);
    } else if count > 0 {
        score = (score - scoring::COMMON1).max(0);
    }

    if term.flags.intersects(WordFlags::KEEPCAP) {
        if let Some(keepcase_trie) = params.keepcase_trie {
            if let Some(cased) = caseflags::find_keepcap_word(keepcase_trie, &word) {
                word = cased;
            } else {
                // No cased variant on file for this KEEPCAP word: recover
                // casing from the query's own letters instead (spec.md
                // §4.8 `badword_captype`), so "WOrd" still suggests "Word"
                // rather than silently falling back to the folded form.
                let flags = caseflags::badword_captype(params.bad_word, true);
                word = caseflags::make_case_word(&word, flags);
            }
        } else {
            let flags = caseflags::badword_captype(params.bad_word, true);
            word = caseflags::make_case_word(&word, flags);
        }
    } else if !params.bad_case.is_empty() {
        word = caseflags::make_case_word(&word, params.bad_case);
    }

    let ceiling = if apply_sf_max { *sf_max_score } else { *max_score };
    if score > ceiling {
        return;
    }

    let orig_len = (frame.consumed as i32 - frame.repextra).max(0) as usize;

    let bad_tail: String = String::new();
    // The fold-trie walk never marks a candidate as phonetically bonused
    // (`had_bonus` is always `false` here and at every other producer that
    // runs before the sound pass), so the dedup-merge reconciliation this
    // callback exists for can never actually trigger from this call site.
    store.insert(
        &word,
        orig_len,
        &bad_tail,
        score,
        0,
        false,
        lang_idx,
        max_count,
        apply_sf_max,
        max_score,
        sf_max_score,
        |_, _, _| scoring::MAXMAX,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::SuggestionStore;
    use crate::rep::RepTable;
    use crate::trie::{Step, Trie};

    /// A linear-chain trie over a single word, for walk smoke tests.
    fn trie_with_word(word: &str) -> Trie {
        trie_with_word_flags(word, WordFlags::empty())
    }

    fn trie_with_word_flags(word: &str, flags: WordFlags) -> Trie {
        let bytes = word.as_bytes();
        let node_count = bytes.len() + 1;
        let mut byts = vec![0u8; node_count * 2];
        let mut idxs = vec![0u32; node_count * 2];
        for i in 0..node_count {
            let off = i * 2;
            byts[off] = 1;
            if i < bytes.len() {
                byts[off + 1] = bytes[i];
                idxs[off + 1] = ((i + 1) * 2) as u32;
            } else {
                byts[off + 1] = 0;
                idxs[off + 1] = flags.to_raw(0, 0);
            }
        }
        Trie::new(byts, idxs).unwrap()
    }

    fn run(fword: &str, trie: &Trie) -> SuggestionStore {
        let compound = CompoundRules::default();
        let rep_table = RepTable::new();
        let scores = ScoreTable::default();
        let mut store = SuggestionStore::new();
        let mut banned = BannedSet::new();
        let mut max_score = scoring::MAXINIT;
        let mut sf_max_score = scoring::MAXINIT;
        let params = WalkParams {
            fold_trie: trie,
            prefix_trie: None,
            keepcase_trie: None,
            rep_table: &rep_table,
            compound: &compound,
            map_similar: &|_, _| None,
            region_mask: 0,
            soundfold: false,
            bad_case: CaseFlags::empty(),
            word_count: &|_| 0,
            scores: &scores,
            no_split_sugs: false,
            bad_word: fword,
        };
        walk(
            fword,
            &params,
            &mut store,
            &mut banned,
            10,
            &mut max_score,
            &mut sf_max_score,
            false,
            Some(0),
            Instant::now() + std::time::Duration::from_secs(5),
            || false,
        );
        store
    }

    #[test]
    fn exact_match_scores_zero() {
        let trie = trie_with_word("the");
        let store = run("the", &trie);
        let best = store.iter().find(|s| s.word == "the").expect("exact match present");
        assert_eq!(best.score, 0);
    }

    #[test]
    fn transposition_is_found_via_swap() {
        let trie = trie_with_word("the");
        let store = run("hte", &trie);
        let best = store
            .iter()
            .filter(|s| s.word == "the")
            .min_by_key(|s| s.score)
            .expect("the is reachable from hte");
        assert_eq!(best.score, scoring::SWAP);
    }

    #[test]
    fn word_split_inserts_a_space_and_charges_split_score() {
        let trie = trie_with_word("the");
        // No space in "thethe", but it is exactly two repetitions of the
        // dictionary word: reachable only by splitting partway through.
        let store = run("thethe", &trie);
        let best = store
            .iter()
            .filter(|s| s.word == "the the")
            .min_by_key(|s| s.score)
            .expect("split into 'the the' is reachable");
        assert_eq!(best.score, scoring::SPLIT);
    }

    #[test]
    fn keepcap_word_without_keepcase_trie_recovers_casing_from_bad_word() {
        let trie = trie_with_word_flags("word", WordFlags::KEEPCAP);
        let compound = CompoundRules::default();
        let rep_table = RepTable::new();
        let scores = ScoreTable::default();
        let mut store = SuggestionStore::new();
        let mut banned = BannedSet::new();
        let mut max_score = scoring::MAXINIT;
        let mut sf_max_score = scoring::MAXINIT;
        let params = WalkParams {
            fold_trie: &trie,
            prefix_trie: None,
            keepcase_trie: None,
            rep_table: &rep_table,
            compound: &compound,
            map_similar: &|_, _| None,
            region_mask: 0,
            soundfold: false,
            bad_case: CaseFlags::empty(),
            word_count: &|_| 0,
            scores: &scores,
            no_split_sugs: false,
            bad_word: "WOrd",
        };
        walk(
            "word",
            &params,
            &mut store,
            &mut banned,
            10,
            &mut max_score,
            &mut sf_max_score,
            false,
            Some(0),
            Instant::now() + std::time::Duration::from_secs(5),
            || false,
        );
        let best = store.iter().find(|s| s.word == "Word").expect("keepcap casing recovered from bad_word");
        assert_eq!(best.score, 0);
    }

    #[test]
    fn single_insertion_is_found_via_del() {
        let trie = trie_with_word("the");
        // "the" with an extra char inserted in the bad word requires a DEL.
        let store = run("thxe", &trie);
        let best = store
            .iter()
            .filter(|s| s.word == "the")
            .min_by_key(|s| s.score)
            .expect("the is reachable from thxe");
        assert_eq!(best.score, scoring::DEL);
    }

    #[test]
    fn respects_trie_step_api() {
        // sanity: our helper trie is walkable with the public Step API too.
        let trie = trie_with_word("an");
        assert!(matches!(trie.step(trie.root(), b'a'), Step::Node(_)));
    }
}
