//! Suggestion pipeline orchestration (spec.md §4.7 `find_suggest`).
//!
//! Grounded on `original_source/src/spellsuggest.c`'s `spell_suggest` /
//! `suggest_try` driver functions, which run the same sequence this module
//! implements: fold-trie walk per language, optional sound-trie walk with
//! progressively relaxed score ceilings, rescoring, and a final sort +
//! truncate. The teacher has no direct analog (its `Engine::input`,
//! `engine.rs`, solved a differently-shaped pinyin-to-hanzi problem) so the
//! control flow here follows the original design; logging follows the
//! teacher's `tracing` dependency (SPEC_FULL.md §A).
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::candidate::{self, Suggestion};
use crate::caseflags::{self, CaseFlags};
use crate::context::SuggestContext;
use crate::editdist;
use crate::language::Language;
use crate::options::{Mode, Options};
use crate::scoring;
use crate::soundwalk;
use crate::walk::{self, WalkParams};

/// Entry point (spec.md §6 `suggest(bad_ptr, bad_len, max_count, options)`).
///
/// Never fails: every degraded condition (corrupt trie, timeout, empty
/// dictionary list, no candidates) resolves to a partial or empty `Vec`
/// (spec.md §7).
pub fn find_suggest(bad: &str, languages: &[Language], options: &Options) -> Vec<Suggestion> {
    let deadline = Instant::now() + options.timeout;

    // Edge case 6 (spec.md §8): truncate internally before walking.
    let bad_word = truncate_to_word_len(bad);
    if bad_word.len() != bad.len() {
        warn!(orig_len = bad.len(), truncated_len = bad_word.len(), "bad word exceeds MAX_WORD_LEN, truncating");
    }

    let fbad_word = bad_word.to_lowercase();
    let mut ctx = SuggestContext::new(&bad_word, fbad_word.clone(), options.limit);
    ctx.bad_flags = caseflags::captype(&bad_word);
    if options.need_cap {
        ctx.bad_flags |= CaseFlags::ONECAP;
    }

    ctx.default_sal_lang = languages.iter().position(Language::has_sound_fold);
    if let Some(idx) = ctx.default_sal_lang {
        if let Some(fold) = &languages[idx].sound_fold {
            ctx.sal_bad_word = Some(fold(&fbad_word, true));
        }
    }
    trace!(bad = %bad_word, fbad = %fbad_word, flags = ?ctx.bad_flags, "starting find_suggest");

    // Step 3: bad word is plain lowercase text -> offer a capitalized
    // alternative at ICASE (spec.md §8 scenario 4's inverse case).
    if ctx.bad_flags.is_empty() {
        let capped = caseflags::make_case_word(&bad_word, CaseFlags::ONECAP);
        if capped != bad_word {
            insert_primary(&mut ctx, languages, &capped, bad_word.chars().count(), options.scores.icase, 0, false, None);
        }
    }

    if options.ban_bad {
        ctx.banned.insert(bad_word.clone());
    }

    // Step 5: the repeated-word special case ("the the" -> "the").
    if let Some(word) = repeated_word(&fbad_word) {
        let word = word.to_string();
        let score = scoring::rescore(options.scores.rep, 0);
        let orig_len = fbad_word.chars().count();
        insert_primary(&mut ctx, languages, &word, orig_len, score, 0, false, None);
    }

    // Opaque expression/file-hook producers (spec.md §6).
    for producer in &options.producers {
        for (word, score) in producer.produce(&bad_word) {
            insert_primary(&mut ctx, languages, &word, bad_word.len(), score, 0, false, None);
        }
    }

    // Step 6: the fold-trie walk, per language.
    for (idx, lang) in languages.iter().enumerate() {
        if options.is_interrupted() || Instant::now() >= deadline {
            break;
        }
        walk_one_language(&fbad_word, lang, idx, &mut ctx, options, deadline);
    }
    debug!(candidates = ctx.primary.len(), "fold-trie walk complete");

    // Step 7: DOUBLE mode precomputes soundfold scores for what the edit
    // pass already found, into `secondary`.
    if options.mode == Mode::Double {
        populate_secondary(&mut ctx, languages);
    }

    // Step 8: the sound-alike pass (BEST and DOUBLE; skipped in FAST per
    // spec.md §8 scenario 5).
    if options.mode != Mode::Fast {
        run_sound_pass(&mut ctx, languages, deadline, options);
    }

    // Step 9: rescore surviving candidates lacking a phonetic bonus.
    if options.mode == Mode::Best || options.mode == Mode::Double {
        rescore_primary(&mut ctx, languages);
    }

    // Step 10: check_suggestions via the caller-supplied revalidate hook.
    // Re-validate `word + remaining bad tail`, not the replacement alone
    // (spec.md §4.7 step 10, SPEC_FULL.md §B.6), matching the tail
    // reconstruction `stp_sal_score` already does.
    if let Some(revalidate) = &options.revalidate {
        let bad_word = &ctx.bad_word;
        ctx.primary.retain(|s| {
            let tail: String = if s.orig_len < bad_word.chars().count() {
                bad_word.chars().skip(s.orig_len).collect()
            } else {
                String::new()
            };
            !revalidate(&format!("{}{}", s.word, tail))
        });
    }

    let banned = ctx.banned.clone();
    let mut result = if options.mode == Mode::Double {
        combine_double(&mut ctx, &bad_word)
    } else {
        ctx.primary.sort();
        ctx.primary.clone().into_vec()
    };

    result.retain(|s| !banned.contains(&s.word));
    result.truncate(options.limit);
    debug!(returned = result.len(), "find_suggest complete");
    result
}

fn truncate_to_word_len(bad: &str) -> String {
    if bad.chars().count() < walk::MAX_WORD_LEN {
        return bad.to_string();
    }
    bad.chars().take(walk::MAX_WORD_LEN - 1).collect()
}

/// "w w" (whitespace-separated, identical halves) special case (spec.md
/// §4.7 step 5). Returns the shared word when it applies.
fn repeated_word(fbad_word: &str) -> Option<&str> {
    let mut parts = fbad_word.split_whitespace();
    let first = parts.next()?;
    let second = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    (first == second && !first.is_empty()).then_some(first)
}

#[allow(clippy::too_many_arguments)]
fn insert_primary(
    ctx: &mut SuggestContext,
    languages: &[Language],
    word: &str,
    orig_len: usize,
    score: i32,
    alt_score: i32,
    had_bonus: bool,
    lang: Option<usize>,
) {
    let bad_word = ctx.bad_word.clone();
    let sal_bad_word = ctx.sal_bad_word.clone();
    ctx.primary.insert(
        word,
        orig_len,
        "",
        score,
        alt_score,
        had_bonus,
        lang,
        ctx.max_count,
        false,
        &mut ctx.max_score,
        &mut ctx.sf_max_score,
        |w, orig_len, lang_idx| {
            let Some(idx) = lang_idx else { return scoring::MAXMAX };
            let Some(lang) = languages.get(idx) else { return scoring::MAXMAX };
            if !lang.has_sound_fold() {
                return scoring::MAXMAX;
            }
            let tmp = Suggestion::new(w, orig_len, 0);
            stp_sal_score(&tmp, lang, &bad_word, sal_bad_word.as_deref())
        },
    );
}

fn walk_one_language(
    fword: &str,
    lang: &Language,
    idx: usize,
    ctx: &mut SuggestContext,
    options: &Options,
    deadline: Instant,
) {
    let map_similar = |a: char, b: char| -> Option<bool> {
        match lang.map_similar(a) {
            Some(m) if m == b => Some(true),
            Some(_) => Some(false),
            None => lang.map_similar(b).map(|m| m == a),
        }
    };
    let word_count = |w: &str| lang.word_count(w);
    let params = WalkParams {
        fold_trie: &lang.fold_trie,
        prefix_trie: lang.prefix_trie.as_ref(),
        keepcase_trie: lang.keepcase_trie.as_ref(),
        rep_table: &lang.rep_rules,
        compound: &lang.compound,
        map_similar: &map_similar,
        region_mask: lang.region_mask,
        soundfold: false,
        bad_case: ctx.bad_flags,
        word_count: &word_count,
        scores: &options.scores,
        no_split_sugs: lang.no_split_sugs,
        bad_word: &ctx.bad_word,
    };
    walk::walk(
        fword,
        &params,
        &mut ctx.primary,
        &mut ctx.banned,
        ctx.max_count,
        &mut ctx.max_score,
        &mut ctx.sf_max_score,
        false,
        Some(idx),
        deadline,
        || options.is_interrupted(),
    );
}

/// `stp_sal_score` (spec.md §4.7): sound-fold the candidate (with the
/// unreplaced bad-word tail appended, if any) and score it phonetically
/// against the query's sound-folded bad word.
fn stp_sal_score(item: &Suggestion, lang: &Language, bad_word: &str, sal_bad_word: Option<&str>) -> i32 {
    let Some(fold) = &lang.sound_fold else {
        return scoring::MAXMAX;
    };
    let Some(bad_sound) = sal_bad_word else {
        return scoring::MAXMAX;
    };

    let tail: String = if item.orig_len < bad_word.chars().count() {
        bad_word.chars().skip(item.orig_len).collect()
    } else {
        String::new()
    };
    let candidate_text = format!("{}{}", item.word, tail);
    let good_sound = fold(&candidate_text, true);
    crate::soundalike::soundalike_score(good_sound.as_bytes(), bad_sound.as_bytes())
}

/// Step 7 (spec.md §4.7): for `Mode::Double`, precompute a sound score for
/// each fold-trie match and store the result in `secondary` rather than
/// merging it into `primary` immediately.
fn populate_secondary(ctx: &mut SuggestContext, languages: &[Language]) {
    let items: Vec<Suggestion> = ctx.primary.as_slice().to_vec();
    let bad_word = ctx.bad_word.clone();
    let sal_bad_word = ctx.sal_bad_word.clone();
    for item in items {
        let Some(lang_idx) = item.lang else { continue };
        let Some(lang) = languages.get(lang_idx) else { continue };
        if !lang.has_sound_fold() {
            continue;
        }
        let sal = stp_sal_score(&item, lang, &bad_word, sal_bad_word.as_deref());
        let mut secondary_item = item.clone();
        secondary_item.sal_score = true;
        secondary_item.alt_score = sal;
        ctx.secondary.push_raw(secondary_item);
    }
}

/// Step 8 (spec.md §4.7): search each language's sound trie with a
/// progressively relaxed ceiling (`SFMAX1`, `SFMAX2`, `SFMAX3`) until
/// `primary` has accumulated `SUG_CLEAN_COUNT` candidates or the relax
/// ladder is exhausted.
fn run_sound_pass(ctx: &mut SuggestContext, languages: &[Language], deadline: Instant, options: &Options) {
    let Some(sal_bad_word) = ctx.sal_bad_word.clone() else {
        return;
    };
    let target = candidate::sug_clean_count(ctx.max_count);
    for &limit in &[scoring::SFMAX1, scoring::SFMAX2, scoring::SFMAX3] {
        if ctx.primary.len() >= target {
            break;
        }
        if options.is_interrupted() || Instant::now() >= deadline {
            break;
        }
        for (lang_idx, lang) in languages.iter().enumerate() {
            let Some(sound_trie) = &lang.sound_trie else { continue };
            if !lang.has_sound_fold() {
                continue;
            }
            let matches = soundwalk::sound_walk(
                &sal_bad_word,
                sound_trie,
                &lang.sal_rep_rules,
                &options.scores,
                limit,
                deadline,
                || options.is_interrupted(),
            );
            for m in matches {
                let key = format!("{lang_idx}:{}", m.sound_word);
                if let Some(&best) = ctx.sl_sounddone.get(&key) {
                    if best <= m.score {
                        continue;
                    }
                }
                ctx.sl_sounddone.insert(key, m.score);
                add_sound_suggest(ctx, languages, lang, lang_idx, &m);
            }
        }
    }
}

/// `add_sound_suggest` (spec.md §4.7): expand one sound-trie match into its
/// original dictionary words, case them per the bad word's captype, score
/// them against the bad word with the edit-distance scorer (bounded when
/// profitable, unbounded otherwise), and insert with `had_bonus=true`.
fn add_sound_suggest(
    ctx: &mut SuggestContext,
    languages: &[Language],
    lang: &Language,
    lang_idx: usize,
    m: &soundwalk::SoundMatch,
) {
    let bad_word = ctx.bad_word.clone();
    let bound = scoring::maxscore(ctx.max_score, m.score);
    let is_similar = |a: char, b: char| lang.map_similar(a) == Some(b) || lang.map_similar(b) == Some(a);
    for word in lang.expand_sound_match(m.buffer_offset) {
        let cased = if ctx.bad_flags.is_empty() {
            word.to_string()
        } else {
            caseflags::make_case_word(word, ctx.bad_flags)
        };
        let edit = if bound < scoring::LIMITMAX {
            editdist::edit_score_limit(&bad_word, &cased, bound, is_similar)
        } else {
            editdist::edit_score(&bad_word, &cased, is_similar)
        };
        if edit == scoring::MAXMAX {
            continue;
        }
        let combined = scoring::rescore(edit, m.score);
        insert_primary(ctx, languages, &cased, bad_word.chars().count(), combined, m.score, true, Some(lang_idx));
    }
}

/// Step 9 (spec.md §4.7 `rescore_suggestions`): rescore every primary entry
/// lacking a phonetic bonus, per SPEC_FULL.md §B.4 only when its language
/// actually has sound-fold rules.
fn rescore_primary(ctx: &mut SuggestContext, languages: &[Language]) {
    let bad_word = ctx.bad_word.clone();
    let sal_bad_word = ctx.sal_bad_word.clone();
    candidate::rescore_all_with(&mut ctx.primary, |item| {
        let Some(lang_idx) = item.lang else { return scoring::MAXMAX };
        let Some(lang) = languages.get(lang_idx) else { return scoring::MAXMAX };
        if !lang.has_sound_fold() {
            return scoring::MAXMAX;
        }
        stp_sal_score(item, lang, &bad_word, sal_bad_word.as_deref())
    });
}

/// `score_combine` (spec.md §4.7, `Mode::Double`): recombine each list's
/// scores with its own formula, then interleave, dedup by word (keeping the
/// lower score), sort, and return.
fn combine_double(ctx: &mut SuggestContext, bad_word: &str) -> Vec<Suggestion> {
    ctx.primary.for_each_mut(|item| {
        item.score = scoring::rescore(item.score, item.alt_score);
    });
    ctx.secondary.for_each_mut(|item| {
        let alt = editdist::edit_score(bad_word, &item.word, |_, _| false);
        item.score = (7 * item.score + alt) / 8;
    });

    let mut merged: Vec<Suggestion> = ctx.primary.clone().into_vec();
    for item in ctx.secondary.clone().into_vec() {
        match merged.iter_mut().find(|s| s.word == item.word) {
            Some(existing) if existing.score > item.score => *existing = item,
            Some(_) => {}
            None => merged.push(item),
        }
    }
    merged.sort_by(|a, b| {
        a.score
            .cmp(&b.score)
            .then(a.alt_score.cmp(&b.alt_score))
            .then_with(|| a.word.to_lowercase().cmp(&b.word.to_lowercase()))
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::CompoundRules;
    use crate::rep::{RepRule, RepTable};
    use crate::trie::{Trie, WordFlags};
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct TrieNodeBuilder {
        children: BTreeMap<u8, TrieNodeBuilder>,
        terminal: bool,
    }

    /// Build a correctly-encoded compact trie over an arbitrary word list,
    /// by first assembling a conventional tree and then flattening it into
    /// the `byts`/`idxs` two-array form (spec.md §4.1), sorting each node's
    /// entries by byte with the terminal's `0` byte first.
    fn build_trie(words: &[&str]) -> Trie {
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
        Trie::new(byts, idxs).unwrap()
    }

    fn test_language() -> Language {
        let fold_trie = build_trie(&["the", "these", "there", "them"]);
        let rep_rules = RepTable::build(vec![RepRule { from: "hte".into(), to: "the".into() }]).unwrap();
        Language::from_parts(
            fold_trie,
            None,
            None,
            None,
            crate::language::SoundBuffer::default(),
            rep_rules,
            RepTable::new(),
            CompoundRules::default(),
            0,
        )
    }

    fn test_language_single(word: &str) -> Language {
        let fold_trie = build_trie(&[word]);
        Language::from_parts(
            fold_trie,
            None,
            None,
            None,
            crate::language::SoundBuffer::default(),
            RepTable::new(),
            RepTable::new(),
            CompoundRules::default(),
            0,
        )
    }

    #[test]
    fn scenario_1_rep_rule_beats_edit_distance() {
        let langs = vec![test_language()];
        let opts = Options::default().with_limit(3);
        let result = find_suggest("hte", &langs, &opts);
        assert!(!result.is_empty());
        assert_eq!(result[0].word, "the");
        assert_eq!(result[0].score, scoring::REP);
    }

    #[test]
    fn scenario_2_single_deletion_finds_the() {
        let langs = vec![test_language_single("the")];
        let opts = Options::default().with_limit(3);
        let result = find_suggest("thxe", &langs, &opts);
        let the = result.iter().find(|s| s.word == "the").expect("the reachable via DEL");
        assert_eq!(the.score, scoring::DEL);
    }

    #[test]
    fn scenario_3_repeated_word_special_case() {
        let langs = vec![test_language()];
        let opts = Options::default().with_limit(3);
        let result = find_suggest("the the", &langs, &opts);
        let the = result.iter().find(|s| s.word == "the").expect("the present");
        assert_eq!(the.score, scoring::rescore(scoring::REP, 0));
        assert_eq!(the.orig_len, 7);
    }

    #[test]
    fn scenario_5_fast_mode_finds_transposition() {
        let langs = vec![test_language()];
        let opts = Options::default().with_mode(Mode::Fast).with_limit(1);
        let result = find_suggest("thme", &langs, &opts);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].word, "them");
        assert_eq!(result[0].score, scoring::SWAP);
    }

    #[test]
    fn scenario_6_overlong_input_is_truncated_not_panicking() {
        let langs = vec![test_language()];
        let opts = Options::default().with_limit(3);
        let long = "a".repeat(walk::MAX_WORD_LEN + 50);
        let result = find_suggest(&long, &langs, &opts);
        assert!(result.len() <= 3);
    }

    #[test]
    fn repeated_word_helper_rejects_more_than_two_parts() {
        assert_eq!(repeated_word("the the the"), None);
        assert_eq!(repeated_word("the the"), Some("the"));
        assert_eq!(repeated_word("the them"), None);
    }

    #[test]
    fn returned_list_never_exceeds_limit() {
        let langs = vec![test_language()];
        let opts = Options::default().with_limit(2);
        let result = find_suggest("thx", &langs, &opts);
        assert!(result.len() <= 2);
    }

    #[test]
    fn returned_list_is_sorted_by_score() {
        let langs = vec![test_language()];
        let opts = Options::default().with_limit(10);
        let result = find_suggest("thees", &langs, &opts);
        for pair in result.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn overriding_rep_score_changes_returned_score() {
        let langs = vec![test_language()];
        let mut opts = Options::default().with_limit(3);
        opts.scores.rep = 5;
        let result = find_suggest("hte", &langs, &opts);
        assert_eq!(result[0].word, "the");
        assert_eq!(result[0].score, 5);
    }

    #[test]
    fn banned_words_never_appear() {
        let langs = vec![test_language()];
        let mut opts = Options::default().with_limit(3);
        opts.ban_bad = true;
        let result = find_suggest("the", &langs, &opts);
        assert!(result.iter().all(|s| s.word != "the"));
    }
}
