//! Candidate types for the spelling-suggestion pipeline.
//!
//! Grounded on the teacher's `candidate.rs` `Candidate`/`CandidateList`
//! (scored text + a growable container), generalized per spec.md §3/§4.4:
//! a `Suggestion` carries the richer field set the walk needs (separate
//! primary/secondary scores, original-span length, phonetic-bonus and
//! soundfold-origin flags), and the container is a write-heavy
//! dedup-and-truncate store rather than a read-heavy paginated list — the
//! teacher's cursor/paging API has no counterpart here and is dropped.
use serde::{Deserialize, Serialize};

use crate::scoring;

/// One candidate correction for a misspelled word (spec.md §3 `Suggestion`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Replacement text.
    pub word: String,
    /// Number of bytes of the bad word this candidate replaces. May differ
    /// from the full bad-word length for a partial replacement.
    pub orig_len: usize,
    /// Primary score; lower is better.
    pub score: i32,
    /// Secondary score (phonetic or edit-based), used as a tiebreaker.
    pub alt_score: i32,
    /// Whether phonetic rescoring has already been applied.
    pub had_bonus: bool,
    /// Index into the query's language list this candidate was found in;
    /// `None` when no language context applies (e.g. the repeated-word
    /// special case).
    pub lang: Option<usize>,
    /// `true` if `score` is a soundfold score rather than a word-edit score.
    pub sal_score: bool,
}

impl Suggestion {
    pub fn new(word: impl Into<String>, orig_len: usize, score: i32) -> Self {
        Suggestion {
            word: word.into(),
            orig_len,
            score,
            alt_score: 0,
            had_bonus: false,
            lang: None,
            sal_score: false,
        }
    }

    pub fn with_alt_score(mut self, alt_score: i32) -> Self {
        self.alt_score = alt_score;
        self
    }

    pub fn with_lang(mut self, lang: usize) -> Self {
        self.lang = Some(lang);
        self
    }

    pub fn with_bonus(mut self, had_bonus: bool) -> Self {
        self.had_bonus = had_bonus;
        self
    }
}

/// `SUG_CLEAN_COUNT`: suggestions kept after a cleanup pass. We keep more
/// than will be displayed because `rescore_suggestions` may reorder the list
/// afterwards (spec.md §4.4).
pub fn sug_clean_count(max_count: usize) -> usize {
    if max_count < 130 {
        150
    } else {
        max_count + 20
    }
}

/// `SUG_MAX_COUNT`: the threshold that triggers a cleanup pass.
pub fn sug_max_count(max_count: usize) -> usize {
    sug_clean_count(max_count) + 50
}

/// Number of trailing `char`s shared by `word` and `bad_tail`. Mirrors the
/// original's per-character (not per-byte) trailing-match loop in
/// `add_suggestion` (see SPEC_FULL.md §B.2); operating on `char`s is simply
/// safe here since `&str` is always valid UTF-8, unlike the original's raw
/// byte-pointer walk.
fn common_trailing_chars(word: &str, bad_tail: &str) -> usize {
    word.chars()
        .rev()
        .zip(bad_tail.chars().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Truncate `s` by removing its last `n` characters.
fn drop_trailing_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return s;
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[..idx],
        None => "",
    }
}

/// A growable, score-ordered store of [`Suggestion`]s with dedup-by-(word,
/// orig_len) and score-keyed cleanup truncation (spec.md §4.4).
#[derive(Debug, Clone, Default)]
pub struct SuggestionStore {
    items: Vec<Suggestion>,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suggestion> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Suggestion> {
        self.items
    }

    pub fn as_slice(&self) -> &[Suggestion] {
        &self.items
    }

    /// Insert one candidate, honoring the minimization, emptiness-drop,
    /// dedup-and-keep-lowest-score, and cleanup-on-overflow rules of
    /// spec.md §4.4's `insert`.
    ///
    /// `bad_word_tail` is the remaining bad-word text starting at
    /// `orig_len_arg` bytes in (used only to compute the minimization
    /// window). `max_count` is the query's requested display count, used to
    /// derive the cleanup thresholds; `max_score`/`sf_max_score` are updated
    /// in place when a cleanup pass runs, per `apply_sf_max`. `rescore_one`
    /// computes the missing phonetic bonus for whichever side of a dedup
    /// match lacks one, mirroring the original's `rescore_one` call from
    /// `add_suggestion` before the score comparison (SPEC_FULL.md §B.4);
    /// pass `|_, _, _| scoring::MAXMAX` when no bonus is ever available at
    /// this call site.
    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &mut self,
        word: &str,
        orig_len_arg: usize,
        bad_word_tail: &str,
        score: i32,
        alt_score: i32,
        had_bonus: bool,
        lang: Option<usize>,
        max_count: usize,
        apply_sf_max: bool,
        max_score: &mut i32,
        sf_max_score: &mut i32,
        mut rescore_one: impl FnMut(&str, usize, Option<usize>) -> i32,
    ) {
        let trim = common_trailing_chars(word, bad_word_tail);
        let word = drop_trailing_chars(word, trim);
        let orig_len = orig_len_arg.saturating_sub(trim);

        if word.is_empty() && orig_len == 0 {
            // goodword doesn't change anything; may happen for "the the"
            // changing the first "the" to itself.
            return;
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|s| s.word == word && s.orig_len == orig_len)
        {
            if existing.lang.is_none() {
                existing.lang = lang;
            }
            let mut new_score = score;
            let mut new_alt_score = alt_score;
            let mut new_had_bonus = had_bonus;
            if !existing.had_bonus && new_had_bonus {
                let mut alt = rescore_one(&existing.word, existing.orig_len, existing.lang);
                if alt == scoring::MAXMAX {
                    alt = scoring::BIG;
                }
                existing.score = scoring::rescore(existing.score, alt);
                existing.alt_score = alt;
                existing.had_bonus = true;
            } else if existing.had_bonus && !new_had_bonus {
                let mut alt = rescore_one(word, orig_len, lang);
                if alt == scoring::MAXMAX {
                    alt = scoring::BIG;
                }
                new_score = scoring::rescore(score, alt);
                new_alt_score = alt;
                new_had_bonus = true;
            }
            if existing.score > new_score {
                existing.score = new_score;
                existing.alt_score = new_alt_score;
                existing.had_bonus = new_had_bonus;
            }
            return;
        }

        let mut sug = Suggestion::new(word, orig_len, score)
            .with_alt_score(alt_score)
            .with_bonus(had_bonus);
        sug.lang = lang;
        self.items.push(sug);

        if self.items.len() > sug_max_count(max_count) {
            let ceiling = self.maybe_cleanup(max_count, if apply_sf_max { *sf_max_score } else { *max_score });
            if apply_sf_max {
                *sf_max_score = ceiling;
            } else {
                *max_score = ceiling;
            }
        }
    }

    /// Sort by (score, alt_score, case-insensitive word) and, if the store
    /// has grown past `sug_max_count(max_count)`, truncate to
    /// `sug_clean_count(max_count)` and return the new ceiling score (the
    /// truncated tail's score), per spec.md §4.4.
    pub fn maybe_cleanup(&mut self, max_count: usize, current_max_score: i32) -> i32 {
        if self.items.len() <= sug_max_count(max_count) {
            return current_max_score;
        }
        self.sort();
        let keep = sug_clean_count(max_count);
        if self.items.len() > keep {
            self.items.truncate(keep);
        }
        if keep >= 1 {
            if let Some(last) = self.items.last() {
                return last.score;
            }
        }
        current_max_score
    }

    /// Sort by (score, alt_score, case-insensitive word) ascending — the
    /// ordering every returned suggestion list must satisfy (spec.md §8).
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| {
            a.score
                .cmp(&b.score)
                .then(a.alt_score.cmp(&b.alt_score))
                .then_with(|| a.word.to_lowercase().cmp(&b.word.to_lowercase()))
        });
    }

    pub fn truncate(&mut self, n: usize) {
        self.items.truncate(n);
    }

    pub fn retain(&mut self, f: impl FnMut(&Suggestion) -> bool) {
        self.items.retain(f);
    }

    pub fn push_raw(&mut self, s: Suggestion) {
        self.items.push(s);
    }

    /// Mutate every item in place (used by `score_combine`'s per-entry
    /// rescoring formula, spec.md §4.7 step "DOUBLE combine").
    pub fn for_each_mut(&mut self, f: impl FnMut(&mut Suggestion)) {
        self.items.iter_mut().for_each(f);
    }
}

/// Apply `rescore(score, alt_score)` to every item lacking a bonus, marking
/// it as bonused afterward (spec.md §4.7 step 9, `rescore_suggestions`).
pub fn rescore_all_with(
    store: &mut SuggestionStore,
    mut alt_score_for: impl FnMut(&Suggestion) -> i32,
) {
    for item in store.items.iter_mut() {
        if item.had_bonus {
            continue;
        }
        let mut alt = alt_score_for(item);
        if alt == scoring::MAXMAX {
            alt = scoring::BIG;
        }
        item.score = scoring::rescore(item.score, alt);
        item.alt_score = alt;
        item.had_bonus = true;
    }
}
