//! Per-query suggestion state (spec.md §3 `SugInfo`).
//!
//! Grounded on the teacher's per-session state objects (`ImeSession` in the
//! now-removed `session.rs`), which similarly bundled everything one
//! interaction needs and was destroyed at the end of it; here the
//! equivalent lifetime is one `find_suggest` call.
//!
//! SPEC_FULL.md's Design Notes call out `sl_sounddone` as belonging on the
//! dictionary in the original, cleared between queries; this crate moves it
//! here instead, so `Language` stays read-only and queries against a shared
//! dictionary never need external synchronization (spec.md §5).
use ahash::AHashMap;

use crate::banned::BannedSet;
use crate::candidate::SuggestionStore;
use crate::caseflags::CaseFlags;
use crate::scoring;

/// Per-query state threaded through the suggestion pipeline (spec.md §3
/// `SugInfo`). Created fresh by [`crate::pipeline::find_suggest`] and
/// dropped at the end of the call; every owned string it holds (through
/// `primary`/`secondary`) is freed with it.
pub struct SuggestContext {
    /// The misspelled word as given by the caller (spec.md §3 `bad_word`).
    pub bad_word: String,
    /// Case-folded copy of `bad_word` (spec.md §3 `fbad_word`).
    pub fbad_word: String,
    /// Sound-folded copy of `bad_word` using `default_sal_lang`'s fold, if
    /// any language supports sound-folding (spec.md §3 `sal_bad_word`).
    pub sal_bad_word: Option<String>,
    /// Capitalization class of the bad word (spec.md §3 `bad_flags`).
    pub bad_flags: CaseFlags,
    /// Edit-based candidates (spec.md §3 `primary`).
    pub primary: SuggestionStore,
    /// Sound-alike-based candidates, populated only in [`crate::options::Mode::Double`]
    /// (spec.md §3 `secondary`).
    pub secondary: SuggestionStore,
    /// Caller-requested display count (spec.md §3 `max_count`).
    pub max_count: usize,
    /// Running ceiling the fold-trie walk prunes against (spec.md §3
    /// `max_score`).
    pub max_score: i32,
    /// Running ceiling the sound-trie walk prunes against (spec.md §3
    /// `sf_max_score`).
    pub sf_max_score: i32,
    /// Words never to output (spec.md §3 `banned`).
    pub banned: BannedSet,
    /// Index into the query's language list of the first language offering
    /// sound-folding, if any (spec.md §3 `default_sal_lang`).
    pub default_sal_lang: Option<usize>,
    /// Per-query memo: sound-folded word -> best score seen, used during
    /// the relaxed-limit sound-trie passes to avoid repeating work across
    /// `SFMAX1`/`SFMAX2`/`SFMAX3` rounds (spec.md §4.7 step 8, `sl_sounddone`).
    pub sl_sounddone: AHashMap<String, i32>,
}

impl SuggestContext {
    pub fn new(bad_word: &str, fbad_word: String, max_count: usize) -> Self {
        SuggestContext {
            bad_word: bad_word.to_string(),
            fbad_word,
            sal_bad_word: None,
            bad_flags: CaseFlags::empty(),
            primary: SuggestionStore::new(),
            secondary: SuggestionStore::new(),
            max_count,
            max_score: scoring::MAXINIT,
            sf_max_score: scoring::MAXINIT,
            banned: BannedSet::new(),
            default_sal_lang: None,
            sl_sounddone: AHashMap::new(),
        }
    }
}
