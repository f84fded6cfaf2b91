//! Suggestion modes, caller-facing options, and the opaque producer hooks
//! (spec.md §6 "Caller-facing surface"; SPEC_FULL.md §A "Config").
//!
//! Grounded on the teacher's `Config` (`lib.rs`): `#[derive(Deserialize,
//! Serialize)]`, loadable/saveable as TOML via the same `toml` dependency.
//! Unlike the teacher's single flat `Config`, this crate splits the
//! behavior-selecting flags spec.md §6 calls out into `Options` (per-call,
//! not serialized — timeouts and hooks are call-site concerns) and keeps
//! the score constants' overrides in `ScoreTable` (serializable, since a
//! caller may reasonably want to tune and persist them).
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scoring;

/// Suggestion mode (spec.md glossary: SPS_BEST / SPS_FAST / SPS_DOUBLE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Full pipeline: edit-distance pass, then sound-alike rescoring.
    Best,
    /// Skip the sound-alike pass entirely (spec.md §8 scenario 5).
    Fast,
    /// Run both passes and return them as two separately-scored,
    /// interleaved lists rather than merging scores (spec.md §4.7 step 7).
    Double,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Best
    }
}

/// Overridable score constants (spec.md §6), defaulting to the bit-exact
/// values the original hard-codes. Split out from [`Options`] so it can be
/// loaded/saved independently (e.g. shared across many queries) while
/// `Options` carries the per-call knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub split: i32,
    pub split_no: i32,
    pub icase: i32,
    pub region: i32,
    pub rare: i32,
    pub swap: i32,
    pub swap3: i32,
    pub rep: i32,
    pub subst: i32,
    pub similar: i32,
    pub del: i32,
    pub ins: i32,
    pub max_init: i32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        ScoreTable {
            split: scoring::SPLIT,
            split_no: scoring::SPLIT_NO,
            icase: scoring::ICASE,
            region: scoring::REGION,
            rare: scoring::RARE,
            swap: scoring::SWAP,
            swap3: scoring::SWAP3,
            rep: scoring::REP,
            subst: scoring::SUBST,
            similar: scoring::SIMILAR,
            del: scoring::DEL,
            ins: scoring::INS,
            max_init: scoring::MAXINIT,
        }
    }
}

/// An opaque producer of extra `(word, score)` candidates, fed into the
/// same insertion pipeline as trie-walk matches (spec.md §1 "external
/// producers of (word, score) pairs"; Design Notes "Dynamic dispatch /
/// hooks"). User-defined expression and file-based suggestion sources are
/// modeled purely as this interface — the core never evaluates them itself.
pub trait SuggestionProducer {
    fn produce(&self, bad_word: &str) -> Vec<(String, i32)>;
}

/// Per-call behavior-selecting options (spec.md §6).
pub struct Options {
    pub mode: Mode,
    /// Number of suggestions the caller wants displayed (`max_count`).
    pub limit: usize,
    /// Wall-clock budget for the whole query (spec.md §5, default 5s).
    pub timeout: Duration,
    /// Insert the bad word itself into the banned set before walking
    /// (spec.md §4.7 step 4).
    pub ban_bad: bool,
    /// OR in `ONECAP` onto the bad word's captype regardless of its actual
    /// casing (spec.md §4.7 step 1 "if need_cap").
    pub need_cap: bool,
    /// Score constants, overridable per call. Threaded into every
    /// [`crate::walk::WalkParams`]/`sound_walk` call `find_suggest` makes,
    /// plus the ICASE-alternative and repeated-word special cases.
    pub scores: ScoreTable,
    /// `check_suggestions` (spec.md §4.7 step 10 / SPEC_FULL.md §B.6): a
    /// caller-supplied spell-checker predicate; `true` means "still
    /// misspelled", causing the candidate to be dropped. `None` (the
    /// default) skips this stage entirely — the external checker is out of
    /// scope (spec.md §1).
    pub revalidate: Option<Box<dyn Fn(&str) -> bool>>,
    /// Opaque expression/file-hook producers (spec.md §6).
    pub producers: Vec<Box<dyn SuggestionProducer>>,
    /// Interrupt poll, checked every ~1000 walk iterations alongside the
    /// deadline (spec.md §5).
    pub interrupted: Option<Box<dyn Fn() -> bool>>,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("mode", &self.mode)
            .field("limit", &self.limit)
            .field("timeout", &self.timeout)
            .field("ban_bad", &self.ban_bad)
            .field("need_cap", &self.need_cap)
            .field("scores", &self.scores)
            .field("has_revalidate", &self.revalidate.is_some())
            .field("producer_count", &self.producers.len())
            .finish()
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            mode: Mode::Best,
            limit: 25,
            timeout: Duration::from_millis(5000),
            ban_bad: false,
            need_cap: false,
            scores: ScoreTable::default(),
            revalidate: None,
            producers: Vec::new(),
            interrupted: None,
        }
    }
}

impl Options {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.as_ref().is_some_and(|f| f())
    }

    /// Serialize the tunable score constants to a TOML string, mirroring
    /// the teacher's `Config::to_toml_string` (`lib.rs`).
    pub fn scores_to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&self.scores)
    }

    /// Load a [`ScoreTable`] from a TOML string, mirroring the teacher's
    /// `Config::from_toml_str`.
    pub fn scores_from_toml(content: &str) -> Result<ScoreTable, toml::de::Error> {
        toml::from_str(content)
    }
}
