//! spellsuggest-core
//!
//! Error-tolerant trie walk and phonetic rescoring engine for spelling
//! suggestions. Given a misspelled word and one or more [`Language`]
//! dictionaries, [`find_suggest`] returns a ranked list of candidate
//! corrections.
//!
//! Loading a dictionary from disk, the outer spell-checking loop that
//! decides a word is misspelled in the first place, and evaluating
//! user-supplied suggestion expressions are all out of scope: callers
//! assemble a [`Language`] from already-decoded parts via
//! [`Language::from_parts`] and drive everything else through [`Options`].
//!
//! Public API:
//! - [`find_suggest`] - the suggestion pipeline entry point
//! - [`Language`] - a dictionary's tries, rule tables and compound/region metadata
//! - [`Options`], [`Mode`], [`ScoreTable`], [`SuggestionProducer`] - caller-facing configuration
//! - [`Suggestion`], [`SuggestionStore`] - scored candidates and their container
//! - [`Trie`], [`WordFlags`], [`Terminal`] - the compact dictionary trie format
//! - [`SpellError`] - this crate's error type
pub mod banned;
pub use banned::BannedSet;

pub mod caseflags;
pub use caseflags::CaseFlags;

pub mod trie;
pub use trie::{Step, Terminal, Trie, WordFlags};

pub mod rep;
pub use rep::{RepRule, RepTable};

pub mod scoring;

pub mod editdist;
pub use editdist::{edit_score, edit_score_limit};

pub mod soundalike;
pub use soundalike::soundalike_score;

pub mod language;
pub use language::{CompoundRules, Language, SoundBuffer, SoundFoldFn};

pub mod candidate;
pub use candidate::{Suggestion, SuggestionStore};

pub mod walk;
pub use walk::WalkParams;

pub mod soundwalk;
pub use soundwalk::SoundMatch;

pub mod options;
pub use options::{Mode, Options, ScoreTable, SuggestionProducer};

pub mod context;
pub use context::SuggestContext;

pub mod pipeline;
pub use pipeline::find_suggest;

pub mod error;
pub use error::SpellError;
