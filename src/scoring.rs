//! Score constants and the rescoring formulas, bit-exact with the original
//! implementation (`examples/original_source/src/spellsuggest.c`).
//!
//! Lower is better throughout. These are plain `i32` constants rather than an
//! enum because they are combined arithmetically (added, halved, compared)
//! all over the walk and the pipeline.

pub const SPLIT: i32 = 149;
pub const SPLIT_NO: i32 = 249;
pub const ICASE: i32 = 52;
pub const REGION: i32 = 200;
pub const RARE: i32 = 180;
pub const SWAP: i32 = 75;
pub const SWAP3: i32 = 110;
pub const REP: i32 = 65;
pub const SUBST: i32 = 93;
pub const SIMILAR: i32 = 33;
pub const SUBCOMP: i32 = 33;
pub const DEL: i32 = 94;
pub const DELDUP: i32 = 66;
pub const DELCOMP: i32 = 28;
pub const INS: i32 = 96;
pub const INSDUP: i32 = 67;
pub const INSCOMP: i32 = 30;
pub const NONWORD: i32 = 103;

pub const FILE: i32 = 30;
pub const MAXINIT: i32 = 350;

pub const COMMON1: i32 = 30;
pub const COMMON2: i32 = 40;
pub const COMMON3: i32 = 50;
pub const THRES2: u32 = 10;
pub const THRES3: u32 = 100;

pub const SFMAX1: i32 = 200;
pub const SFMAX2: i32 = 300;
pub const SFMAX3: i32 = 400;

pub const BIG: i32 = INS * 3;
pub const MAXMAX: i32 = 999_999;
pub const LIMITMAX: i32 = 350;

/// Minimum of ICASE, SWAP, DEL, SIMILAR, INS; used by `edit_score_limit` to
/// decide when it's close enough to the limit to short-circuit.
pub const EDIT_MIN: i32 = SIMILAR;

/// Combine a word-edit score and a sound-alike score into a single score,
/// weighting the word-edit score three times as heavily.
///
/// `RESCORE(x, x) == x` for any `x` (mod integer truncation), since
/// `(3x + x) / 4 == x`.
pub const fn rescore(word_score: i32, sound_score: i32) -> i32 {
    (3 * word_score + sound_score) / 4
}

/// The inverse of [`rescore`]: given a sound score and a desired rescored
/// ceiling, compute the maximum word-edit score that could still pass.
pub const fn maxscore(word_score: i32, sound_score: i32) -> i32 {
    (4 * word_score - sound_score) / 3
}
