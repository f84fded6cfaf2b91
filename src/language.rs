//! The `Language` dictionary data model: the immutable, shared-for-a-query
//! bundle of tries, rule tables, and compound/region metadata a single
//! dictionary contributes to a suggestion search (spec.md §3).
//!
//! Grounded on the teacher's `Model` (in `lib.rs`), which similarly bundles
//! a lexicon, bigram table and user dictionary behind `Arc` for read-only
//! sharing across a query; here the bundle is a single `Language` holding
//! several tries and rule tables instead. Dictionary *loading* is out of
//! scope (spec.md §1) — callers build a `Language` from already-decoded
//! parts via [`Language::from_parts`].
use std::sync::Arc;

use ahash::AHashMap;

use crate::rep::RepTable;
use crate::trie::Trie;

/// A dictionary-supplied phonetic fold (spec.md §1 "the soundfold
/// transformation itself, treated as a pure function provided by the
/// dictionary"; §3 `sound_fold(word, collapse_whitespace) -> folded`).
pub type SoundFoldFn = Arc<dyn Fn(&str, bool) -> String + Send + Sync>;

/// A map from a soundfolded word number to the packed original-word
/// numbers it expands to, delta-encoded the way the original's `.sug`
/// buffer is (see SPEC_FULL.md §B.9); decoding is provided by
/// [`decode_word_number_delta`].
#[derive(Debug, Clone, Default)]
pub struct SoundBuffer {
    bytes: Vec<u8>,
}

impl SoundBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        SoundBuffer { bytes }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the variable-width word-number list stored at byte offset
    /// `at`, returning each absolute word number and the offset just past
    /// the list's terminator.
    ///
    /// Mirrors the original's `while (*nrline != NUL) orgnr +=
    /// bytes2offset(&nrline);` loop: a `0x00` byte terminates the line and
    /// is never itself passed to the decoder.
    pub fn decode_from(&self, at: usize) -> (Vec<u32>, usize) {
        let mut out = Vec::new();
        let mut pos = at;
        let mut prev: u32 = 0;
        while pos < self.bytes.len() && self.bytes[pos] != 0x00 {
            let (delta, consumed) = decode_word_number_delta(&self.bytes[pos..]);
            pos += consumed;
            prev = prev.wrapping_add(delta);
            out.push(prev);
        }
        // Skip the terminator itself, if present.
        if pos < self.bytes.len() && self.bytes[pos] == 0x00 {
            pos += 1;
        }
        (out, pos)
    }
}

/// Decode one variable-width word-number delta from the front of `buf`.
///
/// Bit-exact with the original's `bytes2offset` (`examples/original_source/
/// src/spellsuggest.c:358`), which discriminates on the leading byte's
/// *high* bits, not a numeric range split, and subtracts 1 from every byte
/// (each byte is stored as `value + 1` so a list can never contain a literal
/// `0x00` before its terminator):
/// - top bit `0` (`0x00..=0x7F`): 1 byte, value `c - 1`.
/// - `10xxxxxx` (`0x80..=0xBF`): 2 bytes, value `((c & 0x3f) - 1) * 255 + (b1 - 1)`.
/// - `110xxxxx` (`0xC0..=0xDF`): 3 bytes, each extra byte folded in the same
///   base-255 way.
/// - anything else (`0xE0..=0xFF`): 4 bytes, same base-255 folding with the
///   low nibble of the leading byte as the seed.
///
/// Callers must not pass a leading `0x00` byte — that is the list terminator
/// and is handled by [`SoundBuffer::decode_from`], not by this function.
fn decode_word_number_delta(buf: &[u8]) -> (u32, usize) {
    let byte_at = |i: usize| buf.get(i).copied().unwrap_or(0) as i64;
    let c = byte_at(0);

    let (mut nr, consumed) = if c & 0x80 == 0x00 {
        (c - 1, 1)
    } else if c & 0xc0 == 0x80 {
        ((c & 0x3f) - 1, 2)
    } else if c & 0xe0 == 0xc0 {
        ((c & 0x1f) - 1, 3)
    } else {
        ((c & 0x0f) - 1, 4)
    };
    for i in 1..consumed {
        nr = nr * 255 + (byte_at(i) - 1);
    }
    (nr.max(0) as u32, consumed)
}

/// Compound-word rules and the flag bytes that participate in compound
/// validity checks (spec.md §4.8 `can_be_compound`).
#[derive(Debug, Clone, Default)]
pub struct CompoundRules {
    pub rules: Vec<String>,
    pub flags: Vec<u8>,
    pub start_flags: Vec<u8>,
    pub all_flags: Vec<u8>,
    pub min_len: u8,
    pub max_words: u8,
    pub syl_max: u8,
}

impl CompoundRules {
    /// Reject an inconsistent `(compound_min_len, compound_max)` pair before
    /// it reaches the walk, where `min_len` in particular gates every
    /// candidate's `tword.len()` against `frame.comp_flags.len() + 1` against
    /// `max_words` (spec.md §4.6 compound continuation).
    pub fn validate(self) -> Result<Self, crate::error::SpellError> {
        if self.max_words != 0 && self.min_len as u32 * self.max_words as u32 > u8::MAX as u32 {
            return Err(crate::error::SpellError::InvalidCompoundBounds {
                min_len: self.min_len,
                max: self.max_words,
            });
        }
        Ok(self)
    }
}

/// One dictionary's full set of tries, rule tables and compound/region
/// metadata; shared read-only across a query (spec.md §3 `Language`).
#[derive(Clone)]
pub struct Language {
    pub fold_trie: Trie,
    pub prefix_trie: Option<Trie>,
    pub keepcase_trie: Option<Trie>,
    pub sound_trie: Option<Trie>,
    pub sug_buffer: SoundBuffer,
    /// Fold-trie words indexed by word number, the reconstruction target of
    /// `sug_buffer`'s delta-encoded lists (spec.md §6 `sug_buffer`). A real
    /// loader would recover this by enumerating `fold_trie` in word-number
    /// order as it built it; the walk/trie core here only ever reads it.
    pub word_list: Vec<String>,
    pub rep_rules: RepTable,
    pub sal_rep_rules: RepTable,
    pub compound: CompoundRules,
    pub no_split_sugs: bool,
    pub no_break: bool,
    pub no_compound_sugs: bool,
    /// Equivalence classes of "similar" characters, keyed by the first
    /// member; ASCII members use `map_array`, the rest fall back to
    /// `map_hash` (spec.md §3 `map_array`/`map_hash`).
    pub map_array: [Option<u8>; 128],
    pub map_hash: AHashMap<char, char>,
    pub word_count: AHashMap<String, u32>,
    pub region_mask: u16,
    /// The dictionary's own phonetic fold, if it supports sound-alike
    /// suggestions (spec.md §3 `sound_fold`). `None` disables the sound
    /// trie pass for this language even when `sound_trie` is set.
    pub sound_fold: Option<SoundFoldFn>,
}

impl std::fmt::Debug for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Language")
            .field("fold_trie", &self.fold_trie)
            .field("prefix_trie", &self.prefix_trie)
            .field("keepcase_trie", &self.keepcase_trie)
            .field("sound_trie", &self.sound_trie)
            .field("word_list_len", &self.word_list.len())
            .field("rep_rules", &self.rep_rules)
            .field("sal_rep_rules", &self.sal_rep_rules)
            .field("compound", &self.compound)
            .field("region_mask", &self.region_mask)
            .field("has_sound_fold", &self.sound_fold.is_some())
            .finish()
    }
}

impl Language {
    /// Assemble a `Language` from already-decoded parts. This is the
    /// boundary a loader (out of scope per spec.md §1) must produce; no
    /// parsing or file I/O happens here.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        fold_trie: Trie,
        prefix_trie: Option<Trie>,
        keepcase_trie: Option<Trie>,
        sound_trie: Option<Trie>,
        sug_buffer: SoundBuffer,
        rep_rules: RepTable,
        sal_rep_rules: RepTable,
        compound: CompoundRules,
        region_mask: u16,
    ) -> Self {
        Language {
            fold_trie,
            prefix_trie,
            keepcase_trie,
            sound_trie,
            sug_buffer,
            word_list: Vec::new(),
            rep_rules,
            sal_rep_rules,
            compound,
            no_split_sugs: false,
            no_break: false,
            no_compound_sugs: false,
            map_array: [None; 128],
            map_hash: AHashMap::new(),
            word_count: AHashMap::new(),
            region_mask,
            sound_fold: None,
        }
    }

    /// Attach a phonetic fold and the word list it needs to expand sound-trie
    /// matches against. Builder-style so `from_parts` callers that don't need
    /// sound-alike suggestions can skip it entirely.
    pub fn with_sound_fold(mut self, sound_fold: SoundFoldFn, word_list: Vec<String>) -> Self {
        self.sound_fold = Some(sound_fold);
        self.word_list = word_list;
        self
    }

    /// `true` when this language can participate in the sound-alike pass
    /// (spec.md §4.7 step 8): needs both a sound trie to search and a fold
    /// function to have produced `sal_bad_word` from.
    pub fn has_sound_fold(&self) -> bool {
        self.sound_trie.is_some() && self.sound_fold.is_some()
    }

    /// Expand one sound-trie match into its original dictionary words, per
    /// spec.md §4.7's `add_sound_suggest`: decode the delta-encoded word
    /// numbers stored at `buffer_offset` and look each one up in
    /// [`Language::word_list`].
    pub fn expand_sound_match(&self, buffer_offset: u32) -> Vec<&str> {
        let (numbers, _) = self.sug_buffer.decode_from(buffer_offset as usize);
        numbers
            .into_iter()
            .filter_map(|n| self.word_list.get(n as usize).map(String::as_str))
            .collect()
    }

    /// Look up the mapped-equivalent character for `c`, if any (spec.md §3
    /// `map_array`/`map_hash`).
    pub fn map_similar(&self, c: char) -> Option<char> {
        if (c as u32) < 128 {
            self.map_array[c as usize].map(|b| b as char)
        } else {
            self.map_hash.get(&c).copied()
        }
    }

    /// Observation count for a common-word bonus (spec.md §4.3's COMMON1-3
    /// tiers), or `0` if the word has never been observed.
    pub fn word_count(&self, word: &str) -> u32 {
        self.word_count.get(word).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_byte_delta() {
        // top bit clear => 1 byte, value c - 1.
        let (delta, consumed) = decode_word_number_delta(&[0x06]);
        assert_eq!((delta, consumed), (5, 1));
    }

    #[test]
    fn decode_from_stops_at_terminator_without_consuming_past_it() {
        let buf = SoundBuffer::new(vec![0x00]);
        let (words, next) = buf.decode_from(0);
        assert!(words.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn decodes_two_byte_delta() {
        // 0x81 & 0x3f == 1 => seed 0; low byte 0x11 (17) => 0*255 + 16 == 16.
        let (delta, consumed) = decode_word_number_delta(&[0x81, 0x11]);
        assert_eq!((delta, consumed), (16, 2));
    }

    #[test]
    fn sound_buffer_decodes_delta_chain() {
        let buf = SoundBuffer::new(vec![0x06, 0x04, 0x00]);
        let (words, next) = buf.decode_from(0);
        assert_eq!(words, vec![5, 8]);
        assert_eq!(next, 3);
    }

    #[test]
    fn map_similar_uses_array_for_ascii() {
        let mut lang = Language::from_parts(
            Trie::new(vec![0], vec![0]).unwrap(),
            None,
            None,
            None,
            SoundBuffer::default(),
            RepTable::new(),
            RepTable::new(),
            CompoundRules::default(),
            0,
        );
        lang.map_array[b'0' as usize] = Some(b'O');
        assert_eq!(lang.map_similar('0'), Some('O'));
        assert_eq!(lang.map_similar('9'), None);
    }
}
