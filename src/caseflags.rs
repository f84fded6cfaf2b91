//! Case classification and prefix/compound validity helpers (spec.md §4.8).
//!
//! Grounded directly on `original_source/src/spellsuggest.c`'s `captype`/
//! `badword_captype` (lines ~304-348) and the `valid_word_prefix`/
//! `can_be_compound` checks used throughout the walk (around lines
//! 1560-1690). The teacher has no case-classification analog; this module
//! is original-source-grounded rather than teacher-grounded, which
//! SPEC_FULL.md §A notes explicitly.
use crate::trie::WordFlags;

/// Classify a word's capitalization pattern (spec.md §4.8 `captype`).
///
/// - No upper-case letters at all: empty (all-lowercase).
/// - More uppers than lowers, and at least 3 uppers: [`CaseFlags::ALLCAP`].
/// - Else if the first letter is upper: [`CaseFlags::ONECAP`].
/// - At least two uppers and two lowers anywhere: also [`CaseFlags::MIXCAP`]
///   (combinable with the above, e.g. "maCARONI").
/// - A mixture that matches none of the above (some uppercase, but not
///   leading, not outnumbering lowercase, and not reaching the MIXCAP
///   threshold — e.g. "wOrld"): [`CaseFlags::KEEPCAP`], so a dictionary hit
///   for such a word is presented in the user's original casing rather than
///   silently folded.
pub fn captype(word: &str) -> CaseFlags {
    let mut upper = 0u32;
    let mut lower = 0u32;
    let mut first_upper = false;
    for (i, c) in word.chars().enumerate() {
        if c.is_uppercase() {
            upper += 1;
            if i == 0 {
                first_upper = true;
            }
        } else if c.is_lowercase() {
            lower += 1;
        }
    }

    let mut flags = CaseFlags::empty();
    if upper > lower && upper > 2 {
        flags |= CaseFlags::ALLCAP;
    } else if first_upper {
        flags |= CaseFlags::ONECAP;
    }
    if upper >= 2 && lower >= 2 {
        flags |= CaseFlags::MIXCAP;
    }
    if flags.is_empty() && upper > 0 {
        flags |= CaseFlags::KEEPCAP;
    }
    flags
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CaseFlags: u32 {
        const ONECAP  = 0x01;
        const ALLCAP  = 0x02;
        const MIXCAP  = 0x04;
        const KEEPCAP = 0x08;
    }
}

/// `badword_captype`: like [`captype`], but when the dictionary marks this
/// word `WF_KEEPCAP`, recompute ONECAP/ALLCAP/MIXCAP directly from the raw
/// letter casing (ignoring fold-case) so [`make_case_word`] can turn
/// `WOrd` into `Word`.
pub fn badword_captype(word: &str, is_keepcap: bool) -> CaseFlags {
    let flags = captype(word);
    if !is_keepcap {
        return flags;
    }
    let mut out = CaseFlags::KEEPCAP;
    let mut upper = 0u32;
    let mut lower = 0u32;
    let mut first_upper = false;
    for (i, c) in word.chars().enumerate() {
        if c.is_uppercase() {
            upper += 1;
            if i == 0 {
                first_upper = true;
            }
        } else {
            lower += 1;
        }
    }
    if upper > lower && upper > 2 {
        out |= CaseFlags::ALLCAP;
    } else if first_upper {
        out |= CaseFlags::ONECAP;
    }
    if upper >= 2 && lower >= 2 {
        out |= CaseFlags::MIXCAP;
    }
    out
}

/// Produce a case-adjusted copy of `src` per `flags` (spec.md §4.8
/// `make_case_word`): ALLCAP upper-cases everything, ONECAP upper-cases
/// only the first character, otherwise `src` is returned unchanged.
pub fn make_case_word(src: &str, flags: CaseFlags) -> String {
    if flags.contains(CaseFlags::ALLCAP) {
        src.to_uppercase()
    } else if flags.contains(CaseFlags::ONECAP) {
        let mut chars = src.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        src.to_string()
    }
}

/// Search the keepcase trie for a case variant whose folded form equals
/// `fword`, trying each character as both its folded and upper form
/// (spec.md §4.8 `find_keepcap_word`). Binary search is used within each
/// node, per the dictionary-trie convention (large fan-out at the root).
pub fn find_keepcap_word(trie: &crate::trie::Trie, fword: &str) -> Option<String> {
    fn recurse(trie: &crate::trie::Trie, node: usize, rest: &str, acc: &mut String) -> bool {
        if rest.is_empty() {
            return trie.has_terminal(node);
        }
        let mut chars = rest.chars();
        let c = chars.next().unwrap();
        let remainder = chars.as_str();
        for candidate in [c, c.to_ascii_uppercase()] {
            let mut buf = [0u8; 4];
            let bytes = candidate.encode_utf8(&mut buf).as_bytes();
            let mut cur = node;
            let mut ok = true;
            for &b in bytes {
                match trie.step_binary(cur, b) {
                    crate::trie::Step::Node(n) => cur = n,
                    crate::trie::Step::NoMatch => {
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                acc.push(candidate);
                if recurse(trie, cur, remainder, acc) {
                    return true;
                }
                acc.pop();
            }
        }
        false
    }

    let mut acc = String::new();
    if recurse(trie, trie.root(), fword, &mut acc) {
        Some(acc)
    } else {
        None
    }
}

/// Verify a prefix/word flag combination (spec.md §4.8 `valid_word_prefix`).
/// Returns `None` on rejection; `Some(true)` when the combination is valid
/// and the prefix additionally carries `RAREPFX` (so the caller should fold
/// that rarity into the word's score), `Some(false)` otherwise.
pub fn valid_word_prefix(prefix_flags: WordFlags, word_flags: WordFlags) -> Option<bool> {
    if word_flags.intersects(WordFlags::NOSUGGEST) {
        return None;
    }
    Some(prefix_flags.contains(WordFlags::RAREPFX))
}

/// `can_be_compound`: `true` if `flag` is permitted at this position
/// (start vs. interior) and, when the compound rule set has no wildcard
/// entries, the flag sequence accumulated so far still matches some rule's
/// prefix (spec.md §4.8).
pub fn can_be_compound(
    compound: &crate::language::CompoundRules,
    flag: u8,
    at_start: bool,
    flags_so_far: &[u8],
) -> bool {
    let allowed = if at_start {
        &compound.start_flags
    } else {
        &compound.all_flags
    };
    if !allowed.contains(&flag) {
        return false;
    }
    if compound.rules.is_empty() {
        return true;
    }
    let has_wildcard = compound.rules.iter().any(|r| r.contains(['*', '?']));
    if has_wildcard {
        return true;
    }
    compound.rules.iter().any(|rule| {
        let rule_bytes = rule.as_bytes();
        if rule_bytes.len() < flags_so_far.len() + 1 {
            return false;
        }
        rule_bytes[..flags_so_far.len()] == *flags_so_far && rule_bytes[flags_so_far.len()] == flag
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::{Step, Trie};

    #[test]
    fn all_lowercase_is_no_flags() {
        assert_eq!(captype("hello"), CaseFlags::empty());
    }

    #[test]
    fn single_leading_capital_is_onecap() {
        assert_eq!(captype("Hello"), CaseFlags::ONECAP);
    }

    #[test]
    fn three_or_more_uppers_outweighing_lowers_is_allcap() {
        assert_eq!(captype("ABCd"), CaseFlags::ALLCAP);
    }

    #[test]
    fn two_and_two_is_mixcap() {
        let flags = captype("maCARONI");
        assert!(flags.contains(CaseFlags::ALLCAP) || flags.contains(CaseFlags::MIXCAP));
        assert!(captype("maCAroni").contains(CaseFlags::MIXCAP));
    }

    #[test]
    fn lone_interior_capital_is_keepcap() {
        // Lowercase first letter, one uppercase letter in the middle: not
        // ONECAP (doesn't start capitalized), not ALLCAP (too few uppers),
        // not MIXCAP (fewer than two uppers) — a mixture matching none of
        // the other classes.
        assert_eq!(captype("wOrld"), CaseFlags::KEEPCAP);
    }

    #[test]
    fn make_case_word_applies_allcap() {
        assert_eq!(make_case_word("them", CaseFlags::ALLCAP), "THEM");
    }

    #[test]
    fn make_case_word_applies_onecap() {
        assert_eq!(make_case_word("teh", CaseFlags::ONECAP), "Teh");
    }

    #[test]
    fn make_case_word_is_noop_without_flags() {
        assert_eq!(make_case_word("them", CaseFlags::empty()), "them");
    }

    #[test]
    fn valid_word_prefix_rejects_nosuggest() {
        assert_eq!(
            valid_word_prefix(WordFlags::empty(), WordFlags::NOSUGGEST),
            None
        );
    }

    #[test]
    fn valid_word_prefix_carries_rarepfx() {
        assert_eq!(
            valid_word_prefix(WordFlags::RAREPFX, WordFlags::empty()),
            Some(true)
        );
        assert_eq!(
            valid_word_prefix(WordFlags::empty(), WordFlags::empty()),
            Some(false)
        );
    }

    /// Build a single-chain trie for `word` only: node `i` (at offset
    /// `2*i`) has one child, the byte at `word[i]` (or, for the final
    /// node, a terminal `0` byte), pointing at node `i+1`'s offset `2*(i+1)`.
    fn trie_with_word(word: &str) -> Trie {
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
                idxs[off + 1] = WordFlags::empty().to_raw(0, 0);
            }
        }
        Trie::new(byts, idxs).unwrap()
    }

    #[test]
    fn trie_with_word_helper_is_walkable() {
        let t = trie_with_word("ab");
        let n1 = match t.step(t.root(), b'a') {
            Step::Node(n) => n,
            Step::NoMatch => panic!(),
        };
        let n2 = match t.step(n1, b'b') {
            Step::Node(n) => n,
            Step::NoMatch => panic!(),
        };
        assert!(t.has_terminal(n2));
    }
}
