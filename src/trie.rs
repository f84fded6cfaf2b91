//! Read-only access to a compact two-array byte-trie.
//!
//! Grounded on the teacher's `trie.rs` `TrieNode`, generalized from a
//! `HashMap<char, Box<TrieNode>>` recursive tree to the flat `byts`/`idxs`
//! array encoding spec.md §4.1 requires: a node at offset `n` begins with
//! `len = byts[n]`, followed by `len` sorted child bytes, with
//! `idxs[n+1..n+len]` holding either child offsets or (for a zero child byte)
//! packed terminal word-flags.
use bitflags::bitflags;

bitflags! {
    /// Word-flags packed into a terminal `idxs` slot.
    ///
    /// Region bits occupy the high 16 bits, the compound-flag byte occupies
    /// bits 24-31 (aliased below via [`WordFlags::from_raw`]), and the
    /// remaining low bits are the WF_* options from spec.md §4.1.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WordFlags: u32 {
        const KEEPCAP   = 0x0001;
        const ALLCAP    = 0x0002;
        const ONECAP    = 0x0004;
        const RARE      = 0x0008;
        const REGION    = 0x0010;
        const BANNED    = 0x0020;
        const NOSUGGEST = 0x0040;
        const NEEDCOMP  = 0x0080;
        const RAREPFX   = 0x0100;
    }
}

impl WordFlags {
    const REGION_SHIFT: u32 = 16;
    const REGION_MASK: u32 = 0xFFFF << Self::REGION_SHIFT;
    const COMPOUND_SHIFT: u32 = 24;
    const COMPOUND_MASK: u32 = 0xFF << Self::COMPOUND_SHIFT;

    /// Decode a raw 32-bit `idxs` terminal slot into flags plus the packed
    /// region mask and compound-flag byte.
    pub fn from_raw(raw: u32) -> (WordFlags, u16, u8) {
        let flags =
            WordFlags::from_bits_truncate(raw & !(Self::REGION_MASK | Self::COMPOUND_MASK));
        let region = ((raw & Self::REGION_MASK) >> Self::REGION_SHIFT) as u16;
        let compound_flag = ((raw & Self::COMPOUND_MASK) >> Self::COMPOUND_SHIFT) as u8;
        (flags, region, compound_flag)
    }

    /// Re-pack flags, region mask and compound-flag byte into a raw slot,
    /// the inverse of [`WordFlags::from_raw`].
    pub fn to_raw(self, region: u16, compound_flag: u8) -> u32 {
        self.bits()
            | ((region as u32) << Self::REGION_SHIFT)
            | ((compound_flag as u32) << Self::COMPOUND_SHIFT)
    }
}

/// One decoded terminal (a word ending at this trie node).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminal {
    pub flags: WordFlags,
    pub region_mask: u16,
    pub compound_flag: u8,
}

/// A read-only compact trie: `byts[n]` is a node's child-count byte followed
/// by its sorted child bytes; `idxs` is the parallel array of child offsets
/// or packed terminal flags for zero-byte children.
#[derive(Debug, Clone, Default)]
pub struct Trie {
    byts: Vec<u8>,
    idxs: Vec<u32>,
}

/// Result of stepping one byte from a trie node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Descended into a child node at this offset.
    Node(usize),
    /// The byte has no matching child at this node.
    NoMatch,
}

impl Trie {
    /// Build a trie from already-decoded arrays. No validation beyond a
    /// length sanity check is performed; `byts`/`idxs` are assumed to come
    /// from a trusted loader (dictionary loading is out of scope, see
    /// spec.md §1).
    pub fn new(byts: Vec<u8>, idxs: Vec<u32>) -> Result<Self, crate::error::SpellError> {
        if idxs.len() < byts.len() {
            return Err(crate::error::SpellError::TrieTooShort { what: "trie" });
        }
        Ok(Trie { byts, idxs })
    }

    pub fn is_empty(&self) -> bool {
        self.byts.is_empty()
    }

    /// Offset of the root node.
    pub fn root(&self) -> usize {
        0
    }

    /// Number of children (and terminals) at node `n`.
    pub fn node_len(&self, n: usize) -> usize {
        self.byts.get(n).copied().unwrap_or(0) as usize
    }

    /// Iterate over the children of node `n` as `(byte, idxs_slot)` pairs.
    /// A byte of `0` marks a terminal rather than a child node; a node may
    /// list more than one zero child when the same prefix terminates with
    /// distinct flag sets.
    pub fn children(&self, n: usize) -> impl Iterator<Item = (u8, u32)> + '_ {
        let len = self.node_len(n);
        (1..=len).filter_map(move |i| {
            let byte = *self.byts.get(n + i)?;
            let slot = *self.idxs.get(n + i)?;
            Some((byte, slot))
        })
    }

    /// Step from node `n` through child byte `c`. Returns `NoMatch` if no
    /// child carries that byte. Linear scan is appropriate for the small
    /// (typically < 30) child counts found in a compact dictionary trie.
    pub fn step(&self, n: usize, c: u8) -> Step {
        if c == 0 {
            return Step::NoMatch;
        }
        for (byte, slot) in self.children(n) {
            if byte == c {
                return Step::Node(slot as usize);
            }
            if byte > c {
                break; // children are sorted
            }
        }
        Step::NoMatch
    }

    /// Binary-search variant of [`Trie::step`], used by `find_keepcap_word`
    /// (spec.md §4.8) where node fan-out can be large enough that a linear
    /// scan would dominate.
    pub fn step_binary(&self, n: usize, c: u8) -> Step {
        if c == 0 {
            return Step::NoMatch;
        }
        let len = self.node_len(n);
        let base = n + 1;
        let mut lo = 0usize;
        let mut hi = len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let byte = self.byts[base + mid];
            match byte.cmp(&c) {
                std::cmp::Ordering::Equal => return Step::Node(self.idxs[base + mid] as usize),
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
            }
        }
        Step::NoMatch
    }

    /// Decode all terminals (zero-byte children) at node `n`.
    pub fn terminals(&self, n: usize) -> impl Iterator<Item = Terminal> + '_ {
        self.children(n).filter(|(b, _)| *b == 0).map(|(_, slot)| {
            let (flags, region_mask, compound_flag) = WordFlags::from_raw(slot);
            Terminal {
                flags,
                region_mask,
                compound_flag,
            }
        })
    }

    /// `true` if node `n` has at least one terminal.
    pub fn has_terminal(&self, n: usize) -> bool {
        self.children(n).any(|(b, _)| b == 0)
    }

    /// Raw `idxs` slots of node `n`'s zero-byte children, undecoded. Used by
    /// the sound trie, whose terminal slots hold a `sug_buffer` byte offset
    /// rather than packed [`WordFlags`] (spec.md §3 `sug_buffer`).
    pub fn terminal_raw(&self, n: usize) -> impl Iterator<Item = u32> + '_ {
        self.children(n).filter(|(b, _)| *b == 0).map(|(_, slot)| slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a tiny trie over {"a", "an", "and"} for walk tests.
    fn small_trie() -> Trie {
        // node 0 (root): children 'a' -> node 3
        // node 3: children '\0' (terminal, word "a"), 'n' -> node 7
        // node 7: children '\0' (terminal "an"), 'd' -> node 11
        // node 11: children '\0' (terminal "and")
        let byts = vec![
            1, b'a', // node 0: len=1, child 'a' -> idx[1]
            0, 0, 0, // padding to reach offset 3
            2, 0, b'n', // node 3: len=2, children '\0' (terminal), 'n' -> idx
            0, 0, 0, // padding to reach offset 7
            2, 0, b'd', // node 7: len=2, children '\0' (terminal), 'd' -> idx
            0, 0, 0, // padding to reach offset 11
            1, 0, // node 11: len=1, child '\0' (terminal)
        ];
        let terminal_flags = WordFlags::empty().to_raw(0, 0);
        let idxs = vec![
            0, 3, 0, // node 0
            0, terminal_flags, 7, 0, // node 3
            0, terminal_flags, 11, 0, // node 7
            0, terminal_flags, // node 11
        ];
        Trie::new(byts, idxs).unwrap()
    }

    #[test]
    fn steps_through_children_in_order() {
        let t = small_trie();
        let n1 = match t.step(t.root(), b'a') {
            Step::Node(n) => n,
            Step::NoMatch => panic!("expected match"),
        };
        assert_eq!(n1, 3);
        assert!(t.has_terminal(n1));
        let n2 = match t.step(n1, b'n') {
            Step::Node(n) => n,
            Step::NoMatch => panic!("expected match"),
        };
        assert_eq!(n2, 7);
        assert!(t.has_terminal(n2));
    }

    #[test]
    fn no_match_on_unknown_byte() {
        let t = small_trie();
        assert_eq!(t.step(t.root(), b'z'), Step::NoMatch);
    }

    #[test]
    fn word_flags_round_trip_through_raw() {
        let flags = WordFlags::ALLCAP | WordFlags::RARE;
        let raw = flags.to_raw(0x1234, 0x56);
        let (decoded_flags, region, compound) = WordFlags::from_raw(raw);
        assert_eq!(decoded_flags, flags);
        assert_eq!(region, 0x1234);
        assert_eq!(compound, 0x56);
    }
}
