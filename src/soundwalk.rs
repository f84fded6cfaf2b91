//! The sound-fold trie walk: searches a dictionary's phonetic trie the same
//! way [`crate::walk::walk`] searches its fold trie.
//!
//! This is a deliberately smaller sibling of `walk`: the sound trie's
//! terminal payload is a `sug_buffer` byte offset, not a packed
//! [`crate::trie::WordFlags`] word. Reusing `walk`'s commit path would
//! misinterpret that offset as flags (a `NOSUGGEST` or `KEEPCAP` bit could
//! spuriously be set by an arbitrary offset value), so matches are
//! collected here as plain `(sound_word, score, buffer_offset)` triples and
//! expanded into real dictionary words by the caller via
//! [`crate::language::SoundBuffer::decode_from`]. The edit operations are
//! the same PLAIN/DEL/INS/SWAP/SWAP3/REP set `walk` implements; compounding
//! and prefix handling never apply to a soundfolded string, so they are
//! simply absent here rather than guarded off at runtime.
use std::time::Instant;

use crate::options::ScoreTable;
use crate::rep::RepTable;
use crate::scoring;
use crate::trie::Trie;

/// One sound-trie match: the soundfolded text actually reached, the
/// accumulated edit score to get there, and the raw `sug_buffer` offset
/// recorded at that trie terminal.
#[derive(Debug, Clone)]
pub struct SoundMatch {
    pub sound_word: String,
    pub score: i32,
    pub buffer_offset: u32,
}

#[derive(Debug, Clone)]
struct Frame {
    node: usize,
    remaining: Vec<u8>,
    score: i32,
    tword: Vec<u8>,
    depth: usize,
}

/// Walk `sound_trie` against `fsound` (the sound-folded bad word),
/// collecting every reachable terminal whose accumulated score stays below
/// `max_score`. Mirrors [`crate::walk::walk`]'s state set minus compounding
/// and the prefix tree, neither of which apply to a soundfolded string.
#[allow(clippy::too_many_arguments)]
pub fn sound_walk(
    fsound: &str,
    sound_trie: &Trie,
    rep_table: &RepTable,
    scores: &ScoreTable,
    max_score: i32,
    deadline: Instant,
    mut interrupted: impl FnMut() -> bool,
) -> Vec<SoundMatch> {
    let mut out = Vec::new();
    let initial = Frame {
        node: sound_trie.root(),
        remaining: fsound.as_bytes().to_vec(),
        score: 0,
        tword: Vec::new(),
        depth: 0,
    };
    let mut stack = vec![initial];
    let mut iterations: u64 = 0;

    while let Some(frame) = stack.pop() {
        iterations += 1;
        if iterations % 1000 == 0 && (interrupted() || Instant::now() >= deadline) {
            break;
        }
        if frame.score >= max_score {
            continue;
        }

        if frame.remaining.is_empty() {
            for raw in sound_trie.terminal_raw(frame.node) {
                out.push(SoundMatch {
                    sound_word: String::from_utf8_lossy(&frame.tword).into_owned(),
                    score: frame.score,
                    buffer_offset: raw,
                });
            }
            continue;
        }

        for (child_byte, slot) in sound_trie.children(frame.node) {
            if child_byte == 0 {
                continue;
            }
            let next = frame.remaining[0];
            let cost = if child_byte == next { 0 } else { scores.subst };
            let mut tword = frame.tword.clone();
            tword.push(child_byte);
            push(
                &mut stack,
                Frame {
                    node: slot as usize,
                    remaining: frame.remaining[1..].to_vec(),
                    score: frame.score + cost,
                    tword,
                    depth: frame.depth + 1,
                },
                max_score,
            );
        }

        {
            let dup = frame.remaining.len() >= 2 && frame.remaining[0] == frame.remaining[1];
            let cost = if dup { scoring::DELDUP } else { scores.del };
            push(
                &mut stack,
                Frame {
                    node: frame.node,
                    remaining: frame.remaining[1..].to_vec(),
                    score: frame.score + cost,
                    tword: frame.tword.clone(),
                    depth: frame.depth + 1,
                },
                max_score,
            );
        }

        for (child_byte, slot) in sound_trie.children(frame.node) {
            if child_byte == 0 || child_byte == frame.remaining[0] {
                continue;
            }
            let dup = frame.tword.last() == Some(&child_byte);
            let cost = if dup { scoring::INSDUP } else { scores.ins };
            let mut tword = frame.tword.clone();
            tword.push(child_byte);
            push(
                &mut stack,
                Frame {
                    node: slot as usize,
                    remaining: frame.remaining.clone(),
                    score: frame.score + cost,
                    tword,
                    depth: frame.depth + 1,
                },
                max_score,
            );
        }

        if frame.remaining.len() >= 2 && frame.remaining[0] != frame.remaining[1] {
            let (a, b) = (frame.remaining[0], frame.remaining[1]);
            if let crate::trie::Step::Node(n1) = sound_trie.step(frame.node, b) {
                if let crate::trie::Step::Node(n2) = sound_trie.step(n1, a) {
                    let mut tword = frame.tword.clone();
                    tword.push(b);
                    tword.push(a);
                    push(
                        &mut stack,
                        Frame {
                            node: n2,
                            remaining: frame.remaining[2..].to_vec(),
                            score: frame.score + scores.swap,
                            tword,
                            depth: frame.depth + 1,
                        },
                        max_score,
                    );
                }
            }
        }

        // Try every rule sharing the current byte, not just the first match
        // (same fix as the fold-trie walk's REP state).
        if let Some(&first) = frame.remaining.first() {
            for rule in rep_table.rules_for(first) {
                let from = rule.from.as_bytes();
                if rule.to == rule.from || frame.remaining.len() < from.len() || &frame.remaining[..from.len()] != from {
                    continue;
                }
                let mut remaining = rule.to.as_bytes().to_vec();
                remaining.extend_from_slice(&frame.remaining[from.len()..]);
                push(
                    &mut stack,
                    Frame {
                        node: frame.node,
                        remaining,
                        score: frame.score + scores.rep,
                        tword: frame.tword.clone(),
                        depth: frame.depth + 1,
                    },
                    max_score,
                );
            }
        }
    }

    out
}

fn push(stack: &mut Vec<Frame>, frame: Frame, ceiling: i32) {
    if frame.depth < crate::walk::MAX_WORD_LEN - 1 && frame.score < ceiling {
        stack.push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rep::RepTable;
    use crate::trie::WordFlags;

    fn sound_trie_with(word: &str, offset: u32) -> Trie {
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
                idxs[off + 1] = offset;
            }
        }
        Trie::new(byts, idxs).unwrap()
    }

    #[test]
    fn exact_match_carries_buffer_offset() {
        let trie = sound_trie_with("KT", 42);
        let matches = sound_walk(
            "KT",
            &trie,
            &RepTable::new(),
            &ScoreTable::default(),
            scoring::MAXINIT,
            Instant::now() + std::time::Duration::from_secs(1),
            || false,
        );
        let hit = matches.iter().find(|m| m.sound_word == "KT").unwrap();
        assert_eq!(hit.score, 0);
        assert_eq!(hit.buffer_offset, 42);
    }

    #[test]
    fn one_substitution_is_reachable() {
        let trie = sound_trie_with("KT", 7);
        let matches = sound_walk(
            "KX",
            &trie,
            &RepTable::new(),
            &ScoreTable::default(),
            scoring::MAXINIT,
            Instant::now() + std::time::Duration::from_secs(1),
            || false,
        );
        let hit = matches.iter().find(|m| m.sound_word == "KT").unwrap();
        assert_eq!(hit.score, scoring::SUBST);
        let _ = WordFlags::empty(); // sound trie terminals never carry WordFlags
    }
}
