//! Edit-distance scorers: a Du & Chang style dynamic-programming distance
//! and a bounded, early-aborting variant for callers that already hold a
//! cost ceiling. Rust strings are always UTF-8, so there is exactly one
//! code path here operating on `Vec<char>` rather than a byte-width fork.
use crate::scoring;

fn fold_eq(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

/// Unbounded Du & Chang (1992) edit distance (Aspell's `edit_distance`),
/// extended with an ICASE discount for pure case differences and a
/// SIMILAR discount for dictionary-declared similar characters.
///
/// `is_similar(a, b)` should answer whether `a` and `b` are declared
/// similar by the active language's character-equivalence map
/// (`Language::map_array`/`map_hash`); pass `|_, _| false` when no map is
/// active.
pub fn edit_score(bad: &str, good: &str, is_similar: impl Fn(char, char) -> bool) -> i32 {
    let bad: Vec<char> = bad.chars().collect();
    let good: Vec<char> = good.chars().collect();
    let badlen = bad.len();
    let goodlen = good.len();

    // cnt[i][j] = cost of turning bad[..i] into good[..j].
    let mut cnt = vec![vec![0i32; goodlen + 1]; badlen + 1];
    for j in 1..=goodlen {
        cnt[0][j] = cnt[0][j - 1] + scoring::INS;
    }
    for i in 1..=badlen {
        cnt[i][0] = cnt[i - 1][0] + scoring::DEL;
        for j in 1..=goodlen {
            let bc = bad[i - 1];
            let gc = good[j - 1];
            if bc == gc {
                cnt[i][j] = cnt[i - 1][j - 1];
                continue;
            }
            let mut best = if fold_eq(bc, gc) {
                scoring::ICASE + cnt[i - 1][j - 1]
            } else if is_similar(gc, bc) {
                scoring::SIMILAR + cnt[i - 1][j - 1]
            } else {
                scoring::SUBST + cnt[i - 1][j - 1]
            };

            if i > 1 && j > 1 {
                let pbc = bad[i - 2];
                let pgc = good[j - 2];
                if bc == pgc && pbc == gc {
                    best = best.min(scoring::SWAP + cnt[i - 2][j - 2]);
                }
            }
            best = best.min(scoring::DEL + cnt[i - 1][j]);
            best = best.min(scoring::INS + cnt[i][j - 1]);
            cnt[i][j] = best;
        }
    }
    cnt[badlen][goodlen]
}

#[derive(Debug, Clone, Copy)]
struct StackItem {
    bad_i: usize,
    good_i: usize,
    score: i32,
}

/// Bounded edit distance: like [`edit_score`] but aborts once the best
/// possible remaining score cannot beat `limit`, returning
/// [`scoring::MAXMAX`] in that case. Used by the walk's hot path where an
/// exact score is only needed when it might survive pruning.
pub fn edit_score_limit(
    bad: &str,
    good: &str,
    limit: i32,
    is_similar: impl Fn(char, char) -> bool,
) -> i32 {
    let bad: Vec<char> = bad.chars().collect();
    let good: Vec<char> = good.chars().collect();

    // Fixed-capacity stack of deferred alternatives, matching the
    // original's `limitscore_T stack[10]` ("allow for over 3 * 2 edits").
    let mut stack: Vec<StackItem> = Vec::with_capacity(10);
    let mut bi = 0usize;
    let mut gi = 0usize;
    let mut score = 0i32;
    let mut minscore = limit + 1;

    loop {
        // Skip over an equal run; score stays the same.
        loop {
            let bc = bad.get(bi).copied();
            let gc = good.get(gi).copied();
            if bc != gc {
                break;
            }
            if bc.is_none() {
                if score < minscore {
                    minscore = score;
                }
                // pop
                match stack.pop() {
                    Some(item) => {
                        bi = item.bad_i;
                        gi = item.good_i;
                        score = item.score;
                        continue;
                    }
                    None => return finish(minscore, limit),
                }
            }
            bi += 1;
            gi += 1;
        }

        let bc = bad.get(bi).copied();
        let gc = good.get(gi).copied();

        let popped = if gc.is_none() {
            // goodword ends: delete remaining badword chars.
            let mut done = false;
            loop {
                score += scoring::DEL;
                if score >= minscore {
                    done = true;
                    break;
                }
                bi += 1;
                if bad.get(bi).is_none() {
                    break;
                }
            }
            if !done {
                minscore = score;
                done = true;
            }
            done
        } else if bc.is_none() {
            // badword ends: insert remaining goodword chars.
            let mut done = false;
            loop {
                score += scoring::INS;
                if score >= minscore {
                    done = true;
                    break;
                }
                gi += 1;
                if good.get(gi).is_none() {
                    break;
                }
            }
            if !done {
                minscore = score;
                done = true;
            }
            done
        } else {
            let bc = bc.unwrap();
            let gc = gc.unwrap();
            // round 0: delete a char from badword, round 1: insert one.
            for round in 0..=1 {
                let score_off = score + if round == 0 { scoring::DEL } else { scoring::INS };
                if score_off < minscore {
                    if score_off + scoring::EDIT_MIN >= minscore {
                        let mut bi2 = bi + 1 - round;
                        let mut gi2 = gi + round;
                        loop {
                            match (good.get(gi2), bad.get(bi2)) {
                                (Some(&g), Some(&b)) if g == b => {
                                    bi2 += 1;
                                    gi2 += 1;
                                }
                                (None, None) => {
                                    minscore = score_off;
                                    break;
                                }
                                _ => break,
                            }
                        }
                    } else if stack.len() < 10 {
                        stack.push(StackItem {
                            bad_i: bi + 1 - round,
                            good_i: gi + round,
                            score: score_off,
                        });
                    }
                }
            }

            if score + scoring::SWAP < minscore
                && bad.get(bi + 1).copied() == Some(gc)
                && good.get(gi + 1).copied() == Some(bc)
            {
                gi += 2;
                bi += 2;
                score += scoring::SWAP;
                continue;
            }

            if fold_eq(bc, gc) {
                score += scoring::ICASE;
            } else if is_similar(gc, bc) {
                score += scoring::SIMILAR;
            } else {
                score += scoring::SUBST;
            }

            if score < minscore {
                gi += 1;
                bi += 1;
                continue;
            }
            true
        };

        if popped {
            match stack.pop() {
                Some(item) => {
                    bi = item.bad_i;
                    gi = item.good_i;
                    score = item.score;
                }
                None => return finish(minscore, limit),
            }
        }
    }
}

fn finish(minscore: i32, limit: i32) -> i32 {
    if minscore > limit {
        scoring::MAXMAX
    } else {
        minscore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_words_score_zero() {
        assert_eq!(edit_score("the", "the", |_, _| false), 0);
    }

    #[test]
    fn single_substitution_costs_subst() {
        assert_eq!(edit_score("cat", "cot", |_, _| false), scoring::SUBST);
    }

    #[test]
    fn single_insertion_costs_ins() {
        assert_eq!(edit_score("ct", "cat", |_, _| false), scoring::INS);
    }

    #[test]
    fn single_deletion_costs_del() {
        assert_eq!(edit_score("cat", "ct", |_, _| false), scoring::DEL);
    }

    #[test]
    fn transposition_costs_swap() {
        assert_eq!(edit_score("hte", "the", |_, _| false), scoring::SWAP);
    }

    #[test]
    fn case_only_difference_costs_icase() {
        assert_eq!(edit_score("The", "the", |_, _| false), scoring::ICASE);
    }

    #[test]
    fn limit_matches_unbounded_within_limit() {
        for (bad, good) in [("hte", "the"), ("cat", "cot"), ("ct", "cat"), ("cat", "ct")] {
            let full = edit_score(bad, good, |_, _| false);
            let limited = edit_score_limit(bad, good, scoring::MAXINIT, |_, _| false);
            assert_eq!(full, limited, "mismatch for {bad:?}->{good:?}");
        }
    }

    #[test]
    fn limit_returns_maxmax_when_exceeded() {
        let got = edit_score_limit("abcdef", "ghijkl", 10, |_, _| false);
        assert_eq!(got, scoring::MAXMAX);
    }
}
