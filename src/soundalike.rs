//! The phonetic ("sound-alike") scorer: hard-codes each of up to two edits
//! as its own branch rather than a generic loop, to avoid the overhead a
//! generic edit-distance pass would add on this hot path.
//!
//! Operates on bytes, not `char`s: sound-folded forms are a dictionary's
//! own phonetic alphabet, not necessarily valid Unicode text.
use crate::scoring;

/// Byte at `s[i]`, or `0` (the C NUL terminator) past the end.
fn get(s: &[u8], i: usize) -> u8 {
    s.get(i).copied().unwrap_or(0)
}

/// `strcmp(pl + pi, ps + pj) == 0`: true if `pl[pi..]` and `ps[pj..]` are
/// equal up to and including their (implicit) NUL terminators.
fn streq(pl: &[u8], mut pi: usize, ps: &[u8], mut pj: usize) -> bool {
    loop {
        let a = get(pl, pi);
        let b = get(ps, pj);
        if a != b {
            return false;
        }
        if a == 0 {
            return true;
        }
        pi += 1;
        pj += 1;
    }
}

/// Score two already sound-folded words against each other, permitting up
/// to two inserts/deletes/swaps/substitutions.
pub fn soundalike_score(good: &[u8], bad: &[u8]) -> i32 {
    let mut good_start = 0usize;
    let mut bad_start = 0usize;
    let mut score = 0i32;

    let b0 = get(bad, 0);
    let g0 = get(good, 0);
    if (b0 == b'*' || g0 == b'*') && b0 != g0 {
        let b1 = get(bad, 1);
        let g1 = get(good, 1);
        if (b0 == 0 && g1 == 0) || (g0 == 0 && b1 == 0) {
            // Changing a word with a leading vowel marker to one without a
            // sound at all.
            return scoring::DEL;
        }
        if b0 == 0 || g0 == 0 {
            return scoring::MAXMAX;
        }
        let b2 = get(bad, 2);
        let g2 = get(good, 2);
        if b1 == g1 || (b1 != 0 && g1 != 0 && b2 == g2) {
            // handle like a substitute: fall through unchanged.
        } else {
            score = 2 * scoring::DEL / 3;
            if b0 == b'*' {
                bad_start = 1;
            } else {
                good_start = 1;
            }
        }
    }

    let good_sound = &good[good_start.min(good.len())..];
    let bad_sound = &bad[bad_start.min(bad.len())..];
    let goodlen = good_sound.len() as i32;
    let badlen = bad_sound.len() as i32;
    let n = goodlen - badlen;
    if !(-2..=2).contains(&n) {
        return scoring::MAXMAX;
    }

    let (pl, ps): (&[u8], &[u8]) = if n > 0 {
        (good_sound, bad_sound)
    } else {
        (bad_sound, good_sound)
    };

    let mut skip = 0usize;
    while get(pl, skip) == get(ps, skip) && get(pl, skip) != 0 {
        skip += 1;
    }
    let pl_i = skip;
    let ps_i = skip;

    match n {
        -2 | 2 => {
            let mut pl2 = pl_i + 1;
            let mut ps2 = ps_i;
            while get(pl, pl2) == get(ps, ps2) {
                pl2 += 1;
                ps2 += 1;
            }
            if streq(pl, pl2 + 1, ps, ps2) {
                return score + scoring::DEL * 2;
            }
        }
        -1 | 1 => {
            // 1: delete
            let mut pl2 = pl_i + 1;
            let mut ps2 = ps_i;
            loop {
                if get(pl, pl2) == get(ps, ps2) {
                    if get(pl, pl2) == 0 {
                        return score + scoring::DEL;
                    }
                    pl2 += 1;
                    ps2 += 1;
                } else {
                    break;
                }
            }
            // 2: delete then swap
            if get(pl, pl2) == get(ps, ps2 + 1)
                && get(pl, pl2 + 1) == get(ps, ps2)
                && streq(pl, pl2 + 2, ps, ps2 + 2)
            {
                return score + scoring::DEL + scoring::SWAP;
            }
            // 3: delete then substitute
            if streq(pl, pl2 + 1, ps, ps2 + 1) {
                return score + scoring::DEL + scoring::SUBST;
            }
            // 4: first swap then delete
            if get(pl, pl_i) == get(ps, ps_i + 1) && get(pl, pl_i + 1) == get(ps, ps_i) {
                let mut pl2b = pl_i + 2;
                let mut ps2b = ps_i + 2;
                while get(pl, pl2b) == get(ps, ps2b) {
                    pl2b += 1;
                    ps2b += 1;
                }
                if streq(pl, pl2b + 1, ps, ps2b) {
                    return score + scoring::SWAP + scoring::DEL;
                }
            }
            // 5: first substitute then delete
            let mut pl2c = pl_i + 1;
            let mut ps2c = ps_i + 1;
            while get(pl, pl2c) == get(ps, ps2c) {
                pl2c += 1;
                ps2c += 1;
            }
            if streq(pl, pl2c + 1, ps, ps2c) {
                return score + scoring::SUBST + scoring::DEL;
            }
        }
        0 => {
            // 1: identical
            if get(pl, pl_i) == 0 {
                return score;
            }
            // 2: swap
            if get(pl, pl_i) == get(ps, ps_i + 1) && get(pl, pl_i + 1) == get(ps, ps_i) {
                let mut pl2 = pl_i + 2;
                let mut ps2 = ps_i + 2;
                loop {
                    if get(pl, pl2) == get(ps, ps2) {
                        if get(pl, pl2) == 0 {
                            return score + scoring::SWAP;
                        }
                        pl2 += 1;
                        ps2 += 1;
                    } else {
                        break;
                    }
                }
                // 3: swap and swap again
                if get(pl, pl2) == get(ps, ps2 + 1)
                    && get(pl, pl2 + 1) == get(ps, ps2)
                    && streq(pl, pl2 + 2, ps, ps2 + 2)
                {
                    return score + scoring::SWAP + scoring::SWAP;
                }
                // 4: swap and substitute
                if streq(pl, pl2 + 1, ps, ps2 + 1) {
                    return score + scoring::SWAP + scoring::SUBST;
                }
            }
            // 5: substitute
            let mut pl2 = pl_i + 1;
            let mut ps2 = ps_i + 1;
            loop {
                if get(pl, pl2) == get(ps, ps2) {
                    if get(pl, pl2) == 0 {
                        return score + scoring::SUBST;
                    }
                    pl2 += 1;
                    ps2 += 1;
                } else {
                    break;
                }
            }
            // 6: substitute and swap
            if get(pl, pl2) == get(ps, ps2 + 1)
                && get(pl, pl2 + 1) == get(ps, ps2)
                && streq(pl, pl2 + 2, ps, ps2 + 2)
            {
                return score + scoring::SUBST + scoring::SWAP;
            }
            // 7: substitute and substitute
            if streq(pl, pl2 + 1, ps, ps2 + 1) {
                return score + scoring::SUBST + scoring::SUBST;
            }
            // 8: insert then delete
            let mut pl2b = pl_i;
            let mut ps2b = ps_i + 1;
            while get(pl, pl2b) == get(ps, ps2b) {
                pl2b += 1;
                ps2b += 1;
            }
            if streq(pl, pl2b + 1, ps, ps2b) {
                return score + scoring::INS + scoring::DEL;
            }
            // 9: delete then insert
            let mut pl2c = pl_i + 1;
            let mut ps2c = ps_i;
            while get(pl, pl2c) == get(ps, ps2c) {
                pl2c += 1;
                ps2c += 1;
            }
            if streq(pl, pl2c, ps, ps2c + 1) {
                return score + scoring::INS + scoring::DEL;
            }
        }
        _ => unreachable!("n is clamped to -2..=2 above"),
    }

    scoring::MAXMAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sound_is_zero() {
        assert_eq!(soundalike_score(b"KT", b"KT"), 0);
    }

    #[test]
    fn one_substitution_in_equal_length_words() {
        assert_eq!(soundalike_score(b"KAT", b"KET"), scoring::SUBST);
    }

    #[test]
    fn one_char_longer_is_a_delete() {
        assert_eq!(soundalike_score(b"KAT", b"KT"), scoring::DEL);
    }

    #[test]
    fn too_different_lengths_is_maxmax() {
        assert_eq!(soundalike_score(b"KATERINA", b"K"), scoring::MAXMAX);
    }

    #[test]
    fn adjacent_swap_in_equal_length_words() {
        assert_eq!(soundalike_score(b"KTA", b"KAT"), scoring::SWAP);
    }

    #[test]
    fn leading_vowel_marker_vs_nothing_is_delete() {
        assert_eq!(soundalike_score(b"*", b""), scoring::DEL);
    }
}
