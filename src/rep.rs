//! REP-rule tables: ordered (from, to) string substitution rules, bucketed
//! by first byte for O(1) lookup during the walk's `STATE_REP` states.
//!
//! The walk's probe is "does any rule's `from` start with the byte at
//! `fword[f_idx]`", not "does any rule exactly match this string" — so the
//! table buckets by `from.as_bytes()[0]` into 256 lists rather than hashing
//! the whole string.
use crate::error::SpellError;

/// One REP/SAL substitution rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepRule {
    pub from: String,
    pub to: String,
}

/// Ordered REP rules, bucketed by the first byte of `from` for O(1)
/// candidate-rule lookup via a 256-entry first-byte table.
#[derive(Debug, Clone)]
pub struct RepTable {
    rules: Vec<RepRule>,
    by_first_byte: [Vec<u32>; 256],
}

impl Default for RepTable {
    // `[Vec<u32>; 256]` has no std `Default` impl (only arrays up to length
    // 32 do), so this can't be `#[derive(Default)]`.
    fn default() -> Self {
        RepTable {
            rules: Vec::new(),
            by_first_byte: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl RepTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an ordered list of (from, to) pairs. Order is
    /// preserved within each bucket, matching the first-match-wins semantics
    /// of the original's `.aff` REP directive ordering.
    pub fn build(rules: Vec<RepRule>) -> Result<Self, SpellError> {
        let mut table = RepTable::new();
        for rule in rules {
            table.push(rule)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, rule: RepRule) -> Result<(), SpellError> {
        let first = rule.from.as_bytes().first().copied().ok_or(SpellError::EmptyRepRule)?;
        let idx = self.rules.len() as u32;
        self.rules.push(rule);
        self.by_first_byte[first as usize].push(idx);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules whose `from` starts with `first_byte`, in declaration order.
    pub fn rules_for(&self, first_byte: u8) -> impl Iterator<Item = &RepRule> {
        self.by_first_byte[first_byte as usize]
            .iter()
            .map(move |&i| &self.rules[i as usize])
    }

    /// Find the first rule whose `from` matches `text` starting at byte
    /// offset `at`, returning the rule and the byte span it covers.
    pub fn find_match<'a>(&'a self, text: &[u8], at: usize) -> Option<(&'a RepRule, usize)> {
        let first = *text.get(at)?;
        for rule in self.rules_for(first) {
            let from = rule.from.as_bytes();
            if text.len() >= at + from.len() && &text[at..at + from.len()] == from {
                return Some((rule, from.len()));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_matching_rule_by_first_byte() {
        let table = RepTable::build(vec![
            RepRule { from: "hte".into(), to: "the".into() },
            RepRule { from: "ht".into(), to: "th".into() },
        ])
        .unwrap();
        let (rule, len) = table.find_match(b"hte", 0).unwrap();
        assert_eq!(rule.to, "the");
        assert_eq!(len, 3);
    }

    #[test]
    fn no_match_when_prefix_differs() {
        let table = RepTable::build(vec![RepRule { from: "hte".into(), to: "the".into() }]).unwrap();
        assert!(table.find_match(b"xte", 0).is_none());
    }

    #[test]
    fn rejects_empty_from() {
        let err = RepTable::build(vec![RepRule { from: "".into(), to: "x".into() }]).unwrap_err();
        assert!(matches!(err, SpellError::EmptyRepRule));
    }
}
