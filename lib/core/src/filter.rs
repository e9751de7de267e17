// Field predicates the document stores evaluate
use crate::poem::Poem;
use crate::rhyme::{RaviPattern, RhymeWord};

pub trait Filter<T>: Send + Sync {
    fn matches(&self, item: &T) -> bool;
}

/// Accepts every document
pub struct MatchAll;

impl<T> Filter<T> for MatchAll {
    fn matches(&self, _item: &T) -> bool {
        true
    }
}

/// Any of the three ravi fields ends with the pattern (case-insensitive).
pub struct RaviSuffixFilter {
    pattern: RaviPattern,
}

impl RaviSuffixFilter {
    pub fn new(pattern: RaviPattern) -> Self {
        Self { pattern }
    }
}

impl Filter<RhymeWord> for RaviSuffixFilter {
    fn matches(&self, word: &RhymeWord) -> bool {
        word.ravi_fields()
            .iter()
            .any(|field| self.pattern.is_suffix_of(field))
    }
}

/// The ravi field picked by pattern length equals the pattern (case-insensitive).
pub struct RaviFieldFilter {
    pattern: RaviPattern,
    len: usize,
}

impl RaviFieldFilter {
    pub fn new(pattern: RaviPattern) -> Self {
        let len = pattern.char_len();
        Self { pattern, len }
    }
}

impl Filter<RhymeWord> for RaviFieldFilter {
    fn matches(&self, word: &RhymeWord) -> bool {
        word.ravi_field(self.len)
            .map(|field| self.pattern.equals(field))
            .unwrap_or(false)
    }
}

/// Title or body contains the keyword (case-insensitive literal).
pub struct KeywordFilter {
    needle: String,
}

impl KeywordFilter {
    pub fn new(keyword: &str) -> Self {
        Self {
            needle: keyword.to_lowercase(),
        }
    }
}

impl Filter<Poem> for KeywordFilter {
    fn matches(&self, poem: &Poem) -> bool {
        poem.title.to_lowercase().contains(&self.needle)
            || poem.body.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_filter_checks_all_fields() {
        let filter = RaviSuffixFilter::new(RaviPattern::new("ged").unwrap());
        assert!(filter.matches(&RhymeWord::new("changed", ["d", "ed", "GED"])));
        assert!(filter.matches(&RhymeWord::new("x", ["aged", "", ""])));
        assert!(!filter.matches(&RhymeWord::new("cat", ["t", "at", "cat"])));
    }

    #[test]
    fn test_suffix_filter_is_literal() {
        let filter = RaviSuffixFilter::new(RaviPattern::new(".d").unwrap());
        assert!(!filter.matches(&RhymeWord::new("ed", ["d", "ed", "ed"])));
        assert!(filter.matches(&RhymeWord::new("x", ["a.d", "", ""])));
    }

    #[test]
    fn test_field_filter_uses_length() {
        let filter = RaviFieldFilter::new(RaviPattern::new("Il").unwrap());
        assert!(filter.matches(&RhymeWord::new("dil", ["l", "il", "dil"])));
        assert!(!filter.matches(&RhymeWord::new("dil", ["il", "l", "il"])));
    }

    #[test]
    fn test_field_filter_too_long_never_matches() {
        let filter = RaviFieldFilter::new(RaviPattern::new("abcd").unwrap());
        assert!(!filter.matches(&RhymeWord::new("abcd", ["d", "cd", "bcd"])));
    }

    #[test]
    fn test_match_all() {
        assert!(MatchAll.matches(&Poem::new("p1", "", "")));
        assert!(MatchAll.matches(&RhymeWord::new("dil", ["", "", ""])));
    }

    #[test]
    fn test_keyword_filter() {
        let filter = KeywordFilter::new("RAAT");
        assert!(filter.matches(&Poem::new("p1", "Judaai", "hijr ki raat")));
        assert!(!filter.matches(&Poem::new("p2", "Sehar", "subah")));
    }
}
