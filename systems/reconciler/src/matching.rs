//! Strategies that pair a canonical player name with a sidebar row.

/// Length thresholds tuning the lenient matching strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchThresholds {
    long_name_len: usize,
    short_name_min_len: usize,
    short_name_slack: usize,
    suffix_len: usize,
}

impl MatchThresholds {
    /// Creates thresholds for the containment and suffix strategies.
    ///
    /// Containment always accepts canonical names of at least `long_name_len`
    /// characters. Shorter names need at least `short_name_min_len` characters and
    /// a sidebar name at most `short_name_slack` characters longer. The suffix
    /// strategy compares the last `suffix_len` characters.
    #[must_use]
    pub const fn new(
        long_name_len: usize,
        short_name_min_len: usize,
        short_name_slack: usize,
        suffix_len: usize,
    ) -> Self {
        Self {
            long_name_len,
            short_name_min_len,
            short_name_slack,
            suffix_len,
        }
    }

    /// Canonical length from which containment needs no length check.
    #[must_use]
    pub const fn long_name_len(&self) -> usize {
        self.long_name_len
    }

    /// Minimum canonical length for short name containment.
    #[must_use]
    pub const fn short_name_min_len(&self) -> usize {
        self.short_name_min_len
    }

    /// Extra characters a sidebar name may carry around a short canonical name.
    #[must_use]
    pub const fn short_name_slack(&self) -> usize {
        self.short_name_slack
    }

    /// Number of trailing characters compared by the suffix strategy.
    #[must_use]
    pub const fn suffix_len(&self) -> usize {
        self.suffix_len
    }
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self::new(10, 4, 5, 10)
    }
}

/// A single name matching strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameMatcher {
    /// Identical strings.
    Exact,
    /// Identical ignoring case.
    CaseInsensitive,
    /// Sidebar name is the canonical name behind a prefix such as a rank tag.
    EndsWith,
    /// Sidebar name begins with the canonical name.
    StartsWith,
    /// Sidebar name contains the canonical name, guarded by length thresholds.
    Contains,
    /// Sidebar name ends with the tail of a long canonical name.
    SuffixTail,
}

/// Strategies in the order they are attempted.
pub const MATCH_CASCADE: [NameMatcher; 6] = [
    NameMatcher::Exact,
    NameMatcher::CaseInsensitive,
    NameMatcher::EndsWith,
    NameMatcher::StartsWith,
    NameMatcher::Contains,
    NameMatcher::SuffixTail,
];

impl NameMatcher {
    /// Index of the first candidate this strategy accepts for `canonical`.
    #[must_use]
    pub fn find<S>(self, canonical: &str, candidates: &[S], thresholds: &MatchThresholds) -> Option<usize>
    where
        S: AsRef<str>,
    {
        let canonical_lower = canonical.to_lowercase();
        let canonical_len = canonical_lower.chars().count();

        candidates.iter().position(|candidate| {
            let candidate = candidate.as_ref();
            let candidate_lower = candidate.to_lowercase();
            let candidate_len = candidate_lower.chars().count();
            match self {
                NameMatcher::Exact => candidate == canonical,
                NameMatcher::CaseInsensitive => candidate_lower == canonical_lower,
                NameMatcher::EndsWith => {
                    candidate_len > canonical_len && candidate_lower.ends_with(&canonical_lower)
                }
                NameMatcher::StartsWith => candidate_lower.starts_with(&canonical_lower),
                NameMatcher::Contains => {
                    let long_enough = canonical_len >= thresholds.long_name_len;
                    let short_but_close = canonical_len >= thresholds.short_name_min_len
                        && candidate_len <= canonical_len + thresholds.short_name_slack;
                    (long_enough || short_but_close) && candidate_lower.contains(&canonical_lower)
                }
                NameMatcher::SuffixTail => {
                    if canonical_len < thresholds.suffix_len || thresholds.suffix_len == 0 {
                        return false;
                    }
                    let tail: String = canonical_lower
                        .chars()
                        .skip(canonical_len - thresholds.suffix_len)
                        .collect();
                    candidate_lower.ends_with(&tail)
                }
            }
        })
    }
}

/// Runs the cascade and returns the first strategy that matched with its candidate index.
///
/// When several candidates satisfy the same strategy the earliest one wins.
#[must_use]
pub fn find_match<S>(
    canonical: &str,
    candidates: &[S],
    thresholds: &MatchThresholds,
) -> Option<(NameMatcher, usize)>
where
    S: AsRef<str>,
{
    MATCH_CASCADE.iter().find_map(|matcher| {
        matcher
            .find(canonical, candidates, thresholds)
            .map(|index| (*matcher, index))
    })
}
