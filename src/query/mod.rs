//! In-memory record filtering shared by every list and search view.
//!
//! A view turns its current UI selection into a list of [`Criterion`]s and
//! runs [`filter_records`]. Criteria are ANDed together; values such as `""`
//! or `"all"` produce no criterion at all, so an untouched filter bar returns
//! the input unchanged.

mod lookup;
mod pages;

pub use lookup::*;
pub use pages::*;

const ALL_SENTINEL: &str = "all";

/// Normalize a selector value. Returns `None` when the value means "no filter".
pub fn selector(raw: &str) -> Option<&str> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
        None
    } else {
        Some(value)
    }
}

/// A case-insensitive substring query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery(String);

impl TextQuery {
    /// Build a query from raw input; blank input is an inactive query.
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            None
        } else {
            Some(Self(needle))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, candidate: &str) -> bool {
        candidate.trim().to_lowercase().contains(&self.0)
    }

    /// True if any candidate matches. `None` candidates (unresolved lookups,
    /// missing optional fields) never match.
    pub fn matches_any<'s, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = Option<&'s str>>,
    {
        candidates.into_iter().flatten().any(|c| self.matches(c))
    }
}

/// One predicate in a filter chain.
pub struct Criterion<'a, R> {
    label: &'static str,
    test: Box<dyn Fn(&R) -> bool + 'a>,
}

impl<'a, R> Criterion<'a, R> {
    pub fn new<F>(label: &'static str, test: F) -> Self
    where
        F: Fn(&R) -> bool + 'a,
    {
        Self {
            label,
            test: Box::new(test),
        }
    }

    /// Free-text criterion. `test` receives the parsed query and decides which
    /// fields of the record to look at.
    pub fn text<F>(label: &'static str, raw: &str, test: F) -> Option<Self>
    where
        F: Fn(&R, &TextQuery) -> bool + 'a,
    {
        let query = TextQuery::parse(raw)?;
        Some(Self::new(label, move |record| test(record, &query)))
    }

    /// Exact-match criterion over one field. Both sides are trimmed and
    /// compared ASCII case-insensitively; a missing field never matches.
    pub fn exact<F>(label: &'static str, raw: &str, field: F) -> Option<Self>
    where
        F: Fn(&R) -> Option<&str> + 'a,
    {
        let wanted = selector(raw)?.to_string();
        Some(Self::new(label, move |record| {
            field(record).is_some_and(|value| value.trim().eq_ignore_ascii_case(&wanted))
        }))
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn test(&self, record: &R) -> bool {
        (self.test)(record)
    }
}

impl<R> std::fmt::Debug for Criterion<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Criterion").field("label", &self.label).finish()
    }
}

/// The AND combinator: true when the record satisfies every criterion.
pub fn matches_all<R>(record: &R, criteria: &[Criterion<'_, R>]) -> bool {
    criteria.iter().all(|c| c.test(record))
}

/// Records satisfying every criterion, in their original order.
pub fn filter_records<'r, R>(records: &'r [R], criteria: &[Criterion<'_, R>]) -> Filtered<'r, R> {
    let matching = records
        .iter()
        .filter(|record| matches_all(*record, criteria))
        .collect();
    Filtered {
        records: matching,
        total: records.len(),
    }
}

/// Result of a filter pass.
#[derive(Debug)]
pub struct Filtered<'r, R> {
    pub records: Vec<&'r R>,
    /// Size of the unfiltered input.
    pub total: usize,
}

impl<'r, R> Filtered<'r, R> {
    /// An empty result means the view shows its "no results" state.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn to_vec(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.records.iter().map(|r| (*r).clone()).collect()
    }
}
