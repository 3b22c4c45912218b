//! Typed query-string fragments: [`Filter`], [`Search`], [`Ordering`] and
//! [`Expand`].
//!
//! Each fragment accumulates clauses through by-value builder calls and
//! renders them into the API's wire syntax with
//! [`QueryFragment::get_raw`]. Its parameter key is [`QueryFragment::name`].

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::ops::Add;

/// A typed piece of a request's query string.
pub trait QueryFragment {
    /// The query parameter key this fragment renders into.
    fn name(&self) -> &'static str;

    /// Renders all accumulated clauses in wire syntax.
    fn get_raw(&self) -> String;

    /// Returns the accumulated clauses in insertion order.
    fn clauses(&self) -> &[String];
}

/// Keeps the first occurrence of every clause, preserving order.
fn dedup(clauses: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    clauses
        .iter()
        .map(String::as_str)
        .filter(|clause| seen.insert(*clause))
        .collect()
}

/// Builder for the `filter` parameter.
///
/// Clauses are AND-ed by the API and joined with `;`. Duplicate clauses are
/// rendered once.
///
/// # Example
///
/// ```rust
/// use moysklad_api::query::{Filter, QueryFragment};
///
/// let filter = Filter::new()
///     .eq("archived", false)
///     .like("name", "chair")
///     .in_("code", ["a1", "a2"]);
///
/// assert_eq!(filter.get_raw(), "archived=false;name~chair;code=a1;code=a2");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<String>,
}

impl Filter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, clause: String) -> Self {
        self.clauses.push(clause);
        self
    }

    /// `field=value`
    #[must_use]
    pub fn eq(self, field: impl Display, value: impl Display) -> Self {
        self.push(format!("{field}={value}"))
    }

    /// `field!=value`
    #[must_use]
    pub fn neq(self, field: impl Display, value: impl Display) -> Self {
        self.push(format!("{field}!={value}"))
    }

    /// `field>value`
    #[must_use]
    pub fn gt(self, field: impl Display, value: impl Display) -> Self {
        self.push(format!("{field}>{value}"))
    }

    /// `field<value`
    #[must_use]
    pub fn lt(self, field: impl Display, value: impl Display) -> Self {
        self.push(format!("{field}<{value}"))
    }

    /// `field>=value`
    #[must_use]
    pub fn gte(self, field: impl Display, value: impl Display) -> Self {
        self.push(format!("{field}>={value}"))
    }

    /// `field<=value`
    #[must_use]
    pub fn lte(self, field: impl Display, value: impl Display) -> Self {
        self.push(format!("{field}<={value}"))
    }

    /// Substring match: `field~value`
    #[must_use]
    pub fn like(self, field: impl Display, value: impl Display) -> Self {
        self.push(format!("{field}~{value}"))
    }

    /// Starts-with match: `field~=value`
    #[must_use]
    pub fn st(self, field: impl Display, value: impl Display) -> Self {
        self.push(format!("{field}~={value}"))
    }

    /// Ends-with match: `field=~value`
    #[must_use]
    pub fn et(self, field: impl Display, value: impl Display) -> Self {
        self.push(format!("{field}=~{value}"))
    }

    /// Matches any of `values`: `field=a;field=b`.
    ///
    /// The API treats repeated equality on one field as an OR-group. No
    /// clause is added when `values` is empty.
    #[must_use]
    pub fn in_<I, V>(self, field: impl Display, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let clause = values
            .into_iter()
            .map(|value| format!("{field}={value}"))
            .collect::<Vec<_>>()
            .join(";");
        if clause.is_empty() {
            return self;
        }
        self.push(clause)
    }

    /// Matches none of `values`: `field!=a;field!=b`.
    #[must_use]
    pub fn nin<I, V>(self, field: impl Display, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let clause = values
            .into_iter()
            .map(|value| format!("{field}!={value}"))
            .collect::<Vec<_>>()
            .join(";");
        if clause.is_empty() {
            return self;
        }
        self.push(clause)
    }

    /// Presence check: `field!=` when `exists`, `field=` otherwise.
    #[must_use]
    pub fn exists(self, field: impl Display, exists: bool) -> Self {
        let operator = if exists { "!=" } else { "=" };
        self.push(format!("{field}{operator}"))
    }

    /// Returns the clauses present in exactly one of `self` and `other`.
    ///
    /// This is a symmetric difference, not a union: a clause present in both
    /// filters is removed. Clauses unique to `self` come first, then those
    /// unique to `other`, each in insertion order.
    ///
    /// ```rust
    /// use moysklad_api::query::{Filter, QueryFragment};
    ///
    /// let archived = Filter::new().eq("archived", true);
    /// let toggled = archived.clone() + Filter::new().eq("archived", true).eq("shared", true);
    ///
    /// assert_eq!(toggled.get_raw(), "shared=true");
    /// ```
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        let ours: HashSet<&str> = self.clauses.iter().map(String::as_str).collect();
        let theirs: HashSet<&str> = other.clauses.iter().map(String::as_str).collect();

        let left = dedup(&self.clauses)
            .into_iter()
            .filter(|clause| !theirs.contains(clause));
        let right = dedup(&other.clauses)
            .into_iter()
            .filter(|clause| !ours.contains(clause));

        Self {
            clauses: left.chain(right).map(str::to_string).collect(),
        }
    }

    /// Returns `true` if no clauses were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl Add for Filter {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.symmetric_difference(&other)
    }
}

impl QueryFragment for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn get_raw(&self) -> String {
        dedup(&self.clauses).join(";")
    }

    fn clauses(&self) -> &[String] {
        &self.clauses
    }
}

/// Free-text context search (`search` parameter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Search {
    clauses: Vec<String>,
}

impl Search {
    /// Creates a search for `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            clauses: vec![text.into()],
        }
    }
}

impl QueryFragment for Search {
    fn name(&self) -> &'static str {
        "search"
    }

    fn get_raw(&self) -> String {
        self.clauses.first().cloned().unwrap_or_default()
    }

    fn clauses(&self) -> &[String] {
        &self.clauses
    }
}

/// Sort direction for [`Ordering`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Builder for the `order` parameter.
///
/// ```rust
/// use moysklad_api::query::{Ordering, QueryFragment};
///
/// let order = Ordering::new().asc("name").desc("id");
/// assert_eq!(order.get_raw(), "name,asc;id,desc");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ordering {
    clauses: Vec<String>,
}

impl Ordering {
    /// Creates an empty ordering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts by `field` in `direction`.
    #[must_use]
    pub fn by(mut self, field: impl Display, direction: Direction) -> Self {
        self.clauses.push(format!("{field},{direction}"));
        self
    }

    /// Sorts by `field` ascending.
    #[must_use]
    pub fn asc(self, field: impl Display) -> Self {
        self.by(field, Direction::Asc)
    }

    /// Sorts by `field` descending.
    #[must_use]
    pub fn desc(self, field: impl Display) -> Self {
        self.by(field, Direction::Desc)
    }
}

impl QueryFragment for Ordering {
    fn name(&self) -> &'static str {
        "order"
    }

    fn get_raw(&self) -> String {
        dedup(&self.clauses).join(";")
    }

    fn clauses(&self) -> &[String] {
        &self.clauses
    }
}

/// Nested entity expansion (`expand` parameter).
///
/// Paths nested deeper than [`Expand::MAX_DEPTH`] levels are dropped, since
/// the API refuses to expand them.
///
/// ```rust
/// use moysklad_api::query::{Expand, QueryFragment};
///
/// let expand = Expand::new(["agent", "positions.assortment", "a.b.c.d"]);
/// assert_eq!(expand.get_raw(), "agent,positions.assortment");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expand {
    clauses: Vec<String>,
}

impl Expand {
    /// Maximum number of dot-separated segments in one expand path.
    pub const MAX_DEPTH: usize = 3;

    /// Creates an expansion of `paths`.
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        paths
            .into_iter()
            .fold(Self::default(), |expand, path| expand.with(path))
    }

    /// Adds one more path.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if path.split('.').count() <= Self::MAX_DEPTH {
            self.clauses.push(path);
        } else {
            tracing::debug!("Dropping expand path {path} deeper than {} levels", Self::MAX_DEPTH);
        }
        self
    }
}

impl QueryFragment for Expand {
    fn name(&self) -> &'static str {
        "expand"
    }

    fn get_raw(&self) -> String {
        self.clauses.join(",")
    }

    fn clauses(&self) -> &[String] {
        &self.clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_comparison_operators() {
        let filter = Filter::new()
            .eq("a", 1)
            .neq("b", 2)
            .gt("c", 3)
            .lt("d", 4)
            .gte("e", 5)
            .lte("f", 6);

        assert_eq!(filter.get_raw(), "a=1;b!=2;c>3;d<4;e>=5;f<=6");
        assert_eq!(filter.name(), "filter");
    }

    #[test]
    fn test_filter_text_operators() {
        let filter = Filter::new()
            .like("name", "tab")
            .st("code", "AB")
            .et("article", "-01");

        assert_eq!(filter.get_raw(), "name~tab;code~=AB;article=~-01");
    }

    #[test]
    fn test_filter_in_renders_equality_chain() {
        let filter = Filter::new().in_("id", ["a", "b"]);
        assert_eq!(filter.get_raw(), "id=a;id=b");
    }

    #[test]
    fn test_filter_nin_renders_inequality_chain() {
        let filter = Filter::new().nin("id", vec![1, 2, 3]);
        assert_eq!(filter.get_raw(), "id!=1;id!=2;id!=3");
    }

    #[test]
    fn test_filter_empty_value_set_adds_no_clause() {
        let filter = Filter::new()
            .eq("a", 1)
            .in_("id", Vec::<&str>::new())
            .nin("code", Vec::<u32>::new());

        assert_eq!(filter.get_raw(), "a=1");
        assert_eq!(filter.clauses().len(), 1);
    }

    #[test]
    fn test_filter_exists() {
        assert_eq!(Filter::new().exists("field", true).get_raw(), "field!=");
        assert_eq!(Filter::new().exists("field", false).get_raw(), "field=");
    }

    #[test]
    fn test_filter_deduplicates_clauses_keeping_first_position() {
        let filter = Filter::new().eq("a", 1).eq("b", 2).eq("a", 1);

        assert_eq!(filter.get_raw(), "a=1;b=2");
        assert_eq!(filter.clauses().len(), 3);
    }

    #[test]
    fn test_filter_add_is_symmetric_difference() {
        let left = Filter::new().eq("a", 1).eq("shared", 0);
        let right = Filter::new().eq("shared", 0).eq("b", 2);

        let combined = left + right;
        assert_eq!(combined.get_raw(), "a=1;b=2");
    }

    #[test]
    fn test_filter_add_with_itself_is_empty() {
        let filter = Filter::new().eq("a", 1).exists("b", true);
        let combined = filter.clone() + filter;

        assert!(combined.is_empty());
        assert_eq!(combined.get_raw(), "");
    }

    #[test]
    fn test_filter_add_with_empty_keeps_clauses() {
        let filter = Filter::new().eq("a", 1).eq("a", 1);
        let combined = filter + Filter::new();

        assert_eq!(combined.clauses(), ["a=1".to_string()]);
    }

    #[test]
    fn test_filter_builder_copies_are_independent() {
        let base = Filter::new().eq("a", 1);
        let extended = base.clone().eq("b", 2);

        assert_eq!(base.get_raw(), "a=1");
        assert_eq!(extended.get_raw(), "a=1;b=2");
    }

    #[test]
    fn test_search_returns_text_verbatim() {
        let search = Search::new("red chair; 42");
        assert_eq!(search.get_raw(), "red chair; 42");
        assert_eq!(search.name(), "search");
    }

    #[test]
    fn test_ordering_renders_directions() {
        let order = Ordering::new().asc("name").desc("id");
        assert_eq!(order.get_raw(), "name,asc;id,desc");
        assert_eq!(order.name(), "order");
    }

    #[test]
    fn test_ordering_deduplicates() {
        let order = Ordering::new().asc("name").asc("name").desc("name");
        assert_eq!(order.get_raw(), "name,asc;name,desc");
    }

    #[test]
    fn test_expand_drops_paths_deeper_than_three_levels() {
        let expand = Expand::new(["a.b", "a.b.c.d"]);
        assert_eq!(expand.clauses(), ["a.b".to_string()]);
        assert_eq!(expand.get_raw(), "a.b");
    }

    #[test]
    fn test_expand_keeps_three_level_paths_unchanged() {
        let expand = Expand::new(["agent", "positions.assortment.product"]).with("state");
        assert_eq!(
            expand.get_raw(),
            "agent,positions.assortment.product,state"
        );
        assert_eq!(expand.name(), "expand");
    }
}
