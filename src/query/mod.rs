//! Query-string DSL for list and search endpoints.
//!
//! A [`Query`] is a flat map of parameter names to string values, assembled
//! from an ordered sequence of [`QueryElement`]s. Later elements overwrite
//! earlier ones on key collision.
//!
//! # Overview
//!
//! - [`Filter`], [`Search`], [`Ordering`], [`Expand`]: typed fragments, each
//!   contributing one parameter (`filter`, `search`, `order`, `expand`)
//! - [`Select`]: pagination, `updatedFrom`/`updatedTo`/`updatedBy` and extra
//!   parameters
//! - [`QueryElement`]: every shape the assembler accepts
//! - [`Query`] / [`QueryBuilder`]: the assembled parameter map
//!
//! # Example
//!
//! ```rust
//! use moysklad_api::query::{Expand, Filter, Ordering, Query, Select};
//!
//! let query = Query::builder()
//!     .add(Filter::new().eq("archived", false).in_("code", ["A", "B"]))
//!     .add(Ordering::new().asc("name"))
//!     .add(Expand::new(["agent"]))
//!     .add(Select::new().limit(50))
//!     .add("groupBy=product")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(query.get("filter"), Some("archived=false;code=A;code=B"));
//! assert_eq!(query.get("order"), Some("name,asc"));
//! assert_eq!(query.get("limit"), Some("50"));
//! assert_eq!(query.get("groupBy"), Some("product"));
//! ```

mod errors;
mod fragments;
mod select;

pub use errors::QueryError;
pub use fragments::{Direction, Expand, Filter, Ordering, QueryFragment, Search};
pub use select::{Select, TimeBound};

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

/// One input to query assembly.
///
/// Every typed variant assembles infallibly. [`QueryElement::Pair`] and
/// [`QueryElement::Raw`] are the loosely typed escape hatches and the only
/// sources of [`QueryError::UnsupportedElement`].
#[derive(Clone, Debug, PartialEq)]
pub enum QueryElement {
    /// Contributes `{"filter": raw}`.
    Filter(Filter),
    /// Contributes `{"search": raw}`.
    Search(Search),
    /// Contributes `{"order": raw}`.
    Ordering(Ordering),
    /// Contributes `{"expand": raw}`.
    Expand(Expand),
    /// Contributes the selection's full parameter map.
    Select(Select),
    /// Merged verbatim.
    Map(BTreeMap<String, String>),
    /// A `key=value` string, split once on the first `=`.
    Pair(String),
    /// Another assembled query, merged verbatim.
    Query(Query),
    /// An untyped JSON value: objects are merged with stringified values,
    /// strings are treated as [`QueryElement::Pair`].
    Raw(Value),
}

impl From<Filter> for QueryElement {
    fn from(filter: Filter) -> Self {
        Self::Filter(filter)
    }
}

impl From<Search> for QueryElement {
    fn from(search: Search) -> Self {
        Self::Search(search)
    }
}

impl From<Ordering> for QueryElement {
    fn from(ordering: Ordering) -> Self {
        Self::Ordering(ordering)
    }
}

impl From<Expand> for QueryElement {
    fn from(expand: Expand) -> Self {
        Self::Expand(expand)
    }
}

impl From<Select> for QueryElement {
    fn from(select: Select) -> Self {
        Self::Select(select)
    }
}

impl From<BTreeMap<String, String>> for QueryElement {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::Map(map)
    }
}

impl From<HashMap<String, String>> for QueryElement {
    fn from(map: HashMap<String, String>) -> Self {
        Self::Map(map.into_iter().collect())
    }
}

impl From<&str> for QueryElement {
    fn from(pair: &str) -> Self {
        Self::Pair(pair.to_string())
    }
}

impl From<String> for QueryElement {
    fn from(pair: String) -> Self {
        Self::Pair(pair)
    }
}

impl From<Query> for QueryElement {
    fn from(query: Query) -> Self {
        Self::Query(query)
    }
}

impl From<Value> for QueryElement {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

/// Renders a JSON value as a query parameter value.
///
/// Strings are used verbatim, `null` yields `None`, everything else is its
/// compact JSON text.
pub(crate) fn param_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn split_pair(pair: &str) -> Result<(String, String), QueryError> {
    pair.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| QueryError::UnsupportedElement {
            element: pair.to_string(),
        })
}

/// An assembled set of query parameters.
///
/// Parameters are kept sorted by name, so two queries built from the same
/// elements compare and iterate identically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    url_params: BTreeMap<String, String>,
}

impl Query {
    /// Assembles `elements` in order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedElement`] for a pair string without
    /// `=`, or a raw value that is neither an object nor such a string.
    pub fn new<I>(elements: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = QueryElement>,
    {
        let mut query = Self::default();
        for element in elements {
            query.push(element)?;
        }
        Ok(query)
    }

    /// Creates a builder that collects elements before assembling them.
    #[must_use]
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    fn push(&mut self, element: QueryElement) -> Result<(), QueryError> {
        match element {
            QueryElement::Filter(fragment) => self.insert_fragment(&fragment),
            QueryElement::Search(fragment) => self.insert_fragment(&fragment),
            QueryElement::Ordering(fragment) => self.insert_fragment(&fragment),
            QueryElement::Expand(fragment) => self.insert_fragment(&fragment),
            QueryElement::Select(select) => self.url_params.extend(select.spec()),
            QueryElement::Map(map) => self.url_params.extend(map),
            QueryElement::Pair(pair) => {
                let (key, value) = split_pair(&pair)?;
                self.url_params.insert(key, value);
            }
            QueryElement::Query(other) => self.merge(other),
            QueryElement::Raw(Value::Object(map)) => {
                for (key, value) in &map {
                    if let Some(value) = param_value(value) {
                        self.url_params.insert(key.clone(), value);
                    }
                }
            }
            QueryElement::Raw(Value::String(pair)) => {
                let (key, value) = split_pair(&pair)?;
                self.url_params.insert(key, value);
            }
            QueryElement::Raw(other) => {
                return Err(QueryError::UnsupportedElement {
                    element: other.to_string(),
                });
            }
        }
        Ok(())
    }

    fn insert_fragment(&mut self, fragment: &impl QueryFragment) {
        self.url_params
            .insert(fragment.name().to_string(), fragment.get_raw());
    }

    /// Merges `other` into this query; its values win on collision.
    pub fn merge(&mut self, other: Self) {
        self.url_params.extend(other.url_params);
    }

    /// Returns the assembled parameters.
    #[must_use]
    pub const fn url_params(&self) -> &BTreeMap<String, String> {
        &self.url_params
    }

    /// Returns one parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.url_params.get(key).map(String::as_str)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.url_params.len()
    }

    /// Returns `true` if the query has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.url_params.is_empty()
    }
}

impl From<Query> for BTreeMap<String, String> {
    fn from(query: Query) -> Self {
        query.url_params
    }
}

/// Collects [`QueryElement`]s for a [`Query`].
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    elements: Vec<QueryElement>,
}

impl QueryBuilder {
    /// Appends an element.
    #[must_use]
    pub fn add(mut self, element: impl Into<QueryElement>) -> Self {
        self.elements.push(element.into());
        self
    }

    /// Assembles the collected elements in order.
    ///
    /// # Errors
    ///
    /// See [`Query::new`].
    pub fn build(self) -> Result<Query, QueryError> {
        Query::new(self.elements)
    }
}
