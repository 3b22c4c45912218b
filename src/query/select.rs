//! Pagination, time-range and extra-parameter selection.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::time::format_time;

/// A bound of an `updatedFrom`/`updatedTo` range.
///
/// Accepts either a structured timestamp, formatted in the API's
/// second-precision wire format, or an already formatted string passed
/// through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeBound {
    /// A structured timestamp.
    DateTime(NaiveDateTime),
    /// A preformatted wire string.
    Raw(String),
}

impl TimeBound {
    /// Renders the bound in wire format.
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::DateTime(time) => format_time(time, false),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

impl From<NaiveDateTime> for TimeBound {
    fn from(time: NaiveDateTime) -> Self {
        Self::DateTime(time)
    }
}

impl From<&str> for TimeBound {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for TimeBound {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

/// Selection of a page of a list endpoint.
///
/// Renders `limit`, `offset`, and when set `updatedFrom`, `updatedTo` and
/// `updatedBy`. Additional raw parameters are applied last and override the
/// structured ones.
///
/// # Example
///
/// ```rust
/// use moysklad_api::query::Select;
///
/// let select = Select::new().limit(5000).offset(200).updated_by("admin@company");
/// let spec = select.spec();
///
/// assert_eq!(spec["limit"], "1000");
/// assert_eq!(spec["offset"], "200");
/// assert_eq!(spec["updatedBy"], "admin@company");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Select {
    limit: u32,
    offset: u32,
    updated_from: Option<TimeBound>,
    updated_to: Option<TimeBound>,
    updated_by: Option<String>,
    additional: BTreeMap<String, String>,
}

impl Default for Select {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
            updated_from: None,
            updated_to: None,
            updated_by: None,
            additional: BTreeMap::new(),
        }
    }
}

impl Select {
    /// Largest page the API returns for list endpoints.
    pub const MAX_LIST_LIMIT: u32 = 1000;

    /// Page size used when none is given.
    pub const DEFAULT_LIMIT: u32 = 100;

    /// Creates a selection of the first [`Self::DEFAULT_LIMIT`] rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size, clamped to [`Self::MAX_LIST_LIMIT`].
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.min(Self::MAX_LIST_LIMIT);
        self
    }

    /// Sets the number of rows to skip.
    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Restricts to entities updated at or after `bound`.
    #[must_use]
    pub fn updated_from(mut self, bound: impl Into<TimeBound>) -> Self {
        self.updated_from = Some(bound.into());
        self
    }

    /// Restricts to entities updated at or before `bound`.
    #[must_use]
    pub fn updated_to(mut self, bound: impl Into<TimeBound>) -> Self {
        self.updated_to = Some(bound.into());
        self
    }

    /// Restricts to entities last updated by the given employee login.
    #[must_use]
    pub fn updated_by(mut self, login: impl Into<String>) -> Self {
        self.updated_by = Some(login.into());
        self
    }

    /// Adds an arbitrary parameter. Overrides structured fields of the same
    /// name.
    #[must_use]
    pub fn additional(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional.insert(key.into(), value.into());
        self
    }

    /// Returns the effective page size.
    #[must_use]
    pub const fn get_limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of rows skipped.
    #[must_use]
    pub const fn get_offset(&self) -> u32 {
        self.offset
    }

    /// Renders the selection as query parameters.
    #[must_use]
    pub fn spec(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("limit".to_string(), self.limit.to_string());
        params.insert("offset".to_string(), self.offset.to_string());

        if let Some(from) = &self.updated_from {
            params.insert("updatedFrom".to_string(), from.to_wire());
        }
        if let Some(to) = &self.updated_to {
            params.insert("updatedTo".to_string(), to.to_wire());
        }
        if let Some(by) = &self.updated_by {
            params.insert("updatedBy".to_string(), by.clone());
        }

        params.extend(self.additional.clone());
        params
    }
}
