use serde_json::{Map, Value};

/// Items per page requested when the caller does not say otherwise.
/// The API caps this at 100.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// A single advisory as returned by the API. Records are passed through
/// without interpreting, validating, or transforming any field.
pub type Advisory = Map<String, Value>;

/// Server-side filters for the global advisory listing.
///
/// Unset fields are omitted from the outgoing query string entirely rather
/// than sent as empty values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryFilter {
    /// Ecosystem filter (e.g. npm, pip, rubygems).
    pub ecosystem: Option<String>,
    /// Severity filter (e.g. low, medium, high, critical).
    pub severity: Option<String>,
    /// Maps to the API's `type` parameter (reviewed, unreviewed, malware).
    pub advisory_type: Option<String>,
    /// Items per page.
    pub per_page: u32,
}

impl Default for AdvisoryFilter {
    fn default() -> Self {
        Self {
            ecosystem: None,
            severity: None,
            advisory_type: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}
