//! Wire models for the context endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A context as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Service-assigned identifier (UUID).
    pub id: String,
    /// Name, unique per owner.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// An environment variable stored in a context.
///
/// The API never returns variable values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    /// Variable name.
    pub variable: String,
    /// Owning context.
    pub context_id: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Token for the next page; absent or empty on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewContext<'a> {
    pub name: &'a str,
    pub owner: NewContextOwner<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewContextOwner<'a> {
    pub slug: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VariableValue<'a> {
    pub value: &'a str,
}
