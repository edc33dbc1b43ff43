//! Newtype routing identifiers.
//!
//! CircleCI addresses projects and context owners with `/`-joined slugs. Both
//! are plain strings on the wire; wrapping them keeps a project slug from being
//! passed where an owner slug is expected.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Addresses a project as `<vcs>/<organization>/<project>`
    /// (e.g. `"github/acme/widgets"`).
    ///
    /// Segments are joined verbatim; no escaping or charset validation is
    /// applied.
    ProjectSlug
}

string_id! {
    /// Addresses the owner of an organization-scoped resource as
    /// `<vcs>/<organization>` (e.g. `"github/acme"`).
    OwnerSlug
}

impl ProjectSlug {
    /// Joins the three segments with `/`.
    pub fn from_parts(vcs: &str, organization: &str, project: &str) -> Self {
        Self(format!("{vcs}/{organization}/{project}"))
    }
}

impl OwnerSlug {
    /// Joins the two segments with `/`.
    pub fn from_parts(vcs: &str, organization: &str) -> Self {
        Self(format!("{vcs}/{organization}"))
    }
}
