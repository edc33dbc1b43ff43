//! Core domain for the CircleCI provider request layer.
//!
//! This crate contains the configuration model, the routing identifiers, the
//! organization-resolution policy, and the error types shared by every crate
//! that talks to the CircleCI API. Infrastructure crates (`transport`, `rest`,
//! `contexts`) produce the errors defined here; resource handlers consume them.
//!
//! ## Architectural Layer
//!
//! **Business logic.** This crate has no I/O dependencies. Everything in it is
//! a pure, deterministic function of its inputs.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `ClientConfig` and the parsed `ServiceUrl` |
//! | [`identifiers`] | Newtype slugs (`ProjectSlug`, `OwnerSlug`) |
//! | [`resolve`] | Organization precedence and slug building |
//! | [`errors`] | `ConfigError`, `HttpError`, and the not-found classifier |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod resolve;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{ClientConfig, ServiceUrl, DEFAULT_URL, DEFAULT_VCS};
pub use errors::{is_not_found, is_not_found_result, ConfigError, HttpError};
pub use identifiers::{OwnerSlug, ProjectSlug};
pub use resolve::{build_slug, resolve_organization};
