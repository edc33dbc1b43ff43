//! Organization precedence and project-slug construction.

use crate::{ConfigError, ProjectSlug};

/// Picks the organization a call targets.
///
/// An explicit per-call organization always wins; otherwise the client-wide
/// default is used. An empty string means "not supplied" in both positions.
///
/// # Errors
///
/// [`ConfigError::OrganizationRequired`] when both are empty. A successful
/// result is never empty.
pub fn resolve_organization<'a>(requested: &'a str, default: &'a str) -> Result<&'a str, ConfigError> {
    if !requested.is_empty() {
        return Ok(requested);
    }

    if !default.is_empty() {
        return Ok(default);
    }

    Err(ConfigError::OrganizationRequired)
}

/// Builds `<vcs>/<organization>/<project>`.
///
/// Inputs are joined verbatim: no escaping, no case folding, no validation.
pub fn build_slug(vcs: &str, organization: &str, project: &str) -> ProjectSlug {
    ProjectSlug::from_parts(vcs, organization, project)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_requested_wins_over_default() {
        for default in ["", "acme", "other"] {
            assert_eq!(resolve_organization("explicit", default).unwrap(), "explicit");
        }
    }

    #[test]
    fn test_default_used_when_requested_empty() {
        assert_eq!(resolve_organization("", "acme").unwrap(), "acme");
    }

    #[test]
    fn test_both_empty_fails() {
        let err = resolve_organization("", "").unwrap_err();
        assert!(matches!(err, ConfigError::OrganizationRequired));
        assert_eq!(err.to_string(), "organization is required");
    }

    #[test]
    fn test_build_slug_joins_verbatim() {
        assert_eq!(build_slug("github", "acme", "myproj").as_str(), "github/acme/myproj");
        assert_eq!(build_slug("gh", "Acme-Corp", "My.Proj").as_str(), "gh/Acme-Corp/My.Proj");
    }

    proptest! {
        #[test]
        fn prop_requested_organization_always_wins(requested in ".+", default in ".*") {
            let resolved = resolve_organization(&requested, &default).unwrap();
            prop_assert_eq!(resolved, requested.as_str());
        }

        #[test]
        fn prop_default_used_when_nothing_requested(default in ".+") {
            prop_assert_eq!(resolve_organization("", &default).unwrap(), default.as_str());
        }

        #[test]
        fn prop_slug_is_exact_join(vcs in ".+", organization in ".+", project in ".+") {
            let slug = build_slug(&vcs, &organization, &project);
            prop_assert_eq!(slug.as_str(), format!("{vcs}/{organization}/{project}"));
        }

        #[test]
        fn prop_slug_splits_back_into_parts(vcs in "[^/]+", organization in "[^/]+", project in "[^/]+") {
            let slug = build_slug(&vcs, &organization, &project);
            let parts: Vec<&str> = slug.as_str().split('/').collect();
            prop_assert_eq!(parts, vec![vcs.as_str(), organization.as_str(), project.as_str()]);
        }
    }
}
