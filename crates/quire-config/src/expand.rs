//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Strings without `${` are returned untouched, so a bare `$` (for example
/// in a directory name) never triggers a lookup.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |var: &str| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar(var.to_owned()))
    };

    shellexpand::env_with_context(value, lookup)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: each test uses a variable name no other test touches
        unsafe {
            std::env::set_var("QUIRE_TEST_SITES", "/srv/sites");
        }
        let result = expand_env("${QUIRE_TEST_SITES}/blog", "content.sites_dir").unwrap();
        assert_eq!(result, "/srv/sites/blog");
        unsafe {
            std::env::remove_var("QUIRE_TEST_SITES");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: each test uses a variable name no other test touches
        unsafe {
            std::env::remove_var("QUIRE_TEST_UNSET_HOST");
        }
        let result = expand_env("${QUIRE_TEST_UNSET_HOST:-0.0.0.0}", "server.host").unwrap();
        assert_eq!(result, "0.0.0.0");
    }

    #[test]
    fn test_expand_unset_var_names_field() {
        // SAFETY: each test uses a variable name no other test touches
        unsafe {
            std::env::remove_var("QUIRE_TEST_MISSING");
        }
        let err = expand_env("${QUIRE_TEST_MISSING}", "server.host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("QUIRE_TEST_MISSING"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_plain_strings_untouched() {
        assert_eq!(expand_env("sites", "f").unwrap(), "sites");
        assert_eq!(expand_env("price$list", "f").unwrap(), "price$list");
    }
}
