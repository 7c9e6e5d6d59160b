// ABOUTME: Config values given literally or read from the environment.
// ABOUTME: Lets the tunnel id live outside the config file.

use crate::error::{Error, Result};
use serde::Deserialize;

/// A string setting that is either written inline or named by variable.
///
/// ```yaml
/// id: 6ff42ae2-765d-4adf-8112-31c55c1551ef
/// # or
/// id:
///   env: CLOUDFLARE_TUNNEL_ID
///   default: media-tunnel
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// The value with surrounding whitespace removed.
    ///
    /// A variable that is set but blank counts as unset, so the default
    /// applies and `Error::MissingEnvVar` is raised without one.
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.trim().to_string()),
            EnvValue::FromEnv { var, default } => std::env::var(var)
                .ok()
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
                .or_else(|| default.as_deref().map(|d| d.trim().to_string()))
                .ok_or_else(|| Error::MissingEnvVar(var.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAR: &str = "MEDIASTACK_ENV_VALUE_UNIT";

    fn from_env(default: Option<&str>) -> EnvValue {
        EnvValue::FromEnv {
            var: VAR.to_string(),
            default: default.map(str::to_string),
        }
    }

    #[test]
    fn literal_is_trimmed() {
        let value = EnvValue::Literal("  media-tunnel \n".to_string());
        assert_eq!(value.resolve().unwrap(), "media-tunnel");
    }

    #[test]
    fn set_variable_wins_over_default() {
        temp_env::with_var(VAR, Some(" abc123 "), || {
            assert_eq!(from_env(Some("fallback")).resolve().unwrap(), "abc123");
        });
    }

    #[test]
    fn blank_variable_falls_back_to_default() {
        temp_env::with_var(VAR, Some("   "), || {
            assert_eq!(from_env(Some("fallback")).resolve().unwrap(), "fallback");
        });
    }

    #[test]
    fn blank_variable_without_default_is_missing() {
        temp_env::with_var(VAR, Some(""), || {
            let err = from_env(None).resolve().unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar(ref var) if var == VAR));
        });
    }

    #[test]
    fn deserializes_both_shapes() {
        let literal: EnvValue = serde_yaml::from_str("some-id").unwrap();
        assert_eq!(literal, EnvValue::Literal("some-id".to_string()));

        let env: EnvValue = serde_yaml::from_str("env: TUNNEL\ndefault: x").unwrap();
        assert_eq!(
            env,
            EnvValue::FromEnv {
                var: "TUNNEL".to_string(),
                default: Some("x".to_string()),
            }
        );
    }
}
