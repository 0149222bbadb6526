use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::session::DEFAULT_MAX_TURNS;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
/// A session must retain at least one user/assistant pair.
pub const MIN_MAX_TURNS: usize = 2;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ModelParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

/// Overrides supplied on the command line. Highest precedence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub max_turns: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Overrides read from the environment. Beats the built-in defaults only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnvOverrides {
    pub model: Option<String>,
    pub max_turns: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            model: std::env::var("HR_ASSISTANT_MODEL").ok(),
            max_turns: std::env::var("HR_ASSISTANT_MAX_TURNS")
                .ok()
                .and_then(|v| v.parse().ok()),
            timeout_secs: std::env::var("HR_ASSISTANT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub params: ModelParams,
    pub max_turns: usize,
    pub timeout_secs: u64,
}

impl GenerationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            params: ModelParams {
                temperature: Some(DEFAULT_TEMPERATURE),
                max_tokens: None,
                top_p: None,
            },
            max_turns: DEFAULT_MAX_TURNS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

pub fn resolve_generation_settings(cli: &CliOverrides, env: &EnvOverrides) -> GenerationSettings {
    let defaults = GenerationSettings::default();
    GenerationSettings {
        model: cli
            .model
            .clone()
            .or_else(|| env.model.clone())
            .unwrap_or(defaults.model),
        params: defaults.params,
        max_turns: cli
            .max_turns
            .or(env.max_turns)
            .unwrap_or(defaults.max_turns)
            .max(MIN_MAX_TURNS),
        timeout_secs: cli
            .timeout_secs
            .or(env.timeout_secs)
            .unwrap_or(defaults.timeout_secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_cli_over_env_over_default() {
        let cli = CliOverrides {
            model: Some("cli-model".into()),
            max_turns: None,
            timeout_secs: Some(5),
        };
        let env = EnvOverrides {
            model: Some("env-model".into()),
            max_turns: Some(30),
            timeout_secs: Some(120),
        };

        let eff = resolve_generation_settings(&cli, &env);

        assert_eq!(eff.model, "cli-model");
        assert_eq!(eff.max_turns, 30); // from env
        assert_eq!(eff.timeout_secs, 5); // from cli
    }

    #[test]
    fn max_turns_is_floored_at_one_pair() {
        let cli = CliOverrides {
            max_turns: Some(0),
            ..CliOverrides::default()
        };
        let eff = resolve_generation_settings(&cli, &EnvOverrides::default());
        assert_eq!(eff.max_turns, MIN_MAX_TURNS);

        let env = EnvOverrides {
            max_turns: Some(1),
            ..EnvOverrides::default()
        };
        let eff = resolve_generation_settings(&CliOverrides::default(), &env);
        assert_eq!(eff.max_turns, MIN_MAX_TURNS);
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let eff = resolve_generation_settings(&CliOverrides::default(), &EnvOverrides::default());
        assert_eq!(eff.model, DEFAULT_MODEL);
        assert_eq!(eff.max_turns, DEFAULT_MAX_TURNS);
        assert_eq!(eff.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(eff.params.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(eff.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
