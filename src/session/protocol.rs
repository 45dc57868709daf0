//! Protocol constants for the two task versions
//!
//! Both versions run the same block sequence. They differ in:
//! - target presentation time for the pair block (doubled in v2)
//! - whether the results file gets a header row
//! - whether round numbers (multiples of ten) are left out of the number pool
//! - instruction and credits wording

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::block::Stage;
use super::errors::{ExperimentError, Result};

/// Task version
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    V1,
    V2,
}

impl Protocol {
    pub fn label(&self) -> &'static str {
        match self {
            Protocol::V1 => "v1",
            Protocol::V2 => "v2",
        }
    }

    /// Built-in constants for this version
    pub fn config(&self) -> ProtocolConfig {
        match self {
            Protocol::V1 => ProtocolConfig {
                protocol: Protocol::V1,
                presentation_secs: 3.0,
                pair_presentation_factor: 1.0,
                target_count: 5,
                trial_count: 18,
                menu_secs: 1.5,
                get_ready_secs: 1.0,
                credits_secs: 2.0,
                write_header: false,
                exclude_round_numbers: false,
                title: "EEG Recognition Task".to_string(),
                instructions: "For each trial, press RIGHT if the presented item was shown in the list, LEFT otherwise.\n\nPress SPACE to proceed".to_string(),
                get_ready_text: "Get ready".to_string(),
                credits_text: "This concludes the experiment.".to_string(),
            },
            Protocol::V2 => ProtocolConfig {
                protocol: Protocol::V2,
                presentation_secs: 3.0,
                pair_presentation_factor: 2.0,
                target_count: 5,
                trial_count: 18,
                menu_secs: 1.5,
                get_ready_secs: 1.0,
                credits_secs: 2.0,
                write_header: true,
                exclude_round_numbers: true,
                title: "EEG Recognition Task".to_string(),
                instructions: "Memorize the items in the list.\n\nThen, for each item shown, press RIGHT if it was in the list and LEFT if it was not.\n\nPress SPACE to start".to_string(),
                get_ready_text: "Get ready".to_string(),
                credits_text: "This concludes the experiment. Thank you for participating!".to_string(),
            },
        }
    }
}

/// Every tunable of a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolConfig {
    pub protocol: Protocol,
    /// Seconds the target list stays on screen
    pub presentation_secs: f64,
    /// Multiplier applied to `presentation_secs` for the pair block
    pub pair_presentation_factor: f64,
    /// Targets memorized per block
    pub target_count: usize,
    /// Trials per block, targets included
    pub trial_count: usize,
    pub menu_secs: f64,
    pub get_ready_secs: f64,
    pub credits_secs: f64,
    /// Write the CSV header when the results file is new
    pub write_header: bool,
    /// Leave 10, 20, ... 90 out of the number pool
    pub exclude_round_numbers: bool,
    pub title: String,
    pub instructions: String,
    pub get_ready_text: String,
    pub credits_text: String,
}

impl ProtocolConfig {
    /// How long the targets of `stage` are shown
    pub fn presentation_time(&self, stage: Stage) -> Duration {
        let secs = match stage {
            Stage::Pair => self.presentation_secs * self.pair_presentation_factor,
            _ => self.presentation_secs,
        };
        secs_to_duration(secs)
    }

    pub fn menu_time(&self) -> Duration {
        secs_to_duration(self.menu_secs)
    }

    pub fn get_ready_time(&self) -> Duration {
        secs_to_duration(self.get_ready_secs)
    }

    pub fn credits_time(&self) -> Duration {
        secs_to_duration(self.credits_secs)
    }

    /// Distractors drawn per block
    pub fn distractor_count(&self) -> usize {
        self.trial_count.saturating_sub(self.target_count)
    }

    /// Check counts and timings before any pool is sampled
    pub fn validate(&self) -> Result<()> {
        if self.target_count > self.trial_count {
            return Err(ExperimentError::InvalidBlockSize {
                targets: self.target_count,
                trials: self.trial_count,
            });
        }

        let timings = [
            ("presentation_secs", self.presentation_secs),
            (
                "pair presentation time",
                self.presentation_secs * self.pair_presentation_factor,
            ),
            ("menu_secs", self.menu_secs),
            ("get_ready_secs", self.get_ready_secs),
            ("credits_secs", self.credits_secs),
        ];
        for (field, secs) in timings {
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(ExperimentError::InvalidDuration { field, secs });
            }
        }
        Ok(())
    }

    /// Load overrides for `base` from a JSON file, creating the file with the
    /// defaults if it does not exist yet.
    ///
    /// The file may name any subset of fields; the rest come from `base`.
    pub fn load_or_init(path: &Path, base: Protocol) -> Result<Self> {
        let defaults = base.config();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let serialized = serde_json::to_string_pretty(&defaults).map_err(|source| {
                ExperimentError::Config {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            fs::write(path, serialized)?;
            tracing::info!(path = %path.display(), "wrote default protocol config");
            return Ok(defaults);
        }

        let contents = fs::read_to_string(path)?;
        let config =
            Self::from_overrides(&contents, defaults).map_err(|source| ExperimentError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Merge a JSON object of overrides onto `defaults`
    fn from_overrides(json: &str, defaults: ProtocolConfig) -> serde_json::Result<Self> {
        let serde_json::Value::Object(fields) = serde_json::from_str::<serde_json::Value>(json)? else {
            return Err(serde::de::Error::custom(
                "protocol overrides must be a JSON object",
            ));
        };
        let mut merged = serde_json::to_value(defaults)?;

        if let Some(target) = merged.as_object_mut() {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }

        serde_json::from_value(merged)
    }
}

/// Negative or NaN clamps to zero, overflow to `Duration::MAX`; `validate`
/// rejects both before a session starts.
fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_presentation_doubled_only_in_v2() {
        let v1 = Protocol::V1.config();
        let v2 = Protocol::V2.config();

        assert_eq!(v1.presentation_time(Stage::Pair), Duration::from_secs(3));
        assert_eq!(v2.presentation_time(Stage::Word), Duration::from_secs(3));
        assert_eq!(v2.presentation_time(Stage::Number), Duration::from_secs(3));
        assert_eq!(v2.presentation_time(Stage::Pair), Duration::from_secs(6));
    }

    #[test]
    fn test_header_and_filter_differ_between_versions() {
        assert!(!Protocol::V1.config().write_header);
        assert!(Protocol::V2.config().write_header);
        assert!(!Protocol::V1.config().exclude_round_numbers);
        assert!(Protocol::V2.config().exclude_round_numbers);
    }

    #[test]
    fn test_distractor_count() {
        let config = Protocol::V1.config();
        assert_eq!(config.distractor_count(), 13);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_more_targets_than_trials() {
        let mut config = Protocol::V2.config();
        config.target_count = 20;
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::InvalidBlockSize { targets: 20, trials: 18 })
        ));
    }

    #[test]
    fn test_partial_overrides_keep_defaults() {
        let config = ProtocolConfig::from_overrides(
            r#"{"presentation_secs": 4.5, "trial_count": 20}"#,
            Protocol::V2.config(),
        )
        .unwrap();

        assert_eq!(config.presentation_secs, 4.5);
        assert_eq!(config.trial_count, 20);
        assert_eq!(config.target_count, 5);
        assert!(config.write_header);
        assert_eq!(config.presentation_time(Stage::Pair), Duration::from_secs(9));
    }

    #[test]
    fn test_overrides_must_be_an_object() {
        for json in ["[1, 2, 3]", "\"x\"", "5", "null"] {
            let result = ProtocolConfig::from_overrides(json, Protocol::V2.config());
            assert!(result.is_err(), "{} was accepted", json);
        }
    }

    #[test]
    fn test_unknown_override_key_rejected() {
        let result = ProtocolConfig::from_overrides(
            r#"{"presentation_sec": 10}"#,
            Protocol::V2.config(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_unusable_timings() {
        let mut config = Protocol::V1.config();
        config.presentation_secs = 1e300;
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::InvalidDuration { field: "presentation_secs", .. })
        ));
        // Must not panic even when not validated
        assert_eq!(config.presentation_time(Stage::Word), Duration::MAX);

        let mut config = Protocol::V2.config();
        config.presentation_secs = 1e200;
        config.pair_presentation_factor = 1e200;
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::InvalidDuration { .. })
        ));

        let mut config = Protocol::V2.config();
        config.credits_secs = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::InvalidDuration { field: "credits_secs", .. })
        ));
    }

    #[test]
    fn test_load_or_init_rejects_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("protocol.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = ProtocolConfig::load_or_init(&path, Protocol::V2).unwrap_err();
        assert!(matches!(err, ExperimentError::Config { .. }));
    }

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("protocol.json");

        let created = ProtocolConfig::load_or_init(&path, Protocol::V1).unwrap();
        assert_eq!(created, Protocol::V1.config());
        assert!(path.exists());

        let reloaded = ProtocolConfig::load_or_init(&path, Protocol::V1).unwrap();
        assert_eq!(reloaded, created);
    }

    #[test]
    fn test_load_or_init_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("protocol.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ProtocolConfig::load_or_init(&path, Protocol::V2).unwrap_err();
        assert!(matches!(err, ExperimentError::Config { .. }));
    }
}
