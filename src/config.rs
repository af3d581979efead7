use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::risk::{Comparison, Metric};

pub const GRATITUDE_TIP: &str = "Write 3 things you're grateful for. It improves mood by 25%.";
pub const SCREEN_TIP: &str = "Take a screen detox break for 1 hour. Try nature or walking.";
pub const SLEEP_TIP: &str = "Aim for 7-8 hours of sleep. Avoid screens before bed.";
pub const SOCIAL_TIP: &str = "Call or meet a friend today. Connection helps.";
pub const JOURNALING_TIP: &str =
    "Try writing a few lines about your day. Journaling helps you process emotions.";
pub const DEFAULT_TIP: &str = "You're doing well. Stay consistent with self-care!";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipRule {
    pub metric: Metric,
    pub comparison: Comparison,
    pub threshold: f64,
    pub tip: String,
}

impl TipRule {
    fn new(metric: Metric, comparison: Comparison, threshold: f64, tip: &str) -> Self {
        Self {
            metric,
            comparison,
            threshold,
            tip: tip.to_string(),
        }
    }
}

/// Ordered tip rules. Earlier rules take priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipProfile {
    pub name: String,
    pub rules: Vec<TipRule>,
    #[serde(default = "default_tip")]
    pub default_tip: String,
}

fn default_tip() -> String {
    DEFAULT_TIP.to_string()
}

impl TipProfile {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let profile: TipProfile = toml::from_str(input).context("invalid tip profile")?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tip profile {}", path.display()))?;
        let profile = Self::from_toml_str(&input)
            .with_context(|| format!("failed to load tip profile {}", path.display()))?;
        tracing::info!(profile = %profile.name, rules = profile.rules.len(), "Loaded tip profile");
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.rules.is_empty() {
            return Err(EngineError::EmptyProfile(self.name.clone()));
        }
        Ok(())
    }
}

/// Built-in tip profiles. The check-in form and its two siblings disagree on
/// the screen and sleep thresholds and on whether journaling gets a tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProfilePreset {
    /// screen > 8h, sleep < 5h
    #[default]
    Checkin,
    /// screen > 6h, sleep < 6h
    Strict,
    /// strict thresholds plus a journaling tip
    Journal,
}

impl ProfilePreset {
    pub fn profile(&self) -> TipProfile {
        let (name, screen, sleep) = match self {
            ProfilePreset::Checkin => ("checkin", 8.0, 5.0),
            ProfilePreset::Strict => ("strict", 6.0, 6.0),
            ProfilePreset::Journal => ("journal", 6.0, 6.0),
        };

        let mut rules = vec![
            TipRule::new(Metric::Mood, Comparison::AtMost, 4.0, GRATITUDE_TIP),
            TipRule::new(Metric::ScreenHours, Comparison::Above, screen, SCREEN_TIP),
            TipRule::new(Metric::SleepHours, Comparison::Below, sleep, SLEEP_TIP),
            TipRule::new(Metric::SocialInteractions, Comparison::Below, 2.0, SOCIAL_TIP),
        ];
        if *self == ProfilePreset::Journal {
            rules.push(TipRule::new(
                Metric::JournalingDays,
                Comparison::Below,
                2.0,
                JOURNALING_TIP,
            ));
        }

        TipProfile {
            name: name.to_string(),
            rules,
            default_tip: default_tip(),
        }
    }
}
