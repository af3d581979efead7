use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One wellness check-in. Passive metrics (sleep, screen, steps, typing) are
/// inferred from devices; active metrics are self-reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WellnessSample {
    pub sleep_hours: f64,
    pub screen_hours: f64,
    pub steps: u32,
    pub typing_wpm: u32,
    pub mood: u32,
    pub journaling_days: u32,
    pub voice_logs: u32,
    pub social_interactions: u32,
}

impl WellnessSample {
    pub fn validate(&self) -> Result<(), EngineError> {
        check_hours("sleep_hours", self.sleep_hours, 12.0)?;
        check_hours("screen_hours", self.screen_hours, 15.0)?;
        check_count("typing_wpm", self.typing_wpm, 0, 100)?;
        check_count("mood", self.mood, 1, 10)?;
        check_count("journaling_days", self.journaling_days, 0, 7)?;
        check_count("voice_logs", self.voice_logs, 0, 7)?;
        check_count("social_interactions", self.social_interactions, 0, 20)?;
        Ok(())
    }
}

fn check_hours(field: &'static str, value: f64, max: f64) -> Result<(), EngineError> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::Validation {
            field,
            value: value.to_string(),
            range: format!("0-{max}"),
        })
    }
}

fn check_count(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), EngineError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::Validation {
            field,
            value: value.to_string(),
            range: format!("{min}-{max}"),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub score: u8,
    pub raw_score: u8,
    pub tier: RiskTier,
    pub label: &'static str,
    pub support: &'static str,
    pub tip: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disorder {
    Schizophrenia,
    Depression,
    Anxiety,
    Bipolar,
    #[serde(rename = "Eating_Disorder")]
    EatingDisorder,
}

impl Disorder {
    pub const ALL: [Disorder; 5] = [
        Disorder::Schizophrenia,
        Disorder::Depression,
        Disorder::Anxiety,
        Disorder::Bipolar,
        Disorder::EatingDisorder,
    ];

    pub fn index(&self) -> usize {
        match self {
            Disorder::Schizophrenia => 0,
            Disorder::Depression => 1,
            Disorder::Anxiety => 2,
            Disorder::Bipolar => 3,
            Disorder::EatingDisorder => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Disorder::Schizophrenia => "Schizophrenia",
            Disorder::Depression => "Depression",
            Disorder::Anxiety => "Anxiety",
            Disorder::Bipolar => "Bipolar",
            Disorder::EatingDisorder => "Eating_Disorder",
        }
    }
}

impl std::fmt::Display for Disorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the prevalence reference dataset. Percentages are shares of
/// the population, in the order of [`Disorder::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct PrevalenceRecord {
    pub region: String,
    pub year: i32,
    pub prevalence: [f64; 5],
}

impl PrevalenceRecord {
    pub fn share(&self, disorder: Disorder) -> f64 {
        self.prevalence[disorder.index()]
    }

    /// Argmax over the five percentages; ties go to the earlier disorder.
    pub fn dominant_disorder(&self) -> Disorder {
        let mut best = 0;
        for (index, value) in self.prevalence.iter().enumerate().skip(1) {
            if *value > self.prevalence[best] {
                best = index;
            }
        }
        Disorder::ALL[best]
    }

    pub fn aggregate_score(&self) -> f64 {
        self.prevalence.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAssessment {
    pub region: String,
    pub year: i32,
    pub predicted_score: f64,
    pub dominant_disorder: Option<Disorder>,
    pub tip: &'static str,
}
