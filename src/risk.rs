use serde::{Deserialize, Serialize};

use crate::config::TipProfile;
use crate::error::EngineError;
use crate::models::{RiskResult, RiskTier, WellnessSample};

/// Highest score shown to the user ("X / 8").
pub const MAX_SCORE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SleepHours,
    ScreenHours,
    Steps,
    TypingWpm,
    Mood,
    JournalingDays,
    VoiceLogs,
    SocialInteractions,
}

impl Metric {
    pub fn value(&self, sample: &WellnessSample) -> f64 {
        match self {
            Metric::SleepHours => sample.sleep_hours,
            Metric::ScreenHours => sample.screen_hours,
            Metric::Steps => sample.steps as f64,
            Metric::TypingWpm => sample.typing_wpm as f64,
            Metric::Mood => sample.mood as f64,
            Metric::JournalingDays => sample.journaling_days as f64,
            Metric::VoiceLogs => sample.voice_logs as f64,
            Metric::SocialInteractions => sample.social_interactions as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Below,
    AtMost,
    Above,
}

impl Comparison {
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Below => value < threshold,
            Comparison::AtMost => value <= threshold,
            Comparison::Above => value > threshold,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreRule {
    pub name: &'static str,
    pub metric: Metric,
    pub comparison: Comparison,
    pub threshold: f64,
    pub weight: u8,
}

impl ScoreRule {
    pub fn fires(&self, sample: &WellnessSample) -> bool {
        self.comparison.holds(self.metric.value(sample), self.threshold)
    }
}

pub static SCORE_RULES: [ScoreRule; 8] = [
    ScoreRule {
        name: "short sleep",
        metric: Metric::SleepHours,
        comparison: Comparison::Below,
        threshold: 6.0,
        weight: 1,
    },
    ScoreRule {
        name: "high screen time",
        metric: Metric::ScreenHours,
        comparison: Comparison::Above,
        threshold: 6.0,
        weight: 1,
    },
    ScoreRule {
        name: "low step count",
        metric: Metric::Steps,
        comparison: Comparison::Below,
        threshold: 3000.0,
        weight: 1,
    },
    ScoreRule {
        name: "low mood",
        metric: Metric::Mood,
        comparison: Comparison::AtMost,
        threshold: 4.0,
        weight: 2,
    },
    ScoreRule {
        name: "rare journaling",
        metric: Metric::JournalingDays,
        comparison: Comparison::Below,
        threshold: 2.0,
        weight: 1,
    },
    ScoreRule {
        name: "no voice logs",
        metric: Metric::VoiceLogs,
        comparison: Comparison::Below,
        threshold: 1.0,
        weight: 1,
    },
    ScoreRule {
        name: "slow typing",
        metric: Metric::TypingWpm,
        comparison: Comparison::Below,
        threshold: 30.0,
        weight: 1,
    },
    ScoreRule {
        name: "little social contact",
        metric: Metric::SocialInteractions,
        comparison: Comparison::Below,
        threshold: 2.0,
        weight: 1,
    },
];

/// Rules that fired for this sample, in table order.
pub fn contributions(sample: &WellnessSample) -> Vec<&'static ScoreRule> {
    SCORE_RULES
        .iter()
        .filter(|rule| rule.fires(sample))
        .collect()
}

/// Exact sum of all fired rule weights. Can reach 9 because mood weighs 2.
pub fn raw_score(sample: &WellnessSample) -> u8 {
    contributions(sample).iter().map(|rule| rule.weight).sum()
}

pub fn compute_risk_score(sample: &WellnessSample) -> u8 {
    raw_score(sample).min(MAX_SCORE)
}

static TIER_MESSAGES: [(RiskTier, &str, &str); 3] = [
    (
        RiskTier::Low,
        "Low Risk",
        "Try daily gratitude, journaling, and breathing routines.",
    ),
    (
        RiskTier::Moderate,
        "Moderate Risk",
        "Start 5-min CBT, breathing games, mindfulness apps.",
    ),
    (
        RiskTier::High,
        "High Risk",
        "Please reach out to a friend, counselor, or professional help.",
    ),
];

pub fn tier_for_score(score: u8) -> RiskTier {
    match score {
        0..=2 => RiskTier::Low,
        3..=5 => RiskTier::Moderate,
        _ => RiskTier::High,
    }
}

/// Tier plus its (label, support message).
pub fn classify_tier(score: u8) -> (RiskTier, &'static str, &'static str) {
    let tier = tier_for_score(score);
    let (_, label, message) = TIER_MESSAGES
        .iter()
        .find(|(candidate, _, _)| *candidate == tier)
        .unwrap_or(&TIER_MESSAGES[2]);
    (tier, *label, *message)
}

/// First matching rule in priority order wins; otherwise the profile default.
pub fn select_tip<'a>(sample: &WellnessSample, profile: &'a TipProfile) -> &'a str {
    profile
        .rules
        .iter()
        .find(|rule| rule.comparison.holds(rule.metric.value(sample), rule.threshold))
        .map(|rule| rule.tip.as_str())
        .unwrap_or(profile.default_tip.as_str())
}

pub fn evaluate(sample: &WellnessSample, profile: &TipProfile) -> Result<RiskResult, EngineError> {
    sample.validate()?;

    let raw = raw_score(sample);
    let score = compute_risk_score(sample);
    let (tier, label, support) = classify_tier(score);
    let tip = select_tip(sample, profile).to_string();

    tracing::debug!(score, raw_score = raw, tier = label, profile = %profile.name, "Evaluated check-in");

    Ok(RiskResult {
        score,
        raw_score: raw,
        tier,
        label,
        support,
        tip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ProfilePreset, GRATITUDE_TIP, JOURNALING_TIP, SCREEN_TIP, SLEEP_TIP, SOCIAL_TIP,
    };
    use proptest::prelude::*;

    fn healthy_sample() -> WellnessSample {
        WellnessSample {
            sleep_hours: 8.0,
            screen_hours: 3.0,
            steps: 10_000,
            typing_wpm: 60,
            mood: 8,
            journaling_days: 4,
            voice_logs: 2,
            social_interactions: 5,
        }
    }

    fn struggling_sample() -> WellnessSample {
        WellnessSample {
            sleep_hours: 5.0,
            screen_hours: 7.0,
            steps: 2000,
            typing_wpm: 25,
            mood: 3,
            journaling_days: 1,
            voice_logs: 0,
            social_interactions: 1,
        }
    }

    /// The check-in form's scoring, written out rule by rule.
    fn form_score(sample: &WellnessSample) -> u8 {
        let mut score = 0;
        if sample.sleep_hours < 6.0 {
            score += 1;
        }
        if sample.screen_hours > 6.0 {
            score += 1;
        }
        if sample.steps < 3000 {
            score += 1;
        }
        if sample.mood <= 4 {
            score += 2;
        }
        if sample.journaling_days < 2 {
            score += 1;
        }
        if sample.voice_logs < 1 {
            score += 1;
        }
        if sample.typing_wpm < 30 {
            score += 1;
        }
        if sample.social_interactions < 2 {
            score += 1;
        }
        score
    }

    fn sample_strategy() -> impl Strategy<Value = WellnessSample> {
        (
            0.0..=12.0f64,
            0.0..=15.0f64,
            0u32..30_000,
            0u32..=100,
            1u32..=10,
            0u32..=7,
            0u32..=7,
            0u32..=20,
        )
            .prop_map(
                |(sleep, screen, steps, typing, mood, journaling, voice, social)| WellnessSample {
                    sleep_hours: sleep,
                    screen_hours: screen,
                    steps,
                    typing_wpm: typing,
                    mood,
                    journaling_days: journaling,
                    voice_logs: voice,
                    social_interactions: social,
                },
            )
    }

    #[test]
    fn healthy_check_in_scores_zero() {
        let profile = ProfilePreset::Checkin.profile();
        let result = evaluate(&healthy_sample(), &profile).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.tier, RiskTier::Low);
        assert_eq!(result.tip, profile.default_tip);
    }

    #[test]
    fn every_rule_firing_caps_at_max_score() {
        let sample = struggling_sample();
        assert_eq!(raw_score(&sample), 9);
        assert_eq!(compute_risk_score(&sample), MAX_SCORE);

        let result = evaluate(&sample, &ProfilePreset::Checkin.profile()).unwrap();
        assert_eq!(result.score, 8);
        assert_eq!(result.raw_score, 9);
        assert_eq!(result.tier, RiskTier::High);
        assert_eq!(result.tip, GRATITUDE_TIP);
    }

    #[test]
    fn low_mood_counts_twice() {
        let mut sample = healthy_sample();
        sample.mood = 4;
        assert_eq!(compute_risk_score(&sample), 2);
        sample.mood = 5;
        assert_eq!(compute_risk_score(&sample), 0);
    }

    #[test]
    fn thresholds_are_strict_where_expected() {
        let mut sample = healthy_sample();
        sample.sleep_hours = 6.0;
        sample.screen_hours = 6.0;
        sample.steps = 3000;
        sample.journaling_days = 2;
        sample.voice_logs = 1;
        sample.typing_wpm = 30;
        sample.social_interactions = 2;
        assert_eq!(compute_risk_score(&sample), 0);
        assert!(contributions(&sample).is_empty());
    }

    #[test]
    fn contributions_name_the_fired_rules() {
        let mut sample = healthy_sample();
        sample.steps = 100;
        sample.voice_logs = 0;
        let names: Vec<&str> = contributions(&sample).iter().map(|rule| rule.name).collect();
        assert_eq!(names, vec!["low step count", "no voice logs"]);
    }

    #[test]
    fn tier_bands_are_lower_inclusive() {
        for score in 0..=2 {
            assert_eq!(classify_tier(score).0, RiskTier::Low);
        }
        for score in 3..=5 {
            assert_eq!(classify_tier(score).0, RiskTier::Moderate);
        }
        for score in 6..=8 {
            assert_eq!(classify_tier(score).0, RiskTier::High);
        }
        assert!(classify_tier(7).2.contains("professional"));
        assert!(classify_tier(4).2.contains("breathing"));
    }

    #[test]
    fn tip_thresholds_follow_profile() {
        let mut sample = healthy_sample();
        sample.screen_hours = 7.0;

        let checkin = ProfilePreset::Checkin.profile();
        let strict = ProfilePreset::Strict.profile();
        assert_eq!(select_tip(&sample, &checkin), checkin.default_tip);
        assert_eq!(select_tip(&sample, &strict), SCREEN_TIP);

        let mut sample = healthy_sample();
        sample.sleep_hours = 5.5;
        assert_eq!(select_tip(&sample, &checkin), checkin.default_tip);
        assert_eq!(select_tip(&sample, &strict), SLEEP_TIP);
    }

    #[test]
    fn journaling_tip_only_in_journal_profile() {
        let mut sample = healthy_sample();
        sample.journaling_days = 1;
        assert_eq!(
            select_tip(&sample, &ProfilePreset::Journal.profile()),
            JOURNALING_TIP
        );
        let strict = ProfilePreset::Strict.profile();
        assert_eq!(select_tip(&sample, &strict), strict.default_tip);
    }

    #[test]
    fn social_tip_outranks_journaling() {
        let mut sample = healthy_sample();
        sample.journaling_days = 0;
        sample.social_interactions = 0;
        assert_eq!(
            select_tip(&sample, &ProfilePreset::Journal.profile()),
            SOCIAL_TIP
        );
    }

    #[test]
    fn tier_messages_belong_to_their_tier() {
        assert_eq!(classify_tier(0).1, "Low Risk");
        assert_eq!(classify_tier(3).1, "Moderate Risk");
        assert_eq!(classify_tier(6).1, "High Risk");
        assert!(classify_tier(1).2.contains("gratitude"));
        assert!(classify_tier(5).2.contains("mindfulness"));
        assert!(classify_tier(8).2.contains("counselor"));
    }

    #[test]
    fn score_matches_form_at_thresholds() {
        let mut sample = healthy_sample();
        sample.sleep_hours = 5.99;
        sample.screen_hours = 6.01;
        sample.steps = 2999;
        sample.typing_wpm = 29;
        assert_eq!(compute_risk_score(&sample), form_score(&sample));
        assert_eq!(compute_risk_score(&sample), 4);
    }

    #[test]
    fn evaluate_rejects_out_of_domain_sample() {
        let mut sample = healthy_sample();
        sample.typing_wpm = 140;
        let err = evaluate(&sample, &ProfilePreset::Checkin.profile()).unwrap_err();
        assert!(matches!(err, EngineError::Validation { field: "typing_wpm", .. }));
    }

    proptest! {
        #[test]
        fn score_stays_in_bounds(sample in sample_strategy()) {
            let score = compute_risk_score(&sample);
            prop_assert!(score <= MAX_SCORE);
            let exact = raw_score(&sample);
            if exact <= MAX_SCORE {
                prop_assert_eq!(score, exact);
            }
        }

        #[test]
        fn score_equals_form_sum_capped(sample in sample_strategy()) {
            let expected = form_score(&sample).min(MAX_SCORE);
            prop_assert_eq!(compute_risk_score(&sample), expected);
            prop_assert_eq!(raw_score(&sample), form_score(&sample));
        }

        #[test]
        fn less_sleep_never_lowers_score(sample in sample_strategy(), less in 0.0..=4.0f64) {
            let mut worse = sample;
            worse.sleep_hours = (sample.sleep_hours - less).max(0.0);
            prop_assert!(compute_risk_score(&worse) >= compute_risk_score(&sample));
        }

        #[test]
        fn fewer_steps_never_lowers_score(sample in sample_strategy(), less in 0u32..5000) {
            let mut worse = sample;
            worse.steps = sample.steps.saturating_sub(less);
            prop_assert!(compute_risk_score(&worse) >= compute_risk_score(&sample));
        }

        #[test]
        fn slower_typing_never_lowers_score(sample in sample_strategy(), less in 0u32..=40) {
            let mut worse = sample;
            worse.typing_wpm = sample.typing_wpm.saturating_sub(less);
            prop_assert!(compute_risk_score(&worse) >= compute_risk_score(&sample));
        }

        #[test]
        fn less_journaling_never_lowers_score(sample in sample_strategy(), less in 0u32..=7) {
            let mut worse = sample;
            worse.journaling_days = sample.journaling_days.saturating_sub(less);
            prop_assert!(compute_risk_score(&worse) >= compute_risk_score(&sample));
        }

        #[test]
        fn fewer_voice_logs_never_lowers_score(sample in sample_strategy(), less in 0u32..=7) {
            let mut worse = sample;
            worse.voice_logs = sample.voice_logs.saturating_sub(less);
            prop_assert!(compute_risk_score(&worse) >= compute_risk_score(&sample));
        }

        #[test]
        fn less_social_contact_never_lowers_score(sample in sample_strategy(), less in 0u32..=20) {
            let mut worse = sample;
            worse.social_interactions = sample.social_interactions.saturating_sub(less);
            prop_assert!(compute_risk_score(&worse) >= compute_risk_score(&sample));
        }

        #[test]
        fn lowering_mood_never_lowers_score(sample in sample_strategy()) {
            prop_assume!(sample.mood > 1);
            let mut worse = sample;
            worse.mood -= 1;
            prop_assert!(compute_risk_score(&worse) >= compute_risk_score(&sample));
        }

        #[test]
        fn more_screen_time_never_lowers_score(sample in sample_strategy(), extra in 0.0..=3.0f64) {
            let mut worse = sample;
            worse.screen_hours = (sample.screen_hours + extra).min(15.0);
            prop_assert!(compute_risk_score(&worse) >= compute_risk_score(&sample));
        }

        #[test]
        fn tier_is_total(score in 0u8..=MAX_SCORE) {
            let (tier, label, support) = classify_tier(score);
            prop_assert_eq!(tier, tier_for_score(score));
            prop_assert!(!label.is_empty());
            prop_assert!(!support.is_empty());
        }

        #[test]
        fn low_mood_always_gets_gratitude_tip(sample in sample_strategy(), mood in 1u32..=4) {
            let mut sample = sample;
            sample.mood = mood;
            for preset in [ProfilePreset::Checkin, ProfilePreset::Strict, ProfilePreset::Journal] {
                let profile = preset.profile();
                prop_assert_eq!(select_tip(&sample, &profile), GRATITUDE_TIP);
            }
        }

        #[test]
        fn evaluation_is_idempotent(sample in sample_strategy()) {
            let profile = ProfilePreset::Journal.profile();
            prop_assert_eq!(evaluate(&sample, &profile), evaluate(&sample, &profile));
        }
    }
}
