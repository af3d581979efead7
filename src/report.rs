use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{Disorder, PrevalenceRecord, RegionAssessment, RiskResult, WellnessSample};
use crate::risk::{self, MAX_SCORE};

pub struct RegionSection<'a> {
    pub assessment: &'a RegionAssessment,
    pub trend: Vec<&'a PrevalenceRecord>,
}

/// Chart-ready passive snapshot: (label, value), steps in thousands.
pub fn passive_snapshot(sample: &WellnessSample) -> [(&'static str, f64); 5] {
    [
        ("Sleep", sample.sleep_hours),
        ("Screen", sample.screen_hours),
        ("Steps (k)", sample.steps as f64 / 1000.0),
        ("Typing", sample.typing_wpm as f64),
        ("Mood", sample.mood as f64),
    ]
}

pub fn build_report(
    generated_at: DateTime<Utc>,
    sample: &WellnessSample,
    result: &RiskResult,
    region: Option<&RegionSection<'_>>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Lifeloom Risk Report");
    let _ = writeln!(output, "Generated {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Score");
    let _ = writeln!(output, "- Score: {} / {}", result.score, MAX_SCORE);
    let _ = writeln!(output, "- Level: {}", result.label);
    let _ = writeln!(output, "- Suggested support: {}", result.support);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Contributing Signals");

    let fired = risk::contributions(sample);
    if fired.is_empty() {
        let _ = writeln!(output, "No risk signals in this check-in.");
    } else {
        for rule in fired {
            let _ = writeln!(output, "- {} (+{})", rule.name, rule.weight);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Self-Care Tip");
    let _ = writeln!(output, "{}", result.tip);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Passive Wellness Snapshot");
    let _ = writeln!(output, "| metric | value |");
    let _ = writeln!(output, "|---|---|");
    for (label, value) in passive_snapshot(sample) {
        let _ = writeln!(output, "| {} | {:.1} |", label, value);
    }

    if let Some(section) = region {
        write_region(&mut output, section);
    }

    output
}

fn write_region(output: &mut String, section: &RegionSection<'_>) {
    let assessment = section.assessment;

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Regional Outlook: {} ({})",
        assessment.region, assessment.year
    );
    let _ = writeln!(
        output,
        "- Predicted prevalence score: {:.2}",
        assessment.predicted_score
    );
    match assessment.dominant_disorder {
        Some(disorder) => {
            let _ = writeln!(output, "- Dominant disorder: {}", disorder);
        }
        None => {
            let _ = writeln!(output, "- No prevalence data recorded for this year.");
        }
    }
    let _ = writeln!(output, "- Tip: {}", assessment.tip);

    let _ = writeln!(output);
    let _ = writeln!(output, "### Prevalence Trend (% of population)");
    if section.trend.is_empty() {
        let _ = writeln!(output, "No yearly rows for this region.");
        return;
    }

    let header: Vec<&str> = Disorder::ALL.iter().map(|disorder| disorder.as_str()).collect();
    let _ = writeln!(output, "| year | {} |", header.join(" | "));
    let _ = writeln!(output, "|---|{}", "---|".repeat(header.len()));
    for record in &section.trend {
        let cells: Vec<String> = Disorder::ALL
            .iter()
            .map(|disorder| format!("{:.2}", record.share(*disorder)))
            .collect();
        let _ = writeln!(output, "| {} | {} |", record.year, cells.join(" | "));
    }
}
