use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::error::EngineError;
use crate::models::{Disorder, RegionAssessment};

pub const FALLBACK_DISORDER_TIP: &str =
    "Take care of your mental health with regular rest, movement, and connection.";

const DISORDER_TIPS: [(Disorder, &str); 5] = [
    (
        Disorder::Schizophrenia,
        "Keep a steady daily routine and stay connected with your care team.",
    ),
    (
        Disorder::Depression,
        "Write 3 things you're grateful for and get some sunlight today.",
    ),
    (
        Disorder::Anxiety,
        "Try box breathing: inhale 4s, hold 4s, exhale 4s, hold 4s.",
    ),
    (
        Disorder::Bipolar,
        "Track your sleep and mood daily to spot early shifts.",
    ),
    (
        Disorder::EatingDisorder,
        "Eat regular balanced meals and reach out to someone you trust.",
    ),
];

pub fn tip_for_disorder(label: &str) -> &'static str {
    DISORDER_TIPS
        .iter()
        .find(|(disorder, _)| disorder.as_str() == label)
        .map(|(_, tip)| *tip)
        .unwrap_or(FALLBACK_DISORDER_TIP)
}

/// Stable region-name to integer mapping, codes assigned in sorted order.
#[derive(Debug, Clone, Default)]
pub struct RegionEncoder {
    codes: BTreeMap<String, usize>,
}

impl RegionEncoder {
    pub fn fit<'a>(regions: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<&str> = regions.into_iter().collect();
        names.sort_unstable();
        names.dedup();

        let codes = names
            .into_iter()
            .enumerate()
            .map(|(code, name)| (name.to_string(), code))
            .collect();
        Self { codes }
    }

    pub fn encode(&self, region: &str) -> Result<usize, EngineError> {
        self.codes
            .get(region)
            .copied()
            .ok_or_else(|| EngineError::UnknownRegion(region.to_string()))
    }

    pub fn region_count(&self) -> usize {
        self.codes.len()
    }
}

/// A fitted regressor over `(encoded_region, year)`.
pub trait RiskModel {
    fn predict(&self, features: [f64; 2]) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TrendLine {
    slope: f64,
    intercept: f64,
}

impl TrendLine {
    /// `None` when every point shares one x, so no slope can be fitted.
    fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for (x, y) in points {
            covariance += (x - mean_x) * (y - mean_y);
            variance += (x - mean_x).powi(2);
        }

        if variance == 0.0 {
            return None;
        }

        let slope = covariance / variance;
        Some(TrendLine {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Baseline model: one least-squares line of target over year per region.
/// Regions with a single distinct year, and unseen codes, get the global mean.
#[derive(Debug, Clone, Default)]
pub struct RegionTrendModel {
    lines: BTreeMap<usize, TrendLine>,
    global_mean: f64,
}

impl RegionTrendModel {
    pub fn fit(rows: &[([f64; 2], f64)]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }

        let mut grouped: BTreeMap<usize, Vec<(f64, f64)>> = BTreeMap::new();
        for ([region, year], target) in rows {
            grouped
                .entry(region_key(*region))
                .or_default()
                .push((*year, *target));
        }

        let lines = grouped
            .into_iter()
            .filter_map(|(region, points)| TrendLine::fit(&points).map(|line| (region, line)))
            .collect();
        let global_mean = rows.iter().map(|(_, target)| target).sum::<f64>() / rows.len() as f64;

        Self { lines, global_mean }
    }
}

impl RiskModel for RegionTrendModel {
    fn predict(&self, features: [f64; 2]) -> f64 {
        let [region, year] = features;
        self.lines
            .get(&region_key(region))
            .map(|line| line.at(year))
            .unwrap_or(self.global_mean)
    }
}

fn region_key(encoded: f64) -> usize {
    encoded.round().max(0.0) as usize
}

/// Reference data, encoder and fitted model, built once at startup.
pub struct PredictionContext<M: RiskModel = RegionTrendModel> {
    dataset: Dataset,
    encoder: RegionEncoder,
    model: M,
}

impl PredictionContext<RegionTrendModel> {
    pub fn build(dataset: Dataset) -> Result<Self, EngineError> {
        let encoder = RegionEncoder::fit(dataset.regions());
        let mut rows = Vec::with_capacity(dataset.records().len());
        for record in dataset.records() {
            let region = encoder.encode(&record.region)? as f64;
            rows.push(([region, record.year as f64], record.aggregate_score()));
        }

        let model = RegionTrendModel::fit(&rows);
        tracing::info!(
            regions = encoder.region_count(),
            rows = rows.len(),
            "Fitted region trend model"
        );

        Ok(Self {
            dataset,
            encoder,
            model,
        })
    }
}

impl<M: RiskModel> PredictionContext<M> {
    pub fn with_model(dataset: Dataset, model: M) -> Self {
        let encoder = RegionEncoder::fit(dataset.regions());
        Self {
            dataset,
            encoder,
            model,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

pub fn predict_risk_score<M: RiskModel>(
    ctx: &PredictionContext<M>,
    region: &str,
    year: i32,
) -> Result<f64, EngineError> {
    let code = ctx.encoder.encode(region)?;
    Ok(ctx.model.predict([code as f64, year as f64]))
}

pub fn lookup_dominant_disorder(dataset: &Dataset, region: &str, year: i32) -> Option<Disorder> {
    let found = dataset
        .find(region, year)
        .map(|record| record.dominant_disorder());
    if found.is_none() {
        tracing::warn!(region, year, "No prevalence row for region and year");
    }
    found
}

pub fn assess_region<M: RiskModel>(
    ctx: &PredictionContext<M>,
    region: &str,
    year: i32,
) -> Result<RegionAssessment, EngineError> {
    let predicted_score = predict_risk_score(ctx, region, year)?;
    let dominant_disorder = lookup_dominant_disorder(&ctx.dataset, region, year);
    let tip = match dominant_disorder {
        Some(disorder) => tip_for_disorder(disorder.as_str()),
        None => FALLBACK_DISORDER_TIP,
    };

    tracing::debug!(region, year, predicted_score, dominant = ?dominant_disorder, "Assessed region");

    Ok(RegionAssessment {
        region: region.to_string(),
        year,
        predicted_score,
        dominant_disorder,
        tip,
    })
}
