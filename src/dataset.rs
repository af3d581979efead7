use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::error::EngineError;
use crate::models::PrevalenceRecord;

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(alias = "Entity")]
    entity: String,
    #[serde(alias = "Year")]
    year: i32,
    #[serde(
        alias = "Schizophrenia disorders (share of population) - Sex: Both - Age: Age-standardized"
    )]
    schizophrenia: f64,
    #[serde(
        alias = "Depressive disorders (share of population) - Sex: Both - Age: Age-standardized"
    )]
    depression: f64,
    #[serde(alias = "Anxiety disorders (share of population) - Sex: Both - Age: Age-standardized")]
    anxiety: f64,
    #[serde(alias = "Bipolar disorders (share of population) - Sex: Both - Age: Age-standardized")]
    bipolar: f64,
    #[serde(alias = "Eating disorders (share of population) - Sex: Both - Age: Age-standardized")]
    eating_disorder: f64,
}

impl From<CsvRow> for PrevalenceRecord {
    fn from(row: CsvRow) -> Self {
        PrevalenceRecord {
            region: row.entity,
            year: row.year,
            prevalence: [
                row.schizophrenia,
                row.depression,
                row.anxiety,
                row.bipolar,
                row.eating_disorder,
            ],
        }
    }
}

/// Read-only prevalence reference data, one row per (region, year).
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<PrevalenceRecord>,
}

impl Dataset {
    pub fn new(records: Vec<PrevalenceRecord>) -> Result<Self, EngineError> {
        if records.is_empty() {
            return Err(EngineError::EmptyDataset);
        }
        Ok(Self { records })
    }

    pub fn from_reader<R: Read>(input: R) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_reader(input);
        let mut records = Vec::new();

        for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
            // Header is line 1.
            let row = result
                .with_context(|| format!("malformed dataset row on line {}", index + 2))?;
            records.push(PrevalenceRecord::from(row));
        }

        Ok(Self::new(records)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open dataset {}", path.display()))?;
        let dataset = Self::from_reader(file)
            .with_context(|| format!("failed to load dataset {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.records.len(),
            regions = dataset.regions().len(),
            "Loaded prevalence dataset"
        );
        Ok(dataset)
    }

    pub fn records(&self) -> &[PrevalenceRecord] {
        &self.records
    }

    /// Distinct region names, sorted.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = self
            .records
            .iter()
            .map(|record| record.region.as_str())
            .collect();
        regions.sort_unstable();
        regions.dedup();
        regions
    }

    /// First and last year present for each region.
    pub fn year_spans(&self) -> BTreeMap<&str, (i32, i32)> {
        let mut spans: BTreeMap<&str, (i32, i32)> = BTreeMap::new();
        for record in &self.records {
            let entry = spans
                .entry(record.region.as_str())
                .or_insert((record.year, record.year));
            entry.0 = entry.0.min(record.year);
            entry.1 = entry.1.max(record.year);
        }
        spans
    }

    pub fn find(&self, region: &str, year: i32) -> Option<&PrevalenceRecord> {
        self.records
            .iter()
            .find(|record| record.region == region && record.year == year)
    }

    /// Rows for one region ordered by year.
    pub fn trend(&self, region: &str) -> Vec<&PrevalenceRecord> {
        let mut rows: Vec<&PrevalenceRecord> = self
            .records
            .iter()
            .filter(|record| record.region == region)
            .collect();
        rows.sort_by_key(|record| record.year);
        rows
    }
}
