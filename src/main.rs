use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod config;
mod dataset;
mod error;
mod logging;
mod models;
mod predict;
mod report;
mod risk;

use config::{ProfilePreset, TipProfile};
use dataset::Dataset;
use models::WellnessSample;
use predict::PredictionContext;

#[derive(Parser)]
#[command(name = "lifeloom")]
#[command(about = "Rule-based mental wellness risk scoring", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single wellness check-in
    Assess {
        #[command(flatten)]
        sample: SampleArgs,
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        json: bool,
    },
    /// Predict a prevalence score for a region and year
    Predict {
        #[arg(long, env = "LIFELOOM_DATASET")]
        dataset: PathBuf,
        #[arg(long)]
        region: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        json: bool,
    },
    /// List regions in the prevalence dataset
    Regions {
        #[arg(long, env = "LIFELOOM_DATASET")]
        dataset: PathBuf,
    },
    /// Generate a markdown report for a check-in
    Report {
        #[command(flatten)]
        sample: SampleArgs,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Prevalence dataset; adds a regional outlook with --region and --year
        #[arg(long, requires = "region")]
        dataset: Option<PathBuf>,
        #[arg(long, requires = "year")]
        region: Option<String>,
        #[arg(long, requires = "dataset")]
        year: Option<i32>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct SampleArgs {
    /// Sleep hours per night
    #[arg(long)]
    sleep: f64,
    /// Screen time in hours per day
    #[arg(long)]
    screen: f64,
    /// Step count per day
    #[arg(long)]
    steps: u32,
    /// Typing speed in words per minute
    #[arg(long)]
    typing: u32,
    /// Mood today, 1-10
    #[arg(long)]
    mood: u32,
    /// Journaling days per week
    #[arg(long)]
    journaling: u32,
    /// Voice logs per week
    #[arg(long)]
    voice_logs: u32,
    /// Social interactions per day
    #[arg(long)]
    social: u32,
}

impl From<SampleArgs> for WellnessSample {
    fn from(args: SampleArgs) -> Self {
        WellnessSample {
            sleep_hours: args.sleep,
            screen_hours: args.screen,
            steps: args.steps,
            typing_wpm: args.typing,
            mood: args.mood,
            journaling_days: args.journaling,
            voice_logs: args.voice_logs,
            social_interactions: args.social,
        }
    }
}

#[derive(Args)]
struct ProfileArgs {
    /// Built-in tip profile
    #[arg(long, value_enum, default_value_t = ProfilePreset::Checkin)]
    profile: ProfilePreset,
    /// TOML tip profile, overrides --profile
    #[arg(long)]
    profile_file: Option<PathBuf>,
}

impl ProfileArgs {
    fn resolve(&self) -> anyhow::Result<TipProfile> {
        match &self.profile_file {
            Some(path) => TipProfile::load(path),
            None => Ok(self.profile.profile()),
        }
    }
}

fn load_context(path: &Path) -> anyhow::Result<PredictionContext> {
    let dataset = Dataset::load(path)?;
    PredictionContext::build(dataset).context("failed to fit prediction model")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json_logs)?;

    match cli.command {
        Commands::Assess {
            sample,
            profile,
            json,
        } => {
            let profile = profile.resolve()?;
            let sample = WellnessSample::from(sample);
            let result = risk::evaluate(&sample, &profile).context("invalid check-in")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Risk score: {} / {}", result.score, risk::MAX_SCORE);
                println!("Risk level: {}", result.label);
                println!("Suggested support: {}", result.support);
                println!("Self-care tip: {}", result.tip);
            }
        }
        Commands::Predict {
            dataset,
            region,
            year,
            json,
        } => {
            let ctx = load_context(&dataset)?;
            let assessment = predict::assess_region(&ctx, &region, year)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                println!(
                    "Predicted score for {} in {}: {:.2}",
                    assessment.region, assessment.year, assessment.predicted_score
                );
                match assessment.dominant_disorder {
                    Some(disorder) => println!("Dominant disorder: {disorder}"),
                    None => println!("No prevalence data for {region} in {year}."),
                }
                println!("Tip: {}", assessment.tip);
            }
        }
        Commands::Regions { dataset } => {
            let dataset = Dataset::load(&dataset)?;
            for (region, (first, last)) in dataset.year_spans() {
                println!("- {region} ({first}-{last})");
            }
        }
        Commands::Report {
            sample,
            profile,
            dataset,
            region,
            year,
            out,
        } => {
            let profile = profile.resolve()?;
            let sample = WellnessSample::from(sample);
            let result = risk::evaluate(&sample, &profile).context("invalid check-in")?;

            let report = match (dataset, region, year) {
                (Some(path), Some(region), Some(year)) => {
                    let ctx = load_context(&path)?;
                    let assessment = predict::assess_region(&ctx, &region, year)?;
                    let section = report::RegionSection {
                        assessment: &assessment,
                        trend: ctx.dataset().trend(&region),
                    };
                    report::build_report(chrono::Utc::now(), &sample, &result, Some(&section))
                }
                _ => report::build_report(chrono::Utc::now(), &sample, &result, None),
            };

            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
