use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use commute_engine::calendar::{parse_clock_time, resolve_window, weekday_from_index};
use commute_engine::impact::{city_impact, compare_slot_emissions, personal_impact};
use commute_engine::label::{format_clock_label, format_time_of_day};
use commute_engine::school::{school_day_info, SchoolDayInfo};
use commute_engine::{
    analyze_window, apply_correction, build_provider, collect_samples, commentary, plan_window,
    AnalyzerConfig, CityImpact, Co2Comparison, Commentary, CorrectionModel, EngineError,
    PersonalImpact, ProviderSample, WindowAnalysis,
};

/// Departure-window stress analysis for Oahu commutes
#[derive(Parser)]
#[command(name = "commute", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a weekly window to concrete departure instants
    Window {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Score recorded provider samples against an arrival goal
    Analyze {
        /// JSON array of provider samples, in departure order
        #[arg(short, long)]
        samples: PathBuf,
        /// Goal arrival as unix seconds
        #[arg(long)]
        arrive_by_ts: i64,
        /// Correction applied to traffic durations before scoring
        #[arg(long, value_enum, default_value_t = CorrectionArg::None)]
        correction: CorrectionArg,
    },
    /// Resolve a window, price it with the configured provider and rank it
    Plan {
        #[command(flatten)]
        window: WindowArgs,
        /// Arrival goal, "HH:MM" on the window's day
        #[arg(long)]
        arrive_by: String,
        /// TOML analyzer configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Share of peak commuters assumed to shift, in percent
        #[arg(long, default_value_t = 10.0)]
        participation: f64,
        /// Minutes earlier the commuter is willing to leave
        #[arg(long, default_value_t = 10)]
        shift: i64,
    },
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Window start, "HH:MM" in Hawaii time
    #[arg(long)]
    start: String,
    /// Window end, "HH:MM" in Hawaii time
    #[arg(long)]
    end: String,
    /// Minutes between departures (defaults to the configured interval)
    #[arg(short, long)]
    interval: Option<u32>,
    /// Day of week, 0 = Sunday … 6 = Saturday
    #[arg(short, long)]
    day: u8,
    /// Reference time as RFC 3339 (defaults to the current time)
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,
}

impl WindowArgs {
    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CorrectionArg {
    None,
    TimeOfDay,
}

impl From<CorrectionArg> for CorrectionModel {
    fn from(arg: CorrectionArg) -> Self {
        match arg {
            CorrectionArg::None => CorrectionModel::None,
            CorrectionArg::TimeOfDay => CorrectionModel::TimeOfDay,
        }
    }
}

fn parse_now(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WindowOutput {
    target_date: String,
    rolled_over: bool,
    school_day: SchoolDayInfo,
    departure_times: Vec<i64>,
    departure_labels: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanOutput {
    target_date: String,
    rolled_over: bool,
    school_day: SchoolDayInfo,
    desired_arrival_time: i64,
    desired_arrival_label: String,
    analysis: WindowAnalysis,
    commentary: Commentary,
    #[serde(skip_serializing_if = "Option::is_none")]
    co2: Option<Co2Comparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    personal_impact: Option<PersonalImpact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city_impact: Option<CityImpact>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Window { window } => run_window(&window),
        Command::Analyze {
            samples,
            arrive_by_ts,
            correction,
        } => run_analyze(&samples, arrive_by_ts, correction.into()),
        Command::Plan {
            window,
            arrive_by,
            config,
            participation,
            shift,
        } => run_plan(&window, &arrive_by, config.as_deref(), participation, shift),
    }
}

fn run_window(args: &WindowArgs) -> Result<()> {
    let start = parse_clock_time(&args.start)?;
    let end = parse_clock_time(&args.end)?;
    let target = weekday_from_index(args.day)?;
    let interval = args
        .interval
        .unwrap_or(AnalyzerConfig::default().default_interval_minutes);

    let window = resolve_window(args.now(), start, end, target);
    let departure_times = window.departure_times(interval)?;
    if departure_times.is_empty() {
        let reason = "start time must be before end time".to_string();
        return Err(EngineError::EmptyWindow(reason).into());
    }

    print_json(&WindowOutput {
        target_date: window.target_date().to_string(),
        rolled_over: window.rolled_over,
        school_day: school_day_info(window.target_date()),
        departure_labels: departure_times.iter().map(|&t| format_clock_label(t)).collect(),
        departure_times,
    })
}

fn run_analyze(
    path: &Path,
    desired_arrival_time: i64,
    correction: CorrectionModel,
) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read samples from '{}'", path.display()))?;
    let samples: Vec<ProviderSample> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse samples in '{}'", path.display()))?;
    log::info!("analyzing {} samples from {}", samples.len(), path.display());

    let samples = apply_correction(correction.build().as_ref(), &samples);
    let analysis = analyze_window(&samples, desired_arrival_time)?;
    print_json(&analysis)
}

fn run_plan(
    args: &WindowArgs,
    arrive_by: &str,
    config_path: Option<&Path>,
    participation: f64,
    shift_minutes: i64,
) -> Result<()> {
    let config = match config_path {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };

    let plan = plan_window(
        args.now(),
        parse_clock_time(&args.start)?,
        parse_clock_time(&args.end)?,
        args.interval.unwrap_or(config.default_interval_minutes),
        weekday_from_index(args.day)?,
        parse_clock_time(arrive_by)?,
    )?;
    log::info!(
        "pricing {} departures on {}",
        plan.departure_times.len(),
        plan.window.target_date()
    );

    let provider = build_provider(&config.provider)?;
    let samples = collect_samples(provider.as_ref(), &plan.departure_times);
    let samples = apply_correction(config.correction.build().as_ref(), &samples);
    let analysis = analyze_window(&samples, plan.desired_arrival_time)?;

    let slots = analysis.analyzed();
    // Impact needs congestion above a positive free-flow time.
    let congested = analysis
        .summary
        .as_ref()
        .filter(|s| s.peak_delay_minutes > 0 && s.free_flow_minutes > 0);
    let personal = congested.map(|s| personal_impact(shift_minutes, s.peak_delay_minutes));
    let city = congested
        .map(|s| city_impact(participation, s.peak_delay_minutes, s.time_saved_minutes));

    print_json(&PlanOutput {
        target_date: plan.window.target_date().to_string(),
        rolled_over: plan.window.rolled_over,
        school_day: school_day_info(plan.window.target_date()),
        desired_arrival_time: plan.desired_arrival_time,
        desired_arrival_label: format_time_of_day(plan.arrive_by),
        commentary: commentary(&slots),
        co2: compare_slot_emissions(&slots),
        personal_impact: personal,
        city_impact: city,
        analysis,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
