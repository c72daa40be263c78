//! CycleSense CLI - Command-line interface for the CycleSense core
//!
//! Commands:
//! - project: Project next period, fertile window and cycle progress
//! - calendar: Print a month calendar with period and fertile days marked
//! - devices: List supported smart watches
//! - onboard: Walk the onboarding wizard from an answers file
//! - overview: Build the dashboard overview for a saved profile

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use cyclesense::onboarding::{
    OnboardingSession, SimulatedPairing, SimulatedSubmission, StepTransition, UserProfile,
    DEFAULT_CONNECT_DELAY_MS, DEFAULT_SUBMIT_DELAY_MS, STEP_ORDER, SUPPORTED_DEVICES,
};
use cyclesense::onboarding::Field;
use cyclesense::types::parse_calendar_date;
use cyclesense::{
    health_overview, CycleInput, CycleProjection, CycleProjector, DayKind, OnboardingError,
    CYCLESENSE_VERSION,
};

/// CycleSense - cycle projection and onboarding for the health tracker
#[derive(Parser)]
#[command(name = "cyclesense")]
#[command(version = CYCLESENSE_VERSION)]
#[command(about = "Project menstrual cycles and run the onboarding wizard", long_about = None)]
struct Cli {
    /// Output format (defaults to text on a terminal, JSON otherwise)
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project next period, fertile window and cycle progress
    Project {
        #[command(flatten)]
        cycle: CycleArgs,
    },

    /// Print a month calendar with period and fertile days marked
    Calendar {
        #[command(flatten)]
        cycle: CycleArgs,

        /// Month to print (YYYY-MM); defaults to the month of the next period
        #[arg(long)]
        month: Option<String>,
    },

    /// List supported smart watches
    Devices,

    /// Walk the onboarding wizard from an answers file
    Onboard {
        /// Answers file path (use - for stdin)
        #[arg(short, long)]
        answers: PathBuf,

        /// Save the submitted profile to this file
        #[arg(long)]
        save_profile: Option<PathBuf>,

        /// Simulated pairing latency in milliseconds
        #[arg(long, default_value_t = DEFAULT_CONNECT_DELAY_MS)]
        connect_delay_ms: u64,

        /// Simulated submission latency in milliseconds
        #[arg(long, default_value_t = DEFAULT_SUBMIT_DELAY_MS)]
        submit_delay_ms: u64,

        /// Make pairing fail with this reason
        #[arg(long)]
        fail_connect: Option<String>,
    },

    /// Build the dashboard overview for a saved profile
    Overview {
        /// Profile JSON file path (use - for stdin)
        #[arg(short, long)]
        profile: PathBuf,

        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        as_of: Option<String>,
    },
}

#[derive(clap::Args)]
struct CycleArgs {
    /// First day of the last period (YYYY-MM-DD)
    #[arg(long)]
    last_period: String,

    /// Average cycle length in days
    #[arg(long, default_value = "28")]
    cycle_length: String,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    as_of: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// Single-line JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

/// Answers file consumed by `onboard`
#[derive(Deserialize)]
struct Answers {
    device: String,
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CycleSenseCliError> {
    let format = cli.format.unwrap_or_else(|| {
        if atty::is(atty::Stream::Stdout) {
            OutputFormat::Text
        } else {
            OutputFormat::Json
        }
    });

    match cli.command {
        Commands::Project { cycle } => cmd_project(&cycle, format),
        Commands::Calendar { cycle, month } => cmd_calendar(&cycle, month.as_deref(), format),
        Commands::Devices => cmd_devices(format),
        Commands::Onboard {
            answers,
            save_profile,
            connect_delay_ms,
            submit_delay_ms,
            fail_connect,
        } => {
            let mut pairing = SimulatedPairing::new(Duration::from_millis(connect_delay_ms));
            if let Some(reason) = fail_connect {
                pairing = pairing.failing(reason);
            }
            let sink = SimulatedSubmission::new(Duration::from_millis(submit_delay_ms));
            cmd_onboard(&answers, save_profile.as_deref(), &pairing, &sink, format).await
        }
        Commands::Overview { profile, as_of } => cmd_overview(&profile, as_of.as_deref(), format),
    }
}

fn read_input(path: &Path) -> Result<String, CycleSenseCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn as_of_or_today(as_of: Option<&str>) -> Result<chrono::NaiveDate, CycleSenseCliError> {
    match as_of {
        Some(raw) => Ok(parse_calendar_date(raw)?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn project_args(cycle: &CycleArgs) -> Result<CycleProjection, CycleSenseCliError> {
    let input = CycleInput::parse(&cycle.last_period, &cycle.cycle_length)?;
    let as_of = as_of_or_today(cycle.as_of.as_deref())?;
    Ok(CycleProjector::project(&input, as_of)?)
}

fn print_json<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<(), CycleSenseCliError> {
    match format {
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(value)?),
        _ => println!("{}", serde_json::to_string(value)?),
    }
    Ok(())
}

fn cmd_project(cycle: &CycleArgs, format: OutputFormat) -> Result<(), CycleSenseCliError> {
    let projection = project_args(cycle)?;

    if !matches!(format, OutputFormat::Text) {
        return print_json(&projection, format);
    }

    println!("Cycle Projection (as of {})", projection.as_of);
    println!("==========================");
    println!("Next period:     {}", projection.next_period_start.format("%b %d, %Y"));
    println!(
        "Fertile window:  {} - {}",
        projection.fertile_window_start.format("%b %d"),
        projection.fertile_window_end.format("%b %d")
    );
    println!("Days since last: {}", projection.days_since_last_period);
    println!("Days until next: {}", projection.days_until_next_period());
    println!("Cycle progress:  {}%", projection.cycle_progress_display());
    if projection.cycle_progress_percent < 0.0 {
        println!("\nThe predicted period has passed; progress is not re-anchored to a new cycle.");
    }
    Ok(())
}

fn cmd_calendar(
    cycle: &CycleArgs,
    month: Option<&str>,
    format: OutputFormat,
) -> Result<(), CycleSenseCliError> {
    use chrono::Datelike;

    let projection = project_args(cycle)?;
    let (year, month) = match month {
        Some(raw) => {
            let first = parse_calendar_date(&format!("{raw}-01"))?;
            (first.year(), first.month())
        }
        None => (
            projection.next_period_start.year(),
            projection.next_period_start.month(),
        ),
    };
    let days = projection.month_calendar(year, month)?;

    if !matches!(format, OutputFormat::Text) {
        return print_json(&days, format);
    }

    println!("{year:04}-{month:02}   P = period, F = fertile, * = today");
    println!(" Mo  Tu  We  Th  Fr  Sa  Su");
    let mut line = String::new();
    if let Some(first) = days.first() {
        for _ in 0..first.date.weekday().num_days_from_monday() {
            line.push_str("    ");
        }
    }
    for day in &days {
        let mark = match day.kind {
            DayKind::Period => 'P',
            DayKind::Fertile => 'F',
            DayKind::Regular => ' ',
        };
        let today = if day.is_today { '*' } else { ' ' };
        line.push_str(&format!("{:>2}{}{}", day.date.day(), mark, today));
        if day.date.weekday() == chrono::Weekday::Sun {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    Ok(())
}

fn cmd_devices(format: OutputFormat) -> Result<(), CycleSenseCliError> {
    if !matches!(format, OutputFormat::Text) {
        return print_json(&SUPPORTED_DEVICES, format);
    }

    println!("Supported Smart Watches");
    println!("=======================");
    for device in SUPPORTED_DEVICES.iter() {
        println!("  {:<22} {}", device.id, device.label);
    }
    Ok(())
}

async fn cmd_onboard(
    answers_path: &Path,
    save_profile: Option<&Path>,
    pairing: &SimulatedPairing,
    sink: &SimulatedSubmission,
    format: OutputFormat,
) -> Result<(), CycleSenseCliError> {
    let answers: Answers = serde_json::from_str(&read_input(answers_path)?)?;

    let mut session = OnboardingSession::new();
    session.select_device(&answers.device)?;
    eprintln!("Connecting {}...", answers.device);
    session.connect_device(pairing).await?;

    // Reject unknown names up front, before any step is walked
    let mut fields: Vec<(Field, &String)> = Vec::with_capacity(answers.fields.len());
    for (name, value) in &answers.fields {
        fields.push((name.parse::<Field>()?, value));
    }

    for step in STEP_ORDER.iter().skip(1) {
        for (field, value) in fields.iter().filter(|(f, _)| f.step() == *step) {
            session.set(*field, value.as_str())?;
        }
        eprintln!(
            "[{}/{}] {}",
            session.step_index() + 1,
            STEP_ORDER.len(),
            step.title()
        );
        if session.next()? == StepTransition::ReadyToSubmit {
            break;
        }
    }

    eprintln!("Submitting...");
    let receipt = session.submit(sink).await?;

    if let Some(path) = save_profile {
        fs::write(path, serde_json::to_string_pretty(session.profile())?)?;
    }

    if !matches!(format, OutputFormat::Text) {
        return print_json(
            &serde_json::json!({
                "receipt": receipt,
                "session": session.snapshot(),
                "profile": session.profile(),
            }),
            format,
        );
    }

    println!("Onboarding complete");
    println!("===================");
    println!("Submission: {}", receipt.submission_id);
    println!("Submitted:  {}", receipt.submitted_at.to_rfc3339());
    if let Some(device) = session.paired_device() {
        println!("Device:     {}", device.device_id);
    }
    Ok(())
}

fn cmd_overview(
    profile_path: &Path,
    as_of: Option<&str>,
    format: OutputFormat,
) -> Result<(), CycleSenseCliError> {
    let profile: UserProfile = serde_json::from_str(&read_input(profile_path)?)?;
    let overview = health_overview(&profile, as_of_or_today(as_of)?)?;

    if !matches!(format, OutputFormat::Text) {
        return print_json(&overview, format);
    }

    println!("Health Overview (as of {})", overview.as_of);
    println!("=========================");
    match &overview.cycle {
        Some(cycle) => {
            println!("Next period:    {}", cycle.next_period_start.format("%b %d, %Y"));
            println!(
                "Fertile window: {} - {}",
                cycle.fertile_window_start.format("%b %d"),
                cycle.fertile_window_end.format("%b %d")
            );
            println!("Cycle progress: {}%", cycle.cycle_progress_display());
        }
        None => println!("No cycle data yet"),
    }
    if !overview.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &overview.recommendations {
            println!("  - {}", rec.message);
        }
    }
    Ok(())
}

// Error types

#[derive(Debug)]
enum CycleSenseCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Input(cyclesense::ProjectionError),
    Onboarding(OnboardingError),
    Core(cyclesense::Error),
}

impl From<io::Error> for CycleSenseCliError {
    fn from(e: io::Error) -> Self {
        CycleSenseCliError::Io(e)
    }
}

impl From<serde_json::Error> for CycleSenseCliError {
    fn from(e: serde_json::Error) -> Self {
        CycleSenseCliError::Json(e)
    }
}

impl From<cyclesense::ProjectionError> for CycleSenseCliError {
    fn from(e: cyclesense::ProjectionError) -> Self {
        CycleSenseCliError::Input(e)
    }
}

impl From<OnboardingError> for CycleSenseCliError {
    fn from(e: OnboardingError) -> Self {
        CycleSenseCliError::Onboarding(e)
    }
}

impl From<cyclesense::Error> for CycleSenseCliError {
    fn from(e: cyclesense::Error) -> Self {
        CycleSenseCliError::Core(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CycleSenseCliError> for CliError {
    fn from(e: CycleSenseCliError) -> Self {
        match e {
            CycleSenseCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CycleSenseCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CycleSenseCliError::Input(e) => CliError {
                code: "INVALID_INPUT".to_string(),
                message: e.to_string(),
                hint: Some("Dates use YYYY-MM-DD; cycle length is a positive whole number".to_string()),
            },
            CycleSenseCliError::Onboarding(e) => {
                let code = match &e {
                    OnboardingError::Validation(_) => "VALIDATION_ERROR",
                    OnboardingError::DeviceConnection(_) => "DEVICE_CONNECTION_FAILED",
                    OnboardingError::Submission(_) => "SUBMISSION_FAILED",
                    _ => "ONBOARDING_ERROR",
                };
                let hint = match &e {
                    OnboardingError::Validation(_) => Some(
                        "Fill in age, location and ethnicity in the answers file".to_string(),
                    ),
                    OnboardingError::UnknownDevice(_) => {
                        Some("Run 'cyclesense devices' for supported ids".to_string())
                    }
                    OnboardingError::DeviceConnection(_) => {
                        Some("Select a device and connect again".to_string())
                    }
                    _ => None,
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint,
                }
            }
            CycleSenseCliError::Core(e) => CliError {
                code: "COMPUTE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the profile's cycle answers".to_string()),
            },
        }
    }
}
