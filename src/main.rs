use clap::{Args, Parser, Subcommand};
use ffs_calculator::assessment::domain::{AnswerSet, Dimension};
use ffs_calculator::assessment::history::CsvHistoryStore;
use ffs_calculator::assessment::{
    summarize, AssessmentOutcome, AssessmentService, AssessmentSubmission, ReportRenderer,
};
use ffs_calculator::config::AppConfig;
use ffs_calculator::error::AppError;
use ffs_calculator::telemetry;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "ffs-calculator",
    about = "Score, track, and report the Functional Freedom Score from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a completed answer set and append it to the history
    Assess(AssessArgs),
    /// Show stored assessments and progress statistics
    History(HistoryArgs),
    /// Show recommendations for the most recent stored assessment
    Recommend(RecommendArgs),
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// JSON file with raw answers per dimension code, e.g. {"R":[5,6,7,8,9],...}
    #[arg(long)]
    answers: PathBuf,
    /// Weighting profile: personal_growth, creativity, ethics, or ai
    #[arg(long)]
    context: String,
    /// Write the rendered report document to this path
    #[arg(long)]
    export: Option<PathBuf>,
    /// Emit the outcome as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// Show only the most recent N records
    #[arg(long)]
    limit: Option<usize>,
    /// Emit records and statistics as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Write the rendered report document to this path
    #[arg(long)]
    export: Option<PathBuf>,
    /// Emit the outcome as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = CsvHistoryStore::new(config.history.path.clone());
    let mut service = AssessmentService::new(store, config.scoring.recommendation_threshold);

    match cli.command {
        Command::Assess(args) => run_assess(&mut service, args),
        Command::History(args) => run_history(&service, args),
        Command::Recommend(args) => run_recommend(&service, args),
    }
}

fn run_assess(
    service: &mut AssessmentService<CsvHistoryStore>,
    args: AssessArgs,
) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.answers)?;
    let answers: AnswerSet = serde_json::from_str(&raw).map_err(|err| {
        AppError::Input(format!(
            "answers file '{}' is not a valid answer set: {err}",
            args.answers.display()
        ))
    })?;

    let outcome = service.submit(AssessmentSubmission {
        context: args.context,
        answers,
    })?;

    // Scores and recommendations reach the user before any export attempt,
    // so a failed export only ever loses the document.
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome).unwrap_or_default());
    } else {
        print_outcome(&outcome);
    }

    if let Some(path) = args.export {
        export_report(&outcome, &path)?;
    }

    Ok(())
}

fn run_history(
    service: &AssessmentService<CsvHistoryStore>,
    args: HistoryArgs,
) -> Result<(), AppError> {
    let records = service.history();
    let summary = summarize(&records);

    let shown = match args.limit {
        Some(limit) if limit < records.len() => &records[records.len() - limit..],
        _ => &records[..],
    };

    if args.json {
        let payload = json!({ "records": shown, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
        return Ok(());
    }

    if records.is_empty() {
        println!("No assessments recorded yet. Run `ffs-calculator assess` first.");
        return Ok(());
    }

    for record in shown {
        let mut line = format!(
            "{}  {:<16}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.context
        );
        for dimension in Dimension::ordered() {
            line.push_str(&format!(
                "  {} {:>4.1}",
                dimension.code(),
                record.scores.get(dimension)
            ));
        }
        line.push_str(&format!("  FFS {:.2}", record.composite));
        println!("{line}");
    }

    if let Some(summary) = summary {
        println!();
        println!("Assessments: {}", summary.assessments);
        match summary.latest_delta {
            Some(delta) => println!(
                "Latest FFS: {:.2} ({delta:+.2})",
                summary.latest_composite
            ),
            None => println!("Latest FFS: {:.2}", summary.latest_composite),
        }
        println!("Mean FFS: {:.2}", summary.mean_composite);
    }

    Ok(())
}

fn run_recommend(
    service: &AssessmentService<CsvHistoryStore>,
    args: RecommendArgs,
) -> Result<(), AppError> {
    let Some(outcome) = service.latest_outcome() else {
        println!("No assessments recorded yet. Run `ffs-calculator assess` first.");
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome).unwrap_or_default());
    } else {
        print_outcome(&outcome);
        println!();
        if outcome.recommendations.is_empty() {
            println!("All dimensions are at or above the threshold. Keep the balance.");
        } else {
            for line in development_plan(&outcome) {
                println!("{line}");
            }
        }
    }

    if let Some(path) = args.export {
        export_report(&outcome, &path)?;
    }

    Ok(())
}

fn print_outcome(outcome: &AssessmentOutcome) {
    match &outcome.delta {
        Some(delta) => println!("Overall FFS: {:.2} ({:+.2})", outcome.composite, delta.composite),
        None => println!("Overall FFS: {:.2}", outcome.composite),
    }
    println!("Context: {}", outcome.context);

    for dimension in Dimension::ordered() {
        let mut line = format!(
            "  {}: {:.1}/10",
            dimension.label(),
            outcome.scores.get(dimension)
        );
        if let Some(delta) = &outcome.delta {
            line.push_str(&format!(" ({:+.1})", delta.dimension(dimension)));
        }
        println!("{line}");
    }

    if !outcome.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for (dimension, guidance) in &outcome.recommendations {
            println!("  {}:", dimension.label());
            for advice in guidance {
                println!("    - {advice}");
            }
        }
    }

    if !outcome.persisted {
        eprintln!("warning: this result could not be saved to the history file");
    }
}

/// Focus list of the under-threshold dimensions plus the fixed practice
/// schedule; shown only when at least one dimension needs work.
fn development_plan(outcome: &AssessmentOutcome) -> Vec<String> {
    let mut lines = vec![
        "Development Plan:".to_string(),
        "  Focus on these dimensions:".to_string(),
    ];
    for dimension in outcome.recommendations.keys() {
        lines.push(format!("    - {}", dimension.label()));
    }
    lines.push("  Suggested schedule:".to_string());
    lines.push("    1. Set aside 15-20 minutes of practice daily".to_string());
    lines.push("    2. Start with the weakest dimension".to_string());
    lines.push("    3. Review progress after a week".to_string());
    lines.push("    4. Adjust the approach based on results".to_string());
    lines
}

fn export_report(outcome: &AssessmentOutcome, path: &Path) -> Result<(), AppError> {
    let report = ReportRenderer::new().render(outcome);
    if report.degraded() {
        info!("report characters were substituted for the export encoding");
    }
    std::fs::write(path, report.bytes())?;
    println!("Report written to {}", path.display());
    Ok(())
}
