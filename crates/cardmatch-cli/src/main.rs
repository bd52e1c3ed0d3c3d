use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cardmatch_core::{
    CellClass, ConfidenceTier, Config, DiffRows, DisplayCell, EmployeeSnapshot, ExtractionRecord,
    IdentityString, Report, Severity, Suggestion,
};
use cardmatch_engine::{
    align, normalized_score, project_with_gap, AlignmentResult, BatchRanker, CandidateRanker,
};

/// Cardmatch - identity resolution for scanned work cards
#[derive(Parser)]
#[command(name = "cardmatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: $CARDMATCH_CONFIG, then cardmatch.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank employees against one extracted identity
    Rank {
        /// Identity string as extracted from the card
        extracted: String,

        /// Employee snapshot (JSON array of {id, display_name, identity_string})
        #[arg(short, long)]
        employees: PathBuf,

        /// Print suggestions as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the alignment between two identity strings
    Diff {
        /// Extracted identity
        extracted: String,

        /// Candidate identity
        candidate: String,
    },

    /// Rank a batch of extraction records and write a report
    Batch {
        /// Extraction records (JSON array)
        #[arg(long)]
        cards: PathBuf,

        /// Employee snapshot (JSON array)
        #[arg(short, long)]
        employees: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Write a config file with the default thresholds
    InitConfig {
        /// Destination path
        #[arg(default_value = "cardmatch.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Rank { extracted, employees, json } => {
            rank_command(&config, &extracted, &employees, json, cli.verbose)
        }
        Commands::Diff { extracted, candidate } => {
            diff_command(&config, &extracted, &candidate);
            Ok(())
        }
        Commands::Batch { cards, employees, output, markdown } => {
            let markdown = markdown.as_deref();
            batch_command(&config, &cards, &employees, &output, markdown, cli.verbose).await
        }
        Commands::InitConfig { path, force } => init_config_command(&path, force),
    }
}

/// Resolve config: --config, then $CARDMATCH_CONFIG, then ./cardmatch.toml, then defaults
fn load_config(explicit: Option<&Path>, verbose: bool) -> Result<Config> {
    let from_env = std::env::var_os("CARDMATCH_CONFIG").map(PathBuf::from);
    let path = explicit.map(Path::to_path_buf).or(from_env);

    let config = if let Some(path) = path {
        debug!(path = %path.display(), "Loading config");
        Config::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))?
    } else if Path::new("cardmatch.toml").exists() {
        Config::from_file(Path::new("cardmatch.toml"))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if verbose {
        eprintln!(
            "{} high<={}/{:.2} medium<={}/{:.2} low<={}/{:.2}, max {} suggestions",
            "Tiers:".cyan(),
            config.tiers.high.max_distance,
            config.tiers.high.min_score,
            config.tiers.medium.max_distance,
            config.tiers.medium.min_score,
            config.tiers.low.max_distance,
            config.tiers.low.min_score,
            config.matching.max_suggestions,
        );
    }

    Ok(config)
}

fn load_snapshot(path: &Path, verbose: bool) -> Result<EmployeeSnapshot> {
    let snapshot = EmployeeSnapshot::from_file(path)?;

    if verbose {
        eprintln!(
            "{} {} employees from {} (version {})",
            "Loaded".cyan(),
            snapshot.len(),
            path.display(),
            snapshot.version().short()
        );
    }

    Ok(snapshot)
}

/// Rank command - suggestions for a single extracted identity
fn rank_command(
    config: &Config,
    extracted: &str,
    employees: &Path,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let snapshot = load_snapshot(employees, verbose)?;
    let ranker = CandidateRanker::from_config(config);
    let suggestions = ranker.rank(Some(extracted), snapshot.employees());

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Identity Suggestions".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();
    println!("{} {}", "Extracted:".bold(), extracted.green());
    println!();

    if suggestions.is_empty() {
        if ranker.accepts(Some(extracted)) {
            println!("{}", "No employee is close enough. Search manually.".yellow());
        } else {
            println!(
                "{}",
                format!(
                    "Extracted identity is shorter than {} characters; not compared.",
                    ranker.min_identity_len()
                )
                .yellow()
            );
        }
    } else {
        for (i, suggestion) in suggestions.iter().enumerate() {
            print_suggestion(i + 1, suggestion, config.display.gap_glyph);
        }
    }

    println!("{}", "=".repeat(60).bright_blue());
    Ok(())
}

/// Align and score two identities the way the ranker does, without the comparison floor
fn compare_identities(
    config: &Config,
    extracted: &str,
    candidate: &str,
) -> (AlignmentResult, f64, Option<ConfidenceTier>) {
    let extracted = IdentityString::normalize(extracted);
    let candidate = IdentityString::normalize(candidate);

    let result = align(extracted.as_str(), candidate.as_str());
    let score = normalized_score(result.distance, extracted.char_len(), candidate.char_len());
    let tier = config.tiers.classify(result.distance, score);

    (result, score, tier)
}

/// Diff command - align two identity strings directly
fn diff_command(config: &Config, extracted: &str, candidate: &str) {
    let (result, score, tier) = compare_identities(config, extracted, candidate);

    println!("{} {}", "Distance:".bold(), result.distance);
    println!("{} {:.3}", "Score:".bold(), score);
    match tier {
        Some(tier) => println!("{} {}", "Tier:".bold(), tier_badge(tier)),
        None => println!("{} {}", "Tier:".bold(), "none".dimmed()),
    }
    println!();

    let rows = project_with_gap(&result.alignment, config.display.gap_glyph);
    print_rows(&rows, "  ");
}

/// Batch command - rank every card in a file and write report.json
async fn batch_command(
    config: &Config,
    cards: &Path,
    employees: &Path,
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let snapshot = load_snapshot(employees, verbose)?;

    let contents = std::fs::read_to_string(cards)
        .map_err(|e| anyhow::anyhow!("Failed to read cards file {}: {}", cards.display(), e))?;
    let records: Vec<ExtractionRecord> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse cards file {}: {}", cards.display(), e))?;

    if verbose {
        eprintln!("{} {} cards...", "Ranking".cyan(), records.len());
    }

    let batch = Arc::new(BatchRanker::from_config(config, snapshot));
    let results = Arc::clone(&batch).rank_concurrent(records).await?;
    let report = batch.build_report(results);

    report.save_to_file(output)?;
    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);
    Ok(())
}

/// Init config command - write defaults to disk
fn init_config_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        ));
    }

    Config::default().save_to_file(path)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}

fn tier_badge(tier: ConfidenceTier) -> ColoredString {
    let label = format!("[{}]", tier);
    match tier {
        ConfidenceTier::High => label.green().bold(),
        ConfidenceTier::Medium => label.yellow().bold(),
        ConfidenceTier::Low => label.red(),
    }
}

fn paint(cell: &DisplayCell) -> ColoredString {
    let text = cell.ch.to_string();
    match cell.class {
        CellClass::Match => text.normal(),
        CellClass::SubstituteFrom | CellClass::SubstituteTo => text.yellow().bold(),
        CellClass::Delete => text.red().bold(),
        CellClass::Insert => text.green().bold(),
        CellClass::Gap => text.dimmed(),
    }
}

fn print_rows(rows: &DiffRows, indent: &str) {
    let top: String = rows.extracted.iter().map(|c| paint(c).to_string()).collect();
    let bottom: String = rows.candidate.iter().map(|c| paint(c).to_string()).collect();
    println!("{}extracted  {}", indent, top);
    println!("{}candidate  {}", indent, bottom);
}

fn print_suggestion(position: usize, suggestion: &Suggestion, gap: char) {
    println!(
        "  {}. {} {} ({})",
        position,
        tier_badge(suggestion.tier),
        suggestion.candidate_display_name.bold(),
        suggestion.candidate_id
    );
    println!(
        "     distance {}, score {:.3}",
        suggestion.distance, suggestion.score
    );

    let rows = project_with_gap(&suggestion.alignment, gap);
    print_rows(&rows, "     ");
    println!();
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Work Card Identity Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!("Snapshot: {}", report.snapshot_version);
    println!();

    let summary = &report.summary;
    println!("{}", "Summary:".bold());
    println!("  Cards:            {}", summary.cards_total);
    println!("  Ranked:           {}", summary.cards_ranked);
    println!("  Skipped:          {}", summary.cards_skipped);

    if summary.cards_without_suggestion > 0 {
        println!("  No suggestion:    {}", summary.cards_without_suggestion.to_string().yellow());
    } else {
        println!("  No suggestion:    {}", summary.cards_without_suggestion.to_string().green());
    }

    println!(
        "  Suggestions:      {} high, {} medium, {} low",
        summary.high.to_string().green(),
        summary.medium.to_string().yellow(),
        summary.low.to_string().red()
    );
    println!();

    let flagged: Vec<_> = report
        .cards
        .iter()
        .flat_map(|c| c.diagnostics.iter())
        .chain(report.diagnostics.iter())
        .filter(|d| d.severity >= Severity::Warn)
        .collect();

    if flagged.is_empty() {
        println!("{}", "✓ Every ranked card has a suggestion".green().bold());
    } else {
        println!("{}", "Needs attention:".bold());
        for diag in flagged {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            match &diag.card_id {
                Some(card) => {
                    println!("  [{}] {} {}: {}", severity_str, card, diag.code, diag.message)
                }
                None => println!("  [{}] {}: {}", severity_str, diag.code, diag.message),
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Work Card Identity Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));
    md.push_str(&format!("**Snapshot:** `{}`\n\n", report.snapshot_version));

    let summary = &report.summary;
    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Cards: {}\n", summary.cards_total));
    md.push_str(&format!("- Ranked: {}\n", summary.cards_ranked));
    md.push_str(&format!("- Skipped: {}\n", summary.cards_skipped));
    md.push_str(&format!("- Without suggestion: {}\n", summary.cards_without_suggestion));
    md.push_str(&format!(
        "- Suggestions: {} high / {} medium / {} low\n\n",
        summary.high, summary.medium, summary.low
    ));

    md.push_str("## Cards\n\n");
    for card in &report.cards {
        md.push_str(&format!("### {}\n\n", card.card_id));

        if let Some(extracted) = &card.extracted_identity {
            md.push_str(&format!("**Extracted:** `{}`\n\n", extracted));
        }

        if !card.suggestions.is_empty() {
            md.push_str("| # | Tier | Employee | Distance | Score | Extracted | Candidate |\n");
            md.push_str("|---|------|----------|----------|-------|-----------|-----------|\n");
            for (i, reported) in card.suggestions.iter().enumerate() {
                let s = &reported.suggestion;
                let (top, bottom) = reported.diff.render_plain();
                md.push_str(&format!(
                    "| {} | {} | {} ({}) | {} | {:.3} | `{}` | `{}` |\n",
                    i + 1,
                    s.tier,
                    s.candidate_display_name,
                    s.candidate_id,
                    s.distance,
                    s.score,
                    top,
                    bottom
                ));
            }
            md.push('\n');
        }

        for diag in &card.diagnostics {
            let severity_emoji = match diag.severity {
                Severity::Error => "❌",
                Severity::Warn => "⚠️",
                Severity::Info => "ℹ️",
            };
            md.push_str(&format!("{} **{}** {}\n\n", severity_emoji, diag.code, diag.message));
        }
    }

    if !report.diagnostics.is_empty() {
        md.push_str("## Directory\n\n");
        for diag in &report.diagnostics {
            md.push_str(&format!("- **{}** {}\n", diag.code, diag.message));
            for id in &diag.candidate_ids {
                md.push_str(&format!("  - {}\n", id));
            }
        }
    }

    md
}
