// Noteforge — CLI entry point
//
// Reads an extracted article from a JSON file, runs the two-role dialogue,
// prints the resulting notes, and optionally appends them to a markdown
// file. Ctrl-C cancels the running session cooperatively.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use noteforge::config::load_settings;
use noteforge::dialogue::{DialogueOrchestrator, Phase, ProgressCallback, ProgressUpdate};
use noteforge::notes::validate;
use noteforge::sink::{MarkdownSink, NoteSink};
use noteforge::Article;

#[derive(Parser)]
#[command(name = "noteforge", version, about = "Distill an article into atomic notes")]
struct Cli {
    /// Path to the article JSON file ({title, content, url, siteName?, excerpt?})
    article: PathBuf,

    /// Markdown file to append the notes to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the alignment phase round budget
    #[arg(long)]
    alignment_rounds: Option<usize>,

    /// Override the refinement loop round budget
    #[arg(long)]
    refinement_rounds: Option<usize>,

    /// Skip printing advisory validation issues
    #[arg(long)]
    no_validate: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = load_settings()?;
    if let Some(rounds) = cli.alignment_rounds {
        settings.alignment.max_rounds = rounds.max(1);
    }
    if let Some(rounds) = cli.refinement_rounds {
        settings.refinement.max_rounds = rounds.max(1);
    }

    let contents = fs::read_to_string(&cli.article)
        .with_context(|| format!("Failed to read article file {}", cli.article.display()))?;
    let article: Article =
        serde_json::from_str(&contents).context("Article file is not valid article JSON")?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            eprintln!("\ncancelling...");
            cancel.cancel();
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let progress: &ProgressCallback<'_> = &|update: ProgressUpdate| {
        let round = match (update.current_round, update.max_rounds) {
            (Some(current), Some(max)) => format!(" [{current}/{max}]"),
            _ => String::new(),
        };
        eprintln!("{}{round} {}", update.phase, update.message);
    };

    let orchestrator = DialogueOrchestrator::from_settings(settings.clone())?;
    let result = orchestrator
        .process(article, Some(progress), cancel)
        .await;

    eprintln!("api calls: {}", result.total_api_calls);

    if result.state.phase == Phase::Error {
        eprintln!(
            "error: {}",
            result.state.last_error.as_deref().unwrap_or("unknown")
        );
        if result.notes.is_empty() {
            return Ok(ExitCode::FAILURE);
        }
        eprintln!("returning partial notes from the last draft");
    }

    if result.notes.is_empty() {
        eprintln!("no extractable notes in the final draft");
        return Ok(ExitCode::FAILURE);
    }

    for note in &result.notes {
        println!("{}\n", note.raw);
        if !cli.no_validate {
            let validation = validate(note, &result.article.url, &settings.rules);
            for issue in &validation.issues {
                eprintln!("  note \"{}\": {issue}", note.heading);
            }
        }
    }

    if let Some(path) = cli.output {
        MarkdownSink::new(path).append(&result.notes, &result.article)?;
    }

    Ok(ExitCode::SUCCESS)
}
