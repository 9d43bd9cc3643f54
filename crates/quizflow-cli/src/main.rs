//! quizflow CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizflow", version, about = "Take and score quizzes from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz interactively
    Take(commands::take::TakeArgs),

    /// Score a saved answer file offline
    Score {
        /// Path to the quiz .toml file
        #[arg(long)]
        quiz_file: PathBuf,

        /// Answers JSON: a list of {questionId, optionId} or a submission payload
        #[arg(long)]
        answers: PathBuf,

        /// Grading response JSON returned by the quiz API
        #[arg(long)]
        grading: Option<PathBuf>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render a saved result JSON file
    Show {
        /// Result JSON written by `take` or `score --format json`
        #[arg(long)]
        result: PathBuf,

        /// Title shown above the result (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate quiz TOML files
    Validate {
        /// Path to quiz file or directory
        #[arg(long)]
        quiz_file: PathBuf,
    },

    /// Create starter config and example quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizflow=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take(args) => commands::take::execute(args).await,
        Commands::Score {
            quiz_file,
            answers,
            grading,
            format,
            output,
        } => commands::score::execute(quiz_file, answers, grading, format, output),
        Commands::Show {
            result,
            title,
            format,
            output,
        } => commands::show::execute(result, title, format, output),
        Commands::Validate { quiz_file } => commands::validate::execute(quiz_file),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
