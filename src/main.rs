//! Lexis - spaced-repetition vocabulary scheduler
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use lexis::config::{lexis_home, Config};
use lexis::error::exit_codes;
use lexis::logging::init_tracing;
use lexis::storage::{JsonFilePersistence, VocabularyStore};

// =============================================================================
// CLI Definition
// =============================================================================

/// Lexis - spaced-repetition vocabulary scheduler
#[derive(Parser)]
#[command(name = "lexis")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Vocabulary file (overrides config and LEXIS_VOCABULARY_FILE)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a word or update its definition, example and tags
    Add {
        /// The word or phrase
        word: String,
        /// Definition text
        #[arg(long, short)]
        definition: String,
        /// Example sentence
        #[arg(long, short, default_value = "")]
        example: String,
        /// Tag (repeatable). Omit to keep existing tags
        #[arg(long = "tag", short)]
        tags: Vec<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Remove a word
    Remove {
        /// The word or phrase
        word: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show a word with its review state
    Show {
        /// The word or phrase
        word: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List vocabulary alphabetically
    List {
        /// Only words with this tag
        #[arg(long, short)]
        tag: Option<String>,
        /// Maximum number of results
        #[arg(long, short)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List words due today, most overdue first
    Due {
        /// Maximum number of results
        #[arg(long, short)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Compose a shuffled review session
    Session {
        /// Number of items (defaults to session.size)
        #[arg(long, short)]
        size: Option<usize>,
        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Record a review result (quality 0-5, out-of-range values are clamped)
    Review {
        /// The word or phrase
        word: String,
        /// Recall quality: 0 blackout .. 5 perfect
        #[arg(allow_negative_numbers = true)]
        quality: i64,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Display learning progress
    Stats {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Export vocabulary as CSV
    Export {
        /// Destination file
        path: PathBuf,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Write a default project config (.lexis/config.toml)
    Init {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Overwrite an existing config
        #[arg(long, short)]
        force: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("lexis error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to `<lexis_home>/crash.log` and exits with the error code.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("lexis panic: {}", info);

        if let Some(home) = lexis_home() {
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::ERROR);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    let config = Config::load_from_cwd(&cwd);
    init_tracing(&config.logging);
    if let Err(e) = config.validate() {
        eprintln!("Warning: {}", e);
    }

    if let Commands::Init { json, quiet, force } = cli.command {
        return Ok(run_init(json, quiet, force, &cwd));
    }

    let store = open_store(cli.file, &config)?;

    let code = match cli.command {
        Commands::Add {
            word,
            definition,
            example,
            tags,
            json,
            quiet,
        } => run_add(&store, &word, definition, example, tags, json, quiet),
        Commands::Remove { word, json, quiet } => run_remove(&store, &word, json, quiet),
        Commands::Show { word, json, quiet } => run_show(&store, &word, json, quiet),
        Commands::List {
            tag,
            limit,
            json,
            quiet,
        } => run_list(&store, tag, limit, json, quiet),
        Commands::Due { limit, json, quiet } => run_due(&store, limit, json, quiet),
        Commands::Session {
            size,
            seed,
            json,
            quiet,
        } => run_session(&store, config, size, seed, json, quiet),
        Commands::Review {
            word,
            quality,
            json,
            quiet,
        } => run_review(&store, &word, quality, json, quiet),
        Commands::Stats { json, quiet } => run_stats(&store, json, quiet),
        Commands::Export { path, json, quiet } => run_export(&store, &path, json, quiet),
        Commands::Init { .. } => unreachable!("handled before the store is opened"),
    };

    Ok(code)
}

type Store = VocabularyStore<JsonFilePersistence>;

/// Open the vocabulary store, reporting load problems on stderr.
fn open_store(file: Option<PathBuf>, config: &Config) -> Result<Store, Box<dyn std::error::Error>> {
    let path = file
        .or_else(|| config.vocabulary_path())
        .ok_or("could not determine vocabulary location (no home directory)")?;

    let clock = Arc::new(config.schedule.clock());
    let (store, outcome) = VocabularyStore::open(JsonFilePersistence::with_path(path), clock);
    if let Some(warning) = outcome.warning() {
        eprintln!("Warning: {}", warning);
    }
    Ok(store)
}

// =============================================================================
// Command Implementations
// =============================================================================

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

/// Print formatted command output unless it is empty.
fn emit(formatted: String) {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
}

fn run_add(
    store: &Store,
    word: &str,
    definition: String,
    example: String,
    tags: Vec<String>,
    json: bool,
    quiet: bool,
) -> ExitCode {
    use lexis::cli::add::{AddCommand, AddOptions};

    let cmd = AddCommand::new(store);
    let options = AddOptions {
        json,
        quiet,
        definition,
        example,
        tags,
    };

    let output = cmd.run(word, &options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

fn run_remove(store: &Store, word: &str, json: bool, quiet: bool) -> ExitCode {
    use lexis::cli::remove::{RemoveCommand, RemoveOptions};

    let cmd = RemoveCommand::new(store);
    let options = RemoveOptions { json, quiet };

    let output = cmd.run(word, &options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

fn run_show(store: &Store, word: &str, json: bool, quiet: bool) -> ExitCode {
    use lexis::cli::show::{ShowCommand, ShowOptions};

    let cmd = ShowCommand::new(store);
    let options = ShowOptions { json, quiet };

    let output = cmd.run(word, &options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

fn run_list(
    store: &Store,
    tag: Option<String>,
    limit: Option<usize>,
    json: bool,
    quiet: bool,
) -> ExitCode {
    use lexis::cli::list::{ListCommand, ListOptions};

    let cmd = ListCommand::new(store);
    let options = ListOptions {
        json,
        quiet,
        tag,
        limit,
    };

    let output = cmd.run(&options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

fn run_due(store: &Store, limit: Option<usize>, json: bool, quiet: bool) -> ExitCode {
    use lexis::cli::due::{DueCommand, DueOptions};

    let cmd = DueCommand::new(store);
    let options = DueOptions { json, quiet, limit };

    let output = cmd.run(&options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

fn run_session(
    store: &Store,
    config: Config,
    size: Option<usize>,
    seed: Option<u64>,
    json: bool,
    quiet: bool,
) -> ExitCode {
    use lexis::cli::session::{SessionCommand, SessionOptions};

    let cmd = SessionCommand::new(store, config);
    let options = SessionOptions {
        json,
        quiet,
        size,
        seed,
    };

    let output = cmd.run(&options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

fn run_review(store: &Store, word: &str, quality: i64, json: bool, quiet: bool) -> ExitCode {
    use lexis::cli::review::{ReviewCommand, ReviewOptions};

    let cmd = ReviewCommand::new(store);
    let options = ReviewOptions { json, quiet };

    let output = cmd.run(word, quality, &options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

fn run_stats(store: &Store, json: bool, quiet: bool) -> ExitCode {
    use lexis::cli::stats::{StatsCommand, StatsOptions};

    let cmd = StatsCommand::new(store);
    let options = StatsOptions { json, quiet };

    let output = cmd.run(&options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

fn run_export(store: &Store, path: &Path, json: bool, quiet: bool) -> ExitCode {
    use lexis::cli::export::{ExportCommand, ExportOptions};

    let cmd = ExportCommand::new(store);
    let options = ExportOptions { json, quiet };

    let output = cmd.run(path, &options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}

fn run_init(json: bool, quiet: bool, force: bool, cwd: &Path) -> ExitCode {
    use lexis::cli::init::{InitCommand, InitOptions};

    let cmd = InitCommand::new(cwd);
    let options = InitOptions { json, quiet, force };

    let output = cmd.run(&options);
    emit(cmd.format_output(&output, &options));
    success_to_exit_code(output.success)
}
