mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pomasa",
    about = "Browse and generate pattern-oriented multi-agent systems",
    version,
    propagate_version = true
)]
struct Cli {
    /// Framework data directory (default: auto-detect from generator.md)
    #[arg(long, global = true, env = "POMASA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI
    Ui {
        /// Port to listen on (default: server.port from config.yaml)
        #[arg(long)]
        port: Option<u16>,
        /// Don't open the browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// List the pattern catalog
    Patterns,

    /// Show the file tree of a MAS directory
    Tree {
        /// Directory to describe
        path: String,
    },

    /// Print the user_input.md a creation would write
    Render {
        /// Answers file (.json, or YAML otherwise)
        #[arg(long)]
        input: PathBuf,
        /// Comma-separated pattern ids (default: Required + Recommended)
        #[arg(long)]
        patterns: Option<String>,
    },

    /// Generate a MAS without the browser
    Create {
        /// Parent directory for the new MAS
        #[arg(long)]
        target: String,
        /// Name of the MAS directory
        #[arg(long)]
        name: String,
        /// Answers file (.json, or YAML otherwise)
        #[arg(long)]
        input: PathBuf,
        /// Comma-separated pattern ids (default: Required + Recommended)
        #[arg(long)]
        patterns: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } | Commands::Create { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let data_dir = root::resolve_from_cwd(cli.data_dir.as_deref());

    let result = match cli.command {
        Commands::Ui { port, no_open } => cmd::ui::run(&data_dir, port, no_open),
        Commands::Patterns => cmd::patterns::run(&data_dir, cli.json),
        Commands::Tree { path } => cmd::tree::run(&path, cli.json),
        Commands::Render { input, patterns } => {
            cmd::render::run(&data_dir, &input, patterns.as_deref())
        }
        Commands::Create {
            target,
            name,
            input,
            patterns,
        } => cmd::create::run(
            &data_dir,
            cmd::create::CreateArgs {
                target: &target,
                name: &name,
                input: &input,
                patterns: patterns.as_deref(),
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
