//! `docbridge` CLI - Word ⇄ HTML conversion and heading outlines

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use docbridge::Config;

#[derive(Parser)]
#[command(name = "docbridge")]
#[command(about = "Convert Word documents to HTML and back, and build heading outlines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the soffice binary (skips auto-detection)
    #[arg(long, global = true)]
    soffice: Option<PathBuf>,

    /// Root directory for scratch files
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Converter timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a .docx file to HTML
    Import {
        /// .docx file to convert
        input: PathBuf,

        /// Print `{"html": ...}` instead of raw HTML
        #[arg(long)]
        json: bool,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert HTML (raw or `{"html": ...}` JSON) to a .docx file
    Export {
        /// HTML or JSON file, `-` for stdin
        input: PathBuf,

        /// Output file
        #[arg(short, long, default_value = docbridge::EXPORT_FILENAME)]
        output: PathBuf,
    },

    /// Extract the h1/h2 outline and annotate the markup with heading ids
    Outline {
        /// HTML file, `-` for stdin
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Write the annotated markup to this file
        #[arg(long)]
        write_html: Option<PathBuf>,
    },

    /// Find the scroll offset of a heading in a render snapshot
    Locate {
        /// Snapshot HTML with `data-top` / `data-scroll-top` layout attributes
        snapshot: PathBuf,

        /// Heading text to look for
        text: String,

        /// Pixels to leave above the heading
        #[arg(long, default_value = "100")]
        offset: f64,

        /// Jump without the smooth scroll animation
        #[arg(long)]
        instant: bool,
    },

    /// Show the converter and workspace that would be used
    Doctor,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "docbridge=debug"
    } else {
        "docbridge=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(path) = cli.soffice {
        config.soffice_path = Some(path);
    }
    if let Some(dir) = cli.workspace {
        config.workspace_dir = dir;
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }

    match cli.command {
        Commands::Import {
            input,
            json,
            output,
        } => cmd::cmd_import(&config, &input, json, output).await,
        Commands::Export { input, output } => cmd::cmd_export(&config, &input, &output).await,
        Commands::Outline {
            input,
            format,
            write_html,
        } => cmd::cmd_outline(&input, format, write_html),
        Commands::Locate {
            snapshot,
            text,
            offset,
            instant,
        } => cmd::cmd_locate(&snapshot, &text, offset, instant),
        Commands::Doctor => cmd::cmd_doctor(&config).await,
    }
}
