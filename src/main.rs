use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use uplift::update::ArchiveFormat;

mod cli;

#[derive(Parser)]
#[command(name = "uplift")]
#[command(about = "Update an application directory from its GitHub releases")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: cli::GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List published releases, newest first
    Releases {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the latest release
    Latest,
    /// Check whether a version is up to date
    Check {
        /// Currently installed version
        version: String,
    },
    /// Show the title and notes of a release
    Show {
        /// Release to show
        version: String,
    },
    /// Compare two version identifiers
    Compare {
        a: String,
        b: String,
    },
    /// Download a release and install it over a directory
    Install {
        /// Release to install (defaults to the latest)
        #[arg(short, long)]
        version: Option<String>,
        /// Directory to install into
        #[arg(short, long)]
        root: PathBuf,
        /// Directory for the download and extraction
        #[arg(short, long)]
        temp: Option<PathBuf>,
        /// Archive format to download (zip or tar.gz)
        #[arg(short, long)]
        format: Option<ArchiveFormat>,
        /// Skip the backup confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    let result = match cli.command {
        Commands::Releases { json } => cli::releases::list(&global, json).await,
        Commands::Latest => cli::releases::latest(&global).await,
        Commands::Check { version } => cli::check::run(&global, &version).await,
        Commands::Show { version } => cli::releases::show(&global, &version).await,
        Commands::Compare { a, b } => cli::compare::run(&a, &b),
        Commands::Install {
            version,
            root,
            temp,
            format,
            yes,
        } => {
            cli::install::run(
                &global,
                cli::install::InstallOptions {
                    version,
                    root,
                    temp,
                    format,
                    yes,
                },
            )
            .await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", uplift::format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
