//! CLI entry point for utterances-rs

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utterances_rs::Site;

#[derive(Parser)]
#[command(name = "utterances-rs")]
#[command(author)]
#[command(version)]
#[command(about = "A blog generator that renders social preview cards for every post", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate pages and social preview documents
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Rasterize previews to PNG with the configured command
        #[arg(long)]
        png: bool,
    },

    /// Render the preview document for a single post
    Preview {
        /// Slug of the post
        slug: String,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List published posts
    List,

    /// Create a new post
    New {
        /// Title of the new post
        title: String,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "utterances_rs=debug,info"
    } else {
        "utterances_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Generate { watch, png } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            let report = site.generate(png)?;

            if watch {
                for failure in &report.failures {
                    tracing::error!("{}", failure);
                }
                tracing::info!("Watching for file changes...");
                utterances_rs::commands::generate::watch(&site, png).await?;
            } else if !report.is_success() {
                for failure in &report.failures {
                    eprintln!("  {}", failure);
                }
                bail!(
                    "{} of {} posts failed",
                    report.failures.len(),
                    report.failures.len() + report.built.len()
                );
            } else {
                println!("Generated successfully!");
            }
        }

        Commands::Preview { slug, output } => {
            let site = Site::new(&base_dir)?;
            utterances_rs::commands::preview::run(&site, &slug, output.as_deref())?;
        }

        Commands::List => {
            let site = Site::new(&base_dir)?;
            utterances_rs::commands::list::run(&site)?;
        }

        Commands::New { title } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = site.new_post(&title)?;
            println!("Created: {:?}", path);
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("utterances-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
