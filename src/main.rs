use android_strings_translator::translate_project;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "android-strings-translator")]
#[command(about = "Translate Android strings.xml resources with an AI provider", long_about = None)]
struct Args {
    /// Android project root (default: current directory)
    #[arg(long, value_name = "PATH")]
    project_dir: Option<PathBuf>,

    /// Log every step at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // RUST_LOG wins over the built-in directive
    let default_directive = if args.verbose {
        "android_strings_translator=debug"
    } else {
        "android_strings_translator=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let project_dir = match args.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };
    if !project_dir.is_dir() {
        eprintln!(
            "Error: project directory '{}' does not exist",
            project_dir.display()
        );
        std::process::exit(1);
    }

    info!("Translating project at {}", project_dir.display());
    let report = translate_project(&project_dir)
        .await
        .with_context(|| format!("Translation of {} failed", project_dir.display()))?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("\n{}", report.render_text());
        println!("Translation completed.");
    }

    Ok(())
}
