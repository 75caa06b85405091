use clap::Parser;
use std::path::PathBuf;

pub mod program;

/// Points a Flutter project's Android build at regional Maven and Gradle mirrors
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Root of the Flutter project (the directory holding `android/`)
    #[arg(default_value = ".")]
    pub project_root: PathBuf,

    /// Settings file to use instead of `<PROJECT_ROOT>/gradlepatch.toml`
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
