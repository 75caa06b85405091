pub mod prelude {
	pub use crate::gradlepatch::cli::{program, Cli};
	pub use crate::gradlepatch::tui::{progress, status};
	pub use crate::gradlepatch::utils::writer::MultiProgressWriter;
	pub use clap::Parser;
	pub use std::sync::Arc;
	pub use tracing::Level;
	pub use tracing_subscriber::fmt::format::FmtSpan;
}

pub mod cli;
pub mod config;
pub mod error;
pub mod gradle;
pub mod tui;
pub mod utils;
