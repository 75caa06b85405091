use crate::gradlepatch::prelude::*;
use std::process::ExitCode;

mod gradlepatch;

fn main() -> ExitCode {
    let argv = Cli::parse();
    let mp = Arc::new(progress::GLOBAL_MP.clone());
    let level = if argv.verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(move || MultiProgressWriter::new(mp.clone()))
        .init();

    match program::program(&argv) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            status::failure(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
