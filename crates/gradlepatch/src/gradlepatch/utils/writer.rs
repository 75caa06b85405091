use indicatif::MultiProgress;
use std::io::{self, Write};
use std::sync::Arc;

/// Routes `tracing` output through the shared [`MultiProgress`] so log lines
/// land above an in-flight download bar instead of tearing it.
pub struct MultiProgressWriter {
    mp: Arc<MultiProgress>,
}

impl MultiProgressWriter {
    pub fn new(mp: Arc<MultiProgress>) -> Self {
        Self { mp }
    }
}

impl Write for MultiProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.mp.is_hidden() {
            return io::stderr().write(buf);
        }

        // `println` appends its own newline
        let line = String::from_utf8_lossy(buf);
        self.mp.println(line.trim_end_matches('\n'))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
