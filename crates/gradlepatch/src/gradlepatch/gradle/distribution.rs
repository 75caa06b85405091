use crate::gradlepatch::error::{IoContext, Result, SetupError};
use crate::gradlepatch::tui::progress;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_LENGTH;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

pub const CHUNK_SIZE: usize = 8 * 1024;

pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(SetupError::Client)?;

        Ok(Self { client })
    }

    /// Size advertised by a HEAD request. `None` when the server does not
    /// say (or says something unusable), which only degrades the progress bar.
    pub fn content_length(&self, url: &str) -> Result<Option<u64>> {
        let response = self
            .client
            .head(url)
            .send()
            .map_err(|source| SetupError::Network {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            debug!(url, status = %response.status(), "HEAD not successful, size unknown");
            return Ok(None);
        }

        let length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|&len| len > 0);

        debug!(url, ?length, "HEAD content length");
        Ok(length)
    }

    /// Streams `url` into `dest`, then checks the result opens as a zip
    /// archive. Whatever goes wrong, `dest` is removed again so the next run
    /// starts clean.
    pub fn fetch_archive(&self, url: &str, dest: &Path) -> Result<u64> {
        let result = self
            .download(url, dest)
            .and_then(|_| validate_archive(dest));

        if result.is_err() {
            discard(dest);
        }

        result
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let spinner = progress::create_spinner("Checking distribution size...");
        let total = self.content_length(url);
        spinner.finish_and_clear();
        let total = total?;

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|source| SetupError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let name = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());
        let pb = progress::create_bytes_progress(format!("Downloading {name}"), total);

        let mut file = BufWriter::new(File::create(dest).at(dest)?);
        let mut buf = [0u8; CHUNK_SIZE];
        let mut received = 0u64;

        loop {
            let n = match response.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    pb.abandon();
                    return Err(SetupError::Interrupted {
                        url: url.to_string(),
                        source,
                    });
                }
            };

            file.write_all(&buf[..n]).at(dest)?;
            received += n as u64;
            pb.inc(n as u64);
        }

        file.flush().at(dest)?;
        pb.finish_and_clear();

        debug!(url, received, "download finished");
        Ok(received)
    }
}

/// Checks that `path` is a non-empty file that opens as a zip archive and
/// returns its size.
pub fn validate_archive(path: &Path) -> Result<u64> {
    let len = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => 0,
        Err(e) => return Err(SetupError::io(path, e)),
    };

    if len == 0 {
        return Err(SetupError::EmptyArchive(path.to_path_buf()));
    }

    let file = File::open(path).at(path)?;
    ZipArchive::new(file).map_err(|source| SetupError::CorruptArchive {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(len)
}

/// Best-effort removal of a partial or rejected download.
pub fn discard(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed rejected download"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), "could not remove rejected download: {e}"),
    }
}

#[cfg(test)]
pub(crate) fn zip_fixture() -> Vec<u8> {
    use std::io::Cursor;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("gradle-8.0/bin/gradle", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"#!/bin/sh\nexec java \"$@\"\n").unwrap();
    writer.finish().unwrap().into_inner()
}
