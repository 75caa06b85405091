//! Relinks `gradle-wrapper.properties` to a locally cached distribution.
//!
//! The `distributionUrl` value moves through a small lifecycle: a remote
//! `https` URL is pointed at the mirror, the archive is fetched into the
//! cache directory, and the line is rewritten to a `file://` URI. Once local
//! the value is never touched again.

use crate::gradlepatch::config::SetupConfig;
use crate::gradlepatch::error::{IoContext, Result, SetupError};
use crate::gradlepatch::gradle::distribution::{self, Downloader};
use crate::gradlepatch::tui::status;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DISTRIBUTION_URL_KEY: &str = "distributionUrl";

static DRIVE_ROOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]:").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionRef {
    /// Already a `file://` URI.
    Local(String),
    /// An `https` URL, with properties-style `\:` escapes removed.
    Remote(String),
    /// Anything else; left alone.
    Unrecognised(String),
}

impl DistributionRef {
    pub fn classify(value: &str) -> Self {
        let unescaped = value.replace("\\:", ":");

        if unescaped.starts_with("file://") {
            Self::Local(value.to_string())
        } else if unescaped.starts_with("https") {
            Self::Remote(unescaped)
        } else {
            Self::Unrecognised(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelinkOutcome {
    AlreadyLocal(String),
    Unrecognised(String),
    Relinked { from: String, to: String },
}

/// The `distributionUrl` entry found in a properties file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionLine<'a> {
    /// Index among the file's lines.
    pub index: usize,
    pub value: &'a str,
}

pub fn find_distribution_url(text: &str) -> Option<DistributionLine<'_>> {
    let prefix = format!("{DISTRIBUTION_URL_KEY}=");

    text.lines().enumerate().find_map(|(index, line)| {
        line.trim()
            .strip_prefix(prefix.as_str())
            .map(|value| DistributionLine {
                index,
                value: value.trim(),
            })
    })
}

/// Replaces line `index` with `distributionUrl=<value>`, keeping its line
/// ending. Every other line is copied byte for byte.
pub fn replace_distribution_url(text: &str, index: usize, value: &str) -> String {
    text.split_inclusive('\n')
        .enumerate()
        .map(|(i, line)| {
            if i != index {
                return line.to_string();
            }

            let ending = if line.ends_with("\r\n") {
                "\r\n"
            } else if line.ends_with('\n') {
                "\n"
            } else {
                ""
            };
            format!("{DISTRIBUTION_URL_KEY}={value}{ending}")
        })
        .collect()
}

/// Points an upstream distribution URL at the mirror, keeping the version path.
pub fn mirror_url(url: &str, upstream: &str, mirror: &str) -> String {
    if upstream.is_empty() {
        return url.to_string();
    }

    url.replacen(upstream, mirror, 1)
}

/// Final path segment of `url`, used as the cache file name.
pub fn archive_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// True for paths that start with a drive designator such as `C:`.
pub fn is_drive_rooted(path: &str) -> bool {
    DRIVE_ROOT.is_match(path)
}

/// `file://` URI for an absolute, `/`-normalised path. Drive-rooted paths
/// need the extra slash so the drive does not read as a host.
pub fn file_uri(path: &str) -> String {
    let normalized = path.replace('\\', "/");

    if is_drive_rooted(&normalized) {
        format!("file:///{normalized}")
    } else {
        format!("file://{normalized}")
    }
}

/// Makes sure a valid archive for `url` sits at `dest`, downloading it when
/// it is missing or (with `revalidate_cache`) fails to open as a zip.
fn ensure_cached(url: &str, dest: &Path, config: &SetupConfig) -> Result<()> {
    if dest.exists() {
        if !config.revalidate_cache {
            status::notice(format!(
                "Gradle distribution already exists locally: {}",
                dest.display()
            ));
            return Ok(());
        }

        match distribution::validate_archive(dest) {
            Ok(_) => {
                status::notice(format!(
                    "Gradle distribution already exists locally: {}",
                    dest.display()
                ));
                return Ok(());
            }
            Err(e) => {
                warn!(path = %dest.display(), "cached distribution rejected: {e}");
                status::warning(format!("Discarding unusable cached archive: {e}"));
                distribution::discard(dest);
            }
        }
    }

    status::notice(format!("Downloading gradle distribution from {url}..."));
    let size = Downloader::new(&config.user_agent)?.fetch_archive(url, dest)?;
    status::success(format!(
        "Download complete! File size: {:.2} MB",
        size as f64 / (1024.0 * 1024.0)
    ));

    Ok(())
}

pub fn relink(
    properties: &Path,
    cache_dir: &Path,
    config: &SetupConfig,
) -> Result<RelinkOutcome> {
    if !properties.exists() {
        return Err(SetupError::MissingFile(properties.to_path_buf()));
    }

    let text = std::fs::read_to_string(properties).at(properties)?;
    let line = find_distribution_url(&text)
        .filter(|line| !line.value.is_empty())
        .ok_or_else(|| SetupError::MissingField {
            field: DISTRIBUTION_URL_KEY,
            path: properties.to_path_buf(),
        })?;

    let remote = match DistributionRef::classify(line.value) {
        DistributionRef::Local(value) => return Ok(RelinkOutcome::AlreadyLocal(value)),
        DistributionRef::Unrecognised(value) => return Ok(RelinkOutcome::Unrecognised(value)),
        DistributionRef::Remote(url) => url,
    };

    let url = mirror_url(
        &remote,
        &config.upstream_distributions,
        &config.mirror_distributions,
    );
    debug!(from = %remote, to = %url, "distribution URL mirrored");

    let name = archive_name(&url).ok_or_else(|| SetupError::UnnamedArchive(url.clone()))?;
    std::fs::create_dir_all(cache_dir).at(cache_dir)?;
    let dest = cache_dir.join(name);

    ensure_cached(&url, &dest, config)?;

    let absolute = std::path::absolute(&dest).at(&dest)?;
    let uri = file_uri(&absolute.to_string_lossy());
    let updated = replace_distribution_url(&text, line.index, &uri);
    std::fs::write(properties, updated).at(properties)?;

    info!(properties = %properties.display(), %uri, "wrapper relinked");
    Ok(RelinkOutcome::Relinked {
        from: format!("{DISTRIBUTION_URL_KEY}={}", line.value),
        to: format!("{DISTRIBUTION_URL_KEY}={uri}"),
    })
}

/// Relinks the wrapper at `properties` to an archive under `cache_dir`,
/// reporting the result. Errors never escape; they turn into `false`.
pub fn fetch_and_relink(properties: &Path, cache_dir: &Path, config: &SetupConfig) -> bool {
    match relink(properties, cache_dir, config) {
        Ok(RelinkOutcome::AlreadyLocal(value)) => {
            status::notice(format!(
                "gradle-wrapper.properties already configured for local distribution: {value}"
            ));
            true
        }
        Ok(RelinkOutcome::Unrecognised(value)) => {
            warn!(%value, "distributionUrl left unchanged");
            status::warning(format!(
                "distributionUrl is neither https nor file://, left unchanged: {value}"
            ));
            true
        }
        Ok(RelinkOutcome::Relinked { from, to }) => {
            status::notice(format!("Updated distributionUrl from: {from}"));
            status::notice(format!("Updated distributionUrl to: {to}"));
            status::success(
                "Updated gradle-wrapper.properties to use the local gradle distribution.",
            );
            true
        }
        Err(e @ (SetupError::MissingFile(_) | SetupError::MissingField { .. })) => {
            status::failure(e);
            false
        }
        Err(e) => {
            status::failure(format!("Failed to modify gradle-wrapper.properties: {e}"));
            false
        }
    }
}
