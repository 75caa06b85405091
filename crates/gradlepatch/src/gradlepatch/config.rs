//! Settings for a setup run, read from `gradlepatch.toml`.
//!
//! Every key is optional; a missing file or key falls back to the Aliyun
//! Maven mirrors and the Tencent Cloud Gradle mirror.

use crate::gradlepatch::error::{IoContext, Result, SetupError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "gradlepatch.toml";

const ALIYUN_REPOSITORIES: &str = r#"        maven { url = uri("https://maven.aliyun.com/repository/gradle-plugin") }
        maven { url = uri("https://maven.aliyun.com/repository/google") }
        maven { url = uri("https://maven.aliyun.com/repository/public") }"#;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Text the repository block is inserted after.
    pub anchor: String,
    /// Presence of this text means the build script is already patched.
    pub marker: String,
    /// Lines inserted on a new line right after `anchor`.
    pub repositories: String,
    /// Prefix of wrapper distribution URLs that gets swapped for `mirror_distributions`.
    pub upstream_distributions: String,
    pub mirror_distributions: String,
    /// Download cache, relative to the project root.
    pub cache_dir: PathBuf,
    pub user_agent: String,
    /// Check that an already cached archive still opens as a zip before trusting it.
    pub revalidate_cache: bool,
    /// Fail instead of warning when a build script has no `anchor`.
    pub require_anchor: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            anchor: "repositories {".to_string(),
            marker: "maven.aliyun.com".to_string(),
            repositories: ALIYUN_REPOSITORIES.to_string(),
            upstream_distributions: "https://services.gradle.org/distributions".to_string(),
            mirror_distributions: "https://mirrors.cloud.tencent.com/gradle".to_string(),
            cache_dir: PathBuf::from("gradle-dist"),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
            revalidate_cache: true,
            require_anchor: false,
        }
    }
}

impl SetupConfig {
    pub fn from_toml(path: &Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|source| SetupError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, otherwise `<project_root>/gradlepatch.toml`
    /// when present, otherwise the defaults.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = project_root.join(CONFIG_FILE_NAME);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = std::fs::read_to_string(&path).at(&path)?;
        Self::from_toml(&path, &text)
    }

    /// The block as it lands in the file: the anchor, a newline, then the repositories.
    pub fn insertion(&self) -> String {
        format!("\n{}", self.repositories)
    }

    pub fn cache_dir_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.cache_dir)
    }
}
