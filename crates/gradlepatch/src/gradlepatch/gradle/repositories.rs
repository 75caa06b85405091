use crate::gradlepatch::config::SetupConfig;
use crate::gradlepatch::error::{IoContext, Result, SetupError};
use crate::gradlepatch::tui::status;
use std::path::Path;
use tracing::{debug, warn};

/// A fixed text insertion into a Gradle Kotlin build script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEdit {
    pub anchor: String,
    pub marker: String,
    pub insertion: String,
    pub require_anchor: bool,
}

impl From<&SetupConfig> for RepositoryEdit {
    fn from(config: &SetupConfig) -> Self {
        Self {
            anchor: config.anchor.clone(),
            marker: config.marker.clone(),
            insertion: config.insertion(),
            require_anchor: config.require_anchor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Inserted,
    AlreadyConfigured,
    AnchorMissing,
}

impl RepositoryEdit {
    /// Returns the edited text, or `None` when `content` is left as is.
    pub fn apply(&self, content: &str) -> (Option<String>, PatchOutcome) {
        if content.contains(&self.marker) {
            return (None, PatchOutcome::AlreadyConfigured);
        }

        match content.find(&self.anchor) {
            Some(at) => {
                let end = at + self.anchor.len();
                let mut patched = String::with_capacity(content.len() + self.insertion.len());
                patched.push_str(&content[..end]);
                patched.push_str(&self.insertion);
                patched.push_str(&content[end..]);
                (Some(patched), PatchOutcome::Inserted)
            }
            None => (None, PatchOutcome::AnchorMissing),
        }
    }

    pub fn patch_file(&self, path: &Path) -> Result<PatchOutcome> {
        if !path.exists() {
            return Err(SetupError::MissingFile(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).at(path)?;
        let (patched, outcome) = self.apply(&content);
        debug!(path = %path.display(), ?outcome, "repository edit evaluated");

        if outcome == PatchOutcome::AnchorMissing && self.require_anchor {
            return Err(SetupError::MissingAnchor {
                anchor: self.anchor.clone(),
                path: path.to_path_buf(),
            });
        }

        if let Some(patched) = patched {
            std::fs::write(path, patched).at(path)?;
        }

        Ok(outcome)
    }
}

/// Inserts the mirror repositories into `path`, reporting what happened.
/// Never fails loudly: every error is reported and turned into `false`.
pub fn patch(path: &Path, edit: &RepositoryEdit) -> bool {
    match edit.patch_file(path) {
        Ok(PatchOutcome::Inserted) => {
            status::success(format!("Updated {} with mirror repositories.", path.display()));
            true
        }
        Ok(PatchOutcome::AlreadyConfigured) => {
            status::notice(format!(
                "Mirror repositories already exist in {}.",
                path.display()
            ));
            true
        }
        Ok(PatchOutcome::AnchorMissing) => {
            warn!(
                path = %path.display(),
                anchor = %edit.anchor,
                "anchor not found, file left untouched"
            );
            status::warning(format!(
                "No `{}` block in {}, left unchanged.",
                edit.anchor,
                path.display()
            ));
            true
        }
        Err(e @ SetupError::MissingFile(_)) => {
            status::failure(e);
            false
        }
        Err(e) => {
            status::failure(format!("Failed to modify {}: {e}", path.display()));
            false
        }
    }
}
