//! Edits to the Android side of a Flutter project.
//!
//! [`repositories`] inserts mirror Maven repositories into the Kotlin build
//! scripts, [`wrapper`] relinks the Gradle wrapper to a locally cached
//! distribution that [`distribution`] downloads and checks.

pub mod distribution;
pub mod repositories;
pub mod wrapper;

use std::path::{Path, PathBuf};

pub const BUILD_GRADLE_KTS: &str = "android/build.gradle.kts";
pub const SETTINGS_GRADLE_KTS: &str = "android/settings.gradle.kts";
pub const WRAPPER_PROPERTIES: &str = "android/gradle/wrapper/gradle-wrapper.properties";

/// Joins a `/`-separated project-relative path onto `root`.
pub fn project_file(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .fold(root.to_path_buf(), |path, part| path.join(part))
}
