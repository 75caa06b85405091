use crate::gradlepatch::cli::Cli;
use crate::gradlepatch::config::SetupConfig;
use crate::gradlepatch::gradle::repositories::{self, RepositoryEdit};
use crate::gradlepatch::gradle::{self, wrapper};
use crate::gradlepatch::tui::status;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, info_span};

/// Runs every setup step against `project_root`. Steps are independent: a
/// failing one is reported and the rest still run. Returns `true` only if all
/// of them succeeded or had nothing to do.
pub fn run(project_root: &Path, config: &SetupConfig) -> bool {
    let _span = info_span!("setup", root = %project_root.display()).entered();
    let edit = RepositoryEdit::from(config);
    let mut success = true;

    for script in [gradle::BUILD_GRADLE_KTS, gradle::SETTINGS_GRADLE_KTS] {
        let path = gradle::project_file(project_root, script);
        debug!(path = %path.display(), "patching repositories");
        success &= repositories::patch(&path, &edit);
    }

    let properties = gradle::project_file(project_root, gradle::WRAPPER_PROPERTIES);
    success &= wrapper::fetch_and_relink(&properties, &config.cache_dir_in(project_root), config);

    success
}

pub fn program(argv: &Cli) -> anyhow::Result<bool> {
    let project_root = std::path::absolute(&argv.project_root).with_context(|| {
        format!("Failed to resolve project root {}", argv.project_root.display())
    })?;
    let config = SetupConfig::load(&project_root, argv.config.as_deref())
        .context("Failed to load gradlepatch settings")?;

    status::banner("Starting Flutter project proxy setup...");
    let success = run(&project_root, &config);
    status::separator();

    if success {
        status::success("Flutter project setup complete!");
    } else {
        status::failure("Flutter project setup completed with some errors.");
    }

    Ok(success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradlepatch::gradle::distribution::zip_fixture;
    use crate::gradlepatch::utils::test_server::{TestServer, unreachable_base};
    use clap::Parser;
    use tempfile::{TempDir, tempdir};

    const BUILD_SCRIPT: &str = "allprojects {\n    repositories {\n        google()\n    }\n}\n";
    const SETTINGS_SCRIPT: &str = "pluginManagement {\n    repositories {\n        gradlePluginPortal()\n    }\n}\ninclude(\":app\")\n";
    const PROPERTIES: &str = "distributionBase=GRADLE_USER_HOME\ndistributionUrl=https\\://services.gradle.org/distributions/gradle-8.0-all.zip\n";

    fn flutter_project() -> TempDir {
        let root = tempdir().unwrap();
        let write = |relative: &str, content: &str| {
            let path = gradle::project_file(root.path(), relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        };

        write(gradle::BUILD_GRADLE_KTS, BUILD_SCRIPT);
        write(gradle::SETTINGS_GRADLE_KTS, SETTINGS_SCRIPT);
        write(gradle::WRAPPER_PROPERTIES, PROPERTIES);
        root
    }

    fn read(root: &Path, relative: &str) -> String {
        std::fs::read_to_string(gradle::project_file(root, relative)).unwrap()
    }

    #[test]
    fn full_setup_succeeds_and_is_repeatable() {
        let server = TestServer::start(zip_fixture());
        let project = flutter_project();
        let config = SetupConfig {
            mirror_distributions: format!("{}/gradle", server.base_url),
            ..SetupConfig::default()
        };

        assert!(run(project.path(), &config));
        let build = read(project.path(), gradle::BUILD_GRADLE_KTS);
        let settings = read(project.path(), gradle::SETTINGS_GRADLE_KTS);
        let properties = read(project.path(), gradle::WRAPPER_PROPERTIES);

        assert!(build.contains("maven.aliyun.com/repository/google"));
        assert!(settings.contains("maven.aliyun.com/repository/gradle-plugin"));
        assert!(properties.contains("distributionUrl=file://"));
        assert!(project.path().join("gradle-dist").join("gradle-8.0-all.zip").is_file());

        assert!(run(project.path(), &config));
        assert_eq!(read(project.path(), gradle::BUILD_GRADLE_KTS), build);
        assert_eq!(read(project.path(), gradle::SETTINGS_GRADLE_KTS), settings);
        assert_eq!(read(project.path(), gradle::WRAPPER_PROPERTIES), properties);
        assert_eq!(server.requests(), 2);
    }

    #[test]
    fn failing_step_does_not_stop_the_others() {
        let project = flutter_project();
        std::fs::remove_file(gradle::project_file(
            project.path(),
            gradle::BUILD_GRADLE_KTS,
        ))
        .unwrap();
        let config = SetupConfig {
            mirror_distributions: format!("{}/gradle", unreachable_base()),
            ..SetupConfig::default()
        };

        assert!(!run(project.path(), &config));
        assert!(read(project.path(), gradle::SETTINGS_GRADLE_KTS).contains("maven.aliyun.com"));
        assert_eq!(read(project.path(), gradle::WRAPPER_PROPERTIES), PROPERTIES);
        assert!(!project.path().join("gradle-dist").join("gradle-8.0-all.zip").exists());
    }

    #[test]
    fn program_reads_project_settings() {
        let project = flutter_project();
        std::fs::write(
            project.path().join("gradlepatch.toml"),
            format!(
                "mirror_distributions = \"{}/gradle\"\ncache_dir = \"dist-cache\"\n",
                unreachable_base()
            ),
        )
        .unwrap();
        let cache = project.path().join("dist-cache");
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache.join("gradle-8.0-all.zip"), zip_fixture()).unwrap();

        let argv = Cli::try_parse_from(["gradlepatch", project.path().to_str().unwrap()]).unwrap();
        assert!(program(&argv).unwrap());
        assert!(
            read(project.path(), gradle::WRAPPER_PROPERTIES)
                .contains("/dist-cache/gradle-8.0-all.zip")
        );
    }

    #[test]
    fn broken_settings_file_is_an_error() {
        let project = flutter_project();
        std::fs::write(project.path().join("gradlepatch.toml"), "cache_dir = [").unwrap();

        let argv = Cli::try_parse_from(["gradlepatch", project.path().to_str().unwrap()]).unwrap();
        assert!(program(&argv).is_err());
        assert_eq!(read(project.path(), gradle::WRAPPER_PROPERTIES), PROPERTIES);
    }
}
