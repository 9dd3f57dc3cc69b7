// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for report generation.

use crate::{
    backtrace::BacktraceFilter,
    errors::{BacktraceFilterBuildError, ConfigParseError},
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

/// Settings for a [`ReportWriter`](crate::writer::ReportWriter).
///
/// Activation is explicit: nothing is written unless [`enabled`](Self::enabled) is true. Deciding
/// whether to enable reporting (for example, by detecting a CI environment) is up to the caller.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ReporterConfig {
    report_dir: Utf8PathBuf,
    clean_before_run: bool,
    enabled: bool,
    tool_name: String,
    #[serde(default)]
    backtrace_filters: Option<Vec<String>>,
}

impl ReporterConfig {
    /// The default location of the config within a directory: `.config/ci-reporter.toml`.
    pub const CONFIG_PATH: &'static str = ".config/ci-reporter.toml";

    /// Contains the default config as a TOML file.
    ///
    /// User configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from `config_file`, or if not specified from `.config/ci-reporter.toml`
    /// within `base_dir`.
    ///
    /// An explicitly specified file must exist. If no file is specified and the default file
    /// doesn't exist, the default config is returned.
    pub fn from_sources(
        base_dir: &Utf8Path,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = base_dir.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        Self::make_default_config()
            .add_source(source)
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|err| ConfigParseError::new(config_file, err))
    }

    /// Returns the default config.
    pub fn default_config() -> Self {
        Self::make_default_config()
            .build()
            .expect("default config is always valid")
            .try_deserialize()
            .expect("default config is always valid")
    }

    /// Returns the directory report files are written to.
    pub fn report_dir(&self) -> &Utf8Path {
        &self.report_dir
    }

    /// Returns true if previous reports are removed before the first report of a run.
    pub fn clean_before_run(&self) -> bool {
        self.clean_before_run
    }

    /// Returns true if reports are written.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the tool name shown in status output.
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Builds the backtrace filter described by this config.
    ///
    /// Uses the default framework fragments unless `backtrace-filters` is set.
    pub fn backtrace_filter(&self) -> Result<BacktraceFilter, BacktraceFilterBuildError> {
        match &self.backtrace_filters {
            Some(fragments) => BacktraceFilter::new(fragments.iter().map(String::as_str)),
            None => Ok(BacktraceFilter::default()),
        }
    }

    /// Sets the report directory.
    pub fn set_report_dir(&mut self, report_dir: impl Into<Utf8PathBuf>) -> &mut Self {
        self.report_dir = report_dir.into();
        self
    }

    /// Sets whether previous reports are removed before the first write.
    pub fn set_clean_before_run(&mut self, clean_before_run: bool) -> &mut Self {
        self.clean_before_run = clean_before_run;
        self
    }

    /// Sets whether reports are written.
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Sets the tool name shown in status output.
    pub fn set_tool_name(&mut self, tool_name: impl Into<String>) -> &mut Self {
        self.tool_name = tool_name.into();
        self
    }

    /// Sets the backtrace filter fragments.
    pub fn set_backtrace_filters(
        &mut self,
        fragments: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        self.backtrace_filters = Some(fragments.into_iter().map(Into::into).collect());
        self
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
