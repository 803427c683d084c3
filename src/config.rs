use crate::error::{NbBatchError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub converter: ConverterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub directory: PathBuf,
    pub extension: String,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub program: String,
    pub subcommand: Option<String>,
    pub to: String,
    pub template: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the converter writes HTML; defaults to the notebook directory.
    pub directory: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
    pub strict: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("chapters"),
            extension: "ipynb".to_string(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "jupyter".to_string(),
            subcommand: Some("nbconvert".to_string()),
            to: "html".to_string(),
            template: "lab".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(NbBatchError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| NbBatchError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| NbBatchError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["nbbatch.toml", ".nbbatch.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref directory) = cli_args.directory {
            self.discovery.directory = directory.clone();
        }

        if let Some(ref extension) = cli_args.extension {
            self.discovery.extension = extension.trim_start_matches('.').to_string();
        }

        if let Some(ref exclude) = cli_args.exclude {
            self.discovery.exclude_patterns.extend(exclude.clone());
        }

        if let Some(ref program) = cli_args.program {
            self.converter.program = program.clone();
        }

        if let Some(ref subcommand) = cli_args.subcommand {
            // An empty subcommand means the tool is invoked directly.
            self.converter.subcommand = if subcommand.is_empty() {
                None
            } else {
                Some(subcommand.clone())
            };
        }

        if let Some(ref to) = cli_args.to {
            self.converter.to = to.clone();
        }

        if let Some(ref template) = cli_args.template {
            self.converter.template = template.clone();
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.directory = Some(output_dir.clone());
        }

        if let Some(ref report_file) = cli_args.report_file {
            self.output.report_file = Some(report_file.clone());
        }

        if cli_args.strict {
            self.output.strict = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.discovery.extension.trim().is_empty() {
            return Err(NbBatchError::Config {
                message: "Notebook extension must not be empty".to_string(),
            });
        }

        if self.converter.program.trim().is_empty() {
            return Err(NbBatchError::Config {
                message: "Converter program must not be empty".to_string(),
            });
        }

        if self.converter.to.trim().is_empty() {
            return Err(NbBatchError::Config {
                message: "Target format must not be empty".to_string(),
            });
        }

        if self.converter.template.trim().is_empty() {
            return Err(NbBatchError::Config {
                message: "Template name must not be empty".to_string(),
            });
        }

        for pattern in &self.discovery.exclude_patterns {
            Regex::new(pattern).map_err(|e| NbBatchError::Config {
                message: format!("Invalid exclude pattern '{}': {}", pattern, e),
            })?;
        }

        if let Some(ref report_file) = self.output.report_file {
            if let Some(parent) = report_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(NbBatchError::Config {
                        message: format!(
                            "Report directory does not exist: {}",
                            parent.display()
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    /// Directory the converter writes into.
    pub fn output_directory(&self) -> &Path {
        self.output
            .directory
            .as_deref()
            .unwrap_or(&self.discovery.directory)
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub directory: Option<PathBuf>,
    pub extension: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub program: Option<String>,
    pub subcommand: Option<String>,
    pub to: Option<String>,
    pub template: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
    pub strict: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_program(mut self, program: Option<String>) -> Self {
        self.program = program;
        self
    }

    pub fn with_subcommand(mut self, subcommand: Option<String>) -> Self {
        self.subcommand = subcommand;
        self
    }

    pub fn with_to(mut self, to: Option<String>) -> Self {
        self.to = to;
        self
    }

    pub fn with_template(mut self, template: Option<String>) -> Self {
        self.template = template;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_report_file(mut self, report_file: Option<PathBuf>) -> Self {
        self.report_file = report_file;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
