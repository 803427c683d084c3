use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nbbatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert every Jupyter notebook in a folder to HTML")]
#[command(
    long_about = "nbbatch runs `jupyter nbconvert --to html --template lab` once per notebook \
                  in a folder (chapters/ by default), writing the HTML next to the notebooks \
                  and reporting which conversions succeeded and which failed."
)]
#[command(after_help = "EXAMPLES:\n  \
    nbbatch\n  \
    nbbatch notebooks --output-dir site\n  \
    nbbatch chapters --template classic --strict\n  \
    nbbatch --dry-run\n  \
    nbbatch --output-format json --report report.json")]
pub struct Cli {
    /// Folder containing the notebooks (defaults to chapters)
    pub directory: Option<PathBuf>,

    /// Folder the HTML files are written to (defaults to the notebook folder)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Notebook file extension
    #[arg(short, long, help = "Notebook file extension (default: ipynb)")]
    pub extension: Option<String>,

    /// Regular expressions for notebook names to skip
    #[arg(long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Converter executable
    #[arg(long, env = "NBBATCH_TOOL", help = "Converter executable (default: jupyter)")]
    pub tool: Option<String>,

    /// Converter subcommand; pass an empty string to call the tool directly
    #[arg(long, help = "Converter subcommand (default: nbconvert)")]
    pub subcommand: Option<String>,

    /// Target format passed as --to
    #[arg(long, help = "Target format (default: html)")]
    pub to: Option<String>,

    /// Template passed as --template
    #[arg(long, help = "Rendering template (default: lab)")]
    pub template: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Exit with a non-zero status when any conversion fails
    #[arg(long)]
    pub strict: bool,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only failures are printed)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show the commands that would run without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Check that the converter can be launched before converting
    #[arg(long)]
    pub check_tool: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_directory(self.directory.clone())
            .with_extension(self.extension.clone())
            .with_exclude(self.exclude.clone())
            .with_program(self.tool.clone())
            .with_subcommand(self.subcommand.clone())
            .with_to(self.to.clone())
            .with_template(self.template.clone())
            .with_output_dir(self.output_dir.clone())
            .with_report_file(self.report.clone())
            .with_strict(self.strict)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_no_arguments_reproduces_defaults() {
        let cli = Cli::try_parse_from(["nbbatch"]).unwrap();
        assert!(cli.directory.is_none());
        assert!(!cli.strict);
        assert!(!cli.dry_run);

        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());
        assert_eq!(config.discovery.directory, Path::new("chapters"));
        assert_eq!(config.output_directory(), Path::new("chapters"));
        assert_eq!(config.converter.template, "lab");
    }

    #[test]
    fn test_overrides_from_arguments() {
        let cli = Cli::try_parse_from([
            "nbbatch",
            "notebooks",
            "--output-dir",
            "site",
            "--template",
            "classic",
            "--exclude",
            "^draft,Copy",
            "--strict",
        ])
        .unwrap();

        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());

        assert_eq!(config.discovery.directory, Path::new("notebooks"));
        assert_eq!(config.output_directory(), Path::new("site"));
        assert_eq!(config.converter.template, "classic");
        assert_eq!(config.discovery.exclude_patterns, vec!["^draft", "Copy"]);
        assert!(config.output.strict);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["nbbatch", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::try_parse_from(["nbbatch", "-vv"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::try_parse_from(["nbbatch", "--quiet"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_output_format_parsing() {
        let cli = Cli::try_parse_from(["nbbatch", "--output-format", "json"]).unwrap();
        assert!(matches!(cli.output_format, OutputFormat::Json));
    }
}
