pub mod batch;
pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ConverterConfig, DiscoveryConfig, OutputConfig};
pub use error::{NbBatchError, Result, UserFriendlyError};

// Core functionality re-exports
pub use batch::{BatchConverter, BatchEvent, BatchPlan, BatchReport, FileResult};
pub use converter::{ConversionOutcome, Converter, NbConvert};
pub use scanner::{NotebookFile, NotebookFilter, NotebookScanner};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use std::path::Path;
use tokio::task;

/// Main library interface for batch notebook conversion
pub struct NbBatch {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl NbBatch {
    /// Create a new NbBatch instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::with_shutdown(config, output_mode, verbose, quiet, shutdown))
    }

    /// Create a new NbBatch instance for testing (no signal handler conflicts)
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self::with_shutdown(
            config,
            output_mode,
            verbose,
            quiet,
            GracefulShutdown::new_for_test(),
        )
    }

    fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(output_mode == OutputMode::Human && !quiet);

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create NbBatch instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    fn batch_converter(&self) -> BatchConverter<NbConvert> {
        BatchConverter::new(
            NbConvert::from_config(&self.config.converter),
            &self.config.discovery,
        )
        .with_output_dir(self.config.output_directory())
        .with_shutdown(self.shutdown.clone())
    }

    /// Convert every notebook in the configured directory, printing progress
    /// as it goes, and return the structured report.
    pub async fn convert_notebooks(&self) -> Result<BatchReport> {
        let batch = self.batch_converter();
        let directory = self.config.discovery.directory.clone();
        let mut output =
            ProgressAwareOutput::new(self.output_formatter.clone(), self.progress_manager.clone());

        tracing::info!(
            "Converting notebooks in {} with {}",
            directory.display(),
            self.config.converter.program
        );

        // Conversions block on child processes, one at a time.
        let (report, mut output) = task::spawn_blocking(move || {
            let report = batch.run_with_events(&directory, |event| output.handle_event(event));
            (report, output)
        })
        .await
        .map_err(|e| NbBatchError::Config {
            message: format!("Conversion task failed: {}", e),
        })?;
        let report = report?;

        output.finish(&report);
        self.output_formatter.completion_banner(&report);
        self.output_formatter.print_batch_summary(&report);

        if let Some(ref report_file) = self.config.output.report_file {
            report.save_json(report_file)?;
            self.output_formatter
                .info(&format!("Report written to {}", report_file.display()));
        }

        Ok(report)
    }

    /// Show the invocations a run would perform.
    pub fn plan(&self) -> Result<BatchPlan> {
        let plan = self.batch_converter().plan(&self.config.discovery.directory)?;
        self.output_formatter
            .print_plan(&plan, &self.config.discovery.directory);
        Ok(plan)
    }

    /// Verify the converter executable answers `--version`.
    pub fn check_tool(&self) -> Result<String> {
        let converter = NbConvert::from_config(&self.config.converter);
        let version = converter.check_available()?;
        self.output_formatter.success(&format!(
            "{} is available ({})",
            converter.program(),
            version
        ));
        Ok(version)
    }

    /// Exit status for a finished batch: failures only count in strict mode.
    pub fn exit_code_for(&self, report: &BatchReport) -> i32 {
        if report.cancelled {
            130
        } else if self.config.output.strict && report.has_failures() {
            2
        } else {
            0
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &NbBatchError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convert a directory of notebooks with the default nbconvert invocation,
/// without printing anything.
pub fn convert_directory<P: AsRef<Path>>(directory: P) -> Result<BatchReport> {
    let config = DiscoveryConfig::default();
    BatchConverter::new(NbConvert::new(), &config).run(directory.as_ref())
}
