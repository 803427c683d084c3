use crate::batch::{BatchEvent, BatchPlan, BatchReport, FileResult};
use crate::converter::ConversionOutcome;
use crate::error::{NbBatchError, UserFriendlyError};
use crate::ui::progress::{self, format_duration, ProgressManager};
use console::{style, Emoji, Term};
use indicatif::ProgressBar;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "[OK] ");
static CROSS: Emoji = Emoji("❌ ", "[ERROR] ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static PARTY: Emoji = Emoji("🎉 ", "");

#[derive(Clone)]
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    // Batch progress lines
    pub fn notebooks_discovered(&self, directory: &Path, count: usize) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "discovered",
                "directory": directory.display().to_string(),
                "count": count,
            })),
            _ => println!("{}", discovered_line(count)),
        }
    }

    pub fn converting(&self, notebook: &Path) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "converting",
                "notebook": notebook.display().to_string(),
            })),
            _ => println!("Convirtiendo: {}", notebook.display()),
        }
    }

    /// Failures are printed even in quiet mode.
    pub fn converted(&self, result: &FileResult) {
        if result.outcome.is_success() && !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Json => {
                let mut object = serde_json::json!({
                    "type": "converted",
                    "duration_ms": result.duration.as_millis() as u64,
                });
                if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(result) {
                    for (key, value) in fields {
                        if key != "duration" {
                            object[key] = value;
                        }
                    }
                }
                self.print_json_object(&object);
            }
            OutputMode::Human => {
                let line = outcome_line(result);
                match (&result.outcome, self.use_colors) {
                    (ConversionOutcome::Success, true) => {
                        println!("{}{}", CHECKMARK, style(line).green())
                    }
                    (ConversionOutcome::Failure { .. }, true) => {
                        println!("{}{}", CROSS, style(line).red())
                    }
                    (ConversionOutcome::Success, false) => println!("{}{}", CHECKMARK, line),
                    (ConversionOutcome::Failure { .. }, false) => println!("{}{}", CROSS, line),
                }
            }
            OutputMode::Plain => {
                let marker = if result.outcome.is_success() {
                    "[OK]"
                } else {
                    "[ERROR]"
                };
                println!("{} {}", marker, outcome_line(result));
            }
        }
    }

    /// The closing banner; an interrupted batch did not complete.
    pub fn completion_banner(&self, report: &BatchReport) {
        if report.cancelled || !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Json => self.print_json_message("completed", COMPLETION_MESSAGE),
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}{}", PARTY, style(COMPLETION_MESSAGE).bold());
                } else {
                    println!("{}{}", PARTY, COMPLETION_MESSAGE);
                }
            }
            OutputMode::Plain => {
                println!();
                println!("{}", COMPLETION_MESSAGE);
            }
        }
    }

    // Summary and reporting
    pub fn print_batch_summary(&self, report: &BatchReport) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Json => {
                // One line, like every other event on the JSON stream.
                let json_output =
                    serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Human | OutputMode::Plain => {
                let mut summary = format!(
                    "Resumen: {} convertidos, {} con errores ({})",
                    report.succeeded(),
                    report.failed(),
                    format_duration(report.elapsed)
                );
                if report.cancelled {
                    summary.push_str(&format!(", {} sin procesar", report.skipped()));
                }

                if self.use_colors {
                    println!("{}", style(summary).dim());
                } else {
                    println!("{}", summary);
                }
            }
        }
    }

    pub fn print_plan(&self, plan: &BatchPlan, directory: &Path) {
        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "plan",
                "directory": directory.display().to_string(),
                "invocations": plan.invocations,
                "warnings": plan.warnings,
            })),
            _ => {
                for warning in &plan.warnings {
                    self.warning(warning);
                }
                println!("{}", discovered_line(plan.invocations.len()));
                for invocation in &plan.invocations {
                    println!("  {}", invocation);
                }
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &NbBatchError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        let emoji = match msg_type {
            MessageType::Success => CHECKMARK,
            MessageType::Error => CROSS,
            MessageType::Warning => WARNING,
            MessageType::Info => INFO,
        };

        if self.use_colors {
            let styled = match msg_type {
                MessageType::Success => style(message).green().bold(),
                MessageType::Error => style(message).red().bold(),
                MessageType::Warning => style(message).yellow().bold(),
                MessageType::Info => style(message).cyan(),
            };
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, message),
                _ => println!("{}{}", emoji, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

const COMPLETION_MESSAGE: &str = "Conversión completada!";

fn discovered_line(count: usize) -> String {
    format!("Encontrados {} notebooks para convertir...", count)
}

fn outcome_line(result: &FileResult) -> String {
    match &result.outcome {
        ConversionOutcome::Success => {
            format!("Convertido exitosamente: {}", result.display_path())
        }
        ConversionOutcome::Failure { message } => {
            format!("Error convirtiendo {}: {}", result.display_path(), message)
        }
    }
}

/// Prints batch events while keeping the progress bar out of the way.
pub struct ProgressAwareOutput {
    formatter: OutputFormatter,
    progress_manager: ProgressManager,
    progress_bar: Option<ProgressBar>,
}

impl ProgressAwareOutput {
    pub fn new(formatter: OutputFormatter, progress_manager: ProgressManager) -> Self {
        Self {
            formatter,
            progress_manager,
            progress_bar: None,
        }
    }

    fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        self.progress_manager.suspend(|| f(&self.formatter));
    }

    pub fn handle_event(&mut self, event: BatchEvent<'_>) {
        match event {
            BatchEvent::Warning(message) => self.suspend_and_print(|f| f.warning(message)),
            BatchEvent::Discovered { directory, count } => {
                self.suspend_and_print(|f| f.notebooks_discovered(directory, count));
                self.progress_bar = Some(
                    self.progress_manager
                        .create_notebook_progress(count as u64),
                );
            }
            BatchEvent::Started {
                index, notebook, ..
            } => {
                self.suspend_and_print(|f| f.converting(&notebook.path));
                if let Some(ref pb) = self.progress_bar {
                    progress::update_notebook_progress(pb, index, Some(notebook.filename.as_str()));
                }
            }
            BatchEvent::Finished { index, result, .. } => {
                self.suspend_and_print(|f| f.converted(result));
                if let Some(ref pb) = self.progress_bar {
                    progress::update_notebook_progress(pb, index + 1, None);
                }
            }
            BatchEvent::Cancelled { remaining } => {
                self.suspend_and_print(|f| {
                    f.warning(&format!(
                        "Interrumpido: {} notebooks sin procesar",
                        remaining
                    ))
                });
            }
        }
    }

    pub fn finish(&mut self, report: &BatchReport) {
        if let Some(pb) = self.progress_bar.take() {
            progress::finish_progress_with_summary(
                &pb,
                &format!("Converted {} notebooks", report.succeeded()),
                report.elapsed,
            );
        }
        self.progress_manager.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(!formatter.should_show_message(0));
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));
    }

    #[test]
    fn test_discovered_line() {
        assert_eq!(
            discovered_line(2),
            "Encontrados 2 notebooks para convertir..."
        );
        assert_eq!(
            discovered_line(0),
            "Encontrados 0 notebooks para convertir..."
        );
    }

    #[test]
    fn test_outcome_lines() {
        let ok = FileResult::new(
            PathBuf::from("chapters/intro.ipynb"),
            ConversionOutcome::Success,
            Duration::ZERO,
        );
        assert_eq!(
            outcome_line(&ok),
            "Convertido exitosamente: chapters/intro.ipynb"
        );

        let failed = FileResult::new(
            PathBuf::from("chapters/broken.ipynb"),
            ConversionOutcome::failure("NotJSONError"),
            Duration::ZERO,
        );
        assert_eq!(
            outcome_line(&failed),
            "Error convirtiendo chapters/broken.ipynb: NotJSONError"
        );
    }

    #[test]
    fn test_event_printer_tracks_progress() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 0, true);
        let mut output = ProgressAwareOutput::new(formatter, ProgressManager::new(false));

        output.handle_event(BatchEvent::Discovered {
            directory: Path::new("chapters"),
            count: 3,
        });
        assert!(output.progress_bar.is_some());

        let report = BatchReport::new(Path::new("chapters"), Path::new("chapters"));
        output.finish(&report);
        assert!(output.progress_bar.is_none());
    }
}
