use crate::config::ConverterConfig;
use crate::converter::{ConversionOutcome, Converter};
use crate::error::{NbBatchError, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Runs `jupyter nbconvert` (or a compatible tool) once per notebook.
///
/// The invocation is
/// `<program> [subcommand] --to <format> --template <template> --output-dir <dir> <input>`.
#[derive(Debug, Clone)]
pub struct NbConvert {
    program: String,
    subcommand: Option<String>,
    to: String,
    template: String,
}

impl NbConvert {
    pub fn new() -> Self {
        Self::from_config(&ConverterConfig::default())
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self {
            program: config.program.clone(),
            subcommand: config.subcommand.clone(),
            to: config.to.clone(),
            template: config.template.clone(),
        }
    }

    pub fn with_program<S: Into<String>>(mut self, program: S) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_subcommand(mut self, subcommand: Option<String>) -> Self {
        self.subcommand = subcommand;
        self
    }

    pub fn with_template<S: Into<String>>(mut self, template: S) -> Self {
        self.template = template.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed after the program name.
    pub fn arguments(&self, input: &Path, output_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(8);

        if let Some(ref subcommand) = self.subcommand {
            args.push(subcommand.into());
        }

        args.push("--to".into());
        args.push(self.to.as_str().into());
        args.push("--template".into());
        args.push(self.template.as_str().into());
        args.push("--output-dir".into());
        args.push(output_dir.as_os_str().to_owned());
        args.push(input.as_os_str().to_owned());

        args
    }

    fn build_command(&self, input: &Path, output_dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.arguments(input, output_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Terminal Ctrl+C signals the whole foreground group. The child gets
        // its own group so an interrupt stops the batch, not this notebook.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        command
    }

    /// Verifies the tool can be launched by asking for its version.
    pub fn check_available(&self) -> Result<String> {
        let mut command = Command::new(&self.program);
        if let Some(ref subcommand) = self.subcommand {
            command.arg(subcommand);
        }

        let output = command
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| NbBatchError::ToolNotFound {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(NbBatchError::ToolNotFound {
                program: self.program.clone(),
                message: failure_message(&output),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for NbConvert {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for NbConvert {
    fn convert(&self, input: &Path, output_dir: &Path) -> ConversionOutcome {
        tracing::debug!(
            "Running {} {:?}",
            self.program,
            self.arguments(input, output_dir)
        );

        match self.build_command(input, output_dir).output() {
            Ok(output) if output.status.success() => ConversionOutcome::Success,
            Ok(output) => {
                let message = failure_message(&output);
                tracing::warn!("{} failed for {}: {}", self.program, input.display(), message);
                ConversionOutcome::failure(message)
            }
            Err(err) => {
                tracing::warn!("Could not launch {}: {}", self.program, err);
                ConversionOutcome::failure(format!("failed to launch {}: {}", self.program, err))
            }
        }
    }

    fn describe(&self, input: &Path, output_dir: &Path) -> String {
        let mut line = self.program.clone();
        for arg in self.arguments(input, output_dir) {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Tool stderr, or the exit status when the tool said nothing.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim_end();

    if stderr.is_empty() {
        format!("process exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}
