use clap::Parser;
use nbbatch::{logging, Cli, NbBatch, NbBatchError, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    logging::init_cli_logger(cli.verbosity_level(), cli.quiet);

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let nbbatch = match NbBatch::from_cli(&cli) {
        Ok(nbbatch) => nbbatch,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for_error(&e);
        }
    };

    if cli.check_tool {
        if let Err(e) = nbbatch.check_tool() {
            nbbatch.handle_error(&e);
            return exit_code_for_error(&e);
        }
    }

    if cli.dry_run {
        return match nbbatch.plan() {
            Ok(_) => 0,
            Err(e) => {
                nbbatch.handle_error(&e);
                exit_code_for_error(&e)
            }
        };
    }

    match nbbatch.convert_notebooks().await {
        Ok(report) => nbbatch.exit_code_for(&report),
        Err(e) => {
            nbbatch.handle_error(&e);
            exit_code_for_error(&e)
        }
    }
}

fn exit_code_for_error(error: &NbBatchError) -> i32 {
    match error {
        NbBatchError::Config { .. } => 3,
        NbBatchError::ToolNotFound { .. } => 4,
        NbBatchError::DirectoryNotFound { .. }
        | NbBatchError::NotADirectory { .. }
        | NbBatchError::Permission { .. }
        | NbBatchError::InvalidPath { .. } => 5,
        _ => 1, // General error
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "nbbatch.toml".to_string());

    match NbBatch::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  nbbatch --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &NbBatchError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "nbbatch",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 0);
        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[converter]"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for_error(&NbBatchError::Config {
                message: "bad".to_string()
            }),
            3
        );
        assert_eq!(
            exit_code_for_error(&NbBatchError::ToolNotFound {
                program: "jupyter".to_string(),
                message: "missing".to_string()
            }),
            4
        );
        assert_eq!(
            exit_code_for_error(&NbBatchError::Io(std::io::Error::other("disk"))),
            1
        );
    }
}
