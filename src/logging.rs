use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a `-v` count; `RUST_LOG` wins when set.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "nbbatch=warn",
        1 => "nbbatch=info",
        _ => "nbbatch=debug,info",
    }
}

/// Logs go to stderr so stdout carries only conversion progress.
pub fn init_cli_logger(verbosity: u8, quiet: bool) {
    let directive = if quiet {
        "nbbatch=error"
    } else {
        default_directive(verbosity)
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // try_init: a second initialisation (tests, embedding) is not an error.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0), "nbbatch=warn");
        assert_eq!(default_directive(1), "nbbatch=info");
        assert_eq!(default_directive(3), "nbbatch=debug,info");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_cli_logger(0, false);
        init_cli_logger(2, false);
    }
}
