//! Command-line front end for dynamic form schemas
//!
//! ```text
//! dynform check    --schema user_registration.json
//! dynform validate --schema user_registration.json --data signup.yaml --format json
//! dynform inspect  --schema location_selector.yaml
//! ```

pub mod commands;
pub mod error;
pub mod output;

pub use commands::{Cli, Commands};
pub use error::CliError;
pub use output::OutputFormat;

use std::io::{self, Write};

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// The submission failed validation
    ValidationError = 1,
    InvalidInput = 3,
    /// A file could not be read
    FileError = 4,
    /// The schema definition was rejected
    SchemaError = 5,
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    pub fn from_validation_result(has_errors: bool) -> Self {
        if has_errors {
            ExitCode::ValidationError
        } else {
            ExitCode::Success
        }
    }
}

/// Run a parsed command, writing its output to `out`
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<ExitCode, CliError> {
    let mut sink = io::sink();
    let out: &mut dyn Write = if cli.quiet { &mut sink } else { out };

    match cli.command {
        Commands::Check { schema, format } => commands::execute_check(&schema, format, out),
        Commands::Validate {
            schema,
            data,
            form_id,
            format,
        } => commands::execute_validate(&schema, &data, form_id, format, out),
        Commands::Inspect { schema, format } => commands::execute_inspect(&schema, format, out),
    }
}

/// Run against stdout, reporting failures on stderr
pub fn run_cli(cli: Cli) -> ExitCode {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let code = match run(cli, &mut handle) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    handle.flush().ok();
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::ValidationError), 1);
        assert_eq!(i32::from(ExitCode::InvalidInput), 3);
        assert_eq!(i32::from(ExitCode::FileError), 4);
        assert_eq!(i32::from(ExitCode::SchemaError), 5);
        assert_eq!(i32::from(ExitCode::InternalError), 10);
    }

    #[test]
    fn test_exit_code_from_validation_result() {
        assert_eq!(ExitCode::from_validation_result(false), ExitCode::Success);
        assert_eq!(
            ExitCode::from_validation_result(true),
            ExitCode::ValidationError
        );
    }
}
