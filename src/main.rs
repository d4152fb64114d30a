//! docker - command-line client with external CLI plugin support

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run(std::env::args_os().collect()) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            if let Some(status) = err.downcast_ref::<cli::StatusError>() {
                if !status.status.is_empty() {
                    eprintln!("{}", status.status);
                }
                return ExitCode::from(status.code.max(1));
            }
            eprintln!("{:#}", err);
            ExitCode::from(1)
        }
    }
}
