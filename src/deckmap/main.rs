use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    match cli::commands::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
