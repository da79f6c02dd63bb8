mod cli;

use std::{env, process::ExitCode};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let result = match cli::parse_args(env::args().skip(1)) {
        Ok(command) => cli::execute(command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            eprintln!("{}", cli::USAGE);
            ExitCode::FAILURE
        }
    }
}
