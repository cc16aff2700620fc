use std::process::ExitCode;

use file_reverser::{cli::ValidatorArgs, config::Config, verify::report, Verifier};

const USAGE: &str = "Usage:
    validator <path/to/newfile> <path/to/oldfile> <path/to/directory>
";

fn main() -> ExitCode {
    env_logger::init();

    let args = match ValidatorArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            println!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    // The report is always produced, so bad settings fall back to defaults.
    let config = Config::from_env_or_default();
    let verifier = Verifier::new(config.chunk_size);
    for line in report(&args, &verifier) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}
