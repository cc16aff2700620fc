use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use file_reverser::{
    cli::{exit_status, output_path, Request, ReverserArgs},
    config::Config,
    progress::{NoProgress, Progress, ProgressBar},
    Outcome, Reverser,
};

const USAGE: &str = "Usage:
    reverser <path/to/input> 0
    reverser <path/to/input> 1 <start_index> <end_index>

Mode 0 reverses the entire file.
Mode 1 reverses the bytes before <start_index> and from <end_index> onward,
keeping the range in between unchanged.
";

fn main() -> ExitCode {
    env_logger::init();

    let args = match ReverserArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            println!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let output = match output_path(&config.output_dir, args.request.mode(), &args.input) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let reverser = Reverser::new(config.chunk_size);
    let result = if io::stderr().is_terminal() {
        let mut bar = ProgressBar::new(io::stderr());
        let result = run(&reverser, &args, &output, &mut bar);
        bar.finish();
        result
    } else {
        run(&reverser, &args, &output, &mut NoProgress)
    };

    match &result {
        Ok(Outcome::Complete { written }) => {
            println!("Reversed {written} bytes.");
            println!("Output saved to: {}", output.display());
        }
        Ok(Outcome::Interrupted {
            written,
            expected,
            error,
        }) => {
            eprintln!(
                "Reversal stopped after {written} of {expected} bytes: {error}\n\
                 Output at {} is incomplete.",
                output.display()
            );
        }
        Err(err) => eprintln!("{err}"),
    }
    ExitCode::from(exit_status(&result))
}

fn run(
    reverser: &Reverser,
    args: &ReverserArgs,
    output: &std::path::Path,
    progress: &mut impl Progress,
) -> file_reverser::Result<Outcome> {
    match args.request {
        Request::Whole => {
            println!("Reversing entire file {}", args.input.display());
            reverser.reverse_whole(&args.input, output, progress)
        }
        Request::Partial(region) => {
            println!(
                "Reversing {} outside of bytes {}..{}",
                args.input.display(),
                region.start,
                region.end
            );
            reverser.reverse_partial(&args.input, output, region, progress)
        }
    }
}
