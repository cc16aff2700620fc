use std::{
    ffi::OsString,
    num::ParseIntError,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

use crate::{Outcome, Region};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
/// The transfer stopped early; some of the output was not written.
pub const EXIT_INTERRUPTED: u8 = 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("missing arguments")]
    MissingArguments,
    #[error("too many arguments")]
    TooManyArguments,
    #[error("invalid mode `{0}`, use 0 or 1")]
    InvalidMode(String),
    #[error("mode 1 requires a start and an end index")]
    MissingRegion,
    #[error("invalid {name} index `{value}`: {source}")]
    InvalidIndex {
        name: &'static str,
        value: String,
        source: ParseIntError,
    },
    #[error("input path {} has no file name", .0.display())]
    NoFileName(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Whole,
    Partial,
}

impl Mode {
    /// The numeric flag used on the command line and in output names.
    pub fn flag(self) -> u8 {
        match self {
            Mode::Whole => 0,
            Mode::Partial => 1,
        }
    }
}

impl FromStr for Mode {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Mode::Whole),
            "1" => Ok(Mode::Partial),
            other => Err(CliError::InvalidMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Whole,
    Partial(Region),
}

impl Request {
    pub fn mode(&self) -> Mode {
        match self {
            Request::Whole => Mode::Whole,
            Request::Partial(_) => Mode::Partial,
        }
    }
}

/// `reverser <input_file> <mode> [start] [end]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverserArgs {
    pub input: PathBuf,
    pub request: Request,
}

impl ReverserArgs {
    /// Parses the arguments that follow the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, CliError> {
        let mut args = args.into_iter();
        let (Some(input), Some(mode)) = (args.next(), args.next()) else {
            return Err(CliError::MissingArguments);
        };
        let request = match mode.parse()? {
            Mode::Whole => {
                if args.next().is_some() {
                    return Err(CliError::TooManyArguments);
                }
                Request::Whole
            }
            Mode::Partial => {
                let (Some(start), Some(end)) = (args.next(), args.next()) else {
                    return Err(CliError::MissingRegion);
                };
                if args.next().is_some() {
                    return Err(CliError::TooManyArguments);
                }
                Request::Partial(Region::new(
                    parse_index("start", start)?,
                    parse_index("end", end)?,
                ))
            }
        };
        Ok(ReverserArgs {
            input: PathBuf::from(input),
            request,
        })
    }
}

fn parse_index(name: &'static str, value: String) -> Result<u64, CliError> {
    let parsed = value.trim().parse();
    parsed.map_err(|source| CliError::InvalidIndex {
        name,
        value,
        source,
    })
}

/// `<output_dir>/<flag>_<file name of input>`
pub fn output_path(output_dir: &Path, mode: Mode, input: &Path) -> Result<PathBuf, CliError> {
    let name = input
        .file_name()
        .ok_or_else(|| CliError::NoFileName(input.to_path_buf()))?;
    let mut file_name = OsString::from(format!("{}_", mode.flag()));
    file_name.push(name);
    Ok(output_dir.join(file_name))
}

/// Process exit status for a finished reversal.
pub fn exit_status(result: &crate::Result<Outcome>) -> u8 {
    match result {
        Ok(Outcome::Complete { .. }) => EXIT_SUCCESS,
        Ok(Outcome::Interrupted { .. }) => EXIT_INTERRUPTED,
        Err(_) => EXIT_FAILURE,
    }
}

/// `validator <newfile_path> <oldfile_path> <directory_path>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorArgs {
    pub new_file: PathBuf,
    pub old_file: PathBuf,
    pub directory: PathBuf,
}

impl ValidatorArgs {
    /// Parses the arguments that follow the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, CliError> {
        let mut args = args.into_iter();
        let (Some(new_file), Some(old_file), Some(directory)) =
            (args.next(), args.next(), args.next())
        else {
            return Err(CliError::MissingArguments);
        };
        if args.next().is_some() {
            return Err(CliError::TooManyArguments);
        }
        Ok(ValidatorArgs {
            new_file: PathBuf::from(new_file),
            old_file: PathBuf::from(old_file),
            directory: PathBuf::from(directory),
        })
    }
}
