use std::{fmt, fs, io, os::unix::fs::PermissionsExt, path::Path};

use log::debug;

/// Width the validator pads report descriptions to.
pub const DESCRIPTION_WIDTH: usize = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    User,
    Group,
    Others,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    Execute,
}

impl Class {
    pub const ALL: [Class; 3] = [Class::User, Class::Group, Class::Others];

    fn shift(self) -> u32 {
        match self {
            Class::User => 6,
            Class::Group => 3,
            Class::Others => 0,
        }
    }
}

impl Access {
    pub const ALL: [Access; 3] = [Access::Read, Access::Write, Access::Execute];

    fn bit(self) -> u32 {
        match self {
            Access::Read => 0b100,
            Access::Write => 0b010,
            Access::Execute => 0b001,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Class::User => "User",
            Class::Group => "Group",
            Class::Others => "Others",
        })
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::Read => "read",
            Access::Write => "write",
            Access::Execute => "execute",
        })
    }
}

/// The nine rwx bits of a mode word, taken at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    bits: u32,
}

impl Permissions {
    pub fn from_mode(mode: u32) -> Self {
        Permissions { bits: mode & 0o777 }
    }

    /// Stats `path` (following symlinks). Nothing is cached.
    pub fn of(path: &Path) -> io::Result<Self> {
        Ok(Permissions::from_mode(fs::metadata(path)?.permissions().mode()))
    }

    pub fn allows(&self, class: Class, access: Access) -> bool {
        self.bits & (access.bit() << class.shift()) != 0
    }

    /// All nine flags, user before group before others, read before write
    /// before execute.
    pub fn flags(&self) -> impl Iterator<Item = (Class, Access, bool)> + '_ {
        Class::ALL.into_iter().flat_map(move |class| {
            Access::ALL
                .into_iter()
                .map(move |access| (class, access, self.allows(class, access)))
        })
    }
}

/// Formats `<description>: Yes|No` with the description padded to
/// [`DESCRIPTION_WIDTH`].
pub fn yes_no_line(description: &str, value: bool) -> String {
    let answer = if value { "Yes" } else { "No" };
    format!("{description:<width$}: {answer}", width = DESCRIPTION_WIDTH)
}

/// The nine permission lines for `path`, or a single line saying why they
/// could not be produced.
pub fn report_lines(path: &Path, label: &str) -> Vec<String> {
    match Permissions::of(path) {
        Ok(permissions) => permissions
            .flags()
            .map(|(class, access, allowed)| {
                yes_no_line(&format!("{class} has {access} permission on {label}"), allowed)
            })
            .collect(),
        Err(err) => {
            debug!("stat of {} failed: {err}", path.display());
            vec![format!("Could not get permissions for {label}")]
        }
    }
}
