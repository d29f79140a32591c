//! Command-line arguments of the `bardo` binary.

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_WIDTH: u32 = 1600;
pub const DEFAULT_HEIGHT: u32 = 480;

pub const USAGE: &str = "usage: bardo [width] [height] [seconds] [--headless]";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Stop after this long; run until Ctrl-C when absent
    pub duration: Option<Duration>,
    /// Print statistics instead of drawing
    pub headless: bool,
    pub help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            duration: None,
            headless: false,
            help: false,
        }
    }
}

impl Args {
    /// Parse arguments, program name excluded.
    ///
    /// Positionals are `width height seconds`, each optional from the right.
    /// Flags may appear anywhere.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut position = 0;

        for arg in args {
            let arg = arg.into();
            match arg.as_str() {
                "--headless" => parsed.headless = true,
                "-h" | "--help" => parsed.help = true,
                flag if flag.starts_with('-') => return Err(Error::UnknownFlag(arg)),
                _ => {
                    match position {
                        0 => parsed.width = number("width", &arg)?,
                        1 => parsed.height = number("height", &arg)?,
                        2 => parsed.duration = Some(Duration::from_secs(number("seconds", &arg)?)),
                        _ => return Err(Error::UnexpectedArgument(arg)),
                    }
                    position += 1;
                }
            }
        }

        Ok(parsed)
    }
}

fn number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::InvalidArgument {
        name,
        value: value.to_string(),
    })
}
