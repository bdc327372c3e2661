//! Interactive shell on top of the record store.
//!
//! # Responsibility
//! - Define the input seams the shell needs: validated values and yes/no answers.
//! - Provide a console implementation of those seams and the menu loop.
//!
//! # Invariants
//! - Providers only return values inside the requested bounds.
//! - Store errors are reported to the user, never escalated.
//! - End of input terminates the session cleanly.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod console;
pub mod menu;

pub type ShellResult<T> = Result<T, ShellError>;

/// Error that ends a shell session.
#[derive(Debug)]
pub enum ShellError {
    /// Input stream reached end of file.
    InputClosed,
    /// A provider returned a value outside the bounds it was asked for.
    OutOfRange { value: i64 },
    Io(std::io::Error),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputClosed => write!(f, "input closed"),
            Self::OutOfRange { value } => {
                write!(f, "input provider returned out-of-range value {value}")
            }
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::InputClosed | Self::OutOfRange { .. } => None,
        }
    }
}

impl From<std::io::Error> for ShellError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Source of validated primitive values.
///
/// Implementations own retry behavior; a returned value is always valid.
pub trait InputProvider {
    /// Reads one line of free text without its line terminator.
    fn read_text(&mut self, prompt: &str) -> ShellResult<String>;

    /// Reads an integer in `min..=max`.
    fn read_int(&mut self, prompt: &str, min: i64, max: i64) -> ShellResult<i64>;

    /// Reads a finite real number in `min..=max`.
    fn read_f64(&mut self, prompt: &str, min: f64, max: f64) -> ShellResult<f64>;

    fn read_u32(&mut self, prompt: &str, min: u32, max: u32) -> ShellResult<u32> {
        let value = self.read_int(prompt, i64::from(min), i64::from(max))?;
        u32::try_from(value).map_err(|_| ShellError::OutOfRange { value })
    }

    fn read_i32(&mut self, prompt: &str, min: i32, max: i32) -> ShellResult<i32> {
        let value = self.read_int(prompt, i64::from(min), i64::from(max))?;
        i32::try_from(value).map_err(|_| ShellError::OutOfRange { value })
    }
}

/// Source of yes/no answers.
pub trait Confirmer {
    fn confirm(&mut self, message: &str) -> ShellResult<bool>;
}
