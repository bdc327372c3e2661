//! Line-based console prompter with retry-until-valid semantics.

use crate::shell::{Confirmer, InputProvider, ShellError, ShellResult};
use std::io::{BufRead, Write};

/// Prompts on `output` and reads answers line by line from `input`.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> ShellResult<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShellError::InputClosed);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    fn complain(&mut self, message: &str) -> ShellResult<()> {
        writeln!(self.output, "Invalid input! {message}")?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> InputProvider for ConsolePrompter<R, W> {
    fn read_text(&mut self, prompt: &str) -> ShellResult<String> {
        self.ask(prompt)
    }

    fn read_int(&mut self, prompt: &str, min: i64, max: i64) -> ShellResult<i64> {
        loop {
            let line = self.ask(prompt)?;
            match line.trim().parse::<i64>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(value),
                Ok(_) => {
                    self.complain(&format!("Please enter a number between {min} and {max}."))?
                }
                Err(_) => self.complain("Please enter a single whole number.")?,
            }
        }
    }

    fn read_f64(&mut self, prompt: &str, min: f64, max: f64) -> ShellResult<f64> {
        loop {
            let line = self.ask(prompt)?;
            match line.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && min <= value && value <= max => {
                    return Ok(value)
                }
                Ok(_) => {
                    self.complain(&format!("Please enter a number between {min} and {max}."))?
                }
                Err(_) => self.complain("Please enter a valid number.")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Confirmer for ConsolePrompter<R, W> {
    fn confirm(&mut self, message: &str) -> ShellResult<bool> {
        loop {
            match self.ask(&format!("{message} (y/n): "))?.trim() {
                "y" | "Y" => return Ok(true),
                "n" | "N" => return Ok(false),
                _ => self.complain("Please enter 'y' or 'n'.")?,
            }
        }
    }
}
