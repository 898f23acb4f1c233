//! Line source for the `input` built-in.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::errors::host_error;
use crate::EvalResult;

#[derive(Default)]
pub enum InputSource {
    #[default]
    Stdin,
    /// Pre-recorded lines, consumed front to back.
    Scripted(VecDeque<String>),
}

impl InputSource {
    pub fn stdin() -> Self {
        InputSource::Stdin
    }

    pub fn scripted<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InputSource::Scripted(lines.into_iter().map(Into::into).collect())
    }

    /// Read one line without its terminator. `None` at end of input.
    pub fn read_line(&mut self) -> EvalResult<Option<String>> {
        match self {
            InputSource::Stdin => {
                let mut line = String::new();
                let read = std::io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .map_err(|err| host_error(format!("reading stdin: {err}")))?;
                if read == 0 {
                    return Ok(None);
                }
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Ok(Some(line))
            }
            InputSource::Scripted(lines) => Ok(lines.pop_front()),
        }
    }
}
