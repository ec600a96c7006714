//! Input loading shared by commands that read text.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Where the text to parse came from.
pub enum Input {
    Inline(String),
    Stdin(String),
    File { path: String, text: String },
    Sample(&'static str),
}

impl Input {
    pub fn text(&self) -> &str {
        match self {
            Input::Inline(text) | Input::Stdin(text) | Input::File { text, .. } => text.as_str(),
            Input::Sample(text) => *text,
        }
    }

    /// Display path for diagnostics.
    pub fn path(&self) -> Option<&str> {
        match self {
            Input::File { path, .. } => Some(path.as_str()),
            Input::Stdin(_) => Some("<stdin>"),
            Input::Inline(_) | Input::Sample(_) => None,
        }
    }
}

/// Load input from inline text, a file, stdin (`-`), or fall back to `sample`.
pub fn load_input(
    input_text: Option<&str>,
    input_path: Option<&Path>,
    sample: &'static str,
) -> io::Result<Input> {
    if let Some(text) = input_text {
        return Ok(Input::Inline(text.to_owned()));
    }
    let Some(path) = input_path else {
        return Ok(Input::Sample(sample));
    };
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Input::Stdin(buf));
    }
    let text = fs::read_to_string(path)?;
    Ok(Input::File {
        path: path.display().to_string(),
        text,
    })
}
