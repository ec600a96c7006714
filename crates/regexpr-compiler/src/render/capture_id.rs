//! Generated group names.
//!
//! Names are `<prefix><n>_<token id>` for token captures and `r<n>` for
//! repeat groups, where `n` comes from a per-render counter. Token ids are
//! sanitized to `[A-Za-z0-9_]` and the result is cut at [`MAX_LEN`].

use std::collections::HashSet;

use super::RenderError;

pub const MAX_LEN: usize = 32;

pub const REPEAT_PREFIX: &str = "r";

#[derive(Debug)]
pub struct CaptureIds {
    prefix: String,
    next: u32,
    taken: HashSet<String>,
}

impl CaptureIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
            taken: HashSet::new(),
        }
    }

    pub fn token(&mut self, token_id: &str) -> Result<String, RenderError> {
        let n = self.bump();
        let mut id = format!("{}{n}_", self.prefix);
        id.extend(token_id.chars().map(sanitize));
        id.truncate(MAX_LEN);
        self.claim(id)
    }

    pub fn repeat(&mut self) -> Result<String, RenderError> {
        let id = format!("{REPEAT_PREFIX}{}", self.bump());
        self.claim(id)
    }

    fn bump(&mut self) -> u32 {
        self.next += 1;
        self.next
    }

    fn claim(&mut self, id: String) -> Result<String, RenderError> {
        if !is_valid(&id) {
            return Err(RenderError::InvalidCaptureId(id));
        }
        if !self.taken.insert(id.clone()) {
            return Err(RenderError::DuplicateCaptureId(id));
        }
        Ok(id)
    }
}

fn sanitize(c: char) -> char {
    if c.is_ascii_alphanumeric() { c } else { '_' }
}

pub fn is_valid(id: &str) -> bool {
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    id.len() <= MAX_LEN
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
