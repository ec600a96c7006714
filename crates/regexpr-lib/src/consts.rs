//! Common character classes, anchors and shorthands.
//!
//! Every function returns a fresh expression; they are cheap to call.

use regexpr_core::{Expr, Token, char_raw, char_set, raw};

/// `[\w]`
pub fn char_word() -> Expr {
    char_raw(r"\w")
}

/// `[\w]*`
pub fn word() -> Expr {
    char_word().repeat()
}

/// `[\d]`
pub fn char_digit() -> Expr {
    char_raw(r"\d")
}

/// `[\d]*`
pub fn number() -> Expr {
    char_digit().repeat()
}

/// `[\r]`
pub fn char_cr() -> Expr {
    char_raw(r"\r")
}

/// `[\n]`
pub fn char_lf() -> Expr {
    char_raw(r"\n")
}

/// `[\s]`
pub fn char_space() -> Expr {
    char_raw(r"\s")
}

fn char_non_space() -> Expr {
    char_raw(r"\S")
}

/// `[\r\n]`
pub fn char_vert_space() -> Expr {
    char_set(char_cr() + char_lf())
}

/// Whitespace other than line breaks: `[^\S\r\n]`.
pub fn char_horiz_space() -> Expr {
    char_set(!(char_non_space() + char_vert_space()))
}

pub fn any_char() -> Expr {
    raw(".")
}

pub fn start_of_line() -> Expr {
    raw("^")
}

pub fn end_of_line() -> Expr {
    raw("$")
}

pub fn start_of_file() -> Expr {
    raw(r"\A")
}

pub fn end_of_file() -> Expr {
    raw(r"\z")
}

/// `\r?\n`
pub fn line_break() -> Expr {
    char_cr().optional() & char_lf()
}

pub fn space() -> Expr {
    char_space().repeat()
}

pub fn non_space() -> Expr {
    char_non_space().repeat()
}

pub fn vert_space() -> Expr {
    char_vert_space().repeat()
}

pub fn horiz_space() -> Expr {
    char_horiz_space().repeat()
}

/// Rest of the line: `[^\r\n]*`.
pub fn line() -> Expr {
    char_set(!char_vert_space()).repeat()
}

pub fn ignore_case() -> Expr {
    raw("(?i)")
}

pub fn sense_case() -> Expr {
    raw("(?-i)")
}

/// Consumes whitespace like a token does, without capturing anything.
pub fn skip_ws() -> Expr {
    Token::skip_ws().into()
}
