use std::io;

use thiserror::Error;

/// Errors raised while reading SVG markup into a drawing document.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("invalid number '{text}' at line {line}")]
    Number { line: usize, text: String },

    #[error("unsupported path command '{0}'")]
    UnsupportedPathCommand(char),

    #[error("duplicate identifier '{0}'")]
    DuplicateIdentifier(String),
}
