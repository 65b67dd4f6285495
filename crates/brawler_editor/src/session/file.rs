//! Level file reading and writing
//!
//! One-shot blocking operations: a load parses and validates the whole file
//! into a fresh `Level` before returning, a save serializes the whole model
//! and writes it in one go. Nothing here touches session state.

use std::fs;
use std::path::Path;

use brawler_core::{Level, LoadError};
use brawler_token::{writer, ParseError, TokenReader};
use thiserror::Error;

/// Failure while opening or saving a level file
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read or write the level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level file: {0}")]
    Parse(#[from] ParseError),
    #[error("invalid level data: {0}")]
    Load(#[from] LoadError),
    #[error("the level file holds no tokens")]
    EmptyFile,
    #[error("the level has no file path yet")]
    NoPath,
    #[error("no block under pixel x {0}")]
    OutsideBlocks(i32),
}

/// Read, parse and build the level stored at `path`.
///
/// The first top-level token in the file must be a `level` tree; trailing
/// tokens are ignored, matching the one-level-per-file convention.
pub fn load_level(path: &Path) -> Result<Level, SessionError> {
    let source = fs::read_to_string(path)?;
    let mut reader = TokenReader::new(&source);
    let token = reader.next_token()?.ok_or(SessionError::EmptyFile)?;
    Ok(Level::from_token(&token)?)
}

/// Serialize `level` to its canonical indented form and write it to `path`
pub fn save_level(level: &Level, path: &Path) -> Result<(), SessionError> {
    let text = writer::write_pretty(&level.to_token());
    fs::write(path, text)?;
    Ok(())
}
