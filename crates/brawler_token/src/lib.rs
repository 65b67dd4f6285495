//! Nested text-token format for brawler_editor
//!
//! This crate implements the persistence format every brawler level, character
//! and item round-trips through: a small recursive data language of named
//! nodes with ordered children, written as whitespace-separated atoms inside
//! `(` `)` groups.
//!
//! - `Token` - the tree node (named composite or scalar leaf)
//! - `TokenReader` - pull parser producing one top-level token at a time
//! - `writer` - canonical flat and indented serializers
//!
//! # Example
//!
//! ```
//! use brawler_token::{Token, TokenReader};
//!
//! let mut reader = TokenReader::new("(coords 10 20 0)");
//! let coords = reader.next_token().unwrap().unwrap();
//! assert_eq!(coords.name, "coords");
//! assert_eq!(coords.read_int(0).unwrap(), 10);
//! ```

mod reader;
mod token;
pub mod writer;

pub use reader::{parse_all, ParseError, TokenReader, MAX_DEPTH};
pub use token::{Token, TokenError};
