//! # Integer BASIC language module
//! Tokenization and detokenization is handled here.
//!
//! The listing follows the Apple II `LIST` conventions, except that control characters
//! in strings and remarks are made visible as `«ctrl-X»`.

mod token_maps;
#[cfg(test)]
mod tokenize_test;
#[cfg(test)]
mod detokenize_test;
#[cfg(test)]
mod round_trip_test;
pub mod tokenizer;

pub use tokenizer::{Tokenizer,ProgramLine};
