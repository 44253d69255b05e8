//! HTML tokenizer for tocdex.
//!
//! # Scope
//!
//! This crate implements the token source the index scanner walks:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA and RAWTEXT states (`title`/`textarea`, `script`/`style`)
//!   - Tag, attribute, self-closing and end tag states
//!   - Comment, DOCTYPE and CDATA section handling
//!   - Named (common subset) and numeric character references
//!
//! Tokens are produced on demand, one at a time. Runs of characters are
//! coalesced into a single [`Token::Text`]. Input that ends in the middle of
//! markup produces a [`Token::Error`] and ends the stream.
//!
//! # Not Implemented
//!
//! - Tree construction (the scanner never builds a DOM)
//! - Script data escape states (script bodies are treated as raw text)
//! - The full 2,231-entry named character reference table

/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use tokenizer::{Attribute, EofContext, HtmlTokenizer, Token, TokenizeError};
