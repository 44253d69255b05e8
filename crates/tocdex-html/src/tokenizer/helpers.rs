//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input/character handling ("Consume the next input character")
//! - Token emission ("Emit the current token"), including text coalescing
//! - RCDATA/RAWTEXT helpers for raw text elements
//! - Parse error reporting

use tocdex_common::warning::warn_once;

use super::core::{HtmlTokenizer, TokenizerState};
use super::token::{EofContext, Token, TokenizeError};

/// Elements whose content is tokenized in the RCDATA state.
const RCDATA_ELEMENTS: &[&str] = &["title", "textarea"];

/// Elements whose content is tokenized in the RAWTEXT state.
///
/// `script` belongs here too: its escape states are not implemented, so the
/// body is raw text up to `</script>`.
const RAWTEXT_ELEMENTS: &[&str] = &["style", "script", "xmp", "iframe", "noembed", "noframes"];

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HtmlTokenizer {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next iteration.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HtmlTokenizer {
    /// "Consume the next input character"
    ///
    /// Returns None at the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Peek at a codepoint at the given offset from the current position
    /// without consuming it.
    pub(super) fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// "If the next few characters are..."
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    pub(super) fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input[self.current_pos..]
            .get(..target.len())
            .is_some_and(|next| next.eq_ignore_ascii_case(target))
    }

    /// Consume the given ASCII string from the input.
    /// Caller must have already verified the characters are present.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF),
    /// U+000C FORM FEED (FF), U+0020 SPACE"
    ///
    /// CR is included too: input is not newline-normalized beforehand.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\r' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HtmlTokenizer {
    /// "Emit the current input character as a character token."
    ///
    /// Characters accumulate until the next non-character token is emitted.
    pub(super) fn emit_character(&mut self, c: char) {
        self.text.push(c);
    }

    /// Push accumulated characters as a single text token.
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let data = std::mem::take(&mut self.text);
            self.pending.push_back(Token::Text { data });
        }
    }

    /// "Emit the current token"
    ///
    /// A non-self-closing start tag for a raw text element switches the
    /// tokenizer into RCDATA or RAWTEXT, which the tree builder would
    /// normally do.
    pub(super) fn emit_current_token(&mut self) {
        let Some(mut token) = self.current_token.take() else {
            return;
        };
        if token.remove_duplicate_attributes() {
            self.log_parse_error("duplicate-attribute");
        }
        self.flush_text();
        if let Token::StartTag {
            ref name,
            self_closing,
            ..
        } = token
        {
            self.last_start_tag_name = Some(name.clone());
            if !self_closing {
                if RCDATA_ELEMENTS.contains(&name.as_str()) {
                    self.switch_to(TokenizerState::RCDATA);
                } else if RAWTEXT_ELEMENTS.contains(&name.as_str()) {
                    self.switch_to(TokenizerState::RAWTEXT);
                }
            }
        }
        self.pending.push_back(token);
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof(&mut self) {
        self.flush_text();
        self.pending.push_back(Token::EndOfFile);
        self.finished = true;
    }

    /// The input ended inside markup: emit an error token and stop.
    ///
    /// Text seen before the broken markup is still emitted.
    pub(super) fn emit_eof_error(&mut self, context: EofContext) {
        self.flush_text();
        self.current_token = None;
        let error = TokenizeError::UnexpectedEof {
            context,
            position: self.current_pos,
        };
        log::debug!("tokenizer stopped: {error}");
        self.pending.push_back(Token::Error(error));
        self.finished = true;
    }
}

// =============================================================================
// RCDATA/RAWTEXT Helpers
// =============================================================================

impl HtmlTokenizer {
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        if let (Some(last_start_tag), Some(Token::EndTag { name })) =
            (&self.last_start_tag_name, &self.current_token)
        {
            return name == last_start_tag;
        }
        false
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    ///
    /// "Anything else": "Emit a U+003C LESS-THAN SIGN character token, a U+002F
    /// SOLIDUS character token, and a character token for each of the
    /// characters in the temporary buffer... Reconsume in the RCDATA (or
    /// RAWTEXT) state."
    pub(super) fn emit_text_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.emit_character('<');
        self.emit_character('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.text.push_str(&buffer);
        self.current_token = None;
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HtmlTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors are not fatal; each kind is warned about once.
    pub(super) fn log_parse_error(&self, code: &str) {
        log::debug!("parse error {code} at byte {}", self.current_pos);
        warn_once("HTML Tokenizer", &format!("parse error: {code}"));
    }
}
