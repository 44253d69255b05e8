//! Character reference helpers for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)

use super::core::{HtmlTokenizer, TokenizerState};
use super::named_character_references::{any_entity_has_prefix, lookup_entity};

impl HtmlTokenizer {
    /// Returns true if the return state is an attribute value state.
    /// Per spec: "consumed as part of an attribute"
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise, emit
    /// each character as a character token."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.append_reference_char(c);
        }
    }

    /// Append one character either to the current attribute value or the
    /// pending text, depending on where the reference appeared.
    pub(super) fn append_reference_char(&mut self, c: char) {
        if self.is_consumed_as_part_of_attribute() {
            if let Some(ref mut token) = self.current_token {
                token.append_to_current_attribute_value(c);
            }
        } else {
            self.emit_character(c);
        }
    }

    /// The state to go back to once the reference is resolved.
    ///
    /// Falls back to the data state if none was recorded, which only happens
    /// if a reference state is entered without going through `&`.
    pub(super) fn take_return_state(&mut self) -> TokenizerState {
        self.return_state.take().unwrap_or(TokenizerState::Data)
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');

        match self.current_input_character {
            // "ASCII alphanumeric - Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            // "U+0023 NUMBER SIGN (#) - Append the current input character to the
            // temporary buffer. Switch to the numeric character reference state."
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else - Flush code points consumed as a character reference.
            // Reconsume in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the first column of the named
    /// character references table."
    ///
    /// Entered via reconsume with the first alphanumeric as the current input
    /// character; the temporary buffer holds "&". Characters are pulled
    /// directly from the input until no entity can match the prefix.
    pub(super) fn handle_named_character_reference_state(&mut self) {
        let mut longest_match: Option<(usize, &'static str)> = None;

        if let Some(c) = self.current_input_character {
            self.temporary_buffer.push(c);
            if let Some(replacement) = lookup_entity(&self.temporary_buffer[1..]) {
                longest_match = Some((self.temporary_buffer.len(), replacement));
            }
        }

        // Whether the character after the buffer has been consumed and must be
        // reconsumed in the return state.
        let mut pending_reconsume = false;
        loop {
            let entity_name = &self.temporary_buffer[1..];
            if entity_name.ends_with(';') || !any_entity_has_prefix(entity_name) {
                break;
            }
            let next = self.consume();
            match next {
                Some(c) if c.is_ascii_alphanumeric() || c == ';' => {
                    self.temporary_buffer.push(c);
                    if let Some(replacement) = lookup_entity(&self.temporary_buffer[1..]) {
                        longest_match = Some((self.temporary_buffer.len(), replacement));
                    }
                }
                _ => {
                    self.current_input_character = next;
                    pending_reconsume = true;
                    break;
                }
            }
        }

        // "If there is a match:"
        if let Some((match_len, replacement)) = longest_match {
            let last_char_is_semicolon = self.temporary_buffer[..match_len].ends_with(';');
            let next_char = if match_len < self.temporary_buffer.len() {
                self.temporary_buffer[match_len..].chars().next()
            } else if pending_reconsume {
                self.current_input_character
            } else {
                self.peek_codepoint(0)
            };

            // "If the character reference was consumed as part of an attribute, and
            // the last character matched is not a U+003B SEMICOLON character (;), and
            // the next input character is either a U+003D EQUALS SIGN character (=) or
            // an ASCII alphanumeric, then, for historical reasons, flush code points
            // consumed as a character reference and switch to the return state."
            let historical = self.is_consumed_as_part_of_attribute()
                && !last_char_is_semicolon
                && next_char.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric());

            if historical {
                self.flush_code_points_consumed_as_character_reference();
            } else {
                if !last_char_is_semicolon {
                    self.log_parse_error("missing-semicolon-after-character-reference");
                }
                let after_match = self.temporary_buffer[match_len..].to_string();
                self.temporary_buffer.clear();
                self.temporary_buffer.push_str(replacement);
                self.temporary_buffer.push_str(&after_match);
                self.flush_code_points_consumed_as_character_reference();
            }
        } else {
            // "Otherwise: Flush code points consumed as a character reference.
            // Switch to the ambiguous ampersand state."
            //
            // The ambiguous ampersand state only re-emits alphanumerics, which
            // the loop above already consumed into the buffer.
            if self.temporary_buffer.ends_with(';') {
                self.log_parse_error("unknown-named-character-reference");
            }
            self.flush_code_points_consumed_as_character_reference();
        }

        let return_state = self.take_return_state();
        if pending_reconsume {
            self.reconsume_in(return_state);
        } else {
            self.switch_to(return_state);
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;

        match self.current_input_character {
            // "U+0078 LATIN SMALL LETTER X / U+0058 LATIN CAPITAL LETTER X - Append
            // the current input character to the temporary buffer. Switch to the
            // hexadecimal character reference start state."
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            // "Anything else - Reconsume in the decimal character reference start state."
            _ => {
                self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart);
            }
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_numeric_character_reference_start_state(&mut self, radix: u32) {
        match self.current_input_character {
            // "ASCII (hex) digit - Reconsume in the (hexa)decimal character reference state."
            Some(c) if c.is_digit(radix) => {
                let next = if radix == 16 {
                    TokenizerState::HexadecimalCharacterReference
                } else {
                    TokenizerState::DecimalCharacterReference
                };
                self.reconsume_in(next);
            }
            // "Anything else - This is an absence-of-digits-in-numeric-character-reference
            // parse error. Flush code points consumed as a character reference.
            // Reconsume in the return state."
            _ => {
                self.log_parse_error("absence-of-digits-in-numeric-character-reference");
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_numeric_character_reference_digits_state(&mut self, radix: u32) {
        match self.current_input_character {
            // "Multiply the character reference code by 16 (or 10). Add a numeric
            // version of the current input character to the character reference code."
            Some(c) if c.is_digit(radix) => {
                let digit = c.to_digit(radix).unwrap_or(0);
                // Saturate well above the Unicode range; the end state rejects it.
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(radix)
                    .saturating_add(digit)
                    .min(0x0011_0000);
            }
            // "U+003B SEMICOLON - Switch to the numeric character reference end state."
            Some(';') => {
                self.resolve_numeric_character_reference();
                let return_state = self.take_return_state();
                self.switch_to(return_state);
            }
            // "Anything else - This is a missing-semicolon-after-character-reference
            // parse error. Reconsume in the numeric character reference end state."
            _ => {
                self.log_parse_error("missing-semicolon-after-character-reference");
                self.resolve_numeric_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// Null, out-of-range and surrogate code points become U+FFFD.
    fn resolve_numeric_character_reference(&mut self) {
        let code = self.character_reference_code;
        let resolved = match code {
            0 => {
                self.log_parse_error("null-character-reference");
                '\u{FFFD}'
            }
            _ => char::from_u32(code).unwrap_or_else(|| {
                self.log_parse_error("character-reference-outside-unicode-range");
                '\u{FFFD}'
            }),
        };
        self.temporary_buffer.clear();
        self.temporary_buffer.push(resolved);
        self.flush_code_points_consumed_as_character_reference();
    }
}
