//! Full-fidelity scanning of ECMAScript-style string literals.
//!
//! # Overview
//!
//! [`StringScanner`] reproduces the host grammar defect-for-defect rather
//! than approximating it: legacy octal escapes decode *and* diagnose,
//! `\u{...}` accepts any code point through 0x10FFFF and validates numeric
//! separators inside the braces, line continuations splice physical lines,
//! and every diagnostic lands at the exact byte the host compiler would
//! point at. Defects never abort a scan; the value keeps accumulating so an
//! error-tolerant lexer gets both the best-effort text and the full defect
//! list in one pass.
//!
//! The cursor is reusable: [`reset`](StringScanner::reset) rebinds it in
//! O(1), so a tokenizer keeps one cursor per file instead of allocating
//! scanner state per literal.
//!
//! # Fidelity notes
//!
//! - Offsets are bytes into the `&str` buffer, the Rust equivalent of the
//!   host's UTF-16 code-unit indexing.
//! - Adjacent `\uHHHH` escapes spelling a surrogate pair decode to the
//!   combined character. A half that does not pair decodes to U+FFFD,
//!   without a diagnostic, since a Rust string cannot hold it.

mod diag;


pub use diag::{Diagnostic, DiagnosticKind, DiagnosticSink, SinkFn};

use alloc::string::String;

use crate::text::{char_at, is_line_terminator, line_terminator_len};

/// A finished literal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScannedLiteral {
    /// Decoded text between the delimiters.
    pub value: String,
    /// Byte offset one past the last byte consumed.
    pub end: usize,
}

/// Reusable scanning cursor over one source buffer.
///
/// One cursor serves one scan at a time; `&mut self` on
/// [`scan_literal`](Self::scan_literal) makes that discipline a
/// compile-time fact rather than a convention.
#[derive(Debug)]
pub struct StringScanner<'src> {
    text: &'src str,
    pos: usize,
    scratch: String,
}

impl<'src> StringScanner<'src> {
    /// Cursor at the start of `text`.
    #[must_use]
    pub fn new(text: &'src str) -> Self {
        Self {
            text,
            pos: 0,
            scratch: String::new(),
        }
    }

    /// Rebind the cursor to `text` at byte `at`.
    ///
    /// O(1); nothing from the previous scan survives.
    pub fn reset(&mut self, text: &'src str, at: usize) {
        self.text = text;
        self.pos = at;
        self.scratch.clear();
    }

    /// Current byte position.
    #[inline]
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Scan the literal under the cursor.
    ///
    /// The delimiter is whatever character the cursor rests on. On return
    /// the cursor sits one past the closing delimiter, or at the defect
    /// that ended the scan. With `raw` set, escape interpretation and
    /// line-terminator rejection are both off (attribute-style literals):
    /// only the delimiter or end of input stops the scan.
    ///
    /// Diagnostics reach `sink` the moment they are recognized. They never
    /// stop the scan.
    pub fn scan_literal(
        &mut self,
        raw: bool,
        sink: &mut impl DiagnosticSink,
    ) -> ScannedLiteral {
        self.scratch.clear();
        let Some((quote, quote_len)) = char_at(self.text, self.pos) else {
            sink.report(Diagnostic {
                kind: DiagnosticKind::UnterminatedLiteral,
                at: self.pos,
                len: 0,
            });
            return self.finish();
        };
        self.pos += quote_len;
        loop {
            let Some((ch, ch_len)) = char_at(self.text, self.pos) else {
                sink.report(Diagnostic {
                    kind: DiagnosticKind::UnterminatedLiteral,
                    at: self.pos,
                    len: 0,
                });
                break;
            };
            if ch == quote {
                self.pos += ch_len;
                break;
            }
            if ch == '\\' && !raw {
                self.pos += ch_len;
                self.scan_escape(sink);
                continue;
            }
            if is_line_terminator(ch) && !raw {
                sink.report(Diagnostic {
                    kind: DiagnosticKind::UnterminatedLiteral,
                    at: self.pos,
                    len: 0,
                });
                break;
            }
            self.scratch.push(ch);
            self.pos += ch_len;
        }
        self.finish()
    }

    fn finish(&mut self) -> ScannedLiteral {
        ScannedLiteral {
            value: core::mem::take(&mut self.scratch),
            end: self.pos,
        }
    }

    /// Decode one escape sequence. The cursor sits just past the `\`.
    fn scan_escape(&mut self, sink: &mut impl DiagnosticSink) {
        let bs = self.pos - 1;
        let Some((ch, ch_len)) = char_at(self.text, self.pos) else {
            sink.report(Diagnostic {
                kind: DiagnosticKind::UnexpectedEnd,
                at: self.pos,
                len: 0,
            });
            return;
        };
        match ch {
            // `\0` alone is NUL; `\0` before a digit is a legacy octal run.
            '0' if !self.ascii_digit_at(self.pos + 1) => {
                self.pos += 1;
                self.scratch.push('\0');
            }
            '0'..='7' => self.scan_octal(sink),
            '8' | '9' => {
                self.pos += 1;
                sink.report(Diagnostic {
                    kind: DiagnosticKind::BareDigitEscape { digit: ch },
                    at: bs,
                    len: 2,
                });
                self.scratch.push(ch);
            }
            'b' => {
                self.pos += 1;
                self.scratch.push('\u{0008}');
            }
            't' => {
                self.pos += 1;
                self.scratch.push('\t');
            }
            'n' => {
                self.pos += 1;
                self.scratch.push('\n');
            }
            'v' => {
                self.pos += 1;
                self.scratch.push('\u{000B}');
            }
            'f' => {
                self.pos += 1;
                self.scratch.push('\u{000C}');
            }
            'r' => {
                self.pos += 1;
                self.scratch.push('\r');
            }
            'u' => {
                self.pos += 1;
                self.scan_unicode_escape(bs, sink);
            }
            'x' => {
                self.pos += 1;
                self.scan_hex_escape(bs, sink);
            }
            _ => {
                let continuation = line_terminator_len(self.text, self.pos);
                if continuation > 0 {
                    // Line continuation: the terminator joins the physical
                    // lines and contributes nothing.
                    self.pos += continuation;
                } else {
                    // Everything else, quotes and `\` included, escapes to
                    // itself.
                    self.pos += ch_len;
                    self.scratch.push(ch);
                }
            }
        }
    }

    fn ascii_digit_at(&self, at: usize) -> bool {
        self.text.as_bytes().get(at).is_some_and(u8::is_ascii_digit)
    }

    /// Legacy octal run, cursor on its first digit. Runs starting `0`..`3`
    /// take up to three digits total, `4`..`7` up to two, mirroring the
    /// host grammar's 0..=255 range.
    fn scan_octal(&mut self, sink: &mut impl DiagnosticSink) {
        let bytes = self.text.as_bytes();
        let digits_at = self.pos;
        let max = if bytes[digits_at] <= b'3' { 3 } else { 2 };
        let mut end = digits_at + 1;
        while end < bytes.len()
            && end - digits_at < max
            && matches!(bytes[end], b'0'..=b'7')
        {
            end += 1;
        }
        let mut value: u32 = 0;
        for &b in &bytes[digits_at..end] {
            value = value * 8 + u32::from(b - b'0');
        }
        self.pos = end;
        sink.report(Diagnostic {
            kind: DiagnosticKind::LegacyOctal { value },
            at: digits_at,
            len: end - digits_at,
        });
        self.scratch
            .push(u8::try_from(value).map_or('\u{FFFD}', char::from));
    }

    /// `\xHH`, cursor just past the `x`.
    fn scan_hex_escape(&mut self, bs: usize, sink: &mut impl DiagnosticSink) {
        if let Some(value) = self.hex_run(2, 2, false, sink) {
            self.scratch
                .push(u8::try_from(value).map_or('\u{FFFD}', char::from));
        } else {
            sink.report(Diagnostic {
                kind: DiagnosticKind::ExpectedHexDigit,
                at: self.pos,
                len: 0,
            });
            let raw = &self.text[bs..self.pos];
            self.scratch.push_str(raw);
        }
    }

    /// `\uHHHH` or `\u{...}`, cursor just past the `u`.
    fn scan_unicode_escape(&mut self, bs: usize, sink: &mut impl DiagnosticSink) {
        if self.text.as_bytes().get(self.pos) == Some(&b'{') {
            self.pos += 1;
            self.scan_code_point_escape(sink);
        } else {
            self.scan_fixed_unicode_escape(bs, sink);
        }
    }

    /// `\u{...}`, cursor just past the `{`. Separators are legal in this
    /// form only.
    fn scan_code_point_escape(&mut self, sink: &mut impl DiagnosticSink) {
        let run_start = self.pos;
        let parsed = self.hex_run(1, usize::MAX, true, sink);
        let run_end = self.pos;
        let mut invalid = false;
        let value = match parsed {
            None => {
                sink.report(Diagnostic {
                    kind: DiagnosticKind::ExpectedHexDigit,
                    at: self.pos,
                    len: 0,
                });
                invalid = true;
                0
            }
            Some(value) if value > 0x0010_FFFF => {
                sink.report(Diagnostic {
                    kind: DiagnosticKind::CodePointOutOfRange,
                    at: run_start,
                    len: run_end - run_start,
                });
                invalid = true;
                value
            }
            Some(value) => value,
        };
        if self.text.as_bytes().get(self.pos) == Some(&b'}') {
            self.pos += 1;
        } else {
            sink.report(Diagnostic {
                kind: DiagnosticKind::UnterminatedUnicodeEscape,
                at: self.pos,
                len: 0,
            });
            invalid = true;
        }
        if invalid {
            // The raw hex run stands in for an undecodable escape.
            let raw = &self.text[run_start..run_end];
            self.scratch.push_str(raw);
        } else {
            self.scratch
                .push(char::from_u32(value).unwrap_or('\u{FFFD}'));
        }
    }

    /// `\uHHHH`, cursor just past the `u`.
    fn scan_fixed_unicode_escape(&mut self, bs: usize, sink: &mut impl DiagnosticSink) {
        let Some(value) = self.hex_run(4, 4, false, sink) else {
            sink.report(Diagnostic {
                kind: DiagnosticKind::ExpectedHexDigit,
                at: self.pos,
                len: 0,
            });
            let raw = &self.text[bs..self.pos];
            self.scratch.push_str(raw);
            return;
        };
        match char::from_u32(value) {
            Some(ch) => self.scratch.push(ch),
            None => {
                let ch = self.combine_surrogates(value);
                self.scratch.push(ch);
            }
        }
    }

    /// A UTF-16 half is not a scalar value on its own; pair a high half
    /// with an adjacent `\uLLLL` low half when the source spells one, else
    /// substitute U+FFFD.
    fn combine_surrogates(&mut self, high: u32) -> char {
        if !(0xD800..0xDC00).contains(&high) {
            return '\u{FFFD}';
        }
        let bytes = self.text.as_bytes();
        if bytes.get(self.pos) != Some(&b'\\') || bytes.get(self.pos + 1) != Some(&b'u') {
            return '\u{FFFD}';
        }
        let mut low: u32 = 0;
        for offset in 0..4 {
            match bytes
                .get(self.pos + 2 + offset)
                .and_then(|&b| char::from(b).to_digit(16))
            {
                Some(digit) => low = low * 16 + digit,
                None => return '\u{FFFD}',
            }
        }
        if !(0xDC00..0xE000).contains(&low) {
            return '\u{FFFD}';
        }
        self.pos += 6;
        let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(combined).unwrap_or('\u{FFFD}')
    }

    /// Hex-digit run, the worker behind all three hex forms.
    ///
    /// Consumes up to `max` digits, stopping at the first byte that is
    /// neither a digit nor, when `separators` is on, an `_`. The value
    /// saturates instead of wrapping. At least `min` digits must be present
    /// for a value to come back; the cursor rests after everything consumed
    /// either way, so a malformed run is never re-scanned.
    ///
    /// Separator placement is validated as it goes: legal only strictly
    /// between two digits, and every misplaced one is reported exactly once
    /// and still consumed.
    fn hex_run(
        &mut self,
        min: usize,
        max: usize,
        separators: bool,
        sink: &mut impl DiagnosticSink,
    ) -> Option<u32> {
        let bytes = self.text.as_bytes();
        let mut value: u32 = 0;
        let mut digits = 0usize;
        let mut can_separate = false;
        let mut pending_separator = false;
        while digits < max {
            let Some(&b) = bytes.get(self.pos) else { break };
            if separators && b == b'_' {
                if can_separate {
                    can_separate = false;
                    pending_separator = true;
                } else {
                    let kind = if pending_separator {
                        DiagnosticKind::RepeatedSeparator
                    } else {
                        DiagnosticKind::MisplacedSeparator
                    };
                    sink.report(Diagnostic {
                        kind,
                        at: self.pos,
                        len: 1,
                    });
                }
                self.pos += 1;
                continue;
            }
            let Some(digit) = char::from(b).to_digit(16) else {
                break;
            };
            value = value.saturating_mul(16).saturating_add(digit);
            digits += 1;
            can_separate = separators;
            pending_separator = false;
            self.pos += 1;
        }
        if pending_separator {
            // The run ended on a separator that was consumed on good faith.
            sink.report(Diagnostic {
                kind: DiagnosticKind::MisplacedSeparator,
                at: self.pos - 1,
                len: 1,
            });
        }
        (digits >= min).then_some(value)
    }
}
