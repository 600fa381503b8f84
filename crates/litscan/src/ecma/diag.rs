//! Defect reporting for the host-grammar scanner.

use alloc::vec::Vec;

use thiserror::Error;

/// What went wrong, worded the way the host compiler words it.
///
/// The set is closed: downstream tooling switches over it exhaustively and
/// keys recovery and rendering decisions off the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// The literal never reached its closing delimiter.
    #[error("unterminated string literal")]
    UnterminatedLiteral,
    /// Input ended in the middle of an escape sequence.
    #[error("unexpected end of text")]
    UnexpectedEnd,
    /// A legacy `\NNN` octal escape. `value` is the decoded code, which
    /// doubles as the replacement hint in the rendered message.
    #[error("octal escape sequences are not allowed, use '\\x{value:02x}' instead")]
    LegacyOctal {
        /// Decoded octal value, at most 0xFF.
        value: u32,
    },
    /// `\8` or `\9`.
    #[error("escape sequence '\\{digit}' is not allowed")]
    BareDigitEscape {
        /// The offending digit.
        digit: char,
    },
    /// A hex digit was required and something else, or end of input, was
    /// found.
    #[error("hexadecimal digit expected")]
    ExpectedHexDigit,
    /// `\u{...}` parsed to a value above 0x10FFFF.
    #[error("an extended Unicode escape value must be between 0x0 and 0x10FFFF inclusive")]
    CodePointOutOfRange,
    /// `\u{` without its closing `}`.
    #[error("unterminated Unicode escape sequence")]
    UnterminatedUnicodeEscape,
    /// Two numeric separators in a row.
    #[error("multiple consecutive numeric separators are not permitted")]
    RepeatedSeparator,
    /// A numeric separator at the edge of a digit run.
    #[error("numeric separators are not allowed here")]
    MisplacedSeparator,
}

/// One defect, at an exact place in the source.
///
/// `at` and `len` are byte offsets into the scanned buffer; `len` spans the
/// offending text, and is zero for point defects where something was
/// missing rather than wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{kind} at byte {at}")]
pub struct Diagnostic {
    /// What was wrong.
    pub kind: DiagnosticKind,
    /// Byte offset of the offending text.
    pub at: usize,
    /// Byte length of the offending text.
    pub len: usize,
}

/// Receives diagnostics the moment the scanner recognizes them.
///
/// Scanning never stops for a diagnostic; the sink alone decides whether
/// to collect, forward, or drop what it is given.
pub trait DiagnosticSink {
    /// Called synchronously, zero or more times per scan, in source order.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Accumulates diagnostics in the order they were reported.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Discards everything.
impl DiagnosticSink for () {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Adapts a closure into a [`DiagnosticSink`].
#[derive(Debug, Clone)]
pub struct SinkFn<F>(pub F);

impl<F: FnMut(Diagnostic)> DiagnosticSink for SinkFn<F> {
    fn report(&mut self, diagnostic: Diagnostic) {
        (self.0)(diagnostic);
    }
}
