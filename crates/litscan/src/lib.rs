//! Scanning for quoted literals, from reusable parts.
//!
//! Lexers keep reinventing string scanning: find the closing delimiter,
//! decode the escapes, decide what a newline means, report what was
//! malformed. This crate splits the job into three layers. A chain of
//! [`EscapeHandler`]s decodes one escape sequence at a time; a
//! [`QuotedScanner`] drives a configurable single-pass engine over a whole
//! literal; and [`StringScanner`] instantiates full ECMAScript
//! string-literal fidelity on top, legacy octal escapes, `\u{...}` forms,
//! numeric-separator validation and all, with a diagnostic at the exact
//! byte of every defect.
//!
//! ```rust
//! use litscan::{BoxedHandler, MapEscape, PassThrough, QuoteMatcher, QuotedScanner, ScanOptions};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Defect {
//!     Superfluous,
//! }
//!
//! let handlers: Vec<BoxedHandler<Defect>> = vec![
//!     Box::new(MapEscape::new([("n", "\n"), ("t", "\t")])),
//!     Box::new(PassThrough::new(Defect::Superfluous)),
//! ];
//! let scanner = QuotedScanner::new(
//!     QuoteMatcher::exact("\""),
//!     QuoteMatcher::exact("\""),
//!     handlers,
//!     ScanOptions::default(),
//! );
//!
//! let result = scanner.scan("\"a\\nb\" rest", 0).unwrap();
//! assert_eq!(result.value, "a\nb");
//! assert_eq!(result.len, 6);
//! assert!(result.escapes[0].defect.is_none());
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod text;

mod ecma;
mod escape;
mod quoted;

#[cfg(test)]
mod tests;

pub use ecma::{Diagnostic, DiagnosticKind, DiagnosticSink, ScannedLiteral, SinkFn, StringScanner};
pub use escape::{
    BoxedHandler, CodePointEscape, Decoded, EscapeHandler, HexEscape, LeadIn, MapEscape,
    PassThrough,
};
pub use quoted::{EscapeRecord, QuoteMatcher, QuotedScanner, Reject, ScanOptions, ScanResult};
