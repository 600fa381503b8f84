//! Generic quoted-literal scanning.
//!
//! # Overview
//!
//! A [`QuotedScanner`] is configured once, with delimiter matchers, an
//! escape-handler chain, and a [`ScanOptions`] policy, and is then run over
//! any number of literals. [`scan`](QuotedScanner::scan) is a single
//! forward pass with no interior mutability, so one scanner instance can
//! serve every call site of a lexer, and every thread, at the same time.
//!
//! # Invariants
//!
//! - `ScanResult::len` counts bytes from the opening delimiter through the
//!   last byte examined; advancing a lexer cursor by it lands exactly where
//!   scanning stopped.
//! - `ScanResult::escapes` is strictly ordered by position and spans never
//!   overlap.
//! - Rejection ([`Reject`]) has no side effects: nothing is consumed and
//!   nothing is reported, so the caller is free to try another grammar rule
//!   at the same position.


mod options;

pub use options::ScanOptions;

use core::fmt;

use alloc::{boxed::Box, string::String, vec::Vec};

use thiserror::Error;

use crate::{
    escape::{BoxedHandler, LeadIn},
    text::{char_at, is_line_terminator},
};

/// Recognizes a delimiter at a byte position.
pub struct QuoteMatcher(Matcher);

enum Matcher {
    Exact(String),
    Custom(Box<dyn Fn(&str, usize) -> Option<usize> + Send + Sync>),
}

impl QuoteMatcher {
    /// Match `delimiter` verbatim.
    pub fn exact(delimiter: impl Into<String>) -> Self {
        Self(Matcher::Exact(delimiter.into()))
    }

    /// Match with `predicate`, which receives the whole buffer and the
    /// candidate position and returns the consumed byte length on a hit.
    pub fn custom(
        predicate: impl Fn(&str, usize) -> Option<usize> + Send + Sync + 'static,
    ) -> Self {
        Self(Matcher::Custom(Box::new(predicate)))
    }

    /// Byte length of the delimiter at `text[at..]`, or `None`.
    #[inline]
    #[must_use]
    pub fn matches(&self, text: &str, at: usize) -> Option<usize> {
        match &self.0 {
            Matcher::Exact(s) => text
                .get(at..)?
                .starts_with(s.as_str())
                .then_some(s.len()),
            Matcher::Custom(predicate) => predicate(text, at),
        }
    }
}

impl fmt::Debug for QuoteMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Matcher::Exact(s) => f.debug_tuple("Exact").field(s).finish(),
            Matcher::Custom(_) => f.debug_tuple("Custom").field(&"..").finish(),
        }
    }
}

/// One escape encountered during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EscapeRecord<D> {
    /// The lead-in occurrence that opened the escape.
    pub lead: LeadIn,
    /// What the escape contributed to [`ScanResult::value`].
    pub value: String,
    /// Total byte length, lead-in included.
    pub len: usize,
    /// Defect tag from the claiming handler, if it reported one. `None`
    /// also covers the unhandled case, where no handler claimed the
    /// sequence and the lead-in itself became content.
    pub defect: Option<D>,
}

impl<D> EscapeRecord<D> {
    /// Byte range the escape covers in the source.
    #[must_use]
    pub fn span(&self) -> core::ops::Range<usize> {
        self.lead.at..self.lead.at + self.len
    }
}

/// A completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanResult<D> {
    /// Bytes consumed, counted from the opening delimiter through the last
    /// byte examined (the closing delimiter when one was found).
    pub len: usize,
    /// Literal spans and decoded escape values, concatenated in source
    /// order.
    pub value: String,
    /// The closing delimiter was never reached. Only possible when
    /// [`ScanOptions::allow_unterminated`] is set.
    pub unterminated: bool,
    /// Escapes in source order.
    pub escapes: Vec<EscapeRecord<D>>,
}

/// Structured rejection. Nothing was consumed; the caller may try another
/// grammar rule at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Reject {
    /// The opening delimiter did not match at the start position.
    #[error("no opening delimiter at byte {at}")]
    NoOpening {
        /// Start position handed to [`QuotedScanner::scan`].
        at: usize,
    },
    /// The literal ran out of input, or hit a bare line terminator, and
    /// [`ScanOptions::allow_unterminated`] is off.
    #[error("unterminated literal starting at byte {at}")]
    Unterminated {
        /// Start position handed to [`QuotedScanner::scan`].
        at: usize,
    },
}

/// A configured quoted-literal scanner.
///
/// `D` is the defect vocabulary of this instantiation; handlers tag the
/// content they decode under protest with it.
pub struct QuotedScanner<D> {
    open: QuoteMatcher,
    close: QuoteMatcher,
    handlers: Vec<BoxedHandler<D>>,
    options: ScanOptions,
}

impl<D> QuotedScanner<D> {
    /// Fix the delimiters, the handler chain, and the policy.
    ///
    /// Handlers are consulted in `handlers` order and the first to accept
    /// wins, so a [`PassThrough`](crate::PassThrough) belongs at the end.
    pub fn new(
        open: QuoteMatcher,
        close: QuoteMatcher,
        handlers: Vec<BoxedHandler<D>>,
        options: ScanOptions,
    ) -> Self {
        Self {
            open,
            close,
            handlers,
            options,
        }
    }

    /// Scan one literal at byte `at`.
    ///
    /// On success the result covers the whole literal, delimiters included.
    /// An unterminated literal either comes back flagged or rejects,
    /// depending on [`ScanOptions::allow_unterminated`].
    ///
    /// # Errors
    ///
    /// [`Reject::NoOpening`] when the opening matcher fails at `at`, and
    /// [`Reject::Unterminated`] when the literal never closes and the
    /// policy does not tolerate that. Neither consumes anything.
    pub fn scan(&self, text: &str, at: usize) -> Result<ScanResult<D>, Reject> {
        let Some(open_len) = self.open.matches(text, at) else {
            return Err(Reject::NoOpening { at });
        };
        let mut pos = at + open_len;
        let mut value = String::new();
        let mut escapes = Vec::new();
        let lead_in = self.options.lead_in.as_str();

        loop {
            if pos >= text.len() {
                return self.unterminated(text.len(), at, value, escapes);
            }
            if let Some(close_len) = self.close.matches(text, pos) {
                return Ok(ScanResult {
                    len: pos + close_len - at,
                    value,
                    unterminated: false,
                    escapes,
                });
            }
            if !lead_in.is_empty()
                && text.get(pos..).is_some_and(|tail| tail.starts_with(lead_in))
            {
                let lead = LeadIn {
                    at: pos,
                    len: lead_in.len(),
                };
                pos = self.dispatch(text, lead, &mut value, &mut escapes);
                continue;
            }
            let Some((ch, ch_len)) = char_at(text, pos) else {
                return self.unterminated(pos, at, value, escapes);
            };
            if is_line_terminator(ch) && !self.options.multiline {
                return self.unterminated(pos, at, value, escapes);
            }
            value.push(ch);
            pos += ch_len;
        }
    }

    /// Offer the escape at `lead` to the chain; returns the position to
    /// resume at. An unclaimed lead-in degrades to literal content.
    fn dispatch(
        &self,
        text: &str,
        lead: LeadIn,
        value: &mut String,
        escapes: &mut Vec<EscapeRecord<D>>,
    ) -> usize {
        for handler in &self.handlers {
            if let Some(decoded) = handler.decode(text, lead) {
                value.push_str(&decoded.value);
                let len = lead.len + decoded.len;
                escapes.push(EscapeRecord {
                    lead,
                    value: decoded.value,
                    len,
                    defect: decoded.defect,
                });
                return lead.at + len;
            }
        }
        let raw = &text[lead.at..lead.at + lead.len];
        value.push_str(raw);
        escapes.push(EscapeRecord {
            lead,
            value: String::from(raw),
            len: lead.len,
            defect: None,
        });
        lead.at + lead.len
    }

    fn unterminated(
        &self,
        stop: usize,
        start: usize,
        value: String,
        escapes: Vec<EscapeRecord<D>>,
    ) -> Result<ScanResult<D>, Reject> {
        if self.options.allow_unterminated {
            Ok(ScanResult {
                len: stop - start,
                value,
                unterminated: true,
                escapes,
            })
        } else {
            Err(Reject::Unterminated { at: start })
        }
    }
}
