//! Composable escape decoding.
//!
//! When a quoted-literal scan meets the configured lead-in (usually `\`),
//! the spot is offered to a chain of [`EscapeHandler`]s in registration
//! order. The first handler to return a [`Decoded`] claims the sequence;
//! later handlers never see it. Handlers carry no state and read only the
//! buffer they are handed, so a chain built once can serve any number of
//! scans concurrently.
//!
//! The primitives here cover the recurring shapes: a literal lookup table
//! ([`MapEscape`]), fixed-width hex ([`HexEscape`]), a bounded code-point
//! form ([`CodePointEscape`]), and the claim-anything terminator
//! ([`PassThrough`]). Anything else is a custom [`EscapeHandler`] impl.


use alloc::{
    boxed::Box,
    string::{String, ToString},
    vec::Vec,
};

use crate::text::char_at;

/// One occurrence of the escape lead-in inside the scanned buffer.
///
/// Offsets are bytes into the `&str` handed to the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeadIn {
    /// Byte offset of the first lead-in byte.
    pub at: usize,
    /// Byte length of the lead-in string.
    pub len: usize,
}

impl LeadIn {
    /// First byte after the lead-in, where the escape content begins.
    #[inline]
    #[must_use]
    pub fn content_start(&self) -> usize {
        self.at + self.len
    }
}

/// A handler's accepted result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<D> {
    /// Text the escape contributes to the scanned value. May be empty.
    pub value: String,
    /// Bytes consumed *after* the lead-in. Zero is legal.
    pub len: usize,
    /// Defect tag, in the vocabulary of the engine instantiation, when the
    /// handler decoded something it considers malformed.
    pub defect: Option<D>,
}

/// Decodes one escape sequence, or declines it.
pub trait EscapeHandler<D> {
    /// Inspect the escape starting at `lead` and either decode it or return
    /// `None` so the next handler in the chain is consulted.
    ///
    /// `lead` designates an occurrence of the lead-in inside `text`.
    /// Implementations must not read at or past `text.len()` and must not
    /// retain state across calls.
    fn decode(&self, text: &str, lead: LeadIn) -> Option<Decoded<D>>;
}

/// Handlers are registered boxed so one chain can mix handler types.
pub type BoxedHandler<D> = Box<dyn EscapeHandler<D> + Send + Sync>;

/// Ordered raw-text-to-replacement table.
///
/// The first matching entry wins. Construction sorts entries by descending
/// raw length (stable), so a key is never shadowed by one of its own
/// prefixes; among keys of equal length, registration order decides.
#[derive(Debug, Clone, Default)]
pub struct MapEscape {
    entries: Vec<(String, String)>,
}

impl MapEscape {
    /// Build a table from `(raw, replacement)` pairs.
    pub fn new<R, S>(entries: impl IntoIterator<Item = (R, S)>) -> Self
    where
        R: Into<String>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(raw, replacement)| (raw.into(), replacement.into()))
            .collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { entries }
    }

    /// Line continuations: every line-terminator sequence maps to the empty
    /// string, CRLF ahead of CR so it is consumed as one.
    #[must_use]
    pub fn line_continuation() -> Self {
        Self::new([
            ("\r\n", ""),
            ("\r", ""),
            ("\n", ""),
            ("\u{2028}", ""),
            ("\u{2029}", ""),
        ])
    }
}

impl<D> EscapeHandler<D> for MapEscape {
    fn decode(&self, text: &str, lead: LeadIn) -> Option<Decoded<D>> {
        let tail = text.get(lead.content_start()..)?;
        let (raw, replacement) = self
            .entries
            .iter()
            .find(|(raw, _)| tail.starts_with(raw.as_str()))?;
        Some(Decoded {
            value: replacement.clone(),
            len: raw.len(),
            defect: None,
        })
    }
}

/// Fixed-width hexadecimal escape, `\xHH` style: a prefix followed by an
/// exact number of hex digits.
///
/// Without an error policy the handler declines anything malformed. With
/// one (see [`or_defect`](Self::or_defect)) it accepts, consuming the
/// prefix plus exactly the valid digits scanned and decoding what was
/// there: the valid digit prefix, or nothing when no digit followed. A
/// value that is not a Unicode scalar (a UTF-16 surrogate half) counts as
/// malformed and decodes as U+FFFD.
#[derive(Debug, Clone)]
pub struct HexEscape<D> {
    prefix: String,
    digits: usize,
    malformed: Option<D>,
}

impl<D> HexEscape<D> {
    /// A `prefix` followed by exactly `digits` hex digits.
    pub fn new(prefix: impl Into<String>, digits: usize) -> Self {
        Self {
            prefix: prefix.into(),
            digits,
            malformed: None,
        }
    }

    /// Accept malformed sequences instead of declining, tagging them
    /// `defect`.
    #[must_use]
    pub fn or_defect(mut self, defect: D) -> Self {
        self.malformed = Some(defect);
        self
    }
}

impl<D> Default for HexEscape<D> {
    /// `\xHH`: prefix `x`, two digits.
    fn default() -> Self {
        Self::new("x", 2)
    }
}

impl<D: Clone> EscapeHandler<D> for HexEscape<D> {
    fn decode(&self, text: &str, lead: LeadIn) -> Option<Decoded<D>> {
        let tail = text.get(lead.content_start()..)?;
        let digits_text = tail.strip_prefix(self.prefix.as_str())?;
        let (value, seen) = hex_prefix(digits_text, self.digits);
        let len = self.prefix.len() + seen;
        let scalar = char::from_u32(value);
        if seen == self.digits {
            if let Some(ch) = scalar {
                return Some(Decoded {
                    value: ch.to_string(),
                    len,
                    defect: None,
                });
            }
        }
        // Short, non-hex, or a surrogate half.
        let defect = self.malformed.clone()?;
        let value = if seen == 0 {
            String::new()
        } else {
            scalar.unwrap_or('\u{FFFD}').to_string()
        };
        Some(Decoded {
            value,
            len,
            defect: Some(defect),
        })
    }
}

/// Bounded code-point escape, `\u{1F600}` style: prefix, one-to-N hex
/// digits, suffix.
///
/// Malformed shapes (zero digits, more than the maximum, a value above
/// 0x10FFFF or not a Unicode scalar, a missing suffix) decline unless an
/// error policy is set, in which case the whole contiguous hex run and the
/// suffix, when present, are consumed so nothing is re-scanned.
#[derive(Debug, Clone)]
pub struct CodePointEscape<D> {
    prefix: String,
    suffix: String,
    max_digits: usize,
    malformed: Option<D>,
}

impl<D> CodePointEscape<D> {
    /// A `prefix`, at most `max_digits` hex digits, then `suffix`.
    pub fn new(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        max_digits: usize,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            max_digits,
            malformed: None,
        }
    }

    /// Accept malformed sequences instead of declining, tagging them
    /// `defect`.
    #[must_use]
    pub fn or_defect(mut self, defect: D) -> Self {
        self.malformed = Some(defect);
        self
    }
}

impl<D> Default for CodePointEscape<D> {
    /// `\u{...}`: prefix `u{`, up to six digits, suffix `}`.
    fn default() -> Self {
        Self::new("u{", "}", 6)
    }
}

impl<D: Clone> EscapeHandler<D> for CodePointEscape<D> {
    fn decode(&self, text: &str, lead: LeadIn) -> Option<Decoded<D>> {
        let tail = text.get(lead.content_start()..)?;
        let rest = tail.strip_prefix(self.prefix.as_str())?;
        // Take every contiguous hex digit so a malformed run is consumed
        // whole.
        let digits = rest
            .bytes()
            .take_while(u8::is_ascii_hexdigit)
            .count();
        let (value, _) = hex_prefix(&rest[..digits], digits);
        let mut len = self.prefix.len() + digits;
        let suffixed = rest[digits..].starts_with(self.suffix.as_str());
        if suffixed {
            len += self.suffix.len();
        }
        let scalar = char::from_u32(value);
        if (1..=self.max_digits).contains(&digits) && suffixed {
            if let Some(ch) = scalar {
                return Some(Decoded {
                    value: ch.to_string(),
                    len,
                    defect: None,
                });
            }
        }
        let defect = self.malformed.clone()?;
        let value = if digits == 0 {
            String::new()
        } else {
            scalar.unwrap_or('\u{FFFD}').to_string()
        };
        Some(Decoded {
            value,
            len,
            defect: Some(defect),
        })
    }
}

/// Chain terminator: claims any single character after the lead-in and
/// tags it with the configured defect ("this escape was unnecessary").
///
/// Register it last; any handler after it is unreachable. It declines only
/// when no character follows the lead-in at all.
#[derive(Debug, Clone)]
pub struct PassThrough<D> {
    defect: D,
}

impl<D> PassThrough<D> {
    /// Tag every claimed character with `defect`.
    pub fn new(defect: D) -> Self {
        Self { defect }
    }
}

impl<D: Clone> EscapeHandler<D> for PassThrough<D> {
    fn decode(&self, text: &str, lead: LeadIn) -> Option<Decoded<D>> {
        let (ch, len) = char_at(text, lead.content_start())?;
        Some(Decoded {
            value: ch.to_string(),
            len,
            defect: Some(self.defect.clone()),
        })
    }
}

/// Accumulate up to `max` leading hex digits of `text`; the value
/// saturates at `u32::MAX` rather than wrapping.
fn hex_prefix(text: &str, max: usize) -> (u32, usize) {
    let mut value: u32 = 0;
    let mut seen = 0usize;
    for ch in text.chars().take(max) {
        let Some(digit) = ch.to_digit(16) else { break };
        value = value.saturating_mul(16).saturating_add(digit);
        seen += 1;
    }
    (value, seen)
}
