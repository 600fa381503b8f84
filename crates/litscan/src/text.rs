//! Byte-offset character stepping shared by the scanners.

/// Decode the character starting at byte `at`, together with its encoded
/// length.
///
/// Returns `None` at or past the end of `text`. Invalid UTF-8 cannot occur
/// for `&str` input; if a scanner is ever stepped onto a non-boundary
/// offset, the replacement character is produced so the forward guarantee
/// holds.
#[inline]
pub(crate) fn char_at(text: &str, at: usize) -> Option<(char, usize)> {
    if at >= text.len() {
        return None;
    }
    let (ch, len) = bstr::decode_utf8(&text.as_bytes()[at..]);
    if len == 0 {
        return None;
    }
    Some((ch.unwrap_or('\u{FFFD}'), len))
}

/// ECMAScript `LineTerminator` membership: LF, CR, LINE SEPARATOR,
/// PARAGRAPH SEPARATOR.
#[inline]
pub(crate) fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Byte length of the line-terminator sequence starting at `at`, with CRLF
/// counting as one sequence. Zero when `at` does not sit on one.
#[inline]
pub(crate) fn line_terminator_len(text: &str, at: usize) -> usize {
    match char_at(text, at) {
        Some(('\r', len)) => {
            if text.as_bytes().get(at + len) == Some(&b'\n') {
                len + 1
            } else {
                len
            }
        }
        Some((ch, len)) if is_line_terminator(ch) => len,
        _ => 0,
    }
}
