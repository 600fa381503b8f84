use alloc::{
    boxed::Box,
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use crate::{
    BoxedHandler, Diagnostic, DiagnosticKind, MapEscape, PassThrough, QuoteMatcher, QuotedScanner,
    ScanOptions, StringScanner,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Superfluous,
}

/// Double-quoted scanner that accepts everything: multiline, tolerant of
/// missing closers, with a fallback so no escape is ever unclaimed.
fn tolerant() -> QuotedScanner<Tag> {
    let handlers: Vec<BoxedHandler<Tag>> = vec![
        Box::new(MapEscape::new([
            ("n", "\n"),
            ("t", "\t"),
            ("\\", "\\"),
            ("\"", "\""),
        ])),
        Box::new(PassThrough::new(Tag::Superfluous)),
    ];
    QuotedScanner::new(
        QuoteMatcher::exact("\""),
        QuoteMatcher::exact("\""),
        handlers,
        ScanOptions {
            multiline: true,
            allow_unterminated: true,
            ..ScanOptions::default()
        },
    )
}

/// Property: text free of delimiters, lead-ins, and line terminators scans
/// back byte-for-byte, consuming exactly the quoted span.
#[test]
fn plain_text_round_trips_quickcheck() {
    fn prop(text: String) -> bool {
        let body: String = text
            .chars()
            .filter(|c| !matches!(*c, '"' | '\\' | '\n' | '\r' | '\u{2028}' | '\u{2029}'))
            .collect();
        let doc = format!("\"{body}\"");
        let scanner: QuotedScanner<Tag> = QuotedScanner::new(
            QuoteMatcher::exact("\""),
            QuoteMatcher::exact("\""),
            vec![],
            ScanOptions::default(),
        );
        let Ok(result) = scanner.scan(&doc, 0) else {
            return false;
        };
        result.value == body
            && result.len == doc.len()
            && !result.unterminated
            && result.escapes.is_empty()
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(String) -> bool);
}

/// Property: whatever the input and start offset, the consumed length
/// never overruns the buffer, lands on a character boundary, and ends on
/// the closing delimiter whenever the scan reports termination.
#[test]
fn consumed_length_is_sound_quickcheck() {
    fn prop(text: String, pad: u8) -> bool {
        let at = usize::from(pad % 8);
        let doc = format!("{}\"{text}", "x".repeat(at));
        let Ok(result) = tolerant().scan(&doc, at) else {
            return false;
        };
        at + result.len <= doc.len()
            && doc.is_char_boundary(at + result.len)
            && (result.unterminated || doc[at..at + result.len].ends_with('"'))
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(String, u8) -> bool);
}

/// Property: escape records come back strictly ordered, disjoint, and
/// wholly inside the consumed range.
#[test]
fn escape_records_stay_ordered_quickcheck() {
    fn prop(text: String) -> bool {
        let doc = format!("\"{text}");
        let Ok(result) = tolerant().scan(&doc, 0) else {
            return false;
        };
        // Content starts after the opening delimiter.
        let mut previous_end = 1;
        for record in &result.escapes {
            let span = record.span();
            if span.start < previous_end || span.end > result.len || span.is_empty() {
                return false;
            }
            previous_end = span.end;
        }
        true
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(String) -> bool);
}

/// Property: a chain ending in the pass-through fallback claims every
/// character, line terminators and delimiters included, so a lead-in is
/// never silently dropped.
#[quickcheck]
fn fallback_claims_any_char(c: char) -> bool {
    let handlers: Vec<BoxedHandler<Tag>> = vec![Box::new(PassThrough::new(Tag::Superfluous))];
    let scanner = QuotedScanner::new(
        QuoteMatcher::exact("\""),
        QuoteMatcher::exact("\""),
        handlers,
        ScanOptions::default(),
    );
    let doc = format!("\"\\{c}\"");
    let Ok(result) = scanner.scan(&doc, 0) else {
        return false;
    };
    result.value == c.to_string()
        && result.escapes.len() == 1
        && result.escapes[0].defect == Some(Tag::Superfluous)
        && result.escapes[0].len == 1 + c.len_utf8()
}

/// Property: the full-fidelity cursor never overruns and always rests on
/// a character boundary, whatever the input.
#[quickcheck]
fn literal_cursor_end_is_sound(text: String) -> bool {
    let mut scanner = StringScanner::new(&text);
    let lit = scanner.scan_literal(false, &mut ());
    lit.end <= text.len() && text.is_char_boundary(lit.end) && scanner.pos() == lit.end
}

/// Every two-digit octal escape decodes to its code point and diagnoses
/// exactly the digit run.
#[test]
fn octal_escapes_cover_two_digit_runs() {
    for high in 0..=7u32 {
        for low in 0..=7u32 {
            let value = high * 8 + low;
            let doc = format!("'\\{high}{low}'");
            let mut diags = Vec::new();
            let lit = StringScanner::new(&doc).scan_literal(false, &mut diags);
            let expected = char::from_u32(value).unwrap();
            assert_eq!(lit.value, expected.to_string(), "{doc}");
            assert_eq!(
                diags,
                vec![Diagnostic {
                    kind: DiagnosticKind::LegacyOctal { value },
                    at: 2,
                    len: 2,
                }],
                "{doc}"
            );
        }
    }
}

/// And the three-digit runs reach everything up to 0o377.
#[test]
fn octal_escapes_cover_three_digit_runs() {
    for high in 0..=3u32 {
        for mid in 0..=7u32 {
            for low in 0..=7u32 {
                let value = high * 64 + mid * 8 + low;
                let doc = format!("'\\{high}{mid}{low}'");
                let mut diags = Vec::new();
                let lit = StringScanner::new(&doc).scan_literal(false, &mut diags);
                let expected = char::from_u32(value).unwrap();
                assert_eq!(lit.value, expected.to_string(), "{doc}");
                assert_eq!(
                    diags,
                    vec![Diagnostic {
                        kind: DiagnosticKind::LegacyOctal { value },
                        at: 2,
                        len: 3,
                    }],
                    "{doc}"
                );
            }
        }
    }
}
