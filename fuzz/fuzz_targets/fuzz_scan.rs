#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use litscan::{
    BoxedHandler, CodePointEscape, HexEscape, MapEscape, PassThrough, QuoteMatcher, QuotedScanner,
    Reject, ScanOptions, StringScanner,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Superfluous,
    Malformed,
}

/// A chain that exercises every primitive, with the `u{` form registered
/// ahead of the fixed `u` form so prefix ordering is on the hot path.
fn scanner(multiline: bool, allow_unterminated: bool) -> QuotedScanner<Tag> {
    let handlers: Vec<BoxedHandler<Tag>> = vec![
        Box::new(MapEscape::new([
            ("n", "\n"),
            ("t", "\t"),
            ("\\", "\\"),
            ("\"", "\""),
        ])),
        Box::new(MapEscape::line_continuation()),
        Box::new(CodePointEscape::default().or_defect(Tag::Malformed)),
        Box::new(HexEscape::new("u", 4).or_defect(Tag::Malformed)),
        Box::new(HexEscape::new("x", 2).or_defect(Tag::Malformed)),
        Box::new(PassThrough::new(Tag::Superfluous)),
    ];
    QuotedScanner::new(
        QuoteMatcher::exact("\""),
        QuoteMatcher::exact("\""),
        handlers,
        ScanOptions {
            multiline,
            allow_unterminated,
            ..ScanOptions::default()
        },
    )
}

fn check_engine(text: &str, at: usize, multiline: bool, allow_unterminated: bool) {
    match scanner(multiline, allow_unterminated).scan(text, at) {
        Ok(result) => {
            assert!(at + result.len <= text.len());
            assert!(text.is_char_boundary(at + result.len));
            if result.unterminated {
                assert!(allow_unterminated);
            }
            // Records are ordered, disjoint, and inside the consumed range.
            let mut previous_end = at + 1;
            for record in &result.escapes {
                let span = record.span();
                assert!(span.start >= previous_end);
                assert!(span.end > span.start);
                assert!(span.end <= at + result.len);
                previous_end = span.end;
            }
        }
        Err(Reject::NoOpening { at: rejected }) => assert_eq!(rejected, at),
        Err(Reject::Unterminated { at: rejected }) => {
            assert_eq!(rejected, at);
            assert!(!allow_unterminated);
        }
    }
}

fn check_fidelity(text: &str, at: usize, raw: bool) {
    if !text.is_char_boundary(at) {
        return;
    }
    let mut scanner = StringScanner::new(text);
    scanner.reset(text, at);
    let mut diags = Vec::new();
    let lit = scanner.scan_literal(raw, &mut diags);
    assert!(lit.end >= at);
    assert!(lit.end <= text.len());
    assert!(text.is_char_boundary(lit.end));
    assert_eq!(scanner.pos(), lit.end);
    for diag in &diags {
        assert!(diag.at + diag.len <= text.len());
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    multiline: bool,
    allow_unterminated: bool,
    raw: bool,
    at: u8,
    text: String,
}

fuzz_target!(|input: Input| {
    let Input {
        multiline,
        allow_unterminated,
        raw,
        at,
        text,
    } = input;
    // Any offset is legal for the engine; it rejects cleanly off-boundary.
    let at = usize::from(at).min(text.len());
    check_engine(&text, at, multiline, allow_unterminated);
    check_fidelity(&text, at, raw);
});
