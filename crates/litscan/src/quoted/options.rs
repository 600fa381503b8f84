use alloc::string::String;

/// Termination and escape policy for a [`QuotedScanner`].
///
/// [`QuotedScanner`]: crate::QuotedScanner
///
/// # Default
///
/// Single-line, unterminated literals rejected, `\` lead-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Whether raw line terminators are literal content.
    ///
    /// When `false`, a bare terminator leaves the literal unterminated and
    /// the `allow_unterminated` policy decides what happens. Terminators
    /// reached through an escape handler (a line continuation, say) are
    /// unaffected either way.
    ///
    /// # Default
    ///
    /// `false`
    pub multiline: bool,

    /// Whether a literal that runs out of input, or hits a bare line
    /// terminator, still produces a result.
    ///
    /// When `true`, the scan returns with `unterminated` set and everything
    /// up to the failure point consumed, which is what an error-tolerant
    /// lexer wants for resynchronization. When `false`, the scan rejects
    /// and the caller backtracks.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unterminated: bool,

    /// Escape lead-in text, looked up verbatim.
    ///
    /// An empty string disables escape dispatch entirely; the handler chain
    /// is never consulted.
    ///
    /// # Default
    ///
    /// `"\\"`
    pub lead_in: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            multiline: false,
            allow_unterminated: false,
            lead_in: String::from("\\"),
        }
    }
}
