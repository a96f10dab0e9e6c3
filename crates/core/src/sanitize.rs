//! Cleanup of free text sent to the Shopify Admin API.
//!
//! Customer-entered names, addresses and notes arrive from browsers and
//! mobile keyboards full of typographic punctuation, zero-width joiners and
//! emoji. The Admin API and some downstream integrations (invoices, carrier
//! labels) only handle Latin-1 reliably, so outbound strings are reduced to
//! that range before submission.
//!
//! ```
//! use jolananas_core::sanitize::sanitize_line;
//!
//! assert_eq!(sanitize_line("  L\u{2019}Atelier \u{2014} Caf\u{e9} \u{1F34D} ", 64), "L'Atelier - Café");
//! ```

/// Maximum length for single-line fields (names, address lines).
pub const MAX_LINE_CHARS: usize = 255;

/// Maximum length for notes.
pub const MAX_NOTE_CHARS: usize = 5000;

/// Clean a single-line field: newlines become spaces.
#[must_use]
pub fn sanitize_line(input: &str, max_chars: usize) -> String {
    sanitize_text(input, max_chars, false)
}

/// Clean a multi-line field: newlines are kept, other whitespace collapses.
#[must_use]
pub fn sanitize_multiline(input: &str, max_chars: usize) -> String {
    sanitize_text(input, max_chars, true)
}

/// Clean `input` and truncate it to `max_chars` characters.
#[must_use]
pub fn sanitize_text(input: &str, max_chars: usize, allow_newlines: bool) -> String {
    let mut mapped = String::with_capacity(input.len());
    for c in input.chars() {
        if let Some(replacement) = typographic_replacement(c) {
            mapped.push_str(replacement);
        } else if c == '\r' {
            // CRLF collapses into the following \n
        } else if c == '\n' {
            mapped.push(if allow_newlines { '\n' } else { ' ' });
        } else if c == '\t' {
            mapped.push(' ');
        } else if c.is_control() || is_invisible(c) || u32::from(c) > 0xFF {
            // dropped
        } else {
            mapped.push(c);
        }
    }

    let collapsed = collapse_whitespace(&mapped, allow_newlines);
    collapsed.chars().take(max_chars).collect::<String>().trim_end().to_owned()
}

/// ASCII replacement for common typographic characters.
const fn typographic_replacement(c: char) -> Option<&'static str> {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => Some("'"),
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' | '\u{00AB}' | '\u{00BB}' => Some("\""),
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => Some("-"),
        '\u{2022}' => Some("-"),
        '\u{2026}' => Some("..."),
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{2009}' | '\u{2002}' | '\u{2003}' => Some(" "),
        _ => None,
    }
}

/// Zero-width and formatting characters that render as nothing.
const fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
    )
}

fn collapse_whitespace(input: &str, allow_newlines: bool) -> String {
    if !allow_newlines {
        return input.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let lines: Vec<String> = input
        .split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    // Keep paragraph breaks but never more than one blank line in a row
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in &lines {
        if line.is_empty() && out.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    out.join("\n").trim_matches('\n').to_owned()
}
