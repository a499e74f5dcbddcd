use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>[a-z])-[ \t]*\r?\n[ \t]*(?P<suffix>[a-z])").unwrap());

static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:page\s+)?\d{1,4}\.?$").unwrap());

/// Normalises extracted script text while keeping its line structure.
///
/// Lowercase words broken across a line are rejoined; cues and headings are
/// uppercase and never match. Bare page numbers are dropped without breaking
/// the surrounding speech, and runs of blank lines collapse to one.
pub fn sanitize_script_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().filter(|c| !is_stray_control(*c)).collect();
    let de_hyphenated = HYPHEN_NEWLINE.replace_all(&normalized, "$prefix$suffix");

    let mut result = String::with_capacity(de_hyphenated.len());
    let mut prev_was_blank = false;
    let mut first_content = true;

    for line in de_hyphenated.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            prev_was_blank = true;
            continue;
        }
        if PAGE_MARKER.is_match(&trimmed.to_lowercase()) {
            continue;
        }

        if !first_content && prev_was_blank {
            result.push_str("\n\n");
        } else if !first_content {
            result.push('\n');
        }
        collapse_internal_whitespace(trimmed, &mut result);
        prev_was_blank = false;
        first_content = false;
    }

    result
}

fn is_stray_control(c: char) -> bool {
    c.is_control() && c != '\n' && c != '\t'
}

fn collapse_internal_whitespace(line: &str, out: &mut String) {
    let mut prev_was_space = false;

    for ch in line.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
}
