//! Track title cleanup
//!
//! Servers frequently leave artifacts around the `Artist - Title` string:
//! stray commas from CSV concatenation, a dangling ` - ` when either the
//! artist or the title is empty, or runs of whitespace.

/// Clean a raw track title into a presentable form
///
/// Never fails; for an already clean title this is the trimmed input.
pub fn normalize_title(raw: &str) -> String {
    let mut title = raw.trim();

    loop {
        let before = title;

        title = title.trim_matches(',').trim();
        if let Some(rest) = title.strip_prefix("- ") {
            title = rest.trim_start();
        }
        if let Some(rest) = title.strip_suffix(" -") {
            title = rest.trim_end();
        }
        if title == "-" {
            title = "";
        }

        if title == before {
            break;
        }
    }

    collapse_whitespace(title)
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_space = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !previous_space {
                out.push(' ');
            }
            previous_space = true;
        } else {
            out.push(c);
            previous_space = false;
        }
    }

    out
}
