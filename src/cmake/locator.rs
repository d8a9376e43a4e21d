use regex::Regex;

/// A located `set(NAME ...)` declaration inside a CMakeLists buffer.
///
/// All offsets are byte offsets into the buffer the block was found in. The
/// descriptor is ephemeral: it is produced by [`find_set_block`] and consumed
/// immediately by a mutation, never persisted across edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetBlock {
    /// Offset of the `set` keyword.
    pub start: usize,
    /// One past the balancing `)`.
    pub end: usize,
    /// Offset of the opening line, including its indentation.
    pub line_start: usize,
    /// The `set(NAME` opener text, trimmed.
    pub opener: String,
    /// Interior of the block, trailing whitespace excluded.
    pub content: String,
    /// Trailing whitespace plus the closing `)`.
    pub suffix: String,
    /// Leading whitespace of the opening line.
    pub indent: String,
    /// Whether the declaration was found in commented form.
    pub commented: bool,
}

/// Locate the first `set(<name> ...)` declaration in `buffer`.
///
/// The opener is matched line-anchored and whitespace-tolerant; the block's
/// extent is then resolved by balanced-parenthesis scanning, so nested
/// parentheses inside entries do not truncate the match. When
/// `include_commented` is true, a declaration whose opening line carries a
/// `#` marker is also accepted and reported via [`SetBlock::commented`];
/// when false, commented declarations are rejected outright.
///
/// Returns `None` when no declaration exists or when the only candidates are
/// unterminated (the buffer ends before the parentheses balance).
pub fn find_set_block(buffer: &str, name: &str, include_commented: bool) -> Option<SetBlock> {
    let pattern = if include_commented {
        format!(r"(?m)^(\s*)(#\s*)?(set\s*\(\s*{}\s*)", regex::escape(name))
    } else {
        format!(r"(?m)^(\s*)(set\s*\(\s*{}\s*)", regex::escape(name))
    };
    let re = Regex::new(&pattern).ok()?;

    for caps in re.captures_iter(buffer) {
        let (opener_group, comment_marker) = if include_commented {
            (caps.get(3), caps.get(2))
        } else {
            (caps.get(2), None)
        };
        let Some(opener_m) = opener_group else {
            continue;
        };

        if !include_commented {
            // Reject anything with a comment marker between the start of the
            // line and the opener.
            let line_start = buffer[..opener_m.start()].rfind('\n').map_or(0, |i| i + 1);
            if buffer[line_start..opener_m.start()].contains('#') {
                continue;
            }
        }

        let interior_start = opener_m.end();
        let Some(close) = matching_paren(buffer, interior_start) else {
            // Unterminated declaration: not an error, just not a block.
            continue;
        };

        // Fold whitespace immediately before the closing paren into the
        // suffix so a rewrite can preserve the original closing style.
        let mut suffix_start = close;
        while suffix_start > interior_start
            && buffer.as_bytes()[suffix_start - 1].is_ascii_whitespace()
        {
            suffix_start -= 1;
        }

        let (line_start, indent) = match caps.get(1) {
            Some(m) => (m.start(), m.as_str().to_string()),
            None => (opener_m.start(), String::new()),
        };

        return Some(SetBlock {
            start: opener_m.start(),
            end: close + 1,
            line_start,
            opener: opener_m.as_str().trim().to_string(),
            content: buffer[interior_start..suffix_start].to_string(),
            suffix: buffer[suffix_start..=close].to_string(),
            indent,
            commented: comment_marker.is_some(),
        });
    }

    None
}

/// Find the balancing `)` for an already-consumed `(`.
///
/// The nesting counter starts at 1; scanning is byte-wise since both
/// delimiters are ASCII. Returns the byte offset of the closing paren, or
/// `None` if the buffer ends before balance is reached.
fn matching_paren(buffer: &str, from: usize) -> Option<usize> {
    let mut counter = 1usize;
    for (i, b) in buffer.as_bytes()[from..].iter().enumerate() {
        match b {
            b'(' => counter += 1,
            b')' => {
                counter -= 1;
                if counter == 0 {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}
