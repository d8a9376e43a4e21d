use crate::cmake::locator::{find_set_block, SetBlock};
use regex::Regex;

/// Indentation used when a block has no indented interior line to copy.
pub const DEFAULT_INDENT: &str = "    ";

/// Detect entry indentation from a block's original text.
///
/// `block_text` is the full declaration slice (opener line included). The
/// first interior line that starts with whitespace followed by a non-space
/// character supplies the indentation; blocks with no such line fall back to
/// [`DEFAULT_INDENT`].
pub fn detect_indent(block_text: &str) -> String {
    for line in block_text.lines().skip(1) {
        let ws_len = line.len() - line.trim_start().len();
        if ws_len > 0 && ws_len < line.len() {
            return line[..ws_len].to_string();
        }
    }
    DEFAULT_INDENT.to_string()
}

/// Rebuild a located declaration with a new entry list.
///
/// Each entry is placed on its own line under `indent`; the original opener
/// and closing style are preserved. An empty entry list collapses the block
/// to `<opener><suffix>` with no interior lines.
pub fn replace_entries(block: &SetBlock, entries: &[String], indent: &str) -> String {
    if entries.is_empty() {
        // Drop the leading whitespace of the suffix so the collapsed form is
        // a fixed point under relocation.
        return format!("{}{}", block.opener, block.suffix.trim_start());
    }

    let lines: Vec<String> = entries.iter().map(|e| format!("{indent}{e}")).collect();
    format!("{}\n{}{}", block.opener, lines.join("\n"), block.suffix)
}

/// Comment out the active `set(<name> ...)` declaration, if one exists.
///
/// Every non-blank line of the declaration span is prefixed with `# `;
/// blank lines are left untouched. A buffer without an active declaration
/// is returned unchanged.
pub fn comment_out_block(buffer: &str, name: &str) -> String {
    let Some(block) = find_set_block(buffer, name, false) else {
        return buffer.to_string();
    };

    let span = &buffer[block.line_start..block.end];
    let commented: Vec<String> = span
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("# {line}")
            }
        })
        .collect();

    format!(
        "{}{}{}",
        &buffer[..block.line_start],
        commented.join("\n"),
        &buffer[block.end..]
    )
}

/// Comment out every line matching `pattern` that is not already commented.
pub fn comment_out_line(buffer: &str, pattern: &Regex) -> String {
    let lines: Vec<String> = buffer
        .split('\n')
        .map(|line| {
            if pattern.is_match(line) && !line.trim_start().starts_with('#') {
                format!("# {line}")
            } else {
                line.to_string()
            }
        })
        .collect();

    lines.join("\n")
}
