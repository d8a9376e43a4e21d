use regex::Regex;

/// Translate a Windows path to its WSL mount-point equivalent.
///
/// A case-insensitive `C:/` or `C:\` prefix becomes `/mnt/c/`; all remaining
/// backslashes become forward slashes. Paths without a recognized drive
/// prefix pass through with only slash normalization.
pub fn to_wsl_path(path: &str) -> String {
    let bytes = path.as_bytes();
    let has_drive = bytes.len() >= 3
        && (bytes[0] == b'C' || bytes[0] == b'c')
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\');

    let translated = if has_drive {
        format!("/mnt/c/{}", &path[3..])
    } else {
        path.to_string()
    };

    translated.replace('\\', "/")
}

/// Format a path for use inside a `set(...)` block.
///
/// The path is WSL-translated, then wrapped in double quotes unless it
/// contains an MSBuild variable reference like `$(SolutionDir)`, which CMake
/// must receive unquoted.
pub fn format_cmake_path(path: &str) -> String {
    let path = to_wsl_path(path);

    if variable_reference().is_match(&path) {
        path
    } else {
        format!("\"{path}\"")
    }
}

fn variable_reference() -> Regex {
    // Infallible: fixed pattern.
    Regex::new(r"\$\([^)]+\)").unwrap()
}
