use std::fs;
use std::path::Path;
use thiserror::Error;

/// Condition string selecting the property group this tool mines.
const DEBUG_X64_CONDITION: &str = "'$(Configuration)|$(Platform)'=='Debug|x64'";

/// Include and library search paths mined from a `.vcxproj` file, in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPaths {
    pub include_paths: Vec<String>,
    pub library_paths: Vec<String>,
}

#[derive(Error, Debug)]
pub enum VcxprojError {
    #[error("failed to read project file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed project XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Read and parse a project file from disk.
pub fn load_project(path: &Path) -> Result<ProjectPaths, VcxprojError> {
    let xml = fs::read_to_string(path)?;
    parse_project(&xml)
}

/// Extract `IncludePath` and `LibraryPath` from the Debug|x64 property
/// groups of a `.vcxproj` document.
///
/// Matching is on local element names, so namespaced and non-namespaced
/// documents behave identically. List items are semicolon-delimited,
/// trimmed, with empty items dropped. Documents without a matching property
/// group yield empty lists; only malformed XML is an error, and callers are
/// expected to degrade to empty lists rather than abort.
pub fn parse_project(xml: &str) -> Result<ProjectPaths, VcxprojError> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut paths = ProjectPaths::default();

    for group in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "PropertyGroup")
    {
        let condition = group.attribute("Condition").unwrap_or("");
        if !condition.contains(DEBUG_X64_CONDITION) {
            continue;
        }

        for child in group.children().filter(|c| c.is_element()) {
            let Some(text) = child.text() else {
                continue;
            };
            let items = text
                .split(';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string);

            match child.tag_name().name() {
                "IncludePath" => paths.include_paths.extend(items),
                "LibraryPath" => paths.library_paths.extend(items),
                _ => {}
            }
        }
    }

    Ok(paths)
}
