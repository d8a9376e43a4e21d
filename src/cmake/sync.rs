use crate::cmake::format::format_cmake_path;
use crate::cmake::locator::find_set_block;
use crate::cmake::mutator::{
    comment_out_block, comment_out_line, detect_indent, replace_entries, DEFAULT_INDENT,
};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Managed declaration holding the source file list.
pub const SRC_FILES: &str = "src_files";
/// Managed declaration holding include search paths.
pub const INCLUDE_DIRS: &str = "INCLUDE_DIRS";
/// Managed declaration holding library search paths.
pub const LIBRARY_DIRS: &str = "LIBRARY_DIRS";

const INCLUDE_INVOCATION: &str = "include_directories(${INCLUDE_DIRS})";
const LIBRARY_INVOCATION: &str = "link_directories(${LIBRARY_DIRS})";

fn include_invocation_line() -> Regex {
    // Infallible: fixed pattern.
    Regex::new(r"^\s*include_directories\s*\(\s*\$\{INCLUDE_DIRS\}\s*\)").unwrap()
}

fn library_invocation_line() -> Regex {
    Regex::new(r"^\s*link_directories\s*\(\s*\$\{LIBRARY_DIRS\}\s*\)").unwrap()
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of synchronizing a CMakeLists.txt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "SyncOutcome should be checked for missing-file/unchanged"]
pub enum SyncOutcome {
    /// The file was rewritten.
    Updated,
    /// The file was already a fixed point; nothing was written.
    Unchanged,
    /// No CMakeLists.txt exists at the target path; nothing was written.
    MissingFile,
}

/// Whether a project descriptor was found, and the paths mined from it.
///
/// A descriptor that was found but failed to parse is `Found` with empty
/// path lists: the run degrades rather than aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectState {
    Absent,
    Found {
        include_paths: Vec<String>,
        library_paths: Vec<String>,
    },
}

impl ProjectState {
    fn include_paths(&self) -> Option<&[String]> {
        match self {
            ProjectState::Absent => None,
            ProjectState::Found { include_paths, .. } => Some(include_paths),
        }
    }

    fn library_paths(&self) -> Option<&[String]> {
        match self {
            ProjectState::Absent => None,
            ProjectState::Found { library_paths, .. } => Some(library_paths),
        }
    }
}

/// One-shot synchronizer for a CMakeLists.txt buffer.
///
/// Owns the buffer exclusively for the duration of a run: the file is read
/// once, transformed in memory by [`Synchronizer::apply`], and written back
/// once. Applying the transform twice yields the same buffer as applying it
/// once, so the tool is safe to re-run as sources come and go.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    sources: Vec<String>,
    project: ProjectState,
}

impl Synchronizer {
    pub fn new(sources: Vec<String>, project: ProjectState) -> Self {
        Self { sources, project }
    }

    /// Apply the full five-step pipeline to `buffer` and return the result.
    ///
    /// Pure transform: no filesystem access.
    pub fn apply(&self, buffer: String) -> String {
        let buffer = self.sync_sources(buffer);
        let buffer = sync_dirs(
            buffer,
            INCLUDE_DIRS,
            self.project.include_paths(),
            &include_invocation_line(),
        );
        let buffer = sync_dirs(
            buffer,
            LIBRARY_DIRS,
            self.project.library_paths(),
            &library_invocation_line(),
        );
        self.insert_missing(buffer)
    }

    /// Synchronize the file at `path` in place.
    ///
    /// A missing file is reported as [`SyncOutcome::MissingFile`] rather than
    /// an error; an unchanged buffer skips the write entirely.
    pub fn sync_file(&self, path: &Path) -> Result<SyncOutcome, SyncError> {
        if !path.exists() {
            return Ok(SyncOutcome::MissingFile);
        }

        let original = fs::read_to_string(path)?;
        let updated = self.apply(original.clone());

        if updated == original {
            return Ok(SyncOutcome::Unchanged);
        }

        write_atomic(path, updated.as_bytes())?;
        Ok(SyncOutcome::Updated)
    }

    /// Step 1: rewrite the `src_files` entries to match the discovered
    /// sources. An absent declaration is skipped, not created.
    fn sync_sources(&self, mut buffer: String) -> String {
        let Some(block) = find_set_block(&buffer, SRC_FILES, false) else {
            return buffer;
        };

        let indent = detect_indent(&buffer[block.start..block.end]);
        let rebuilt = replace_entries(&block, &self.sources, &indent);
        buffer.replace_range(block.start..block.end, &rebuilt);
        buffer
    }

    /// Step 4: insert blocks for managed names that exist in no form at all,
    /// immediately before the first `add_executable` line (or at EOF).
    fn insert_missing(&self, buffer: String) -> String {
        let include_missing = find_set_block(&buffer, INCLUDE_DIRS, true).is_none();
        let library_missing = find_set_block(&buffer, LIBRARY_DIRS, true).is_none();

        if !include_missing && !library_missing {
            return buffer;
        }

        let mut lines: Vec<String> = buffer.split('\n').map(str::to_string).collect();
        let insert_at = lines
            .iter()
            .position(|l| l.contains("add_executable"))
            .unwrap_or(lines.len());

        let mut new_lines = Vec::new();
        if include_missing {
            new_lines.extend(inserted_block(
                INCLUDE_DIRS,
                self.project.include_paths(),
                INCLUDE_INVOCATION,
                "Add include directories here",
            ));
            new_lines.push(String::new());
        }
        if library_missing {
            new_lines.extend(inserted_block(
                LIBRARY_DIRS,
                self.project.library_paths(),
                LIBRARY_INVOCATION,
                "Add library directories here",
            ));
            new_lines.push(String::new());
        }

        lines.splice(insert_at..insert_at, new_lines);
        lines.join("\n")
    }
}

/// Steps 2/3: reconcile a path-list declaration with the project state.
///
/// No project descriptor: an active block (and its invocation line) is
/// toggled to commented form. Descriptor present: an active block's entries
/// are replaced with the formatted paths. A block that exists only in
/// commented form, or not at all, is left for the insertion step.
fn sync_dirs(mut buffer: String, name: &str, paths: Option<&[String]>, invocation: &Regex) -> String {
    match paths {
        None => {
            if find_set_block(&buffer, name, false).is_some() {
                buffer = comment_out_block(&buffer, name);
                buffer = comment_out_line(&buffer, invocation);
            }
        }
        Some(paths) => {
            if let Some(block) = find_set_block(&buffer, name, false) {
                let indent = detect_indent(&buffer[block.start..block.end]);
                let entries: Vec<String> =
                    paths.iter().map(|p| format_cmake_path(p)).collect();
                let rebuilt = replace_entries(&block, &entries, &indent);
                buffer.replace_range(block.start..block.end, &rebuilt);
            }
        }
    }
    buffer
}

/// Lines for a freshly inserted declaration plus its invocation.
///
/// With mined paths available the block is inserted active; otherwise a
/// fully commented placeholder keeps the structure discoverable for manual
/// editing.
fn inserted_block(
    name: &str,
    paths: Option<&[String]>,
    invocation: &str,
    hint: &str,
) -> Vec<String> {
    match paths {
        Some(paths) if !paths.is_empty() => {
            let mut lines = vec![format!("set({name}")];
            for path in paths {
                lines.push(format!("{DEFAULT_INDENT}{}", format_cmake_path(path)));
            }
            lines.push(")".to_string());
            lines.push(invocation.to_string());
            lines
        }
        _ => vec![
            format!("# set({name}"),
            format!("# {DEFAULT_INDENT}# {hint}"),
            "# )".to_string(),
            format!("# {invocation}"),
        ],
    }
}

/// Atomic file write: tempfile in the same directory + fsync + rename.
///
/// Either the full rewrite lands or the original file is untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), SyncError> {
    let parent = path.parent().ok_or_else(|| {
        SyncError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no parent directory",
        ))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| SyncError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
cmake_minimum_required(VERSION 3.10)
project(demo)

set(src_files
    main.cpp
)

set(INCLUDE_DIRS
    \"/mnt/c/old/include\"
)
include_directories(${INCLUDE_DIRS})

set(LIBRARY_DIRS
    \"/mnt/c/old/libs\"
)
link_directories(${LIBRARY_DIRS})

add_executable(demo ${src_files})
";

    fn found(include: &[&str], library: &[&str]) -> ProjectState {
        ProjectState::Found {
            include_paths: include.iter().map(|s| s.to_string()).collect(),
            library_paths: library.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sources(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_source_list_replaced_in_order() {
        let sync = Synchronizer::new(sources(&["a.cpp", "b.cpp", "c.cpp"]), found(&[], &[]));
        let result = sync.apply(FIXTURE.to_string());
        assert!(result.contains("set(src_files\n    a.cpp\n    b.cpp\n    c.cpp\n)"));
    }

    #[test]
    fn test_missing_src_files_declaration_is_skipped() {
        let buffer = "cmake_minimum_required(VERSION 3.10)\nadd_executable(demo main.cpp)\n";
        let sync = Synchronizer::new(sources(&["a.cpp"]), found(&["C:/inc"], &["C:/lib"]));
        let result = sync.apply(buffer.to_string());
        assert!(!result.contains("set(src_files"));
    }

    #[test]
    fn test_project_found_rewrites_dir_blocks() {
        let sync = Synchronizer::new(
            sources(&["main.cpp"]),
            found(&["C:/sdk/include", "$(VC_IncludePath)"], &["C:\\sdk\\lib"]),
        );
        let result = sync.apply(FIXTURE.to_string());
        assert!(result.contains(
            "set(INCLUDE_DIRS\n    \"/mnt/c/sdk/include\"\n    $(VC_IncludePath)\n)"
        ));
        assert!(result.contains("set(LIBRARY_DIRS\n    \"/mnt/c/sdk/lib\"\n)"));
    }

    #[test]
    fn test_project_absent_comments_blocks_and_invocations() {
        let sync = Synchronizer::new(sources(&["main.cpp"]), ProjectState::Absent);
        let result = sync.apply(FIXTURE.to_string());
        assert!(result.contains("# set(INCLUDE_DIRS\n#     \"/mnt/c/old/include\"\n# )"));
        assert!(result.contains("# include_directories(${INCLUDE_DIRS})"));
        assert!(result.contains("# set(LIBRARY_DIRS\n#     \"/mnt/c/old/libs\"\n# )"));
        assert!(result.contains("# link_directories(${LIBRARY_DIRS})"));
        assert!(!result.contains("\ninclude_directories"));
        assert!(!result.contains("\nlink_directories"));
    }

    #[test]
    fn test_insertion_before_add_executable_with_paths() {
        let buffer = "set(src_files\n    main.cpp\n)\n\nadd_executable(demo ${src_files})\n";
        let sync = Synchronizer::new(sources(&["main.cpp"]), found(&["C:/inc"], &[]));
        let result = sync.apply(buffer.to_string());

        let insert_pos = result.find("set(INCLUDE_DIRS").unwrap();
        let exec_pos = result.find("add_executable").unwrap();
        assert!(insert_pos < exec_pos);
        assert!(result.contains("set(INCLUDE_DIRS\n    \"/mnt/c/inc\"\n)\ninclude_directories(${INCLUDE_DIRS})"));
        // No library paths mined, so that block goes in commented.
        assert!(result.contains("# set(LIBRARY_DIRS\n#     # Add library directories here\n# )\n# link_directories(${LIBRARY_DIRS})"));
    }

    #[test]
    fn test_insertion_placeholder_without_project() {
        let buffer = "add_executable(demo main.cpp)\n";
        let sync = Synchronizer::new(Vec::new(), ProjectState::Absent);
        let result = sync.apply(buffer.to_string());
        assert!(result.starts_with(
            "# set(INCLUDE_DIRS\n#     # Add include directories here\n# )\n# include_directories(${INCLUDE_DIRS})\n"
        ));
        assert!(result.contains("# set(LIBRARY_DIRS"));
        assert!(result.ends_with("add_executable(demo main.cpp)\n"));
    }

    #[test]
    fn test_insertion_at_eof_without_target_line() {
        let buffer = "project(demo)\n";
        let sync = Synchronizer::new(Vec::new(), ProjectState::Absent);
        let result = sync.apply(buffer.to_string());
        assert!(result.starts_with("project(demo)\n"));
        assert!(result.contains("# set(INCLUDE_DIRS"));
        assert!(result.contains("# set(LIBRARY_DIRS"));
    }

    #[test]
    fn test_commented_blocks_are_left_alone() {
        let buffer = "\
# set(INCLUDE_DIRS
#     # Add include directories here
# )
# include_directories(${INCLUDE_DIRS})

# set(LIBRARY_DIRS
#     # Add library directories here
# )
# link_directories(${LIBRARY_DIRS})

add_executable(demo main.cpp)
";
        let sync = Synchronizer::new(Vec::new(), ProjectState::Absent);
        let result = sync.apply(buffer.to_string());
        assert_eq!(result, buffer);
    }

    #[test]
    fn test_apply_is_idempotent() {
        for project in [
            ProjectState::Absent,
            found(&["C:/sdk/include"], &["C:/sdk/lib"]),
            found(&[], &[]),
        ] {
            let sync = Synchronizer::new(sources(&["a.cpp", "b.cpp"]), project);
            let once = sync.apply(FIXTURE.to_string());
            let twice = sync.apply(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_empty_paths_collapse_blocks() {
        // A found-but-unparsable project yields empty lists; the blocks
        // collapse rather than being commented out.
        let sync = Synchronizer::new(sources(&["main.cpp"]), found(&[], &[]));
        let result = sync.apply(FIXTURE.to_string());
        assert!(result.contains("set(INCLUDE_DIRS)"));
        assert!(result.contains("set(LIBRARY_DIRS)"));
        assert!(result.contains("\ninclude_directories(${INCLUDE_DIRS})"));
    }
}
