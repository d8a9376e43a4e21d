use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of compiled source files collected into `src_files`.
pub const SOURCE_EXT: &str = "cpp";
/// Extension of the IDE project descriptor.
pub const PROJECT_EXT: &str = "vcxproj";

/// File names of all `.cpp` sources directly inside `dir`, sorted
/// lexicographically. Subdirectories are not descended into.
pub fn source_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().and_then(|s| s.to_str()) == Some(SOURCE_EXT)
        })
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();

    files.sort();
    files
}

/// The first `.vcxproj` file directly inside `dir`, in directory order.
/// Multiple project files are not disambiguated.
pub fn project_file(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().and_then(|s| s.to_str()) == Some(PROJECT_EXT)
        })
        .map(|entry| entry.path().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_source_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["b.cpp", "a.cpp", "notes.txt", "c.cpp"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("d.cpp"), "").unwrap();

        assert_eq!(source_files(dir.path()), vec!["a.cpp", "b.cpp", "c.cpp"]);
    }

    #[test]
    fn test_project_file_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("demo.vcxproj"), "<Project/>").unwrap();

        let found = project_file(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "demo.vcxproj");
    }

    #[test]
    fn test_project_file_absent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.cpp"), "").unwrap();
        assert!(project_file(dir.path()).is_none());
    }
}
