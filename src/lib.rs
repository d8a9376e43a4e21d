//! cmake-sync: keep a CMakeLists.txt in sync with its directory.
//!
//! Synchronizes the `src_files` declaration with the `.cpp` files present in
//! a directory, and the `INCLUDE_DIRS`/`LIBRARY_DIRS` declarations with the
//! Debug|x64 search paths mined from a Visual Studio `.vcxproj` file,
//! translating Windows paths to their WSL mount points.
//!
//! # Architecture
//!
//! All rewrites operate on a single in-memory buffer: the file is read once,
//! transformed by [`Synchronizer::apply`], and written back once,
//! atomically. Intelligence lives in block location (regex opener match plus
//! a paren nesting counter), not in application logic.
//!
//! # Safety
//!
//! - Idempotent: applying the synchronizer twice equals applying it once
//! - Atomic write-back (tempfile + fsync + rename)
//! - Comment-tolerant: commented declarations are never mistaken for active
//!   ones, and unrelated content is never touched
//!
//! # Example
//!
//! ```no_run
//! use cmake_sync::{ProjectState, Synchronizer};
//! use std::path::Path;
//!
//! let sync = Synchronizer::new(
//!     vec!["main.cpp".to_string()],
//!     ProjectState::Absent,
//! );
//!
//! match sync.sync_file(Path::new("CMakeLists.txt")) {
//!     Ok(outcome) => println!("Sync finished: {:?}", outcome),
//!     Err(e) => eprintln!("Sync failed: {}", e),
//! }
//! ```

pub mod cmake;
pub mod discover;
pub mod vcxproj;

// Re-exports
pub use cmake::{
    find_set_block, format_cmake_path, to_wsl_path, ProjectState, SetBlock, SyncError,
    SyncOutcome, Synchronizer,
};
pub use vcxproj::{load_project, parse_project, ProjectPaths, VcxprojError};
