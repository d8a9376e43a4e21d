//! Text-region editing for CMakeLists.txt.
//!
//! The locator finds `set(NAME ...)` declarations by balanced-parenthesis
//! scanning; the mutator rebuilds or comments located blocks; the
//! synchronizer drives the whole pipeline over a single owned buffer.

pub mod format;
pub mod locator;
pub mod mutator;
pub mod sync;

pub use format::{format_cmake_path, to_wsl_path};
pub use locator::{find_set_block, SetBlock};
pub use sync::{write_atomic, ProjectState, SyncError, SyncOutcome, Synchronizer};
