use anyhow::Result;
use clap::Parser;
use cmake_sync::cmake::{write_atomic, ProjectState, Synchronizer};
use cmake_sync::{discover, vcxproj};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cmake-sync")]
#[command(
    about = "Sync CMakeLists.txt with a directory's C++ sources and Visual Studio search paths",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Directory to operate on (defaults to the current directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Show what would change without modifying CMakeLists.txt
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show a unified diff of the rewrite
    #[arg(long)]
    diff: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dir = match cli.dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };

    // 1. Collect sources and the project descriptor
    let sources = discover::source_files(&dir);
    println!("Found {} source file(s): [{}]", sources.len(), sources.join(", "));

    let project = resolve_project(&dir);

    // 2. Transform the buffer in memory
    let cmake_path = dir.join("CMakeLists.txt");
    if !cmake_path.exists() {
        println!(
            "{}",
            format!("{} not found, nothing to do", cmake_path.display()).yellow()
        );
        return Ok(());
    }

    let original = fs::read_to_string(&cmake_path)?;
    let sync = Synchronizer::new(sources, project);
    let updated = sync.apply(original.clone());

    // 3. Report and write back
    if cli.diff && updated != original {
        display_diff(&cmake_path, &original, &updated);
    }

    if updated == original {
        println!(
            "{} {}: already up to date",
            "⊙".yellow(),
            cmake_path.display()
        );
        return Ok(());
    }

    if cli.dry_run {
        println!(
            "{} {}: would be updated {}",
            "✓".green(),
            cmake_path.display(),
            "[DRY RUN]".cyan()
        );
        return Ok(());
    }

    write_atomic(&cmake_path, updated.as_bytes())?;
    println!("{} {}: updated", "✓".green(), cmake_path.display());

    Ok(())
}

/// Find and parse the project descriptor, degrading to empty path lists on
/// parse failure. Only the absence of a descriptor changes the sync policy.
fn resolve_project(dir: &Path) -> ProjectState {
    let Some(path) = discover::project_file(dir) else {
        println!("{}", "No .vcxproj file found".yellow());
        return ProjectState::Absent;
    };

    println!("Project file: {}", path.display());

    let paths = vcxproj::load_project(&path).unwrap_or_else(|err| {
        eprintln!(
            "{}",
            format!("Warning: failed to parse {}: {}", path.display(), err).yellow()
        );
        vcxproj::ProjectPaths::default()
    });

    println!("IncludePath: [{}]", paths.include_paths.join(", "));
    println!("LibraryPath: [{}]", paths.library_paths.join(", "));

    ProjectState::Found {
        include_paths: paths.include_paths,
        library_paths: paths.library_paths,
    }
}

/// Show unified diff between original and rewritten content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (updated)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
    println!();
}
