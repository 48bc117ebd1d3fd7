//! Project file migration.
//!
//! Reads each project file, runs the rewrite stages, and writes it back only
//! when the text changed. Files are handled one at a time, in list order.

use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::layout::Rules;
use crate::log_status;
use crate::rewrite::{find_stale_sources, transform};
use crate::utils::io::{read_file, write_file};

/// What happened to one project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Updated {
        source_rewrites: usize,
        header_rewrites: usize,
    },
    Unchanged,
    Missing,
}

impl FileOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, FileOutcome::Updated { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub outcome: FileOutcome,
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationSummary {
    pub files: Vec<FileReport>,
    /// Files written back.
    pub updated: usize,
    /// Files in the list, including missing ones.
    pub considered: usize,
}

/// Migrate one project file in place.
pub fn update_project_file(path: &Path, rules: &Rules) -> Result<FileOutcome> {
    let content = match read_file(path, &format!("read {}", path.display())) {
        Ok(content) => content,
        Err(err) if err.is_not_found() => return Ok(FileOutcome::Missing),
        Err(err) => return Err(err),
    };

    for stale in find_stale_sources(&content, rules) {
        log_status!(
            "relayout",
            "{}:{}: '{}' is not under its mapped directory (expected '{}'), left as is",
            path.display(),
            stale.line,
            stale.value,
            stale.expected
        );
    }

    let result = transform(&content, rules);
    if !result.changed {
        return Ok(FileOutcome::Unchanged);
    }

    write_file(path, &result.content, &format!("write {}", path.display()))?;

    Ok(FileOutcome::Updated {
        source_rewrites: result.source_rewrites,
        header_rewrites: result.header_rewrites,
    })
}

fn emit(out: &mut dyn Write, line: &str) -> Result<()> {
    match writeln!(out, "{}", line) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(Error::internal_io(
            e.to_string(),
            Some("write output".to_string()),
        )),
    }
}

/// Migrate every file in `files`, resolved against `root`, reporting progress to `out`.
///
/// A missing file is skipped with a warning. Any other failure stops the run
/// and is returned after an error line is written; later files are not touched.
pub fn run(
    root: &Path,
    files: &[String],
    rules: &Rules,
    out: &mut dyn Write,
) -> Result<MigrationSummary> {
    let mut reports = Vec::with_capacity(files.len());

    for file in files {
        emit(out, &format!("Updating {}...", file))?;

        let outcome = match update_project_file(&root.join(file), rules) {
            Ok(outcome) => outcome,
            Err(err) => {
                emit(out, &format!("Error updating {}: {}", file, err))?;
                return Err(err);
            }
        };

        match &outcome {
            FileOutcome::Updated {
                source_rewrites,
                header_rewrites,
            } => {
                log_status!(
                    "relayout",
                    "{}: {} source and {} header references rewritten",
                    file,
                    source_rewrites,
                    header_rewrites
                );
                emit(out, &format!("  Updated {}", file))?;
            }
            FileOutcome::Unchanged => emit(out, &format!("  No changes needed for {}", file))?,
            FileOutcome::Missing => emit(out, &format!("Warning: {} not found, skipping...", file))?,
        }

        reports.push(FileReport {
            file: file.clone(),
            outcome,
        });
    }

    let updated = reports.iter().filter(|r| r.outcome.is_updated()).count();
    emit(out, &format!("\nUpdated {} of {} files.", updated, files.len()))?;

    Ok(MigrationSummary {
        files: reports,
        updated,
        considered: files.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const LIB_PROJECT: &str = r#"<ItemGroup>
    <ClCompile Include="integer.cpp" />
    <ClInclude Include="queue.h" />
  </ItemGroup>
"#;

    fn setup(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn update_rewrites_and_writes_back() {
        let dir = setup(&[("cryptlib.vcxproj", LIB_PROJECT)]);
        let path = dir.path().join("cryptlib.vcxproj");

        let outcome = update_project_file(&path, &Rules::builtin()).unwrap();
        assert_eq!(
            outcome,
            FileOutcome::Updated {
                source_rewrites: 1,
                header_rewrites: 1,
            }
        );

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"Include="src/core/integer.cpp""#));
        assert!(written.contains(r#"Include="include/cryptopp/queue.h""#));
    }

    #[test]
    fn unchanged_file_is_not_rewritten() {
        let text = "<ItemGroup>\n  <None Include=\"Readme.txt\" />\n</ItemGroup>\n";
        let dir = setup(&[("dlltest.vcxproj", text)]);
        let path = dir.path().join("dlltest.vcxproj");
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        let outcome = update_project_file(&path, &Rules::builtin()).unwrap();
        assert_eq!(outcome, FileOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn missing_file_is_an_outcome_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let outcome =
            update_project_file(&dir.path().join("cryptdll.vcxproj"), &Rules::builtin()).unwrap();
        assert_eq!(outcome, FileOutcome::Missing);
    }

    #[test]
    fn run_reports_each_file_and_summary() {
        let dir = setup(&[
            ("cryptlib.vcxproj", LIB_PROJECT),
            ("cryptest.vcxproj", "<Project />\n"),
        ]);
        let files = vec![
            "cryptlib.vcxproj".to_string(),
            "cryptest.vcxproj".to_string(),
            "cryptdll.vcxproj".to_string(),
        ];
        let mut out = Vec::new();

        let summary = run(dir.path(), &files, &Rules::builtin(), &mut out).unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.considered, 3);
        assert_eq!(summary.files[2].outcome, FileOutcome::Missing);

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "Updating cryptlib.vcxproj...\n\
             \x20 Updated cryptlib.vcxproj\n\
             Updating cryptest.vcxproj...\n\
             \x20 No changes needed for cryptest.vcxproj\n\
             Updating cryptdll.vcxproj...\n\
             Warning: cryptdll.vcxproj not found, skipping...\n\
             \n\
             Updated 1 of 3 files.\n"
        );
    }

    #[test]
    fn run_stops_at_first_hard_error() {
        let dir = setup(&[("cryptest.vcxproj", LIB_PROJECT)]);
        // A directory where a file is expected fails the read with something other than NotFound.
        fs::create_dir(dir.path().join("cryptlib.vcxproj")).unwrap();
        let files = vec![
            "cryptlib.vcxproj".to_string(),
            "cryptest.vcxproj".to_string(),
        ];
        let mut out = Vec::new();

        let err = run(dir.path(), &files, &Rules::builtin(), &mut out).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Error updating cryptlib.vcxproj: IO error"));
        assert!(!out.contains("cryptest.vcxproj"));
        assert_eq!(
            fs::read_to_string(dir.path().join("cryptest.vcxproj")).unwrap(),
            LIB_PROJECT
        );
    }

    #[test]
    fn second_run_changes_nothing() {
        let dir = setup(&[("cryptlib.vcxproj", LIB_PROJECT)]);
        let files = vec!["cryptlib.vcxproj".to_string()];

        let first = run(dir.path(), &files, &Rules::builtin(), &mut io::sink()).unwrap();
        let second = run(dir.path(), &files, &Rules::builtin(), &mut io::sink()).unwrap();

        assert_eq!(first.updated, 1);
        assert_eq!(second.updated, 0);
        assert_eq!(second.files[0].outcome, FileOutcome::Unchanged);
    }
}
