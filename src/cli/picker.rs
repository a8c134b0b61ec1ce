//! Input file selection.
//!
//! Kept separate from clap parsing: clap handles flags, the picker covers
//! the "run without an input and choose a file" flow. Selection goes
//! through the [`FileSelector`] trait so the pipeline never talks to the
//! console directly; the prompt-based selector is one implementation and a
//! fixed path is another.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parsing::is_supported_input;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("No input files found in {0}")]
    NoCandidates(String),

    #[error("Selection canceled")]
    Canceled,

    #[error("No input received; pass the input file as an argument")]
    EndOfInput,

    #[error("Input file not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that picks one input file out of a candidate list
pub trait FileSelector {
    /// Choose a file
    ///
    /// # Errors
    ///
    /// Returns `SelectionError` when nothing can be selected.
    fn select(&mut self, candidates: &[PathBuf]) -> Result<PathBuf, SelectionError>;
}

/// Always selects the same path, for headless runs
#[derive(Debug, Clone)]
pub struct FixedSelector(pub PathBuf);

impl FileSelector for FixedSelector {
    fn select(&mut self, _candidates: &[PathBuf]) -> Result<PathBuf, SelectionError> {
        validate_input_path(&self.0)
    }
}

/// Lists candidates and reads the choice from a line-based reader.
///
/// Accepts a list number, a file name shown in the list, or a path.
/// `q` cancels; invalid answers re-prompt.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> FileSelector for PromptSelector<R, W> {
    fn select(&mut self, candidates: &[PathBuf]) -> Result<PathBuf, SelectionError> {
        writeln!(self.output, "Available files:")?;
        for (idx, path) in candidates.iter().enumerate() {
            writeln!(self.output, "{:>3}) {}", idx + 1, display_name(path))?;
        }

        loop {
            write!(
                self.output,
                "Enter the file to process (1-{}, name or path, q to quit): ",
                candidates.len()
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(SelectionError::EndOfInput);
            }

            let answer = line.trim();
            if answer.is_empty() {
                continue;
            }
            if answer.eq_ignore_ascii_case("q") {
                return Err(SelectionError::Canceled);
            }

            if let Ok(choice) = answer.parse::<usize>() {
                if (1..=candidates.len()).contains(&choice) {
                    return Ok(candidates[choice - 1].clone());
                }
                writeln!(
                    self.output,
                    "Invalid choice: {choice}. Enter a number between 1 and {}.",
                    candidates.len()
                )?;
                continue;
            }

            if let Some(path) = candidates.iter().find(|p| display_name(p) == answer) {
                return Ok(path.clone());
            }

            match validate_input_path(Path::new(answer)) {
                Ok(path) => return Ok(path),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }
}

/// Check that a path points at an existing file
///
/// # Errors
///
/// Returns `SelectionError::NotFound` if the path is missing or is a directory.
pub fn validate_input_path(path: &Path) -> Result<PathBuf, SelectionError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(SelectionError::NotFound(path.display().to_string()))
    }
}

/// Supported input files directly inside `dir`, sorted by path.
///
/// Office lock files (`~$name.xlsx`) and hidden files are skipped.
///
/// # Errors
///
/// Returns `SelectionError::Io` if the directory cannot be read.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, SelectionError> {
    let mut out = Vec::new();

    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let name = display_name(&path);
        if name.starts_with("~$") || name.starts_with('.') {
            continue;
        }

        if is_supported_input(&path) {
            out.push(path);
        }
    }

    out.sort();
    Ok(out)
}

/// Discover inputs in `dir` and let `selector` choose one
///
/// # Errors
///
/// Returns `SelectionError::NoCandidates` if the directory holds no
/// supported files, or any error from the selector.
pub fn choose_input(dir: &Path, selector: &mut dyn FileSelector) -> Result<PathBuf, SelectionError> {
    let candidates = discover_inputs(dir)?;
    if candidates.is_empty() {
        return Err(SelectionError::NoCandidates(dir.display().to_string()));
    }
    selector.select(&candidates)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_run.xlsx", "a_run.csv", "notes.pdf", "~$b_run.xlsx", "c_run.tsv"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("Processed.xlsx")).unwrap();
        dir
    }

    #[test]
    fn test_discover_inputs_is_sorted_and_filtered() {
        let dir = fixture_dir();
        let found: Vec<String> = discover_inputs(dir.path())
            .unwrap()
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(found, vec!["a_run.csv", "b_run.xlsx", "c_run.tsv"]);
    }

    #[test]
    fn test_prompt_by_number() {
        let dir = fixture_dir();
        let mut output = Vec::new();
        let mut selector = PromptSelector::new(Cursor::new("2\n"), &mut output);

        let chosen = choose_input(dir.path(), &mut selector).unwrap();
        assert_eq!(display_name(&chosen), "b_run.xlsx");

        let prompt = String::from_utf8(output).unwrap();
        assert!(prompt.contains("  1) a_run.csv"));
        assert!(prompt.contains("  3) c_run.tsv"));
    }

    #[test]
    fn test_prompt_reprompts_then_accepts_name() {
        let dir = fixture_dir();
        let mut output = Vec::new();
        let mut selector = PromptSelector::new(Cursor::new("9\nmissing.xlsx\nc_run.tsv\n"), &mut output);

        let chosen = choose_input(dir.path(), &mut selector).unwrap();
        assert_eq!(display_name(&chosen), "c_run.tsv");

        let prompt = String::from_utf8(output).unwrap();
        assert!(prompt.contains("Invalid choice: 9"));
        assert!(prompt.contains("Input file not found: missing.xlsx"));
    }

    #[test]
    fn test_prompt_cancel_and_eof() {
        let dir = fixture_dir();

        let mut selector = PromptSelector::new(Cursor::new("q\n"), Vec::new());
        assert!(matches!(
            choose_input(dir.path(), &mut selector),
            Err(SelectionError::Canceled)
        ));

        let mut selector = PromptSelector::new(Cursor::new(""), Vec::new());
        assert!(matches!(
            choose_input(dir.path(), &mut selector),
            Err(SelectionError::EndOfInput)
        ));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut selector = FixedSelector(dir.path().join("run.xlsx"));
        assert!(matches!(
            choose_input(dir.path(), &mut selector),
            Err(SelectionError::NoCandidates(_))
        ));
    }

    #[test]
    fn test_fixed_selector() {
        let dir = fixture_dir();
        let target = dir.path().join("a_run.csv");
        let mut selector = FixedSelector(target.clone());
        assert_eq!(choose_input(dir.path(), &mut selector).unwrap(), target);
    }
}
