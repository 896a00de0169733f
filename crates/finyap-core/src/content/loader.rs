//! Scenario file loader.
//!
//! Each scenario is one file of `source<TAB>translation` lines. The file
//! name is the scenario label.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ContentError, Result};

use super::{Sentence, SentenceId};

/// Load every scenario file with the given extension under `dir`, recursively.
///
/// Files are visited in path order. Sentences get provisional ids starting
/// at 1; a database sync replaces them with stored ids.
///
/// # Errors
/// Returns an error if `dir` does not exist or cannot be listed. Individual
/// unreadable files are logged and skipped.
pub fn load_dir(dir: &Path, extension: &str) -> Result<Vec<Sentence>> {
    if !dir.is_dir() {
        return Err(ContentError::DirectoryMissing(dir.to_path_buf()).into());
    }

    let mut files = Vec::new();
    collect_files(dir, extension, &mut files)?;
    files.sort();

    let mut sentences = Vec::new();
    for path in files {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping unreadable scenario file"
                );
                continue;
            }
        };
        let scenario = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let next_id = sentences.len() as SentenceId + 1;
        sentences.extend(parse_scenario(&scenario, &content, next_id));
    }

    tracing::debug!(count = sentences.len(), dir = %dir.display(), "loaded sentences");
    Ok(sentences)
}

/// Parse the lines of one scenario file. Ids are assigned from `first_id`.
///
/// Blank lines and lines without a tab are skipped, as are sentences with
/// no guessable word.
pub fn parse_scenario(scenario: &str, content: &str, first_id: SentenceId) -> Vec<Sentence> {
    let mut out = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((source, translation)) = line.split_once('\t') else {
            continue;
        };
        let id = first_id + out.len() as SentenceId;
        match Sentence::new(id, scenario, source, translation) {
            Some(sentence) => out.push(sentence),
            None => tracing::warn!(scenario, line, "skipping sentence with no guessable words"),
        }
    }
    out
}

fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|source| ContentError::ReadFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let path = entry
            .map_err(|source| ContentError::ReadFailed {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_dir() {
            collect_files(&path, extension, out)?;
        } else if path.extension().is_some_and(|e| e == extension) {
            out.push(path);
        }
    }
    Ok(())
}
