use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;
use walkdir::WalkDir;

/// A file offered for matching: its display name and where to find it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    pub name: String,
    pub path: PathBuf,
}

impl CandidateFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self { name, path })
    }
}

/// Files picked by the user, in the order given. Folders among them are
/// walked in place.
pub fn selected_files<I, P>(paths: I) -> impl Iterator<Item = CandidateFile>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    paths.into_iter().map(Into::into).flat_map(
        |path: PathBuf| -> Box<dyn Iterator<Item = CandidateFile>> {
            if path.is_dir() {
                Box::new(DirectoryWalk::new(path))
            } else {
                Box::new(CandidateFile::from_path(path).into_iter())
            }
        },
    )
}

/// Depth-first walk over a folder tree, one file at a time.
///
/// Entries within a folder are visited in name order. Symlinked folders are
/// not followed. Entries that cannot be read are logged and skipped.
pub struct DirectoryWalk {
    entries: walkdir::IntoIter,
}

impl DirectoryWalk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            entries: WalkDir::new(root.into())
                .follow_links(false)
                .sort_by_file_name()
                .into_iter(),
        }
    }
}

impl Iterator for DirectoryWalk {
    type Item = CandidateFile;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = ?e.path(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let file_type = entry.file_type();
            let is_file =
                file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            if let Some(file) = CandidateFile::from_path(entry.into_path()) {
                return Some(file);
            }
        }
        None
    }
}
