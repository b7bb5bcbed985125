use std::error::Error;
use std::path::{Path, PathBuf};
use glob_match::glob_match;
use log::debug;
use walkdir::WalkDir;

use crate::host::SourceFiles;

type BoxResult<T> = Result<T, Box<dyn Error>>;

/// Default file discovery: walk the configured source paths and collect
/// content files, skipping excluded ones.
#[derive(Debug, Clone)]
pub struct WalkSource {
    /// Extensions treated as content files
    pub extensions: Vec<String>,
}

impl Default for WalkSource {
    fn default() -> Self {
        WalkSource {
            extensions: vec!["md".to_string(), "markdown".to_string()],
        }
    }
}

impl WalkSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_content_file(&self, path: &Path) -> bool {
        let extension = path.extension().unwrap_or_default().to_string_lossy();
        self.extensions.iter().any(|ext| *ext == extension)
    }

    fn is_excluded(relative: &Path, excludes: &[String]) -> bool {
        let relative = relative.to_string_lossy();
        excludes
            .iter()
            .any(|pattern| glob_match(pattern, &relative))
    }
}

impl SourceFiles for WalkSource {
    fn get_files(
        &self,
        base: &Path,
        paths: &[String],
        excludes: &[String],
    ) -> BoxResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for source_path in paths {
            let root = base.join(source_path);
            if !root.exists() {
                debug!("Source path does not exist: {}", root.display());
                continue;
            }

            // A source path may name a single file directly
            if root.is_file() {
                if self.is_content_file(&root) {
                    files.push(root);
                }
                continue;
            }

            for entry in WalkDir::new(&root).follow_links(true) {
                let entry = entry?;
                let path = entry.path();

                if !path.is_file() || !self.is_content_file(path) {
                    continue;
                }

                let relative = path.strip_prefix(base).unwrap_or(path);
                if Self::is_excluded(relative, excludes) {
                    debug!("Excluded source file: {}", relative.display());
                    continue;
                }

                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("entigen-tests")
            .join(name)
            .join(format!("{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_walk_collects_and_excludes() {
        let base = scratch_dir("walk");
        fs::create_dir_all(base.join("project/wip")).unwrap();
        fs::write(base.join("project/one.md"), "one").unwrap();
        fs::write(base.join("project/two.markdown"), "two").unwrap();
        fs::write(base.join("project/notes.txt"), "skip me").unwrap();
        fs::write(base.join("project/wip/three.md"), "three").unwrap();

        let source = WalkSource::new();
        let files = source
            .get_files(
                &base,
                &["project".to_string()],
                &["project/wip/**".to_string()],
            )
            .unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["one.md", "two.markdown"]);
    }

    #[test]
    fn test_missing_path_is_not_an_error() {
        let base = scratch_dir("missing");
        let source = WalkSource::new();
        let files = source
            .get_files(&base, &["nowhere".to_string()], &[])
            .unwrap();
        assert!(files.is_empty());
    }
}
