use crate::error::{Result, ValidationError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files found under a path, plus entries that could not be read
#[derive(Debug, Default)]
pub struct Discovery {
    /// Matching files, sorted by path
    pub files: Vec<PathBuf>,
    /// Entries skipped because they could not be inspected
    pub errors: Vec<ValidationError>,
}

/// Async discovery of XML documents to validate
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// File extensions to include, lowercase and without the dot
    extensions: Vec<String>,
    include_set: Option<GlobSet>,
    exclude_set: Option<GlobSet>,
    /// Maximum depth for directory traversal (None = unlimited)
    max_depth: Option<usize>,
    follow_symlinks: bool,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            include_set: None,
            exclude_set: None,
            max_depth: None,
            follow_symlinks: false,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.include_set = Self::build_glob_set(&patterns, "include")?;
        Ok(self)
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.exclude_set = Self::build_glob_set(&patterns, "exclude")?;
        Ok(self)
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    fn build_glob_set(patterns: &[String], kind: &str) -> Result<Option<GlobSet>> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                ValidationError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }

        let set = builder.build().map_err(|e| {
            ValidationError::Config(format!("Failed to build {} glob set: {}", kind, e))
        })?;
        Ok(Some(set))
    }

    /// Discover matching files in `path`, which may be a file or a directory.
    ///
    /// A file given directly is returned as long as it is not excluded; the
    /// extension filter only applies inside directories.
    pub async fn discover(&self, path: &Path) -> Result<Discovery> {
        let metadata = fs::metadata(path).await?;

        if metadata.is_file() {
            let files = if self.is_excluded(path) {
                Vec::new()
            } else {
                vec![path.to_path_buf()]
            };
            return Ok(Discovery {
                files,
                errors: Vec::new(),
            });
        }

        let mut discovery = Discovery::default();
        let mut pending = vec![(path.to_path_buf(), 0usize)];

        while let Some((dir, depth)) = pending.pop() {
            let mut read_dir = match fs::read_dir(&dir).await {
                Ok(read_dir) => read_dir,
                Err(e) => {
                    discovery.errors.push(Self::traversal_error(&dir, e));
                    continue;
                }
            };

            loop {
                let entry = match read_dir.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        discovery.errors.push(Self::traversal_error(&dir, e));
                        break;
                    }
                };
                let entry_path = entry.path();

                if entry_path.is_symlink() && !self.follow_symlinks {
                    continue;
                }

                let metadata = match fs::metadata(&entry_path).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        discovery.errors.push(Self::traversal_error(&entry_path, e));
                        continue;
                    }
                };

                if metadata.is_dir() {
                    let within_depth = self.max_depth.is_none_or(|max| depth < max);
                    if within_depth {
                        pending.push((entry_path, depth + 1));
                    }
                } else if metadata.is_file() && self.should_process(&entry_path) {
                    discovery.files.push(entry_path);
                }
            }
        }

        discovery.files.sort();
        Ok(discovery)
    }

    /// Discover matching files, dropping unreadable entries
    pub async fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.discover(path).await?.files)
    }

    /// Check if a file should be processed based on extensions and patterns
    pub fn should_process(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        if !self.extensions.contains(&extension.to_lowercase()) {
            return false;
        }

        if self.is_excluded(path) {
            return false;
        }

        // If include patterns are given, at least one must match
        match &self.include_set {
            Some(include_set) => include_set.is_match(path),
            None => true,
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude_set
            .as_ref()
            .is_some_and(|exclude_set| exclude_set.is_match(path))
    }

    fn traversal_error(path: &Path, error: std::io::Error) -> ValidationError {
        ValidationError::FileSystemTraversal {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}
