use crate::{config::ListerConfig, entities::DeclarationSummary, errors::ListerError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Core trait that every language front end implements
///
/// A front end only has to turn one source text into summaries; resolving
/// the input path and driving the files is shared.
///
/// # Example
/// ```rust,ignore
/// use makogen_api::{ListerConfig, MemberLister};
///
/// struct MyLister {
///     config: ListerConfig,
/// }
///
/// impl MemberLister for MyLister {
///     fn language(&self) -> &str {
///         "mylang"
///     }
///
///     // ... implement other required methods
/// }
/// ```
pub trait MemberLister: Send + Sync {
    /// Returns the language identifier (lowercase, e.g., "cpp")
    fn language(&self) -> &str;

    /// List the summaries declared in one source text
    ///
    /// # Arguments
    /// * `source` - Source code string
    /// * `file_path` - Logical path for this source (used in errors and logs)
    ///
    /// # Errors
    /// Returns `ListerError` if the parser cannot produce a tree, or if the
    /// tree has syntax errors while strict mode is enabled.
    fn list_source(
        &self,
        source: &str,
        file_path: &Path,
    ) -> Result<Vec<DeclarationSummary>, ListerError>;

    /// Get lister configuration
    fn config(&self) -> &ListerConfig;

    /// Read a single file and list its summaries
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    fn list_file(&self, path: &Path) -> Result<Vec<DeclarationSummary>, ListerError> {
        let metadata = fs::metadata(path).map_err(|e| ListerError::Io(path.to_path_buf(), e))?;
        let max_file_size = self.config().max_file_size;
        if metadata.len() > max_file_size as u64 {
            return Err(ListerError::FileTooLarge(path.to_path_buf(), max_file_size));
        }

        let bytes = fs::read(path).map_err(|e| ListerError::Io(path.to_path_buf(), e))?;
        let source = String::from_utf8_lossy(&bytes);
        self.list_source(&source, path)
    }

    /// Resolve an input path to the absolute paths of the files to list
    ///
    /// A file resolves to itself. A directory resolves to its direct entries
    /// that are regular files, sorted by name; subdirectories are not
    /// descended into.
    fn resolve_inputs(&self, path: &Path) -> Result<Vec<PathBuf>, ListerError> {
        let root = fs::canonicalize(path).map_err(|e| ListerError::Io(path.to_path_buf(), e))?;

        if !root.is_dir() {
            return Ok(vec![root]);
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&root).map_err(|e| ListerError::Io(root.clone(), e))? {
            let entry = entry.map_err(|e| ListerError::Io(root.clone(), e))?;
            let entry_path = entry.path();

            if entry_path.is_file() {
                files.push(entry_path);
            } else {
                debug!(path = %entry_path.display(), "skipping non-file entry");
            }
        }

        files.sort();
        Ok(files)
    }

    /// List every class/struct of the configured namespace under `path`
    ///
    /// Files are processed in resolution order and the first error aborts
    /// the run.
    fn list_public_members(&self, path: &Path) -> Result<Vec<DeclarationSummary>, ListerError> {
        let files = self.resolve_inputs(path)?;

        let mut summaries = Vec::new();
        for file in &files {
            summaries.extend(self.list_file(file)?);
        }

        info!(
            language = self.language(),
            namespace = %self.config().namespace,
            files = files.len(),
            declarations = summaries.len(),
            "listing complete"
        );

        Ok(summaries)
    }
}
