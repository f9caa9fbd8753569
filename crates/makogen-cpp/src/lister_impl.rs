//! `MemberLister` implementation for C++

use makogen_api::{DeclarationSummary, ListerConfig, ListerError, MemberLister};
use std::path::Path;
use tracing::instrument;

use crate::extractor;

/// Lists public members of C++ classes/structs with tree-sitter-cpp
#[derive(Debug, Clone, Default)]
pub struct CppLister {
    config: ListerConfig,
}

impl CppLister {
    /// Create a lister with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lister with a custom configuration
    pub fn with_config(config: ListerConfig) -> Self {
        Self { config }
    }
}

impl MemberLister for CppLister {
    fn language(&self) -> &str {
        "cpp"
    }

    #[instrument(skip(self, source), fields(file = %file_path.display()))]
    fn list_source(
        &self,
        source: &str,
        file_path: &Path,
    ) -> Result<Vec<DeclarationSummary>, ListerError> {
        extractor::extract(source, file_path, &self.config)
    }

    fn config(&self) -> &ListerConfig {
        &self.config
    }
}
