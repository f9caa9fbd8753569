use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Namespace whose classes are listed when none is configured
pub const DEFAULT_NAMESPACE: &str = "PlayPG";

/// Compiler arguments every translation unit is parsed with by default
pub const DEFAULT_COMPILER_ARGS: &[&str] = &["-x", "c++", "-std=c++1y", "-DPLAYPG_MAKO_GEN__"];

/// Configuration for lister behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListerConfig {
    /// Top-level namespace whose classes/structs are listed
    pub namespace: String,

    /// Compiler arguments used for every file.
    /// Front ends honour the flags they understand (`-D`, `-U`) and ignore the rest.
    pub compiler_args: Vec<String>,

    /// Treat syntax errors reported by the parser as fatal
    pub strict: bool,

    /// Maximum file size to parse (in bytes)
    /// Larger files abort the run
    pub max_file_size: usize,

    /// Timeout per file (None = no timeout)
    #[serde(with = "duration_option")]
    pub timeout_per_file: Option<Duration>,
}

// Helper module for serializing Duration
mod duration_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl Default for ListerConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            compiler_args: DEFAULT_COMPILER_ARGS.iter().map(|a| a.to_string()).collect(),
            strict: false,
            max_file_size: 10 * 1024 * 1024, // 10 MB
            timeout_per_file: Some(Duration::from_secs(30)),
        }
    }
}

impl ListerConfig {
    /// List classes of another namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Append `-D<definition>`; `definition` is `NAME` or `NAME=VALUE`
    pub fn with_define(mut self, definition: impl AsRef<str>) -> Self {
        self.compiler_args.push(format!("-D{}", definition.as_ref()));
        self
    }

    /// Append `-U<name>`
    pub fn with_undefine(mut self, name: impl AsRef<str>) -> Self {
        self.compiler_args.push(format!("-U{}", name.as_ref()));
        self
    }

    /// Enable strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set maximum file size
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set the per-file parser timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_per_file = timeout;
        self
    }
}
