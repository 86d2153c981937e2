use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

/// Where table files live on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding one row file per table
    pub data_dir: PathBuf,
    /// Subdirectory of `data_dir` receiving materialized select results
    pub scratch_dir_name: String,
    /// File extension of row files
    pub extension: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("bin"),
            scratch_dir_name: "temp".to_string(),
            extension: "tbl".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Create a configuration rooted at `data_dir` with default naming
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Path of the row file backing `table`
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", table, self.extension))
    }

    /// Directory receiving result relations
    pub fn scratch_dir(&self) -> PathBuf {
        self.data_dir.join(&self.scratch_dir_name)
    }

    /// Configuration used by result relations: same naming, rooted at the scratch directory
    pub fn scratch_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            data_dir: self.scratch_dir(),
            scratch_dir_name: self.scratch_dir_name.clone(),
            extension: self.extension.clone(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
