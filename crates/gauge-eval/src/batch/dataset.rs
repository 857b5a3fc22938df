//! JSON-lines dataset loading

use std::path::{Path, PathBuf};

use super::BatchError;

/// One dataset record
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A loaded dataset: one JSON object per non-blank line
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    rows: Vec<(usize, Row)>,
}

impl Dataset {
    /// Read and parse a dataset file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        let path = path.as_ref();
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BatchError::DatasetNotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(BatchError::DatasetRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(path, &content)
    }

    /// Parse dataset content, reporting 1-based line numbers
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, BatchError> {
        let mut rows = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            let value: serde_json::Value =
                serde_json::from_str(line).map_err(|e| BatchError::MalformedRow {
                    line: line_number,
                    message: e.to_string(),
                })?;

            match value {
                serde_json::Value::Object(row) => rows.push((line_number, row)),
                _ => {
                    return Err(BatchError::MalformedRow {
                        line: line_number,
                        message: "expected a JSON object".to_string(),
                    });
                }
            }
        }

        Ok(Self {
            path: path.into(),
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows with their source line numbers
    pub fn rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().map(|(line, row)| (*line, row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
