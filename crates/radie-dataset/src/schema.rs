//! Dataset schema
//!
//! The schema is the ordered header row of a template CSV. Nothing below the
//! header is read.

use std::path::Path;

use tracing::debug;

use crate::{DatasetError, Result};

/// Ordered list of target column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    columns: Vec<String>,
}

impl DatasetSchema {
    /// Build a schema from explicit column names
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the header row of a template CSV
    pub fn from_template(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DatasetError::MissingInput(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let schema = Self::from_columns(reader.headers()?.iter());
        if schema.is_empty() {
            return Err(DatasetError::EmptySchema(path.to_path_buf()));
        }

        debug!(path = %path.display(), columns = schema.len(), "Loaded dataset schema");
        Ok(schema)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_header_order_is_kept() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "paper_id,total_dose_Gy,beam_type,notes").unwrap();
        writeln!(file, "p1,2.0,X-ray,hand curated").unwrap();

        let schema = DatasetSchema::from_template(file.path()).unwrap();
        assert_eq!(
            schema.columns(),
            ["paper_id", "total_dose_Gy", "beam_type", "notes"]
        );
        assert!(schema.contains("beam_type"));
        assert!(!schema.contains("provenance"));
    }

    #[test]
    fn test_header_only_template() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "material_type,label_type").unwrap();

        let schema = DatasetSchema::from_template(file.path()).unwrap();
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let result = DatasetSchema::from_template(&dir.path().join("template.csv"));
        assert!(matches!(result, Err(DatasetError::MissingInput(_))));
    }

    #[test]
    fn test_empty_template() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = DatasetSchema::from_template(file.path());
        assert!(matches!(result, Err(DatasetError::EmptySchema(_))));
    }
}
