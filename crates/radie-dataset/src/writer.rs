//! CSV dataset output

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::mapper::DatasetRow;
use crate::schema::DatasetSchema;
use crate::{DatasetError, Result};

/// Write the header row followed by one line per row
pub fn write_dataset<W: Write>(
    writer: W,
    schema: &DatasetSchema,
    rows: &[DatasetRow],
) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    csv.write_record(schema.columns())?;
    for row in rows {
        csv.write_record(row.values().map(|value| value.to_field()))?;
    }

    csv.flush().map_err(|e| DatasetError::Csv(e.into()))?;
    Ok(())
}

/// Create (or truncate) `path` and write the dataset to it
pub fn write_dataset_file(
    path: &Path,
    schema: &DatasetSchema,
    rows: &[DatasetRow],
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DatasetError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let file = File::create(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    write_dataset(file, schema, rows)?;
    info!(path = %path.display(), rows = rows.len(), "Wrote dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::DatasetMapper;
    use radie_core::ExtractionRecord;

    fn render(schema: &DatasetSchema, rows: &[DatasetRow]) -> String {
        let mut buf = Vec::new();
        write_dataset(&mut buf, schema, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let schema = DatasetSchema::from_columns(["paper_id", "total_dose_Gy", "beam_type"]);
        let record = ExtractionRecord {
            dose_str: Some("5 Gy".to_string()),
            beam_type: Some("X-ray".to_string()),
            ..Default::default()
        };
        let rows = DatasetMapper::new(schema.clone()).map_records([&record]);

        assert_eq!(
            render(&schema, &rows),
            "paper_id,total_dose_Gy,beam_type\n,5.0,X-ray\n"
        );
    }

    #[test]
    fn test_notes_are_quoted() {
        let schema = DatasetSchema::from_columns(["notes"]);
        let rows = DatasetMapper::new(schema.clone()).map_records([&ExtractionRecord::default()]);

        // the empty evidence array contains no separators
        assert_eq!(render(&schema, &rows), "notes\nevidence=[]\n");

        let record = ExtractionRecord {
            evidence: vec![radie_core::Evidence::new(
                radie_core::FieldKind::BeamType,
                "X-ray",
            )],
            ..Default::default()
        };
        let rows = DatasetMapper::new(schema.clone()).map_records([&record]);
        let text = render(&schema, &rows);

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let parsed = reader.records().next().unwrap().unwrap();
        assert_eq!(
            &parsed[0],
            r#"evidence=[{"field":"beam_type","span":"X-ray"}]"#
        );
    }

    #[test]
    fn test_no_rows() {
        let schema = DatasetSchema::from_columns(["a", "b"]);
        assert_eq!(render(&schema, &[]), "a,b\n");
    }

    #[test]
    fn test_write_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dataset_auto.csv");
        let schema = DatasetSchema::from_columns(["label_type"]);
        let rows = DatasetMapper::new(schema.clone()).map_records([&ExtractionRecord::default()]);

        write_dataset_file(&path, &schema, &rows).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "label_type\nBronze\n");
    }
}
