//! TEI-to-record integration tests

use std::path::Path;

use radie_core::{FieldKind, MaterialType};
use radie_extractor::{JsonlWriter, RecordBuilder};
use radie_parser::ParserRegistry;

const PAPER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader>
    <fileDesc><titleStmt><title>Hafnium MOF radiosensitizers (10 Gy title noise)</title></titleStmt></fileDesc>
  </teiHeader>
  <text>
    <body>
      <div>
        <head>Results</head>
        <p>Hf-based metal-organic framework nanoparticles acted as a
           radiosensitizer under 160 keV X-ray irradiation.</p>
        <p>At a dose of 2 Gy the SER was 1.62, with a 3.1 fold increase
           in hydroxyl radical generation.</p>
      </div>
    </body>
  </text>
</TEI>"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_paper_to_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "hf-mof.tei.xml", PAPER);

    let doc = ParserRegistry::with_defaults().parse(&path).unwrap();
    let record = RecordBuilder::new()
        .build("hf-mof.tei.xml", &doc.content)
        .unwrap();

    assert_eq!(record.material_type_guess, Some(MaterialType::Mof));
    assert_eq!(record.beam_type.as_deref(), Some("X-ray"));
    assert_eq!(record.energy_str.as_deref(), Some("160 keV"));
    // the title's "10 Gy" is outside any paragraph
    assert_eq!(record.dose_str.as_deref(), Some("2 Gy"));
    assert_eq!(record.ser, Some(1.62));
    assert_eq!(record.fold_change, Some(3.1));
    assert!(record.has_ros);
    assert!(record.has_radiosensitization);
    assert!(!record.has_xeol);

    let fields: Vec<FieldKind> = record.evidence.iter().map(|e| e.field).collect();
    assert_eq!(
        fields,
        vec![
            FieldKind::BeamType,
            FieldKind::Energy,
            FieldKind::Dose,
            FieldKind::Ser,
            FieldKind::FoldChange
        ]
    );
    // 0.2 + 0.1 * 3 + 0.15 + 0.05 + 0.05
    assert!((record.confidence - 0.75).abs() < 1e-9);
}

#[test]
fn test_malformed_sibling_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.tei.xml", PAPER);
    let broken = write(dir.path(), "broken.tei.xml", "<TEI><text><p>5 Gy of gamma <");
    let missing = dir.path().join("missing.tei.xml");

    let registry = ParserRegistry::with_defaults();
    let documents = [&broken, &missing, &good].map(|path| {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        (name, registry.parse(path).map(|doc| doc.content))
    });

    let output = RecordBuilder::new().extract_batch(documents);

    // the broken file still yields its recovered prefix; only the missing one is skipped
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.summary.documents_skipped, 1);
    assert_eq!(output.records[0].source_file.as_deref(), Some("broken.tei.xml"));
    assert_eq!(output.records[0].dose_str.as_deref(), Some("5 Gy"));
    assert_eq!(output.records[1].source_file.as_deref(), Some("good.tei.xml"));

    let mut writer = JsonlWriter::new(Vec::new());
    for record in &output.records {
        writer.write_record(record).unwrap();
    }
    let jsonl = String::from_utf8(writer.finish().unwrap()).unwrap();
    assert_eq!(jsonl.lines().count(), 2);
}
