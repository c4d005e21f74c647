use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use evd_ingest::PanelAppRow;
use evd_model::{EvidenceRecord, Phenotype, SourceId};
use evd_output::{EvidenceWriter, build_evidence, write_evidence};

fn row() -> PanelAppRow {
    PanelAppRow {
        symbol: "FGFR3".to_string(),
        panel_id: "245".to_string(),
        panel_name: "Bladder cancer pertinent cancer susceptibility".to_string(),
        panel_version: "1.12".to_string(),
        panel_status: "PUBLIC".to_string(),
        list: "green".to_string(),
        mode_of_inheritance: Some("MONOALLELIC, autosomal or pseudoautosomal".to_string()),
        phenotypes: Some("{Bladder cancer, somatic}, 109800".to_string()),
    }
}

fn record() -> EvidenceRecord {
    let phenotype = Phenotype::new(
        Some("Bladder cancer, somatic".to_string()),
        Some(SourceId::omim("109800").unwrap()),
    )
    .unwrap();
    let literature: BTreeSet<String> = ["24981512".to_string(), "12345".to_string()].into();
    build_evidence(
        &row(),
        &phenotype,
        &["Bladder cancer, somatic, 109800".to_string()],
        Some("EFO_0000292".to_string()),
        Some(&literature),
    )
}

fn read_lines(path: &Path) -> Vec<EvidenceRecord> {
    let reader = BufReader::new(GzDecoder::new(File::open(path).unwrap()));
    reader
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect()
}

#[test]
fn evidence_record_shape() {
    insta::assert_json_snapshot!("evidence_record", record());
}

#[test]
fn written_file_reads_back_line_by_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("genomics_england.json.gz");

    let mut second = record();
    second.target_from_source_id = "HRAS".to_string();
    second.disease_from_source_mapped_id = None;

    let written = write_evidence(&path, &[record(), second.clone()]).unwrap();
    assert_eq!(written, 2);

    let records = read_lines(&path);
    assert_eq!(records, vec![record(), second]);
}

#[test]
fn unfinished_writer_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evidence.json.gz");

    let mut writer = EvidenceWriter::create(&path).unwrap();
    writer.write(&record()).unwrap();
    assert_eq!(writer.written(), 1);
    drop(writer);

    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn empty_output_is_valid_gzip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json.gz");
    assert_eq!(write_evidence(&path, &[]).unwrap(), 0);
    assert!(read_lines(&path).is_empty());
}
