use std::fs;
use std::path::PathBuf;

use certgen::export::ExportState;
use certgen::{CertificateRecord, Preview};
use chrono::NaiveDate;

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens");
    p.push(name);
    p
}

fn check_golden(name: &str, snapshot: &str) {
    let path = golden_path(name);

    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens").ok();
        fs::write(&path, format!("{}\n", snapshot)).expect("write golden");
        println!("Updated golden: {:?}", path);
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("unable to read golden {:?}: {}", path, e));
    assert_eq!(snapshot, expected.trim_end_matches('\n'), "{} changed", name);
}

#[test]
fn sample_certificate_matches_golden() {
    let rec = CertificateRecord::sample(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    let rendered = Preview::default().render(&rec, &ExportState::Idle);
    check_golden("sample.txt", &rendered.to_text());
}

#[test]
fn empty_certificate_matches_golden() {
    let rendered = Preview::default().render(&CertificateRecord::default(), &ExportState::Idle);
    check_golden("empty.txt", &rendered.to_text());
}
