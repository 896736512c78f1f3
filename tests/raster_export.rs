#![cfg(feature = "raster")]

use certgen::session::Session;
use certgen::{CertificateRecord, GeneratorConfig, StrategyKind};
use chrono::NaiveDate;

fn jane() -> CertificateRecord {
    CertificateRecord {
        participant_name: "Jane Doe".into(),
        program_name: "X".into(),
        organization_name: "Y".into(),
        date: "2024-05-01".into(),
        initiative_name: String::new(),
        certificate_type: "Completion".into(),
    }
}

#[tokio::test]
async fn raster_export_produces_named_pdf() {
    let cfg = GeneratorConfig {
        today: NaiveDate::from_ymd_opt(2024, 5, 1),
        ..GeneratorConfig::default()
    };
    assert_eq!(cfg.strategy, StrategyKind::Raster);
    let session = Session::new(cfg).unwrap();
    session.replace(jane()).await.unwrap();

    let outcome = session.export().await.unwrap();
    let artifact = outcome.artifact.expect("raster export yields a file");
    assert_eq!(artifact.filename, "Jane Doe_Certificate.pdf");
    assert!(artifact.bytes.starts_with(b"%PDF"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(&artifact.filename);
    std::fs::write(&path, &artifact.bytes).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 1000);
}
