use std::sync::Arc;
use std::time::Duration;

use certgen::export::print::PrintDialogExport;
use certgen::export::{ExportState, ENVIRONMENT_MESSAGE};
use certgen::platform::{MemoryPrintHost, PrintBehavior};
use certgen::session::Session;
use certgen::{Error, Field, GeneratorConfig, StrategyKind};
use chrono::NaiveDate;

fn config() -> GeneratorConfig {
    GeneratorConfig {
        strategy: StrategyKind::Print,
        today: NaiveDate::from_ymd_opt(2024, 5, 1),
        ..GeneratorConfig::default()
    }
}

fn print_session(host: &MemoryPrintHost) -> Session {
    let cfg = config();
    let exporter = Arc::new(PrintDialogExport::new(Arc::new(host.clone()), &cfg));
    Session::with_exporter(cfg, exporter)
}

async fn fill_jane(session: &Session) {
    session.edit(Field::ParticipantName, "Jane Doe").await.unwrap();
    session.edit(Field::ProgramName, "X").await.unwrap();
    session.edit(Field::OrganizationName, "Y").await.unwrap();
    session.edit(Field::Date, "2024-05-01").await.unwrap();
    session.edit(Field::CertificateType, "Completion").await.unwrap();
}

#[tokio::test]
async fn trigger_tracks_completeness() {
    let host = MemoryPrintHost::default();
    let session = print_session(&host);
    assert!(!session.render().await.unwrap().trigger.enabled);

    fill_jane(&session).await;
    assert!(session.render().await.unwrap().trigger.enabled);

    session.edit(Field::Date, "").await.unwrap();
    assert!(!session.render().await.unwrap().trigger.enabled);
}

#[tokio::test]
async fn print_export_writes_the_certificate_document() {
    let host = MemoryPrintHost::default();
    let session = print_session(&host);
    fill_jane(&session).await;

    let outcome = session.export().await.unwrap();
    assert_eq!(outcome.strategy, StrategyKind::Print);

    let log = host.log();
    assert_eq!(log.opened, vec!["Jane Doe_Certificate".to_string()]);
    assert!(log.documents[0].contains("<title>Certificate - Jane Doe</title>"));
    assert!(log.documents[0].contains("Certificate of"));
    assert_eq!(log.closed, 1);
    assert_eq!(session.export_state().await.unwrap(), ExportState::Idle);
}

#[tokio::test(start_paused = true)]
async fn second_export_while_printing_is_rejected() {
    let host = MemoryPrintHost::new(PrintBehavior::NeverSignals);
    let session = print_session(&host);
    fill_jane(&session).await;

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.export().await })
    };
    let mut state = session.subscribe_export();
    state
        .wait_for(|s| *s == ExportState::Exporting)
        .await
        .unwrap();

    assert!(matches!(session.export().await, Err(Error::ExportInProgress)));

    // the window closes after the fallback delay and the export completes
    assert!(first.await.unwrap().is_ok());
    assert_eq!(host.log().opened.len(), 1);
    assert_eq!(host.log().closed, 1);
    assert_eq!(session.export_state().await.unwrap(), ExportState::Idle);
}

#[tokio::test(start_paused = true)]
async fn blocked_window_shows_banner_then_reverts() {
    let host = MemoryPrintHost::new(PrintBehavior::Blocked);
    let session = print_session(&host);
    fill_jane(&session).await;

    let err = session.export().await.unwrap_err();
    assert!(matches!(err, Error::ExportEnvironmentUnavailable(_)));
    assert_eq!(
        session.export_state().await.unwrap(),
        ExportState::Error(ENVIRONMENT_MESSAGE.to_string())
    );
    // export stays available while the banner shows
    assert!(session.render().await.unwrap().trigger.enabled);

    tokio::time::sleep(Duration::from_secs(3) + Duration::from_millis(10)).await;
    assert_eq!(session.export_state().await.unwrap(), ExportState::Idle);
}

#[tokio::test(start_paused = true)]
async fn retry_cancels_the_stale_banner_timer() {
    let host = MemoryPrintHost::new(PrintBehavior::Blocked);
    let session = print_session(&host);
    fill_jane(&session).await;

    assert!(session.export().await.is_err());
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(session.export().await.is_err());

    // first timer would have fired here; the second banner must survive it
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(matches!(session.export_state().await.unwrap(), ExportState::Error(_)));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(session.export_state().await.unwrap(), ExportState::Idle);
}

#[tokio::test]
async fn incomplete_record_is_rejected_without_state_change() {
    let host = MemoryPrintHost::default();
    let session = print_session(&host);
    session.edit(Field::ParticipantName, "Jane Doe").await.unwrap();

    match session.export().await {
        Err(Error::ValidationIncomplete(missing)) => {
            assert!(missing.contains(&Field::ProgramName));
            assert!(!missing.contains(&Field::ParticipantName));
        }
        other => panic!("unexpected result: {:?}", other.map(|o| o.strategy)),
    }
    assert_eq!(session.export_state().await.unwrap(), ExportState::Idle);
    assert!(host.log().opened.is_empty());
}
