//! End-to-end pipeline workflow tests over mock collaborators
//!
//! Covers the full publish-then-deliver sequence, including the partial
//! failure windows between upload, registration, rename, transmission,
//! and ledger bookkeeping.

use std::sync::Arc;

use reportwire_db::mock::{MockContactDirectory, MockDeliveryLedger, MockRecordStore};
use reportwire_db::DeliveryOutcome;
use reportwire_drive::mock::MockBlobStore;
use reportwire_messaging::mock::MockMessagingGateway;
use reportwire_pipeline::{DeliveryReport, ReportDispatcher, ReportPublisher};

struct World {
    blob: MockBlobStore,
    records: MockRecordStore,
    directory: MockContactDirectory,
    gateway: MockMessagingGateway,
    ledger: MockDeliveryLedger,
    publisher: ReportPublisher,
    dispatcher: ReportDispatcher,
}

fn world() -> World {
    let blob = MockBlobStore::new();
    let records = MockRecordStore::starting_at(42);
    let directory = MockContactDirectory::new();
    let gateway = MockMessagingGateway::new();
    let ledger = MockDeliveryLedger::new();

    let publisher = ReportPublisher::new(Arc::new(blob.clone()), Arc::new(records.clone()));
    let dispatcher = ReportDispatcher::new(
        Arc::new(directory.clone()),
        Arc::new(gateway.clone()),
        Arc::new(ledger.clone()),
    );

    World {
        blob,
        records,
        directory,
        gateway,
        ledger,
        publisher,
        dispatcher,
    }
}

const PDF: &[u8] = b"%PDF-1.7 report body";

#[tokio::test]
async fn publish_then_deliver_happy_path() {
    let w = world();
    w.directory.add(7, "Dana", "+15550001111");

    let published = w
        .publisher
        .publish(PDF.to_vec(), "tmp_report")
        .await
        .expect("publication should succeed");

    assert_eq!(published.file_name, "42_report.pdf");
    assert!(published.renamed);

    let report = w
        .dispatcher
        .send_report(7, &published.public_url)
        .await
        .expect("dispatch should succeed");

    assert!(report.is_sent());

    // The message carried the published link as media
    let sent = w.gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].message.media_url.as_deref(),
        Some(published.public_url.as_str())
    );

    // Exactly one ledger entry, tied to the published artifact
    let entries = w.ledger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, DeliveryOutcome::Sent);
    assert_eq!(
        entries[0].report_url.as_deref(),
        Some(published.public_url.as_str())
    );
}

#[tokio::test]
async fn misnamed_artifact_still_delivers() {
    let w = world();
    w.directory.add(7, "Dana", "+15550001111");
    w.blob.fail_renames();

    let published = w
        .publisher
        .publish(PDF.to_vec(), "tmp_report")
        .await
        .expect("rename failure must not fail publication");

    // Registered but misnamed: registry holds the canonical name, the
    // blob keeps the working name, the public link still works
    assert!(!published.renamed);
    assert_eq!(published.file_name, "42_report.pdf");
    assert_eq!(w.blob.blobs()[0].name, "tmp_report");

    let report = w
        .dispatcher
        .send_report(7, &published.public_url)
        .await
        .unwrap();
    assert!(report.is_sent());
}

#[tokio::test]
async fn registration_failure_orphans_the_blob_and_nothing_is_delivered() {
    let w = world();
    w.records.fail_registrations();

    let err = w.publisher.publish(PDF.to_vec(), "tmp_report").await;
    assert!(err.is_err());

    // Bytes exist in the store with no registry entry
    assert_eq!(w.blob.blobs().len(), 1);
    assert!(w.records.registered().is_empty());
    assert_eq!(w.gateway.sent_count(), 0);
    assert!(w.ledger.is_empty());
}

#[tokio::test]
async fn failed_transmission_is_recorded_and_reported_as_data() {
    let w = world();
    w.directory.add(7, "Dana", "+15550001111");
    w.gateway.fail_with("provider outage");

    let published = w.publisher.publish(PDF.to_vec(), "tmp_report").await.unwrap();
    let report = w
        .dispatcher
        .send_report(7, &published.public_url)
        .await
        .expect("transmit failure is a result, not an error");

    assert!(matches!(report, DeliveryReport::Failed { .. }));

    let entries = w.ledger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, DeliveryOutcome::Failed);
    assert!(entries[0].provider_sid.is_none());
}

#[tokio::test]
async fn repeated_publication_and_delivery_are_independent_attempts() {
    let w = world();
    w.directory.add(7, "Dana", "+15550001111");

    let first = w.publisher.publish(PDF.to_vec(), "tmp_report").await.unwrap();
    let second = w.publisher.publish(PDF.to_vec(), "tmp_report").await.unwrap();
    assert_ne!(first.file_name, second.file_name);

    w.dispatcher.send_report(7, &first.public_url).await.unwrap();
    w.dispatcher.send_report(7, &first.public_url).await.unwrap();

    assert_eq!(w.gateway.sent_count(), 2);
    assert_eq!(w.ledger.len(), 2);
}

#[tokio::test]
async fn text_messages_never_touch_the_ledger() {
    let w = world();
    w.directory.add(7, "Dana", "+15550001111");

    let report = w.dispatcher.send_text(7, "hello").await.unwrap();
    assert!(report.is_sent());

    w.gateway.fail_with("throttled");
    let report = w.dispatcher.send_text(7, "hello again").await.unwrap();
    assert!(!report.is_sent());

    assert!(w.ledger.is_empty());
}
