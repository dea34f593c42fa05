// File: pixelbot-core/tests/provisioner_tests.rs

mod test_utils;

use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};

use pixelbot_common::traits::api::SpreadsheetApi;
use pixelbot_core::Error;
use pixelbot_core::sheets::WorksheetProvisioner;

use test_utils::TEMPLATE_ID;
use test_utils::fake_sheets::{FakeSheets, SheetCall};

fn provisioner(sheets: &Arc<FakeSheets>) -> WorksheetProvisioner {
    let api: Arc<dyn SpreadsheetApi> = sheets.clone();
    WorksheetProvisioner::new(api, TEMPLATE_ID)
}

#[tokio::test]
async fn test_creates_year_once() -> Result<(), Error> {
    let sheets = Arc::new(FakeSheets::new());
    let prov = provisioner(&sheets);

    let first = prov.get_or_create(2024).await?;
    let second = prov.get_or_create(2024).await?;
    assert_eq!(first, second);
    assert_eq!(first.title, "2024");
    assert_eq!(sheets.duplicates(), 1);

    // A fresh provisioner finds the existing tab instead of cloning again.
    let other = provisioner(&sheets);
    assert_eq!(other.get_or_create(2024).await?, first);
    assert_eq!(sheets.duplicates(), 1);
    Ok(())
}

#[tokio::test]
async fn test_new_year_is_labelled_and_outlined() -> Result<(), Error> {
    let sheets = Arc::new(FakeSheets::new());
    provisioner(&sheets).get_or_create(2024).await?;

    let calls = sheets.calls();
    assert_eq!(
        calls[0],
        SheetCall::Duplicate { source: TEMPLATE_ID, index: 0, title: "2024".into() }
    );
    assert!(calls.contains(&SheetCall::UpdateCell {
        title: "2024".into(),
        cell: "N24".into(),
        value: "2024".into(),
    }));

    let outlined = sheets.outlined_ranges("2024");
    assert_eq!(outlined.len(), 12);
    assert_eq!(outlined[0], "B2:B32");
    assert_eq!(outlined[1], "C2:C30");
    assert_eq!(outlined[3], "E2:E31");
    assert_eq!(outlined[11], "M2:M32");
    Ok(())
}

#[tokio::test]
async fn test_february_follows_leap_years() -> Result<(), Error> {
    let sheets = Arc::new(FakeSheets::new());
    let prov = provisioner(&sheets);
    prov.get_or_create(2024).await?;
    prov.get_or_create(2023).await?;

    assert_eq!(sheets.outlined_ranges("2024")[1], "C2:C30");
    assert_eq!(sheets.outlined_ranges("2023")[1], "C2:C29");
    Ok(())
}

#[tokio::test]
async fn test_lookup_never_creates() {
    let sheets = Arc::new(FakeSheets::new());
    let prov = provisioner(&sheets);

    let err = assert_err!(prov.lookup(2031).await);
    assert!(matches!(err, Error::NotFound(ref m) if m == "Year not found"));
    assert_eq!(sheets.duplicates(), 0);
    assert!(!sheets.titles().contains(&"2031".to_string()));
}

#[tokio::test]
async fn test_lookup_finds_existing_tab() {
    let sheets = Arc::new(FakeSheets::new().with_worksheet(42, "2022"));
    let prov = provisioner(&sheets);
    let handle = assert_ok!(prov.lookup(2022).await);
    assert_eq!(handle.sheet_id, 42);
}

#[tokio::test]
async fn test_concurrent_first_answers_clone_once() -> Result<(), Error> {
    let sheets = Arc::new(FakeSheets::new());
    let prov = Arc::new(provisioner(&sheets));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let prov = prov.clone();
            tokio::spawn(async move { prov.get_or_create(2025).await })
        })
        .collect();
    for h in handles {
        h.await.expect("task panicked")?;
    }
    assert_eq!(sheets.duplicates(), 1);
    Ok(())
}

#[tokio::test]
async fn test_invalidate_forces_a_fresh_lookup() -> Result<(), Error> {
    let sheets = Arc::new(FakeSheets::new().with_worksheet(7, "2020"));
    let prov = provisioner(&sheets);
    prov.get_or_create(2020).await?;
    prov.invalidate(2020);
    assert_eq!(prov.get_or_create(2020).await?.sheet_id, 7);
    assert_eq!(sheets.duplicates(), 0);
    Ok(())
}

#[tokio::test]
async fn test_interrupted_setup_is_finished_on_next_use() -> Result<(), Error> {
    let sheets = Arc::new(FakeSheets::new());
    let prov = provisioner(&sheets);

    sheets.fail_next_formats(1);
    assert_err!(prov.get_or_create(2024).await);
    assert_eq!(sheets.duplicates(), 1);
    assert!(sheets.outlined_ranges("2024").is_empty());

    let handle = prov.get_or_create(2024).await?;
    assert_eq!(handle.title, "2024");
    assert_eq!(sheets.duplicates(), 1);
    assert_eq!(sheets.outlined_ranges("2024").len(), 12);

    // Finished now: later calls neither clone nor outline again.
    prov.invalidate(2024);
    prov.get_or_create(2024).await?;
    assert_eq!(sheets.outlined_ranges("2024").len(), 12);
    Ok(())
}
