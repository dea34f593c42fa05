// File: pixelbot-core/tests/test_utils/mod.rs
#![allow(dead_code)]

pub mod fake_sheets;

use std::collections::HashMap;
use std::sync::Arc;

use pixelbot_common::traits::api::SpreadsheetApi;
use pixelbot_core::repositories::SqliteDateRecordRepository;
use pixelbot_core::services::DateRecordService;
use pixelbot_core::sheets::WorksheetProvisioner;
use pixelbot_core::{Database, Error, Settings};

use fake_sheets::FakeSheets;

/// Template sheet id used by every fixture.
pub const TEMPLATE_ID: i64 = 0;

/// Settings with only the required keys plus `extra`.
pub fn test_settings(extra: &[(&str, &str)]) -> Settings {
    let mut map: HashMap<String, String> = HashMap::from([
        ("BOT_TOKEN".to_string(), "token".to_string()),
        ("SPREADSHEET_ID".to_string(), "sheet".to_string()),
    ]);
    for (k, v) in extra {
        map.insert(k.to_string(), v.to_string());
    }
    Settings::from_lookup(|k| map.get(k).cloned()).expect("test settings should parse")
}

/// A migrated, private in-memory database.
pub async fn setup_test_database() -> Result<Database, Error> {
    let db = Database::in_memory().await?;
    db.migrate().await?;
    Ok(db)
}

pub struct Fixture {
    pub db: Database,
    pub sheets: Arc<FakeSheets>,
    pub provisioner: Arc<WorksheetProvisioner>,
    pub dates: DateRecordService,
    pub records: Arc<SqliteDateRecordRepository>,
}

pub async fn fixture(extra: &[(&str, &str)]) -> Result<Fixture, Error> {
    let db = setup_test_database().await?;
    let sheets = Arc::new(FakeSheets::new());
    let api: Arc<dyn SpreadsheetApi> = sheets.clone();
    let provisioner = Arc::new(WorksheetProvisioner::new(api.clone(), TEMPLATE_ID));
    let records = Arc::new(SqliteDateRecordRepository::new(db.pool().clone()));
    let dates = DateRecordService::new(
        records.clone(),
        api,
        provisioner.clone(),
        Arc::new(test_settings(extra)),
    );
    Ok(Fixture {
        db,
        sheets,
        provisioner,
        dates,
        records,
    })
}
