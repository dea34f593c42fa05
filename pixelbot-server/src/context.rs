//! pixelbot-server/src/context.rs
//!
//! Wires settings, storage, Google Sheets and Discord into one `BotContext`.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use twilight_http::Client as HttpClient;

use pixelbot_common::traits::api::SpreadsheetApi;
use pixelbot_core::render::{PdfiumRasterizer, YearRenderer};
use pixelbot_core::repositories::SqliteDateRecordRepository;
use pixelbot_core::services::DateRecordService;
use pixelbot_core::sheets::auth::{ServiceAccountAuth, ServiceAccountKey};
use pixelbot_core::sheets::{GoogleSheetsClient, WorksheetProvisioner};
use pixelbot_core::{BotContext, Database, Error, Settings};

use crate::Args;

pub async fn build_context(args: &Args) -> Result<(Arc<BotContext>, Database), Error> {
    let mut settings = Settings::from_env()?;
    if let Some(url) = &args.database_url {
        settings.database_url = url.clone();
    }
    if let Some(path) = &args.credentials {
        settings.credentials_path = path.clone();
    }
    let settings = Arc::new(settings);

    info!("Using database {}", settings.database_url);
    let db = Database::new(&settings.database_url).await?;
    db.migrate().await?;
    let records = Arc::new(SqliteDateRecordRepository::new(db.pool().clone()));

    let http = reqwest::Client::new();
    let key = ServiceAccountKey::from_file(&settings.credentials_path)?;
    let auth = ServiceAccountAuth::new(key, http.clone());
    info!("Google Sheets access as {}", auth.client_email());
    let sheets: Arc<dyn SpreadsheetApi> =
        Arc::new(GoogleSheetsClient::new(http.clone(), auth, settings.spreadsheet_id.clone()));

    let provisioner = Arc::new(WorksheetProvisioner::new(sheets.clone(), settings.model_worksheet_id));
    let dates = Arc::new(DateRecordService::new(
        records,
        sheets.clone(),
        provisioner.clone(),
        settings.clone(),
    ));
    let renderer = Arc::new(YearRenderer::new(
        sheets,
        provisioner.clone(),
        Arc::new(PdfiumRasterizer::new(args.pdfium_dir.clone())),
    ));

    let discord = Arc::new(
        HttpClient::builder()
            .token(settings.bot_token.clone())
            .timeout(Duration::from_secs(30))
            .build(),
    );

    let ctx = BotContext {
        settings,
        dates,
        provisioner,
        renderer,
        discord,
        http,
    };
    Ok((Arc::new(ctx), db))
}
