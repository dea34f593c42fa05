// src/context.rs

use std::sync::Arc;

use twilight_http::Client as HttpClient;

use crate::config::Settings;
use crate::render::YearRenderer;
use crate::services::DateRecordService;
use crate::sheets::WorksheetProvisioner;

/// Everything interaction handlers and scheduled tasks need, built once by
/// the server and shared behind an `Arc`.
pub struct BotContext {
    pub settings: Arc<Settings>,
    pub dates: Arc<DateRecordService>,
    pub provisioner: Arc<WorksheetProvisioner>,
    pub renderer: Arc<YearRenderer>,
    pub discord: Arc<HttpClient>,
    /// Plain HTTP client for outbound pings.
    pub http: reqwest::Client,
}
