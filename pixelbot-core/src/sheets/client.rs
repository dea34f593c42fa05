// src/sheets/client.rs

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};
use url::Url;

use pixelbot_common::models::{CellAddress, CellFormat, CellRange, WorksheetHandle};
use pixelbot_common::traits::api::SpreadsheetApi;

use crate::Error;
use crate::sheets::auth::ServiceAccountAuth;
use crate::sheets::coordinates::GridRange;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Google Sheets v4 client bound to one spreadsheet.
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    auth: ServiceAccountAuth,
    spreadsheet_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
    #[serde(default)]
    index: i64,
}

impl From<SheetProperties> for WorksheetHandle {
    fn from(p: SheetProperties) -> Self {
        WorksheetHandle {
            sheet_id: p.sheet_id,
            title: p.title,
            index: p.index,
        }
    }
}

impl GoogleSheetsClient {
    pub fn new(http: reqwest::Client, auth: ServiceAccountAuth, spreadsheet_id: String) -> Self {
        Self {
            http,
            auth,
            spreadsheet_id,
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn endpoint(&self, suffix: &str) -> Result<Url, Error> {
        let raw = format!("{SHEETS_API}/{}{suffix}", self.spreadsheet_id);
        Url::parse(&raw).map_err(|e| Error::ExternalApi(format!("bad Sheets URL '{raw}': {e}")))
    }

    async fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder, Error> {
        let token = self.auth.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn batch_update(&self, requests: Vec<Value>) -> Result<Value, Error> {
        let url = self.endpoint(":batchUpdate")?;
        trace!("(Sheets) batchUpdate with {} request(s)", requests.len());
        let resp = self
            .authorized(Method::POST, url)
            .await?
            .json(&json!({ "requests": requests }))
            .send()
            .await?;
        Ok(ensure_success(resp, "batchUpdate").await?.json::<Value>().await?)
    }
}

async fn ensure_success(resp: Response, what: &str) -> Result<Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::ExternalApi(format!("{what} failed with {status}: {body}")))
}

/// `'2024'!C30`. Titles are always quoted so numeric names work.
fn a1_in_sheet(title: &str, cell: CellAddress) -> String {
    format!("'{}'!{}", title.replace('\'', "''"), cell.a1())
}

fn find_in_listing(listing: &Value, title: &str) -> Result<Option<WorksheetHandle>, Error> {
    let sheets = match listing.get("sheets") {
        Some(s) => s.clone(),
        None => return Ok(None),
    };
    #[derive(Deserialize)]
    struct Sheet {
        properties: SheetProperties,
    }
    let sheets: Vec<Sheet> = serde_json::from_value(sheets)?;
    Ok(sheets
        .into_iter()
        .map(|s| s.properties)
        .find(|p| p.title == title)
        .map(WorksheetHandle::from))
}

fn duplicate_request(source_sheet_id: i64, insert_index: i64, new_title: &str) -> Value {
    json!({
        "duplicateSheet": {
            "sourceSheetId": source_sheet_id,
            "insertSheetIndex": insert_index,
            "newSheetName": new_title,
        }
    })
}

fn repeat_cell_request(sheet_id: i64, range: CellRange, format: &CellFormat) -> Value {
    json!({
        "repeatCell": {
            "range": GridRange::new(sheet_id, range),
            "cell": { "userEnteredFormat": format },
            "fields": format.fields_mask(),
        }
    })
}

fn note_request(sheet_id: i64, cell: CellAddress, note: &str) -> Value {
    json!({
        "updateCells": {
            "range": GridRange::new(sheet_id, cell.as_range()),
            "rows": [ { "values": [ { "note": note } ] } ],
            "fields": "note",
        }
    })
}

#[async_trait]
impl SpreadsheetApi for GoogleSheetsClient {
    async fn find_worksheet(&self, title: &str) -> Result<Option<WorksheetHandle>, Error> {
        let mut url = self.endpoint("")?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties(sheetId,title,index)");
        let resp = self.authorized(Method::GET, url).await?.send().await?;
        let listing = ensure_success(resp, "list worksheets").await?.json::<Value>().await?;
        find_in_listing(&listing, title)
    }

    async fn duplicate_worksheet(
        &self,
        source_sheet_id: i64,
        insert_index: i64,
        new_title: &str,
    ) -> Result<WorksheetHandle, Error> {
        let reply = self
            .batch_update(vec![duplicate_request(source_sheet_id, insert_index, new_title)])
            .await?;
        let props = reply
            .pointer("/replies/0/duplicateSheet/properties")
            .cloned()
            .ok_or_else(|| Error::InconsistentState("duplicateSheet reply carried no sheet properties".into()))?;
        let props: SheetProperties = serde_json::from_value(props)?;
        debug!("(Sheets) Duplicated sheet {source_sheet_id} as '{}' ({})", props.title, props.sheet_id);
        Ok(props.into())
    }

    async fn update_cell(&self, worksheet: &WorksheetHandle, cell: CellAddress, value: &str) -> Result<(), Error> {
        let range = a1_in_sheet(&worksheet.title, cell);
        let mut url = self.endpoint(&format!("/values/{}", urlencoding::encode(&range)))?;
        url.query_pairs_mut().append_pair("valueInputOption", "USER_ENTERED");
        let resp = self
            .authorized(Method::PUT, url)
            .await?
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": [[value]],
            }))
            .send()
            .await?;
        ensure_success(resp, "update cell").await?;
        Ok(())
    }

    async fn format_range(&self, worksheet: &WorksheetHandle, range: CellRange, format: &CellFormat) -> Result<(), Error> {
        self.batch_update(vec![repeat_cell_request(worksheet.sheet_id, range, format)])
            .await?;
        Ok(())
    }

    async fn insert_note(&self, worksheet: &WorksheetHandle, cell: CellAddress, note: &str) -> Result<(), Error> {
        self.batch_update(vec![note_request(worksheet.sheet_id, cell, note)]).await?;
        Ok(())
    }

    async fn export_pdf(&self, worksheet: &WorksheetHandle) -> Result<Vec<u8>, Error> {
        let raw = format!("{EXPORT_BASE}/{}/export", self.spreadsheet_id);
        let gid = worksheet.sheet_id.to_string();
        let url = Url::parse_with_params(&raw, &[("format", "pdf"), ("gid", gid.as_str())])
            .map_err(|e| Error::ExternalApi(format!("bad export URL '{raw}': {e}")))?;
        let resp = self.authorized(Method::GET, url).await?.send().await?;
        let bytes = ensure_success(resp, "Error downloading image").await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use pixelbot_common::models::Color;

    use super::*;

    #[test]
    fn quotes_sheet_titles() {
        assert_eq!(a1_in_sheet("2024", CellAddress::new(2, 30)), "'2024'!C30");
        assert_eq!(a1_in_sheet("it's", CellAddress::new(1, 2)), "'it''s'!B2");
    }

    #[test]
    fn finds_worksheet_by_exact_title() {
        let listing = json!({
            "sheets": [
                { "properties": { "sheetId": 0, "title": "Model", "index": 1 } },
                { "properties": { "sheetId": 99, "title": "2024", "index": 0 } }
            ]
        });
        let found = find_in_listing(&listing, "2024").unwrap().unwrap();
        assert_eq!(found, WorksheetHandle { sheet_id: 99, title: "2024".into(), index: 0 });
        assert!(find_in_listing(&listing, "2023").unwrap().is_none());
        assert!(find_in_listing(&json!({}), "2024").unwrap().is_none());
    }

    #[test]
    fn repeat_cell_request_shape() {
        let req = repeat_cell_request(5, CellAddress::new(2, 30).as_range(), &CellFormat::answered(Color::new(1.0, 0.0, 0.0)));
        assert_eq!(req.pointer("/repeatCell/range/startRowIndex"), Some(&json!(29)));
        assert_eq!(req.pointer("/repeatCell/range/endColumnIndex"), Some(&json!(3)));
        assert_eq!(req.pointer("/repeatCell/cell/userEnteredFormat/backgroundColor/red"), Some(&json!(1.0)));
        assert_eq!(req.pointer("/repeatCell/cell/userEnteredFormat/wrapStrategy"), Some(&json!("CLIP")));
        assert_eq!(req.pointer("/repeatCell/cell/userEnteredFormat/borders/top/style"), Some(&json!("SOLID")));
    }

    #[test]
    fn note_request_targets_one_cell() {
        let req = note_request(5, CellAddress::new(1, 2), "hello");
        assert_eq!(req.pointer("/updateCells/fields"), Some(&json!("note")));
        assert_eq!(req.pointer("/updateCells/rows/0/values/0/note"), Some(&json!("hello")));
        assert_eq!(req.pointer("/updateCells/range/sheetId"), Some(&json!(5)));
    }

    #[test]
    fn duplicate_request_inserts_first() {
        let req = duplicate_request(0, 0, "2025");
        assert_eq!(req.pointer("/duplicateSheet/newSheetName"), Some(&json!("2025")));
        assert_eq!(req.pointer("/duplicateSheet/insertSheetIndex"), Some(&json!(0)));
    }
}
