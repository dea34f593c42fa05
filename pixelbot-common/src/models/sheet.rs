use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A worksheet (tab) inside the configured spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetHandle {
    pub sheet_id: i64,
    pub title: String,
    pub index: i64,
}

/// One cell, addressed by 0-based column index and 1-based row number
/// (the way A1 notation counts rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub column: u32,
    pub row: u32,
}

impl CellAddress {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Column letters, `0 -> A`, `25 -> Z`, `26 -> AA`.
    pub fn column_label(&self) -> String {
        let mut n = self.column + 1;
        let mut out = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            out.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        out.reverse();
        String::from_utf8(out).unwrap_or_default()
    }

    pub fn row_label(&self) -> String {
        self.row.to_string()
    }

    pub fn a1(&self) -> String {
        format!("{}{}", self.column_label(), self.row)
    }

    /// A range whose start and end are this cell.
    pub fn as_range(&self) -> CellRange {
        CellRange { start: *self, end: *self }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.a1())
    }
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    pub fn a1(&self) -> String {
        format!("{}:{}", self.start.a1(), self.end.a1())
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.a1())
    }
}

/// Colour with unit (0..=1) components, as the Sheets API expects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Color {
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Grey used for every border we draw.
    pub const BORDER: Color = Color::new(0.40062, 0.40062, 0.40062);

    /// `#rrggbb` (leading `#` optional). Components are rounded to three
    /// decimals.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::Config(format!("invalid hex colour '{hex}'")));
        }
        let channel = |range: std::ops::Range<usize>| -> Result<f64, Error> {
            let v = u8::from_str_radix(&digits[range], 16)
                .map_err(|_| Error::Config(format!("invalid hex colour '{hex}'")))?;
            Ok((f64::from(v) / 255.0 * 1000.0).round() / 1000.0)
        };
        Ok(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Border {
    pub style: &'static str,
    pub color: Color,
}

impl Border {
    pub fn solid(color: Color) -> Self {
        Self { style: "SOLID", color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Borders {
    pub top: Border,
    pub bottom: Border,
    pub left: Border,
    pub right: Border,
}

impl Borders {
    pub fn all(border: Border) -> Self {
        Self { top: border, bottom: border, left: border, right: border }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormat {
    pub foreground_color: Color,
}

/// Subset of the Sheets `CellFormat` we write. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_format: Option<TextFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borders: Option<Borders>,
}

impl CellFormat {
    /// Solid grey border on all four sides and nothing else.
    pub fn outlined() -> Self {
        Self {
            borders: Some(Borders::all(Border::solid(Color::BORDER))),
            ..Default::default()
        }
    }

    /// Fill and text in the same colour, clipped, outlined.
    pub fn answered(color: Color) -> Self {
        Self {
            background_color: Some(color),
            text_format: Some(TextFormat { foreground_color: color }),
            wrap_strategy: Some("CLIP".to_string()),
            borders: Some(Borders::all(Border::solid(Color::BORDER))),
        }
    }

    /// Field mask for a `repeatCell` request touching only what is set.
    pub fn fields_mask(&self) -> String {
        let mut fields = Vec::new();
        if self.background_color.is_some() {
            fields.push("backgroundColor");
        }
        if self.text_format.is_some() {
            fields.push("textFormat.foregroundColor");
        }
        if self.wrap_strategy.is_some() {
            fields.push("wrapStrategy");
        }
        if self.borders.is_some() {
            fields.push("borders");
        }
        format!("userEnteredFormat({})", fields.join(","))
    }
}
