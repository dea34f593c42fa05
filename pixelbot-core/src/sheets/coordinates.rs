// src/sheets/coordinates.rs
//
// Yearly grid layout: column A holds day labels and row 1 month labels, so
// month `m` lives in column index `m` (B..M) and day `d` in row `d + 1`.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use pixelbot_common::models::{CellAddress, CellRange};

/// Cell of the template that shows the worksheet's year.
pub const YEAR_LABEL_CELL: CellAddress = CellAddress { column: 13, row: 24 };

/// Grid cell holding the answer for `date`.
pub fn cell_address(date: NaiveDate) -> CellAddress {
    CellAddress::new(date.month(), date.day() + 1)
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-based) of `year`; 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// The column segment covering every valid day of `month`.
pub fn month_range(year: i32, month: u32) -> CellRange {
    let days = days_in_month(year, month);
    CellRange {
        start: CellAddress::new(month, 2),
        end: CellAddress::new(month, days + 1),
    }
}

/// A range in the half-open, 0-based form the Sheets batch API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: u32,
    pub end_row_index: u32,
    pub start_column_index: u32,
    pub end_column_index: u32,
}

impl GridRange {
    pub fn new(sheet_id: i64, range: CellRange) -> Self {
        Self {
            sheet_id,
            start_row_index: range.start.row - 1,
            end_row_index: range.end.row,
            start_column_index: range.start.column,
            end_column_index: range.end.column + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_range_is_half_open_and_zero_based() {
        let g = GridRange::new(7, CellAddress::new(2, 30).as_range());
        assert_eq!(
            g,
            GridRange { sheet_id: 7, start_row_index: 29, end_row_index: 30, start_column_index: 2, end_column_index: 3 }
        );
    }

    #[test]
    fn every_month_maps_to_its_column() {
        let columns = ["B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M"];
        for (i, column) in columns.iter().enumerate() {
            let month = i as u32 + 1;
            let first = NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
            assert_eq!(cell_address(first).a1(), format!("{column}2"));

            let last_day = days_in_month(2024, month);
            let last = NaiveDate::from_ymd_opt(2024, month, last_day).unwrap();
            assert_eq!(cell_address(last).a1(), format!("{column}{}", last_day + 1));
            assert_eq!(cell_address(last), cell_address(last));
        }

        let jan_31 = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        let dec_31 = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(cell_address(jan_31).a1(), "B32");
        assert_eq!(cell_address(dec_31).a1(), "M32");
        assert_eq!(cell_address(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).a1(), "C30");
    }

    #[test]
    fn century_leap_rules() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
    }
}
