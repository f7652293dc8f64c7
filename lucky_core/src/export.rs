//! Export of month tables to CSV, JSON and XLSX files.
//!
//! Files are named `LuckyCalendar_{year}_{MM}.{ext}`.

use crate::{DayReading, Error, LunarColumns, MonthTable, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output file format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(Error::Config(format!("Unknown export format: {}", other))),
        }
    }
}

/// A row in the CSV output
#[derive(Debug, Serialize)]
struct CsvRow {
    date: String,
    weekday: String,
    flowing_year: String,
    flowing_month: String,
    flowing_day: String,
    main_number: u8,
    day_name: String,
    stars: String,
    guidance: String,
    lucky_color: String,
    crystal: String,
    small_object: String,
    lunar_date: Option<String>,
    lunar_flowing_year: Option<String>,
    lunar_flowing_month: Option<String>,
    lunar_flowing_day: Option<String>,
}

impl From<&DayReading> for CsvRow {
    fn from(reading: &DayReading) -> Self {
        let (lunar_date, lunar_flowing_year, lunar_flowing_month, lunar_flowing_day) =
            match &reading.lunar {
                Some(LunarColumns::Computed {
                    date,
                    flowing_year,
                    flowing_month,
                    flowing_day,
                }) => (
                    Some(date.to_string()),
                    Some(flowing_year.to_string()),
                    Some(flowing_month.to_string()),
                    Some(flowing_day.to_string()),
                ),
                Some(LunarColumns::Unavailable { .. }) => {
                    (Some("unavailable".to_string()), None, None, None)
                }
                None => (None, None, None, None),
            };

        CsvRow {
            date: reading.date.format("%Y-%m-%d").to_string(),
            weekday: reading.weekday.clone(),
            flowing_year: reading.flowing_year.to_string(),
            flowing_month: reading.flowing_month.to_string(),
            flowing_day: reading.flowing_day.to_string(),
            main_number: reading.main_number,
            day_name: reading.day_name.clone(),
            stars: reading.stars.clone(),
            guidance: reading.guidance.clone(),
            lucky_color: reading.lucky.color.clone(),
            crystal: reading.lucky.crystal.clone(),
            small_object: reading.lucky.small_object.clone(),
            lunar_date,
            lunar_flowing_year,
            lunar_flowing_month,
            lunar_flowing_day,
        }
    }
}

/// Conventional export file name, e.g. `LuckyCalendar_2025_09.csv`
pub fn export_file_name(year: i32, month: u32, format: ExportFormat) -> String {
    format!("LuckyCalendar_{}_{:02}.{}", year, month, format.extension())
}

/// Write a table as CSV, one header row then one record per day
pub fn write_csv<W: Write>(table: &MonthTable, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for reading in &table.rows {
        writer.serialize(CsvRow::from(reading))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a table as a pretty-printed JSON document
pub fn write_json<W: Write>(table: &MonthTable, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, table)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Spreadsheet headings, in `CsvRow` column order
const SHEET_HEADERS: [&str; 16] = [
    "日期",
    "星期",
    "流年",
    "流月",
    "流日",
    "主數",
    "日名",
    "星等",
    "指引",
    "幸運色",
    "水晶",
    "幸運小物",
    "農曆日期",
    "農曆流年",
    "農曆流月",
    "農曆流日",
];

const MAIN_NUMBER_COLUMN: u16 = 5;
const GUIDANCE_COLUMN: u16 = 8;

/// Write a table as a single-sheet workbook with a styled header row.
///
/// The lunar columns are only present when at least one row carries them.
pub fn write_xlsx<W: Write>(table: &MonthTable, mut writer: W) -> Result<()> {
    let has_lunar = table.rows.iter().any(|reading| reading.lunar.is_some());
    let columns = if has_lunar { 16 } else { 12 };

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(0xFFF2CC))
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_border(FormatBorder::Thin);
    let guidance_format = cell_format.clone().set_text_wrap();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(format!("{}-{:02}", table.year, table.month))?;

    for (col, header) in SHEET_HEADERS.iter().take(columns).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
        let width = match col {
            GUIDANCE_COLUMN => 48,
            MAIN_NUMBER_COLUMN => 6,
            _ => 12,
        };
        worksheet.set_column_width(col, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (index, reading) in table.rows.iter().enumerate() {
        let row_number = index as u32 + 1;
        let row = CsvRow::from(reading);
        let cells = [
            row.date.as_str(),
            row.weekday.as_str(),
            row.flowing_year.as_str(),
            row.flowing_month.as_str(),
            row.flowing_day.as_str(),
            "",
            row.day_name.as_str(),
            row.stars.as_str(),
            row.guidance.as_str(),
            row.lucky_color.as_str(),
            row.crystal.as_str(),
            row.small_object.as_str(),
            row.lunar_date.as_deref().unwrap_or(""),
            row.lunar_flowing_year.as_deref().unwrap_or(""),
            row.lunar_flowing_month.as_deref().unwrap_or(""),
            row.lunar_flowing_day.as_deref().unwrap_or(""),
        ];

        for (col, cell) in cells.iter().take(columns).enumerate() {
            let col = col as u16;
            match col {
                MAIN_NUMBER_COLUMN => {
                    worksheet.write_number_with_format(
                        row_number,
                        col,
                        f64::from(row.main_number),
                        &cell_format,
                    )?;
                }
                GUIDANCE_COLUMN => {
                    worksheet.write_string_with_format(row_number, col, *cell, &guidance_format)?;
                }
                _ => {
                    worksheet.write_string_with_format(row_number, col, *cell, &cell_format)?;
                }
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;
    writer.write_all(&buffer)?;
    writer.flush()?;
    Ok(())
}

/// Export a table into `dir` under its conventional file name
///
/// Creates `dir` if needed, overwrites an existing export for the same month,
/// and syncs the file to disk before returning its path.
pub fn export_table(table: &MonthTable, dir: &Path, format: ExportFormat) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(export_file_name(table.year, table.month, format));
    let mut file = File::create(&path)?;

    match format {
        ExportFormat::Csv => write_csv(table, &mut file)?,
        ExportFormat::Json => write_json(table, &mut file)?,
        ExportFormat::Xlsx => write_xlsx(table, &mut file)?,
    }

    file.sync_all()?;
    tracing::info!("Exported {} rows to {:?}", table.rows.len(), path);

    Ok(path)
}
