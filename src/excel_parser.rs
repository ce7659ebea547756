use crate::models::{CellValue, Dataset, SheetListing};
use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};
use std::panic::{self, UnwindSafe};
use std::path::Path;

/// 视为缺失值的字符串
const NA_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// 读取工作簿第一个工作表为 Dataset，首个非空行作为表头
pub fn load_dataset(file_path: &Path) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(file_path)
        .with_context(|| format!("无法打开文件: {:?}", file_path))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("工作簿没有工作表")?
        .clone();
    log::debug!("读取工作表 {:?} ({:?})", sheet_name, file_path);

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("无法读取工作表: {}", sheet_name))?;

    let dataset = dataset_from_range(&range);
    log::debug!(
        "共 {} 行, {} 列",
        dataset.row_count(),
        dataset.column_count()
    );
    Ok(dataset)
}

/// 重新打开文件，读取全部工作表名称
pub fn list_sheet_names(file_path: &Path) -> Result<Vec<String>> {
    let workbook = open_workbook_auto(file_path)
        .with_context(|| format!("无法打开文件: {:?}", file_path))?;
    Ok(workbook.sheet_names())
}

/// 探测工作表列表，任何错误（包括 panic）都降级为单工作表
pub fn detect_sheet_listing(file_path: &Path) -> SheetListing {
    listing_or_single_sheet(|| list_sheet_names(file_path))
}

fn listing_or_single_sheet<F>(read_names: F) -> SheetListing
where
    F: FnOnce() -> Result<Vec<String>> + UnwindSafe,
{
    match panic::catch_unwind(read_names) {
        Ok(Ok(names)) => SheetListing::Sheets(names),
        Ok(Err(e)) => {
            log::debug!("读取工作表列表失败: {:#}", e);
            SheetListing::SingleSheet
        }
        Err(_) => {
            log::debug!("读取工作表列表时发生 panic");
            SheetListing::SingleSheet
        }
    }
}

fn dataset_from_range(range: &Range<Data>) -> Dataset {
    // 已用区域之前的空列也算作列
    let leading = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    // 只跳过真正空白的行，NA 标记行保留为全缺失行
    let mut rows = range
        .rows()
        .filter(|row| !is_blank_row(row))
        .map(|row| {
            let mut cells = vec![CellValue::Empty; leading];
            cells.extend(row.iter().map(convert_cell));
            cells
        });

    let Some(header) = rows.next() else {
        return Dataset::default();
    };

    Dataset {
        column_names: column_names(&header),
        rows: rows.collect(),
    }
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

/// 生成列名：空表头为 "Unnamed: n"，重名追加 ".1"、".2"
fn column_names(header: &[CellValue]) -> Vec<String> {
    let mut used = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let base = match cell {
            CellValue::Empty => format!("Unnamed: {}", idx),
            other => other.to_string(),
        };

        let mut name = base.clone();
        if used.contains(&name) {
            let counter = counters.entry(base.clone()).or_insert(0);
            loop {
                *counter += 1;
                name = format!("{}.{}", base, counter);
                if !used.contains(&name) {
                    break;
                }
            }
        }

        used.insert(name.clone());
        names.push(name);
    }

    names
}

/// 将 calamine 单元格转换为 CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => {
            if NA_MARKERS.contains(&s.as_str()) {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::DateTime(dt) => {
            let converted = if dt.is_duration() {
                dt.as_duration()
                    .map(|d| CellValue::Duration(d.num_milliseconds()))
            } else {
                dt.as_datetime().map(CellValue::DateTime)
            };
            converted.unwrap_or(CellValue::Float(dt.as_f64()))
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// ODS 等格式中的 ISO 日期字符串
fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

    for format in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
