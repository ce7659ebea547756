use crate::data_processor::{describe_columns, distinct_values, head_rows, tail_rows};
use crate::excel_parser::{detect_sheet_listing, load_dataset};
use crate::models::{CellValue, ColumnInfo, ColumnType, Dataset, ReportConfig, SheetListing};
use anyhow::Result;
use std::io::Write;
use std::ops::Range;

/// 生成完整报告：读取数据、输出各部分，最后读取工作表列表
pub fn generate_report<W: Write>(config: &ReportConfig, out: &mut W) -> Result<()> {
    let file_path = crate::expand_home(&config.file_path);
    let dataset = load_dataset(&file_path)?;

    write_analysis(&dataset, config, out)?;

    let listing = detect_sheet_listing(&file_path);
    write_sheet_listing(&listing, out)?;

    Ok(())
}

/// 输出数据相关的各部分（工作表列表除外）
pub fn write_analysis<W: Write>(
    dataset: &Dataset,
    config: &ReportConfig,
    out: &mut W,
) -> Result<()> {
    let columns = describe_columns(dataset);

    writeln!(out, "=== EXCEL FILE ANALYSIS ===")?;
    writeln!(out, "Total rows: {}", dataset.row_count())?;
    writeln!(out, "Total columns: {}", dataset.column_count())?;

    writeln!(out, "\n=== COLUMN ANALYSIS ===")?;
    for column in &columns {
        writeln!(out, "{}: {}", column.index, column.name)?;
    }

    writeln!(out, "\n=== FIRST {} ROWS (more detailed) ===", config.preview_rows)?;
    let head = head_rows(dataset, config.preview_rows);
    writeln!(out, "{}", render_table(dataset, &columns, head, config.preview_columns))?;

    writeln!(out, "\n=== LAST {} ROWS ===", config.preview_rows)?;
    let tail = tail_rows(dataset, config.preview_rows);
    writeln!(out, "{}", render_table(dataset, &columns, tail, config.preview_columns))?;

    writeln!(out, "\n=== DATA TYPES ===")?;
    write!(out, "{}", render_dtypes(&columns))?;

    writeln!(out, "\n=== UNIQUE VALUES IN FIRST COLUMN ===")?;
    write_distinct(dataset, 0, config.distinct_limit, out)?;

    writeln!(out, "\n=== UNIQUE VALUES IN SECOND COLUMN ===")?;
    write_distinct(dataset, 1, config.distinct_limit, out)?;

    Ok(())
}

/// 输出工作表列表或单工作表提示
pub fn write_sheet_listing<W: Write>(listing: &SheetListing, out: &mut W) -> Result<()> {
    match listing {
        SheetListing::Sheets(names) => {
            writeln!(out, "\n=== SHEET NAMES ===")?;
            writeln!(out, "{}", serde_json::to_string(names)?)?;
        }
        SheetListing::SingleSheet => {
            writeln!(out, "\n=== SINGLE SHEET FILE ===")?;
        }
    }
    Ok(())
}

fn write_distinct<W: Write>(
    dataset: &Dataset,
    index: usize,
    limit: usize,
    out: &mut W,
) -> Result<()> {
    let values = distinct_values(dataset, index, limit).unwrap_or_else(|| {
        log::warn!("数据只有 {} 列，没有第 {} 列", dataset.column_count(), index);
        Vec::new()
    });
    writeln!(out, "{}", serde_json::to_string(&values)?)?;
    Ok(())
}

/// 渲染表格：左侧为行号，其余各列右对齐，列间两个空格
pub fn render_table(
    dataset: &Dataset,
    columns: &[ColumnInfo],
    rows: Range<usize>,
    max_columns: usize,
) -> String {
    let shown = &columns[..max_columns.min(columns.len())];
    let names: Vec<&str> = shown.iter().map(|c| c.name.as_str()).collect();

    if rows.is_empty() {
        return format!("Empty table\nColumns: [{}]", names.join(", "));
    }

    let labels: Vec<String> = rows.clone().map(|i| i.to_string()).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let cells: Vec<Vec<String>> = shown
        .iter()
        .map(|column| {
            rows.clone()
                .map(|row| format_cell(&dataset.rows[row][column.index], column.kind))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = names
        .iter()
        .zip(&cells)
        .map(|(name, values)| {
            values
                .iter()
                .map(|v| v.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(labels.len() + 1);

    let mut header = " ".repeat(label_width);
    for (name, width) in names.iter().zip(&widths) {
        header.push_str(&format!("  {:>width$}", name, width = *width));
    }
    lines.push(header.trim_end().to_string());

    for (line_idx, label) in labels.iter().enumerate() {
        let mut line = format!("{:<width$}", label, width = label_width);
        for (values, width) in cells.iter().zip(&widths) {
            line.push_str(&format!("  {:>width$}", values[line_idx], width = *width));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// 每列一行：列名 + 推断类型
pub fn render_dtypes(columns: &[ColumnInfo]) -> String {
    let width = columns
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0);

    columns
        .iter()
        .map(|c| format!("{:<width$}  {}\n", c.name, c.kind, width = width))
        .collect()
}

/// 按列类型格式化单元格
fn format_cell(value: &CellValue, kind: ColumnType) -> String {
    match (value, kind) {
        (CellValue::Empty, ColumnType::DateTime) => "NaT".to_string(),
        (CellValue::Int(i), ColumnType::Float) => format!("{:.1}", *i as f64),
        (CellValue::Float(f), _) if f.fract() == 0.0 && f.abs() < 1e16 => format!("{:.1}", f),
        (CellValue::Text(s), _) => s.replace('\n', " "),
        (other, _) => other.to_string(),
    }
}
