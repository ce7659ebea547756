use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// 单元格值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// 缺失值（空单元格、错误单元格、NA 标记）
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// 时长，单位毫秒
    Duration(i64),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, "NaN"),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::DateTime(dt) => {
                if dt.time().num_seconds_from_midnight() == 0 && dt.time().nanosecond() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            CellValue::Duration(ms) => {
                let sign = if *ms < 0 { "-" } else { "" };
                let total = ms.unsigned_abs();
                let days = total / 86_400_000;
                let rest = total % 86_400_000;
                write!(
                    f,
                    "{}{} days {:02}:{:02}:{:02}",
                    sign,
                    days,
                    rest / 3_600_000,
                    (rest / 60_000) % 60,
                    (rest / 1000) % 60
                )
            }
        }
    }
}

/// 列推断类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    DateTime,
    Duration,
    Boolean,
    /// 多种类型混合
    Mixed,
    /// 整列均为缺失值
    Empty,
}

impl ColumnType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::DateTime => "datetime",
            ColumnType::Duration => "duration",
            ColumnType::Boolean => "boolean",
            ColumnType::Mixed => "mixed",
            ColumnType::Empty => "empty",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 列描述
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub index: usize,
    pub name: String,
    pub kind: ColumnType,
}

/// 内存中的表格数据（工作簿第一个工作表）
///
/// 每一行的长度都等于列数。
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// 按列索引取出该列所有单元格
    pub fn column(&self, index: usize) -> Option<impl Iterator<Item = &CellValue> + '_> {
        if index >= self.column_count() {
            return None;
        }
        Some(self.rows.iter().map(move |row| &row[index]))
    }
}

/// 工作表列表探测结果
#[derive(Debug, Clone, PartialEq)]
pub enum SheetListing {
    Sheets(Vec<String>),
    /// 无法以多工作表工作簿方式打开
    SingleSheet,
}

/// 报告配置
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// 待分析文件
    pub file_path: PathBuf,
    /// 首尾预览行数
    pub preview_rows: usize,
    /// 预览列数
    pub preview_columns: usize,
    /// 唯一值最多显示个数
    pub distinct_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(crate::DEFAULT_FILE_PATH),
            preview_rows: 10,
            preview_columns: 5,
            distinct_limit: 20,
        }
    }
}
