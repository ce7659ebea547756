use crate::models::{CellValue, ColumnInfo, ColumnType, Dataset};
use std::ops::Range;

/// 各类型单元格计数
#[derive(Debug, Default)]
struct TypeCounts {
    missing: usize,
    ints: usize,
    floats: usize,
    texts: usize,
    bools: usize,
    dates: usize,
    durations: usize,
    total: usize,
}

impl TypeCounts {
    fn add(&mut self, cell: &CellValue) {
        self.total += 1;
        match cell {
            CellValue::Empty => self.missing += 1,
            CellValue::Int(_) => self.ints += 1,
            CellValue::Float(_) => self.floats += 1,
            CellValue::Text(_) => self.texts += 1,
            CellValue::Bool(_) => self.bools += 1,
            CellValue::DateTime(_) => self.dates += 1,
            CellValue::Duration(_) => self.durations += 1,
        }
    }

    fn kind(&self) -> ColumnType {
        let present = self.total - self.missing;
        if present == 0 {
            ColumnType::Empty
        } else if self.ints == present && self.missing == 0 {
            ColumnType::Integer
        } else if self.ints + self.floats == present {
            // 缺失值会把整数列提升为浮点
            ColumnType::Float
        } else if self.bools == present && self.missing == 0 {
            ColumnType::Boolean
        } else if self.dates == present {
            ColumnType::DateTime
        } else if self.durations == present {
            ColumnType::Duration
        } else if self.texts == present {
            ColumnType::Text
        } else {
            ColumnType::Mixed
        }
    }
}

/// 推断一列的类型
pub fn infer_column_type<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> ColumnType {
    let mut counts = TypeCounts::default();
    for cell in cells {
        counts.add(cell);
    }
    counts.kind()
}

/// 生成所有列的描述，顺序与 Dataset 列顺序一致
pub fn describe_columns(dataset: &Dataset) -> Vec<ColumnInfo> {
    dataset
        .column_names
        .iter()
        .enumerate()
        .map(|(index, name)| ColumnInfo {
            index,
            name: name.clone(),
            kind: dataset
                .column(index)
                .map(infer_column_type)
                .unwrap_or(ColumnType::Empty),
        })
        .collect()
}

/// 前 n 行的行号范围
pub fn head_rows(dataset: &Dataset, n: usize) -> Range<usize> {
    0..n.min(dataset.row_count())
}

/// 后 n 行的行号范围
pub fn tail_rows(dataset: &Dataset, n: usize) -> Range<usize> {
    let total = dataset.row_count();
    total.saturating_sub(n)..total
}

/// 按首次出现顺序取一列中前 limit 个不重复的非缺失值
///
/// 列不存在时返回 None。
pub fn distinct_values(dataset: &Dataset, index: usize, limit: usize) -> Option<Vec<CellValue>> {
    let column = dataset.column(index)?;
    let mut values: Vec<CellValue> = Vec::new();

    for cell in column.filter(|c| !c.is_missing()) {
        if values.len() >= limit {
            break;
        }
        if !values.contains(cell) {
            values.push(cell.clone());
        }
    }

    Some(values)
}
