pub mod data_processor;
pub mod excel_parser;
pub mod models;
pub mod report;

use anyhow::Result;
use models::ReportConfig;
use report::generate_report;
use std::io;
use std::path::{Path, PathBuf};

/// 默认分析的文件
pub const DEFAULT_FILE_PATH: &str = "~/Desktop/AVGUST RAZDUZENJE_novi template.xlsx";

/// 展开路径开头的 "~" 为用户主目录
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// 分析默认文件并把报告输出到标准输出
pub fn run() -> Result<()> {
    let config = ReportConfig::default();
    log::info!("分析文件: {:?}", expand_home(&config.file_path));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    generate_report(&config, &mut out)
}
