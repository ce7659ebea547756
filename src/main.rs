use anyhow::Result;

fn main() -> Result<()> {
    init_logging();
    excel_analyzer_lib::run()
}

/// 日志输出到 stderr，默认只显示警告，可用 RUST_LOG 调整
fn init_logging() {
    use env_logger::{Builder, Env};
    use std::io::Write;

    Builder::from_env(Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
