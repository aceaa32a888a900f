use std::io::Write;

/// 使用默认等级 `Info` 初始化日志，可以通过 `RUST_LOG` 覆盖
pub fn init_log() {
    init_log_with_level(log::LevelFilter::Info);
}

/// 初始化全局 logger
///
/// 输出格式：`[时间] 等级 [文件:行号] 内容`，等级带颜色。
/// 只能调用一次，重复调用会 panic（由 env_logger 保证）。
pub fn init_log_with_level(default_level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format(|buf, record| {
            let level_style = match record.level() {
                log::Level::Info => level_color(buf, log::Level::Info, anstyle::AnsiColor::Green),
                log::Level::Warn => level_color(buf, log::Level::Warn, anstyle::AnsiColor::Yellow),
                log::Level::Error => level_color(buf, log::Level::Error, anstyle::AnsiColor::Red),
                level => buf.default_level_style(level),
            };
            let location_style =
                anstyle::Style::new().fg_color(Some(anstyle::Color::Rgb(anstyle::RgbColor(110, 110, 110))));

            let file = short_file_name(record.file().unwrap_or(""));
            let line = record.line().unwrap_or(0);
            let time = chrono::Local::now().format("%H:%M:%S");
            let level = record.level();

            writeln!(
                buf,
                "{level_style}[{time}] {level:<5}{level_style:#} {location_style}[{file}:{line}]{location_style:#} {}",
                record.args()
            )
        })
        .init();
}

fn level_color(buf: &env_logger::fmt::Formatter, level: log::Level, color: anstyle::AnsiColor) -> anstyle::Style {
    buf.default_level_style(level).fg_color(Some(anstyle::Color::Ansi(color)))
}

/// 只保留文件名部分，兼容 `/` 和 `\` 两种分隔符
fn short_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
