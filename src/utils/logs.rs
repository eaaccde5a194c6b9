use tracing_subscriber::EnvFilter;

/// 解析日志级别名称
pub fn parse_log_level(level: &str) -> Result<log::LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "off" => Ok(log::LevelFilter::Off),
        "error" => Ok(log::LevelFilter::Error),
        "warn" => Ok(log::LevelFilter::Warn),
        "info" => Ok(log::LevelFilter::Info),
        "debug" => Ok(log::LevelFilter::Debug),
        "trace" => Ok(log::LevelFilter::Trace),
        other => Err(format!("无效的日志级别: {}", other)),
    }
}

/// 初始化日志输出
///
/// `log` 宏的记录经由 tracing-subscriber 桥接输出；重复初始化时保持已有的订阅者。
pub fn init_logging(level: &str) -> Result<(), String> {
    let filter = parse_log_level(level)?;

    let env_filter = EnvFilter::new(filter.to_string().to_lowercase());
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
    {
        log::debug!("日志订阅者已存在: {}", e);
    }

    log::set_max_level(filter);
    Ok(())
}
