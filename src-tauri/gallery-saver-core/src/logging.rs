use tracing_subscriber::EnvFilter;

/// 安装全局 tracing subscriber（`RUST_LOG` 优先，否则使用 `default_filter`）。
///
/// 重复调用时保留第一次安装的 subscriber。
pub fn init(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
}
