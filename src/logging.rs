//! tracing日志初始化

use tracing_subscriber::EnvFilter;

/// 初始化tracing订阅器
///
/// 优先读取 `IMARA_LOG` 环境变量作为过滤规则，未设置时按 `verbose` 选择 `debug` 或 `info`。
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env("IMARA_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试或嵌入场景下可能已注册过全局订阅器
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .try_init();
}
