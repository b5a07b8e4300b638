use std::path::PathBuf;

/// 无法获取进程表
///
/// 与服务“已停止”严格区分：看不到进程时不得把所有服务报告为 stopped。
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("process probe unavailable: {0}")]
    ProbeUnavailable(String),
}

/// 解析服务列表配置时的错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
