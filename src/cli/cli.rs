use clap::Parser;
use std::path::PathBuf;

use crate::services::{MatchMode, OutputFormat};

/// svcprobe - 检查一组服务当前是否有进程在运行
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// 要检查的服务名（不指定时依次使用配置文件、SVCPROBE_SERVICES、默认列表）
    pub services: Vec<String>,

    /// JSON 配置文件，格式 {"services": [...]}
    #[arg(short, long, env = "SVCPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// 按正则表达式匹配进程命令行
    #[arg(long)]
    pub regex: bool,

    /// 输出格式
    #[arg(short, long, env = "SVCPROBE_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// 有服务未运行时以退出码 1 结束
    #[arg(long)]
    pub strict: bool,
}

impl CommandArgs {
    pub fn match_mode(&self) -> MatchMode {
        if self.regex {
            MatchMode::Regex
        } else {
            MatchMode::Substring
        }
    }
}
