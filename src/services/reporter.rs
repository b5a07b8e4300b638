use clap::ValueEnum;
use std::io::Write;

use crate::models::CheckResult;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// 每行一个服务：`<name>: <running|stopped>`
    #[default]
    Text,
    /// JSON 数组
    Json,
}

/// 把检查结果写到 `out`
pub fn write_report<W: Write>(
    out: &mut W,
    result: &CheckResult,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for check in result.iter() {
                writeln!(out, "{}: {}", check.name, check.status)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
