use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::ServiceName;

/// 未指定任何服务时检查的默认列表
pub const DEFAULT_SERVICES: &[&str] = &["nginx", "apache2", "mysql", "ssh"];

/// 配置文件内容
///
/// ```json
/// { "services": ["nginx", "postgres"] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub services: Vec<ServiceName>,
}

impl ProbeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 服务列表的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceSource {
    Args,
    ConfigFile,
    Env,
    Defaults,
}

impl fmt::Display for ServiceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceSource::Args => "command line",
            ServiceSource::ConfigFile => "config file",
            ServiceSource::Env => "SVCPROBE_SERVICES",
            ServiceSource::Defaults => "built-in defaults",
        };
        f.write_str(s)
    }
}

/// 解析要检查的服务列表
///
/// 优先级：命令行参数 > 配置文件 > `SVCPROBE_SERVICES` > 默认列表。
/// 配置文件中显式给出的空列表会被保留（即什么都不检查）；
/// 环境变量去掉空白项后为空时视为未设置。
pub fn resolve_services(
    args: &[ServiceName],
    config_path: Option<&Path>,
    env_services: Option<&str>,
) -> Result<(Vec<ServiceName>, ServiceSource), ConfigError> {
    if !args.is_empty() {
        return Ok((args.to_vec(), ServiceSource::Args));
    }

    if let Some(path) = config_path {
        let config = ProbeConfig::load(path)?;
        return Ok((config.services, ServiceSource::ConfigFile));
    }

    if let Some(raw) = env_services {
        let services = parse_service_list(raw);
        if !services.is_empty() {
            return Ok((services, ServiceSource::Env));
        }
    }

    Ok((
        DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
        ServiceSource::Defaults,
    ))
}

fn parse_service_list(raw: &str) -> Vec<ServiceName> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_args_take_priority() {
        let file = config_file(r#"{"services": ["postgres"]}"#);
        let args = vec!["nginx".to_string(), "nginx".to_string()];

        let (services, source) =
            resolve_services(&args, Some(file.path()), Some("redis")).unwrap();
        assert_eq!(services, vec!["nginx", "nginx"]);
        assert_eq!(source, ServiceSource::Args);
    }

    #[test]
    fn test_config_file_services() {
        let file = config_file(r#"{"services": ["postgres", "redis-server"]}"#);

        let (services, source) = resolve_services(&[], Some(file.path()), Some("ssh")).unwrap();
        assert_eq!(services, vec!["postgres", "redis-server"]);
        assert_eq!(source, ServiceSource::ConfigFile);
    }

    #[test]
    fn test_config_file_without_services_checks_nothing() {
        let file = config_file("{}");

        let (services, source) = resolve_services(&[], Some(file.path()), None).unwrap();
        assert!(services.is_empty());
        assert_eq!(source, ServiceSource::ConfigFile);
    }

    #[test]
    fn test_invalid_config_file() {
        let file = config_file("services = [\"nginx\"]");

        let err = resolve_services(&[], Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = resolve_services(&[], Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_env_services() {
        let (services, source) = resolve_services(&[], None, Some(" nginx, ,sshd,")).unwrap();
        assert_eq!(services, vec!["nginx", "sshd"]);
        assert_eq!(source, ServiceSource::Env);
    }

    #[test]
    fn test_blank_env_falls_back_to_defaults() {
        let (services, source) = resolve_services(&[], None, Some(" , ")).unwrap();
        assert_eq!(services, DEFAULT_SERVICES);
        assert_eq!(source, ServiceSource::Defaults);
    }

    #[test]
    fn test_defaults() {
        let (services, source) = resolve_services(&[], None, None).unwrap();
        assert_eq!(services, vec!["nginx", "apache2", "mysql", "ssh"]);
        assert_eq!(source, ServiceSource::Defaults);
    }
}
