use serde::Serialize;
use std::fmt;

/// 调用方提供的服务名，不做唯一性约束
pub type ServiceName = String;

/// 服务运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Running,
    Stopped,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Running => "running",
            ServiceStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个服务的检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCheck {
    pub name: ServiceName,
    pub status: ServiceStatus,
    /// 匹配到的 PID（升序）
    pub pids: Vec<u32>,
}

impl ServiceCheck {
    pub fn is_running(&self) -> bool {
        self.status == ServiceStatus::Running
    }
}

/// 一次检查的全部结果，顺序与输入一致
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckResult {
    pub checks: Vec<ServiceCheck>,
}

impl CheckResult {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceCheck> {
        self.checks.iter()
    }

    pub fn all_running(&self) -> bool {
        self.checks.iter().all(ServiceCheck::is_running)
    }

    /// (名称, 状态) 对，便于断言
    #[cfg(test)]
    pub fn pairs(&self) -> Vec<(&str, ServiceStatus)> {
        self.checks
            .iter()
            .map(|c| (c.name.as_str(), c.status))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ServiceStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
        assert_eq!(ServiceStatus::Stopped.to_string(), "stopped");
    }

    #[test]
    fn test_all_running_on_empty_result() {
        assert!(CheckResult::default().all_running());
    }
}
