use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::process;

use crate::error::ProbeError;
use crate::models::{CheckResult, ProcessEntry, ServiceCheck, ServiceStatus};
use crate::services::snapshot::ProcessSnapshotProvider;

/// 服务名的匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// 大小写敏感的子串匹配
    #[default]
    Substring,
    /// 正则表达式匹配，无效表达式回退为子串匹配
    Regex,
}

enum Matcher<'a> {
    Substring(&'a str),
    Regex(Regex),
}

impl<'a> Matcher<'a> {
    fn new(pattern: &'a str, mode: MatchMode) -> Self {
        match mode {
            MatchMode::Substring => Matcher::Substring(pattern),
            MatchMode::Regex => match Regex::new(pattern) {
                Ok(r) => Matcher::Regex(r),
                Err(e) => {
                    log::warn!(
                        "Invalid regex '{}', falling back to substring match: {}",
                        pattern,
                        e
                    );
                    Matcher::Substring(pattern)
                }
            },
        }
    }

    fn is_match(&self, entry: &ProcessEntry) -> bool {
        match self {
            // 空串会匹配所有进程
            Matcher::Substring("") => false,
            Matcher::Substring(s) => entry.cmdline.contains(s) || entry.name.contains(s),
            Matcher::Regex(r) => {
                !r.as_str().is_empty() && (r.is_match(&entry.cmdline) || r.is_match(&entry.name))
            }
        }
    }
}

/// 不参与匹配的 PID：检查程序自身，以及命令行中带着本次调用的祖先进程
///
/// `timeout 20 svcprobe nginx`、`sudo svcprobe nginx`、`sh -c "svcprobe nginx; true"`
/// 这类包装进程的命令行里含有服务名，不排除会被误判为服务正在运行。
/// 不含本次调用的祖先照常匹配，例如通过 ssh 登录执行时的 sshd。
fn excluded_pids(snapshot: &[ProcessEntry], self_pid: Option<u32>) -> HashSet<u32> {
    let mut excluded = HashSet::new();
    let Some(self_pid) = self_pid else {
        return excluded;
    };
    excluded.insert(self_pid);

    let by_pid: HashMap<u32, &ProcessEntry> = snapshot.iter().map(|e| (e.pid, e)).collect();
    let Some(invocation) = by_pid.get(&self_pid).and_then(|me| me.invocation()) else {
        return excluded;
    };

    let mut visited = HashSet::from([self_pid]);
    let mut next = by_pid.get(&self_pid).and_then(|me| me.ppid);

    while let Some(pid) = next {
        // ppid 成环时停止
        if !visited.insert(pid) {
            break;
        }
        let Some(parent) = by_pid.get(&pid) else {
            break;
        };
        if parent.cmdline.contains(&invocation) {
            log::debug!("Excluding wrapper process {} ({})", pid, parent.cmdline);
            excluded.insert(pid);
        }
        next = parent.ppid;
    }

    excluded
}

/// 在给定快照中检查单个服务，`excluded` 中的进程不参与匹配
fn check_service(
    snapshot: &[ProcessEntry],
    name: &str,
    mode: MatchMode,
    excluded: &HashSet<u32>,
) -> ServiceCheck {
    let matcher = Matcher::new(name, mode);

    let mut pids: Vec<u32> = snapshot
        .iter()
        .filter(|entry| !excluded.contains(&entry.pid))
        .filter(|entry| matcher.is_match(entry))
        .map(|entry| entry.pid)
        .collect();
    pids.sort_unstable();

    let status = if pids.is_empty() {
        ServiceStatus::Stopped
    } else {
        ServiceStatus::Running
    };

    log::debug!("Service '{}' is {} (matching PIDs: {:?})", name, status, pids);

    ServiceCheck {
        name: name.to_string(),
        status,
        pids,
    }
}

/// 服务存活检查器
///
/// 每次 `check` 只取一次进程快照，所有服务名共用同一份快照，
/// 保证结果反映的是同一时刻的进程表。
pub struct ServiceChecker<P> {
    provider: P,
    mode: MatchMode,
    self_pid: Option<u32>,
}

impl<P: ProcessSnapshotProvider> ServiceChecker<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            mode: MatchMode::default(),
            self_pid: Some(process::id()),
        }
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// 替换需要排除的自身 PID（测试中使用假快照时有用）
    #[cfg(test)]
    pub fn exclude_pid(mut self, pid: Option<u32>) -> Self {
        self.self_pid = pid;
        self
    }

    pub fn check<S: AsRef<str>>(&self, names: &[S]) -> Result<CheckResult, ProbeError> {
        // 列表为空时同样取快照，探测失败不能被掩盖
        let snapshot = self.provider.snapshot()?;
        let excluded = excluded_pids(&snapshot, self.self_pid);

        let checks = names
            .iter()
            .map(|name| check_service(&snapshot, name.as_ref(), self.mode, &excluded))
            .collect();

        Ok(CheckResult { checks })
    }
}
