use std::process;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, ThreadKind, UpdateKind};

use crate::error::ProbeError;
use crate::models::ProcessEntry;

/// 进程快照来源
///
/// 检查逻辑只依赖“某一时刻的进程列表”，不关心具体的操作系统 API。
pub trait ProcessSnapshotProvider {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, ProbeError>;
}

/// 基于 sysinfo 的进程快照
#[derive(Debug, Default)]
pub struct SysinfoSnapshotProvider;

impl SysinfoSnapshotProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessSnapshotProvider for SysinfoSnapshotProvider {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, ProbeError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProbeError::ProbeUnavailable(format!(
                "process enumeration is not supported on {}",
                std::env::consts::OS
            )));
        }

        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
        );

        let mut entries = Vec::with_capacity(sys.processes().len());

        for (pid, process) in sys.processes() {
            // Linux 下 sysinfo 会把线程当作进程列出
            if matches!(process.thread_kind(), Some(ThreadKind::Userland)) {
                continue;
            }

            let cmdline = process
                .cmd()
                .iter()
                .map(|s| s.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ");

            entries.push(
                ProcessEntry::new(pid.as_u32(), process.name().to_string_lossy(), cmdline)
                    .with_parent(process.parent().map(|p| p.as_u32())),
            );
        }

        validate_snapshot(&entries, process::id(), cfg!(target_os = "linux"))?;

        entries.sort_by_key(|e| e.pid);
        log::debug!("Process snapshot taken: {} entries", entries.len());

        Ok(entries)
    }
}

/// 判断快照是否可信
///
/// 进程表不可读时 sysinfo 不报错，只会返回残缺的列表
/// （例如 Linux 下 `hidepid=2` 挂载 /proc，非 root 只能看到自己的进程）。
/// 以下情况视为探测不可用：
/// - 列表为空
/// - 除自身外看不到任何进程（自身就是 PID 1 时除外，例如容器里唯一的进程）
/// - `require_init` 为 true 时看不到 PID 1
pub fn validate_snapshot(
    entries: &[ProcessEntry],
    self_pid: u32,
    require_init: bool,
) -> Result<(), ProbeError> {
    if entries.is_empty() {
        return Err(ProbeError::ProbeUnavailable(
            "process table is empty or unreadable".to_string(),
        ));
    }

    if self_pid != 1 && entries.iter().all(|e| e.pid == self_pid) {
        return Err(ProbeError::ProbeUnavailable(
            "no processes other than the probe itself are visible".to_string(),
        ));
    }

    if require_init && !entries.iter().any(|e| e.pid == 1) {
        return Err(ProbeError::ProbeUnavailable(
            "PID 1 is not visible, the process table is restricted (hidepid?)".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELF_PID: u32 = 4242;

    fn unavailable(result: Result<(), ProbeError>) -> bool {
        matches!(result, Err(ProbeError::ProbeUnavailable(_)))
    }

    #[test]
    fn test_validate_empty_snapshot() {
        assert!(unavailable(validate_snapshot(&[], SELF_PID, false)));
    }

    #[test]
    fn test_validate_only_self_visible() {
        let entries = vec![ProcessEntry::new(SELF_PID, "svcprobe", "svcprobe nginx")];
        assert!(unavailable(validate_snapshot(&entries, SELF_PID, false)));
    }

    #[test]
    fn test_validate_restricted_proc_without_init() {
        // hidepid=2：只看到同一用户的进程
        let entries = vec![
            ProcessEntry::new(2100, "bash", "-bash"),
            ProcessEntry::new(SELF_PID, "svcprobe", "svcprobe nginx").with_parent(Some(2100)),
        ];

        assert!(unavailable(validate_snapshot(&entries, SELF_PID, true)));
        assert!(validate_snapshot(&entries, SELF_PID, false).is_ok());
    }

    #[test]
    fn test_validate_full_snapshot() {
        let entries = vec![
            ProcessEntry::new(1, "systemd", "/sbin/init"),
            ProcessEntry::new(311, "nginx", "nginx: worker process").with_parent(Some(1)),
            ProcessEntry::new(SELF_PID, "svcprobe", "svcprobe nginx"),
        ];
        assert!(validate_snapshot(&entries, SELF_PID, true).is_ok());
    }

    #[test]
    fn test_validate_probe_is_container_init() {
        let entries = vec![ProcessEntry::new(1, "svcprobe", "svcprobe nginx")];
        assert!(validate_snapshot(&entries, 1, true).is_ok());
    }

    #[test]
    fn test_snapshot_contains_current_process() {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return;
        }

        // 受限的 /proc 下只能得到 ProbeUnavailable
        let Ok(entries) = SysinfoSnapshotProvider::new().snapshot() else {
            return;
        };
        let current_pid = process::id();
        assert!(entries.iter().any(|e| e.pid == current_pid));
    }
}
