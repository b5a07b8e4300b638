/// 进程快照中的一条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    /// 父进程 PID
    pub ppid: Option<u32>,
    /// 可执行文件名
    pub name: String,
    /// 完整命令行（参数以空格连接）
    pub cmdline: String,
}

impl ProcessEntry {
    pub fn new(pid: u32, name: impl Into<String>, cmdline: impl Into<String>) -> Self {
        Self {
            pid,
            ppid: None,
            name: name.into(),
            cmdline: cmdline.into(),
        }
    }

    pub fn with_parent(mut self, ppid: Option<u32>) -> Self {
        self.ppid = ppid;
        self
    }

    /// 程序名（argv[0] 的 basename）加参数，没有参数时返回 None
    ///
    /// `/usr/local/bin/svcprobe --strict nginx` => `svcprobe --strict nginx`
    pub fn invocation(&self) -> Option<String> {
        let (program, args) = self.cmdline.trim().split_once(' ')?;
        let args = args.trim();
        if args.is_empty() {
            return None;
        }
        let program = program.rsplit('/').next().unwrap_or(program);
        Some(format!("{} {}", program, args))
    }
}
