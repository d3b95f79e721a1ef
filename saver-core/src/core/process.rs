use std::ffi::OsStr;
use std::process::Stdio;

/// Command for an external helper: UTF-8 Python I/O, no console window on
/// Windows, and the child is killed if the session future is dropped.
pub fn command<S: AsRef<OsStr>>(program: S) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(program);
    #[cfg(target_os = "windows")]
    cmd.creation_flags(0x08000000);
    cmd.env("PYTHONIOENCODING", "utf-8");
    cmd.env("PYTHONUTF8", "1");
    cmd.stdin(Stdio::null());
    cmd.kill_on_drop(true);
    cmd
}
