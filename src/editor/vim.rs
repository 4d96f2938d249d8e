use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use super::Editor;
use crate::config::EditorConfig;
use crate::error::{HarnessError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

static NEXT_SERVER: AtomicUsize = AtomicUsize::new(0);

fn next_server_name() -> String {
    format!(
        "VIMSPEC-{}-{}",
        std::process::id(),
        NEXT_SERVER.fetch_add(1, Ordering::Relaxed)
    )
}

/// A headless editor process driven through its client/server interface.
///
/// Every call is a separate client invocation that blocks until the
/// server answers, so calls are strictly ordered. The process is killed
/// when the session is dropped.
pub struct VimSession {
    executable: String,
    server: String,
    child: Option<Child>,
}

impl VimSession {
    pub fn start(config: &EditorConfig) -> Result<Self> {
        let server = next_server_name();
        let mut cmd = Command::new(&config.executable);
        cmd.args(&config.args).args([
            "--servername",
            server.as_str(),
            "-u",
            "NONE",
            "-U",
            "NONE",
            "-i",
            "NONE",
            "-N",
            "--noplugin",
        ]);
        let child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                executable: config.executable.clone(),
                source,
            })?;
        tracing::info!(executable = %config.executable, server = %server, "editor started");

        let mut session = Self {
            executable: config.executable.clone(),
            server,
            child: Some(child),
        };
        session.wait_until_ready(Duration::from_millis(config.startup_timeout_ms))?;
        session.command("filetype plugin indent on")?;
        session.command("syntax on")?;
        // Keep a missing final newline missing on write.
        session.command("set nofixendofline")?;
        Ok(session)
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    fn wait_until_ready(&mut self, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            if let Some(child) = self.child.as_mut() {
                if let Ok(Some(status)) = child.try_wait() {
                    self.child = None;
                    return Err(HarnessError::Exited { status });
                }
            }
            if self.is_ready() {
                tracing::debug!(
                    server = %self.server,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "editor server ready"
                );
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(HarnessError::StartupTimeout {
                    server: self.server.clone(),
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn is_ready(&self) -> bool {
        Command::new(&self.executable)
            .arg("--serverlist")
            .stdin(Stdio::null())
            .output()
            .map(|out| {
                String::from_utf8_lossy(&out.stdout)
                    .lines()
                    .any(|l| l.trim().eq_ignore_ascii_case(&self.server))
            })
            .unwrap_or(false)
    }

    fn client(&self, channel: &'static str, flag: &str, payload: &str) -> Result<String> {
        let output = Command::new(&self.executable)
            .args(["--servername", self.server.as_str(), flag, payload])
            .stdin(Stdio::null())
            .output()
            .map_err(|source| HarnessError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || stderr.contains("E449") {
            return Err(HarnessError::Remote {
                channel,
                payload: payload.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let mut answer = String::from_utf8_lossy(&output.stdout).into_owned();
        if answer.ends_with('\n') {
            answer.pop();
            if answer.ends_with('\r') {
                answer.pop();
            }
        }
        Ok(answer)
    }
}

impl Editor for VimSession {
    fn eval(&mut self, expr: &str) -> Result<String> {
        tracing::debug!(expr, "remote-expr");
        self.client("expression", "--remote-expr", expr)
    }

    fn normal(&mut self, keys: &str) -> Result<()> {
        tracing::debug!(keys, "remote-send");
        self.client("keystrokes", "--remote-send", &format!("<C-\\><C-N>{keys}"))
            .map(drop)
    }

    fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        let _ = child.kill();
        let _ = child.wait();
        tracing::info!(server = %self.server, "editor stopped");
    }
}

impl Drop for VimSession {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_names_are_unique() {
        let a = next_server_name();
        let b = next_server_name();
        assert_ne!(a, b);
        assert!(a.starts_with(&format!("VIMSPEC-{}-", std::process::id())));
    }

    #[test]
    fn test_missing_executable_fails_to_spawn() {
        let config = EditorConfig {
            executable: "vimspec-no-such-editor".into(),
            ..EditorConfig::default()
        };
        let err = VimSession::start(&config).err().unwrap();
        assert!(matches!(err, HarnessError::Spawn { .. }));
        assert!(err.to_string().contains("vimspec-no-such-editor"));
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_that_exits_immediately() {
        let config = EditorConfig {
            executable: "true".into(),
            args: Vec::new(),
            startup_timeout_ms: 2000,
            ..EditorConfig::default()
        };
        let err = VimSession::start(&config).err().unwrap();
        assert!(matches!(
            err,
            HarnessError::Exited { .. } | HarnessError::StartupTimeout { .. }
        ));
    }

    /// Stands in for a `+clientserver` Vim: the server registers its name
    /// for `--serverlist`, client calls are logged and answered by payload.
    #[cfg(unix)]
    const SCRIPTED_VIM: &str = r#"#!/bin/sh
dir=$(dirname "$0")
case "$1" in
  --serverlist) cat "$dir/server.name" 2>/dev/null; exit 0;;
esac
case "$3" in
  --remote-expr|--remote-send)
    printf '%s %s %s\n' "$2" "$3" "$4" >> "$dir/calls.log"
    case "$4" in
      *fail*) echo "E15: Invalid expression" >&2; exit 1;;
      e449*) echo "E449: Invalid expression received" >&2; exit 0;;
      crlf*) printf 'answer\r\n'; exit 0;;
      *) printf '%s\n' "$4"; exit 0;;
    esac;;
esac
echo "$2" > "$dir/server.name"
exec sleep 30
"#;

    #[cfg(unix)]
    fn scripted_config(dir: &std::path::Path, script: &str) -> EditorConfig {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("vim");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        EditorConfig {
            executable: path.to_string_lossy().into_owned(),
            args: Vec::new(),
            startup_timeout_ms: 5000,
            ..EditorConfig::default()
        }
    }

    #[cfg(unix)]
    fn call_log(dir: &std::path::Path) -> Vec<String> {
        std::fs::read_to_string(dir.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[cfg(unix)]
    #[test]
    fn test_start_waits_for_serverlist_then_configures() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = VimSession::start(&scripted_config(dir.path(), SCRIPTED_VIM)).unwrap();
        let server = session.server().to_string();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("server.name"))
                .unwrap()
                .trim(),
            server
        );
        assert_eq!(
            call_log(dir.path()),
            vec![
                format!("{server} --remote-expr execute('filetype plugin indent on')"),
                format!("{server} --remote-expr execute('syntax on')"),
                format!("{server} --remote-expr execute('set nofixendofline')"),
            ]
        );
        session.terminate();
    }

    #[cfg(unix)]
    #[test]
    fn test_eval_strips_one_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = VimSession::start(&scripted_config(dir.path(), SCRIPTED_VIM)).unwrap();
        assert_eq!(session.eval("value").unwrap(), "value");
        assert_eq!(session.eval("x\n").unwrap(), "x\n");
        assert_eq!(session.eval("crlf").unwrap(), "answer");
    }

    #[cfg(unix)]
    #[test]
    fn test_normal_forces_normal_mode_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = VimSession::start(&scripted_config(dir.path(), SCRIPTED_VIM)).unwrap();
        session.normal("gg=G").unwrap();
        let server = session.server().to_string();
        assert_eq!(
            call_log(dir.path()).last().unwrap(),
            &format!(r"{server} --remote-send <C-\><C-N>gg=G")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_client_call_is_remote_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = VimSession::start(&scripted_config(dir.path(), SCRIPTED_VIM)).unwrap();

        let err = session.eval("fail").unwrap_err();
        match err {
            HarnessError::Remote {
                channel,
                payload,
                stderr,
            } => {
                assert_eq!(channel, "expression");
                assert_eq!(payload, "fail");
                assert!(stderr.contains("E15"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = session.eval("e449").unwrap_err();
        assert!(matches!(err, HarnessError::Remote { .. }));
        assert!(err.to_string().contains("E449"));

        let err = session.normal("fail").unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Remote {
                channel: "keystrokes",
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_terminate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = VimSession::start(&scripted_config(dir.path(), SCRIPTED_VIM)).unwrap();
        session.terminate();
        session.terminate();
        assert!(session.child.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_server_that_never_registers_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = scripted_config(
            dir.path(),
            "#!/bin/sh\n[ \"$1\" = --serverlist ] && exit 0\nexec sleep 30\n",
        );
        config.startup_timeout_ms = 200;
        let err = VimSession::start(&config).err().unwrap();
        assert!(matches!(
            err,
            HarnessError::StartupTimeout { waited_ms: 200, .. }
        ));
    }
}
