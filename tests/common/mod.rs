//! Shared fixture for the hook-handler integration tests: a throwaway git
//! repository plus helpers to drive the compiled `bumper` binary the way
//! the host dispatcher would — one JSON object on stdin, per subcommand.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use assert_cmd::cargo::CommandCargoExt;
use tempfile::TempDir;

pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test"]);
        Self { dir }
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn write_file(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn write_lines(&self, relative: &str, line_count: usize) {
        let contents: String = (0..line_count).map(|i| format!("line {i}\n")).collect();
        self.write_file(relative, &contents);
    }

    pub fn commit_all(&self, message: &str) {
        run_git(self.dir.path(), &["add", "-A"]);
        run_git(self.dir.path(), &["commit", "-q", "-m", message]);
    }

    /// Run `bumper <subcommand>` with `body` piped to stdin, returning
    /// (stdout, stderr, exit_code).
    pub fn run_hook(&self, subcommand: &str, body: &serde_json::Value) -> HookOutput {
        let mut cmd = Command::cargo_bin("bumper").expect("find bumper binary");
        cmd.arg(subcommand)
            .current_dir(self.dir.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().expect("spawn bumper");
        {
            use std::io::Write;
            child
                .stdin
                .take()
                .unwrap()
                .write_all(body.to_string().as_bytes())
                .unwrap();
        }
        let output = child.wait_with_output().expect("wait for bumper");
        HookOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code().unwrap_or(-1),
        }
    }

    pub fn session_request(&self, session_id: &str) -> serde_json::Value {
        serde_json::json!({
            "session_id": session_id,
            "cwd": self.path().to_string_lossy(),
        })
    }

    pub fn tool_request(&self, session_id: &str, tool_name: &str) -> serde_json::Value {
        serde_json::json!({
            "session_id": session_id,
            "cwd": self.path().to_string_lossy(),
            "tool_name": tool_name,
        })
    }

    pub fn shell_request(&self, session_id: &str, command: &str) -> serde_json::Value {
        serde_json::json!({
            "session_id": session_id,
            "cwd": self.path().to_string_lossy(),
            "tool_name": "Bash",
            "tool_input": {"command": command},
        })
    }

    pub fn stop_request(&self, session_id: &str, stop_hook_active: bool) -> serde_json::Value {
        serde_json::json!({
            "session_id": session_id,
            "cwd": self.path().to_string_lossy(),
            "stop_hook_active": stop_hook_active,
        })
    }

    pub fn prompt_request(&self, session_id: &str, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "session_id": session_id,
            "cwd": self.path().to_string_lossy(),
            "prompt": prompt,
        })
    }

    pub fn checkpoints_dir(&self) -> PathBuf {
        self.dir.path().join(".git").join("bumper-checkpoints")
    }
}

pub struct HookOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

fn run_git(dir: &std::path::Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}
