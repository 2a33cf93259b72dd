//! Fast path - commands answered synchronously without the agent network.
//!
//! Prefixes are matched ASCII case-insensitively on the trimmed command;
//! arguments keep the caller's casing. Failures become a
//! `Command failed: <reason>` string, never an error.

use maestro_agents::{CommandOutput, CommandRunner};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// A command recognized by the fast path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastCommand<'a> {
    Open(&'a str),
    CreateFile(&'a str),
    Find(&'a str),
    Status,
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let n = prefix.len();
    if text.len() >= n && text.is_char_boundary(n) && text[..n].eq_ignore_ascii_case(prefix) {
        let rest = text[n..].trim();
        (!rest.is_empty()).then_some(rest)
    } else {
        None
    }
}

impl<'a> FastCommand<'a> {
    /// Recognize a fast-path command. `None` means orchestrate it.
    pub fn parse(command: &'a str) -> Option<Self> {
        let command = command.trim();

        if command.eq_ignore_ascii_case("status") {
            return Some(Self::Status);
        }
        if let Some(app) = strip_prefix_ignore_case(command, "open ") {
            return Some(Self::Open(app));
        }
        if let Some(file) = strip_prefix_ignore_case(command, "create file ") {
            return Some(Self::CreateFile(file));
        }
        if let Some(term) = strip_prefix_ignore_case(command, "find ") {
            return Some(Self::Find(term));
        }
        None
    }
}

/// Runs fast-path actions.
pub struct FastPathExecutor {
    runner: Arc<dyn CommandRunner>,
    working_dir: PathBuf,
    search_program: String,
    search_limit: usize,
}

impl FastPathExecutor {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        working_dir: impl Into<PathBuf>,
        search_program: impl Into<String>,
        search_limit: usize,
    ) -> Self {
        Self {
            runner,
            working_dir: working_dir.into(),
            search_program: search_program.into(),
            search_limit,
        }
    }

    /// Execute a command. `status` renders the status line for `FastCommand::Status`.
    pub async fn execute(&self, command: FastCommand<'_>, status: impl FnOnce() -> String) -> String {
        debug!(command = ?command, "Fast-path command");
        match command {
            FastCommand::Open(app) => self.open(app).await,
            FastCommand::CreateFile(file) => self.create_file(file).await,
            FastCommand::Find(term) => self.find(term).await,
            FastCommand::Status => status(),
        }
    }

    async fn open(&self, app: &str) -> String {
        let args = vec!["-a".to_string(), app.to_string()];
        let output = self.runner.run("open", &args, None).await;
        if output.success {
            format!("Opening {}", app)
        } else {
            failed(&failure_reason("open", &output))
        }
    }

    async fn create_file(&self, file: &str) -> String {
        let relative = Path::new(file);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            warn!(file = %file, "Refusing to create file outside the working directory");
            return failed("path must stay inside the working directory");
        }

        match tokio::fs::File::create(self.working_dir.join(relative)).await {
            Ok(_) => format!("Created file: {}", file),
            Err(e) => failed(&e.to_string()),
        }
    }

    async fn find(&self, term: &str) -> String {
        let output = self
            .runner
            .run(&self.search_program, &[term.to_string()], None)
            .await;
        if !output.success {
            return failed(&failure_reason(&self.search_program, &output));
        }

        let names: Vec<String> = output
            .lines()
            .take(self.search_limit)
            .map(|line| {
                Path::new(line)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| line.to_string())
            })
            .collect();

        format!("Found: {}", names.join(", ")).trim_end().to_string()
    }
}

fn failed(reason: &str) -> String {
    format!("Command failed: {}", reason)
}

fn failure_reason(program: &str, output: &CommandOutput) -> String {
    match output.exit_code {
        Some(code) if output.stderr.trim().is_empty() => {
            format!("{} exited with code {}", program, code)
        }
        Some(code) => format!("{} exited with code {}: {}", program, code, output.stderr.trim()),
        None => output.stderr.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_agents::ScriptedCommandRunner;

    fn executor(runner: Arc<ScriptedCommandRunner>, dir: &Path) -> FastPathExecutor {
        FastPathExecutor::new(runner, dir, "mdfind", 5)
    }

    #[test]
    fn test_parse() {
        assert_eq!(FastCommand::parse("open Safari"), Some(FastCommand::Open("Safari")));
        assert_eq!(FastCommand::parse("  OPEN  Visual Studio Code "), Some(FastCommand::Open("Visual Studio Code")));
        assert_eq!(
            FastCommand::parse("Create File notes.txt"),
            Some(FastCommand::CreateFile("notes.txt"))
        );
        assert_eq!(FastCommand::parse("find Report"), Some(FastCommand::Find("Report")));
        assert_eq!(FastCommand::parse("status"), Some(FastCommand::Status));
        assert_eq!(FastCommand::parse(" Status "), Some(FastCommand::Status));
    }

    #[test]
    fn test_parse_falls_through() {
        assert_eq!(FastCommand::parse("status of the build"), None);
        assert_eq!(FastCommand::parse("open"), None);
        assert_eq!(FastCommand::parse("opening night"), None);
        assert_eq!(FastCommand::parse("create a parser"), None);
        assert_eq!(FastCommand::parse("finding nemo"), None);
        assert_eq!(FastCommand::parse("implement a Unity VR hand tracking system"), None);
    }

    #[tokio::test]
    async fn test_open() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(ScriptedCommandRunner::success(""));
        let exec = executor(runner.clone(), dir.path());

        let out = exec.execute(FastCommand::Open("Safari"), String::new).await;
        assert_eq!(out, "Opening Safari");
        assert_eq!(runner.calls()[0].program, "open");
        assert_eq!(runner.calls()[0].args, vec!["-a", "Safari"]);
    }

    #[tokio::test]
    async fn test_open_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let exec = executor(Arc::new(ScriptedCommandRunner::unavailable()), dir.path());
        let out = exec.execute(FastCommand::Open("Safari"), String::new).await;
        assert!(out.starts_with("Command failed: "), "{out}");
    }

    #[tokio::test]
    async fn test_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let exec = executor(Arc::new(ScriptedCommandRunner::success("")), dir.path());

        let out = exec.execute(FastCommand::CreateFile("Notes.txt"), String::new).await;
        assert_eq!(out, "Created file: Notes.txt");
        assert!(dir.path().join("Notes.txt").is_file());
    }

    #[tokio::test]
    async fn test_create_file_failures() {
        let dir = tempfile::tempdir().unwrap();
        let exec = executor(Arc::new(ScriptedCommandRunner::success("")), dir.path());

        let out = exec.execute(FastCommand::CreateFile("../escape.txt"), String::new).await;
        assert!(out.starts_with("Command failed: "));

        let out = exec.execute(FastCommand::CreateFile("missing/dir/a.txt"), String::new).await;
        assert!(out.starts_with("Command failed: "));
    }

    #[tokio::test]
    async fn test_find_keeps_five_basenames() {
        let dir = tempfile::tempdir().unwrap();
        let stdout = "/a/one.txt\n\n/b/two.rs\n/c/three\n/d/four\n/e/five\n/f/six\n";
        let runner = Arc::new(ScriptedCommandRunner::success(stdout));
        let exec = executor(runner.clone(), dir.path());

        let out = exec.execute(FastCommand::Find("report"), String::new).await;
        assert_eq!(out, "Found: one.txt, two.rs, three, four, five");
        assert_eq!(runner.calls()[0].program, "mdfind");
        assert_eq!(runner.calls()[0].args, vec!["report"]);
    }

    #[tokio::test]
    async fn test_status_uses_callback() {
        let dir = tempfile::tempdir().unwrap();
        let exec = executor(Arc::new(ScriptedCommandRunner::success("")), dir.path());
        let out = exec
            .execute(FastCommand::Status, || "System Status: 0 active tasks, 0 knowledge entries".into())
            .await;
        assert_eq!(out, "System Status: 0 active tasks, 0 knowledge entries");
    }
}
