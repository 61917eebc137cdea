//! `git`: branch, working tree state and recent commits.

use super::{ContentBlock, Module, RenderContext};
use anyhow::Result;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const LOG_LIMIT: usize = 5;

/// Upper bound for a single `git` call.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct GitModule {
    /// Repository to inspect; `None` means the current working directory.
    dir: Option<PathBuf>,
}

impl GitModule {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Run `git <args>` and return trimmed stdout, or `None` if git is missing,
    /// the command failed, or it ran past [`GIT_TIMEOUT`].
    fn git(&self, args: &[&str]) -> Option<String> {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.dir {
            cmd.arg("-C").arg(dir);
        }
        cmd.args(args);
        run_with_timeout(cmd, GIT_TIMEOUT)
    }
}

/// Run `cmd`, killing it once `timeout` has passed. Stdout is drained on a
/// separate thread so a chatty command cannot block on a full pipe.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Option<String> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;
    let mut stdout = child.stdout.take()?;
    let reader = thread::spawn(move || {
        let mut out = Vec::new();
        stdout.read_to_end(&mut out).map(|_| out)
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
            Ok(None) => {
                tracing::warn!(command = ?cmd, ?timeout, "command timed out");
                let _ = child.kill();
                let _ = child.wait();
                break None;
            }
            Err(_) => break None,
        }
    };

    let output = reader.join().ok()?.ok()?;
    if !status?.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output).trim().to_string())
}

impl Module for GitModule {
    fn name(&self) -> &str {
        "git"
    }

    fn render(&self, ctx: &RenderContext) -> Result<ContentBlock> {
        let dim = Style::default().fg(Color::DarkGray);
        let branch = self
            .git(&["rev-parse", "--abbrev-ref", "HEAD"])
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "—".to_string());
        let changed = self
            .git(&["status", "--short"])
            .map(|status| status.lines().filter(|l| !l.trim().is_empty()).count())
            .unwrap_or(0);
        let log = self
            .git(&["log", "--oneline", "-5", "--format=%h %s"])
            .unwrap_or_default();

        let mut lines = vec![Line::from(vec![
            Span::styled("  branch  ", dim),
            Span::styled(
                branch,
                Style::default()
                    .fg(ctx.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ])];

        if changed > 0 {
            lines.push(Line::styled(
                format!("  {changed} changed file(s)"),
                Style::default().fg(Color::Yellow),
            ));
        } else {
            lines.push(Line::styled(
                "  working tree clean",
                Style::default().fg(Color::Green),
            ));
        }

        let commits: Vec<Line<'static>> = log
            .lines()
            .take(LOG_LIMIT)
            .filter_map(|line| line.split_once(' '))
            .map(|(hash, subject)| {
                Line::from(vec![
                    Span::styled(format!("  {hash} "), dim),
                    Span::raw(subject.to_string()),
                ])
            })
            .collect();
        if !commits.is_empty() {
            lines.push(Line::default());
            lines.extend(commits);
        }

        Ok(ContentBlock::new("GIT", Text::from(lines)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_outside_repository_renders_placeholder_branch() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let module = GitModule::new(Some(temp_dir.path().to_path_buf()));
        let ctx = RenderContext::new(Arc::new(Profile::default()), 0);

        let block = module.render(&ctx).expect("render");
        assert_eq!(block.title, "GIT");
        let body = block.plain_body();
        assert!(body.contains("branch  —"));
        assert!(body.contains("working tree clean"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stuck_command_is_killed_at_timeout() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let started = Instant::now();
        assert_eq!(run_with_timeout(cmd, Duration::from_millis(100)), None);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn test_finished_command_returns_trimmed_stdout() {
        let mut cmd = Command::new("echo");
        cmd.arg("  main  ");
        assert_eq!(
            run_with_timeout(cmd, Duration::from_secs(2)),
            Some("main".to_string())
        );
    }
}
