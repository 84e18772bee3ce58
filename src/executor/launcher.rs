//! Application launch heuristics, one strategy per platform family.
//!
//! Launching is fire-and-forget: the dispatcher never blocks on a launched
//! program, and a missing application is logged, not reported as an error.
//! Spawned children are reaped on a detached thread.
//!
//! Linux strategy order:
//!   1. `which <name>` succeeds → spawn `<name>`
//!   2. `<desktop_dir>/<name>.desktop` exists → `xdg-open <file>`
//!   3. `gtk-launch <name>`, then `xdg-open <name>`, tried in the background;
//!      failures suppressed
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use crate::config::LaunchConfig;
use crate::errors::DispatchResult;
use crate::executor::platform::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// OS shell access used by LAUNCH.
pub trait CommandRunner {
    /// Run to completion with output discarded; `true` on a zero exit status.
    fn status(&mut self, cmd: &ShellCommand) -> DispatchResult<bool>;

    /// Start detached and return immediately.
    fn spawn(&mut self, cmd: &ShellCommand) -> DispatchResult<()>;

    /// Try each command in turn until one exits zero. Failures are logged and
    /// suppressed. Runners that can should do this off the calling thread.
    fn spawn_chain(&mut self, chain: &[ShellCommand]) -> DispatchResult<()> {
        run_chain(chain, |cmd| self.status(cmd));
        Ok(())
    }
}

/// Runs `chain` through `status` until one succeeds; `true` if any did.
pub fn run_chain<F>(chain: &[ShellCommand], mut status: F) -> bool
where
    F: FnMut(&ShellCommand) -> DispatchResult<bool>,
{
    for cmd in chain {
        match status(cmd) {
            Ok(true) => return true,
            Ok(false) => tracing::debug!(command = %cmd, "launch fallback exited non-zero"),
            Err(e) => tracing::debug!(command = %cmd, error = %e, "launch fallback failed"),
        }
    }
    if let Some(last) = chain.last() {
        tracing::warn!(command = %last, "no launch strategy succeeded");
    }
    false
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn status(&mut self, cmd: &ShellCommand) -> DispatchResult<bool> {
        let status = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(status.success())
    }

    fn spawn(&mut self, cmd: &ShellCommand) -> DispatchResult<()> {
        let mut child = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let pid = child.id();
        tracing::debug!(command = %cmd, pid, "spawned");

        let program = cmd.program.clone();
        thread::Builder::new()
            .name(format!("reap-{pid}"))
            .spawn(move || match child.wait() {
                Ok(status) => tracing::debug!(program = %program, pid, %status, "child exited"),
                Err(e) => tracing::debug!(program = %program, pid, error = %e, "wait failed"),
            })?;
        Ok(())
    }

    fn spawn_chain(&mut self, chain: &[ShellCommand]) -> DispatchResult<()> {
        let chain = chain.to_vec();
        thread::Builder::new()
            .name("launch-fallback".into())
            .spawn(move || {
                let mut runner = SystemRunner;
                run_chain(&chain, |cmd| runner.status(cmd));
            })?;
        Ok(())
    }
}

pub fn launch<R: CommandRunner>(
    runner: &mut R,
    platform: Platform,
    app: &str,
    config: &LaunchConfig,
) -> DispatchResult<()> {
    tracing::info!(app = %app, platform = %platform, "launching application");
    match platform {
        Platform::Mac => launch_mac(runner, app, &config.mac_app_dirs),
        Platform::Linux => launch_linux(runner, app, &config.linux_desktop_dir),
        Platform::Windows => runner.spawn(
            &ShellCommand::new("cmd").arg("/C").arg("start").arg("").arg(app),
        ),
    }
}

/// First `.app` bundle whose name contains `app`, searching `dirs` in order.
/// Entries inside a directory are visited in sorted order; unreadable
/// directories are skipped.
pub fn find_mac_bundle(app: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter().find_map(|dir| {
        let mut bundles: Vec<_> = std::fs::read_dir(dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".app"))
            .collect();
        bundles.sort();
        bundles
            .into_iter()
            .find(|name| name.contains(app))
            .map(|name| dir.join(name))
    })
}

fn launch_mac<R: CommandRunner>(runner: &mut R, app: &str, dirs: &[PathBuf]) -> DispatchResult<()> {
    match find_mac_bundle(app, dirs) {
        Some(bundle) => {
            let cmd = ShellCommand::new("open")
                .arg("-a")
                .arg(bundle.to_string_lossy());
            runner.spawn(&cmd)
        }
        None => {
            tracing::warn!(app = %app, ?dirs, "no matching application bundle");
            Ok(())
        }
    }
}

pub fn desktop_entry(app: &str, desktop_dir: &Path) -> Option<PathBuf> {
    let candidate = desktop_dir.join(format!("{}.desktop", app.to_lowercase()));
    candidate.is_file().then_some(candidate)
}

fn launch_linux<R: CommandRunner>(
    runner: &mut R,
    app: &str,
    desktop_dir: &Path,
) -> DispatchResult<()> {
    let binary = app.to_lowercase();

    if runner.status(&ShellCommand::new("which").arg(&binary)).unwrap_or(false) {
        tracing::debug!(binary = %binary, "found on PATH");
        return runner.spawn(&ShellCommand::new(&binary));
    }

    if let Some(entry) = desktop_entry(app, desktop_dir) {
        tracing::debug!(entry = %entry.display(), "opening desktop entry");
        return runner.spawn(&ShellCommand::new("xdg-open").arg(entry.to_string_lossy()));
    }

    let fallbacks = [
        ShellCommand::new("gtk-launch").arg(&binary),
        ShellCommand::new("xdg-open").arg(&binary),
    ];
    if let Err(e) = runner.spawn_chain(&fallbacks) {
        tracing::warn!(app = %app, error = %e, "could not start launch fallbacks");
    }
    Ok(())
}
