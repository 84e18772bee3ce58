//! Recording doubles for the automation backend and the shell.
use std::collections::HashSet;

use crate::errors::{DispatchError, DispatchResult};
use crate::executor::input::AutomationBackend;
use crate::executor::keys::KeyCode;
use crate::executor::launcher::{run_chain, CommandRunner, ShellCommand};
use crate::operation::types::{ScreenPoint, ScreenSize};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    MoveTo(ScreenPoint),
    Click(ScreenPoint),
    DoubleClick(ScreenPoint),
    RightClick(ScreenPoint),
    Scroll(i32),
    Press(KeyCode),
    Chord(KeyCode, KeyCode),
    Clipboard(String),
}

#[derive(Debug)]
pub struct MockBackend {
    pub screen: ScreenSize,
    pub cursor: (i32, i32),
    pub calls: Vec<Call>,
    pub fail_clicks: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            screen: ScreenSize::new(1920, 1080),
            cursor: (400, 300),
            calls: Vec::new(),
            fail_clicks: false,
        }
    }
}

impl AutomationBackend for MockBackend {
    fn screen_size(&self) -> DispatchResult<ScreenSize> {
        Ok(self.screen)
    }

    fn cursor_position(&self) -> DispatchResult<(i32, i32)> {
        Ok(self.cursor)
    }

    fn move_to(&mut self, at: ScreenPoint) -> DispatchResult<()> {
        self.calls.push(Call::MoveTo(at));
        Ok(())
    }

    fn click(&mut self, at: ScreenPoint) -> DispatchResult<()> {
        if self.fail_clicks {
            return Err(DispatchError::Backend("click rejected".into()));
        }
        self.calls.push(Call::Click(at));
        Ok(())
    }

    fn double_click(&mut self, at: ScreenPoint) -> DispatchResult<()> {
        self.calls.push(Call::DoubleClick(at));
        Ok(())
    }

    fn right_click(&mut self, at: ScreenPoint) -> DispatchResult<()> {
        self.calls.push(Call::RightClick(at));
        Ok(())
    }

    fn scroll(&mut self, clicks: i32) -> DispatchResult<()> {
        self.calls.push(Call::Scroll(clicks));
        Ok(())
    }

    fn press(&mut self, key: KeyCode) -> DispatchResult<()> {
        self.calls.push(Call::Press(key));
        Ok(())
    }

    fn chord(&mut self, modifier: KeyCode, key: KeyCode) -> DispatchResult<()> {
        self.calls.push(Call::Chord(modifier, key));
        Ok(())
    }

    fn set_clipboard(&mut self, text: &str) -> DispatchResult<()> {
        self.calls.push(Call::Clipboard(text.to_string()));
        Ok(())
    }
}

/// Programs in `succeed` exit zero, programs in `fail` cannot be started,
/// everything else exits non-zero.
#[derive(Debug, Default)]
pub struct MockRunner {
    pub statuses: Vec<ShellCommand>,
    pub spawned: Vec<ShellCommand>,
    pub chains: Vec<Vec<ShellCommand>>,
    succeed: HashSet<String>,
    fail: HashSet<String>,
}

impl MockRunner {
    pub fn succeeding(mut self, program: &str) -> Self {
        self.succeed.insert(program.to_string());
        self
    }

    pub fn failing(mut self, program: &str) -> Self {
        self.fail.insert(program.to_string());
        self
    }
}

impl CommandRunner for MockRunner {
    fn status(&mut self, cmd: &ShellCommand) -> DispatchResult<bool> {
        self.statuses.push(cmd.clone());
        if self.fail.contains(&cmd.program) {
            return Err(DispatchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", cmd.program),
            )));
        }
        Ok(self.succeed.contains(&cmd.program))
    }

    fn spawn(&mut self, cmd: &ShellCommand) -> DispatchResult<()> {
        if self.fail.contains(&cmd.program) {
            return Err(DispatchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", cmd.program),
            )));
        }
        self.spawned.push(cmd.clone());
        Ok(())
    }

    /// Records the chain, then runs it inline so `statuses` shows each attempt.
    fn spawn_chain(&mut self, chain: &[ShellCommand]) -> DispatchResult<()> {
        self.chains.push(chain.to_vec());
        run_chain(chain, |cmd| self.status(cmd));
        Ok(())
    }
}
