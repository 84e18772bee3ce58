// Grounded-operation dispatcher.
use std::thread;

use crate::config::{ExecutorConfig, LaunchConfig};
use crate::errors::{DispatchError, DispatchResult};
use crate::executor::input::AutomationBackend;
use crate::executor::keys::KeyCode;
use crate::executor::launcher::{self, CommandRunner};
use crate::executor::normalizer;
use crate::executor::platform::Platform;
use crate::executor::safety::in_failsafe_corner;
use crate::executor::text_input;
use crate::operation::types::{GroundedOperation, MetaOperation, NormalizedOperation};

pub struct Dispatcher<B, R> {
    backend: B,
    runner: R,
    config: ExecutorConfig,
    launch: LaunchConfig,
}

impl<B: AutomationBackend, R: CommandRunner> Dispatcher<B, R> {
    pub fn new(backend: B, runner: R, config: ExecutorConfig, launch: LaunchConfig) -> Self {
        Self {
            backend,
            runner,
            config,
            launch,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Platform used for the paste chord and LAUNCH. Resolved per call so an
    /// unrecognised platform only fails the operations that need it.
    pub fn platform(&self) -> DispatchResult<Platform> {
        match self.config.platform.as_deref() {
            Some(descriptor) => Platform::from_descriptor(descriptor),
            None => Platform::detect(),
        }
    }

    pub fn normalize(&self, op: &GroundedOperation) -> DispatchResult<NormalizedOperation> {
        normalizer::normalize(op, || self.backend.screen_size())
    }

    /// Normalizes and executes `op`, then waits the configured settle delay.
    /// Returns the operation that ran.
    pub fn dispatch(&mut self, op: &GroundedOperation) -> DispatchResult<MetaOperation> {
        let normalized = self.normalize(op)?;
        self.dispatch_normalized(&normalized)
    }

    pub fn dispatch_normalized(
        &mut self,
        op: &NormalizedOperation,
    ) -> DispatchResult<MetaOperation> {
        let meta = op.meta();
        self.execute(op)?;
        tracing::info!(operation = %meta, "operation dispatched");

        let settle = self.config.settle_delay();
        if !settle.is_zero() {
            thread::sleep(settle);
        }
        Ok(meta)
    }

    /// Runs the handler for `op` without the trailing settle delay.
    pub fn execute(&mut self, op: &NormalizedOperation) -> DispatchResult<()> {
        if !matches!(op, NormalizedOperation::End) {
            self.check_failsafe()?;
        }

        match op {
            NormalizedOperation::Click { at } => self.backend.click(*at),
            NormalizedOperation::DoubleClick { at } => self.backend.double_click(*at),
            NormalizedOperation::RightClick { at } => self.backend.right_click(*at),
            NormalizedOperation::Hover { at } => self.backend.move_to(*at),
            NormalizedOperation::ScrollDown { at } => {
                self.backend.move_to(*at)?;
                self.backend.scroll(-self.config.scroll_amount)
            }
            NormalizedOperation::ScrollUp { at } => {
                self.backend.move_to(*at)?;
                self.backend.scroll(self.config.scroll_amount)
            }
            NormalizedOperation::Type { text, .. } => {
                let platform = self.platform()?;
                let settle = self.config.clipboard_settle();
                text_input::paste(&mut self.backend, platform, text, settle)?;
                self.backend.press(KeyCode::Return)
            }
            NormalizedOperation::KeyPress { key } => {
                let key: KeyCode = key.parse()?;
                self.backend.press(key)
            }
            NormalizedOperation::Launch { app } => {
                let platform = self.platform()?;
                launcher::launch(&mut self.runner, platform, app, &self.launch)
            }
            NormalizedOperation::End => {
                tracing::info!("workflow completed");
                Ok(())
            }
        }
    }

    fn check_failsafe(&self) -> DispatchResult<()> {
        if !self.config.fail_safe {
            return Ok(());
        }
        let (x, y) = self.backend.cursor_position()?;
        let screen = self.backend.screen_size()?;
        if in_failsafe_corner((x, y), screen) {
            tracing::warn!(x, y, "cursor in fail-safe corner; aborting");
            return Err(DispatchError::FailSafeTriggered { x, y });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::launcher::ShellCommand;
    use crate::executor::mock::{Call, MockBackend, MockRunner};
    use crate::operation::types::ScreenPoint;
    use std::time::{Duration, Instant};

    fn dispatcher_on(platform: &str) -> Dispatcher<MockBackend, MockRunner> {
        let config = ExecutorConfig {
            platform: Some(platform.to_string()),
            ..ExecutorConfig::immediate()
        };
        Dispatcher::new(
            MockBackend::default(),
            MockRunner::default(),
            config,
            LaunchConfig::default(),
        )
    }

    fn center_box() -> [f64; 4] {
        [0.0, 0.0, 1000.0, 1000.0]
    }

    const CENTER: ScreenPoint = ScreenPoint { x: 480.0, y: 540.0 };

    #[test]
    fn click_variants_hit_resolved_point() {
        let cases = [
            ("CLICK", Call::Click(CENTER)),
            ("DOUBLE_CLICK", Call::DoubleClick(CENTER)),
            ("RIGHT_CLICK", Call::RightClick(CENTER)),
            ("HOVER", Call::MoveTo(CENTER)),
        ];
        for (name, expected) in cases {
            let mut d = dispatcher_on("linux");
            let op = GroundedOperation::new(name).with_box(center_box());
            assert_eq!(d.dispatch(&op).unwrap().name(), name);
            assert_eq!(d.backend().calls, vec![expected]);
        }
    }

    #[test]
    fn scroll_moves_then_scrolls_fixed_amount() {
        let mut d = dispatcher_on("linux");
        d.dispatch(&GroundedOperation::new("SCROLL_DOWN").with_box(center_box())).unwrap();
        d.dispatch(&GroundedOperation::new("SCROLL_UP").with_box(center_box())).unwrap();
        assert_eq!(
            d.backend().calls,
            vec![
                Call::MoveTo(CENTER),
                Call::Scroll(-10),
                Call::MoveTo(CENTER),
                Call::Scroll(10),
            ]
        );
    }

    #[test]
    fn type_pastes_stripped_text_then_returns() {
        let mut d = dispatcher_on("linux");
        let op = GroundedOperation::new("TYPE")
            .with_box([100.0, 100.0, 300.0, 200.0])
            .with_text("\"hello\"");
        assert_eq!(d.dispatch(&op).unwrap(), MetaOperation::Type);
        assert_eq!(
            d.backend().calls,
            vec![
                Call::Clipboard("hello".into()),
                Call::Chord(KeyCode::Control, KeyCode::Char('v')),
                Call::Press(KeyCode::Return),
            ]
        );
    }

    #[test]
    fn type_on_mac_uses_command() {
        let mut d = dispatcher_on("Darwin-23.1.0");
        let op = GroundedOperation::new("TYPE").with_box(center_box()).with_text("'hi!'");
        d.dispatch(&op).unwrap();
        assert_eq!(d.backend().calls[1], Call::Chord(KeyCode::Meta, KeyCode::Char('v')));
    }

    #[test]
    fn type_on_unknown_platform_fails_before_touching_clipboard() {
        let mut d = dispatcher_on("plan9");
        let op = GroundedOperation::new("TYPE").with_box(center_box()).with_text("'x y'");
        let err = d.dispatch(&op).unwrap_err();
        assert!(matches!(err, DispatchError::UnsupportedPlatform(_)));
        assert!(d.backend().calls.is_empty());
    }

    #[test]
    fn key_press_parses_key_name() {
        let mut d = dispatcher_on("linux");
        d.dispatch(&GroundedOperation::new("KEY_PRESS").with_key("'Return'")).unwrap();
        assert_eq!(d.backend().calls, vec![Call::Press(KeyCode::Return)]);

        let err = d
            .dispatch(&GroundedOperation::new("KEY_PRESS").with_key("'NoSuchKey'"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownKey(_)));
    }

    #[test]
    fn end_makes_no_backend_call() {
        let mut d = dispatcher_on("linux");
        d.backend.cursor = (0, 0);
        assert_eq!(d.dispatch(&GroundedOperation::new("END")).unwrap(), MetaOperation::End);
        assert!(d.backend().calls.is_empty());
        assert!(d.runner().spawned.is_empty());
    }

    #[test]
    fn settle_delay_follows_every_dispatch() {
        let mut d = dispatcher_on("linux");
        d.config.settle_delay_ms = 150;

        let started = Instant::now();
        d.dispatch(&GroundedOperation::new("END")).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(150));

        let started = Instant::now();
        d.dispatch(&GroundedOperation::new("HOVER").with_box(center_box())).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn failed_dispatch_skips_settle_delay() {
        let mut d = dispatcher_on("linux");
        d.config.settle_delay_ms = 2_000;
        let started = Instant::now();
        assert!(d.dispatch(&GroundedOperation::new("CLICK")).is_err());
        assert!(started.elapsed() < Duration::from_millis(1_000));
    }

    #[test]
    fn type_waits_for_clipboard_before_pasting() {
        let mut d = dispatcher_on("linux");
        d.config.clipboard_settle_ms = 120;
        let op = GroundedOperation::new("TYPE").with_box(center_box()).with_text("'hi'");

        let started = Instant::now();
        d.dispatch(&op).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(120));
        assert_eq!(d.backend().calls[0], Call::Clipboard("hi".into()));
    }

    #[test]
    fn launch_with_no_match_falls_back_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = dispatcher_on("linux");
        d.launch.linux_desktop_dir = dir.path().to_path_buf();

        let op = GroundedOperation::new("LAUNCH").with_app("\"Notes\"");
        assert_eq!(d.dispatch(&op).unwrap(), MetaOperation::Launch);
        assert!(d.backend().calls.is_empty());
        assert_eq!(
            d.runner().statuses.last(),
            Some(&ShellCommand::new("xdg-open").arg("notes"))
        );
        assert_eq!(d.runner().chains.len(), 1);
    }

    #[test]
    fn launch_on_mac_without_bundle_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = dispatcher_on("macos");
        d.launch.mac_app_dirs = vec![dir.path().to_path_buf()];
        let op = GroundedOperation::new("LAUNCH").with_app("'Notes'");
        assert_eq!(d.dispatch(&op).unwrap(), MetaOperation::Launch);
        assert!(d.runner().spawned.is_empty());
    }

    #[test]
    fn failsafe_corner_aborts() {
        let mut d = dispatcher_on("linux");
        d.backend.cursor = (1919, 1079);
        let err = d
            .dispatch(&GroundedOperation::new("CLICK").with_box(center_box()))
            .unwrap_err();
        assert!(matches!(err, DispatchError::FailSafeTriggered { x: 1919, y: 1079 }));
        assert!(d.backend().calls.is_empty());
    }

    #[test]
    fn failsafe_can_be_disabled() {
        let mut d = dispatcher_on("linux");
        d.config.fail_safe = false;
        d.backend.cursor = (0, 0);
        d.dispatch(&GroundedOperation::new("CLICK").with_box(center_box())).unwrap();
        assert_eq!(d.backend().calls, vec![Call::Click(CENTER)]);
    }

    #[test]
    fn normalization_errors_abort() {
        let mut d = dispatcher_on("linux");
        let err = d.dispatch(&GroundedOperation::new("CLICK")).unwrap_err();
        assert!(matches!(err, DispatchError::MissingField { .. }));
        let err = d.dispatch(&GroundedOperation::new("DRAG")).unwrap_err();
        assert!(matches!(err, DispatchError::UnsupportedOperation(_)));
        assert!(d.backend().calls.is_empty());
    }

    #[test]
    fn backend_errors_propagate() {
        let mut d = dispatcher_on("linux");
        d.backend.fail_clicks = true;
        let err = d
            .dispatch(&GroundedOperation::new("CLICK").with_box(center_box()))
            .unwrap_err();
        assert!(matches!(err, DispatchError::Backend(_)));
    }
}
