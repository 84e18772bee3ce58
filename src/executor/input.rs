// Physical input simulation seam.
use crate::errors::DispatchResult;
use crate::executor::keys::KeyCode;
use crate::operation::types::{ScreenPoint, ScreenSize};

/// Mouse, keyboard and clipboard primitives the dispatcher drives.
///
/// One backend instance owns the display for the whole dispatch sequence.
pub trait AutomationBackend {
    fn screen_size(&self) -> DispatchResult<ScreenSize>;

    fn cursor_position(&self) -> DispatchResult<(i32, i32)>;

    fn move_to(&mut self, at: ScreenPoint) -> DispatchResult<()>;

    fn click(&mut self, at: ScreenPoint) -> DispatchResult<()>;

    fn double_click(&mut self, at: ScreenPoint) -> DispatchResult<()>;

    fn right_click(&mut self, at: ScreenPoint) -> DispatchResult<()>;

    /// Scroll the wheel by `clicks`; positive scrolls up, negative down.
    fn scroll(&mut self, clicks: i32) -> DispatchResult<()>;

    fn press(&mut self, key: KeyCode) -> DispatchResult<()>;

    /// Hold `modifier`, press `key`, release `modifier`.
    fn chord(&mut self, modifier: KeyCode, key: KeyCode) -> DispatchResult<()>;

    fn set_clipboard(&mut self, text: &str) -> DispatchResult<()>;
}
