use std::thread;
use std::time::Duration;

use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use crate::errors::{DispatchError, DispatchResult};
use crate::executor::input::AutomationBackend;
use crate::executor::keys::KeyCode;
use crate::operation::types::{ScreenPoint, ScreenSize};

/// Native backend: `enigo` for mouse/keyboard, `arboard` for the clipboard.
pub struct EnigoBackend {
    enigo: Enigo,
    clipboard: Option<arboard::Clipboard>,
    /// Pause after every primitive so the UI can keep up.
    pause: Duration,
}

impl EnigoBackend {
    pub fn new(pause: Duration) -> DispatchResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| DispatchError::Backend(format!("failed to initialise enigo: {e:?}")))?;
        tracing::debug!(pause_ms = pause.as_millis() as u64, "enigo backend ready");
        Ok(Self {
            enigo,
            clipboard: None,
            pause,
        })
    }

    fn settle(&self) {
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
    }

    fn move_abs(&mut self, at: ScreenPoint) -> DispatchResult<()> {
        let (x, y) = at.to_pixels();
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| DispatchError::Backend(format!("mouse move failed: {e:?}")))
    }

    fn button(&mut self, button: Button, direction: Direction) -> DispatchResult<()> {
        self.enigo
            .button(button, direction)
            .map_err(|e| DispatchError::Backend(format!("{button:?} {direction:?} failed: {e:?}")))
    }

    fn key(&mut self, key: KeyCode, direction: Direction) -> DispatchResult<()> {
        let mapped = to_enigo_key(key)?;
        self.enigo.key(mapped, direction).map_err(|e| {
            DispatchError::Backend(format!("key {key:?} {direction:?} failed: {e:?}"))
        })
    }
}

impl AutomationBackend for EnigoBackend {
    fn screen_size(&self) -> DispatchResult<ScreenSize> {
        let (w, h) = self
            .enigo
            .main_display()
            .map_err(|e| DispatchError::Backend(format!("display size unavailable: {e:?}")))?;
        Ok(ScreenSize::new(w.max(0) as u32, h.max(0) as u32))
    }

    fn cursor_position(&self) -> DispatchResult<(i32, i32)> {
        self.enigo
            .location()
            .map_err(|e| DispatchError::Backend(format!("cursor location unavailable: {e:?}")))
    }

    fn move_to(&mut self, at: ScreenPoint) -> DispatchResult<()> {
        self.move_abs(at)?;
        self.settle();
        Ok(())
    }

    fn click(&mut self, at: ScreenPoint) -> DispatchResult<()> {
        self.move_abs(at)?;
        self.button(Button::Left, Direction::Click)?;
        self.settle();
        Ok(())
    }

    fn double_click(&mut self, at: ScreenPoint) -> DispatchResult<()> {
        self.move_abs(at)?;
        self.button(Button::Left, Direction::Click)?;
        self.button(Button::Left, Direction::Click)?;
        self.settle();
        Ok(())
    }

    fn right_click(&mut self, at: ScreenPoint) -> DispatchResult<()> {
        self.move_abs(at)?;
        self.button(Button::Right, Direction::Click)?;
        self.settle();
        Ok(())
    }

    fn scroll(&mut self, clicks: i32) -> DispatchResult<()> {
        // enigo scrolls down for positive lengths.
        self.enigo
            .scroll(-clicks, Axis::Vertical)
            .map_err(|e| DispatchError::Backend(format!("scroll failed: {e:?}")))?;
        self.settle();
        Ok(())
    }

    fn press(&mut self, key: KeyCode) -> DispatchResult<()> {
        self.key(key, Direction::Click)?;
        self.settle();
        Ok(())
    }

    fn chord(&mut self, modifier: KeyCode, key: KeyCode) -> DispatchResult<()> {
        self.key(modifier, Direction::Press)?;
        let pressed = self.key(key, Direction::Click);
        // Release even when the inner press failed, or the modifier stays latched.
        let released = self.key(modifier, Direction::Release);
        pressed.and(released)?;
        self.settle();
        Ok(())
    }

    fn set_clipboard(&mut self, text: &str) -> DispatchResult<()> {
        let clipboard = match self.clipboard.take() {
            Some(c) => c,
            None => arboard::Clipboard::new().map_err(|e| DispatchError::Clipboard(e.to_string()))?,
        };
        self.clipboard
            .insert(clipboard)
            .set_text(text.to_owned())
            .map_err(|e| DispatchError::Clipboard(e.to_string()))
    }
}

fn to_enigo_key(key: KeyCode) -> DispatchResult<Key> {
    let mapped = match key {
        KeyCode::Return => Key::Return,
        KeyCode::Tab => Key::Tab,
        KeyCode::Escape => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Space => Key::Space,
        KeyCode::Up => Key::UpArrow,
        KeyCode::Down => Key::DownArrow,
        KeyCode::Left => Key::LeftArrow,
        KeyCode::Right => Key::RightArrow,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::Control => Key::Control,
        KeyCode::Shift => Key::Shift,
        KeyCode::Alt => Key::Alt,
        KeyCode::Meta => Key::Meta,
        KeyCode::F(n) => match n {
            1 => Key::F1,
            2 => Key::F2,
            3 => Key::F3,
            4 => Key::F4,
            5 => Key::F5,
            6 => Key::F6,
            7 => Key::F7,
            8 => Key::F8,
            9 => Key::F9,
            10 => Key::F10,
            11 => Key::F11,
            12 => Key::F12,
            _ => return Err(DispatchError::UnknownKey(format!("F{n}"))),
        },
        KeyCode::Char(c) => Key::Unicode(c),
    };
    Ok(mapped)
}
