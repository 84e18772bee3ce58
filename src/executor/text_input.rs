// Clipboard-paste text entry.
// All text, CJK included, goes via clipboard + paste chord; no per-key synthesis.
use std::thread;
use std::time::Duration;

use crate::errors::DispatchResult;
use crate::executor::input::AutomationBackend;
use crate::executor::keys::KeyCode;
use crate::executor::platform::Platform;

/// Modifier + key that pastes on `platform`.
pub fn paste_chord(platform: Platform) -> (KeyCode, KeyCode) {
    match platform {
        Platform::Mac => (KeyCode::Meta, KeyCode::Char('v')),
        Platform::Windows | Platform::Linux => (KeyCode::Control, KeyCode::Char('v')),
    }
}

/// Puts `text` on the clipboard, waits `settle` for it to land, then pastes.
pub fn paste<B: AutomationBackend>(
    backend: &mut B,
    platform: Platform,
    text: &str,
    settle: Duration,
) -> DispatchResult<()> {
    backend.set_clipboard(text)?;
    if !settle.is_zero() {
        thread::sleep(settle);
    }
    let (modifier, key) = paste_chord(platform);
    backend.chord(modifier, key)
}
