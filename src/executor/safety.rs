// Fail-safe interceptor: a cursor parked in a screen corner aborts dispatch.
use crate::operation::types::ScreenSize;

/// Returns true if `cursor` sits on one of the four corners of `screen`.
pub fn in_failsafe_corner(cursor: (i32, i32), screen: ScreenSize) -> bool {
    let right = screen.width as i32 - 1;
    let bottom = screen.height as i32 - 1;
    let (x, y) = cursor;
    (x <= 0 || x >= right) && (y <= 0 || y >= bottom)
}
