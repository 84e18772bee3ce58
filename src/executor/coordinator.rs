// Permille box → physical screen coordinate mapping.
//
// Grounding screenshots cover only the left half of the display, so the
// horizontal axis maps onto `width / 2` while the vertical axis spans the
// full height.
use crate::errors::{DispatchError, DispatchResult};
use crate::operation::types::{ScreenPoint, ScreenSize};

pub const PERMILLE: f64 = 1000.0;

/// Converts a `[left, top, right, bottom]` permille box to the physical pixel
/// centre of the rectangle it covers on screen.
///
/// Each edge is snapped to a whole pixel first (floor), then the midpoint is
/// taken, so the result may land on a half pixel.
pub fn box_center(bbox: [f64; 4], screen: ScreenSize) -> DispatchResult<ScreenPoint> {
    if let Some(bad) = bbox.iter().find(|v| !v.is_finite() || !(0.0..=PERMILLE).contains(*v)) {
        return Err(DispatchError::InvalidBox(format!(
            "value {bad} outside 0..={PERMILLE} in {bbox:?}"
        )));
    }

    let half_width = screen.width as f64 / 2.0;
    let height = screen.height as f64;

    let [left, top, right, bottom] = bbox.map(|v| v / PERMILLE);
    let x_min = (left * half_width).floor();
    let x_max = (right * half_width).floor();
    let y_min = (top * height).floor();
    let y_max = (bottom * height).floor();

    Ok(ScreenPoint::new((x_min + x_max) / 2.0, (y_min + y_max) / 2.0))
}
