use crate::errors::{DispatchError, DispatchResult};
use crate::executor::coordinator::box_center;
use crate::operation::registry;
use crate::operation::types::{
    Field, GroundedOperation, MetaOperation, NormalizedOperation, ScreenSize,
};

/// Drops the enclosing quote pair the model wraps string arguments in.
/// Values of two characters or fewer are returned unchanged.
pub fn strip_quotes(raw: &str) -> String {
    let mut chars = raw.chars();
    if raw.chars().count() > 2 {
        chars.next();
        chars.next_back();
        chars.as_str().to_string()
    } else {
        raw.to_string()
    }
}

/// Validates `op` against the registry and resolves its fields.
///
/// `screen` is only invoked for operations that carry a box, so KEY_PRESS,
/// LAUNCH and END never touch the display.
pub fn normalize<F>(op: &GroundedOperation, screen: F) -> DispatchResult<NormalizedOperation>
where
    F: FnOnce() -> DispatchResult<ScreenSize>,
{
    let meta = registry::lookup(&op.operation)?;
    let required = meta.required_fields();

    if let Some(&field) = required.iter().find(|f| !op.has_field(**f)) {
        return Err(DispatchError::MissingField { operation: meta, field });
    }

    let at = match op.bbox {
        Some(bbox) if required.contains(&Field::Box) => {
            let size = screen()?;
            let point = box_center(bbox, size)?;
            tracing::debug!(
                operation = %meta,
                ?bbox,
                width = size.width,
                height = size.height,
                x = point.x,
                y = point.y,
                "box resolved"
            );
            Some(point)
        }
        _ => None,
    };
    let text = || op.text.as_deref().map(strip_quotes).unwrap_or_default();

    let normalized = match (meta, at) {
        (MetaOperation::Click, Some(at)) => NormalizedOperation::Click { at },
        (MetaOperation::DoubleClick, Some(at)) => NormalizedOperation::DoubleClick { at },
        (MetaOperation::RightClick, Some(at)) => NormalizedOperation::RightClick { at },
        (MetaOperation::Hover, Some(at)) => NormalizedOperation::Hover { at },
        (MetaOperation::ScrollDown, Some(at)) => NormalizedOperation::ScrollDown { at },
        (MetaOperation::ScrollUp, Some(at)) => NormalizedOperation::ScrollUp { at },
        (MetaOperation::Type, Some(at)) => NormalizedOperation::Type { at, text: text() },
        (MetaOperation::KeyPress, _) => NormalizedOperation::KeyPress {
            key: op.key.as_deref().map(strip_quotes).unwrap_or_default(),
        },
        (MetaOperation::Launch, _) => NormalizedOperation::Launch {
            app: op.app.as_deref().map(strip_quotes).unwrap_or_default(),
        },
        (MetaOperation::End, _) => NormalizedOperation::End,
        (operation, None) => {
            return Err(DispatchError::MissingField { operation, field: Field::Box })
        }
    };
    Ok(normalized)
}
