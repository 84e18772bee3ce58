//! Registered meta-operations and the arguments each one requires.
use crate::errors::{DispatchError, DispatchResult};
use crate::operation::types::{Field, MetaOperation};

impl MetaOperation {
    pub const ALL: [MetaOperation; 10] = [
        MetaOperation::Click,
        MetaOperation::DoubleClick,
        MetaOperation::RightClick,
        MetaOperation::Type,
        MetaOperation::Hover,
        MetaOperation::ScrollDown,
        MetaOperation::ScrollUp,
        MetaOperation::KeyPress,
        MetaOperation::Launch,
        MetaOperation::End,
    ];

    /// Fields that must be present on a grounded operation of this kind, in order.
    pub fn required_fields(self) -> &'static [Field] {
        match self {
            MetaOperation::Click
            | MetaOperation::DoubleClick
            | MetaOperation::RightClick
            | MetaOperation::Hover
            | MetaOperation::ScrollDown
            | MetaOperation::ScrollUp => &[Field::Box],
            MetaOperation::Type => &[Field::Box, Field::Text],
            MetaOperation::KeyPress => &[Field::Key],
            MetaOperation::Launch => &[Field::App],
            MetaOperation::End => &[],
        }
    }
}

impl std::str::FromStr for MetaOperation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}

/// Resolve an operation name exactly as the model emits it (upper snake case).
pub fn lookup(name: &str) -> DispatchResult<MetaOperation> {
    MetaOperation::ALL
        .into_iter()
        .find(|op| op.name() == name)
        .ok_or_else(|| DispatchError::UnsupportedOperation(name.to_string()))
}

pub fn required_fields(name: &str) -> DispatchResult<&'static [Field]> {
    lookup(name).map(MetaOperation::required_fields)
}
