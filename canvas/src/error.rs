//! Edit and policy errors raised by the element store.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::doc::ElementId;

/// Stable machine-readable code for an error, used in user notices.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("layer is locked: {0}")]
    LayerLocked(String),
    #[error("layer not found: {0}")]
    LayerNotFound(String),
    #[error("a new-build project cannot contain surveyed elements")]
    NatureConflict,
    #[error("floor not found: {0}")]
    FloorNotFound(ElementId),
    #[error("the first floor cannot be removed")]
    FirstFloor,
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("room group not found: {0}")]
    RoomNotFound(ElementId),
    #[error("opening not found: {0}")]
    OpeningNotFound(ElementId),
    #[error("wall index out of range: {0}")]
    WallIndexOutOfRange(usize),
    #[error("opening overlaps opening {0}")]
    OpeningOverlap(ElementId),
    #[error("invalid calibration length: {0}")]
    InvalidCalibration(f64),
    #[error("invalid scale factor: {0}")]
    InvalidScale(f64),
}

impl ErrorCode for EditError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LayerLocked(_) => "E_LAYER_LOCKED",
            Self::LayerNotFound(_) => "E_LAYER_NOT_FOUND",
            Self::NatureConflict => "E_NATURE_CONFLICT",
            Self::FloorNotFound(_) => "E_FLOOR_NOT_FOUND",
            Self::FirstFloor => "E_FIRST_FLOOR",
            Self::ElementNotFound(_) => "E_ELEMENT_NOT_FOUND",
            Self::RoomNotFound(_) => "E_ROOM_NOT_FOUND",
            Self::OpeningNotFound(_) => "E_OPENING_NOT_FOUND",
            Self::WallIndexOutOfRange(_) => "E_WALL_INDEX",
            Self::OpeningOverlap(_) => "E_OPENING_OVERLAP",
            Self::InvalidCalibration(_) => "E_CALIBRATION",
            Self::InvalidScale(_) => "E_INVALID_SCALE",
        }
    }
}
