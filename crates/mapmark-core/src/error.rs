//! 几何与标记错误定义

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("A {kind} has to have at least {required} points, got {actual}")]
    InvalidGeometry {
        kind: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Point index {index} out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },
}
