//! 渲染调度错误定义

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("There is no world loaded with id {0}")]
    UnknownWorld(Uuid),

    #[error("There is no map loaded with id '{0}'")]
    UnknownMap(String),

    #[error("Invalid map id '{0}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidMapId(String),

    #[error("Invalid grid size {0}x{1}: cells must be at least 1x1")]
    InvalidGrid(i32, i32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
