//! 渲染配置
//!
//! 从 JSON 文件加载，缺省字段取默认值：
//!
//! ```json
//! {
//!   "render_threads": 4,
//!   "start_paused": false,
//!   "storage_root": "web/maps",
//!   "log_level": "info"
//! }
//! ```

use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 渲染线程数上限
pub const MAX_RENDER_THREADS: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// 渲染线程数，0 表示自动（可用核心数减一，至少为 1）
    pub render_threads: usize,

    /// 为 `true` 时调度器创建后处于暂停状态
    pub start_paused: bool,

    /// 渲染结果的存储根目录
    pub storage_root: PathBuf,

    /// 日志级别：trace / debug / info / warn / error
    pub log_level: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_threads: 0,
            start_paused: false,
            storage_root: PathBuf::from("web/maps"),
            log_level: "info".to_string(),
        }
    }
}

impl RenderConfig {
    /// 从文件加载配置，文件不存在时返回默认配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::from_json(&text)
    }

    /// 从 JSON 文本解析并校验
    pub fn from_json(text: &str) -> Result<Self, RenderError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.render_threads > MAX_RENDER_THREADS {
            return Err(RenderError::Config(format!(
                "render_threads must be at most {MAX_RENDER_THREADS}, got {}",
                self.render_threads
            )));
        }
        Ok(())
    }

    /// 实际使用的渲染线程数
    pub fn effective_render_threads(&self) -> usize {
        if self.render_threads > 0 {
            return self.render_threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1))
            .unwrap_or(1)
            .max(1)
    }
}
