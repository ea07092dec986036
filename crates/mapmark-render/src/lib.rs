//! MapMark 渲染调度
//!
//! 为已加载的地图安排瓦片渲染、地图更新和地图清除。
//!
//! # 特点
//!
//! - **去重**：同一 (地图, 瓦片) 最多只有一个待执行任务
//! - **多线程**：固定数量的渲染线程，可随时暂停和恢复
//! - **可替换后端**：渲染和存储通过 [`RenderBackend`] / [`MapStorage`] 注入

pub mod api;
pub mod backend;
pub mod compat;
pub mod config;
pub mod error;
pub mod grid;
pub mod map;
pub mod queue;
pub mod scheduler;
pub mod task;

pub use api::RenderApi;
pub use backend::{FileMapStorage, MapStorage, RenderBackend};
pub use config::RenderConfig;
pub use error::RenderError;
pub use grid::Grid;
pub use map::{MapInfo, MapRegistry, World};
pub use scheduler::RenderScheduler;
pub use task::UpdateScope;
