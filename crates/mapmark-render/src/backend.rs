//! 渲染后端与瓦片存储
//!
//! 调度器只负责排队和分发，真正的渲染和存储由宿主程序通过这两个 trait 提供。

use crate::map::MapInfo;
use mapmark_core::math::Vector2i;
use std::io;
use std::path::{Path, PathBuf};

/// 渲染后端
///
/// 失败应通过 `io::Result` 返回。渲染线程会捕获实现中的 panic 并丢弃该任务，
/// 但以 `panic = "abort"` 编译时进程会直接终止。
pub trait RenderBackend: Send + Sync {
    /// 渲染单个瓦片
    fn render_tile(&self, map: &MapInfo, tile: Vector2i) -> io::Result<()>;

    /// 地图所在世界中已生成的全部区域
    fn regions(&self, map: &MapInfo) -> io::Result<Vec<Vector2i>>;

    /// 更新一个区域
    ///
    /// `force` 为 `false` 时实现可以跳过自上次更新以来没有变化的瓦片。
    /// 默认实现不做变更检测，逐个渲染区域覆盖的所有瓦片。
    fn render_region(&self, map: &MapInfo, region: Vector2i, force: bool) -> io::Result<()> {
        let _ = force;
        for tile in map.region_tiles(region) {
            self.render_tile(map, tile)?;
        }
        Ok(())
    }
}

/// 渲染结果存储
pub trait MapStorage: Send + Sync {
    /// 检查存储是否可写，创建清除任务前调用
    fn check_available(&self, map: &MapInfo) -> io::Result<()>;

    /// 删除地图的全部渲染结果
    fn purge(&self, map: &MapInfo) -> io::Result<()>;
}

/// 基于文件系统的存储，每张地图一个目录：`<root>/<map id>/`
#[derive(Debug, Clone)]
pub struct FileMapStorage {
    root: PathBuf,
}

impl FileMapStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 地图的存储目录
    pub fn map_dir(&self, map: &MapInfo) -> PathBuf {
        self.root.join(map.id())
    }
}

impl MapStorage for FileMapStorage {
    fn check_available(&self, _map: &MapInfo) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        if std::fs::metadata(&self.root)?.permissions().readonly() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("storage root {} is read-only", self.root.display()),
            ));
        }
        Ok(())
    }

    fn purge(&self, map: &MapInfo) -> io::Result<()> {
        match std::fs::remove_dir_all(self.map_dir(map)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            result => result,
        }
    }
}
