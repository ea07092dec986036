//! 渲染任务
//!
//! 三种任务：
//! - 瓦片渲染 (Tile)：渲染一张地图的单个瓦片
//! - 地图更新 (MapUpdate)：按区域更新整张地图或部分区域
//! - 地图清除 (MapPurge)：删除地图的全部渲染结果，之后自动安排一次强制更新
//!
//! 队列中同一个 [`TaskKey`] 最多只有一个待执行任务。

use crate::grid::Grid;
use crate::map::MapInfo;
use mapmark_core::math::Vector2i;
use std::collections::HashSet;
use std::sync::Arc;

/// 地图更新范围
///
/// 更新以区域（512x512 方块）为最小单位，无法表达更细的范围。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateScope {
    /// 整张地图
    All,
    /// 指定区域坐标
    Regions(HashSet<Vector2i>),
}

impl UpdateScope {
    /// 由区域坐标创建
    pub fn regions(regions: impl IntoIterator<Item = Vector2i>) -> Self {
        UpdateScope::Regions(regions.into_iter().collect())
    }

    /// 按区域列出时的区域数上限
    pub const MAX_REGIONS: usize = 4096;

    /// 覆盖方块坐标矩形 `[min, max]`（x/z）的所有区域
    ///
    /// 覆盖的区域超过 [`Self::MAX_REGIONS`] 时返回 [`UpdateScope::All`]。
    pub fn covering_blocks(min: Vector2i, max: Vector2i) -> Self {
        let from = Grid::REGION.cell(min.x.min(max.x), min.y.min(max.y));
        let to = Grid::REGION.cell(min.x.max(max.x), min.y.max(max.y));

        let width = i64::from(to.x) - i64::from(from.x) + 1;
        let height = i64::from(to.y) - i64::from(from.y) + 1;
        let count = usize::try_from(width * height).unwrap_or(usize::MAX);
        if count > Self::MAX_REGIONS {
            return UpdateScope::All;
        }

        let mut regions = HashSet::with_capacity(count);
        for z in from.y..=to.y {
            for x in from.x..=to.x {
                regions.insert(Vector2i::new(x, z));
            }
        }
        UpdateScope::Regions(regions)
    }

    /// 是否包含 `other` 的全部范围
    pub fn covers(&self, other: &UpdateScope) -> bool {
        match (self, other) {
            (UpdateScope::All, _) => true,
            (UpdateScope::Regions(_), UpdateScope::All) => false,
            (UpdateScope::Regions(mine), UpdateScope::Regions(theirs)) => theirs.is_subset(mine),
        }
    }

    /// 合并为同时包含两者的范围
    pub fn merge(&mut self, other: UpdateScope) {
        match other {
            UpdateScope::All => *self = UpdateScope::All,
            UpdateScope::Regions(theirs) => {
                if let UpdateScope::Regions(mine) = self {
                    mine.extend(theirs);
                }
            }
        }
    }
}

/// 渲染任务
#[derive(Debug, Clone)]
pub enum RenderTask {
    Tile {
        map: Arc<MapInfo>,
        tile: Vector2i,
    },
    MapUpdate {
        map: Arc<MapInfo>,
        scope: UpdateScope,
        /// 为 `true` 时忽略变更检测，重新渲染所有瓦片
        force: bool,
    },
    MapPurge {
        map: Arc<MapInfo>,
    },
}

impl RenderTask {
    pub fn map(&self) -> &Arc<MapInfo> {
        match self {
            RenderTask::Tile { map, .. }
            | RenderTask::MapUpdate { map, .. }
            | RenderTask::MapPurge { map } => map,
        }
    }

    /// 去重键
    pub fn key(&self) -> TaskKey {
        let map = self.map().id().to_string();
        match self {
            RenderTask::Tile { tile, .. } => TaskKey::Tile(map, *tile),
            RenderTask::MapUpdate { .. } => TaskKey::Update(map),
            RenderTask::MapPurge { .. } => TaskKey::Purge(map),
        }
    }
}

/// 任务去重键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskKey {
    Tile(String, Vector2i),
    Update(String),
    Purge(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers() {
        let a = UpdateScope::regions([Vector2i::new(0, 0), Vector2i::new(1, 0)]);
        let b = UpdateScope::regions([Vector2i::new(1, 0)]);

        assert!(UpdateScope::All.covers(&a));
        assert!(a.covers(&b));
        assert!(!b.covers(&a));
        assert!(!a.covers(&UpdateScope::All));
    }

    #[test]
    fn test_merge() {
        let mut scope = UpdateScope::regions([Vector2i::new(0, 0)]);
        scope.merge(UpdateScope::regions([Vector2i::new(5, 5)]));
        assert_eq!(
            scope,
            UpdateScope::regions([Vector2i::new(0, 0), Vector2i::new(5, 5)])
        );

        scope.merge(UpdateScope::All);
        assert_eq!(scope, UpdateScope::All);
    }

    #[test]
    fn test_covering_blocks_quantizes_to_regions() {
        let scope = UpdateScope::covering_blocks(Vector2i::new(10, 10), Vector2i::new(20, 20));
        assert_eq!(scope, UpdateScope::regions([Vector2i::new(0, 0)]));

        let scope = UpdateScope::covering_blocks(Vector2i::new(511, -1), Vector2i::new(512, 0));
        assert_eq!(
            scope,
            UpdateScope::regions([
                Vector2i::new(0, -1),
                Vector2i::new(1, -1),
                Vector2i::new(0, 0),
                Vector2i::new(1, 0),
            ])
        );
    }

    #[test]
    fn test_covering_blocks_too_large_is_all() {
        let whole = UpdateScope::covering_blocks(
            Vector2i::new(i32::MIN, i32::MIN),
            Vector2i::new(i32::MAX, i32::MAX),
        );
        assert_eq!(whole, UpdateScope::All);

        // 64x64 个区域恰好在上限内
        let side = 64 * 512;
        let limit = UpdateScope::covering_blocks(Vector2i::zeros(), Vector2i::repeat(side - 1));
        match limit {
            UpdateScope::Regions(regions) => assert_eq!(regions.len(), UpdateScope::MAX_REGIONS),
            UpdateScope::All => panic!("expected region scope"),
        }

        let over = UpdateScope::covering_blocks(Vector2i::zeros(), Vector2i::new(side, side - 1));
        assert_eq!(over, UpdateScope::All);

        let edge = UpdateScope::covering_blocks(
            Vector2i::new(i32::MAX, i32::MIN),
            Vector2i::new(i32::MAX - 1, i32::MIN),
        );
        assert_eq!(edge, UpdateScope::regions([Vector2i::new(4_194_303, -4_194_304)]));
    }
}
