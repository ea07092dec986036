//! 地图与世界注册表
//!
//! 一个世界可以有多张地图（不同视角或渲染设置），每张地图有自己的瓦片网格。
//! 注册表在调度器创建前填充，之后以 `Arc` 共享、只读。

use crate::error::RenderError;
use crate::grid::Grid;
use mapmark_core::math::{Vector2i, Vector3i};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 已加载的地图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    id: String,
    name: String,
    world: Uuid,
    tile_grid: Grid,
}

impl MapInfo {
    /// 创建地图
    ///
    /// 地图ID会用作存储目录名，只允许 ASCII 字母、数字、`-` 和 `_`。
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        world: Uuid,
        tile_grid: Grid,
    ) -> Result<Self, RenderError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RenderError::InvalidMapId(id));
        }

        Ok(Self {
            id,
            name: name.into(),
            world,
            tile_grid,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> Uuid {
        self.world
    }

    pub fn tile_grid(&self) -> &Grid {
        &self.tile_grid
    }

    /// 方块位置所在的瓦片
    pub fn tile_at(&self, block: Vector3i) -> Vector2i {
        self.tile_grid.cell_of(block)
    }

    /// 区域覆盖的所有瓦片
    pub fn region_tiles(&self, region: Vector2i) -> Vec<Vector2i> {
        Grid::REGION.intersecting_cells(region, &self.tile_grid)
    }
}

/// 已加载的世界
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    id: Uuid,
    name: String,
    maps: Vec<String>,
}

impl World {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            maps: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 该世界所有地图的ID
    pub fn map_ids(&self) -> &[String] {
        &self.maps
    }
}

/// 地图注册表
#[derive(Debug, Default)]
pub struct MapRegistry {
    worlds: HashMap<Uuid, World>,
    maps: HashMap<String, Arc<MapInfo>>,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加世界，替换同ID的世界并保留其地图列表
    pub fn add_world(&mut self, world: World) {
        let maps = self
            .worlds
            .remove(&world.id)
            .map(|old| old.maps)
            .unwrap_or_default();
        self.worlds.insert(world.id, World { maps, ..world });
    }

    /// 添加地图，所属世界必须已注册
    pub fn add_map(&mut self, map: MapInfo) -> Result<Arc<MapInfo>, RenderError> {
        let world = self
            .worlds
            .get_mut(&map.world)
            .ok_or(RenderError::UnknownWorld(map.world))?;

        if !world.maps.contains(&map.id) {
            world.maps.push(map.id.clone());
        }

        let map = Arc::new(map);
        self.maps.insert(map.id.clone(), Arc::clone(&map));
        Ok(map)
    }

    /// 按ID获取地图
    pub fn map(&self, id: &str) -> Result<Arc<MapInfo>, RenderError> {
        self.maps
            .get(id)
            .cloned()
            .ok_or_else(|| RenderError::UnknownMap(id.to_string()))
    }

    /// 按ID获取世界
    pub fn world(&self, id: &Uuid) -> Result<&World, RenderError> {
        self.worlds.get(id).ok_or(RenderError::UnknownWorld(*id))
    }

    /// 世界的所有地图
    pub fn maps_of(&self, world: &Uuid) -> Result<Vec<Arc<MapInfo>>, RenderError> {
        self.world(world)?
            .maps
            .iter()
            .map(|id| self.map(id))
            .collect()
    }

    /// 所有地图
    pub fn maps(&self) -> impl Iterator<Item = &Arc<MapInfo>> {
        self.maps.values()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles() -> Grid {
        Grid::new(Vector2i::new(500, 500), Vector2i::zeros()).unwrap()
    }

    #[test]
    fn test_registry() {
        let world_id = Uuid::new_v4();
        let mut registry = MapRegistry::new();
        registry.add_world(World::new(world_id, "Overworld"));
        registry
            .add_map(MapInfo::new("world", "World", world_id, tiles()).unwrap())
            .unwrap();
        registry
            .add_map(MapInfo::new("world_flat", "Flat", world_id, tiles()).unwrap())
            .unwrap();

        assert_eq!(registry.map_count(), 2);
        assert_eq!(registry.world(&world_id).unwrap().map_ids().len(), 2);
        assert_eq!(registry.maps_of(&world_id).unwrap().len(), 2);
        assert_eq!(registry.map("world").unwrap().name(), "World");
    }

    #[test]
    fn test_unknown_ids() {
        let mut registry = MapRegistry::new();
        let missing = Uuid::new_v4();

        assert!(matches!(registry.map("nope"), Err(RenderError::UnknownMap(id)) if id == "nope"));
        assert!(matches!(registry.world(&missing), Err(RenderError::UnknownWorld(id)) if id == missing));

        let orphan = MapInfo::new("orphan", "Orphan", missing, tiles()).unwrap();
        assert!(matches!(registry.add_map(orphan), Err(RenderError::UnknownWorld(_))));
    }

    #[test]
    fn test_invalid_map_id() {
        let world = Uuid::new_v4();
        assert!(MapInfo::new("../etc", "x", world, tiles()).is_err());
        assert!(MapInfo::new("", "x", world, tiles()).is_err());
        assert!(MapInfo::new("my-map_2", "x", world, tiles()).is_ok());
    }

    #[test]
    fn test_tile_at() {
        let map = MapInfo::new("world", "World", Uuid::new_v4(), tiles()).unwrap();
        assert_eq!(map.tile_at(Vector3i::new(-1, 70, 999)), Vector2i::new(-1, 1));
        assert_eq!(map.region_tiles(Vector2i::new(0, 0)).len(), 4);
    }
}
