//! 旧版按方块位置安排渲染的接口
//!
//! 这些函数只是把世界/方块位置解析成 (地图, 瓦片) 后转给
//! [`RenderApi::enqueue_tile_render`]。

#![allow(deprecated)]

use crate::api::RenderApi;
use crate::error::RenderError;
use crate::map::MapRegistry;
use mapmark_core::math::Vector3i;
use uuid::Uuid;

/// 为世界的每张地图安排渲染方块所在的瓦片
#[deprecated(note = "resolve the map and tile yourself and use `RenderApi::enqueue_tile_render`")]
pub fn render_world_block<A: RenderApi + ?Sized>(
    api: &A,
    registry: &MapRegistry,
    world: &Uuid,
    block: Vector3i,
) -> Result<(), RenderError> {
    for map in registry.maps_of(world)? {
        api.enqueue_tile_render(map.id(), map.tile_at(block))?;
    }
    Ok(())
}

/// 安排渲染方块所在的瓦片
#[deprecated(note = "use `MapInfo::tile_at` and `RenderApi::enqueue_tile_render`")]
pub fn render_map_block<A: RenderApi + ?Sized>(
    api: &A,
    registry: &MapRegistry,
    map_id: &str,
    block: Vector3i,
) -> Result<(), RenderError> {
    let map = registry.map(map_id)?;
    api.enqueue_tile_render(map.id(), map.tile_at(block))
}
