//! 瓦片与区域网格
//!
//! 网格把方块坐标 (x, z) 划分为等大的单元：
//! `cell = floor((pos - offset) / size)`，负坐标同样向下取整。

use crate::error::RenderError;
use mapmark_core::math::{Vector2i, Vector3i};
use serde::{Deserialize, Serialize};

/// 二维规则网格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: Vector2i,
    offset: Vector2i,
}

impl Grid {
    /// 区域网格：每个区域 512x512 方块（32x32 区块），更新的最小单位
    pub const REGION: Grid = Grid {
        size: Vector2i::new(512, 512),
        offset: Vector2i::new(0, 0),
    };

    pub fn new(size: Vector2i, offset: Vector2i) -> Result<Self, RenderError> {
        if size.x < 1 || size.y < 1 {
            return Err(RenderError::InvalidGrid(size.x, size.y));
        }
        Ok(Self { size, offset })
    }

    pub fn size(&self) -> Vector2i {
        self.size
    }

    pub fn offset(&self) -> Vector2i {
        self.offset
    }

    /// 方块坐标所在的单元
    pub fn cell(&self, x: i32, z: i32) -> Vector2i {
        Vector2i::new(
            floor_div(x, self.offset.x, self.size.x),
            floor_div(z, self.offset.y, self.size.y),
        )
    }

    /// 方块位置所在的单元（忽略高度）
    pub fn cell_of(&self, block: Vector3i) -> Vector2i {
        self.cell(block.x, block.z)
    }

    /// 单元内最小的方块坐标
    ///
    /// 超出 i32 范围的坐标截断到边界，下同。
    pub fn cell_min(&self, cell: Vector2i) -> Vector2i {
        Vector2i::new(
            saturate(cell_start(cell.x, self.size.x, self.offset.x)),
            saturate(cell_start(cell.y, self.size.y, self.offset.y)),
        )
    }

    /// 单元内最大的方块坐标
    pub fn cell_max(&self, cell: Vector2i) -> Vector2i {
        Vector2i::new(
            saturate(cell_start(cell.x, self.size.x, self.offset.x) + i64::from(self.size.x) - 1),
            saturate(cell_start(cell.y, self.size.y, self.offset.y) + i64::from(self.size.y) - 1),
        )
    }

    /// 与本网格中某个单元相交的 `other` 网格单元，按行优先排列
    pub fn intersecting_cells(&self, cell: Vector2i, other: &Grid) -> Vec<Vector2i> {
        let min = self.cell_min(cell);
        let max = self.cell_max(cell);
        let from = other.cell(min.x, min.y);
        let to = other.cell(max.x, max.y);

        let width = i64::from(to.x) - i64::from(from.x) + 1;
        let height = i64::from(to.y) - i64::from(from.y) + 1;
        let mut cells = Vec::with_capacity(usize::try_from(width * height).unwrap_or(0));
        for z in from.y..=to.y {
            for x in from.x..=to.x {
                cells.push(Vector2i::new(x, z));
            }
        }
        cells
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// `floor((pos - offset) / size)`，在 i64 中计算
fn floor_div(pos: i32, offset: i32, size: i32) -> i32 {
    saturate((i64::from(pos) - i64::from(offset)).div_euclid(i64::from(size)))
}

/// `cell * size + offset`
fn cell_start(cell: i32, size: i32, offset: i32) -> i64 {
    i64::from(cell) * i64::from(size) + i64::from(offset)
}
