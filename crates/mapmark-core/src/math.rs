//! 数学基础类型
//!
//! 基于 nalgebra 提供的向量类型的别名，以及轴对齐包围盒。

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// 2D向量类型（平面坐标，x/z）
pub type Vector2 = na::Vector2<f64>;

/// 3D向量类型（世界坐标，x/y/z）
pub type Vector3 = na::Vector3<f64>;

/// 2D整数向量（瓦片坐标、区域坐标、锚点偏移）
pub type Vector2i = na::Vector2<i32>;

/// 3D整数向量（方块坐标）
pub type Vector3i = na::Vector3<i32>;

/// 任意维度的浮点向量
pub type VectorN<const D: usize> = na::SVector<f64, D>;

/// 数值容差，用于几何比较
pub const EPSILON: f64 = 1e-10;

/// 判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 判断两个向量是否逐分量近似相等
#[inline]
pub fn vectors_approx_eq<const D: usize>(a: &VectorN<D>, b: &VectorN<D>) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| approx_eq(*x, *y))
}

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb<const D: usize> {
    pub min: VectorN<D>,
    pub max: VectorN<D>,
}

/// 2D包围盒
pub type Aabb2 = Aabb<2>;

/// 3D包围盒
pub type Aabb3 = Aabb<3>;

impl<const D: usize> Aabb<D> {
    /// 创建新的包围盒
    pub fn new(min: VectorN<D>, max: VectorN<D>) -> Self {
        Self { min, max }
    }

    /// 从点集创建包围盒
    ///
    /// 点集为空时返回 `None`。
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a VectorN<D>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = Self::new(first, first);
        for p in iter {
            bbox.expand_to_include(p);
        }
        Some(bbox)
    }

    /// 扩展包围盒以包含指定点
    pub fn expand_to_include(&mut self, point: &VectorN<D>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// 合并两个包围盒
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// 检查是否包含指定点
    pub fn contains(&self, point: &VectorN<D>) -> bool {
        (0..D).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    /// 获取中心点 `(min + max) / 2`
    pub fn center(&self) -> VectorN<D> {
        (self.min + self.max) * 0.5
    }

    /// 各轴向的尺寸
    pub fn size(&self) -> VectorN<D> {
        self.max - self.min
    }
}
