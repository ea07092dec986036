//! MapMark 核心数据模型
//!
//! 提供地图标记使用的几何图元、标记类型和标记集。
//!
//! # 架构设计
//!
//! - `Line` / `Shape`: 不可变点序列，包围盒延迟计算并缓存
//! - `Marker`: 标识 + 所属地图 + 封闭的 `MarkerKind` 枚举
//! - `MarkerSet`: 以ID为键的标记集合，创建即替换
//!
//! # 示例
//!
//! ```rust
//! use mapmark_core::prelude::*;
//!
//! let mut set = MarkerSet::new("routes");
//! let line = Line::new(vec![Vector3::new(0.0, 64.0, 0.0), Vector3::new(100.0, 64.0, 50.0)])?;
//! set.create_line_marker_centered("road", "world", line).set_line_width(4);
//!
//! assert_eq!(set.len(), 1);
//! # Ok::<(), mapmark_core::error::GeometryError>(())
//! ```

pub mod error;
pub mod export;
pub mod geometry;
pub mod marker;
pub mod marker_set;
pub mod math;
pub mod properties;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::error::GeometryError;
    pub use crate::geometry::{Line, Shape};
    pub use crate::marker::{
        ExtrudeMarker, HtmlMarker, LineMarker, Marker, MarkerKind, PoiMarker, ShapeMarker,
    };
    pub use crate::marker_set::MarkerSet;
    pub use crate::math::{Aabb2, Aabb3, Vector2, Vector2i, Vector3, Vector3i};
    pub use crate::properties::Color;
}
