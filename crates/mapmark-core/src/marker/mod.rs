//! 地图标记
//!
//! 标记由标识、所属地图和具体类型组成：
//! - `Marker`: 在标记集中唯一的标识和所属地图
//! - `MarkerKind`: 封闭的标记类型集合（兴趣点、HTML、形状、拉伸体、折线）
//!
//! 每种标记都有标签和位置。自带几何的标记（形状、拉伸体、折线）
//! 的位置只用于排序，例如计算与相机的距离。

mod extrude;
mod html;
mod line;
mod poi;
mod shape;

pub use extrude::ExtrudeMarker;
pub use html::HtmlMarker;
pub use line::LineMarker;
pub use poi::{PoiMarker, DEFAULT_ANCHOR, DEFAULT_ICON};
pub use shape::ShapeMarker;

use crate::math::Vector3;
use serde::{Deserialize, Serialize};

/// 标记类型枚举
///
/// 序列化时以 `type` 字段区分：`poi`、`html`、`shape`、`extrude`、`line`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarkerKind {
    Poi(PoiMarker),
    Html(HtmlMarker),
    Shape(ShapeMarker),
    Extrude(ExtrudeMarker),
    Line(LineMarker),
}

impl MarkerKind {
    /// 类型标签
    pub fn type_name(&self) -> &'static str {
        match self {
            MarkerKind::Poi(_) => "poi",
            MarkerKind::Html(_) => "html",
            MarkerKind::Shape(_) => "shape",
            MarkerKind::Extrude(_) => "extrude",
            MarkerKind::Line(_) => "line",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MarkerKind::Poi(m) => m.label(),
            MarkerKind::Html(m) => m.label(),
            MarkerKind::Shape(m) => m.label(),
            MarkerKind::Extrude(m) => m.label(),
            MarkerKind::Line(m) => m.label(),
        }
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        match self {
            MarkerKind::Poi(m) => m.set_label(label),
            MarkerKind::Html(m) => m.set_label(label),
            MarkerKind::Shape(m) => m.set_label(label),
            MarkerKind::Extrude(m) => m.set_label(label),
            MarkerKind::Line(m) => m.set_label(label),
        }
    }

    pub fn position(&self) -> Vector3 {
        match self {
            MarkerKind::Poi(m) => m.position(),
            MarkerKind::Html(m) => m.position(),
            MarkerKind::Shape(m) => m.position(),
            MarkerKind::Extrude(m) => m.position(),
            MarkerKind::Line(m) => m.position(),
        }
    }

    pub fn set_position(&mut self, position: Vector3) {
        match self {
            MarkerKind::Poi(m) => m.set_position(position),
            MarkerKind::Html(m) => m.set_position(position),
            MarkerKind::Shape(m) => m.set_position(position),
            MarkerKind::Extrude(m) => m.set_position(position),
            MarkerKind::Line(m) => m.set_position(position),
        }
    }
}

/// 可放入 [`MarkerKind`] 的具体标记类型
pub trait MarkerVariant: Sized {
    fn into_kind(self) -> MarkerKind;

    /// 若 `kind` 是本类型则返回其可变引用
    fn from_kind_mut(kind: &mut MarkerKind) -> Option<&mut Self>;
}

macro_rules! impl_marker_variant {
    ($ty:ty, $variant:ident) => {
        impl MarkerVariant for $ty {
            fn into_kind(self) -> MarkerKind {
                MarkerKind::$variant(self)
            }

            fn from_kind_mut(kind: &mut MarkerKind) -> Option<&mut Self> {
                match kind {
                    MarkerKind::$variant(m) => Some(m),
                    _ => None,
                }
            }
        }

        impl From<$ty> for MarkerKind {
            fn from(marker: $ty) -> Self {
                MarkerKind::$variant(marker)
            }
        }
    };
}

impl_marker_variant!(PoiMarker, Poi);
impl_marker_variant!(HtmlMarker, Html);
impl_marker_variant!(ShapeMarker, Shape);
impl_marker_variant!(ExtrudeMarker, Extrude);
impl_marker_variant!(LineMarker, Line);

/// 地图标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// 在所属标记集中唯一的标识
    id: String,

    /// 所属地图的标识
    map: String,

    #[serde(flatten)]
    kind: MarkerKind,
}

impl Marker {
    pub fn new(id: impl Into<String>, map: impl Into<String>, kind: impl Into<MarkerKind>) -> Self {
        Self {
            id: id.into(),
            map: map.into(),
            kind: kind.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn map_id(&self) -> &str {
        &self.map
    }

    pub fn kind(&self) -> &MarkerKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut MarkerKind {
        &mut self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn label(&self) -> &str {
        self.kind.label()
    }

    pub fn position(&self) -> Vector3 {
        self.kind.position()
    }

    /// 计算到指定点（通常是相机）的距离
    pub fn distance_to(&self, point: &Vector3) -> f64 {
        (self.position() - point).norm()
    }
}
