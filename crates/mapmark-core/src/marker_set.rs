//! 标记集
//!
//! 标记集是网页端按组显示的一批标记，每个标记集有唯一的ID。
//! 所有 `create_*` 方法都是"创建或替换"语义：已存在同ID的标记时会被新标记替换。
//!
//! 修改操作都需要 `&mut self`，因此读者永远看不到替换到一半的状态；
//! 跨线程共享时放在 `RwLock` 中即可。

use crate::geometry::{Line, Shape};
use crate::marker::{
    ExtrudeMarker, HtmlMarker, LineMarker, Marker, MarkerVariant, PoiMarker, ShapeMarker,
};
use crate::math::Vector3;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// 标记集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSet {
    id: String,

    /// 网页端开关按钮上显示的名称
    label: String,

    /// 是否在网页端提供开关按钮
    toggleable: bool,

    /// 开关按钮的初始状态，为 `true` 时标记默认隐藏
    default_hidden: bool,

    #[serde(deserialize_with = "deserialize_markers")]
    markers: HashMap<String, Marker>,
}

/// 反序列化标记表，键必须与标记自身的ID一致
fn deserialize_markers<'de, D>(deserializer: D) -> Result<HashMap<String, Marker>, D::Error>
where
    D: Deserializer<'de>,
{
    let markers = HashMap::<String, Marker>::deserialize(deserializer)?;
    if let Some((key, marker)) = markers.iter().find(|(key, marker)| key.as_str() != marker.id()) {
        return Err(de::Error::custom(format!(
            "marker key '{key}' does not match marker id '{}'",
            marker.id()
        )));
    }
    Ok(markers)
}

impl MarkerSet {
    /// 创建空标记集，标签默认与ID相同
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            toggleable: true,
            default_hidden: false,
            markers: HashMap::new(),
        }
    }

    /// 设置标签
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn is_toggleable(&self) -> bool {
        self.toggleable
    }

    pub fn set_toggleable(&mut self, toggleable: bool) {
        self.toggleable = toggleable;
    }

    pub fn is_default_hidden(&self) -> bool {
        self.default_hidden
    }

    #[deprecated(note = "misspelled, use `is_default_hidden`")]
    pub fn is_defaut_hidden(&self) -> bool {
        self.is_default_hidden()
    }

    pub fn set_default_hidden(&mut self, default_hidden: bool) {
        self.default_hidden = default_hidden;
    }

    /// 所有标记（只读）
    pub fn markers(&self) -> impl ExactSizeIterator<Item = &Marker> {
        self.markers.values()
    }

    /// 标记数量
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// 获取标记
    pub fn get_marker(&self, id: &str) -> Option<&Marker> {
        self.markers.get(id)
    }

    /// 获取标记（可变）
    pub fn get_marker_mut(&mut self, id: &str) -> Option<&mut Marker> {
        self.markers.get_mut(id)
    }

    /// 插入标记，替换同ID的旧标记并返回旧标记
    pub fn put_marker(&mut self, marker: Marker) -> Option<Marker> {
        self.markers.insert(marker.id().to_string(), marker)
    }

    /// 创建或替换标记，返回新标记的具体类型
    fn insert_variant<T: MarkerVariant>(&mut self, id: &str, map: &str, variant: T) -> &mut T {
        let marker = Marker::new(id, map, variant.into_kind());
        let slot = self.markers.entry(id.to_string()).insert_entry(marker).into_mut();

        match T::from_kind_mut(slot.kind_mut()) {
            Some(variant) => variant,
            None => unreachable!("marker kind changed during insertion"),
        }
    }

    /// 创建兴趣点标记
    pub fn create_poi_marker(&mut self, id: &str, map: &str, position: Vector3) -> &mut PoiMarker {
        let label = id.to_string();
        self.insert_variant(id, map, PoiMarker::new(label, position))
    }

    /// 以标量坐标创建兴趣点标记
    pub fn create_poi_marker_at(
        &mut self,
        id: &str,
        map: &str,
        x: f64,
        y: f64,
        z: f64,
    ) -> &mut PoiMarker {
        self.create_poi_marker(id, map, Vector3::new(x, y, z))
    }

    /// 创建HTML标记
    pub fn create_html_marker(
        &mut self,
        id: &str,
        map: &str,
        position: Vector3,
        html: impl Into<String>,
    ) -> &mut HtmlMarker {
        let label = id.to_string();
        self.insert_variant(id, map, HtmlMarker::new(label, position, html))
    }

    pub fn create_html_marker_at(
        &mut self,
        id: &str,
        map: &str,
        x: f64,
        y: f64,
        z: f64,
        html: impl Into<String>,
    ) -> &mut HtmlMarker {
        self.create_html_marker(id, map, Vector3::new(x, y, z), html)
    }

    /// 创建形状标记，位置由调用者指定
    pub fn create_shape_marker(
        &mut self,
        id: &str,
        map: &str,
        position: Vector3,
        shape: Shape,
        shape_y: f32,
    ) -> &mut ShapeMarker {
        let label = id.to_string();
        self.insert_variant(
            id,
            map,
            ShapeMarker::with_position(label, position, shape, shape_y),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_shape_marker_at(
        &mut self,
        id: &str,
        map: &str,
        x: f64,
        y: f64,
        z: f64,
        shape: Shape,
        shape_y: f32,
    ) -> &mut ShapeMarker {
        self.create_shape_marker(id, map, Vector3::new(x, y, z), shape, shape_y)
    }

    /// 创建形状标记，位置为形状包围盒中心
    pub fn create_shape_marker_centered(
        &mut self,
        id: &str,
        map: &str,
        shape: Shape,
        shape_y: f32,
    ) -> &mut ShapeMarker {
        let label = id.to_string();
        self.insert_variant(id, map, ShapeMarker::new(label, shape, shape_y))
    }

    /// 创建拉伸体标记，位置由调用者指定
    pub fn create_extrude_marker(
        &mut self,
        id: &str,
        map: &str,
        position: Vector3,
        shape: Shape,
        min_y: f32,
        max_y: f32,
    ) -> &mut ExtrudeMarker {
        let label = id.to_string();
        self.insert_variant(
            id,
            map,
            ExtrudeMarker::with_position(label, position, shape, min_y, max_y),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_extrude_marker_at(
        &mut self,
        id: &str,
        map: &str,
        x: f64,
        y: f64,
        z: f64,
        shape: Shape,
        min_y: f32,
        max_y: f32,
    ) -> &mut ExtrudeMarker {
        self.create_extrude_marker(id, map, Vector3::new(x, y, z), shape, min_y, max_y)
    }

    /// 创建拉伸体标记，位置为形状中心，高度取 `(min_y + max_y) / 2`
    pub fn create_extrude_marker_centered(
        &mut self,
        id: &str,
        map: &str,
        shape: Shape,
        min_y: f32,
        max_y: f32,
    ) -> &mut ExtrudeMarker {
        let label = id.to_string();
        self.insert_variant(id, map, ExtrudeMarker::new(label, shape, min_y, max_y))
    }

    /// 创建折线标记，位置由调用者指定
    pub fn create_line_marker(
        &mut self,
        id: &str,
        map: &str,
        position: Vector3,
        line: Line,
    ) -> &mut LineMarker {
        let label = id.to_string();
        self.insert_variant(id, map, LineMarker::with_position(label, position, line))
    }

    pub fn create_line_marker_at(
        &mut self,
        id: &str,
        map: &str,
        x: f64,
        y: f64,
        z: f64,
        line: Line,
    ) -> &mut LineMarker {
        self.create_line_marker(id, map, Vector3::new(x, y, z), line)
    }

    /// 创建折线标记，位置为折线包围盒中心
    pub fn create_line_marker_centered(&mut self, id: &str, map: &str, line: Line) -> &mut LineMarker {
        let label = id.to_string();
        self.insert_variant(id, map, LineMarker::new(label, line))
    }

    /// 删除标记
    ///
    /// 返回 `false` 表示不存在该ID的标记。
    pub fn remove_marker(&mut self, id: &str) -> bool {
        self.markers.remove(id).is_some()
    }

    /// 删除给定标记，等价于 `remove_marker(marker.id())`
    pub fn remove(&mut self, marker: &Marker) -> bool {
        self.remove_marker(marker.id())
    }

    /// 删除所有标记
    pub fn clear(&mut self) {
        self.markers.clear();
    }
}
