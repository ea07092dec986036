//! 兴趣点标记

use crate::math::{Vector2i, Vector3};
use serde::{Deserialize, Serialize};

/// 默认图标地址（相对于网页根目录）
pub const DEFAULT_ICON: &str = "assets/poi.svg";

/// 默认图标锚点，对齐默认图标底部的尖端
pub const DEFAULT_ANCHOR: Vector2i = Vector2i::new(25, 45);

/// 在某个位置显示图标的兴趣点标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoiMarker {
    label: String,
    position: Vector3,
    /// 点击后显示的详情（HTML），为空时显示标签
    detail: Option<String>,
    icon: String,
    anchor: Vector2i,
}

impl PoiMarker {
    pub fn new(label: impl Into<String>, position: Vector3) -> Self {
        Self {
            label: label.into(),
            position,
            detail: None,
            icon: DEFAULT_ICON.to_string(),
            anchor: DEFAULT_ANCHOR,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// 详情内容，未设置时回退到标签
    pub fn detail(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.label)
    }

    pub fn set_detail(&mut self, detail: Option<String>) {
        self.detail = detail;
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// 图标中对齐到标记位置的像素偏移
    pub fn anchor(&self) -> Vector2i {
        self.anchor
    }

    /// 设置图标地址和锚点
    pub fn set_icon(&mut self, icon: impl Into<String>, anchor: Vector2i) {
        self.icon = icon.into();
        self.anchor = anchor;
    }
}

impl Default for PoiMarker {
    fn default() -> Self {
        Self::new("", Vector3::zeros())
    }
}
