//! HTML 标记

use crate::math::{Vector2i, Vector3};
use serde::{Deserialize, Serialize};

/// 在某个位置嵌入任意 HTML 内容的标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlMarker {
    label: String,
    position: Vector3,
    html: String,
    anchor: Vector2i,
}

impl HtmlMarker {
    pub fn new(label: impl Into<String>, position: Vector3, html: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            position,
            html: html.into(),
            anchor: Vector2i::zeros(),
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

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    pub fn anchor(&self) -> Vector2i {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Vector2i) {
        self.anchor = anchor;
    }
}

impl Default for HtmlMarker {
    fn default() -> Self {
        Self::new("", Vector3::zeros(), "")
    }
}
