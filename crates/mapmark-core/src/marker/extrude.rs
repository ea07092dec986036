//! 拉伸体标记

use crate::geometry::Shape;
use crate::math::Vector3;
use crate::properties::{Color, DEFAULT_FILL_COLOR, DEFAULT_LINE_COLOR, DEFAULT_LINE_WIDTH};
use serde::{Deserialize, Serialize};

use super::shape::shape_center;

/// 将平面 [`Shape`] 从 `shape_min_y` 拉伸到 `shape_max_y` 的立体标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtrudeMarker {
    label: String,
    position: Vector3,
    shape: Shape,
    shape_min_y: f32,
    shape_max_y: f32,
    depth_test: bool,
    line_width: u32,
    line_color: Color,
    fill_color: Color,
}

impl ExtrudeMarker {
    /// 创建拉伸体标记，位置为形状中心，高度取 `(min_y + max_y) / 2`
    pub fn new(label: impl Into<String>, shape: Shape, min_y: f32, max_y: f32) -> Self {
        let position = shape_center(&shape, (min_y + max_y) / 2.0);
        Self::with_position(label, position, shape, min_y, max_y)
    }

    pub fn with_position(
        label: impl Into<String>,
        position: Vector3,
        shape: Shape,
        min_y: f32,
        max_y: f32,
    ) -> Self {
        Self {
            label: label.into(),
            position,
            shape,
            shape_min_y: min_y,
            shape_max_y: max_y,
            depth_test: true,
            line_width: DEFAULT_LINE_WIDTH,
            line_color: DEFAULT_LINE_COLOR,
            fill_color: DEFAULT_FILL_COLOR,
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

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_min_y(&self) -> f32 {
        self.shape_min_y
    }

    pub fn shape_max_y(&self) -> f32 {
        self.shape_max_y
    }

    /// 替换形状和高度范围，不会更新位置
    pub fn set_shape(&mut self, shape: Shape, min_y: f32, max_y: f32) {
        self.shape = shape;
        self.shape_min_y = min_y;
        self.shape_max_y = max_y;
    }

    pub fn center_position(&mut self) {
        let y = (self.shape_min_y + self.shape_max_y) / 2.0;
        self.position = shape_center(&self.shape, y);
    }

    pub fn is_depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    pub fn set_depth_test_enabled(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, width: u32) {
        self.line_width = width;
    }

    pub fn line_color(&self) -> Color {
        self.line_color
    }

    pub fn set_line_color(&mut self, color: Color) {
        self.line_color = color;
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }
}

impl Default for ExtrudeMarker {
    fn default() -> Self {
        Self::new("", Shape::create_rect_xy(0.0, 0.0, 1.0, 1.0), 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vectors_approx_eq;

    #[test]
    fn test_center_uses_mid_height() {
        let marker = ExtrudeMarker::new("tower", Shape::create_rect_xy(-4.0, -4.0, 4.0, 4.0), 60.0, 100.0);
        assert!(vectors_approx_eq(&marker.position(), &Vector3::new(0.0, 80.0, 0.0)));
        assert_eq!(marker.shape_min_y(), 60.0);
        assert_eq!(marker.shape_max_y(), 100.0);
    }
}
