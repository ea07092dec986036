//! 平面形状标记

use crate::geometry::Shape;
use crate::math::Vector3;
use crate::properties::{Color, DEFAULT_FILL_COLOR, DEFAULT_LINE_COLOR, DEFAULT_LINE_WIDTH};
use serde::{Deserialize, Serialize};

/// 在高度 `shape_y` 处绘制的平面 [`Shape`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeMarker {
    label: String,
    position: Vector3,
    shape: Shape,
    shape_y: f32,
    depth_test: bool,
    line_width: u32,
    line_color: Color,
    fill_color: Color,
}

impl ShapeMarker {
    /// 创建形状标记，位置为形状包围盒中心，高度为 `shape_y`
    pub fn new(label: impl Into<String>, shape: Shape, shape_y: f32) -> Self {
        let position = shape_center(&shape, shape_y);
        Self::with_position(label, position, shape, shape_y)
    }

    pub fn with_position(
        label: impl Into<String>,
        position: Vector3,
        shape: Shape,
        shape_y: f32,
    ) -> Self {
        Self {
            label: label.into(),
            position,
            shape,
            shape_y,
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

    pub fn shape_y(&self) -> f32 {
        self.shape_y
    }

    /// 替换形状和高度，不会更新位置
    pub fn set_shape(&mut self, shape: Shape, shape_y: f32) {
        self.shape = shape;
        self.shape_y = shape_y;
    }

    /// 将位置设为当前形状包围盒的中心
    pub fn center_position(&mut self) {
        self.position = shape_center(&self.shape, self.shape_y);
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

    /// 同时设置线色和填充色
    pub fn set_colors(&mut self, line_color: Color, fill_color: Color) {
        self.line_color = line_color;
        self.fill_color = fill_color;
    }
}

impl Default for ShapeMarker {
    fn default() -> Self {
        Self::new("", Shape::create_rect_xy(0.0, 0.0, 1.0, 1.0), 0.0)
    }
}

/// 形状包围盒中心，平面坐标 (x, y) 映射到世界坐标 (x, height, z)
pub(crate) fn shape_center(shape: &Shape, height: f32) -> Vector3 {
    let center = shape.center();
    Vector3::new(center.x, height as f64, center.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vectors_approx_eq;

    #[test]
    fn test_position_from_shape() {
        let marker = ShapeMarker::new("area", Shape::create_rect_xy(0.0, 0.0, 10.0, 20.0), 64.0);
        assert!(vectors_approx_eq(&marker.position(), &Vector3::new(5.0, 64.0, 10.0)));
        assert_eq!(marker.fill_color(), Color::new(200, 0, 0, 0.3));
    }

    #[test]
    fn test_set_shape_then_recenter() {
        let mut marker = ShapeMarker::new("area", Shape::create_rect_xy(0.0, 0.0, 2.0, 2.0), 0.0);
        marker.set_shape(Shape::create_rect_xy(10.0, 10.0, 12.0, 12.0), 5.0);
        assert!(vectors_approx_eq(&marker.position(), &Vector3::new(1.0, 0.0, 1.0)));

        marker.center_position();
        assert!(vectors_approx_eq(&marker.position(), &Vector3::new(11.0, 5.0, 11.0)));
    }
}
