//! 折线标记

use crate::geometry::Line;
use crate::math::Vector3;
use crate::properties::{Color, DEFAULT_LINE_COLOR, DEFAULT_LINE_WIDTH};
use serde::{Deserialize, Serialize};

/// 沿 [`Line`] 绘制的标记
///
/// 通过 [`LineMarker::new`] 创建时位置取折线包围盒中心；
/// 之后调用 [`LineMarker::set_line`] 不会移动位置，需要时手动调用
/// [`LineMarker::center_position`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineMarker {
    label: String,
    position: Vector3,
    line: Line,
    depth_test: bool,
    line_width: u32,
    line_color: Color,
}

impl LineMarker {
    /// 创建折线标记，位置为折线包围盒的中心
    pub fn new(label: impl Into<String>, line: Line) -> Self {
        let position = line.center();
        Self::with_position(label, position, line)
    }

    /// 创建折线标记，位置由调用者指定（仅用于排序等，例如与相机的距离）
    pub fn with_position(label: impl Into<String>, position: Vector3, line: Line) -> Self {
        Self {
            label: label.into(),
            position,
            line,
            depth_test: true,
            line_width: DEFAULT_LINE_WIDTH,
            line_color: DEFAULT_LINE_COLOR,
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

    pub fn line(&self) -> &Line {
        &self.line
    }

    /// 替换折线，不会更新位置
    pub fn set_line(&mut self, line: Line) {
        self.line = line;
    }

    /// 将位置设为当前折线包围盒的中心
    pub fn center_position(&mut self) {
        self.position = self.line.center();
    }

    /// 关闭深度测试后，标记会透过地图上的所有物体显示
    pub fn is_depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    pub fn set_depth_test_enabled(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    /// 线宽（像素）
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
}

/// 反序列化用的默认值，等价于 `LineMarker::new("", Line::default())`
impl Default for LineMarker {
    fn default() -> Self {
        Self::new("", Line::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vectors_approx_eq;

    fn line(a: [f64; 3], b: [f64; 3]) -> Line {
        Line::new(vec![Vector3::from(a), Vector3::from(b)]).unwrap()
    }

    #[test]
    fn test_defaults() {
        let marker = LineMarker::new("L", line([0.0, 0.0, 0.0], [4.0, 2.0, -2.0]));

        assert_eq!(marker.label(), "L");
        assert!(marker.is_depth_test_enabled());
        assert_eq!(marker.line_width(), 2);
        assert_eq!(marker.line_color(), Color::new(255, 0, 0, 1.0));
        assert!(vectors_approx_eq(&marker.position(), &Vector3::new(2.0, 1.0, -1.0)));
    }

    #[test]
    fn test_set_line_keeps_position() {
        let mut marker = LineMarker::new("L", line([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]));
        let before = marker.position();

        marker.set_line(line([10.0, 10.0, 10.0], [20.0, 30.0, 40.0]));
        assert_eq!(marker.position(), before);

        marker.center_position();
        assert!(vectors_approx_eq(&marker.position(), &Vector3::new(15.0, 20.0, 25.0)));
    }

    #[test]
    fn test_explicit_position() {
        let pos = Vector3::new(-7.0, 64.0, 3.0);
        let marker = LineMarker::with_position("L", pos, line([0.0; 3], [1.0; 3]));
        assert_eq!(marker.position(), pos);
    }

    #[test]
    fn test_default_matches_degenerate_line() {
        let marker = LineMarker::default();
        assert_eq!(marker, LineMarker::new("", Line::default()));
        assert!(vectors_approx_eq(&marker.position(), &Vector3::repeat(0.5)));
    }
}
