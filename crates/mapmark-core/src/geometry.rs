//! 几何图元定义
//!
//! 标记使用的两种点序列：
//! - 折线 (Line)：2个或更多3D点
//! - 形状 (Shape)：平面上3个或更多2D点
//!
//! 两者创建后不可变。包围盒在首次访问时计算并缓存，
//! 缓存由 `OnceLock` 保护，并发访问只会计算出同一个结果。

use crate::error::GeometryError;
use crate::math::{Aabb, Vector2, Vector3, VectorN};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::OnceLock;

/// 不可变点序列，附带延迟计算的包围盒
#[derive(Debug, Clone)]
struct PointSet<const D: usize> {
    points: Box<[VectorN<D>]>,
    bounds: OnceLock<Aabb<D>>,
}

impl<const D: usize> PointSet<D> {
    fn new(
        kind: &'static str,
        required: usize,
        points: Vec<VectorN<D>>,
    ) -> Result<Self, GeometryError> {
        if points.len() < required {
            return Err(GeometryError::InvalidGeometry {
                kind,
                required,
                actual: points.len(),
            });
        }

        Ok(Self {
            points: points.into_boxed_slice(),
            bounds: OnceLock::new(),
        })
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn get(&self, index: usize) -> Result<VectorN<D>, GeometryError> {
        self.points
            .get(index)
            .copied()
            .ok_or(GeometryError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
    }

    fn bounds(&self) -> &Aabb<D> {
        self.bounds
            .get_or_init(|| match Aabb::from_points(self.points.iter()) {
                Some(bbox) => bbox,
                // 构造时已保证点数不少于最少点数
                None => Aabb::new(VectorN::<D>::zeros(), VectorN::<D>::zeros()),
            })
    }
}

impl<const D: usize> PartialEq for PointSet<D> {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

/// 折线，由2个或更多3D点组成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vector3>", into = "Vec<Vector3>")]
pub struct Line {
    inner: PointSet<3>,
}

impl Line {
    /// 折线的最少点数
    pub const MIN_POINTS: usize = 2;

    pub fn new(points: impl Into<Vec<Vector3>>) -> Result<Self, GeometryError> {
        Ok(Self {
            inner: PointSet::new("line", Self::MIN_POINTS, points.into())?,
        })
    }

    /// 点数量
    pub fn point_count(&self) -> usize {
        self.inner.len()
    }

    /// 获取指定索引的点
    pub fn point(&self, index: usize) -> Result<Vector3, GeometryError> {
        self.inner.get(index)
    }

    /// 获取所有点的副本
    pub fn points(&self) -> Vec<Vector3> {
        self.inner.points.to_vec()
    }

    /// 按顺序遍历所有点
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Vector3> {
        self.inner.points.iter()
    }

    /// 包围盒
    pub fn bounds(&self) -> &Aabb<3> {
        self.inner.bounds()
    }

    /// 包围盒最小角
    pub fn min(&self) -> Vector3 {
        self.bounds().min
    }

    /// 包围盒最大角
    pub fn max(&self) -> Vector3 {
        self.bounds().max
    }

    /// 包围盒中心
    pub fn center(&self) -> Vector3 {
        self.bounds().center()
    }
}

/// 从原点到 (1, 1, 1) 的退化折线，仅作为反序列化时的默认值
impl Default for Line {
    fn default() -> Self {
        Self {
            inner: PointSet {
                points: Box::new([Vector3::zeros(), Vector3::repeat(1.0)]),
                bounds: OnceLock::new(),
            },
        }
    }
}

impl TryFrom<Vec<Vector3>> for Line {
    type Error = GeometryError;

    fn try_from(points: Vec<Vector3>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Line> for Vec<Vector3> {
    fn from(line: Line) -> Self {
        line.inner.points.into_vec()
    }
}

/// 平面形状，由3个或更多2D点组成
///
/// 坐标的 `x` 对应地图的 x 轴，`y` 对应地图的 z 轴。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vector2>", into = "Vec<Vector2>")]
pub struct Shape {
    inner: PointSet<2>,
}

impl Shape {
    /// 形状的最少点数
    pub const MIN_POINTS: usize = 3;

    pub fn new(points: impl Into<Vec<Vector2>>) -> Result<Self, GeometryError> {
        Ok(Self {
            inner: PointSet::new("shape", Self::MIN_POINTS, points.into())?,
        })
    }

    /// 点数量
    pub fn point_count(&self) -> usize {
        self.inner.len()
    }

    /// 获取指定索引的点
    pub fn point(&self, index: usize) -> Result<Vector2, GeometryError> {
        self.inner.get(index)
    }

    /// 获取所有点的副本
    pub fn points(&self) -> Vec<Vector2> {
        self.inner.points.to_vec()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Vector2> {
        self.inner.points.iter()
    }

    pub fn bounds(&self) -> &Aabb<2> {
        self.inner.bounds()
    }

    pub fn min(&self) -> Vector2 {
        self.bounds().min
    }

    pub fn max(&self) -> Vector2 {
        self.bounds().max
    }

    pub fn center(&self) -> Vector2 {
        self.bounds().center()
    }

    /// 创建以两个对角点张成的矩形
    ///
    /// 顶点顺序：最小角、(max.x, min.y)、最大角、(min.x, max.y)。
    pub fn create_rect(corner1: Vector2, corner2: Vector2) -> Self {
        let min = corner1.inf(&corner2);
        let max = corner1.sup(&corner2);

        Self {
            inner: PointSet {
                points: Box::new([
                    min,
                    Vector2::new(max.x, min.y),
                    max,
                    Vector2::new(min.x, max.y),
                ]),
                bounds: OnceLock::new(),
            },
        }
    }

    /// 以标量坐标创建矩形
    pub fn create_rect_xy(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::create_rect(Vector2::new(x1, y1), Vector2::new(x2, y2))
    }

    /// 创建近似圆的正多边形
    ///
    /// 第 `i` 个点位于从纵轴起顺时针 `i * 2π / points` 的角度上，
    /// 即 `center + (sin(a) * r, cos(a) * r)`。
    pub fn create_circle(
        center: Vector2,
        radius: f64,
        points: usize,
    ) -> Result<Self, GeometryError> {
        if points < Self::MIN_POINTS {
            return Err(GeometryError::InvalidGeometry {
                kind: "shape",
                required: Self::MIN_POINTS,
                actual: points,
            });
        }

        let segment_angle = 2.0 * PI / points as f64;
        let mut angle = 0.0_f64;
        let mut vertices = Vec::with_capacity(points);
        for _ in 0..points {
            vertices.push(center + Vector2::new(angle.sin() * radius, angle.cos() * radius));
            angle += segment_angle;
        }

        Self::new(vertices)
    }

    /// 以标量坐标创建圆
    pub fn create_circle_xy(
        center_x: f64,
        center_y: f64,
        radius: f64,
        points: usize,
    ) -> Result<Self, GeometryError> {
        Self::create_circle(Vector2::new(center_x, center_y), radius, points)
    }
}

impl TryFrom<Vec<Vector2>> for Shape {
    type Error = GeometryError;

    fn try_from(points: Vec<Vector2>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Shape> for Vec<Vector2> {
    fn from(shape: Shape) -> Self {
        shape.inner.points.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, vectors_approx_eq};

    #[test]
    fn test_line_requires_two_points() {
        assert_eq!(
            Line::new(Vec::<Vector3>::new()),
            Err(GeometryError::InvalidGeometry {
                kind: "line",
                required: 2,
                actual: 0
            })
        );
        assert!(Line::new(vec![Vector3::new(1.0, 2.0, 3.0)]).is_err());
        assert!(Line::new(vec![Vector3::zeros(), Vector3::repeat(1.0)]).is_ok());
    }

    #[test]
    fn test_shape_requires_three_points() {
        let two = vec![Vector2::zeros(), Vector2::new(1.0, 0.0)];
        assert!(Shape::new(two.clone()).is_err());

        let mut three = two;
        three.push(Vector2::new(0.0, 1.0));
        assert_eq!(Shape::new(three).unwrap().point_count(), 3);
    }

    #[test]
    fn test_line_bounds() {
        let line = Line::new(vec![
            Vector3::new(1.0, -2.0, 3.0),
            Vector3::new(-4.0, 5.0, 0.0),
            Vector3::new(2.0, 0.0, -6.0),
        ])
        .unwrap();

        assert!(vectors_approx_eq(&line.min(), &Vector3::new(-4.0, -2.0, -6.0)));
        assert!(vectors_approx_eq(&line.max(), &Vector3::new(2.0, 5.0, 3.0)));
        // 重复访问结果不变
        assert_eq!(line.min(), line.min());
        assert!(vectors_approx_eq(&line.center(), &Vector3::new(-1.0, 1.5, -1.5)));
    }

    #[test]
    fn test_points_returns_copy() {
        let line = Line::new(vec![Vector3::zeros(), Vector3::new(2.0, 2.0, 2.0)]).unwrap();
        let max_before = line.max();

        let mut copy = line.points();
        copy[1] = Vector3::new(100.0, 100.0, 100.0);
        copy.push(Vector3::new(-100.0, 0.0, 0.0));

        assert_eq!(line.point_count(), 2);
        assert_eq!(line.point(1).unwrap(), Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(line.max(), max_before);
        assert_eq!(line.min(), Vector3::zeros());
    }

    #[test]
    fn test_point_index_out_of_range() {
        let shape = Shape::create_rect_xy(0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            shape.point(4),
            Err(GeometryError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert!(shape.point(3).is_ok());
    }

    #[test]
    fn test_create_rect() {
        let rect = Shape::create_rect(Vector2::new(0.0, 0.0), Vector2::new(2.0, 2.0));
        assert_eq!(
            rect.points(),
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(2.0, 0.0),
                Vector2::new(2.0, 2.0),
                Vector2::new(0.0, 2.0),
            ]
        );

        // 对角点顺序无关
        let swapped = Shape::create_rect_xy(2.0, 0.0, 0.0, 2.0);
        assert_eq!(swapped, rect);
    }

    #[test]
    fn test_create_circle() {
        let circle = Shape::create_circle(Vector2::zeros(), 1.0, 4).unwrap();
        let expected = [
            Vector2::new(0.0, 1.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, -1.0),
            Vector2::new(-1.0, 0.0),
        ];

        assert_eq!(circle.point_count(), 4);
        for (p, e) in circle.iter().zip(expected.iter()) {
            assert!(vectors_approx_eq(p, e), "{p:?} != {e:?}");
        }
    }

    #[test]
    fn test_create_circle_offset_center() {
        let circle = Shape::create_circle_xy(10.0, -5.0, 2.0, 16).unwrap();
        for p in circle.iter() {
            let r = (p - Vector2::new(10.0, -5.0)).norm();
            assert!(approx_eq(r, 2.0));
        }
        assert!(vectors_approx_eq(&circle.center(), &Vector2::new(10.0, -5.0)));
    }

    #[test]
    fn test_create_circle_too_few_points() {
        assert!(Shape::create_circle(Vector2::zeros(), 1.0, 2).is_err());
        assert!(Shape::create_circle(Vector2::zeros(), 1.0, 0).is_err());
    }

    #[test]
    fn test_bounds_concurrent_access() {
        let line = Line::new(
            (0..1000)
                .map(|i| Vector3::new(i as f64, -(i as f64), 0.5))
                .collect::<Vec<_>>(),
        )
        .unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| line.max())).collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), Vector3::new(999.0, 0.0, 0.5));
            }
        });
    }

    #[test]
    fn test_serde_validates_point_count() {
        let json = serde_json::to_string(&Shape::create_rect_xy(0.0, 0.0, 1.0, 1.0)).unwrap();
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back.point_count(), 4);

        let too_short = "[[0.0, 0.0, 0.0]]";
        assert!(serde_json::from_str::<Line>(too_short).is_err());
    }
}
