// crates/cf_mesh/src/geometry.rs

//! 基础几何类型
//!
//! 提供项目统一的 3D 点类型，用于节点坐标和节点力向量。

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// 3D点 - 项目统一几何类型
///
/// 用于存储节点位置和节点力等 3D 数据。
///
/// # 示例
///
/// ```
/// use cf_mesh::geometry::Point3D;
///
/// let p1 = Point3D::new(1.0, 2.0, 3.0);
/// let p2 = Point3D::new(4.0, 5.0, 6.0);
///
/// let sum = p1 + p2;
/// let dot = p1.dot(&p2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    /// X坐标
    pub x: f64,
    /// Y坐标
    pub y: f64,
    /// Z坐标
    pub z: f64,
}

impl Point3D {
    /// 零点常量
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// 创建新的3D点
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 从数组创建
    pub fn from_array(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// 转换为数组
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// 点积
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// 模长
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// 到另一点的欧几里得距离
    pub fn distance_to(&self, other: &Self) -> f64 {
        (*other - *self).norm()
    }
}

impl Add for Point3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Point3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ops() {
        let p1 = Point3D::new(1.0, 2.0, 3.0);
        let p2 = Point3D::new(4.0, 5.0, 6.0);

        assert_eq!(p1 + p2, Point3D::new(5.0, 7.0, 9.0));
        assert_eq!(p2 - p1, Point3D::new(3.0, 3.0, 3.0));
        assert_eq!(p1 * 2.0, Point3D::new(2.0, 4.0, 6.0));
        assert_eq!(-p1, Point3D::new(-1.0, -2.0, -3.0));
        assert_eq!(p1.dot(&p2), 32.0);
    }

    #[test]
    fn test_distance() {
        let p1 = Point3D::new(0.0, 0.0, 0.0);
        let p2 = Point3D::new(3.0, 4.0, 0.0);
        assert_eq!(p1.distance_to(&p2), 5.0);
    }

    #[test]
    fn test_array_roundtrip() {
        let p = Point3D::new(1.0, 2.0, 3.0);
        assert_eq!(Point3D::from_array(p.to_array()), p);
    }
}
