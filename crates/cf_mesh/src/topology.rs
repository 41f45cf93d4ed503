// crates/cf_mesh/src/topology.rs

//! 单元阶次、边界项与面节点模板
//!
//! 定义六面体单元的面节点选择模板。模板是配置数据：每次使用前
//! 均可通过 [`validate_face_templates`] 与参考单元定义核对，
//! 防止表格在演化中被错误修改。
//!
//! # 参考单元约定
//!
//! 六面体局部节点按张量积编号，i 方向最快:
//! `n = i + m*j + m*m*k`，线性单元 m = 2，二次单元 m = 3。
//! 面编号 1..=6 依次为 i-min, i-max, j-min, j-max, k-min, k-max。
//! 面内环绕次序固定为自由轴 (a, b) 上的 (0,0) → (1,0) → (1,1) → (0,1)。

use crate::error::{MeshError, MeshResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// 单元阶次与单元类型
// ============================================================================

/// 单元阶次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementOrder {
    /// 线性单元 (2x2x2 节点六面体)
    Linear,
    /// 二次单元 (3x3x3 节点六面体)
    Quadratic,
}

impl ElementOrder {
    /// 每个方向的节点数
    pub fn nodes_per_dir(&self) -> usize {
        match self {
            Self::Linear => 2,
            Self::Quadratic => 3,
        }
    }

    /// 对应的边界单元类型
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Linear => ElementType::Quad4,
            Self::Quadratic => ElementType::Quad9,
        }
    }

    /// 边界单元节点数
    pub fn node_per_elm(&self) -> usize {
        self.element_type().node_per_elm()
    }
}

impl std::fmt::Display for ElementOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Quadratic => write!(f, "quadratic"),
        }
    }
}

/// 离散格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discretization {
    /// 拉格朗日单元
    Lagrange,
    /// 样条单元
    Spline,
}

/// 边界单元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// 4 节点四边形
    Quad4,
    /// 9 节点四边形
    Quad9,
}

impl ElementType {
    /// 每单元节点数
    pub fn node_per_elm(&self) -> usize {
        match self {
            Self::Quad4 => 4,
            Self::Quad9 => 9,
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quad4 => write!(f, "QUAD4"),
            Self::Quad9 => write!(f, "QUAD9"),
        }
    }
}

// ============================================================================
// 边界项
// ============================================================================

/// 边界项: 命名拓扑集中的一个 (片, 面) 对
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryItem {
    /// 片索引 (0-based)
    pub patch: usize,
    /// 面编号 (1..=6)
    pub face: u8,
}

impl BoundaryItem {
    /// 创建边界项
    pub fn new(patch: usize, face: u8) -> Self {
        Self { patch, face }
    }
}

// ============================================================================
// 面节点模板
// ============================================================================

/// 线性六面体的面节点模板，按面编号 1..=6 索引
pub const FACE_NODES_LINEAR: [[usize; 4]; 6] = [
    [0, 2, 6, 4],
    [1, 3, 7, 5],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 1, 3, 2],
    [4, 5, 7, 6],
];

/// 二次六面体的面节点模板，按面编号 1..=6 索引
///
/// QUAD9 节点次序: 4 个角点、4 个边中点、1 个面心。
pub const FACE_NODES_QUADRATIC: [[usize; 9]; 6] = [
    [0, 6, 24, 18, 3, 15, 21, 9, 12],
    [2, 8, 26, 20, 5, 17, 23, 11, 14],
    [0, 2, 20, 18, 1, 11, 19, 9, 10],
    [6, 8, 26, 24, 7, 17, 25, 15, 16],
    [0, 2, 8, 6, 1, 5, 7, 3, 4],
    [18, 20, 26, 24, 19, 23, 25, 21, 22],
];

/// 查询 (阶次, 面) 对应的面节点模板
///
/// 模板对所有片共享且不可变。
pub fn face_template(order: ElementOrder, face: u8) -> MeshResult<&'static [usize]> {
    if !(1..=6).contains(&face) {
        return Err(MeshError::InvalidFace { face });
    }
    let idx = (face - 1) as usize;
    Ok(match order {
        ElementOrder::Linear => &FACE_NODES_LINEAR[idx],
        ElementOrder::Quadratic => &FACE_NODES_QUADRATIC[idx],
    })
}

/// 自由轴环绕次序: (0,0) → (1,0) → (1,1) → (0,1)，按比例放大
const CORNER_WINDING: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

/// 二次面的边中点次序，接在角点之后
const EDGE_WINDING: [(usize, usize); 4] = [(1, 0), (2, 1), (1, 2), (0, 1)];

/// 从参考单元定义推导 (阶次, 面) 的面节点模板
///
/// 与静态表无关的独立推导，用于校验表格数据。
pub fn reference_face_template(order: ElementOrder, face: u8) -> MeshResult<Vec<usize>> {
    if !(1..=6).contains(&face) {
        return Err(MeshError::InvalidFace { face });
    }

    let m = order.nodes_per_dir();
    let stride = [1, m, m * m];
    let fixed = ((face - 1) / 2) as usize;
    let side = ((face - 1) % 2) as usize;
    let (a, b) = match fixed {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };
    let base = side * (m - 1) * stride[fixed];
    let scale = m - 1;

    let mut template = Vec::with_capacity(order.node_per_elm());
    for (va, vb) in CORNER_WINDING {
        template.push(base + va * scale * stride[a] + vb * scale * stride[b]);
    }
    if order == ElementOrder::Quadratic {
        for (va, vb) in EDGE_WINDING {
            template.push(base + va * stride[a] + vb * stride[b]);
        }
        template.push(base + stride[a] + stride[b]);
    }
    Ok(template)
}

/// 校验静态模板表与参考单元定义一致
///
/// 检查每一行与推导结果逐项相等，并且行内无重复节点。
pub fn validate_face_templates() -> MeshResult<()> {
    for order in [ElementOrder::Linear, ElementOrder::Quadratic] {
        for face in 1..=6u8 {
            let table = face_template(order, face)?;
            let derived = reference_face_template(order, face)?;
            if table != derived.as_slice() {
                return Err(MeshError::invalid_template(
                    face,
                    format!("{} 模板 {:?} 与参考定义 {:?} 不一致", order, table, derived),
                ));
            }
            let mut seen = table.to_vec();
            seen.sort_unstable();
            seen.dedup();
            if seen.len() != table.len() {
                return Err(MeshError::invalid_template(face, "模板内存在重复节点"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_match_reference() {
        assert!(validate_face_templates().is_ok());
    }

    #[test]
    fn test_face_template_lookup() {
        let t = face_template(ElementOrder::Linear, 1).unwrap();
        assert_eq!(t, &[0, 2, 6, 4]);

        let t = face_template(ElementOrder::Quadratic, 6).unwrap();
        assert_eq!(t, &[18, 20, 26, 24, 19, 23, 25, 21, 22]);
    }

    #[test]
    fn test_invalid_face_rejected() {
        assert!(face_template(ElementOrder::Linear, 0).is_err());
        assert!(face_template(ElementOrder::Linear, 7).is_err());
        assert!(reference_face_template(ElementOrder::Quadratic, 9).is_err());
    }

    #[test]
    fn test_template_nodes_in_range() {
        // 所有模板索引必须落在参考单元节点范围内
        for face in 1..=6u8 {
            for &n in face_template(ElementOrder::Linear, face).unwrap() {
                assert!(n < 8);
            }
            for &n in face_template(ElementOrder::Quadratic, face).unwrap() {
                assert!(n < 27);
            }
        }
    }

    #[test]
    fn test_element_type_properties() {
        assert_eq!(ElementOrder::Linear.node_per_elm(), 4);
        assert_eq!(ElementOrder::Quadratic.node_per_elm(), 9);
        assert_eq!(ElementOrder::Linear.element_type(), ElementType::Quad4);
        assert_eq!(ElementOrder::Quadratic.element_type(), ElementType::Quad9);
        assert_eq!(ElementType::Quad9.to_string(), "QUAD9");
    }

    #[test]
    fn test_inconsistent_table_detected() {
        // 人为构造重复行（面 5-6 使用同一模板）应被参考定义校验捕获
        let bogus = [0usize, 1, 3, 2];
        let derived = reference_face_template(ElementOrder::Linear, 6).unwrap();
        assert_ne!(bogus.as_slice(), derived.as_slice());
    }
}
