// crates/cf_mesh/src/interface.rs

//! 接口网格提取
//!
//! 将命名边界集（若干 (片, 面) 对）提取为耦合协议所需的扁平化
//! 网格描述：去重节点表、坐标表、连接表以及边界单元溯源表。
//!
//! # 输出次序契约
//!
//! - `nodes` 按全局节点编号严格升序（与插入次序无关），
//!   保证同一集合两次提取结果逐字节一致
//! - `elms` 按边界项枚举次序、项内按单元编号升序拼接
//! - `origin_elements` 与 `elms` 中的边界单元一一对应
//!
//! # 生命周期
//!
//! 接口网格在耦合定义时构建一次，之后只读；拓扑变化
//! （如自适应重划分）需要重新构建。

use crate::error::{MeshError, MeshResult};
use crate::topology::{face_template, Discretization, ElementOrder, ElementType};
use crate::traits::StructuralMesh;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// InterfaceMesh - 耦合边界面描述
// ============================================================================

/// 耦合边界面的扁平化网格描述
///
/// 字段以协议层要求的连续数组形式存储，在耦合定义时原样移交。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceMesh {
    /// 接口上的全局节点编号，严格升序且无重复
    pub nodes: Vec<usize>,
    /// 节点坐标 (x, y, z) 交错存储，长度 `3 * nodes.len()`
    pub coords: Vec<f64>,
    /// 边界单元连接表，每单元 `node_per_elm` 个全局节点编号
    pub elms: Vec<usize>,
    /// 每个边界单元的溯源 (体单元编号, 面编号)
    pub origin_elements: Vec<(usize, u8)>,
    /// 边界单元类型，整个接口统一
    pub element_type: ElementType,
    /// 每单元节点数
    pub node_per_elm: usize,
}

impl InterfaceMesh {
    /// 边界单元数
    pub fn n_elements(&self) -> usize {
        self.origin_elements.len()
    }

    /// 接口节点数
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// 查找 (体单元, 面) 对应的边界单元序号
    ///
    /// 点落在未耦合的边界面上时返回 `None`，调用方应按零值处理，
    /// 而不是视为错误。
    pub fn locate(&self, element: usize, face: u8) -> Option<usize> {
        self.origin_elements
            .iter()
            .position(|&(e, f)| e == element && f == face)
    }

    /// 校验结构不变量
    pub fn validate(&self) -> MeshResult<()> {
        if self.coords.len() != 3 * self.nodes.len() {
            return Err(MeshError::invalid_topology(
                "interface_mesh",
                format!(
                    "coords 长度 {} != 3 * nodes ({})",
                    self.coords.len(),
                    3 * self.nodes.len()
                ),
            ));
        }
        if self.elms.len() != self.node_per_elm * self.origin_elements.len() {
            return Err(MeshError::invalid_topology(
                "interface_mesh",
                format!(
                    "elms 长度 {} != node_per_elm * 单元数 ({})",
                    self.elms.len(),
                    self.node_per_elm * self.origin_elements.len()
                ),
            ));
        }
        if self.node_per_elm != self.element_type.node_per_elm() {
            return Err(MeshError::invalid_topology(
                "interface_mesh",
                format!(
                    "node_per_elm {} 与单元类型 {} 不一致",
                    self.node_per_elm, self.element_type
                ),
            ));
        }
        if !self.nodes.windows(2).all(|w| w[0] < w[1]) {
            return Err(MeshError::invalid_topology(
                "interface_mesh",
                "nodes 未按全局编号严格升序",
            ));
        }
        // 连接表引用的节点必须在节点表内
        for &n in &self.elms {
            if self.nodes.binary_search(&n).is_err() {
                return Err(MeshError::invalid_topology(
                    "interface_mesh",
                    format!("连接表引用的节点 {} 不在节点表内", n),
                ));
            }
        }
        Ok(())
    }

    /// 格式化网格描述（节点与单元清单）
    pub fn summary(&self) -> String {
        use std::fmt::Write;

        let mut out = format!(
            "InterfaceMesh: nnod = {} nelms = {}",
            self.nodes.len(),
            self.n_elements()
        );
        out.push_str("\n== Nodes ==");
        for (i, &node) in self.nodes.iter().enumerate() {
            let _ = write!(
                out,
                "\n\t{}: {} {} {}",
                node,
                self.coords[3 * i],
                self.coords[3 * i + 1],
                self.coords[3 * i + 2]
            );
        }
        out.push_str("\n== Elements ==");
        for (i, &(elm, face)) in self.origin_elements.iter().enumerate() {
            let conn = &self.elms[i * self.node_per_elm..(i + 1) * self.node_per_elm];
            let _ = write!(out, "\n\t{} -> ({},{}):", i, elm, face);
            for n in conn {
                let _ = write!(out, " {}", n);
            }
        }
        out
    }
}

impl std::fmt::Display for InterfaceMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

// ============================================================================
// 提取算法
// ============================================================================

/// 确定并校验边界集的统一单元阶次，集合须非空
fn resolve_order(
    set_name: &str,
    items: &[crate::topology::BoundaryItem],
    mesh: &impl StructuralMesh,
) -> MeshResult<ElementOrder> {
    let order = mesh.element_order(items[0].patch)?;
    for item in items {
        let patch_order = mesh.element_order(item.patch)?;
        if patch_order != order {
            return Err(MeshError::unsupported_order(format!(
                "边界集 {} 内单元阶次不一致: {} 与 {}",
                set_name, order, patch_order
            )));
        }
        if patch_order == ElementOrder::Quadratic
            && mesh.discretization(item.patch)? != Discretization::Lagrange
        {
            return Err(MeshError::unsupported_order(
                "二次单元仅支持拉格朗日离散",
            ));
        }
    }
    Ok(order)
}

/// 提取命名边界集的接口网格
///
/// # 算法
///
/// 1. 按集合枚举次序遍历每个 (片, 面) 边界项
/// 2. 枚举面上的边界单元（按单元编号升序），用面节点模板从
///    单元节点表中选出边界单元连接，并登记溯源
/// 3. 节点经有序集合去重后按全局编号升序输出，再查坐标
///
/// # 错误
///
/// - [`MeshError::UnknownSet`]: 集合未注册
/// - [`MeshError::EmptySet`]: 集合为空。空集不产生空网格：
///   残缺的接口拓扑会悄悄破坏后续每一轮交换，必须在耦合
///   建立阶段就中止
/// - [`MeshError::UnsupportedOrder`]: 阶次混合或二次非拉格朗日
pub fn build_interface_mesh(
    set_name: &str,
    mesh: &impl StructuralMesh,
) -> MeshResult<InterfaceMesh> {
    let items = mesh
        .boundary_set(set_name)
        .ok_or_else(|| MeshError::unknown_set(set_name))?;
    if items.is_empty() {
        return Err(MeshError::empty_set(set_name));
    }

    let order = resolve_order(set_name, items, mesh)?;
    let node_per_elm = order.node_per_elm();

    let mut elms = Vec::new();
    let mut origin_elements = Vec::new();
    let mut node_set = BTreeSet::new();

    for item in items {
        let template = face_template(order, item.face)?;
        for elm in mesh.boundary_elements(item.patch, item.face)? {
            let elm_nodes = mesh.element_nodes(item.patch, elm)?;
            for &idx in template {
                let node = *elm_nodes.get(idx).ok_or_else(|| {
                    MeshError::index_out_of_bounds("LocalNode", idx, elm_nodes.len())
                })?;
                elms.push(node);
                node_set.insert(node);
            }
            origin_elements.push((elm, item.face));
        }
    }

    let nodes: Vec<usize> = node_set.into_iter().collect();
    let mut coords = Vec::with_capacity(3 * nodes.len());
    for &node in &nodes {
        let c = mesh.node_coordinate(node)?;
        coords.push(c.x);
        coords.push(c.y);
        coords.push(c.z);
    }

    let result = InterfaceMesh {
        nodes,
        coords,
        elms,
        origin_elements,
        element_type: order.element_type(),
        node_per_elm,
    };

    log::debug!("{}", result);
    log::info!(
        "边界集 {} 提取完成: {} 节点, {} 个 {} 单元",
        set_name,
        result.n_nodes(),
        result.n_elements(),
        result.element_type
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{FeModel, HexPatch};
    use crate::topology::BoundaryItem;

    fn single_patch_model(n: usize, order: ElementOrder) -> FeModel {
        let mut model = FeModel::new();
        let patch = HexPatch::unit_cube(n, n, n, order, Discretization::Lagrange).unwrap();
        let pid = model.add_patch(patch);
        model
            .register_set("Face1", vec![BoundaryItem::new(pid, 1)])
            .unwrap();
        model
    }

    #[test]
    fn test_face1_linear_reference() {
        // 单片 2x2x2 线性单元网格，面 1 位于 x = 0 平面
        let model = single_patch_model(2, ElementOrder::Linear);
        let info = build_interface_mesh("Face1", &model).unwrap();

        assert_eq!(info.element_type, ElementType::Quad4);
        assert_eq!(info.node_per_elm, 4);
        assert_eq!(info.nodes, vec![0, 3, 6, 9, 12, 15, 18, 21, 24]);
        assert_eq!(
            info.elms,
            vec![0, 3, 12, 9, 3, 6, 15, 12, 9, 12, 21, 18, 12, 15, 24, 21]
        );
        assert_eq!(
            info.origin_elements,
            vec![(0, 1), (2, 1), (4, 1), (6, 1)]
        );

        let expected_coords = vec![
            0.0, 0.0, 0.0, //
            0.0, 0.5, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 0.5, //
            0.0, 0.5, 0.5, //
            0.0, 1.0, 0.5, //
            0.0, 0.0, 1.0, //
            0.0, 0.5, 1.0, //
            0.0, 1.0, 1.0,
        ];
        assert_eq!(info.coords, expected_coords);
        info.validate().unwrap();
    }

    #[test]
    fn test_invariants_all_faces() {
        let mut model = FeModel::new();
        let patch =
            HexPatch::unit_cube(2, 2, 2, ElementOrder::Linear, Discretization::Lagrange).unwrap();
        let pid = model.add_patch(patch);
        model
            .register_set(
                "all",
                (1..=6).map(|f| BoundaryItem::new(pid, f)).collect(),
            )
            .unwrap();

        let info = build_interface_mesh("all", &model).unwrap();
        info.validate().unwrap();

        // 6 个面各 4 个边界单元
        assert_eq!(info.n_elements(), 24);
        assert_eq!(info.elms.len(), 4 * info.n_elements());
        // 立方体表面节点 = 全部 27 节点减去体心
        assert_eq!(info.nodes.len(), 26);
        assert!(!info.nodes.contains(&13));
        // 去重律: 严格升序
        assert!(info.nodes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_shared_edge_deduplicated() {
        // 面 1 与面 5 共享一条边，共享节点只出现一次
        let mut model = FeModel::new();
        let patch =
            HexPatch::unit_cube(2, 2, 2, ElementOrder::Linear, Discretization::Lagrange).unwrap();
        let pid = model.add_patch(patch);
        model
            .register_set(
                "two",
                vec![BoundaryItem::new(pid, 1), BoundaryItem::new(pid, 5)],
            )
            .unwrap();

        let info = build_interface_mesh("two", &model).unwrap();
        // 面 1: 9 节点 {0,3,..,24}, 面 5: 9 节点 {0..8}, 共享 {0,3,6}
        assert_eq!(info.nodes.len(), 15);
        assert_eq!(info.n_elements(), 8);
        info.validate().unwrap();
    }

    #[test]
    fn test_quadratic_face() {
        let model = single_patch_model(1, ElementOrder::Quadratic);
        let info = build_interface_mesh("Face1", &model).unwrap();

        assert_eq!(info.element_type, ElementType::Quad9);
        assert_eq!(info.node_per_elm, 9);
        assert_eq!(info.n_elements(), 1);
        // 单元节点编号即网格编号，面 1 模板直接给出连接
        assert_eq!(info.elms, vec![0, 6, 24, 18, 3, 15, 21, 9, 12]);
        assert_eq!(info.nodes, vec![0, 3, 6, 9, 12, 15, 18, 21, 24]);
        // 面 1 上所有节点 x = 0
        for i in 0..info.nodes.len() {
            assert_eq!(info.coords[3 * i], 0.0);
        }
        info.validate().unwrap();
    }

    #[test]
    fn test_quadratic_requires_lagrange() {
        let mut model = FeModel::new();
        let patch =
            HexPatch::unit_cube(1, 1, 1, ElementOrder::Quadratic, Discretization::Spline)
                .unwrap();
        let pid = model.add_patch(patch);
        model
            .register_set("s", vec![BoundaryItem::new(pid, 1)])
            .unwrap();

        let err = build_interface_mesh("s", &model).unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedOrder { .. }));
    }

    #[test]
    fn test_mixed_order_rejected() {
        let mut model = FeModel::new();
        let p0 = model.add_patch(
            HexPatch::unit_cube(1, 1, 1, ElementOrder::Linear, Discretization::Lagrange).unwrap(),
        );
        let p1 = model.add_patch(
            HexPatch::unit_cube(1, 1, 1, ElementOrder::Quadratic, Discretization::Lagrange)
                .unwrap(),
        );
        model
            .register_set(
                "mixed",
                vec![BoundaryItem::new(p0, 1), BoundaryItem::new(p1, 1)],
            )
            .unwrap();

        let err = build_interface_mesh("mixed", &model).unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedOrder { .. }));
    }

    #[test]
    fn test_unknown_and_empty_set() {
        let mut model = FeModel::new();
        let _ = model.add_patch(
            HexPatch::unit_cube(1, 1, 1, ElementOrder::Linear, Discretization::Lagrange).unwrap(),
        );
        model.register_set("empty", vec![]).unwrap();

        assert!(matches!(
            build_interface_mesh("missing", &model).unwrap_err(),
            MeshError::UnknownSet { .. }
        ));
        assert!(matches!(
            build_interface_mesh("empty", &model).unwrap_err(),
            MeshError::EmptySet { .. }
        ));
    }

    #[test]
    fn test_locate() {
        let model = single_patch_model(2, ElementOrder::Linear);
        let info = build_interface_mesh("Face1", &model).unwrap();

        assert_eq!(info.locate(0, 1), Some(0));
        assert_eq!(info.locate(4, 1), Some(2));
        // 不在耦合集内的 (单元, 面) 不得误匹配
        assert_eq!(info.locate(0, 2), None);
        assert_eq!(info.locate(1, 1), None);
    }

    #[test]
    fn test_rebuild_deterministic() {
        let model = single_patch_model(2, ElementOrder::Linear);
        let a = build_interface_mesh("Face1", &model).unwrap();
        let b = build_interface_mesh("Face1", &model).unwrap();
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.coords, b.coords);
        assert_eq!(a.elms, b.elms);
        assert_eq!(a.origin_elements, b.origin_elements);
    }

    #[test]
    fn test_validate_detects_corruption() {
        let model = single_patch_model(2, ElementOrder::Linear);
        let mut info = build_interface_mesh("Face1", &model).unwrap();
        info.nodes.swap(0, 1);
        assert!(info.validate().is_err());
    }

    #[test]
    fn test_summary_lists_nodes_and_elements() {
        let model = single_patch_model(2, ElementOrder::Linear);
        let info = build_interface_mesh("Face1", &model).unwrap();
        let s = info.summary();
        assert!(s.contains("nnod = 9"));
        assert!(s.contains("nelms = 4"));
        assert!(s.contains("== Nodes =="));
        assert!(s.contains("== Elements =="));
    }
}
