// crates/cf_mesh/src/patch.rs

//! 结构化六面体片与模型注册表
//!
//! 提供张量积结构化六面体片 [`HexPatch`] 和多片模型 [`FeModel`]，
//! 用于测试、验证与模拟耦合运行。
//!
//! # 编号约定
//!
//! 节点与单元均按 i 方向最快的张量积次序编号:
//! `node = i + nix*(j + niy*k)`，`elem = ei + nx*(ej + ny*ek)`。
//! 多片模型中每个片占用互不重叠的全局节点/单元编号区间。
//!
//! # 使用示例
//!
//! ```
//! use cf_mesh::patch::{FeModel, HexPatch};
//! use cf_mesh::topology::{BoundaryItem, Discretization, ElementOrder};
//!
//! let mut model = FeModel::new();
//! let patch = HexPatch::unit_cube(2, 2, 2, ElementOrder::Linear, Discretization::Lagrange)
//!     .unwrap();
//! let pid = model.add_patch(patch);
//! model.register_set("Face1", vec![BoundaryItem::new(pid, 1)]).unwrap();
//! ```

use crate::error::{MeshError, MeshResult};
use crate::geometry::Point3D;
use crate::topology::{BoundaryItem, Discretization, ElementOrder};
use crate::traits::StructuralMesh;
use std::collections::HashMap;

// ============================================================================
// HexPatch - 结构化六面体片
// ============================================================================

/// 结构化六面体张量积片
///
/// 参数域固定为 [0,1]³，物理域由原点和边长确定。
#[derive(Debug, Clone)]
pub struct HexPatch {
    /// 各方向单元数
    n_elms: [usize; 3],
    /// 单元阶次
    order: ElementOrder,
    /// 离散格式
    discretization: Discretization,
    /// 物理域原点
    origin: Point3D,
    /// 物理域边长
    lengths: [f64; 3],
    /// 全局节点编号偏移
    node_offset: usize,
    /// 全局单元编号偏移
    elem_offset: usize,
}

impl HexPatch {
    /// 创建结构化六面体片
    ///
    /// # 参数
    ///
    /// - `nx`, `ny`, `nz`: 各方向单元数，必须大于 0
    /// - `order`: 单元阶次
    /// - `discretization`: 离散格式
    pub fn new(
        nx: usize,
        ny: usize,
        nz: usize,
        order: ElementOrder,
        discretization: Discretization,
        origin: Point3D,
        lengths: [f64; 3],
    ) -> MeshResult<Self> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(MeshError::invalid_topology(
                "hex_patch",
                format!("单元数必须大于 0, 实际 ({}, {}, {})", nx, ny, nz),
            ));
        }
        Ok(Self {
            n_elms: [nx, ny, nz],
            order,
            discretization,
            origin,
            lengths,
            node_offset: 0,
            elem_offset: 0,
        })
    }

    /// 创建单位立方体片
    pub fn unit_cube(
        nx: usize,
        ny: usize,
        nz: usize,
        order: ElementOrder,
        discretization: Discretization,
    ) -> MeshResult<Self> {
        Self::new(
            nx,
            ny,
            nz,
            order,
            discretization,
            Point3D::ZERO,
            [1.0, 1.0, 1.0],
        )
    }

    /// 设置全局编号偏移（由 [`FeModel`] 在注册时调用）
    pub fn with_offsets(mut self, node_offset: usize, elem_offset: usize) -> Self {
        self.node_offset = node_offset;
        self.elem_offset = elem_offset;
        self
    }

    /// 单元阶次
    pub fn order(&self) -> ElementOrder {
        self.order
    }

    /// 离散格式
    pub fn discretization(&self) -> Discretization {
        self.discretization
    }

    /// 每方向节点间隔数（阶次决定的单元内节点细分）
    #[inline]
    fn deg(&self) -> usize {
        self.order.nodes_per_dir() - 1
    }

    /// 各方向节点数
    #[inline]
    fn n_node_dirs(&self) -> [usize; 3] {
        let d = self.deg();
        [
            d * self.n_elms[0] + 1,
            d * self.n_elms[1] + 1,
            d * self.n_elms[2] + 1,
        ]
    }

    /// 片内节点总数
    pub fn n_nodes(&self) -> usize {
        let n = self.n_node_dirs();
        n[0] * n[1] * n[2]
    }

    /// 片内单元总数
    pub fn n_elements(&self) -> usize {
        self.n_elms[0] * self.n_elms[1] * self.n_elms[2]
    }

    /// 全局节点编号区间起点
    pub fn node_offset(&self) -> usize {
        self.node_offset
    }

    /// 全局单元编号区间起点
    pub fn elem_offset(&self) -> usize {
        self.elem_offset
    }

    /// 判断全局节点是否属于本片
    pub fn contains_node(&self, node: usize) -> bool {
        node >= self.node_offset && node < self.node_offset + self.n_nodes()
    }

    /// 判断全局单元是否属于本片
    pub fn contains_element(&self, element: usize) -> bool {
        element >= self.elem_offset && element < self.elem_offset + self.n_elements()
    }

    /// 网格节点编号 (i, j, k) → 全局编号
    #[inline]
    fn node_id(&self, i: usize, j: usize, k: usize) -> usize {
        let n = self.n_node_dirs();
        self.node_offset + i + n[0] * (j + n[1] * k)
    }

    /// 节点全局坐标
    pub fn node_coordinate(&self, node: usize) -> MeshResult<Point3D> {
        if !self.contains_node(node) {
            return Err(MeshError::index_out_of_bounds(
                "Node",
                node,
                self.node_offset + self.n_nodes(),
            ));
        }
        let n = self.n_node_dirs();
        let local = node - self.node_offset;
        let i = local % n[0];
        let j = (local / n[0]) % n[1];
        let k = local / (n[0] * n[1]);
        Ok(Point3D::new(
            self.origin.x + self.lengths[0] * i as f64 / (n[0] - 1) as f64,
            self.origin.y + self.lengths[1] * j as f64 / (n[1] - 1) as f64,
            self.origin.z + self.lengths[2] * k as f64 / (n[2] - 1) as f64,
        ))
    }

    /// 指定面上的边界单元，按全局单元编号升序
    pub fn boundary_elements(&self, face: u8) -> MeshResult<Vec<usize>> {
        if !(1..=6).contains(&face) {
            return Err(MeshError::InvalidFace { face });
        }
        let fixed = ((face - 1) / 2) as usize;
        let side = ((face - 1) % 2) as usize;
        let target = if side == 0 { 0 } else { self.n_elms[fixed] - 1 };

        let [nx, ny, _] = self.n_elms;
        let mut result = Vec::new();
        for e in 0..self.n_elements() {
            let idx = [e % nx, (e / nx) % ny, e / (nx * ny)];
            if idx[fixed] == target {
                result.push(self.elem_offset + e);
            }
        }
        Ok(result)
    }

    /// 单元的全局节点编号，按局部节点次序（i 方向最快）
    pub fn element_nodes(&self, element: usize) -> MeshResult<Vec<usize>> {
        if !self.contains_element(element) {
            return Err(MeshError::index_out_of_bounds(
                "Element",
                element,
                self.elem_offset + self.n_elements(),
            ));
        }
        let [nx, ny, _] = self.n_elms;
        let local = element - self.elem_offset;
        let ei = local % nx;
        let ej = (local / nx) % ny;
        let ek = local / (nx * ny);

        let d = self.deg();
        let m = self.order.nodes_per_dir();
        let base = [d * ei, d * ej, d * ek];

        let mut nodes = Vec::with_capacity(m * m * m);
        for lk in 0..m {
            for lj in 0..m {
                for li in 0..m {
                    nodes.push(self.node_id(base[0] + li, base[1] + lj, base[2] + lk));
                }
            }
        }
        Ok(nodes)
    }

    /// 参数域，固定为各方向 [0, 1]
    pub fn parameter_domain(&self) -> [[f64; 2]; 3] {
        [[0.0, 1.0]; 3]
    }

    /// 查找包含参数点的单元，返回全局单元编号
    pub fn find_element(&self, u: [f64; 3]) -> MeshResult<usize> {
        for (c, &uc) in u.iter().enumerate() {
            if !(0.0..=1.0).contains(&uc) {
                return Err(MeshError::invalid_topology(
                    "find_element",
                    format!("参数坐标分量 {} = {} 超出 [0, 1]", c, uc),
                ));
            }
        }
        let mut idx = [0usize; 3];
        for c in 0..3 {
            let n = self.n_elms[c];
            idx[c] = ((u[c] * n as f64).floor() as usize).min(n - 1);
        }
        Ok(self.elem_offset + idx[0] + self.n_elms[0] * (idx[1] + self.n_elms[1] * idx[2]))
    }

    /// 判断边界参数点所在的面编号
    ///
    /// 点不在 i/j 方向边界上时归为 k-max 面，与点定位调用方的
    /// 边界采样约定一致。
    pub fn parameter_face(&self, u: [f64; 3]) -> u8 {
        let dom = self.parameter_domain();
        if u[0] == dom[0][0] {
            1
        } else if u[0] == dom[0][1] {
            2
        } else if u[1] == dom[1][0] {
            3
        } else if u[1] == dom[1][1] {
            4
        } else if u[2] == dom[2][0] {
            5
        } else {
            6
        }
    }
}

// ============================================================================
// FeModel - 多片模型与命名拓扑集
// ============================================================================

/// 多片模型
///
/// 持有若干结构化片和命名边界集，为耦合层实现 [`StructuralMesh`]。
/// 各片的全局节点/单元编号区间互不重叠。
#[derive(Debug, Default)]
pub struct FeModel {
    patches: Vec<HexPatch>,
    sets: HashMap<String, Vec<BoundaryItem>>,
    n_nodes: usize,
    n_elements: usize,
}

impl FeModel {
    /// 创建空模型
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个片，分配全局编号区间，返回片索引
    pub fn add_patch(&mut self, patch: HexPatch) -> usize {
        let patch = patch.with_offsets(self.n_nodes, self.n_elements);
        self.n_nodes += patch.n_nodes();
        self.n_elements += patch.n_elements();
        self.patches.push(patch);
        self.patches.len() - 1
    }

    /// 注册命名边界集
    pub fn register_set(
        &mut self,
        name: impl Into<String>,
        items: Vec<BoundaryItem>,
    ) -> MeshResult<()> {
        for item in &items {
            if item.patch >= self.patches.len() {
                return Err(MeshError::index_out_of_bounds(
                    "Patch",
                    item.patch,
                    self.patches.len(),
                ));
            }
            if !(1..=6).contains(&item.face) {
                return Err(MeshError::InvalidFace { face: item.face });
            }
        }
        self.sets.insert(name.into(), items);
        Ok(())
    }

    /// 访问片
    pub fn patch(&self, index: usize) -> MeshResult<&HexPatch> {
        self.patches
            .get(index)
            .ok_or_else(|| MeshError::index_out_of_bounds("Patch", index, self.patches.len()))
    }

    /// 全局单元总数
    pub fn n_elements(&self) -> usize {
        self.n_elements
    }

    /// 已注册的边界集名称
    pub fn set_names(&self) -> Vec<&str> {
        self.sets.keys().map(String::as_str).collect()
    }

    /// 查找片内包含参数点的单元
    pub fn find_element(&self, patch: usize, u: [f64; 3]) -> MeshResult<usize> {
        self.patch(patch)?.find_element(u)
    }

    /// 判断片边界参数点所在的面编号
    pub fn parameter_face(&self, patch: usize, u: [f64; 3]) -> MeshResult<u8> {
        Ok(self.patch(patch)?.parameter_face(u))
    }
}

impl StructuralMesh for FeModel {
    fn n_patches(&self) -> usize {
        self.patches.len()
    }

    fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    fn boundary_set(&self, name: &str) -> Option<&[BoundaryItem]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    fn element_order(&self, patch: usize) -> MeshResult<ElementOrder> {
        Ok(self.patch(patch)?.order())
    }

    fn discretization(&self, patch: usize) -> MeshResult<Discretization> {
        Ok(self.patch(patch)?.discretization())
    }

    fn boundary_elements(&self, patch: usize, face: u8) -> MeshResult<Vec<usize>> {
        self.patch(patch)?.boundary_elements(face)
    }

    fn element_nodes(&self, patch: usize, element: usize) -> MeshResult<Vec<usize>> {
        self.patch(patch)?.element_nodes(element)
    }

    fn node_coordinate(&self, node: usize) -> MeshResult<Point3D> {
        let patch = self
            .patches
            .iter()
            .find(|p| p.contains_node(node))
            .ok_or_else(|| MeshError::index_out_of_bounds("Node", node, self.n_nodes))?;
        patch.node_coordinate(node)
    }
}
