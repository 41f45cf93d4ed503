// crates/cf_mesh/src/traits.rs

//! 网格抽象接口（StructuralMesh）
//!
//! 定义体网格对耦合层暴露的只读访问接口。接口网格提取
//! ([`crate::interface::build_interface_mesh`]) 只通过此 trait 操作网格，
//! 禁止直接依赖 [`crate::patch::FeModel`] 等具体实现。
//!
//! # 索引约定
//!
//! - 节点索引: 全局 0-based，`0..n_nodes()`
//! - 单元索引: 全局 0-based，跨片唯一
//! - 片索引: `0..n_patches()`
//! - 面编号: 1..=6（i-min, i-max, j-min, j-max, k-min, k-max）
//!
//! # 线程安全
//!
//! 所有实现要求 `Send + Sync`。耦合交换本身是严格单线程的，
//! 但接口网格可能被只读共享给后处理。

use crate::error::MeshResult;
use crate::geometry::Point3D;
use crate::topology::{BoundaryItem, Discretization, ElementOrder};

/// 体网格只读访问接口
///
/// 实现类型负责保证 `boundary_elements` 的枚举次序稳定
/// （按内部单元编号升序），以确保接口网格提取的可重现性。
pub trait StructuralMesh: Send + Sync {
    /// 片总数
    fn n_patches(&self) -> usize;

    /// 全局节点总数
    fn n_nodes(&self) -> usize;

    /// 查询命名边界集
    ///
    /// 未注册的名字返回 `None`。
    fn boundary_set(&self, name: &str) -> Option<&[BoundaryItem]>;

    /// 片的单元阶次
    fn element_order(&self, patch: usize) -> MeshResult<ElementOrder>;

    /// 片的离散格式
    fn discretization(&self, patch: usize) -> MeshResult<Discretization>;

    /// 片在指定面上的边界单元，按单元编号升序
    fn boundary_elements(&self, patch: usize, face: u8) -> MeshResult<Vec<usize>>;

    /// 单元的全局节点编号，按片局部节点次序（i 方向最快）
    fn element_nodes(&self, patch: usize, element: usize) -> MeshResult<Vec<usize>>;

    /// 节点的全局坐标
    fn node_coordinate(&self, node: usize) -> MeshResult<Point3D>;
}
