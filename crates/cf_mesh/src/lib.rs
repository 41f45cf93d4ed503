// crates/cf_mesh/src/lib.rs

//! CoupleFEM 网格模块
//!
//! 提供结构求解器侧的边界网格抽象，以及耦合边界面的接口网格提取。
//!
//! # 核心类型
//!
//! - [`InterfaceMesh`]: 耦合边界面的扁平化网格描述（节点/坐标/连接）
//! - [`HexPatch`]: 结构化六面体张量积片，用于测试与模拟运行
//! - [`FeModel`]: 多片模型与命名拓扑集注册表
//!
//! # Trait 抽象
//!
//! - [`StructuralMesh`]: 体网格只读访问接口
//!
//! # 模块结构
//!
//! - [`topology`]: 单元阶次、边界项与面节点模板
//! - [`traits`]: 网格抽象接口
//! - [`patch`]: 结构化六面体片与模型注册表
//! - [`interface`]: 接口网格提取
//! - [`geometry`]: 基础几何类型

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geometry;
pub mod interface;
pub mod patch;
pub mod topology;
pub mod traits;

// 重新导出核心类型
pub use error::{MeshError, MeshResult};
pub use geometry::Point3D;
pub use interface::{build_interface_mesh, InterfaceMesh};
pub use patch::{FeModel, HexPatch};
pub use topology::{
    face_template, validate_face_templates, BoundaryItem, Discretization, ElementOrder,
    ElementType,
};
pub use traits::StructuralMesh;
