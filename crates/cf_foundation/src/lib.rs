// crates/cf_foundation/src/lib.rs

//! CoupleFEM Foundation Layer
//!
//! 基础层，提供整个项目的统一错误类型和校验宏。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `CfError` / `CfResult`
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，网格和耦合相关错误在
//!    `cf_mesh` / `cf_coupling` 中扩展并向本层转换
//! 2. **最小依赖**: 仅依赖 thiserror
//!
//! # 示例
//!
//! ```
//! use cf_foundation::{CfError, CfResult, ensure};
//!
//! fn check_components(ncomp: usize) -> CfResult<()> {
//!     ensure!(ncomp > 0, CfError::invalid_input("分量数必须大于 0"));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub use error::{CfError, CfResult};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{CfError, CfResult};
    pub use crate::{ensure, require};
}
