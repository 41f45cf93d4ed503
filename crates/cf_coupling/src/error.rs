// crates/cf_coupling/src/error.rs

//! 耦合层错误类型
//!
//! 包含物理量编组、交换记录存取的错误定义。
//! 所有错误可转换为 `cf_foundation::CfError` 向上传播。
//! 本层不做内部重试：错误同步返回给协议层，由其决定是否中止整个耦合运行。

use crate::quantity::QuantityKind;
use cf_foundation::CfError;
use cf_mesh::MeshError;
use thiserror::Error;

/// 耦合模块结果类型
pub type CouplingResult<T> = Result<T, CouplingError>;

/// 耦合错误枚举
#[derive(Error, Debug)]
pub enum CouplingError {
    /// 处理器不支持的物理量
    #[error("未知的物理量: {kind} ({context})")]
    UnknownQuantity {
        /// 请求的物理量
        kind: QuantityKind,
        /// 请求发生的上下文
        context: &'static str,
    },

    /// 扁平缓冲区与接口网格大小不匹配
    #[error("缓冲区大小不匹配: {name} 期望 {expected}, 实际 {actual}")]
    BufferSizeMismatch {
        /// 缓冲区名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 接口节点超出源数组的节点范围
    #[error("节点越界: 接口节点 {node} 超出源数组节点范围 0..{extent}")]
    NodeOutOfRange {
        /// 越界的全局节点编号
        node: usize,
        /// 源数组覆盖的节点数
        extent: usize,
    },

    /// 数据传输失败
    #[error("数据传输失败: {message}")]
    Transfer {
        /// 失败原因
        message: String,
    },

    /// 交换记录序列化错误
    #[error("交换记录序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO 错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 网格层错误
    #[error("网格错误: {0}")]
    Mesh(#[from] MeshError),
}

/// 转换到 Foundation 层错误
impl From<CouplingError> for CfError {
    fn from(err: CouplingError) -> Self {
        match err {
            CouplingError::UnknownQuantity { kind, context } => {
                CfError::invalid_input(format!("未知的物理量 {} ({})", kind, context))
            }
            CouplingError::BufferSizeMismatch {
                name,
                expected,
                actual,
            } => CfError::size_mismatch(name, expected, actual),
            CouplingError::NodeOutOfRange { node, extent } => {
                CfError::index_out_of_bounds("InterfaceNode", node, extent)
            }
            CouplingError::Transfer { message } => {
                CfError::internal(format!("数据传输失败: {}", message))
            }
            CouplingError::Serialization(err) => CfError::serialization(err.to_string()),
            CouplingError::Io(err) => CfError::io_with_source("交换记录 IO 失败", err),
            CouplingError::Mesh(err) => err.into(),
        }
    }
}

/// 便捷构造函数
impl CouplingError {
    /// 处理器不支持的物理量
    pub fn unknown_quantity(kind: QuantityKind, context: &'static str) -> Self {
        Self::UnknownQuantity { kind, context }
    }

    /// 缓冲区大小不匹配
    pub fn buffer_size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::BufferSizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 节点越界
    pub fn node_out_of_range(node: usize, extent: usize) -> Self {
        Self::NodeOutOfRange { node, extent }
    }

    /// 数据传输失败
    pub fn transfer(message: impl Into<String>) -> Self {
        Self::Transfer {
            message: message.into(),
        }
    }

    /// 检查缓冲区大小
    #[inline]
    pub fn check_buffer(name: &'static str, expected: usize, actual: usize) -> CouplingResult<()> {
        if expected != actual {
            Err(Self::buffer_size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }
}
