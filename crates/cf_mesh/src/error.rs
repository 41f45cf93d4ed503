// crates/cf_mesh/src/error.rs

//! 网格处理错误类型
//!
//! 包含边界集解析、单元阶次和面节点模板的错误定义。
//! 所有错误可转换为 `cf_foundation::CfError` 向上传播。

use cf_foundation::CfError;
use thiserror::Error;

/// 网格模块结果类型
pub type MeshResult<T> = Result<T, MeshError>;

/// 网格错误枚举
#[derive(Error, Debug)]
pub enum MeshError {
    /// 不支持的单元阶次
    #[error("不支持的单元阶次: {details}")]
    UnsupportedOrder {
        /// 具体原因
        details: String,
    },

    /// 空边界集
    #[error("边界集为空: {set}")]
    EmptySet {
        /// 集合名
        set: String,
    },

    /// 未注册的边界集
    #[error("未注册的边界集: {set}")]
    UnknownSet {
        /// 集合名
        set: String,
    },

    /// 非法面编号
    #[error("非法面编号: {face}, 合法范围 1..=6")]
    InvalidFace {
        /// 面编号
        face: u8,
    },

    /// 面节点模板与参考单元不一致
    #[error("面节点模板错误: 面 {face}, {details}")]
    InvalidTemplate {
        /// 面编号
        face: u8,
        /// 具体不一致说明
        details: String,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 拓扑不变量被破坏
    #[error("拓扑错误: {operation} 失败, {details}")]
    InvalidTopology {
        /// 操作名
        operation: &'static str,
        /// 具体错误信息
        details: String,
    },
}

/// 转换到 Foundation 层错误
impl From<MeshError> for CfError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::UnsupportedOrder { details } => {
                CfError::invalid_mesh(format!("不支持的单元阶次: {}", details))
            }
            MeshError::EmptySet { set } => {
                CfError::invalid_input(format!("边界集为空: {}", set))
            }
            MeshError::UnknownSet { set } => CfError::not_found(format!("边界集 {}", set)),
            MeshError::InvalidFace { face } => {
                CfError::invalid_input(format!("非法面编号: {}", face))
            }
            MeshError::InvalidTemplate { face, details } => {
                CfError::validation(format!("面节点模板错误 [面 {}]: {}", face, details))
            }
            MeshError::IndexOutOfBounds {
                index_type,
                index,
                len,
            } => CfError::index_out_of_bounds(index_type, index, len),
            MeshError::InvalidTopology { operation, details } => {
                CfError::invalid_mesh(format!("拓扑错误 [{}]: {}", operation, details))
            }
        }
    }
}

/// 便捷构造函数
impl MeshError {
    /// 不支持的单元阶次
    pub fn unsupported_order(details: impl Into<String>) -> Self {
        Self::UnsupportedOrder {
            details: details.into(),
        }
    }

    /// 空边界集
    pub fn empty_set(set: impl Into<String>) -> Self {
        Self::EmptySet { set: set.into() }
    }

    /// 未注册的边界集
    pub fn unknown_set(set: impl Into<String>) -> Self {
        Self::UnknownSet { set: set.into() }
    }

    /// 面节点模板错误
    pub fn invalid_template(face: u8, details: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            face,
            details: details.into(),
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 拓扑不变量被破坏
    pub fn invalid_topology(operation: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidTopology {
            operation,
            details: details.into(),
        }
    }
}
