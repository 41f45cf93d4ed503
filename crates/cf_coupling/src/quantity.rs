// crates/cf_coupling/src/quantity.rs

//! 耦合物理量定义
//!
//! 定义跨耦合边界交换的物理量类别。每个物理量自带位置
//! （面节点/面单元/全局）、传输方向和分量数，处理器据此
//! 拒绝自己不支持的请求。

use serde::{Deserialize, Serialize};

/// 交换物理量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    /// 节点位置/位移（结构侧发送）
    NodePosition,
    /// 壁面节点力（结构侧接收）
    WallForce,
    /// 绝对压力，每边界单元一个标量（结构侧接收）
    AbsPressure,
    /// 时间步长（全局量）
    TimeStepSize,
}

/// 物理量在接口上的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityLocation {
    /// 面节点量
    FaceNode,
    /// 面单元量
    FaceElement,
    /// 全局标量
    Global,
}

/// 传输方向（以结构求解器为参照）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    /// 结构侧发送
    Send,
    /// 结构侧接收
    Receive,
}

impl QuantityKind {
    /// 物理量位置
    pub fn location(&self) -> QuantityLocation {
        match self {
            Self::NodePosition | Self::WallForce => QuantityLocation::FaceNode,
            Self::AbsPressure => QuantityLocation::FaceElement,
            Self::TimeStepSize => QuantityLocation::Global,
        }
    }

    /// 传输方向
    pub fn direction(&self) -> Exchange {
        match self {
            Self::NodePosition => Exchange::Send,
            Self::WallForce | Self::AbsPressure => Exchange::Receive,
            Self::TimeStepSize => Exchange::Receive,
        }
    }

    /// 每节点/单元的分量数
    pub fn components(&self) -> usize {
        match self {
            Self::NodePosition | Self::WallForce => 3,
            Self::AbsPressure | Self::TimeStepSize => 1,
        }
    }
}

impl std::fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NodePosition => "NodePosition",
            Self::WallForce => "WallForce",
            Self::AbsPressure => "AbsPressure",
            Self::TimeStepSize => "TimeStepSize",
        };
        write!(f, "{}", s)
    }
}
