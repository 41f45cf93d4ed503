// crates/cf_coupling/src/handler.rs

//! 数据处理能力接口
//!
//! 按物理量类别选择的能力接口，替代深继承：模拟实现与真实实现
//! 满足同一组 trait。上下文通过参数显式传递，不使用任何进程级
//! 全局状态。
//!
//! # 能力划分
//!
//! - [`DataHandler`]: 面量（节点/单元）读写与耦合注册
//! - [`GlobalHandler`]: 全局量（时间步长等）读写
//! - [`StateSerialize`]: 接收载荷状态的快照与恢复

use crate::error::CouplingResult;
use crate::quantity::QuantityKind;
use cf_mesh::InterfaceMesh;
use serde::{Deserialize, Serialize};

/// 面量数据处理器
///
/// 由协议层的每轮交换回调同步调用，实现不得阻塞。
pub trait DataHandler {
    /// 把待发送的物理量写入协议层分配的扁平缓冲区
    fn write_data(
        &self,
        kind: QuantityKind,
        info: &InterfaceMesh,
        out: &mut [f64],
    ) -> CouplingResult<()>;

    /// 从协议层的扁平缓冲区读入接收到的物理量
    ///
    /// 同一物理量的历史状态被整体替换，不做合并。
    fn read_data(
        &mut self,
        kind: QuantityKind,
        info: &InterfaceMesh,
        data: &[f64],
    ) -> CouplingResult<()>;

    /// 注册应用相关的耦合定义（如压力载荷函数）
    fn add_coupling(&mut self, name: &str, info: &InterfaceMesh) -> CouplingResult<()>;
}

/// 全局量数据处理器
pub trait GlobalHandler {
    /// 读入接收到的全局量（时间步长等）
    fn read_global(&mut self, kind: QuantityKind, data: &[f64]) -> CouplingResult<()>;

    /// 写出待发送的全局量
    fn write_global(&self, kind: QuantityKind, out: &mut [f64]) -> CouplingResult<()>;
}

/// 耦合迭代状态
///
/// 真实耦合运行中由服务器随每轮交换下发；模拟运行把它记录在
/// 交换快照里，回放时原样上交给驱动循环。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvergenceState {
    /// 继续下一时间层
    #[default]
    Continue,
    /// 已收敛，正常结束
    Converged,
    /// 发散，异常结束
    Diverged,
    /// 记录耗尽，停止回放
    Stop,
}

impl ConvergenceState {
    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue)
    }
}

impl std::fmt::Display for ConvergenceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Continue => "Continue",
            Self::Converged => "Converged",
            Self::Diverged => "Diverged",
            Self::Stop => "Stop",
        };
        write!(f, "{}", s)
    }
}

/// 一轮交换的载荷状态快照
///
/// 模拟耦合运行按时间层回放这些记录；重启时也以同样格式恢复。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// 节点力: (全局节点编号, 力分量)
    #[serde(default)]
    pub node_forces: Vec<(usize, [f64; 3])>,
    /// 每边界单元的压力值，按溯源表次序
    #[serde(default)]
    pub elem_pressures: Vec<f64>,
    /// 时间步长
    #[serde(default)]
    pub dt: Option<f64>,
    /// 本轮交换后的迭代状态
    #[serde(default)]
    pub status: ConvergenceState,
}

impl ExchangeRecord {
    /// 记录是否为空
    pub fn is_empty(&self) -> bool {
        self.node_forces.is_empty() && self.elem_pressures.is_empty() && self.dt.is_none()
    }
}

/// 载荷状态快照能力
///
/// 用于模拟耦合服务器的离线回放和计算重启。
pub trait StateSerialize: DataHandler {
    /// 导出当前接收到的载荷状态
    fn serialize_state(&self) -> CouplingResult<ExchangeRecord>;

    /// 从快照恢复载荷状态（整体替换）
    fn deserialize_state(&mut self, record: &ExchangeRecord) -> CouplingResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip_json() {
        let record = ExchangeRecord {
            node_forces: vec![(0, [1.0, 2.0, 3.0]), (12, [0.0, -1.0, 0.5])],
            elem_pressures: vec![1e5, 2e5],
            dt: Some(0.01),
            status: ConvergenceState::Converged,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: ExchangeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_defaults() {
        // 旧格式记录缺少 status 字段时按 Continue 处理
        let record: ExchangeRecord = serde_json::from_str("{}").unwrap();
        assert!(record.is_empty());
        assert_eq!(record.status, ConvergenceState::Continue);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ConvergenceState::Continue.is_terminal());
        assert!(ConvergenceState::Converged.is_terminal());
        assert!(ConvergenceState::Diverged.is_terminal());
        assert!(ConvergenceState::Stop.is_terminal());
    }
}
