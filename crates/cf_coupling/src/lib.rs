// crates/cf_coupling/src/lib.rs

//! CoupleFEM 耦合层
//!
//! 提供接口数据编组（scatter/gather）、物理量定义、数据处理能力接口，
//! 以及用于测试和离线回放的模拟耦合任务。
//!
//! # 核心类型
//!
//! - [`QuantityKind`]: 跨耦合边界交换的物理量
//! - [`StructureAdapter`]: 结构求解器侧的数据处理器
//! - [`PressureLoad`]: 按空间位置查询的压力载荷函数
//! - [`MockJob`]: 回放交换记录的模拟耦合任务
//!
//! # Trait 抽象
//!
//! - [`DataHandler`] / [`GlobalHandler`]: 按物理量类别选择的能力接口
//! - [`StateSerialize`]: 载荷状态快照（模拟交换与重启）
//! - [`RecordStore`]: 交换记录存储后端
//!
//! # 执行模型
//!
//! 严格单线程同步：接口网格在耦合定义回调内一次性构建，
//! 编组操作在每轮交换回调内同步完成，不做任何 IO 或阻塞。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod handler;
pub mod job;
pub mod load;
pub mod marshal;
pub mod quantity;
pub mod structure;

pub use config::CouplingConfig;
pub use error::{CouplingError, CouplingResult};
pub use handler::{ConvergenceState, DataHandler, ExchangeRecord, GlobalHandler, StateSerialize};
pub use job::{JsonFileStore, MemoryStore, MockJob, RecordStore};
pub use load::PressureLoad;
pub use marshal::{gather_element, gather_nodal, scatter_nodal};
pub use quantity::{Exchange, QuantityKind, QuantityLocation};
pub use structure::StructureAdapter;
