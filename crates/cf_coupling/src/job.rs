// crates/cf_coupling/src/job.rs

//! 模拟耦合任务
//!
//! 不连接真实耦合服务器，而是按时间层回放预先录制的交换记录。
//! 用于离线测试耦合数据通路，以及从中断处恢复计算。
//!
//! # 执行模型
//!
//! 严格单线程同步：`setup` 一次性构建接口网格并注册耦合定义，
//! 之后每个时间层调用一次 `transfer` 回放记录。记录耗尽时
//! 返回终止状态，任务不再推进。

use crate::error::{CouplingError, CouplingResult};
use crate::handler::{ConvergenceState, DataHandler, ExchangeRecord, StateSerialize};
use cf_mesh::{build_interface_mesh, InterfaceMesh, StructuralMesh};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// 交换记录存储后端
pub trait RecordStore: Send + Sync {
    /// 保存时间层 `level` 的记录（整体替换）
    fn save(&self, level: usize, record: &ExchangeRecord) -> CouplingResult<()>;

    /// 读取时间层 `level` 的记录
    fn load(&self, level: usize) -> CouplingResult<Option<ExchangeRecord>>;

    /// 已保存的记录数
    fn count(&self) -> usize;
}

/// 内存存储
///
/// 克隆共享同一底层表，便于录制与回放共用存储。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<usize, ExchangeRecord>>>,
}

impl MemoryStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn save(&self, level: usize, record: &ExchangeRecord) -> CouplingResult<()> {
        self.records.write().insert(level, record.clone());
        Ok(())
    }

    fn load(&self, level: usize) -> CouplingResult<Option<ExchangeRecord>> {
        Ok(self.records.read().get(&level).cloned())
    }

    fn count(&self) -> usize {
        self.records.read().len()
    }
}

/// JSON 文件存储
///
/// 整个存储序列化为一个 JSON 文件，每次保存全量重写。
/// 记录规模小（每层若干 KB），不值得做增量写。
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: RwLock<Vec<(usize, ExchangeRecord)>>,
}

impl JsonFileStore {
    /// 打开或创建存储文件
    pub fn open(path: impl AsRef<Path>) -> CouplingResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    fn persist(&self, records: &[(usize, ExchangeRecord)]) -> CouplingResult<()> {
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn save(&self, level: usize, record: &ExchangeRecord) -> CouplingResult<()> {
        let mut records = self.records.write();
        match records.iter_mut().find(|(l, _)| *l == level) {
            Some(entry) => entry.1 = record.clone(),
            None => records.push((level, record.clone())),
        }
        self.persist(&records)
    }

    fn load(&self, level: usize) -> CouplingResult<Option<ExchangeRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, r)| r.clone()))
    }

    fn count(&self) -> usize {
        self.records.read().len()
    }
}

/// 模拟耦合任务
///
/// 对应一次完整的耦合运行：构建接口网格，逐时间层回放交换记录。
pub struct MockJob {
    id: Uuid,
    store: Box<dyn RecordStore>,
    info: Option<InterfaceMesh>,
    level: usize,
}

impl MockJob {
    /// 创建任务
    pub fn new(store: Box<dyn RecordStore>) -> Self {
        Self {
            id: Uuid::new_v4(),
            store,
            info: None,
            level: 0,
        }
    }

    /// 任务标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 当前时间层
    pub fn level(&self) -> usize {
        self.level
    }

    /// 已构建的接口网格
    pub fn interface(&self) -> Option<&InterfaceMesh> {
        self.info.as_ref()
    }

    /// 初始化耦合：构建接口网格并注册耦合定义
    pub fn setup(
        &mut self,
        set_name: &str,
        mesh: &impl StructuralMesh,
        handler: &mut dyn DataHandler,
    ) -> CouplingResult<()> {
        let info = build_interface_mesh(set_name, mesh)?;
        handler.add_coupling(set_name, &info)?;
        log::info!(
            "任务 {} 初始化: 集 '{}', {} 个接口节点, {} 个边界单元",
            self.id,
            set_name,
            info.n_nodes(),
            info.n_elements()
        );
        self.info = Some(info);
        self.level = 0;
        Ok(())
    }

    /// 回放当前时间层的交换记录并推进时间层
    ///
    /// 返回记录中携带的迭代状态（收敛/发散由录制方给出）；
    /// 记录耗尽时返回 [`ConvergenceState::Stop`]，不推进时间层。
    pub fn transfer(&mut self, handler: &mut dyn StateSerialize) -> CouplingResult<ConvergenceState> {
        if self.info.is_none() {
            return Err(CouplingError::transfer("任务尚未初始化"));
        }
        match self.store.load(self.level)? {
            Some(record) => {
                handler.deserialize_state(&record)?;
                log::debug!("任务 {} 回放时间层 {}", self.id, self.level);
                self.level += 1;
                if record.status.is_terminal() {
                    log::info!(
                        "任务 {} 在时间层 {} 收到终止状态 {}",
                        self.id,
                        self.level - 1,
                        record.status
                    );
                }
                Ok(record.status)
            }
            None => {
                log::info!("任务 {} 在时间层 {} 处记录耗尽", self.id, self.level);
                Ok(ConvergenceState::Stop)
            }
        }
    }

    /// 把处理器当前载荷状态连同迭代状态录制到当前时间层并推进
    pub fn record(
        &mut self,
        handler: &dyn StateSerialize,
        status: ConvergenceState,
    ) -> CouplingResult<()> {
        let mut record = handler.serialize_state()?;
        record.status = status;
        self.store.save(self.level, &record)?;
        self.level += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::QuantityKind;
    use crate::structure::StructureAdapter;
    use cf_mesh::topology::BoundaryItem;
    use cf_mesh::{Discretization, ElementOrder, FeModel, HexPatch, StructuralMesh};

    fn face1_model() -> FeModel {
        let mut model = FeModel::new();
        let patch =
            HexPatch::unit_cube(2, 2, 2, ElementOrder::Linear, Discretization::Lagrange).unwrap();
        let pid = model.add_patch(patch);
        model
            .register_set("Face1", vec![BoundaryItem::new(pid, 1)])
            .unwrap();
        model
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        let record = ExchangeRecord {
            dt: Some(0.5),
            ..Default::default()
        };
        store.save(0, &record).unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.load(0).unwrap(), Some(record));
        assert_eq!(store.load(1).unwrap(), None);
    }

    #[test]
    fn test_json_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let record = ExchangeRecord {
            node_forces: vec![(3, [1.0, 0.0, -1.0])],
            elem_pressures: vec![2.5],
            dt: Some(0.1),
            status: ConvergenceState::Continue,
        };
        {
            let store = JsonFileStore::open(&path).unwrap();
            store.save(0, &record).unwrap();
            store.save(1, &ExchangeRecord::default()).unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.count(), 2);
        assert_eq!(reopened.load(0).unwrap(), Some(record));
    }

    #[test]
    fn test_replay_levels() {
        let model = face1_model();
        let store = MemoryStore::new();

        // 录制两个时间层
        let mut recorder = StructureAdapter::new(model.n_nodes());
        let mut job = MockJob::new(Box::new(store.clone()));
        job.setup("Face1", &model, &mut recorder).unwrap();
        let info = job.interface().unwrap().clone();

        let forces: Vec<f64> = (0..info.n_nodes() * 3).map(|v| v as f64).collect();
        recorder
            .read_data(QuantityKind::WallForce, &info, &forces)
            .unwrap();
        job.record(&recorder, ConvergenceState::Continue).unwrap();
        recorder
            .read_data(QuantityKind::AbsPressure, &info, &[1.0, 2.0, 3.0, 4.0])
            .unwrap();
        job.record(&recorder, ConvergenceState::Continue).unwrap();

        // 回放到新的处理器
        let mut player = StructureAdapter::new(model.n_nodes());
        let mut replay = MockJob::new(Box::new(store));
        replay.setup("Face1", &model, &mut player).unwrap();

        assert_eq!(
            replay.transfer(&mut player).unwrap(),
            ConvergenceState::Continue
        );
        assert_eq!(player.loads().len(), info.n_nodes());
        assert!(player.element_pressures().is_empty());

        assert_eq!(
            replay.transfer(&mut player).unwrap(),
            ConvergenceState::Continue
        );
        assert_eq!(player.element_pressures(), &[1.0, 2.0, 3.0, 4.0]);

        // 第三层没有记录
        let state = replay.transfer(&mut player).unwrap();
        assert_eq!(state, ConvergenceState::Stop);
        assert!(state.is_terminal());
        assert_eq!(replay.level(), 2);
    }

    #[test]
    fn test_replay_surfaces_recorded_status() {
        let model = face1_model();
        let store = MemoryStore::new();

        // 最后一层录制为已收敛
        let mut recorder = StructureAdapter::new(model.n_nodes());
        let mut job = MockJob::new(Box::new(store.clone()));
        job.setup("Face1", &model, &mut recorder).unwrap();
        let info = job.interface().unwrap().clone();

        recorder
            .read_data(QuantityKind::AbsPressure, &info, &[1.0, 2.0, 3.0, 4.0])
            .unwrap();
        job.record(&recorder, ConvergenceState::Continue).unwrap();
        job.record(&recorder, ConvergenceState::Converged).unwrap();

        let mut player = StructureAdapter::new(model.n_nodes());
        let mut replay = MockJob::new(Box::new(store.clone()));
        replay.setup("Face1", &model, &mut player).unwrap();

        assert_eq!(
            replay.transfer(&mut player).unwrap(),
            ConvergenceState::Continue
        );
        let state = replay.transfer(&mut player).unwrap();
        assert_eq!(state, ConvergenceState::Converged);
        assert!(state.is_terminal());
        // 终止层的载荷仍被回放
        assert_eq!(player.element_pressures(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(replay.level(), 2);

        // 发散状态同样原样上交
        let diverged = ExchangeRecord {
            status: ConvergenceState::Diverged,
            ..Default::default()
        };
        store.save(2, &diverged).unwrap();
        assert_eq!(
            replay.transfer(&mut player).unwrap(),
            ConvergenceState::Diverged
        );
    }

    #[test]
    fn test_transfer_before_setup() {
        let mut job = MockJob::new(Box::new(MemoryStore::new()));
        let mut handler = StructureAdapter::new(8);
        assert!(job.transfer(&mut handler).is_err());
    }
}
