// crates/cf_coupling/src/structure.rs

//! 结构求解器侧数据处理器
//!
//! 持有当前解向量与接收到的载荷状态，实现全部数据处理能力接口：
//! 发送节点位置，接收壁面力与单元压力，接收全局时间步长。
//!
//! 载荷状态以整体替换的方式更新：每轮交换完全覆盖上一轮，
//! 不做任何合并。

use crate::error::{CouplingError, CouplingResult};
use crate::handler::{ConvergenceState, DataHandler, ExchangeRecord, GlobalHandler, StateSerialize};
use crate::marshal::{gather_element, gather_nodal, scatter_nodal};
use crate::quantity::QuantityKind;
use cf_mesh::{InterfaceMesh, Point3D};
use std::collections::BTreeMap;

/// 结构求解器侧适配器
///
/// 解向量按 `[x0,y0,z0, x1,y1,z1, ..]` 排列，长度为 `3 * n_nodes`。
#[derive(Debug, Clone)]
pub struct StructureAdapter {
    /// 模型节点总数
    n_nodes: usize,
    /// 当前位移解向量
    solution: Vec<f64>,
    /// 接收到的节点力: 全局节点编号 -> 力向量
    load_map: BTreeMap<usize, Point3D>,
    /// 接收到的每边界单元压力，按接口溯源表次序
    elem_pressures: Vec<f64>,
    /// 接收到的时间步长
    dt: Option<f64>,
}

impl StructureAdapter {
    /// 创建适配器，初始位移为零
    pub fn new(n_nodes: usize) -> Self {
        Self {
            n_nodes,
            solution: vec![0.0; 3 * n_nodes],
            load_map: BTreeMap::new(),
            elem_pressures: Vec::new(),
            dt: None,
        }
    }

    /// 更新位移解向量
    ///
    /// # 错误
    ///
    /// 长度不等于 `3 * n_nodes` 时返回 [`CouplingError::BufferSizeMismatch`]。
    pub fn set_solution(&mut self, solution: &[f64]) -> CouplingResult<()> {
        CouplingError::check_buffer("solution", 3 * self.n_nodes, solution.len())?;
        self.solution.copy_from_slice(solution);
        Ok(())
    }

    /// 当前接收到的节点力
    pub fn loads(&self) -> &BTreeMap<usize, Point3D> {
        &self.load_map
    }

    /// 当前接收到的单元压力
    pub fn element_pressures(&self) -> &[f64] {
        &self.elem_pressures
    }

    /// 当前接收到的时间步长
    pub fn time_step(&self) -> Option<f64> {
        self.dt
    }

    /// 把接收到的节点力累加到右端项向量
    ///
    /// `rhs` 按 `[fx0,fy0,fz0, ..]` 排列，长度须为 `3 * n_nodes`。
    pub fn apply_loads(&self, rhs: &mut [f64]) -> CouplingResult<()> {
        CouplingError::check_buffer("rhs", 3 * self.n_nodes, rhs.len())?;
        for (&node, force) in &self.load_map {
            if node >= self.n_nodes {
                return Err(CouplingError::node_out_of_range(node, self.n_nodes));
            }
            rhs[3 * node] += force.x;
            rhs[3 * node + 1] += force.y;
            rhs[3 * node + 2] += force.z;
        }
        Ok(())
    }
}

impl DataHandler for StructureAdapter {
    fn write_data(
        &self,
        kind: QuantityKind,
        info: &InterfaceMesh,
        out: &mut [f64],
    ) -> CouplingResult<()> {
        match kind {
            QuantityKind::NodePosition => {
                // 发送位移叠加参考坐标后的绝对节点位置
                let values = scatter_nodal(info, &self.solution, 3, true)?;
                CouplingError::check_buffer("position_out", values.len(), out.len())?;
                out.copy_from_slice(&values);
                Ok(())
            }
            other => Err(CouplingError::unknown_quantity(other, "write_data")),
        }
    }

    fn read_data(
        &mut self,
        kind: QuantityKind,
        info: &InterfaceMesh,
        data: &[f64],
    ) -> CouplingResult<()> {
        match kind {
            QuantityKind::WallForce => {
                let gathered = gather_nodal(info, data, 3)?;
                self.load_map = gathered
                    .into_iter()
                    .map(|(node, c)| (node, Point3D::new(c[0], c[1], c[2])))
                    .collect();
                Ok(())
            }
            QuantityKind::AbsPressure => {
                self.elem_pressures = gather_element(info, data)?;
                Ok(())
            }
            other => Err(CouplingError::unknown_quantity(other, "read_data")),
        }
    }

    fn add_coupling(&mut self, name: &str, info: &InterfaceMesh) -> CouplingResult<()> {
        log::info!(
            "注册耦合 '{}': {} 个接口节点, {} 个边界单元",
            name,
            info.n_nodes(),
            info.n_elements()
        );
        Ok(())
    }
}

impl GlobalHandler for StructureAdapter {
    fn read_global(&mut self, kind: QuantityKind, data: &[f64]) -> CouplingResult<()> {
        match kind {
            QuantityKind::TimeStepSize => {
                CouplingError::check_buffer("dt", 1, data.len())?;
                self.dt = Some(data[0]);
                Ok(())
            }
            other => Err(CouplingError::unknown_quantity(other, "read_global")),
        }
    }

    fn write_global(&self, kind: QuantityKind, out: &mut [f64]) -> CouplingResult<()> {
        match kind {
            QuantityKind::TimeStepSize => {
                CouplingError::check_buffer("dt", 1, out.len())?;
                out[0] = self.dt.unwrap_or(0.0);
                Ok(())
            }
            other => Err(CouplingError::unknown_quantity(other, "write_global")),
        }
    }
}

impl StateSerialize for StructureAdapter {
    fn serialize_state(&self) -> CouplingResult<ExchangeRecord> {
        Ok(ExchangeRecord {
            node_forces: self
                .load_map
                .iter()
                .map(|(&node, f)| (node, [f.x, f.y, f.z]))
                .collect(),
            elem_pressures: self.elem_pressures.clone(),
            dt: self.dt,
            // 收敛判定属于交换任务，适配器自身不携带终止状态
            status: ConvergenceState::Continue,
        })
    }

    fn deserialize_state(&mut self, record: &ExchangeRecord) -> CouplingResult<()> {
        self.load_map = record
            .node_forces
            .iter()
            .map(|&(node, f)| (node, Point3D::new(f[0], f[1], f[2])))
            .collect();
        self.elem_pressures = record.elem_pressures.clone();
        if record.dt.is_some() {
            self.dt = record.dt;
        }
        Ok(())
    }
}
