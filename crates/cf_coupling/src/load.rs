// crates/cf_coupling/src/load.rs

//! 压力载荷函数
//!
//! 把按边界单元接收的压力值包装成按空间参数点查询的载荷函数，
//! 供结构求解器在装配面积分时逐积分点求值。

use crate::error::{CouplingError, CouplingResult};
use cf_mesh::{FeModel, InterfaceMesh};

/// 按参数点查询的单元压力载荷
///
/// 求值流程：参数点定位体单元，判断所在面，再经接口溯源表
/// 找到对应的边界单元压力。压力取负号后返回，表示指向面内
/// 法向的载荷。落在未耦合面上的点返回零。
#[derive(Debug)]
pub struct PressureLoad<'a> {
    model: &'a FeModel,
    info: &'a InterfaceMesh,
    values: &'a [f64],
    patch: usize,
}

impl<'a> PressureLoad<'a> {
    /// 创建载荷函数
    ///
    /// # 错误
    ///
    /// 压力数组长度不等于接口边界单元数时返回
    /// [`CouplingError::BufferSizeMismatch`]。
    pub fn new(
        model: &'a FeModel,
        info: &'a InterfaceMesh,
        values: &'a [f64],
        patch: usize,
    ) -> CouplingResult<Self> {
        CouplingError::check_buffer("pressure_values", info.n_elements(), values.len())?;
        Ok(Self {
            model,
            info,
            values,
            patch,
        })
    }

    /// 切换求值所在的片
    pub fn init_patch(&mut self, patch: usize) {
        self.patch = patch;
    }

    /// 在参数点 `u` 处求压力值
    ///
    /// # 错误
    ///
    /// 参数坐标超出 `[0, 1]` 或片编号无效时返回网格层错误。
    pub fn evaluate(&self, u: [f64; 3]) -> CouplingResult<f64> {
        let element = self.model.find_element(self.patch, u)?;
        let face = self.model.parameter_face(self.patch, u)?;
        match self.info.locate(element, face) {
            Some(index) => Ok(-self.values[index]),
            None => Ok(0.0),
        }
    }
}
