// crates/cf_coupling/src/config.rs

//! 耦合运行配置
//!
//! JSON 格式的运行配置，所有字段可省略并取默认值。

use crate::error::CouplingResult;
use cf_foundation::CfError;
use cf_mesh::topology::BoundaryItem;
use cf_mesh::{Discretization, ElementOrder, FeModel, HexPatch};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 耦合运行配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CouplingConfig {
    /// 结构网格
    #[serde(default)]
    pub mesh: MeshSection,
    /// 耦合边界
    #[serde(default)]
    pub coupling: CouplingSection,
    /// 回放运行
    #[serde(default)]
    pub run: RunSection,
}

/// 结构网格配置段
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshSection {
    /// 三个方向的单元数
    #[serde(default = "default_elements")]
    pub elements: [usize; 3],
    /// 单元阶次
    #[serde(default = "default_order")]
    pub order: ElementOrder,
    /// 离散格式
    #[serde(default = "default_discretization")]
    pub discretization: Discretization,
    /// 三个方向的几何长度
    #[serde(default = "default_lengths")]
    pub lengths: [f64; 3],
}

/// 耦合边界配置段
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CouplingSection {
    /// 边界集名称
    #[serde(default = "default_set_name")]
    pub set: String,
    /// 参与耦合的面编号 (1..=6)
    #[serde(default = "default_faces")]
    pub faces: Vec<u8>,
}

/// 回放运行配置段
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// 最大回放时间层数
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// 交换记录文件；缺省时使用内存存储
    #[serde(default)]
    pub records: Option<PathBuf>,
}

fn default_elements() -> [usize; 3] {
    [1, 1, 1]
}

fn default_order() -> ElementOrder {
    ElementOrder::Linear
}

fn default_discretization() -> Discretization {
    Discretization::Lagrange
}

fn default_lengths() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_set_name() -> String {
    "interface".to_string()
}

fn default_faces() -> Vec<u8> {
    vec![1]
}

fn default_steps() -> usize {
    10
}

impl Default for MeshSection {
    fn default() -> Self {
        Self {
            elements: default_elements(),
            order: default_order(),
            discretization: default_discretization(),
            lengths: default_lengths(),
        }
    }
}

impl Default for CouplingSection {
    fn default() -> Self {
        Self {
            set: default_set_name(),
            faces: default_faces(),
        }
    }
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            records: None,
        }
    }
}

impl CouplingConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CfError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CfError::file_not_found(path.display().to_string()));
        }
        let content =
            fs::read_to_string(path).map_err(|e| CfError::io_with_source("读取配置文件失败", e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| CfError::config(format!("解析配置文件失败: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置一致性
    pub fn validate(&self) -> Result<(), CfError> {
        if self.mesh.elements.iter().any(|&n| n == 0) {
            return Err(CfError::config("每个方向的单元数必须大于 0"));
        }
        if self.mesh.lengths.iter().any(|&l| l <= 0.0) {
            return Err(CfError::config("每个方向的几何长度必须大于 0"));
        }
        if self.coupling.faces.is_empty() {
            return Err(CfError::config("至少需要一个耦合面"));
        }
        for &face in &self.coupling.faces {
            if !(1..=6).contains(&face) {
                return Err(CfError::config(format!("无效的面编号: {}", face)));
            }
        }
        if self.coupling.set.is_empty() {
            return Err(CfError::config("边界集名称不能为空"));
        }
        Ok(())
    }

    /// 按配置构建带命名边界集的结构模型
    pub fn build_model(&self) -> CouplingResult<FeModel> {
        let [nx, ny, nz] = self.mesh.elements;
        let patch = HexPatch::new(
            nx,
            ny,
            nz,
            self.mesh.order,
            self.mesh.discretization,
            cf_mesh::Point3D::ZERO,
            self.mesh.lengths,
        )?;
        let mut model = FeModel::new();
        let pid = model.add_patch(patch);
        let items: Vec<BoundaryItem> = self
            .coupling
            .faces
            .iter()
            .map(|&face| BoundaryItem::new(pid, face))
            .collect();
        model.register_set(&self.coupling.set, items)?;
        Ok(model)
    }
}
