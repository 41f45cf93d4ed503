// apps/cf_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 验证配置文件、面模板和交换记录文件的正确性。

use anyhow::{bail, Context, Result};
use cf_coupling::{CouplingConfig, ExchangeRecord};
use cf_mesh::topology::validate_face_templates;
use cf_mesh::{build_interface_mesh, InterfaceMesh, StructuralMesh};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 交换记录文件路径
    #[arg(short, long)]
    pub records: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== CoupleFEM 配置验证 ===");

    let mut result = ValidationResult::default();

    // 面模板与参考定义一致性
    println!("\n检查面节点模板");
    match validate_face_templates() {
        Ok(()) => println!("  ✓ 面节点模板与参考定义一致"),
        Err(e) => result.add_error(format!("面节点模板校验失败: {}", e)),
    }

    let mut interface = None;
    if let Some(config_path) = &args.config {
        interface = validate_config(config_path, &mut result)?;
    }

    if let Some(records_path) = &args.records {
        validate_records(records_path, interface.as_ref(), &mut result)?;
    }

    print_validation_result(&result, args.strict)
}

fn validate_config(
    path: &PathBuf,
    result: &mut ValidationResult,
) -> Result<Option<InterfaceMesh>> {
    println!("\n检查配置文件: {}", path.display());

    let config = match CouplingConfig::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            result.add_error(format!("配置无效: {}", e));
            return Ok(None);
        }
    };
    println!("  ✓ 配置文件格式有效");

    if config.run.steps == 0 {
        result.add_warning("steps = 0，回放不会执行任何时间层");
    }

    // 配置能否走通接口网格构建
    let model = match config.build_model() {
        Ok(m) => m,
        Err(e) => {
            result.add_error(format!("结构模型构建失败: {}", e));
            return Ok(None);
        }
    };
    let info_mesh = match build_interface_mesh(&config.coupling.set, &model) {
        Ok(i) => i,
        Err(e) => {
            result.add_error(format!("接口网格构建失败: {}", e));
            return Ok(None);
        }
    };
    if let Err(e) = info_mesh.validate() {
        result.add_error(format!("接口网格不变量被破坏: {}", e));
        return Ok(None);
    }
    println!(
        "  ✓ 接口网格: {} 节点, {} 个 {} 单元",
        info_mesh.n_nodes(),
        info_mesh.n_elements(),
        info_mesh.element_type
    );

    if info_mesh.n_nodes() > model.n_nodes() {
        result.add_error("接口节点数超过模型节点总数");
    }
    Ok(Some(info_mesh))
}

fn validate_records(
    path: &PathBuf,
    interface: Option<&InterfaceMesh>,
    result: &mut ValidationResult,
) -> Result<()> {
    println!("\n检查记录文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("记录文件不存在: {}", path.display()));
        return Ok(());
    }
    let content = std::fs::read_to_string(path).context("无法读取记录文件")?;
    let records: Vec<(usize, ExchangeRecord)> = match serde_json::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            result.add_error(format!("记录文件解析错误: {}", e));
            return Ok(());
        }
    };
    println!("  ✓ {} 条记录", records.len());

    // 时间层应从 0 连续编号，回放在第一个空洞处停止
    let mut levels: Vec<usize> = records.iter().map(|(l, _)| *l).collect();
    levels.sort_unstable();
    levels.dedup();
    if levels.len() != records.len() {
        result.add_error("存在重复的时间层");
    }
    for (expect, &level) in levels.iter().enumerate() {
        if level != expect {
            result.add_warning(format!("时间层不连续: 缺少 {}，回放将在此停止", expect));
            break;
        }
    }

    if let Some(info_mesh) = interface {
        for (level, record) in &records {
            if !record.elem_pressures.is_empty()
                && record.elem_pressures.len() != info_mesh.n_elements()
            {
                result.add_error(format!(
                    "时间层 {}: 压力数组长度 {} 与边界单元数 {} 不符",
                    level,
                    record.elem_pressures.len(),
                    info_mesh.n_elements()
                ));
            }
            for &(node, _) in &record.node_forces {
                if info_mesh.nodes.binary_search(&node).is_err() {
                    result.add_warning(format!(
                        "时间层 {}: 节点 {} 不在接口节点表中",
                        level, node
                    ));
                    break;
                }
            }
        }
    }
    Ok(())
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
