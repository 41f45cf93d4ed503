// apps/cf_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示配置、结构模型和接口网格的摘要。

use anyhow::{Context, Result};
use cf_coupling::CouplingConfig;
use cf_mesh::{build_interface_mesh, StructuralMesh};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 显示默认配置 (JSON)
    #[arg(long)]
    pub defaults: bool,

    /// 打印完整的接口网格数组
    #[arg(long)]
    pub full: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== CoupleFEM 信息 ===");

    if args.defaults {
        print_default_config()?;
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => CouplingConfig::from_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => CouplingConfig::default(),
    };

    print_model_info(&config, args.full)
}

fn print_default_config() -> Result<()> {
    println!("=== 默认配置 ===");
    let config = CouplingConfig::default();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn print_model_info(config: &CouplingConfig, full: bool) -> Result<()> {
    let model = config.build_model().context("构建结构模型失败")?;

    println!("=== 结构模型 ===");
    println!("单元数: {:?}", config.mesh.elements);
    println!("阶次: {}", config.mesh.order);
    println!("节点总数: {}", model.n_nodes());
    println!("单元总数: {}", model.n_elements());
    println!("边界集: {:?}", model.set_names());

    let info_mesh = build_interface_mesh(&config.coupling.set, &model)
        .context("构建接口网格失败")?;

    println!("\n=== 接口网格 ===");
    println!("单元类型: {} ({} 节点/单元)", info_mesh.element_type, info_mesh.node_per_elm);
    println!("接口节点数: {}", info_mesh.n_nodes());
    println!("边界单元数: {}", info_mesh.n_elements());

    // 按面统计边界单元
    let mut per_face = [0usize; 6];
    for &(_, face) in &info_mesh.origin_elements {
        per_face[(face - 1) as usize] += 1;
    }
    for (idx, count) in per_face.iter().enumerate() {
        if *count > 0 {
            println!("面 {}: {} 个边界单元", idx + 1, count);
        }
    }

    if full {
        println!("\n{}", info_mesh);
    }
    Ok(())
}
