// apps/cf_cli/src/commands/run.rs

//! 回放耦合运行命令
//!
//! 按配置构建结构模型和接口网格，逐时间层回放交换记录，
//! 并汇报每层接收到的载荷统计。`--record` 先录制一段合成
//! 记录，便于在没有真实耦合服务器输出时演练完整数据通路。

use anyhow::{Context, Result};
use cf_coupling::{
    ConvergenceState, CouplingConfig, DataHandler, GlobalHandler, JsonFileStore, MemoryStore,
    MockJob, PressureLoad, QuantityKind, RecordStore, StructureAdapter,
};
use cf_mesh::{InterfaceMesh, StructuralMesh};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// 回放参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 覆盖配置中的最大时间层数
    #[arg(short, long)]
    pub steps: Option<usize>,

    /// 先录制合成交换记录再回放
    #[arg(long)]
    pub record: bool,
}

/// 执行回放命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== CoupleFEM 耦合回放启动 ===");

    let config = match &args.config {
        Some(path) => CouplingConfig::from_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => CouplingConfig::default(),
    };
    let steps = args.steps.unwrap_or(config.run.steps);

    let model = config.build_model().context("构建结构模型失败")?;
    info!(
        "结构模型: {} 片, {} 节点, {} 单元",
        model.n_patches(),
        model.n_nodes(),
        model.n_elements()
    );

    // 内存存储在录制与回放之间共享同一底层表
    let memory = MemoryStore::new();
    let open_store = |memory: &MemoryStore| -> Result<Box<dyn RecordStore>> {
        match &config.run.records {
            Some(path) => Ok(Box::new(
                JsonFileStore::open(path)
                    .with_context(|| format!("打开记录文件失败: {}", path.display()))?,
            )),
            None => Ok(Box::new(memory.clone())),
        }
    };

    if args.record {
        record_synthetic(&config, &model, open_store(&memory)?, steps)?;
    }

    // 回放
    let mut adapter = StructureAdapter::new(model.n_nodes());
    let mut job = MockJob::new(open_store(&memory)?);
    job.setup(&config.coupling.set, &model, &mut adapter)
        .context("初始化耦合失败")?;
    let info_mesh = job
        .interface()
        .cloned()
        .context("接口网格尚未构建")?;
    info!(
        "接口网格: {} 节点, {} 个 {} 边界单元",
        info_mesh.n_nodes(),
        info_mesh.n_elements(),
        info_mesh.element_type
    );

    let start = Instant::now();
    let mut replayed = 0usize;
    for step in 0..steps {
        let state = job.transfer(&mut adapter).context("回放交换记录失败")?;
        if state == ConvergenceState::Stop {
            if step == 0 {
                warn!("没有可回放的记录（可使用 --record 先录制合成记录）");
            }
            info!("时间层 {}: 记录耗尽", step);
            break;
        }
        replayed += 1;
        report_step(step, &config, &model, &info_mesh, &adapter)?;
        if state.is_terminal() {
            info!("时间层 {}: 状态 {}", step, state);
            break;
        }
    }

    info!("=== 回放完成 ===");
    info!("回放时间层数: {}", replayed);
    info!("耗时: {:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}

/// 录制合成交换记录：线性增长的压向载荷
fn record_synthetic(
    config: &CouplingConfig,
    model: &cf_mesh::FeModel,
    store: Box<dyn RecordStore>,
    steps: usize,
) -> Result<()> {
    let mut recorder = StructureAdapter::new(model.n_nodes());
    let mut job = MockJob::new(store);
    job.setup(&config.coupling.set, model, &mut recorder)
        .context("初始化录制任务失败")?;
    let info_mesh = job
        .interface()
        .cloned()
        .context("接口网格尚未构建")?;

    for level in 0..steps {
        let scale = (level + 1) as f64;
        let mut forces = vec![0.0; info_mesh.n_nodes() * 3];
        for chunk in forces.chunks_exact_mut(3) {
            chunk[2] = -scale;
        }
        recorder.read_data(QuantityKind::WallForce, &info_mesh, &forces)?;
        let pressures = vec![scale * 1.0e3; info_mesh.n_elements()];
        recorder.read_data(QuantityKind::AbsPressure, &info_mesh, &pressures)?;
        recorder.read_global(QuantityKind::TimeStepSize, &[0.01])?;
        let status = if level + 1 == steps {
            ConvergenceState::Converged
        } else {
            ConvergenceState::Continue
        };
        job.record(&recorder, status)?;
    }
    info!("已录制 {} 个合成时间层", steps);
    Ok(())
}

/// 汇报一个时间层接收到的载荷
fn report_step(
    step: usize,
    config: &CouplingConfig,
    model: &cf_mesh::FeModel,
    info_mesh: &InterfaceMesh,
    adapter: &StructureAdapter,
) -> Result<()> {
    // 把接收到的节点力累加到右端项并统计合力
    let mut rhs = vec![0.0; 3 * model.n_nodes()];
    adapter.apply_loads(&mut rhs)?;
    let mut total = [0.0f64; 3];
    for chunk in rhs.chunks_exact(3) {
        total[0] += chunk[0];
        total[1] += chunk[1];
        total[2] += chunk[2];
    }

    let pressures = adapter.element_pressures();
    let mean_pressure = if pressures.is_empty() {
        0.0
    } else {
        pressures.iter().sum::<f64>() / pressures.len() as f64
    };

    // 在第一个耦合面中心处采样压力载荷函数
    let sample = if pressures.is_empty() {
        0.0
    } else {
        let load = PressureLoad::new(model, info_mesh, pressures, 0)?;
        let face = config.coupling.faces[0];
        load.evaluate(face_centre(face))?
    };

    info!(
        "时间层 {}: 合力 = ({:.3e}, {:.3e}, {:.3e}), 平均压力 = {:.3e}, 面心载荷 = {:.3e}, dt = {:?}",
        step, total[0], total[1], total[2], mean_pressure, sample, adapter.time_step()
    );
    Ok(())
}

/// 面中心的参数坐标
fn face_centre(face: u8) -> [f64; 3] {
    let fixed = ((face - 1) / 2) as usize;
    let side = ((face - 1) % 2) as f64;
    let mut u = [0.5; 3];
    u[fixed] = side;
    u
}
