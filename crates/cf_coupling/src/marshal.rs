// crates/cf_coupling/src/marshal.rs

//! 接口数据编组
//!
//! 在模拟全局的按节点索引数组与接口网格次序的扁平缓冲区之间
//! 做正向/逆向映射（scatter/gather）。所有函数均为纯函数，
//! 不修改输入，不做 IO。
//!
//! # 次序契约
//!
//! 扁平缓冲区按 `info.nodes`（节点量）或 `info.origin_elements`
//! （单元量）的次序排列，每项 `ncomp` 个分量连续存储。

use crate::error::{CouplingError, CouplingResult};
use cf_foundation::ensure;
use cf_mesh::InterfaceMesh;
use std::collections::BTreeMap;

/// 将全局按节点索引的量散布到接口次序的扁平缓冲区
///
/// `out[i*ncomp + c] = source[info.nodes[i]*ncomp + c]`。
///
/// `add_reference` 为真时叠加接口节点坐标（把位移转换为绝对位置），
/// 仅对 `ncomp == 3` 有意义；这是调用方显式给出的标志，而非隐式行为。
///
/// # 错误
///
/// `ncomp` 为 0 时返回 [`CouplingError::BufferSizeMismatch`]；
/// 任一接口节点超出 `source` 的节点范围时返回
/// [`CouplingError::NodeOutOfRange`]。
pub fn scatter_nodal(
    info: &InterfaceMesh,
    source: &[f64],
    ncomp: usize,
    add_reference: bool,
) -> CouplingResult<Vec<f64>> {
    ensure!(
        ncomp > 0,
        CouplingError::buffer_size_mismatch("components_per_node", 1, ncomp)
    );
    if add_reference && ncomp != 3 {
        return Err(CouplingError::buffer_size_mismatch(
            "reference_offset",
            3,
            ncomp,
        ));
    }

    let extent = source.len() / ncomp;
    let mut out = Vec::with_capacity(info.nodes.len() * ncomp);
    for (i, &node) in info.nodes.iter().enumerate() {
        if (node + 1) * ncomp > source.len() {
            return Err(CouplingError::node_out_of_range(node, extent));
        }
        for c in 0..ncomp {
            let mut value = source[node * ncomp + c];
            if add_reference {
                value += info.coords[3 * i + c];
            }
            out.push(value);
        }
    }
    Ok(out)
}

/// 将接口次序的扁平缓冲区还原为按全局节点编号的映射
///
/// scatter 的逆操作。返回的映射按全局节点编号有序，调用方以
/// 整体替换（而非合并）的方式保存——每轮交换完全覆盖上一轮的载荷状态。
///
/// # 错误
///
/// 缓冲区长度不等于 `info.nodes.len() * ncomp` 时返回
/// [`CouplingError::BufferSizeMismatch`]。
pub fn gather_nodal(
    info: &InterfaceMesh,
    buffer: &[f64],
    ncomp: usize,
) -> CouplingResult<BTreeMap<usize, Vec<f64>>> {
    CouplingError::check_buffer("nodal_buffer", info.nodes.len() * ncomp, buffer.len())?;

    let mut result = BTreeMap::new();
    for (i, &node) in info.nodes.iter().enumerate() {
        result.insert(node, buffer[i * ncomp..(i + 1) * ncomp].to_vec());
    }
    Ok(result)
}

/// 拷贝每边界单元一个标量的缓冲区（如压力）
///
/// 结果按 `info.origin_elements` 次序排列。
///
/// # 错误
///
/// 缓冲区长度不等于边界单元数时返回
/// [`CouplingError::BufferSizeMismatch`]。
pub fn gather_element(info: &InterfaceMesh, buffer: &[f64]) -> CouplingResult<Vec<f64>> {
    CouplingError::check_buffer("element_buffer", info.n_elements(), buffer.len())?;
    Ok(buffer.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_mesh::topology::BoundaryItem;
    use cf_mesh::{build_interface_mesh, Discretization, ElementOrder, FeModel, HexPatch};

    fn face1_info() -> InterfaceMesh {
        let mut model = FeModel::new();
        let patch =
            HexPatch::unit_cube(2, 2, 2, ElementOrder::Linear, Discretization::Lagrange).unwrap();
        let pid = model.add_patch(patch);
        model
            .register_set("Face1", vec![BoundaryItem::new(pid, 1)])
            .unwrap();
        build_interface_mesh("Face1", &model).unwrap()
    }

    #[test]
    fn test_scatter_reference_scenario() {
        // d[node*3+c] = node*3+c 散布后应得 out[3i+j] == 3*nodes[i]+j
        let info = face1_info();
        let source: Vec<f64> = (0..27 * 3).map(|v| v as f64).collect();

        let out = scatter_nodal(&info, &source, 3, false).unwrap();
        assert_eq!(out.len(), info.nodes.len() * 3);
        for (i, &node) in info.nodes.iter().enumerate() {
            for j in 0..3 {
                assert_eq!(out[3 * i + j], (3 * node + j) as f64);
            }
        }
    }

    #[test]
    fn test_scatter_with_reference_offset() {
        let info = face1_info();
        let source = vec![0.0; 27 * 3];

        // 零位移 + 参考坐标 = 节点绝对位置
        let out = scatter_nodal(&info, &source, 3, true).unwrap();
        assert_eq!(out, info.coords);
    }

    #[test]
    fn test_scatter_zero_components_rejected() {
        // 分量数为 0 必须走错误路径而不是除零
        let info = face1_info();
        let err = scatter_nodal(&info, &[], 0, false).unwrap_err();
        assert!(matches!(err, CouplingError::BufferSizeMismatch { .. }));
    }

    #[test]
    fn test_scatter_out_of_range() {
        let info = face1_info();
        // 源数组只覆盖前 10 个节点，接口最大节点编号为 24
        let source = vec![0.0; 10 * 3];
        let err = scatter_nodal(&info, &source, 3, false).unwrap_err();
        assert!(matches!(err, CouplingError::NodeOutOfRange { .. }));
    }

    #[test]
    fn test_scatter_gather_roundtrip() {
        // scatter 后 gather 在覆盖的节点子集上是恒等映射
        let info = face1_info();
        let source: Vec<f64> = (0..27 * 3).map(|v| (v as f64) * 0.5).collect();

        let flat = scatter_nodal(&info, &source, 3, false).unwrap();
        let gathered = gather_nodal(&info, &flat, 3).unwrap();

        assert_eq!(gathered.len(), info.nodes.len());
        for (&node, comps) in &gathered {
            assert_eq!(comps.as_slice(), &source[node * 3..node * 3 + 3]);
        }
    }

    #[test]
    fn test_gather_replaces_ordering() {
        let info = face1_info();
        let buffer: Vec<f64> = (0..info.nodes.len() * 3).map(|v| v as f64).collect();

        let gathered = gather_nodal(&info, &buffer, 3).unwrap();
        // 映射按全局节点编号有序，与 info.nodes 次序一致
        let keys: Vec<usize> = gathered.keys().copied().collect();
        assert_eq!(keys, info.nodes);
        for (idx, (_, comps)) in gathered.iter().enumerate() {
            assert_eq!(comps[0], (idx * 3) as f64);
            assert_eq!(comps[2], (idx * 3 + 2) as f64);
        }
    }

    #[test]
    fn test_gather_size_mismatch() {
        let info = face1_info();
        let err = gather_nodal(&info, &[0.0; 5], 3).unwrap_err();
        assert!(matches!(err, CouplingError::BufferSizeMismatch { .. }));
    }

    #[test]
    fn test_gather_element() {
        let info = face1_info();
        let values = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(gather_element(&info, &values).unwrap(), values);
        assert!(gather_element(&info, &[1.0]).is_err());
    }
}
