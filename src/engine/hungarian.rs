// ==========================================
// 技能任务分派系统 - 最优分派求解器（匈牙利算法）
// ==========================================
// 红线: 不合格单元格永不被选中
// ==========================================
// 职责: 在成本矩阵上求最小总成本匹配
// 算法: Kuhn-Munkres（势函数 + 最短增广路）,O(n³),n = max(rows, cols)
// 处理:
// 1) 非方阵 → 以零成本虚拟行/列补齐
// 2) 不合格单元格 → 屏障权重 BARRIER > 任意可行匹配总成本
//    先最大化可行匹配数,再最小化成本;残留屏障单元格视为未匹配
// 3) 同成本多解 → 在紧边子图上取字典序最小匹配
//    (task_id 小者优先取 user_id 小者)
// ==========================================

use crate::engine::cost_matrix::CostMatrix;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::VecDeque;
use tracing::{debug, instrument};

// ==========================================
// Matching - 求解结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matching {
    /// (行, 列) 仅含真实且合格的配对,按行升序
    pub pairs: Vec<(usize, usize)>,
    /// 配对成本总和（量化单位）
    pub total_units: u64,
}

// ==========================================
// HungarianSolver - 无状态求解器
// ==========================================
pub struct HungarianSolver;

impl HungarianSolver {
    /// 求解最小成本匹配
    ///
    /// # 返回
    /// - 可行配对数最大、且在此前提下总成本最小的匹配
    /// - 同成本时取字典序最小者
    ///
    /// # 错误
    /// - SolverInternalInconsistency: 屏障权重溢出 / 结果违反算法不变量
    #[instrument(skip_all, fields(rows = matrix.rows(), cols = matrix.cols()))]
    pub fn solve(matrix: &CostMatrix) -> EngineResult<Matching> {
        if matrix.is_empty() || matrix.eligible_cells() == 0 {
            debug!("无可行单元格,跳过求解");
            return Ok(Matching::default());
        }

        let padded = PaddedMatrix::from_cost_matrix(matrix)?;
        let mut state = solve_square(&padded.weights)?;
        verify_dual_feasibility(&padded, &state)?;
        canonicalize(&padded, &mut state);

        let mut pairs = Vec::new();
        let mut total_units: u64 = 0;
        for row in 0..padded.real_rows {
            let col = state.col_of_row[row];
            if col >= padded.real_cols {
                continue; // 虚拟列: 任务未分派
            }
            if let Some(cost) = matrix.get(row, col) {
                total_units = total_units.checked_add(cost.units()).ok_or_else(|| {
                    EngineError::SolverInternalInconsistency("匹配成本总和溢出".to_string())
                })?;
                pairs.push((row, col));
            }
        }

        verify_matching(matrix, &pairs)?;

        debug!(
            matched = pairs.len(),
            total_units,
            size = padded.size,
            "匈牙利算法求解完成"
        );
        Ok(Matching { pairs, total_units })
    }
}

// ==========================================
// PaddedMatrix - 补齐后的整数方阵
// ==========================================
struct PaddedMatrix {
    size: usize,
    real_rows: usize,
    real_cols: usize,
    weights: Vec<Vec<i64>>,
    feasible: Vec<Vec<bool>>, // 真实且合格
}

impl PaddedMatrix {
    fn from_cost_matrix(matrix: &CostMatrix) -> EngineResult<Self> {
        let real_rows = matrix.rows();
        let real_cols = matrix.cols();
        let size = real_rows.max(real_cols);

        // 屏障: 严格大于任意一组可行单元格的成本之和
        let barrier = matrix
            .max_units()
            .checked_mul(real_rows.min(real_cols) as u64)
            .and_then(|v| v.checked_add(1))
            .filter(|v| *v <= (i64::MAX as u64) / 4 / (size as u64 + 1))
            .ok_or_else(|| {
                EngineError::SolverInternalInconsistency(format!(
                    "屏障权重溢出: max_units={}, size={}",
                    matrix.max_units(),
                    size
                ))
            })? as i64;

        let mut weights = vec![vec![0i64; size]; size];
        let mut feasible = vec![vec![false; size]; size];
        for row in 0..real_rows {
            for col in 0..real_cols {
                match matrix.get(row, col) {
                    Some(cost) => {
                        weights[row][col] = cost.units() as i64;
                        feasible[row][col] = true;
                    }
                    None => weights[row][col] = barrier,
                }
            }
        }

        Ok(Self {
            size,
            real_rows,
            real_cols,
            weights,
            feasible,
        })
    }

    fn is_tight(&self, state: &SolveState, row: usize, col: usize) -> bool {
        self.weights[row][col] - state.u[row + 1] - state.v[col + 1] == 0
    }
}

// ==========================================
// SolveState - 匹配 + 对偶势
// ==========================================
struct SolveState {
    col_of_row: Vec<usize>,
    row_of_col: Vec<usize>,
    u: Vec<i64>, // 行势,1 起始
    v: Vec<i64>, // 列势,1 起始
}

/// 方阵 Kuhn-Munkres（最短增广路版本）
///
/// 行按 0..n 顺序依次加入;同等 delta 时取下标最小的列,保证确定性
fn solve_square(a: &[Vec<i64>]) -> EngineResult<SolveState> {
    let n = a.len();
    let inf = i64::MAX;
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    let mut p = vec![0usize; n + 1]; // p[j] = 匹配到列 j 的行（1 起始,0 = 空）
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![inf; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = inf;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = a[i0 - 1][j - 1] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            if j1 == 0 || delta == inf {
                return Err(EngineError::SolverInternalInconsistency(format!(
                    "第 {} 行找不到增广列",
                    i
                )));
            }

            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // 沿 way 回溯翻转增广路
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut col_of_row = vec![usize::MAX; n];
    let mut row_of_col = vec![usize::MAX; n];
    for j in 1..=n {
        if p[j] == 0 {
            return Err(EngineError::SolverInternalInconsistency(format!(
                "列 {} 未被匹配",
                j - 1
            )));
        }
        col_of_row[p[j] - 1] = j - 1;
        row_of_col[j - 1] = p[j] - 1;
    }
    if col_of_row.iter().any(|&c| c == usize::MAX) {
        return Err(EngineError::SolverInternalInconsistency(
            "求解结果不是完美匹配".to_string(),
        ));
    }

    Ok(SolveState {
        col_of_row,
        row_of_col,
        u,
        v,
    })
}

/// 对偶可行性: 所有约化成本 >= 0,匹配边约化成本 = 0
fn verify_dual_feasibility(padded: &PaddedMatrix, state: &SolveState) -> EngineResult<()> {
    for row in 0..padded.size {
        for col in 0..padded.size {
            let reduced = padded.weights[row][col] - state.u[row + 1] - state.v[col + 1];
            if reduced < 0 {
                return Err(EngineError::SolverInternalInconsistency(format!(
                    "约化成本为负: row={}, col={}, reduced={}",
                    row, col, reduced
                )));
            }
        }
        if !padded.is_tight(state, row, state.col_of_row[row]) {
            return Err(EngineError::SolverInternalInconsistency(format!(
                "匹配边不是紧边: row={}, col={}",
                row, state.col_of_row[row]
            )));
        }
    }
    Ok(())
}

/// 在紧边子图上取字典序最小的完美匹配
///
/// 所有最优匹配都落在同一组最优对偶势的紧边子图内,
/// 因此逐行固定"可固定的最小列"不会改变总成本。
/// 真实行按行号（task_id 升序）处理,只固定合格真实列（user_id 升序）;
/// 没有可固定合格列的行保持未固定,不占用任何列,留给后续行改配时挪动。
fn canonicalize(padded: &PaddedMatrix, state: &mut SolveState) {
    let mut fixed_col = vec![false; padded.size];

    for row in 0..padded.real_rows {
        for col in 0..padded.real_cols {
            if fixed_col[col] || !padded.feasible[row][col] || !padded.is_tight(state, row, col) {
                continue;
            }
            if state.col_of_row[row] == col || reroute(padded, state, row, col, &fixed_col) {
                fixed_col[col] = true;
                break;
            }
        }
    }
}

/// 让 row 改配 target 列,沿紧边交替路为原占用行寻找替代列
///
/// 成功时就地改写匹配并返回 true
fn reroute(
    padded: &PaddedMatrix,
    state: &mut SolveState,
    row: usize,
    target: usize,
    fixed_col: &[bool],
) -> bool {
    let n = padded.size;
    let freed = state.col_of_row[row]; // row 让出的列
    let start = state.row_of_col[target]; // 需要另找列的行

    let mut parent = vec![usize::MAX; n]; // 列 -> 发现该列的行
    let mut queue = VecDeque::new();
    queue.push_back(start);
    let mut found = false;

    'bfs: while let Some(r) = queue.pop_front() {
        for c in 0..n {
            if c == target || fixed_col[c] || parent[c] != usize::MAX {
                continue;
            }
            if !padded.is_tight(state, r, c) {
                continue;
            }
            parent[c] = r;
            if c == freed {
                found = true;
                break 'bfs;
            }
            queue.push_back(state.row_of_col[c]);
        }
    }

    if !found {
        return false;
    }

    // 从 freed 回溯,逐行改配
    let mut col = freed;
    loop {
        let r = parent[col];
        let previous = state.col_of_row[r];
        state.col_of_row[r] = col;
        state.row_of_col[col] = r;
        if r == start {
            break;
        }
        col = previous;
    }
    state.col_of_row[row] = target;
    state.row_of_col[target] = row;
    true
}

/// 输出不变量: 行、列均不重复,且只含合格单元格
fn verify_matching(matrix: &CostMatrix, pairs: &[(usize, usize)]) -> EngineResult<()> {
    let mut row_seen = vec![false; matrix.rows()];
    let mut col_seen = vec![false; matrix.cols()];
    for &(row, col) in pairs {
        if row_seen[row] || col_seen[col] {
            return Err(EngineError::SolverInternalInconsistency(format!(
                "重复分派: row={}, col={}",
                row, col
            )));
        }
        if matrix.get(row, col).is_none() {
            return Err(EngineError::SolverInternalInconsistency(format!(
                "选中了不合格单元格: row={}, col={}",
                row, col
            )));
        }
        row_seen[row] = true;
        col_seen[col] = true;
    }
    if pairs.len() > matrix.rows().min(matrix.cols()) {
        return Err(EngineError::SolverInternalInconsistency(format!(
            "匹配数 {} 超过 min(rows, cols)",
            pairs.len()
        )));
    }
    Ok(())
}
