// ==========================================
// 最优性测试（穷举对照）
// ==========================================
// 职责: 在 ≤ 6×6 的随机快照上,用穷举枚举所有可行匹配,
//       验证匈牙利求解器与引擎结果达到同一最优目标
// 目标: 先最大化已分派任务数,再最小化总成本（量化单位）,
//       最后取字典序最小的分派（未分派排最后）
// ==========================================

mod test_helpers;

use task_assign::domain::types::AssignmentStrategy;
use task_assign::engine::{Cost, CostMatrix, CostMatrixBuilder, HungarianSolver};
use task_assign::{AssignmentEngine, EngineConfig, Task, User, WeightProfile};
use test_helpers::{as_of, random_snapshot, Lcg};

/// 穷举最优解
#[derive(Debug, Clone, PartialEq, Eq)]
struct BruteForceBest {
    count: usize,
    cost: u64,
    /// 每行选中的列,未分派为 None
    assignment: Vec<Option<usize>>,
}

impl BruteForceBest {
    /// 排序键: 分派数降序,成本升序,逐行列号升序（未分派排最后）
    fn beats(&self, other: &BruteForceBest) -> bool {
        if self.count != other.count {
            return self.count > other.count;
        }
        if self.cost != other.cost {
            return self.cost < other.cost;
        }
        let key = |a: &Option<usize>| a.unwrap_or(usize::MAX);
        self.assignment.iter().map(key).lt(other.assignment.iter().map(key))
    }

    fn pairs(&self) -> Vec<(usize, usize)> {
        self.assignment
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|c| (row, c)))
            .collect()
    }
}

/// 穷举: 最大匹配数,其下最小成本,其下字典序最小的分派
fn brute_force(matrix: &CostMatrix) -> BruteForceBest {
    fn search(
        matrix: &CostMatrix,
        current: &mut BruteForceBest,
        used: &mut Vec<bool>,
        best: &mut Option<BruteForceBest>,
    ) {
        let row = current.assignment.len();
        if row == matrix.rows() {
            if best.as_ref().map_or(true, |b| current.beats(b)) {
                *best = Some(current.clone());
            }
            return;
        }

        for col in 0..matrix.cols() {
            if used[col] {
                continue;
            }
            if let Some(c) = matrix.get(row, col) {
                used[col] = true;
                current.assignment.push(Some(col));
                current.count += 1;
                current.cost += c.units();
                search(matrix, current, used, best);
                current.cost -= c.units();
                current.count -= 1;
                current.assignment.pop();
                used[col] = false;
            }
        }

        // 本行不分派
        current.assignment.push(None);
        search(matrix, current, used, best);
        current.assignment.pop();
    }

    let mut current = BruteForceBest {
        count: 0,
        cost: 0,
        assignment: Vec::new(),
    };
    let mut best = None;
    let mut used = vec![false; matrix.cols()];
    search(matrix, &mut current, &mut used, &mut best);
    best.unwrap_or(current)
}

/// 小成本值域 + 部分不合格单元格的随机矩阵,制造大量并列
fn random_tied_matrix(rng: &mut Lcg, rows: usize, cols: usize) -> CostMatrix {
    let cells = (0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| {
                    if rng.below(4) == 0 {
                        None
                    } else {
                        Some(Cost::from_units(rng.below(4) as u64))
                    }
                })
                .collect()
        })
        .collect();
    CostMatrix::from_rows(
        (1..=rows as i64).collect(),
        (1..=cols as i64).collect(),
        cells,
    )
    .unwrap()
}

fn build(config: &EngineConfig, tasks: &[Task], users: &[User]) -> CostMatrix {
    let task_refs: Vec<&Task> = tasks.iter().collect();
    let user_refs: Vec<&User> = users.iter().collect();
    CostMatrixBuilder::new(config, as_of())
        .build(&task_refs, &user_refs)
        .unwrap()
}

#[test]
fn test_solver_matches_brute_force() {
    let config = EngineConfig::default();
    let mut rng = Lcg::new(42);

    for round in 0..200 {
        let n_tasks = 1 + rng.below(6) as usize;
        let n_users = 1 + rng.below(6) as usize;
        let (tasks, users) = random_snapshot(&mut rng, n_tasks, n_users);
        let matrix = build(&config, &tasks, &users);

        let best = brute_force(&matrix);
        let matching = HungarianSolver::solve(&matrix).unwrap();

        assert_eq!(matching.pairs.len(), best.count, "round={}", round);
        assert_eq!(matching.total_units, best.cost, "round={}", round);
        assert_eq!(matching.pairs, best.pairs(), "round={}", round);
    }
}

#[test]
fn test_tie_break_matches_brute_force_with_ineligible_cells() {
    let mut rng = Lcg::new(314);

    for round in 0..3000 {
        let rows = 1 + rng.below(5) as usize;
        let cols = 1 + rng.below(5) as usize;
        let matrix = random_tied_matrix(&mut rng, rows, cols);

        let best = brute_force(&matrix);
        let matching = HungarianSolver::solve(&matrix).unwrap();

        assert_eq!(matching.total_units, best.cost, "round={}", round);
        assert_eq!(
            matching.pairs,
            best.pairs(),
            "round={}, best={:?}",
            round,
            best.assignment
        );
    }
}

#[test]
fn test_engine_total_cost_matches_brute_force_for_each_profile() {
    let mut rng = Lcg::new(2026);

    for profile in [
        WeightProfile::Balanced,
        WeightProfile::Workload,
        WeightProfile::Skills,
        WeightProfile::Priority,
    ] {
        let config = EngineConfig::with_profile(profile);
        let engine = AssignmentEngine::new(config.clone(), as_of());

        for _ in 0..40 {
            let n_tasks = 1 + rng.below(6) as usize;
            let n_users = 1 + rng.below(6) as usize;
            let (tasks, users) = random_snapshot(&mut rng, n_tasks, n_users);

            let best = brute_force(&build(&config, &tasks, &users));
            let result = engine
                .run_assignment(&tasks, &users, AssignmentStrategy::Optimal)
                .unwrap();

            assert_eq!(result.assigned_count(), best.count, "profile={}", profile);
            let expected = best.cost as f64 / 1000.0;
            assert!(
                (result.total_cost() - expected).abs() < 1e-6,
                "profile={}, got={}, expected={}",
                profile,
                result.total_cost(),
                expected
            );
        }
    }
}

#[test]
fn test_dense_ties_still_optimal_and_canonical() {
    // 全部任务/用户同质: 所有完美匹配等价,应取对角线配对
    let config = EngineConfig::default();
    let tasks: Vec<Task> = (1..=6).map(Task::new).collect();
    let users: Vec<User> = (1..=6).map(User::new).collect();
    let matrix = build(&config, &tasks, &users);

    let matching = HungarianSolver::solve(&matrix).unwrap();
    assert_eq!(matching.pairs, (0..6).map(|i| (i, i)).collect::<Vec<_>>());
    assert_eq!(matching.total_units, brute_force(&matrix).cost);
}
