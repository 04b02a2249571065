// ==========================================
// 技能任务分派系统 - 贪心分派器
// ==========================================
// 职责: 按紧急度逐个任务选取成本最低的空闲合格用户
// 排序: priority 降序 → due_date 升序（无交期排最后）→ task_id 升序
// 选取: 本轮未占用的合格用户中成本最低者,同成本取 user_id 最小
// 说明: 非最优,供对比与快速试算使用
// ==========================================

use crate::domain::Task;
use crate::engine::cost_matrix::CostMatrix;
use std::cmp::Ordering;
use tracing::{debug, instrument};

pub struct GreedyAssigner;

impl GreedyAssigner {
    /// 贪心分派
    ///
    /// # 参数
    /// - tasks: 与矩阵行一一对应（已按 task_id 升序）
    /// - matrix: 成本矩阵
    ///
    /// # 返回
    /// (行, 列) 配对,按行升序
    #[instrument(skip_all, fields(rows = matrix.rows(), cols = matrix.cols()))]
    pub fn assign(tasks: &[&Task], matrix: &CostMatrix) -> Vec<(usize, usize)> {
        let mut used = vec![false; matrix.cols()];
        let mut pairs = Vec::new();

        for row in Self::visit_order(tasks) {
            let best = (0..matrix.cols())
                .filter(|&col| !used[col])
                .filter_map(|col| matrix.get(row, col).map(|cost| (cost, col)))
                .min();

            match best {
                Some((_, col)) => {
                    used[col] = true;
                    pairs.push((row, col));
                }
                None => debug!(task_id = matrix.task_id(row), "贪心: 无可用用户"),
            }
        }

        pairs.sort_unstable();
        pairs
    }

    /// 行访问顺序
    pub fn visit_order(tasks: &[&Task]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..tasks.len()).collect();
        order.sort_by(|&a, &b| Self::urgency_cmp(tasks[a], tasks[b]));
        order
    }

    fn urgency_cmp(a: &Task, b: &Task) -> Ordering {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TaskPriority;
    use crate::engine::cost_matrix::Cost;
    use chrono::{TimeZone, Utc};

    fn matrix(n_tasks: usize, rows: Vec<Vec<Option<u64>>>) -> CostMatrix {
        let cols = rows.first().map_or(0, |r| r.len());
        CostMatrix::from_rows(
            (1..=n_tasks as i64).collect(),
            (1..=cols as i64).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(|c| c.map(Cost::from_units)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_visit_order() {
        let due = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap();
        let t1 = Task::new(1);
        let t2 = Task::new(2).with_priority(TaskPriority::Critical);
        let t3 = Task::new(3).with_due_date(later);
        let t4 = Task::new(4).with_due_date(due);
        let tasks = vec![&t1, &t2, &t3, &t4];

        assert_eq!(GreedyAssigner::visit_order(&tasks), vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_urgent_task_takes_cheapest_user_first() {
        let t1 = Task::new(1);
        let t2 = Task::new(2).with_priority(TaskPriority::High);
        let m = matrix(2, vec![vec![Some(1), Some(2)], vec![Some(1), Some(50)]]);

        // 任务 2 先选走用户 0,任务 1 只能拿用户 1
        let pairs = GreedyAssigner::assign(&[&t1, &t2], &m);
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_ties_pick_lowest_user() {
        let t1 = Task::new(1);
        let m = matrix(1, vec![vec![Some(3), Some(3), Some(3)]]);
        assert_eq!(GreedyAssigner::assign(&[&t1], &m), vec![(0, 0)]);
    }

    #[test]
    fn test_skips_task_without_free_eligible_user() {
        let t1 = Task::new(1);
        let t2 = Task::new(2);
        let m = matrix(2, vec![vec![Some(4), None], vec![Some(2), None]]);
        assert_eq!(GreedyAssigner::assign(&[&t1, &t2], &m), vec![(0, 0)]);
    }
}
