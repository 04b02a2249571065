// ==========================================
// 技能任务分派系统 - 资格过滤器
// ==========================================
// 红线: 不满足技能要求的 (任务, 用户) 对不得进入成本矩阵
// ==========================================
// 职责: 判定用户是否可执行任务
// 规则: 任务的每项技能要求,用户都持有同一技能且等级 >= 要求等级
// 约束: 纯函数,无状态、无副作用、无 I/O
// ==========================================

use crate::domain::types::SkillId;
use crate::domain::{Task, User};
use std::collections::BTreeMap;

/// 用户技能索引: skill_id -> level
pub type HoldingIndex = BTreeMap<SkillId, u8>;

// ==========================================
// EligibilityFilter - 纯函数工具类
// ==========================================
pub struct EligibilityFilter;

impl EligibilityFilter {
    /// 为用户建立技能索引
    ///
    /// 同一技能重复出现时取最高等级
    pub fn index_holdings(user: &User) -> HoldingIndex {
        let mut index = HoldingIndex::new();
        for holding in &user.skills {
            let level = index.entry(holding.skill_id).or_insert(holding.level);
            *level = (*level).max(holding.level);
        }
        index
    }

    /// 判定用户是否有资格执行任务
    ///
    /// # 规则
    /// - 无技能要求的任务 → 所有用户均有资格
    /// - 否则每项要求都需 held_level >= required_level
    pub fn is_eligible(task: &Task, user: &User) -> bool {
        Self::is_eligible_indexed(task, &Self::index_holdings(user))
    }

    /// 使用预建索引判定资格（成本矩阵批量构建时使用）
    pub fn is_eligible_indexed(task: &Task, holdings: &HoldingIndex) -> bool {
        task.required_skills.iter().all(|req| {
            holdings
                .get(&req.skill_id)
                .map_or(false, |&level| level >= req.required_level)
        })
    }

    /// 输出不合格原因（合格时为空）
    ///
    /// # 返回
    /// - MISSING_SKILL: 用户未持有该技能
    /// - LEVEL_TOO_LOW: 持有等级低于要求
    pub fn explain(task: &Task, user: &User) -> Vec<String> {
        let holdings = Self::index_holdings(user);
        let mut reasons = Vec::new();

        for req in &task.required_skills {
            match holdings.get(&req.skill_id) {
                None => reasons.push(format!("MISSING_SKILL: skill_id={}", req.skill_id)),
                Some(&level) if level < req.required_level => reasons.push(format!(
                    "LEVEL_TOO_LOW: skill_id={}, held={}, required={}",
                    req.skill_id, level, req.required_level
                )),
                Some(_) => {}
            }
        }

        reasons
    }
}
