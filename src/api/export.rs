// ==========================================
// 技能任务分派系统 - 结果导出
// ==========================================
// 支持: CSV（csv crate）/ JSON（serde_json）
// 列: task_id, user_id, cost, match_score, estimated_hours, reason
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::AssignmentResult;
use csv::WriterBuilder;
use std::io::Write;

const CSV_HEADERS: [&str; 6] = [
    "task_id",
    "user_id",
    "cost",
    "match_score",
    "estimated_hours",
    "reason",
];

/// 将分派结果写为 CSV（每个任务一行,按 task_id 升序）
pub fn write_result_csv<W: Write>(result: &AssignmentResult, writer: W) -> ApiResult<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    let export_err = |e: csv::Error| ApiError::ExportError(e.to_string());

    csv_writer.write_record(CSV_HEADERS).map_err(export_err)?;
    for entry in &result.entries {
        csv_writer
            .write_record([
                entry.task_id.to_string(),
                entry.user_id.map(|id| id.to_string()).unwrap_or_default(),
                entry.cost.map(|c| format!("{:.3}", c)).unwrap_or_default(),
                entry
                    .match_score
                    .map(|s| format!("{:.3}", s))
                    .unwrap_or_default(),
                format!("{}", entry.estimated_hours),
                entry.reason.map(|r| r.to_string()).unwrap_or_default(),
            ])
            .map_err(export_err)?;
    }
    csv_writer
        .flush()
        .map_err(|e| ApiError::ExportError(e.to_string()))?;
    Ok(())
}

/// 将任意可序列化结果写为格式化 JSON
pub fn write_json<T: serde::Serialize, W: Write>(value: &T, writer: W) -> ApiResult<()> {
    serde_json::to_writer_pretty(writer, value).map_err(|e| ApiError::ExportError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AssignmentStrategy, UnassignedReason};
    use crate::domain::AssignmentEntry;

    #[test]
    fn test_csv_layout() {
        let result = AssignmentResult {
            strategy: AssignmentStrategy::Optimal,
            entries: vec![
                AssignmentEntry::assigned(1, 7, 12.5, 3.0),
                AssignmentEntry::unassigned(2, UnassignedReason::NoEligibleUser, 1.0),
            ],
        };

        let mut buf = Vec::new();
        write_result_csv(&result, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "task_id,user_id,cost,match_score,estimated_hours,reason");
        assert_eq!(lines[1], "1,7,12.500,87.500,3,");
        assert_eq!(lines[2], "2,,,,1,NO_ELIGIBLE_USER");
    }
}
