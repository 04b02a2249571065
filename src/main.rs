// ==========================================
// 技能任务分派系统 - 命令行入口
// ==========================================
// 用法:
//   task-assign [snapshot.json|db_path] [--strategy optimal|greedy]
//               [--profile balanced|workload|skills|priority] [--config engine.json]
//               [--project ID] [--as-of RFC3339] [--format json|csv]
//               [--compare] [--log-json]
//
// 结果写到 stdout,日志写到 stderr;不写回数据库
// ==========================================

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use task_assign::api::{write_json, write_result_csv, AssignmentApi};
use task_assign::config::{ConfigManager, EngineConfig, WeightProfile};
use task_assign::db::{default_db_path, open_sqlite_connection};
use task_assign::importer::SnapshotFile;
use task_assign::repository::{SnapshotSource, SqliteSnapshotRepository};
use task_assign::{logging, AssignmentStrategy};

/// 技能任务分派: 为未分派任务选出合格且总成本最低的负责人
#[derive(Debug, Parser)]
#[command(name = "task-assign", version, about)]
struct Cli {
    /// 快照来源: *.json 快照文件或 SQLite 数据库路径（默认数据目录下的数据库）
    source: Option<String>,

    /// 分派策略
    #[arg(long, value_enum, default_value_t = StrategyArg::Optimal)]
    strategy: StrategyArg,

    /// 权重方案,覆盖配置中的权重
    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    /// 引擎参数 JSON 文件
    #[arg(long = "config", value_name = "FILE")]
    config_path: Option<String>,

    /// 仅分派该项目（数据库来源）
    #[arg(long = "project", value_name = "ID")]
    project_id: Option<i64>,

    /// 交期参考时刻（RFC3339,默认当前时间）
    #[arg(long, value_name = "RFC3339", value_parser = parse_as_of)]
    as_of: Option<DateTime<Utc>>,

    /// 输出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// 同时运行 optimal 与 greedy 并对比（仅 json）
    #[arg(long)]
    compare: bool,

    /// JSON 行格式日志
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum StrategyArg {
    Optimal,
    Greedy,
}

impl From<StrategyArg> for AssignmentStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Optimal => AssignmentStrategy::Optimal,
            StrategyArg::Greedy => AssignmentStrategy::Greedy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ProfileArg {
    Balanced,
    Workload,
    Skills,
    Priority,
}

impl From<ProfileArg> for WeightProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Balanced => WeightProfile::Balanced,
            ProfileArg::Workload => WeightProfile::Workload,
            ProfileArg::Skills => WeightProfile::Skills,
            ProfileArg::Priority => WeightProfile::Priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

fn parse_as_of(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("无效的时刻 {}: {}", raw, e))
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    if args.compare && args.format == OutputFormat::Csv {
        bail!("--compare 仅支持 json 输出");
    }

    if args.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", task_assign::APP_NAME, task_assign::VERSION);

    // 参考时刻只在入口读取一次,引擎内部不读时钟
    let as_of = args.as_of.unwrap_or_else(Utc::now);
    let source = args.source.clone().unwrap_or_else(default_db_path);

    if source.ends_with(".json") {
        if args.project_id.is_some() {
            tracing::warn!("快照文件来源忽略 --project");
        }
        let snapshot = SnapshotFile::load(Path::new(&source))?;
        let config = resolve_config(&args, EngineConfig::default())?;
        execute(AssignmentApi::new(snapshot, config)?, &args, as_of)
    } else {
        tracing::info!(db_path = %source, "使用数据库快照");
        let conn = open_sqlite_connection(&source)
            .with_context(|| format!("无法打开数据库: {}", source))?;
        let conn = Arc::new(Mutex::new(conn));

        let stored = ConfigManager::from_connection(conn.clone()).load_engine_config()?;
        let config = resolve_config(&args, stored)?;

        let mut repo = SqliteSnapshotRepository::from_connection(conn);
        if let Some(project_id) = args.project_id {
            repo = repo.with_project(project_id);
        }
        execute(AssignmentApi::new(repo, config)?, &args, as_of)
    }
}

/// 配置优先级: --config 文件 > 数据库/默认;--profile 再覆盖权重
fn resolve_config(args: &Cli, base: EngineConfig) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取配置文件: {}", path))?;
            EngineConfig::from_json_str(&raw)?
        }
        None => base,
    };
    if let Some(profile) = args.profile {
        config.weights = WeightProfile::from(profile).weights();
    }
    Ok(config)
}

fn execute<S: SnapshotSource>(
    api: AssignmentApi<S>,
    args: &Cli,
    as_of: DateTime<Utc>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();

    if args.compare {
        let comparison = api.compare_strategies(as_of)?;
        write_json(&comparison, stdout.lock())?;
        println!();
        return Ok(());
    }

    let report = api.assign(args.strategy.into(), as_of)?;
    tracing::info!(
        strategy = %report.result.strategy,
        assigned = report.result.assigned_count(),
        unassigned = report.result.unassigned_count(),
        "{}",
        report.result.strategy.title_cn()
    );

    match args.format {
        OutputFormat::Json => {
            write_json(&report, stdout.lock())?;
            println!();
        }
        OutputFormat::Csv => write_result_csv(&report.result, stdout.lock())?,
    }
    Ok(())
}
