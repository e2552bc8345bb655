// ==========================================
// 警务排班系统 - CLI 主入口
// ==========================================
// 用途: 解析指定班次与日期区间, 打印名册/顺位/核定结果
// 用法: patrol-roster <shift_id> <date_from> <date_to> [db_path] [--json]
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;

use patrol_roster::api::{ResolutionKey, RosterApi};
use patrol_roster::config::{get_default_db_path, RosterConfig};
use patrol_roster::logging;
use patrol_roster::repository::SqliteRosterStore;

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("无效日期 {} (期望 YYYY-MM-DD): {}", raw, e))
}

fn print_usage() {
    eprintln!("用法: patrol-roster <shift_id> <date_from> <date_to> [db_path] [--json]");
    eprintln!("示例: patrol-roster SHIFT_A 2026-03-02 2026-03-08");
    eprintln!("说明: db_path 缺省时读 PATROL_ROSTER_DB_PATH 或用户数据目录");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let json_output = raw.iter().any(|a| a == "--json");
    let args: Vec<&String> = raw.iter().filter(|a| !a.starts_with("--")).collect();

    if args.len() < 3 {
        print_usage();
        std::process::exit(2);
    }

    let shift_id = args[0].as_str();
    let date_from = parse_date(args[1])?;
    let date_to = parse_date(args[2])?;
    let db_path = args
        .get(3)
        .map(|s| s.to_string())
        .unwrap_or_else(get_default_db_path);

    tracing::info!("==================================================");
    tracing::info!("{} - 排班解析", patrol_roster::APP_NAME);
    tracing::info!("系统版本: {}", patrol_roster::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let store = Arc::new(SqliteRosterStore::new(&db_path)?);
    let api = RosterApi::new(store, Arc::new(RosterConfig::default()));

    let schedule = api.resolve_schedule(shift_id, date_from, date_to).await?;
    let key = ResolutionKey::new(shift_id, date_from, date_to);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&*schedule)?);
        return Ok(());
    }

    // ===== 强制加班顺位 =====
    let force = api.force_list(&key)?;
    println!();
    println!("===== 强制加班顺位: {} [{} ~ {}] =====", shift_id, date_from, date_to);
    for row in &force {
        println!(
            "{:>3}. {:<24} 警号 {:<8} {:<20} {:<12} 年资 {:.1}",
            row.rank_order, row.display_name, row.badge_number, row.rank_text,
            row.roster_class.to_string(), row.seniority
        );
    }

    // ===== 逐日名册 =====
    for day in &schedule.days {
        let roster = api.day_roster(&key, day.date)?;
        println!();
        println!("----- {} -----", day.date);

        for row in &roster.rows {
            let marker = if row.anomaly.is_some() {
                " [!]"
            } else if row.is_off {
                " [休]"
            } else {
                ""
            };
            println!(
                "  {:<24} {:<24} {:<18}{}",
                row.display_name,
                row.position,
                row.kind.to_string(),
                marker
            );
        }

        if let Some(verdict) = &roster.staffing {
            let flag = if verdict.understaffed { "缺口" } else { "达标" };
            println!(
                "  警力: 主管 {}/{}, 警员 {}/{}, 试用期 {} -> {}",
                verdict.supervisor_count, verdict.min_supervisors,
                verdict.officer_count, verdict.min_officers,
                verdict.probationary_count, flag
            );
        }
    }

    // ===== 休假台账 =====
    let vacations = api.vacation_list(&key)?;
    if !vacations.is_empty() {
        println!();
        println!("===== 休假台账 =====");
        for row in &vacations {
            let kind = row
                .pto_kind
                .map(|k| k.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {} {:<24} {:<10} {}",
                row.date,
                row.display_name,
                kind,
                row.reason.as_deref().unwrap_or("")
            );
        }
    }

    // ===== 警力核定汇总 =====
    let summary = api.staffing_summary(&key)?;
    println!();
    println!(
        "===== 警力核定: {} 天, 缺口 {} 天 =====",
        summary.total_days, summary.understaffed_days
    );
    for verdict in summary.verdicts.iter().filter(|v| v.understaffed) {
        println!(
            "  {} 主管 {}/{}, 警员 {}/{}",
            verdict.date,
            verdict.supervisor_count, verdict.min_supervisors,
            verdict.officer_count, verdict.min_officers
        );
    }

    Ok(())
}
