// Small dev utility: reset the roster DB and seed a one-week demo force,
// then resolve the week end-to-end and print the result.
//
// Usage:
//   cargo run --bin seed_demo_roster -- [db_path]
//
// Scenario highlights: a vacationing sergeant, an off-without-reason anomaly,
// a duplicate same-day exception pair, a cross-shift overtime pickup, a
// partnership special assignment and a desk-to-district pattern handover.

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};
use uuid::Uuid;

use patrol_roster::api::{ResolutionKey, RosterApi};
use patrol_roster::config::{get_default_db_path, RosterConfig};
use patrol_roster::db::{init_schema, open_sqlite_connection};
use patrol_roster::repository::SqliteRosterStore;

const SHIFT_DAY: &str = "DAY";
const SHIFT_NIGHT: &str = "NIGHT";

// 演示周: 2026-03-02 (周一) ~ 2026-03-08 (周日)
const WEEK_FROM: &str = "2026-03-02";
const WEEK_TO: &str = "2026-03-08";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    seed_demo_force(&conn)?;
    print_quick_counts(&conn)?;

    // 种子数据就位后立即解析一周, 验证端到端链路
    let store = Arc::new(SqliteRosterStore::from_connection(Arc::new(
        std::sync::Mutex::new(conn),
    )));
    let api = RosterApi::new(store, Arc::new(RosterConfig::default()));

    let date_from = NaiveDate::parse_from_str(WEEK_FROM, "%Y-%m-%d")?;
    let date_to = NaiveDate::parse_from_str(WEEK_TO, "%Y-%m-%d")?;
    let schedule = api.resolve_schedule(SHIFT_DAY, date_from, date_to).await?;
    let key = ResolutionKey::new(SHIFT_DAY, date_from, date_to);

    println!();
    println!("===== 强制加班顺位 =====");
    for row in api.force_list(&key)? {
        println!(
            "{:>3}. {:<20} 警号 {:<8} {:<28} 年资 {:.1}",
            row.rank_order, row.display_name, row.badge_number, row.rank_text, row.seniority
        );
    }

    println!();
    println!("===== 休假台账 =====");
    for row in api.vacation_list(&key)? {
        println!(
            "  {} {:<20} {}",
            row.date,
            row.display_name,
            row.reason.as_deref().unwrap_or("")
        );
    }

    let summary = api.staffing_summary(&key)?;
    println!();
    println!(
        "===== 警力核定: {} 天, 缺口 {} 天 =====",
        summary.total_days, summary.understaffed_days
    );
    for verdict in &summary.verdicts {
        let flag = if verdict.understaffed { "缺口" } else { "达标" };
        println!(
            "  {} 主管 {}/{}, 警员 {}/{}, 试用期 {} -> {}",
            verdict.date,
            verdict.supervisor_count,
            verdict.min_supervisors,
            verdict.officer_count,
            verdict.min_officers,
            verdict.probationary_count,
            flag
        );
    }

    println!();
    println!(
        "seeded db={} days={} officers={}",
        db_path,
        schedule.days.len(),
        schedule.officers.len()
    );
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_demo_force(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let tx = conn.unchecked_transaction()?;

    // ===== 警员档案 =====
    // (id, badge, first, last, rank, hire, prom_sgt, prom_lt, override, external)
    insert_officer(&tx, "o-lt-01", "501", "Carl", "Monroe", "Lieutenant",
        Some("2005-06-01"), Some("2011-03-01"), Some("2015-04-01"), None, None)?;
    insert_officer(&tx, "o-sgt-01", "510", "Irene", "Vega", "Sergeant",
        Some("2010-09-15"), Some("2018-02-01"), None, None, None)?;
    insert_officer(&tx, "o-sgt-02", "511", "Norma", "Ellis", "Patrol Sergeant",
        Some("2012-03-10"), Some("2019-07-01"), None, None, None)?;
    insert_officer(&tx, "o-reg-01", "604", "Dana", "Reyes", "Officer",
        Some("2014-05-20"), None, None, None, None)?;
    // 外部系统折算年资优先于入职日期推算
    insert_officer(&tx, "o-reg-02", "612", "Miles", "Okafor", "Officer",
        Some("2016-08-01"), None, None, None, Some(8.4))?;
    // 人工年资覆盖无条件生效
    insert_officer(&tx, "o-reg-03", "618", "Tessa", "Bright", "Police Officer",
        Some("2019-01-15"), None, None, Some(12.0), None)?;
    // 非数字警号, 排序时落到同级末尾
    insert_officer(&tx, "o-reg-04", "K9-07", "Ruth", "Salgado", "Officer",
        Some("2017-11-05"), None, None, None, None)?;
    insert_officer(&tx, "o-reg-05", "630", "Evan", "Park", "Officer",
        Some("2021-04-12"), None, None, None, None)?;
    insert_officer(&tx, "o-ppo-01", "702", "Jon", "Tran", "Probationary Officer (PPO)",
        Some("2025-10-01"), None, None, None, None)?;
    // 主班次为夜班, 白班出现即加班
    insert_officer(&tx, "o-x-01", "555", "Gabe", "Ruiz", "Officer",
        Some("2013-02-18"), None, None, None, None)?;

    // ===== 周常排班 (星期: 0=周日 .. 6=周六) =====
    for dow in 1..=5 {
        insert_recurring(&tx, &format!("ra-lt01-{}", dow), "o-lt-01", SHIFT_DAY, dow,
            "Station Supervisor", None, None)?;
        insert_recurring(&tx, &format!("ra-sgt01-{}", dow), "o-sgt-01", SHIFT_DAY, dow,
            "District Supervisor", Some("Car-10"), None)?;
        insert_recurring(&tx, &format!("ra-reg01-{}", dow), "o-reg-01", SHIFT_DAY, dow,
            "District 1", Some("Car-21"), None)?;
        insert_recurring(&tx, &format!("ra-reg02-{}", dow), "o-reg-02", SHIFT_DAY, dow,
            "District 2", Some("Car-22"), None)?;
        insert_recurring(&tx, &format!("ra-reg03-{}", dow), "o-reg-03", SHIFT_DAY, dow,
            "District 3", Some("Car-23"), None)?;
        insert_recurring(&tx, &format!("ra-ppo01-{}", dow), "o-ppo-01", SHIFT_DAY, dow,
            "District 5", Some("Car-25"), None)?;
    }
    // 周中后段 + 周末的主管覆盖
    for dow in [3, 4, 5, 6, 0] {
        insert_recurring(&tx, &format!("ra-sgt02-{}", dow), "o-sgt-02", SHIFT_DAY, dow,
            "District Supervisor", Some("Car-11"), None)?;
    }
    // K9 巡逻: 周四 ~ 周日
    for dow in [4, 5, 6, 0] {
        insert_recurring(&tx, &format!("ra-reg04-{}", dow), "o-reg-04", SHIFT_DAY, dow,
            "K9 Patrol", Some("K9-2"), None)?;
    }
    // 周末 + 周一的巡区
    for dow in [6, 0, 1] {
        insert_recurring(&tx, &format!("ra-reg05-{}", dow), "o-reg-05", SHIFT_DAY, dow,
            "District 4", Some("Car-24"), None)?;
    }
    // 同警员同星期两行: 带截止日期的内勤行在 03-03 前胜出, 之后长期行接手
    insert_recurring(&tx, "ra-reg05-2-desk", "o-reg-05", SHIFT_DAY, 2,
        "Station Desk", None, Some("2026-03-03"))?;
    insert_recurring(&tx, "ra-reg05-2-d4", "o-reg-05", SHIFT_DAY, 2,
        "District 4", Some("Car-24"), None)?;
    // 周六礼仪特勤 (岗位目录标注 SPECIAL)
    insert_recurring(&tx, "ra-reg03-6-hg", "o-reg-03", SHIFT_DAY, 6,
        "Honor Guard", None, None)?;
    // 跨班次警员的夜班主排班
    for dow in 1..=4 {
        insert_recurring(&tx, &format!("ra-x01-{}", dow), "o-x-01", SHIFT_NIGHT, dow,
            "District 7", Some("Car-77"), None)?;
    }

    // ===== 例外排班 =====
    // 周三休假
    insert_exception(&tx, "o-sgt-02", SHIFT_DAY, "2026-03-04",
        "", true, Some("Vacation"), "2026-02-20 09:00:00")?;
    // 周四不在岗但未填事由 (数据异常)
    insert_exception(&tx, "o-reg-02", SHIFT_DAY, "2026-03-05",
        "", true, None, "2026-02-21 10:00:00")?;
    // 周五同日双例外: 录入时间晚者生效
    insert_exception_on_duty(&tx, "o-reg-01", SHIFT_DAY, "2026-03-06",
        "District 9", "2026-02-25 10:00:00")?;
    insert_exception_on_duty(&tx, "o-reg-01", SHIFT_DAY, "2026-03-06",
        "Desk Duty", "2026-02-25 14:30:00")?;
    // 周二白班加班 (主班次为夜班)
    insert_exception_on_duty(&tx, "o-x-01", SHIFT_DAY, "2026-03-03",
        "District 6", "2026-02-22 08:00:00")?;
    // 周一搭班特勤
    insert_exception_on_duty(&tx, "o-reg-03", SHIFT_DAY, "2026-03-02",
        "Partner with Reyes", "2026-02-23 11:00:00")?;

    // ===== 最低警力配置 =====
    // 周一~周五: 主管 1 / 警员 3; 周二主管加为 2
    for dow in 1..=5 {
        let min_sup = if dow == 2 { 2 } else { 1 };
        insert_requirement(&tx, SHIFT_DAY, dow, 3, min_sup)?;
    }
    insert_requirement(&tx, SHIFT_DAY, 6, 2, 1)?;
    // 周日警员配 3, 排班只有 2 人在岗 -> 演示缺口日
    insert_requirement(&tx, SHIFT_DAY, 0, 3, 1)?;

    // ===== 岗位目录 =====
    // 目录非空后, 未收录岗位一律按特勤处理, 常规岗必须全部收录
    for position in [
        "Station Supervisor", "District Supervisor",
        "District 1", "District 2", "District 3", "District 4", "District 5",
        "District 6", "District 7", "District 9",
        "K9 Patrol", "Station Desk", "Desk Duty",
    ] {
        insert_position(&tx, position, "REGULAR")?;
    }
    insert_position(&tx, "Honor Guard", "SPECIAL")?;
    insert_position(&tx, "Training Detail", "SPECIAL")?;

    tx.commit()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn insert_officer(
    conn: &Connection,
    officer_id: &str,
    badge: &str,
    first: &str,
    last: &str,
    rank: &str,
    hire: Option<&str>,
    prom_sgt: Option<&str>,
    prom_lt: Option<&str>,
    seniority_override: Option<f64>,
    external_credit: Option<f64>,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO officer (officer_id, badge_number, first_name, last_name, rank_text,
            hire_date, promotion_to_sergeant, promotion_to_lieutenant,
            seniority_override, external_credit_years)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![officer_id, badge, first, last, rank, hire, prom_sgt, prom_lt,
            seniority_override, external_credit],
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn insert_recurring(
    conn: &Connection,
    id: &str,
    officer_id: &str,
    shift_id: &str,
    day_of_week: u8,
    position: &str,
    unit: Option<&str>,
    end_date: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO recurring_assignment (id, officer_id, shift_id, day_of_week, position, unit, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![id, officer_id, shift_id, day_of_week, position, unit, end_date],
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn insert_exception(
    conn: &Connection,
    officer_id: &str,
    shift_id: &str,
    date: &str,
    position: &str,
    is_off: bool,
    off_reason: Option<&str>,
    created_at: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO schedule_exception (id, officer_id, shift_id, date, position, is_off, off_reason, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![Uuid::new_v4().to_string(), officer_id, shift_id, date, position,
            is_off as i64, off_reason, created_at],
    )?;
    Ok(())
}

fn insert_exception_on_duty(
    conn: &Connection,
    officer_id: &str,
    shift_id: &str,
    date: &str,
    position: &str,
    created_at: &str,
) -> Result<(), Box<dyn Error>> {
    insert_exception(conn, officer_id, shift_id, date, position, false, None, created_at)
}

fn insert_requirement(
    conn: &Connection,
    shift_id: &str,
    day_of_week: u8,
    min_officers: u32,
    min_supervisors: u32,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO staffing_requirement (shift_id, day_of_week, min_officers, min_supervisors)
         VALUES (?1, ?2, ?3, ?4)",
        params![shift_id, day_of_week, min_officers, min_supervisors],
    )?;
    Ok(())
}

fn insert_position(conn: &Connection, name: &str, category: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO position_catalog (position_name, category) VALUES (?1, ?2)",
        params![name, category],
    )?;
    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let count = |table: &str| -> Result<i64, Box<dyn Error>> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(n)
    };

    println!(
        "officer={} recurring={} exception={} requirement={} position={}",
        count("officer")?,
        count("recurring_assignment")?,
        count("schedule_exception")?,
        count("staffing_requirement")?,
        count("position_catalog")?
    );
    Ok(())
}
