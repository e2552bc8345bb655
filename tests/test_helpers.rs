// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据插入等功能
// ==========================================

#![allow(dead_code)] // 各集成测试按需取用, 不要求全量使用

use patrol_roster::db::{configure_sqlite_connection, init_schema};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_test_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接 (统一 PRAGMA)
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 插入警员档案 (常用字段; 年资细项用 set_officer_seniority_fields 补充)
pub fn insert_test_officer(
    conn: &Connection,
    officer_id: &str,
    badge: &str,
    first: &str,
    last: &str,
    rank_text: &str,
    hire_date: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO officer (officer_id, badge_number, first_name, last_name, rank_text, hire_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![officer_id, badge, first, last, rank_text, hire_date],
    )?;
    Ok(())
}

/// 补充警员年资输入字段
pub fn set_officer_seniority_fields(
    conn: &Connection,
    officer_id: &str,
    promotion_to_sergeant: Option<&str>,
    promotion_to_lieutenant: Option<&str>,
    seniority_override: Option<f64>,
    external_credit_years: Option<f64>,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "UPDATE officer SET promotion_to_sergeant = ?2, promotion_to_lieutenant = ?3,
            seniority_override = ?4, external_credit_years = ?5
         WHERE officer_id = ?1",
        params![
            officer_id,
            promotion_to_sergeant,
            promotion_to_lieutenant,
            seniority_override,
            external_credit_years
        ],
    )?;
    Ok(())
}

/// 插入周常排班行
pub fn insert_test_recurring(
    conn: &Connection,
    id: &str,
    officer_id: &str,
    shift_id: &str,
    day_of_week: u8,
    position: &str,
    end_date: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO recurring_assignment (id, officer_id, shift_id, day_of_week, position, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, officer_id, shift_id, day_of_week, position, end_date],
    )?;
    Ok(())
}

/// 插入例外排班行
#[allow(clippy::too_many_arguments)]
pub fn insert_test_exception(
    conn: &Connection,
    id: &str,
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
        params![id, officer_id, shift_id, date, position, is_off as i64, off_reason, created_at],
    )?;
    Ok(())
}

/// 插入最低警力配置行
pub fn insert_test_requirement(
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

/// 插入岗位目录行
pub fn insert_test_position(
    conn: &Connection,
    position_name: &str,
    category: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO position_catalog (position_name, category) VALUES (?1, ?2)",
        params![position_name, category],
    )?;
    Ok(())
}
