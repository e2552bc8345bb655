// ==========================================
// 警务排班系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：
/// - 版本号用于**提示/告警**（不做自动迁移），避免静默在旧库上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化排班库 schema（幂等，所有表 CREATE IF NOT EXISTS）
///
/// # 表
/// - officer: 警员档案（年资输入字段同表）
/// - recurring_assignment: 周常排班（按星期重复）
/// - schedule_exception: 例外排班（指定日期覆盖）
/// - staffing_requirement: 最低警力配置（班次 x 星期）
/// - position_catalog: 岗位目录（常规岗/特勤岗标注）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS officer (
            officer_id TEXT PRIMARY KEY,
            badge_number TEXT,
            first_name TEXT,
            last_name TEXT,
            rank_text TEXT,
            hire_date TEXT,
            promotion_to_sergeant TEXT,
            promotion_to_lieutenant TEXT,
            seniority_override REAL,
            external_credit_years REAL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS recurring_assignment (
            id TEXT PRIMARY KEY,
            officer_id TEXT NOT NULL REFERENCES officer(officer_id),
            shift_id TEXT NOT NULL,
            day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            position TEXT NOT NULL DEFAULT '',
            unit TEXT,
            end_date TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_recurring_shift
            ON recurring_assignment(shift_id, day_of_week);
        CREATE INDEX IF NOT EXISTS idx_recurring_officer
            ON recurring_assignment(officer_id);

        CREATE TABLE IF NOT EXISTS schedule_exception (
            id TEXT PRIMARY KEY,
            officer_id TEXT NOT NULL REFERENCES officer(officer_id),
            shift_id TEXT NOT NULL,
            date TEXT NOT NULL,
            position TEXT NOT NULL DEFAULT '',
            unit TEXT,
            start_time TEXT,
            end_time TEXT,
            is_off INTEGER NOT NULL DEFAULT 0,
            off_reason TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_exception_shift_date
            ON schedule_exception(shift_id, date);

        CREATE TABLE IF NOT EXISTS staffing_requirement (
            shift_id TEXT NOT NULL,
            day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            min_officers INTEGER NOT NULL DEFAULT 0,
            min_supervisors INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (shift_id, day_of_week)
        );

        CREATE TABLE IF NOT EXISTS position_catalog (
            position_name TEXT PRIMARY KEY,
            category TEXT NOT NULL DEFAULT 'REGULAR'
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
