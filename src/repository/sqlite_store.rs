// ==========================================
// 警务排班系统 - SQLite 排班存储实现
// ==========================================
// 职责: RosterStore 的 rusqlite 实现
// 红线: 只读查询, 不写排班数据; 日期一律 TEXT ISO-8601
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::assignment::{RecurringAssignment, ScheduleException};
use crate::domain::officer::{OfficerRecord, SeniorityInput};
use crate::domain::staffing::StaffingRequirement;
use crate::domain::types::{PositionCategory, PositionRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::roster_store::RosterStore;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteRosterStore
// ==========================================
pub struct SqliteRosterStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRosterStore {
    /// 打开数据库文件并创建存储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建存储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_officer_row(row: &Row<'_>) -> rusqlite::Result<OfficerRecord> {
        Ok(OfficerRecord {
            officer_id: row.get(0)?,
            badge_number: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            rank_text: row.get(4)?,
            hire_date: parse_date_opt(row.get::<_, Option<String>>(5)?),
            promotion_to_sergeant: parse_date_opt(row.get::<_, Option<String>>(6)?),
            promotion_to_lieutenant: parse_date_opt(row.get::<_, Option<String>>(7)?),
            seniority_override: row.get(8)?,
            external_credit_years: row.get(9)?,
        })
    }

    fn map_recurring_row(row: &Row<'_>) -> rusqlite::Result<RecurringAssignment> {
        Ok(RecurringAssignment {
            id: row.get(0)?,
            officer_id: row.get(1)?,
            shift_id: row.get(2)?,
            day_of_week: row.get(3)?,
            position: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            unit: row.get(5)?,
            end_date: parse_date_opt(row.get::<_, Option<String>>(6)?),
        })
    }

    fn map_exception_row(row: &Row<'_>) -> rusqlite::Result<ScheduleException> {
        Ok(ScheduleException {
            id: row.get(0)?,
            officer_id: row.get(1)?,
            shift_id: row.get(2)?,
            date: parse_date_opt(Some(row.get::<_, String>(3)?))
                .unwrap_or(NaiveDate::MIN),
            position: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            unit: row.get(5)?,
            start_time: row.get(6)?,
            end_time: row.get(7)?,
            is_off: row.get(8)?,
            off_reason: row.get(9)?,
            created_at: parse_datetime_lenient(row.get::<_, Option<String>>(10)?),
        })
    }
}

/// "YYYY-MM-DD" 宽松解析, 非法文本归 None
fn parse_date_opt(s: Option<String>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// "YYYY-MM-DD HH:MM:SS" 宽松解析, 非法文本归最早时间 (重复例外裁决时必然落选)
fn parse_datetime_lenient(s: Option<String>) -> NaiveDateTime {
    s.and_then(|s| {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    })
    .unwrap_or(NaiveDateTime::MIN)
}

#[async_trait]
impl RosterStore for SqliteRosterStore {
    async fn fetch_recurring_for_shift(
        &self,
        shift_id: &str,
        active_on_or_after: NaiveDate,
    ) -> RepositoryResult<Vec<RecurringAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, officer_id, shift_id, day_of_week, position, unit, end_date
            FROM recurring_assignment
            WHERE shift_id = ?1
              AND (end_date IS NULL OR end_date >= ?2)
            ORDER BY day_of_week, officer_id, id
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    shift_id,
                    active_on_or_after.format("%Y-%m-%d").to_string()
                ],
                Self::map_recurring_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn fetch_exceptions(
        &self,
        shift_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> RepositoryResult<Vec<ScheduleException>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, officer_id, shift_id, date, position, unit,
                   start_time, end_time, is_off, off_reason, created_at
            FROM schedule_exception
            WHERE shift_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date, officer_id, created_at
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    shift_id,
                    date_from.format("%Y-%m-%d").to_string(),
                    date_to.format("%Y-%m-%d").to_string()
                ],
                Self::map_exception_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn fetch_requirements(
        &self,
        shift_id: &str,
    ) -> RepositoryResult<Vec<StaffingRequirement>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT shift_id, day_of_week, min_officers, min_supervisors
            FROM staffing_requirement
            WHERE shift_id = ?1
            ORDER BY day_of_week
            "#,
        )?;

        let rows = stmt
            .query_map(params![shift_id], |row| {
                Ok(StaffingRequirement {
                    shift_id: row.get(0)?,
                    day_of_week: row.get(1)?,
                    min_officers: row.get(2)?,
                    min_supervisors: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn fetch_position_catalog(&self) -> RepositoryResult<Vec<PositionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT position_name, category
            FROM position_catalog
            ORDER BY position_name
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(PositionRecord {
                    position_name: row.get(0)?,
                    category: PositionCategory::from_str(&row.get::<_, String>(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn fetch_officers(
        &self,
        officer_ids: &[String],
    ) -> RepositoryResult<Vec<OfficerRecord>> {
        if officer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let placeholders = std::iter::repeat("?")
            .take(officer_ids.len())
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r#"
            SELECT officer_id, badge_number, first_name, last_name, rank_text,
                   hire_date, promotion_to_sergeant, promotion_to_lieutenant,
                   seniority_override, external_credit_years
            FROM officer
            WHERE officer_id IN ({})
            ORDER BY officer_id
            "#,
            placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(officer_ids.iter()), Self::map_officer_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn fetch_recurring_for_officers(
        &self,
        officer_ids: &[String],
        active_on_or_after: NaiveDate,
    ) -> RepositoryResult<Vec<RecurringAssignment>> {
        if officer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let placeholders = std::iter::repeat("?")
            .take(officer_ids.len())
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r#"
            SELECT id, officer_id, shift_id, day_of_week, position, unit, end_date
            FROM recurring_assignment
            WHERE officer_id IN ({})
              AND (end_date IS NULL OR end_date >= ?)
            ORDER BY officer_id, shift_id, day_of_week, id
            "#,
            placeholders
        );

        let active = active_on_or_after.format("%Y-%m-%d").to_string();
        let mut bind: Vec<&str> = officer_ids.iter().map(|s| s.as_str()).collect();
        bind.push(active.as_str());

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(bind), Self::map_recurring_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn fetch_seniority_inputs(
        &self,
        officer_id: &str,
    ) -> RepositoryResult<SeniorityInput> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT officer_id, rank_text, hire_date,
                   promotion_to_sergeant, promotion_to_lieutenant,
                   seniority_override, external_credit_years
            FROM officer
            WHERE officer_id = ?1
            "#,
        )?;

        let input = stmt
            .query_row(params![officer_id], |row| {
                Ok(SeniorityInput {
                    officer_id: row.get(0)?,
                    rank_text: row.get(1)?,
                    hire_date: parse_date_opt(row.get::<_, Option<String>>(2)?),
                    promotion_to_sergeant: parse_date_opt(row.get::<_, Option<String>>(3)?),
                    promotion_to_lieutenant: parse_date_opt(row.get::<_, Option<String>>(4)?),
                    seniority_override: row.get(5)?,
                    external_credit_years: row.get(6)?,
                })
            })
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                    entity: "officer".to_string(),
                    id: officer_id.to_string(),
                },
                other => RepositoryError::from(other),
            })?;
        Ok(input)
    }
}
