// ==========================================
// 警务排班系统 - 排班索引
// ==========================================
// 职责: 将周常/例外排班行组织成合并引擎所需的查询结构
// 红线: 重复例外按 created_at 最新者生效, 其余丢弃并告警
// ==========================================

use crate::domain::assignment::{RecurringAssignment, ScheduleException};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::warn;

// ==========================================
// RecurringPatternIndex - 周常排班索引
// ==========================================
// 结构: 星期 -> 该星期的周常排班行 (按 id 升序)
// 说明: 同一警员同一星期允许多条并存 (截止日期不同的换岗记录),
//       当日生效行的取舍在合并引擎按日期裁决
pub struct RecurringPatternIndex {
    by_weekday: HashMap<u8, Vec<RecurringAssignment>>,
}

impl RecurringPatternIndex {
    /// 按星期分组建索引
    ///
    /// # 规则
    /// - 全部行保留, 按 id 升序保证遍历顺序稳定
    /// - 同一警员同一星期出现多条时告警一次 (数据质量可见性)
    pub fn build(rows: Vec<RecurringAssignment>) -> Self {
        let mut rows = rows;
        rows.sort_by(|a, b| a.id.cmp(&b.id));

        let mut by_weekday: HashMap<u8, Vec<RecurringAssignment>> = HashMap::new();
        let mut seen: HashMap<(String, u8), String> = HashMap::new();
        let mut warned: HashSet<(String, u8)> = HashSet::new();

        for row in rows {
            let key = (row.officer_id.clone(), row.day_of_week);
            match seen.get(&key) {
                Some(first_id) => {
                    if warned.insert(key) {
                        warn!(
                            officer_id = %row.officer_id,
                            day_of_week = row.day_of_week,
                            first_id = %first_id,
                            duplicate_id = %row.id,
                            "同一警员同一星期存在多条周常排班, 按截止日期逐日裁决"
                        );
                    }
                }
                None => {
                    seen.insert(key, row.id.clone());
                }
            }
            by_weekday.entry(row.day_of_week).or_default().push(row);
        }

        Self { by_weekday }
    }

    /// 查询某星期的周常排班行
    pub fn for_weekday(&self, day_of_week: u8) -> &[RecurringAssignment] {
        self.by_weekday
            .get(&day_of_week)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 索引内的排班行总数
    pub fn len(&self) -> usize {
        self.by_weekday.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_weekday.is_empty()
    }
}

// ==========================================
// ExceptionIndex - 例外排班索引
// ==========================================
// 结构: 日期 -> (警员 -> 生效例外)
pub struct ExceptionIndex {
    by_date: HashMap<NaiveDate, HashMap<String, ScheduleException>>,
}

impl ExceptionIndex {
    /// 按 (日期, 警员) 建索引, 重复例外裁决
    ///
    /// # 规则
    /// - 同 (警员, 日期) 多条例外: created_at 最新者生效
    /// - created_at 相同: id 较大者生效 (录入顺序近似)
    /// - 每次裁决告警, 带双方 id 以便追数据源
    pub fn build(rows: Vec<ScheduleException>) -> Self {
        let mut by_date: HashMap<NaiveDate, HashMap<String, ScheduleException>> = HashMap::new();

        for row in rows {
            let per_day = by_date.entry(row.date).or_default();
            match per_day.get(&row.officer_id) {
                Some(existing) => {
                    let replace = (row.created_at, &row.id) > (existing.created_at, &existing.id);
                    warn!(
                        officer_id = %row.officer_id,
                        date = %row.date,
                        kept_id = %if replace { &row.id } else { &existing.id },
                        dropped_id = %if replace { &existing.id } else { &row.id },
                        "同一警员同一日期存在重复例外排班, 按录入时间最新者生效"
                    );
                    if replace {
                        per_day.insert(row.officer_id.clone(), row);
                    }
                }
                None => {
                    per_day.insert(row.officer_id.clone(), row);
                }
            }
        }

        Self { by_date }
    }

    /// 查询某日期的全部例外 (警员 -> 例外)
    pub fn for_date(&self, date: NaiveDate) -> Option<&HashMap<String, ScheduleException>> {
        self.by_date.get(&date)
    }

    /// 查询某警员某日期的生效例外
    pub fn get(&self, officer_id: &str, date: NaiveDate) -> Option<&ScheduleException> {
        self.by_date.get(&date).and_then(|m| m.get(officer_id))
    }

    /// 索引内的生效例外总数
    pub fn len(&self) -> usize {
        self.by_date.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn create_test_recurring(id: &str, officer_id: &str, dow: u8) -> RecurringAssignment {
        RecurringAssignment {
            id: id.to_string(),
            officer_id: officer_id.to_string(),
            shift_id: "SHIFT_A".to_string(),
            day_of_week: dow,
            position: "Patrol".to_string(),
            unit: Some("U1".to_string()),
            end_date: None,
        }
    }

    fn create_test_exception(
        id: &str,
        officer_id: &str,
        d: NaiveDate,
        created: NaiveDateTime,
    ) -> ScheduleException {
        ScheduleException {
            id: id.to_string(),
            officer_id: officer_id.to_string(),
            shift_id: "SHIFT_A".to_string(),
            date: d,
            position: "Patrol".to_string(),
            unit: None,
            start_time: None,
            end_time: None,
            is_off: false,
            off_reason: None,
            created_at: created,
        }
    }

    #[test]
    fn test_recurring_index_groups_by_weekday() {
        let index = RecurringPatternIndex::build(vec![
            create_test_recurring("r1", "o1", 1),
            create_test_recurring("r2", "o2", 1),
            create_test_recurring("r3", "o1", 3),
        ]);

        assert_eq!(index.for_weekday(1).len(), 2);
        assert_eq!(index.for_weekday(3).len(), 1);
        assert!(index.for_weekday(5).is_empty());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_recurring_index_keeps_duplicate_officer_weekday_rows() {
        let mut old_row = create_test_recurring("r2", "o1", 1);
        old_row.end_date = Some(date(2026, 2, 28));
        let index = RecurringPatternIndex::build(vec![
            old_row,
            create_test_recurring("r1", "o1", 1),
        ]);

        // 两条都保留 (截止日期不同), 取舍由合并引擎按日期完成
        let rows = index.for_weekday(1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "r1");
        assert_eq!(rows[1].id, "r2");
    }

    #[test]
    fn test_exception_index_latest_created_wins() {
        let d = date(2026, 3, 2);
        let index = ExceptionIndex::build(vec![
            create_test_exception("e1", "o1", d, datetime(2026, 2, 1, 9)),
            create_test_exception("e2", "o1", d, datetime(2026, 2, 5, 9)), // 更晚录入
            create_test_exception("e3", "o1", d, datetime(2026, 2, 3, 9)),
        ]);

        let kept = index.get("o1", d).unwrap();
        assert_eq!(kept.id, "e2");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_exception_index_same_created_at_higher_id_wins() {
        let d = date(2026, 3, 2);
        let ts = datetime(2026, 2, 1, 9);
        let index = ExceptionIndex::build(vec![
            create_test_exception("e2", "o1", d, ts),
            create_test_exception("e1", "o1", d, ts),
        ]);

        assert_eq!(index.get("o1", d).unwrap().id, "e2");
    }

    #[test]
    fn test_exception_index_separate_dates_kept() {
        let index = ExceptionIndex::build(vec![
            create_test_exception("e1", "o1", date(2026, 3, 2), datetime(2026, 2, 1, 9)),
            create_test_exception("e2", "o1", date(2026, 3, 3), datetime(2026, 2, 1, 9)),
        ]);

        assert_eq!(index.len(), 2);
        assert!(index.get("o1", date(2026, 3, 2)).is_some());
        assert!(index.get("o1", date(2026, 3, 3)).is_some());
    }
}
