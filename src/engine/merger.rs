// ==========================================
// 警务排班系统 - 排班合并引擎
// ==========================================
// 职责: 逐日合并周常排班与例外排班, 产出每 (警员, 日期) 恰好一条的日勤务
// 红线: 例外覆盖周常是显式优先级裁决, 不依赖 map 插入顺序
// 红线: 输出按 (日期, 警员) 确定性排序, 相同输入必产出相同结果
// ==========================================

use crate::domain::assignment::{
    DailyAssignment, RecurringAssignment, ResolvedDay, ScheduleException,
};
use crate::domain::types::{weekday_index, AssignmentKind, AssignmentSource};
use crate::engine::indexes::{ExceptionIndex, RecurringPatternIndex};
use chrono::{Duration, NaiveDate};
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

// ==========================================
// ScheduleMerger - 合并引擎
// ==========================================
pub struct ScheduleMerger;

impl ScheduleMerger {
    pub fn new() -> Self {
        Self
    }

    /// 合并闭区间 [date_from, date_to] 内的排班
    ///
    /// # 规则
    /// 1. 当日警员并集 = 该星期生效周常警员 ∪ 该日期例外警员
    /// 2. 并集中每位警员: 有例外取例外, 否则取周常
    /// 3. 周常与例外同时存在时例外覆盖 (显式裁决, debug 留痕)
    /// 4. 两者皆无的警员当日不出现
    ///
    /// # 返回
    /// - 按日期升序的 ResolvedDay 列表; 单日内按 officer_id 升序
    /// - kind 统一置 REGULAR 占位, 由分类引擎回填
    pub fn merge(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
        patterns: &RecurringPatternIndex,
        exceptions: &ExceptionIndex,
    ) -> Vec<ResolvedDay> {
        let mut days = Vec::new();
        let mut date = date_from;

        while date <= date_to {
            days.push(self.merge_day(date, patterns, exceptions));
            date += Duration::days(1);
        }

        days
    }

    /// 合并单日排班
    fn merge_day(
        &self,
        date: NaiveDate,
        patterns: &RecurringPatternIndex,
        exceptions: &ExceptionIndex,
    ) -> ResolvedDay {
        let dow = weekday_index(date);
        let day_exceptions = exceptions.for_date(date);

        // 当日生效的周常按警员取唯一行 (重复行按优先级裁决)
        let mut recurring_by_officer: HashMap<&str, &RecurringAssignment> = HashMap::new();
        for row in patterns.for_weekday(dow) {
            if !row.is_effective_on(date) {
                continue;
            }
            match recurring_by_officer.entry(row.officer_id.as_str()) {
                Entry::Occupied(mut slot) => {
                    if Self::pattern_precedence(row, slot.get()) == Ordering::Less {
                        debug!(
                            officer_id = %row.officer_id,
                            date = %date,
                            kept_id = %row.id,
                            shadowed_id = %slot.get().id,
                            "同警员同星期多条生效周常, 按截止日期裁决"
                        );
                        slot.insert(row);
                    } else {
                        debug!(
                            officer_id = %row.officer_id,
                            date = %date,
                            kept_id = %slot.get().id,
                            shadowed_id = %row.id,
                            "同警员同星期多条生效周常, 按截止日期裁决"
                        );
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
            }
        }

        // 警员并集 (BTreeSet 保证输出顺序确定)
        let mut officer_ids: BTreeSet<&str> = recurring_by_officer.keys().copied().collect();
        if let Some(per_day) = day_exceptions {
            for officer_id in per_day.keys() {
                officer_ids.insert(officer_id.as_str());
            }
        }

        let mut assignments = Vec::with_capacity(officer_ids.len());
        for officer_id in officer_ids {
            let recurring_row = recurring_by_officer.get(officer_id).copied();
            let exception_row = day_exceptions.and_then(|m| m.get(officer_id));

            let assignment = match (recurring_row, exception_row) {
                (Some(rec), Some(exc)) => {
                    debug!(
                        officer_id = %officer_id,
                        date = %date,
                        recurring_id = %rec.id,
                        exception_id = %exc.id,
                        "例外覆盖周常排班"
                    );
                    Self::from_exception(date, exc)
                }
                (None, Some(exc)) => Self::from_exception(date, exc),
                (Some(rec), None) => Self::from_recurring(date, rec),
                (None, None) => continue, // 并集构造保证不可达
            };
            assignments.push(assignment);
        }

        ResolvedDay { date, assignments }
    }

    /// 同警员同星期多条生效周常的取舍
    ///
    /// 截止日期较早者优先 (有界行是显式当前状态, 长期行在其过期后接管),
    /// 截止日期相同时 id 较小者优先
    fn pattern_precedence(a: &RecurringAssignment, b: &RecurringAssignment) -> Ordering {
        let end_a = a.end_date.unwrap_or(NaiveDate::MAX);
        let end_b = b.end_date.unwrap_or(NaiveDate::MAX);
        end_a.cmp(&end_b).then_with(|| a.id.cmp(&b.id))
    }

    fn from_recurring(date: NaiveDate, row: &RecurringAssignment) -> DailyAssignment {
        DailyAssignment {
            date,
            officer_id: row.officer_id.clone(),
            display_name: String::new(), // 档案归一化后回填
            shift_id: row.shift_id.clone(),
            position: row.position.clone(),
            unit: row.unit.clone(),
            start_time: None,
            end_time: None,
            kind: AssignmentKind::Regular, // 分类引擎回填
            source: AssignmentSource::Recurring,
            is_off: false,
            off_reason: None,
            pto_kind: None,
            anomaly: None,
        }
    }

    fn from_exception(date: NaiveDate, row: &ScheduleException) -> DailyAssignment {
        DailyAssignment {
            date,
            officer_id: row.officer_id.clone(),
            display_name: String::new(),
            shift_id: row.shift_id.clone(),
            position: row.position.clone(),
            unit: row.unit.clone(),
            start_time: row.start_time.clone(),
            end_time: row.end_time.clone(),
            kind: AssignmentKind::Regular,
            source: AssignmentSource::Exception,
            is_off: row.is_off,
            off_reason: row.off_reason.clone(),
            pto_kind: None,
            anomaly: None,
        }
    }
}

impl Default for ScheduleMerger {
    fn default() -> Self {
        Self::new()
    }
}
