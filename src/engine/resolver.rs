// ==========================================
// 警务排班系统 - 排班解析编排器
// ==========================================
// 用途: 协调合并/分类/年资/归类/核定五大引擎的执行顺序
// ==========================================
// 红线: 闭区间 [date_from, date_to], from > to 直接报错
// 红线: 相同输入必产出相同结果 (逐日/逐警员顺序确定)
// ==========================================

use crate::config::RosterConfig;
use crate::domain::assignment::ResolvedDay;
use crate::domain::officer::{Officer, OfficerRecord};
use crate::domain::staffing::StaffingVerdict;
use crate::engine::categorizer::{CategorizedOfficers, OfficerCategorizer};
use crate::engine::classifier::AssignmentClassifier;
use crate::engine::indexes::{ExceptionIndex, RecurringPatternIndex};
use crate::engine::merger::ScheduleMerger;
use crate::engine::seniority::SeniorityResolver;
use crate::engine::staffing::StaffingEvaluator;
use crate::repository::{RepositoryError, RosterStore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

// ==========================================
// ResolveError - 解析错误
// ==========================================
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("无效日期区间: {from} 晚于 {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("存储层错误: {0}")]
    Store(#[from] RepositoryError),
}

// ==========================================
// ResolvedSchedule - 解析结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedSchedule {
    pub shift_id: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// 年资计算基准日 (解析当刻的"今天")
    pub resolved_on: NaiveDate,

    /// 逐日勤务 (日期升序, 单日内 officer_id 升序)
    pub days: Vec<ResolvedDay>,
    /// 归类排序后的警员花名册
    pub officers: CategorizedOfficers,
    /// 逐日警力核定 (与 days 一一对应)
    pub staffing: Vec<StaffingVerdict>,
}

impl ResolvedSchedule {
    /// 按日期查单日勤务
    pub fn day(&self, date: NaiveDate) -> Option<&ResolvedDay> {
        self.days.iter().find(|d| d.date == date)
    }

    /// 按日期查警力核定结论
    pub fn verdict(&self, date: NaiveDate) -> Option<&StaffingVerdict> {
        self.staffing.iter().find(|v| v.date == date)
    }
}

// ==========================================
// ScheduleResolver - 解析编排器
// ==========================================
pub struct ScheduleResolver {
    store: Arc<dyn RosterStore>,
    config: Arc<RosterConfig>,
    merger: ScheduleMerger,
    seniority: SeniorityResolver,
    categorizer: OfficerCategorizer,
    staffing: StaffingEvaluator,
}

impl ScheduleResolver {
    /// 创建解析编排器
    ///
    /// # 参数
    /// - store: 排班存储 (周常/例外/档案/配置的读取入口)
    /// - config: 分类词表配置
    pub fn new(store: Arc<dyn RosterStore>, config: Arc<RosterConfig>) -> Self {
        Self {
            merger: ScheduleMerger::new(),
            seniority: SeniorityResolver::new(store.clone(), config.clone()),
            categorizer: OfficerCategorizer::new(config.clone()),
            staffing: StaffingEvaluator::new(),
            store,
            config,
        }
    }

    /// 解析闭区间 [date_from, date_to] 的完整排班
    ///
    /// # 参数
    /// - shift_id: 班次标识
    /// - date_from / date_to: 闭区间边界
    /// - today: 年资计算基准日 (由调用方传入, 保证可重放)
    ///
    /// # 返回
    /// ResolvedSchedule: 逐日勤务 + 警员花名册 + 逐日警力核定
    pub async fn resolve(
        &self,
        shift_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        today: NaiveDate,
    ) -> Result<ResolvedSchedule, ResolveError> {
        if date_from > date_to {
            return Err(ResolveError::InvalidDateRange {
                from: date_from,
                to: date_to,
            });
        }

        info!(
            shift_id = %shift_id,
            date_from = %date_from,
            date_to = %date_to,
            "开始排班解析"
        );

        // ==========================================
        // 步骤1: 读取排班数据并建索引
        // ==========================================
        debug!("步骤1: 读取周常与例外排班");

        let recurring = self
            .store
            .fetch_recurring_for_shift(shift_id, date_from)
            .await?;
        let exceptions = self
            .store
            .fetch_exceptions(shift_id, date_from, date_to)
            .await?;

        info!(
            recurring_count = recurring.len(),
            exception_count = exceptions.len(),
            "排班数据读取完成"
        );

        let patterns = RecurringPatternIndex::build(recurring);
        let exception_index = ExceptionIndex::build(exceptions);

        // ==========================================
        // 步骤2: 逐日合并 (例外覆盖周常)
        // ==========================================
        debug!("步骤2: 执行逐日合并");

        let mut days = self
            .merger
            .merge(date_from, date_to, &patterns, &exception_index);

        let assignment_count: usize = days.iter().map(|d| d.assignments.len()).sum();
        info!(
            day_count = days.len(),
            assignment_count, "逐日合并完成"
        );

        // ==========================================
        // 步骤3: 警员档案归一化
        // ==========================================
        debug!("步骤3: 读取并归一化警员档案");

        let officer_ids = Self::collect_officer_ids(&days);
        let records = self.store.fetch_officers(&officer_ids).await?;
        let officers = Self::normalize_officers(&officer_ids, records);
        Self::backfill_display_names(&mut days, &officers);

        info!(officer_count = officers.len(), "警员档案归一化完成");

        // ==========================================
        // 步骤4: 勤务分类 (主班次判定 + 岗位目录)
        // ==========================================
        debug!("步骤4: 执行勤务分类");

        let cross_shift = self
            .store
            .fetch_recurring_for_officers(&officer_ids, date_from)
            .await?;
        let primary_shifts = AssignmentClassifier::primary_shifts(&cross_shift);

        let catalog = self.store.fetch_position_catalog().await?;
        let classifier = AssignmentClassifier::new(self.config.clone(), &catalog);

        for day in &mut days {
            for assignment in &mut day.assignments {
                let primary = primary_shifts
                    .get(&assignment.officer_id)
                    .map(|s| s.as_str());
                classifier.apply(assignment, primary);
            }
        }

        info!(
            catalog_count = catalog.len(),
            primary_shift_count = primary_shifts.len(),
            "勤务分类完成"
        );

        // ==========================================
        // 步骤5: 年资评分 (并发扇出, 单人失败降级)
        // ==========================================
        debug!("步骤5: 执行年资评分");

        let seniority = self.seniority.resolve(&officer_ids, today).await;

        info!(score_count = seniority.len(), "年资评分完成");

        // ==========================================
        // 步骤6: 警员归类排序
        // ==========================================
        debug!("步骤6: 执行警员归类排序");

        let categorized = self.categorizer.categorize(officers, &seniority);

        info!(
            supervisor_count = categorized.supervisors.len(),
            regular_count = categorized.regular_officers.len(),
            probationary_count = categorized.probationary.len(),
            "警员归类排序完成"
        );

        // ==========================================
        // 步骤7: 逐日警力核定
        // ==========================================
        debug!("步骤7: 执行警力核定");

        let requirements = self.store.fetch_requirements(shift_id).await?;
        let roster_classes = categorized.roster_classes();
        let staffing = self
            .staffing
            .evaluate_range(&days, &roster_classes, &requirements);

        let understaffed_days = staffing.iter().filter(|v| v.understaffed).count();
        info!(
            requirement_count = requirements.len(),
            understaffed_days, "警力核定完成"
        );

        info!(shift_id = %shift_id, "排班解析完成");

        Ok(ResolvedSchedule {
            shift_id: shift_id.to_string(),
            date_from,
            date_to,
            resolved_on: today,
            days,
            officers: categorized,
            staffing,
        })
    }

    /// 合并结果中出现的警员并集 (升序去重)
    fn collect_officer_ids(days: &[ResolvedDay]) -> Vec<String> {
        let distinct: BTreeSet<&str> = days
            .iter()
            .flat_map(|d| d.assignments.iter())
            .map(|a| a.officer_id.as_str())
            .collect();
        distinct.into_iter().map(|s| s.to_string()).collect()
    }

    /// 档案归一化: 查得的走 from_record, 查不到的补占位档案
    fn normalize_officers(officer_ids: &[String], records: Vec<OfficerRecord>) -> Vec<Officer> {
        let mut by_id: HashMap<String, OfficerRecord> = records
            .into_iter()
            .map(|r| (r.officer_id.clone(), r))
            .collect();

        officer_ids
            .iter()
            .map(|officer_id| match by_id.remove(officer_id) {
                Some(record) => Officer::from_record(record),
                None => {
                    warn!(officer_id = %officer_id, "排班中出现但档案缺失, 使用占位档案");
                    Officer::placeholder(officer_id)
                }
            })
            .collect()
    }

    /// 回填日勤务的展示名
    fn backfill_display_names(days: &mut [ResolvedDay], officers: &[Officer]) {
        let names: HashMap<&str, String> = officers
            .iter()
            .map(|o| (o.officer_id.as_str(), o.display_name()))
            .collect();

        for day in days.iter_mut() {
            for assignment in &mut day.assignments {
                if let Some(name) = names.get(assignment.officer_id.as_str()) {
                    assignment.display_name = name.clone();
                }
            }
        }
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assignment::DailyAssignment;
    use crate::domain::types::{AssignmentKind, AssignmentSource};
    use crate::repository::SqliteRosterStore;
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_resolver() -> ScheduleResolver {
        let conn = Connection::open_in_memory().unwrap();
        let store = SqliteRosterStore::from_connection(Arc::new(Mutex::new(conn)));
        ScheduleResolver::new(Arc::new(store), Arc::new(RosterConfig::default()))
    }

    fn create_test_assignment(officer_id: &str, d: NaiveDate) -> DailyAssignment {
        DailyAssignment {
            date: d,
            officer_id: officer_id.to_string(),
            display_name: String::new(),
            shift_id: "SHIFT_A".to_string(),
            position: "Patrol".to_string(),
            unit: None,
            start_time: None,
            end_time: None,
            kind: AssignmentKind::Regular,
            source: AssignmentSource::Recurring,
            is_off: false,
            off_reason: None,
            pto_kind: None,
            anomaly: None,
        }
    }

    #[tokio::test]
    async fn test_reversed_range_rejected() {
        let resolver = create_test_resolver();
        let result = resolver
            .resolve(
                "SHIFT_A",
                date(2026, 3, 9),
                date(2026, 3, 2),
                date(2026, 3, 1),
            )
            .await;

        assert!(matches!(
            result,
            Err(ResolveError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_collect_officer_ids_dedups_and_sorts() {
        let d1 = date(2026, 3, 2);
        let d2 = date(2026, 3, 3);
        let days = vec![
            ResolvedDay {
                date: d1,
                assignments: vec![
                    create_test_assignment("o2", d1),
                    create_test_assignment("o1", d1),
                ],
            },
            ResolvedDay {
                date: d2,
                assignments: vec![create_test_assignment("o1", d2)],
            },
        ];

        let ids = ScheduleResolver::collect_officer_ids(&days);
        assert_eq!(ids, vec!["o1".to_string(), "o2".to_string()]);
    }

    #[test]
    fn test_normalize_officers_fills_placeholder_for_missing() {
        let ids = vec!["o1".to_string(), "o2".to_string()];
        let records = vec![OfficerRecord {
            officer_id: "o1".to_string(),
            badge_number: Some("104".to_string()),
            first_name: Some("Dana".to_string()),
            last_name: Some("Reyes".to_string()),
            rank_text: Some("Officer".to_string()),
            hire_date: None,
            promotion_to_sergeant: None,
            promotion_to_lieutenant: None,
            seniority_override: None,
            external_credit_years: None,
        }];

        let officers = ScheduleResolver::normalize_officers(&ids, records);
        assert_eq!(officers.len(), 2);
        assert_eq!(officers[0].last_name, "Reyes");
        assert_eq!(officers[1].last_name, "Unknown"); // o2 档案缺失
        assert_eq!(officers[1].badge_number, "9999");
    }

    #[test]
    fn test_backfill_display_names() {
        let d1 = date(2026, 3, 2);
        let mut days = vec![ResolvedDay {
            date: d1,
            assignments: vec![create_test_assignment("o1", d1)],
        }];
        let officers = vec![Officer {
            officer_id: "o1".to_string(),
            badge_number: "104".to_string(),
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            rank_text: "Officer".to_string(),
            hire_date: None,
            promotion_to_sergeant: None,
            promotion_to_lieutenant: None,
            seniority_override: None,
            external_credit_years: None,
        }];

        ScheduleResolver::backfill_display_names(&mut days, &officers);
        assert_eq!(days[0].assignments[0].display_name, "Reyes, Dana");
    }
}
