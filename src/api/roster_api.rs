// ==========================================
// 警务排班系统 - 排班查询 API
// ==========================================
// 职责: 封装 ScheduleResolver, 提供解析结果缓存与各展示投影
// 红线: 一切展示面只能从 ResolvedSchedule 投影, 禁止各自重新合并底表
// 红线: 缓存键为完整参数元组 (班次, 起, 止), 被取代的解析结果不得串 key 应用
// ==========================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::RosterConfig;
use crate::domain::staffing::StaffingVerdict;
use crate::domain::types::{AssignmentKind, PtoKind, RosterClass};
use crate::engine::{ResolvedSchedule, ScheduleResolver};
use crate::repository::RosterStore;

// ==========================================
// ResolutionKey - 解析缓存键
// ==========================================
// 不变式: 键覆盖全部解析参数, 参数不同的结果互不可见
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionKey {
    pub shift_id: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl ResolutionKey {
    pub fn new(shift_id: &str, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            shift_id: shift_id.to_string(),
            date_from,
            date_to,
        }
    }
}

// ==========================================
// 投影 DTO
// ==========================================

/// 单日名册行 (按花名册顺序)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRosterRow {
    pub officer_id: String,
    pub display_name: String,
    pub badge_number: String,
    pub rank_text: String,
    pub roster_class: RosterClass,

    pub position: String,
    pub unit: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,

    pub kind: AssignmentKind,
    pub is_regular_recurring_day: bool,
    pub is_off: bool,
    pub off_reason: Option<String>,
    pub pto_kind: Option<PtoKind>,
    pub anomaly: Option<String>,
}

/// 单日名册 (行 + 当日警力核定)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRoster {
    pub date: NaiveDate,
    pub rows: Vec<DayRosterRow>,
    pub staffing: Option<StaffingVerdict>,
}

/// 强制加班顺位行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceListRow {
    pub rank_order: u32, // 1 起算的顺位号
    pub officer_id: String,
    pub display_name: String,
    pub badge_number: String,
    pub rank_text: String,
    pub roster_class: RosterClass,
    pub seniority: f64,
}

/// 休假台账行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationRow {
    pub date: NaiveDate,
    pub officer_id: String,
    pub display_name: String,
    pub pto_kind: Option<PtoKind>,
    pub reason: Option<String>,
}

/// 警力核定汇总 (缺口日优先展示)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingSummary {
    pub total_days: usize,
    pub understaffed_days: usize,
    pub verdicts: Vec<StaffingVerdict>,
}

// ==========================================
// RosterApi - 排班查询 API
// ==========================================

/// 排班查询API
///
/// 职责:
/// 1. 驱动 ScheduleResolver 产出 ResolvedSchedule
/// 2. 按 (班次, 起, 止) 缓存解析结果
/// 3. 提供名册/顺位/休假/核定四类只读投影 (不再触发 I/O)
pub struct RosterApi {
    resolver: ScheduleResolver,
    /// 解析结果缓存
    /// 红线: 锁内禁止 await, 取 Arc 克隆后立即释放
    cache: Mutex<HashMap<ResolutionKey, Arc<ResolvedSchedule>>>,
}

impl RosterApi {
    /// 创建新的 RosterApi 实例
    ///
    /// # 参数
    /// - store: 排班存储
    /// - config: 分类词表配置
    pub fn new(store: Arc<dyn RosterStore>, config: Arc<RosterConfig>) -> Self {
        Self {
            resolver: ScheduleResolver::new(store, config),
            cache: Mutex::new(HashMap::new()),
        }
    }

    // ==========================================
    // 解析入口
    // ==========================================

    /// 解析排班 (年资基准日取本地当日)
    pub async fn resolve_schedule(
        &self,
        shift_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> ApiResult<Arc<ResolvedSchedule>> {
        let today = chrono::Local::now().date_naive();
        self.resolve_schedule_as_of(shift_id, date_from, date_to, today)
            .await
    }

    /// 解析排班 (显式年资基准日, 保证可重放)
    ///
    /// # 返回
    /// - Ok(Arc<ResolvedSchedule>): 命中缓存或新解析的结果
    /// - Err(ApiError): 参数无效或底层存储错误
    pub async fn resolve_schedule_as_of(
        &self,
        shift_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        today: NaiveDate,
    ) -> ApiResult<Arc<ResolvedSchedule>> {
        if shift_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("班次ID不能为空".to_string()));
        }

        let key = ResolutionKey::new(shift_id, date_from, date_to);

        // 缓存命中要求基准日一致, 隔日陈旧结果直接重算
        if let Some(hit) = self.cached(&key)? {
            if hit.resolved_on == today {
                return Ok(hit);
            }
        }

        let schedule = Arc::new(
            self.resolver
                .resolve(shift_id, date_from, date_to, today)
                .await?,
        );

        self.lock_cache()?
            .insert(key, Arc::clone(&schedule));

        Ok(schedule)
    }

    /// 清空解析缓存 (底层数据变更后调用)
    pub fn invalidate(&self) -> ApiResult<()> {
        self.lock_cache()?.clear();
        Ok(())
    }

    // ==========================================
    // 投影接口 (只读, 不触发 I/O)
    // ==========================================

    /// 单日名册: 按花名册顺序列出当日勤务 + 当日警力核定
    pub fn day_roster(&self, key: &ResolutionKey, date: NaiveDate) -> ApiResult<DayRoster> {
        let schedule = self.require_cached(key)?;

        let day = schedule.day(date).ok_or_else(|| {
            ApiError::NotFound(format!(
                "日期{}不在已解析区间 [{}, {}] 内",
                date, schedule.date_from, schedule.date_to
            ))
        })?;

        let rows = schedule
            .officers
            .iter_ranked()
            .filter_map(|entry| {
                day.assignment_for(&entry.officer.officer_id)
                    .map(|assignment| DayRosterRow {
                        officer_id: entry.officer.officer_id.clone(),
                        display_name: assignment.display_name.clone(),
                        badge_number: entry.officer.badge_number.clone(),
                        rank_text: entry.officer.rank_text.clone(),
                        roster_class: entry.roster_class,
                        position: assignment.position.clone(),
                        unit: assignment.unit.clone(),
                        start_time: assignment.start_time.clone(),
                        end_time: assignment.end_time.clone(),
                        kind: assignment.kind,
                        is_regular_recurring_day: assignment.is_regular_recurring_day(),
                        is_off: assignment.is_off,
                        off_reason: assignment.off_reason.clone(),
                        pto_kind: assignment.pto_kind,
                        anomaly: assignment.anomaly.clone(),
                    })
            })
            .collect();

        Ok(DayRoster {
            date,
            rows,
            staffing: schedule.verdict(date).cloned(),
        })
    }

    /// 强制加班顺位: 花名册顺序即顺位 (主管 -> 普通 -> 试用期)
    pub fn force_list(&self, key: &ResolutionKey) -> ApiResult<Vec<ForceListRow>> {
        let schedule = self.require_cached(key)?;

        let rows = schedule
            .officers
            .iter_ranked()
            .enumerate()
            .map(|(idx, entry)| ForceListRow {
                rank_order: (idx + 1) as u32,
                officer_id: entry.officer.officer_id.clone(),
                display_name: entry.officer.display_name(),
                badge_number: entry.officer.badge_number.clone(),
                rank_text: entry.officer.rank_text.clone(),
                roster_class: entry.roster_class,
                seniority: entry.seniority,
            })
            .collect();

        Ok(rows)
    }

    /// 休假台账: 区间内全部 TIME_OFF 勤务, 日期升序
    pub fn vacation_list(&self, key: &ResolutionKey) -> ApiResult<Vec<VacationRow>> {
        let schedule = self.require_cached(key)?;

        // days 本身日期升序, 单日内 officer_id 升序
        let rows = schedule
            .days
            .iter()
            .flat_map(|day| day.assignments.iter())
            .filter(|a| a.kind == AssignmentKind::TimeOff)
            .map(|a| VacationRow {
                date: a.date,
                officer_id: a.officer_id.clone(),
                display_name: a.display_name.clone(),
                pto_kind: a.pto_kind,
                reason: a.off_reason.clone(),
            })
            .collect();

        Ok(rows)
    }

    /// 警力核定汇总: 缺口日排前, 其余按日期升序
    pub fn staffing_summary(&self, key: &ResolutionKey) -> ApiResult<StaffingSummary> {
        let schedule = self.require_cached(key)?;

        let mut verdicts = schedule.staffing.clone();
        verdicts.sort_by_key(|v| (!v.understaffed, v.date));

        Ok(StaffingSummary {
            total_days: verdicts.len(),
            understaffed_days: verdicts.iter().filter(|v| v.understaffed).count(),
            verdicts,
        })
    }

    // ==========================================
    // 内部工具
    // ==========================================

    fn lock_cache(
        &self,
    ) -> ApiResult<std::sync::MutexGuard<'_, HashMap<ResolutionKey, Arc<ResolvedSchedule>>>> {
        self.cache
            .lock()
            .map_err(|e| ApiError::InternalError(format!("缓存锁获取失败: {}", e)))
    }

    fn cached(&self, key: &ResolutionKey) -> ApiResult<Option<Arc<ResolvedSchedule>>> {
        Ok(self.lock_cache()?.get(key).map(Arc::clone))
    }

    fn require_cached(&self, key: &ResolutionKey) -> ApiResult<Arc<ResolvedSchedule>> {
        self.cached(key)?.ok_or_else(|| {
            ApiError::NotFound(format!(
                "排班未解析: shift_id={}, date_from={}, date_to={}",
                key.shift_id, key.date_from, key.date_to
            ))
        })
    }
}
