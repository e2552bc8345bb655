// ==========================================
// 警务排班系统 - 排班存储 Trait
// ==========================================
// 职责: 定义排班解析所需的数据访问接口 (不包含业务逻辑)
// 红线: Store 不含业务规则, 只做数据读取
// ==========================================

use crate::domain::assignment::{RecurringAssignment, ScheduleException};
use crate::domain::officer::{OfficerRecord, SeniorityInput};
use crate::domain::staffing::StaffingRequirement;
use crate::domain::types::PositionRecord;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::NaiveDate;

// ==========================================
// RosterStore Trait
// ==========================================
// 用途: 排班解析全流程的数据读取
// 实现者: SqliteRosterStore (rusqlite)
#[async_trait]
pub trait RosterStore: Send + Sync {
    // ===== 排班数据 =====

    /// 查询某班次的周常排班 (全星期)
    ///
    /// # 参数
    /// - shift_id: 班次标识
    /// - active_on_or_after: 只取截止日期为空或不早于该日的行
    ///
    /// # 返回
    /// - Ok(Vec): 与解析区间仍有交集的周常排班行
    async fn fetch_recurring_for_shift(
        &self,
        shift_id: &str,
        active_on_or_after: NaiveDate,
    ) -> RepositoryResult<Vec<RecurringAssignment>>;

    /// 查询某班次在日期区间内的例外排班
    ///
    /// # 参数
    /// - shift_id: 班次标识
    /// - date_from / date_to: 闭区间边界
    ///
    /// # 返回
    /// - Ok(Vec): 区间内全部例外行, 含重复录入 (裁决由索引层完成)
    async fn fetch_exceptions(
        &self,
        shift_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> RepositoryResult<Vec<ScheduleException>>;

    /// 查询某班次的最低警力配置 (全星期)
    async fn fetch_requirements(
        &self,
        shift_id: &str,
    ) -> RepositoryResult<Vec<StaffingRequirement>>;

    /// 查询岗位目录 (岗位名称 -> 类别标注)
    async fn fetch_position_catalog(&self) -> RepositoryResult<Vec<PositionRecord>>;

    // ===== 警员档案 =====

    /// 批量查询警员档案
    ///
    /// # 参数
    /// - officer_ids: 警员标识列表 (合并结果中出现的警员并集)
    ///
    /// # 返回
    /// - Ok(Vec): 查得的档案行; 查不到的警员不在结果中, 由调用方补占位档案
    async fn fetch_officers(
        &self,
        officer_ids: &[String],
    ) -> RepositoryResult<Vec<OfficerRecord>>;

    /// 批量查询警员的跨班次周常排班 (主班次判定依据)
    ///
    /// # 参数
    /// - active_on_or_after: 过滤口径与 fetch_recurring_for_shift 一致
    async fn fetch_recurring_for_officers(
        &self,
        officer_ids: &[String],
        active_on_or_after: NaiveDate,
    ) -> RepositoryResult<Vec<RecurringAssignment>>;

    /// 查询单警员的年资计算输入
    ///
    /// # 说明
    /// - 单警员粒度, 供年资引擎并发扇出; 生产环境可由独立人事服务实现
    /// - 查询失败不阻断解析: 调用方降级为 0 年资并告警
    async fn fetch_seniority_inputs(
        &self,
        officer_id: &str,
    ) -> RepositoryResult<SeniorityInput>;
}
