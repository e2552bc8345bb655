// ==========================================
// 警务排班系统 - 排班领域模型
// ==========================================
// 红线: 例外永远覆盖周常; 每 (警员, 日期) 恰好一条日勤务
// ==========================================

use crate::domain::types::{AssignmentKind, AssignmentSource, PtoKind};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// RecurringAssignment - 周常排班
// ==========================================
// 用途: 按星期重复的固定排班行 (排班表的主体)
// 失效规则: end_date 为空表示长期有效, 否则含当日在内继续生效
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringAssignment {
    pub id: String,          // 排班行唯一标识
    pub officer_id: String,  // 警员
    pub shift_id: String,    // 班次
    pub day_of_week: u8,     // 星期 (0=周日 .. 6=周六)
    pub position: String,    // 岗位名称
    pub unit: Option<String>, // 车组/单元编号
    pub end_date: Option<NaiveDate>, // 截止日期 (闭区间, 空 = 长期)
}

impl RecurringAssignment {
    /// 该周常排班在指定日期是否生效 (尚未过截止日期)
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        match self.end_date {
            Some(end) => date <= end,
            None => true,
        }
    }
}

// ==========================================
// ScheduleException - 例外排班
// ==========================================
// 用途: 指定日期的覆盖行 (调班/加班/休假/特勤)
// 红线: 同 (警员, 日期) 多条例外时, created_at 最新者生效
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleException {
    pub id: String,
    pub officer_id: String,
    pub shift_id: String,
    pub date: NaiveDate,      // 生效日期

    // ===== 勤务内容 =====
    pub position: String,
    pub unit: Option<String>,
    pub start_time: Option<String>, // 时段覆盖 "HH:MM"
    pub end_time: Option<String>,

    // ===== 休假标记 =====
    pub is_off: bool,               // 当日不在岗
    pub off_reason: Option<String>, // 休假事由 (空则为数据异常)

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime, // 录入时间 (重复例外裁决依据)
}

// ==========================================
// DailyAssignment - 日勤务 (合并输出)
// ==========================================
// 用途: 合并引擎逐日产出, 分类引擎回填 kind/pto/anomaly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAssignment {
    // ===== 身份 =====
    pub date: NaiveDate,
    pub officer_id: String,
    pub display_name: String, // 归一化档案回填 ("姓, 名")

    // ===== 勤务内容 =====
    pub shift_id: String,
    pub position: String,
    pub unit: Option<String>,
    pub start_time: Option<String>, // 仅例外来源可能覆盖时段
    pub end_time: Option<String>,

    // ===== 分类结果 =====
    pub kind: AssignmentKind,
    pub source: AssignmentSource,
    pub is_off: bool,
    pub off_reason: Option<String>,
    pub pto_kind: Option<PtoKind>, // 仅 TIME_OFF 有值

    // ===== 数据异常标记 =====
    pub anomaly: Option<String>, // 如 OFF_NO_REASON (is_off 但无事由)
}

impl DailyAssignment {
    /// 是否为正常周常日 (未被例外覆盖)
    pub fn is_regular_recurring_day(&self) -> bool {
        self.source == AssignmentSource::Recurring
    }

    /// 是否计入在岗警力
    ///
    /// # 规则
    /// - 休假/特勤/标记不在岗的勤务不计入
    /// - 加班计入 (人确实在岗)
    pub fn counts_toward_coverage(&self) -> bool {
        if self.is_off {
            return false;
        }
        !matches!(
            self.kind,
            AssignmentKind::TimeOff | AssignmentKind::SpecialAssignment
        )
    }
}

// ==========================================
// ResolvedDay - 单日合并结果
// ==========================================
// 不变式: assignments 按 officer_id 升序, 每警员至多一条
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedDay {
    pub date: NaiveDate,
    pub assignments: Vec<DailyAssignment>,
}

impl ResolvedDay {
    /// 按警员查当日勤务
    pub fn assignment_for(&self, officer_id: &str) -> Option<&DailyAssignment> {
        self.assignments
            .iter()
            .find(|a| a.officer_id == officer_id)
    }
}
