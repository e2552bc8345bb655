// ==========================================
// 警务排班系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod officer;
pub mod staffing;
pub mod types;

// 重导出核心类型
pub use assignment::{DailyAssignment, RecurringAssignment, ResolvedDay, ScheduleException};
pub use officer::{
    CategorizedOfficer, Officer, OfficerRecord, SeniorityInput, PLACEHOLDER_BADGE,
    PLACEHOLDER_LAST_NAME, PLACEHOLDER_RANK,
};
pub use staffing::{StaffingRequirement, StaffingVerdict};
pub use types::{
    weekday_index, AssignmentKind, AssignmentSource, PositionCategory, PositionRecord, PtoKind,
    Rank, RosterClass,
};
