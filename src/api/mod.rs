// ==========================================
// 警务排班系统 - API 层
// ==========================================
// 职责: 提供排班查询业务接口, 供 CLI / 上层服务调用
// ==========================================

pub mod error;
pub mod roster_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use roster_api::{
    DayRoster, DayRosterRow, ForceListRow, ResolutionKey, RosterApi, StaffingSummary, VacationRow,
};
