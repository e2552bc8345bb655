// ==========================================
// 警务排班系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (rusqlite) + tokio
// 系统定位: 排班解析与警力核定的只读引擎 (不拥有底表写入权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据存储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 词表与解析参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AssignmentKind, AssignmentSource, PositionCategory, PtoKind, Rank, RosterClass,
};

// 领域实体
pub use domain::{
    CategorizedOfficer, DailyAssignment, Officer, OfficerRecord, PositionRecord,
    RecurringAssignment, ResolvedDay, ScheduleException, SeniorityInput, StaffingRequirement,
    StaffingVerdict,
};

// 引擎
pub use engine::{
    AssignmentClassifier, CategorizedOfficers, ExceptionIndex, OfficerCategorizer,
    RecurringPatternIndex, ResolveError, ResolvedSchedule, ScheduleMerger, ScheduleResolver,
    SeniorityResolver, StaffingEvaluator,
};

// API
pub use api::{ApiError, ApiResult, ResolutionKey, RosterApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "警务排班系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
