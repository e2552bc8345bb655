// ==========================================
// 警务排班系统 - 引擎层
// ==========================================
// 职责: 实现排班解析业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL, 数据一律经 RosterStore 读取
// ==========================================

pub mod categorizer;
pub mod classifier;
pub mod indexes;
pub mod merger;
pub mod resolver;
pub mod seniority;
pub mod staffing;

// 重导出核心引擎
pub use categorizer::{CategorizedOfficers, OfficerCategorizer};
pub use classifier::{AssignmentClassifier, Classification};
pub use indexes::{ExceptionIndex, RecurringPatternIndex};
pub use merger::ScheduleMerger;
pub use resolver::{ResolveError, ResolvedSchedule, ScheduleResolver};
pub use seniority::SeniorityResolver;
pub use staffing::StaffingEvaluator;
