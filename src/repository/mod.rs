// ==========================================
// 警务排班系统 - 数据存储层
// ==========================================
// 红线: Store 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod roster_store;
pub mod sqlite_store;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use roster_store::RosterStore;
pub use sqlite_store::SqliteRosterStore;
