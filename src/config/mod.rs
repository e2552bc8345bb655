// ==========================================
// 警务排班系统 - 配置层
// ==========================================
// 职责: 分类词表与解析参数管理
// ==========================================

pub mod roster_config;

// 重导出核心配置类型
pub use roster_config::{PtoVocabulary, RankVocabulary, RosterConfig};

/// 获取默认数据库路径
///
/// # 返回
/// - 开发环境: 用户数据目录/patrol-roster-dev/patrol_roster.db
/// - 生产环境: 用户数据目录/patrol-roster/patrol_roster.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("PATROL_ROSTER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，后续如果能拿到 data_dir 再覆盖。
    let mut path = PathBuf::from("./patrol_roster.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("patrol-roster-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("patrol-roster");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("patrol_roster.db");
    }

    path.to_string_lossy().to_string()
}
