// ==========================================
// 警务排班系统 - 警力核定领域模型
// ==========================================
// 红线: 无对应 (班次, 星期) 配置时最低要求按 0 处理, 不报错
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// StaffingRequirement - 最低警力配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingRequirement {
    pub shift_id: String,
    pub day_of_week: u8,     // 星期 (0=周日 .. 6=周六)
    pub min_officers: u32,   // 普通警员最低人数
    pub min_supervisors: u32, // 主管最低人数
}

// ==========================================
// StaffingVerdict - 单日警力核定结论
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingVerdict {
    pub date: NaiveDate,

    // ===== 在岗计数 =====
    pub supervisor_count: u32,   // 在岗主管数
    pub officer_count: u32,      // 在岗普通警员数
    pub probationary_count: u32, // 在岗试用期警员数 (不满足任何最低要求)

    // ===== 最低要求 =====
    pub min_supervisors: u32,
    pub min_officers: u32,
    pub requirement_missing: bool, // 该 (班次, 星期) 无配置行

    // ===== 结论 =====
    pub meets_supervisors: bool,
    pub meets_officers: bool,
    pub understaffed: bool, // 任一最低要求未满足
}
