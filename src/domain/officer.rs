// ==========================================
// 警务排班系统 - 警员领域模型
// ==========================================
// 红线: 档案字段缺失一律本地补全占位值, 不得让解析中断
// ==========================================

use crate::domain::types::{Rank, RosterClass};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 姓氏缺失占位值
pub const PLACEHOLDER_LAST_NAME: &str = "Unknown";
/// 警号缺失占位值
pub const PLACEHOLDER_BADGE: &str = "9999";
/// 警衔缺失占位值
pub const PLACEHOLDER_RANK: &str = "Officer";

// ==========================================
// OfficerRecord - 警员档案原始行
// ==========================================
// 用途: 存储层读出的原始档案, 除主键外所有字段可缺失
// 生命周期: 仅在归一化之前
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerRecord {
    // ===== 主键 =====
    pub officer_id: String, // 警员唯一标识

    // ===== 基础信息 =====
    pub badge_number: Option<String>, // 警号 (文本, 可能含字母)
    pub first_name: Option<String>,   // 名
    pub last_name: Option<String>,    // 姓
    pub rank_text: Option<String>,    // 衔级文本 (自由格式, 如 "Patrol Sergeant")

    // ===== 年资输入 =====
    pub hire_date: Option<NaiveDate>,                // 入职日期
    pub promotion_to_sergeant: Option<NaiveDate>,    // 晋升警司日期
    pub promotion_to_lieutenant: Option<NaiveDate>,  // 晋升警督日期
    pub seniority_override: Option<f64>,             // 人工年资覆盖 (>0 时无条件生效)
    pub external_credit_years: Option<f64>,          // 外部系统折算年资 (优先于日期推算)
}

// ==========================================
// Officer - 归一化警员档案
// ==========================================
// 用途: 引擎层依赖的完整档案, 缺失字段已补全占位值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Officer {
    pub officer_id: String,
    pub badge_number: String, // 缺失 -> "9999"
    pub first_name: String,   // 缺失 -> ""
    pub last_name: String,    // 缺失 -> "Unknown"
    pub rank_text: String,    // 缺失 -> "Officer"

    pub hire_date: Option<NaiveDate>,
    pub promotion_to_sergeant: Option<NaiveDate>,
    pub promotion_to_lieutenant: Option<NaiveDate>,
    pub seniority_override: Option<f64>,
    pub external_credit_years: Option<f64>,
}

impl Officer {
    /// 从原始档案行归一化
    ///
    /// # 规则
    /// - 姓缺失 -> "Unknown", 警号缺失 -> "9999", 衔级缺失 -> "Officer"
    /// - 名缺失 -> 空串 (展示时自动省略)
    /// - 日期与年资字段保持 None, 由年资引擎兜底
    pub fn from_record(record: OfficerRecord) -> Self {
        let non_blank = |v: Option<String>, fallback: &str| -> String {
            match v {
                Some(s) if !s.trim().is_empty() => s.trim().to_string(),
                _ => fallback.to_string(),
            }
        };

        Officer {
            officer_id: record.officer_id,
            badge_number: non_blank(record.badge_number, PLACEHOLDER_BADGE),
            first_name: non_blank(record.first_name, ""),
            last_name: non_blank(record.last_name, PLACEHOLDER_LAST_NAME),
            rank_text: non_blank(record.rank_text, PLACEHOLDER_RANK),
            hire_date: record.hire_date,
            promotion_to_sergeant: record.promotion_to_sergeant,
            promotion_to_lieutenant: record.promotion_to_lieutenant,
            seniority_override: record.seniority_override,
            external_credit_years: record.external_credit_years,
        }
    }

    /// 档案完全缺失时的占位警员 (排班里出现但档案查不到)
    pub fn placeholder(officer_id: &str) -> Self {
        Officer {
            officer_id: officer_id.to_string(),
            badge_number: PLACEHOLDER_BADGE.to_string(),
            first_name: String::new(),
            last_name: PLACEHOLDER_LAST_NAME.to_string(),
            rank_text: PLACEHOLDER_RANK.to_string(),
            hire_date: None,
            promotion_to_sergeant: None,
            promotion_to_lieutenant: None,
            seniority_override: None,
            external_credit_years: None,
        }
    }

    /// 展示名: "姓, 名", 名为空时只留姓
    pub fn display_name(&self) -> String {
        if self.first_name.is_empty() {
            self.last_name.clone()
        } else {
            format!("{}, {}", self.last_name, self.first_name)
        }
    }

    /// 警号排序键: 纯数字警号按数值升序, 不可解析置后 (i64::MAX 哨兵)
    pub fn badge_sort_key(&self) -> i64 {
        self.badge_number.trim().parse::<i64>().unwrap_or(i64::MAX)
    }
}

// ==========================================
// SeniorityInput - 年资计算输入
// ==========================================
// 用途: 年资引擎的单警员查询结果 (生产环境可来自独立人事服务)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeniorityInput {
    pub officer_id: String,
    pub rank_text: Option<String>, // 决定基准日取哪个晋升日期
    pub hire_date: Option<NaiveDate>,
    pub promotion_to_sergeant: Option<NaiveDate>,
    pub promotion_to_lieutenant: Option<NaiveDate>,
    pub seniority_override: Option<f64>,
    pub external_credit_years: Option<f64>,
}

// ==========================================
// CategorizedOfficer - 分类排序后的警员
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedOfficer {
    pub officer: Officer,
    pub rank: Rank,               // 词表解析后的衔级
    pub roster_class: RosterClass, // 花名册类别
    pub seniority: f64,            // 年资评分 (1 位小数)
}
