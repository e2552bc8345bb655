// ==========================================
// 警务排班系统 - 领域类型定义
// ==========================================
// 职责: 勤务分类/警衔/休假类别等核心枚举
// 红线: 分类是枚举制,不是评分制
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 勤务分类 (Assignment Kind)
// ==========================================
// 红线: 分类按固定顺序首条命中即定:
//       TIME_OFF -> OVERTIME -> SPECIAL_ASSIGNMENT -> REGULAR
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentKind {
    Regular,           // 常规勤务
    TimeOff,           // 休假 (is_off + 有事由)
    SpecialAssignment, // 特勤 (培训/出庭/搭班等)
    Overtime,          // 加班 (非本人主班次)
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentKind::Regular => write!(f, "REGULAR"),
            AssignmentKind::TimeOff => write!(f, "TIME_OFF"),
            AssignmentKind::SpecialAssignment => write!(f, "SPECIAL_ASSIGNMENT"),
            AssignmentKind::Overtime => write!(f, "OVERTIME"),
        }
    }
}

impl AssignmentKind {
    /// 从字符串解析勤务分类
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "TIME_OFF" => AssignmentKind::TimeOff,
            "SPECIAL_ASSIGNMENT" => AssignmentKind::SpecialAssignment,
            "OVERTIME" => AssignmentKind::Overtime,
            _ => AssignmentKind::Regular, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AssignmentKind::Regular => "REGULAR",
            AssignmentKind::TimeOff => "TIME_OFF",
            AssignmentKind::SpecialAssignment => "SPECIAL_ASSIGNMENT",
            AssignmentKind::Overtime => "OVERTIME",
        }
    }
}

// ==========================================
// 勤务来源 (Assignment Source)
// ==========================================
// 红线: 同一 (警员, 日期) 例外永远覆盖周常
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentSource {
    Recurring, // 周常排班 (按星期重复)
    Exception, // 例外排班 (指定日期)
}

impl fmt::Display for AssignmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentSource::Recurring => write!(f, "RECURRING"),
            AssignmentSource::Exception => write!(f, "EXCEPTION"),
        }
    }
}

// ==========================================
// 警衔 (Rank)
// ==========================================
// 主管序: CHIEF < CAPTAIN < LIEUTENANT < SERGEANT (指挥链顺序)
// 衔级文本解析由词表驱动,见 config::RankVocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Chief,        // 局长
    Captain,      // 警监
    Lieutenant,   // 警督
    Sergeant,     // 警长
    Officer,      // 警员 (缺省衔级)
    Probationary, // 试用期警员
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Chief => write!(f, "CHIEF"),
            Rank::Captain => write!(f, "CAPTAIN"),
            Rank::Lieutenant => write!(f, "LIEUTENANT"),
            Rank::Sergeant => write!(f, "SERGEANT"),
            Rank::Officer => write!(f, "OFFICER"),
            Rank::Probationary => write!(f, "PROBATIONARY"),
        }
    }
}

impl Rank {
    /// 从字符串解析警衔
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "CHIEF" => Rank::Chief,
            "CAPTAIN" => Rank::Captain,
            "LIEUTENANT" => Rank::Lieutenant,
            "SERGEANT" => Rank::Sergeant,
            "PROBATIONARY" => Rank::Probationary,
            _ => Rank::Officer, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Rank::Chief => "CHIEF",
            Rank::Captain => "CAPTAIN",
            Rank::Lieutenant => "LIEUTENANT",
            Rank::Sergeant => "SERGEANT",
            Rank::Officer => "OFFICER",
            Rank::Probationary => "PROBATIONARY",
        }
    }

    /// 主管排序档位 (数值越小越靠前), 非主管返回 None
    pub fn supervisor_tier(&self) -> Option<u8> {
        match self {
            Rank::Chief => Some(0),
            Rank::Captain => Some(1),
            Rank::Lieutenant => Some(2),
            Rank::Sergeant => Some(3),
            Rank::Officer | Rank::Probationary => None,
        }
    }

    /// 衔级对应的花名册类别
    pub fn roster_class(&self) -> RosterClass {
        match self {
            Rank::Chief | Rank::Captain | Rank::Lieutenant | Rank::Sergeant => {
                RosterClass::Supervisor
            }
            Rank::Officer => RosterClass::Regular,
            Rank::Probationary => RosterClass::Probationary,
        }
    }
}

// ==========================================
// 花名册类别 (Roster Class)
// ==========================================
// 红线: 试用期警员计数但不满足任何最低警力要求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RosterClass {
    Supervisor,   // 主管 (Sergeant 及以上)
    Regular,      // 普通警员
    Probationary, // 试用期警员
}

impl fmt::Display for RosterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterClass::Supervisor => write!(f, "SUPERVISOR"),
            RosterClass::Regular => write!(f, "REGULAR"),
            RosterClass::Probationary => write!(f, "PROBATIONARY"),
        }
    }
}

// ==========================================
// 休假类别 (PTO Kind)
// ==========================================
// 由休假事由文本按关键词词表解析, 未命中归入 OTHER
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PtoKind {
    Vacation, // 年假
    Holiday,  // 法定假
    Sick,     // 病假
    Comp,     // 调休
    Other,    // 其他 (保留原始事由文本)
}

impl fmt::Display for PtoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PtoKind::Vacation => write!(f, "VACATION"),
            PtoKind::Holiday => write!(f, "HOLIDAY"),
            PtoKind::Sick => write!(f, "SICK"),
            PtoKind::Comp => write!(f, "COMP"),
            PtoKind::Other => write!(f, "OTHER"),
        }
    }
}

// ==========================================
// 岗位类别 (Position Category)
// ==========================================
// 岗位目录的标注值, 决定岗位是否计入在岗警力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionCategory {
    Regular, // 常规岗 (计入警力)
    Special, // 特勤岗 (不计入警力)
}

impl fmt::Display for PositionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionCategory::Regular => write!(f, "REGULAR"),
            PositionCategory::Special => write!(f, "SPECIAL"),
        }
    }
}

impl PositionCategory {
    /// 从字符串解析岗位类别
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "SPECIAL" => PositionCategory::Special,
            _ => PositionCategory::Regular, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PositionCategory::Regular => "REGULAR",
            PositionCategory::Special => "SPECIAL",
        }
    }
}

// ==========================================
// 岗位目录行 (Position Record)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub position_name: String,          // 岗位名称
    pub category: PositionCategory,     // 岗位类别
}

// ==========================================
// 星期编号
// ==========================================

/// 日期对应的星期编号 (0=周日 .. 6=周六, 与排班源数据一致)
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}
