// ==========================================
// 警务排班系统 - 解析配置
// ==========================================
// 职责: 分类词表与解析参数, 全部可由 JSON 配置文件覆写
// 红线: 词表是配置不是代码, 引擎只读 Arc<RosterConfig>
// ==========================================

use crate::domain::types::{PtoKind, Rank};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 警衔词表（不区分大小写的子串匹配）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankVocabulary {
    /// 局长关键词
    #[serde(default = "RankVocabulary::default_chief")]
    pub chief_keywords: Vec<String>,

    /// 警监关键词
    #[serde(default = "RankVocabulary::default_captain")]
    pub captain_keywords: Vec<String>,

    /// 警督关键词
    #[serde(default = "RankVocabulary::default_lieutenant")]
    pub lieutenant_keywords: Vec<String>,

    /// 警长关键词
    #[serde(default = "RankVocabulary::default_sergeant")]
    pub sergeant_keywords: Vec<String>,

    /// 试用期关键词
    #[serde(default = "RankVocabulary::default_probationary")]
    pub probationary_keywords: Vec<String>,
}

impl RankVocabulary {
    fn default_chief() -> Vec<String> {
        vec!["chief".to_string()]
    }

    fn default_captain() -> Vec<String> {
        vec!["captain".to_string()]
    }

    fn default_lieutenant() -> Vec<String> {
        vec!["lieutenant".to_string()]
    }

    fn default_sergeant() -> Vec<String> {
        vec!["sergeant".to_string()]
    }

    fn default_probationary() -> Vec<String> {
        vec![
            "probation".to_string(),
            "ppo".to_string(),
            "recruit".to_string(),
            "trainee".to_string(),
        ]
    }

    /// 衔级文本 -> 警衔
    ///
    /// # 规则
    /// - 按指挥链顺序匹配: chief -> captain -> lieutenant -> sergeant
    /// - 再匹配试用期关键词
    /// - 全不命中 (含空文本) -> Officer
    pub fn classify(&self, rank_text: &str) -> Rank {
        let text = rank_text.to_lowercase();
        if contains_any(&text, &self.chief_keywords) {
            Rank::Chief
        } else if contains_any(&text, &self.captain_keywords) {
            Rank::Captain
        } else if contains_any(&text, &self.lieutenant_keywords) {
            Rank::Lieutenant
        } else if contains_any(&text, &self.sergeant_keywords) {
            Rank::Sergeant
        } else if contains_any(&text, &self.probationary_keywords) {
            Rank::Probationary
        } else {
            Rank::Officer
        }
    }
}

impl Default for RankVocabulary {
    fn default() -> Self {
        RankVocabulary {
            chief_keywords: Self::default_chief(),
            captain_keywords: Self::default_captain(),
            lieutenant_keywords: Self::default_lieutenant(),
            sergeant_keywords: Self::default_sergeant(),
            probationary_keywords: Self::default_probationary(),
        }
    }
}

/// 休假事由词表（不区分大小写的子串匹配）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtoVocabulary {
    #[serde(default = "PtoVocabulary::default_vacation")]
    pub vacation_keywords: Vec<String>,

    #[serde(default = "PtoVocabulary::default_holiday")]
    pub holiday_keywords: Vec<String>,

    #[serde(default = "PtoVocabulary::default_sick")]
    pub sick_keywords: Vec<String>,

    #[serde(default = "PtoVocabulary::default_comp")]
    pub comp_keywords: Vec<String>,
}

impl PtoVocabulary {
    fn default_vacation() -> Vec<String> {
        vec!["vacation".to_string(), "annual leave".to_string()]
    }

    fn default_holiday() -> Vec<String> {
        vec!["holiday".to_string()]
    }

    fn default_sick() -> Vec<String> {
        vec!["sick".to_string(), "medical".to_string()]
    }

    fn default_comp() -> Vec<String> {
        vec!["comp".to_string()]
    }

    /// 休假事由 -> 休假类别, 全不命中归 OTHER (原始事由文本另行保留)
    pub fn classify(&self, reason: &str) -> PtoKind {
        let text = reason.to_lowercase();
        if contains_any(&text, &self.vacation_keywords) {
            PtoKind::Vacation
        } else if contains_any(&text, &self.holiday_keywords) {
            PtoKind::Holiday
        } else if contains_any(&text, &self.sick_keywords) {
            PtoKind::Sick
        } else if contains_any(&text, &self.comp_keywords) {
            PtoKind::Comp
        } else {
            PtoKind::Other
        }
    }
}

impl Default for PtoVocabulary {
    fn default() -> Self {
        PtoVocabulary {
            vacation_keywords: Self::default_vacation(),
            holiday_keywords: Self::default_holiday(),
            sick_keywords: Self::default_sick(),
            comp_keywords: Self::default_comp(),
        }
    }
}

// ==========================================
// RosterConfig - 解析配置全集
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// 警衔词表
    #[serde(default)]
    pub rank_vocab: RankVocabulary,

    /// 休假事由词表
    #[serde(default)]
    pub pto_vocab: PtoVocabulary,

    /// 特勤岗位关键词（岗位目录未收录时的兜底启发）
    #[serde(default = "RosterConfig::default_special_keywords")]
    pub special_keywords: Vec<String>,

    /// 搭班标记（命中即特勤, 优先于岗位目录）
    #[serde(default = "RosterConfig::default_partnership_markers")]
    pub partnership_markers: Vec<String>,
}

impl RosterConfig {
    fn default_special_keywords() -> Vec<String> {
        vec![
            "special".to_string(),
            "training".to_string(),
            "detail".to_string(),
            "court".to_string(),
            "extra".to_string(),
            "other".to_string(),
        ]
    }

    fn default_partnership_markers() -> Vec<String> {
        vec!["partner with".to_string(), "partners with".to_string()]
    }

    /// 从 JSON 配置文件加载（字段缺省沿用默认词表）
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RosterConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        RosterConfig {
            rank_vocab: RankVocabulary::default(),
            pto_vocab: PtoVocabulary::default(),
            special_keywords: Self::default_special_keywords(),
            partnership_markers: Self::default_partnership_markers(),
        }
    }
}

fn contains_any(text_lower: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| !k.is_empty() && text_lower.contains(&k.to_lowercase()))
}
