// ==========================================
// 警务排班系统 - 警员归类排序引擎
// ==========================================
// 职责: 将警员划分为主管/普通/试用期三类, 类内按固定键排序
// 红线: 排序是全序, 相同输入必产出相同顺序 (officer_id 兜底定序)
// 红线: 加班顺位/名册展示共用同一顺序, 不得各排各的
// ==========================================

use crate::config::RosterConfig;
use crate::domain::officer::{CategorizedOfficer, Officer};
use crate::domain::types::RosterClass;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

// ==========================================
// CategorizedOfficers - 归类排序结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedOfficers {
    pub supervisors: Vec<CategorizedOfficer>,
    pub regular_officers: Vec<CategorizedOfficer>,
    pub probationary: Vec<CategorizedOfficer>,
}

impl CategorizedOfficers {
    /// 花名册总顺序: 主管 -> 普通 -> 试用期
    pub fn iter_ranked(&self) -> impl Iterator<Item = &CategorizedOfficer> {
        self.supervisors
            .iter()
            .chain(self.regular_officers.iter())
            .chain(self.probationary.iter())
    }

    /// 警员 -> 花名册类别 (警力核定的计数依据)
    pub fn roster_classes(&self) -> HashMap<String, RosterClass> {
        self.iter_ranked()
            .map(|c| (c.officer.officer_id.clone(), c.roster_class))
            .collect()
    }

    /// 按警员标识查归类行
    pub fn get(&self, officer_id: &str) -> Option<&CategorizedOfficer> {
        self.iter_ranked()
            .find(|c| c.officer.officer_id == officer_id)
    }

    pub fn len(&self) -> usize {
        self.supervisors.len() + self.regular_officers.len() + self.probationary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ==========================================
// OfficerCategorizer - 归类排序引擎
// ==========================================
pub struct OfficerCategorizer {
    config: Arc<RosterConfig>,
}

impl OfficerCategorizer {
    pub fn new(config: Arc<RosterConfig>) -> Self {
        Self { config }
    }

    /// 归类并排序
    ///
    /// # 规则
    /// - 衔级文本经词表归类, 衔级决定花名册类别 (警长及以上为主管)
    /// - 年资评分缺失按 0.0 处理 (年资引擎已兜底, 此处再兜一层)
    pub fn categorize(
        &self,
        officers: Vec<Officer>,
        seniority: &HashMap<String, f64>,
    ) -> CategorizedOfficers {
        let mut supervisors = Vec::new();
        let mut regular_officers = Vec::new();
        let mut probationary = Vec::new();

        for officer in officers {
            let rank = self.config.rank_vocab.classify(&officer.rank_text);
            let roster_class = rank.roster_class();
            let score = seniority.get(&officer.officer_id).copied().unwrap_or(0.0);
            let row = CategorizedOfficer {
                officer,
                rank,
                roster_class,
                seniority: score,
            };
            match roster_class {
                RosterClass::Supervisor => supervisors.push(row),
                RosterClass::Regular => regular_officers.push(row),
                RosterClass::Probationary => probationary.push(row),
            }
        }

        supervisors.sort_by(Self::compare_supervisors);
        regular_officers.sort_by(Self::compare_rank_and_file);
        probationary.sort_by(Self::compare_rank_and_file);

        debug!(
            supervisors = supervisors.len(),
            regular = regular_officers.len(),
            probationary = probationary.len(),
            "警员归类排序完成"
        );

        CategorizedOfficers {
            supervisors,
            regular_officers,
            probationary,
        }
    }

    /// 主管排序键:
    /// 1) 指挥链层级 (CHIEF -> CAPTAIN -> LIEUTENANT -> SERGEANT)
    /// 2) 年资降序
    /// 3) 姓氏升序 (不区分大小写)
    /// 4) officer_id 升序 (兜底全序)
    fn compare_supervisors(a: &CategorizedOfficer, b: &CategorizedOfficer) -> Ordering {
        let tier_a = a.rank.supervisor_tier().unwrap_or(u8::MAX);
        let tier_b = b.rank.supervisor_tier().unwrap_or(u8::MAX);
        match tier_a.cmp(&tier_b) {
            Ordering::Equal => {}
            other => return other,
        }

        match b.seniority.total_cmp(&a.seniority) {
            Ordering::Equal => {}
            other => return other,
        }

        let last_a = a.officer.last_name.to_lowercase();
        let last_b = b.officer.last_name.to_lowercase();
        match last_a.cmp(&last_b) {
            Ordering::Equal => {}
            other => return other,
        }

        a.officer.officer_id.cmp(&b.officer.officer_id)
    }

    /// 普通/试用期排序键:
    /// 1) 年资降序
    /// 2) 警号升序 (数字警号按值, 不可解析置后)
    /// 3) 姓氏升序 (不区分大小写)
    /// 4) officer_id 升序 (兜底全序)
    fn compare_rank_and_file(a: &CategorizedOfficer, b: &CategorizedOfficer) -> Ordering {
        match b.seniority.total_cmp(&a.seniority) {
            Ordering::Equal => {}
            other => return other,
        }

        match a.officer.badge_sort_key().cmp(&b.officer.badge_sort_key()) {
            Ordering::Equal => {}
            other => return other,
        }

        let last_a = a.officer.last_name.to_lowercase();
        let last_b = b.officer.last_name.to_lowercase();
        match last_a.cmp(&last_b) {
            Ordering::Equal => {}
            other => return other,
        }

        a.officer.officer_id.cmp(&b.officer.officer_id)
    }
}
