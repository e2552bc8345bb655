// ==========================================
// 警务排班系统 - 年资评分引擎
// ==========================================
// 红线: 单警员取数失败只降级为 0.0 并告警, 不得拖垮整批解析
// 红线: 人工覆盖值原样返回, 推算值保留 1 位小数且不为负
// ==========================================

use crate::config::RosterConfig;
use crate::domain::officer::SeniorityInput;
use crate::domain::types::Rank;
use crate::repository::RosterStore;
use chrono::{Datelike, Days, NaiveDate};
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

// ==========================================
// SeniorityResolver - 年资评分引擎
// ==========================================
// 用途: 批量计算警员年资评分 (排序与加班顺位依据)
pub struct SeniorityResolver {
    store: Arc<dyn RosterStore>,
    config: Arc<RosterConfig>,
}

impl SeniorityResolver {
    pub fn new(store: Arc<dyn RosterStore>, config: Arc<RosterConfig>) -> Self {
        SeniorityResolver { store, config }
    }

    /// 批量解析年资评分
    ///
    /// # 流程
    /// 1. 警员标识去重 (同一警员只取数一次)
    /// 2. 并发扇出单警员查询
    /// 3. 单人失败降级为 0.0 并告警, 其余警员不受影响
    pub async fn resolve(
        &self,
        officer_ids: &[String],
        today: NaiveDate,
    ) -> HashMap<String, f64> {
        let distinct: BTreeSet<&String> = officer_ids.iter().collect();
        if distinct.is_empty() {
            return HashMap::new();
        }

        let futures: Vec<_> = distinct
            .iter()
            .map(|officer_id| self.store.fetch_seniority_inputs(officer_id))
            .collect();
        let results = join_all(futures).await;

        let mut scores = HashMap::with_capacity(distinct.len());
        for (officer_id, result) in distinct.into_iter().zip(results) {
            let score = match result {
                Ok(input) => {
                    let rank = self
                        .config
                        .rank_vocab
                        .classify(input.rank_text.as_deref().unwrap_or(""));
                    Self::score(&input, rank, today)
                }
                Err(e) => {
                    warn!(officer_id = %officer_id, error = %e, "年资取数失败, 降级为 0.0");
                    0.0
                }
            };
            scores.insert(officer_id.clone(), score);
        }

        debug!(officer_count = scores.len(), "年资评分完成");
        scores
    }

    /// 单警员年资评分
    ///
    /// # 取值优先级
    /// 1. 人工覆盖 > 0: 原样返回 (不舍入)
    /// 2. 外部折算年资: 负值钳为 0, 保留 1 位小数
    /// 3. 基准日推算: 整月数/12 + 余天数/365, 保留 1 位小数
    /// 4. 输入全缺失或基准日在未来: 0.0
    pub fn score(input: &SeniorityInput, rank: Rank, today: NaiveDate) -> f64 {
        if let Some(manual) = input.seniority_override {
            if manual > 0.0 {
                debug!(officer_id = %input.officer_id, score = manual, "年资采用人工覆盖值");
                return manual;
            }
        }

        if let Some(credit) = input.external_credit_years {
            let score = round_one_decimal(credit.max(0.0));
            debug!(officer_id = %input.officer_id, score, "年资采用外部折算值");
            return score;
        }

        match relevant_date(input, rank) {
            Some(from) if from <= today => round_one_decimal(fractional_years(from, today)),
            Some(from) => {
                warn!(officer_id = %input.officer_id, %from, "年资基准日在未来, 记 0.0");
                0.0
            }
            None => 0.0,
        }
    }
}

/// 年资基准日选取
///
/// 警长看晋升警长日期, 警督及以上看晋升警督日期, 其余看入职日期;
/// 对应晋升日期缺失时回退入职日期
fn relevant_date(input: &SeniorityInput, rank: Rank) -> Option<NaiveDate> {
    match rank {
        Rank::Sergeant => input.promotion_to_sergeant.or(input.hire_date),
        Rank::Lieutenant | Rank::Captain | Rank::Chief => {
            input.promotion_to_lieutenant.or(input.hire_date)
        }
        Rank::Officer | Rank::Probationary => input.hire_date,
    }
}

/// 日历年资: 整月数折算 (月数/12), 余下天数按 365 天折算
fn fractional_years(from: NaiveDate, to: NaiveDate) -> f64 {
    if to <= from {
        return 0.0;
    }

    let mut months =
        (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if months > 0 && add_months_clamped(from, months) > to {
        months -= 1;
    }
    let months = months.max(0);

    let anchor = add_months_clamped(from, months);
    let leftover_days = (to - anchor).num_days().max(0) as f64;

    months as f64 / 12.0 + leftover_days / 365.0
}

/// 按月推进日期, 目标月天数不足时钳到月末 (如 1/31 推 1 月 -> 2/28 或 2/29)
fn add_months_clamped(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month() as i32 - 1 + months;
    let year = total.div_euclid(12);
    let month = (total.rem_euclid(12) + 1) as u32;

    NaiveDate::from_ymd_opt(year, month, date.day())
        .or_else(|| {
            let next_month_first = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)
            };
            next_month_first.and_then(|d| d.checked_sub_days(Days::new(1)))
        })
        .unwrap_or(date)
}

/// 四舍五入保留 1 位小数
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
