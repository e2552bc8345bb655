// ==========================================
// 警务排班系统 - 勤务分类引擎
// ==========================================
// 职责: 为每条日勤务判定分类 (休假/加班/特勤/常规) 与休假类别
// 红线: 固定顺序首条命中即定: TIME_OFF -> OVERTIME -> SPECIAL -> REGULAR
// 红线: is_off 无事由是数据异常, 按常规勤务处理并打异常标记, 不按休假
// ==========================================

use crate::config::RosterConfig;
use crate::domain::assignment::{DailyAssignment, RecurringAssignment};
use crate::domain::types::{AssignmentKind, PositionCategory, PositionRecord, PtoKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// is_off 无事由的异常标记
pub const ANOMALY_OFF_NO_REASON: &str = "OFF_NO_REASON";

/// is_off 无事由时的岗位展示文本
pub const OFF_UNSPECIFIED_POSITION: &str = "Off, unspecified";

// ==========================================
// Classification - 单条勤务的分类结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: AssignmentKind,
    pub pto_kind: Option<PtoKind>,
    pub anomaly: Option<String>,
    /// 分类引擎要求覆写的岗位展示文本 (仅数据异常场景)
    pub position_display: Option<String>,
}

// ==========================================
// AssignmentClassifier - 分类引擎
// ==========================================
pub struct AssignmentClassifier {
    config: Arc<RosterConfig>,
    /// 岗位目录: 小写岗位名 -> 类别标注
    catalog: HashMap<String, PositionCategory>,
}

impl AssignmentClassifier {
    pub fn new(config: Arc<RosterConfig>, catalog_rows: &[PositionRecord]) -> Self {
        let catalog = catalog_rows
            .iter()
            .map(|rec| (rec.position_name.trim().to_lowercase(), rec.category))
            .collect();
        Self { config, catalog }
    }

    /// 跨班次周常排班 -> 每位警员的主班次
    ///
    /// # 规则
    /// - 主班次 = 该警员周常排班条数最多的班次 (众数)
    /// - 条数并列时取字典序最小的班次 (确定性)
    /// - 无任何周常排班的警员不在结果中 (主班次未定义)
    pub fn primary_shifts(rows: &[RecurringAssignment]) -> HashMap<String, String> {
        let mut counts: HashMap<&str, HashMap<&str, usize>> = HashMap::new();
        for row in rows {
            *counts
                .entry(row.officer_id.as_str())
                .or_default()
                .entry(row.shift_id.as_str())
                .or_insert(0) += 1;
        }

        counts
            .into_iter()
            .filter_map(|(officer_id, per_shift)| {
                per_shift
                    .into_iter()
                    .fold(None::<(&str, usize)>, |best, (shift, n)| match best {
                        None => Some((shift, n)),
                        Some((best_shift, best_n)) => {
                            if n > best_n || (n == best_n && shift < best_shift) {
                                Some((shift, n))
                            } else {
                                Some((best_shift, best_n))
                            }
                        }
                    })
                    .map(|(shift, _)| (officer_id.to_string(), shift.to_string()))
            })
            .collect()
    }

    /// 分类单条日勤务
    ///
    /// # 规则 (首条命中即定)
    /// 1. TIME_OFF: is_off 且事由非空; 事由再按词表细分休假类别
    /// 2. OVERTIME: 勤务班次 != 警员主班次 (无主班次的警员本条不适用)
    /// 3. SPECIAL_ASSIGNMENT: 见 is_special_position
    /// 4. REGULAR: 其余全部
    ///
    /// # 异常
    /// - is_off 且事由为空: 按 REGULAR 处理, 岗位展示 "Off, unspecified",
    ///   打 OFF_NO_REASON 标记并告警; is_off 保持 true, 警力核定照常剔除
    pub fn classify(
        &self,
        assignment: &DailyAssignment,
        primary_shift: Option<&str>,
    ) -> Classification {
        // 规则 1: 休假
        if assignment.is_off {
            match assignment.off_reason.as_deref() {
                Some(reason) if !reason.trim().is_empty() => {
                    return Classification {
                        kind: AssignmentKind::TimeOff,
                        pto_kind: Some(self.config.pto_vocab.classify(reason)),
                        anomaly: None,
                        position_display: None,
                    };
                }
                _ => {
                    warn!(
                        officer_id = %assignment.officer_id,
                        date = %assignment.date,
                        "例外标记不在岗但未填事由, 按常规勤务处理并打异常标记"
                    );
                    return Classification {
                        kind: AssignmentKind::Regular,
                        pto_kind: None,
                        anomaly: Some(ANOMALY_OFF_NO_REASON.to_string()),
                        position_display: Some(OFF_UNSPECIFIED_POSITION.to_string()),
                    };
                }
            }
        }

        // 规则 2: 加班 (非本人主班次)
        if let Some(primary) = primary_shift {
            if primary != assignment.shift_id {
                return Classification {
                    kind: AssignmentKind::Overtime,
                    pto_kind: None,
                    anomaly: None,
                    position_display: None,
                };
            }
        }

        // 规则 3: 特勤
        if self.is_special_position(&assignment.position) {
            return Classification {
                kind: AssignmentKind::SpecialAssignment,
                pto_kind: None,
                anomaly: None,
                position_display: None,
            };
        }

        // 规则 4: 常规
        Classification {
            kind: AssignmentKind::Regular,
            pto_kind: None,
            anomaly: None,
            position_display: None,
        }
    }

    /// 分类并回填日勤务
    pub fn apply(&self, assignment: &mut DailyAssignment, primary_shift: Option<&str>) {
        let result = self.classify(assignment, primary_shift);
        assignment.kind = result.kind;
        assignment.pto_kind = result.pto_kind;
        assignment.anomaly = result.anomaly;
        if let Some(display) = result.position_display {
            assignment.position = display;
        }
    }

    /// 岗位是否属于特勤
    ///
    /// # 规则
    /// 1. 岗位文本含搭班标记 -> 特勤 (即使岗位名本身平常)
    /// 2. 岗位目录收录 -> 按目录标注 (标注 REGULAR 的岗位不再走关键词)
    /// 3. 目录非空但未收录 -> 特勤 (词表外岗位)
    /// 4. 目录为空 (尚未配置) -> 退回关键词启发式
    /// 5. 岗位文本为空 -> 非特勤 (数据缺口, 不构成特勤信号)
    pub fn is_special_position(&self, position: &str) -> bool {
        let text = position.trim().to_lowercase();
        if text.is_empty() {
            return false;
        }

        if self
            .config
            .partnership_markers
            .iter()
            .any(|m| !m.is_empty() && text.contains(&m.to_lowercase()))
        {
            return true;
        }

        if !self.catalog.is_empty() {
            return match self.catalog.get(&text) {
                Some(PositionCategory::Special) => true,
                Some(PositionCategory::Regular) => false,
                None => true, // 词表外岗位一律特勤
            };
        }

        self.config
            .special_keywords
            .iter()
            .any(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::AssignmentSource;
    use chrono::NaiveDate;

    fn create_test_assignment(officer_id: &str, shift_id: &str, position: &str) -> DailyAssignment {
        DailyAssignment {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            officer_id: officer_id.to_string(),
            display_name: String::new(),
            shift_id: shift_id.to_string(),
            position: position.to_string(),
            unit: None,
            start_time: None,
            end_time: None,
            kind: AssignmentKind::Regular,
            source: AssignmentSource::Recurring,
            is_off: false,
            off_reason: None,
            pto_kind: None,
            anomaly: None,
        }
    }

    fn create_classifier(catalog: &[(&str, PositionCategory)]) -> AssignmentClassifier {
        let rows: Vec<PositionRecord> = catalog
            .iter()
            .map(|(name, cat)| PositionRecord {
                position_name: name.to_string(),
                category: *cat,
            })
            .collect();
        AssignmentClassifier::new(Arc::new(RosterConfig::default()), &rows)
    }

    fn create_test_recurring(officer_id: &str, shift_id: &str, dow: u8) -> RecurringAssignment {
        RecurringAssignment {
            id: format!("{}-{}-{}", officer_id, shift_id, dow),
            officer_id: officer_id.to_string(),
            shift_id: shift_id.to_string(),
            day_of_week: dow,
            position: "Patrol".to_string(),
            unit: None,
            end_date: None,
        }
    }

    #[test]
    fn test_time_off_with_reason() {
        let classifier = create_classifier(&[]);
        let mut a = create_test_assignment("o1", "SHIFT_A", "Patrol");
        a.is_off = true;
        a.off_reason = Some("Vacation".to_string());

        let c = classifier.classify(&a, Some("SHIFT_A"));
        assert_eq!(c.kind, AssignmentKind::TimeOff);
        assert_eq!(c.pto_kind, Some(PtoKind::Vacation));
        assert!(c.anomaly.is_none());
    }

    #[test]
    fn test_time_off_beats_overtime() {
        // 休假优先于加班: 即使班次不是主班次
        let classifier = create_classifier(&[]);
        let mut a = create_test_assignment("o1", "SHIFT_A", "Patrol");
        a.is_off = true;
        a.off_reason = Some("Sick".to_string());

        let c = classifier.classify(&a, Some("SHIFT_B"));
        assert_eq!(c.kind, AssignmentKind::TimeOff);
        assert_eq!(c.pto_kind, Some(PtoKind::Sick));
    }

    #[test]
    fn test_off_without_reason_is_anomaly() {
        let classifier = create_classifier(&[]);
        let mut a = create_test_assignment("o1", "SHIFT_A", "Patrol");
        a.is_off = true;
        a.off_reason = Some("   ".to_string()); // 空白事由等同缺失

        let c = classifier.classify(&a, Some("SHIFT_A"));
        assert_eq!(c.kind, AssignmentKind::Regular);
        assert_eq!(c.anomaly.as_deref(), Some(ANOMALY_OFF_NO_REASON));
        assert_eq!(c.position_display.as_deref(), Some(OFF_UNSPECIFIED_POSITION));
        assert!(c.pto_kind.is_none());
    }

    #[test]
    fn test_overtime_when_shift_differs() {
        let classifier = create_classifier(&[]);
        let a = create_test_assignment("o1", "SHIFT_A", "Patrol");

        let c = classifier.classify(&a, Some("SHIFT_B"));
        assert_eq!(c.kind, AssignmentKind::Overtime);
    }

    #[test]
    fn test_no_primary_shift_not_overtime() {
        // 无主班次的警员 (纯例外上岗) 不按加班
        let classifier = create_classifier(&[]);
        let a = create_test_assignment("o1", "SHIFT_A", "Patrol");

        let c = classifier.classify(&a, None);
        assert_eq!(c.kind, AssignmentKind::Regular);
    }

    #[test]
    fn test_overtime_beats_special() {
        // 分类顺序: 加班在特勤之前
        let classifier = create_classifier(&[]);
        let a = create_test_assignment("o1", "SHIFT_A", "Training Day");

        let c = classifier.classify(&a, Some("SHIFT_B"));
        assert_eq!(c.kind, AssignmentKind::Overtime);
    }

    #[test]
    fn test_partnership_always_special() {
        // 搭班标记优先于目录标注
        let classifier = create_classifier(&[("partner with smith", PositionCategory::Regular)]);
        let a = create_test_assignment("o1", "SHIFT_A", "Partner with Smith");

        let c = classifier.classify(&a, Some("SHIFT_A"));
        assert_eq!(c.kind, AssignmentKind::SpecialAssignment);
    }

    #[test]
    fn test_catalog_tag_decides() {
        let classifier = create_classifier(&[
            ("patrol", PositionCategory::Regular),
            ("court detail", PositionCategory::Special),
        ]);

        let a = create_test_assignment("o1", "SHIFT_A", "Court Detail");
        assert_eq!(
            classifier.classify(&a, Some("SHIFT_A")).kind,
            AssignmentKind::SpecialAssignment
        );

        let b = create_test_assignment("o1", "SHIFT_A", "Patrol");
        assert_eq!(
            classifier.classify(&b, Some("SHIFT_A")).kind,
            AssignmentKind::Regular
        );
    }

    #[test]
    fn test_catalog_regular_tag_beats_keyword() {
        // 目录标注 REGULAR 的岗位即使名字命中关键词也不算特勤
        let classifier = create_classifier(&[("training patrol", PositionCategory::Regular)]);
        let a = create_test_assignment("o1", "SHIFT_A", "Training Patrol");

        assert_eq!(
            classifier.classify(&a, Some("SHIFT_A")).kind,
            AssignmentKind::Regular
        );
    }

    #[test]
    fn test_uncatalogued_position_is_special() {
        // 目录非空时, 词表外岗位一律特勤
        let classifier = create_classifier(&[("patrol", PositionCategory::Regular)]);
        let a = create_test_assignment("o1", "SHIFT_A", "Desk Duty");

        assert_eq!(
            classifier.classify(&a, Some("SHIFT_A")).kind,
            AssignmentKind::SpecialAssignment
        );
    }

    #[test]
    fn test_empty_catalog_falls_back_to_keywords() {
        let classifier = create_classifier(&[]);

        let special = create_test_assignment("o1", "SHIFT_A", "Firearms Training");
        assert_eq!(
            classifier.classify(&special, Some("SHIFT_A")).kind,
            AssignmentKind::SpecialAssignment
        );

        let regular = create_test_assignment("o1", "SHIFT_A", "Patrol");
        assert_eq!(
            classifier.classify(&regular, Some("SHIFT_A")).kind,
            AssignmentKind::Regular
        );
    }

    #[test]
    fn test_blank_position_is_regular() {
        let classifier = create_classifier(&[("patrol", PositionCategory::Regular)]);
        let a = create_test_assignment("o1", "SHIFT_A", "  ");

        assert_eq!(
            classifier.classify(&a, Some("SHIFT_A")).kind,
            AssignmentKind::Regular
        );
    }

    #[test]
    fn test_primary_shift_mode() {
        let rows = vec![
            create_test_recurring("o1", "SHIFT_A", 1),
            create_test_recurring("o1", "SHIFT_A", 2),
            create_test_recurring("o1", "SHIFT_A", 3),
            create_test_recurring("o1", "SHIFT_B", 4),
            create_test_recurring("o2", "SHIFT_B", 1),
        ];

        let primary = AssignmentClassifier::primary_shifts(&rows);
        assert_eq!(primary.get("o1").map(String::as_str), Some("SHIFT_A"));
        assert_eq!(primary.get("o2").map(String::as_str), Some("SHIFT_B"));
        assert!(primary.get("o3").is_none()); // 无周常 -> 主班次未定义
    }

    #[test]
    fn test_primary_shift_tie_breaks_to_smallest_id() {
        let rows = vec![
            create_test_recurring("o1", "SHIFT_B", 1),
            create_test_recurring("o1", "SHIFT_B", 2),
            create_test_recurring("o1", "SHIFT_A", 3),
            create_test_recurring("o1", "SHIFT_A", 4),
        ];

        let primary = AssignmentClassifier::primary_shifts(&rows);
        assert_eq!(primary.get("o1").map(String::as_str), Some("SHIFT_A"));
    }

    #[test]
    fn test_apply_backfills_assignment() {
        let classifier = create_classifier(&[]);
        let mut a = create_test_assignment("o1", "SHIFT_A", "Patrol");
        a.is_off = true;
        a.off_reason = None;

        classifier.apply(&mut a, Some("SHIFT_A"));
        assert_eq!(a.kind, AssignmentKind::Regular);
        assert_eq!(a.position, OFF_UNSPECIFIED_POSITION);
        assert_eq!(a.anomaly.as_deref(), Some(ANOMALY_OFF_NO_REASON));
        assert!(a.is_off); // 标记保持, 警力核定仍剔除
    }
}
