// ==========================================
// 警务排班系统 - 警力核定引擎
// ==========================================
// 职责: 逐日清点在岗警力并对照最低配置
// 输入: 合并后的日勤务 + 警员花名册类别 + 最低警力配置
// 输出: StaffingVerdict (单日核定结论)
// ==========================================
// 红线: 休假/特勤/不在岗不计入; 加班计入 (人确实在岗)
// 红线: 试用期警员单独计数, 不满足任何最低要求
// 红线: 无配置行按最低 0 处理并置缺配标记, 不报错
// ==========================================

use crate::domain::assignment::ResolvedDay;
use crate::domain::staffing::{StaffingRequirement, StaffingVerdict};
use crate::domain::types::{weekday_index, RosterClass};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// StaffingEvaluator - 警力核定引擎
// ==========================================
pub struct StaffingEvaluator {
    // 无状态引擎, 不需要注入依赖
}

impl StaffingEvaluator {
    pub fn new() -> Self {
        Self {}
    }

    /// 批量核定日期区间
    ///
    /// # 参数
    /// - days: 合并引擎输出 (日期升序)
    /// - roster_classes: 警员 -> 花名册类别
    /// - requirements: 该班次的最低警力配置 (按星期)
    ///
    /// # 返回
    /// 与 days 一一对应的核定结论 (日期升序)
    pub fn evaluate_range(
        &self,
        days: &[ResolvedDay],
        roster_classes: &HashMap<String, RosterClass>,
        requirements: &[StaffingRequirement],
    ) -> Vec<StaffingVerdict> {
        let by_weekday: HashMap<u8, &StaffingRequirement> = requirements
            .iter()
            .map(|req| (req.day_of_week, req))
            .collect();

        days.iter()
            .map(|day| {
                let requirement = by_weekday.get(&weekday_index(day.date)).copied();
                self.evaluate(day, roster_classes, requirement)
            })
            .collect()
    }

    /// 核定单日警力
    pub fn evaluate(
        &self,
        day: &ResolvedDay,
        roster_classes: &HashMap<String, RosterClass>,
        requirement: Option<&StaffingRequirement>,
    ) -> StaffingVerdict {
        // 1. 清点在岗警力
        let (supervisor_count, officer_count, probationary_count) =
            self.count_coverage(day, roster_classes);

        // 2. 取最低要求
        let (min_supervisors, min_officers, requirement_missing) = match requirement {
            Some(req) => (req.min_supervisors, req.min_officers, false),
            None => {
                debug!(date = %day.date, "该 (班次, 星期) 无最低警力配置, 按 0 处理");
                (0, 0, true)
            }
        };

        // 3. 对照结论
        let meets_supervisors = supervisor_count >= min_supervisors;
        let meets_officers = officer_count >= min_officers;

        StaffingVerdict {
            date: day.date,
            supervisor_count,
            officer_count,
            probationary_count,
            min_supervisors,
            min_officers,
            requirement_missing,
            meets_supervisors,
            meets_officers,
            understaffed: !(meets_supervisors && meets_officers),
        }
    }

    /// 清点单日在岗警力 (主管数, 普通警员数, 试用期警员数)
    ///
    /// # 规则
    /// - 只清点计入警力的勤务 (counts_toward_coverage)
    /// - 类别查不到的警员按普通警员计 (档案缺失已由占位档案兜底)
    fn count_coverage(
        &self,
        day: &ResolvedDay,
        roster_classes: &HashMap<String, RosterClass>,
    ) -> (u32, u32, u32) {
        let mut supervisors = 0u32;
        let mut officers = 0u32;
        let mut probationary = 0u32;

        for assignment in &day.assignments {
            if !assignment.counts_toward_coverage() {
                continue;
            }
            let class = roster_classes
                .get(&assignment.officer_id)
                .copied()
                .unwrap_or(RosterClass::Regular);
            match class {
                RosterClass::Supervisor => supervisors += 1,
                RosterClass::Regular => officers += 1,
                RosterClass::Probationary => probationary += 1,
            }
        }

        (supervisors, officers, probationary)
    }
}

impl Default for StaffingEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
