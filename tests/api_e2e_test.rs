// ==========================================
// RosterApi 端到端测试
// ==========================================
// 测试目标: 种子库 -> RosterApi 解析 + 缓存 + 四类投影
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use std::sync::Arc;

use chrono::NaiveDate;
use patrol_roster::api::{ApiError, ResolutionKey, RosterApi};
use patrol_roster::config::RosterConfig;
use patrol_roster::domain::types::{AssignmentKind, PtoKind, RosterClass};
use patrol_roster::logging;
use patrol_roster::repository::SqliteRosterStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 3, 1)
}

/// 种子场景: 周二白班满编 (主管 2 / 警员 3), 周三一名警员病假
///
/// - o-lt: 警督, o-sgt: 警司 -> 周二主管恰好 2 人
/// - o-a / o-b: 外部折算年资同为 5.0, 警号 "900" 与 "N/A" -> 警号定序
/// - o-r3: 资深警员, 周三病假
fn seed_scenario(db_path: &str) {
    let conn = test_helpers::open_test_connection(db_path).expect("Failed to open db");

    test_helpers::insert_test_officer(
        &conn, "o-lt", "501", "Carl", "Monroe", "Lieutenant", Some("2005-06-01"),
    )
    .unwrap();
    test_helpers::set_officer_seniority_fields(
        &conn, "o-lt", Some("2011-03-01"), Some("2015-04-01"), None, None,
    )
    .unwrap();

    test_helpers::insert_test_officer(
        &conn, "o-sgt", "510", "Irene", "Vega", "Sergeant", Some("2010-09-15"),
    )
    .unwrap();
    test_helpers::set_officer_seniority_fields(&conn, "o-sgt", Some("2018-02-01"), None, None, None)
        .unwrap();

    // 同年资, 警号可解析
    test_helpers::insert_test_officer(
        &conn, "o-a", "900", "Alan", "Zimmer", "Officer", Some("2020-01-01"),
    )
    .unwrap();
    test_helpers::set_officer_seniority_fields(&conn, "o-a", None, None, None, Some(5.0)).unwrap();

    // 同年资, 警号不可解析 -> 排同级末尾 (即使姓氏字母序更靠前)
    test_helpers::insert_test_officer(
        &conn, "o-b", "N/A", "Beth", "Abbott", "Officer", Some("2020-01-01"),
    )
    .unwrap();
    test_helpers::set_officer_seniority_fields(&conn, "o-b", None, None, None, Some(5.0)).unwrap();

    test_helpers::insert_test_officer(
        &conn, "o-r3", "618", "Norma", "Ellis", "Officer", Some("2012-03-10"),
    )
    .unwrap();

    // 周二 (dow=2) 全员在岗
    test_helpers::insert_test_recurring(&conn, "ra-lt-2", "o-lt", "DAY", 2, "Station Supervisor", None).unwrap();
    test_helpers::insert_test_recurring(&conn, "ra-sgt-2", "o-sgt", "DAY", 2, "District Supervisor", None).unwrap();
    test_helpers::insert_test_recurring(&conn, "ra-a-2", "o-a", "DAY", 2, "District 1", None).unwrap();
    test_helpers::insert_test_recurring(&conn, "ra-b-2", "o-b", "DAY", 2, "District 2", None).unwrap();
    test_helpers::insert_test_recurring(&conn, "ra-r3-2", "o-r3", "DAY", 2, "District 3", None).unwrap();
    // 周三 o-r3 常规排班 + 病假例外
    test_helpers::insert_test_recurring(&conn, "ra-r3-3", "o-r3", "DAY", 3, "District 3", None).unwrap();
    test_helpers::insert_test_exception(
        &conn, "e-sick", "o-r3", "DAY", "2026-03-04", "", true, Some("Sick"),
        "2026-02-20 09:00:00",
    )
    .unwrap();

    // 周二最低警力: 主管 2 / 警员 3
    test_helpers::insert_test_requirement(&conn, "DAY", 2, 3, 2).unwrap();
}

fn create_test_api(db_path: &str) -> RosterApi {
    let store = SqliteRosterStore::new(db_path).expect("Failed to create store");
    RosterApi::new(Arc::new(store), Arc::new(RosterConfig::default()))
}

#[tokio::test]
async fn test_mixed_rank_supervisors_fill_tuesday_minimum() {
    logging::init_test();

    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    seed_scenario(&db_path);

    let api = create_test_api(&db_path);
    let schedule = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), today())
        .await
        .unwrap();

    // 警司 + 警督合计 2 人, 恰好满足周二主管下限
    let tuesday = schedule.verdict(date(2026, 3, 3)).unwrap();
    assert_eq!(tuesday.supervisor_count, 2);
    assert!(tuesday.meets_supervisors);
    assert_eq!(tuesday.officer_count, 3);
    assert!(!tuesday.understaffed);
}

#[tokio::test]
async fn test_supervisor_vacation_flips_day_understaffed() {
    logging::init_test();

    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    seed_scenario(&db_path);

    // 在种子之上追加: 警司周二休年假
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");
    test_helpers::insert_test_exception(
        &conn, "e-sgt-vac", "o-sgt", "DAY", "2026-03-03", "", true, Some("Vacation"),
        "2026-02-22 09:00:00",
    )
    .unwrap();
    drop(conn);

    let api = create_test_api(&db_path);
    let schedule = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), today())
        .await
        .unwrap();
    let key = ResolutionKey::new("DAY", date(2026, 3, 2), date(2026, 3, 8));

    // 主管从 2 降到 1, 低于下限 -> 缺口
    let tuesday = schedule.verdict(date(2026, 3, 3)).unwrap();
    assert_eq!(tuesday.supervisor_count, 1);
    assert!(!tuesday.meets_supervisors);
    assert!(tuesday.understaffed);

    // 休假台账多出警司一行
    let vacations = api.vacation_list(&key).unwrap();
    assert_eq!(vacations.len(), 2);
    let sgt_row = vacations.iter().find(|r| r.officer_id == "o-sgt").unwrap();
    assert_eq!(sgt_row.date, date(2026, 3, 3));
    assert_eq!(sgt_row.pto_kind, Some(PtoKind::Vacation));
}

#[tokio::test]
async fn test_overtime_pickup_backfills_vacancy() {
    logging::init_test();

    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    seed_scenario(&db_path);

    // 在种子之上追加: o-a 周二休假, 夜班警员白班顶班
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");
    test_helpers::insert_test_exception(
        &conn, "e-a-vac", "o-a", "DAY", "2026-03-03", "", true, Some("Vacation"),
        "2026-02-22 08:00:00",
    )
    .unwrap();
    test_helpers::insert_test_officer(
        &conn, "o-n", "720", "Sam", "Quist", "Officer", Some("2018-06-01"),
    )
    .unwrap();
    test_helpers::insert_test_recurring(&conn, "ra-n-2", "o-n", "NIGHT", 2, "District 7", None)
        .unwrap();
    test_helpers::insert_test_exception(
        &conn, "e-n-ot", "o-n", "DAY", "2026-03-03", "District 1", false, None,
        "2026-02-22 10:00:00",
    )
    .unwrap();
    drop(conn);

    let api = create_test_api(&db_path);
    let schedule = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), today())
        .await
        .unwrap();
    let key = ResolutionKey::new("DAY", date(2026, 3, 2), date(2026, 3, 8));

    // 顶班行分类为加班 (主班次为夜班)
    let roster = api.day_roster(&key, date(2026, 3, 3)).unwrap();
    let pickup = roster.rows.iter().find(|r| r.officer_id == "o-n").unwrap();
    assert_eq!(pickup.kind, AssignmentKind::Overtime);

    // 加班计入在岗: 休假空缺被顶班补齐, 周二仍然达标
    let tuesday = schedule.verdict(date(2026, 3, 3)).unwrap();
    assert_eq!(tuesday.officer_count, 3);
    assert!(tuesday.meets_officers);
    assert!(!tuesday.understaffed);
}

#[tokio::test]
async fn test_partnership_detail_on_roster_but_not_coverage() {
    logging::init_test();

    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    seed_scenario(&db_path);

    // 在种子之上追加: o-b 周二改为搭班特勤
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");
    test_helpers::insert_test_exception(
        &conn, "e-b-pair", "o-b", "DAY", "2026-03-03", "Partner with Zimmer", false, None,
        "2026-02-22 11:00:00",
    )
    .unwrap();
    drop(conn);

    let api = create_test_api(&db_path);
    let schedule = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), today())
        .await
        .unwrap();
    let key = ResolutionKey::new("DAY", date(2026, 3, 2), date(2026, 3, 8));

    // 搭班行在名册上, 分类为特勤
    let roster = api.day_roster(&key, date(2026, 3, 3)).unwrap();
    let pair = roster.rows.iter().find(|r| r.officer_id == "o-b").unwrap();
    assert_eq!(pair.kind, AssignmentKind::SpecialAssignment);
    assert_eq!(pair.position, "Partner with Zimmer");
    assert!(!pair.is_off);

    // 特勤不计入在岗 -> 警员 2/3, 周二转为缺口
    let tuesday = schedule.verdict(date(2026, 3, 3)).unwrap();
    assert_eq!(tuesday.officer_count, 2);
    assert!(!tuesday.meets_officers);
    assert!(tuesday.understaffed);
}

#[tokio::test]
async fn test_unparsable_badge_sorts_last_among_equals() {
    logging::init_test();

    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    seed_scenario(&db_path);

    let api = create_test_api(&db_path);
    api.resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), today())
        .await
        .unwrap();
    let key = ResolutionKey::new("DAY", date(2026, 3, 2), date(2026, 3, 8));

    let rows = api.force_list(&key).unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.officer_id.as_str()).collect();

    // 主管 (警督先于警司) -> 资深警员 -> 同年资两人按警号 -> 警号不可解析者垫底
    assert_eq!(ids, vec!["o-lt", "o-sgt", "o-r3", "o-a", "o-b"]);

    // 顺位号从 1 连续编到队尾
    let orders: Vec<u32> = rows.iter().map(|r| r.rank_order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5]);

    // 类别标注正确
    assert_eq!(rows[0].roster_class, RosterClass::Supervisor);
    assert_eq!(rows[4].roster_class, RosterClass::Regular);
}

#[tokio::test]
async fn test_day_roster_projection() {
    logging::init_test();

    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    seed_scenario(&db_path);

    let api = create_test_api(&db_path);
    api.resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), today())
        .await
        .unwrap();
    let key = ResolutionKey::new("DAY", date(2026, 3, 2), date(2026, 3, 8));

    let roster = api.day_roster(&key, date(2026, 3, 3)).unwrap();

    // 行序即花名册序
    let ids: Vec<&str> = roster.rows.iter().map(|r| r.officer_id.as_str()).collect();
    assert_eq!(ids, vec!["o-lt", "o-sgt", "o-r3", "o-a", "o-b"]);
    assert!(roster.rows.iter().all(|r| r.is_regular_recurring_day));
    assert!(roster.staffing.is_some());

    // 周三: 病假行在案, 照常入名册但标记休假
    let wednesday = api.day_roster(&key, date(2026, 3, 4)).unwrap();
    assert_eq!(wednesday.rows.len(), 1);
    let sick = &wednesday.rows[0];
    assert_eq!(sick.officer_id, "o-r3");
    assert_eq!(sick.kind, AssignmentKind::TimeOff);
    assert!(sick.is_off);
    assert!(!sick.is_regular_recurring_day);
}

#[tokio::test]
async fn test_vacation_list_projection() {
    logging::init_test();

    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    seed_scenario(&db_path);

    let api = create_test_api(&db_path);
    api.resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), today())
        .await
        .unwrap();
    let key = ResolutionKey::new("DAY", date(2026, 3, 2), date(2026, 3, 8));

    let rows = api.vacation_list(&key).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, date(2026, 3, 4));
    assert_eq!(rows[0].officer_id, "o-r3");
    assert_eq!(rows[0].display_name, "Ellis, Norma");
    assert_eq!(rows[0].pto_kind, Some(PtoKind::Sick));
    assert_eq!(rows[0].reason.as_deref(), Some("Sick"));
}

#[tokio::test]
async fn test_cache_hit_and_invalidate() {
    logging::init_test();

    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    seed_scenario(&db_path);

    let api = create_test_api(&db_path);

    // 同参数同基准日: 命中缓存, 返回同一份结果
    let first = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), today())
        .await
        .unwrap();
    let second = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), today())
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // 参数不同: 互不可见
    let narrower = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 3), today())
        .await
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &narrower));
    assert_eq!(narrower.days.len(), 2);

    // 基准日跨天: 陈旧结果不再使用
    let next_day = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), date(2026, 3, 2))
        .await
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &next_day));
    assert_eq!(next_day.resolved_on, date(2026, 3, 2));

    // 主动失效: 强制重算
    api.invalidate().unwrap();
    let third = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 2), date(2026, 3, 8), date(2026, 3, 2))
        .await
        .unwrap();
    assert!(!Arc::ptr_eq(&next_day, &third));
}

#[tokio::test]
async fn test_resolve_rejects_bad_input() {
    logging::init_test();

    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    seed_scenario(&db_path);

    let api = create_test_api(&db_path);

    let blank = api
        .resolve_schedule_as_of("", date(2026, 3, 2), date(2026, 3, 8), today())
        .await;
    assert!(matches!(blank, Err(ApiError::InvalidInput(_))));

    let reversed = api
        .resolve_schedule_as_of("DAY", date(2026, 3, 8), date(2026, 3, 2), today())
        .await;
    assert!(matches!(reversed, Err(ApiError::InvalidInput(_))));
}
