//! Store-level tests: submission rules, moderation, builds, import, and stats
//! read back through the repository traits.

use chrono::{TimeZone, Utc};
use rusqlite::params;

use motoengine_lib::analytics::Analytics;
use motoengine_lib::db;
use motoengine_lib::error::{Error, ValidationError};
use motoengine_lib::models::{
    BreakdownCategory, BuildInput, CoolingType, EngineInput, EngineStatus, MileageUnit,
    ReportInput, StrokeType, TopFailureReason, UsageStyle, UsageType,
};
use motoengine_lib::repository::{EngineRepository, ReportRepository};

fn report(user: &str, engine: &str, mileage: f64, cats: &[BreakdownCategory]) -> ReportInput {
    ReportInput {
        engine_id:            engine.to_string(),
        user_id:              user.to_string(),
        mileage,
        mileage_unit:         MileageUnit::Hours,
        usage_style:          UsageStyle::Casual,
        usage_type:           UsageType::Enduro,
        has_breakdowns:       !cats.is_empty(),
        breakdown_categories: cats.to_vec(),
        description:          String::new(),
        maintenance_rating:   4,
    }
}

fn engine_input(index: &str) -> EngineInput {
    EngineInput {
        name:        "Kayo 190".to_string(),
        index:       index.to_string(),
        brand:       "Generic China".to_string(),
        volume:      190,
        stroke:      StrokeType::FourStroke,
        cooling:     CoolingType::Oil,
        power:       18.0,
        torque:      15.0,
        valves:      2,
        timing_type: "SOHC".to_string(),
        fuel_system: "Carburetor".to_string(),
        description: String::new(),
    }
}

fn build_input(engine: &str) -> BuildInput {
    BuildInput {
        user_id:     "u1".to_string(),
        user_name:   "Rider".to_string(),
        name:        "Forest enduro".to_string(),
        engine_id:   engine.to_string(),
        frame:       "BSE".to_string(),
        carburetor:  "PZ30".to_string(),
        exhaust:     "stock".to_string(),
        gears:       "13/43".to_string(),
        description: String::new(),
        photos:      vec!["front.jpg".to_string(), "side.jpg".to_string()],
    }
}

#[test]
fn seeded_catalog_is_listed_with_default_index() {
    let conn = db::open_in_memory().unwrap();
    let engines = conn.list_active_engines().unwrap();
    assert!(!engines.is_empty());
    assert_eq!(engines[0].id, "yx140");
    for e in &engines {
        assert_eq!(e.status, EngineStatus::Approved);
        assert_eq!(e.reports_count, Some(0));
        assert_eq!(e.reliability_index, Some(75));
    }
}

#[test]
fn init_is_idempotent() {
    let conn = db::open_in_memory().unwrap();
    let before = db::list_active_engines(&conn).unwrap().len();
    db::init_db(&conn).unwrap();
    assert_eq!(db::list_active_engines(&conn).unwrap().len(), before);
}

#[test]
fn one_report_per_user_engine_and_day() {
    let conn = db::open_in_memory().unwrap();
    let morning = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2024, 6, 1, 22, 0, 0).unwrap();
    let next_day = Utc.with_ymd_and_hms(2024, 6, 2, 0, 30, 0).unwrap();

    db::submit_report_at(&conn, report("u1", "yx140", 50.0, &[]), morning).unwrap();

    let err = db::submit_report_at(&conn, report("u1", "yx140", 60.0, &[]), evening).unwrap_err();
    assert!(matches!(err, Error::DuplicateReport));

    // different engine, different user, next day: all fine
    db::submit_report_at(&conn, report("u1", "yx150", 60.0, &[]), evening).unwrap();
    db::submit_report_at(&conn, report("u2", "yx140", 60.0, &[]), evening).unwrap();
    db::submit_report_at(&conn, report("u1", "yx140", 70.0, &[]), next_day).unwrap();

    assert_eq!(conn.list_reports_for_engine("yx140").unwrap().len(), 3);
}

#[test]
fn report_for_unknown_engine_is_refused() {
    let conn = db::open_in_memory().unwrap();
    let err = db::submit_report(&conn, report("u1", "nope", 50.0, &[])).unwrap_err();
    assert!(matches!(err, Error::EngineNotFound(id) if id == "nope"));
}

#[test]
fn invalid_submission_is_refused_before_storage() {
    let conn = db::open_in_memory().unwrap();
    let mut input = report("u1", "yx140", 50.0, &[]);
    input.has_breakdowns = true;
    let err = conn.append_report(input).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::BreakdownsWithoutCategories)
    ));
    assert!(conn.list_all_reports().unwrap().is_empty());
}

#[test]
fn stored_report_reads_back_identically() {
    let conn = db::open_in_memory().unwrap();
    let stored = db::submit_report(
        &conn,
        report("u1", "zs190", 310.5, &[BreakdownCategory::Overheat, BreakdownCategory::Clutch]),
    )
    .unwrap();
    assert!(stored.id.starts_with("rep_"));

    let back = conn.list_reports_for_engine("zs190").unwrap();
    assert_eq!(back, vec![stored]);
}

#[test]
fn listed_engines_carry_derived_reliability() {
    let conn = db::open_in_memory().unwrap();
    db::submit_report(&conn, report("u1", "yx150", 20.0, &[BreakdownCategory::Timing])).unwrap();
    db::submit_report(&conn, report("u2", "yx150", 30.0, &[])).unwrap();

    let engine = conn.get_engine("yx150").unwrap().unwrap();
    assert_eq!(engine.reports_count, Some(2));
    // 100 - 0.5 * 50 + 2.5 = 77.5 -> 78
    assert_eq!(engine.reliability_index, Some(78));

    let listed = db::list_active_engines(&conn).unwrap();
    let yx150 = listed.iter().find(|e| e.id == "yx150").unwrap();
    assert_eq!(yx150.reliability_index, Some(78));
}

#[test]
fn contributed_engine_waits_for_moderation() {
    let conn = db::open_in_memory().unwrap();
    let engine = db::submit_engine(&conn, engine_input("K190"), "u9").unwrap();
    assert_eq!(engine.status, EngineStatus::Pending);
    assert_eq!(engine.author_id.as_deref(), Some("u9"));
    assert!(!db::list_active_engines(&conn).unwrap().iter().any(|e| e.id == engine.id));

    let pending = db::list_engines_by_status(&conn, EngineStatus::Pending).unwrap();
    assert_eq!(pending.len(), 1);

    assert!(db::moderate(&conn, &engine.id, EngineStatus::Approved, Some("looks good")).unwrap());
    let active = db::list_active_engines(&conn).unwrap();
    let approved = active.iter().find(|e| e.id == engine.id).unwrap();
    assert_eq!(approved.moderator_comment.as_deref(), Some("looks good"));

    assert!(!db::moderate(&conn, "missing", EngineStatus::Rejected, None).unwrap());
}

#[test]
fn moderation_without_comment_keeps_previous_comment() {
    let conn = db::open_in_memory().unwrap();
    let engine = db::submit_engine(&conn, engine_input("K191"), "u9").unwrap();
    db::moderate(&conn, &engine.id, EngineStatus::Rejected, Some("needs photos")).unwrap();
    db::moderate(&conn, &engine.id, EngineStatus::Approved, None).unwrap();
    let engine = db::get_engine(&conn, &engine.id).unwrap().unwrap();
    assert_eq!(engine.status, EngineStatus::Approved);
    assert_eq!(engine.moderator_comment.as_deref(), Some("needs photos"));
}

#[test]
fn engine_index_is_unique_ignoring_case() {
    let conn = db::open_in_memory().unwrap();
    let err = db::submit_engine(&conn, engine_input("yx140"), "u9").unwrap_err();
    assert!(matches!(err, Error::DuplicateEngineIndex(_)));

    db::submit_engine(&conn, engine_input("K200"), "u9").unwrap();
    let err = db::submit_engine(&conn, engine_input("k200"), "u8").unwrap_err();
    assert!(matches!(err, Error::DuplicateEngineIndex(_)));
}

#[test]
fn builds_and_views_feed_popularity() {
    let conn = db::open_in_memory().unwrap();
    let build = db::add_build(&conn, build_input("zs155")).unwrap();
    assert_eq!(build.photos.len(), 2);
    db::add_build(&conn, build_input("zs155")).unwrap();
    db::submit_report(&conn, report("u1", "zs155", 100.0, &[])).unwrap();
    assert!(db::record_view(&conn, "zs155").unwrap());
    assert!(db::record_view(&conn, "zs155").unwrap());
    assert!(!db::record_view(&conn, "missing").unwrap());

    let builds = db::list_builds(&conn).unwrap();
    assert_eq!(builds.len(), 2);
    assert_eq!(builds[0].photos, vec!["front.jpg", "side.jpg"]);

    let top = Analytics::new(&conn).top_by_popularity(1).unwrap();
    assert_eq!(top[0].engine_id, "zs155");
    // 1 report * 2 + 2 builds * 5 + 2 views
    assert_eq!(top[0].popularity_score, 14);
}

#[test]
fn build_for_unknown_engine_is_refused() {
    let conn = db::open_in_memory().unwrap();
    let err = db::add_build(&conn, build_input("nope")).unwrap_err();
    assert!(matches!(err, Error::EngineNotFound(_)));
    assert!(db::list_builds(&conn).unwrap().is_empty());
}

#[test]
fn analytics_scenario_from_four_reports() {
    let conn = db::open_in_memory().unwrap();
    db::submit_report(&conn, report("a", "lifan150", 80.0, &[BreakdownCategory::Timing])).unwrap();
    db::submit_report(&conn, report("b", "lifan150", 200.0, &[])).unwrap();
    db::submit_report(&conn, report("c", "lifan150", 220.0, &[])).unwrap();
    db::submit_report(&conn, report("d", "lifan150", 180.0, &[])).unwrap();

    let analytics = Analytics::new(&conn);
    let stats = analytics.compute_all_stats().unwrap();
    let s = stats.iter().find(|s| s.engine_id == "lifan150").unwrap();
    assert_eq!(s.failure_rate, 25);
    assert_eq!(s.avg_mileage_to_failure, 80);
    assert_eq!(s.top_failure_reason, TopFailureReason::Category(BreakdownCategory::Timing));
    assert_eq!(s.popularity_score, 8);

    let untouched = stats.iter().find(|s| s.engine_id == "nc250").unwrap();
    assert_eq!(untouched.failure_rate, 25);
    assert_eq!(untouched.avg_mileage_to_failure, 150);
    assert_eq!(untouched.top_failure_reason, TopFailureReason::NoData);
    assert_eq!(analytics.reliability_index_for("nc250").unwrap(), 75);

    let worst = analytics.most_problematic(10).unwrap();
    assert_eq!(worst.len(), 1);
    assert_eq!(worst[0].engine_id, "lifan150");

    assert_eq!(analytics.compute_all_stats().unwrap(), stats);

    let summary = analytics.report_summary("lifan150").unwrap().unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.no_breakdowns, 3);
    assert_eq!(analytics.report_summary("nc250").unwrap(), None);
}

#[test]
fn unreadable_rows_are_skipped_not_fatal() {
    let conn = db::open_in_memory().unwrap();
    db::submit_report(&conn, report("u1", "yx140", 40.0, &[])).unwrap();
    conn.execute(
        "INSERT INTO reports (id, engine_id, user_id, mileage, mileage_unit, usage_style,
            usage_type, has_breakdowns, description, maintenance_rating, created_at)
         VALUES ('rep_bad', 'yx140', 'u2', 10, 'miles', 'Calm', 'Enduro', 0, '', 3,
                 '2024-01-01T00:00:00Z')",
        params![],
    )
    .unwrap();

    let reports = conn.list_reports_for_engine("yx140").unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].user_id, "u1");
}

#[test]
fn import_checks_each_record() {
    let conn = db::open_in_memory().unwrap();
    let json = r#"[
        {"id":"rep_a","engineId":"yx140","userId":"u1","mileage":120,"mileageUnit":"h",
         "usageStyle":"Любительский","usageType":"Эндуро","hasBreakdowns":true,
         "breakdownCategories":["ГРМ","Сцепление"],"description":"","maintenanceRating":4,
         "createdAt":"2024-03-01T10:00:00.000Z"},
        {"id":"rep_b","engineId":"yx140","userId":"u1","mileage":130,"mileageUnit":"h",
         "usageStyle":"Спокойный","usageType":"Эндуро","hasBreakdowns":false,
         "breakdownCategories":[],"description":"","maintenanceRating":5,
         "createdAt":"2024-03-01T18:00:00.000Z"},
        {"id":"rep_c","engineId":"yx140","userId":"u2","mileage":10,"mileageUnit":"parsecs",
         "usageStyle":"Спокойный","usageType":"Эндуро","hasBreakdowns":false,
         "breakdownCategories":[],"description":"","maintenanceRating":5,
         "createdAt":"2024-03-01T18:00:00.000Z"},
        {"id":"rep_d","engineId":"yx140"}
    ]"#;

    let outcome = db::import_reports_json(&conn, json).unwrap();
    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.rejected.len(), 2);
    assert_eq!(outcome.rejected[0].position, 2);
    assert_eq!(outcome.rejected[0].id.as_deref(), Some("rep_c"));
    assert_eq!(outcome.rejected[1].position, 3);

    let reports = conn.list_reports_for_engine("yx140").unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(
        reports[0].breakdown_categories,
        vec![BreakdownCategory::Timing, BreakdownCategory::Clutch]
    );

    let again = db::import_reports_json(&conn, json).unwrap();
    assert_eq!(again.imported, 0);
    assert_eq!(again.skipped, 2);
}

#[test]
fn imported_offset_timestamp_counts_toward_its_utc_day() {
    let conn = db::open_in_memory().unwrap();
    // 01:00 at +05:00 is 20:00 UTC the day before
    let json = r#"[
        {"id":"rep_old","engineId":"yx140","userId":"u1","mileage":120,"mileageUnit":"h",
         "usageStyle":"Любительский","usageType":"Эндуро","hasBreakdowns":false,
         "breakdownCategories":[],"description":"","maintenanceRating":4,
         "createdAt":"2024-06-02T01:00:00+05:00"}
    ]"#;
    assert_eq!(db::import_reports_json(&conn, json).unwrap().imported, 1);

    let stored = conn.list_reports_for_engine("yx140").unwrap();
    assert_eq!(stored[0].created_at, "2024-06-01T20:00:00+00:00");

    let same_day = Utc.with_ymd_and_hms(2024, 6, 1, 22, 0, 0).unwrap();
    let err = db::submit_report_at(&conn, report("u1", "yx140", 60.0, &[]), same_day).unwrap_err();
    assert!(matches!(err, Error::DuplicateReport));

    let next_day = Utc.with_ymd_and_hms(2024, 6, 2, 3, 0, 0).unwrap();
    db::submit_report_at(&conn, report("u1", "yx140", 60.0, &[]), next_day).unwrap();
    assert_eq!(conn.list_reports_for_engine("yx140").unwrap().len(), 2);
}

#[test]
fn import_of_non_array_is_an_error() {
    let conn = db::open_in_memory().unwrap();
    let err = db::import_reports_json(&conn, "{\"id\": 1}").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("moto.db");

    {
        let conn = db::open_db(&path).unwrap();
        db::submit_report(&conn, report("u1", "cb250", 500.0, &[])).unwrap();
    }

    let conn = db::open_db(&path).unwrap();
    assert_eq!(conn.list_reports_for_engine("cb250").unwrap().len(), 1);
}
