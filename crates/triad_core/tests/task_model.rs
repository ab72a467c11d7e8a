use chrono::{DateTime, NaiveDate, Utc};
use triad_core::{Feedback, PillarRatings, Task, TaskValidationError, Zone};

fn ratings(consequence: i64, pride: i64, construction: i64) -> PillarRatings {
    PillarRatings::new(consequence, pride, construction).unwrap()
}

fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn task_new_sets_defaults() {
    let task = Task::new("owner-1", "write report", ratings(4, 3, 2));

    assert!(!task.id.as_str().is_empty());
    assert_eq!(task.owner_id, "owner-1");
    assert_eq!(task.title, "write report");
    assert_eq!(task.total_score(), 9);
    assert_eq!(task.zone(), Zone::Important);
    assert!(task.created_at.is_some());
    assert!(!task.is_completed());
    assert_eq!(task.completed_at(), None);
    assert!(!task.hidden);
    assert_eq!(task.feedback, None);
}

#[test]
fn generated_ids_are_unique() {
    let a = Task::new("owner-1", "a", ratings(1, 1, 1));
    let b = Task::new("owner-1", "b", ratings(1, 1, 1));
    assert_ne!(a.id, b.id);
}

#[test]
fn with_id_rejects_blank_id() {
    let err = Task::with_id("   ", "owner-1", "x", ratings(1, 1, 1)).unwrap_err();
    assert_eq!(err, TaskValidationError::BlankId);
}

#[test]
fn total_score_follows_rating_changes() {
    let mut task = Task::with_id("t-1", "owner-1", "x", ratings(1, 1, 1)).unwrap();
    assert_eq!(task.total_score(), 3);
    assert_eq!(task.zone(), Zone::Moderate);

    task.set_ratings(ratings(5, 4, 4));
    assert_eq!(task.total_score(), 13);
    assert_eq!(task.zone(), Zone::Critical);
}

#[test]
fn completion_stamp_tracks_completed_state() {
    let mut task = Task::with_id("t-1", "owner-1", "x", ratings(2, 2, 2)).unwrap();
    let stamp = at("2026-10-16T08:00:00Z");

    task.toggle_completed(stamp);
    assert!(task.is_completed());
    assert_eq!(task.completed_at(), Some(stamp));

    task.toggle_completed(at("2026-10-17T08:00:00Z"));
    assert!(!task.is_completed());
    assert_eq!(task.completed_at(), None);
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let mut task = Task::with_id("t-42", "owner-1", "ship release", ratings(5, 3, 4)).unwrap();
    task.ideal_date = NaiveDate::from_ymd_opt(2026, 10, 20);
    task.mark_completed(at("2026-10-16T08:30:00Z"));
    task.feedback = Some(Feedback::Relief);
    task.hidden = true;

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], "t-42");
    assert_eq!(json["owner_id"], "owner-1");
    assert_eq!(json["consequence"], 5);
    assert_eq!(json["pride"], 3);
    assert_eq!(json["construction"], 4);
    assert_eq!(json["total_score"], 12);
    assert_eq!(json["completed"], true);
    assert_eq!(json["completed_at"], "2026-10-16T08:30:00Z");
    assert_eq!(json["ideal_date"], "2026-10-20");
    assert_eq!(json["feedback"], "relief");
    assert_eq!(json["hidden"], true);

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn deserialize_fills_optional_fields_with_defaults() {
    let value = serde_json::json!({
        "id": "t-1",
        "owner_id": "owner-1",
        "title": "minimal",
        "consequence": 1,
        "pride": 2,
        "construction": 3,
        "total_score": 6,
        "completed": false
    });

    let task: Task = serde_json::from_value(value).unwrap();
    assert_eq!(task.total_score(), 6);
    assert!(!task.hidden);
    assert_eq!(task.feedback, None);
    assert_eq!(task.created_at, None);
}

#[test]
fn deserialize_rejects_total_score_mismatch() {
    let value = serde_json::json!({
        "id": "t-1",
        "owner_id": "owner-1",
        "title": "bad total",
        "consequence": 2,
        "pride": 2,
        "construction": 2,
        "total_score": 9,
        "completed": false
    });

    let err = serde_json::from_value::<Task>(value).unwrap_err();
    assert!(
        err.to_string()
            .contains("total_score (9) must equal the pillar sum (6)"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_completion_mismatch() {
    let completed_without_stamp = serde_json::json!({
        "id": "t-1",
        "owner_id": "owner-1",
        "title": "x",
        "consequence": 2,
        "pride": 2,
        "construction": 2,
        "total_score": 6,
        "completed": true,
        "completed_at": null
    });
    let err = serde_json::from_value::<Task>(completed_without_stamp).unwrap_err();
    assert!(err.to_string().contains("must carry completed_at"));

    let open_with_stamp = serde_json::json!({
        "id": "t-1",
        "owner_id": "owner-1",
        "title": "x",
        "consequence": 2,
        "pride": 2,
        "construction": 2,
        "total_score": 6,
        "completed": false,
        "completed_at": "2026-10-16T08:30:00Z"
    });
    let err = serde_json::from_value::<Task>(open_with_stamp).unwrap_err();
    assert!(err.to_string().contains("must not carry completed_at"));
}

#[test]
fn deserialize_rejects_out_of_range_rating() {
    let value = serde_json::json!({
        "id": "t-1",
        "owner_id": "owner-1",
        "title": "x",
        "consequence": 6,
        "pride": 2,
        "construction": 2,
        "total_score": 10,
        "completed": false
    });

    let err = serde_json::from_value::<Task>(value).unwrap_err();
    assert!(err.to_string().contains("invalid consequence rating 6"));
}
