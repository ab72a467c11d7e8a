use chrono::{DateTime, Utc};
use triad_core::{analyze, Feedback, PillarRatings, Task, Zone};

fn done(id: &str, ratings: (i64, i64, i64), feedback: Option<Feedback>) -> Task {
    let ratings = PillarRatings::new(ratings.0, ratings.1, ratings.2).unwrap();
    let mut task = Task::with_id(id, "owner-1", id, ratings).unwrap();
    task.mark_completed(
        DateTime::parse_from_rfc3339("2026-10-16T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc),
    );
    task.feedback = feedback;
    task
}

#[test]
fn empty_input_yields_zeroes() {
    let analysis = analyze(&Vec::<Task>::new());

    assert!(analysis.is_empty());
    assert_eq!(analysis.total_count, 0);
    assert_eq!(analysis.critical_count, 0);
    assert_eq!(analysis.average_score, 0.0);
    assert_eq!(analysis.critical_percentage, 0.0);
    assert_eq!(analysis.pillar_averages.consequence, 0.0);
    assert!(!analysis.average_score.is_nan());
}

#[test]
fn counts_averages_and_distributions() {
    let tasks = vec![
        done("a", (5, 5, 5), Some(Feedback::Transformed)),
        done("b", (4, 2, 2), Some(Feedback::Relief)),
        done("c", (1, 2, 1), None),
        done("d", (2, 5, 5), Some(Feedback::Relief)),
    ];

    let analysis = analyze(&tasks);

    assert_eq!(analysis.total_count, 4);
    assert_eq!(analysis.zone_counts.get(Zone::Critical), 2);
    assert_eq!(analysis.zone_counts.get(Zone::Important), 1);
    assert_eq!(analysis.zone_counts.get(Zone::Moderate), 1);
    assert_eq!(analysis.critical_count, 2);
    assert_eq!(analysis.critical_percentage, 50.0);
    assert_eq!(analysis.average_score, 9.75);
    assert_eq!(analysis.pillar_averages.consequence, 3.0);
    assert_eq!(analysis.pillar_averages.pride, 3.5);
    assert_eq!(analysis.pillar_averages.construction, 3.25);

    assert_eq!(analysis.dominant_pillar_counts.consequence, 2);
    assert_eq!(analysis.dominant_pillar_counts.pride, 2);
    assert_eq!(analysis.dominant_pillar_counts.construction, 0);

    assert_eq!(analysis.feedback_counts.transformed, 1);
    assert_eq!(analysis.feedback_counts.relief, 2);
    assert_eq!(analysis.feedback_counts.obligation, 0);
    assert_eq!(analysis.feedback_counts.none, 1);
}

#[test]
fn zone_counts_sum_to_total() {
    let tasks: Vec<Task> = (1..=5)
        .flat_map(|c| (1..=5).map(move |p| done(&format!("t-{c}{p}"), (c, p, 3), None)))
        .collect();

    let analysis = analyze(&tasks);
    let zone_sum: usize = Zone::ALL
        .iter()
        .map(|zone| analysis.zone_counts.get(*zone))
        .sum();
    assert_eq!(zone_sum, analysis.total_count);
    assert_eq!(analysis.total_count, 25);
}

#[test]
fn analysis_serializes_for_reporting() {
    let tasks = vec![done("a", (5, 5, 5), None)];
    let json = serde_json::to_value(analyze(&tasks)).unwrap();
    assert_eq!(json["zone_counts"]["critical"], 1);
    assert_eq!(json["critical_percentage"], 100.0);
    assert_eq!(json["feedback_counts"]["none"], 1);
}
