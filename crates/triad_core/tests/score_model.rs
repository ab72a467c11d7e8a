use triad_core::{
    classify_zone, compute_total, dominant_pillar, Pillar, PillarRatings, ScoreError, Task, Zone,
};

fn task_with(consequence: i64, pride: i64, construction: i64) -> Task {
    let ratings = PillarRatings::new(consequence, pride, construction).unwrap();
    Task::with_id("t-1", "owner-1", "x", ratings).unwrap()
}

#[test]
fn compute_total_is_the_sum_for_every_valid_triple() {
    for consequence in 1..=5 {
        for pride in 1..=5 {
            for construction in 1..=5 {
                let total = compute_total(consequence, pride, construction).unwrap();
                assert_eq!(i64::from(total), consequence + pride + construction);

                let matching = Zone::ALL
                    .iter()
                    .filter(|zone| zone.contains(total))
                    .count();
                assert_eq!(matching, 1, "total {total} must map to exactly one zone");
            }
        }
    }
}

#[test]
fn compute_total_rejects_out_of_range_ratings() {
    assert_eq!(
        compute_total(0, 3, 3),
        Err(ScoreError::InvalidRating {
            pillar: Pillar::Consequence,
            value: 0
        })
    );
    assert_eq!(
        compute_total(3, 3, 6),
        Err(ScoreError::InvalidRating {
            pillar: Pillar::Construction,
            value: 6
        })
    );
    assert!(compute_total(3, -2, 3).is_err());
}

#[test]
fn zone_examples_match_scoring_contract() {
    assert_eq!(classify_zone(compute_total(5, 5, 5).unwrap()), Zone::Critical);
    assert_eq!(classify_zone(compute_total(3, 3, 2).unwrap()), Zone::Important);
    assert_eq!(classify_zone(compute_total(2, 2, 2).unwrap()), Zone::Moderate);
}

#[test]
fn zone_boundaries_are_inclusive_on_lower_bound() {
    assert_eq!(classify_zone(3), Zone::Moderate);
    assert_eq!(classify_zone(7), Zone::Moderate);
    assert_eq!(classify_zone(8), Zone::Important);
    assert_eq!(classify_zone(11), Zone::Important);
    assert_eq!(classify_zone(12), Zone::Critical);
    assert_eq!(classify_zone(15), Zone::Critical);
}

#[test]
fn dominant_pillar_picks_strict_maximum() {
    assert_eq!(dominant_pillar(&task_with(1, 5, 2)), Pillar::Pride);
    assert_eq!(dominant_pillar(&task_with(1, 2, 3)), Pillar::Construction);
    assert_eq!(dominant_pillar(&task_with(4, 2, 3)), Pillar::Consequence);
}

#[test]
fn dominant_pillar_ties_follow_precedence() {
    assert_eq!(dominant_pillar(&task_with(3, 3, 3)), Pillar::Consequence);
    assert_eq!(dominant_pillar(&task_with(4, 4, 1)), Pillar::Consequence);
    assert_eq!(dominant_pillar(&task_with(2, 5, 5)), Pillar::Pride);
    assert_eq!(dominant_pillar(&task_with(5, 1, 5)), Pillar::Consequence);
}
