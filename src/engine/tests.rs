//! Unit tests for the aggregation engine

use super::*;
use crate::speed::DistanceOverTime;
use crate::storage::{NewRace, NewRaceResult, NewRegatta, RegattaDatabase};
use crate::{RaceId, TeamId};
use chrono::NaiveDate;

const OWN: TeamId = TeamId(1);

fn create_test_db() -> RegattaDatabase {
    RegattaDatabase::open_in_memory().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_race(db: &mut RegattaDatabase, day: NaiveDate, boat_class: &str) -> RaceId {
    seed_race_for(db, OWN, day, boat_class)
}

fn seed_race_for(
    db: &mut RegattaDatabase,
    team: TeamId,
    day: NaiveDate,
    boat_class: &str,
) -> RaceId {
    let regatta_id = db
        .insert_regatta(&NewRegatta {
            team_id: team,
            name: format!("Regatta {day}"),
            date: day,
        })
        .unwrap();
    db.insert_race(&NewRace {
        regatta_id,
        boat_class: boat_class.to_string(),
        event_name: format!("Varsity {boat_class}"),
    })
    .unwrap()
}

fn own_result(race_id: RaceId, place: Option<u32>, time: Option<f64>) -> NewRaceResult {
    NewRaceResult {
        race_id,
        is_own_team: true,
        team_name: None,
        place,
        finish_time_seconds: time,
    }
}

fn opp_result(race_id: RaceId, name: &str, place: Option<u32>, time: Option<f64>) -> NewRaceResult {
    NewRaceResult {
        race_id,
        is_own_team: false,
        team_name: Some(name.to_string()),
        place,
        finish_time_seconds: time,
    }
}

mod estimates {
    use super::*;

    #[test]
    fn test_calculate_empty_is_none_and_persists_nothing() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let estimate = calculate_estimate(&mut db, &model, OWN, "8+", None).unwrap();
        assert!(estimate.is_none());
        assert!(db.get_team_speed_estimate(OWN, "8+", None).unwrap().is_none());
    }

    #[test]
    fn test_calculate_skips_unusable_samples() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, Some(1), Some(400.0))).unwrap();
        // No finish time: unusable, skipped, aggregation continues
        let race2 = seed_race(&mut db, date(2025, 4, 19), "8+");
        db.insert_result(&own_result(race2, Some(2), None)).unwrap();

        let estimate = calculate_estimate(&mut db, &model, OWN, "8+", None)
            .unwrap()
            .unwrap();
        assert_eq!(estimate.sample_count, 1);
        assert!((estimate.adjusted_speed - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_ignores_opponent_results() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, Some(2), Some(400.0))).unwrap();
        db.insert_result(&opp_result(race, "Riverside", Some(1), Some(390.0)))
            .unwrap();

        let estimate = calculate_estimate(&mut db, &model, OWN, "8+", None)
            .unwrap()
            .unwrap();
        assert_eq!(estimate.sample_count, 1);
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        for (day, time) in [(12, 400.0), (19, 410.0), (26, 395.0)] {
            let race = seed_race(&mut db, date(2025, 4, day), "8+");
            db.insert_result(&own_result(race, Some(1), Some(time))).unwrap();
        }

        let first = calculate_estimate(&mut db, &model, OWN, "8+", Some("Spring 2025"))
            .unwrap()
            .unwrap();
        let second = calculate_estimate(&mut db, &model, OWN, "8+", Some("Spring 2025"))
            .unwrap()
            .unwrap();

        // Identical underlying results: identical numbers, only the
        // timestamp may move.
        assert_eq!(first.adjusted_speed, second.adjusted_speed);
        assert_eq!(first.raw_speed, second.raw_speed);
        assert_eq!(first.sample_count, second.sample_count);
        assert_eq!(first.confidence_score, second.confidence_score);
    }

    #[test]
    fn test_season_window_scopes_the_sample() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let spring = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(spring, Some(1), Some(400.0))).unwrap();
        let fall = seed_race(&mut db, date(2025, 10, 4), "8+");
        db.insert_result(&own_result(fall, Some(1), Some(500.0))).unwrap();

        let estimate = calculate_estimate(&mut db, &model, OWN, "8+", Some("Spring 2025"))
            .unwrap()
            .unwrap();
        assert_eq!(estimate.sample_count, 1);
        assert!((estimate.adjusted_speed - 5.0).abs() < 1e-9);

        // Fail-open: an unrecognized label means no filter
        let estimate = calculate_estimate(&mut db, &model, OWN, "8+", Some("Winter 2025"))
            .unwrap()
            .unwrap();
        assert_eq!(estimate.sample_count, 2);
    }
}

mod rankings {
    use super::*;

    #[test]
    fn test_rankings_sorted_descending_with_dense_ranks() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, Some(2), Some(400.0))).unwrap();
        db.insert_result(&opp_result(race, "Riverside", Some(1), Some(390.0)))
            .unwrap();
        db.insert_result(&opp_result(race, "Thames RC", Some(3), Some(410.0)))
            .unwrap();

        let rankings = build_rankings(&mut db, &model, OWN, "8+", None).unwrap();
        assert_eq!(rankings.len(), 3);

        for i in 0..rankings.len() {
            assert_eq!(rankings[i].rank, (i + 1) as u32);
            if i + 1 < rankings.len() {
                assert!(rankings[i].median_speed >= rankings[i + 1].median_speed);
            }
        }
        assert_eq!(rankings[0].team_name, "Riverside");
        assert_eq!(rankings[1].team_name, OWN_TEAM_LABEL);
        assert!(rankings[1].is_own_team);
    }

    #[test]
    fn test_ranking_uses_median_not_mean() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        // Own team: steady 5.0 m/s (400s) plus one corrupt 10 m/s entry
        // (200s). Opponent: steady 5.2 m/s. The own mean would beat 5.2;
        // the median must not.
        for (day, time) in [(1, 400.0), (8, 400.0), (15, 400.0), (22, 200.0)] {
            let race = seed_race(&mut db, date(2025, 3, day), "8+");
            db.insert_result(&own_result(race, None, Some(time))).unwrap();
            db.insert_result(&opp_result(race, "Riverside", None, Some(2000.0 / 5.2)))
                .unwrap();
        }

        let rankings = build_rankings(&mut db, &model, OWN, "8+", None).unwrap();
        assert_eq!(rankings[0].team_name, "Riverside");
        assert_eq!(rankings[1].team_name, OWN_TEAM_LABEL);
        assert!((rankings[1].median_speed - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        // Three opponents with identical times; first-seen order must hold.
        for name in ["Alpha", "Beta", "Gamma"] {
            db.insert_result(&opp_result(race, name, None, Some(400.0))).unwrap();
        }

        let rankings = build_rankings(&mut db, &model, OWN, "8+", None).unwrap();
        let names: Vec<&str> = rankings.iter().map(|e| e.team_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(
            rankings.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_opponent_groups_are_case_sensitive() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&opp_result(race, "Riverside", None, Some(400.0))).unwrap();
        db.insert_result(&opp_result(race, "RIVERSIDE", None, Some(405.0))).unwrap();

        // Raw stored names, no normalization at this stage
        let rankings = build_rankings(&mut db, &model, OWN, "8+", None).unwrap();
        assert_eq!(rankings.len(), 2);
    }

    #[test]
    fn test_ranking_refreshes_own_estimate_only() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, Some(2), Some(400.0))).unwrap();
        db.insert_result(&opp_result(race, "Riverside", Some(1), Some(390.0)))
            .unwrap();

        build_rankings(&mut db, &model, OWN, "8+", None).unwrap();

        let own_row = db.get_team_speed_estimate(OWN, "8+", None).unwrap();
        assert!(own_row.is_some());
        // Opponents exist only as computed-on-the-fly groups
        let count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM team_speed_estimates", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unusable_samples_drop_out_of_groups() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, Some(1), Some(400.0))).unwrap();
        // Timeless opponent result: no group for them at all
        db.insert_result(&opp_result(race, "Riverside", Some(2), None)).unwrap();

        let rankings = build_rankings(&mut db, &model, OWN, "8+", None).unwrap();
        assert_eq!(rankings.len(), 1);
        assert_eq!(rankings[0].team_name, OWN_TEAM_LABEL);
    }
}

mod head_to_head {
    use super::*;

    #[test]
    fn test_place_overrides_margin() {
        let mut db = create_test_db();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        // Own team nominally slower on time but placed higher in the full
        // field: the place comparison is authoritative.
        db.insert_result(&own_result(race, Some(2), Some(400.0))).unwrap();
        db.insert_result(&opp_result(race, "Riverside", Some(5), Some(390.0)))
            .unwrap();

        let h2h = build_head_to_head(&db, OWN, "Riverside", "8+", None).unwrap();
        assert_eq!(h2h.total_races, 1);
        assert_eq!(h2h.wins, 1);
        assert_eq!(h2h.losses, 0);
        assert!(h2h.matchups[0].won);
        // Margin still reported as recorded: negative (own slower)
        assert_eq!(h2h.matchups[0].margin, Some(-10.0));
    }

    #[test]
    fn test_margin_fallback_when_places_missing() {
        let mut db = create_test_db();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, None, Some(390.0))).unwrap();
        db.insert_result(&opp_result(race, "Riverside", None, Some(400.0)))
            .unwrap();

        let h2h = build_head_to_head(&db, OWN, "Riverside", "8+", None).unwrap();
        assert_eq!(h2h.wins, 1);
        assert_eq!(h2h.matchups[0].margin, Some(10.0));
    }

    #[test]
    fn test_race_missing_own_result_is_excluded() {
        let mut db = create_test_db();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&opp_result(race, "Riverside", Some(1), Some(390.0)))
            .unwrap();

        let h2h = build_head_to_head(&db, OWN, "Riverside", "8+", None).unwrap();
        // Not a loss, not a null entry: absent entirely
        assert_eq!(h2h.total_races, 0);
        assert!(h2h.matchups.is_empty());
        assert_eq!(h2h.losses, 0);
    }

    #[test]
    fn test_opponent_match_is_case_insensitive() {
        let mut db = create_test_db();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, Some(1), Some(390.0))).unwrap();
        db.insert_result(&opp_result(race, "Riverside BC", Some(2), Some(400.0)))
            .unwrap();

        let h2h = build_head_to_head(&db, OWN, "riverside bc", "8+", None).unwrap();
        assert_eq!(h2h.total_races, 1);
    }

    #[test]
    fn test_matchups_sorted_most_recent_first() {
        let mut db = create_test_db();

        for day in [5, 19, 12] {
            let race = seed_race(&mut db, date(2025, 4, day), "8+");
            db.insert_result(&own_result(race, Some(1), Some(390.0))).unwrap();
            db.insert_result(&opp_result(race, "Riverside", Some(2), Some(400.0)))
                .unwrap();
        }

        let h2h = build_head_to_head(&db, OWN, "Riverside", "8+", None).unwrap();
        let dates: Vec<NaiveDate> = h2h.matchups.iter().map(|m| m.regatta_date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 4, 19), date(2025, 4, 12), date(2025, 4, 5)]
        );
    }

    #[test]
    fn test_avg_margin_excludes_undefined_margins() {
        let mut db = create_test_db();

        // Matchup with both times: margin +10
        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, Some(1), Some(390.0))).unwrap();
        db.insert_result(&opp_result(race, "Riverside", Some(2), Some(400.0)))
            .unwrap();

        // Matchup decided on places alone: margin undefined, excluded
        // from the average rather than counted as zero
        let race = seed_race(&mut db, date(2025, 4, 19), "8+");
        db.insert_result(&own_result(race, Some(1), None)).unwrap();
        db.insert_result(&opp_result(race, "Riverside", Some(4), None)).unwrap();

        let h2h = build_head_to_head(&db, OWN, "Riverside", "8+", None).unwrap();
        assert_eq!(h2h.total_races, 2);
        assert_eq!(h2h.wins, 2);
        assert_eq!(h2h.avg_margin, Some(10.0));
    }

    #[test]
    fn test_no_defined_margins_is_none() {
        let mut db = create_test_db();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, Some(1), None)).unwrap();
        db.insert_result(&opp_result(race, "Riverside", Some(2), None)).unwrap();

        let h2h = build_head_to_head(&db, OWN, "Riverside", "8+", None).unwrap();
        assert_eq!(h2h.total_races, 1);
        assert!(h2h.avg_margin.is_none());
    }
}

mod analyze {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_analyze_race_breakdown() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let race = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(race, Some(1), Some(400.0))).unwrap();
        db.insert_result(&opp_result(race, "Riverside", Some(2), None)).unwrap();

        let analysis = analyze_race(&db, &model, OWN, race).unwrap();
        assert_eq!(analysis.boat_class, "8+");
        assert_eq!(analysis.results.len(), 2);

        let own = &analysis.results[0];
        assert_eq!(own.team_name, OWN_TEAM_LABEL);
        assert!((own.speed.unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(own.split.as_deref(), Some("1:40.0"));

        // Unusable sample: listed, but with no speed
        let opp = &analysis.results[1];
        assert_eq!(opp.team_name, "Riverside");
        assert!(opp.speed.is_none());
        assert!(opp.split.is_none());
    }

    #[test]
    fn test_analyze_race_outside_team_is_not_found() {
        let mut db = create_test_db();
        let model = DistanceOverTime::default();

        let foreign = seed_race_for(&mut db, TeamId::new(2), date(2025, 4, 12), "8+");

        let err = analyze_race(&db, &model, OWN, foreign).unwrap_err();
        assert!(matches!(err, EngineError::RaceNotFound { .. }));
    }

    #[test]
    fn test_analyze_unknown_race_is_not_found() {
        let db = create_test_db();
        let model = DistanceOverTime::default();

        let err = analyze_race(&db, &model, OWN, RaceId::new(404)).unwrap_err();
        assert!(matches!(err, EngineError::RaceNotFound { .. }));
    }
}

mod classes {
    use super::*;

    #[test]
    fn test_boat_classes_windowed() {
        let mut db = create_test_db();

        let spring = seed_race(&mut db, date(2025, 4, 12), "8+");
        db.insert_result(&own_result(spring, None, Some(400.0))).unwrap();
        let fall = seed_race(&mut db, date(2025, 10, 4), "4x");
        db.insert_result(&own_result(fall, None, Some(420.0))).unwrap();

        let all = boat_classes(&db, OWN, None).unwrap();
        assert_eq!(all, vec!["4x".to_string(), "8+".to_string()]);

        let spring_only = boat_classes(&db, OWN, Some("Spring 2025")).unwrap();
        assert_eq!(spring_only, vec!["8+".to_string()]);
    }
}
