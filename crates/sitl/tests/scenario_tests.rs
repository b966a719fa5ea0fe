use line_follower_sitl::{
    ChassisConfig, Position, RunOutcome, Scenario, SimulatorError, Stripe, Track,
};

const WIDTH: f32 = 0.025;

fn scenario_file(name: &str) -> String {
    format!("{}/scenarios/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn scenario(track: Track, start: Position) -> Scenario {
    let mut scenario = Scenario::from_json_str(r#"{"track": {}, "start": {"x": 0.0, "y": 0.0}}"#)
        .expect("minimal scenario parses");
    scenario.track = track;
    scenario.start = start;
    scenario.params.insert("FOLLOW_TIMEOUT".into(), 10_000.0);
    scenario
}

#[test]
fn follows_to_intersection() {
    let track = Track::new(vec![
        Stripe::horizontal(0.0, -1.5, 1.0, WIDTH),
        Stripe::vertical(-0.5, -0.5, 0.5, WIDTH),
    ]);
    let report = scenario(track, Position::new(0.5, 0.0)).run().unwrap();

    assert_eq!(report.outcome, RunOutcome::Intersection);
    assert_eq!(report.final_fault, "Intersection");
    assert!(report.intersection_seen);
    assert!(!report.line_lost);
    assert!(report.searches.is_empty());

    // The west array reaches the cross when the centre is 0.15 m short of it
    let p = report.final_position;
    assert!(p.x < -0.30 && p.x > -0.40, "{:?}", p);
    assert!(p.y.abs() < 1e-4, "{:?}", p);
    assert_eq!(report.first_intersection_cycle, Some(report.cycles - 1));
}

#[test]
fn stops_at_line_end() {
    let track = Track::new(vec![Stripe::horizontal(0.0, -0.6, 1.0, WIDTH)]);
    let report = scenario(track, Position::new(0.5, 0.0)).run().unwrap();

    assert_eq!(report.outcome, RunOutcome::LineLost);
    // The east array still sees the line
    assert_eq!(report.final_fault, "FrontLost");
    assert!(report.line_lost);
    assert!(!report.intersection_seen);
    assert!(report.final_position.x < -0.44 && report.final_position.x > -0.48);
}

#[test]
fn search_reacquires_line_then_follows() {
    let track = Track::new(vec![
        Stripe::horizontal(0.0, -1.5, 1.5, WIDTH),
        Stripe::vertical(-0.6, -0.5, 0.5, WIDTH),
    ]);
    let mut scenario = scenario(track, Position::new(0.5, -0.12));
    scenario.search_on_loss = true;
    let report = scenario.run().unwrap();

    assert_eq!(report.first_line_loss_cycle, Some(0));
    assert_eq!(report.searches.len(), 1);
    let search = report.searches[0];
    assert!(search.found);
    assert_eq!(search.passes, 0);
    assert_eq!(search.angle, Some(90.0));
    assert!(search.elapsed_ms < 1000);

    assert_eq!(report.outcome, RunOutcome::Intersection);
    assert!(report.line_lost);
    assert!(report.intersection_seen);
    let p = report.final_position;
    assert!(p.y.abs() < 0.02, "{:?}", p);
    assert!(p.x < -0.3 && p.x > -0.6, "{:?}", p);
}

#[test]
fn search_gives_up_on_empty_track() {
    let mut scenario = scenario(Track::default(), Position::new(0.0, 0.0));
    scenario.search_on_loss = true;
    let report = scenario.run().unwrap();

    assert_eq!(report.outcome, RunOutcome::LineLost);
    assert_eq!(report.final_fault, "FrontBackLost");
    assert_eq!(report.cycles, 1);
    assert_eq!(report.searches.len(), 1);

    let search = report.searches[0];
    assert!(!search.found);
    assert_eq!(search.passes, 1);
    assert_eq!(search.speed, 100.0);
    // One second north, two seconds south at a tenth of full speed
    assert_eq!(search.elapsed_ms, 3000);
    assert!((report.final_position.y + 0.05).abs() < 1e-3);
}

#[test]
fn without_search_line_loss_ends_run() {
    let report = scenario(Track::default(), Position::new(0.0, 0.0)).run().unwrap();
    assert_eq!(report.outcome, RunOutcome::LineLost);
    assert!(report.searches.is_empty());
    assert_eq!(report.elapsed_ms, 0);
}

#[test]
fn follow_timeout_ends_run() {
    let track = Track::new(vec![Stripe::horizontal(0.0, -5.0, 1.0, WIDTH)]);
    let mut scenario = scenario(track, Position::new(0.5, 0.0));
    scenario.params.insert("FOLLOW_TIMEOUT".into(), 500.0);
    let report = scenario.run().unwrap();

    assert_eq!(report.outcome, RunOutcome::TimedOut);
    assert_eq!(report.elapsed_ms, 500);
    assert_eq!(report.cycles, 25);
    // 80 % of 0.5 m/s for half a second
    assert!((report.final_position.x - 0.3).abs() < 1e-3, "{:?}", report.final_position);
    assert!((report.distance_m - 0.2).abs() < 1e-3);
}

#[test]
fn seeded_noise_is_deterministic() {
    let track = Track::new(vec![Stripe::horizontal(0.0, -5.0, 1.0, WIDTH)]);
    let mut scenario = scenario(track, Position::new(0.5, 0.0));
    scenario.noise = 0.02;
    scenario.seed = Some(9);

    let first = scenario.run().unwrap();
    let second = scenario.run().unwrap();
    assert_eq!(first, second);
}

#[test]
fn scenario_json_round_trip() {
    let mut scenario = scenario(
        Track::new(vec![Stripe::horizontal(0.0, -1.0, 1.0, WIDTH)]),
        Position::new(0.25, 0.0),
    );
    scenario.name = "round trip".into();
    scenario.heading = 180;
    scenario.chassis = ChassisConfig {
        max_speed_mps: 0.8,
        ..ChassisConfig::default()
    };

    let json = scenario.to_json_string().unwrap();
    assert_eq!(Scenario::from_json_str(&json).unwrap(), scenario);
}

#[test]
fn bundled_scenarios_load_and_run() {
    let cross = Scenario::load(scenario_file("straight_to_cross.json")).unwrap();
    assert_eq!(cross.run().unwrap().outcome, RunOutcome::Intersection);

    let search = Scenario::load(scenario_file("offset_start_search.json")).unwrap();
    assert!(search.search_on_loss);
    let report = search.run().unwrap();
    assert_eq!(report.outcome, RunOutcome::Intersection);
    assert!(report.searches[0].found);

    let empty = Scenario::load(scenario_file("empty_floor.json")).unwrap();
    assert_eq!(empty.run().unwrap().outcome, RunOutcome::LineLost);
}

#[test]
fn missing_file_is_io_error() {
    let err = Scenario::load(scenario_file("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, SimulatorError::Io(_)));
}

#[test]
fn malformed_json_is_json_error() {
    let err = Scenario::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, SimulatorError::Json(_)));
}
