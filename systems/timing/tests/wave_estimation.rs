use round_recap_system_timing::{Config, MapKind, TimingTable, WaveEstimator};

fn three_wave_table() -> TimingTable {
    TimingTable::new(vec![vec![10, 20, 30]]).expect("valid table")
}

#[test]
fn exact_offset_maps_to_its_own_index() {
    let estimator = WaveEstimator::default();
    let table = three_wave_table();

    assert_eq!(estimator.current_wave(&table, 1, 0), 0);
    assert_eq!(estimator.current_wave(&table, 1, 10_000), 0);
    assert_eq!(estimator.current_wave(&table, 1, 10_001), 1);
    assert_eq!(estimator.current_wave(&table, 1, 20_000), 1);
    assert_eq!(estimator.current_wave(&table, 1, 30_000), 2);
    assert_eq!(estimator.current_wave(&table, 1, 30_001), 3);
}

#[test]
fn last_wave_begins_after_final_offset() {
    let estimator = WaveEstimator::default();
    let table = three_wave_table();

    assert!(!estimator.is_last_wave(&table, 1, 30_000));
    assert!(estimator.is_last_wave(&table, 1, 30_001));
    assert!(estimator.is_last_wave(&table, 1, 120_000));
}

#[test]
fn waves_never_decrease_over_time() {
    let estimator = WaveEstimator::default();

    for map in MapKind::ALL {
        let table = map.timing_table();
        for round in 1..=table.max_round() {
            let mut previous = 0;
            for elapsed_ms in (0..=90_000).step_by(250) {
                let wave = estimator.current_wave(&table, round, elapsed_ms);
                assert!(wave >= previous, "{map} round {round} regressed at {elapsed_ms}ms");
                assert!(wave <= table.last_wave(round));
                previous = wave;
            }
            assert_eq!(previous, table.last_wave(round), "{map} round {round}");
        }
    }
}

#[test]
fn unknown_rounds_and_implausible_times_yield_zero() {
    let estimator = WaveEstimator::new(Config::new(60_000));
    let table = three_wave_table();

    assert_eq!(estimator.current_wave(&table, 2, 45_000), 0);
    assert!(!estimator.is_last_wave(&table, 2, 45_000));
    assert_eq!(estimator.current_wave(&table, 1, 60_000), 3);
    assert_eq!(estimator.current_wave(&table, 1, 60_001), 0);
    assert_eq!(estimator.current_wave(&TimingTable::empty(), 1, 15_000), 0);
}
