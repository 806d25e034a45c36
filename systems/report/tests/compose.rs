use round_recap_core::{PendingReport, PlayerStats, StatsDelta, StatsSnapshot};
use round_recap_system_report::ReportComposer;

fn snapshot(entries: &[(&str, u32, u32)]) -> StatsSnapshot {
    entries
        .iter()
        .map(|(name, kills, gold)| ((*name).to_owned(), PlayerStats::new(*kills, *gold)))
        .collect()
}

#[test]
fn players_missing_from_baseline_are_excluded() {
    let pending = PendingReport::new(
        4,
        snapshot(&[("Alice", 10, 500), ("Bob", 3, 90)]),
        StatsSnapshot::new(),
    );
    let end = snapshot(&[("Alice", 14, 700), ("Bob", 9, 300), ("Latecomer", 2, 40)]);

    let report = ReportComposer::new().compose(&pending, &end).expect("report");
    let players: Vec<&str> = report.rows().iter().map(|row| row.player()).collect();
    assert_eq!(players, ["Bob", "Alice"]);
    assert!(!report.text().contains("Latecomer"));
}

#[test]
fn deltas_match_snapshots_for_every_shared_player() {
    let start = snapshot(&[("Alice", 2, 100), ("Bob", 0, 0), ("Carol", 7, 7)]);
    let wave = snapshot(&[("Alice", 4, 200), ("Carol", 8, 9)]);
    let end = snapshot(&[("Alice", 5, 340), ("Bob", 1, 15), ("Carol", 9, 60)]);
    let pending = PendingReport::new(2, start.clone(), wave.clone());

    let report = ReportComposer::new().compose(&pending, &end).expect("report");
    for row in report.rows() {
        let start_stats = start.get(row.player()).expect("baseline entry");
        let end_stats = end.get(row.player()).expect("end entry");
        assert_eq!(row.round(), StatsDelta::between(start_stats, end_stats));
        assert_eq!(
            row.last_wave(),
            wave.get(row.player())
                .map(|wave_stats| StatsDelta::between(wave_stats, end_stats))
        );
    }
    assert_eq!(report.rows().len(), 3);
}

#[test]
fn ties_keep_name_order() {
    let pending = PendingReport::new(1, snapshot(&[("Zed", 0, 0), ("Amy", 0, 0)]), StatsSnapshot::new());
    let end = snapshot(&[("Zed", 3, 10), ("Amy", 3, 20)]);

    let report = ReportComposer::new().compose(&pending, &end).expect("report");
    let players: Vec<&str> = report.rows().iter().map(|row| row.player()).collect();
    assert_eq!(players, ["Amy", "Zed"]);
}
