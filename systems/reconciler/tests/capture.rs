use round_recap_core::{Command, PlayerListEntry, PlayerStats};
use round_recap_system_reconciler::{Config, MatchThresholds, StatsReconciler};
use round_recap_world::{self as world, query, World};

const HEADER: [&str; 5] = ["§704/12/25", "", "§fRound 3", "§fZombies Left: §a12", ""];

fn sidebar(players: &[&str]) -> Vec<String> {
    HEADER
        .iter()
        .chain(players)
        .map(|line| (*line).to_owned())
        .chain(["".to_owned(), "§ewww.hypixel.net".to_owned()])
        .collect()
}

fn entry(name: &str, kills: Option<i32>, display: Option<&str>) -> PlayerListEntry {
    PlayerListEntry::new(name, kills, display.map(str::to_owned))
}

fn observed_world(lines: Vec<String>, entries: Vec<PlayerListEntry>) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetSidebarTitle {
            title: "§e§lZOMBIES".to_owned(),
        },
        &mut events,
    );
    world::apply(&mut world, Command::SetSidebarLines { lines }, &mut events);
    world::apply(&mut world, Command::SetPlayerList { entries }, &mut events);
    world
}

#[test]
fn keys_snapshot_by_canonical_names() {
    let world = observed_world(
        sidebar(&[
            "§7[MVP§c+§7] Alice§f: §6500",
            "carol§f: §6200",
            "§7BobBuilder§f: §6350",
        ]),
        vec![
            entry("Alice", Some(10), None),
            entry("BobBuilder", None, Some("§7BobBuilder §e6")),
            entry("Carol", Some(3), None),
        ],
    );

    let reconciler = StatsReconciler::default();
    let snapshot = reconciler.capture(query::sidebar_lines(&world), query::player_list(&world));

    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.get("Alice"), Some(PlayerStats::new(10, 500)));
    assert_eq!(snapshot.get("BobBuilder"), Some(PlayerStats::new(6, 350)));
    assert_eq!(snapshot.get("Carol"), Some(PlayerStats::new(3, 200)));
    assert_eq!(snapshot.get("carol"), None);
}

#[test]
fn full_width_row_with_thousands_separator() {
    let reconciler = StatsReconciler::default();
    let snapshot = reconciler.capture(
        &sidebar(&["Ali％e：1,234"]),
        &[entry("Ali％e", Some(0), None)],
    );
    assert_eq!(snapshot.get("Ali％e"), Some(PlayerStats::new(0, 1234)));
}

#[test]
fn header_rows_are_never_players() {
    let reconciler = StatsReconciler::default();
    let lines = ["Round: 3", "a", "b", "c", "d", "Round: 77"];
    let snapshot = reconciler.capture(&lines, &[entry("Round", Some(1), None)]);
    assert_eq!(snapshot.get("Round"), Some(PlayerStats::new(1, 77)));
}

#[test]
fn non_player_entries_are_excluded() {
    let reconciler = StatsReconciler::default();
    let snapshot = reconciler.capture(
        &sidebar(&["Alice: 10"]),
        &[
            entry("!npc-shopkeeper", Some(0), None),
            entry("Al", Some(1), None),
            entry("AVeryLongAccountName", Some(1), None),
            entry("Alice", Some(2), None),
        ],
    );
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get("Alice"), Some(PlayerStats::new(2, 10)));
}

#[test]
fn unmatched_players_default_to_zero() {
    let reconciler = StatsReconciler::default();
    let snapshot = reconciler.capture(
        &sidebar(&["Alice: 10", "§7: 99", "Bob DEAD"]),
        &[entry("Dave", None, None), entry("Eve", Some(-3), None)],
    );
    assert_eq!(snapshot.get("Dave"), Some(PlayerStats::new(0, 0)));
    assert_eq!(snapshot.get("Eve"), Some(PlayerStats::new(0, 0)));
}

#[test]
fn capture_is_idempotent() {
    let lines = sidebar(&["[VIP] Alice: 1,500", "Bob: 900"]);
    let entries = vec![entry("Alice", Some(4), None), entry("Bob", Some(9), None)];
    let reconciler = StatsReconciler::default();

    let first = reconciler.capture(&lines, &entries);
    let second = reconciler.capture(&lines, &entries);
    assert_eq!(first, second);
}

#[test]
fn configured_header_rows_and_thresholds_apply() {
    let reconciler = StatsReconciler::new(Config::new(
        0,
        3..=16,
        '!',
        MatchThresholds::new(30, 30, 0, 30),
    ));
    let snapshot = reconciler.capture(
        &["[MVP++] Erin ✦: 70"],
        &[entry("Erin", Some(1), None)],
    );
    assert_eq!(snapshot.get("Erin"), Some(PlayerStats::new(1, 0)));

    let lenient = StatsReconciler::new(Config::new(0, 3..=16, '!', MatchThresholds::default()));
    let snapshot = lenient.capture(&["Erin ✦: 70"], &[entry("Erin", Some(1), None)]);
    assert_eq!(snapshot.get("Erin"), Some(PlayerStats::new(1, 70)));
}
