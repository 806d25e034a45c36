//! Recorded sessions replayed frame by frame.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use round_recap_core::{Command, PlayerListEntry, TitleSignal};
use round_recap_system_timing::MapKind;
use serde::Deserialize;

const DEFAULT_TICK_MS: u64 = 50;

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

/// A recorded session: observed surfaces and round titles between runs of ticks.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Script {
    /// Virtual milliseconds that elapse per tick.
    #[serde(default = "default_tick_ms")]
    pub(crate) tick_ms: u64,
    /// Map whose timing table drives wave estimation.
    #[serde(default)]
    pub(crate) map: Option<MapKind>,
    #[serde(default, rename = "frame")]
    pub(crate) frames: Vec<Frame>,
}

/// One step of a recorded session.
///
/// Surface changes apply first, then the round title, then `ticks` client ticks.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Frame {
    clear_sidebar: bool,
    sidebar_title: Option<String>,
    sidebar: Option<Vec<String>>,
    players: Option<Vec<PlayerRow>>,
    title: Option<u32>,
    pub(crate) ticks: u32,
    pub(crate) tracker_enabled: Option<bool>,
    pub(crate) debug_enabled: Option<bool>,
    pub(crate) chat_messages_enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlayerRow {
    name: String,
    #[serde(default)]
    kills: Option<i32>,
    #[serde(default)]
    display: Option<String>,
}

impl Script {
    /// Reads and validates a script from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read replay script at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid replay script {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let script: Script =
            toml::from_str(contents).context("failed to parse replay script toml contents")?;
        if script.tick_ms == 0 {
            bail!("tick_ms must be at least 1");
        }
        Ok(script)
    }
}

impl Frame {
    /// World commands describing this frame's surface changes, in application order.
    pub(crate) fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.clear_sidebar {
            commands.push(Command::ClearSidebar);
        }
        if let Some(title) = &self.sidebar_title {
            commands.push(Command::SetSidebarTitle {
                title: title.clone(),
            });
        }
        if let Some(lines) = &self.sidebar {
            commands.push(Command::SetSidebarLines {
                lines: lines.clone(),
            });
        }
        if let Some(players) = &self.players {
            commands.push(Command::SetPlayerList {
                entries: players.iter().map(PlayerRow::entry).collect(),
            });
        }
        commands
    }

    /// Round title shown during this frame, if one appeared.
    pub(crate) fn title_signal(&self) -> Option<TitleSignal> {
        self.title.map(TitleSignal::from_round)
    }
}

impl PlayerRow {
    fn entry(&self) -> PlayerListEntry {
        PlayerListEntry::new(self.name.clone(), self.kills, self.display.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_translate_into_ordered_commands() {
        let script = Script::parse(
            r#"
            map = "prison"

            [[frame]]
            clear_sidebar = true
            sidebar_title = "ZOMBIES"
            sidebar = ["header", "Alice: 10"]
            players = [{ name = "Alice", kills = 3 }, { name = "Bob", display = "Bob 7" }]
            title = 2
            ticks = 5
            "#,
        )
        .expect("valid script");

        assert_eq!(script.tick_ms, DEFAULT_TICK_MS);
        assert_eq!(script.map, Some(MapKind::Prison));
        assert_eq!(script.frames.len(), 1);

        let frame = &script.frames[0];
        assert_eq!(frame.ticks, 5);
        assert_eq!(frame.title_signal(), Some(TitleSignal::Round(2)));
        assert_eq!(
            frame.commands(),
            vec![
                Command::ClearSidebar,
                Command::SetSidebarTitle {
                    title: "ZOMBIES".to_owned()
                },
                Command::SetSidebarLines {
                    lines: vec!["header".to_owned(), "Alice: 10".to_owned()]
                },
                Command::SetPlayerList {
                    entries: vec![
                        PlayerListEntry::new("Alice", Some(3), None),
                        PlayerListEntry::new("Bob", None, Some("Bob 7".to_owned())),
                    ]
                },
            ]
        );
    }

    #[test]
    fn round_zero_title_ends_the_game() {
        let script = Script::parse("[[frame]]\ntitle = 0").expect("valid script");
        assert_eq!(script.frames[0].title_signal(), Some(TitleSignal::GameEnded));
        assert!(script.frames[0].commands().is_empty());
    }

    #[test]
    fn rejects_invalid_scripts() {
        assert!(Script::parse("tick_ms = 0").is_err());
        assert!(Script::parse("[[frame]]\nunknown = true").is_err());
        assert!(Script::parse("map = \"castle\"").is_err());
    }
}
