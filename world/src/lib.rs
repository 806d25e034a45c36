#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative record of the game surface observed by the round recap.
//!
//! The world never interprets stats itself. It stores the latest sidebar and
//! player list exactly as the client reported them and derives whether the
//! minigame session banner is currently visible.

use round_recap_core::{text, Command, Event, PlayerListEntry};

/// Sidebar titles that identify the minigame session, one per client locale.
pub const DEFAULT_SESSION_MARKERS: [&str; 3] = ["ZOMBIES", "僵尸末日", "殭屍末日"];

/// Scoreboard sidebar as last reported by the client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sidebar {
    title: String,
    lines: Vec<String>,
}

impl Sidebar {
    /// Raw title text including formatting codes.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw rows from top to bottom.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Represents the observed game surface.
#[derive(Debug)]
pub struct World {
    sidebar: Option<Sidebar>,
    player_list: Vec<PlayerListEntry>,
    session_markers: Vec<String>,
    in_session: bool,
}

impl World {
    /// Creates an empty world that recognises the default session markers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_session_markers(DEFAULT_SESSION_MARKERS.iter().map(|marker| (*marker).to_owned()))
    }

    /// Creates an empty world recognising the provided sidebar title markers.
    #[must_use]
    pub fn with_session_markers<I>(markers: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            sidebar: None,
            player_list: Vec::new(),
            session_markers: markers.into_iter().collect(),
            in_session: false,
        }
    }

    fn sidebar_mut(&mut self) -> &mut Sidebar {
        self.sidebar.get_or_insert_with(Sidebar::default)
    }

    fn refresh_presence(&mut self, out_events: &mut Vec<Event>) {
        let in_session = self.sidebar.as_ref().is_some_and(|sidebar| {
            let title = text::strip_formatting(&sidebar.title);
            self.session_markers
                .iter()
                .any(|marker| title.contains(marker.as_str()))
        });

        if in_session != self.in_session {
            self.in_session = in_session;
            out_events.push(Event::SessionPresenceChanged { in_session });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetSidebarTitle { title } => {
            world.sidebar_mut().title = title;
            world.refresh_presence(out_events);
        }
        Command::SetSidebarLines { lines } => {
            let line_count = lines.len();
            world.sidebar_mut().lines = lines;
            out_events.push(Event::SidebarUpdated { line_count });
        }
        Command::SetPlayerList { entries } => {
            let entry_count = entries.len();
            world.player_list = entries;
            out_events.push(Event::PlayerListUpdated { entry_count });
        }
        Command::ClearSidebar => {
            if world.sidebar.take().is_some() {
                out_events.push(Event::SidebarUpdated { line_count: 0 });
            }
            world.refresh_presence(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Sidebar, World};
    use round_recap_core::PlayerListEntry;

    /// Provides read-only access to the sidebar, if one is displayed.
    #[must_use]
    pub fn sidebar(world: &World) -> Option<&Sidebar> {
        world.sidebar.as_ref()
    }

    /// Rows of the sidebar, empty when no sidebar is displayed.
    #[must_use]
    pub fn sidebar_lines(world: &World) -> &[String] {
        world
            .sidebar
            .as_ref()
            .map(Sidebar::lines)
            .unwrap_or_default()
    }

    /// Provides read-only access to the player list entries.
    #[must_use]
    pub fn player_list(world: &World) -> &[PlayerListEntry] {
        &world.player_list
    }

    /// Reports whether the minigame session banner is visible.
    #[must_use]
    pub fn in_session(world: &World) -> bool {
        world.in_session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(world: &mut World, title: &str) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::SetSidebarTitle {
                title: title.to_owned(),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn formatted_title_enters_session() {
        let mut world = World::new();
        let events = title(&mut world, "§e§lZOMBIES");
        assert!(query::in_session(&world));
        assert_eq!(events, vec![Event::SessionPresenceChanged { in_session: true }]);
    }

    #[test]
    fn localized_titles_are_recognised() {
        let mut world = World::new();
        let _ = title(&mut world, "§e§l僵尸末日");
        assert!(query::in_session(&world));

        let mut world = World::new();
        let _ = title(&mut world, "殭屍末日");
        assert!(query::in_session(&world));
    }

    #[test]
    fn unchanged_presence_emits_nothing() {
        let mut world = World::new();
        let _ = title(&mut world, "ZOMBIES");
        assert!(title(&mut world, "§cZOMBIES").is_empty());
    }

    #[test]
    fn clearing_sidebar_leaves_session() {
        let mut world = World::new();
        let _ = title(&mut world, "ZOMBIES");

        let mut events = Vec::new();
        apply(&mut world, Command::ClearSidebar, &mut events);

        assert!(!query::in_session(&world));
        assert!(query::sidebar(&world).is_none());
        assert!(query::sidebar_lines(&world).is_empty());
        assert_eq!(
            events,
            vec![
                Event::SidebarUpdated { line_count: 0 },
                Event::SessionPresenceChanged { in_session: false },
            ]
        );
    }

    #[test]
    fn custom_markers_replace_defaults() {
        let mut world = World::with_session_markers(["ARCADE".to_owned()]);
        let _ = title(&mut world, "ZOMBIES");
        assert!(!query::in_session(&world));
        let _ = title(&mut world, "§bARCADE GAMES");
        assert!(query::in_session(&world));
    }
}
