//! Context menu model.

use crate::state::TrayState;

/// Clickable menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrayMenuItem {
    Show,
    PlayPause,
    Next,
    Previous,
    Quit,
}

/// One row of the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item(TrayMenuItem),
    Separator,
}

/// Menu rows, top to bottom.
pub const MENU_LAYOUT: [MenuEntry; 7] = [
    MenuEntry::Item(TrayMenuItem::Show),
    MenuEntry::Separator,
    MenuEntry::Item(TrayMenuItem::PlayPause),
    MenuEntry::Item(TrayMenuItem::Next),
    MenuEntry::Item(TrayMenuItem::Previous),
    MenuEntry::Separator,
    MenuEntry::Item(TrayMenuItem::Quit),
];

impl TrayMenuItem {
    /// Stable id used for native menu items
    pub fn id(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::PlayPause => "play_pause",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Quit => "quit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "show" => Some(Self::Show),
            "play_pause" => Some(Self::PlayPause),
            "next" => Some(Self::Next),
            "previous" => Some(Self::Previous),
            "quit" => Some(Self::Quit),
            _ => None,
        }
    }

    /// Text shown for this item in `state`.
    pub fn label(self, state: &TrayState) -> &'static str {
        match self {
            Self::Show => "Show High Tide",
            Self::PlayPause => state.play_pause_label(),
            Self::Next => "Next",
            Self::Previous => "Previous",
            Self::Quit => "Quit",
        }
    }

    /// Whether this item runs on left-click of the icon
    pub fn is_default(self) -> bool {
        self == Self::Show
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for entry in MENU_LAYOUT {
            if let MenuEntry::Item(item) = entry {
                assert_eq!(TrayMenuItem::from_id(item.id()), Some(item));
            }
        }
        assert_eq!(TrayMenuItem::from_id("settings"), None);
    }

    #[test]
    fn test_layout_labels() {
        let state = TrayState::derive(true, "Song", "Artist");
        let labels: Vec<&str> = MENU_LAYOUT
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item(item) => item.label(&state),
                MenuEntry::Separator => "-",
            })
            .collect();

        assert_eq!(
            labels,
            vec!["Show High Tide", "-", "Pause", "Next", "Previous", "-", "Quit"]
        );
    }

    #[test]
    fn test_play_pause_label_follows_state() {
        assert_eq!(TrayMenuItem::PlayPause.label(&TrayState::idle()), "Play");
    }

    #[test]
    fn test_only_show_is_default() {
        let defaults: Vec<_> = MENU_LAYOUT
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Item(item) if item.is_default() => Some(*item),
                _ => None,
            })
            .collect();
        assert_eq!(defaults, vec![TrayMenuItem::Show]);
    }
}
