use serde::{Deserialize, Serialize};

/// Progress status of a to-do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    YetToStart,
    WorkInProgress,
    Completed,
}

impl Status {
    /// Parse status from its stored value like "work-in-progress"
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "yet-to-start" => Some(Self::YetToStart),
            "work-in-progress" => Some(Self::WorkInProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Stored value of this status
    pub fn as_value(&self) -> &'static str {
        match self {
            Self::YetToStart => "yet-to-start",
            Self::WorkInProgress => "work-in-progress",
            Self::Completed => "completed",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::YetToStart => "Yet to start",
            Self::WorkInProgress => "Work in progress",
            Self::Completed => "Completed",
        }
    }

    /// Icon shown in front of a to-do
    pub fn icon(&self) -> &'static str {
        match self {
            Self::YetToStart => "✗",
            Self::WorkInProgress => "--",
            Self::Completed => "✓",
        }
    }

    /// Next status in selector order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Self::YetToStart => Self::WorkInProgress,
            Self::WorkInProgress => Self::Completed,
            Self::Completed => Self::YetToStart,
        }
    }

    pub fn all() -> &'static [Status] {
        &[Status::YetToStart, Status::WorkInProgress, Status::Completed]
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTodo,
    EditingText,
    EditingDetails,
    ConfirmDelete,
}

/// Light or dark appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

impl Appearance {
    pub fn from_value(value: &str) -> Self {
        match value {
            "dark" => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn as_value(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon for the toggle hint (shows what you switch to)
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Self::Light => "🌙",
            Self::Dark => "☀️",
        }
    }
}

/// Accent colour theme, cycled in a fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorTheme {
    #[default]
    Amethyst,
    Ocean,
    Forest,
}

impl ColorTheme {
    /// Unknown values fall back to the default theme
    pub fn from_value(value: &str) -> Self {
        match value {
            "theme-ocean" => Self::Ocean,
            "theme-forest" => Self::Forest,
            _ => Self::Amethyst,
        }
    }

    pub fn as_value(&self) -> &'static str {
        match self {
            Self::Amethyst => "theme-amethyst",
            Self::Ocean => "theme-ocean",
            Self::Forest => "theme-forest",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Amethyst => Self::Ocean,
            Self::Ocean => Self::Forest,
            Self::Forest => Self::Amethyst,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Amethyst => "🎨",
            Self::Ocean => "🌊",
            Self::Forest => "🌲",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Amethyst => "Amethyst",
            Self::Ocean => "Ocean",
            Self::Forest => "Forest",
        }
    }
}
