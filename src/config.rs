/// Front-end configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Show the selected piece's destinations before asking for the target.
    pub highlight_moves: bool,
    /// Print a JSON snapshot of the match after every committed move.
    pub snapshot_json: bool,
    /// Show captured pieces under the board.
    pub show_captured: bool,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from any variable source. Unset or unparsable
    /// values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| lookup(name).and_then(|v| parse_flag(&v));
        let defaults = AppConfig::default();
        AppConfig {
            highlight_moves: flag("CHESS_HIGHLIGHT").unwrap_or(defaults.highlight_moves),
            snapshot_json: flag("CHESS_SNAPSHOT_JSON").unwrap_or(defaults.snapshot_json),
            show_captured: flag("CHESS_SHOW_CAPTURED").unwrap_or(defaults.show_captured),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            highlight_moves: true,
            snapshot_json: false,
            show_captured: true,
        }
    }
}

/// Lenient boolean: `1/true/yes/on` and `0/false/no/off`, case-insensitive.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
