/// Backend-reported state of one queued item.
///
/// `Unknown` is the default for URLs the backend has never reported,
/// including unrecognized and empty status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusKind {
    Queued,
    Downloading,
    Completed,
    Error,
    #[default]
    Unknown,
}

/// Background and text colors for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeStyle {
    pub background: &'static str,
    pub foreground: &'static str,
}

impl StatusKind {
    /// Parses a raw backend status string. Anything unrecognized maps to
    /// `Unknown`; an empty string is treated exactly like no status at all.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => StatusKind::Queued,
            "downloading" => StatusKind::Downloading,
            "completed" => StatusKind::Completed,
            "error" => StatusKind::Error,
            _ => StatusKind::Unknown,
        }
    }

    /// Badge label. `Unknown` renders blank rather than spelling itself out.
    pub fn badge_text(self) -> &'static str {
        match self {
            StatusKind::Queued => "queued",
            StatusKind::Downloading => "downloading",
            StatusKind::Completed => "completed",
            StatusKind::Error => "error",
            StatusKind::Unknown => "",
        }
    }

    /// Fixed status color table.
    pub fn badge_style(self) -> BadgeStyle {
        match self {
            StatusKind::Completed => BadgeStyle {
                background: "#1db954",
                foreground: "#fff",
            },
            StatusKind::Downloading => BadgeStyle {
                background: "#ffb300",
                foreground: "#222",
            },
            StatusKind::Queued => BadgeStyle {
                background: "#1976d2",
                foreground: "#fff",
            },
            StatusKind::Error => BadgeStyle {
                background: "#d32f2f",
                foreground: "#fff",
            },
            StatusKind::Unknown => BadgeStyle {
                background: "#eee",
                foreground: "#333",
            },
        }
    }
}
