use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, UnknownPanelTypeSnafu};

/// The mutually exclusive regions that can occupy the space below the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelType {
    /// Only the input bar is shown, resting on the bottom edge.
    #[default]
    None,
    /// The soft keyboard is up and the input bar rides on top of it.
    InputMethod,
    /// Hold-to-talk mode. Occupies no extra height.
    Voice,
    /// Emoji picker.
    Expression,
    /// Extra actions grid (photos, files, location...).
    More,
}

impl PanelType {
    pub const ALL: [PanelType; 5] = [
        PanelType::None,
        PanelType::InputMethod,
        PanelType::Voice,
        PanelType::Expression,
        PanelType::More,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::InputMethod => "input_method",
            Self::Voice => "voice",
            Self::Expression => "expression",
            Self::More => "more",
        }
    }

    /// Returns true for the panels that own a view slot below the input bar.
    pub fn has_attached_view(self) -> bool {
        matches!(self, Self::Expression | Self::More)
    }
}

impl fmt::Display for PanelType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for PanelType {
    type Err = PanelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|panel| panel.name() == normalized)
            .ok_or_else(|| {
                UnknownPanelTypeSnafu {
                    stage: "parse-panel-type",
                    name: raw.to_string(),
                }
                .build()
            })
    }
}
