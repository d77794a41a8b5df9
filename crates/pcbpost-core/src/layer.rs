//! Board layers handed to the external converter

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A PCB fabrication layer the converter can turn into G-code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardLayer {
    FrontCopper,
    BackCopper,
    FrontEngraving,
    BackEngraving,
    Outline,
    Drilling,
}

impl BoardLayer {
    /// All layers in conversion order
    pub const ALL: [BoardLayer; 6] = [
        BoardLayer::FrontCopper,
        BoardLayer::BackCopper,
        BoardLayer::FrontEngraving,
        BoardLayer::BackEngraving,
        BoardLayer::Outline,
        BoardLayer::Drilling,
    ];

    /// Converter flag that introduces this layer's input file
    pub fn mode_flag(self) -> &'static str {
        match self {
            Self::FrontCopper | Self::FrontEngraving => "--front",
            Self::BackCopper | Self::BackEngraving => "--back",
            Self::Outline => "--outline",
            Self::Drilling => "--drill",
        }
    }

    /// Whether the input is an Excellon drill file rather than Gerber
    pub fn is_drill(self) -> bool {
        matches!(self, Self::Drilling)
    }
}

impl std::fmt::Display for BoardLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FrontCopper => write!(f, "Front Copper"),
            Self::BackCopper => write!(f, "Back Copper"),
            Self::FrontEngraving => write!(f, "Front Engraving"),
            Self::BackEngraving => write!(f, "Back Engraving"),
            Self::Outline => write!(f, "Outline"),
            Self::Drilling => write!(f, "Drilling"),
        }
    }
}

/// Where a layer's input and converter settings come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSource {
    /// Layer being converted
    pub layer: BoardLayer,
    /// Converter settings file for this layer
    pub config_file: Option<PathBuf>,
    /// Input file name, relative to the project directory
    pub input_file: String,
}

impl LayerSource {
    pub fn new(layer: BoardLayer, config_file: Option<PathBuf>, input_file: impl Into<String>) -> Self {
        Self {
            layer,
            config_file,
            input_file: input_file.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_flags() {
        assert_eq!(BoardLayer::FrontCopper.mode_flag(), "--front");
        assert_eq!(BoardLayer::BackEngraving.mode_flag(), "--back");
        assert_eq!(BoardLayer::Outline.mode_flag(), "--outline");
        assert_eq!(BoardLayer::Drilling.mode_flag(), "--drill");
        assert!(BoardLayer::Drilling.is_drill());
        assert!(!BoardLayer::Outline.is_drill());
    }

    #[test]
    fn test_display() {
        assert_eq!(BoardLayer::FrontEngraving.to_string(), "Front Engraving");
        assert_eq!(BoardLayer::ALL.len(), 6);
    }
}
