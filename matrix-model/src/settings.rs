//! FILENAME: matrix-model/src/settings.rs
//! The host-supplied formatting settings bundle.
//!
//! Only the cards the transformation core consumes are modeled here;
//! purely visual cards (fonts, borders, colors) belong to the rendering
//! collaborator.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// ============================================================================
// EXPANSION CARD
// ============================================================================

/// Controls group expansion behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionCard {
    /// When true, a group's child rows render above its own summary row.
    #[serde(default)]
    pub expand_up: bool,

    /// Whether expand/collapse controls are offered at all.
    #[serde(default = "default_true")]
    pub enable_buttons: bool,

    /// Indentation step per nesting level, in pixels.
    #[serde(default)]
    pub indentation: u32,
}

impl Default for ExpansionCard {
    fn default() -> Self {
        ExpansionCard {
            expand_up: false,
            enable_buttons: true,
            indentation: 10,
        }
    }
}

// ============================================================================
// COLUMN CARD
// ============================================================================

/// Controls column presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCard {
    /// Whether the synthesized trailing Total column is shown. The column
    /// is still produced and counted when hidden.
    #[serde(default = "default_true")]
    pub enable_total: bool,
}

impl Default for ColumnCard {
    fn default() -> Self {
        ColumnCard { enable_total: true }
    }
}

// ============================================================================
// MEASURE SLOT COUNTER POLICY
// ============================================================================

/// Reset policy for the fallback measure-slot counter used when cells
/// omit their explicit slot index in a measures-only matrix.
///
/// `PerPopulate` carries the counter across rows within one population
/// call; `PerRow` restarts it on every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotCounterReset {
    PerPopulate,
    PerRow,
}

impl Default for SlotCounterReset {
    fn default() -> Self {
        SlotCounterReset::PerPopulate
    }
}

// ============================================================================
// SETTINGS BUNDLE
// ============================================================================

/// The formatting settings the core consumes, one bundle per refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattingSettings {
    #[serde(default)]
    pub expansion: ExpansionCard,

    #[serde(default)]
    pub column: ColumnCard,

    #[serde(default)]
    pub slot_counter: SlotCounterReset,
}

impl FormattingSettings {
    pub fn with_expand_up(mut self, expand_up: bool) -> Self {
        self.expansion.expand_up = expand_up;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = FormattingSettings::default();
        assert!(!settings.expansion.expand_up);
        assert!(settings.expansion.enable_buttons);
        assert!(settings.column.enable_total);
        assert_eq!(settings.slot_counter, SlotCounterReset::PerPopulate);
    }

    #[test]
    fn test_partial_bundle_deserializes() {
        // Hosts may omit cards entirely; every field defaults.
        let settings: FormattingSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, FormattingSettings::default());

        let settings: FormattingSettings = serde_json::from_str(
            r#"{"expansion":{"expand_up":true,"enable_buttons":false}}"#,
        )
        .unwrap();
        assert!(settings.expansion.expand_up);
        assert!(!settings.expansion.enable_buttons);
        assert_eq!(settings.expansion.indentation, 0);
    }

    #[test]
    fn test_partial_card_deserializes() {
        // Card members may be omitted individually too.
        let settings: FormattingSettings =
            serde_json::from_str(r#"{"expansion":{"expand_up":true}}"#).unwrap();
        assert!(settings.expansion.expand_up);
        assert!(settings.expansion.enable_buttons, "button toggle defaults on");

        let settings: FormattingSettings = serde_json::from_str(r#"{"column":{}}"#).unwrap();
        assert!(settings.column.enable_total, "total toggle defaults on");
    }
}
