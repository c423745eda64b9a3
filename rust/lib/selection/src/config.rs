use crate::item::SelectionMode;

/// Backing-store keys the store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConfig {
    /// Serialized item list.
    pub items: String,
    /// Single-mode selection (integer, `-1` for none).
    pub selected_id: String,
    /// Multi-mode selection (string set).
    pub selected_ids: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            items: "ItemList".to_string(),
            selected_id: "SelectedId".to_string(),
            selected_ids: "SelectedIds".to_string(),
        }
    }
}

/// Configuration for [`SelectionStore`](crate::SelectionStore).
///
/// Built with `Default` and adjusted through the `with_*` setters:
///
/// ```
/// use picklist::{SelectionMode, StoreConfig};
///
/// let config = StoreConfig::default()
///     .with_mode(SelectionMode::Single)
///     .with_seed_count(5);
/// assert_eq!(config.selection_key(), "SelectedId");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub mode: SelectionMode,
    /// Number of items synthesized when no valid list is stored. Values above
    /// `i32::MAX` are capped.
    pub seed_count: usize,
    pub keys: KeyConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Multi,
            seed_count: 20,
            keys: KeyConfig::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed_count(mut self, seed_count: usize) -> Self {
        self.seed_count = seed_count;
        self
    }

    pub fn with_keys(mut self, keys: KeyConfig) -> Self {
        self.keys = keys;
        self
    }

    /// The key holding the selection for the configured mode.
    pub fn selection_key(&self) -> &str {
        match self.mode {
            SelectionMode::Single => &self.keys.selected_id,
            SelectionMode::Multi => &self.keys.selected_ids,
        }
    }
}
