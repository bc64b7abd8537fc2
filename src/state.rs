use crate::catalog::ProductRecord;

/// The two flags the UI mutates. Only click handlers write them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub is_rotating: bool,
    pub current_product_index: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            is_rotating: true,
            current_product_index: 0,
        }
    }
}

/// Everything the storefront keeps between events.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub catalog: Vec<ProductRecord>,
    /// True when the catalog is the embedded fallback.
    pub catalog_degraded: bool,
    pub view: ViewState,
}

impl AppState {
    pub fn new(catalog: Vec<ProductRecord>, catalog_degraded: bool) -> Self {
        Self {
            catalog,
            catalog_degraded,
            view: ViewState::default(),
        }
    }

    /// Moves to the next product, wrapping at the end of the catalog.
    /// An empty catalog leaves the index alone.
    pub fn cycle_product(&mut self) -> Option<&ProductRecord> {
        if self.catalog.is_empty() {
            return None;
        }
        self.view.current_product_index = (self.view.current_product_index + 1) % self.catalog.len();
        self.catalog.get(self.view.current_product_index)
    }

    pub fn current_product(&self) -> Option<&ProductRecord> {
        self.catalog.get(self.view.current_product_index)
    }

    pub fn find_product(&self, id: &str) -> Option<&ProductRecord> {
        self.catalog.iter().find(|p| p.id == id)
    }

    pub fn toggle_rotation(&mut self) -> bool {
        self.view.is_rotating = !self.view.is_rotating;
        self.view.is_rotating
    }
}

pub fn rotate_button_label(is_rotating: bool) -> &'static str {
    if is_rotating { "Stop Rotate" } else { "Auto Rotate" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_catalog;

    #[test]
    fn cycling_a_full_lap_returns_to_start() {
        let mut state = AppState::new(fallback_catalog(), true);
        let n = state.catalog.len();
        for _ in 0..n {
            state.cycle_product();
        }
        assert_eq!(state.view.current_product_index, 0);
    }

    #[test]
    fn cycle_returns_next_product() {
        let mut state = AppState::new(fallback_catalog(), false);
        assert_eq!(state.cycle_product().map(|p| p.id.as_str()), Some("box_002"));
        assert_eq!(state.cycle_product().map(|p| p.id.as_str()), Some("box_003"));
        assert_eq!(state.cycle_product().map(|p| p.id.as_str()), Some("box_001"));
    }

    #[test]
    fn empty_catalog_does_not_cycle() {
        let mut state = AppState::default();
        assert!(state.cycle_product().is_none());
        assert_eq!(state.view.current_product_index, 0);
        assert!(state.current_product().is_none());
    }

    #[test]
    fn rotation_toggle_and_label() {
        let mut state = AppState::default();
        assert!(state.view.is_rotating);
        assert_eq!(rotate_button_label(state.view.is_rotating), "Stop Rotate");
        assert!(!state.toggle_rotation());
        assert_eq!(rotate_button_label(state.view.is_rotating), "Auto Rotate");
        assert!(state.toggle_rotation());
    }

    #[test]
    fn find_by_id() {
        let state = AppState::new(fallback_catalog(), false);
        assert_eq!(state.find_product("box_003").map(|p| p.name.as_str()), Some("Strong LEAP-S3 4K"));
        assert!(state.find_product("box_999").is_none());
    }
}
