use serde::Deserialize;

/// Per-section sampling budget of the home-page grid variant.
pub const HOME_GRID_PLACEMENT_BUDGET: usize = 100;

/// Upper bounds applied to untrusted parameters.
pub const MAX_CELLS_PER_AXIS: usize = 64;
pub const MAX_ATTEMPTS_LIMIT: usize = 1000;
pub const MAX_PLACEMENT_BUDGET: usize = 100_000;

/// How a container size becomes a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingPolicy {
    /// Longer axis gets exactly `cells_in_max_dimension` cells; square pixel cells.
    #[default]
    MaxDimension,
    /// `N x N` cells, each axis divided independently; cells may be non-square.
    EqualAxis,
}

/// All tunable parameters. Passed explicitly into every stage.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Params {
    // Grid size
    pub cells_in_max_dimension: usize,
    pub cells_in_max_dimension_mobile: usize,
    pub sizing: SizingPolicy,

    // Retry budgets
    pub max_attempts: usize,
    pub placement_budget: usize,

    // Routing
    pub avoid_other_destinations: bool,
    pub prefer_existing_paths: bool,

    // Placement
    pub block_adjacent_sections: bool,
    pub block_diagonal_adjacency: bool,

    // Consumed by the renderer, not the engine.
    pub resize_debounce_ms: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            cells_in_max_dimension: 10,
            cells_in_max_dimension_mobile: 5,
            sizing: SizingPolicy::MaxDimension,
            max_attempts: 50,
            placement_budget: 1000,
            avoid_other_destinations: true,
            prefer_existing_paths: true,
            block_adjacent_sections: true,
            block_diagonal_adjacency: false,
            resize_debounce_ms: 150,
        }
    }
}

impl Params {
    /// Settings of the home-page grid: equal-axis sizing and the smaller budget.
    pub fn home_grid() -> Self {
        Self {
            sizing: SizingPolicy::EqualAxis,
            placement_budget: HOME_GRID_PLACEMENT_BUDGET,
            ..Self::default()
        }
    }

    pub fn cells_per_axis(&self, is_mobile: bool) -> usize {
        let n = if is_mobile {
            self.cells_in_max_dimension_mobile
        } else {
            self.cells_in_max_dimension
        };
        n.max(1)
    }

    /// BFS when either routing heuristic is on, otherwise the L-shaped walk.
    pub fn uses_search(&self) -> bool {
        self.avoid_other_destinations || self.prefer_existing_paths
    }

    /// Clamp grid size and retry budgets to ranges that keep one run small.
    pub fn bounded(self) -> Self {
        Self {
            cells_in_max_dimension: self.cells_in_max_dimension.clamp(1, MAX_CELLS_PER_AXIS),
            cells_in_max_dimension_mobile: self
                .cells_in_max_dimension_mobile
                .clamp(1, MAX_CELLS_PER_AXIS),
            max_attempts: self.max_attempts.clamp(1, MAX_ATTEMPTS_LIMIT),
            placement_budget: self.placement_budget.min(MAX_PLACEMENT_BUDGET),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let p: Params =
            serde_json::from_str(r#"{"max_attempts": 7, "sizing": "equal_axis"}"#).unwrap();
        assert_eq!(p.max_attempts, 7);
        assert_eq!(p.sizing, SizingPolicy::EqualAxis);
        assert_eq!(p.placement_budget, 1000);
        assert!(p.avoid_other_destinations);
        assert!(!p.block_diagonal_adjacency);
    }

    #[test]
    fn search_is_disabled_only_when_both_heuristics_are_off() {
        let mut p = Params::default();
        assert!(p.uses_search());
        p.avoid_other_destinations = false;
        assert!(p.uses_search());
        p.prefer_existing_paths = false;
        assert!(!p.uses_search());
    }

    #[test]
    fn bounded_clamps_oversized_requests() {
        let p: Params = serde_json::from_str(
            r#"{"cells_in_max_dimension": 1000000, "max_attempts": 0, "placement_budget": 99999999}"#,
        )
        .unwrap();
        let p = p.bounded();
        assert_eq!(p.cells_in_max_dimension, MAX_CELLS_PER_AXIS);
        assert_eq!(p.cells_in_max_dimension_mobile, 5);
        assert_eq!(p.max_attempts, 1);
        assert_eq!(p.placement_budget, MAX_PLACEMENT_BUDGET);

        let defaults = Params::default().bounded();
        assert_eq!(defaults.cells_in_max_dimension, 10);
        assert_eq!(defaults.max_attempts, 50);
        assert_eq!(defaults.placement_budget, 1000);
    }

    #[test]
    fn cell_count_never_zero() {
        let p = Params {
            cells_in_max_dimension_mobile: 0,
            ..Params::default()
        };
        assert_eq!(p.cells_per_axis(true), 1);
        assert_eq!(p.cells_per_axis(false), 10);
        assert_eq!(Params::home_grid().placement_budget, 100);
    }
}
