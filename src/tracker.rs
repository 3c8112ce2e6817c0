//! Route progress: which places of the active route are done and which one is next.
//!
//! Selecting a route resets progress. Completing the current place moves the
//! pointer forward; completing or uncompleting any other place leaves it alone.

use std::collections::BTreeSet;

use crate::model::{Place, Route};

#[derive(Debug, Clone, Default)]
pub struct RouteTracker {
    route: Option<Route>,
    completed: BTreeSet<usize>,
    current: usize,
}

impl RouteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active route and reset progress.
    pub fn select_route(&mut self, route: Route) {
        self.route = Some(route);
        self.completed.clear();
        self.current = 0;
    }

    /// Drop the active route.
    pub fn clear(&mut self) {
        self.route = None;
        self.completed.clear();
        self.current = 0;
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn total_places(&self) -> usize {
        self.route.as_ref().map(Route::len).unwrap_or(0)
    }

    /// Mark `index` complete. Returns false for out-of-range indices.
    ///
    /// If `index` is the current place and not the last one, the current
    /// pointer advances by one.
    pub fn complete_place(&mut self, index: usize) -> bool {
        let total = self.total_places();
        if index >= total {
            return false;
        }
        self.completed.insert(index);
        if index == self.current && index + 1 < total {
            self.current += 1;
        }
        true
    }

    /// Complete the first place called `name`; returns its index.
    pub fn complete_place_named(&mut self, name: &str) -> Option<usize> {
        let index = self
            .route
            .as_ref()?
            .places
            .iter()
            .position(|p| p.name == name)?;
        self.complete_place(index);
        Some(index)
    }

    /// Mark `index` incomplete. The current pointer does not move.
    pub fn uncomplete_place(&mut self, index: usize) -> bool {
        self.completed.remove(&index)
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The place the family should visit next.
    pub fn current_place(&self) -> Option<&Place> {
        self.route.as_ref()?.places.get(self.current)
    }

    /// Completed places in route order.
    pub fn completed_places(&self) -> Vec<&Place> {
        match &self.route {
            Some(route) => self
                .completed
                .iter()
                .filter_map(|&i| route.places.get(i))
                .collect(),
            None => Vec::new(),
        }
    }

    /// `round(100 * completed / total)`, 0 for an empty or missing route.
    pub fn progress_percent(&self) -> u8 {
        let total = self.total_places();
        if total == 0 {
            return 0;
        }
        (100.0 * self.completed.len() as f64 / total as f64).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        let total = self.total_places();
        total > 0 && self.completed.len() == total
    }
}
