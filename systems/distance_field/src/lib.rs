#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Backward breadth-first search over a time-expanded map.

use std::collections::VecDeque;

use rand::Rng;
use yatbbh_core::{CellCoord, GoalCandidate, PhaseCell};
use yatbbh_system_time_map::TimeMap;

/// Minimum number of ticks from every (cell, phase) state to a target cell.
///
/// Costs are stored as `ticks + 1` so that zero marks states from which the
/// target cannot be reached. The field owns its costs; the map it was built
/// from is only borrowed for the duration of the search.
#[derive(Clone, Debug, Default)]
pub struct DistanceField {
    width: u32,
    height: u32,
    period: u32,
    costs: Vec<u32>,
    farthest: Vec<PhaseCell>,
}

impl DistanceField {
    /// Runs the search from `target` over every phase of `map`.
    #[must_use]
    pub fn compute(map: &TimeMap, target: CellCoord) -> Self {
        let mut field = Self::default();
        field.recompute(map, target);
        field
    }

    /// Reruns the search in place, reusing the cost buffer.
    pub fn recompute(&mut self, map: &TimeMap, target: CellCoord) {
        self.width = map.width();
        self.height = map.height();
        self.period = map.period();
        self.farthest.clear();

        let state_count = self.width as usize * self.height as usize * self.period as usize;
        if self.costs.len() != state_count {
            self.costs = vec![0; state_count];
        } else {
            self.costs.fill(0);
        }

        let mut queue = VecDeque::new();
        for phase in 0..self.period {
            let state = PhaseCell::new(target, phase);
            if map.is_blocked(state) {
                continue;
            }
            let Some(index) = self.index(state) else {
                continue;
            };
            self.costs[index] = 1;
            queue.push_back(state);
        }

        let mut deepest = 0;
        while let Some(state) = queue.pop_front() {
            let Some(current) = self.index(state) else {
                continue;
            };
            let next_cost = self.costs[current] + 1;
            deepest = deepest.max(self.costs[current]);

            for (_, previous) in map.predecessors(state) {
                let Some(index) = self.index(previous) else {
                    continue;
                };
                if self.costs[index] != 0 {
                    continue;
                }
                self.costs[index] = next_cost;
                queue.push_back(previous);
            }
        }

        if deepest > 0 {
            self.farthest = self.states().filter(|state| self.cost(*state) == deepest).collect();
        }

        log::trace!(
            "distance field to ({}, {}): {} farthest states at {} ticks",
            target.column(),
            target.row(),
            self.farthest.len(),
            deepest.saturating_sub(1)
        );
    }

    /// Number of phases covered by the field.
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Minimum ticks from `state` to the target, or `None` when unreachable.
    #[must_use]
    pub fn ticks_to_target(&self, state: PhaseCell) -> Option<u32> {
        self.cost(state).checked_sub(1)
    }

    /// States in the last non-empty layer of the search.
    #[must_use]
    pub fn farthest(&self) -> &[PhaseCell] {
        &self.farthest
    }

    /// Largest finite distance in the field.
    #[must_use]
    pub fn max_ticks(&self) -> Option<u32> {
        let first = self.farthest.first()?;
        self.ticks_to_target(*first)
    }

    /// Picks one of the farthest states uniformly at random.
    ///
    /// Returns `None` when the target is blocked at every phase.
    pub fn goal_candidate<R: Rng>(&self, rng: &mut R) -> Option<GoalCandidate> {
        if self.farthest.is_empty() {
            return None;
        }
        let start = self.farthest[rng.gen_range(0..self.farthest.len())];
        Some(GoalCandidate {
            start,
            ticks: self.ticks_to_target(start)?,
            ties: u32::try_from(self.farthest.len()).ok()?,
        })
    }

    fn states(&self) -> impl Iterator<Item = PhaseCell> + '_ {
        (0..self.period).flat_map(move |phase| {
            (0..self.height).flat_map(move |row| {
                (0..self.width)
                    .map(move |column| PhaseCell::new(CellCoord::new(column, row), phase))
            })
        })
    }

    fn cost(&self, state: PhaseCell) -> u32 {
        self.index(state).map_or(0, |index| self.costs[index])
    }

    fn index(&self, state: PhaseCell) -> Option<usize> {
        if !state.cell.is_within(self.width, self.height) || state.phase >= self.period {
            return None;
        }
        let width = self.width as usize;
        let height = self.height as usize;
        Some(
            (state.phase as usize * height + state.cell.row() as usize) * width
                + state.cell.column() as usize,
        )
    }
}
