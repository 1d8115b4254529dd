//! Discovery tracker - which coordinates the agent has seen.

use grid_world::Coord;
use serde::{Deserialize, Serialize};

/// One-way "has been revealed" flag per coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryTracker {
    width: u32,
    height: u32,
    discovered: Vec<bool>,
}

impl DiscoveryTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            discovered: vec![false; width as usize * height as usize],
        }
    }

    /// Radius of the window revealed before the first action.
    ///
    /// `completeness` is capped to `[0, 1]`; the radius never drops below the
    /// vision range.
    pub fn initial_radius(completeness: f32, vision_range: u32, grid_width: u32) -> u32 {
        let completeness = completeness.clamp(0.0, 1.0);
        let scaled = (completeness * grid_width as f32).floor() as u32;
        scaled.max(vision_range)
    }

    fn cell(&self, coord: Coord) -> Option<usize> {
        (coord.x < self.width && coord.y < self.height)
            .then(|| coord.y as usize * self.width as usize + coord.x as usize)
    }

    /// Check if a coordinate is known. Always false outside the grid.
    pub fn is_discovered(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(|idx| self.discovered[idx])
    }

    /// Mark a coordinate as known. Returns true only on the first call.
    pub fn mark_discovered(&mut self, coord: Coord) -> bool {
        match self.cell(coord) {
            Some(idx) if !self.discovered[idx] => {
                self.discovered[idx] = true;
                true
            }
            _ => false,
        }
    }

    /// Mark the in-bounds part of the square window of `radius` around `center`.
    ///
    /// Returns the number of newly discovered coordinates.
    pub fn seed_window(&mut self, center: Coord, radius: u32) -> usize {
        let x_range = center.x.saturating_sub(radius)..=center.x.saturating_add(radius);
        let y_range = center.y.saturating_sub(radius)..=center.y.saturating_add(radius);

        let mut newly = 0;
        for y in y_range.clone() {
            if y >= self.height {
                break;
            }
            for x in x_range.clone() {
                if x >= self.width {
                    break;
                }
                if self.mark_discovered(Coord::new(x, y)) {
                    newly += 1;
                }
            }
        }
        newly
    }

    /// Number of discovered coordinates.
    pub fn discovered_count(&self) -> usize {
        self.discovered.iter().filter(|d| **d).count()
    }

    /// Discovered coordinates in row-major order.
    pub fn discovered(&self) -> impl Iterator<Item = Coord> + '_ {
        let width = self.width as usize;
        self.discovered
            .iter()
            .enumerate()
            .filter(|(_, known)| **known)
            .map(move |(idx, _)| Coord::new((idx % width) as u32, (idx / width) as u32))
    }
}
