//! Agent mechanics: actions, resources, inventory and vitals.

use serde::{Deserialize, Serialize};

/// Resources the agent can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Wood,
    Stone,
}

/// Cardinal directions, in screen orientation (`Up` decreases `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Grid delta for one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// Everything the agent can do in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Move(Direction),
    /// Look around, revealing a window around the agent and resting.
    Scout,
    /// Spend one wood to lay a path on the current tile.
    BuildPath,
    /// Spend one stone to raise the water the agent stands in.
    PlaceRock,
    /// Harvest the resource on the adjacent tile.
    Collect(Direction),
}

impl Action {
    /// Number of distinct actions.
    pub const COUNT: usize = 11;

    /// Decode a policy output index.
    pub fn from_index(index: usize) -> Option<Action> {
        let action = match index {
            0 => Action::Move(Direction::Left),
            1 => Action::Move(Direction::Right),
            2 => Action::Move(Direction::Up),
            3 => Action::Move(Direction::Down),
            4 => Action::Scout,
            5 => Action::BuildPath,
            6 => Action::PlaceRock,
            7 => Action::Collect(Direction::Down),
            8 => Action::Collect(Direction::Up),
            9 => Action::Collect(Direction::Right),
            10 => Action::Collect(Direction::Left),
            _ => return None,
        };
        Some(action)
    }
}

/// Carried resources, each capped at `capacity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub wood: u32,
    pub stone: u32,
    pub capacity: u32,
}

impl Inventory {
    pub fn new(capacity: u32) -> Self {
        Self {
            wood: 0,
            stone: 0,
            capacity,
        }
    }

    pub fn amount(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Stone => self.stone,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Wood => &mut self.wood,
            Resource::Stone => &mut self.stone,
        }
    }

    /// Check if another unit of `resource` fits.
    pub fn has_room(&self, resource: Resource) -> bool {
        self.amount(resource) < self.capacity
    }

    /// Add one unit. Returns false when full.
    pub fn collect(&mut self, resource: Resource) -> bool {
        if !self.has_room(resource) {
            return false;
        }
        *self.slot(resource) += 1;
        true
    }

    /// Remove one unit. Returns false when empty.
    pub fn spend(&mut self, resource: Resource) -> bool {
        let slot = self.slot(resource);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Energy, hunger and thirst of the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    pub energy: i64,
    pub energy_max: i64,
    pub hunger: u32,
    pub thirst: u32,
    /// Hunger or thirst at this level exhausts the agent.
    pub hunger_thirst_max: u32,
}

impl Vitals {
    /// Energy restored by scouting.
    pub const REST_ENERGY: i64 = 20;

    pub fn new(energy_max: i64, hunger_thirst_max: u32) -> Self {
        Self {
            energy: energy_max,
            energy_max,
            hunger: 0,
            thirst: 0,
            hunger_thirst_max,
        }
    }

    /// Advance one step, paying the energy cost of the current tile.
    pub fn tick(&mut self, energy_cost: u32) {
        self.energy -= i64::from(energy_cost);
        self.hunger += 1;
        self.thirst += 1;
    }

    pub fn rest(&mut self) {
        self.energy = (self.energy + Self::REST_ENERGY).min(self.energy_max);
    }

    pub fn is_exhausted(&self) -> bool {
        self.energy <= 0
            || self.hunger >= self.hunger_thirst_max
            || self.thirst >= self.hunger_thirst_max
    }
}
