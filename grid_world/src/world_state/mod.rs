//! World state management - the grid holding terrain, entities and the agent.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::WorldError;
use crate::kinds::{EntityKind, TerrainKind};

/// Unique identifier for world instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub Uuid);

impl WorldId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for WorldId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A grid coordinate. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: u32,
    pub y: u32,
}

impl Coord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate.
    pub fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Shift by a delta. `None` if either axis would go negative or overflow.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Coord> {
        Some(Coord {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Read-only view of a world, as consumed by the knowledge graph.
pub trait WorldView {
    fn world_id(&self) -> WorldId;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Terrain at a coordinate, `None` outside the grid.
    fn terrain_at(&self, coord: Coord) -> Option<TerrainKind>;

    /// Entity at a coordinate, `None` outside the grid.
    fn entity_at(&self, coord: Coord) -> Option<EntityKind>;

    /// Current position of the agent.
    fn player_position(&self) -> Coord;

    fn within_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width() && coord.y < self.height()
    }
}

/// Energy saved by walking on a wood path.
pub const PATH_ENERGY_DISCOUNT: u32 = 2;

/// Every row of a layer must be exactly `width` cells long.
fn check_rows<T>(layer: &'static str, rows: &[Vec<T>], width: u32) -> Result<(), WorldError> {
    match rows.iter().position(|r| r.len() != width as usize) {
        Some(row) => Err(WorldError::RaggedRow {
            layer,
            row,
            expected: width as usize,
            actual: rows[row].len(),
        }),
        None => Ok(()),
    }
}

/// Serializable description of a world, one inner vector per grid row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldLayout {
    pub terrain: Vec<Vec<TerrainKind>>,
    /// Entity rows. Empty means no entities at all.
    #[serde(default)]
    pub entities: Vec<Vec<EntityKind>>,
    pub player: Coord,
}

/// The complete ground truth of one world instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGrid {
    id: WorldId,
    width: u32,
    height: u32,
    /// Row-major terrain layer.
    terrain: Vec<TerrainKind>,
    /// Row-major entity layer. The agent itself is never stored here.
    entities: Vec<EntityKind>,
    player: Coord,
}

impl WorldGrid {
    /// Create a world from row-major layers.
    pub fn new(
        width: u32,
        height: u32,
        terrain: Vec<TerrainKind>,
        entities: Vec<EntityKind>,
        player: Coord,
    ) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::EmptyGrid { width, height });
        }
        let cells = width as usize * height as usize;
        if terrain.len() != cells {
            return Err(WorldError::LayerSizeMismatch {
                layer: "terrain",
                expected: cells,
                actual: terrain.len(),
            });
        }
        if entities.len() != cells {
            return Err(WorldError::LayerSizeMismatch {
                layer: "entity",
                expected: cells,
                actual: entities.len(),
            });
        }

        let world = Self {
            id: WorldId::new(),
            width,
            height,
            terrain,
            entities,
            player,
        };

        let player_tile = world
            .entity_at(player)
            .ok_or(WorldError::OutOfBounds(player))?;
        if player_tile.blocks_movement() {
            return Err(WorldError::PlayerTileOccupied(player));
        }

        Ok(world)
    }

    /// Create a world covered by a single terrain kind and no entities.
    pub fn filled(
        width: u32,
        height: u32,
        kind: TerrainKind,
        player: Coord,
    ) -> Result<Self, WorldError> {
        let cells = width as usize * height as usize;
        Self::new(
            width,
            height,
            vec![kind; cells],
            vec![EntityKind::None; cells],
            player,
        )
    }

    /// Build a world from a row-based layout.
    pub fn from_layout(layout: WorldLayout) -> Result<Self, WorldError> {
        let height = layout.terrain.len() as u32;
        let width = layout.terrain.first().map_or(0, |row| row.len() as u32);
        let cells = width as usize * height as usize;

        check_rows("terrain", &layout.terrain, width)?;
        check_rows("entity", &layout.entities, width)?;

        let terrain: Vec<_> = layout.terrain.into_iter().flatten().collect();
        let entities = if layout.entities.is_empty() {
            vec![EntityKind::None; cells]
        } else {
            layout.entities.into_iter().flatten().collect()
        };

        Self::new(width, height, terrain, entities, layout.player)
    }

    /// Parse a TOML layout.
    pub fn from_toml_str(source: &str) -> Result<Self, WorldError> {
        let layout: WorldLayout = toml::from_str(source)?;
        Self::from_layout(layout)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.within_bounds(coord)
            .then(|| coord.y as usize * self.width as usize + coord.x as usize)
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Overwrite the terrain at a coordinate.
    pub fn set_terrain(&mut self, coord: Coord, kind: TerrainKind) -> Result<(), WorldError> {
        let idx = self.index(coord).ok_or(WorldError::OutOfBounds(coord))?;
        self.terrain[idx] = kind;
        Ok(())
    }

    /// Overwrite the entity at a coordinate.
    pub fn set_entity(&mut self, coord: Coord, kind: EntityKind) -> Result<(), WorldError> {
        let idx = self.index(coord).ok_or(WorldError::OutOfBounds(coord))?;
        self.entities[idx] = kind;
        Ok(())
    }

    /// Count tiles holding a given entity.
    pub fn count_entities(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| **e == kind).count()
    }

    /// Energy spent for a step taken from a coordinate. A wood path lowers
    /// the terrain cost by [`PATH_ENERGY_DISCOUNT`].
    pub fn energy_cost(&self, coord: Coord) -> Option<u32> {
        let idx = self.index(coord)?;
        let base = self.terrain[idx].energy_requirement();
        Some(match self.entities[idx] {
            EntityKind::WoodPath => base.saturating_sub(PATH_ENERGY_DISCOUNT),
            _ => base,
        })
    }

    /// Check if the agent may step onto a coordinate.
    pub fn is_move_valid(&self, coord: Coord) -> bool {
        self.entity_at(coord)
            .is_some_and(|entity| !entity.blocks_movement())
    }

    /// Move the agent by a delta. Returns whether the move happened.
    pub fn move_player(&mut self, dx: i32, dy: i32) -> bool {
        let Some(target) = self.player.offset(dx, dy) else {
            return false;
        };
        if !self.is_move_valid(target) {
            debug!(from = %self.player, to = %target, "move rejected");
            return false;
        }
        self.player = target;
        true
    }

    /// Lay a wood path on a dry, empty tile. Returns whether it was placed.
    pub fn place_path(&mut self, coord: Coord) -> Result<bool, WorldError> {
        let idx = self.index(coord).ok_or(WorldError::OutOfBounds(coord))?;
        if self.terrain[idx].is_water() || self.entities[idx] != EntityKind::None {
            return Ok(false);
        }
        self.entities[idx] = EntityKind::WoodPath;
        debug!(%coord, "path placed");
        Ok(true)
    }

    /// Drop a rock into water, raising it one level. Returns whether it was raised.
    pub fn drop_rock(&mut self, coord: Coord) -> Result<bool, WorldError> {
        let idx = self.index(coord).ok_or(WorldError::OutOfBounds(coord))?;
        let terrain = self.terrain[idx];
        if !terrain.is_water() {
            return Ok(false);
        }
        match terrain.elevated() {
            Some(raised) => {
                self.terrain[idx] = raised;
                debug!(%coord, from = %terrain, to = %raised, "terrain raised");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the entity at a coordinate, returning what was there.
    pub fn delete_entity(&mut self, coord: Coord) -> Result<EntityKind, WorldError> {
        let idx = self.index(coord).ok_or(WorldError::OutOfBounds(coord))?;
        Ok(std::mem::take(&mut self.entities[idx]))
    }
}

impl WorldView for WorldGrid {
    fn world_id(&self) -> WorldId {
        self.id
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn terrain_at(&self, coord: Coord) -> Option<TerrainKind> {
        self.index(coord).map(|idx| self.terrain[idx])
    }

    fn entity_at(&self, coord: Coord) -> Option<EntityKind> {
        self.index(coord).map(|idx| self.entities[idx])
    }

    fn player_position(&self) -> Coord {
        self.player
    }
}
