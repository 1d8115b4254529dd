//! Agent controller - applies actions to the world, then mirrors each
//! outcome in the knowledge graph.

use grid_world::{
    Action, Coord, Direction, Inventory, Resource, Vitals, WorldGrid, WorldView,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SpatialMemoryConfig;
use crate::error::AgentError;
use crate::knowledge_base::KnowledgeGraph;

/// What an action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Moved(Coord),
    Blocked,
    Scouted { newly_discovered: usize },
    PathBuilt(Coord),
    RockPlaced(Coord),
    Collected(Resource),
    /// Preconditions were not met; nothing changed apart from vitals.
    Skipped,
    /// The agent ran out of energy, food or water before acting.
    Exhausted,
}

/// One agent living in one world, with its own knowledge graph.
#[derive(Debug, Clone)]
pub struct AgentController {
    world: WorldGrid,
    graph: KnowledgeGraph,
    inventory: Inventory,
    vitals: Vitals,
    vision_range: u32,
    running: bool,
}

impl AgentController {
    pub fn new(world: WorldGrid, config: &SpatialMemoryConfig) -> Result<Self, AgentError> {
        let graph = KnowledgeGraph::new(&world, &config.memory)?;
        Ok(Self {
            world,
            graph,
            inventory: Inventory::new(config.agent.resource_max),
            vitals: Vitals::new(config.agent.energy_max, config.agent.hunger_thirst_max),
            vision_range: config.memory.vision_range,
            running: true,
        })
    }

    /// Pay the cost of the current tile, then act unless exhausted.
    pub fn step(&mut self, action: Action) -> Result<ActionOutcome, AgentError> {
        if !self.running {
            return Ok(ActionOutcome::Exhausted);
        }

        let cost = self
            .world
            .energy_cost(self.world.player_position())
            .unwrap_or(0);
        self.vitals.tick(cost);
        if self.vitals.is_exhausted() {
            self.running = false;
            debug!(vitals = ?self.vitals, "agent exhausted");
            return Ok(ActionOutcome::Exhausted);
        }

        self.perform(action)
    }

    /// Execute an action without touching vitals.
    pub fn perform(&mut self, action: Action) -> Result<ActionOutcome, AgentError> {
        let outcome = match action {
            Action::Move(direction) => self.move_agent(direction)?,
            Action::Scout => self.scout()?,
            Action::BuildPath => self.build_path()?,
            Action::PlaceRock => self.place_rock()?,
            Action::Collect(direction) => self.collect_resource(direction)?,
        };
        debug!(?action, ?outcome, "action performed");
        Ok(outcome)
    }

    fn move_agent(&mut self, direction: Direction) -> Result<ActionOutcome, AgentError> {
        let (dx, dy) = direction.delta();
        if !self.world.move_player(dx, dy) {
            return Ok(ActionOutcome::Blocked);
        }
        let position = self.world.player_position();
        self.graph.move_player(position)?;
        Ok(ActionOutcome::Moved(position))
    }

    /// Reveal the square window of twice the vision range and rest.
    fn scout(&mut self) -> Result<ActionOutcome, AgentError> {
        self.vitals.rest();

        let center = self.world.player_position();
        let reach = self.vision_range.saturating_mul(2);
        let x_max = center.x.saturating_add(reach).min(self.world.width() - 1);
        let y_max = center.y.saturating_add(reach).min(self.world.height() - 1);

        let mut newly_discovered = 0;
        for y in center.y.saturating_sub(reach)..=y_max {
            for x in center.x.saturating_sub(reach)..=x_max {
                if self.graph.discover(Coord::new(x, y))? {
                    newly_discovered += 1;
                }
            }
        }
        Ok(ActionOutcome::Scouted { newly_discovered })
    }

    fn build_path(&mut self) -> Result<ActionOutcome, AgentError> {
        let here = self.world.player_position();
        if self.inventory.amount(Resource::Wood) == 0 {
            return Ok(ActionOutcome::Skipped);
        }
        if !self.world.place_path(here)? {
            return Ok(ActionOutcome::Skipped);
        }
        self.inventory.spend(Resource::Wood);
        self.graph.build_path(&self.world, here)?;
        Ok(ActionOutcome::PathBuilt(here))
    }

    fn place_rock(&mut self) -> Result<ActionOutcome, AgentError> {
        let here = self.world.player_position();
        if self.inventory.amount(Resource::Stone) == 0 {
            return Ok(ActionOutcome::Skipped);
        }
        if !self.world.drop_rock(here)? {
            return Ok(ActionOutcome::Skipped);
        }
        self.inventory.spend(Resource::Stone);
        self.graph.elevate_terrain(here)?;
        Ok(ActionOutcome::RockPlaced(here))
    }

    fn collect_resource(&mut self, direction: Direction) -> Result<ActionOutcome, AgentError> {
        let (dx, dy) = direction.delta();
        let Some(target) = self.world.player_position().offset(dx, dy) else {
            return Ok(ActionOutcome::Skipped);
        };
        let Some(resource) = self.world.entity_at(target).and_then(|e| e.yields()) else {
            return Ok(ActionOutcome::Skipped);
        };
        if !self.inventory.has_room(resource) {
            return Ok(ActionOutcome::Skipped);
        }

        self.world.delete_entity(target)?;
        self.inventory.collect(resource);
        self.graph.remove_entity(target)?;
        Ok(ActionOutcome::Collected(resource))
    }

    pub fn world(&self) -> &WorldGrid {
        &self.world
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::NodeKey;
    use grid_world::{EntityKind, TerrainKind};

    fn controller(world: WorldGrid) -> AgentController {
        AgentController::new(world, &SpatialMemoryConfig::default()).unwrap()
    }

    fn player_distance(graph: &KnowledgeGraph, coord: Coord) -> u32 {
        let entity = graph.lookup(NodeKey::Entity(coord)).unwrap();
        let (slot, _) = graph.index().edge_slots(entity, graph.player_node()).unwrap();
        graph.store().edge(slot).distance
    }

    #[test]
    fn test_collect_then_build_path() {
        let mut world = WorldGrid::filled(5, 5, TerrainKind::Plains, Coord::new(2, 2)).unwrap();
        world.set_entity(Coord::new(3, 2), EntityKind::Tree).unwrap();
        let mut agent = controller(world);

        let outcome = agent.perform(Action::Collect(Direction::Right)).unwrap();
        assert_eq!(outcome, ActionOutcome::Collected(Resource::Wood));
        assert_eq!(agent.inventory().wood, 1);
        assert!(!agent.graph().node_at(NodeKey::Entity(Coord::new(3, 2))).unwrap().active);

        let outcome = agent.perform(Action::BuildPath).unwrap();
        assert_eq!(outcome, ActionOutcome::PathBuilt(Coord::new(2, 2)));
        assert_eq!(agent.inventory().wood, 0);

        let graph = agent.graph();
        let here = Coord::new(2, 2);
        let path = graph.lookup(NodeKey::Entity(here)).unwrap();
        let ground = graph.lookup(NodeKey::Terrain(here)).unwrap();
        assert!(graph.is_node_active(path));
        assert_eq!(graph.node(path).type_id, EntityKind::WoodPath.code());
        let (slot, _) = graph.index().edge_slots(path, ground).unwrap();
        assert!(graph.store().edge(slot).active);
        assert!(graph.inconsistent_edges().is_empty());
    }

    #[test]
    fn test_build_path_without_wood() {
        let world = WorldGrid::filled(3, 3, TerrainKind::Plains, Coord::new(1, 1)).unwrap();
        let mut agent = controller(world);

        assert_eq!(agent.perform(Action::BuildPath).unwrap(), ActionOutcome::Skipped);
        assert_eq!(agent.world().entity_at(Coord::new(1, 1)), Some(EntityKind::None));
    }

    #[test]
    fn test_move_updates_graph() {
        let mut world = WorldGrid::filled(5, 5, TerrainKind::Plains, Coord::new(2, 2)).unwrap();
        world.set_entity(Coord::new(1, 1), EntityKind::Tree).unwrap();
        world.set_entity(Coord::new(3, 3), EntityKind::MossyRock).unwrap();
        world.set_entity(Coord::new(3, 1), EntityKind::SnowyRock).unwrap();
        let mut agent = controller(world);

        let outcome = agent.perform(Action::Move(Direction::Down)).unwrap();
        assert_eq!(outcome, ActionOutcome::Moved(Coord::new(2, 3)));

        let graph = agent.graph();
        assert_eq!(graph.player_position(), Coord::new(2, 3));
        assert_eq!(player_distance(graph, Coord::new(1, 1)), 3);
        assert_eq!(player_distance(graph, Coord::new(3, 3)), 1);
        assert_eq!(player_distance(graph, Coord::new(3, 1)), 3);
    }

    #[test]
    fn test_move_blocked_by_entity() {
        let mut world = WorldGrid::filled(3, 3, TerrainKind::Plains, Coord::new(1, 1)).unwrap();
        world.set_entity(Coord::new(0, 1), EntityKind::Outpost).unwrap();
        let mut agent = controller(world);

        assert_eq!(
            agent.perform(Action::Move(Direction::Left)).unwrap(),
            ActionOutcome::Blocked
        );
        assert_eq!(agent.graph().player_position(), Coord::new(1, 1));
    }

    #[test]
    fn test_scout_reveals_double_vision() {
        let world = WorldGrid::filled(9, 9, TerrainKind::Hills, Coord::new(4, 4)).unwrap();
        let mut agent = controller(world);
        assert_eq!(agent.graph().discovery().discovered_count(), 9);

        let outcome = agent.perform(Action::Scout).unwrap();
        assert_eq!(outcome, ActionOutcome::Scouted { newly_discovered: 16 });
        assert_eq!(agent.graph().discovery().discovered_count(), 25);

        let again = agent.perform(Action::Scout).unwrap();
        assert_eq!(again, ActionOutcome::Scouted { newly_discovered: 0 });
    }

    #[test]
    fn test_place_rock_raises_water() {
        let mut world = WorldGrid::filled(3, 3, TerrainKind::Plains, Coord::new(1, 1)).unwrap();
        world.set_terrain(Coord::new(1, 1), TerrainKind::Water).unwrap();
        world.set_entity(Coord::new(1, 2), EntityKind::MossyRock).unwrap();
        let mut agent = controller(world);

        assert_eq!(agent.perform(Action::PlaceRock).unwrap(), ActionOutcome::Skipped);
        assert_eq!(
            agent.perform(Action::Collect(Direction::Down)).unwrap(),
            ActionOutcome::Collected(Resource::Stone)
        );
        assert_eq!(
            agent.perform(Action::PlaceRock).unwrap(),
            ActionOutcome::RockPlaced(Coord::new(1, 1))
        );

        assert_eq!(agent.world().terrain_at(Coord::new(1, 1)), Some(TerrainKind::Plains));
        assert_eq!(agent.graph().terrain_kind_at(Coord::new(1, 1)), Some(TerrainKind::Plains));
        assert_eq!(agent.inventory().stone, 0);
    }

    #[test]
    fn test_collect_respects_capacity() {
        let mut world = WorldGrid::filled(3, 1, TerrainKind::Plains, Coord::new(1, 0)).unwrap();
        world.set_entity(Coord::new(0, 0), EntityKind::Tree).unwrap();
        world.set_entity(Coord::new(2, 0), EntityKind::Tree).unwrap();
        let config = SpatialMemoryConfig::from_toml_str("[agent]\nresource_max = 1\n").unwrap();
        let mut agent = AgentController::new(world, &config).unwrap();

        assert_eq!(
            agent.perform(Action::Collect(Direction::Left)).unwrap(),
            ActionOutcome::Collected(Resource::Wood)
        );
        assert_eq!(
            agent.perform(Action::Collect(Direction::Right)).unwrap(),
            ActionOutcome::Skipped
        );
        assert_eq!(agent.world().entity_at(Coord::new(2, 0)), Some(EntityKind::Tree));
        assert_eq!(
            agent.perform(Action::Collect(Direction::Up)).unwrap(),
            ActionOutcome::Skipped
        );
    }

    #[test]
    fn test_path_lowers_step_cost() {
        let mut world = WorldGrid::filled(3, 3, TerrainKind::Plains, Coord::new(1, 1)).unwrap();
        world.set_entity(Coord::new(1, 0), EntityKind::Tree).unwrap();
        let mut agent = controller(world);

        agent.step(Action::Collect(Direction::Up)).unwrap();
        assert_eq!(agent.vitals().energy, 96);

        agent.step(Action::BuildPath).unwrap();
        assert_eq!(agent.vitals().energy, 92);

        // Standing on the path now costs 4 - 2.
        agent.step(Action::PlaceRock).unwrap();
        assert_eq!(agent.vitals().energy, 90);
    }

    #[test]
    fn test_scout_with_huge_vision_range() {
        let world = WorldGrid::filled(4, 3, TerrainKind::Plains, Coord::new(3, 2)).unwrap();
        let config =
            SpatialMemoryConfig::from_toml_str("[memory]\nvision_range = 1000000\n").unwrap();
        let mut agent = AgentController::new(world, &config).unwrap();

        // The initial window already covers the whole grid.
        assert_eq!(agent.graph().discovery().discovered_count(), 12);
        assert_eq!(
            agent.perform(Action::Scout).unwrap(),
            ActionOutcome::Scouted { newly_discovered: 0 }
        );
    }

    #[test]
    fn test_scout_clipped_at_corner() {
        let world = WorldGrid::filled(6, 6, TerrainKind::Plains, Coord::new(5, 5)).unwrap();
        let mut agent = controller(world);

        // 2x2 known at the corner, scouting reaches a 3x3 corner block.
        assert_eq!(
            agent.perform(Action::Scout).unwrap(),
            ActionOutcome::Scouted { newly_discovered: 5 }
        );
        assert!(agent.graph().is_discovered(Coord::new(3, 3)));
        assert!(!agent.graph().is_discovered(Coord::new(2, 5)));
    }

    #[test]
    fn test_step_until_exhausted() {
        let world = WorldGrid::filled(3, 3, TerrainKind::DeepWater, Coord::new(1, 1)).unwrap();
        let mut agent = controller(world);

        let mut steps = 0;
        while agent.step(Action::PlaceRock).unwrap() != ActionOutcome::Exhausted {
            steps += 1;
        }

        // 100 energy at 10 per step on deep water.
        assert_eq!(steps, 9);
        assert!(!agent.is_running());
        assert_eq!(agent.step(Action::Scout).unwrap(), ActionOutcome::Exhausted);
    }
}
