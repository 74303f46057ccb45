use std::error::Error;
use std::fmt;
use std::sync::Arc;

use tessera_blocks::{Block, BlockRegistry, RegistryError};
use tessera_runtime::{Engine, RecordingHost};
use tessera_structures::{Actor, BehaviorTable};
use tessera_world::{GridBounds, GridWorld, SparseWorld};

use crate::scenario::{Scenario, Step, pos};

pub type ScenarioEngine = Engine<SparseWorld, RecordingHost>;

#[derive(Debug)]
pub enum RunError {
    /// A block name or state value the registry does not know.
    Block(RegistryError),
    Fill(tessera_world::WorldError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Block(e) => write!(f, "scenario cell: {}", e),
            RunError::Fill(e) => write!(f, "scenario fill failed: {}", e),
        }
    }
}

impl Error for RunError {}

fn make_block(
    reg: &BlockRegistry,
    name: &str,
    state: &std::collections::HashMap<String, String>,
) -> Result<Block, RunError> {
    reg.make_block_by_name(name, Some(state)).map_err(RunError::Block)
}

/// Builds the world a scenario describes and plays its steps to completion.
pub fn run(reg: Arc<BlockRegistry>, sc: &Scenario) -> Result<ScenarioEngine, RunError> {
    let mut world = SparseWorld::new(
        GridBounds::new(pos(sc.world.min), pos(sc.world.max)),
        reg.air(),
    );
    for cell in &sc.fill {
        let b = make_block(&reg, &cell.block, &cell.state)?;
        world.set_block(pos(cell.at), b).map_err(RunError::Fill)?;
    }
    for &p in &sc.world.protected {
        world.protect(pos(p));
    }

    let mut host = RecordingHost::new();
    for a in &sc.actors {
        host.give(a.id, a.held);
    }

    let mut engine = Engine::new(Arc::clone(&reg), BehaviorTable::with_builtin(), world, host);
    for (i, step) in sc.steps.iter().enumerate() {
        log::debug!(target: "dispatch", "step {}: {:?}", i, step);
        match step {
            Step::Place {
                at,
                block,
                state,
                actor,
                yaw,
            } => {
                let b = make_block(&reg, block, state)?;
                let actor = actor.map(|id| Actor {
                    id,
                    yaw_deg: *yaw,
                    sneaking: false,
                });
                engine.place(pos(*at), b, actor);
            }
            Step::Interact {
                at,
                actor,
                yaw,
                sneaking,
            } => engine.interact(
                pos(*at),
                Actor {
                    id: *actor,
                    yaw_deg: *yaw,
                    sneaking: *sneaking,
                },
            ),
            Step::Break { at } => {
                engine.break_block(pos(*at));
            }
            Step::Tick { count } => {
                for _ in 0..*count {
                    engine.advance_tick();
                }
            }
        }
    }
    engine.settle();
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_geom::CellPos;
    use tessera_world::GridView;

    const BLOCKS: &str = include_str!("../assets/blocks.toml");

    fn registry() -> Arc<BlockRegistry> {
        Arc::new(BlockRegistry::from_toml_str(BLOCKS).expect("registry"))
    }

    #[test]
    fn bundled_scenarios_run_clean() {
        let reg = registry();
        for src in [
            include_str!("../assets/scenarios/bench.toml"),
            include_str!("../assets/scenarios/legacy_door.toml"),
            include_str!("../assets/scenarios/edge_abort.toml"),
        ] {
            let sc = Scenario::from_toml_str(src).expect("scenario parses");
            let engine = run(Arc::clone(&reg), &sc).expect("scenario runs");
            assert_eq!(engine.pending_tasks(), 0);
        }
    }

    #[test]
    fn edge_scenario_reports_the_abort() {
        let sc = Scenario::from_toml_str(include_str!("../assets/scenarios/edge_abort.toml")).unwrap();
        let engine = run(registry(), &sc).unwrap();
        assert_eq!(engine.stats().consistency_aborts, 1);
        let survivor = engine.world().block_at(CellPos::new(0, 2, 7)).unwrap();
        assert!(!engine.registry().is_air(survivor));
    }

    #[test]
    fn unknown_block_is_an_error() {
        let sc = Scenario::from_toml_str(
            r#"
            [world]
            min = [0, 0, 0]
            max = [3, 3, 3]

            [[steps]]
            action = "place"
            at = [1, 1, 1]
            block = "nope"
        "#,
        )
        .unwrap();
        assert!(matches!(
            run(registry(), &sc),
            Err(RunError::Block(RegistryError::MissingBlock(n))) if n == "nope"
        ));
    }

    #[test]
    fn misspelled_state_value_is_an_error() {
        let sc = Scenario::from_toml_str(
            r#"
            [world]
            min = [0, 0, 0]
            max = [3, 3, 3]

            [[steps]]
            action = "place"
            at = [1, 1, 1]
            block = "bench"
            actor = 1
            state = { cardinal_direction = "nrth" }
        "#,
        )
        .unwrap();
        match run(registry(), &sc) {
            Err(RunError::Block(RegistryError::UnknownStateValue { block, slot, value })) => {
                assert_eq!(block, "bench");
                assert_eq!(slot, "cardinal_direction");
                assert_eq!(value, "nrth");
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("scenario with a bad state value ran"),
        }
    }
}
