use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tessera_geom::CellPos;

/// A scripted run: world extent, pre-placed cells, and the event sequence.
#[derive(Deserialize, Debug, Clone)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub world: WorldDef,
    #[serde(default)]
    pub actors: Vec<ActorDef>,
    #[serde(default)]
    pub fill: Vec<CellDef>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WorldDef {
    pub min: [i32; 3],
    pub max: [i32; 3],
    /// Cells that refuse writes, to exercise partial failures.
    #[serde(default)]
    pub protected: Vec<[i32; 3]>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ActorDef {
    pub id: u32,
    #[serde(default)]
    pub held: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CellDef {
    pub at: [i32; 3],
    pub block: String,
    #[serde(default)]
    pub state: HashMap<String, String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Place {
        at: [i32; 3],
        block: String,
        #[serde(default)]
        state: HashMap<String, String>,
        #[serde(default)]
        actor: Option<u32>,
        #[serde(default)]
        yaw: f32,
    },
    Interact {
        at: [i32; 3],
        actor: u32,
        #[serde(default)]
        yaw: f32,
        #[serde(default)]
        sneaking: bool,
    },
    Break {
        at: [i32; 3],
    },
    Tick {
        #[serde(default = "one")]
        count: u32,
    },
}

fn one() -> u32 {
    1
}

#[inline]
pub fn pos(a: [i32; 3]) -> CellPos {
    CellPos::from(a)
}

impl Scenario {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let sc = Scenario::from_toml_str(
            r#"
            [world]
            min = [-4, 0, -4]
            max = [3, 7, 3]
            protected = [[1, 1, 0]]

            [[actors]]
            id = 1
            held = 4

            [[fill]]
            at = [0, 2, 0]
            block = "stone"

            [[steps]]
            action = "place"
            at = [0, 1, 0]
            block = "bench"
            actor = 1
            yaw = 90.0
            state = { cardinal_direction = "north" }

            [[steps]]
            action = "interact"
            at = [0, 1, 0]
            actor = 1
            sneaking = true

            [[steps]]
            action = "break"
            at = [0, 1, 0]

            [[steps]]
            action = "tick"
        "#,
        )
        .expect("scenario");
        assert_eq!(sc.world.protected, vec![[1, 1, 0]]);
        assert_eq!(sc.actors[0].held, 4);
        assert_eq!(sc.steps.len(), 4);
        match &sc.steps[0] {
            Step::Place { state, actor, .. } => {
                assert_eq!(*actor, Some(1));
                assert_eq!(state.get("cardinal_direction").map(String::as_str), Some("north"));
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert!(matches!(sc.steps[1], Step::Interact { sneaking: true, .. }));
        assert!(matches!(sc.steps[3], Step::Tick { count: 1 }));
    }
}
