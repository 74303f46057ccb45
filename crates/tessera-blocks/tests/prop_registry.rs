use proptest::prelude::*;
use std::collections::HashMap;
use tessera_blocks::config::{BlockDef, BlocksConfig, MultiblockDef, StateValues};
use tessera_blocks::registry::{BlockRegistry, RegistryError};
use tessera_blocks::states;

fn plain(name: &str) -> BlockDef {
    BlockDef {
        name: name.into(),
        id: None,
        tags: Vec::new(),
        components: Vec::new(),
        multiblock: None,
        state_schema: None,
    }
}

fn table(index_values: i64, size: [u32; 3]) -> BlockDef {
    let schema: HashMap<String, StateValues> = HashMap::from([
        (states::MULTIBLOCK_INDEX.to_string(), (0..index_values).into()),
        (
            states::CARDINAL_DIRECTION.to_string(),
            vec!["north", "east", "south", "west"].into(),
        ),
    ]);
    BlockDef {
        name: "table".into(),
        id: None,
        tags: vec!["four_states".into()],
        components: vec![states::components::MULTIBLOCK.into()],
        multiblock: Some(MultiblockDef {
            size,
            index: states::MULTIBLOCK_INDEX.into(),
            rotate: true,
        }),
        state_schema: Some(schema),
    }
}

fn registry(blocks: Vec<BlockDef>) -> Result<BlockRegistry, RegistryError> {
    BlockRegistry::from_configs(BlocksConfig {
        blocks,
        replaceable: None,
        air_block: None,
    })
}

#[test]
fn pack_state_roundtrip_fixed() {
    // Fixed schema with 3 properties and varied cardinalities
    let schema: HashMap<String, StateValues> = HashMap::from([
        ("p0".into(), vec!["a", "b"].into()),
        ("p1".into(), vec!["u"].into()),
        ("p2".into(), vec!["x", "y", "z"].into()),
    ]);
    let mut def = plain("t");
    def.state_schema = Some(schema);
    let reg = registry(vec![plain("air"), def]).expect("registry");
    let ty = reg.get(reg.id_by_name("t").unwrap()).unwrap();

    let props = HashMap::from([
        ("p0".into(), "b".into()),
        // omit p1 -> should default to first
        ("p2".into(), "z".into()),
    ]);
    let state = ty.pack_state(&props).unwrap();
    assert_eq!(ty.state_prop_value(state, "p0"), Some("b"));
    assert_eq!(ty.state_prop_value(state, "p1"), Some("u"));
    assert_eq!(ty.state_prop_value(state, "p2"), Some("z"));

    let typo = HashMap::from([("p2".to_string(), "zz".to_string())]);
    assert_eq!(
        ty.pack_state(&typo),
        Err(RegistryError::UnknownStateValue {
            block: "t".into(),
            slot: "p2".into(),
            value: "zz".into(),
        })
    );
    let undeclared = HashMap::from([("p9".to_string(), "a".to_string())]);
    assert!(ty.pack_state(&undeclared).is_err());
    assert_eq!(
        reg.make_block_by_name("nope", None),
        Err(RegistryError::MissingBlock("nope".into()))
    );
}

#[test]
fn integer_states_read_and_write() {
    let reg = registry(vec![plain("air"), table(4, [2, 2, 1])]).expect("registry");
    let ty = reg.get(reg.id_by_name("table").unwrap()).unwrap();
    let s = ty.with_state_int(0, states::MULTIBLOCK_INDEX, 3).unwrap();
    assert_eq!(ty.state_int(s, states::MULTIBLOCK_INDEX), Some(3));
    // Outside the declared domain
    assert_eq!(ty.with_state_int(s, states::MULTIBLOCK_INDEX, 4), None);
    // Not declared at all
    assert_eq!(ty.with_state_int(s, states::DYNAMIC_STATE, 0), None);
    assert!(!ty.declares_state(states::DYNAMIC_STATE));
    assert!(ty.declares_state(states::MULTIBLOCK_INDEX));
}

#[test]
fn with_state_value_leaves_other_slots_alone() {
    let reg = registry(vec![plain("air"), table(4, [2, 2, 1])]).expect("registry");
    let ty = reg.get(reg.id_by_name("table").unwrap()).unwrap();
    let s = ty
        .with_state_value(0, states::CARDINAL_DIRECTION, "south")
        .unwrap();
    let s = ty.with_state_int(s, states::MULTIBLOCK_INDEX, 2).unwrap();
    assert_eq!(ty.state_prop_value(s, states::CARDINAL_DIRECTION), Some("south"));
    assert_eq!(ty.state_int(s, states::MULTIBLOCK_INDEX), Some(2));
    let pairs = ty.state_pairs(s);
    assert_eq!(pairs.len(), 2);
    assert!(pairs.contains(&(states::CARDINAL_DIRECTION, "south")));
}

#[test]
fn descriptor_domain_must_match_cell_count() {
    let err = registry(vec![plain("air"), table(3, [2, 2, 1])]).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::IndexDomainMismatch {
            expected: 4,
            found: 3,
            ..
        }
    ));
    let err = registry(vec![plain("air"), table(0, [0, 1, 1])]).unwrap_err();
    assert!(matches!(err, RegistryError::EmptyStructure(_)));
}

#[test]
fn descriptor_requires_index_state() {
    let mut def = table(4, [2, 2, 1]);
    def.state_schema = None;
    let err = registry(vec![plain("air"), def]).unwrap_err();
    assert!(matches!(err, RegistryError::MissingIndexState { .. }));
}

#[test]
fn missing_air_and_duplicates_are_rejected() {
    assert_eq!(
        registry(vec![plain("stone")]).unwrap_err(),
        RegistryError::MissingBlock("air".into())
    );
    assert_eq!(
        registry(vec![plain("air"), plain("air")]).unwrap_err(),
        RegistryError::DuplicateName("air".into())
    );
}

#[test]
fn explicit_ids_may_not_collide() {
    let stone = BlockDef {
        id: Some(0),
        ..plain("stone")
    };
    assert_eq!(
        registry(vec![plain("air"), stone]).unwrap_err(),
        RegistryError::DuplicateId {
            id: 0,
            first: "air".into(),
            second: "stone".into(),
        }
    );

    // Implicit ids continue after the highest id assigned so far.
    let lamp = BlockDef {
        id: Some(3),
        ..plain("lamp")
    };
    let reg = registry(vec![plain("air"), lamp, plain("stone")]).unwrap();
    assert_eq!(reg.id_by_name("lamp"), Some(3));
    assert_eq!(reg.id_by_name("stone"), Some(4));
}

#[test]
fn default_replaceable_set_only_names_defined_types() {
    let reg = registry(vec![plain("air"), plain("water"), plain("stone")]).unwrap();
    assert!(reg.is_replaceable(reg.id_by_name("air").unwrap()));
    assert!(reg.is_replaceable(reg.id_by_name("water").unwrap()));
    assert!(!reg.is_replaceable(reg.id_by_name("stone").unwrap()));
}

#[test]
fn loads_from_toml() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        replaceable = ["air", "fern"]

        [[blocks]]
        name = "air"

        [[blocks]]
        name = "fern"

        [[blocks]]
        name = "lamp"
        tags = ["three_switch"]
        components = ["tessera:switch"]
        [blocks.state_schema]
        "tessera:switch" = [0, 1, 2]
        lit = [false, true]

        [[blocks]]
        name = "bench"
        components = ["tessera:multiblock"]
        multiblock = { size = [2, 1, 1], index = "tessera:multiblock_index" }
        [blocks.state_schema]
        "tessera:multiblock_index" = [0, 1]
    "#,
    )
    .expect("registry");
    let lamp = reg.get(reg.id_by_name("lamp").unwrap()).unwrap();
    assert!(lamp.has_tag("three_switch"));
    assert_eq!(lamp.components, vec![states::components::SWITCH.to_string()]);
    let on = lamp.with_state_int(0, states::SWITCH, 2).unwrap();
    assert_eq!(lamp.state_int(on, states::SWITCH), Some(2));
    assert_eq!(lamp.with_state_int(0, states::SWITCH, 3), None);
    assert_eq!(lamp.state_prop_value(0, "lit"), Some("false"));
    let bench = reg.id_by_name("bench").unwrap();
    let desc = reg.get(bench).and_then(|ty| ty.multiblock.as_ref()).unwrap();
    assert_eq!(desc.cell_count(), 2);
    assert!(desc.rotate);
    assert!(reg.is_replaceable(reg.id_by_name("fern").unwrap()));
    assert_eq!(reg.air(), tessera_blocks::Block::new(reg.air_id, 0));
}

proptest! {
    // Writing one slot never disturbs another, for any pair of in-domain values
    #[test]
    fn slots_are_independent(idx in 0i64..8, dir in 0usize..4) {
        let reg = registry(vec![plain("air"), table(8, [2, 2, 2])]).unwrap();
        let ty = reg.get(reg.id_by_name("table").unwrap()).unwrap();
        let dirs = ["north", "east", "south", "west"];
        let s = ty.with_state_value(0, states::CARDINAL_DIRECTION, dirs[dir]).unwrap();
        let s = ty.with_state_int(s, states::MULTIBLOCK_INDEX, idx).unwrap();
        prop_assert_eq!(ty.state_prop_value(s, states::CARDINAL_DIRECTION), Some(dirs[dir]));
        prop_assert_eq!(ty.state_int(s, states::MULTIBLOCK_INDEX), Some(idx));
    }
}
