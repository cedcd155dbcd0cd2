//! Edge case & boundary tests
//!
//! Tests behavior at configuration boundaries:
//! - Config files: JSON and RON loading, unknown extensions, parse errors
//! - Invalid grammars: bad size ranges, uncapped cycles, capped-out root
//! - Limits: minimum house size, zero stories, extreme seeds
//! - Direction tables with missing entries abort generation
//! - Hand-built trees with rooms too thin for a wall ring

use std::fs;

use house_core::config::HouseConfig;
use house_core::error::{ConfigError, GenerationError};
use house_core::grammar::direction::{Direction, DirectionTable};
use house_core::grammar::{RoomType, SizeRange};
use house_core::house::House;
use house_core::tiles::StandardTiles;
use house_core::tree::RoomTree;

// ============================================================
// Config files
// ============================================================

#[test]
fn test_load_json_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("house.json");
    fs::write(&path, r#"{ "seed": 77, "max_stories": 1, "facing": "s" }"#).unwrap();

    let config = HouseConfig::load(&path).unwrap();
    assert_eq!(config.seed, Some(77));
    assert_eq!(config.max_stories, 1);
    assert_eq!(config.facing, Some(Direction::South));

    let house = House::generate(&config).unwrap();
    assert_eq!(house.seed, 77);
    assert_eq!(house.facing, Direction::South);
}

#[test]
fn test_load_ron_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("house.ron");
    fs::write(
        &path,
        "(root_type: hall, max_width: 30, grammar: (children: { hall: [hall, closet] }))",
    )
    .unwrap();

    let config = HouseConfig::load(&path).unwrap();
    assert_eq!(config.root_type, RoomType::Hall);
    assert_eq!(config.max_width, 30);
    assert_eq!(config.grammar.children_of(RoomType::Hall), &[RoomType::Hall, RoomType::Closet]);
    // A listed table replaces the default wholesale; unlisted tables keep theirs
    assert!(config.grammar.is_terminal(RoomType::Foyer));
    assert_eq!(config.grammar.cap(RoomType::Hall), Some(3));
    assert_eq!(config.grammar.size_range(RoomType::Closet).unwrap(), SizeRange::new(3, 3));

    let house = House::generate(&config.clone().with_seed(4)).unwrap();
    assert!(house.tree.count_of(RoomType::Hall) <= 3);
}

#[test]
fn test_saved_config_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.json");
    let config = HouseConfig::default().with_seed(5).with_facing(Direction::West);
    fs::write(&path, config.to_json()).unwrap();
    assert_eq!(HouseConfig::load(&path).unwrap(), config);
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("house.toml");
    fs::write(&path, "seed = 1").unwrap();
    assert!(matches!(
        HouseConfig::load(&path),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        HouseConfig::load(dir.path().join("nope.json")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("bad.json");
    let ron = dir.path().join("bad.ron");
    fs::write(&json, "{ seed: ").unwrap();
    fs::write(&ron, "(seed: ").unwrap();
    assert!(matches!(HouseConfig::load(&json), Err(ConfigError::Json(_))));
    assert!(matches!(HouseConfig::load(&ron), Err(ConfigError::Ron(_))));
}

#[test]
fn test_invalid_config_file_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.json");
    fs::write(&path, r#"{ "max_width": 2 }"#).unwrap();
    assert!(matches!(
        HouseConfig::load(&path),
        Err(ConfigError::Invalid(GenerationError::InvalidLimits(_)))
    ));
}

// ============================================================
// Invalid grammars
// ============================================================

#[test]
fn test_room_smaller_than_wall_ring() {
    let mut config = HouseConfig::default().with_seed(1);
    config.grammar.sizes.insert(RoomType::Closet, SizeRange::new(2, 3));
    assert!(matches!(
        House::generate(&config),
        Err(GenerationError::InvalidSizeRange { room_type: RoomType::Closet, .. })
    ));
}

#[test]
fn test_missing_size_range() {
    let mut config = HouseConfig::default().with_seed(1);
    config.grammar.sizes.remove(&RoomType::Bedroom);
    assert!(matches!(
        House::generate(&config),
        Err(GenerationError::MissingSizeRange(RoomType::Bedroom))
    ));
}

#[test]
fn test_uncapped_cycle_rejected() {
    let mut config = HouseConfig::default().with_seed(1);
    config.grammar.caps.remove(&RoomType::Hall);
    assert!(matches!(
        House::generate(&config),
        Err(GenerationError::UnboundedGrammar(RoomType::Hall))
    ));
}

#[test]
fn test_root_capped_at_zero() {
    let mut config = HouseConfig::default().with_seed(1);
    config.grammar.caps.insert(RoomType::Foyer, 0);
    assert!(matches!(
        House::generate(&config),
        Err(GenerationError::RootCappedOut(RoomType::Foyer))
    ));
}

#[test]
fn test_unreachable_types_not_checked() {
    // Closet roots never reach the broken bedroom entry
    let mut config = HouseConfig {
        root_type: RoomType::Closet,
        ..HouseConfig::default().with_seed(1)
    };
    config.grammar.sizes.remove(&RoomType::Bedroom);
    assert!(House::generate(&config).is_ok());
}

// ============================================================
// Limits and directions
// ============================================================

#[test]
fn test_single_story_house() {
    for seed in 0..16 {
        let config = HouseConfig {
            max_stories: 0,
            ..HouseConfig::default().with_seed(seed)
        };
        let house = House::generate(&config).unwrap();
        assert_eq!(house.stories(), 1);
        assert!(house.tree.ids().all(|id| house.tree[id].z() == 0));
    }
}

#[test]
fn test_smallest_limits_keep_only_root() {
    let config = HouseConfig {
        max_width: 4,
        max_height: 4,
        max_stories: 0,
        facing: Some(Direction::North),
        ..HouseConfig::default().with_seed(8)
    };
    let house = House::generate(&config).unwrap();
    assert_eq!(house.placed_rooms(), vec![house.tree.root()]);
    assert!(house.grid.width(0) <= 4 && house.grid.height(0) <= 4);
}

#[test]
fn test_compact_layout_vs_defaults() {
    let defaults = HouseConfig::default();
    assert!(defaults.max_width > 10 && defaults.max_height > 10 && defaults.max_stories > 1);

    for seed in 0..16 {
        let config = HouseConfig {
            max_width: 10,
            max_height: 10,
            max_stories: 1,
            ..HouseConfig::default().with_seed(seed)
        };
        let house = House::generate(&config).unwrap();
        assert!(house.stories() <= 2, "seed {seed}");
        assert!(house.is_placed(house.tree.root()));
        assert!(house.grid.is_dense());
    }
}

#[test]
fn test_extreme_seeds() {
    for seed in [0, 1, u64::MAX, u64::MAX - 1] {
        let house = House::generate(&HouseConfig::default().with_seed(seed)).unwrap();
        assert_eq!(house.seed, seed);
        assert!(house.grid.is_dense());
    }
}

#[test]
fn test_missing_direction_entry_aborts() {
    let config = HouseConfig {
        facing: Some(Direction::East),
        directions: DirectionTable::from_entries([(Direction::North, vec![Direction::South])]),
        ..HouseConfig::default().with_seed(1)
    };
    assert!(matches!(
        House::generate(&config),
        Err(GenerationError::MissingDirections(Direction::East))
    ));
}

#[test]
fn test_empty_direction_list_aborts() {
    let config = HouseConfig {
        facing: Some(Direction::North),
        directions: DirectionTable::from_entries([(Direction::North, vec![])]),
        ..HouseConfig::default().with_seed(1)
    };
    assert!(matches!(
        House::generate(&config),
        Err(GenerationError::MissingDirections(Direction::North))
    ));
}

// ============================================================
// Hand-built trees
// ============================================================

#[test]
fn test_undersized_root_rejected() {
    let config = HouseConfig::default().with_seed(1);
    let tree = RoomTree::new(RoomType::Closet, 2, 2);
    assert!(matches!(
        House::from_tree(tree, Direction::North, &config, &StandardTiles::new()),
        Err(GenerationError::InvalidRoomSize {
            room_type: RoomType::Closet,
            width: 2,
            height: 2
        })
    ));
}

#[test]
fn test_zero_sized_child_rejected() {
    let config = HouseConfig::default().with_seed(1);
    let mut tree = RoomTree::new(RoomType::Foyer, 4, 4);
    tree.add_child(tree.root(), RoomType::Closet, 0, 0);
    for facing in [Direction::North, Direction::South, Direction::East, Direction::West] {
        assert!(matches!(
            House::from_tree(tree.clone(), facing, &config, &StandardTiles::new()),
            Err(GenerationError::InvalidRoomSize {
                room_type: RoomType::Closet,
                width: 0,
                height: 0
            })
        ));
    }
}

#[test]
fn test_smallest_hand_built_rooms_accepted() {
    let config = HouseConfig::default().with_seed(1);
    let mut tree = RoomTree::new(RoomType::Closet, 3, 3);
    tree.add_child(tree.root(), RoomType::Closet, 3, 3);
    let house = House::from_tree(tree, Direction::North, &config, &StandardTiles::new()).unwrap();
    assert!(house.grid.is_dense());
}
