/// Integration tests: JSON round-trip of generated houses.
///
/// A caller persists a house as plain nested data:
///   1. Generate a house from a seed
///   2. Serialize to JSON
///   3. Parse back (both as a `House` and as untyped JSON)
///   4. Verify the tree, grid and gaps survive unchanged
use house_core::config::HouseConfig;
use house_core::house::House;
use house_core::tree::RoomTree;

// ============================================================
// Helpers
// ============================================================

fn generate(seed: u64) -> House {
    House::generate(&HouseConfig::default().with_seed(seed)).unwrap()
}

fn to_value(house: &House) -> serde_json::Value {
    let json = house.to_json().unwrap();
    serde_json::from_str(&json).unwrap_or_else(|e| {
        panic!("Invalid JSON for house: {e}\nRaw: {json}");
    })
}

// ============================================================
// House round-trip
// ============================================================

#[test]
fn test_house_roundtrip_preserves_everything() {
    for seed in [0, 1, 42, 9_999, u64::MAX] {
        let house = generate(seed);
        let restored = House::from_json(&house.to_json().unwrap()).unwrap();
        assert_eq!(restored, house, "seed {seed}");
        assert_eq!(restored.fingerprint(), house.fingerprint());
    }
}

#[test]
fn test_house_json_shape() {
    let house = generate(42);
    let value = to_value(&house);

    assert_eq!(value["seed"].as_u64().unwrap(), 42);
    assert!(["n", "s", "e", "w"].contains(&value["facing"].as_str().unwrap()));
    assert!(value["tree"]["nodes"].is_array());
    assert_eq!(
        value["tree"]["nodes"].as_array().unwrap().len(),
        house.tree.len()
    );
    assert_eq!(value["tree"]["nodes"][0]["room_type"], "foyer");
    assert!(value["tree"]["nodes"][0]["parent"].is_null());
    assert!(value["grid"]["levels"].is_array());
    assert!(value["gaps"].is_array());
}

#[test]
fn test_tree_roundtrip_keeps_links() {
    let house = generate(7);
    let json = serde_json::to_string(&house.tree).unwrap();
    let tree: RoomTree = serde_json::from_str(&json).unwrap();

    assert_eq!(tree.iter_bfs(), house.tree.iter_bfs());
    for id in tree.ids() {
        assert_eq!(tree.parent_of(id), house.tree.parent_of(id));
        assert_eq!(tree.footprint_of(id), house.tree.footprint_of(id));
        assert_eq!(tree.is_placed(id), house.tree.is_placed(id));
    }
}

#[test]
fn test_malformed_house_json_rejected() {
    assert!(House::from_json("").is_err());
    assert!(House::from_json("{\"seed\": 1}").is_err());
    assert!(House::from_json("[1, 2, 3]").is_err());
}
