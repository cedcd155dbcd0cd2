use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use house_core::config::HouseConfig;
use house_core::embed::embed;
use house_core::grammar::direction::Direction;
use house_core::grammar::{GrammarConfig, RoomType};
use house_core::house::House;
use house_core::survey::{run_survey, SurveyConfig};
use house_core::tiles::{StandardTiles, TilePalette};
use house_core::tree::builder::build_tree;

fn bench_tree_building(c: &mut Criterion) {
    let grammar = GrammarConfig::default();

    c.bench_function("build_tree", |b| {
        b.iter(|| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(black_box(42));
            build_tree(RoomType::Foyer, &grammar, &mut rng)
        })
    });
}

fn bench_embedding(c: &mut Criterion) {
    let config = HouseConfig::default();
    let palette = TilePalette::resolve(&StandardTiles::new()).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let tree = build_tree(RoomType::Foyer, &config.grammar, &mut rng).unwrap();

    c.bench_function("embed", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(black_box(7));
            embed(
                &mut tree,
                Direction::North,
                &config.limits(),
                &config.directions,
                &palette,
                &mut rng,
            )
        })
    });
}

fn bench_full_generation(c: &mut Criterion) {
    let config = HouseConfig::default().with_seed(42);

    c.bench_function("generate_house", |b| {
        b.iter(|| House::generate(black_box(&config)))
    });

    c.bench_function("generate_house_single_story", |b| {
        let config = HouseConfig {
            max_stories: 0,
            ..config.clone()
        };
        b.iter(|| House::generate(black_box(&config)))
    });

    let house = House::generate(&config).unwrap();
    c.bench_function("fingerprint", |b| b.iter(|| house.fingerprint()));
}

fn bench_survey(c: &mut Criterion) {
    let config = SurveyConfig {
        runs: 64,
        ..SurveyConfig::default()
    };
    c.bench_function("survey_64", |b| b.iter(|| run_survey(black_box(&config))));
}

criterion_group!(
    benches,
    bench_tree_building,
    bench_embedding,
    bench_full_generation,
    bench_survey
);
criterion_main!(benches);
