//! Mine the five-row dummy table with every engine and print JSON reports.
//!
//! Pass a path to a JSON engine configuration (e.g.
//! `{"type": "HillClimbing", "budget": {"max_iterations": 3}}`) to run a
//! single engine instead.

use std::fs;
use std::time::Instant;

use gradual_miner::{
    compute::{GradualData, PatternMiner},
    schema::{
        GeneticConfig, GraankConfig, HillClimbingConfig, MiningAlgorithm, ParticleSwarmConfig,
        RandomSearchConfig, SearchBudget,
    },
};

fn dummy_data() -> GradualData {
    let rows = vec![
        vec![30.0, 3.0, 1.0, 10.0],
        vec![35.0, 2.0, 2.0, 8.0],
        vec![40.0, 4.0, 2.0, 7.0],
        vec![50.0, 1.0, 1.0, 6.0],
        vec![52.0, 7.0, 1.0, 2.0],
    ];
    let titles = ["Age", "Salary", "Cars", "Expenses"].map(String::from).to_vec();
    match GradualData::new(titles, &rows, 0.5) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to build data context: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_algorithm(path: &str) -> MiningAlgorithm {
    let json = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&json) {
        Ok(algorithm) => algorithm,
        Err(e) => {
            eprintln!("Failed to parse engine configuration: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let algorithms = match std::env::args().nth(1) {
        Some(path) => vec![load_algorithm(&path)],
        None => {
            let budget = SearchBudget::iterations(3).with_seed(42);
            vec![
                MiningAlgorithm::Graank(GraankConfig::default()),
                MiningAlgorithm::Graank(GraankConfig {
                    max_level: Some(2),
                    ..Default::default()
                }),
                MiningAlgorithm::Genetic(GeneticConfig {
                    budget: budget.clone(),
                    ..Default::default()
                }),
                MiningAlgorithm::HillClimbing(HillClimbingConfig {
                    budget: budget.clone(),
                    step_size: 0.5,
                }),
                MiningAlgorithm::ParticleSwarm(ParticleSwarmConfig {
                    budget: budget.clone(),
                    ..Default::default()
                }),
                MiningAlgorithm::RandomSearch(RandomSearchConfig { budget }),
            ]
        }
    };

    println!("=== Gradual Pattern Mining ===\n");

    for algorithm in algorithms {
        let mut miner = match algorithm.build() {
            Ok(miner) => miner,
            Err(e) => {
                eprintln!("Invalid engine configuration: {}", e);
                std::process::exit(1);
            }
        };
        let mut data = dummy_data();

        let start = Instant::now();
        let result = miner.discover(&mut data);
        let elapsed = start.elapsed();

        match result.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize result: {}", e),
        }
        println!(
            "  {} patterns, {} evaluations in {:.3}ms\n",
            result.patterns.len(),
            result.evaluations,
            elapsed.as_secs_f64() * 1000.0
        );
    }
}
