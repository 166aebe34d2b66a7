//! Gradual pattern mining.
//!
//! A gradual pattern such as `{Age+, Expenses-}` states that one column
//! increases while another decreases across pairs of rows. Its support is the
//! fraction of row pairs that respect every item at once.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Gradual items and patterns, engine configuration, result records
//! - `compute`: Pairwise bitmaps, validation, the numeric search space and the
//!   mining engines (exhaustive GRAANK plus genetic, hill-climbing, particle
//!   swarm and random search)
//!
//! # Example
//!
//! ```rust
//! use gradual_miner::{
//!     compute::{GradualData, PatternMiner},
//!     schema::{GraankConfig, MiningAlgorithm},
//! };
//!
//! let rows = vec![
//!     vec![30.0, 3.0, 1.0, 10.0],
//!     vec![35.0, 2.0, 2.0, 8.0],
//!     vec![40.0, 4.0, 2.0, 7.0],
//!     vec![50.0, 1.0, 1.0, 6.0],
//!     vec![52.0, 7.0, 1.0, 2.0],
//! ];
//! let titles = ["Age", "Salary", "Cars", "Expenses"].map(String::from).to_vec();
//! let mut data = GradualData::new(titles, &rows, 0.5).unwrap();
//!
//! let algorithm = MiningAlgorithm::Graank(GraankConfig {
//!     max_level: Some(2),
//!     ..Default::default()
//! });
//! let mut miner = algorithm.build().unwrap();
//! let result = miner.discover(&mut data);
//!
//! assert!(result.contains_rendered(&["Age+", "Expenses-"]));
//! println!("{}", result.to_json().unwrap());
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{BitmapProvider, GradualData, PatternMiner};
pub use schema::{GradualItem, MiningAlgorithm, MiningResult, Pattern};
