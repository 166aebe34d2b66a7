//! Compute module - Bitmaps, validation and the mining engines.

mod bitmap;
mod codec;
mod graank;
mod miner;
mod search;
mod validation;

pub use bitmap::{
    Bitmap, BitmapProvider, DataError, GradualBin, GradualData, pair_support, support_of,
};
pub use codec::{INVALID_COST, NumericSearchSpace};
pub use graank::Graank;
pub use miner::PatternMiner;
pub use search::{
    Candidate, GeneticGraank, HillClimbingGraank, ParticleGraank, RandomGraank, SearchRng,
};
pub use validation::{
    is_duplicate, is_subset_or_superset, position_of_duplicate, prune_subsumed, validate,
    validate_tree,
};
