//! Exhaustive level-wise (apriori) search for gradual patterns.

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use crate::schema::{ConfigError, GradualItem, GraankConfig, MiningResult, Pattern};

use super::bitmap::{Bitmap, BitmapProvider};
use super::miner::PatternMiner;
use super::validation::prune_subsumed;

/// One member of an apriori level: an item set with its combined bitmap.
#[derive(Debug, Clone)]
struct LevelEntry {
    items: BTreeSet<GradualItem>,
    bitmap: Bitmap,
    support: f64,
}

/// Candidates of the next level plus how many failed the threshold.
struct LevelOutcome {
    entries: Vec<LevelEntry>,
    invalid_count: usize,
    evaluations: usize,
}

/// GRAANK: grows frequent k-item patterns into (k+1)-item candidates until a
/// level comes up empty.
#[derive(Debug, Clone, Default)]
pub struct Graank {
    config: GraankConfig,
}

impl Graank {
    pub const NAME: &'static str = "GRAANK";

    pub fn new(config: GraankConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GraankConfig {
        &self.config
    }

    /// Seed level: every provider bin as a one-item set.
    fn seed_level(provider: &dyn BitmapProvider) -> Vec<LevelEntry> {
        provider
            .gradual_bins()
            .iter()
            .map(|bin| LevelEntry {
                items: BTreeSet::from([bin.item]),
                bitmap: bin.bitmap.clone(),
                support: provider.support(&bin.bitmap),
            })
            .collect()
    }

    /// Join every pair of level-k entries into level-(k+1) candidates.
    fn next_level(&self, level: &[LevelEntry], provider: &dyn BitmapProvider) -> LevelOutcome {
        let mut outcome = LevelOutcome {
            entries: Vec::new(),
            invalid_count: 0,
            evaluations: 0,
        };
        let Some(first) = level.first() else {
            return outcome;
        };
        let target_len = first.items.len() + 1;
        let min_support = provider.min_support();
        let mut seen: HashSet<BTreeSet<GradualItem>> = HashSet::new();

        for (i, left) in level.iter().enumerate() {
            for right in &level[i + 1..] {
                let candidate: BTreeSet<GradualItem> =
                    left.items.union(&right.items).copied().collect();

                if !self.passes_target(&candidate) {
                    continue;
                }
                if candidate.len() != target_len {
                    continue;
                }
                let inverse: BTreeSet<GradualItem> =
                    candidate.iter().map(GradualItem::inverse).collect();
                if seen.contains(&candidate) || seen.contains(&inverse) {
                    continue;
                }

                if has_distinct_attributes(&candidate) {
                    let bitmap = left.bitmap.and(&right.bitmap);
                    let support = provider.support(&bitmap);
                    outcome.evaluations += 1;
                    if support > min_support || self.config.ignore_support {
                        outcome.entries.push(LevelEntry {
                            items: candidate.clone(),
                            bitmap,
                            support,
                        });
                    } else {
                        outcome.invalid_count += 1;
                    }
                }
                seen.insert(candidate);
            }
        }
        outcome
    }

    fn passes_target(&self, candidate: &BTreeSet<GradualItem>) -> bool {
        match self.config.target {
            None => true,
            Some(filter) => {
                let has_target = candidate.iter().any(|gi| gi.attribute == filter.column);
                has_target != filter.exclude
            }
        }
    }
}

impl PatternMiner for Graank {
    fn algorithm(&self) -> &'static str {
        Self::NAME
    }

    fn mine(&mut self, provider: &dyn BitmapProvider) -> MiningResult {
        let start_time = Instant::now();
        let mut patterns: Vec<Pattern> = Vec::new();
        let mut invalid_count = 0;
        let mut evaluations = 0;

        let mut level = Self::seed_level(provider);
        let mut level_number = 1;
        while !level.is_empty() {
            let outcome = self.next_level(&level, provider);
            invalid_count += outcome.invalid_count;
            evaluations += outcome.evaluations;

            for entry in &outcome.entries {
                let items: HashSet<GradualItem> = entry.items.iter().copied().collect();
                prune_subsumed(&mut patterns, &items);

                let mut pattern = Pattern::from_items(entry.items.iter().copied());
                if !pattern.set_support(entry.support) {
                    log::warn!("Dropping {pattern}: support {} above 1", entry.support);
                    continue;
                }
                patterns.push(pattern);
            }
            log::debug!(
                "GRAANK level {} -> {} candidates kept, {} rejected",
                level_number + 1,
                outcome.entries.len(),
                outcome.invalid_count
            );

            level = outcome.entries;
            level_number += 1;
            if let Some(max_level) = self.config.max_level
                && level_number >= max_level
            {
                break;
            }
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        log::info!(
            "{}: {} patterns, {} invalid candidates, {} levels in {:.3}s",
            Self::NAME,
            patterns.len(),
            invalid_count,
            level_number,
            elapsed
        );

        let titles = provider.titles();
        MiningResult {
            algorithm: Self::NAME.to_string(),
            rendered: patterns.iter().map(|p| p.render(titles)).collect(),
            patterns,
            invalid_count,
            iterations: None,
            evaluations,
            elapsed_seconds: elapsed,
        }
    }
}

/// An item and its own inverse (or two items on one column) cannot coexist.
fn has_distinct_attributes(items: &BTreeSet<GradualItem>) -> bool {
    let mut attributes = HashSet::with_capacity(items.len());
    items.iter().all(|gi| attributes.insert(gi.attribute))
}
