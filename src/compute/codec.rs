//! Numeric search space shared by the metaheuristic engines.
//!
//! A position in `[0, 2^k)` selects gradual items by bit: reading the binary
//! form of the position from its most significant set bit, the i-th digit
//! toggles the i-th key. Fitness is derived from the raw count of row pairs
//! that respect every selected item.

use rayon::prelude::*;

use crate::schema::{GradualItem, Pattern};

use super::bitmap::{Bitmap, BitmapProvider};

/// Cost reported when a position carries no signal.
pub const INVALID_COST: f64 = 1.0;

/// Ordered key list and bounds of the numeric search space.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSearchSpace {
    keys: Vec<GradualItem>,
}

impl NumericSearchSpace {
    /// Keys in the provider's bin order, fixed for the whole run.
    pub fn from_provider(provider: &dyn BitmapProvider) -> Self {
        Self::new(provider.gradual_bins().iter().map(|b| b.item).collect())
    }

    pub fn new(keys: Vec<GradualItem>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[GradualItem] {
        &self.keys
    }

    /// Canonical string keys (`"0_pos"`, `"0_neg"`, ...).
    pub fn key_strings(&self) -> Vec<String> {
        self.keys.iter().map(GradualItem::key).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn lower_bound(&self) -> f64 {
        0.0
    }

    /// `2^k - 1`: every key selected.
    pub fn upper_bound(&self) -> f64 {
        2f64.powi(self.keys.len() as i32) - 1.0
    }

    /// Decode a position into a pattern (support unset).
    ///
    /// The first item seen on a column wins; later items on the same column,
    /// in either direction, are skipped.
    pub fn decode(&self, position: f64) -> Pattern {
        let mut pattern = Pattern::new();
        for (index, bit) in binary_digits(position).into_iter().enumerate() {
            if !bit {
                continue;
            }
            let Some(item) = self.keys.get(index) else {
                break;
            };
            if !pattern.contains_attribute(item.attribute) {
                pattern.add_item(*item);
            }
        }
        pattern
    }

    /// Cost of a position: `1 / sum(AND of item bitmaps)`, lower is fitter.
    ///
    /// The sum is not divided by the pair count, so cost only ranks positions.
    pub fn evaluate(&self, position: f64, provider: &dyn BitmapProvider) -> f64 {
        let pattern = self.decode(position);
        let mut accumulated: Option<Bitmap> = None;
        for item in pattern.items() {
            if let Some(bitmap) = provider.bitmap(item) {
                match accumulated.as_mut() {
                    Some(acc) => acc.and_assign(bitmap),
                    None => accumulated = Some(bitmap.clone()),
                }
            }
        }
        match accumulated.map(|acc| acc.count_ones()) {
            Some(sum) if sum > 0 => 1.0 / sum as f64,
            _ => INVALID_COST,
        }
    }

    /// Costs of many positions, evaluated in parallel against one provider.
    pub fn evaluate_batch(&self, positions: &[f64], provider: &dyn BitmapProvider) -> Vec<f64> {
        positions
            .par_iter()
            .map(|&position| self.evaluate(position, provider))
            .collect()
    }

    /// Clamp a position into `[lower, upper]`.
    pub fn clamp(position: f64, lower: f64, upper: f64) -> f64 {
        position.min(upper).max(lower)
    }

    /// Clamp a position into this space's bounds.
    pub fn bound(&self, position: f64) -> f64 {
        Self::clamp(position, self.lower_bound(), self.upper_bound())
    }
}

/// Binary digits of the integer part of `position`, most significant first.
///
/// Zero and negative positions have no set bits.
fn binary_digits(position: f64) -> Vec<bool> {
    let value = position.trunc();
    if !value.is_finite() || value < 1.0 {
        return Vec::new();
    }
    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i64 - 1075;
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);

    let (mantissa, zeros) = if exponent >= 0 {
        (mantissa, exponent as usize)
    } else {
        (mantissa >> (-exponent) as u32, 0)
    };
    let width = 64 - mantissa.leading_zeros() as usize;
    let mut digits: Vec<bool> = (0..width)
        .rev()
        .map(|shift| (mantissa >> shift) & 1 == 1)
        .collect();
    digits.resize(width + zeros, false);
    digits
}
