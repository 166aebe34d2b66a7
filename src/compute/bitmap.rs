//! Pairwise comparison bitmaps and the provider that serves them.
//!
//! Entry `(i, j)` of a gradual item's bitmap is set when rows `i` and `j`
//! respect the item's variation. Combining items is an elementwise AND, and the
//! number of set entries over `n * (n - 1) / 2` is the support.

use rayon::prelude::*;

use crate::schema::{GradualItem, Pattern};

const WORD_BITS: usize = 64;

/// A packed `n x n` boolean matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    dim: usize,
    words: Vec<u64>,
}

impl Bitmap {
    /// All-zero `dim x dim` bitmap.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            words: vec![0; (dim * dim).div_ceil(WORD_BITS)],
        }
    }

    pub fn from_fn<F: Fn(usize, usize) -> bool>(dim: usize, f: F) -> Self {
        let mut bitmap = Self::new(dim);
        for i in 0..dim {
            for j in 0..dim {
                if f(i, j) {
                    bitmap.set(i, j, true);
                }
            }
        }
        bitmap
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        let bit = i * self.dim + j;
        (self.words[bit / WORD_BITS] >> (bit % WORD_BITS)) & 1 == 1
    }

    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        let bit = i * self.dim + j;
        let mask = 1u64 << (bit % WORD_BITS);
        if value {
            self.words[bit / WORD_BITS] |= mask;
        } else {
            self.words[bit / WORD_BITS] &= !mask;
        }
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.dim, |i, j| self.get(j, i))
    }

    /// Elementwise product (logical AND) of two equally sized bitmaps.
    pub fn and(&self, other: &Bitmap) -> Bitmap {
        debug_assert_eq!(self.dim, other.dim);
        Bitmap {
            dim: self.dim,
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
        }
    }

    pub fn and_assign(&mut self, other: &Bitmap) {
        debug_assert_eq!(self.dim, other.dim);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= b;
        }
    }

    /// Number of set entries (the sum of the bitmap).
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    /// Set entries as `(i, j)` row pairs, row-major.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let dim = self.dim;
        self.words.iter().enumerate().flat_map(move |(w, &word)| {
            (0..WORD_BITS)
                .filter(move |b| (word >> b) & 1 == 1)
                .map(move |b| {
                    let bit = w * WORD_BITS + b;
                    (bit / dim, bit % dim)
                })
        })
    }

    /// Edge list of the pairwise relation.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.pairs().collect()
    }
}

/// Support of a bitmap over `row_count` rows.
pub fn support_of(bitmap: &Bitmap, row_count: usize) -> f64 {
    pair_support(bitmap.count_ones() as usize, row_count)
}

/// Support of `count` respected row pairs over `row_count` rows.
pub fn pair_support(count: usize, row_count: usize) -> f64 {
    let pairs = row_count as f64 * (row_count as f64 - 1.0) / 2.0;
    if pairs <= 0.0 {
        return 0.0;
    }
    count as f64 / pairs
}

/// A gradual item with its pairwise bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct GradualBin {
    pub item: GradualItem,
    pub bitmap: Bitmap,
}

/// Read-only source of gradual-item bitmaps for one discovery run.
///
/// Shared by reference across concurrent evaluations.
pub trait BitmapProvider: Sync {
    /// Number of rows `n` the bitmaps were built from.
    fn row_count(&self) -> usize;

    /// Minimum support threshold in `(0, 1]`.
    fn min_support(&self) -> f64;

    /// Items whose own support cleared the threshold, with their bitmaps, in a
    /// fixed order.
    fn gradual_bins(&self) -> &[GradualBin];

    /// Column display names.
    fn titles(&self) -> &[String];

    /// Bitmap of an exact item, if the provider holds one.
    fn bitmap(&self, item: &GradualItem) -> Option<&Bitmap> {
        self.gradual_bins()
            .iter()
            .find(|bin| bin.item == *item)
            .map(|bin| &bin.bitmap)
    }

    fn support(&self, bitmap: &Bitmap) -> f64 {
        support_of(bitmap, self.row_count())
    }
}

/// Errors raised while building a data context.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    #[error("Data set has no columns")]
    NoColumns,
    #[error("At least 2 rows are required (got {0})")]
    TooFewRows(usize),
    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Expected {expected} column titles, got {found}")]
    TitleMismatch { expected: usize, found: usize },
    #[error("Minimum support must be in (0, 1] (got {0})")]
    InvalidSupport(f64),
    #[error("Bitmap for {item} has support {support} above 1")]
    SupportOverflow { item: GradualItem, support: f64 },
    #[error("Bitmap for {item} is {found}x{found}, expected {expected}x{expected}")]
    BitmapDimension {
        item: GradualItem,
        expected: usize,
        found: usize,
    },
}

/// In-memory data context: a numeric table, its fitted bitmaps, and the
/// patterns discovered by the last run.
#[derive(Debug, Clone)]
pub struct GradualData {
    titles: Vec<String>,
    row_count: usize,
    min_support: f64,
    bins: Vec<GradualBin>,
    gradual_patterns: Vec<Pattern>,
}

impl GradualData {
    /// Fit bitmaps for a row-major numeric table. Equal values never order a pair.
    pub fn new(titles: Vec<String>, rows: &[Vec<f64>], min_support: f64) -> Result<Self, DataError> {
        Self::with_ties(titles, rows, min_support, false)
    }

    /// Like [`GradualData::new`]; with `equal` set, a tied pair counts once
    /// toward each variation (as increasing in row order for `+`).
    pub fn with_ties(
        titles: Vec<String>,
        rows: &[Vec<f64>],
        min_support: f64,
        equal: bool,
    ) -> Result<Self, DataError> {
        check_support(min_support)?;
        let row_count = rows.len();
        if titles.is_empty() {
            return Err(DataError::NoColumns);
        }
        if row_count < 2 {
            return Err(DataError::TooFewRows(row_count));
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != titles.len() {
                return Err(DataError::RaggedRow {
                    row,
                    expected: titles.len(),
                    found: values.len(),
                });
            }
        }

        let columns: Vec<Vec<f64>> = (0..titles.len())
            .map(|c| rows.iter().map(|r| r[c]).collect())
            .collect();

        let bins = columns
            .par_iter()
            .enumerate()
            .map(|(attribute, column)| fit_column(attribute, column, min_support, equal))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        log::debug!(
            "Fitted {} gradual bins from {} columns x {} rows",
            bins.len(),
            titles.len(),
            row_count
        );

        Ok(Self {
            titles,
            row_count,
            min_support,
            bins,
            gradual_patterns: Vec::new(),
        })
    }

    /// Wrap bitmaps that were built elsewhere.
    pub fn from_bins(
        titles: Vec<String>,
        row_count: usize,
        min_support: f64,
        bins: Vec<GradualBin>,
    ) -> Result<Self, DataError> {
        check_support(min_support)?;
        if row_count < 2 {
            return Err(DataError::TooFewRows(row_count));
        }
        if let Some(bin) = bins.iter().find(|b| b.bitmap.dim() != row_count) {
            return Err(DataError::BitmapDimension {
                item: bin.item,
                expected: row_count,
                found: bin.bitmap.dim(),
            });
        }
        if let Some(bin) = bins.iter().find(|b| support_of(&b.bitmap, row_count) > 1.0) {
            return Err(DataError::SupportOverflow {
                item: bin.item,
                support: support_of(&bin.bitmap, row_count),
            });
        }
        if let Some(max_attr) = bins.iter().map(|b| b.item.attribute).max()
            && max_attr >= titles.len()
        {
            return Err(DataError::TitleMismatch {
                expected: max_attr + 1,
                found: titles.len(),
            });
        }
        Ok(Self {
            titles,
            row_count,
            min_support,
            bins,
            gradual_patterns: Vec::new(),
        })
    }

    /// True when no gradual item cleared the threshold.
    pub fn no_bins(&self) -> bool {
        self.bins.is_empty()
    }

    /// Patterns stored by the last discovery run.
    pub fn gradual_patterns(&self) -> &[Pattern] {
        &self.gradual_patterns
    }

    pub fn set_gradual_patterns(&mut self, patterns: Vec<Pattern>) {
        self.gradual_patterns = patterns;
    }
}

impl BitmapProvider for GradualData {
    fn row_count(&self) -> usize {
        self.row_count
    }

    fn min_support(&self) -> f64 {
        self.min_support
    }

    fn gradual_bins(&self) -> &[GradualBin] {
        &self.bins
    }

    fn titles(&self) -> &[String] {
        &self.titles
    }
}

fn check_support(min_support: f64) -> Result<(), DataError> {
    if min_support > 0.0 && min_support <= 1.0 {
        Ok(())
    } else {
        Err(DataError::InvalidSupport(min_support))
    }
}

/// Both bins of one column, or none if the column rarely varies.
fn fit_column(attribute: usize, column: &[f64], min_support: f64, equal: bool) -> Vec<GradualBin> {
    let n = column.len();
    let increasing = Bitmap::from_fn(n, |i, j| {
        if equal {
            column[j] < column[i] || (column[j] == column[i] && i > j)
        } else {
            column[j] < column[i]
        }
    });
    if support_of(&increasing, n) < min_support {
        return Vec::new();
    }
    let decreasing = increasing.transpose();
    vec![
        GradualBin {
            item: GradualItem::increasing(attribute),
            bitmap: increasing,
        },
        GradualBin {
            item: GradualItem::decreasing(attribute),
            bitmap: decreasing,
        },
    ]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Five rows over Age, Salary, Cars, Expenses.
    pub(crate) fn dummy_data(min_support: f64) -> GradualData {
        let rows = vec![
            vec![30.0, 3.0, 1.0, 10.0],
            vec![35.0, 2.0, 2.0, 8.0],
            vec![40.0, 4.0, 2.0, 7.0],
            vec![50.0, 1.0, 1.0, 6.0],
            vec![52.0, 7.0, 1.0, 2.0],
        ];
        let titles = ["Age", "Salary", "Cars", "Expenses"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        GradualData::new(titles, &rows, min_support).unwrap()
    }

    #[test]
    fn test_bitmap_ops() {
        let a = Bitmap::from_fn(3, |i, j| i > j);
        let b = Bitmap::from_fn(3, |i, _| i == 2);
        assert_eq!(a.count_ones(), 3);
        assert_eq!(a.and(&b).count_ones(), 2);
        assert_eq!(a.transpose(), Bitmap::from_fn(3, |i, j| i < j));

        let mut c = a.clone();
        c.and_assign(&b);
        assert_eq!(c, a.and(&b));
        c.set(2, 0, false);
        assert!(!c.get(2, 0));
        assert!(c.get(2, 1));
    }

    #[test]
    fn test_support_of_strict_order() {
        let full = Bitmap::from_fn(5, |i, j| i > j);
        assert_eq!(support_of(&full, 5), 1.0);
        assert_eq!(support_of(&full, 1), 0.0);
    }

    #[test]
    fn test_fit_dummy_bins() {
        let data = dummy_data(0.5);
        // Every column varies on at least half of the row pairs.
        assert_eq!(data.gradual_bins().len(), 8);
        assert_eq!(data.gradual_bins()[0].item, GradualItem::increasing(0));
        assert_eq!(data.gradual_bins()[7].item, GradualItem::decreasing(3));

        let age = data.bitmap(&GradualItem::increasing(0)).unwrap();
        let expenses = data.bitmap(&GradualItem::decreasing(3)).unwrap();
        assert_eq!(data.support(&age.and(expenses)), 1.0);
    }

    #[test]
    fn test_low_variation_column_dropped() {
        // Cars only orders 6 of 10 pairs.
        let data = dummy_data(0.7);
        assert!(data.bitmap(&GradualItem::increasing(2)).is_none());
        assert!(data.bitmap(&GradualItem::increasing(0)).is_some());
    }

    #[test]
    fn test_invalid_tables() {
        let titles = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            GradualData::new(titles.clone(), &[vec![1.0, 2.0]], 0.5).unwrap_err(),
            DataError::TooFewRows(1)
        );
        assert!(matches!(
            GradualData::new(titles.clone(), &[vec![1.0, 2.0], vec![1.0]], 0.5),
            Err(DataError::RaggedRow { row: 1, .. })
        ));
        assert_eq!(
            GradualData::new(titles, &[vec![1.0, 2.0], vec![2.0, 1.0]], 0.0).unwrap_err(),
            DataError::InvalidSupport(0.0)
        );
    }

    #[test]
    fn test_pairs_and_edges() {
        let bitmap = Bitmap::from_fn(3, |i, j| i > j);
        assert_eq!(bitmap.edges(), vec![(1, 0), (2, 0), (2, 1)]);
        assert_eq!(bitmap.pairs().count() as u64, bitmap.count_ones());
        assert!(Bitmap::new(4).edges().is_empty());

        // Spans more than one word.
        let wide = Bitmap::from_fn(12, |i, j| i == 11 && j == 10);
        assert_eq!(wide.edges(), vec![(11, 10)]);
    }

    #[test]
    fn test_ties_count_once() {
        let titles = vec!["a".to_string()];
        let rows = vec![vec![1.0], vec![1.0], vec![2.0]];
        let data = GradualData::with_ties(titles.clone(), &rows, 0.5, true).unwrap();
        let up = data.bitmap(&GradualItem::increasing(0)).unwrap();
        let down = data.bitmap(&GradualItem::decreasing(0)).unwrap();
        assert_eq!(data.support(up), 1.0);
        assert_eq!(data.support(down), 1.0);
        assert_eq!(up.and(down).count_ones(), 0);

        // Without ties only the two strict pairs order.
        let strict = GradualData::with_ties(titles, &rows, 0.5, false).unwrap();
        let up = strict.bitmap(&GradualItem::increasing(0)).unwrap();
        assert!((strict.support(up) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_tied_table_supports_bounded() {
        let titles = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let rows = vec![
            vec![1.0, 1.0, 1.0, 10.0],
            vec![1.0, 1.0, 2.0, 8.0],
            vec![1.0, 1.0, 2.0, 7.0],
            vec![1.0, 1.0, 1.0, 6.0],
            vec![2.0, 2.0, 1.0, 2.0],
        ];
        let data = GradualData::with_ties(titles, &rows, 0.5, true).unwrap();
        for bin in data.gradual_bins() {
            let support = data.support(&bin.bitmap);
            assert!(support <= 1.0, "{} has support {support}", bin.item);
        }
    }

    #[test]
    fn test_from_bins_rejects_overfull_bitmap() {
        let bins = vec![GradualBin {
            item: GradualItem::increasing(0),
            bitmap: Bitmap::from_fn(3, |i, j| i != j),
        }];
        assert!(matches!(
            GradualData::from_bins(vec!["a".into()], 3, 0.5, bins),
            Err(DataError::SupportOverflow { .. })
        ));
    }

    #[test]
    fn test_provider_is_shareable() {
        fn assert_sync<T: Sync + ?Sized>() {}
        assert_sync::<dyn BitmapProvider>();
        assert_sync::<GradualData>();
    }

    #[test]
    fn test_from_bins_checks_dimension() {
        let bins = vec![GradualBin {
            item: GradualItem::increasing(0),
            bitmap: Bitmap::new(3),
        }];
        assert!(matches!(
            GradualData::from_bins(vec!["a".into()], 4, 0.5, bins),
            Err(DataError::BitmapDimension { expected: 4, found: 3, .. })
        ));
    }
}
