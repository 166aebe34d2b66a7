//! Gradual items and gradual patterns.
//!
//! A gradual item pairs a column with a variation ("this column increases" or
//! "this column decreases"). A gradual pattern is a set of such items on
//! distinct columns, scored by the fraction of row pairs that respect every
//! item at once.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TimeDelay;

/// Variation of a column along row pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Increasing,
    Decreasing,
}

impl Direction {
    /// Parse a variation symbol (`'+'` or `'-'`).
    pub fn from_symbol(symbol: char) -> Result<Self, PatternError> {
        match symbol {
            '+' => Ok(Self::Increasing),
            '-' => Ok(Self::Decreasing),
            other => Err(PatternError::InvalidSymbol(other)),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Increasing => '+',
            Self::Decreasing => '-',
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Self::Increasing => Self::Decreasing,
            Self::Decreasing => Self::Increasing,
        }
    }

    fn key_suffix(self) -> &'static str {
        match self {
            Self::Increasing => "pos",
            Self::Decreasing => "neg",
        }
    }
}

/// Errors raised while building pattern values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid variation symbol '{0}' (expected '+' or '-')")]
    InvalidSymbol(char),
    #[error("Invalid gradual item '{0}'")]
    InvalidKey(String),
}

/// A gradual item: one column with one variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GradualItem {
    /// Column index in the source table.
    pub attribute: usize,
    /// Increasing or decreasing.
    pub direction: Direction,
}

impl GradualItem {
    pub fn new(attribute: usize, direction: Direction) -> Self {
        Self {
            attribute,
            direction,
        }
    }

    pub fn increasing(attribute: usize) -> Self {
        Self::new(attribute, Direction::Increasing)
    }

    pub fn decreasing(attribute: usize) -> Self {
        Self::new(attribute, Direction::Decreasing)
    }

    /// Build an item from a raw variation symbol. Fails on anything but `+`/`-`.
    pub fn from_symbol(attribute: usize, symbol: char) -> Result<Self, PatternError> {
        Ok(Self::new(attribute, Direction::from_symbol(symbol)?))
    }

    /// Parse a canonical key such as `"3_pos"` or `"0_neg"`.
    pub fn parse_key(key: &str) -> Result<Self, PatternError> {
        let invalid = || PatternError::InvalidKey(key.to_string());
        let (attr, suffix) = key.split_once('_').ok_or_else(invalid)?;
        let attribute = attr.parse::<usize>().map_err(|_| invalid())?;
        let direction = match suffix {
            "pos" => Direction::Increasing,
            "neg" => Direction::Decreasing,
            _ => return Err(invalid()),
        };
        Ok(Self::new(attribute, direction))
    }

    /// Same column, opposite variation.
    pub fn inverse(&self) -> Self {
        Self::new(self.attribute, self.direction.inverse())
    }

    pub fn is_decreasing(&self) -> bool {
        self.direction == Direction::Decreasing
    }

    /// Canonical key: `"<attr>_pos"` or `"<attr>_neg"`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.attribute, self.direction.key_suffix())
    }

    /// Integer form: `(attr, 1)` for increasing, `(attr, -1)` for decreasing.
    pub fn as_integer(&self) -> (usize, i8) {
        match self.direction {
            Direction::Increasing => (self.attribute, 1),
            Direction::Decreasing => (self.attribute, -1),
        }
    }

    /// Render with a real column name, e.g. `"Age+"`.
    pub fn render(&self, titles: &[String]) -> String {
        match titles.get(self.attribute) {
            Some(title) => format!("{}{}", title, self.direction.symbol()),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for GradualItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.attribute, self.direction.symbol())
    }
}

impl FromStr for GradualItem {
    type Err = PatternError;

    /// Parse the compact form, e.g. `"2-"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s
            .chars()
            .last()
            .ok_or_else(|| PatternError::InvalidKey(s.to_string()))?;
        let attr = &s[..s.len() - symbol.len_utf8()];
        let attribute = attr
            .parse::<usize>()
            .map_err(|_| PatternError::InvalidKey(s.to_string()))?;
        Self::from_symbol(attribute, symbol)
    }
}

/// A pattern rendered with column names: `[["Age+", "Expenses-"], 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPattern(pub Vec<String>, pub f64);

/// A gradual pattern.
///
/// Items keep insertion order, since incremental validation commits them one
/// at a time. Equivalence between patterns is set based and treats a pattern
/// and its fully inverted twin as the same relationship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    items: Vec<GradualItem>,
    support: f64,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pattern from items, support left unset.
    pub fn from_items<I: IntoIterator<Item = GradualItem>>(items: I) -> Self {
        Self {
            items: items.into_iter().collect(),
            support: 0.0,
        }
    }

    pub fn items(&self) -> &[GradualItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn support(&self) -> f64 {
        self.support
    }

    /// Store support rounded to 3 decimals. Values above 1 are refused.
    pub fn set_support(&mut self, support: f64) -> bool {
        if support <= 1.0 {
            self.support = round3(support);
            true
        } else {
            false
        }
    }

    pub fn add_item(&mut self, item: GradualItem) {
        self.items.push(item);
    }

    /// Append items given in compact form (`["0+", "2-"]`).
    pub fn add_items_from_strs<S: AsRef<str>>(&mut self, items: &[S]) -> Result<(), PatternError> {
        for s in items {
            self.items.push(s.as_ref().parse()?);
        }
        Ok(())
    }

    /// Position of an exact item, if present.
    pub fn find_index(&self, item: &GradualItem) -> Option<usize> {
        self.items.iter().position(|gi| gi == item)
    }

    pub fn contains(&self, item: &GradualItem) -> bool {
        self.items.contains(item)
    }

    /// True if any item sits on the given column, in either direction.
    pub fn contains_attribute(&self, attribute: usize) -> bool {
        self.items.iter().any(|gi| gi.attribute == attribute)
    }

    /// Split into column indices and integer variations (`1` / `-1`).
    pub fn decompose(&self) -> (Vec<usize>, Vec<i8>) {
        self.items.iter().map(GradualItem::as_integer).unzip()
    }

    pub fn item_set(&self) -> HashSet<GradualItem> {
        self.items.iter().copied().collect()
    }

    /// The item set with every direction flipped.
    pub fn inverse_set(&self) -> HashSet<GradualItem> {
        self.items.iter().map(GradualItem::inverse).collect()
    }

    /// The fully inverted twin of this pattern (same support).
    pub fn inverse(&self) -> Self {
        Self {
            items: self.items.iter().map(GradualItem::inverse).collect(),
            support: self.support,
        }
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }

    pub fn to_keys(&self) -> Vec<String> {
        self.items.iter().map(GradualItem::key).collect()
    }

    pub fn render(&self, titles: &[String]) -> RenderedPattern {
        RenderedPattern(
            self.items.iter().map(|gi| gi.render(titles)).collect(),
            self.support,
        )
    }
}

impl AsRef<Pattern> for Pattern {
    fn as_ref(&self) -> &Pattern {
        self
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}: {}", self.to_strings().join(", "), self.support)
    }
}

/// A pattern with a count of how often a search rediscovered it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedPattern {
    pub pattern: Pattern,
    pub freq_count: usize,
}

impl ExtendedPattern {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            freq_count: 0,
        }
    }
}

impl AsRef<Pattern> for ExtendedPattern {
    fn as_ref(&self) -> &Pattern {
        &self.pattern
    }
}

impl From<Pattern> for ExtendedPattern {
    fn from(pattern: Pattern) -> Self {
        Self::new(pattern)
    }
}

/// A gradual pattern anchored on a target item, with the other items
/// correlating at a time delay.
///
/// The target and every temporal item are also members of the underlying
/// pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalPattern {
    pub pattern: Pattern,
    target: Option<GradualItem>,
    temporal_items: Vec<(GradualItem, TimeDelay)>,
}

impl TemporalPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&GradualItem> {
        self.target.as_ref()
    }

    pub fn temporal_items(&self) -> &[(GradualItem, TimeDelay)] {
        &self.temporal_items
    }

    pub fn add_target_item(&mut self, item: GradualItem) {
        self.pattern.add_item(item);
        self.target = Some(item);
    }

    pub fn add_temporal_item(&mut self, item: GradualItem, delay: TimeDelay) {
        self.pattern.add_item(item);
        self.temporal_items.push((item, delay));
    }

    /// Target first, then `"(2-) +3 hours"` for each delayed item.
    pub fn to_strings(&self) -> Vec<String> {
        self.strings_with(|gi| gi.to_string())
    }

    pub fn render(&self, titles: &[String]) -> RenderedPattern {
        RenderedPattern(
            self.strings_with(|gi| gi.render(titles)),
            self.pattern.support(),
        )
    }

    fn strings_with(&self, name: impl Fn(&GradualItem) -> String) -> Vec<String> {
        let mut out: Vec<String> = self.target.iter().map(&name).collect();
        for (item, delay) in &self.temporal_items {
            out.push(format!("({}) {}", name(item), delay.describe()));
        }
        out
    }
}

impl AsRef<Pattern> for TemporalPattern {
    fn as_ref(&self) -> &Pattern {
        &self.pattern
    }
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_forms() {
        let gi = GradualItem::increasing(1);
        assert_eq!(gi.to_string(), "1+");
        assert_eq!(gi.key(), "1_pos");
        assert_eq!(gi.inverse().key(), "1_neg");
        assert_eq!(gi.inverse().as_integer(), (1, -1));
        assert!(gi.inverse().is_decreasing());
    }

    #[test]
    fn test_invalid_symbol_rejected() {
        assert_eq!(
            GradualItem::from_symbol(0, 'x'),
            Err(PatternError::InvalidSymbol('x'))
        );
        assert!("3*".parse::<GradualItem>().is_err());
        assert!(GradualItem::parse_key("3_inv").is_err());
        assert!(GradualItem::parse_key("abc").is_err());
    }

    #[test]
    fn test_parse_key_and_compact() {
        assert_eq!(
            GradualItem::parse_key("12_neg").unwrap(),
            GradualItem::decreasing(12)
        );
        assert_eq!(
            "12-".parse::<GradualItem>().unwrap(),
            GradualItem::decreasing(12)
        );
    }

    #[test]
    fn test_support_rounding() {
        let mut gp = Pattern::new();
        assert!(gp.set_support(0.66666));
        assert_eq!(gp.support(), 0.667);
        assert!(!gp.set_support(1.2));
        assert_eq!(gp.support(), 0.667);
    }

    #[test]
    fn test_pattern_views() {
        let mut gp = Pattern::new();
        gp.add_items_from_strs(&["0+", "2-", "3-"]).unwrap();
        assert_eq!(gp.len(), 3);
        assert!(gp.contains_attribute(2));
        assert!(!gp.contains_attribute(1));
        assert_eq!(gp.find_index(&GradualItem::decreasing(3)), Some(2));
        assert_eq!(gp.decompose(), (vec![0, 2, 3], vec![1, -1, -1]));
        assert_eq!(gp.inverse().to_strings(), vec!["0-", "2+", "3+"]);
        assert_eq!(gp.inverse_set(), gp.inverse().item_set());
        assert_eq!(gp.to_keys(), vec!["0_pos", "2_neg", "3_neg"]);
    }

    #[test]
    fn test_render_with_titles() {
        let titles: Vec<String> = ["Age", "Salary", "Cars", "Expenses"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut gp = Pattern::from_items([GradualItem::increasing(0), GradualItem::decreasing(3)]);
        gp.set_support(1.0);
        let rendered = gp.render(&titles);
        assert_eq!(rendered.0, vec!["Age+", "Expenses-"]);
        assert_eq!(
            serde_json::to_string(&rendered).unwrap(),
            r#"[["Age+","Expenses-"],1.0]"#
        );
    }

    #[test]
    fn test_temporal_pattern_strings() {
        let mut tgp = TemporalPattern::new();
        tgp.add_target_item(GradualItem::increasing(1));
        tgp.add_temporal_item(GradualItem::decreasing(2), TimeDelay::new(7200.0, 0.8));
        assert_eq!(tgp.pattern.len(), 2);
        assert_eq!(tgp.target(), Some(&GradualItem::increasing(1)));
        assert_eq!(tgp.to_strings(), vec!["1+", "(2-) +2 hours"]);

        let titles = vec!["Date".to_string(), "Age".to_string(), "Salary".to_string()];
        assert_eq!(tgp.render(&titles).0, vec!["Age+", "(Salary-) +2 hours"]);
    }
}
