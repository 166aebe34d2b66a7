//! Result record produced by every mining engine.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{Pattern, RenderedPattern};

/// Outcome of one discovery run.
///
/// Serialises to the report shape
/// `{"Algorithm", "Patterns" | "Best Patterns", "Invalid Count", "Iterations"?}`.
/// The exhaustive engine leaves `iterations` unset and reports under
/// `"Patterns"`; metaheuristics report under `"Best Patterns"`.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningResult {
    /// Engine name, e.g. `"GRAANK"` or `"LS-GRAANK"`.
    pub algorithm: String,
    /// Accepted patterns, in acceptance order.
    pub patterns: Vec<Pattern>,
    /// Accepted patterns rendered with column names.
    pub rendered: Vec<RenderedPattern>,
    /// Candidates (exhaustive) or evaluations (metaheuristic) that failed.
    pub invalid_count: usize,
    /// Iterations executed; metaheuristics only.
    pub iterations: Option<usize>,
    /// Cost evaluations (metaheuristic) or support computations (exhaustive).
    pub evaluations: usize,
    /// Wall-clock duration of the run.
    pub elapsed_seconds: f64,
}

impl MiningResult {
    /// A well-formed result with no patterns.
    pub fn empty(algorithm: &str, iterations: Option<usize>) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            patterns: Vec::new(),
            rendered: Vec::new(),
            invalid_count: 0,
            iterations,
            evaluations: 0,
            elapsed_seconds: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if some accepted pattern has exactly these rendered items, in any order.
    pub fn contains_rendered(&self, items: &[&str]) -> bool {
        self.rendered.iter().any(|RenderedPattern(names, _)| {
            names.len() == items.len() && items.iter().all(|i| names.iter().any(|n| n == i))
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for MiningResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Algorithm", &self.algorithm)?;
        let key = if self.iterations.is_some() {
            "Best Patterns"
        } else {
            "Patterns"
        };
        map.serialize_entry(key, &self.rendered)?;
        map.serialize_entry("Invalid Count", &self.invalid_count)?;
        if let Some(iterations) = self.iterations {
            map.serialize_entry("Iterations", &iterations)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustive_shape() {
        let mut result = MiningResult::empty("GRAANK", None);
        result
            .rendered
            .push(RenderedPattern(vec!["Age+".into(), "Expenses-".into()], 1.0));
        result.invalid_count = 4;
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"Algorithm":"GRAANK","Patterns":[[["Age+","Expenses-"],1.0]],"Invalid Count":4}"#
        );
        assert!(result.contains_rendered(&["Expenses-", "Age+"]));
        assert!(!result.contains_rendered(&["Age+"]));
    }

    #[test]
    fn test_metaheuristic_shape() {
        let result = MiningResult::empty("LS-GRAANK", Some(3));
        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(value["Algorithm"], "LS-GRAANK");
        assert_eq!(value["Best Patterns"], serde_json::json!([]));
        assert_eq!(value["Iterations"], 3);
        assert!(value.get("Patterns").is_none());
    }
}
