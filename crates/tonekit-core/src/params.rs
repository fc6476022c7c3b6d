//! Bounded effect parameters.
//!
//! Every parameter has a documented range and default. Out-of-range values
//! are clamped rather than rejected, and each correction is reported back in
//! a [`ClampReport`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Declared range and default of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamSpec {
    pub const fn new(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            min,
            max,
            default,
        }
    }

    /// Clamp `value` into range.
    ///
    /// NaN resolves to the default. A note is returned whenever the applied
    /// value differs from the requested one.
    pub fn clamp(&self, value: f32) -> (f32, Option<ClampNote>) {
        let applied = if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        };
        if applied == value {
            return (applied, None);
        }
        let note = ClampNote {
            name: self.name.to_string(),
            requested: value,
            applied,
        };
        (applied, Some(note))
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A single clamping correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClampNote {
    pub name: String,
    pub requested: f32,
    pub applied: f32,
}

/// All clamping corrections made while resolving a parameter set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClampReport {
    pub notes: Vec<ClampNote>,
}

impl ClampReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, note: ClampNote) {
        self.notes.push(note);
    }

    pub fn extend(&mut self, other: ClampReport) {
        self.notes.extend(other.notes);
    }

    /// True when nothing was clamped.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClampNote> {
        self.notes.iter()
    }
}

/// Parameter name to value mapping supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, f32>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: f32) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f32) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.0.get(name).copied()
    }

    /// Value for `name`, or `fallback` when absent.
    pub fn get_or(&self, name: &str, fallback: f32) -> f32 {
        self.get(name).unwrap_or(fallback)
    }

    pub fn remove(&mut self, name: &str) -> Option<f32> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Defaults for every spec.
    pub fn defaults(specs: &[ParamSpec]) -> Self {
        specs.iter().map(|s| (s.name, s.default)).collect()
    }

    /// Resolve against `specs`: missing values take their default, present
    /// values are clamped, and names no spec declares are ignored.
    pub fn resolve(&self, specs: &[ParamSpec]) -> (ParameterSet, ClampReport) {
        let mut resolved = ParameterSet::new();
        let mut report = ClampReport::new();
        for spec in specs {
            let value = match self.get(spec.name) {
                Some(requested) => {
                    let (applied, note) = spec.clamp(requested);
                    if let Some(note) = note {
                        warn!(
                            parameter = spec.name,
                            requested = note.requested,
                            applied = note.applied,
                            "Parameter clamped"
                        );
                        report.push(note);
                    }
                    applied
                }
                None => spec.default,
            };
            resolved.set(spec.name, value);
        }
        for (name, _) in self.iter() {
            if !specs.iter().any(|s| s.name == name) {
                debug!(parameter = name, "Ignoring undeclared parameter");
            }
        }
        (resolved, report)
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: [ParamSpec; 2] = [
        ParamSpec::new("brightness", 0.01, 3.0, 1.0),
        ParamSpec::new("saturation", 0.0, 3.0, 1.0),
    ];

    #[test]
    fn test_clamp_in_range_has_no_note() {
        let (v, note) = SPECS[0].clamp(2.0);
        assert_eq!(v, 2.0);
        assert!(note.is_none());
    }

    #[test]
    fn test_clamp_reports_correction() {
        let (v, note) = SPECS[0].clamp(0.0);
        assert_eq!(v, 0.01);
        assert_eq!(
            note,
            Some(ClampNote {
                name: "brightness".into(),
                requested: 0.0,
                applied: 0.01,
            })
        );
    }

    #[test]
    fn test_clamp_nan_uses_default() {
        let (v, note) = SPECS[1].clamp(f32::NAN);
        assert_eq!(v, 1.0);
        assert!(note.unwrap().requested.is_nan());
    }

    #[test]
    fn test_clamp_infinity() {
        assert_eq!(SPECS[1].clamp(f32::INFINITY).0, 3.0);
        assert_eq!(SPECS[1].clamp(f32::NEG_INFINITY).0, 0.0);
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let (resolved, report) = ParameterSet::new().resolve(&SPECS);
        assert_eq!(resolved.get("brightness"), Some(1.0));
        assert_eq!(resolved.get("saturation"), Some(1.0));
        assert!(report.is_empty());
    }

    #[test]
    fn test_resolve_clamps_and_ignores_unknown() {
        let params = ParameterSet::new()
            .with("brightness", 9.0)
            .with("saturation", 0.5)
            .with("gain", 4.0);
        let (resolved, report) = params.resolve(&SPECS);
        assert_eq!(resolved.get("brightness"), Some(3.0));
        assert_eq!(resolved.get("saturation"), Some(0.5));
        assert!(!resolved.contains("gain"));
        assert_eq!(report.len(), 1);
        assert_eq!(report.notes[0].name, "brightness");
    }

    #[test]
    fn test_defaults() {
        let params = ParameterSet::defaults(&SPECS);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get_or("brightness", 0.0), 1.0);
        assert_eq!(params.get_or("missing", 7.0), 7.0);
    }

    #[test]
    fn test_iter_yields_pairs() {
        let params = ParameterSet::new().with("contrast", 1.5);
        let (key, value) = params.iter().next().unwrap();
        assert_eq!(key, "contrast");
        assert_eq!(value, 1.5);
    }

    #[test]
    fn test_report_extend() {
        let mut a = ClampReport::new();
        let mut b = ClampReport::new();
        b.push(ClampNote {
            name: "x".into(),
            requested: 5.0,
            applied: 1.0,
        });
        a.extend(b);
        assert_eq!(a.len(), 1);
        assert_eq!(a.iter().next().unwrap().name, "x");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: resolved values always lie inside their declared range,
        /// and a note exists exactly when the value was changed.
        #[test]
        fn prop_resolve_in_range(value in prop::num::f32::ANY) {
            let spec = ParamSpec::new("p", -100.0, 100.0, 0.0);
            let (resolved, report) = ParameterSet::new().with("p", value).resolve(&[spec]);
            let applied = resolved.get("p").unwrap();
            prop_assert!(spec.contains(applied));
            prop_assert_eq!(report.is_empty(), applied == value);
        }
    }
}
