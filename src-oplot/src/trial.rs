//! Trial records as seen by the plotting core
//!
//! The core never owns or mutates trials: anything implementing
//! [`TrialRecord`] can be plotted, and [`Study`]/[`Trial`] are the
//! concrete records used when reading a JSON snapshot.

use std::fmt;
use std::io::Read;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::OplotError;

/// Lifecycle state of a trial; only `Complete` trials are analysed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrialState {
	Running,
	Complete,
	Pruned,
	Failed,
}

impl TrialState {
	pub fn is_complete(self) -> bool {
		self == TrialState::Complete
	}
}

/// A scalar recorded on a trial (parameter, user attribute or objective value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
	Int(i64),
	Float(f64),
	Bool(bool),
	Str(String),
}

impl ParamValue {
	/// Numeric view used to place a value on a plot axis.
	///
	/// Booleans map to 0/1, strings have no numeric position.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			ParamValue::Int(v) => Some(*v as f64),
			ParamValue::Float(v) => Some(*v),
			ParamValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
			ParamValue::Str(_) => None,
		}
	}

	pub fn is_numeric(&self) -> bool {
		matches!(self, ParamValue::Int(_) | ParamValue::Float(_))
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ParamValue::Int(v) => write!(f, "{}", v),
			ParamValue::Float(v) => write!(f, "{}", v),
			ParamValue::Bool(v) => write!(f, "{}", v),
			ParamValue::Str(v) => f.write_str(v),
		}
	}
}

impl From<i64> for ParamValue {
	fn from(v: i64) -> Self {
		ParamValue::Int(v)
	}
}

impl From<i32> for ParamValue {
	fn from(v: i32) -> Self {
		ParamValue::Int(v as i64)
	}
}

impl From<f64> for ParamValue {
	fn from(v: f64) -> Self {
		ParamValue::Float(v)
	}
}

impl From<bool> for ParamValue {
	fn from(v: bool) -> Self {
		ParamValue::Bool(v)
	}
}

impl From<&str> for ParamValue {
	fn from(v: &str) -> Self {
		ParamValue::Str(v.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(v: String) -> Self {
		ParamValue::Str(v)
	}
}

/// Name -> value mapping that remembers insertion order.
///
/// Hover labels list parameters in the order the sampler produced them,
/// so a hash map is not enough here. Re-inserting a key replaces the value
/// but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
	entries: Vec<(String, ParamValue)>,
}

impl Params {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
		let key = key.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some(slot) => slot.1 = value,
			None => self.entries.push((key, value)),
		}
	}

	pub fn get(&self, key: &str) -> Option<&ParamValue> {
		self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(k, _)| k.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = Params::new();
		for (k, v) in iter {
			params.insert(k, v);
		}
		params
	}
}

impl Serialize for Params {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (k, v) in &self.entries {
			map.serialize_entry(k, v)?;
		}
		map.end()
	}
}

struct ParamsVisitor;

impl<'de> Visitor<'de> for ParamsVisitor {
	type Value = Params;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a map of names to scalar values")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Params, A::Error> {
		let mut params = Params::new();
		while let Some((key, value)) = access.next_entry::<String, ParamValue>()? {
			params.insert(key, value);
		}
		Ok(params)
	}
}

impl<'de> Deserialize<'de> for Params {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(ParamsVisitor)
	}
}

/// Read-only view of one trial.
///
/// Any record exposing these five fields can be plotted.
pub trait TrialRecord {
	fn number(&self) -> u64;
	fn state(&self) -> TrialState;
	fn params(&self) -> &Params;
	fn user_attrs(&self) -> &Params;
	/// Objective values, positionally aligned with the configured objective names
	fn values(&self) -> &[ParamValue];
}

impl<T: TrialRecord + ?Sized> TrialRecord for &T {
	fn number(&self) -> u64 {
		(**self).number()
	}
	fn state(&self) -> TrialState {
		(**self).state()
	}
	fn params(&self) -> &Params {
		(**self).params()
	}
	fn user_attrs(&self) -> &Params {
		(**self).user_attrs()
	}
	fn values(&self) -> &[ParamValue] {
		(**self).values()
	}
}

/// An ordered collection of trials (insertion order = trial number order)
pub trait TrialSource {
	type Trial: TrialRecord;

	fn trials(&self) -> &[Self::Trial];
}

/// One optimization trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
	pub number: u64,
	pub state: TrialState,
	#[serde(default)]
	pub params: Params,
	#[serde(default)]
	pub user_attrs: Params,
	#[serde(default)]
	pub values: Vec<ParamValue>,
}

impl Trial {
	/// A completed trial without parameters, attributes or values
	pub fn new(number: u64) -> Self {
		Self {
			number,
			state: TrialState::Complete,
			params: Params::new(),
			user_attrs: Params::new(),
			values: Vec::new(),
		}
	}

	pub fn with_state(mut self, state: TrialState) -> Self {
		self.state = state;
		self
	}

	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.params.insert(name, value);
		self
	}

	pub fn with_user_attr(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.user_attrs.insert(name, value);
		self
	}

	pub fn with_values<V: Into<ParamValue>>(mut self, values: Vec<V>) -> Self {
		self.values = values.into_iter().map(Into::into).collect();
		self
	}
}

impl TrialRecord for Trial {
	fn number(&self) -> u64 {
		self.number
	}
	fn state(&self) -> TrialState {
		self.state
	}
	fn params(&self) -> &Params {
		&self.params
	}
	fn user_attrs(&self) -> &Params {
		&self.user_attrs
	}
	fn values(&self) -> &[ParamValue] {
		&self.values
	}
}

/// A snapshot of a study: its trials in creation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Study {
	pub trials: Vec<Trial>,
}

impl Study {
	pub fn new(trials: Vec<Trial>) -> Self {
		Self { trials }
	}

	/// Read a study snapshot from JSON, `{"trials": [...]}`
	pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, OplotError> {
		Ok(serde_json::from_reader(reader)?)
	}

	pub fn from_json_str(s: &str) -> Result<Self, OplotError> {
		Ok(serde_json::from_str(s)?)
	}

	pub fn completed_trials(&self) -> impl Iterator<Item = &Trial> {
		self.trials.iter().filter(|t| t.state.is_complete())
	}
}

impl TrialSource for Study {
	type Trial = Trial;

	fn trials(&self) -> &[Trial] {
		&self.trials
	}
}

impl<T: TrialRecord> TrialSource for Vec<T> {
	type Trial = T;

	fn trials(&self) -> &[T] {
		self
	}
}
