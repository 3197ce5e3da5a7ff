//! Query strings as an ordered multimap.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Separator between query pairs.
const PAIR_SEPARATOR: char = '&';

/// Separator between a key and its value.
const VALUE_SEPARATOR: char = '=';

/// A query value as seen by route handlers.
///
/// Keys that occur once yield [`QueryValue::Single`]; keys that repeat yield
/// [`QueryValue::Multiple`] with the values in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
	/// A key with one value.
	Single(String),
	/// A repeated key.
	Multiple(Vec<String>),
}

impl QueryValue {
	/// Returns the first value.
	pub fn first(&self) -> Option<&str> {
		match self {
			Self::Single(value) => Some(value),
			Self::Multiple(values) => values.first().map(String::as_str),
		}
	}

	/// Returns all values in order.
	pub fn as_slice(&self) -> &[String] {
		match self {
			Self::Single(value) => std::slice::from_ref(value),
			Self::Multiple(values) => values,
		}
	}
}

impl From<&str> for QueryValue {
	fn from(value: &str) -> Self {
		Self::Single(value.to_string())
	}
}

impl From<String> for QueryValue {
	fn from(value: String) -> Self {
		Self::Single(value)
	}
}

impl From<Vec<String>> for QueryValue {
	fn from(mut values: Vec<String>) -> Self {
		if values.len() == 1 {
			Self::Single(values.remove(0))
		} else {
			Self::Multiple(values)
		}
	}
}

/// Map handed to route handlers: key to decoded value(s).
pub type QueryMap = HashMap<String, QueryValue>;

/// An ordered query multimap.
///
/// Keys keep the order of their first occurrence and values keep insertion
/// order. Values are stored percent-decoded and re-encoded on [`Display`].
#[derive(Debug, Clone, Default)]
pub struct Query {
	entries: Vec<(String, Vec<String>)>,
}

impl Query {
	/// Creates an empty query.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a raw query string such as `kw=xxx&t=10&t=11`.
	///
	/// A pair without `=` is stored with an empty value. Empty pairs are
	/// skipped. Keys and values are percent-decoded; undecodable input is
	/// kept verbatim.
	pub fn parse(raw: &str) -> Self {
		let mut query = Self::new();
		for pair in raw.split(PAIR_SEPARATOR).filter(|pair| !pair.is_empty()) {
			let (key, value) = pair.split_once(VALUE_SEPARATOR).unwrap_or((pair, ""));
			query.add(decode(key), decode(value));
		}
		query
	}

	/// Appends a value for `key`, keeping any existing values.
	pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some((_, values)) => values.push(value),
			None => self.entries.push((key, vec![value])),
		}
	}

	/// Appends every pair of `pairs`.
	pub fn add_all<I, K, V>(&mut self, pairs: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (key, value) in pairs {
			self.add(key, value);
		}
	}

	/// Appends every value of `other`, in order.
	pub fn merge(&mut self, other: &Query) {
		for (key, values) in &other.entries {
			for value in values {
				self.add(key.clone(), value.clone());
			}
		}
	}

	/// Returns the values stored for `key`.
	pub fn values(&self, key: &str) -> &[String] {
		self.entries
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, values)| values.as_slice())
			.unwrap_or(&[])
	}

	/// Returns the value(s) stored for `key`.
	pub fn get(&self, key: &str) -> Option<QueryValue> {
		let values = self.values(key);
		(!values.is_empty()).then(|| QueryValue::from(values.to_vec()))
	}

	/// Returns whether `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.iter().any(|(k, _)| k == key)
	}

	/// Iterates over keys and their values in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.entries
			.iter()
			.map(|(key, values)| (key.as_str(), values.as_slice()))
	}

	/// Returns the number of distinct keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether no key is present.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Converts to the handler-facing map.
	pub fn to_map(&self) -> QueryMap {
		self.entries
			.iter()
			.map(|(key, values)| (key.clone(), QueryValue::from(values.clone())))
			.collect()
	}

	/// Multiset equality: same keys, and for every key the same values
	/// regardless of their order.
	pub fn equal(&self, other: &Query) -> bool {
		self.len() == other.len()
			&& self.entries.iter().all(|(key, values)| {
				let theirs = other.values(key);
				if values.len() != theirs.len() {
					return false;
				}
				let mut ours: Vec<&String> = values.iter().collect();
				let mut theirs: Vec<&String> = theirs.iter().collect();
				ours.sort();
				theirs.sort();
				ours == theirs
			})
	}
}

impl PartialEq for Query {
	fn eq(&self, other: &Self) -> bool {
		self.equal(other)
	}
}

impl Eq for Query {}

impl fmt::Display for Query {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for (key, values) in &self.entries {
			for value in values {
				if !first {
					write!(f, "{}", PAIR_SEPARATOR)?;
				}
				first = false;
				write!(f, "{}", urlencoding::encode(key))?;
				// An empty key always carries `=` so the pair is not read back as
				// an empty pair.
				if !value.is_empty() || key.is_empty() {
					write!(f, "{}{}", VALUE_SEPARATOR, urlencoding::encode(value))?;
				}
			}
		}
		Ok(())
	}
}

impl<K, V> FromIterator<(K, V)> for Query
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut query = Self::new();
		query.add_all(iter);
		query
	}
}

fn decode(raw: &str) -> String {
	urlencoding::decode(raw)
		.map(|decoded| decoded.into_owned())
		.unwrap_or_else(|_| raw.to_string())
}
