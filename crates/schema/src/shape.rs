//! Configuration shapes.
//!
//! A shape validates a configuration record and produces its canonical form.
//! Shapes are supplied by the caller; the catalog only looks them up by name.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use smartstring::{LazyCompact, SmartString};
use std::{collections::BTreeMap, fmt::Debug, marker::PhantomData, sync::Arc};
use thiserror::Error;

/// A configuration record: a json object
pub type Record = Map<String, Value>;

/// The name of the shape used for a pipeline's global properties
pub const GLOBAL_PROPERTIES_SHAPE: &str = "GlobalProperties";

/// The suffix that turns a configuration reference into a shape name
const SHAPE_SUFFIX: &str = "Properties";

/// An error we encounter when a record doesn't fit a shape
#[derive(Debug, Error)]
pub enum ShapeError {
	/// We expected a json object
	#[error("expected a record, got {found}")]
	NotARecord { found: &'static str },

	/// The record could not be read as this shape
	#[error("record does not fit this shape")]
	Decode(#[source] serde_json::Error),

	/// The shape could not be turned back into a record
	#[error("could not encode shape as a record")]
	Encode(#[source] serde_json::Error),
}

/// Something that can check and normalize configuration records.
pub trait ConfigShape: Debug + Send + Sync {
	/// Build this shape from `record`, then return it as a record again.
	fn from_record(&self, record: Record) -> Result<Record, ShapeError>;
}

/// A shape backed by a rust type.
/// Records are deserialized into `T` and serialized back,
/// so unknown fields are dropped and missing optional fields are filled in.
pub struct TypedShape<T> {
	_p: PhantomData<fn() -> T>,
}

impl<T> TypedShape<T> {
	pub fn new() -> Self {
		Self { _p: PhantomData }
	}
}

impl<T> Debug for TypedShape<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "TypedShape<{}>", std::any::type_name::<T>())
	}
}

impl<T: Serialize + DeserializeOwned> ConfigShape for TypedShape<T> {
	fn from_record(&self, record: Record) -> Result<Record, ShapeError> {
		let value: T = serde_json::from_value(Value::Object(record)).map_err(ShapeError::Decode)?;
		let value = serde_json::to_value(value).map_err(ShapeError::Encode)?;
		return record_from_value(value);
	}
}

/// A shape that accepts every record as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenShape;

impl ConfigShape for OpenShape {
	fn from_record(&self, record: Record) -> Result<Record, ShapeError> {
		Ok(record)
	}
}

/// Make sure `value` is a json object
pub fn record_from_value(value: Value) -> Result<Record, ShapeError> {
	match value {
		Value::Object(map) => Ok(map),
		Value::Null => Err(ShapeError::NotARecord { found: "null" }),
		Value::Bool(_) => Err(ShapeError::NotARecord { found: "a boolean" }),
		Value::Number(_) => Err(ShapeError::NotARecord { found: "a number" }),
		Value::String(_) => Err(ShapeError::NotARecord { found: "a string" }),
		Value::Array(_) => Err(ShapeError::NotARecord { found: "an array" }),
	}
}

/// The name of the shape a node descriptor's `properties` reference points to.
///
/// Everything after the first `.` is dropped and `Properties` is appended,
/// so `XLinkIn.json` becomes `XLinkInProperties`.
pub fn shape_name_for(reference: &str) -> SmartString<LazyCompact> {
	let base = reference.split('.').next().unwrap_or(reference);
	let mut name: SmartString<LazyCompact> = base.into();
	name.push_str(SHAPE_SUFFIX);
	name
}

/// All configuration shapes available to a catalog, by name
#[derive(Debug, Clone, Default)]
pub struct ShapeSet {
	shapes: BTreeMap<SmartString<LazyCompact>, Arc<dyn ConfigShape>>,
}

impl ShapeSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a shape backed by the rust type `T`
	pub fn with<T: Serialize + DeserializeOwned + 'static>(self, name: &str) -> Self {
		self.with_shape(name, TypedShape::<T>::new())
	}

	/// Add an arbitrary shape
	pub fn with_shape(mut self, name: &str, shape: impl ConfigShape + 'static) -> Self {
		self.insert(name, Arc::new(shape));
		self
	}

	/// Add a shape, replacing any shape with the same name
	pub fn insert(&mut self, name: &str, shape: Arc<dyn ConfigShape>) {
		self.shapes.insert(name.into(), shape);
	}

	pub fn get(&self, name: &str) -> Option<&Arc<dyn ConfigShape>> {
		self.shapes.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.shapes.contains_key(name)
	}

	/// Iterate over all shape names, sorted
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.shapes.keys().map(|k| k.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::Deserialize;
	use serde_json::json;

	#[derive(Debug, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	struct XLinkOutProperties {
		stream_name: String,
		#[serde(default)]
		max_fps_limit: f64,
	}

	fn record(v: Value) -> Record {
		record_from_value(v).unwrap()
	}

	#[test]
	fn shape_names() {
		assert_eq!(shape_name_for("XLinkIn.json").as_str(), "XLinkInProperties");
		assert_eq!(
			shape_name_for("XLinkIn.schema.json").as_str(),
			"XLinkInProperties"
		);
		assert_eq!(shape_name_for("Global").as_str(), "GlobalProperties");
	}

	#[test]
	fn typed_shape_normalizes() {
		let shape = TypedShape::<XLinkOutProperties>::new();
		let out = shape
			.from_record(record(json!({ "streamName": "out", "unknown": 1 })))
			.unwrap();

		assert_eq!(
			Value::Object(out),
			json!({ "streamName": "out", "maxFpsLimit": 0.0 })
		);
	}

	#[test]
	fn typed_shape_rejects_bad_records() {
		let shape = TypedShape::<XLinkOutProperties>::new();
		assert!(matches!(
			shape.from_record(record(json!({ "maxFpsLimit": 30 }))),
			Err(ShapeError::Decode(_))
		));
		assert!(matches!(
			shape.from_record(record(json!({ "streamName": 5 }))),
			Err(ShapeError::Decode(_))
		));
	}

	#[test]
	fn open_shape_keeps_everything() {
		let r = record(json!({ "a": 1, "b": [true] }));
		assert_eq!(OpenShape.from_record(r.clone()).unwrap(), r);
	}

	#[test]
	fn records_must_be_objects() {
		assert!(matches!(
			record_from_value(json!([1, 2])),
			Err(ShapeError::NotARecord { found: "an array" })
		));
	}

	#[test]
	fn shape_set_lookup() {
		let shapes = ShapeSet::new()
			.with::<XLinkOutProperties>("XLinkOutProperties")
			.with_shape(GLOBAL_PROPERTIES_SHAPE, OpenShape);

		assert!(shapes.contains("XLinkOutProperties"));
		assert!(shapes.get("XLinkInProperties").is_none());
		assert_eq!(
			shapes.names().collect::<Vec<_>>(),
			vec!["GlobalProperties", "XLinkOutProperties"]
		);
	}
}
