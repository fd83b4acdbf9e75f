//! Errors we can encounter while loading a catalog

use dai_util::{
	labels::{DatatypeName, NodeClassName, PortName},
	names::NameError,
};
use smartstring::{LazyCompact, SmartString};
use std::path::PathBuf;
use thiserror::Error;

use crate::port::PortDirection;

/// An error we encounter while initializing a [`crate::Catalog`].
/// All of these are fatal: we never expose a partial catalog.
#[derive(Debug, Error)]
pub enum LoadError {
	/// We could not read a catalog file
	#[error("could not read `{}`", path.display())]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	/// A catalog document isn't valid json,
	/// or doesn't have the structure we expect
	#[error("could not parse `{source_name}`")]
	Parse {
		/// The file (or in-memory document) we tried to parse
		source_name: SmartString<LazyCompact>,
		#[source]
		error: serde_json::Error,
	},

	/// The datatype hierarchy declares a name twice
	#[error("datatype `{datatype}` is declared more than once")]
	DuplicateDatatype { datatype: DatatypeName },

	/// Two node descriptors have the same name
	#[error("node class `{node}` is declared more than once")]
	DuplicateNodeClass { node: NodeClassName },

	/// A node descriptor has two ports with the same name and direction
	#[error("node class `{node}` declares {direction} port `{port}` more than once")]
	DuplicatePort {
		node: NodeClassName,
		direction: PortDirection,
		port: PortName,
	},

	/// A node or port name is malformed
	#[error("invalid name `{name}`")]
	InvalidName {
		name: SmartString<LazyCompact>,
		#[source]
		error: NameError,
	},

	/// A configuration shape we need was not provided
	#[error("configuration shape `{shape}` (required by `{required_by}`) was not provided")]
	MissingConfigurationShape {
		shape: SmartString<LazyCompact>,
		required_by: SmartString<LazyCompact>,
	},

	/// A port references a datatype that isn't in the hierarchy.
	/// Only raised in strict mode; otherwise the datatype is dropped.
	#[error("{direction} port `{port}` of node class `{node}` references unknown datatype `{datatype}`")]
	UnresolvedDatatype {
		node: NodeClassName,
		direction: PortDirection,
		port: PortName,
		datatype: DatatypeName,
	},
}
