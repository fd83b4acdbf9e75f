//! Errors we can encounter while building a pipeline

use dai_schema::{port::PortDirection, shape::ShapeError};
use dai_util::{
	labels::{NodeClassName, PortName},
	names::NameError,
};
use smartstring::{LazyCompact, SmartString};
use thiserror::Error;

use crate::instance::NodeInstanceId;

/// An error we encounter while building a pipeline.
///
/// A failed operation never changes the pipeline:
/// its state is exactly what it was before the call.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// We tried to add a node whose class isn't in the catalog
	#[error("node class `{class}` does not exist (available: {available})")]
	UnknownNodeClass {
		/// The class we asked for
		class: SmartString<LazyCompact>,

		/// Every class the catalog provides, comma-separated
		available: String,
	},

	/// We tried to connect a port that doesn't exist
	#[error("node class `{class}` has no {direction} port `{port}`")]
	UnknownPort {
		class: NodeClassName,
		direction: PortDirection,
		port: SmartString<LazyCompact>,
	},

	/// We tried to connect two ports that share no compatible datatypes
	#[error(
		"cannot connect `{source_class}` output `{output}` to `{target_class}` input `{input}`: no compatible datatypes"
	)]
	IncompatibleConnection {
		source_class: NodeClassName,
		output: PortName,
		target_class: NodeClassName,
		input: PortName,
	},

	/// A configuration record did not fit its shape
	#[error("configuration does not fit shape `{shape}`")]
	ConfigurationValidationFailure {
		shape: SmartString<LazyCompact>,
		#[source]
		error: ShapeError,
	},

	/// We referenced a node that isn't part of this pipeline
	#[error("node {id} is not part of this pipeline")]
	UnknownNodeInstance { id: NodeInstanceId },

	/// A node name override is malformed
	#[error("invalid node name `{name}`")]
	InvalidName {
		name: SmartString<LazyCompact>,
		#[source]
		error: NameError,
	},

	/// A node id is already used in this pipeline
	#[error("node id {id} is used more than once")]
	DuplicateNodeInstance { id: NodeInstanceId },

	/// An imported node has an id the catalog can't reserve
	#[error("node id {id} is out of range")]
	InvalidNodeInstanceId { id: NodeInstanceId },

	/// The catalog has handed out every node id it has
	#[error("no node ids are left")]
	NodeIdsExhausted,
}
