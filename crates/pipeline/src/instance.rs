//! Node instances

use dai_schema::{nodeclass::NodeClass, shape::Record};
use serde::{Deserialize, Serialize};
use smartstring::{LazyCompact, SmartString};
use std::{fmt::Display, sync::Arc};

/// A node's id.
/// Unique among all nodes created from one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeInstanceId(u64);

impl NodeInstanceId {
	pub(crate) fn new(id: u64) -> Self {
		Self(id)
	}

	pub fn as_u64(&self) -> u64 {
		self.0
	}
}

impl Display for NodeInstanceId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

/// A node in a pipeline: a node class with a configuration
#[derive(Debug, Clone)]
pub struct NodeInstance {
	id: NodeInstanceId,
	name: SmartString<LazyCompact>,
	properties: Record,
	class: Arc<NodeClass>,
}

impl NodeInstance {
	pub(crate) fn new(
		id: NodeInstanceId,
		name: SmartString<LazyCompact>,
		properties: Record,
		class: Arc<NodeClass>,
	) -> Self {
		Self {
			id,
			name,
			properties,
			class,
		}
	}

	pub fn id(&self) -> NodeInstanceId {
		self.id
	}

	/// This node's name.
	/// Defaults to the name of its class.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// This node's validated configuration
	pub fn properties(&self) -> &Record {
		&self.properties
	}

	pub fn class(&self) -> &Arc<NodeClass> {
		&self.class
	}
}

/// Optional parameters for a new node
#[derive(Debug, Clone, Default)]
pub struct NodeOverrides {
	pub(crate) name: Option<SmartString<LazyCompact>>,
	pub(crate) properties: Option<Record>,
}

impl NodeOverrides {
	pub fn new() -> Self {
		Self::default()
	}

	/// Give this node a name other than its class name
	pub fn name(mut self, name: &str) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Set this node's configuration.
	/// If this isn't set, the node is configured with an empty record.
	pub fn properties(mut self, properties: Record) -> Self {
		self.properties = Some(properties);
		self
	}
}
