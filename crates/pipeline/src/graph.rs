//! The pipeline graph

use dai_schema::shape::Record;
use dai_util::graph::{Graph, GraphNodeIdx};
use std::collections::HashMap;

use crate::{
	connection::Connection,
	errors::PipelineError,
	instance::{NodeInstance, NodeInstanceId},
};

/// A pipeline: global properties, nodes and the connections between them.
/// Nodes and connections are kept in the order they were added.
#[derive(Debug, Clone)]
pub struct PipelineGraph {
	global_properties: Record,
	graph: Graph<NodeInstance, Connection>,

	/// Map node ids to graph indices
	index: HashMap<NodeInstanceId, GraphNodeIdx>,
}

impl PipelineGraph {
	pub(crate) fn new(global_properties: Record) -> Self {
		Self {
			global_properties,
			graph: Graph::new(),
			index: HashMap::new(),
		}
	}

	pub fn global_properties(&self) -> &Record {
		&self.global_properties
	}

	pub(crate) fn set_global_properties(&mut self, global_properties: Record) {
		self.global_properties = global_properties;
	}

	/// Add a node to this graph.
	/// Fails if another node already has this node's id.
	pub(crate) fn add_node(&mut self, node: NodeInstance) -> Result<(), PipelineError> {
		let id = node.id();
		if self.index.contains_key(&id) {
			return Err(PipelineError::DuplicateNodeInstance { id });
		}

		let idx = self.graph.add_node(node);
		self.index.insert(id, idx);
		return Ok(());
	}

	/// Add a connection between two nodes in this graph.
	/// Returns `None` if either endpoint isn't in this graph.
	pub(crate) fn add_connection(&mut self, connection: Connection) -> Option<&Connection> {
		let from = *self.index.get(&connection.source())?;
		let to = *self.index.get(&connection.target())?;
		let e = self.graph.add_edge(from, to, connection);
		self.graph.get_edge(e).map(|(_, _, c)| c)
	}

	pub fn contains(&self, id: NodeInstanceId) -> bool {
		self.index.contains_key(&id)
	}

	/// Find a node by id
	pub fn node(&self, id: NodeInstanceId) -> Option<&NodeInstance> {
		self.index.get(&id).and_then(|i| self.graph.get_node(*i))
	}

	/// Iterate over all nodes, in insertion order
	pub fn nodes(&self) -> impl Iterator<Item = &NodeInstance> {
		self.graph.iter_nodes()
	}

	/// Iterate over all connections, in insertion order
	pub fn connections(&self) -> impl Iterator<Item = &Connection> {
		self.graph.iter_edges().map(|(_, _, c)| c)
	}

	pub fn len_nodes(&self) -> usize {
		self.graph.len_nodes()
	}

	pub fn len_connections(&self) -> usize {
		self.graph.len_edges()
	}

	/// Does this pipeline contain a cycle?
	/// Cycles are allowed, this is for information only.
	pub fn has_cycle(&self) -> bool {
		self.graph.has_cycle()
	}
}
