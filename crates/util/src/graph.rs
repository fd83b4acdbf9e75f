//! Convenient graph manipulation.
//! We don't store a petgraph graph because we need parallel edges
//! and stable insertion order.

use petgraph::{algo::toposort, graphmap::GraphMap, Directed};
use std::fmt::Debug;

/// The index of a node in a [`Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphNodeIdx(usize);

impl From<GraphNodeIdx> for usize {
	fn from(value: GraphNodeIdx) -> Self {
		value.0
	}
}

/// The index of an edge in a [`Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphEdgeIdx(usize);

impl From<GraphEdgeIdx> for usize {
	fn from(value: GraphEdgeIdx) -> Self {
		value.0
	}
}

/// A directed graph with parallel edges.
///
/// Nodes and edges are never removed, so indices stay valid
/// and iteration always follows insertion order.
#[derive(Debug, Clone)]
pub struct Graph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	/// Array of nodes in this graph
	nodes: Vec<NodeType>,

	/// Array of edges in this graph
	edges: Vec<(GraphNodeIdx, GraphNodeIdx, EdgeType)>,
}

impl<NodeType, EdgeType> Default for Graph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<NodeType, EdgeType> Graph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	/// Create an empty graph
	pub fn new() -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
		}
	}

	/// Add a node to this graph.
	#[inline]
	pub fn add_node(&mut self, node: NodeType) -> GraphNodeIdx {
		let i = self.nodes.len();
		self.nodes.push(node);
		GraphNodeIdx(i)
	}

	/// Get a node by index
	#[inline]
	pub fn get_node(&self, node_idx: GraphNodeIdx) -> Option<&NodeType> {
		self.nodes.get(usize::from(node_idx))
	}

	/// The number of nodes in this graph
	#[inline]
	pub fn len_nodes(&self) -> usize {
		self.nodes.len()
	}

	/// Iterate over all nodes in this graph
	#[inline]
	pub fn iter_nodes(&self) -> impl Iterator<Item = &NodeType> {
		self.nodes.iter()
	}

	/// Add an edge to this graph
	#[inline]
	pub fn add_edge(
		&mut self,
		from: GraphNodeIdx,
		to: GraphNodeIdx,
		edge_value: EdgeType,
	) -> GraphEdgeIdx {
		let i = self.edges.len();
		self.edges.push((from, to, edge_value));
		GraphEdgeIdx(i)
	}

	/// Get an edge by index
	#[inline]
	pub fn get_edge(&self, edge_idx: GraphEdgeIdx) -> Option<(GraphNodeIdx, GraphNodeIdx, &EdgeType)> {
		self.edges
			.get(usize::from(edge_idx))
			.map(|(f, t, v)| (*f, *t, v))
	}

	/// The number of edges in this graph
	#[inline]
	pub fn len_edges(&self) -> usize {
		self.edges.len()
	}

	/// Iterate over all edges in this graph
	#[inline]
	pub fn iter_edges(&self) -> impl Iterator<Item = (GraphNodeIdx, GraphNodeIdx, &EdgeType)> {
		self.edges.iter().map(|(f, t, v)| (*f, *t, v))
	}

	/// Returns `true` if this graph has a cycle.
	pub fn has_cycle(&self) -> bool {
		let mut fake_graph = GraphMap::<usize, (), Directed>::new();
		for (from, to, _) in self.iter_edges() {
			fake_graph.add_edge(from.into(), to.into(), ());
		}
		toposort(&fake_graph, None).is_err()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_insertion_order_and_parallel_edges() {
		let mut g: Graph<&str, u8> = Graph::new();
		let a = g.add_node("a");
		let b = g.add_node("b");
		g.add_edge(a, b, 1);
		let e = g.add_edge(a, b, 2);

		assert_eq!(g.iter_nodes().copied().collect::<Vec<_>>(), vec!["a", "b"]);
		assert_eq!(g.len_edges(), 2);
		assert_eq!(g.get_edge(e), Some((a, b, &2)));
		assert_eq!(g.get_node(b), Some(&"b"));
	}

	#[test]
	fn finds_cycles() {
		let mut g: Graph<&str, ()> = Graph::new();
		let a = g.add_node("a");
		let b = g.add_node("b");
		let c = g.add_node("c");
		g.add_edge(a, b, ());
		g.add_edge(b, c, ());
		assert!(!g.has_cycle());

		g.add_edge(c, a, ());
		assert!(g.has_cycle());
	}
}
