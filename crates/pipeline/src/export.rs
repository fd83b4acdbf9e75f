//! The exported pipeline document.
//!
//! This is what the device consumes:
//! ```json
//! {
//!     "globalProperties": { "pipelineName": "...", ... },
//!     "nodes": [{ "id": 0, "name": "XLinkIn", "properties": { ... } }],
//!     "connections": [{ "node1Id": 0, "node1Output": "out", "node2Id": 1, "node2Input": "in" }]
//! }
//! ```

use dai_schema::shape::Record;
use dai_util::labels::{NodeClassName, PortName};
use serde::{Deserialize, Serialize};

use crate::{graph::PipelineGraph, instance::NodeInstanceId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDocument {
	pub global_properties: Record,

	#[serde(default)]
	pub nodes: Vec<NodeJson>,

	#[serde(default)]
	pub connections: Vec<ConnectionJson>,
}

/// One node in a [`PipelineDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeJson {
	pub id: NodeInstanceId,

	/// The name of this node's class.
	/// Name overrides are never exported.
	pub name: NodeClassName,

	#[serde(default)]
	pub properties: Record,
}

/// One connection in a [`PipelineDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionJson {
	pub node1_id: NodeInstanceId,
	pub node1_output: PortName,
	pub node2_id: NodeInstanceId,
	pub node2_input: PortName,
}

impl PipelineDocument {
	/// Serialize this document as pretty-printed json
	pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(self)
	}

	pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(s)
	}
}

impl From<&PipelineGraph> for PipelineDocument {
	fn from(graph: &PipelineGraph) -> Self {
		Self {
			global_properties: graph.global_properties().clone(),

			nodes: graph
				.nodes()
				.map(|n| NodeJson {
					id: n.id(),
					name: n.class().name().clone(),
					properties: n.properties().clone(),
				})
				.collect(),

			connections: graph
				.connections()
				.map(|c| ConnectionJson {
					node1_id: c.source(),
					node1_output: c.output().clone(),
					node2_id: c.target(),
					node2_input: c.input().clone(),
				})
				.collect(),
		}
	}
}
