//! Connections between node ports

use dai_util::labels::PortName;

use crate::instance::NodeInstanceId;

/// A validated edge from one node's output to another node's input.
/// Two connections with the same endpoints are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
	source: NodeInstanceId,
	output: PortName,
	target: NodeInstanceId,
	input: PortName,
}

impl Connection {
	pub(crate) fn new(
		source: NodeInstanceId,
		output: PortName,
		target: NodeInstanceId,
		input: PortName,
	) -> Self {
		Self {
			source,
			output,
			target,
			input,
		}
	}

	/// The node data comes from
	pub fn source(&self) -> NodeInstanceId {
		self.source
	}

	/// The output port on `source`
	pub fn output(&self) -> &PortName {
		&self.output
	}

	/// The node data goes to
	pub fn target(&self) -> NodeInstanceId {
		self.target
	}

	/// The input port on `target`
	pub fn input(&self) -> &PortName {
		&self.input
	}
}
