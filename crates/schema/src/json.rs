//! Catalog documents, directly deserialized from JSON.
//! This is the first step in our catalog loading workflow.

use dai_util::labels::{DatatypeName, NodeClassName, PortName};
use serde::{Deserialize, Serialize};

/// The datatype hierarchy file (`DatatypeHierarchy.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyJson {
	/// The roots of the datatype forest
	pub hierarchies: Vec<DatatypeJson>,
}

/// One datatype in the hierarchy.
/// Every child inherits from this datatype and all of its ancestors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatatypeJson {
	pub datatype: DatatypeName,

	#[serde(default)]
	pub children: Vec<DatatypeJson>,
}

/// A node descriptor (`nodes/<Name>/<Name>.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescriptorJson {
	/// The name of this node class
	pub name: NodeClassName,

	/// Human-readable documentation
	#[serde(default)]
	pub description: String,

	/// A reference to this node's configuration shape,
	/// e.g. `XLinkIn.json`.
	pub properties: String,

	#[serde(default)]
	pub inputs: Vec<InputJson>,

	#[serde(default)]
	pub outputs: Vec<OutputJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputJson {
	pub name: PortName,

	/// Port kind, as given by the catalog. We don't interpret this.
	#[serde(rename = "type", default)]
	pub kind: String,

	/// The datatypes this input can consume
	pub accepted_datatypes: Vec<DatatypeRefJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputJson {
	pub name: PortName,

	/// Port kind, as given by the catalog. We don't interpret this.
	#[serde(rename = "type", default)]
	pub kind: String,

	/// The datatypes this output may produce
	pub possible_datatypes: Vec<DatatypeRefJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatatypeRefJson {
	pub datatype: DatatypeName,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parse_descriptor() {
		let d: NodeDescriptorJson = serde_json::from_value(json!({
			"name": "XLinkOut",
			"description": "Sends messages to the host",
			"properties": "XLinkOut.json",
			"inputs": [{
				"name": "in",
				"type": "MReceiver",
				"acceptedDatatypes": [{ "datatype": "Buffer" }]
			}],
			"someFutureField": true
		}))
		.unwrap();

		assert_eq!(d.name.as_str(), "XLinkOut");
		assert!(d.outputs.is_empty());
		assert_eq!(d.inputs[0].kind, "MReceiver");
		assert_eq!(d.inputs[0].accepted_datatypes[0].datatype.as_str(), "Buffer");
	}

	#[test]
	fn parse_nested_hierarchy() {
		let h: HierarchyJson = serde_json::from_value(json!({
			"hierarchies": [{
				"datatype": "Buffer",
				"children": [
					{ "datatype": "ImgFrame" },
					{ "datatype": "NNData", "children": [] }
				]
			}]
		}))
		.unwrap();

		assert_eq!(h.hierarchies.len(), 1);
		assert_eq!(h.hierarchies[0].children.len(), 2);
		assert!(h.hierarchies[0].children[0].children.is_empty());
	}
}
