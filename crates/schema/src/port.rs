//! Input and output ports of a node class

use dai_util::labels::{DatatypeName, NodeClassName, PortName};
use serde::Serialize;
use smartstring::{LazyCompact, SmartString};
use std::fmt::Display;
use tracing::warn;

use crate::{
	datatype::{DatatypeCatalog, DatatypeId},
	errors::LoadError,
	json::DatatypeRefJson,
};

/// Which way data flows through a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
	Input,
	Output,
}

impl Display for PortDirection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Input => write!(f, "input"),
			Self::Output => write!(f, "output"),
		}
	}
}

/// A named, typed port of a node class.
///
/// For inputs, `allowed` holds the datatypes this port accepts.
/// For outputs, it holds the datatypes this port may produce.
#[derive(Debug, Clone)]
pub struct PortDescriptor {
	name: PortName,
	direction: PortDirection,
	kind: SmartString<LazyCompact>,
	allowed: Vec<DatatypeId>,

	/// Datatypes the descriptor listed that aren't in the hierarchy.
	/// These never take part in compatibility checks.
	unresolved: Vec<DatatypeName>,
}

impl PortDescriptor {
	/// Resolve a port from its descriptor entry.
	///
	/// Datatypes missing from the hierarchy are dropped with a warning,
	/// unless `strict` is set, in which case they are an error.
	pub(crate) fn resolve(
		node: &NodeClassName,
		direction: PortDirection,
		name: &PortName,
		kind: &str,
		datatypes: &[DatatypeRefJson],
		catalog: &DatatypeCatalog,
		strict: bool,
	) -> Result<Self, LoadError> {
		let mut allowed = Vec::new();
		let mut unresolved = Vec::new();

		for d in datatypes {
			match catalog.get(d.datatype.as_str()) {
				Some(id) => {
					if !allowed.contains(&id) {
						allowed.push(id)
					}
				}

				None if strict => {
					return Err(LoadError::UnresolvedDatatype {
						node: node.clone(),
						direction,
						port: name.clone(),
						datatype: d.datatype.clone(),
					})
				}

				None => {
					warn!(
						message = "Dropping unknown datatype from port",
						node = %node,
						%direction,
						port = %name,
						datatype = %d.datatype,
					);
					unresolved.push(d.datatype.clone());
				}
			}
		}

		if allowed.is_empty() {
			warn!(
				message = "Port has no known datatypes, nothing can connect to it",
				node = %node,
				%direction,
				port = %name,
			);
		}

		return Ok(Self {
			name: name.clone(),
			direction,
			kind: kind.into(),
			allowed,
			unresolved,
		});
	}

	pub fn name(&self) -> &PortName {
		&self.name
	}

	pub fn direction(&self) -> PortDirection {
		self.direction
	}

	/// The port kind string from the catalog
	pub fn kind(&self) -> &str {
		&self.kind
	}

	/// The datatypes this port accepts (inputs) or may produce (outputs)
	pub fn allowed(&self) -> &[DatatypeId] {
		&self.allowed
	}

	/// Datatype names that were dropped while loading this port
	pub fn unresolved(&self) -> &[DatatypeName] {
		&self.unresolved
	}

	/// Can this port be connected to `other`?
	/// True if any pair of their datatypes is compatible.
	pub fn compatible_with(&self, other: &PortDescriptor, catalog: &DatatypeCatalog) -> bool {
		catalog.compatible_sets(&self.allowed, &other.allowed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::json::HierarchyJson;
	use serde_json::json;

	fn catalog() -> DatatypeCatalog {
		let h: HierarchyJson = serde_json::from_value(json!({
			"hierarchies": [
				{ "datatype": "ImgFrame", "children": [{ "datatype": "NNData" }] },
				{ "datatype": "IMUData" }
			]
		}))
		.unwrap();
		DatatypeCatalog::resolve(&h.hierarchies).unwrap()
	}

	fn refs(names: &[&str]) -> Vec<DatatypeRefJson> {
		names
			.iter()
			.map(|n| DatatypeRefJson {
				datatype: (*n).into(),
			})
			.collect()
	}

	#[test]
	fn unknown_datatypes_are_dropped() {
		let c = catalog();
		let port = PortDescriptor::resolve(
			&"Camera".into(),
			PortDirection::Output,
			&"video".into(),
			"MSender",
			&refs(&["ImgFrame", "RawDepth", "ImgFrame"]),
			&c,
			false,
		)
		.unwrap();

		assert_eq!(port.allowed(), &[c.get("ImgFrame").unwrap()]);
		assert_eq!(port.unresolved(), &[DatatypeName::new("RawDepth")]);
		assert_eq!(port.kind(), "MSender");
	}

	#[test]
	fn unknown_datatypes_fail_in_strict_mode() {
		let res = PortDescriptor::resolve(
			&"Camera".into(),
			PortDirection::Output,
			&"video".into(),
			"MSender",
			&refs(&["ImgFrame", "RawDepth"]),
			&catalog(),
			true,
		);

		match res {
			Err(LoadError::UnresolvedDatatype {
				datatype,
				direction,
				..
			}) => {
				assert_eq!(datatype.as_str(), "RawDepth");
				assert_eq!(direction, PortDirection::Output);
			}
			x => panic!("unexpected result {x:?}"),
		}
	}

	#[test]
	fn ports_connect_through_the_hierarchy() {
		let c = catalog();
		let out = PortDescriptor::resolve(
			&"Source".into(),
			PortDirection::Output,
			&"out".into(),
			"",
			&refs(&["ImgFrame"]),
			&c,
			false,
		)
		.unwrap();
		let nn_in = PortDescriptor::resolve(
			&"Sink".into(),
			PortDirection::Input,
			&"in".into(),
			"",
			&refs(&["NNData"]),
			&c,
			false,
		)
		.unwrap();
		let imu_in = PortDescriptor::resolve(
			&"Imu".into(),
			PortDirection::Input,
			&"in".into(),
			"",
			&refs(&["IMUData"]),
			&c,
			false,
		)
		.unwrap();

		assert!(out.compatible_with(&nn_in, &c));
		assert!(!out.compatible_with(&imu_in, &c));
	}
}
