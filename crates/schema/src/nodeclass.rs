//! Node classes and the registry that holds them

use dai_util::{
	labels::{NodeClassName, PortName},
	names::check_identifier,
};
use smartstring::{LazyCompact, SmartString};
use std::{
	collections::{btree_map::Entry, BTreeMap},
	sync::Arc,
};
use tracing::{debug, trace};

use crate::{
	config::CatalogOptions,
	datatype::DatatypeCatalog,
	errors::LoadError,
	json::NodeDescriptorJson,
	port::{PortDescriptor, PortDirection},
	shape::{shape_name_for, ConfigShape, Record, ShapeError, ShapeSet},
};

/// A node template from the catalog.
/// Node instances share their class through an `Arc`.
#[derive(Debug)]
pub struct NodeClass {
	name: NodeClassName,
	description: String,

	/// The `properties` reference from the descriptor
	properties_ref: String,

	/// The name of this node's configuration shape
	shape_name: SmartString<LazyCompact>,
	shape: Arc<dyn ConfigShape>,

	inputs: BTreeMap<PortName, PortDescriptor>,
	outputs: BTreeMap<PortName, PortDescriptor>,
}

impl NodeClass {
	/// Resolve a node class from its descriptor.
	pub fn from_json(
		descriptor: &NodeDescriptorJson,
		datatypes: &DatatypeCatalog,
		shapes: &ShapeSet,
		options: &CatalogOptions,
	) -> Result<Self, LoadError> {
		let name = &descriptor.name;
		check_identifier(name.as_str()).map_err(|error| LoadError::InvalidName {
			name: name.clone().into(),
			error,
		})?;

		let shape_name = shape_name_for(&descriptor.properties);
		let shape = shapes
			.get(&shape_name)
			.ok_or_else(|| LoadError::MissingConfigurationShape {
				shape: shape_name.clone(),
				required_by: name.clone().into(),
			})?
			.clone();

		let mut inputs = BTreeMap::new();
		for i in &descriptor.inputs {
			let port = PortDescriptor::resolve(
				name,
				PortDirection::Input,
				&i.name,
				&i.kind,
				&i.accepted_datatypes,
				datatypes,
				options.strict_datatypes,
			)?;
			insert_port(&mut inputs, name, port)?;
		}

		let mut outputs = BTreeMap::new();
		for o in &descriptor.outputs {
			let port = PortDescriptor::resolve(
				name,
				PortDirection::Output,
				&o.name,
				&o.kind,
				&o.possible_datatypes,
				datatypes,
				options.strict_datatypes,
			)?;
			insert_port(&mut outputs, name, port)?;
		}

		trace!(
			message = "Loaded node class",
			node = %name,
			shape = %shape_name,
			inputs = inputs.len(),
			outputs = outputs.len()
		);

		return Ok(Self {
			name: name.clone(),
			description: descriptor.description.clone(),
			properties_ref: descriptor.properties.clone(),
			shape_name,
			shape,
			inputs,
			outputs,
		});
	}

	pub fn name(&self) -> &NodeClassName {
		&self.name
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	/// The raw configuration reference from this node's descriptor
	pub fn properties_ref(&self) -> &str {
		&self.properties_ref
	}

	/// The name of the shape this node's configuration must fit
	pub fn shape_name(&self) -> &str {
		&self.shape_name
	}

	/// Validate a configuration record against this node's shape
	pub fn build_properties(&self, record: Record) -> Result<Record, ShapeError> {
		self.shape.from_record(record)
	}

	pub fn input(&self, name: &str) -> Option<&PortDescriptor> {
		self.inputs.get(name)
	}

	pub fn output(&self, name: &str) -> Option<&PortDescriptor> {
		self.outputs.get(name)
	}

	pub fn port(&self, direction: PortDirection, name: &str) -> Option<&PortDescriptor> {
		match direction {
			PortDirection::Input => self.input(name),
			PortDirection::Output => self.output(name),
		}
	}

	/// Iterate over this node's inputs, sorted by name
	pub fn inputs(&self) -> impl Iterator<Item = &PortDescriptor> {
		self.inputs.values()
	}

	/// Iterate over this node's outputs, sorted by name
	pub fn outputs(&self) -> impl Iterator<Item = &PortDescriptor> {
		self.outputs.values()
	}

	/// How many datatype references were dropped from this node's ports
	pub fn unresolved_count(&self) -> usize {
		self.inputs()
			.chain(self.outputs())
			.map(|p| p.unresolved().len())
			.sum()
	}
}

fn insert_port(
	ports: &mut BTreeMap<PortName, PortDescriptor>,
	node: &NodeClassName,
	port: PortDescriptor,
) -> Result<(), LoadError> {
	check_identifier(port.name().as_str()).map_err(|error| LoadError::InvalidName {
		name: port.name().clone().into(),
		error,
	})?;

	match ports.entry(port.name().clone()) {
		Entry::Occupied(_) => Err(LoadError::DuplicatePort {
			node: node.clone(),
			direction: port.direction(),
			port: port.name().clone(),
		}),
		Entry::Vacant(v) => {
			v.insert(port);
			Ok(())
		}
	}
}

/// Every node class in a catalog, by name.
/// Built once by [`NodeClassRegistry::load`] and never changed.
#[derive(Debug, Default)]
pub struct NodeClassRegistry {
	classes: BTreeMap<NodeClassName, Arc<NodeClass>>,
}

impl NodeClassRegistry {
	/// Load every node class described by `descriptors`.
	/// Fails if any descriptor is invalid.
	pub fn load(
		descriptors: &[NodeDescriptorJson],
		datatypes: &DatatypeCatalog,
		shapes: &ShapeSet,
		options: &CatalogOptions,
	) -> Result<Self, LoadError> {
		let mut classes = BTreeMap::new();

		for d in descriptors {
			let class = NodeClass::from_json(d, datatypes, shapes, options)?;
			match classes.entry(class.name().clone()) {
				Entry::Occupied(_) => {
					return Err(LoadError::DuplicateNodeClass {
						node: class.name().clone(),
					})
				}
				Entry::Vacant(v) => {
					v.insert(Arc::new(class));
				}
			}
		}

		let registry = Self { classes };
		debug!(
			message = "Loaded node classes",
			classes = registry.len(),
			unresolved_datatypes = registry.unresolved_count()
		);

		return Ok(registry);
	}

	/// Find a node class by name
	pub fn get(&self, name: &str) -> Option<&Arc<NodeClass>> {
		self.classes.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.classes.contains_key(name)
	}

	/// All node class names, sorted
	pub fn names(&self) -> impl Iterator<Item = &NodeClassName> {
		self.classes.keys()
	}

	/// Iterate over all node classes, sorted by name
	pub fn iter(&self) -> impl Iterator<Item = &Arc<NodeClass>> {
		self.classes.values()
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}

	/// How many datatype references were dropped while loading this registry
	pub fn unresolved_count(&self) -> usize {
		self.iter().map(|c| c.unresolved_count()).sum()
	}
}
