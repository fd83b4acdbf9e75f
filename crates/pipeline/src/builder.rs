//! Build a pipeline one node and connection at a time

use dai_schema::{
	port::PortDirection,
	shape::{Record, GLOBAL_PROPERTIES_SHAPE},
	Catalog,
};
use dai_util::names::check_label;
use itertools::Itertools;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::{
	connection::Connection,
	errors::PipelineError,
	export::PipelineDocument,
	graph::PipelineGraph,
	instance::{NodeInstance, NodeInstanceId, NodeOverrides},
};

/// Builds one pipeline against a catalog.
///
/// Every operation is validated against the catalog before it
/// touches the pipeline. A failed operation changes nothing.
#[derive(Debug)]
pub struct PipelineBuilder {
	catalog: Arc<Catalog>,
	graph: PipelineGraph,
}

impl PipelineBuilder {
	/// Start a new, empty pipeline.
	///
	/// Its global properties are the catalog's defaults,
	/// then `pipelineVersion` and `pipelineName`, then `fields`.
	/// Later layers replace earlier ones key by key.
	pub fn create(
		catalog: Arc<Catalog>,
		pipeline_version: &str,
		pipeline_name: &str,
		fields: Record,
	) -> Result<Self, PipelineError> {
		let mut record = catalog.global_defaults().clone();
		record.insert(
			"pipelineVersion".into(),
			Value::String(pipeline_version.into()),
		);
		record.insert("pipelineName".into(), Value::String(pipeline_name.into()));
		record.extend(fields);

		let global_properties = validate_global(&catalog, record)?;

		debug!(
			message = "Created pipeline",
			pipeline_name,
			pipeline_version
		);

		return Ok(Self {
			catalog,
			graph: PipelineGraph::new(global_properties),
		});
	}

	/// Rebuild a pipeline from an exported document.
	///
	/// Every node and connection is validated exactly as if
	/// it had been added by hand. Node ids are kept, and
	/// the catalog will never hand them out again.
	pub fn import(catalog: Arc<Catalog>, document: &PipelineDocument) -> Result<Self, PipelineError> {
		let global_properties = validate_global(&catalog, document.global_properties.clone())?;
		let mut builder = Self {
			catalog,
			graph: PipelineGraph::new(global_properties),
		};

		for n in &document.nodes {
			let node = builder.instantiate(
				n.id,
				n.name.as_str(),
				NodeOverrides::new().properties(n.properties.clone()),
			)?;
			builder.graph.add_node(node)?;

			if !builder.catalog.reserve_instance_id(n.id.as_u64()) {
				return Err(PipelineError::InvalidNodeInstanceId { id: n.id });
			}
		}

		for c in &document.connections {
			builder.connect(
				c.node1_id,
				c.node1_output.as_str(),
				c.node2_id,
				c.node2_input.as_str(),
			)?;
		}

		debug!(
			message = "Imported pipeline",
			nodes = builder.graph.len_nodes(),
			connections = builder.graph.len_connections()
		);

		return Ok(builder);
	}

	/// Merge `fields` into this pipeline's global properties.
	/// Keys in `fields` replace existing keys; nested values are not merged.
	pub fn set_global_properties(&mut self, fields: Record) -> Result<&mut Self, PipelineError> {
		let mut record = self.graph.global_properties().clone();
		record.extend(fields);

		let global_properties = validate_global(&self.catalog, record)?;
		self.graph.set_global_properties(global_properties);

		trace!(
			message = "Set global properties",
			properties = ?self.graph.global_properties()
		);

		return Ok(self);
	}

	/// Add a node of class `class` to this pipeline
	pub fn add_node(
		&mut self,
		class: &str,
		overrides: NodeOverrides,
	) -> Result<NodeInstanceId, PipelineError> {
		let id = self
			.catalog
			.next_instance_id()
			.map(NodeInstanceId::new)
			.ok_or(PipelineError::NodeIdsExhausted)?;
		let node = self.instantiate(id, class, overrides)?;

		debug!(
			message = "Added node",
			node_class = class,
			node_name = node.name(),
			%id
		);

		self.graph.add_node(node)?;
		return Ok(id);
	}

	/// Connect `source`'s output `output` to `target`'s input `input`.
	/// Fails if these ports share no compatible datatypes.
	pub fn connect(
		&mut self,
		source: NodeInstanceId,
		output: &str,
		target: NodeInstanceId,
		input: &str,
	) -> Result<Connection, PipelineError> {
		let connection = {
			let source_node = self
				.graph
				.node(source)
				.ok_or(PipelineError::UnknownNodeInstance { id: source })?;
			let target_node = self
				.graph
				.node(target)
				.ok_or(PipelineError::UnknownNodeInstance { id: target })?;

			let source_class = source_node.class();
			let target_class = target_node.class();

			let out_port =
				source_class
					.output(output)
					.ok_or_else(|| PipelineError::UnknownPort {
						class: source_class.name().clone(),
						direction: PortDirection::Output,
						port: output.into(),
					})?;

			let in_port = target_class
				.input(input)
				.ok_or_else(|| PipelineError::UnknownPort {
					class: target_class.name().clone(),
					direction: PortDirection::Input,
					port: input.into(),
				})?;

			if !out_port.compatible_with(in_port, self.catalog.datatypes()) {
				if !out_port.unresolved().is_empty() || !in_port.unresolved().is_empty() {
					debug!(
						message = "Incompatible ports reference unknown datatypes, these were ignored",
						output_unresolved = %out_port.unresolved().iter().join(", "),
						input_unresolved = %in_port.unresolved().iter().join(", "),
					);
				}

				return Err(PipelineError::IncompatibleConnection {
					source_class: source_class.name().clone(),
					output: out_port.name().clone(),
					target_class: target_class.name().clone(),
					input: in_port.name().clone(),
				});
			}

			Connection::new(
				source,
				out_port.name().clone(),
				target,
				in_port.name().clone(),
			)
		};

		trace!(
			message = "Connected nodes",
			%source,
			output,
			%target,
			input
		);

		self.graph
			.add_connection(connection.clone())
			.ok_or(PipelineError::UnknownNodeInstance { id: source })?;
		return Ok(connection);
	}

	/// Find a node in this pipeline
	pub fn node(&self, id: NodeInstanceId) -> Option<&NodeInstance> {
		self.graph.node(id)
	}

	/// Iterate over this pipeline's nodes, in the order they were added
	pub fn nodes(&self) -> impl Iterator<Item = &NodeInstance> {
		self.graph.nodes()
	}

	/// Iterate over this pipeline's connections, in the order they were added
	pub fn connections(&self) -> impl Iterator<Item = &Connection> {
		self.graph.connections()
	}

	pub fn global_properties(&self) -> &Record {
		self.graph.global_properties()
	}

	pub fn graph(&self) -> &PipelineGraph {
		&self.graph
	}

	/// Export this pipeline as a document
	pub fn export(&self) -> PipelineDocument {
		PipelineDocument::from(&self.graph)
	}

	// MARK: Helpers

	fn unknown_class(&self, class: &str) -> PipelineError {
		PipelineError::UnknownNodeClass {
			class: class.into(),
			available: self.catalog.registry().names().join(", "),
		}
	}

	/// Make a node instance without adding it to the graph
	fn instantiate(
		&self,
		id: NodeInstanceId,
		class_name: &str,
		overrides: NodeOverrides,
	) -> Result<NodeInstance, PipelineError> {
		let class = self
			.catalog
			.registry()
			.get(class_name)
			.ok_or_else(|| self.unknown_class(class_name))?
			.clone();

		let name = match overrides.name {
			None => class.name().as_str().into(),
			Some(name) => {
				check_label(&name).map_err(|error| PipelineError::InvalidName {
					name: name.clone(),
					error,
				})?;
				name
			}
		};

		let properties = class
			.build_properties(overrides.properties.unwrap_or_default())
			.map_err(|error| PipelineError::ConfigurationValidationFailure {
				shape: class.shape_name().into(),
				error,
			})?;

		return Ok(NodeInstance::new(id, name, properties, class));
	}
}

fn validate_global(catalog: &Catalog, record: Record) -> Result<Record, PipelineError> {
	catalog.global_shape().from_record(record).map_err(|error| {
		PipelineError::ConfigurationValidationFailure {
			shape: GLOBAL_PROPERTIES_SHAPE.into(),
			error,
		}
	})
}
