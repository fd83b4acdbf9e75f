//! Catalog initialization.
//!
//! A [`Catalog`] is everything we know about the device:
//! its datatypes, its node classes and the shape of its global properties.
//! It is built exactly once and shared by every pipeline builder.

use itertools::Itertools;
use std::{
	path::{Path, PathBuf},
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
	config::CatalogConfig,
	datatype::DatatypeCatalog,
	errors::LoadError,
	json::{HierarchyJson, NodeDescriptorJson},
	nodeclass::NodeClassRegistry,
	shape::{ConfigShape, Record, ShapeSet, GLOBAL_PROPERTIES_SHAPE},
};

/// The documents a catalog is built from
#[derive(Debug, Clone)]
pub struct CatalogSources {
	pub hierarchy: HierarchyJson,
	pub descriptors: Vec<NodeDescriptorJson>,
}

impl CatalogSources {
	/// Read catalog documents from a directory laid out as follows:
	///
	/// ```text
	/// root/
	/// ├── common/DatatypeHierarchy.json
	/// └── nodes/
	///     ├── XLinkIn/XLinkIn.json
	///     └── XLinkOut/XLinkOut.json
	/// ```
	///
	/// Node directories are read in sorted order.
	pub fn from_dir(root: &Path) -> Result<Self, LoadError> {
		let hierarchy_path = root.join("common").join("DatatypeHierarchy.json");
		let hierarchy: HierarchyJson = read_json(&hierarchy_path)?;

		let nodes_root = root.join("nodes");
		let mut descriptors = Vec::new();
		for entry in WalkDir::new(&nodes_root)
			.min_depth(1)
			.max_depth(1)
			.sort_by_file_name()
		{
			let entry = entry.map_err(|error| LoadError::Io {
				path: error
					.path()
					.map(Path::to_path_buf)
					.unwrap_or_else(|| nodes_root.clone()),
				error: error.into(),
			})?;

			if !entry.file_type().is_dir() {
				continue;
			}

			let stem = entry.file_name().to_string_lossy();
			let descriptor_path: PathBuf = entry.path().join(format!("{stem}.json"));
			descriptors.push(read_json(&descriptor_path)?);
		}

		debug!(
			message = "Read catalog directory",
			root = ?root,
			descriptors = descriptors.len()
		);

		return Ok(Self {
			hierarchy,
			descriptors,
		});
	}

	/// Parse in-memory catalog documents
	pub fn from_json_strs(
		hierarchy: &str,
		descriptors: impl IntoIterator<Item = impl AsRef<str>>,
	) -> Result<Self, LoadError> {
		let hierarchy =
			serde_json::from_str(hierarchy).map_err(|error| LoadError::Parse {
				source_name: "DatatypeHierarchy.json".into(),
				error,
			})?;

		let descriptors = descriptors
			.into_iter()
			.enumerate()
			.map(|(i, d)| {
				serde_json::from_str(d.as_ref()).map_err(|error| LoadError::Parse {
					source_name: format!("node descriptor #{i}").into(),
					error,
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		return Ok(Self {
			hierarchy,
			descriptors,
		});
	}
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
	let text = std::fs::read_to_string(path).map_err(|error| LoadError::Io {
		path: path.to_path_buf(),
		error,
	})?;

	serde_json::from_str(&text).map_err(|error| LoadError::Parse {
		source_name: path.display().to_string().into(),
		error,
	})
}

/// A fully-loaded catalog.
/// Read-only, except for the instance id counter.
#[derive(Debug)]
pub struct Catalog {
	datatypes: DatatypeCatalog,
	registry: NodeClassRegistry,
	global_shape: Arc<dyn ConfigShape>,
	global_defaults: Record,

	/// The id the next node instance will get
	next_instance_id: AtomicU64,
}

impl Catalog {
	/// Build a catalog. This should be done once per process.
	/// Fails if any part of the catalog is invalid.
	pub fn initialize(
		sources: &CatalogSources,
		shapes: &ShapeSet,
		config: &CatalogConfig,
	) -> Result<Self, LoadError> {
		let global_shape = shapes
			.get(GLOBAL_PROPERTIES_SHAPE)
			.ok_or_else(|| LoadError::MissingConfigurationShape {
				shape: GLOBAL_PROPERTIES_SHAPE.into(),
				required_by: "global properties".into(),
			})?
			.clone();

		let datatypes = DatatypeCatalog::resolve(&sources.hierarchy.hierarchies)?;
		let registry =
			NodeClassRegistry::load(&sources.descriptors, &datatypes, shapes, &config.catalog)?;

		info!(
			message = "Initialized catalog",
			datatypes = datatypes.len(),
			node_classes = registry.len(),
			unresolved_datatypes = registry.unresolved_count(),
		);
		debug!(
			message = "Available node classes",
			classes = %registry.names().join(", ")
		);

		return Ok(Self {
			datatypes,
			registry,
			global_shape,
			global_defaults: config.global_defaults.clone(),
			next_instance_id: AtomicU64::new(0),
		});
	}

	pub fn datatypes(&self) -> &DatatypeCatalog {
		&self.datatypes
	}

	pub fn registry(&self) -> &NodeClassRegistry {
		&self.registry
	}

	/// The shape every pipeline's global properties must fit
	pub fn global_shape(&self) -> &Arc<dyn ConfigShape> {
		&self.global_shape
	}

	/// The record every pipeline's global properties start from
	pub fn global_defaults(&self) -> &Record {
		&self.global_defaults
	}

	/// Get a fresh node instance id.
	/// Never returns the same value twice.
	/// Returns `None` once every id has been used.
	pub fn next_instance_id(&self) -> Option<u64> {
		self.next_instance_id
			.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
			.ok()
	}

	/// Make sure `id` is never handed out by [`Catalog::next_instance_id`].
	/// Used when importing nodes that already have ids.
	///
	/// Returns `false` if `id` can't be reserved. This only happens for `u64::MAX`,
	/// since the counter can't move past it.
	#[must_use]
	pub fn reserve_instance_id(&self, id: u64) -> bool {
		match id.checked_add(1) {
			None => false,
			Some(next) => {
				self.next_instance_id.fetch_max(next, Ordering::Relaxed);
				true
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::shape::OpenShape;

	fn testdata() -> PathBuf {
		Path::new(env!("CARGO_MANIFEST_DIR"))
			.join("testdata")
			.join("catalog")
	}

	fn no_descriptors() -> CatalogSources {
		CatalogSources::from_json_strs(r#"{ "hierarchies": [] }"#, Vec::<&str>::new()).unwrap()
	}

	fn shapes() -> ShapeSet {
		ShapeSet::new()
			.with_shape(GLOBAL_PROPERTIES_SHAPE, OpenShape)
			.with_shape("XLinkInProperties", OpenShape)
			.with_shape("XLinkOutProperties", OpenShape)
			.with_shape("MyProducerProperties", OpenShape)
			.with_shape("NeuralNetworkProperties", OpenShape)
	}

	#[test]
	fn load_fixture_catalog() {
		let sources = CatalogSources::from_dir(&testdata()).unwrap();
		assert_eq!(
			sources
				.descriptors
				.iter()
				.map(|d| d.name.as_str())
				.collect::<Vec<_>>(),
			vec!["MyProducer", "NeuralNetwork", "XLinkIn", "XLinkOut"]
		);

		let catalog = Catalog::initialize(&sources, &shapes(), &CatalogConfig::default()).unwrap();
		assert_eq!(catalog.registry().len(), 4);
		assert!(catalog.datatypes().get("ImgFrame").is_some());

		// `MyProducer` lists a datatype that isn't in the hierarchy
		assert_eq!(catalog.registry().unresolved_count(), 1);
	}

	#[test]
	fn strict_fixture_catalog_fails() {
		let sources = CatalogSources::from_dir(&testdata()).unwrap();
		let mut config = CatalogConfig::default();
		config.catalog.strict_datatypes = true;

		assert!(matches!(
			Catalog::initialize(&sources, &shapes(), &config),
			Err(LoadError::UnresolvedDatatype { .. })
		));
	}

	#[test]
	fn missing_directory_is_an_io_error() {
		assert!(matches!(
			CatalogSources::from_dir(&testdata().join("not-a-dir")),
			Err(LoadError::Io { .. })
		));
	}

	#[test]
	fn global_shape_is_required() {
		let sources = no_descriptors();
		match Catalog::initialize(&sources, &ShapeSet::new(), &CatalogConfig::default()) {
			Err(LoadError::MissingConfigurationShape { shape, .. }) => {
				assert_eq!(shape.as_str(), GLOBAL_PROPERTIES_SHAPE)
			}
			x => panic!("unexpected result {x:?}"),
		}
	}

	#[test]
	fn bad_json_is_a_parse_error() {
		assert!(matches!(
			CatalogSources::from_json_strs(r#"{ "hierarchies": [] }"#, ["{ \"name\": 5 }"]),
			Err(LoadError::Parse { .. })
		));
	}

	#[test]
	fn instance_ids() {
		let sources = no_descriptors();
		let catalog = Catalog::initialize(
			&sources,
			&ShapeSet::new().with_shape(GLOBAL_PROPERTIES_SHAPE, OpenShape),
			&CatalogConfig::default(),
		)
		.unwrap();

		let a = catalog.next_instance_id();
		let b = catalog.next_instance_id();
		assert_ne!(a, b);

		assert!(catalog.reserve_instance_id(41));
		assert_eq!(catalog.next_instance_id(), Some(42));

		// Reserving a smaller id never moves the counter back
		assert!(catalog.reserve_instance_id(3));
		assert_eq!(catalog.next_instance_id(), Some(43));
	}

	#[test]
	fn instance_ids_run_out_instead_of_repeating() {
		let catalog = Catalog::initialize(
			&no_descriptors(),
			&ShapeSet::new().with_shape(GLOBAL_PROPERTIES_SHAPE, OpenShape),
			&CatalogConfig::default(),
		)
		.unwrap();

		assert!(!catalog.reserve_instance_id(u64::MAX));
		assert_eq!(catalog.next_instance_id(), Some(0));

		assert!(catalog.reserve_instance_id(u64::MAX - 2));
		assert_eq!(catalog.next_instance_id(), Some(u64::MAX - 1));
		assert_eq!(catalog.next_instance_id(), None);
		assert_eq!(catalog.next_instance_id(), None);
	}
}
