//! The datatype hierarchy.
//!
//! Every datatype declared in the catalog gets exactly one [`Datatype`],
//! referenced everywhere else by its [`DatatypeId`].
//! Two datatypes are compatible if they are the same,
//! or if one is an ancestor of the other.

use dai_util::{labels::DatatypeName, names::check_identifier};
use std::collections::HashMap;
use tracing::debug;

use crate::{errors::LoadError, json::DatatypeJson};

/// A handle to a datatype inside a [`DatatypeCatalog`].
/// Only meaningful for the catalog that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatatypeId(u32);

impl DatatypeId {
	fn as_usize(self) -> usize {
		self.0 as usize
	}
}

/// One resolved datatype
#[derive(Debug, Clone)]
pub struct Datatype {
	id: DatatypeId,
	name: DatatypeName,
	parent: Option<DatatypeId>,

	/// Every ancestor of this datatype, sorted.
	ancestors: Vec<DatatypeId>,
}

impl Datatype {
	pub fn id(&self) -> DatatypeId {
		self.id
	}

	pub fn name(&self) -> &DatatypeName {
		&self.name
	}

	/// This datatype's direct supertype, if it has one
	pub fn parent(&self) -> Option<DatatypeId> {
		self.parent
	}

	/// All supertypes of this datatype, in no particular order
	pub fn ancestors(&self) -> &[DatatypeId] {
		&self.ancestors
	}

	/// Is `other` a (possibly indirect) supertype of this datatype?
	pub fn descends_from(&self, other: DatatypeId) -> bool {
		self.ancestors.binary_search(&other).is_ok()
	}
}

/// All datatypes in a catalog.
/// Built once by [`DatatypeCatalog::resolve`] and never changed.
#[derive(Debug, Clone, Default)]
pub struct DatatypeCatalog {
	/// Indexed by [`DatatypeId`]
	datatypes: Vec<Datatype>,
	by_name: HashMap<DatatypeName, DatatypeId>,
}

impl DatatypeCatalog {
	/// Resolve a datatype forest.
	///
	/// Roots have no ancestors. Every child's ancestors are
	/// its parent and all of its parent's ancestors.
	pub fn resolve(roots: &[DatatypeJson]) -> Result<Self, LoadError> {
		let mut catalog = Self::default();
		for root in roots {
			catalog.resolve_one(root, None)?;
		}

		debug!(
			message = "Resolved datatype hierarchy",
			roots = roots.len(),
			datatypes = catalog.datatypes.len()
		);

		return Ok(catalog);
	}

	fn resolve_one(
		&mut self,
		datatype: &DatatypeJson,
		parent: Option<DatatypeId>,
	) -> Result<DatatypeId, LoadError> {
		check_identifier(datatype.datatype.as_str()).map_err(|error| LoadError::InvalidName {
			name: datatype.datatype.clone().into(),
			error,
		})?;

		if self.by_name.contains_key(&datatype.datatype) {
			return Err(LoadError::DuplicateDatatype {
				datatype: datatype.datatype.clone(),
			});
		}

		// Ids are handed out in preorder, so a parent's id is always
		// smaller than every id below it. Appending the parent keeps
		// `ancestors` sorted.
		let ancestors = match parent.and_then(|p| self.datatypes.get(p.as_usize())) {
			None => Vec::new(),
			Some(p) => {
				let mut a = p.ancestors.clone();
				a.push(p.id);
				a
			}
		};

		let id = DatatypeId(self.datatypes.len() as u32);
		self.datatypes.push(Datatype {
			id,
			name: datatype.datatype.clone(),
			parent,
			ancestors,
		});
		self.by_name.insert(datatype.datatype.clone(), id);

		for child in &datatype.children {
			self.resolve_one(child, Some(id))?;
		}

		return Ok(id);
	}

	/// Find a datatype by name.
	/// Unknown names are not an error, they just have no datatype.
	pub fn get(&self, name: &str) -> Option<DatatypeId> {
		self.by_name.get(name).copied()
	}

	/// Get the datatype behind a handle
	pub fn datatype(&self, id: DatatypeId) -> Option<&Datatype> {
		self.datatypes.get(id.as_usize())
	}

	pub fn len(&self) -> usize {
		self.datatypes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.datatypes.is_empty()
	}

	/// Iterate over all datatypes, in declaration order
	pub fn iter(&self) -> impl Iterator<Item = &Datatype> {
		self.datatypes.iter()
	}

	/// Is `ancestor` a (possibly indirect) supertype of `datatype`?
	pub fn is_ancestor(&self, ancestor: DatatypeId, datatype: DatatypeId) -> bool {
		self.datatype(datatype)
			.map(|d| d.descends_from(ancestor))
			.unwrap_or(false)
	}

	/// Can data of type `a` flow between ports typed `b`?
	/// This is symmetric: a datatype is compatible with
	/// all of its ancestors and all of its descendants.
	pub fn compatible(&self, a: DatatypeId, b: DatatypeId) -> bool {
		a == b || self.is_ancestor(a, b) || self.is_ancestor(b, a)
	}

	/// Is any datatype in `a` compatible with any datatype in `b`?
	pub fn compatible_sets(&self, a: &[DatatypeId], b: &[DatatypeId]) -> bool {
		a.iter()
			.any(|x| b.iter().any(|y| self.compatible(*x, *y)))
	}
}
