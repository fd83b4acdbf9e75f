//! Helpful types for datatype, node class and port names

use serde::{Deserialize, Serialize};
use smartstring::{LazyCompact, SmartString};
use std::{borrow::Borrow, fmt::Display};

/// Generate a name newtype.
/// All of these behave exactly the same way; they exist
/// so that we can't pass a port name where a class name is expected.
macro_rules! name_type {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Hash, PartialEq, Eq, Clone, Serialize, Deserialize, PartialOrd, Ord)]
		#[serde(transparent)]
		pub struct $name(SmartString<LazyCompact>);

		impl $name {
			/// Make a new name
			pub fn new(name: &str) -> Self {
				Self(name.into())
			}

			/// Get this name as a string slice
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				self.0.fmt(f)
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}

		impl From<&str> for $name {
			fn from(s: &str) -> Self {
				Self::new(s)
			}
		}

		impl From<String> for $name {
			fn from(s: String) -> Self {
				Self(s.into())
			}
		}

		impl From<SmartString<LazyCompact>> for $name {
			fn from(s: SmartString<LazyCompact>) -> Self {
				Self(s)
			}
		}

		impl From<$name> for SmartString<LazyCompact> {
			fn from(value: $name) -> Self {
				value.0
			}
		}
	};
}

name_type!(
	/// The name of a datatype in the datatype hierarchy
	DatatypeName
);

name_type!(
	/// The name of a node class in the node class registry
	NodeClassName
);

name_type!(
	/// The name of a node's input or output port
	PortName
);
