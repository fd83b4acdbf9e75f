//! Name rules.
//!
//! Datatypes, node classes and ports are referenced by name from device
//! firmware and from exported pipelines, so their names must be plain
//! identifiers. Node instance names are only shown to people and
//! may be any printable text.

use thiserror::Error;

/// The ways a name may be invalid
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
	#[error("name is empty")]
	Empty,

	#[error("name has leading or trailing whitespace")]
	SurroundingWhitespace,

	#[error("name contains control character {0:?}")]
	ControlCharacter(char),

	/// Identifiers start with an ascii letter or `_`
	#[error("identifier cannot start with {0:?}")]
	BadIdentifierStart(char),

	/// Identifiers contain only ascii letters, digits and `_`
	#[error("identifier cannot contain {0:?}")]
	BadIdentifierChar(char),
}

/// Check a datatype, node class or port name.
/// These must look like `XLinkIn`, `out` or `inputConfig_2`.
pub fn check_identifier(name: &str) -> Result<(), NameError> {
	let mut chars = name.chars();

	let first = chars.next().ok_or(NameError::Empty)?;
	if !(first.is_ascii_alphabetic() || first == '_') {
		return Err(NameError::BadIdentifierStart(first));
	}

	if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
		return Err(NameError::BadIdentifierChar(c));
	}

	return Ok(());
}

/// Check a caller-provided node instance name
pub fn check_label(name: &str) -> Result<(), NameError> {
	if name.is_empty() {
		return Err(NameError::Empty);
	}

	if name.trim() != name {
		return Err(NameError::SurroundingWhitespace);
	}

	if let Some(c) = name.chars().find(|c| c.is_control()) {
		return Err(NameError::ControlCharacter(c));
	}

	return Ok(());
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identifiers() {
		for name in ["XLinkIn", "out", "inputConfig_2", "_private"] {
			assert_eq!(check_identifier(name), Ok(()), "{name}");
		}

		assert_eq!(check_identifier(""), Err(NameError::Empty));
		assert_eq!(check_identifier("2in"), Err(NameError::BadIdentifierStart('2')));
		assert_eq!(check_identifier(" out"), Err(NameError::BadIdentifierStart(' ')));
		assert_eq!(check_identifier("out "), Err(NameError::BadIdentifierChar(' ')));
		assert_eq!(
			check_identifier("XLink.In"),
			Err(NameError::BadIdentifierChar('.'))
		);
		assert_eq!(
			check_identifier("Kamera\u{e9}"),
			Err(NameError::BadIdentifierChar('\u{e9}'))
		);
	}

	#[test]
	fn labels() {
		assert_eq!(check_label("left camera"), Ok(()));
		assert_eq!(check_label("Kamera links \u{e9}"), Ok(()));

		assert_eq!(check_label(""), Err(NameError::Empty));
		assert_eq!(check_label("   "), Err(NameError::SurroundingWhitespace));
		assert_eq!(check_label("out\n"), Err(NameError::SurroundingWhitespace));
		assert_eq!(
			check_label("left\tcamera"),
			Err(NameError::ControlCharacter('\t'))
		);
	}
}
