//! Error types shared across the graph, flow and config layers.

use std::fmt;

use thiserror::Error;

/// Rejected knowledge-graph mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	/// Ids are unique; the store is left unchanged.
	#[error("node already exists: {0}")]
	DuplicateNode(String),

	/// An edge endpoint is not in the store.
	#[error("edge {from} -> {to} references missing node {missing}")]
	DanglingReference {
		/// Source id as given.
		from: String,
		/// Target id as given.
		to: String,
		/// Whichever endpoint was absent, checking the source first.
		missing: String,
	},

	/// Sizes are radii and must be positive.
	#[error("node {id} has non-positive size {size}")]
	InvalidSize {
		/// Rejected node.
		id: String,
		/// Offending size.
		size: f64,
	},
}

impl GraphError {
	/// `DanglingReference` from borrowed ids.
	pub fn dangling(from: &str, to: &str, missing: &str) -> Self {
		Self::DanglingReference {
			from: from.to_string(),
			to: to.to_string(),
			missing: missing.to_string(),
		}
	}
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
	pub field: &'static str,
	pub message: &'static str,
}

impl fmt::Display for FieldError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.field, self.message)
	}
}

/// What a flow hands back to the page. The display text is the only thing
/// the user ever sees; model failures are logged before they become
/// `Failed`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
	/// Every failing field, in form order. No model call was made.
	#[error("Invalid input.")]
	Invalid(Vec<FieldError>),

	/// The model call failed or broke the output contract.
	#[error("Failed to {action}. Please try again.")]
	Failed {
		/// Verb phrase naming the flow, e.g. "derive equation".
		action: &'static str,
	},
}

impl FlowError {
	/// Message attached to `field`, if validation rejected it.
	pub fn field_message(&self, field: &str) -> Option<&'static str> {
		match self {
			Self::Invalid(errors) => errors.iter().find(|e| e.field == field).map(|e| e.message),
			Self::Failed { .. } => None,
		}
	}
}

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("invalid config: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("layout.{field} must be {expected}, got {value}")]
	OutOfRange {
		field: &'static str,
		value: f64,
		expected: &'static str,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flow_error_messages_are_generic() {
		let invalid = FlowError::Invalid(vec![FieldError {
			field: "hypothesis",
			message: "Hypothesis cannot be empty.",
		}]);
		assert_eq!(invalid.to_string(), "Invalid input.");
		assert_eq!(
			invalid.field_message("hypothesis"),
			Some("Hypothesis cannot be empty.")
		);
		assert_eq!(invalid.field_message("equation"), None);

		let failed = FlowError::Failed {
			action: "derive equation",
		};
		assert_eq!(
			failed.to_string(),
			"Failed to derive equation. Please try again."
		);
	}

	#[test]
	fn dangling_reference_names_missing_node() {
		let err = GraphError::dangling("Optics", "Snell's Law", "Optics");
		assert_eq!(
			err.to_string(),
			"edge Optics -> Snell's Law references missing node Optics"
		);
	}
}
