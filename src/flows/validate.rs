use crate::error::{FieldError, FlowError};

/// Collects every failing field rather than stopping at the first one.
#[derive(Debug, Default)]
pub struct Validator {
	errors: Vec<FieldError>,
}

impl Validator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Requires at least `min` characters. `min = 1` means non-empty.
	pub fn min_chars(
		mut self,
		field: &'static str,
		value: &str,
		min: usize,
		message: &'static str,
	) -> Self {
		if value.chars().count() < min {
			self.errors.push(FieldError { field, message });
		}
		self
	}

	pub fn finish(self) -> Result<(), FlowError> {
		if self.errors.is_empty() {
			Ok(())
		} else {
			Err(FlowError::Invalid(self.errors))
		}
	}
}

/// Input records that are checked before any model call.
pub trait Validate {
	fn validate(&self) -> Result<(), FlowError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reports_all_failing_fields_in_order() {
		let err = Validator::new()
			.min_chars("a", "", 1, "a empty")
			.min_chars("b", "long enough", 3, "b short")
			.min_chars("c", "xy", 3, "c short")
			.finish()
			.unwrap_err();

		assert_eq!(
			err,
			FlowError::Invalid(vec![
				FieldError {
					field: "a",
					message: "a empty"
				},
				FieldError {
					field: "c",
					message: "c short"
				},
			])
		);
	}

	#[test]
	fn counts_characters_not_bytes() {
		assert!(Validator::new().min_chars("d", "ŝ→λ", 3, "short").finish().is_ok());
		assert!(Validator::new().min_chars("d", "ŝλ", 3, "short").finish().is_err());
	}
}
