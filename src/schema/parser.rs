use super::model::Specification;
use super::validate::validate_value;
use crate::error::PrependError;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Validates and deserializes an already-parsed JSON value.
pub fn parse_value(value: Value) -> Result<Specification, PrependError> {
    validate_value(&value)?;
    Ok(serde_json::from_value(value)?)
}

pub fn parse_str(json: &str) -> Result<Specification, PrependError> {
    parse_value(serde_json::from_str(json)?)
}

pub fn parse_reader<R: Read>(reader: R) -> Result<Specification, PrependError> {
    parse_value(serde_json::from_reader(reader)?)
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Specification, PrependError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PrependError::NotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path)?;
    parse_str(&json)
}

impl Specification {
    /// Re-checks a specification built in code against the same rules as JSON input.
    pub fn validate(&self) -> Result<(), PrependError> {
        validate_value(&serde_json::to_value(self)?)?;
        Ok(())
    }
}
