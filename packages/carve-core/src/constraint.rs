//! Per-column serial type constraints and the textual descriptor format.
//!
//! A descriptor lists one entry per column separated by `;`. Each entry is
//! `*` (or empty) for an unconstrained column, or comma-separated tokens:
//! a decimal serial type, `string`/`text`, `blob`, `null`, `int` or `float`.
//!
//! ```
//! use carve_core::constraint::parse_descriptor;
//!
//! let sets = parse_descriptor("int;string;*").unwrap();
//! assert_eq!(sets.len(), 3);
//! assert!(sets[2].is_none());
//! ```

use std::str::FromStr;

use thiserror::Error;

use crate::value::SerialType;

/// Serial types that hold integers, including the zero-width constants.
const INTEGER_TYPES: [u64; 8] = [1, 2, 3, 4, 5, 6, 8, 9];

/// One acceptable serial type, or a whole variable-width family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeConstraint {
    Exact(SerialType),
    /// Any odd serial type >= 13
    AnyText,
    /// Any even serial type >= 12
    AnyBlob,
}

impl TypeConstraint {
    pub fn matches(&self, serial_type: SerialType) -> bool {
        match self {
            TypeConstraint::Exact(expected) => *expected == serial_type,
            TypeConstraint::AnyText => serial_type.is_text(),
            TypeConstraint::AnyBlob => serial_type.is_blob(),
        }
    }
}

/// Set of serial types a single column may take.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSet(Vec<TypeConstraint>);

impl TypeSet {
    pub fn new(constraints: Vec<TypeConstraint>) -> Self {
        Self(constraints)
    }

    pub fn exact(serial_types: impl IntoIterator<Item = u64>) -> Self {
        Self(
            serial_types
                .into_iter()
                .map(|st| TypeConstraint::Exact(SerialType(st)))
                .collect(),
        )
    }

    pub fn any_text() -> Self {
        Self(vec![TypeConstraint::AnyText])
    }

    pub fn any_blob() -> Self {
        Self(vec![TypeConstraint::AnyBlob])
    }

    pub fn with(mut self, constraint: TypeConstraint) -> Self {
        self.0.push(constraint);
        self
    }

    /// Returns true if any member accepts `serial_type`.
    pub fn accepts(&self, serial_type: SerialType) -> bool {
        self.0.iter().any(|c| c.matches(serial_type))
    }

    pub fn constraints(&self) -> &[TypeConstraint] {
        &self.0
    }
}

/// Malformed column type descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Unknown type token '{token}' in column {column}")]
    UnknownToken { column: usize, token: String },

    #[error("Empty type token in column {column}")]
    EmptyToken { column: usize },
}

impl FromStr for TypeSet {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_column_entry(0, s)
    }
}

fn parse_column_entry(column: usize, entry: &str) -> Result<TypeSet, DescriptorError> {
    let mut set = TypeSet::default();

    for token in entry.split(',').map(str::trim) {
        match token.to_ascii_lowercase().as_str() {
            "" => return Err(DescriptorError::EmptyToken { column }),
            "string" | "text" => set.0.push(TypeConstraint::AnyText),
            "blob" => set.0.push(TypeConstraint::AnyBlob),
            "null" => set.0.push(TypeConstraint::Exact(SerialType::NULL)),
            "float" => set.0.push(TypeConstraint::Exact(SerialType::FLOAT)),
            "int" | "integer" => set.0.extend(
                INTEGER_TYPES
                    .iter()
                    .map(|&st| TypeConstraint::Exact(SerialType(st))),
            ),
            other => {
                let st = other
                    .parse::<u64>()
                    .map_err(|_| DescriptorError::UnknownToken {
                        column,
                        token: token.to_string(),
                    })?;
                set.0.push(TypeConstraint::Exact(SerialType(st)));
            }
        }
    }

    Ok(set)
}

/// Parses a `;`-separated column type descriptor.
///
/// # Returns
/// One entry per column; `None` for unconstrained columns.
pub fn parse_descriptor(descriptor: &str) -> Result<Vec<Option<TypeSet>>, DescriptorError> {
    descriptor
        .split(';')
        .enumerate()
        .map(|(column, entry)| match entry.trim() {
            "" | "*" => Ok(None),
            entry => parse_column_entry(column, entry).map(Some),
        })
        .collect()
}
