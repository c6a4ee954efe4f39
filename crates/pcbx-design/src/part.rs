use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A purchasable catalog entry.
///
/// Immutable value: a supplier identifier plus the supplier's part number.
/// Descriptive properties and numeric attributes come from the catalog and
/// are used for diagnostics and compatibility checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Identifier of the supplier this part is ordered from
    pub supplier: String,
    /// Supplier-assigned part number
    pub part_number: String,
    /// Manufacturer name, if the catalog reports one
    pub manufacturer: Option<String>,
    /// Datasheet URL, if the catalog reports one
    pub datasheet: Option<String>,
    /// Numeric attributes keyed by parameter name (e.g. "resistance")
    pub attributes: IndexMap<String, Value>,
}

impl Part {
    pub fn new(supplier: impl Into<String>, part_number: impl Into<String>) -> Self {
        Self {
            supplier: supplier.into(),
            part_number: part_number.into(),
            manufacturer: None,
            datasheet: None,
            attributes: IndexMap::new(),
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_datasheet(mut self, datasheet: impl Into<String>) -> Self {
        self.datasheet = Some(datasheet.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(name.into(), Value::new(value));
        self
    }

    /// Numeric attribute by parameter name.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).copied()
    }

    /// `supplier:part_number`, for logs and error messages.
    pub fn display_name(&self) -> String {
        format!("{}:{}", self.supplier, self.part_number)
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
