//! Variable metadata for datasets.
//!
//! Describes what each matrix column holds: an optional name (from a header
//! row or a caller-supplied list) and whether the variable is continuous or
//! an unordered factor.

use crate::error::DataError;
use std::collections::HashMap;

/// Logical variable types.
///
/// Values are stored numerically regardless of type; the `VariableType`
/// records how split finding should treat them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VariableType {
    /// Continuous numeric variable, split by thresholding ordered values.
    #[default]
    Numeric,

    /// Unordered factor stored as a numeric level code `1.0, 2.0, ...`.
    ///
    /// Splitters partition the level set instead of thresholding it.
    Factor,
}

impl VariableType {
    /// Returns true for factor variables.
    #[inline]
    pub fn is_factor(&self) -> bool {
        matches!(self, VariableType::Factor)
    }

    /// Returns true for numeric variables.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, VariableType::Numeric)
    }
}

/// Metadata for a single variable.
#[derive(Clone, Debug, Default)]
pub struct VariableMeta {
    /// Variable name (optional).
    pub name: Option<String>,

    /// Variable type.
    pub variable_type: VariableType,
}

impl VariableMeta {
    /// Metadata for an unnamed numeric variable.
    pub fn numeric() -> Self {
        Self {
            name: None,
            variable_type: VariableType::Numeric,
        }
    }

    /// Metadata for a named numeric variable.
    pub fn numeric_named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            variable_type: VariableType::Numeric,
        }
    }

    /// Metadata for an unnamed factor variable.
    pub fn factor() -> Self {
        Self {
            name: None,
            variable_type: VariableType::Factor,
        }
    }

    /// Metadata for a named factor variable.
    pub fn factor_named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            variable_type: VariableType::Factor,
        }
    }

    /// Set the variable name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Per-variable metadata plus a name-to-column mapping.
///
/// Names are unique: registering a second variable under an existing name is
/// an error, so a name lookup can never silently hit the wrong column. The
/// lookup table is maintained eagerly, letting shared references resolve
/// names during split selection.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    variables: Vec<VariableMeta>,
    name_index: HashMap<String, usize>,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema from per-variable metadata.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DuplicateVariable`] if two entries share a name.
    pub fn from_variables(variables: Vec<VariableMeta>) -> Result<Self, DataError> {
        let mut schema = Self::new();
        for meta in variables {
            schema.push(meta)?;
        }
        Ok(schema)
    }

    /// Schema of named numeric variables, in column order.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DuplicateVariable`] on a repeated name.
    pub fn from_names<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self, DataError> {
        let mut schema = Self::new();
        for name in names {
            schema.push(VariableMeta::numeric_named(name))?;
        }
        Ok(schema)
    }

    /// Schema of `n_variables` unnamed numeric variables.
    pub fn all_numeric(n_variables: usize) -> Self {
        Self {
            variables: vec![VariableMeta::numeric(); n_variables],
            name_index: HashMap::new(),
        }
    }

    /// Number of variables described.
    pub fn n_variables(&self) -> usize {
        self.variables.len()
    }

    /// Metadata for one variable, by column index.
    pub fn get(&self, index: usize) -> Option<&VariableMeta> {
        self.variables.get(index)
    }

    /// Type of the variable at `index`; out-of-range indices read as numeric.
    pub fn variable_type(&self, index: usize) -> VariableType {
        self.variables
            .get(index)
            .map(|m| m.variable_type)
            .unwrap_or(VariableType::Numeric)
    }

    /// `true` if the variable at `index` is a factor.
    #[inline]
    pub fn is_factor(&self, index: usize) -> bool {
        self.variable_type(index).is_factor()
    }

    /// `true` if any variable is a factor.
    pub fn has_factors(&self) -> bool {
        self.variables.iter().any(|m| m.variable_type.is_factor())
    }

    /// Column index of the variable named `name`, if any.
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// Name of the variable at `index`, if it has one.
    pub fn variable_name(&self, index: usize) -> Option<&str> {
        self.variables.get(index).and_then(|m| m.name.as_deref())
    }

    /// Reclassify the named variables as factors.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownVariable`] for a name the schema does not
    /// contain; no metadata is changed in that case.
    pub fn mark_factors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), DataError> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            match self.variable_index(name) {
                Some(index) => indices.push(index),
                None => return Err(DataError::UnknownVariable(name.to_string())),
            }
        }
        for index in indices {
            self.variables[index].variable_type = VariableType::Factor;
        }
        Ok(())
    }

    /// Iterator over variable metadata in column order.
    pub fn iter(&self) -> impl Iterator<Item = &VariableMeta> {
        self.variables.iter()
    }

    /// Iterator over `(column, metadata)` pairs.
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (usize, &VariableMeta)> {
        self.variables.iter().enumerate()
    }

    /// Append a variable.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DuplicateVariable`] if the name is already taken.
    pub fn push(&mut self, meta: VariableMeta) -> Result<(), DataError> {
        if let Some(name) = &meta.name {
            if self.name_index.contains_key(name) {
                return Err(DataError::DuplicateVariable(name.clone()));
            }
            self.name_index.insert(name.clone(), self.variables.len());
        }
        self.variables.push(meta);
        Ok(())
    }
}
