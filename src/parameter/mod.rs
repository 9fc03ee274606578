//! Grouped scalar parameters
//!
//! Some priors and operators (a Dirichlet prior on relative rates, a
//! delta-exchange move) want to see several scalar parameters as one
//! vector. [`GroupedParameter`] composes an ordered list of
//! [`RealParameter`] handles behind forwarding accessors. Dimensionality is
//! fixed at construction; the type deliberately offers no resize
//! operation.

use std::fmt;

use thiserror::Error;

/// Errors from scalar or grouped parameter operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A group needs at least one member
    #[error("a grouped parameter needs at least one member")]
    EmptyGroup,

    /// Index beyond the group's fixed dimension
    #[error("index {index} out of range for dimension {dimension}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Fixed dimension of the group
        dimension: usize,
    },

    /// Value violates the configured bounds
    #[error("value {value} outside bounds [{lower}, {upper}]")]
    ValueOutOfBounds {
        /// Offending value
        value: f64,
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// Persisted state line could not be parsed
    #[error("malformed parameter state line: {0}")]
    MalformedStateLine(String),
}

/// A bounded scalar parameter handle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealParameter {
    value: f64,
    lower: f64,
    upper: f64,
}

impl RealParameter {
    /// Unbounded scalar with the given value.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    /// Bounded scalar; the value must already respect the bounds.
    pub fn with_bounds(value: f64, lower: f64, upper: f64) -> Result<Self, ParameterError> {
        if value < lower || value > upper {
            return Err(ParameterError::ValueOutOfBounds {
                value,
                lower,
                upper,
            });
        }
        Ok(Self {
            value,
            lower,
            upper,
        })
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the value, enforcing the bounds.
    pub fn set_value(&mut self, value: f64) -> Result<(), ParameterError> {
        if value < self.lower || value > self.upper {
            return Err(ParameterError::ValueOutOfBounds {
                value,
                lower: self.lower,
                upper: self.upper,
            });
        }
        self.value = value;
        Ok(())
    }

    /// Lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }
}

/// An ordered, fixed-dimension group of scalar parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupedParameter {
    id: String,
    parameters: Vec<RealParameter>,
    lower: f64,
    upper: f64,
}

impl GroupedParameter {
    /// Group the given scalars under an identifier.
    ///
    /// The group's bounds start from the first member's bounds (matching
    /// the host convention of inheriting unset bounds).
    pub fn new(
        id: impl Into<String>,
        parameters: Vec<RealParameter>,
    ) -> Result<Self, ParameterError> {
        let first = parameters.first().ok_or(ParameterError::EmptyGroup)?;
        let (lower, upper) = (first.lower, first.upper);
        Ok(Self {
            id: id.into(),
            parameters,
            lower,
            upper,
        })
    }

    /// Group identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fixed dimension of the group.
    pub fn dimension(&self) -> usize {
        self.parameters.len()
    }

    /// Value of member `index`.
    pub fn value(&self, index: usize) -> Result<f64, ParameterError> {
        self.parameters
            .get(index)
            .map(RealParameter::value)
            .ok_or(ParameterError::IndexOutOfRange {
                index,
                dimension: self.parameters.len(),
            })
    }

    /// Replace the value of member `index`.
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<(), ParameterError> {
        let dimension = self.parameters.len();
        self.parameters
            .get_mut(index)
            .ok_or(ParameterError::IndexOutOfRange { index, dimension })?
            .set_value(value)
    }

    /// All member values in order.
    pub fn values(&self) -> Vec<f64> {
        self.parameters.iter().map(RealParameter::value).collect()
    }

    /// Group bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    /// Set the bounds on the group and propagate them to every member.
    pub fn set_bounds(&mut self, lower: f64, upper: f64) -> Result<(), ParameterError> {
        for parameter in &self.parameters {
            let value = parameter.value;
            if value < lower || value > upper {
                return Err(ParameterError::ValueOutOfBounds {
                    value,
                    lower,
                    upper,
                });
            }
        }
        self.lower = lower;
        self.upper = upper;
        for parameter in &mut self.parameters {
            parameter.lower = lower;
            parameter.upper = upper;
        }
        Ok(())
    }

    /// Swap two member values.
    pub fn swap(&mut self, left: usize, right: usize) -> Result<(), ParameterError> {
        let dimension = self.parameters.len();
        if left >= dimension {
            return Err(ParameterError::IndexOutOfRange {
                index: left,
                dimension,
            });
        }
        if right >= dimension {
            return Err(ParameterError::IndexOutOfRange {
                index: right,
                dimension,
            });
        }
        self.parameters.swap(left, right);
        Ok(())
    }

    /// Multiply every member by `factor`.
    ///
    /// Fails (leaving the group untouched) if any scaled value would leave
    /// the group bounds. Returns the number of scaled dimensions.
    pub fn scale(&mut self, factor: f64) -> Result<usize, ParameterError> {
        for parameter in &self.parameters {
            let scaled = parameter.value * factor;
            if scaled < self.lower || scaled > self.upper {
                return Err(ParameterError::ValueOutOfBounds {
                    value: scaled,
                    lower: self.lower,
                    upper: self.upper,
                });
            }
        }
        for parameter in &mut self.parameters {
            parameter.value *= factor;
        }
        Ok(self.parameters.len())
    }

    /// Render the persisted-state line: `id[dim] (lower,upper): v v ...`.
    pub fn to_state_line(&self) -> String {
        format!("{}", self)
    }

    /// Rebuild a group from a persisted-state line.
    pub fn from_state_line(line: &str) -> Result<Self, ParameterError> {
        let malformed = || ParameterError::MalformedStateLine(line.to_string());

        let (id, rest) = line.split_once('[').ok_or_else(malformed)?;
        let (dim_str, rest) = rest.split_once(']').ok_or_else(malformed)?;
        let dimension: usize = dim_str.trim().parse().map_err(|_| malformed())?;

        let rest = rest.trim_start();
        let rest = rest.strip_prefix('(').ok_or_else(malformed)?;
        let (lower_str, rest) = rest.split_once(',').ok_or_else(malformed)?;
        let (upper_str, rest) = rest.split_once(')').ok_or_else(malformed)?;
        let lower: f64 = lower_str.trim().parse().map_err(|_| malformed())?;
        let upper: f64 = upper_str.trim().parse().map_err(|_| malformed())?;

        let rest = rest.trim_start().strip_prefix(':').ok_or_else(malformed)?;
        let mut parameters = Vec::with_capacity(dimension);
        for token in rest.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| malformed())?;
            parameters.push(RealParameter::with_bounds(value, lower, upper)?);
        }
        if parameters.len() != dimension {
            return Err(malformed());
        }

        Self::new(id.trim().to_string(), parameters)
    }
}

impl fmt::Display for GroupedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] ({},{}):",
            self.id,
            self.parameters.len(),
            self.lower,
            self.upper
        )?;
        for parameter in &self.parameters {
            write!(f, " {}", parameter.value)?;
        }
        Ok(())
    }
}
