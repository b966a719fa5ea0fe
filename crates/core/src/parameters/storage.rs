//! Parameter storage
//!
//! Parameters are named values (at most [`PARAM_NAME_LEN`] bytes) with
//! flags. A parameter must be registered with its default before it can be
//! set, and keeps the type of that default. Numeric overrides coming from
//! outside (a scenario file, a ground station) go through
//! [`ParameterStore::set_numeric`], which converts to the registered type.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters (power of two, required by the index map)
pub const MAX_PARAMS: usize = 32;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Parameter is not listed by `names`
        const HIDDEN = 0b00000001;
        /// Parameter cannot be changed after registration
        const READ_ONLY = 0b00000010;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl ParamValue {
    /// Whether `other` has the same variant
    pub fn same_type(&self, other: &ParamValue) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// Numeric view of the value; booleans map to 0.0 / 1.0
    pub fn as_f32(&self) -> f32 {
        match self {
            ParamValue::Bool(b) => f32::from(u8::from(*b)),
            ParamValue::Int(v) => *v as f32,
            ParamValue::Float(v) => *v,
        }
    }

    /// `value` converted to the variant of `self`
    ///
    /// Non-finite numbers are rejected for every type. Integers only
    /// accept whole numbers within `i32`; booleans are true when non-zero.
    fn coerce(&self, value: f64) -> Option<ParamValue> {
        if !value.is_finite() {
            return None;
        }
        match self {
            ParamValue::Bool(_) => Some(ParamValue::Bool(value != 0.0)),
            ParamValue::Int(_) => {
                let whole = libm::trunc(value) == value
                    && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value);
                whole.then(|| ParamValue::Int(value as i32))
            }
            ParamValue::Float(_) => Some(ParamValue::Float(value as f32)),
        }
    }
}

/// Parameter metadata
#[derive(Debug, Clone, Copy)]
pub struct ParamMetadata {
    pub flags: ParamFlags,
    /// Value given at registration
    pub default: ParamValue,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: ParamValue,
    meta: ParamMetadata,
}

fn key(name: &str) -> Option<String<PARAM_NAME_LEN>> {
    let mut key = String::new();
    key.push_str(name).ok()?;
    Some(key)
}

/// Fixed-capacity parameter store
pub struct ParameterStore {
    entries: FnvIndexMap<String<PARAM_NAME_LEN>, Entry, MAX_PARAMS>,
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
        }
    }

    /// Register a parameter with its default value and flags
    ///
    /// Registering a name twice keeps the first registration and its
    /// current value.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the name is longer than [`PARAM_NAME_LEN`]
    /// - `StoreFull` if [`MAX_PARAMS`] parameters are already registered
    pub fn register(
        &mut self,
        name: &str,
        default: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = key(name).ok_or(ParameterError::InvalidConfig)?;
        if self.entries.contains_key(&key) {
            return Ok(());
        }

        let entry = Entry {
            value: default,
            meta: ParamMetadata { flags, default },
        };
        self.entries
            .insert(key, entry)
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }

    /// Current value of a parameter
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.get(&key(name)?).map(|entry| &entry.value)
    }

    /// Numeric value; `None` if missing or not finite
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        let value = self.get(name)?.as_f32();
        value.is_finite().then_some(value)
    }

    /// Non-negative integral value; `None` if missing or negative
    pub fn get_u32(&self, name: &str) -> Option<u32> {
        match *self.get(name)? {
            ParamValue::Int(v) => u32::try_from(v).ok(),
            ParamValue::Float(v) if v.is_finite() && v >= 0.0 => Some(v as u32),
            _ => None,
        }
    }

    /// Set a parameter, keeping its registered type
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the parameter was never registered
    /// - `ReadOnly` if it carries [`ParamFlags::READ_ONLY`]
    /// - `TypeMismatch` if `value` differs in type from the registered value
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let entry = key(name)
            .and_then(|key| self.entries.get_mut(&key))
            .ok_or(ParameterError::InvalidConfig)?;
        if entry.meta.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }
        if !entry.value.same_type(&value) {
            return Err(ParameterError::TypeMismatch);
        }
        entry.value = value;
        Ok(())
    }

    /// Set a parameter from a plain number, converting to its registered type
    ///
    /// # Errors
    ///
    /// As [`set`](Self::set); `TypeMismatch` also when the number does not
    /// fit the type (a fraction for an integer parameter, or any non-finite
    /// number).
    pub fn set_numeric(&mut self, name: &str, value: f64) -> Result<(), ParameterError> {
        let current = self.get(name).ok_or(ParameterError::InvalidConfig)?;
        let typed = current.coerce(value).ok_or(ParameterError::TypeMismatch)?;
        self.set(name, typed)
    }

    /// Restore a parameter to its registered default
    pub fn reset(&mut self, name: &str) -> Result<(), ParameterError> {
        let default = self
            .metadata(name)
            .ok_or(ParameterError::InvalidConfig)?
            .default;
        self.set(name, default)
    }

    /// Metadata of a parameter
    pub fn metadata(&self, name: &str) -> Option<&ParamMetadata> {
        self.entries.get(&key(name)?).map(|entry| &entry.meta)
    }

    /// Names of all non-hidden parameters, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.meta.flags.contains(ParamFlags::HIDDEN))
            .map(|(name, _)| name.as_str())
    }

    /// Number of non-hidden parameters
    pub fn count(&self) -> usize {
        self.names().count()
    }

    /// Number of parameters, hidden ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
