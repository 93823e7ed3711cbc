//! Stream options and hydration strategies.

use crate::casing::{camelize_rewrite, LabelRewrite};
use crate::error::{Error, Result};
use crate::row::{Row, RowTarget};
use serde::{Deserialize, Serialize};
use sql_types::TemporalMode;
use std::fmt;
use std::sync::Arc;

/// How INTEGER columns detect SQL NULL.
///
/// The primitive integer accessor of many drivers reads NULL as `0`, so the
/// untyped object accessor is probed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntNullProbe {
    /// A null probe means SQL NULL and yields null; otherwise the typed
    /// accessor is read.
    #[default]
    SqlNull,
    /// A non-null probe yields null regardless of the typed accessor; a null
    /// probe reads the typed accessor. For drivers whose object accessor
    /// returns a non-null marker for NULL integers.
    NonNullIsNull,
}

/// Serializable knobs controlling how rows are produced.
///
/// # YAML Format
///
/// ```yaml
/// camelize: true
/// int_null_probe: sql_null
/// temporal: epoch_millis
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamOptions {
    /// Rewrite labels to lower camel case
    pub camelize: bool,
    /// INTEGER null detection policy
    pub int_null_probe: IntNullProbe,
    /// DATE/TIME/TIMESTAMP output form
    pub temporal: TemporalMode,
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("invalid stream options YAML: {e}")))
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| Error::config(format!("invalid stream options TOML: {e}")))
    }
}

/// Zero-argument constructor of an empty row container.
pub type RowFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Caller-chosen way to produce and fill each row.
///
/// A hydration has exactly one factory: the generic [`Row`]
/// ([`Hydration::record`]), a `Default` type ([`Hydration::of`]) or an
/// arbitrary closure ([`Hydration::with_factory`]).
pub struct Hydration<T> {
    factory: RowFactory<T>,
    options: StreamOptions,
    rewrite: Option<LabelRewrite>,
}

impl Hydration<Row> {
    /// Hydrate into generic [`Row`] records.
    pub fn record() -> Self {
        Self::with_factory(Row::new)
    }
}

impl Default for Hydration<Row> {
    fn default() -> Self {
        Self::record()
    }
}

impl<T: RowTarget + Default + 'static> Hydration<T> {
    /// Hydrate into `T::default()` instances.
    pub fn of() -> Self {
        Self::with_factory(T::default)
    }
}

impl<T: RowTarget> Hydration<T> {
    /// Hydrate into containers produced by `factory`.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            options: StreamOptions::default(),
            rewrite: None,
        }
    }

    pub fn camelize(mut self, camelize: bool) -> Self {
        self.options.camelize = camelize;
        self
    }

    /// Use a custom label rewrite instead of camel casing. Implies
    /// `camelize(true)`.
    pub fn label_rewrite<F>(mut self, rewrite: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.options.camelize = true;
        self.rewrite = Some(Arc::new(rewrite));
        self
    }

    pub fn int_null_probe(mut self, probe: IntNullProbe) -> Self {
        self.options.int_null_probe = probe;
        self
    }

    pub fn temporal(mut self, mode: TemporalMode) -> Self {
        self.options.temporal = mode;
        self
    }

    /// Replace every option set so far, e.g. with options loaded from YAML.
    ///
    /// Earlier `camelize`, `int_null_probe` and `temporal` calls are
    /// discarded, so call this first and adjust afterwards. A custom
    /// [`Hydration::label_rewrite`] is kept but only applies while
    /// `camelize` is on.
    pub fn options(mut self, options: StreamOptions) -> Self {
        self.options = options;
        self
    }

    pub fn stream_options(&self) -> &StreamOptions {
        &self.options
    }

    /// The label rewrite in effect, if labels are rewritten at all.
    pub fn effective_rewrite(&self) -> Option<LabelRewrite> {
        if !self.options.camelize {
            return None;
        }
        Some(self.rewrite.clone().unwrap_or_else(camelize_rewrite))
    }

    /// A fresh, empty container.
    pub fn build(&self) -> T {
        (self.factory)()
    }
}

impl<T> Clone for Hydration<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            options: self.options,
            rewrite: self.rewrite.clone(),
        }
    }
}

impl<T> fmt::Debug for Hydration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hydration")
            .field("target", &std::any::type_name::<T>())
            .field("options", &self.options)
            .field("custom_rewrite", &self.rewrite.is_some())
            .finish()
    }
}
