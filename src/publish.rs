//! Where the loaded properties end up.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::SqlPropsError;
use crate::mapping::PropertyMapping;
use crate::properties;

/// Host-side property set receiving the loaded mapping.
///
/// Every key of the mapping replaces an existing entry of the same name.
pub trait PropertyPublisher {
    /// # Errors
    /// Returns `SqlPropsError` if the property set cannot be updated.
    fn publish(&mut self, mapping: &PropertyMapping) -> Result<(), SqlPropsError>;
}

impl PropertyPublisher for IndexMap<String, Option<String>> {
    fn publish(&mut self, mapping: &PropertyMapping) -> Result<(), SqlPropsError> {
        for (key, value) in mapping.iter() {
            self.insert(key.to_string(), value.map(str::to_string));
        }
        Ok(())
    }
}

impl PropertyPublisher for PropertyMapping {
    fn publish(&mut self, mapping: &PropertyMapping) -> Result<(), SqlPropsError> {
        for (key, value) in mapping.iter() {
            self.insert(key, value.map(str::to_string));
        }
        Ok(())
    }
}

/// String-only property sets have no NULL; a NULL value is stored as "".
impl PropertyPublisher for HashMap<String, String> {
    fn publish(&mut self, mapping: &PropertyMapping) -> Result<(), SqlPropsError> {
        for (key, value) in mapping.iter() {
            self.insert(key.to_string(), value.unwrap_or_default().to_string());
        }
        Ok(())
    }
}

/// Merges into a `.properties` file on disk.
///
/// Existing keys keep their line position and new keys are appended.
/// Comments and untouched entries are written back as read. A missing file
/// is created, and NULL values are written as empty values.
#[derive(Debug, Clone)]
pub struct PropertiesFilePublisher {
    path: PathBuf,
}

impl PropertiesFilePublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PropertyPublisher for PropertiesFilePublisher {
    fn publish(&mut self, mapping: &PropertyMapping) -> Result<(), SqlPropsError> {
        let mut document = properties::read_file(&self.path)?;
        for (key, value) in mapping.iter() {
            document.set(key, value.unwrap_or_default());
        }
        properties::write_file(&self.path, &document)?;
        tracing::debug!(path = %self.path.display(), "properties file updated");
        Ok(())
    }
}

/// Writes the mapping in `.properties` format to any writer, e.g. stdout.
#[derive(Debug)]
pub struct WriterPublisher<W: Write> {
    writer: W,
}

impl<W: Write> WriterPublisher<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PropertyPublisher for WriterPublisher<W> {
    fn publish(&mut self, mapping: &PropertyMapping) -> Result<(), SqlPropsError> {
        let body = properties::render(mapping.iter().map(|(k, v)| (k, v.unwrap_or_default())));
        self.writer.write_all(body.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}
