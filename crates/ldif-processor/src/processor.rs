//! Pipeline facade binding one configuration to a file store.

use std::borrow::Borrow;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::dn::DistinguishedName;
use crate::entry::Entry;
use crate::store::{FsStore, TextStore};
use crate::validator::ValidationReport;
use crate::writer::LdifWriter;
use crate::{filter, parser, sort, validator, Result};
use ldif_core::LdifConfig;

/// LDIF pipeline bound to one configuration and one file store.
///
/// The processor is immutable after construction and may be shared between threads.
pub struct LdifProcessor {
    config: Arc<LdifConfig>,
    store: Box<dyn TextStore + Send + Sync>,
}

impl LdifProcessor {
    /// Creates a processor that reads and writes the local filesystem.
    #[must_use]
    pub fn new(config: LdifConfig) -> Self {
        let store = FsStore::new().with_create_dirs(config.create_output_dir);
        Self::with_store(config, Box::new(store))
    }

    /// Creates a processor over a custom file store.
    #[must_use]
    pub fn with_store(config: LdifConfig, store: Box<dyn TextStore + Send + Sync>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &LdifConfig {
        &self.config
    }

    /// Parses LDIF text and enforces the `max_entries` ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`ldif_core::Error::Parse`] for malformed input and
    /// [`ldif_core::Error::Validation`] when more than `max_entries` entries are present.
    pub fn parse(&self, text: &str) -> Result<Vec<Entry>> {
        let entries = parser::parse(text)?;
        validator::check_entry_limit(entries.len(), &self.config)?;
        Ok(entries)
    }

    /// Validates entries against the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ldif_core::Error::Validation`] aggregating every violation.
    pub fn validate<E: Borrow<Entry>>(&self, entries: &[E]) -> Result<()> {
        validator::validate(entries, &self.config)
    }

    /// Validates one entry against the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ldif_core::Error::Validation`] aggregating every violation.
    pub fn validate_entry(&self, entry: &Entry) -> Result<()> {
        validator::validate_entry(entry, &self.config)
    }

    /// Collects errors and warnings without failing.
    #[must_use]
    pub fn inspect<E: Borrow<Entry>>(&self, entries: &[E]) -> ValidationReport {
        validator::inspect(entries, &self.config)
    }

    /// See [`filter::filter_by_object_class`].
    #[must_use]
    pub fn filter_by_object_class<'a, E: Borrow<Entry>>(
        &self,
        entries: &'a [E],
        object_class: &str,
    ) -> Vec<&'a Entry> {
        filter::filter_by_object_class(entries, object_class)
    }

    /// See [`filter::filter_persons`].
    #[must_use]
    pub fn filter_persons<'a, E: Borrow<Entry>>(&self, entries: &'a [E]) -> Vec<&'a Entry> {
        filter::filter_persons(entries)
    }

    /// See [`filter::filter_groups`].
    #[must_use]
    pub fn filter_groups<'a, E: Borrow<Entry>>(&self, entries: &'a [E]) -> Vec<&'a Entry> {
        filter::filter_groups(entries)
    }

    /// See [`filter::filter_organizational_units`].
    #[must_use]
    pub fn filter_organizational_units<'a, E: Borrow<Entry>>(
        &self,
        entries: &'a [E],
    ) -> Vec<&'a Entry> {
        filter::filter_organizational_units(entries)
    }

    /// See [`filter::filter_by_attribute`].
    #[must_use]
    pub fn filter_by_attribute<'a, E: Borrow<Entry>>(
        &self,
        entries: &'a [E],
        attribute: &str,
        value: &str,
    ) -> Vec<&'a Entry> {
        filter::filter_by_attribute(entries, attribute, value)
    }

    /// See [`filter::find_entry_by_dn`].
    #[must_use]
    pub fn find_entry_by_dn<'a, E: Borrow<Entry>>(
        &self,
        entries: &'a [E],
        dn: &DistinguishedName,
    ) -> Option<&'a Entry> {
        filter::find_entry_by_dn(entries, dn)
    }

    /// See [`filter::find_entry_by_dn_str`].
    ///
    /// # Errors
    ///
    /// Returns [`ldif_core::Error::InvalidDn`] if `dn` does not parse.
    pub fn find_entry_by_dn_str<'a, E: Borrow<Entry>>(
        &self,
        entries: &'a [E],
        dn: &str,
    ) -> Result<Option<&'a Entry>> {
        filter::find_entry_by_dn_str(entries, dn)
    }

    /// See [`sort::sort_hierarchically`].
    ///
    /// # Errors
    ///
    /// Currently infallible.
    pub fn sort_hierarchically<'a, E: Borrow<Entry>>(
        &self,
        entries: &'a [E],
    ) -> Result<Vec<&'a Entry>> {
        sort::sort_hierarchically(entries)
    }

    /// Serializes entries, folding lines when `line_width` is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ldif_core::Error::InternalError`] if formatting fails.
    pub fn write<E: Borrow<Entry>>(&self, entries: &[E]) -> Result<String> {
        LdifWriter::from_config(&self.config).write(entries)
    }

    /// Reads and parses an LDIF file.
    ///
    /// # Errors
    ///
    /// Returns [`ldif_core::Error::NotFound`] for a missing file, [`ldif_core::Error::Io`] for
    /// other read failures, and the errors of [`LdifProcessor::parse`].
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<Entry>> {
        let path = path.as_ref();
        let text = self.store.read_text(path)?;
        let entries = self.parse(&text)?;
        info!(path = %path.display(), entries = entries.len(), "parsed LDIF file");
        Ok(entries)
    }

    /// Serializes entries and writes them to a file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`ldif_core::Error::NotFound`] when the parent directory is missing and
    /// `create_output_dir` is off, and [`ldif_core::Error::Io`] for other write failures.
    pub fn write_file<E: Borrow<Entry>>(&self, path: impl AsRef<Path>, entries: &[E]) -> Result<()> {
        let path = path.as_ref();
        let text = self.write(entries)?;
        self.store.write_text(path, &text)?;
        info!(path = %path.display(), entries = entries.len(), "wrote LDIF file");
        Ok(())
    }
}

impl Default for LdifProcessor {
    fn default() -> Self {
        Self::new(LdifConfig::default())
    }
}

impl std::fmt::Debug for LdifProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdifProcessor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
