//! Structural and limit validation for parsed entries.
//!
//! Validation is a read-only pass. Every violation is collected and reported together, except
//! the `max_entries` ceiling, which is a whole-collection property and short-circuits.

use serde::Serialize;
use std::borrow::Borrow;
use thiserror::Error;
use tracing::{debug, warn};

use crate::dn::DistinguishedName;
use crate::entry::Entry;
use crate::writer::LdifWriter;
use crate::Result;
use ldif_core::{Error, LdifConfig};

/// A single rule or limit violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The collection holds more entries than `max_entries` allows.
    #[error("entry count {count} exceeds max_entries {max}")]
    TooManyEntries {
        /// Number of entries supplied.
        count: usize,
        /// Configured ceiling.
        max: usize,
    },
    /// The entry DN no longer parses back to itself.
    #[error("entry `{dn}` has a malformed DN: {reason}")]
    MalformedDn {
        /// DN as rendered.
        dn: String,
        /// Why the canonical form does not re-parse to the same DN.
        reason: String,
    },
    /// The entry has no `objectClass` value.
    #[error("entry `{dn}` has no objectClass value")]
    MissingObjectClass {
        /// Offending entry.
        dn: String,
    },
    /// The serialized entry exceeds `max_entry_size`.
    #[error("entry `{dn}` is {size} bytes, exceeding max_entry_size {max}")]
    EntryTooLarge {
        /// Offending entry.
        dn: String,
        /// Serialized size in bytes.
        size: usize,
        /// Configured ceiling.
        max: usize,
    },
    /// An attribute description is not a keystring or numeric OID with options.
    #[error("entry `{dn}` has invalid attribute name `{attribute}`")]
    InvalidAttributeName {
        /// Offending entry.
        dn: String,
        /// Attribute name as written.
        attribute: String,
    },
}

/// Outcome of a validation pass: fatal errors plus advisory warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Violations that make the input invalid.
    #[must_use]
    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    /// Violations tolerated in permissive mode.
    #[must_use]
    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }

    /// Returns true when there are no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts the report into a result, aggregating every error into one failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every error in report order.
    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(Error::Validation {
            issues: self.errors.iter().map(ToString::to_string).collect(),
        })
    }

    fn structural(&mut self, issue: ValidationIssue, strict: bool) {
        if strict {
            self.errors.push(issue);
        } else {
            self.warnings.push(issue);
        }
    }
}

/// Runs every check and returns the collected report without failing.
#[must_use]
pub fn inspect<E: Borrow<Entry>>(entries: &[E], config: &LdifConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if entries.len() > config.max_entries {
        report.errors.push(ValidationIssue::TooManyEntries {
            count: entries.len(),
            max: config.max_entries,
        });
        return report;
    }

    let writer = LdifWriter::from_config(config);
    for entry in entries {
        check_entry(entry.borrow(), config, &writer, &mut report);
    }
    report
}

/// Validates a collection of entries against the configuration.
///
/// In permissive mode structural problems are logged as warnings and do not fail the call.
///
/// # Errors
///
/// Returns [`Error::Validation`] aggregating every violation found.
pub fn validate<E: Borrow<Entry>>(entries: &[E], config: &LdifConfig) -> Result<()> {
    let report = inspect(entries, config);
    for issue in report.warnings() {
        warn!(%issue, "LDIF validation warning");
    }
    debug!(
        entries = entries.len(),
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        "validated LDIF entries"
    );
    report.into_result()
}

/// Validates a single entry; the `max_entries` ceiling does not apply.
///
/// # Errors
///
/// Returns [`Error::Validation`] aggregating every violation found.
pub fn validate_entry(entry: &Entry, config: &LdifConfig) -> Result<()> {
    let mut report = ValidationReport::default();
    check_entry(entry, config, &LdifWriter::from_config(config), &mut report);
    for issue in report.warnings() {
        warn!(%issue, "LDIF validation warning");
    }
    report.into_result()
}

/// Enforces the `max_entries` ceiling on its own.
///
/// # Errors
///
/// Returns [`Error::Validation`] if `count` exceeds the configured ceiling.
pub fn check_entry_limit(count: usize, config: &LdifConfig) -> Result<()> {
    if count > config.max_entries {
        return Err(Error::validation(
            ValidationIssue::TooManyEntries {
                count,
                max: config.max_entries,
            }
            .to_string(),
        ));
    }
    Ok(())
}

fn check_entry(
    entry: &Entry,
    config: &LdifConfig,
    writer: &LdifWriter,
    report: &mut ValidationReport,
) {
    let dn = entry.dn().as_str();
    let strict = config.strict_validation;

    if let Some(reason) = canonical_dn_mismatch(entry.dn()) {
        report.errors.push(ValidationIssue::MalformedDn {
            dn: dn.to_string(),
            reason,
        });
    }

    if entry.object_classes().is_empty() {
        report.structural(
            ValidationIssue::MissingObjectClass { dn: dn.to_string() },
            strict,
        );
    }

    for attribute in entry.attributes() {
        if !is_valid_attribute_description(attribute.name()) {
            report.structural(
                ValidationIssue::InvalidAttributeName {
                    dn: dn.to_string(),
                    attribute: attribute.name().to_string(),
                },
                strict,
            );
        }
    }

    let size = writer.entry_size(entry);
    if size > config.max_entry_size {
        report.errors.push(ValidationIssue::EntryTooLarge {
            dn: dn.to_string(),
            size,
            max: config.max_entry_size,
        });
    }
}

/// Re-parses the canonical form; it must yield the same DN and the same string.
fn canonical_dn_mismatch(dn: &DistinguishedName) -> Option<String> {
    match DistinguishedName::parse(dn.as_str()) {
        Err(err) => Some(err.to_string()),
        Ok(reparsed) if reparsed != *dn || reparsed.as_str() != dn.as_str() => Some(format!(
            "canonical form re-parses as `{}`",
            reparsed.as_str()
        )),
        Ok(_) => None,
    }
}

/// Checks `descr *(";" option)` where `descr` is a keystring or numeric OID.
fn is_valid_attribute_description(name: &str) -> bool {
    let mut parts = name.split(';');
    let base = parts.next().unwrap_or_default();

    let base_ok = is_keystring(base) || is_numeric_oid(base);
    base_ok
        && parts.all(|option| {
            !option.is_empty() && option.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

fn is_keystring(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_numeric_oid(value: &str) -> bool {
    !value.is_empty()
        && value
            .split('.')
            .all(|arc| !arc.is_empty() && arc.chars().all(|c| c.is_ascii_digit()))
}
