//! LDIF (RFC 2849) processing: parse directory exports into typed entries, validate them against
//! configurable limits, select and order them, and write them back out.
//!
//! The stages are plain functions over entry slices and can be chained freely; [`LdifProcessor`]
//! binds them to one [`LdifConfig`] and adds file input and output.
//!
//! ```
//! use ldif_processor::{LdifConfig, LdifProcessor};
//!
//! let processor = LdifProcessor::new(LdifConfig::default());
//! let entries = processor
//!     .parse("dn: cn=John,dc=example,dc=com\nobjectClass: person\ncn: John\n")
//!     .unwrap();
//! processor.validate(&entries).unwrap();
//! assert_eq!(processor.filter_persons(&entries).len(), 1);
//! ```

#![deny(missing_docs)]

mod dn;
mod entry;
pub mod filter;
pub mod parser;
mod processor;
pub mod sort;
pub mod store;
pub mod validator;
pub mod writer;

pub use dn::{DistinguishedName, DistinguishedNameError, RelativeDistinguishedName};
pub use entry::{Attribute, Entry, EntryBuilder, OBJECT_CLASS};
pub use filter::{
    filter_by_attribute, filter_by_object_class, filter_groups, filter_organizational_units,
    filter_persons, find_entry_by_dn, find_entry_by_dn_str,
};
pub use ldif_core::{Error, LdifConfig};
pub use parser::parse;
pub use processor::LdifProcessor;
pub use sort::sort_hierarchically;
pub use store::{FsStore, TextStore};
pub use validator::{validate, validate_entry, ValidationIssue, ValidationReport};
pub use writer::{write, LdifWriter};

/// Convenient result alias that reuses the core error type.
pub type Result<T> = ldif_core::Result<T>;
