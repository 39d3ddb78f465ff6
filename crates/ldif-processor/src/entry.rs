//! Directory entry representation: a distinguished name plus an ordered attribute table.

use serde::{Deserialize, Serialize};

use crate::dn::DistinguishedName;

/// Attribute holding the schema classes an entry conforms to.
pub const OBJECT_CLASS: &str = "objectClass";

const PERSON_CLASS: &str = "person";
const GROUP_CLASSES: &[&str] = &["groupOfNames", "groupOfUniqueNames"];
const ORGANIZATIONAL_UNIT_CLASS: &str = "organizationalUnit";

/// A named, ordered list of attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    values: Vec<String>,
}

impl Attribute {
    /// Attribute name in the casing first seen for it.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values in insertion order; duplicates are preserved.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns true if this attribute is named `name` (case-insensitive).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// An immutable LDIF entry.
///
/// Attribute names are looked up case-insensitively; the table preserves both the order in
/// which attributes were first seen and the order of values within each attribute.
/// Deserialization goes through [`EntryBuilder`], so differently-cased names are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryData")]
pub struct Entry {
    dn: DistinguishedName,
    attributes: Vec<Attribute>,
}

impl Entry {
    /// Creates a builder for an entry with the given distinguished name.
    #[must_use]
    pub fn builder(dn: DistinguishedName) -> EntryBuilder {
        EntryBuilder {
            dn,
            attributes: Vec::new(),
        }
    }

    /// Distinguished name of the entry.
    #[must_use]
    pub const fn dn(&self) -> &DistinguishedName {
        &self.dn
    }

    /// Attribute table in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns all values for the attribute.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&[String]> {
        self.attributes
            .iter()
            .find(|attribute| attribute.is_named(name))
            .map(Attribute::values)
    }

    /// Returns true if the entry carries the attribute.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Returns the first value of the attribute if present.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get_attribute(name)
            .and_then(|values| values.first().map(String::as_str))
    }

    /// Values of the `objectClass` attribute (empty when absent).
    #[must_use]
    pub fn object_classes(&self) -> &[String] {
        self.get_attribute(OBJECT_CLASS).unwrap_or_default()
    }

    /// Returns true if the entry lists `class_name` as an object class (case-insensitive).
    #[must_use]
    pub fn has_object_class(&self, class_name: &str) -> bool {
        self.object_classes()
            .iter()
            .any(|class| class.eq_ignore_ascii_case(class_name))
    }

    /// Returns true for entries carrying the `person` object class.
    ///
    /// No schema subclass resolution is performed: an `inetOrgPerson` entry only matches if its
    /// data also lists `person`.
    #[must_use]
    pub fn is_person(&self) -> bool {
        self.has_object_class(PERSON_CLASS)
    }

    /// Returns true for `groupOfNames` and `groupOfUniqueNames` entries.
    #[must_use]
    pub fn is_group(&self) -> bool {
        GROUP_CLASSES.iter().any(|class| self.has_object_class(class))
    }

    /// Returns true for `organizationalUnit` entries.
    #[must_use]
    pub fn is_organizational_unit(&self) -> bool {
        self.has_object_class(ORGANIZATIONAL_UNIT_CLASS)
    }

    /// Total number of values across all attributes.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.attributes.iter().map(|a| a.values.len()).sum()
    }
}

#[derive(Deserialize)]
struct EntryData {
    dn: DistinguishedName,
    #[serde(default)]
    attributes: Vec<Attribute>,
}

impl From<EntryData> for Entry {
    fn from(data: EntryData) -> Self {
        let mut builder = Entry::builder(data.dn);
        for attribute in data.attributes {
            for value in attribute.values {
                builder.push_value(attribute.name.clone(), value);
            }
        }
        builder.build()
    }
}

/// Builder for [`Entry`].
#[derive(Debug)]
pub struct EntryBuilder {
    dn: DistinguishedName,
    attributes: Vec<Attribute>,
}

impl EntryBuilder {
    /// Appends a value, merging with an existing attribute of the same name (case-insensitive).
    #[must_use]
    pub fn add_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_value(name.into(), value.into());
        self
    }

    /// Appends several values for one attribute.
    #[must_use]
    pub fn add_values<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        for value in values {
            self.push_value(name.clone(), value.into());
        }
        self
    }

    pub(crate) fn push_value(&mut self, name: String, value: String) {
        match self.attributes.iter_mut().find(|a| a.is_named(&name)) {
            Some(attribute) => attribute.values.push(value),
            None => self.attributes.push(Attribute {
                name,
                values: vec![value],
            }),
        }
    }

    /// Builds the [`Entry`].
    #[must_use]
    pub fn build(self) -> Entry {
        Entry {
            dn: self.dn,
            attributes: self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_person() -> Entry {
        let dn = DistinguishedName::parse("cn=John Smith,ou=people,dc=example,dc=com").unwrap();
        Entry::builder(dn)
            .add_values("objectClass", ["top", "person", "inetOrgPerson"])
            .add_value("cn", "John Smith")
            .add_value("mail", "john@example.com")
            .add_value("MAIL", "jsmith@example.com")
            .add_value("employeeNumber", "EMP001")
            .build()
    }

    #[test]
    fn builder_merges_attribute_names_case_insensitively() {
        let entry = sample_person();
        assert_eq!(entry.attributes().len(), 4);
        assert_eq!(
            entry.get_attribute("Mail"),
            Some(&["john@example.com".to_string(), "jsmith@example.com".to_string()][..])
        );
        assert_eq!(entry.attributes()[2].name(), "mail");
        assert_eq!(entry.value_count(), 7);
    }

    #[test]
    fn typed_accessors() {
        let entry = sample_person();
        assert!(entry.has_attribute("employeenumber"));
        assert!(!entry.has_attribute("telephoneNumber"));
        assert_eq!(entry.first("employeeNumber"), Some("EMP001"));
        assert_eq!(entry.first("sn"), None);
        assert_eq!(entry.dn().depth(), 4);
    }

    #[test]
    fn duplicates_are_preserved() {
        let dn = DistinguishedName::parse("cn=dup,dc=example").unwrap();
        let entry = Entry::builder(dn)
            .add_value("description", "same")
            .add_value("description", "same")
            .build();
        assert_eq!(entry.get_attribute("description").unwrap().len(), 2);
    }

    #[test]
    fn classification_helpers() {
        let person = sample_person();
        assert!(person.is_person());
        assert!(person.has_object_class("INETORGPERSON"));
        assert!(!person.is_group());
        assert!(!person.is_organizational_unit());

        let group = Entry::builder(DistinguishedName::parse("cn=devs,dc=example").unwrap())
            .add_values("objectClass", ["top", "groupOfUniqueNames"])
            .build();
        assert!(group.is_group());

        let ou = Entry::builder(DistinguishedName::parse("ou=people,dc=example").unwrap())
            .add_value("objectclass", "organizationalUnit")
            .build();
        assert!(ou.is_organizational_unit());
        assert_eq!(ou.object_classes().len(), 1);
    }

    #[test]
    fn deserialize_merges_attribute_names_case_insensitively() {
        let json = r#"{
            "dn": "cn=John,dc=example",
            "attributes": [
                {"name": "mail", "values": ["a@example.com"]},
                {"name": "cn", "values": ["John"]},
                {"name": "MAIL", "values": ["b@example.com"]}
            ]
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.attributes().len(), 2);
        assert_eq!(entry.attributes()[0].name(), "mail");
        assert_eq!(
            entry.get_attribute("Mail").unwrap(),
            ["a@example.com", "b@example.com"]
        );

        let back: Entry = serde_json::from_str(&serde_json::to_string(&entry).unwrap()).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn entry_without_attributes() {
        let entry = Entry::builder(DistinguishedName::parse("dc=example").unwrap()).build();
        assert!(entry.attributes().is_empty());
        assert!(entry.object_classes().is_empty());
        assert!(!entry.is_person());
    }
}
