//! Selection over entry collections.
//!
//! Every filter preserves input order and borrows from its input. Object class and attribute
//! names match case-insensitively, as LDAP schema names do.

use std::borrow::Borrow;

use crate::dn::DistinguishedName;
use crate::entry::Entry;
use crate::Result;

/// Entries whose `objectClass` values include `object_class`.
#[must_use]
pub fn filter_by_object_class<'a, E: Borrow<Entry>>(
    entries: &'a [E],
    object_class: &str,
) -> Vec<&'a Entry> {
    select(entries, |entry| entry.has_object_class(object_class))
}

/// Entries carrying the `person` object class.
#[must_use]
pub fn filter_persons<E: Borrow<Entry>>(entries: &[E]) -> Vec<&Entry> {
    select(entries, Entry::is_person)
}

/// Entries carrying `groupOfNames` or `groupOfUniqueNames`.
#[must_use]
pub fn filter_groups<E: Borrow<Entry>>(entries: &[E]) -> Vec<&Entry> {
    select(entries, Entry::is_group)
}

/// Entries carrying `organizationalUnit`.
#[must_use]
pub fn filter_organizational_units<E: Borrow<Entry>>(entries: &[E]) -> Vec<&Entry> {
    select(entries, Entry::is_organizational_unit)
}

/// Entries where one of the values of `attribute` equals `value` ignoring ASCII case.
#[must_use]
pub fn filter_by_attribute<'a, E: Borrow<Entry>>(
    entries: &'a [E],
    attribute: &str,
    value: &str,
) -> Vec<&'a Entry> {
    select(entries, |entry| {
        entry
            .get_attribute(attribute)
            .is_some_and(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
    })
}

/// First entry whose DN equals `dn` under DN equality.
#[must_use]
pub fn find_entry_by_dn<'a, E: Borrow<Entry>>(
    entries: &'a [E],
    dn: &DistinguishedName,
) -> Option<&'a Entry> {
    entries
        .iter()
        .map(Borrow::<Entry>::borrow)
        .find(|entry| entry.dn() == dn)
}

/// Parses `dn` and looks it up with [`find_entry_by_dn`].
///
/// # Errors
///
/// Returns [`ldif_core::Error::InvalidDn`] if `dn` is not a valid distinguished name.
pub fn find_entry_by_dn_str<'a, E: Borrow<Entry>>(
    entries: &'a [E],
    dn: &str,
) -> Result<Option<&'a Entry>> {
    let dn = DistinguishedName::parse(dn)?;
    Ok(find_entry_by_dn(entries, &dn))
}

fn select<'a, E, F>(entries: &'a [E], mut predicate: F) -> Vec<&'a Entry>
where
    E: Borrow<Entry>,
    F: FnMut(&Entry) -> bool,
{
    entries
        .iter()
        .map(Borrow::<Entry>::borrow)
        .filter(|entry| predicate(entry))
        .collect()
}
