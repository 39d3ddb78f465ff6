//! LDIF grammar parser.
//!
//! The parser is a single pass over the input lines. Physical lines are unfolded into logical
//! `name: value` lines, grouped into blank-line separated records, and each record is turned into
//! an [`Entry`]. Limits such as `max_entries` are not enforced here; see [`crate::validator`].
//!
//! A malformed record aborts the whole parse with an error naming its record index and line.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::dn::DistinguishedName;
use crate::entry::Entry;
use crate::Result;
use ldif_core::Error;

/// A logical line after unfolding, tagged with the physical line it started on.
#[derive(Debug)]
struct LogicalLine {
    number: usize,
    text: String,
}

/// Lines collected for the record currently being read.
#[derive(Debug)]
struct Record {
    index: usize,
    lines: Vec<LogicalLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastLine {
    None,
    Comment,
    Value,
}

/// Parses LDIF text into entries, in input order.
///
/// Whitespace-only input yields an empty vector.
///
/// # Errors
///
/// Returns [`Error::Parse`] for a record without a leading `dn:` line, a malformed DN, a bad
/// base64 payload, a continuation line with no preceding value line, or a line that is not an
/// `attribute: value` pair.
pub fn parse(text: &str) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut current: Option<Record> = None;
    let mut records_seen = 0;
    let mut last = LastLine::None;

    for (offset, line) in text.lines().enumerate() {
        let number = offset + 1;

        if line.trim().is_empty() {
            if let Some(record) = current.take() {
                entries.push(build_entry(record)?);
            }
            last = LastLine::None;
            continue;
        }

        if let Some(folded) = line.strip_prefix(' ') {
            match last {
                LastLine::Comment => {}
                LastLine::Value => {
                    if let Some(previous) = current.as_mut().and_then(|r| r.lines.last_mut()) {
                        previous.text.push_str(folded);
                    }
                }
                LastLine::None => {
                    let index = current.as_ref().map_or(records_seen + 1, |r| r.index);
                    return Err(Error::parse(
                        index,
                        number,
                        "continuation line without a preceding value line",
                    ));
                }
            }
            continue;
        }

        if line.starts_with('#') {
            last = LastLine::Comment;
            continue;
        }

        if current.is_none() && records_seen == 0 && is_version_line(line) {
            check_version(line, number)?;
            last = LastLine::None;
            continue;
        }

        let record = current.get_or_insert_with(|| {
            records_seen += 1;
            Record {
                index: records_seen,
                lines: Vec::new(),
            }
        });
        record.lines.push(LogicalLine {
            number,
            text: line.to_string(),
        });
        last = LastLine::Value;
    }

    if let Some(record) = current.take() {
        entries.push(build_entry(record)?);
    }

    debug!(
        entries = entries.len(),
        values = entries.iter().map(Entry::value_count).sum::<usize>(),
        "parsed LDIF input"
    );
    Ok(entries)
}

fn is_version_line(line: &str) -> bool {
    line.get(..8)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("version:"))
}

fn check_version(line: &str, number: usize) -> Result<()> {
    let version = line[8..].trim();
    if version == "1" {
        Ok(())
    } else {
        Err(Error::parse(
            1,
            number,
            format!("unsupported LDIF version `{version}`"),
        ))
    }
}

fn build_entry(record: Record) -> Result<Entry> {
    let mut lines = record.lines.into_iter();
    let Some(first) = lines.next() else {
        return Err(Error::parse(record.index, 0, "empty record"));
    };

    let (name, value) = split_line(&first, record.index)?;
    if !name.eq_ignore_ascii_case("dn") {
        return Err(Error::parse(
            record.index,
            first.number,
            format!("record must start with a `dn:` line, found `{name}`"),
        ));
    }

    let dn = DistinguishedName::parse(&value).map_err(|err| {
        Error::parse(
            record.index,
            first.number,
            format!("invalid DN `{value}`: {err}"),
        )
    })?;

    let mut builder = Entry::builder(dn);
    for line in lines {
        let (name, value) = split_line(&line, record.index)?;
        if name.eq_ignore_ascii_case("dn") {
            return Err(Error::parse(
                record.index,
                line.number,
                "record contains more than one `dn:` line",
            ));
        }
        builder.push_value(name, value);
    }

    Ok(builder.build())
}

/// Splits a logical line into its attribute description and decoded value.
fn split_line(line: &LogicalLine, record: usize) -> Result<(String, String)> {
    let Some((name, rest)) = line.text.split_once(':') else {
        return Err(Error::parse(
            record,
            line.number,
            format!("expected `attribute: value`, found `{}`", line.text),
        ));
    };

    let name = name.trim_end();
    if name.is_empty() {
        return Err(Error::parse(record, line.number, "missing attribute name"));
    }

    let value = if let Some(encoded) = rest.strip_prefix(':') {
        decode_base64(encoded.trim(), name, record, line.number)?
    } else if rest.starts_with('<') {
        return Err(Error::parse(
            record,
            line.number,
            format!("URL-referenced value for `{name}` is not supported"),
        ));
    } else {
        rest.trim_start_matches(' ').to_string()
    };

    Ok((name.to_string(), value))
}

fn decode_base64(encoded: &str, name: &str, record: usize, number: usize) -> Result<String> {
    let bytes = STANDARD.decode(encoded).map_err(|err| {
        Error::parse(
            record,
            number,
            format!("invalid base64 value for `{name}`: {err}"),
        )
    })?;

    String::from_utf8(bytes).map_err(|_| {
        Error::parse(
            record,
            number,
            format!("base64 value for `{name}` is not valid UTF-8"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RECORDS: &str = "dn: dc=example,dc=com
objectClass: top
objectClass: domain
dc: example

dn: cn=John,ou=people,dc=example,dc=com
objectClass: person
cn: John
sn: Doe
";

    #[test]
    fn parse_two_records() {
        let entries = parse(TWO_RECORDS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].dn().as_str(), "dc=example,dc=com");
        assert_eq!(entries[0].object_classes(), ["top", "domain"]);
        assert_eq!(entries[1].dn().depth(), 4);
        assert_eq!(entries[1].first("sn"), Some("Doe"));
        assert_eq!(entries[1].value_count(), 3);
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n\n   \n\t\n").unwrap().is_empty());
        assert!(parse("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn multiple_blank_lines_and_crlf() {
        let text = "dn: dc=a\r\nobjectClass: top\r\n\r\n\r\n\r\ndn: dc=b\r\nobjectClass: top\r\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].first("objectClass"), Some("top"));
        assert_eq!(entries[1].dn().as_str(), "dc=b");
    }

    #[test]
    fn folded_value_is_unfolded() {
        let text = "dn: cn=fold,dc=example\ndescription: long text that\n  continues here\n";
        let entries = parse(text).unwrap();
        assert_eq!(
            entries[0].first("description"),
            Some("long text that continues here")
        );
    }

    #[test]
    fn folded_dn_is_unfolded() {
        let text = "dn: cn=John,ou=peo\n ple,dc=example\ncn: John\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries[0].dn().as_str(), "cn=John,ou=people,dc=example");
    }

    #[test]
    fn comments_are_skipped() {
        let text = "# header comment\n#  folded comment\n continues\ndn: dc=example\n# inner\nobjectClass: top\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].attributes().len(), 1);
    }

    #[test]
    fn base64_values_are_decoded() {
        // "Jos\u{e9}" and " padded"
        let text = "dn:: Y249Sm9zw6ksZGM9ZXhhbXBsZQ==\ncn:: Sm9zw6k=\ndescription:: IHBhZGRlZA==\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries[0].dn().get("cn"), Some("José"));
        assert_eq!(entries[0].first("cn"), Some("José"));
        assert_eq!(entries[0].first("description"), Some(" padded"));
    }

    #[test]
    fn record_without_attributes_is_valid() {
        let entries = parse("dn: dc=example\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].attributes().is_empty());
    }

    #[test]
    fn empty_value_is_kept() {
        let entries = parse("dn: dc=example\ndescription:\n").unwrap();
        assert_eq!(entries[0].first("description"), Some(""));
    }

    #[test]
    fn version_line_is_accepted() {
        let entries = parse("version: 1\n\ndn: dc=example\nobjectClass: top\n").unwrap();
        assert_eq!(entries.len(), 1);

        let entries = parse("version: 1\ndn: dc=example\n").unwrap();
        assert_eq!(entries.len(), 1);

        let err = parse("version: 2\n\ndn: dc=example\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn non_ldif_text_fails() {
        let err = parse("This is not LDIF content at all").unwrap_err();
        assert!(matches!(err, Error::Parse { record: 1, line: 1, .. }));
    }

    #[test]
    fn missing_dn_line_names_record() {
        let text = "dn: dc=example\nobjectClass: top\n\ncn: orphan\nobjectClass: person\n";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, Error::Parse { record: 2, line: 4, .. }));
        assert!(err.to_string().contains("dn:"));
    }

    #[test]
    fn malformed_dn_aborts_parse() {
        let text = "dn: cn=valid,dc=example,dc=com\nobjectClass: person\ncn: valid\n\ndn: invalid-dn-format\ncn: invalid\nobjectClass: person\n";
        let err = parse(text).unwrap_err();
        match err {
            Error::Parse {
                record,
                line,
                message,
            } => {
                assert_eq!(record, 2);
                assert_eq!(line, 5);
                assert!(message.contains("invalid-dn-format"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_base64_fails() {
        let err = parse("dn: dc=example\ncn:: not*base64\n").unwrap_err();
        assert!(matches!(err, Error::Parse { record: 1, line: 2, .. }));
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    fn non_utf8_base64_fails() {
        let err = parse("dn: dc=example\njpegPhoto:: /9j/\n").unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn orphan_continuation_fails() {
        let err = parse(" orphan continuation\ndn: dc=example\n").unwrap_err();
        assert!(matches!(err, Error::Parse { record: 1, line: 1, .. }));

        let err = parse("dn: dc=a\n\n continued\n").unwrap_err();
        assert!(matches!(err, Error::Parse { record: 2, line: 3, .. }));
    }

    #[test]
    fn second_dn_line_fails() {
        let err = parse("dn: dc=a\ndn: dc=b\n").unwrap_err();
        assert!(matches!(err, Error::Parse { record: 1, line: 2, .. }));
    }

    #[test]
    fn line_without_separator_fails() {
        let err = parse("dn: dc=a\nnot an attribute\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn url_values_are_rejected() {
        let err = parse("dn: dc=a\njpegPhoto:< file:///tmp/photo.jpg\n").unwrap_err();
        assert!(err.to_string().contains("URL"));
    }
}
