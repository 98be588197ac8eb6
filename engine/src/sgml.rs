//! Record slicing and tag scanning for the SGML-ish LATimes collection.
//!
//! The collection is a stream of `<DOC> ... </DOC>` records. A full DOM is
//! overkill for the four regions we extract, so a hand-written scanner finds
//! the first `<TAG>...</TAG>` span and concatenates its character data with
//! any nested tags removed.

use crate::{Error, Result};
use std::io::BufRead;

const DOC_END_TAG: &str = "</DOC>";

/// Iterator over raw records in a collection stream.
///
/// Lines are accumulated until one containing `</DOC>` is seen; the
/// accumulated text (line endings normalized to `\n`) is emitted as one
/// record. Trailing bytes after the last `</DOC>` are dropped.
pub struct RecordReader<R> {
    inner: R,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buf = Vec::new();
        let n = self.inner.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = String::new();
        loop {
            match self.next_line() {
                Err(e) => return Some(Err(Error::Io(e))),
                Ok(None) => return None,
                Ok(Some(line)) => {
                    record.push_str(&line);
                    if line.contains(DOC_END_TAG) {
                        return Some(Ok(record));
                    }
                    record.push('\n');
                }
            }
        }
    }
}

/// The fields extracted from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDoc {
    /// Trimmed content of the `<DOCNO>` element, always 13 ASCII chars.
    pub docno: String,
    /// Concatenated `<P>` children of the first `<HEADLINE>`, or empty.
    pub headline: String,
    /// Character data of `TEXT`, then `HEADLINE`, then `GRAPHIC`; the text
    /// that gets tokenized and that snippets are drawn from.
    pub text: String,
}

impl ParsedDoc {
    /// The `MMDDYY` date embedded in the docno.
    pub fn date(&self) -> &str {
        &self.docno[2..8]
    }
}

/// Parse one raw record into its indexed fields.
pub fn parse_record(record: &str) -> Result<ParsedDoc> {
    let docno = element_body(record, "DOCNO")
        .map(|body| text_content(body).trim().to_owned())
        .ok_or_else(|| Error::MalformedRecord("missing DOCNO element".to_owned()))?;
    if docno.len() != 13 || !docno.is_ascii() {
        return Err(Error::MalformedRecord(format!(
            "docno '{docno}' is not 13 ASCII characters"
        )));
    }
    let headline = element_body(record, "HEADLINE")
        .map(paragraphs)
        .unwrap_or_default();
    Ok(ParsedDoc {
        docno,
        headline,
        text: document_text(record),
    })
}

/// Character data of the `TEXT`, `HEADLINE` and `GRAPHIC` regions, in that
/// order. Empty when none of the three is present.
pub fn document_text(record: &str) -> String {
    let mut out = String::new();
    for tag in ["TEXT", "HEADLINE", "GRAPHIC"] {
        if let Some(body) = element_body(record, tag) {
            out.push_str(&text_content(body));
        }
    }
    out
}

/// The span between the first `<tag>` and the following `</tag>`.
fn element_body<'a>(doc: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = doc.find(&open)? + open.len();
    let len = doc[start..].find(&close)?;
    Some(&doc[start..start + len])
}

/// Concatenated character data of all `<P>` elements inside `body`.
fn paragraphs(body: &str) -> String {
    let mut out = String::new();
    let mut rest = body;
    while let Some(start) = rest.find("<P>") {
        let after = &rest[start + "<P>".len()..];
        let Some(end) = after.find("</P>") else { break };
        out.push_str(&text_content(&after[..end]));
        rest = &after[end + "</P>".len()..];
    }
    out
}

/// Strip every `<...>` span, keeping the character data between tags.
fn text_content(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_tag = false;
    for ch in body.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(docno: &str, body: &str) -> String {
        format!("<DOC>\n<DOCNO> {docno} </DOCNO>\n{body}\n</DOC>")
    }

    #[test]
    fn splits_stream_into_records() {
        let data = format!(
            "{}\n{}\ntrailing garbage without end tag",
            record("LA010189-0001", "<TEXT>one</TEXT>"),
            record("LA010289-0001", "<TEXT>two</TEXT>"),
        );
        let records: Vec<String> = RecordReader::new(Cursor::new(data))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].contains("LA010189-0001"));
        assert!(records[1].contains("LA010289-0001"));
    }

    #[test]
    fn crlf_lines_are_normalized() {
        let data = "<DOC>\r\n<DOCNO> LA010189-0001 </DOCNO>\r\n<TEXT>hi there</TEXT>\r\n</DOC>\r\n";
        let records: Vec<String> = RecordReader::new(Cursor::new(data))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].contains('\r'));
    }

    #[test]
    fn extracts_all_fields() {
        let rec = record(
            "LA010189-0001",
            "<HEADLINE>\n<P>\nBig News\n</P>\n<P>\nSecond Deck\n</P>\n</HEADLINE>\n\
             <TEXT>\n<P>\nBody text.\n</P>\n</TEXT>\n<GRAPHIC>\n<P>\nCaption.\n</P>\n</GRAPHIC>",
        );
        let doc = parse_record(&rec).unwrap();
        assert_eq!(doc.docno, "LA010189-0001");
        assert_eq!(doc.date(), "010189");
        assert_eq!(doc.headline, "\nBig News\n\nSecond Deck\n");
        assert!(doc.text.contains("Body text."));
        // TEXT precedes HEADLINE which precedes GRAPHIC
        let body = doc.text.find("Body text.").unwrap();
        let head = doc.text.find("Big News").unwrap();
        let cap = doc.text.find("Caption.").unwrap();
        assert!(body < head && head < cap);
    }

    #[test]
    fn missing_optional_regions_are_empty() {
        let doc = parse_record(&record("LA010189-0002", "<TEXT>just text.</TEXT>")).unwrap();
        assert_eq!(doc.headline, "");
        assert_eq!(doc.text, "just text.");

        let doc = parse_record(&record("LA010189-0003", "")).unwrap();
        assert_eq!(doc.text, "");
    }

    #[test]
    fn rejects_missing_or_bad_docno() {
        assert!(matches!(
            parse_record("<DOC><TEXT>no docno</TEXT></DOC>"),
            Err(Error::MalformedRecord(_))
        ));
        assert!(matches!(
            parse_record(&record("SHORT", "<TEXT>x</TEXT>")),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn nested_tags_are_stripped_from_text() {
        let rec = record("LA010189-0004", "<TEXT><P>a</P><P>b</P></TEXT>");
        assert_eq!(parse_record(&rec).unwrap().text, "ab");
    }
}
