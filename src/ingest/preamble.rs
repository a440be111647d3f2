// Uploads start with two header lines written by the spreadsheet export
// script. Only `\n` ends a line; a trailing `\r` stays in the skipped line.

use crate::error::UploadError;

pub const PREAMBLE_LINES: usize = 2;

pub fn strip_preamble(body: &[u8]) -> Result<&[u8], UploadError> {
    let mut rest = body;
    for lines_found in 0..PREAMBLE_LINES {
        match rest.iter().position(|b| *b == b'\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return Err(UploadError::MissingPreamble { lines_found }),
        }
    }
    Ok(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_two_lines() {
        let body = b"first\nsecond\n[[1,2,\"a\",3,\"SOLD\"]]";
        assert_eq!(strip_preamble(body).unwrap(), b"[[1,2,\"a\",3,\"SOLD\"]]");
    }

    #[test]
    fn crlf_lines_are_skipped_whole() {
        let body = b"first\r\nsecond\r\n[]";
        assert_eq!(strip_preamble(body).unwrap(), b"[]");
    }

    #[test]
    fn exactly_two_lines_leaves_empty_remainder() {
        assert_eq!(strip_preamble(b"a\nb\n").unwrap(), b"");
    }

    #[test]
    fn short_body_is_an_error() {
        for (body, expected) in [(&b""[..], 0), (&b"no newline"[..], 0), (&b"one\nline"[..], 1)] {
            match strip_preamble(body) {
                Err(UploadError::MissingPreamble { lines_found }) => {
                    assert_eq!(lines_found, expected)
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn empty_preamble_lines_count() {
        assert_eq!(strip_preamble(b"\n\n[]").unwrap(), b"[]");
    }
}
