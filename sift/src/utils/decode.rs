//! URL decoding of client-supplied filter and order text

use percent_encoding::percent_decode_str;

use crate::domain::error::CompileError;

/// Decode a raw, URL-encoded query parameter.
///
/// Absent or blank input means "no constraint" and yields `Ok(None)`; it is
/// never an error. Decoding follows form encoding: `+` becomes a space and
/// every `%` must start a two-digit hex escape. The decoded bytes must be UTF-8.
pub fn decode_param(raw: Option<&str>) -> Result<Option<String>, CompileError> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };

    if let Some(position) = find_malformed_escape(raw) {
        return Err(CompileError::MalformedInput {
            position,
            reason: "'%' must be followed by two hex digits",
        });
    }

    let spaced = raw.replace('+', " ");
    let decoded = percent_decode_str(&spaced)
        .decode_utf8()
        .map_err(|e| CompileError::MalformedInput {
            position: raw_offset(raw, e.valid_up_to()),
            reason: "decoded text is not valid UTF-8",
        })?;

    Ok(Some(decoded.into_owned()))
}

/// Raw byte offset of the decoded byte at `decoded`. Every escape in `raw`
/// must already be well-formed.
fn raw_offset(raw: &str, decoded: usize) -> usize {
    let bytes = raw.as_bytes();
    let mut i = 0;
    for _ in 0..decoded {
        if i >= bytes.len() {
            break;
        }
        i += if bytes[i] == b'%' { 3 } else { 1 };
    }
    i
}

/// Byte offset of the first `%` that does not start a valid escape
fn find_malformed_escape(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'%')
        .map(|(i, _)| i)
        .find(|&i| {
            !matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_blank_are_no_constraint() {
        assert_eq!(decode_param(None).unwrap(), None);
        assert_eq!(decode_param(Some("")).unwrap(), None);
        assert_eq!(decode_param(Some("   \t")).unwrap(), None);
    }

    #[test]
    fn test_decodes_percent_escapes_and_plus() {
        let decoded = decode_param(Some("name%20%24sw%20%27Jo%27")).unwrap();
        assert_eq!(decoded.as_deref(), Some("name $sw 'Jo'"));

        let decoded = decode_param(Some("name+desc,age")).unwrap();
        assert_eq!(decoded.as_deref(), Some("name desc,age"));
    }

    #[test]
    fn test_plain_text_passes_through() {
        let decoded = decode_param(Some("age>5")).unwrap();
        assert_eq!(decoded.as_deref(), Some("age>5"));
    }

    #[test]
    fn test_encoded_blank_is_not_absent() {
        // Blank after decoding still reaches the parser
        assert_eq!(decode_param(Some("%20")).unwrap().as_deref(), Some(" "));
    }

    #[test]
    fn test_malformed_escape_reports_position() {
        let err = decode_param(Some("name=%2")).unwrap_err();
        assert_eq!(
            err,
            CompileError::MalformedInput {
                position: 5,
                reason: "'%' must be followed by two hex digits",
            }
        );
        assert!(decode_param(Some("%zz")).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let err = decode_param(Some("%FF%FE")).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_INPUT");
    }

    #[test]
    fn test_invalid_utf8_reports_raw_position() {
        let reason = "decoded text is not valid UTF-8";
        assert_eq!(
            decode_param(Some("%41%41%FF")).unwrap_err(),
            CompileError::MalformedInput {
                position: 6,
                reason,
            }
        );
        // Literal and escaped multi-byte characters before the bad byte
        assert_eq!(
            decode_param(Some("é+Jos%C3%A9%FF")).unwrap_err(),
            CompileError::MalformedInput {
                position: 12,
                reason,
            }
        );
    }

    #[test]
    fn test_utf8_multibyte_decodes() {
        let decoded = decode_param(Some("name%20%3D%20%27Jos%C3%A9%27")).unwrap();
        assert_eq!(decoded.as_deref(), Some("name = 'José'"));
    }
}
