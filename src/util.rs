use std::time::{Duration, SystemTime, UNIX_EPOCH};

use headers::Header;
use percent_encoding::percent_decode_str;
use time::format_description::well_known::Rfc3339;

/// Percent-decode a request URI: `%HH` pairs become single bytes, every
/// other character (including malformed `%` sequences) is copied verbatim.
pub fn decode_url(url: &str) -> String {
    let bytes: Vec<u8> = percent_decode_str(url).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Whole seconds since the epoch, for `Date` headers and lock tokens.
pub fn now_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn epoch_to_systemtime(secs: i64) -> SystemTime {
    if secs < 0 {
        UNIX_EPOCH
    } else {
        UNIX_EPOCH + Duration::from_secs(secs as u64)
    }
}

/// `Sat, 01 Jan 2000 00:00:00 GMT`
pub fn epoch_to_httpdate(secs: i64) -> String {
    let date = headers::Date::from(epoch_to_systemtime(secs));
    let mut values = Vec::new();
    date.encode(&mut values);
    values
        .first()
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

/// `2000-01-01T00:00:00Z`
pub fn epoch_to_rfc3339(secs: i64) -> String {
    time::OffsetDateTime::from_unix_timestamp(secs)
        .unwrap_or(time::OffsetDateTime::UNIX_EPOCH)
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_url_hex_pairs() {
        assert_eq!(decode_url("/a%20b"), "/a b");
        assert_eq!(decode_url("/plain"), "/plain");
        assert_eq!(decode_url("/%2Fescaped"), "//escaped");
    }

    #[test]
    fn decode_url_malformed_passthrough() {
        assert_eq!(decode_url("/100%"), "/100%");
        assert_eq!(decode_url("/x%zz"), "/x%zz");
        assert_eq!(decode_url("/x%4"), "/x%4");
    }

    #[test]
    fn rfc3339_epoch() {
        assert_eq!(epoch_to_rfc3339(0), "1970-01-01T00:00:00Z");
        assert_eq!(epoch_to_rfc3339(946684800), "2000-01-01T00:00:00Z");
    }

    #[test]
    fn httpdate_epoch() {
        assert_eq!(epoch_to_httpdate(0), "Thu, 01 Jan 1970 00:00:00 GMT");
    }
}
