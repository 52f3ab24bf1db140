//! Query parameter snapshots.

use std::mem;

/// The value of a query parameter.
///
/// A key that occurs once stays scalar; repeated occurrences of the same key
/// collapse into an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    One(String),
    Many(Vec<String>),
}

/// A snapshot of the query parameters of a URL, taken when a navigation
/// enters the matching phase.
///
/// ```
/// use waypoint::QueryParams;
///
/// let params = QueryParams::parse("/search?q=router&tag=a&tag=b");
/// assert_eq!(params.get("q"), Some("router"));
/// assert_eq!(params.get_all("tag"), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Value)>,
}

impl QueryParams {
    /// Parses the query string of a raw URL. Pairs without a `=` are
    /// skipped; keys and values are percent-decoded.
    pub fn parse(raw: &str) -> QueryParams {
        let query = raw.split_once('?').map(|(_, query)| query).unwrap_or("");

        let mut params = QueryParams::default();
        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            params.push(decode(key), decode(value));
        }
        params
    }

    fn push(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => {
                let mut values = match mem::replace(slot, Value::Many(Vec::new())) {
                    Value::One(first) => vec![first],
                    Value::Many(values) => values,
                };
                values.push(value);
                *slot = Value::Many(values);
            }
            None => self.entries.push((key, Value::One(value))),
        }
    }

    /// Returns the first value registered under the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(existing, _)| existing == key).map(
            |(_, value)| match value {
                Value::One(value) => value.as_str(),
                Value::Many(values) => values[0].as_str(),
            },
        )
    }

    /// Returns every value registered under the given key, in occurrence
    /// order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        match self.entries.iter().find(|(existing, _)| existing == key) {
            Some((_, Value::One(value))) => vec![value.as_str()],
            Some((_, Value::Many(values))) => values.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the URL carried no query parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Percent-decoding of a query component. Invalid escapes pass through
// untouched; a decode that is not valid UTF-8 falls back to the raw text.
fn decode(component: &str) -> String {
    let bytes = component.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).unwrap_or_else(|_| component.to_string())
}

fn hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{QueryParams, Value};

    #[test]
    fn scalar_and_sequence_values() {
        let params = QueryParams::parse("/p?x=1&tag=a&tag=b&tag=c");
        assert_eq!(params.get("x"), Some("1"));
        assert_eq!(params.get_all("x"), ["1"]);
        assert_eq!(params.get("tag"), Some("a"));
        assert_eq!(params.get_all("tag"), ["a", "b", "c"]);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn no_query_string() {
        let params = QueryParams::parse("/users/42");
        assert!(params.is_empty());
        assert_eq!(params.get("x"), None);
        assert!(params.get_all("x").is_empty());
    }

    #[test]
    fn pairs_without_equals_are_skipped() {
        let params = QueryParams::parse("/p?flag&x=1");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("x"), Some("1"));
    }

    #[test]
    fn percent_decoding() {
        let params = QueryParams::parse("/p?q=hello%20world&bad=100%");
        assert_eq!(params.get("q"), Some("hello world"));
        assert_eq!(params.get("bad"), Some("100%"));
    }

    #[test]
    fn repeated_key_keeps_occurrence_order() {
        let mut params = QueryParams::default();
        params.push("k".into(), "1".into());
        params.push("k".into(), "2".into());
        assert_eq!(
            params.entries,
            [("k".to_string(), Value::Many(vec!["1".into(), "2".into()]))]
        );
    }
}
