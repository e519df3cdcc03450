//! Case-insensitive response header map and the header block parser.

/// Response headers in wire order.
///
/// Lookups ignore ASCII case. Each name keeps the values it was sent with,
/// in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a header block, one `name: value` field per line.
    ///
    /// Each line is split on its first colon and both halves are trimmed.
    /// Lines without a colon, or with an empty name, are dropped.
    pub fn parse(block: &str) -> Self {
        let mut headers = Self::new();
        for line in block.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            headers.append(name, value.trim());
        }
        headers
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// First value sent for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// All values sent for `name`, empty if the header is absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(idx) => &self.entries[idx].1,
            None => &[],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, values)` pairs, names as first seen on the wire.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }
}
