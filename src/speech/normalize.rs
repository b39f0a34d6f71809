/// Raw recognizer output. The hearing stream is loosely typed: a capture may
/// arrive as a bare transcript or as a sequence of fragments, some of which
/// carry a confidence value instead of text.
#[derive(Debug, Clone, PartialEq)]
pub enum RawUtterance {
    Text(String),
    Sequence(Vec<RawField>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    Text(String),
    Confidence(f32),
}

impl RawUtterance {
    pub fn text(s: impl Into<String>) -> Self {
        RawUtterance::Text(s.into())
    }
}

/// Canonicalize recognizer output into a single string. Never returns
/// anything but a string: `None` becomes empty. Bare text passes through
/// unmodified; trimming happens downstream so logs keep the raw capture.
///
/// For sequences, the first non-empty text fragment wins; if there is none,
/// the first fragment is stringified as-is.
pub fn normalize(raw: Option<RawUtterance>) -> String {
    match raw {
        None => String::new(),
        Some(RawUtterance::Text(s)) => s,
        Some(RawUtterance::Sequence(fields)) => {
            for field in &fields {
                if let RawField::Text(s) = field {
                    if !s.trim().is_empty() {
                        return s.clone();
                    }
                }
            }
            match fields.into_iter().next() {
                Some(RawField::Text(s)) => s,
                Some(RawField::Confidence(c)) => c.to_string(),
                None => String::new(),
            }
        }
    }
}
