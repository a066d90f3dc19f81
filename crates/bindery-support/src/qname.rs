//! Qualified names.

use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, Result};

/// A namespace-qualified name.
///
/// The text form is Clark notation: `{namespace}local`, or just `local` when
/// the name has no namespace. Prefixes are a property of a particular
/// document, not of the name, so they are not part of the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            namespace: if namespace.is_empty() { None } else { Some(namespace) },
            local: local.into(),
        }
    }

    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(text: &str) -> Result<Self> {
        text.parse()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => f.write_str(&self.local),
        }
    }
}

impl FromStr for QName {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (namespace, local) = match s.strip_prefix('{') {
            Some(rest) => {
                let (ns, local) = rest.split_once('}').ok_or(CodecError::QName {
                    reason: "unterminated namespace",
                })?;
                (Some(ns.to_string()), local)
            }
            None => (None, s),
        };
        if local.is_empty() {
            return Err(CodecError::QName {
                reason: "empty local part",
            });
        }
        if local.contains(['{', '}']) || local.chars().any(char::is_whitespace) {
            return Err(CodecError::QName {
                reason: "illegal character in local part",
            });
        }
        Ok(Self {
            namespace: namespace.filter(|ns| !ns.is_empty()),
            local: local.to_string(),
        })
    }
}
