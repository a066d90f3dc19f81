//! The media-agnostic node tree.
//!
//! The marshaller produces a [`Node`] tree that a media adapter renders as
//! text; the unmarshaller consumes a tree that an adapter parsed from text.
//! Objects keep their members in order and may repeat a name, which is how
//! repeated XML elements appear before the unmarshaller groups them.

/// How scalar text is written in JSON. XML ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Quoted,
    Number,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
    pub style: TextStyle,
}

pub type Members = Vec<(String, Node)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Explicit null marker.
    Null,
    Scalar(Text),
    Array(Vec<Node>),
    Object(Members),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Scalar(Text {
            value: value.into(),
            style: TextStyle::Quoted,
        })
    }

    pub fn styled(value: impl Into<String>, style: TextStyle) -> Self {
        Node::Scalar(Text {
            value: value.into(),
            style,
        })
    }

    pub fn empty_object() -> Self {
        Node::Object(Vec::new())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Scalar(_) => "scalar",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Scalar(t) => Some(&t.value),
            _ => None,
        }
    }

    /// True for a scalar with no text other than whitespace, which is how an
    /// empty XML element (`<a/>`, or `<a>` with only indentation) parses.
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Scalar(t) if t.value.trim().is_empty())
    }

    /// Whether a null marker appears anywhere in the tree.
    pub fn contains_null(&self) -> bool {
        match self {
            Node::Null => true,
            Node::Scalar(_) => false,
            Node::Array(items) => items.iter().any(Node::contains_null),
            Node::Object(members) => members.iter().any(|(_, n)| n.contains_null()),
        }
    }
}

/// Returns the members of the object stored under `segments`, creating
/// intermediate objects as needed. Existing containers are reused, so several
/// properties addressed below the same path share one container.
///
/// Returns `None` if a segment is already taken by a non-object member.
pub fn container_mut<'a>(members: &'a mut Members, segments: &[String]) -> Option<&'a mut Members> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(members);
    };
    let idx = match members.iter().position(|(name, _)| name == first) {
        Some(idx) => idx,
        None => {
            members.push((first.clone(), Node::empty_object()));
            members.len() - 1
        }
    };
    match &mut members[idx].1 {
        Node::Object(inner) => container_mut(inner, rest),
        _ => None,
    }
}

/// Removes and returns the first member called `name`.
pub fn take_member(members: &mut Members, name: &str) -> Option<Node> {
    let idx = members.iter().position(|(n, _)| n == name)?;
    Some(members.remove(idx).1)
}

/// Removes and returns every member called `name`, in order.
pub fn take_all(members: &mut Members, name: &str) -> Vec<Node> {
    let mut taken = Vec::new();
    let mut kept = Vec::with_capacity(members.len());
    for (n, node) in members.drain(..) {
        if n == name {
            taken.push(node);
        } else {
            kept.push((n, node));
        }
    }
    *members = kept;
    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_container_mut_merges_paths() {
        let mut members = Members::new();
        container_mut(&mut members, &seg(&["a", "b"]))
            .unwrap()
            .push(("x".into(), Node::text("1")));
        container_mut(&mut members, &seg(&["a", "b"]))
            .unwrap()
            .push(("y".into(), Node::text("2")));
        container_mut(&mut members, &seg(&["a"]))
            .unwrap()
            .push(("z".into(), Node::text("3")));

        assert_eq!(
            members,
            vec![(
                "a".to_string(),
                Node::Object(vec![
                    (
                        "b".to_string(),
                        Node::Object(vec![
                            ("x".to_string(), Node::text("1")),
                            ("y".to_string(), Node::text("2")),
                        ])
                    ),
                    ("z".to_string(), Node::text("3")),
                ])
            )]
        );
    }

    #[test]
    fn test_container_mut_rejects_scalar_segment() {
        let mut members = vec![("a".to_string(), Node::text("1"))];
        assert!(container_mut(&mut members, &seg(&["a", "b"])).is_none());
    }

    #[test]
    fn test_take_all_keeps_order() {
        let mut members = vec![
            ("item".to_string(), Node::text("1")),
            ("other".to_string(), Node::text("x")),
            ("item".to_string(), Node::text("2")),
        ];
        let items = take_all(&mut members, "item");
        assert_eq!(items, vec![Node::text("1"), Node::text("2")]);
        assert_eq!(members, vec![("other".to_string(), Node::text("x"))]);
    }

    #[test]
    fn test_is_blank() {
        assert!(Node::text("").is_blank());
        assert!(Node::text("\n    ").is_blank());
        assert!(!Node::text(" x ").is_blank());
        assert!(!Node::Null.is_blank());
        assert!(!Node::empty_object().is_blank());
    }

    #[test]
    fn test_contains_null() {
        let node = Node::Object(vec![(
            "a".to_string(),
            Node::Array(vec![Node::text("x"), Node::Null]),
        )]);
        assert!(node.contains_null());
        assert!(!Node::text("x").contains_null());
    }
}
