/// Tagged result of a remote capability call: either the remote service
/// produced the value, or the deterministic fallback did. Callers collapse
/// the tag at the orchestrator boundary and never branch on it for control
/// flow; the tag exists for observability and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved<T> {
    Remote(T),
    Fallback(T),
}

impl<T> Resolved<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Remote(value) | Self::Fallback(value) => value,
        }
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Self::Remote(value) | Self::Fallback(value) => value,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub fn source(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Fallback(_) => "fallback",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Resolved;

    #[test]
    fn into_inner_discards_the_tag() {
        assert_eq!(Resolved::Remote(7).into_inner(), 7);
        assert_eq!(Resolved::Fallback(7).into_inner(), 7);
    }

    #[test]
    fn source_labels_match_the_variant() {
        assert_eq!(Resolved::Remote(()).source(), "remote");
        assert_eq!(Resolved::Fallback(()).source(), "fallback");
        assert!(!Resolved::Fallback(()).is_remote());
    }
}
