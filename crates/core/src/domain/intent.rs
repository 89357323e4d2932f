use serde::{Deserialize, Serialize};

/// Classified purpose of an inbound message. Exactly one value per message;
/// `General` is the default bucket when nothing more specific applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Faq,
    Inventory,
    Order,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Faq => "faq",
            Self::Inventory => "inventory",
            Self::Order => "order",
            Self::General => "general",
        }
    }

    /// Parses the label emitted by the remote intent table. Unrecognized
    /// labels collapse to `General` rather than failing.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "faq" => Self::Faq,
            "inventory" => Self::Inventory,
            "order" => Self::Order,
            _ => Self::General,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
