use std::fmt;

use serde::{Deserialize, Serialize};

// Storage model, field names as they appear on disk and in exports
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct Program {
    #[serde(rename = "programIsmi")]
    pub name: String,
    #[serde(rename = "programLink")]
    pub link: String,
    pub email: String,
    #[serde(rename = "sifre")]
    pub secret: String,
    #[serde(rename = "accountSekli", default)]
    pub account_kind: String,
    #[serde(rename = "ucretli")]
    pub is_paid: Paid,
    #[serde(rename = "bitisTarihi", default)]
    pub expiry_date: String,
    #[serde(rename = "kartNo", default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(rename = "periyot", default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

/// Paid flag. Older exports stored it as free text, so both shapes are kept
/// as-is instead of being coerced.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paid {
    Flag(bool),
    Text(String),
}

impl Paid {
    /// Truthiness as the old data was written: `true`, or any non-empty text.
    pub fn is_truthy(&self) -> bool {
        match self {
            Paid::Flag(b) => *b,
            Paid::Text(t) => !t.is_empty(),
        }
    }
}

impl Default for Paid {
    fn default() -> Self {
        Paid::Flag(false)
    }
}

impl From<bool> for Paid {
    fn from(b: bool) -> Self {
        Paid::Flag(b)
    }
}

impl fmt::Display for Paid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paid::Flag(b) => write!(f, "{}", b),
            Paid::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "Aylık")]
    Monthly,
    #[serde(rename = "Yıllık")]
    Yearly,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::Monthly, Period::Yearly];

    /// The value written to disk.
    pub fn label(self) -> &'static str {
        match self {
            Period::Monthly => "Aylık",
            Period::Yearly => "Yıllık",
        }
    }

    /// Exact on-disk spelling only.
    pub fn from_stored(s: &str) -> Option<Period> {
        Period::ALL.iter().copied().find(|p| p.label() == s)
    }

    /// Either the stored label or the English name, ignoring ASCII case.
    pub fn from_label(s: &str) -> Option<Period> {
        Period::ALL
            .iter()
            .copied()
            .find(|p| p.label() == s || format!("{:?}", p).eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::from_label(s).ok_or_else(|| {
            format!("unknown period '{}', expected Monthly or Yearly", s)
        })
    }
}
