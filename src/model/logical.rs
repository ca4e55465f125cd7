use std::fmt;

use super::storage::Program;

/// A record handed from the list to the form, with the slot it came from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EditTarget {
    pub index: usize,
    pub program: Program,
}

/// Sortable list columns.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Column {
    Name,
    Link,
    Email,
    Secret,
    AccountKind,
    IsPaid,
    ExpiryDate,
    CardNumber,
    Period,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Name,
        Column::Link,
        Column::Email,
        Column::Secret,
        Column::AccountKind,
        Column::IsPaid,
        Column::ExpiryDate,
        Column::CardNumber,
        Column::Period,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Link => "link",
            Column::Email => "email",
            Column::Secret => "secret",
            Column::AccountKind => "account",
            Column::IsPaid => "paid",
            Column::ExpiryDate => "expiry",
            Column::CardNumber => "card",
            Column::Period => "period",
        }
    }

    /// String form of the column's value, used for sorting.
    pub fn value(self, p: &Program) -> String {
        match self {
            Column::Name => p.name.clone(),
            Column::Link => p.link.clone(),
            Column::Email => p.email.clone(),
            Column::Secret => p.secret.clone(),
            Column::AccountKind => p.account_kind.clone(),
            Column::IsPaid => p.is_paid.to_string(),
            Column::ExpiryDate => p.expiry_date.clone(),
            Column::CardNumber => p.card_number.clone().unwrap_or_default(),
            Column::Period => p.period.map(|p| p.label().to_owned()).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl std::str::FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace(|c: char| c == '-' || c == '_', "");
        Column::ALL
            .iter()
            .copied()
            .find(|c| {
                c.header() == wanted || format!("{:?}", c).to_lowercase() == wanted
            })
            .ok_or_else(|| format!("unknown column '{}'", s))
    }
}
