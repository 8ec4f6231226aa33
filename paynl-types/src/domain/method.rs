//! Payment methods and iDEAL banks.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A payment method offered by the service (iDEAL, credit card, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentMethod {
    /// Provider identifier of the payment option
    #[schema(example = "10")]
    pub id: String,
    /// Display name
    #[schema(example = "iDEAL")]
    pub name: String,
    /// Name shown to end users, when the provider sends one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_name: Option<String>,
}

impl PaymentMethod {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible_name: None,
        }
    }
}

/// An issuing bank selectable for iDEAL payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Bank {
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = "ABN Amro")]
    pub name: String,
}

impl Bank {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Bank identifier to bank name, in the order the provider ranks them.
pub type BankList = IndexMap<String, String>;

/// Collapses a bank listing into an id to name map.
///
/// When the provider repeats an id, the last name wins and the first
/// position is kept.
pub fn pluck_names(banks: impl IntoIterator<Item = Bank>) -> BankList {
    banks.into_iter().map(|b| (b.id, b.name)).collect()
}
