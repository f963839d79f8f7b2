//! Defines the affiliate ledger record and its classifications.

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::{
    campaign::CampaignId,
    scalar::{Scalar, parse_timestamp},
};

// ============================================================================
// CLASSIFICATIONS
// ============================================================================

/// What kind of ledger entry a transaction is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    /// Earnings from a referred purchase, type code `1`.
    Commission,
    /// A payout to the affiliate, type code `2`.
    Withdrawal,
    /// A reversed commission. Reserved, the backend does not send it yet.
    Refund,
    /// Any type the client does not know about.
    Other,
}

/// The direction money moves for a [TransactionKind].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionRole {
    /// Money earned by the affiliate.
    Inbound,
    /// Money paid out to the affiliate.
    Outbound,
    /// Informational entries that do not move the balance.
    Neutral,
}

impl TransactionKind {
    pub(crate) fn from_scalar(scalar: Option<&Scalar>) -> Self {
        let Some(code) = scalar.and_then(Scalar::as_text) else {
            return Self::Other;
        };

        match code.to_ascii_lowercase().as_str() {
            "1" | "commission" => Self::Commission,
            "2" | "withdrawal" => Self::Withdrawal,
            "refund" => Self::Refund,
            _ => Self::Other,
        }
    }

    /// The direction of money for this kind of transaction.
    pub fn role(self) -> TransactionRole {
        match self {
            Self::Commission => TransactionRole::Inbound,
            Self::Withdrawal => TransactionRole::Outbound,
            Self::Refund | Self::Other => TransactionRole::Neutral,
        }
    }
}

/// The processing state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionStatus {
    /// Status code `3`.
    Completed,
    /// Status code `2`.
    Pending,
    /// Missing or unrecognised status.
    Unknown,
}

impl TransactionStatus {
    pub(crate) fn from_scalar(scalar: Option<&Scalar>) -> Self {
        let Some(code) = scalar.and_then(Scalar::as_text) else {
            return Self::Unknown;
        };

        match code.to_ascii_lowercase().as_str() {
            "3" | "completed" => Self::Completed,
            "2" | "pending" => Self::Pending,
            _ => Self::Unknown,
        }
    }

    /// The label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// MODELS
// ============================================================================

/// A customer's name as attached to a commission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerName {
    /// The customer's first name, possibly empty.
    pub first_name: String,
    /// The customer's last name, possibly empty.
    pub last_name: String,
}

impl CustomerName {
    /// Whether neither name is set.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty()
    }
}

/// An entry in the affiliate's ledger: a commission earned or a withdrawal
/// paid out.
///
/// `amount` is always a non-negative magnitude; the direction of the money
/// is given by [Transaction::kind].
///
/// Records are decoded leniently from the backend JSON, see
/// [Transaction::build] for constructing one directly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawTransaction")]
pub struct Transaction {
    /// The backend's transaction ID.
    pub id: Option<String>,
    /// What kind of entry this is.
    pub kind: TransactionKind,
    /// The processing state.
    pub status: TransactionStatus,
    /// The unsigned amount of money.
    pub amount: f64,
    /// The campaign a commission was earned through.
    pub campaign_id: Option<CampaignId>,
    /// The referred buyer a commission was earned from.
    pub buyer_id: Option<String>,
    /// When the transaction was created.
    pub created_at: Option<PrimitiveDateTime>,
    /// When the transaction was last updated.
    pub updated_at: Option<PrimitiveDateTime>,
    /// The buyer's name for commissions.
    pub customer: CustomerName,
    /// The order a commission was earned from.
    pub order_increment_id: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        kind: TransactionKind,
        status: TransactionStatus,
        amount: f64,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction: Transaction {
                id: None,
                kind,
                status,
                amount: amount.abs(),
                campaign_id: None,
                buyer_id: None,
                created_at: None,
                updated_at: None,
                customer: CustomerName::default(),
                order_increment_id: None,
            },
        }
    }

    /// Whether this is a commission.
    pub fn is_commission(&self) -> bool {
        self.kind == TransactionKind::Commission
    }

    /// The date part of [Transaction::created_at].
    pub fn created_on(&self) -> Option<Date> {
        self.created_at.map(|timestamp| timestamp.date())
    }

    /// The update time, only if it differs from the creation time.
    pub fn updated_after_creation(&self) -> Option<PrimitiveDateTime> {
        self.updated_at
            .filter(|updated_at| Some(*updated_at) != self.created_at)
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```
/// use affiliate_insights::transaction::{Transaction, TransactionKind, TransactionStatus};
/// use time::macros::datetime;
///
/// let transaction =
///     Transaction::build(TransactionKind::Commission, TransactionStatus::Completed, 45.0)
///         .campaign_id("5")
///         .buyer_id("buyer-1")
///         .created_at(datetime!(2024-01-15 09:30:00))
///         .finalise();
///
/// assert!(transaction.is_commission());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    transaction: Transaction,
}

impl TransactionBuilder {
    /// Set the backend transaction ID.
    pub fn id(mut self, id: &str) -> Self {
        self.transaction.id = Some(id.to_owned());
        self
    }

    /// Set the campaign ID.
    pub fn campaign_id(mut self, campaign_id: impl Into<CampaignId>) -> Self {
        self.transaction.campaign_id = Some(campaign_id.into());
        self
    }

    /// Set the buyer ID.
    pub fn buyer_id(mut self, buyer_id: &str) -> Self {
        self.transaction.buyer_id = Some(buyer_id.to_owned());
        self
    }

    /// Set the creation time.
    pub fn created_at(mut self, created_at: PrimitiveDateTime) -> Self {
        self.transaction.created_at = Some(created_at);
        self
    }

    /// Set the time of the last update.
    pub fn updated_at(mut self, updated_at: PrimitiveDateTime) -> Self {
        self.transaction.updated_at = Some(updated_at);
        self
    }

    /// Set the buyer's name.
    pub fn customer(mut self, first_name: &str, last_name: &str) -> Self {
        self.transaction.customer = CustomerName {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        };
        self
    }

    /// Set the order the commission was earned from.
    pub fn order_increment_id(mut self, order_increment_id: &str) -> Self {
        self.transaction.order_increment_id = Some(order_increment_id.to_owned());
        self
    }

    /// Build the transaction.
    pub fn finalise(self) -> Transaction {
        self.transaction
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Deserialize)]
struct RawTransaction {
    #[serde(default, alias = "id")]
    transaction_id: Option<Scalar>,
    #[serde(default, rename = "type")]
    kind: Option<Scalar>,
    #[serde(default)]
    status: Option<Scalar>,
    #[serde(default)]
    amount: Option<Scalar>,
    #[serde(default)]
    campaign_id: Option<Scalar>,
    #[serde(default)]
    buyer_id: Option<Scalar>,
    #[serde(default)]
    created_at: Option<Scalar>,
    #[serde(default)]
    updated_at: Option<Scalar>,
    #[serde(default)]
    customer_firstname: Option<Scalar>,
    #[serde(default)]
    customer_lastname: Option<Scalar>,
    #[serde(default)]
    extension_attributes: Option<serde_json::Value>,
    #[serde(default)]
    order_increment_id: Option<Scalar>,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        let text = |scalar: &Option<Scalar>| scalar.as_ref().and_then(Scalar::as_non_empty_text);
        let timestamp =
            |scalar: &Option<Scalar>| text(scalar).and_then(|text| parse_timestamp(&text));
        let extension = |key: &str| {
            raw.extension_attributes
                .as_ref()
                .and_then(|attributes| attributes.get(key))
                .and_then(|value| value.as_str())
                .map(|name| name.trim().to_owned())
                .filter(|name| !name.is_empty())
        };

        let customer = CustomerName {
            first_name: text(&raw.customer_firstname)
                .or_else(|| extension("customer_firstname"))
                .unwrap_or_default(),
            last_name: text(&raw.customer_lastname)
                .or_else(|| extension("customer_lastname"))
                .unwrap_or_default(),
        };

        Self {
            id: text(&raw.transaction_id),
            kind: TransactionKind::from_scalar(raw.kind.as_ref()),
            status: TransactionStatus::from_scalar(raw.status.as_ref()),
            amount: raw
                .amount
                .as_ref()
                .and_then(Scalar::as_f64)
                .map_or(0.0, f64::abs),
            campaign_id: raw.campaign_id.as_ref().and_then(CampaignId::from_scalar),
            buyer_id: text(&raw.buyer_id),
            created_at: timestamp(&raw.created_at),
            updated_at: timestamp(&raw.updated_at),
            customer,
            order_increment_id: text(&raw.order_increment_id),
        }
    }
}
