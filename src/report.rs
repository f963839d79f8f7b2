//! Reports built from records exported from the affiliate backend.
//!
//! The exports are JSON files holding either a bare list of records or the
//! backend's `{"items": [...]}` envelope.

use std::path::Path;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use time::{Date, macros::format_description};

use crate::{
    Error,
    banner::Banner,
    campaign::{Campaign, CampaignId, CampaignLookup, total_clicks},
    format::{format_money, format_timestamp},
    media::{MediaHost, MediaUrlSet, rebase_origin},
    transaction::{
        CampaignTotal, CommissionSummary, KindTotals, MonthlyTotal, StatusTotals, Transaction,
        TransactionFilter, TransactionKind, TypeFilter, WindowPreset, WindowRange,
        commission_by_campaign, commission_by_month, commission_summary, compute_window_range,
        describe, filter_by_campaign, signed_amount, totals_by_kind, totals_by_status,
    },
    withdrawal::{WithdrawalRecord, WithdrawalTotals, withdrawal_totals},
};

// ============================================================================
// LOADING
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Collection<T> {
    List(Vec<T>),
    Envelope { items: Vec<T> },
}

/// Decode a list of records from JSON text.
///
/// # Errors
///
/// Returns [Error::JSONDeserializationError] if `json` is neither a list nor
/// an object with an `items` list.
pub fn parse_records<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, Error> {
    let collection: Collection<T> = serde_json::from_str(json).map_err(|error| {
        Error::JSONDeserializationError(format!(
            "expected a list of records or an object with an \"items\" list: {error}"
        ))
    })?;

    Ok(match collection {
        Collection::List(items) | Collection::Envelope { items } => items,
    })
}

/// Read a list of records from a JSON file.
///
/// # Errors
///
/// Returns [Error::IoError] if the file cannot be read, or
/// [Error::JSONDeserializationError] if it does not hold a list of records.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Error> {
    let json = std::fs::read_to_string(path)
        .map_err(|error| Error::IoError(format!("{}: {error}", path.display())))?;

    let records = parse_records(&json)?;
    tracing::debug!("Read {} records from {}", records.len(), path.display());

    Ok(records)
}

/// Parse a `YYYY-MM-DD` date given on the command line.
///
/// # Errors
///
/// Returns [Error::InvalidDate] holding the input if it is not a valid date.
pub fn parse_anchor_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

// ============================================================================
// TRANSACTIONS
// ============================================================================

/// What the transaction report should show.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Only list commissions earned through this campaign.
    pub campaign_id: Option<CampaignId>,
    /// Free text matched against campaign names.
    pub query: String,
    /// Which kinds of transaction to list.
    pub kind: TypeFilter,
    /// Only list transactions created in this window around `today`.
    pub window: Option<WindowPreset>,
    /// The reference date for "this month" and for the window.
    pub today: Date,
}

/// The window the listed transactions were restricted to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportWindow {
    /// The kind of window.
    pub preset: WindowPreset,
    /// A human readable label for the window.
    pub label: String,
    /// The dates covered by the window.
    #[serde(flatten)]
    pub range: WindowRange,
}

/// A transaction ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRow {
    /// The backend's transaction ID.
    pub id: Option<String>,
    /// The kind of transaction.
    pub kind: TransactionKind,
    /// The signed amount with currency, e.g. `+45.00 DT`.
    pub amount: String,
    /// A one-line description.
    pub description: String,
    /// The campaign name, empty when unknown.
    pub campaign: String,
    /// The status label.
    pub status: &'static str,
    /// When the transaction was created, as `YYYY/MM/DD HH:MM`.
    pub created_at: Option<String>,
    /// When the transaction was last updated, if after creation.
    pub updated_at: Option<String>,
}

impl TransactionRow {
    /// Prepare `transaction` for display.
    pub fn new(transaction: &Transaction, lookup: &CampaignLookup, currency: &str) -> Self {
        Self {
            id: transaction.id.clone(),
            kind: transaction.kind,
            amount: signed_amount(transaction).with_currency(currency),
            description: describe(transaction),
            campaign: lookup
                .resolve_name(transaction.campaign_id.as_ref())
                .to_owned(),
            status: transaction.status.label(),
            created_at: transaction.created_at.map(format_timestamp),
            updated_at: transaction.updated_after_creation().map(format_timestamp),
        }
    }
}

/// Display strings for the headline figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDisplay {
    /// Completed commissions.
    pub total_earned: String,
    /// Commissions waiting to be confirmed.
    pub pending: String,
    /// Completed commissions this month.
    pub this_month: String,
    /// What the affiliate can still withdraw.
    pub available_balance: String,
}

impl SummaryDisplay {
    fn new(summary: &CommissionSummary, currency: &str) -> Self {
        Self {
            total_earned: format_money(summary.total_earned, currency),
            pending: format_money(summary.pending, currency),
            this_month: format_money(summary.this_month, currency),
            available_balance: format_money(summary.available_balance, currency),
        }
    }
}

/// Everything the commissions page shows.
///
/// The summary and the totals cover the whole ledger; only
/// [TransactionReport::transactions] is narrowed down by [ReportOptions].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionReport {
    /// The reference date.
    pub today: Date,
    /// The headline figures.
    pub summary: CommissionSummary,
    /// The headline figures formatted for display.
    pub summary_display: SummaryDisplay,
    /// Amounts by direction of money.
    pub totals_by_kind: KindTotals,
    /// Amounts by processing state.
    pub totals_by_status: StatusTotals,
    /// Completed commission per month.
    pub commission_by_month: Vec<MonthlyTotal>,
    /// Completed commission per campaign.
    pub commission_by_campaign: Vec<CampaignTotal>,
    /// Clicks across all campaigns.
    pub total_clicks: u64,
    /// How many campaigns are running.
    pub active_campaigns: usize,
    /// The window the listed transactions were restricted to.
    pub window: Option<ReportWindow>,
    /// The transactions that passed the filters, in their original order.
    pub transactions: Vec<TransactionRow>,
}

/// Build the commissions report.
pub fn build_transaction_report(
    transactions: &[Transaction],
    campaigns: &[Campaign],
    options: &ReportOptions,
    currency: &str,
) -> TransactionReport {
    let lookup = CampaignLookup::from_campaigns(campaigns);

    let window = options.window.map(|preset| {
        let range = compute_window_range(preset, options.today);

        ReportWindow {
            preset,
            label: range.label(),
            range,
        }
    });

    let filter = TransactionFilter {
        query: options.query.clone(),
        kind: options.kind,
        window: window.as_ref().map(|window| window.range),
    };

    let candidates: Vec<&Transaction> = match &options.campaign_id {
        Some(campaign_id) => filter_by_campaign(transactions, campaign_id),
        None => transactions.iter().collect(),
    };

    let rows: Vec<TransactionRow> = candidates
        .into_iter()
        .filter(|transaction| filter.matches(transaction, &lookup))
        .map(|transaction| TransactionRow::new(transaction, &lookup, currency))
        .collect();

    tracing::debug!(
        "Listing {} of {} transactions",
        rows.len(),
        transactions.len()
    );

    let summary = commission_summary(transactions, options.today);

    TransactionReport {
        today: options.today,
        summary_display: SummaryDisplay::new(&summary, currency),
        summary,
        totals_by_kind: totals_by_kind(transactions),
        totals_by_status: totals_by_status(transactions),
        commission_by_month: commission_by_month(transactions),
        commission_by_campaign: commission_by_campaign(transactions, &lookup),
        total_clicks: total_clicks(campaigns),
        active_campaigns: campaigns.iter().filter(|c| c.is_active()).count(),
        window,
        transactions: rows,
    }
}

// ============================================================================
// WITHDRAWALS
// ============================================================================

/// A withdrawal request ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalRow {
    /// The backend's withdrawal ID.
    pub id: Option<String>,
    /// The amount with currency.
    pub amount: String,
    /// The status label.
    pub status: &'static str,
    /// How the money is paid out.
    pub payment_method: Option<String>,
    /// The affiliate's note.
    pub description: Option<String>,
    /// The request date as `YYYY/MM/DD`.
    pub date: String,
}

/// The withdrawal history page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalReport {
    /// Amounts by state.
    pub totals: WithdrawalTotals,
    /// The requests, in their original order.
    pub withdrawals: Vec<WithdrawalRow>,
}

/// Build the withdrawal history report.
pub fn build_withdrawal_report(records: &[WithdrawalRecord], currency: &str) -> WithdrawalReport {
    let withdrawals = records
        .iter()
        .map(|record| WithdrawalRow {
            id: record.id.clone(),
            amount: format_money(record.amount, currency),
            status: record.status.label(),
            payment_method: record.payment_method.clone(),
            description: record.description.clone(),
            date: record.display_date(),
        })
        .collect();

    WithdrawalReport {
        totals: withdrawal_totals(records),
        withdrawals,
    }
}

// ============================================================================
// BANNERS
// ============================================================================

/// The images of one banner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerImages {
    /// The backend's banner ID.
    pub id: Option<String>,
    /// The banner's title.
    pub title: String,
    /// Absolute image URLs without duplicates.
    pub images: Vec<String>,
}

/// Resolve the images of every banner.
///
/// If `upstream_origin` is given, URLs on that origin are moved onto `host`.
pub fn banner_images(
    banners: &[Banner],
    host: &MediaHost,
    upstream_origin: Option<&str>,
) -> Vec<BannerImages> {
    banners
        .iter()
        .map(|banner| {
            let images = banner.image_urls(host);

            BannerImages {
                id: banner.id.clone(),
                title: banner.title.clone(),
                images: match upstream_origin {
                    Some(origin) => rebase_urls(images, origin, host),
                    None => images,
                },
            }
        })
        .collect()
}

/// Move every URL served from `upstream_origin` onto `host`, dropping
/// URLs that become duplicates.
pub fn rebase_urls(urls: Vec<String>, upstream_origin: &str, host: &MediaHost) -> Vec<String> {
    let mut rebased = MediaUrlSet::new();

    for url in urls {
        rebased.insert(rebase_origin(&url, upstream_origin, host));
    }

    rebased.into_vec()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        banner::Banner,
        campaign::{Campaign, CampaignId},
        media::MediaHost,
        transaction::{Transaction, TransactionKind, TransactionStatus, TypeFilter, WindowPreset},
        withdrawal::WithdrawalRecord,
    };

    use super::{
        ReportOptions, banner_images, build_transaction_report, build_withdrawal_report,
        parse_anchor_date, parse_records, rebase_urls,
    };

    fn options() -> ReportOptions {
        ReportOptions {
            campaign_id: None,
            query: String::new(),
            kind: TypeFilter::All,
            window: None,
            today: date!(2024 - 01 - 20),
        }
    }

    fn campaigns() -> Vec<Campaign> {
        parse_records(
            r#"[
                {"campaign_id": 5, "name": "Summer Sale", "status": 1, "clicks": 10},
                {"campaign_id": "6", "name": "Winter Sale", "status": 0, "clicks": 4}
            ]"#,
        )
        .unwrap()
    }

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction::build(TransactionKind::Commission, TransactionStatus::Completed, 30.0)
                .id("1")
                .campaign_id("5")
                .buyer_id("A")
                .customer("Jane", "Doe")
                .created_at(datetime!(2024-01-15 10:00:00))
                .finalise(),
            Transaction::build(TransactionKind::Commission, TransactionStatus::Completed, 15.0)
                .id("2")
                .campaign_id("6")
                .buyer_id("B")
                .created_at(datetime!(2023-12-31 23:59:00))
                .finalise(),
            Transaction::build(TransactionKind::Withdrawal, TransactionStatus::Pending, 10.0)
                .id("3")
                .created_at(datetime!(2024-01-18 08:00:00))
                .updated_at(datetime!(2024-01-19 08:00:00))
                .finalise(),
        ]
    }

    #[test]
    fn accepts_bare_lists_and_envelopes() {
        let bare: Vec<WithdrawalRecord> = parse_records(r#"[{"amount": 1}]"#).unwrap();
        let envelope: Vec<WithdrawalRecord> =
            parse_records(r#"{"items": [{"amount": 1}, {"amount": 2}]}"#).unwrap();

        assert_eq!(bare.len(), 1);
        assert_eq!(envelope.len(), 2);
    }

    #[test]
    fn rejects_other_json_shapes() {
        let got = parse_records::<WithdrawalRecord>(r#"{"total_count": 0}"#);

        assert!(matches!(got, Err(Error::JSONDeserializationError(_))));
    }

    #[test]
    fn parses_anchor_dates() {
        assert_eq!(parse_anchor_date("2024-02-29"), Ok(date!(2024 - 02 - 29)));
        assert_eq!(
            parse_anchor_date("29/02/2024"),
            Err(Error::InvalidDate("29/02/2024".to_owned()))
        );
    }

    #[test]
    fn report_lists_every_transaction_without_filters() {
        let report = build_transaction_report(&transactions(), &campaigns(), &options(), "DT");

        assert_eq!(report.transactions.len(), 3);
        assert_eq!(report.summary.this_month, 30.0);
        assert_eq!(report.summary.active_referrals, 2);
        assert_eq!(report.summary.available_balance, 35.0);
        assert_eq!(report.summary_display.available_balance, "35.00 DT");
        assert_eq!(report.total_clicks, 14);
        assert_eq!(report.active_campaigns, 1);
        assert_eq!(report.commission_by_month.len(), 2);
    }

    #[test]
    fn rows_are_ready_for_display() {
        let report = build_transaction_report(&transactions(), &campaigns(), &options(), "DT");

        let commission = &report.transactions[0];
        assert_eq!(commission.amount, "+30.00 DT");
        assert_eq!(commission.campaign, "Summer Sale");
        assert_eq!(commission.description, "Commission earned from Jane Doe's order");
        assert_eq!(commission.status, "Completed");
        assert_eq!(commission.created_at.as_deref(), Some("2024/01/15 10:00"));
        assert_eq!(commission.updated_at, None);

        let withdrawal = &report.transactions[2];
        assert_eq!(withdrawal.amount, "-10.00 DT");
        assert_eq!(withdrawal.campaign, "");
        assert_eq!(withdrawal.updated_at.as_deref(), Some("2024/01/19 08:00"));
    }

    #[test]
    fn window_restricts_rows_but_not_totals() {
        let options = ReportOptions {
            window: Some(WindowPreset::Month),
            ..options()
        };

        let report = build_transaction_report(&transactions(), &campaigns(), &options, "DT");

        let ids: Vec<_> = report
            .transactions
            .iter()
            .map(|row| row.id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(report.summary.total_earned, 45.0);
        assert_eq!(report.window.unwrap().range.start, date!(2024 - 01 - 01));
    }

    #[test]
    fn campaign_and_query_narrow_rows() {
        let by_campaign = ReportOptions {
            campaign_id: Some(CampaignId::parse("6.0")),
            ..options()
        };
        let report = build_transaction_report(&transactions(), &campaigns(), &by_campaign, "DT");
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].id.as_deref(), Some("2"));

        let by_query = ReportOptions {
            query: "summer".to_owned(),
            kind: TypeFilter::Commission,
            ..options()
        };
        let report = build_transaction_report(&transactions(), &campaigns(), &by_query, "DT");
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = build_transaction_report(&transactions(), &campaigns(), &options(), "DT");

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["today"], json!("2024-01-20"));
        assert_eq!(value["transactions"][0]["kind"], json!("commission"));
        assert_eq!(value["transactions"][0]["amount"], json!("+30.00 DT"));
    }

    #[test]
    fn withdrawal_report_formats_rows() {
        let records: Vec<WithdrawalRecord> = parse_records(
            r#"[
                {
                    "withdraw_id": 1,
                    "amount": "120",
                    "status": 1,
                    "created_at": "2024-01-02 10:00:00"
                },
                {"withdraw_id": 2, "amount": 30, "status": 0}
            ]"#,
        )
        .unwrap();

        let report = build_withdrawal_report(&records, "DT");

        assert_eq!(report.totals.completed, 120.0);
        assert_eq!(report.totals.pending, 30.0);
        assert_eq!(report.withdrawals[0].amount, "120.00 DT");
        assert_eq!(report.withdrawals[0].status, "Completed");
        assert_eq!(report.withdrawals[0].date, "2024/01/02");
        assert_eq!(report.withdrawals[1].date, "");
    }

    #[test]
    fn banner_images_are_rebased_onto_media_host() {
        let host = MediaHost::new("https://cdn.example.com").unwrap();
        let banners: Vec<Banner> = serde_json::from_value(json!([
            {
                "banner_id": 1,
                "title": "Hero",
                "content": r#"<img src="https://magento.test/media/a.jpg"> {{media url="b.jpg"}}"#,
            }
        ]))
        .unwrap();

        let got = banner_images(&banners, &host, Some("https://magento.test"));

        assert_eq!(got[0].title, "Hero");
        assert_eq!(
            got[0].images,
            vec![
                "https://cdn.example.com/media/b.jpg",
                "https://cdn.example.com/media/a.jpg",
            ]
        );
    }

    #[test]
    fn rebasing_drops_urls_that_become_duplicates() {
        let host = MediaHost::new("https://cdn.example.com").unwrap();
        let urls = vec![
            "https://cdn.example.com/media/a.jpg".to_owned(),
            "https://other.test/b.jpg".to_owned(),
            "https://magento.test/media/a.jpg".to_owned(),
        ];

        assert_eq!(
            rebase_urls(urls, "https://magento.test/", &host),
            vec![
                "https://cdn.example.com/media/a.jpg",
                "https://other.test/b.jpg",
            ]
        );
    }
}
