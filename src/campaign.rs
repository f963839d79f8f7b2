//! Affiliate campaigns and the campaign id → name lookup.

use std::{collections::HashMap, fmt::Display};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    media::{MediaHost, absolutize_url},
    scalar::{Scalar, string_list},
};

/// A campaign identifier, normalised to its string form.
///
/// The backend sends campaign IDs as numbers in some responses and as strings
/// in others, so IDs are compared by their string rendering: `5`, `5.0` and
/// `"5"` are all the same campaign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    /// Create an ID from its textual form. Surrounding whitespace is ignored.
    pub fn new(id: &str) -> Self {
        Self(id.trim().to_owned())
    }

    /// Parse an ID typed by a user.
    ///
    /// Numeric input is normalised the way numeric JSON IDs are, so `5.0`
    /// and `5` name the same campaign. Anything else is taken literally.
    pub fn parse(text: &str) -> Self {
        text.trim()
            .parse::<serde_json::Number>()
            .ok()
            .and_then(|number| Self::from_scalar(&Scalar::Number(number)))
            .unwrap_or_else(|| Self::new(text))
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_scalar(scalar: &Scalar) -> Option<Self> {
        scalar.as_non_empty_text().map(Self)
    }
}

impl From<i64> for CampaignId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for CampaignId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for CampaignId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let scalar = Scalar::deserialize(deserializer)?;
        CampaignId::from_scalar(&scalar)
            .ok_or_else(|| serde::de::Error::custom("campaign ID must be a number or a string"))
    }
}

/// An affiliate campaign as returned by the campaigns endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCampaign")]
pub struct Campaign {
    /// The campaign ID, missing for malformed records.
    pub id: Option<CampaignId>,
    /// The display name.
    pub name: String,
    /// A free-text description of the campaign.
    pub description: String,
    /// The raw status code, `1` means active.
    pub status: Option<i64>,
    /// How often the affiliate's referral link for this campaign was clicked.
    pub clicks: u64,
    /// Image URLs, possibly relative to the media host.
    pub images_url: Vec<String>,
    /// The affiliate's referral link.
    pub referral_link: Option<String>,
    /// Commission waiting to be confirmed, as reported by the backend.
    pub commission_pending: f64,
    /// Commission already earned, as reported by the backend.
    pub commission_earned: f64,
    /// The discount offered to buyers, in percent.
    pub discount_amount: f64,
}

impl Campaign {
    /// Whether the campaign is currently running.
    pub fn is_active(&self) -> bool {
        self.status == Some(1)
    }

    /// The first campaign image as an absolute URL.
    pub fn hero_image(&self, host: &MediaHost) -> Option<String> {
        self.images_url
            .iter()
            .find(|url| !url.trim().is_empty())
            .map(|url| absolutize_url(url, host))
    }
}

#[derive(Deserialize)]
struct RawCampaign {
    #[serde(default, alias = "id")]
    campaign_id: Option<Scalar>,
    #[serde(default)]
    name: Option<Scalar>,
    #[serde(default)]
    description: Option<Scalar>,
    #[serde(default)]
    status: Option<Scalar>,
    #[serde(default)]
    clicks: Option<Scalar>,
    #[serde(default)]
    images_url: Option<serde_json::Value>,
    #[serde(default)]
    referral_link: Option<Scalar>,
    #[serde(default)]
    commission_pending: Option<Scalar>,
    #[serde(default)]
    commission_earned: Option<Scalar>,
    #[serde(default)]
    discount_amount: Option<Scalar>,
}

impl From<RawCampaign> for Campaign {
    fn from(raw: RawCampaign) -> Self {
        let amount = |scalar: Option<Scalar>| scalar.and_then(|s| s.as_f64()).unwrap_or(0.0);
        let text = |scalar: Option<Scalar>| scalar.and_then(|s| s.as_non_empty_text());

        Self {
            id: raw.campaign_id.as_ref().and_then(CampaignId::from_scalar),
            name: text(raw.name).unwrap_or_default(),
            description: text(raw.description).unwrap_or_default(),
            status: raw.status.and_then(|status| status.as_i64()),
            clicks: raw
                .clicks
                .and_then(|clicks| clicks.as_i64())
                .map_or(0, |clicks| clicks.max(0) as u64),
            images_url: string_list(raw.images_url),
            referral_link: text(raw.referral_link),
            commission_pending: amount(raw.commission_pending),
            commission_earned: amount(raw.commission_earned),
            discount_amount: amount(raw.discount_amount),
        }
    }
}

/// The total number of clicks across `campaigns`.
pub fn total_clicks(campaigns: &[Campaign]) -> u64 {
    campaigns.iter().map(|campaign| campaign.clicks).sum()
}

/// A read-only projection of campaign IDs to display names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignLookup {
    names: HashMap<CampaignId, String>,
}

impl CampaignLookup {
    /// Build the lookup from a campaign list. Campaigns without an ID are
    /// skipped; for duplicate IDs the last campaign wins.
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        campaigns
            .iter()
            .filter_map(|campaign| {
                campaign
                    .id
                    .clone()
                    .map(|id| (id, campaign.name.clone()))
            })
            .collect()
    }

    /// The name of the campaign `id`, if known.
    pub fn name(&self, id: &CampaignId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// The name of the campaign `id`, or an empty string if the ID is missing
    /// or unknown.
    pub fn resolve_name(&self, id: Option<&CampaignId>) -> &str {
        id.and_then(|id| self.name(id)).unwrap_or_default()
    }

    /// The number of campaigns in the lookup.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the lookup has no campaigns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(CampaignId, String)> for CampaignLookup {
    fn from_iter<T: IntoIterator<Item = (CampaignId, String)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::media::MediaHost;

    use super::{Campaign, CampaignId, CampaignLookup, total_clicks};

    fn campaign(value: serde_json::Value) -> Campaign {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn numeric_and_string_ids_are_equal() {
        let numeric: CampaignId = serde_json::from_value(json!(5)).unwrap();
        let text: CampaignId = serde_json::from_value(json!("5")).unwrap();
        let float: CampaignId = serde_json::from_value(json!(5.0)).unwrap();

        assert_eq!(numeric, text);
        assert_eq!(numeric, float);
        assert_eq!(numeric, CampaignId::from(5));
    }

    #[test]
    fn parsed_ids_normalise_numbers() {
        assert_eq!(CampaignId::parse("5.0"), CampaignId::from(5));
        assert_eq!(CampaignId::parse(" 5 "), CampaignId::from(5));
        assert_eq!(CampaignId::parse("007"), CampaignId::new("007"));
        assert_eq!(CampaignId::parse("summer"), CampaignId::new("summer"));
    }

    #[test]
    fn deserializes_campaign_with_missing_fields() {
        let got = campaign(json!({ "campaign_id": "7", "name": "Summer Sale" }));

        assert_eq!(got.id, Some(CampaignId::new("7")));
        assert_eq!(got.name, "Summer Sale");
        assert_eq!(got.clicks, 0);
        assert!(got.images_url.is_empty());
        assert!(!got.is_active());
    }

    #[test]
    fn tolerates_odd_field_types() {
        let got = campaign(json!({
            "campaign_id": 3,
            "name": "Back to school",
            "status": "1",
            "clicks": "42",
            "images_url": "campaign/a.jpg",
            "commission_earned": "12.50",
            "discount_amount": { "unexpected": true },
        }));

        assert!(got.is_active());
        assert_eq!(got.clicks, 42);
        assert_eq!(got.images_url, vec!["campaign/a.jpg"]);
        assert_eq!(got.commission_earned, 12.5);
        assert_eq!(got.discount_amount, 0.0);
    }

    #[test]
    fn hero_image_is_first_image_made_absolute() {
        let host = MediaHost::new("https://example.com").unwrap();
        let got = campaign(json!({
            "campaign_id": 1,
            "images_url": ["", "/media/campaign/a.jpg", "https://cdn.test/b.jpg"],
        }));

        assert_eq!(
            got.hero_image(&host),
            Some("https://example.com/media/campaign/a.jpg".to_owned())
        );
    }

    #[test]
    fn sums_clicks_across_campaigns() {
        let campaigns = vec![
            campaign(json!({ "campaign_id": 1, "clicks": 10 })),
            campaign(json!({ "campaign_id": 2 })),
            campaign(json!({ "campaign_id": 3, "clicks": 5 })),
        ];

        assert_eq!(total_clicks(&campaigns), 15);
    }

    #[test]
    fn lookup_resolves_names_by_normalised_id() {
        let campaigns = vec![
            campaign(json!({ "campaign_id": 5, "name": "Summer Sale" })),
            campaign(json!({ "name": "No ID" })),
        ];

        let lookup = CampaignLookup::from_campaigns(&campaigns);

        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.name(&CampaignId::new("5")), Some("Summer Sale"));
        assert_eq!(lookup.resolve_name(Some(&CampaignId::new("6"))), "");
        assert_eq!(lookup.resolve_name(None), "");
    }
}
