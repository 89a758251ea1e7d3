//! Profile summary cards shown above the charts.

use serde::Serialize;

use crate::format::{format_fixed, format_grouped};
use crate::query::DashboardData;

/// One titled value on the profile page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub detail: Option<String>,
}

impl SummaryCard {
    fn new(title: &'static str, value: impl Into<String>) -> Self {
        Self {
            title,
            value: value.into(),
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Build the four cards: user id, username, total XP and audit ratio.
///
/// A missing audit ratio shows as `N/A`.
pub fn profile_summary(data: &DashboardData) -> Vec<SummaryCard> {
    let ratio = data
        .audit
        .ratio
        .map(|r| format_fixed(r, 2))
        .unwrap_or_else(|| "N/A".to_string());

    vec![
        SummaryCard::new("User ID", data.profile.id.to_string()),
        SummaryCard::new("Username", data.profile.login.clone()),
        SummaryCard::new("Total XP", format!("{} XP", format_grouped(data.total_xp as f64))),
        SummaryCard::new("Audit Ratio", ratio).with_detail(format!(
            "Done: {} | Received: {}",
            format_grouped(data.audit.total_up),
            format_grouped(data.audit.total_down)
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Profile;
    use crate::layout::AuditTotals;
    use serde_json::Value;

    fn data(ratio: Option<f64>) -> DashboardData {
        DashboardData {
            profile: Profile {
                id: 4242,
                login: "jdoe".to_string(),
                attrs: Value::Null,
            },
            total_xp: 706_055,
            audit: AuditTotals {
                total_up: 1_234_567.0,
                total_down: 1_000_000.0,
                ratio,
            },
            transactions: Vec::new(),
            piscine: Vec::new(),
        }
    }

    #[test]
    fn cards() {
        let cards = profile_summary(&data(Some(1.2345)));
        let values: Vec<(&str, &str)> = cards.iter().map(|c| (c.title, c.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("User ID", "4242"),
                ("Username", "jdoe"),
                ("Total XP", "706,055 XP"),
                ("Audit Ratio", "1.23"),
            ]
        );
        assert_eq!(
            cards[3].detail.as_deref(),
            Some("Done: 1,234,567 | Received: 1,000,000")
        );
    }

    #[test]
    fn ratio_tie_rounds_up() {
        let cards = profile_summary(&data(Some(1.125)));
        assert_eq!(cards[3].value, "1.13");
    }

    #[test]
    fn missing_ratio() {
        let cards = profile_summary(&data(None));
        assert_eq!(cards[3].value, "N/A");
    }
}
