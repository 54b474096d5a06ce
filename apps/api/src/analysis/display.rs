//! Display-ready derivations of analysis results: chart labels, score bands,
//! verdict markup and company groupings.

use serde::{Deserialize, Serialize};

use crate::analysis::insights::{Company, InsightsResult, RegionDemand};
use crate::analysis::positioning::PositioningResult;
use crate::analysis::roadmap::RoadmapResult;

/// Compact salary label: `4.5M`, `1.2Cr`, `850k`.
///
/// Crore is checked before million so Indian salary scales read naturally.
pub fn format_salary_label(value: f64) -> String {
    if value >= 10_000_000.0 {
        format!("{:.1}Cr", value / 10_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{value}")
    }
}

/// Whether chart values are yearly figures or yearly figures spread over 12 months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryView {
    #[default]
    Annual,
    Monthly,
}

impl SalaryView {
    pub fn caption(self) -> &'static str {
        match self {
            SalaryView::Annual => "Annual Est.",
            SalaryView::Monthly => "Monthly Est.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub display: String,
}

/// Salary trend points in model order. Points without a positive value are
/// dropped; monthly view divides each annual value by 12.
pub fn salary_chart(roadmap: &RoadmapResult, view: SalaryView) -> Vec<ChartPoint> {
    roadmap
        .salary_trends
        .iter()
        .filter_map(|point| {
            let annual = point.value.filter(|v| *v > 0.0)?;
            let value = match view {
                SalaryView::Annual => annual,
                SalaryView::Monthly => annual / 12.0,
            };
            Some(ChartPoint {
                label: point.label.clone().unwrap_or_default(),
                value,
                display: format_salary_label(value),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Pending,
    HighlyStrategic,
    PossibleFit,
    ChallengingFit,
}

impl ScoreBand {
    /// A missing or zero score is still being calculated.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => ScoreBand::Pending,
            Some(s) if s == 0.0 || s.is_nan() => ScoreBand::Pending,
            Some(s) if s >= 80.0 => ScoreBand::HighlyStrategic,
            Some(s) if s >= 60.0 => ScoreBand::PossibleFit,
            Some(_) => ScoreBand::ChallengingFit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Pending => "Calculating...",
            ScoreBand::HighlyStrategic => "Highly Strategic",
            ScoreBand::PossibleFit => "Possible Fit",
            ScoreBand::ChallengingFit => "Challenging Fit",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreBand::Pending => "#27272a",
            ScoreBand::HighlyStrategic => "#10b981",
            ScoreBand::PossibleFit => "#fbbf24",
            ScoreBand::ChallengingFit => "#ef4444",
        }
    }
}

/// Renders the markdown-lite verdict: `**bold**` and line breaks.
///
/// Model text is HTML-escaped first, so only the generated tags are markup.
/// An unmatched `**` is left as literal text.
pub fn verdict_to_html(text: &str) -> String {
    let escaped = escape_html(text);
    let mut out = String::with_capacity(escaped.len() + 32);
    let mut rest = escaped.as_str();

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        match after_open.find("**") {
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push_str("<strong>");
                out.push_str(&after_open[..close]);
                out.push_str("</strong>");
                rest = &after_open[close + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);

    out.replace("\r\n", "\n").replace('\n', "<br/>")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositioningSummary {
    pub band: ScoreBand,
    pub label: &'static str,
    pub color: &'static str,
    pub verdict_html: String,
}

pub fn summarize_positioning(result: &PositioningResult) -> PositioningSummary {
    let band = ScoreBand::from_score(result.readiness_score);
    PositioningSummary {
        band,
        label: band.label(),
        color: band.color(),
        verdict_html: result.verdict.as_deref().map(verdict_to_html).unwrap_or_default(),
    }
}

/// Companies split into the three tiers the insights prompt asks for.
///
/// Matching is by substring because the model paraphrases category names.
/// A company whose category matches none of the tiers is left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyGroups {
    pub global_titans: Vec<Company>,
    pub national_leaders: Vec<Company>,
    pub startups: Vec<Company>,
}

pub fn group_companies(insights: &InsightsResult) -> CompanyGroups {
    CompanyGroups {
        global_titans: companies_in_tier(insights, &["Global", "MNC"]),
        national_leaders: companies_in_tier(insights, &["National", "Domestic"]),
        startups: companies_in_tier(insights, &["Startup", "Growth"]),
    }
}

fn companies_in_tier(insights: &InsightsResult, needles: &[&str]) -> Vec<Company> {
    insights
        .top_companies
        .iter()
        .filter(|company| {
            company
                .category
                .as_deref()
                .map(|category| needles.iter().any(|n| category.contains(n)))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

pub fn is_high_demand(demand: Option<&str>) -> bool {
    demand.map(|d| d.contains("High")).unwrap_or(false)
}

/// Display extras for the insights tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsView {
    pub companies: CompanyGroups,
    pub high_demand_cities: Vec<String>,
    pub high_demand_states: Vec<String>,
}

pub fn insights_view(insights: &InsightsResult) -> InsightsView {
    InsightsView {
        companies: group_companies(insights),
        high_demand_cities: high_demand_locations(&insights.top_cities),
        high_demand_states: high_demand_locations(&insights.top_states),
    }
}

fn high_demand_locations(rows: &[RegionDemand]) -> Vec<String> {
    rows.iter()
        .filter(|row| is_high_demand(row.demand.as_deref()))
        .filter_map(|row| row.location.clone())
        .collect()
}
