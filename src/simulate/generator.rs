use chrono::{Duration, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::catalog::{self, EventKind};
use crate::domain::Filing;

/// A filing as posted by the simulator: the filing plus a pre-baked summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedFiling {
    pub filing_id: String,
    #[serde(flatten)]
    pub filing: Filing,
    pub summary: String,
}

/// Produces realistic-looking mock 8-K filings.
///
/// Seeded generators make the same event/company/content choices, which keeps
/// tests reproducible; ids, dates and timestamps still follow the clock.
pub struct FilingGenerator {
    rng: StdRng,
}

impl FilingGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    pub fn next_filing(&mut self) -> SimulatedFiling {
        let kind = self.select_event_kind();
        let company = self.pick(catalog::COMPANIES).to_string();
        let date = self.random_date();
        let id = self.filing_id();

        let content = self.content(kind, &date);
        let summary = self.mock_summary(kind);

        let filing = Filing {
            id: id.clone(),
            content,
            company: Some(company),
            date: Some(date),
            event_type: Some(kind.code.to_string()),
            event_description: Some(kind.description.to_string()),
            url: Some(format!(
                "https://www.sec.gov/Archives/edgar/data/{}/{}/000{}.txt",
                self.rng.random_range(0..1_000_000u32),
                id,
                id
            )),
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        };

        SimulatedFiling {
            filing_id: id,
            filing,
            summary,
        }
    }

    /// Weighted pick over [`catalog::EVENT_KINDS`]
    pub fn select_event_kind(&mut self) -> &'static EventKind {
        let total: u32 = catalog::EVENT_KINDS.iter().map(|k| k.weight).sum();
        let mut roll = self.rng.random_range(0..total);

        for kind in catalog::EVENT_KINDS {
            if roll < kind.weight {
                return kind;
            }
            roll -= kind.weight;
        }
        &catalog::EVENT_KINDS[0]
    }

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items[self.rng.random_range(0..items.len())]
    }

    /// Day within the last 30 days, `YYYY-MM-DD`
    fn random_date(&mut self) -> String {
        let days_ago = self.rng.random_range(0..30);
        (Utc::now() - Duration::days(days_ago))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn filing_id(&mut self) -> String {
        format!(
            "{}{:04}",
            Utc::now().timestamp_millis(),
            self.rng.random_range(0..10_000u32)
        )
    }

    fn usd(&mut self, min: u64, span: u64) -> String {
        format_usd(min + self.rng.random_range(0..span))
    }

    fn decimal(&mut self, min: f64, span: f64, places: usize) -> String {
        format!("{:.*}", places, min + self.rng.random::<f64>() * span)
    }

    fn int(&mut self, min: u32, span: u32) -> String {
        (min + self.rng.random_range(0..span)).to_string()
    }

    fn placeholder(&mut self, name: &str, date: &str) -> Option<String> {
        let value = match name {
            "revenue" | "netProceeds" => self.usd(1000, 5000),
            "growth" => self.decimal(-10.0, 50.0, 1),
            "netIncome" | "settlementAmount" => self.usd(100, 1000),
            "eps" => self.decimal(0.0, 5.0, 2),
            "date" => date.to_string(),
            "margin" => self.decimal(10.0, 40.0, 1),
            "cashFlow" | "ebitda" => self.usd(500, 2000),
            "businessUnit" => self.pick(catalog::BUSINESS_UNITS).to_string(),
            "dealValue" => self.usd(500, 10_000),
            "salePrice" | "loanAmount" => self.usd(500, 5000),
            "debtReduction" | "synergies" => self.usd(50, 500),
            "targetCompany" | "previousCompany" | "relatedParty" | "buyer" => {
                self.pick(catalog::COMPANIES).to_string()
            }
            "closingQuarter" => self.pick(catalog::QUARTERS).to_string(),
            "timeframe" => self.pick(catalog::TIMEFRAMES).to_string(),
            "industry" | "market" | "coreBusiness" => self.pick(catalog::INDUSTRIES).to_string(),
            "executiveName" | "previousExecutive" | "interimExecutive" => {
                self.pick(catalog::EXECUTIVE_NAMES).to_string()
            }
            "effectiveDate" | "maturityDate" => self.random_date(),
            "years" => self.int(5, 30),
            "executiveTitle" | "previousRole" => self.pick(catalog::EXECUTIVE_TITLES).to_string(),
            "period" => self.pick(catalog::PERIODS).to_string(),
            "reason" => self.pick(catalog::REASONS).to_string(),
            "controlIssue" => self.pick(catalog::CONTROL_ISSUES).to_string(),
            "affectedLineItems" => self.pick(catalog::LINE_ITEMS).to_string(),
            "adjustmentType" => {
                let kind = if self.rng.random_bool(0.5) { "increase" } else { "decrease" };
                kind.to_string()
            }
            "adjustmentAmount" => self.usd(10, 500),
            "regulatoryAgency" => self.pick(catalog::AGENCIES).to_string(),
            "businessPractice" => self.pick(catalog::BUSINESS_PRACTICES).to_string(),
            "plaintiff" => self.pick(catalog::PLAINTIFFS).to_string(),
            "allegation" => self.pick(catalog::ALLEGATIONS).to_string(),
            "caseName" => self.pick(catalog::CASE_NAMES).to_string(),
            "shares" => self.int(5, 50),
            "price" => self.decimal(10.0, 100.0, 2),
            "purpose" => self.pick(catalog::PURPOSES).to_string(),
            "amount" => self.usd(1000, 50_000),
            "optionPeriod" => self.int(30, 60),
            "additionalShares" => self.int(1, 10),
            "transactionType" => self.pick(catalog::TRANSACTION_TYPES).to_string(),
            "agreementDetails" => self.pick(catalog::AGREEMENT_DETAILS).to_string(),
            "interestRate" => self.decimal(3.0, 10.0, 2),
            "event" => self.pick(catalog::EVENTS).to_string(),
            "metric" => self.pick(catalog::METRICS).to_string(),
            "range" => self.pick(catalog::RANGES).to_string(),
            "topic" => self.pick(catalog::TOPICS).to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Fill a random template for `kind`. Unknown placeholders are left verbatim.
    pub fn content(&mut self, kind: &EventKind, date: &str) -> String {
        let template = self.pick(catalog::templates(kind.code));
        let mut out = String::with_capacity(template.len() + 64);
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match self.placeholder(name, date) {
                        Some(value) => out.push_str(&value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }

    pub fn mock_summary(&mut self, kind: &EventKind) -> String {
        match kind.code {
            "EARNINGS_RELEASE" => format!(
                "The company reported strong quarterly results with revenue of {} million, representing {}% growth year-over-year. Net income was {} million. The company maintained its guidance for the fiscal year.",
                self.usd(1000, 5000),
                self.int(5, 30),
                self.usd(100, 1000)
            ),
            "MERGER_ACQUISITION" => format!(
                "The company announced plans to acquire {} in a deal valued at approximately {} million. The acquisition is expected to close in {} and will expand the company's presence in the {} market.",
                self.pick(catalog::COMPANIES),
                self.usd(500, 10_000),
                self.pick(catalog::QUARTERS),
                self.pick(catalog::INDUSTRIES)
            ),
            "EXECUTIVE_CHANGES" => format!(
                "The company appointed {} as {}. This leadership change is part of the company's succession planning and is not expected to impact the company's strategic direction.",
                self.pick(catalog::EXECUTIVE_NAMES),
                self.pick(catalog::EXECUTIVE_TITLES)
            ),
            "FINANCIAL_STATEMENT" => format!(
                "The company identified the need to restate its financial statements for {} due to {}. The restatement will result in a {} adjustment to previously reported earnings.",
                self.pick(catalog::PERIODS),
                self.pick(catalog::REASONS),
                if self.rng.random_bool(0.5) { "material" } else { "minor" }
            ),
            "LEGAL_PROCEEDINGS" => format!(
                "The company is involved in legal proceedings related to {}. While the outcome is uncertain, management believes the matter will not have a material adverse effect on the company's financial position.",
                self.pick(catalog::BUSINESS_PRACTICES)
            ),
            "SECURITIES_OFFERING" => format!(
                "The company completed a public offering of {} million shares at ${} per share, raising approximately {} million in net proceeds.",
                self.int(5, 50),
                self.decimal(10.0, 100.0, 2),
                self.usd(1000, 5000)
            ),
            "RELATED_PARTY_TRANSACTIONS" => format!(
                "The company engaged in transactions with related parties, including {} with {}. These transactions were approved by the independent members of the Board of Directors.",
                self.pick(catalog::TRANSACTION_TYPES),
                self.pick(catalog::COMPANIES)
            ),
            "REGULATION_FD" => format!(
                "During the {}, the company provided updates on its {}. Management discussed the company's strategic initiatives and reaffirmed its guidance for the fiscal year.",
                self.pick(catalog::EVENTS),
                self.pick(catalog::TOPICS)
            ),
            other => format!("Mock summary for {} event.", other),
        }
    }
}

/// `1234567` -> `$1,234,567`
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
