//! Static vocabulary for mock 8-K filings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKind {
    pub code: &'static str,
    /// Relative frequency
    pub weight: u32,
    pub description: &'static str,
}

pub const EVENT_KINDS: &[EventKind] = &[
    EventKind { code: "EARNINGS_RELEASE", weight: 25, description: "Quarterly earnings results" },
    EventKind { code: "MERGER_ACQUISITION", weight: 15, description: "Mergers and acquisitions" },
    EventKind { code: "EXECUTIVE_CHANGES", weight: 20, description: "Executive appointments and departures" },
    EventKind { code: "FINANCIAL_STATEMENT", weight: 10, description: "Financial statement restatements" },
    EventKind { code: "LEGAL_PROCEEDINGS", weight: 10, description: "Material legal proceedings" },
    EventKind { code: "SECURITIES_OFFERING", weight: 8, description: "Securities offerings" },
    EventKind { code: "RELATED_PARTY_TRANSACTIONS", weight: 5, description: "Related party transactions" },
    EventKind { code: "REGULATION_FD", weight: 7, description: "Regulation FD disclosures" },
];

pub const COMPANIES: &[&str] = &[
    "TechCorp Inc.", "Global Industries Ltd.", "Innovation Systems", "Data Solutions Group",
    "Future Technologies", "Alpha Manufacturing", "Beta Services", "Gamma Healthcare",
    "Delta Energy", "Epsilon Finance", "Zeta Retail", "Eta Logistics", "Theta Communications",
    "Iota Pharmaceuticals", "Kappa Biotech", "Lambda Software", "Mu Automotive", "Nu Aerospace",
];

/// Content templates; `{name}` marks a placeholder filled at generation time
pub fn templates(code: &str) -> &'static [&'static str] {
    match code {
        "EARNINGS_RELEASE" => &[
            "The company reported quarterly revenue of {revenue} million, representing a {growth}% increase from the same period last year. Net income was {netIncome} million, or {eps} per diluted share. The company also provided guidance for the next quarter.",
            "For the quarter ended {date}, the company achieved record revenue of {revenue} million, driven by strong performance in {businessUnit} segment. Operating margin improved to {margin}%. Cash flow from operations was {cashFlow} million.",
            "The company announced financial results for the fiscal quarter, with revenue of {revenue} million and adjusted EBITDA of {ebitda} million. The company repurchased {shares} million shares during the quarter and maintained its quarterly dividend.",
        ],
        "MERGER_ACQUISITION" => &[
            "The company has entered into a definitive agreement to acquire {targetCompany} for approximately {dealValue} million in cash and stock. The transaction is expected to close in {closingQuarter} and will be accretive to earnings within {timeframe}.",
            "The company announced the completion of its acquisition of {targetCompany}, a leading provider of {industry} solutions. The acquisition strengthens the company's position in {market} and is expected to generate {synergies} million in annual cost synergies.",
            "The company has agreed to sell its {businessUnit} division to {buyer} for {salePrice} million. The divestiture allows the company to focus on its core {coreBusiness} operations and reduces debt by {debtReduction} million.",
        ],
        "EXECUTIVE_CHANGES" => &[
            "The company announced that {executiveName} has been appointed as Chief Executive Officer, effective {effectiveDate}. {executiveName} succeeds {previousExecutive} who is retiring after {years} years of service.",
            "The company's Board of Directors has appointed {executiveName} as Chief Financial Officer. {executiveName} brings {years} years of experience in {industry} finance and previously served as {previousRole} at {previousCompany}.",
            "The company announced the departure of {executiveName}, {executiveTitle}, effective {effectiveDate}. The company has initiated a search for a successor and {interimExecutive} will serve as interim {executiveTitle}.",
        ],
        "FINANCIAL_STATEMENT" => &[
            "The company has determined that its previously issued financial statements for {period} should no longer be relied upon due to {reason}. The company is in the process of restating its financial results to correct the error.",
            "The company has identified material weaknesses in its internal control over financial reporting related to {controlIssue}. Management is implementing remediation plans to address these weaknesses.",
            "The company has revised its financial results for {period} to reflect the correction of an error in the application of accounting principles. The restatement affects {affectedLineItems} and results in a {adjustmentType} of {adjustmentAmount} million.",
        ],
        "LEGAL_PROCEEDINGS" => &[
            "The company has received a subpoena from {regulatoryAgency} regarding its {businessPractice}. The company is cooperating fully with the investigation and cannot predict the outcome at this time.",
            "The company is a defendant in a lawsuit filed by {plaintiff} alleging {allegation}. The company believes the claims are without merit and intends to defend itself vigorously.",
            "The company has reached a settlement in the matter of {caseName} for {settlementAmount} million. The settlement resolves all claims without any admission of wrongdoing.",
        ],
        "SECURITIES_OFFERING" => &[
            "The company has completed an underwritten public offering of {shares} million shares of common stock at a price of {price} per share. The net proceeds of approximately {netProceeds} million will be used for {purpose}.",
            "The company has filed a shelf registration statement with the SEC to register the offering of up to {amount} million of debt and equity securities. The company may offer and sell the securities from time to time.",
            "The company has granted the underwriters an option to purchase up to an additional {additionalShares} million shares of common stock. The option is exercisable for {optionPeriod} days.",
        ],
        "RELATED_PARTY_TRANSACTIONS" => &[
            "The company has entered into a {transactionType} with {relatedParty}, a company controlled by {executiveName}, the company's {executiveTitle}. The transaction was approved by the independent members of the Board of Directors.",
            "The company has amended its agreement with {relatedParty} regarding {agreementDetails}. The amended terms are consistent with arm's length negotiations and reflect current market conditions.",
            "The company has received a loan of {loanAmount} million from {relatedParty} at an interest rate of {interestRate}%. The loan matures on {maturityDate} and is guaranteed by the company's assets.",
        ],
        "REGULATION_FD" => &[
            "The company has made an oral presentation at the {event} conference. A copy of the presentation materials has been posted to the company's investor relations website.",
            "The company has provided updated guidance during its quarterly earnings conference call. The company expects {metric} to be in the range of {range} for the fiscal year.",
            "The company has participated in meetings with investors and analysts. The company discussed its strategic initiatives and provided updates on {topic}.",
        ],
        _ => &["General filing content"],
    }
}

pub const BUSINESS_UNITS: &[&str] = &["North America", "EMEA", "Asia Pacific", "Consumer Division", "Enterprise Division", "Services Division"];
pub const QUARTERS: &[&str] = &["Q1", "Q2", "Q3", "Q4"];
pub const TIMEFRAMES: &[&str] = &["12-18 months", "18-24 months", "24-36 months", "immediately"];
pub const EXECUTIVE_NAMES: &[&str] = &["John Smith", "Jane Doe", "Robert Johnson", "Sarah Wilson", "Michael Brown", "Emily Davis"];
pub const EXECUTIVE_TITLES: &[&str] = &["Chief Executive Officer", "Chief Financial Officer", "Chief Operating Officer", "Chief Technology Officer", "Chief Marketing Officer"];
pub const PERIODS: &[&str] = &["Q1 2024", "Q2 2024", "Q3 2024", "Q4 2024", "FY 2024", "FY 2023"];
pub const REASONS: &[&str] = &["an error in revenue recognition", "incorrect application of accounting principles", "misclassification of expenses", "timing differences in revenue recognition"];
pub const CONTROL_ISSUES: &[&str] = &["inadequate segregation of duties", "insufficient documentation", "lack of proper authorization controls", "inadequate monitoring of financial reporting"];
pub const LINE_ITEMS: &[&str] = &["revenue, cost of goods sold, and operating expenses", "accounts receivable and inventory", "property, plant and equipment", "intangible assets and goodwill"];
pub const AGENCIES: &[&str] = &["SEC", "DOJ", "FTC", "CFTC", "FINRA"];
pub const BUSINESS_PRACTICES: &[&str] = &["sales practices", "accounting procedures", "compliance protocols", "risk management practices"];
pub const PLAINTIFFS: &[&str] = &["a former employee", "a competitor", "a shareholder", "a regulatory body", "a customer"];
pub const ALLEGATIONS: &[&str] = &["breach of contract", "securities fraud", "antitrust violations", "employment discrimination", "intellectual property infringement"];
pub const CASE_NAMES: &[&str] = &["Smith v. Company", "SEC v. Company", "Doe v. Company", "In re Company Securities Litigation"];
pub const PURPOSES: &[&str] = &["general corporate purposes", "debt repayment", "acquisitions", "working capital", "capital expenditures"];
pub const TRANSACTION_TYPES: &[&str] = &["service agreement", "supply contract", "licensing agreement", "joint venture agreement"];
pub const AGREEMENT_DETAILS: &[&str] = &["terms of service for IT infrastructure", "supply of raw materials", "technology licensing", "research and development collaboration"];
pub const EVENTS: &[&str] = &["Annual Investor Conference", "Quarterly Earnings Call", "Industry Symposium", "Analyst Day"];
pub const METRICS: &[&str] = &["revenue growth", "operating margin", "earnings per share", "free cash flow"];
pub const RANGES: &[&str] = &["$1.5B - $1.7B", "12% - 15%", "$2.50 - $2.75", "$500M - $600M"];
pub const TOPICS: &[&str] = &["digital transformation initiatives", "expansion into new markets", "product development roadmap", "operational efficiency improvements"];
pub const INDUSTRIES: &[&str] = &["technology", "healthcare", "financial services", "manufacturing", "retail"];
