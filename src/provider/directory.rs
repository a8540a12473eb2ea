//! Searchable directory of popular symbols for suggestion lookups

use serde::Serialize;

/// How a suggestion matched the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Symbol,
    Company,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockSuggestion {
    pub symbol: &'static str,
    pub company_name: &'static str,
    pub match_type: MatchType,
}

/// Popular symbols offered as search suggestions
pub static POPULAR_STOCKS: &[(&str, &str)] = &[
    // Technology
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc. Class A"),
    ("GOOG", "Alphabet Inc. Class C"),
    ("AMZN", "Amazon.com Inc."),
    ("TSLA", "Tesla Inc."),
    ("META", "Meta Platforms Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("NFLX", "Netflix Inc."),
    ("ORCL", "Oracle Corporation"),
    ("ADBE", "Adobe Inc."),
    ("CRM", "Salesforce Inc."),
    ("INTC", "Intel Corporation"),
    ("AMD", "Advanced Micro Devices Inc."),
    ("IBM", "International Business Machines Corporation"),
    // Financial
    ("JPM", "JPMorgan Chase & Co."),
    ("BAC", "Bank of America Corporation"),
    ("WFC", "Wells Fargo & Company"),
    ("GS", "The Goldman Sachs Group Inc."),
    ("MS", "Morgan Stanley"),
    ("C", "Citigroup Inc."),
    ("BRK.A", "Berkshire Hathaway Inc. Class A"),
    ("BRK.B", "Berkshire Hathaway Inc. Class B"),
    ("V", "Visa Inc."),
    ("MA", "Mastercard Incorporated"),
    ("PYPL", "PayPal Holdings Inc."),
    ("AXP", "American Express Company"),
    // Healthcare
    ("JNJ", "Johnson & Johnson"),
    ("PFE", "Pfizer Inc."),
    ("UNH", "UnitedHealth Group Incorporated"),
    ("ABBV", "AbbVie Inc."),
    ("TMO", "Thermo Fisher Scientific Inc."),
    ("ABT", "Abbott Laboratories"),
    ("DHR", "Danaher Corporation"),
    ("BMY", "Bristol-Myers Squibb Company"),
    ("LLY", "Eli Lilly and Company"),
    ("MRK", "Merck & Co. Inc."),
    // Consumer
    ("WMT", "Walmart Inc."),
    ("PG", "The Procter & Gamble Company"),
    ("KO", "The Coca-Cola Company"),
    ("PEP", "PepsiCo Inc."),
    ("NKE", "NIKE Inc."),
    ("MCD", "McDonald's Corporation"),
    ("SBUX", "Starbucks Corporation"),
    ("HD", "The Home Depot Inc."),
    ("TGT", "Target Corporation"),
    ("COST", "Costco Wholesale Corporation"),
    // Energy
    ("XOM", "Exxon Mobil Corporation"),
    ("CVX", "Chevron Corporation"),
    ("COP", "ConocoPhillips"),
    ("SLB", "Schlumberger Limited"),
    ("EOG", "EOG Resources Inc."),
    // Industrial
    ("BA", "The Boeing Company"),
    ("GE", "General Electric Company"),
    ("CAT", "Caterpillar Inc."),
    ("MMM", "3M Company"),
    ("HON", "Honeywell International Inc."),
    // Telecommunications
    ("VZ", "Verizon Communications Inc."),
    ("T", "AT&T Inc."),
    ("TMUS", "T-Mobile US Inc."),
    // Real Estate
    ("AMT", "American Tower Corporation"),
    ("PLD", "Prologis Inc."),
    ("CCI", "Crown Castle International Corp."),
];

/// Search the directory: exact symbol first, then symbol prefixes, then
/// company-name substrings. Results are capped at `limit`.
pub fn search_suggestions(query: &str, limit: usize) -> Vec<StockSuggestion> {
    let query_upper = query.trim().to_uppercase();
    let query_lower = query.trim().to_lowercase();
    if query_upper.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut suggestions: Vec<StockSuggestion> = Vec::new();
    let mut push = |symbol: &'static str, name: &'static str, match_type: MatchType| {
        if !suggestions.iter().any(|s| s.symbol == symbol) {
            suggestions.push(StockSuggestion {
                symbol,
                company_name: name,
                match_type,
            });
        }
    };

    for (symbol, name) in POPULAR_STOCKS {
        if *symbol == query_upper {
            push(symbol, name, MatchType::Symbol);
        }
    }
    for (symbol, name) in POPULAR_STOCKS {
        if symbol.starts_with(&query_upper) {
            push(symbol, name, MatchType::Symbol);
        }
    }
    for (symbol, name) in POPULAR_STOCKS {
        if name.to_lowercase().contains(&query_lower) {
            push(symbol, name, MatchType::Company);
        }
    }

    suggestions.truncate(limit);
    suggestions
}
