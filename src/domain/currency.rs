//! USD → INR conversion against the RBI reference and a bank card rate.

use serde::{Deserialize, Serialize};

use super::numeric::parse_number;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub usd_inr: f64,
    pub date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub rbi: RateQuote,
    pub bank: RateQuote,
    pub last_updated: Option<String>,
}

impl ExchangeRates {
    /// Indicative rates shown when the live feed cannot be reached.
    pub fn fallback() -> Self {
        Self {
            rbi: RateQuote {
                usd_inr: 83.12,
                date: Some("2024-02-03".to_string()),
            },
            bank: RateQuote {
                usd_inr: 83.95,
                date: Some("2024-02-03".to_string()),
            },
            last_updated: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conversion {
    pub amount_usd: f64,
    pub rbi_value: f64,
    pub bank_value: f64,
    pub difference: f64,
    pub markup_pct: f64,
}

/// Converts a user-typed amount; malformed input converts as zero.
pub fn convert(amount: &str, rates: &ExchangeRates) -> Conversion {
    let amount_usd = parse_number(amount);
    let rbi_rate = rates.rbi.usd_inr;
    let bank_rate = rates.bank.usd_inr;

    let rbi_value = amount_usd * rbi_rate;
    let bank_value = amount_usd * bank_rate;
    let markup_pct = if rbi_rate > 0.0 {
        (bank_rate - rbi_rate) / rbi_rate * 100.0
    } else {
        0.0
    };

    Conversion {
        amount_usd,
        rbi_value,
        bank_value,
        difference: bank_value - rbi_value,
        markup_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(rbi: f64, bank: f64) -> ExchangeRates {
        ExchangeRates {
            rbi: RateQuote {
                usd_inr: rbi,
                date: None,
            },
            bank: RateQuote {
                usd_inr: bank,
                date: None,
            },
            last_updated: None,
        }
    }

    #[test]
    fn compares_bank_against_reference() {
        let conversion = convert("10", &rates(80.0, 84.0));
        assert_eq!(conversion.rbi_value, 800.0);
        assert_eq!(conversion.bank_value, 840.0);
        assert_eq!(conversion.difference, 40.0);
        assert!((conversion.markup_pct - 5.0).abs() < 1e-9);
    }

    #[test]
    fn missing_reference_rate_has_no_markup() {
        let conversion = convert("1,000", &rates(0.0, 84.0));
        assert_eq!(conversion.amount_usd, 1000.0);
        assert_eq!(conversion.markup_pct, 0.0);
        assert_eq!(convert("lots", &rates(80.0, 84.0)).bank_value, 0.0);
    }
}
