use std::{
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// An ISO 4217 currency code, as used by the Monzo API.
///
/// Currencies compare by code, so `Other("GBP")` equals `Gbp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    /// Pound sterling
    Gbp,

    /// United States dollar
    Usd,

    /// Euro
    Eur,

    /// Any other currency code, kept verbatim. Parsing never produces this
    /// for a code with its own variant.
    Other(String),
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl Currency {
    /// The three-letter code
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Gbp => "GBP",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        match code.as_str() {
            "GBP" => Self::Gbp,
            "USD" => Self::Usd,
            "EUR" => Self::Eur,
            _ => Self::Other(code),
        }
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        code.to_string().into()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        match currency {
            Currency::Other(code) => code,
            named => named.code().to_string(),
        }
    }
}

impl FromStr for Currency {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use test_case::test_case;

    use super::Currency;

    #[test_case("\"GBP\"" => Currency::Gbp)]
    #[test_case("\"USD\"" => Currency::Usd)]
    #[test_case("\"EUR\"" => Currency::Eur)]
    #[test_case("\"JPY\"" => Currency::Other("JPY".to_string()))]
    fn deserialise(raw: &str) -> Currency {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn serialises_as_code() {
        assert_eq!(serde_json::to_string(&Currency::Gbp).unwrap(), "\"GBP\"");
        assert_eq!(
            serde_json::to_string(&Currency::Other("CHF".to_string())).unwrap(),
            "\"CHF\""
        );
    }

    #[test]
    fn other_with_a_known_code_is_the_named_currency() {
        let spelled_out = Currency::Other("GBP".to_string());

        assert_eq!(spelled_out, Currency::Gbp);
        assert_ne!(Currency::Other("JPY".to_string()), Currency::Gbp);

        let set: HashSet<_> = [spelled_out, Currency::Gbp].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
