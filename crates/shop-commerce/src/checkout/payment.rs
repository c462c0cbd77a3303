//! Payment method selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The payment method the shopper picked.
///
/// Stored and sent to the backend as a bare string; `"COD"` is cash on
/// delivery, anything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    Other(String),
}

impl PaymentMethod {
    /// Wire code for cash on delivery.
    pub const COD: &'static str = "COD";

    /// The identifier sent to the backend.
    pub fn code(&self) -> &str {
        match self {
            PaymentMethod::CashOnDelivery => Self::COD,
            PaymentMethod::Other(code) => code,
        }
    }

    /// Label for display.
    pub fn display_name(&self) -> &str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on delivery",
            PaymentMethod::Other(code) => code,
        }
    }

    /// A blank identifier counts as no selection.
    pub fn is_selected(&self) -> bool {
        !self.code().trim().is_empty()
    }
}

impl From<String> for PaymentMethod {
    fn from(code: String) -> Self {
        if code == Self::COD {
            PaymentMethod::CashOnDelivery
        } else {
            PaymentMethod::Other(code)
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(code: &str) -> Self {
        Self::from(code.to_string())
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::CashOnDelivery => PaymentMethod::COD.to_string(),
            PaymentMethod::Other(code) => code,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cod() {
        let method = PaymentMethod::default();
        assert_eq!(method.code(), "COD");
        assert!(method.is_selected());
        assert_eq!(serde_json::to_string(&method).unwrap(), r#""COD""#);
    }

    #[test]
    fn test_other_methods_pass_through() {
        let method: PaymentMethod = serde_json::from_str(r#""bKash""#).unwrap();
        assert_eq!(method, PaymentMethod::Other("bKash".into()));
        let cod: PaymentMethod = serde_json::from_str(r#""COD""#).unwrap();
        assert_eq!(cod, PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_blank_is_not_selected() {
        assert!(!PaymentMethod::from("   ").is_selected());
        assert!(!PaymentMethod::from("").is_selected());
    }
}
