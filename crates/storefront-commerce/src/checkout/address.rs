//! Shipping address.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Where an order is delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    /// Postal code.
    pub pincode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

impl ShippingAddress {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        pincode: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            pincode: pincode.into(),
            landmark: None,
        }
    }

    /// Check that every required field is present.
    pub fn is_complete(&self) -> bool {
        [&self.street, &self.city, &self.state, &self.pincode]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if !self.is_complete() {
            return Err(CommerceError::Validation(
                "Please provide complete shipping address".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_address() {
        let address = ShippingAddress::new("12 MG Road", "Jaipur", "Rajasthan", "302001");
        assert!(address.validate().is_ok());
        assert!(address.is_complete());
    }

    #[test]
    fn test_blank_field_is_incomplete() {
        let address = ShippingAddress::new("12 MG Road", "  ", "Rajasthan", "302001");
        assert!(!address.is_complete());
        assert!(matches!(
            address.validate(),
            Err(CommerceError::Validation(_))
        ));
    }

    #[test]
    fn test_landmark_is_optional_in_json() {
        let json = r#"{"street":"1 Main","city":"Pune","state":"MH","pincode":"411001"}"#;
        let address: ShippingAddress = serde_json::from_str(json).unwrap();
        assert!(address.landmark.is_none());
    }
}
