//! Contact details, delivery addresses and customer placement.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest accepted phone number, in digits.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Longest accepted phone number, in digits.
pub const MAX_PHONE_DIGITS: usize = 15;

/// Invalid contact or delivery details.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    /// Contact name was blank.
    #[error("please enter your name")]
    MissingName,

    /// Email does not look like an address.
    #[error("please enter a valid email address")]
    InvalidEmail,

    /// Phone number has the wrong number of digits or stray characters.
    #[error("please enter a valid phone number of {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits")]
    InvalidPhone,

    /// Address has no street line.
    #[error("please enter a street address")]
    MissingStreet,

    /// Address has no city.
    #[error("please enter a city")]
    MissingCity,

    /// Address has no postal code.
    #[error("please enter a postal code")]
    MissingPostalCode,

    /// College customers must say which hostel to deliver to.
    #[error("please choose a hostel for college delivery")]
    MissingHostel,
}

impl ContactError {
    /// Name of the offending request field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingName => "contactInfo.name",
            Self::InvalidEmail => "contactInfo.email",
            Self::InvalidPhone => "contactInfo.phone",
            Self::MissingStreet => "deliveryAddress.street",
            Self::MissingCity => "deliveryAddress.city",
            Self::MissingPostalCode => "deliveryAddress.postalCode",
            Self::MissingHostel => "hostel",
        }
    }
}

/// Trim and lower-case an email address.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate and normalise an email address.
///
/// # Errors
///
/// Returns [`ContactError::InvalidEmail`] unless the address has a single `@` with a
/// non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<String, ContactError> {
    let email = normalize_email(email);

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ContactError::InvalidEmail);
    };

    let domain_ok = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');

    if local.is_empty() || !domain_ok || domain.contains('@') || email.contains(char::is_whitespace)
    {
        return Err(ContactError::InvalidEmail);
    }

    Ok(email)
}

/// Strip separators from a phone number and check its length.
///
/// Spaces, dashes, dots and parentheses are dropped; a single leading `+` is kept.
///
/// # Errors
///
/// Returns [`ContactError::InvalidPhone`] for any other character or a digit count outside
/// [`MIN_PHONE_DIGITS`]..=[`MAX_PHONE_DIGITS`].
pub fn normalize_phone(phone: &str) -> Result<String, ContactError> {
    let trimmed = phone.trim();
    let (plus, rest) = trimmed
        .strip_prefix('+')
        .map_or(("", trimmed), |rest| ("+", rest));

    let mut digits = String::with_capacity(rest.len());

    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(ContactError::InvalidPhone),
        }
    }

    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return Err(ContactError::InvalidPhone);
    }

    Ok(format!("{plus}{digits}"))
}

/// Who to call about an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Full name.
    pub name: String,

    /// Email address; also the guest identity key.
    pub email: String,

    /// Phone number.
    pub phone: String,
}

impl ContactInfo {
    /// Validate every field and return the normalised contact.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ContactError`], in field order.
    pub fn validated(&self) -> Result<Self, ContactError> {
        let name = self.name.trim();

        if name.is_empty() {
            return Err(ContactError::MissingName);
        }

        Ok(Self {
            name: name.to_string(),
            email: validate_email(&self.email)?,
            phone: normalize_phone(&self.phone)?,
        })
    }
}

/// Where to deliver an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    /// Street line.
    pub street: String,

    /// City.
    #[serde(default)]
    pub city: String,

    /// Postal code.
    #[serde(default)]
    pub postal_code: String,

    /// Optional landmark for the rider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

impl DeliveryAddress {
    fn trimmed(&self) -> Self {
        Self {
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            landmark: self
                .landmark
                .as_deref()
                .map(str::trim)
                .filter(|landmark| !landmark.is_empty())
                .map(ToString::to_string),
        }
    }

    /// Validate a full address with street, city and postal code.
    ///
    /// # Errors
    ///
    /// Returns the first missing part.
    pub fn validated_structured(&self) -> Result<Self, ContactError> {
        let address = self.validated_minimal()?;

        if address.city.is_empty() {
            return Err(ContactError::MissingCity);
        }

        if address.postal_code.is_empty() {
            return Err(ContactError::MissingPostalCode);
        }

        Ok(address)
    }

    /// Validate an address that only needs a street line.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingStreet`] for a blank street.
    pub fn validated_minimal(&self) -> Result<Self, ContactError> {
        let address = self.trimmed();

        if address.street.is_empty() {
            return Err(ContactError::MissingStreet);
        }

        Ok(address)
    }
}

/// Whether the customer lives on campus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    /// Campus resident; delivered to a hostel.
    College,

    /// Off-campus customer.
    Outsider,
}

impl CustomerType {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::College => "college",
            Self::Outsider => "outsider",
        }
    }

    /// Resolve the hostel for this customer type.
    ///
    /// College customers need a non-blank hostel. Any hostel given by an outsider is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingHostel`] for a college customer without one.
    pub fn resolve_hostel(self, hostel: Option<&str>) -> Result<Option<String>, ContactError> {
        match self {
            Self::College => hostel
                .map(str::trim)
                .filter(|hostel| !hostel.is_empty())
                .map(|hostel| Some(hostel.to_string()))
                .ok_or(ContactError::MissingHostel),
            Self::Outsider => Ok(None),
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown customer type string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown customer type: {0}")]
pub struct UnknownCustomerType(pub String);

impl FromStr for CustomerType {
    type Err = UnknownCustomerType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "college" => Ok(Self::College),
            "outsider" => Ok(Self::Outsider),
            other => Err(UnknownCustomerType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn contact() -> ContactInfo {
        ContactInfo {
            name: "  Asha Rao ".to_string(),
            email: " Asha.Rao@Example.COM ".to_string(),
            phone: "+91 98765-43210".to_string(),
        }
    }

    #[test]
    fn contact_is_normalised() -> TestResult {
        let contact = contact().validated()?;

        assert_eq!(contact.name, "Asha Rao");
        assert_eq!(contact.email, "asha.rao@example.com");
        assert_eq!(contact.phone, "+919876543210");

        Ok(())
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut contact = contact();
        contact.name = "   ".to_string();

        assert_eq!(contact.validated(), Err(ContactError::MissingName));
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["", "asha", "@example.com", "asha@", "asha@example", "a b@example.com", "a@b@c.com", "asha@example..com"] {
            assert_eq!(validate_email(email), Err(ContactError::InvalidEmail), "{email}");
        }
    }

    #[test]
    fn phone_length_is_enforced() {
        assert_eq!(normalize_phone("12345"), Err(ContactError::InvalidPhone));
        assert_eq!(
            normalize_phone("1234567890123456"),
            Err(ContactError::InvalidPhone)
        );
        assert_eq!(normalize_phone("98765x43210"), Err(ContactError::InvalidPhone));
        assert_eq!(normalize_phone("(987) 654-3210"), Ok("9876543210".to_string()));
    }

    #[test]
    fn structured_addresses_need_city_and_postal_code() {
        let street_only = DeliveryAddress {
            street: "12 Lake Road".to_string(),
            ..DeliveryAddress::default()
        };

        assert!(street_only.validated_minimal().is_ok());
        assert_eq!(
            street_only.validated_structured(),
            Err(ContactError::MissingCity)
        );

        let no_postal_code = DeliveryAddress {
            city: "Pune".to_string(),
            ..street_only
        };

        assert_eq!(
            no_postal_code.validated_structured(),
            Err(ContactError::MissingPostalCode)
        );
    }

    #[test]
    fn blank_landmarks_are_dropped() -> TestResult {
        let address = DeliveryAddress {
            street: "12 Lake Road".to_string(),
            landmark: Some("  ".to_string()),
            ..DeliveryAddress::default()
        };

        assert_eq!(address.validated_minimal()?.landmark, None);

        Ok(())
    }

    #[test]
    fn college_customers_need_a_hostel() -> TestResult {
        assert_eq!(
            CustomerType::College.resolve_hostel(Some(" Block C ")),
            Ok(Some("Block C".to_string()))
        );
        assert_eq!(
            CustomerType::College.resolve_hostel(Some(" ")),
            Err(ContactError::MissingHostel)
        );
        assert_eq!(CustomerType::Outsider.resolve_hostel(Some("Block C"))?, None);

        Ok(())
    }
}
