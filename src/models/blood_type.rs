use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ABO/Rh blood group. Every registered hospital carries exactly one stock
/// row per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    AbNeg,
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "O-")]
    ONeg,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APos,
        BloodType::ANeg,
        BloodType::BPos,
        BloodType::BNeg,
        BloodType::AbPos,
        BloodType::AbNeg,
        BloodType::OPos,
        BloodType::ONeg,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BloodType::APos => "A+",
            BloodType::ANeg => "A-",
            BloodType::BPos => "B+",
            BloodType::BNeg => "B-",
            BloodType::AbPos => "AB+",
            BloodType::AbNeg => "AB-",
            BloodType::OPos => "O+",
            BloodType::ONeg => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBloodType(pub String);

impl fmt::Display for UnknownBloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown blood type '{}'", self.0)
    }
}

impl FromStr for BloodType {
    type Err = UnknownBloodType;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        // An unencoded `+` in a query string arrives as a space.
        let normalized = input.trim_start().replace(' ', "+").to_ascii_uppercase();
        BloodType::ALL
            .into_iter()
            .find(|bt| bt.as_str() == normalized)
            .ok_or_else(|| UnknownBloodType(input.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Urgency::Low),
            "medium" => Some(Urgency::Medium),
            "high" => Some(Urgency::High),
            "critical" => Some(Urgency::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Fulfilled,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Fulfilled => "fulfilled",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses a hospital may move a request into. `pending` is only ever
    /// set on creation.
    pub fn parse_transition(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "approved" => Some(RequestStatus::Approved),
            "fulfilled" => Some(RequestStatus::Fulfilled),
            "cancelled" => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_blood_type_label() {
        for bt in BloodType::ALL {
            assert_eq!(bt.as_str().parse::<BloodType>(), Ok(bt));
        }
    }

    #[test]
    fn accepts_lowercase_and_form_decoded_plus() {
        assert_eq!("ab+".parse::<BloodType>(), Ok(BloodType::AbPos));
        assert_eq!("O ".parse::<BloodType>(), Ok(BloodType::OPos));
        assert_eq!("o-".parse::<BloodType>(), Ok(BloodType::ONeg));
    }

    #[test]
    fn rejects_labels_outside_the_enumeration() {
        assert!("C+".parse::<BloodType>().is_err());
        assert!("O".parse::<BloodType>().is_err());
        assert!("".parse::<BloodType>().is_err());
    }

    #[test]
    fn pending_is_not_a_valid_transition() {
        assert_eq!(RequestStatus::parse_transition("pending"), None);
        assert_eq!(
            RequestStatus::parse_transition("Fulfilled"),
            Some(RequestStatus::Fulfilled)
        );
    }

    #[test]
    fn blood_type_serializes_as_label() {
        let json = serde_json::to_string(&BloodType::AbNeg).unwrap();
        assert_eq!(json, "\"AB-\"");
    }
}
