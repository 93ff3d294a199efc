//! Contact inquiries about a listing or the agency in general.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::user::PHONE_REGEX;

string_enum! {
    InquiryType {
        Buy => "buy",
        Rent => "rent",
        Sell => "sell",
        General => "general",
    }
}

string_enum! {
    /// Staff triage state.
    InquiryStatus {
        New => "new",
        InProgress => "in-progress",
        Resolved => "resolved",
        Closed => "closed",
    }
}

impl Default for InquiryType {
    fn default() -> Self {
        InquiryType::General
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub inquiry_type: InquiryType,
    pub status: InquiryStatus,
    pub is_read: bool,
    pub property_id: Option<i32>,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact form submission.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Please provide a valid phone number"))]
    pub phone: Option<String>,
    #[validate(length(max = 1000, message = "Message cannot exceed 1000 characters"))]
    pub message: Option<String>,
    #[serde(default)]
    pub inquiry_type: InquiryType,
    pub property_id: Option<i32>,
}

/// Staff triage patch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InquiryUpdate {
    pub status: Option<InquiryStatus>,
    pub is_read: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InquiryFilter {
    pub status: Option<InquiryStatus>,
    pub is_read: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_type_defaults_to_general() {
        let inquiry: NewInquiry = serde_json::from_value(serde_json::json!({
            "name": "Ravi",
            "email": "ravi@example.com"
        }))
        .unwrap();

        assert_eq!(inquiry.inquiry_type, InquiryType::General);
        assert!(inquiry.validate().is_ok());
    }

    #[test]
    fn test_message_length_limit() {
        let inquiry = NewInquiry {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone: None,
            message: Some("x".repeat(1001)),
            inquiry_type: InquiryType::Buy,
            property_id: Some(4),
        };

        let errors = inquiry.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("message"));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(InquiryStatus::InProgress).unwrap(),
            "in-progress"
        );
    }
}
