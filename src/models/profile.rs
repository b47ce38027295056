// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model and the input used to create or update it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Self-reported activity level, least to most active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

/// Profile as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Birth date (`YYYY-MM-DD`)
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Height in centimeters
    #[serde(default)]
    pub height: Option<f64>,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
}

impl Profile {
    /// A profile is complete once name, birth date and gender are set.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && self.birth_date.as_deref().is_some_and(|d| !d.is_empty())
            && self.gender.is_some()
    }
}

/// Fields submitted when saving a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    pub name: String,
    #[validate(required(message = "birth date is required"))]
    #[serde(with = "day_format")]
    pub birth_date: Option<NaiveDate>,
    #[validate(required(message = "gender is required"))]
    pub gender: Option<Gender>,
    #[validate(range(min = 0.0, max = 300.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[validate(range(min = 0.0, max = 500.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[validate(url)]
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

mod day_format {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&crate::time_utils::format_day(*d)),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_input() -> ProfileInput {
        ProfileInput {
            name: "Aki".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 1),
            gender: Some(Gender::Female),
            height: Some(162.0),
            weight: None,
            activity_level: Some(ActivityLevel::ModeratelyActive),
            image_url: None,
        }
    }

    #[test]
    fn test_input_requires_name_birth_date_gender() {
        assert!(complete_input().validate().is_ok());

        let mut missing_gender = complete_input();
        missing_gender.gender = None;
        assert!(missing_gender.validate().is_err());

        let mut missing_birth = complete_input();
        missing_birth.birth_date = None;
        assert!(missing_birth.validate().is_err());

        let mut blank_name = complete_input();
        blank_name.name = String::new();
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_input_serializes_gateway_shape() {
        let json = serde_json::to_value(complete_input()).unwrap();
        assert_eq!(json["birthDate"], "1990-04-01");
        assert_eq!(json["gender"], "FEMALE");
        assert_eq!(json["activityLevel"], "MODERATELY_ACTIVE");
        assert!(json.get("weight").is_none());
    }

    #[test]
    fn test_profile_completeness() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Aki",
            "birthDate": "1990-04-01",
            "gender": "OTHER",
            "activityLevel": null
        }))
        .unwrap();
        assert!(profile.is_complete());

        let incomplete = Profile {
            gender: None,
            ..profile
        };
        assert!(!incomplete.is_complete());
    }
}
