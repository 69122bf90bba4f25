use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Minimum age accepted by the profile editor
pub const MINIMUM_AGE: f64 = 18.0;

/// Profile payload returned by the backend.
///
/// The client treats it as an opaque JSON object and only reads the few
/// fields it displays or edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    /// Wrap a JSON value, rejecting anything that is not an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Read a field as text; numbers are stringified, other types are absent
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Backend identifier used for updates
    pub fn id(&self) -> Option<String> {
        self.text("id").filter(|id| !id.is_empty())
    }

    pub fn name(&self) -> Option<String> {
        self.text("name").filter(|name| !name.trim().is_empty())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookingFor {
    Friendship,
    Dating,
    Relationship,
}

impl LookingFor {
    pub const ALL: [LookingFor; 3] = [
        LookingFor::Friendship,
        LookingFor::Dating,
        LookingFor::Relationship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LookingFor::Friendship => "friendship",
            LookingFor::Dating => "dating",
            LookingFor::Relationship => "relationship",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LookingFor::Friendship => "Friendship",
            LookingFor::Dating => "Dating",
            LookingFor::Relationship => "Relationship",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == value)
    }
}

/// Editable fields of a profile draft, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    Name,
    Age,
    Gender,
    Bio,
    Location,
    LookingFor,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::Name,
        ProfileField::Age,
        ProfileField::Gender,
        ProfileField::Bio,
        ProfileField::Location,
        ProfileField::LookingFor,
    ];

    /// Key used in request bodies and stored profiles
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Age => "age",
            ProfileField::Gender => "gender",
            ProfileField::Bio => "bio",
            ProfileField::Location => "location",
            ProfileField::LookingFor => "lookingFor",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::Age => "Age",
            ProfileField::Gender => "Gender",
            ProfileField::Bio => "Bio",
            ProfileField::Location => "Location",
            ProfileField::LookingFor => "Looking For",
        }
    }

    fn error_message(&self) -> &'static str {
        match self {
            ProfileField::Name => "Name is required",
            ProfileField::Age => "Valid age is required",
            ProfileField::Gender => "Gender is required",
            ProfileField::Bio => "Bio is required",
            ProfileField::Location => "Location is required",
            ProfileField::LookingFor => "Looking for is required",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-progress profile form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub name: String,
    /// Raw age input; parsed during validation
    pub age: String,
    pub gender: Option<Gender>,
    pub bio: String,
    pub location: String,
    pub looking_for: Option<LookingFor>,
}

impl ProfileDraft {
    /// Populate a draft from an existing profile, missing fields left empty
    pub fn from_profile(profile: &Profile) -> Self {
        let text = |field: ProfileField| profile.text(field.as_str()).unwrap_or_default();
        Self {
            name: text(ProfileField::Name),
            age: text(ProfileField::Age),
            gender: Gender::parse(&text(ProfileField::Gender)),
            bio: text(ProfileField::Bio),
            location: text(ProfileField::Location),
            looking_for: LookingFor::parse(&text(ProfileField::LookingFor)),
        }
    }

    /// Current input value of a field as shown in the form
    pub fn value(&self, field: ProfileField) -> String {
        match field {
            ProfileField::Name => self.name.clone(),
            ProfileField::Age => self.age.clone(),
            ProfileField::Gender => self.gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
            ProfileField::Bio => self.bio.clone(),
            ProfileField::Location => self.location.clone(),
            ProfileField::LookingFor => self
                .looking_for
                .map(|l| l.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    /// Store raw input for a field. Unknown enum values leave the field unset.
    pub fn set(&mut self, field: ProfileField, value: &str) {
        match field {
            ProfileField::Name => self.name = value.to_string(),
            ProfileField::Age => self.age = value.to_string(),
            ProfileField::Gender => self.gender = Gender::parse(value),
            ProfileField::Bio => self.bio = value.to_string(),
            ProfileField::Location => self.location = value.to_string(),
            ProfileField::LookingFor => self.looking_for = LookingFor::parse(value),
        }
    }

    /// Validate and convert into the request payload
    pub fn to_payload(&self) -> Result<ProfilePayload, ValidationErrors> {
        let errors = validate_form(self);
        match (parse_age(&self.age), self.gender, self.looking_for) {
            (Some(age), Some(gender), Some(looking_for)) if errors.is_empty() => Ok(ProfilePayload {
                name: self.name.clone(),
                age,
                gender,
                bio: self.bio.clone(),
                location: self.location.clone(),
                looking_for,
            }),
            _ => Err(errors),
        }
    }
}

/// Profile body sent on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub name: String,
    #[serde(serialize_with = "serialize_age")]
    pub age: f64,
    pub gender: Gender,
    pub bio: String,
    pub location: String,
    pub looking_for: LookingFor,
}

// Whole ages go out as integers so "20" is sent as 20, not 20.0
fn serialize_age<S: Serializer>(age: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if age.fract() == 0.0 && *age >= 0.0 && *age <= u32::MAX as f64 {
        serializer.serialize_u64(*age as u64)
    } else {
        serializer.serialize_f64(*age)
    }
}

/// Parse age input; blank or non-numeric input yields `None`
pub fn parse_age(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|age| age.is_finite())
}

/// Field-scoped validation messages; an absent field is valid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<ProfileField, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: ProfileField, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: ProfileField) -> bool {
        self.errors.contains_key(&field)
    }

    /// Drop one field's error; returns whether there was one
    pub fn clear(&mut self, field: ProfileField) -> bool {
        self.errors.remove(&field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileField, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Validate every field of a draft.
///
/// The result is computed from scratch; previous errors are not consulted.
pub fn validate_form(draft: &ProfileDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if draft.name.trim().is_empty() {
        errors.insert(ProfileField::Name, ProfileField::Name.error_message());
    }
    if !matches!(parse_age(&draft.age), Some(age) if age >= MINIMUM_AGE) {
        errors.insert(ProfileField::Age, ProfileField::Age.error_message());
    }
    if draft.gender.is_none() {
        errors.insert(ProfileField::Gender, ProfileField::Gender.error_message());
    }
    if draft.bio.trim().is_empty() {
        errors.insert(ProfileField::Bio, ProfileField::Bio.error_message());
    }
    if draft.location.trim().is_empty() {
        errors.insert(ProfileField::Location, ProfileField::Location.error_message());
    }
    if draft.looking_for.is_none() {
        errors.insert(ProfileField::LookingFor, ProfileField::LookingFor.error_message());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_draft() -> ProfileDraft {
        ProfileDraft {
            name: "Jamie".to_string(),
            age: "20".to_string(),
            gender: Some(Gender::Male),
            bio: "hi".to_string(),
            location: "NY".to_string(),
            looking_for: Some(LookingFor::Dating),
        }
    }

    #[test]
    fn test_complete_draft_is_valid() {
        assert!(validate_form(&complete_draft()).is_empty());
    }

    #[test]
    fn test_blank_name_reports_only_name() {
        let draft = ProfileDraft {
            name: String::new(),
            ..complete_draft()
        };
        let errors = validate_form(&draft);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(ProfileField::Name), Some("Name is required"));
    }

    #[test]
    fn test_whitespace_only_text_fields_are_missing() {
        let draft = ProfileDraft {
            name: "   ".to_string(),
            bio: "\n\t".to_string(),
            location: " ".to_string(),
            ..complete_draft()
        };
        let errors = validate_form(&draft);
        assert_eq!(errors.get(ProfileField::Name), Some("Name is required"));
        assert_eq!(errors.get(ProfileField::Bio), Some("Bio is required"));
        assert_eq!(errors.get(ProfileField::Location), Some("Location is required"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_age_rules() {
        for (age, valid) in [
            ("18", true),
            ("99", true),
            ("18.5", true),
            (" 25 ", true),
            ("17", false),
            ("17.9", false),
            ("", false),
            ("abc", false),
            ("-20", false),
            ("NaN", false),
            ("inf", false),
        ] {
            let draft = ProfileDraft {
                age: age.to_string(),
                ..complete_draft()
            };
            let errors = validate_form(&draft);
            assert_eq!(errors.is_empty(), valid, "age input {:?}", age);
            if !valid {
                assert_eq!(errors.get(ProfileField::Age), Some("Valid age is required"));
            }
        }
    }

    #[test]
    fn test_empty_draft_reports_every_field() {
        let errors = validate_form(&ProfileDraft::default());
        assert_eq!(errors.len(), ProfileField::ALL.len());
        assert_eq!(errors.get(ProfileField::Gender), Some("Gender is required"));
        assert_eq!(errors.get(ProfileField::LookingFor), Some("Looking for is required"));
    }

    #[test]
    fn test_set_rejects_unknown_enum_values() {
        let mut draft = complete_draft();
        draft.set(ProfileField::Gender, "robot");
        draft.set(ProfileField::LookingFor, "");
        assert_eq!(draft.gender, None);
        assert_eq!(draft.looking_for, None);

        draft.set(ProfileField::Gender, "female");
        draft.set(ProfileField::LookingFor, "relationship");
        assert_eq!(draft.value(ProfileField::Gender), "female");
        assert_eq!(draft.value(ProfileField::LookingFor), "relationship");
    }

    #[test]
    fn test_draft_from_profile() {
        let profile = Profile::from_value(json!({
            "id": 12,
            "name": "Ana",
            "age": 31,
            "gender": "female",
            "bio": "Climber",
            "location": "Lisbon",
            "lookingFor": "friendship",
            "photos": []
        }))
        .unwrap();

        let draft = ProfileDraft::from_profile(&profile);
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.age, "31");
        assert_eq!(draft.gender, Some(Gender::Female));
        assert_eq!(draft.looking_for, Some(LookingFor::Friendship));
        assert!(validate_form(&draft).is_empty());
    }

    #[test]
    fn test_draft_from_partial_profile() {
        let profile = Profile::from_value(json!({"id": "x", "name": null, "bio": "b"})).unwrap();
        let draft = ProfileDraft::from_profile(&profile);
        assert_eq!(draft.name, "");
        assert_eq!(draft.age, "");
        assert_eq!(draft.gender, None);
        assert_eq!(draft.bio, "b");
    }

    #[test]
    fn test_payload_serialization() {
        let payload = complete_draft().to_payload().unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": "Jamie",
                "age": 20,
                "gender": "male",
                "bio": "hi",
                "location": "NY",
                "lookingFor": "dating"
            })
        );

        let fractional = ProfileDraft {
            age: "18.5".to_string(),
            ..complete_draft()
        };
        let value = serde_json::to_value(fractional.to_payload().unwrap()).unwrap();
        assert_eq!(value["age"], json!(18.5));
    }

    #[test]
    fn test_payload_requires_valid_draft() {
        let draft = ProfileDraft {
            age: "12".to_string(),
            ..complete_draft()
        };
        let errors = draft.to_payload().unwrap_err();
        assert!(errors.contains(ProfileField::Age));
    }

    #[test]
    fn test_validation_errors_clear() {
        let mut errors = validate_form(&ProfileDraft::default());
        assert!(errors.clear(ProfileField::Bio));
        assert!(!errors.clear(ProfileField::Bio));
        assert_eq!(errors.len(), 5);
        assert!(!errors.contains(ProfileField::Bio));
    }

    #[test]
    fn test_profile_accessors() {
        let profile = Profile::from_value(json!({"id": "", "name": "  "})).unwrap();
        assert_eq!(profile.id(), None);
        assert_eq!(profile.name(), None);
        assert!(Profile::from_value(json!(["not", "an", "object"])).is_none());
    }
}
