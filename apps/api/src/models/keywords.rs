//! Schema types for the structured keyword extraction.
//!
//! Field names and nesting are part of the external contract: the job side
//! uses camelCase keys, the resume side mixes a camelCase `personalInfo`
//! wrapper with snake_case bullet lists. Absent fields stay null/empty —
//! nothing is inferred locally.

use serde::{Deserialize, Deserializer, Serialize};

/// The extraction prompt says "null or an empty array as appropriate", and
/// the model takes it at its word. Fold explicit nulls into defaults.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Structured record describing a job posting. Produced only by the
/// extraction stage; never mutated afterward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobKeywords {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub remote_status: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub key_responsibilities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub required_qualifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub preferred_qualifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub extracted_hard_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub extracted_soft_skills: Vec<String>,
}

/// Structured record describing a candidate. Same lifecycle as
/// [`JobKeywords`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeKeywords {
    #[serde(rename = "personalInfo", deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,
    pub summary: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub years: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub description_bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub years: Option<String>,
}
