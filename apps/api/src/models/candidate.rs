use serde::{Deserialize, Deserializer, Serialize};

/// Profile fields stored directly on `candidates/{id}`.
/// Both fields are optional on read, absent or `null`: a candidate document may
/// have been created by another writer before any resume was extracted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub responsibilities: String,
}

/// Structured resume as returned by the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resume {
    pub name: String,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
}

impl Resume {
    pub fn profile(&self) -> CandidateProfile {
        CandidateProfile {
            name: self.name.clone(),
            skills: self.skills.clone(),
        }
    }
}
