use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{new_id, UserSummary};
use crate::core::error::{Error, Result};
use crate::core::validate::{not_blank, present};

/// Social links; the whole object is replaced when any link is submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Socials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: String,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Everything in a profile except its identity and owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    #[serde(default)]
    pub socials: Socials,
    /// Most recent first
    #[serde(default)]
    pub experience: Vec<Experience>,
    /// Most recent first
    #[serde(default)]
    pub education: Vec<Education>,
    pub date: DateTime<Utc>,
}

/// Stored profile; `user` is the owning account id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

/// Profile with its owner populated as `{_id, name, avatar}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: Option<UserSummary>,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

impl Profile {
    /// New profile for `user_id` from a validated upsert body
    pub fn create(user_id: &str, input: ProfileInput) -> Self {
        let skills = input.skill_list();
        let socials = input.socials().unwrap_or_default();
        Self {
            id: new_id(),
            user: user_id.to_string(),
            details: ProfileDetails {
                company: present(input.company),
                website: present(input.website),
                location: present(input.location),
                status: input.status.trim().to_string(),
                skills,
                bio: present(input.bio),
                githubusername: present(input.githubusername),
                socials,
                experience: Vec::new(),
                education: Vec::new(),
                date: Utc::now(),
            },
        }
    }

    /// Merge the submitted fields; absent optional fields keep their stored value
    pub fn apply(&mut self, input: ProfileInput) {
        let skills = input.skill_list();
        let socials = input.socials();
        let d = &mut self.details;

        d.status = input.status.trim().to_string();
        d.skills = skills;
        if let Some(company) = present(input.company) {
            d.company = Some(company);
        }
        if let Some(website) = present(input.website) {
            d.website = Some(website);
        }
        if let Some(location) = present(input.location) {
            d.location = Some(location);
        }
        if let Some(bio) = present(input.bio) {
            d.bio = Some(bio);
        }
        if let Some(githubusername) = present(input.githubusername) {
            d.githubusername = Some(githubusername);
        }
        if let Some(socials) = socials {
            d.socials = socials;
        }
    }

    pub fn populate(self, owner: Option<UserSummary>) -> ProfileView {
        ProfileView {
            id: self.id,
            user: owner,
            details: self.details,
        }
    }

    /// Remove one experience entry by id, returning it if it existed
    pub fn remove_experience(&mut self, exp_id: &str) -> Option<Experience> {
        let index = self.details.experience.iter().position(|e| e.id == exp_id)?;
        Some(self.details.experience.remove(index))
    }

    /// Remove one education entry by id, returning it if it existed
    pub fn remove_education(&mut self, edu_id: &str) -> Option<Education> {
        let index = self.details.education.iter().position(|e| e.id == edu_id)?;
        Some(self.details.education.remove(index))
    }
}

/// Body of `POST /api/profile`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileInput {
    #[validate(custom(function = "not_blank", message = "Status is required"))]
    pub status: String,
    /// Comma separated, e.g. `"rust, go, sql"`
    #[validate(custom(function = "not_blank", message = "Skills is required"))]
    pub skills: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl ProfileInput {
    /// Skills split on commas, trimmed, blanks dropped, order kept
    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Submitted social links, or `None` when no link was given
    pub fn socials(&self) -> Option<Socials> {
        let socials = Socials {
            youtube: present(self.youtube.clone()),
            twitter: present(self.twitter.clone()),
            facebook: present(self.facebook.clone()),
            linkedin: present(self.linkedin.clone()),
            instagram: present(self.instagram.clone()),
        };
        (socials != Socials::default()).then_some(socials)
    }
}

/// Body of `PUT /api/profile/experience`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ExperienceInput {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Company is required"))]
    pub company: String,
    #[validate(custom(function = "not_blank", message = "From date is required"))]
    pub from: String,
    pub location: Option<String>,
    pub to: Option<String>,
    pub current: bool,
    pub description: Option<String>,
}

impl ExperienceInput {
    pub fn into_entry(self) -> Result<Experience> {
        Ok(Experience {
            id: new_id(),
            from: parse_date("from", &self.from)?,
            to: parse_optional_date("to", self.to)?,
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: present(self.location),
            current: self.current,
            description: present(self.description),
        })
    }
}

/// Body of `PUT /api/profile/education`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EducationInput {
    #[validate(custom(function = "not_blank", message = "School is required"))]
    pub school: String,
    #[validate(custom(function = "not_blank", message = "Degree is required"))]
    pub degree: String,
    #[validate(custom(function = "not_blank", message = "Field of study is required"))]
    pub fieldofstudy: String,
    #[validate(custom(function = "not_blank", message = "From date is required"))]
    pub from: String,
    pub to: Option<String>,
    pub current: bool,
    pub description: Option<String>,
}

impl EducationInput {
    pub fn into_entry(self) -> Result<Education> {
        Ok(Education {
            id: new_id(),
            from: parse_date("from", &self.from)?,
            to: parse_optional_date("to", self.to)?,
            school: self.school.trim().to_string(),
            degree: self.degree.trim().to_string(),
            fieldofstudy: self.fieldofstudy.trim().to_string(),
            current: self.current,
            description: present(self.description),
        })
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (truncated to its date)
fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .ok_or_else(|| Error::field(field, format!("{} must be a date (YYYY-MM-DD)", field)))
}

fn parse_optional_date(field: &str, raw: Option<String>) -> Result<Option<NaiveDate>> {
    present(raw).map(|r| parse_date(field, &r)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(skills: &str) -> ProfileInput {
        ProfileInput {
            status: "Developer".into(),
            skills: skills.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_skills_are_split_and_trimmed() {
        assert_eq!(input("a, b, c").skill_list(), vec!["a", "b", "c"]);
        assert_eq!(input(" rust ,, go ").skill_list(), vec!["rust", "go"]);
    }

    #[test]
    fn test_instagram_goes_to_instagram() {
        let socials = ProfileInput {
            instagram: Some("https://instagram.com/a".into()),
            ..input("a")
        }
        .socials()
        .unwrap();
        assert_eq!(socials.instagram.as_deref(), Some("https://instagram.com/a"));
        assert_eq!(socials.youtube, None);
    }

    #[test]
    fn test_no_socials_when_none_submitted() {
        let blank = ProfileInput {
            twitter: Some("  ".into()),
            ..input("a")
        };
        assert_eq!(blank.socials(), None);
    }

    #[test]
    fn test_apply_merges_present_fields() {
        let mut profile = Profile::create(
            "u1",
            ProfileInput {
                company: Some("Acme".into()),
                bio: Some("hello".into()),
                twitter: Some("https://twitter.com/a".into()),
                ..input("a, b")
            },
        );

        profile.apply(ProfileInput {
            company: Some("Initech".into()),
            ..input("c")
        });

        assert_eq!(profile.details.company.as_deref(), Some("Initech"));
        assert_eq!(profile.details.bio.as_deref(), Some("hello"));
        assert_eq!(profile.details.skills, vec!["c"]);
        // no social field submitted, links kept
        assert_eq!(
            profile.details.socials.twitter.as_deref(),
            Some("https://twitter.com/a")
        );

        profile.apply(ProfileInput {
            facebook: Some("https://facebook.com/a".into()),
            ..input("c")
        });
        assert_eq!(profile.details.socials.twitter, None);
        assert_eq!(
            profile.details.socials.facebook.as_deref(),
            Some("https://facebook.com/a")
        );
    }

    #[test]
    fn test_parse_dates() {
        assert_eq!(
            parse_date("from", "2019-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2019, 6, 1).unwrap()
        );
        assert_eq!(
            parse_date("from", "2019-06-01T10:00:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2019, 6, 1).unwrap()
        );
        assert!(parse_date("from", "June").is_err());
        assert_eq!(parse_optional_date("to", Some("".into())).unwrap(), None);
    }

    #[test]
    fn test_remove_entries_by_id() {
        let mut profile = Profile::create("u1", input("a"));
        let first = ExperienceInput {
            title: "Dev".into(),
            company: "Acme".into(),
            from: "2018-01-01".into(),
            ..Default::default()
        }
        .into_entry()
        .unwrap();
        let second = ExperienceInput {
            title: "Lead".into(),
            company: "Acme".into(),
            from: "2020-01-01".into(),
            ..Default::default()
        }
        .into_entry()
        .unwrap();
        profile.details.experience = vec![second.clone(), first.clone()];

        assert!(profile.remove_experience("missing").is_none());
        assert!(profile.remove_education(&first.id).is_none());
        assert_eq!(profile.details.experience.len(), 2);

        assert_eq!(profile.remove_experience(&first.id), Some(first));
        assert_eq!(profile.details.experience, vec![second]);
    }

    #[test]
    fn test_profile_round_trips_flattened() {
        let profile = Profile::create("u1", input("a"));
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["user"], "u1");
        assert_eq!(json["status"], "Developer");
        let back: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
