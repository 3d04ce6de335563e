use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

/// Field of work an organization is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Category {
    Astronomy,
    Arts,
    Biology,
    Business,
    Chemistry,
    ComputerScience,
    CommunityService,
    DataScience,
    Education,
    Engineering,
    EnvironmentalScience,
    History,
    Law,
    Literature,
    Mathematics,
    Medicine,
    Neuroscience,
    Philosophy,
    Physics,
    PoliticalScience,
    Psychology,
    SocialWork,
    Sociology,
    Stem,
    Technology,
}

impl Category {
    pub const ALL: [Category; 25] = [
        Self::Astronomy,
        Self::Arts,
        Self::Biology,
        Self::Business,
        Self::Chemistry,
        Self::ComputerScience,
        Self::CommunityService,
        Self::DataScience,
        Self::Education,
        Self::Engineering,
        Self::EnvironmentalScience,
        Self::History,
        Self::Law,
        Self::Literature,
        Self::Mathematics,
        Self::Medicine,
        Self::Neuroscience,
        Self::Philosophy,
        Self::Physics,
        Self::PoliticalScience,
        Self::Psychology,
        Self::SocialWork,
        Self::Sociology,
        Self::Stem,
        Self::Technology,
    ];

    /// Canonical spelling, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Astronomy => "Astronomy",
            Self::Arts => "Arts",
            Self::Biology => "Biology",
            Self::Business => "Business",
            Self::Chemistry => "Chemistry",
            Self::ComputerScience => "Computer science",
            Self::CommunityService => "Community service",
            Self::DataScience => "Data science",
            Self::Education => "Education",
            Self::Engineering => "Engineering",
            Self::EnvironmentalScience => "Environmental science",
            Self::History => "History",
            Self::Law => "Law",
            Self::Literature => "Literature",
            Self::Mathematics => "Mathematics",
            Self::Medicine => "Medicine",
            Self::Neuroscience => "Neuroscience",
            Self::Philosophy => "Philosophy",
            Self::Physics => "Physics",
            Self::PoliticalScience => "Political science",
            Self::Psychology => "Psychology",
            Self::SocialWork => "Social work",
            Self::Sociology => "Sociology",
            Self::Stem => "STEM",
            Self::Technology => "Technology",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownTag;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownTag {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// How an organization runs its programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Format {
    Remote,
    InPerson,
    Hybrid,
}

impl Format {
    pub const ALL: [Format; 3] = [Self::Remote, Self::InPerson, Self::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::InPerson => "In-Person",
            Self::Hybrid => "Hybrid",
        }
    }
}

impl FromStr for Format {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownTag {
                kind: "format",
                value: s.to_string(),
            })
    }
}

macro_rules! impl_tag_conversions {
    ($($tag:ty),*) => {$(
        impl fmt::Display for $tag {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $tag {
            type Error = UnknownTag;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$tag> for &'static str {
            fn from(tag: $tag) -> Self {
                tag.as_str()
            }
        }
    )*};
}

impl_tag_conversions!(Category, Format);
