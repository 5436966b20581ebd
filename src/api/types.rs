//! Request and response bodies of the AppLand API.

use crate::parser::GitMetadata;
use log::warn;
use serde::{Deserialize, Serialize};

/// Response to a scenario upload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioResponse {
    #[serde(alias = "UUID")]
    pub uuid: String,
}

/// Response to mapset creation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateMapSetResponse {
    pub id: u64,
    pub app_id: u64,
}

/// A batch of scenarios recorded from one build of an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapSet {
    #[serde(rename = "app", skip_serializing_if = "String::is_empty")]
    pub application: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scenarios: Vec<String>,
}

impl MapSet {
    pub fn new(application: impl Into<String>, scenarios: Vec<String>) -> Self {
        Self {
            application: application.into(),
            scenarios,
            ..Default::default()
        }
    }

    /// Take branch and commit from recorded git state
    pub fn with_git(mut self, git: Option<&GitMetadata>) -> Self {
        if let Some(git) = git {
            self.branch = non_empty(git.branch.clone());
            self.commit = non_empty(git.commit.clone());
        }
        self
    }

    /// Override the branch, warning when it disagrees with the recorded one
    pub fn with_branch(mut self, branch: Option<&str>) -> Self {
        let Some(branch) = branch.filter(|b| !b.is_empty()) else {
            return self;
        };

        if let Some(current) = self.branch.as_deref() {
            if current != branch {
                warn!("current branch differs from override ({} != {})", current, branch);
            }
        }
        self.branch = Some(branch.to_string());
        self
    }

    pub fn with_version(mut self, version: Option<&str>) -> Self {
        self.version = non_empty(version.map(str::to_string));
        self
    }

    pub fn with_environment(mut self, environment: Option<&str>) -> Self {
        self.environment = non_empty(environment.map(str::to_string));
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
