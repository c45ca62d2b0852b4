use serde::{Deserialize, Serialize};

/// A Jira fix version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Version {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateVersion<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub project: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct StatusField {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct IssueFields {
    pub status: StatusField,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize)]
pub struct TransitionTarget {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
    pub to: TransitionTarget,
}

#[derive(Debug, Deserialize)]
pub struct Transitions {
    pub transitions: Vec<Transition>,
}

impl Transitions {
    /// Find the transition leading to `status`, matching either the target
    /// status name or the transition name, ignoring case.
    pub fn leading_to(&self, status: &str) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.to.name.eq_ignore_ascii_case(status))
            .or_else(|| {
                self.transitions
                    .iter()
                    .find(|t| t.name.eq_ignore_ascii_case(status))
            })
    }
}
