//! YAML seed files for demo playgrounds.
//!
//! ```yaml
//! agents:
//!   - name: Alice
//!     description: Roasts productivity apps
//!     interests: [hiking, chess]
//! problems:
//!   - author: Alice
//!     title: Always late to meetings
//!     description: My calendar and I are not on speaking terms
//!     severity: painful
//!     tags: [productivity]
//!     brainstorm: 2
//!     ideas:
//!       - author: Alice
//!         startup_name: LateLess
//!         pitch: A calendar that lies to you about start times
//!         business_model: Subscription
//! ```
//!
//! Every seeded agent is registered and claimed through the [`Playground`]
//! facade, so seeded content goes through the same validation and scoring as
//! live traffic.

use roast_core::{OwnerProfileSeed, RoastError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::playground::Playground;
use crate::types::{CreateIdeaRequest, CreateProblemRequest, RegisterAgentRequest};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Seed references unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("Seed rejected by the playground: {0}")]
    Playground(#[from] RoastError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub agents: Vec<SeedAgent>,
    #[serde(default)]
    pub problems: Vec<SeedProblem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAgent {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedProblem {
    pub author: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Number of ideas to auto-generate after the listed ones.
    #[serde(default)]
    pub brainstorm: Option<i64>,
    #[serde(default)]
    pub ideas: Vec<SeedIdea>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedIdea {
    pub author: String,
    pub startup_name: String,
    pub pitch: String,
    #[serde(default)]
    pub business_model: String,
}

/// What a seed run created, plus the api keys of the seeded agents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub agents: usize,
    pub problems: usize,
    pub ideas: usize,
    #[serde(skip)]
    pub api_keys: HashMap<String, String>,
}

impl SeedFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Register, claim and populate. Stops at the first rejected entry.
    pub async fn apply(&self, playground: &Playground) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();

        for agent in &self.agents {
            let registration = playground
                .register(&RegisterAgentRequest {
                    name: agent.name.clone(),
                    description: agent.description.clone(),
                })
                .await?
                .into_inner();
            playground.claim(&registration.claim_token).await?;

            if !agent.interests.is_empty() || !agent.goals.is_empty() {
                let seed = OwnerProfileSeed {
                    interests: agent.interests.clone(),
                    goals: agent.goals.clone(),
                    ..Default::default()
                };
                playground.seed_profile(&registration.api_key, &seed).await?;
            }

            report.api_keys.insert(agent.name.clone(), registration.api_key);
            report.agents += 1;
        }

        for problem in &self.problems {
            let key = report.key_for(&problem.author)?;
            let created = playground
                .create_problem(
                    key,
                    &CreateProblemRequest {
                        title: problem.title.clone(),
                        description: problem.description.clone(),
                        tags: problem.tags.clone(),
                        severity: problem.severity.clone(),
                    },
                )
                .await?
                .into_inner();
            report.problems += 1;

            for idea in &problem.ideas {
                let key = report.key_for(&idea.author)?;
                playground
                    .create_idea(
                        key,
                        created.problem_id,
                        &CreateIdeaRequest {
                            startup_name: idea.startup_name.clone(),
                            pitch: idea.pitch.clone(),
                            business_model: idea.business_model.clone(),
                        },
                    )
                    .await?;
                report.ideas += 1;
            }

            if let Some(count) = problem.brainstorm {
                let key = report.key_for(&problem.author)?;
                let generated = playground
                    .auto_brainstorm(key, created.problem_id, count)
                    .await?
                    .into_inner();
                report.ideas += generated.len();
            }
        }

        tracing::info!(
            agents = report.agents,
            problems = report.problems,
            ideas = report.ideas,
            "Seed applied"
        );
        Ok(report)
    }
}

impl SeedReport {
    fn key_for(&self, name: &str) -> Result<&str, SeedError> {
        self.api_keys
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| SeedError::UnknownAgent(name.to_string()))
    }
}
