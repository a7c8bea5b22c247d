use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod file_seed;

pub use file_seed::JsonFileSeed;

/// One row of initial board data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Raw status; absent or unrecognized values land in the backlog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SeedCard {
    pub fn new(id: &str, name: &str, description: &str, status: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            status: status.map(str::to_string),
        }
    }
}

/// How seed statuses are applied when the store is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedMode {
    /// Each card goes to the column matching its seed status
    #[default]
    Seeded,
    /// Every card goes to the backlog and its status is reset
    AllBacklog,
}

/// Source of initial board data
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Loads the ordered seed rows
    async fn load(&self) -> Result<Vec<SeedCard>>;
}

/// The built-in client table
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSeed;

#[async_trait]
impl SeedSource for StaticSeed {
    async fn load(&self) -> Result<Vec<SeedCard>> {
        Ok(default_seed())
    }
}

const CLIENTS: [(&str, &str, &str, &str); 20] = [
    ("1", "Stark, White and Abbott", "Cloned Optimal Architecture", "in-progress"),
    ("2", "Wiza LLC", "Exclusive Bandwidth-Monitored Implementation", "complete"),
    ("3", "Nolan LLC", "Vision-Oriented 4Thgeneration Graphicaluserinterface", "backlog"),
    ("4", "Thompson PLC", "Streamlined Regional Knowledgeuser", "in-progress"),
    ("5", "Walker-Williamson", "Team-Oriented 6Thgeneration Matrix", "in-progress"),
    ("6", "Boehm and Sons", "Automated Systematic Paradigm", "backlog"),
    ("7", "Runolfsson, Hegmann and Block", "Integrated Transitional Strategy", "backlog"),
    ("8", "Schumm-Labadie", "Operative Heuristic Challenge", "backlog"),
    ("9", "Kohler Group", "Re-Contextualized Multi-Tasking Attitude", "backlog"),
    ("10", "Romaguera Inc", "Managed Foreground Toolset", "backlog"),
    ("11", "Reilly-King", "Future-Proofed Interactive Toolset", "complete"),
    ("12", "Emard, Champlin and Runolfsdottir", "Devolved Needs-Based Capability", "backlog"),
    ("13", "Fritsch, Cronin and Wolff", "Open-Source 3Rdgeneration Website", "complete"),
    ("14", "Borer LLC", "Profit-Focused Incremental Orchestration", "backlog"),
    ("15", "Emmerich-Ankunding", "User-Centric Stable Extranet", "in-progress"),
    ("16", "Willms-Abbott", "Progressive Bandwidth-Monitored Access", "in-progress"),
    ("17", "Brekke PLC", "Intuitive User-Facing Customerloyalty", "complete"),
    ("18", "Bins, Toy and Klocko", "Integrated Assymetric Software", "backlog"),
    ("19", "Hodkiewicz-Hayes", "Programmable Systematic Securedline", "backlog"),
    ("20", "Murphy, Lang and Ferry", "Organized Explicit Access", "backlog"),
];

/// Returns the built-in 20 client cards in display order
pub fn default_seed() -> Vec<SeedCard> {
    CLIENTS
        .iter()
        .map(|&(id, name, description, status)| SeedCard::new(id, name, description, Some(status)))
        .collect()
}
