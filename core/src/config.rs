use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_RELEVANCE_EPSILON: f64 = 1e-6;

/// Engine settings fixed at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub stop_words: Vec<String>,
    /// Cap on ranked results returned per query.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Relevance values closer than this are ranked by rating instead.
    #[serde(default = "default_relevance_epsilon")]
    pub relevance_epsilon: f64,
}

fn default_max_results() -> usize { DEFAULT_MAX_RESULTS }
fn default_relevance_epsilon() -> f64 { DEFAULT_RELEVANCE_EPSILON }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stop_words: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
            relevance_epsilon: DEFAULT_RELEVANCE_EPSILON,
        }
    }
}

impl EngineConfig {
    pub fn with_stop_words(text: &str) -> Self {
        Self {
            stop_words: text.split_whitespace().map(str::to_string).collect(),
            ..Self::default()
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let f = File::open(path.as_ref())?;
    let config = serde_json::from_reader(BufReader::new(f))?;
    Ok(config)
}
