use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    ATTEMPT_TIMEOUT_SECS, BACKOFF_BASE_MS, BACKOFF_CAP_MS, CACHE_MAX_ENTRIES,
    CACHE_SWEEP_INTERVAL_SECS, COMPANY_RESEARCH_TTL_SECS, COVER_LETTER_TTL_SECS,
    DEFAULT_API_KEY_ENV, DEFAULT_GATEWAY_MODEL, DEFAULT_GATEWAY_URL,
    DEFAULT_MAX_RECOMMENDATIONS, DEFAULT_MAX_RETRIES, GENERATION_DEADLINE_SECS,
    JOB_MATCH_TTL_SECS, RESUME_TTL_SECS, SKILLS_GAP_TTL_SECS,
};
use crate::engine::GenerationKind;
use crate::providers::RetryOptions;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Generation provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Result cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Orchestrator configuration
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Match scoring configuration
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            cache: CacheConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check cross-section invariants.
    ///
    /// The end-to-end deadline must exceed the provider's worst-case
    /// retry budget, otherwise the orchestrator would cut off a retry
    /// mid-flight.
    pub fn validate(&self) -> Result<()> {
        let deadline = self.orchestrator.deadline();
        let budget = self.provider.retry_options().worst_case_budget();
        if deadline <= budget {
            bail!(
                "orchestrator deadline ({deadline:?}) must exceed the provider \
                 retry budget ({budget:?}); raise deadline_secs or reduce \
                 max_retries/attempt_timeout_secs"
            );
        }
        if self.cache.max_entries == 0 {
            bail!("cache.max_entries must be non-zero");
        }
        Ok(())
    }
}

/// Generation provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the LLM gateway
    pub gateway_url: String,
    /// Model identifier, provider/model form
    pub model: String,
    /// Environment variable containing the gateway API key
    pub api_key_env: String,
    /// Hard wall-clock deadline per attempt, seconds
    pub attempt_timeout_secs: u64,
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// First backoff delay, milliseconds; doubles per retry
    pub backoff_base_ms: u64,
    /// Backoff ceiling, milliseconds
    pub backoff_cap_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_GATEWAY_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            attempt_timeout_secs: ATTEMPT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: BACKOFF_BASE_MS,
            backoff_cap_ms: BACKOFF_CAP_MS,
        }
    }
}

impl ProviderConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    pub fn retry_options(&self) -> RetryOptions {
        RetryOptions {
            attempt_timeout: self.attempt_timeout(),
            max_retries: self.max_retries,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            backoff_cap: Duration::from_millis(self.backoff_cap_ms),
        }
    }
}

/// Result cache settings. Each generation kind carries its own TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Key-count ceiling before LRU eviction kicks in
    pub max_entries: usize,
    /// Background sweep cadence, seconds
    pub sweep_interval_secs: u64,
    pub resume_ttl_secs: u64,
    pub cover_letter_ttl_secs: u64,
    pub job_match_ttl_secs: u64,
    pub skills_gap_ttl_secs: u64,
    pub company_research_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: CACHE_MAX_ENTRIES,
            sweep_interval_secs: CACHE_SWEEP_INTERVAL_SECS,
            resume_ttl_secs: RESUME_TTL_SECS,
            cover_letter_ttl_secs: COVER_LETTER_TTL_SECS,
            job_match_ttl_secs: JOB_MATCH_TTL_SECS,
            skills_gap_ttl_secs: SKILLS_GAP_TTL_SECS,
            company_research_ttl_secs: COMPANY_RESEARCH_TTL_SECS,
        }
    }
}

impl CacheConfig {
    /// TTL configured for a generation kind
    pub fn ttl_for(&self, kind: GenerationKind) -> Duration {
        let secs = match kind {
            GenerationKind::Resume => self.resume_ttl_secs,
            GenerationKind::CoverLetter => self.cover_letter_ttl_secs,
            GenerationKind::JobMatch => self.job_match_ttl_secs,
            GenerationKind::SkillsGap => self.skills_gap_ttl_secs,
            GenerationKind::CompanyResearch => self.company_research_ttl_secs,
        };
        Duration::from_secs(secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Orchestrator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// End-to-end deadline per generation, seconds. Covers template
    /// rendering, every provider attempt, and validation.
    pub deadline_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            deadline_secs: GENERATION_DEADLINE_SECS,
        }
    }
}

impl OrchestratorConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Match scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Cap on generated skill recommendations
    pub max_recommendations: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

/// Load configuration from defaults, `jobpilot.toml`, and environment
pub fn load_config() -> Result<EngineConfig> {
    load_config_from(Path::new("jobpilot.toml"))
}

/// Load configuration with an explicit TOML path
pub fn load_config_from(path: &Path) -> Result<EngineConfig> {
    let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));

    if path.exists() {
        figment = figment.merge(Toml::file(path));
    }

    // Add environment variables (JOBPILOT_ prefix, __ separates sections)
    figment = figment.merge(Env::prefixed("JOBPILOT_").split("__"));

    let config: EngineConfig = figment
        .extract()
        .context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}
