/// Constants module to avoid magic numbers in the codebase

// Gateway Configuration
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:4000";
pub const DEFAULT_GATEWAY_MODEL: &str = "anthropic/claude-3-sonnet";
pub const DEFAULT_API_KEY_ENV: &str = "JOBPILOT_GATEWAY_KEY";

// Timeouts & Retries
pub const ATTEMPT_TIMEOUT_SECS: u64 = 60;
pub const GENERATION_DEADLINE_SECS: u64 = 300;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const BACKOFF_BASE_MS: u64 = 500;
pub const BACKOFF_CAP_MS: u64 = 8_000;

// Cache Sizing & TTLs
pub const CACHE_MAX_ENTRIES: usize = 1_024;
pub const CACHE_SWEEP_INTERVAL_SECS: u64 = 300;
pub const RESUME_TTL_SECS: u64 = 86_400; // 1 day
pub const COVER_LETTER_TTL_SECS: u64 = 86_400;
pub const JOB_MATCH_TTL_SECS: u64 = 604_800; // 7 days
pub const SKILLS_GAP_TTL_SECS: u64 = 604_800;
pub const COMPANY_RESEARCH_TTL_SECS: u64 = 604_800;

// Match Scoring
pub const SKILLS_WEIGHT: f64 = 0.5;
pub const EXPERIENCE_WEIGHT: f64 = 0.3;
pub const EDUCATION_WEIGHT: f64 = 0.2;
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

// Seniority Band Thresholds (minimum years of relevant experience)
pub const ENTRY_MIN_YEARS: f64 = 0.0;
pub const MID_MIN_YEARS: f64 = 2.0;
pub const SENIOR_MIN_YEARS: f64 = 5.0;
pub const EXECUTIVE_MIN_YEARS: f64 = 10.0;

// Payload Validation
pub const MIN_DOCUMENT_CHARS: usize = 120;
pub const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// Generation Parameters
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: usize = 4096;
