use serde::Deserialize;

/// Main configuration structure for Forum-Ripple
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum recursion depth; seeds are depth 0
    pub max_depth: u32,

    /// Path to the line-delimited list of seed thread URLs
    pub seeds_path: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            seeds_path: "urls.txt".to_string(),
        }
    }
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: "Mozilla/5.0".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Whole-request timeout for page fetches (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Whole-request timeout for image downloads (seconds)
    pub image_timeout_secs: u64,

    /// Optional proxy applied to every request
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            image_timeout_secs: 10,
            proxy: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory under which one folder per archived thread is created
    pub archive_dir: String,

    /// Append-only progress log
    pub log_path: String,

    /// Name of the original-poster text file inside each thread folder
    pub text_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            archive_dir: ".".to_string(),
            log_path: "spider_log.txt".to_string(),
            text_file_name: "op_posts.txt".to_string(),
        }
    }
}
