use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use eyre::{WrapErr, bail, eyre};
use papyrus_convert::ConverterConfig;
use papyrus_scraper::{MatchPolicy, ScraperConfig};
use papyrus_storage::store::UrlStyle;

/// Worker settings, read from `PAPYRUS_*` environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bucket: String,
    pub region: String,
    pub bind_addr: SocketAddr,
    /// SQS queue to poll. No poller runs when unset.
    pub queue_url: Option<String>,
    pub fuzzy_threshold: f64,
    pub match_policy: MatchPolicy,
    pub max_workers: usize,
    pub scrape_timeout: Duration,
    pub convert_timeout: Duration,
    pub callback_timeout: Duration,
    pub office_converter: String,
    pub pdf_converter: String,
    /// Hand out presigned download URLs valid this long instead of public ones.
    pub presign_ttl: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        let scraper = ScraperConfig::default();
        let converter = ConverterConfig::default();
        Self {
            bucket: "papyrus".to_string(),
            region: "us-east-1".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            queue_url: None,
            fuzzy_threshold: scraper.threshold,
            match_policy: scraper.policy,
            max_workers: scraper.max_workers,
            scrape_timeout: Duration::from_secs(300),
            convert_timeout: converter.timeout,
            callback_timeout: Duration::from_secs(30),
            office_converter: converter.office_program,
            pdf_converter: converter.pdf_program,
            presign_ttl: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let fuzzy_threshold = parse_or(&var, "PAPYRUS_FUZZY_THRESHOLD", defaults.fuzzy_threshold)?;
        if !(0.0..=100.0).contains(&fuzzy_threshold) {
            bail!("PAPYRUS_FUZZY_THRESHOLD must be between 0 and 100, got {fuzzy_threshold}");
        }

        let match_policy = match var("PAPYRUS_MATCH_POLICY") {
            Some(raw) => raw
                .parse::<MatchPolicy>()
                .map_err(|e| eyre!("PAPYRUS_MATCH_POLICY: {e}"))?,
            None => defaults.match_policy,
        };

        let max_workers = parse_or(&var, "PAPYRUS_MAX_WORKERS", defaults.max_workers)?;
        if max_workers == 0 {
            bail!("PAPYRUS_MAX_WORKERS must be positive");
        }

        Ok(Self {
            bucket: var("PAPYRUS_BUCKET").unwrap_or(defaults.bucket),
            region: var("AWS_REGION").unwrap_or(defaults.region),
            bind_addr: parse_or(&var, "PAPYRUS_BIND_ADDR", defaults.bind_addr)?,
            queue_url: var("PAPYRUS_QUEUE_URL"),
            fuzzy_threshold,
            match_policy,
            max_workers,
            scrape_timeout: secs_or(&var, "PAPYRUS_SCRAPE_TIMEOUT_SECS", defaults.scrape_timeout)?,
            convert_timeout: secs_or(&var, "PAPYRUS_CONVERT_TIMEOUT_SECS", defaults.convert_timeout)?,
            callback_timeout: secs_or(&var, "PAPYRUS_CALLBACK_TIMEOUT_SECS", defaults.callback_timeout)?,
            office_converter: var("PAPYRUS_OFFICE_CONVERTER").unwrap_or(defaults.office_converter),
            pdf_converter: var("PAPYRUS_PDF_CONVERTER").unwrap_or(defaults.pdf_converter),
            presign_ttl: var("PAPYRUS_PRESIGN_TTL_SECS")
                .map(|raw| parse_secs(&raw, "PAPYRUS_PRESIGN_TTL_SECS"))
                .transpose()?,
        })
    }

    pub fn scraper_config(&self) -> ScraperConfig {
        ScraperConfig {
            threshold: self.fuzzy_threshold,
            policy: self.match_policy,
            max_workers: self.max_workers,
        }
    }

    pub fn converter_config(&self) -> ConverterConfig {
        ConverterConfig {
            office_program: self.office_converter.clone(),
            pdf_program: self.pdf_converter.clone(),
            timeout: self.convert_timeout,
        }
    }

    pub fn url_style(&self) -> UrlStyle {
        match self.presign_ttl {
            Some(expires_in) => UrlStyle::Presigned { expires_in },
            None => UrlStyle::Public {
                region: self.region.clone(),
            },
        }
    }
}

fn parse_or<T>(var: impl Fn(&str) -> Option<String>, name: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw
            .parse()
            .wrap_err_with(|| format!("{name}: invalid value {raw:?}")),
        None => Ok(default),
    }
}

fn secs_or(var: impl Fn(&str) -> Option<String>, name: &str, default: Duration) -> eyre::Result<Duration> {
    var(name).map_or(Ok(default), |raw| parse_secs(&raw, name))
}

fn parse_secs(raw: &str, name: &str) -> eyre::Result<Duration> {
    let secs: u64 = raw
        .parse()
        .wrap_err_with(|| format!("{name}: invalid value {raw:?}"))?;
    if secs == 0 {
        bail!("{name} must be positive");
    }
    Ok(Duration::from_secs(secs))
}
