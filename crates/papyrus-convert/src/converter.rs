use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use papyrus_core::format;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::error::ConvertError;

#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Converter for everything that is not a PDF, called as
    /// `<office> -f <format> -o <output> <input>`.
    pub office_program: String,
    /// Converter for PDF sources, called as `<pdf> <format> <input> <output>`.
    pub pdf_program: String,
    pub timeout: Duration,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            office_program: "unoconv".to_string(),
            pdf_program: "pdf2smth".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// A fully resolved converter command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a document from one format to another.
    ///
    /// Input and output live in a private temp directory that is removed
    /// when the call returns. The converter process is killed if it
    /// outlives the configured timeout or the returned future is dropped.
    pub async fn convert(&self, bytes: &[u8], from: &str, to: &str) -> Result<Vec<u8>, ConvertError> {
        let (from, to) = validate(from, to)?;

        let dir = tempfile::tempdir()?;
        let input = dir.path().join(format!("input.{from}"));
        let output = dir.path().join(format!("output.{to}"));
        tokio::fs::write(&input, bytes).await?;

        let invocation = self.invocation(&from, &to, &input, &output);
        debug!(program = %invocation.program, from = %from, to = %to, "starting conversion");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| ConvertError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        let result = match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                error!(program = %invocation.program, timeout = ?self.config.timeout, "conversion timed out");
                return Err(ConvertError::TimedOut(self.config.timeout));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            let code = result
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            error!(program = %invocation.program, code = %code, stderr = %stderr, "conversion failed");
            return Err(ConvertError::ProcessFailed { code, stderr });
        }

        let converted = match tokio::fs::read(&output).await {
            Ok(converted) => converted,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConvertError::EmptyOutput);
            }
            Err(e) => return Err(e.into()),
        };
        if converted.is_empty() {
            return Err(ConvertError::EmptyOutput);
        }

        info!(from = %from, to = %to, size = converted.len(), "file converted");
        Ok(converted)
    }

    /// Command line for converting `input` (of format `from`) into `output`.
    pub fn invocation(&self, from: &str, to: &str, input: &Path, output: &Path) -> Invocation {
        if from.eq_ignore_ascii_case("pdf") {
            Invocation {
                program: self.config.pdf_program.clone(),
                args: vec![to.into(), input.into(), output.into()],
            }
        } else {
            Invocation {
                program: self.config.office_program.clone(),
                args: vec![
                    "-f".into(),
                    to.into(),
                    "-o".into(),
                    output.into(),
                    input.into(),
                ],
            }
        }
    }
}

/// Normalized `(from, to)` extensions, or why the pair cannot be converted.
fn validate(from: &str, to: &str) -> Result<(String, String), ConvertError> {
    let from = from.trim().trim_start_matches('.').to_lowercase();
    let to = to.trim().trim_start_matches('.').to_lowercase();

    if from.is_empty() || !from.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConvertError::UnsupportedFormat(format!(
            "invalid source format {from:?}"
        )));
    }
    if !format::is_conversion_target(&to) {
        return Err(ConvertError::UnsupportedFormat(format!(
            "cannot convert to {to:?}"
        )));
    }
    if from == to {
        return Err(ConvertError::UnsupportedFormat(format!(
            "source and target are both {to}"
        )));
    }
    Ok((from, to))
}
