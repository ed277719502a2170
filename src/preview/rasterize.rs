//! Rasterizer seam: HTML document in, PNG bytes out

use std::io::Write;
use std::process::{Command, Stdio};

use crate::config::RasterizerConfig;
use crate::error::PreviewError;

/// Converts a preview document into an image
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, html: &str, width: u32, height: u32) -> Result<Vec<u8>, PreviewError>;
}

/// Runs an external tool that reads HTML on stdin and writes PNG to stdout
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    command: String,
    args: Vec<String>,
}

impl CommandRasterizer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// `None` when no command is configured
    pub fn from_config(config: &RasterizerConfig) -> Option<Self> {
        config
            .command
            .as_ref()
            .filter(|c| !c.trim().is_empty())
            .map(|c| Self::new(c.clone(), config.args.clone()))
    }

    fn expand_args(&self, width: u32, height: u32) -> Vec<String> {
        self.args
            .iter()
            .map(|a| {
                a.replace("{width}", &width.to_string())
                    .replace("{height}", &height.to_string())
            })
            .collect()
    }
}

impl Rasterizer for CommandRasterizer {
    fn rasterize(&self, html: &str, width: u32, height: u32) -> Result<Vec<u8>, PreviewError> {
        let args = self.expand_args(width, height);
        tracing::debug!("Rasterizing with {} {:?}", self.command, args);

        let mut child = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PreviewError::Rasterize(format!("cannot spawn {}: {}", self.command, e)))?;

        // Feed stdin from a separate thread so a chatty child cannot block us
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PreviewError::Rasterize("stdin unavailable".to_string()))?;
        let input = html.as_bytes().to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&input));

        let output = child
            .wait_with_output()
            .map_err(|e| PreviewError::Rasterize(e.to_string()))?;
        let written = writer
            .join()
            .map_err(|_| PreviewError::Rasterize("stdin writer panicked".to_string()))?;

        if !output.status.success() {
            return Err(PreviewError::Rasterize(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        written.map_err(|e| PreviewError::Rasterize(format!("writing document: {}", e)))?;

        Ok(output.stdout)
    }
}
