//! Spoken output for short responses.

use crate::config::SpeechConfig;
use async_trait::async_trait;
use maestro_agents::CommandRunner;
use maestro_common::{MaestroError, Result};
use std::sync::Arc;

#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Speaks through an external text-to-speech program (`say -r <rate> <text>`).
pub struct CommandSpeaker {
    runner: Arc<dyn CommandRunner>,
    program: String,
    rate: u32,
}

impl CommandSpeaker {
    pub fn new(runner: Arc<dyn CommandRunner>, config: &SpeechConfig) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            rate: config.rate,
        }
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        let args = vec!["-r".to_string(), self.rate.to_string(), text.to_string()];
        let output = self.runner.run(&self.program, &args, None).await;
        if output.success {
            Ok(())
        } else {
            Err(MaestroError::Speech(format!(
                "{} exited with {:?}: {}",
                self.program,
                output.exit_code,
                output.stderr.trim()
            )))
        }
    }
}

/// Discards everything.
pub struct SilentSpeaker;

#[async_trait]
impl Speaker for SilentSpeaker {
    async fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}
