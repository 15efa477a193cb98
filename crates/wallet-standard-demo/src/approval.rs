//! Approval policies for the demo wallets

use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;
use wallet_standard_core::{Approval, Approver, AutoApprove, AutoReject, BoxError, ConnectRequest};

/// How a demo wallet answers connect requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalPolicy {
    /// Approve every request
    #[default]
    Approve,
    /// Reject every request
    Reject,
    /// Ask on the terminal
    Prompt,
}

impl ApprovalPolicy {
    pub fn approver(self) -> Arc<dyn Approver> {
        match self {
            Self::Approve => Arc::new(AutoApprove),
            Self::Reject => Arc::new(AutoReject),
            Self::Prompt => Arc::new(PromptApprover),
        }
    }
}

/// Asks the user on stdin; anything but `y`/`yes` rejects
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptApprover;

#[async_trait]
impl Approver for PromptApprover {
    async fn approve(
        &self,
        wallet_name: &str,
        request: &ConnectRequest,
    ) -> Result<Approval, BoxError> {
        let mut stderr = tokio::io::stderr();
        stderr
            .write_all(prompt_text(wallet_name, request).as_bytes())
            .await?;
        stderr.flush().await?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        if read == 0 {
            debug!("Stdin closed while prompting; rejecting");
            return Ok(Approval::Rejected);
        }
        Ok(parse_answer(&line))
    }
}

fn prompt_text(wallet_name: &str, request: &ConnectRequest) -> String {
    let chains: Vec<_> = request.chains.iter().map(|c| c.as_str()).collect();
    let features = match &request.features {
        None => "all features".to_string(),
        Some(names) if names.is_empty() => "read-only access".to_string(),
        Some(names) => names
            .iter()
            .map(|n| n.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    };
    format!(
        "{wallet_name}: connect on {} with {features}? [y/N] ",
        chains.join(", ")
    )
}

fn parse_answer(line: &str) -> Approval {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Approval::Approved,
        _ => Approval::Rejected,
    }
}
