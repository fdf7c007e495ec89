//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - chat: terminal REPL
//! - web: web chat UI
//! - ask: one-shot knowledge-base question
//! - index: build or refresh the vector index
//! - doctor: validate configuration and check dependencies

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::agent::HelpdeskAgent;
use crate::config::Config;
use crate::knowledge::{corpus, index, RagGateway, VectorIndex};
use crate::llm::gemini::GeminiProvider;
use crate::secrets::{SecretManager, SecretString};
use crate::{repl, web};

/// Resolve the API key, load the policy corpus and the vector index, and wire
/// up the Gemini-backed gateway
pub async fn build_gateway(config: &Config, rebuild: bool) -> Result<RagGateway> {
    let api_key = SecretManager::default()
        .google_api_key()
        .context("A Google API key is required. Set GOOGLE_API_KEY or add it to your .env file")?;

    gateway_with_key(config, api_key, rebuild).await
}

/// Wire up the gateway with an already resolved API key
pub async fn gateway_with_key(
    config: &Config,
    api_key: SecretString,
    rebuild: bool,
) -> Result<RagGateway> {
    let policies_dir = &config.knowledge.policies_dir;
    corpus::ensure_policies_dir(policies_dir)?;
    let documents = corpus::load_documents(policies_dir)?;

    let provider = Arc::new(GeminiProvider::new(config.llm.gemini.clone(), api_key));

    let index = index::load_or_build(
        &config.knowledge.index_path,
        &documents,
        provider.as_ref(),
        rebuild,
    )
    .await
    .context("Failed to prepare the policy knowledge base")?;
    info!(documents = index.len(), "Knowledge base ready");

    Ok(RagGateway::new(
        index,
        Arc::<GeminiProvider>::clone(&provider),
        provider,
        config.knowledge.top_k,
    ))
}

/// Build a ready-to-use agent from configuration
pub async fn build_agent(config: &Config, rebuild: bool) -> Result<HelpdeskAgent> {
    let gateway = build_gateway(config, rebuild).await?;
    Ok(HelpdeskAgent::with_memory_capacity(
        Arc::new(gateway),
        config.memory.max_turns,
    ))
}

/// Run the terminal chat
pub async fn handle_chat(config: &Config) -> Result<()> {
    let mut agent = build_agent(config, false).await?;
    repl::run(&mut agent).await
}

/// Serve the web chat UI
pub async fn handle_web(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let agent = build_agent(config, false).await?;
    let host = host.unwrap_or_else(|| config.web.host.clone());
    let port = port.unwrap_or(config.web.port);

    web::serve(agent, &host, port).await
}

/// Answer a single question and print the response
pub async fn handle_ask(config: &Config, question: &str) -> Result<()> {
    let mut agent = build_agent(config, false).await?;
    println!("{}", agent.process(question).await);
    Ok(())
}

/// Build or refresh the vector index and report its size
pub async fn handle_index(config: &Config, rebuild: bool) -> Result<()> {
    let gateway = build_gateway(config, rebuild).await?;
    println!(
        "Indexed {} policy documents into {}",
        gateway.index().len(),
        config.knowledge.index_path.display()
    );
    Ok(())
}

/// Result of the `doctor` checks
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Check name and its status line, in the order they ran
    pub checks: Vec<(&'static str, String)>,
    pub issues: Vec<String>,
}

impl DoctorReport {
    /// Status line recorded for `check`
    pub fn status(&self, check: &str) -> Option<&str> {
        self.checks
            .iter()
            .find(|(name, _)| *name == check)
            .map(|(_, status)| status.as_str())
    }

    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Run system diagnostics
///
/// Never contacts the Gemini API and never reads the API key's value.
pub fn diagnose(config: &Config, config_path: &Path) -> DoctorReport {
    let mut report = DoctorReport::default();
    let checks = &mut report.checks;
    let issues = &mut report.issues;

    // Check 1: Configuration
    if config_path.exists() {
        checks.push(("Configuration", config_path.display().to_string()));
    } else {
        checks.push(("Configuration", "Defaults (no file)".to_string()));
    }

    // Check 2: Data directory
    if config.core.data_dir.exists() {
        checks.push(("Data directory", "Exists".to_string()));
    } else {
        checks.push(("Data directory", "Missing".to_string()));
        issues.push(format!(
            "Data directory does not exist: {}",
            config.core.data_dir.display()
        ));
    }

    // Check 3: Policy documents
    let policies_dir = &config.knowledge.policies_dir;
    let mut documents = Vec::new();
    if policies_dir.is_dir() {
        match corpus::load_documents(policies_dir) {
            Ok(docs) => {
                checks.push(("Policy documents", format!("{} found", docs.len())));
                if docs.is_empty() {
                    issues.push(format!(
                        "No .md files in {}. Add your IT policy documents there.",
                        policies_dir.display()
                    ));
                }
                documents = docs;
            }
            Err(e) => {
                checks.push(("Policy documents", "Unreadable".to_string()));
                issues.push(e.to_string());
            }
        }
    } else {
        checks.push(("Policy documents", "Directory missing".to_string()));
        issues.push(format!(
            "Policies directory does not exist: {}",
            policies_dir.display()
        ));
    }

    // Check 4: Vector index
    let index_path = &config.knowledge.index_path;
    if index_path.exists() {
        match VectorIndex::load(index_path) {
            Ok(index) => {
                let current = corpus::fingerprint(&documents, &config.llm.gemini.embedding_model);
                if documents.is_empty() || index.fingerprint() == current {
                    checks.push(("Vector index", format!("{} documents", index.len())));
                } else {
                    checks.push(("Vector index", "Stale (rebuilt on next start)".to_string()));
                }
            }
            Err(e) => {
                checks.push(("Vector index", "Unreadable".to_string()));
                issues.push(format!("Cannot load vector index: {}", e));
            }
        }
    } else {
        checks.push(("Vector index", "Not built".to_string()));
    }

    // Check 5: API key
    if SecretManager::default().has_google_api_key() {
        checks.push(("Google API key", "Configured".to_string()));
    } else {
        checks.push(("Google API key", "Not configured".to_string()));
        issues.push("GOOGLE_API_KEY is not set. The helpdesk cannot start without it.".to_string());
    }

    report
}

/// Print the diagnostics report
pub async fn handle_doctor(config: &Config, config_path: &Path) -> Result<()> {
    let report = diagnose(config, config_path);

    println!("IT Helpdesk Diagnostics");
    println!("============================");
    println!();

    println!("System Checks:");
    for (check, status) in &report.checks {
        println!("  {:<25} {}", format!("{}:", check), status);
    }

    println!();

    if report.is_healthy() {
        println!("✓ All checks passed!");
    } else {
        println!("⚠ Issues found:");
        println!();
        for (i, issue) in report.issues.iter().enumerate() {
            println!("  {}. {}", i + 1, issue);
        }
    }

    Ok(())
}
