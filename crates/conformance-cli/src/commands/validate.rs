//! Validate command implementation.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use conformance_client::HttpTransport;
use conformance_core::MessageLevel;
use conformance_engine::{ConformanceValidator, ValidatorConfig};
use conformance_profiles::{FileProfileStore, FileSchemaStore};
use tracing::info;

/// Run the conformance test profile against a live service
#[derive(Args)]
pub struct ValidateCommand {
    /// Base URL of the service under test
    pub url: String,

    /// Force a standard version instead of negotiating one,
    /// e.g. HSDS-UK-3.0
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Directory holding the test profile definitions
    #[arg(long, default_value = "profiles")]
    pub profiles_dir: PathBuf,

    /// Directory holding the JSON Schema documents
    #[arg(long, default_value = "schemas")]
    pub schemas_dir: PathBuf,

    /// Seed for randomized page and item sampling, for reproducible
    /// runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pretty-print the report JSON
    #[arg(long)]
    pub pretty: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub async fn execute(&self) -> anyhow::Result<ExitCode> {
        info!("Validating service: {}", self.url);

        let transport = HttpTransport::new()?;
        let profiles = FileProfileStore::new(&self.profiles_dir);
        let schemas = FileSchemaStore::new(&self.schemas_dir);

        let config = ValidatorConfig {
            seed: self.seed,
            ..ValidatorConfig::default()
        };
        let validator = ConformanceValidator::with_config(
            Arc::new(transport),
            Arc::new(profiles),
            Arc::new(schemas),
            config,
        );

        let report = validator
            .validate(&self.url, self.profile.as_deref())
            .await?;

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{json}");

        // Human-facing summary on stderr; stdout stays machine-readable.
        eprintln!(
            "Profile: {} ({})",
            report.service.profile, report.service.profile_reason
        );
        for suite in &report.test_suites {
            let icon = match (suite.success, suite.message_level) {
                (true, _) => "✅",
                (false, MessageLevel::Error) => "❌",
                (false, MessageLevel::Warning) => "🟡",
            };
            eprintln!("{icon} {} ({} tests)", suite.name, suite.tests.len());
        }

        if report.service.is_valid {
            eprintln!("✅ Service conforms to {}", report.service.profile);
            Ok(ExitCode::SUCCESS)
        } else {
            eprintln!("❌ Service does not conform to {}", report.service.profile);
            Ok(ExitCode::FAILURE)
        }
    }
}
