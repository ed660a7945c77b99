//! OTP Command

use std::time::Duration;

use anyhow::{Context, Result};
use caseflow_common::config::ENV_TOTP_SECRET;
use caseflow_common::otp::{self, OtpGenerator};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct OtpArgs {
    /// Wait for the next step when fewer than this many seconds remain
    #[arg(long, value_name = "SECS")]
    pub fresh: Option<u64>,
}

/// One-time code for display
#[derive(Serialize)]
pub struct OtpDisplay {
    pub code: String,
    pub seconds_remaining: u64,
    pub step_secs: u64,
}

impl TableDisplay for OtpDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Code", "Seconds Left", "Step"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.seconds_remaining.to_string(),
            format!("{}s", self.step_secs),
        ]
    }
}

pub async fn execute(args: OtpArgs, format: OutputFormat) -> Result<()> {
    let secret = std::env::var(ENV_TOTP_SECRET)
        .with_context(|| format!("Missing env: set {}", ENV_TOTP_SECRET))?;
    let generator = OtpGenerator::new(&secret).context("Invalid TOTP secret")?;

    let mut now = otp::now_epoch_secs();
    let remaining = otp::seconds_remaining(now);
    if let Some(min) = args.fresh {
        if remaining < min {
            info!("Only {}s left on the current code, waiting for the next one", remaining);
            tokio::time::sleep(Duration::from_secs(remaining)).await;
            now = otp::now_epoch_secs();
        }
    }

    let display = OtpDisplay {
        code: generator.generate_at(now),
        seconds_remaining: otp::seconds_remaining(now),
        step_secs: otp::STEP_SECS,
    };
    print_item(&display, format);

    Ok(())
}
