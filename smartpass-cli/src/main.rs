//! smartpass - operator CLI for SmartPass badges
//!
//! Renders badge codes offline, issues and re-issues them against a
//! SmartPass API deployment, and looks up what a scanned badge shows.

mod logger;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use shared::models::{
    BadgeState, EmployeeDraft, EmployeeQuery, EmployeeStatus, IdentifierSource,
};
use smartpass_client::{BadgeIssuer, ClientConfig, Resolution};
use smartpass_qr::HexColor;

#[derive(Parser)]
#[command(name = "smartpass", version, about = "SmartPass badge toolkit")]
struct Cli {
    /// SmartPass REST API base URL
    #[arg(long, env = "SMARTPASS_API_URL", global = true)]
    api_url: Option<String>,

    /// Origin of the public profile page embedded in badges
    #[arg(long, env = "SMARTPASS_PUBLIC_ORIGIN", global = true)]
    origin: Option<String>,

    /// Path prefix of the public profile route
    #[arg(long, env = "SMARTPASS_QR_PATH_PREFIX", global = true)]
    prefix: Option<String>,

    /// Bearer token for admin endpoints
    #[arg(long, env = "SMARTPASS_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Record field badges identify employees by (record-id, employee-code)
    #[arg(long, env = "SMARTPASS_IDENTIFIER_SOURCE", global = true)]
    identifier_source: Option<IdentifierSource>,

    /// Directory for daily log files (stderr when unset)
    #[arg(long, env = "SMARTPASS_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a badge code without contacting the API
    Qr {
        identifier: String,
        /// Image side in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Quiet zone in modules
        #[arg(long)]
        margin: Option<u32>,
        /// Foreground color, e.g. #135bec
        #[arg(long)]
        dark: Option<HexColor>,
        /// Background color
        #[arg(long)]
        light: Option<HexColor>,
        /// Write the PNG here instead of printing a data URL
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Create an employee and store their badge code
    Enroll {
        #[arg(long)]
        name: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        category: String,
        /// Employee code; generated when empty
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },

    /// Re-render and store badge codes for existing records
    Regenerate {
        #[arg(required = true)]
        identifiers: Vec<String>,
    },

    /// Show what a scanned badge resolves to
    Resolve { identifier: String },

    /// List employees
    Employees {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = shared::pagination::DEFAULT_PAGE_SIZE)]
        limit: u32,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<EmployeeStatus>,
        #[arg(long)]
        company: Option<String>,
    },

    /// Dashboard counters
    Stats,
}

impl Cli {
    /// Environment defaults with flags on top
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(origin) = &self.origin {
            config.public_origin = origin.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.qr_path_prefix = prefix.clone();
        }
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if let Some(source) = self.identifier_source {
            config.identifier_source = source;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init_logger(cli.log_dir.as_deref());

    let mut config = cli.client_config();
    tracing::debug!(api = %config.api_url, origin = %config.public_origin, "configuration loaded");

    match cli.command {
        Command::Qr {
            identifier,
            width,
            margin,
            dark,
            light,
            out,
        } => {
            let mut options = config.qr_options;
            if let Some(width) = width {
                options = options.with_pixel_width(width);
            }
            if let Some(margin) = margin {
                options = options.with_margin(margin);
            }
            options = options.with_colors(dark.unwrap_or(options.dark), light.unwrap_or(options.light));
            config.qr_options = options;

            let image = config.build_codec()?.encode(&identifier)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, image.png_bytes())
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), payload = %image.payload(), "badge written");
                }
                None => println!("{}", image.data_url()),
            }
        }

        Command::Enroll {
            name,
            title,
            department,
            category,
            code,
            email,
            company,
        } => {
            let mut draft = EmployeeDraft::new(name, title, department, category);
            draft.employee_code = code;
            draft.email = email;
            draft.company = company;

            let issuer = BadgeIssuer::from_config(&config)?;
            match issuer.enroll(draft).await {
                Ok(enrollment) => {
                    println!(
                        "{}\t{}\t{}",
                        enrollment.employee.id,
                        enrollment.employee.employee_code.as_deref().unwrap_or("-"),
                        enrollment.image.payload()
                    );
                }
                Err(e) => {
                    if let Some(saved) = e.saved_without_code() {
                        eprintln!("record {} was saved WITHOUT a badge code", saved.id);
                    }
                    return Err(e.into());
                }
            }
        }

        Command::Regenerate { identifiers } => {
            let issuer = BadgeIssuer::from_config(&config)?;
            let outcomes = issuer.regenerate_many(identifiers).await;

            let mut failed = 0;
            for (identifier, outcome) in &outcomes {
                match outcome {
                    Ok(image) => println!("ok\t{identifier}\t{}", image.payload()),
                    Err(e) => {
                        failed += 1;
                        let hint = if e.is_retryable() { " (retryable)" } else { "" };
                        println!("failed\t{identifier}\t{e}{hint}");
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} of {} badge codes were not saved", outcomes.len());
            }
        }

        Command::Resolve { identifier } => {
            let client = config.build_client()?;
            match client.resolve(&identifier).await? {
                Resolution::Found(profile) => {
                    println!("{}", serde_json::to_string_pretty(&profile)?);
                }
                Resolution::NotFound => {
                    println!("not found");
                    std::process::exit(2);
                }
            }
        }

        Command::Employees {
            page,
            limit,
            search,
            status,
            company,
        } => {
            let query = EmployeeQuery {
                page: page.max(1),
                limit: limit.max(1),
                search,
                status,
                company,
            };
            let client = config.build_client()?;
            let list = client.list_employees(&query).await?;

            println!(
                "{:<26} {:<10} {:<28} {:<22} {:<8} BADGE",
                "ID", "CODE", "NAME", "TITLE", "STATUS"
            );
            for e in &list.items {
                let badge = match e.badge_state() {
                    BadgeState::CodePresent => "yes",
                    BadgeState::CodeAbsent => "no",
                };
                println!(
                    "{:<26} {:<10} {:<28} {:<22} {:<8} {}",
                    e.id,
                    e.employee_code.as_deref().unwrap_or("-"),
                    e.full_name,
                    e.job_title.as_deref().unwrap_or("-"),
                    e.status,
                    badge
                );
            }
            println!("page {} of {}", list.page, list.total_pages);
        }

        Command::Stats => {
            let client = config.build_client()?;
            let stats = client.dashboard_stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            tracing::info!(coverage = stats.qr_coverage_percent(), "badge coverage (%)");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_environment() {
        let cli = Cli::parse_from([
            "smartpass",
            "--origin",
            "https://badges.example",
            "--identifier-source",
            "employee-code",
            "qr",
            "SP000123",
        ]);
        let config = cli.client_config();
        assert_eq!(config.public_origin, "https://badges.example");
        assert_eq!(config.identifier_source, IdentifierSource::EmployeeCode);
        assert!(matches!(cli.command, Command::Qr { ref identifier, .. } if identifier == "SP000123"));
    }

    #[test]
    fn test_qr_colors_parse() {
        let cli = Cli::parse_from(["smartpass", "qr", "SP1", "--dark", "#000", "--width", "256"]);
        match cli.command {
            Command::Qr { dark, width, .. } => {
                assert_eq!(dark, Some(HexColor::rgb(0, 0, 0)));
                assert_eq!(width, Some(256));
            }
            _ => panic!("expected qr"),
        }
    }
}
