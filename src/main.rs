// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Formation Portal CLI
//!
//! Logs in against the auth backend, keeps the session in a local file, and
//! browses formations and reservations with the stored credential.

use anyhow::Context;
use clap::{Parser, Subcommand};
use formation_portal::{
    config::Config,
    models::{
        reservation::filter_by_status, Categorie, Formation, LoginRequest, RegisterRequest,
        ReservationStats, ReservationStatus,
    },
    services::password,
    session::Role,
    Portal,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Formation portal - session and administration client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD")]
        password: String,
    },

    /// Create an enseignant account (does not log in)
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    /// Request a password reset code by email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Set a new password with the emailed code
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
        #[arg(long)]
        new_password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Try to open a portal route with the current session
    Navigate { path: String },

    /// List formations
    Formations,

    /// Create a formation with a cover image (admin)
    AddFormation {
        #[arg(long)]
        titre: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Cover image file
        #[arg(long)]
        image: std::path::PathBuf,
        /// Online session (otherwise on site)
        #[arg(long)]
        en_ligne: bool,
        #[arg(long)]
        lieu: Option<String>,
        /// Start, as `YYYY-MM-DDTHH:MM:SS`
        #[arg(long)]
        date_debut: Option<String>,
        #[arg(long)]
        date_fin: Option<String>,
        #[arg(long)]
        categorie_id: Option<u64>,
        #[arg(long)]
        formateur_id: Option<u64>,
        #[arg(long)]
        prix: Option<f64>,
    },

    /// List reservations (own reservations for enseignants)
    Reservations {
        /// Filter by status (CONFIRME, EN_ATTENTE, ANNULE, REFUSE)
        #[arg(long)]
        status: Option<String>,
    },

    /// Rate a password
    PasswordStrength { password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let portal = Portal::open(config).context("Failed to open session")?;

    match cli.command {
        Commands::Login { email, password } => {
            let outcome = portal
                .session
                .login(&LoginRequest::new(email, password))
                .await?;
            println!(
                "Logged in as user {} ({}), now at {}",
                outcome.credential.user_id, outcome.credential.role, outcome.navigation.location
            );
        }
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            phone,
            address,
        } => {
            if !portal.session.check_email_unique(&email).await? {
                anyhow::bail!("Email is already in use");
            }
            if let Some(phone) = &phone {
                if !portal.session.check_phone_unique(phone).await? {
                    anyhow::bail!("Phone number is already in use");
                }
            }
            let request = RegisterRequest {
                first_name,
                last_name,
                email,
                password,
                phone_number: phone,
                address,
                role_type: Role::Enseignant,
            };
            portal.session.register(&request).await?;
            println!("Account created. Log in with `portal login`.");
        }
        Commands::ForgotPassword { email } => {
            println!("{}", portal.session.forgot_password(&email).await?);
        }
        Commands::ResetPassword {
            email,
            otp,
            new_password,
        } => {
            println!(
                "{}",
                portal
                    .session
                    .reset_password(&email, &otp, &new_password)
                    .await?
            );
        }
        Commands::Logout => {
            portal.session.logout()?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let user = portal.session.current_user().await?;
            let role = portal
                .store
                .role()
                .map(|r| r.to_string())
                .unwrap_or_default();
            println!("{} <{}> {}", user.full_name(), user.email, role);
        }
        Commands::Navigate { path } => {
            let nav = portal.router.navigate(&path);
            match nav.denied {
                None => println!("{}", nav.location),
                Some(reason) => println!("{} (denied: {:?})", nav.location, reason),
            }
        }
        Commands::Formations => {
            for formation in portal.formations.formations().await? {
                println!(
                    "{:>5}  {}  [{}]",
                    formation.id.map(|id| id.to_string()).unwrap_or_default(),
                    formation.titre,
                    formation.location()
                );
            }
        }
        Commands::AddFormation {
            titre,
            description,
            image,
            en_ligne,
            lieu,
            date_debut,
            date_fin,
            categorie_id,
            formateur_id,
            prix,
        } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("Cannot read image {}", image.display()))?;
            let file_name = image
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image")
                .to_string();

            let formation = Formation {
                titre,
                description,
                en_ligne,
                lieu,
                date_debut,
                date_fin,
                formateur_id,
                prix,
                categorie: categorie_id.map(|id| Categorie {
                    id: Some(id),
                    ..Categorie::default()
                }),
                ..Formation::default()
            };
            let created = portal
                .formations
                .add_formation(&formation, bytes, &file_name)
                .await?;
            println!(
                "Created formation {} ({})",
                created.id.map(|id| id.to_string()).unwrap_or_default(),
                created.titre
            );
        }
        Commands::Reservations { status } => {
            let status = status
                .as_deref()
                .map(|s| {
                    ReservationStatus::parse(s)
                        .with_context(|| format!("Unknown reservation status {:?}", s))
                })
                .transpose()?;

            let reservations = if portal.store.is_admin() {
                portal.formations.reservations().await?
            } else {
                let user_id = portal
                    .store
                    .user_id()
                    .context("Not logged in")?;
                portal.formations.reservations_by_participant(user_id).await?
            };

            let stats = ReservationStats::from_reservations(&reservations);
            for r in filter_by_status(&reservations, status) {
                println!(
                    "{:>5}  {:<10}  {}  {}",
                    r.id.map(|id| id.to_string()).unwrap_or_default(),
                    r.status.label(),
                    r.formation_title,
                    r.participant_name
                );
            }
            println!(
                "total {} / confirmed {} / pending {} / cancelled {} / refused {}",
                stats.total, stats.confirmed, stats.pending, stats.cancelled, stats.refused
            );
        }
        Commands::PasswordStrength { password } => {
            let score = password::score(&password);
            println!("{} ({}/100)", password::strength(&password), score);
        }
    }

    Ok(())
}

/// Initialize logging: JSON when `PORTAL_LOG_JSON=1`, compact text otherwise.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("formation_portal=debug,info"));

    let json = std::env::var("PORTAL_LOG_JSON").is_ok_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
