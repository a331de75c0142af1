// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GoBarber command-line client
//!
//! Signs in against the GoBarber API, keeps the session in the local
//! credential store, and prints the provider's schedule for a day.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gobarber_client::{
    config::Config,
    models::{
        ForgotPasswordRequest, ProfileUpdate, ResetPasswordRequest, SignInCredentials,
        SignUpRequest,
    },
    services::{FetchOutcome, ScheduledAppointment},
    Client,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gobarber", version, about = "GoBarber provider client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session
    SignOut,
    /// Show the signed-in user
    Whoami,
    /// Show the schedule for a day (defaults to today)
    Schedule {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List providers
    Providers,
    /// Show where a navigation to PATH ends up
    Navigate { path: String },
    /// Create an account
    SignUp {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Request a password recovery e-mail
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Reset the password with the token from the recovery e-mail
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirmation: String,
    },
    /// Update name, e-mail and optionally the password
    UpdateProfile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        old_password: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        password_confirmation: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(api_url = %config.api_url, "Starting GoBarber client");

    let client = Client::from_config(config)?;

    match cli.command {
        Command::SignIn { email, password } => {
            let user = client
                .session
                .sign_in(SignInCredentials::new(email, password))
                .await?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        Command::SignOut => {
            client.session.sign_out()?;
            println!("Signed out");
        }
        Command::Whoami => match client.session.current_user() {
            Some(user) => println!("{} <{}> (id {})", user.name, user.email, user.id),
            None => println!("Not signed in"),
        },
        Command::Schedule { date } => print_schedule(&client, date).await?,
        Command::Providers => {
            for provider in client.providers().await? {
                println!("{}  {}", provider.id, provider.name);
            }
        }
        Command::Navigate { path } => {
            let mut navigator = client.navigator("/");
            let decision = navigator.navigate(&path);
            if decision.is_redirect() {
                println!("{} -> redirect to {}", path, decision.destination());
            } else {
                println!("{} -> render {}", path, decision.destination());
            }
        }
        Command::SignUp {
            name,
            email,
            password,
        } => {
            let user = client
                .accounts
                .sign_up(SignUpRequest {
                    name,
                    email,
                    password,
                })
                .await?;
            println!("Account created for {}; sign in to continue", user.email);
        }
        Command::ForgotPassword { email } => {
            client
                .accounts
                .forgot_password(ForgotPasswordRequest { email })
                .await?;
            println!("Recovery e-mail sent");
        }
        Command::ResetPassword {
            token,
            password,
            password_confirmation,
        } => {
            client
                .accounts
                .reset_password(ResetPasswordRequest::from_link(
                    &token,
                    password,
                    password_confirmation,
                ))
                .await?;
            println!("Password reset; sign in with the new password");
        }
        Command::UpdateProfile {
            name,
            email,
            old_password,
            password,
            password_confirmation,
        } => {
            let user = client
                .session
                .update_profile(ProfileUpdate {
                    name,
                    email,
                    old_password,
                    password,
                    password_confirmation,
                })
                .await?;
            println!("Profile updated: {} <{}>", user.name, user.email);
        }
    }

    Ok(())
}

async fn print_schedule(client: &Client, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let schedule = client.schedule();
    if let Some(date) = date {
        schedule.change_month(date);
        schedule.select_date(date);
    }

    let (availability, appointments) = schedule.refresh().await;
    let outcomes = [availability?, appointments?];
    if outcomes.contains(&FetchOutcome::Superseded) {
        anyhow::bail!("Session changed while loading the schedule");
    }

    let selection = schedule.selection();
    println!("Schedule for {}", selection.selected_date.format("%A, %Y-%m-%d"));

    let disabled: Vec<String> = schedule
        .disabled_days()
        .iter()
        .map(|d| d.format("%d").to_string())
        .collect();
    println!(
        "Unavailable days in {}: {}",
        selection.current_month.format("%B %Y"),
        if disabled.is_empty() {
            "none".to_string()
        } else {
            disabled.join(", ")
        }
    );

    if let Some(next) = schedule.todays_next_appointment() {
        println!("\nNext appointment: {} {}", next.formatted_hour, next.appointment.user.name);
    }

    print_period("Morning", &schedule.morning_appointments());
    print_period("Afternoon", &schedule.afternoon_appointments());
    Ok(())
}

fn print_period(title: &str, appointments: &[ScheduledAppointment]) {
    println!("\n{}", title);
    if appointments.is_empty() {
        println!("  No appointments in this period");
    }
    for appointment in appointments {
        println!(
            "  {}  {}",
            appointment.formatted_hour, appointment.appointment.user.name
        );
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,gobarber_client=info")),
        )
        .with(format)
        .init();
}
