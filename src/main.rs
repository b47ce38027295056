// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness-Sync command line client
//!
//! Drives the sync layer from a terminal: signs in, then lists or mutates
//! workouts, groups and friends. Output is JSON on stdout; logs go to stderr.

use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use fitness_sync::{
    config::Config,
    models::{UserSummary, WorkoutStats},
    services::{NoopAdSdk, SetLogDraft},
    AppContext,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fitness-Sync - workout tracking from the terminal
#[derive(Parser)]
#[command(name = "fitness-sync")]
#[command(version)]
struct Cli {
    /// Account email (or FITNESS_EMAIL)
    #[arg(long, global = true)]
    email: Option<String>,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    SignUp,

    /// Show this week's totals, streak and recent workouts
    Stats,

    /// List workouts with their set logs
    Workouts,

    /// List exercises for a workout, already-logged ones first
    Exercises { workout_id: String },

    /// Start a workout
    Start {
        /// Workout date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Group to start the workout in
        #[arg(long)]
        group: Option<String>,
    },

    /// Log a set
    LogSet {
        workout_id: String,
        exercise_id: String,
        /// Weight in kilograms
        weight: f64,
        reps: u32,
    },

    /// List joined and available groups
    Groups,

    /// Show a group's members
    Group { group_id: String },

    /// Create a group
    CreateGroup {
        title: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        image_url: Option<String>,
    },

    /// Add a friend to a group
    AddMember { group_id: String, user_id: String },

    /// List friends, optionally filtered by name
    Friends {
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// List incoming friend requests
    Requests,

    /// Send a friend request
    SendRequest { user_id: String },

    /// Accept a friend request
    Accept { friendship_id: String },

    /// Reject a friend request
    Reject { friendship_id: String },

    /// Add a friend from a scanned QR payload
    AddFriend { payload: String },

    /// Print your friend QR code
    Qr,

    /// Show your profile
    Profile,

    /// Show subscription status
    Subscription {
        /// Entitlement to check
        #[arg(long, default_value = "premium")]
        entitlement: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(gateway = %config.gateway_url, env = %config.app_env, "Starting Fitness-Sync");

    let ctx = AppContext::new(config, Arc::new(NoopAdSdk));

    let email = cli
        .email
        .clone()
        .or_else(|| std::env::var("FITNESS_EMAIL").ok())
        .context("--email or FITNESS_EMAIL is required")?;
    let password = std::env::var("FITNESS_PASSWORD").context("FITNESS_PASSWORD is required")?;

    let signed_in = match cli.command {
        Commands::SignUp => ctx.session.sign_up_with_email(&email, &password).await,
        _ => ctx.session.sign_in_with_email(&email, &password).await,
    };
    if let Err(e) = signed_in {
        anyhow::bail!(ctx.session.last_error().await.unwrap_or_else(|| e.to_string()));
    }

    let result = run(&ctx, cli.command, cli.yes).await;
    ctx.sign_out().await?;
    result
}

async fn run(ctx: &AppContext, command: Commands, yes: bool) -> Result<()> {
    let confirm = |prompt: &str| yes || ask(prompt);

    match command {
        Commands::SignUp => {
            print_json(&ctx.session.current_identity().await)?;
        }
        Commands::Stats => {
            ctx.workouts.refresh().await?;
            let stats = WorkoutStats::compute(&ctx.workouts.workouts().await, Utc::now().date_naive());
            print_json(&stats)?;
        }
        Commands::Workouts => {
            ctx.workouts.refresh().await?;
            print_json(&ctx.workouts.workouts().await)?;
        }
        Commands::Exercises { workout_id } => {
            ctx.workouts.refresh().await?;
            print_json(&ctx.workouts.available_exercises(&workout_id).await)?;
        }
        Commands::Start { date, group } => {
            ctx.workouts.refresh().await?;
            let workout = ctx.workouts.start_workout(date, group.as_deref()).await?;
            print_json(&workout)?;
        }
        Commands::LogSet {
            workout_id,
            exercise_id,
            weight,
            reps,
        } => {
            ctx.workouts.refresh().await?;
            let set_log = ctx
                .workouts
                .add_set_log(SetLogDraft {
                    workout_id: Some(workout_id),
                    exercise_id: Some(exercise_id),
                    weight: Some(weight),
                    rep_count: Some(reps),
                })
                .await?;
            print_json(&set_log)?;
        }
        Commands::Groups => {
            ctx.groups.refresh().await?;
            print_json(&GroupListing {
                joined: ctx.groups.joined_groups().await,
                available: ctx.groups.available_groups().await,
            })?;
        }
        Commands::Group { group_id } => {
            let group = ctx.groups.group(&group_id).await?;
            print_json(&ctx.groups.members(&group))?;
        }
        Commands::CreateGroup {
            title,
            date,
            image_url,
        } => {
            ctx.groups.refresh().await?;
            let group = ctx
                .groups
                .create_group(&title, date, image_url.as_deref())
                .await?;
            print_json(&group)?;
        }
        Commands::AddMember { group_id, user_id } => {
            ctx.friends.refresh().await?;
            let friend = ctx
                .friends
                .friends()
                .await
                .into_iter()
                .find(|f| f.id == user_id)
                .with_context(|| format!("{} is not in your friend list", user_id))?;
            ctx.groups.refresh().await?;
            let added = ctx.groups.add_member(&group_id, &friend, &confirm).await?;
            print_json(&added)?;
        }
        Commands::Friends { query } => {
            ctx.friends.refresh().await?;
            print_json(&ctx.friends.filter_friends(&query, &HashSet::new()).await)?;
        }
        Commands::Requests => {
            ctx.friends.refresh().await?;
            print_json(&ctx.friends.pending_requests().await)?;
        }
        Commands::SendRequest { user_id } => {
            ctx.friends.refresh().await?;
            let target = UserSummary {
                id: user_id,
                uid: String::new(),
                profile: None,
            };
            print_json(&ctx.friends.send_request(&target, &confirm).await?)?;
        }
        Commands::Accept { friendship_id } => {
            ctx.friends.refresh().await?;
            print_json(&ctx.friends.accept(&friendship_id, &confirm).await?)?;
        }
        Commands::Reject { friendship_id } => {
            ctx.friends.refresh().await?;
            print_json(&ctx.friends.reject(&friendship_id, &confirm).await?)?;
        }
        Commands::AddFriend { payload } => {
            ctx.friends.refresh().await?;
            print_json(&ctx.friends.add_by_qr(&payload, &confirm).await?)?;
        }
        Commands::Qr => {
            let user = ctx.api.current_user().await?;
            println!("{}", ctx.qr.render(&user.id)?);
            println!("{}", ctx.qr.uri(&user.id));
        }
        Commands::Profile => {
            let profile = ctx.profile.fetch().await?;
            print_json(&ProfileStatus {
                complete: ctx.profile.is_complete().await,
                profile,
            })?;
        }
        Commands::Subscription { entitlement } => {
            let purchases = ctx
                .purchases
                .as_ref()
                .context("REVENUECAT_API_KEY is not configured")?;
            let info = purchases.customer_info().await?;
            print_json(&info.subscription_info(&entitlement, Utc::now()))?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct GroupListing {
    joined: Vec<fitness_sync::models::WorkoutGroupRef>,
    available: Vec<fitness_sync::models::WorkoutGroup>,
}

#[derive(Serialize)]
struct ProfileStatus {
    complete: bool,
    profile: Option<fitness_sync::models::Profile>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ask a yes/no question on the terminal; anything but "y" declines.
fn ask(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fitness_sync=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
