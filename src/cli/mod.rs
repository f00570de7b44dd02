//! CLI module for the Makeup Now command-line client.
//!
//! Subcommands mirror the platform's screens:
//! - `login` / `logout` / `register` / `whoami` - account and session
//! - `profile show|update|password` - the profile screen
//! - `bookings ...` - customer and provider booking lists and actions
//! - `services ...` / `schedule ...` - provider catalogue and availability
//! - `admin ...` - user moderation and review removal

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::api::{ApiClient, ClientError};
use crate::config::Config;
use crate::models::{
    filter_by_status, Booking, BookingRequest, BookingStatus, LoginRequest, PasswordUpdate,
    PaymentStatusUpdate, ProfileUpdate, ProviderPaymentConfirm, RegisterRequest, Role,
    ScheduleRequest, ScheduleSlot, ServiceRequest, User,
};
use crate::session::{self, Session, TokenStore};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "makeupnow")]
#[command(author, version, about = "Client for the Makeup Now booking platform", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "makeupnow.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API URL to connect to (overrides the configuration file)
    #[arg(long, env = "MAKEUPNOW_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token override (defaults to the stored session token)
    #[arg(long, env = "MAKEUPNOW_TOKEN")]
    pub token: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },

    /// Clear the stored session token
    Logout,

    /// Create a new account
    Register {
        /// First name
        first_name: String,
        /// Last name
        last_name: String,
        /// Account email
        email: String,
        /// Account password
        password: String,
        /// Account role: client or provider
        #[arg(long, default_value = "client")]
        role: String,
        /// Postal address
        #[arg(long)]
        address: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Show the current session and profile
    Whoami,

    /// Profile management commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Booking commands
    #[command(subcommand)]
    Bookings(BookingsCommands),

    /// Service catalogue commands
    #[command(subcommand)]
    Services(ServicesCommands),

    /// List service categories
    Categories,

    /// Availability commands
    #[command(subcommand)]
    Schedule(ScheduleCommands),

    /// Review commands
    #[command(subcommand)]
    Reviews(ReviewsCommands),

    /// Administration commands
    #[command(subcommand)]
    Admin(AdminCommands),
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the full profile from the backend
    Show,
    /// Update profile fields (only the given fields are sent)
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Change the account password
    Password {
        /// Current password
        current: String,
        /// New password
        new: String,
    },
}

/// Bookings subcommands
#[derive(Subcommand, Debug)]
pub enum BookingsCommands {
    /// List bookings for the logged-in customer or provider
    List {
        /// Status filter: CONFIRMED/COMPLETED/CANCELLED or Confirmé/Terminé/Annulé
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Book a service (customers)
    Create {
        /// Service ID
        #[arg(long)]
        service: i64,
        /// Provider ID
        #[arg(long)]
        provider: i64,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Start time (HH:MM)
        #[arg(long)]
        time: String,
    },
    /// Cancel a booking, then show the refreshed list (customers)
    Cancel {
        /// Booking ID
        booking: i64,
    },
    /// Confirm payment received for a booking (providers)
    ConfirmPayment {
        /// Booking ID
        booking: i64,
    },
    /// Update the payment status of a booking
    UpdatePayment {
        /// Booking ID
        booking: i64,
        /// New payment status
        #[arg(long)]
        status: String,
    },
}

/// Services subcommands
#[derive(Subcommand, Debug)]
pub enum ServicesCommands {
    /// List a provider's services (providers default to their own)
    List {
        /// Provider ID (required for customers browsing a provider)
        #[arg(long)]
        provider: Option<i64>,
    },
    /// Create a service (providers)
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: f64,
        /// Duration in minutes
        #[arg(long)]
        duration: u32,
    },
    /// Delete a service (providers)
    Delete {
        /// Service ID
        service: i64,
    },
}

/// Schedule subcommands
#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// List a provider's availability slots
    List {
        /// Provider ID (required for customers browsing a provider)
        #[arg(long)]
        provider: Option<i64>,
    },
    /// Add an availability slot (providers)
    Add {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: String,
        /// End time (HH:MM)
        #[arg(long)]
        end: String,
        /// Duration in minutes
        #[arg(long)]
        duration: Option<u32>,
    },
}

/// Reviews subcommands
#[derive(Subcommand, Debug)]
pub enum ReviewsCommands {
    /// Submit a review for a booking
    Submit {
        /// Booking ID
        #[arg(long)]
        booking: i64,
        /// Rating (1-5)
        #[arg(long)]
        rating: f32,
        /// Comment text
        #[arg(long)]
        comment: Option<String>,
    },
}

/// Admin subcommands
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// List platform users
    Users {
        /// Show only deactivated accounts
        #[arg(long)]
        inactive: bool,
    },
    /// Re-activate a user account
    Activate {
        /// User ID
        user: i64,
    },
    /// Deactivate a user account
    Deactivate {
        /// User ID
        user: i64,
    },
    /// Delete a review
    DeleteReview {
        /// Review ID
        review: i64,
    },
}

// ============================================================================
// Command dispatch
// ============================================================================

/// Everything a command handler needs: resolved configuration, the token
/// store, and any CLI-level overrides.
struct Ctx {
    config: Config,
    store: TokenStore,
    api_url: String,
    token_override: Option<String>,
}

impl Ctx {
    fn new(cli: &Cli, config: Config) -> Self {
        let store = TokenStore::new(config.token_path());
        let api_url = cli
            .api_url
            .clone()
            .unwrap_or_else(|| config.api.base_url.clone());
        Self {
            config,
            store,
            api_url,
            token_override: cli.token.clone(),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.api.timeout_secs)
    }

    /// Client without credentials, for login and register.
    fn anonymous_client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.api_url, None, self.timeout())
            .context("Failed to create HTTP client")
    }

    /// Resolve the session from the override token or the store.
    fn session(&self) -> Result<Session> {
        let session = match &self.token_override {
            Some(token) => session::session_from_token(token),
            None => session::resolve(&self.store),
        };
        session.ok_or_else(|| ClientError::NoSession.into())
    }

    /// Authenticated client plus the session it was built from.
    fn client(&self) -> Result<(ApiClient, Session)> {
        let session = self.session()?;
        let token = match &self.token_override {
            Some(token) => token.clone(),
            // resolve() just accepted the stored token, so it is present.
            None => self.store.load().ok_or(ClientError::NoSession)?,
        };
        let client = ApiClient::new(&self.api_url, Some(&token), self.timeout())
            .context("Failed to create HTTP client")?;
        Ok((client, session))
    }
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: Config) -> Result<()> {
    let ctx = Ctx::new(cli, config);

    match &cli.command {
        Commands::Login { email, password } => cmd_login(&ctx, email, password).await,
        Commands::Logout => cmd_logout(&ctx),
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            role,
            address,
            phone,
        } => {
            cmd_register(
                &ctx,
                RegisterArgs {
                    first_name,
                    last_name,
                    email,
                    password,
                    role,
                    address: address.as_deref(),
                    phone: phone.as_deref(),
                },
            )
            .await
        }
        Commands::Whoami => cmd_whoami(&ctx).await,
        Commands::Profile(cmd) => match cmd {
            ProfileCommands::Show => cmd_profile_show(&ctx).await,
            ProfileCommands::Update {
                first_name,
                last_name,
                email,
                address,
                phone,
            } => {
                let update = ProfileUpdate {
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    email: email.clone(),
                    address: address.clone(),
                    phone: phone.clone(),
                    ..ProfileUpdate::default()
                };
                cmd_profile_update(&ctx, update).await
            }
            ProfileCommands::Password { current, new } => {
                cmd_profile_password(&ctx, current, new).await
            }
        },
        Commands::Bookings(cmd) => match cmd {
            BookingsCommands::List { status } => cmd_bookings_list(&ctx, status.as_deref()).await,
            BookingsCommands::Create {
                service,
                provider,
                date,
                time,
            } => cmd_bookings_create(&ctx, *service, *provider, date, time).await,
            BookingsCommands::Cancel { booking } => cmd_bookings_cancel(&ctx, *booking).await,
            BookingsCommands::ConfirmPayment { booking } => {
                cmd_bookings_confirm_payment(&ctx, *booking).await
            }
            BookingsCommands::UpdatePayment { booking, status } => {
                cmd_bookings_update_payment(&ctx, *booking, status).await
            }
        },
        Commands::Services(cmd) => match cmd {
            ServicesCommands::List { provider } => cmd_services_list(&ctx, *provider).await,
            ServicesCommands::Create {
                title,
                category,
                description,
                price,
                duration,
            } => {
                cmd_services_create(&ctx, title, category, description.as_deref(), *price, *duration)
                    .await
            }
            ServicesCommands::Delete { service } => cmd_services_delete(&ctx, *service).await,
        },
        Commands::Categories => cmd_categories(&ctx).await,
        Commands::Schedule(cmd) => match cmd {
            ScheduleCommands::List { provider } => cmd_schedule_list(&ctx, *provider).await,
            ScheduleCommands::Add {
                date,
                start,
                end,
                duration,
            } => cmd_schedule_add(&ctx, date, start, end, *duration).await,
        },
        Commands::Reviews(cmd) => match cmd {
            ReviewsCommands::Submit {
                booking,
                rating,
                comment,
            } => cmd_reviews_submit(*booking, *rating, comment.as_deref()),
        },
        Commands::Admin(cmd) => match cmd {
            AdminCommands::Users { inactive } => cmd_admin_users(&ctx, *inactive).await,
            AdminCommands::Activate { user } => cmd_admin_set_active(&ctx, *user, true).await,
            AdminCommands::Deactivate { user } => cmd_admin_set_active(&ctx, *user, false).await,
            AdminCommands::DeleteReview { review } => cmd_admin_delete_review(&ctx, *review).await,
        },
    }
}

// ============================================================================
// Account commands
// ============================================================================

async fn cmd_login(ctx: &Ctx, email: &str, password: &str) -> Result<()> {
    let client = ctx.anonymous_client()?;
    let response = client
        .login(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;

    ctx.store
        .save(&response.token)
        .context("Failed to store the session token")?;

    match session::session_from_token(&response.token) {
        Some(session) => {
            println!("Logged in as {} ({})", session.email, session.role);
        }
        None => {
            // Token stored anyway; the backend may be issuing claims this
            // client version does not understand yet.
            println!("Logged in; token stored.");
        }
    }
    Ok(())
}

fn cmd_logout(ctx: &Ctx) -> Result<()> {
    ctx.store.clear();
    println!("Logged out.");
    Ok(())
}

struct RegisterArgs<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    password: &'a str,
    role: &'a str,
    address: Option<&'a str>,
    phone: Option<&'a str>,
}

async fn cmd_register(ctx: &Ctx, args: RegisterArgs<'_>) -> Result<()> {
    let role = match Role::from_claim(args.role) {
        Some(Role::Client) => Role::Client,
        Some(Role::Provider) => Role::Provider,
        Some(Role::Admin) => bail!("Administrator accounts cannot be self-registered."),
        None => bail!("Unknown role '{}'. Use 'client' or 'provider'.", args.role),
    };

    let client = ctx.anonymous_client()?;
    client
        .register(&RegisterRequest {
            first_name: args.first_name.to_string(),
            last_name: args.last_name.to_string(),
            email: args.email.to_string(),
            password: args.password.to_string(),
            address: args.address.map(str::to_string),
            phone: args.phone.map(str::to_string),
            role,
        })
        .await?;

    println!("Account created. Use 'makeupnow login' to sign in.");
    Ok(())
}

async fn cmd_whoami(ctx: &Ctx) -> Result<()> {
    let (client, session) = ctx.client()?;

    println!();
    println!("Session:");
    println!("  Email:  {}", session.email);
    println!("  Role:   {}", session.role);
    if let Some(name) = &session.display_name {
        println!("  Name:   {name}");
    }

    // The profile is fetched fresh; the token only carries a summary.
    match client.current_user().await {
        Ok(user) => {
            println!();
            println!("Profile:");
            print_user(&user);
        }
        Err(err) => {
            println!();
            println!("Could not fetch the profile: {err}");
        }
    }
    Ok(())
}

// ============================================================================
// Profile commands
// ============================================================================

async fn cmd_profile_show(ctx: &Ctx) -> Result<()> {
    let (client, _session) = ctx.client()?;
    let user = client.current_user().await?;
    println!();
    print_user(&user);
    Ok(())
}

async fn cmd_profile_update(ctx: &Ctx, update: ProfileUpdate) -> Result<()> {
    let (client, _session) = ctx.client()?;
    let user = client.update_profile(&update).await?;
    println!("Profile updated.");
    println!();
    print_user(&user);
    Ok(())
}

async fn cmd_profile_password(ctx: &Ctx, current: &str, new: &str) -> Result<()> {
    let (client, _session) = ctx.client()?;
    client
        .update_password(&PasswordUpdate {
            current_password: current.to_string(),
            new_password: new.to_string(),
        })
        .await?;
    println!("Password updated.");
    Ok(())
}

// ============================================================================
// Booking commands
// ============================================================================

async fn cmd_bookings_list(ctx: &Ctx, status: Option<&str>) -> Result<()> {
    let (client, session) = ctx.client()?;
    let bookings = fetch_bookings(&client, &session).await?;

    let filter = status.map(BookingStatus::from_filter);
    let shown: Vec<&Booking> = match &filter {
        Some(wanted) => filter_by_status(&bookings, wanted),
        None => bookings.iter().collect(),
    };

    if shown.is_empty() {
        match &filter {
            Some(wanted) => println!("No bookings found with status '{}'.", wanted.label()),
            None => println!("No bookings found."),
        }
        return Ok(());
    }

    print_booking_table(&shown, session.role);
    Ok(())
}

async fn cmd_bookings_create(
    ctx: &Ctx,
    service: i64,
    provider: i64,
    date: &str,
    time: &str,
) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Client => {}
        Role::Provider | Role::Admin => {
            bail!("Only customers can book a service.")
        }
    }

    validate_date(date)?;
    validate_time(time)?;

    let booking = client
        .create_booking(&BookingRequest {
            service_id: service,
            provider_id: provider,
            customer_id: session.user_id,
            booking_date: date.to_string(),
            start_time: time.to_string(),
        })
        .await?;

    println!();
    println!("[OK] Booking created!");
    println!();
    print_booking(&booking);
    Ok(())
}

async fn cmd_bookings_cancel(ctx: &Ctx, booking_id: i64) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Client => {}
        Role::Provider | Role::Admin => {
            bail!("Only customers can cancel their bookings.")
        }
    }

    client.cancel_booking(booking_id).await?;
    println!("Booking {booking_id} cancelled.");

    // Re-fetch so the shown state matches the backend after the mutation.
    let bookings = fetch_bookings(&client, &session).await?;
    if bookings.is_empty() {
        println!("No bookings found.");
    } else {
        println!();
        let shown: Vec<&Booking> = bookings.iter().collect();
        print_booking_table(&shown, session.role);
    }
    Ok(())
}

async fn cmd_bookings_confirm_payment(ctx: &Ctx, booking_id: i64) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Provider => {}
        Role::Client | Role::Admin => {
            bail!("Only providers can confirm a payment.")
        }
    }

    client
        .confirm_provider_payment(&ProviderPaymentConfirm { booking_id })
        .await?;
    println!("Payment confirmed for booking {booking_id}.");

    let bookings = fetch_bookings(&client, &session).await?;
    if !bookings.is_empty() {
        println!();
        let shown: Vec<&Booking> = bookings.iter().collect();
        print_booking_table(&shown, session.role);
    }
    Ok(())
}

async fn cmd_bookings_update_payment(ctx: &Ctx, booking_id: i64, status: &str) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Client | Role::Provider => {}
        Role::Admin => bail!("Payment status is managed by the booking parties."),
    }

    client
        .update_payment_status(&PaymentStatusUpdate {
            booking_id,
            status: status.to_string(),
        })
        .await?;
    println!("Payment status of booking {booking_id} set to '{status}'.");
    Ok(())
}

/// Fetch the booking list for the session's role. Malformed payloads
/// degrade to an empty list with a notice instead of failing the command.
async fn fetch_bookings(client: &ApiClient, session: &Session) -> Result<Vec<Booking>> {
    let result = match session.role {
        Role::Client => client.customer_bookings(session.user_id).await,
        Role::Provider => client.provider_bookings(session.user_id).await,
        Role::Admin => bail!("Administrators do not have a booking list; use 'admin users'."),
    };

    match result {
        Ok(bookings) => Ok(bookings),
        Err(ClientError::MalformedResponse) => {
            eprintln!("Could not read the server response; showing no bookings.");
            Ok(Vec::new())
        }
        Err(err) => Err(err.into()),
    }
}

// ============================================================================
// Service and schedule commands
// ============================================================================

/// Pick the provider whose catalogue/availability to show: providers
/// default to themselves, everyone else must name one.
fn target_provider(session: &Session, provider: Option<i64>) -> Result<i64> {
    match (provider, session.role) {
        (Some(id), _) => Ok(id),
        (None, Role::Provider) => Ok(session.user_id),
        (None, Role::Client | Role::Admin) => {
            bail!("Specify a provider with --provider.")
        }
    }
}

async fn cmd_services_list(ctx: &Ctx, provider: Option<i64>) -> Result<()> {
    let (client, session) = ctx.client()?;
    let provider_id = target_provider(&session, provider)?;

    let services = match client.provider_services(provider_id).await {
        Ok(services) => services,
        Err(ClientError::MalformedResponse) => {
            eprintln!("Could not read the server response; showing no services.");
            Vec::new()
        }
        Err(err) => return Err(err.into()),
    };

    if services.is_empty() {
        println!("No services found.");
        return Ok(());
    }

    println!();
    println!(
        "{:<6}  {:<28}  {:<16}  {:>8}  {:>9}",
        "ID", "TITLE", "CATEGORY", "PRICE", "DURATION"
    );
    println!("{}", "-".repeat(76));
    for service in &services {
        println!(
            "{:<6}  {:<28}  {:<16}  {:>8}  {:>9}",
            service.id,
            truncate(&service.title, 28),
            truncate(service.category.as_deref().unwrap_or("-"), 16),
            format!("{:.2}", service.price),
            service
                .duration
                .map(|d| format!("{d} min"))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    println!();
    Ok(())
}

async fn cmd_services_create(
    ctx: &Ctx,
    title: &str,
    category: &str,
    description: Option<&str>,
    price: f64,
    duration: u32,
) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Provider => {}
        Role::Client | Role::Admin => bail!("Only providers can create services."),
    }

    let service = client
        .create_service(&ServiceRequest {
            provider_id: session.user_id,
            title: title.to_string(),
            category: category.to_string(),
            description: description.map(str::to_string),
            price,
            duration,
        })
        .await?;

    println!("Service '{}' created with ID {}.", service.title, service.id);
    Ok(())
}

async fn cmd_services_delete(ctx: &Ctx, service_id: i64) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Provider => {}
        Role::Client | Role::Admin => bail!("Only providers can delete services."),
    }

    client.delete_service(service_id).await?;
    println!("Service {service_id} deleted.");

    // Show what remains.
    let services = client.provider_services(session.user_id).await?;
    if services.is_empty() {
        println!("No services left.");
    } else {
        println!("{} service(s) remaining.", services.len());
    }
    Ok(())
}

async fn cmd_categories(ctx: &Ctx) -> Result<()> {
    let (client, _session) = ctx.client()?;
    let categories = client.categories().await?;

    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }
    println!();
    for category in &categories {
        println!("  {:<4}  {}", category.id, category.name);
    }
    println!();
    Ok(())
}

async fn cmd_schedule_list(ctx: &Ctx, provider: Option<i64>) -> Result<()> {
    let (client, session) = ctx.client()?;
    let provider_id = target_provider(&session, provider)?;

    let slots = match client.provider_schedules(provider_id).await {
        Ok(slots) => slots,
        Err(ClientError::MalformedResponse) => {
            eprintln!("Could not read the server response; showing no slots.");
            Vec::new()
        }
        Err(err) => return Err(err.into()),
    };

    if slots.is_empty() {
        println!("No availability found.");
        return Ok(());
    }

    println!();
    println!(
        "{:<6}  {:<12}  {:<7}  {:<7}  {:<10}",
        "ID", "DATE", "START", "END", "AVAILABLE"
    );
    println!("{}", "-".repeat(52));
    for slot in &slots {
        print_slot(slot);
    }
    println!();
    Ok(())
}

async fn cmd_schedule_add(
    ctx: &Ctx,
    date: &str,
    start: &str,
    end: &str,
    duration: Option<u32>,
) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Provider => {}
        Role::Client | Role::Admin => bail!("Only providers can publish availability."),
    }

    validate_date(date)?;
    validate_time(start)?;
    validate_time(end)?;

    let slot = client
        .create_schedule(&ScheduleRequest {
            provider_id: session.user_id,
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            duration,
        })
        .await?;

    println!("Availability added:");
    print_slot(&slot);
    Ok(())
}

// ============================================================================
// Review commands
// ============================================================================

fn cmd_reviews_submit(booking: i64, rating: f32, comment: Option<&str>) -> Result<()> {
    // The backend has no review-creation endpoint wired up yet; the app's
    // review dialog never sent anything either. Keep the command visible
    // but make the gap explicit instead of inventing an endpoint.
    warn!(
        booking,
        rating = %rating,
        comment = comment.unwrap_or(""),
        "review submission is not wired to the backend; nothing was sent"
    );
    println!("Review submission is not available yet; nothing was sent.");
    Ok(())
}

// ============================================================================
// Admin commands
// ============================================================================

async fn cmd_admin_users(ctx: &Ctx, inactive_only: bool) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Admin => {}
        Role::Client | Role::Provider => bail!("Only administrators can list users."),
    }

    let users = client.admin_users().await?;
    let shown: Vec<&User> = users
        .iter()
        .filter(|user| !inactive_only || !user.active)
        .collect();

    if shown.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!();
    println!(
        "{:<6}  {:<24}  {:<28}  {:<10}  {:<8}",
        "ID", "NAME", "EMAIL", "ROLE", "ACTIVE"
    );
    println!("{}", "-".repeat(84));
    for user in shown {
        println!(
            "{:<6}  {:<24}  {:<28}  {:<10}  {:<8}",
            user.id,
            truncate(&user.full_name(), 24),
            truncate(&user.email, 28),
            user.role,
            if user.active { "yes" } else { "no" },
        );
    }
    println!();
    Ok(())
}

async fn cmd_admin_set_active(ctx: &Ctx, user_id: i64, active: bool) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Admin => {}
        Role::Client | Role::Provider => bail!("Only administrators can moderate users."),
    }

    let user = client
        .update_profile(&ProfileUpdate {
            id: Some(user_id),
            active: Some(active),
            ..ProfileUpdate::default()
        })
        .await?;

    println!(
        "User {} ({}) is now {}.",
        user.id,
        user.email,
        if user.active { "active" } else { "deactivated" },
    );
    Ok(())
}

async fn cmd_admin_delete_review(ctx: &Ctx, review_id: i64) -> Result<()> {
    let (client, session) = ctx.client()?;
    match session.role {
        Role::Admin => {}
        Role::Client | Role::Provider => bail!("Only administrators can delete reviews."),
    }

    client.delete_review(review_id).await?;
    println!("Review {review_id} deleted.");
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn validate_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .with_context(|| format!("Invalid date '{date}', expected YYYY-MM-DD"))
}

fn validate_time(time: &str) -> Result<()> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .with_context(|| format!("Invalid time '{time}', expected HH:MM"))
}

fn print_user(user: &User) {
    println!("  ID:       {}", user.id);
    println!("  Name:     {}", user.full_name());
    println!("  Email:    {}", user.email);
    println!("  Role:     {}", user.role);
    println!("  Address:  {}", user.address.as_deref().unwrap_or("-"));
    println!("  Phone:    {}", user.phone.as_deref().unwrap_or("-"));
    println!("  Active:   {}", if user.active { "yes" } else { "no" });
}

fn print_booking(booking: &Booking) {
    println!("ID:        {}", booking.id);
    println!("Status:    {}", booking.status.label());
    println!("Date:      {}", booking.date.as_deref().unwrap_or("-"));
    println!("Time:      {}", booking.time.as_deref().unwrap_or("-"));
    println!(
        "Service:   {}",
        booking.service_label().as_deref().unwrap_or("-")
    );
    println!(
        "Provider:  {}",
        booking.provider_label().as_deref().unwrap_or("-")
    );
    println!(
        "Price:     {}",
        booking
            .total_price
            .map(|p| format!("{p:.2} €"))
            .unwrap_or_else(|| "-".to_string())
    );
    if let Some(payment) = &booking.payment_status {
        println!("Payment:   {payment}");
    }
}

fn print_booking_table(bookings: &[&Booking], role: Role) {
    // Customers care who performs the service; providers care who booked.
    let party_header = match role {
        Role::Client => "PROVIDER",
        Role::Provider | Role::Admin => "CUSTOMER",
    };

    println!(
        "{:<6}  {:<12}  {:<7}  {:<24}  {:<20}  {:>8}  {:<10}",
        "ID", "DATE", "TIME", "SERVICE", party_header, "PRICE", "STATUS"
    );
    println!("{}", "-".repeat(100));

    for booking in bookings {
        let party = match role {
            Role::Client => booking.provider_label(),
            Role::Provider | Role::Admin => booking.customer_label(),
        };
        println!(
            "{:<6}  {:<12}  {:<7}  {:<24}  {:<20}  {:>8}  {:<10}",
            booking.id,
            booking.date.as_deref().unwrap_or("-"),
            booking.time.as_deref().unwrap_or("-"),
            truncate(booking.service_label().as_deref().unwrap_or("-"), 24),
            truncate(party.as_deref().unwrap_or("-"), 20),
            booking
                .total_price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "-".to_string()),
            booking.status.label(),
        );
    }
    println!();
}

fn print_slot(slot: &ScheduleSlot) {
    println!(
        "{:<6}  {:<12}  {:<7}  {:<7}  {:<10}",
        slot.id,
        slot.date,
        slot.start_time,
        slot.end_time,
        if slot.available { "yes" } else { "no" },
    );
}

/// Truncate a string to max length with ellipsis. Counts chars, not bytes;
/// service titles are frequently accented.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
