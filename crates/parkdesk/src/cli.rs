//! Clap derive structures for the `parkdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// parkdesk -- back-office CLI for monthly parking registrations
#[derive(Debug, Parser)]
#[command(
    name = "parkdesk",
    version,
    about = "Manage parking monthly registrations from the command line",
    long_about = "Administer a parking back office: monthly registrations, their\n\
        extensions and payments, customers, vehicles, staff and the gate.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "PARKDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "PARKDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides keyring)
    #[arg(long, env = "PARKDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PARKDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "PARKDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PARKDESK_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login {
        /// Username (prompted when omitted)
        #[arg(long, short = 'u')]
        username: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show who the stored session belongs to
    Whoami,

    /// Show the logged-in customer's dashboard
    Dashboard,

    /// Manage monthly registrations
    #[command(alias = "regs", alias = "r")]
    Registrations(RegistrationsArgs),

    /// Manage customers
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage vehicles
    #[command(alias = "veh")]
    Vehicles(VehiclesArgs),

    /// Manage vehicle types and their prices
    #[command(alias = "vt")]
    VehicleTypes(VehicleTypesArgs),

    /// Manage staff records
    Staff(StaffArgs),

    /// Manage roles
    Roles(RolesArgs),

    /// Manage login accounts
    Accounts(AccountsArgs),

    /// Gate operations and parking statistics
    #[command(alias = "gate")]
    Parking(ParkingArgs),

    /// Face recognition
    Face(FaceArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Client-side paging for list commands.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page to show (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Show every row, no paging
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Arguments for commands that address one record.
#[derive(Debug, Args)]
pub struct IdArg {
    /// Record id
    pub id: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REGISTRATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RegistrationsArgs {
    #[command(subcommand)]
    pub command: RegistrationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegistrationsCommand {
    /// List registrations
    #[command(alias = "ls")]
    List(PageArgs),

    /// Search by plate, CCCD, employee code or status
    #[command(group(
        ArgGroup::new("by").required(true).args(["plate", "cccd", "employee", "status"])
    ))]
    Search {
        /// License plate
        #[arg(long)]
        plate: Option<String>,

        /// Customer citizen id
        #[arg(long)]
        cccd: Option<String>,

        /// Employee code
        #[arg(long)]
        employee: Option<String>,

        /// Status: pending, active, expired, cancelled
        #[arg(long)]
        status: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one registration
    Get(IdArg),

    /// Register a plate for a monthly pass
    Create {
        /// License plate
        #[arg(long)]
        plate: String,

        /// Number of months (1-12)
        #[arg(long, short = 'm')]
        months: u32,

        /// Owning customer id
        #[arg(long)]
        user_id: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Amount charged
        #[arg(long)]
        amount: Option<f64>,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// Register a plate for a customer already on file
    #[command(group(ArgGroup::new("customer").required(true).args(["user_id", "cccd"])))]
    CreateExisting {
        /// Customer id
        #[arg(long)]
        user_id: Option<String>,

        /// Customer citizen id
        #[arg(long)]
        cccd: Option<String>,

        /// License plate
        #[arg(long)]
        plate: String,

        /// Number of months (1-12)
        #[arg(long, short = 'm')]
        months: u32,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// Create a customer with vehicles and register them in one call
    CreateWithUser {
        /// Full name
        #[arg(long)]
        name: String,

        /// Citizen id (9 or 12 digits)
        #[arg(long)]
        cccd: String,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Employee code
        #[arg(long)]
        employee_code: Option<String>,

        /// License plates (repeat or comma-separate)
        #[arg(long = "plate", required = true, value_delimiter = ',')]
        plates: Vec<String>,

        /// Vehicle type id
        #[arg(long)]
        vehicle_type: Option<String>,

        /// Number of months (1-12)
        #[arg(long, short = 'm')]
        months: u32,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// Edit start date, amount or note
    Update {
        /// Registration id
        id: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Amount charged
        #[arg(long)]
        amount: Option<f64>,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// Extend the latest registration of a chain
    Extend(ExtendArgs),

    /// Extend, choosing the endpoint by the row's status
    SmartExtend(ExtendArgs),

    /// Record payment for a registration
    Pay {
        /// Registration id
        id: String,

        /// Amount paid
        #[arg(long)]
        amount: Option<f64>,

        /// Payment method
        #[arg(long)]
        method: Option<String>,
    },

    /// Lower the month count of an unpaid registration
    UpdateMonths {
        /// Registration id
        id: String,

        /// New month count (not above the current one)
        months: u32,
    },

    /// Cancel a registration
    Cancel(IdArg),

    /// Delete a registration
    #[command(alias = "rm")]
    Delete(IdArg),

    /// Show the extension chain a registration belongs to
    Chain(IdArg),

    /// Show every registration a plate has held
    History {
        /// License plate
        plate: String,
    },

    /// Show the active registration of a plate
    Active {
        /// License plate
        plate: String,
    },

    /// Ask the backend whether a plate holds an active pass
    CheckActive {
        /// License plate
        plate: String,
    },

    /// Mark lapsed registrations as expired
    UpdateExpired,
}

#[derive(Debug, Args)]
pub struct ExtendArgs {
    /// Registration id
    pub id: String,

    /// Months to add (1-12)
    #[arg(long, short = 'm')]
    pub months: u32,

    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Args)]
pub struct UserFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Citizen id (9 or 12 digits)
    #[arg(long)]
    pub cccd: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Employee code
    #[arg(long)]
    pub employee_code: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List customers
    #[command(alias = "ls")]
    List(PageArgs),

    /// Show one customer
    Get(IdArg),

    /// Create a customer
    Create(UserFields),

    /// Update a customer
    Update {
        /// Customer id
        id: String,

        #[command(flatten)]
        fields: UserFields,
    },

    /// Delete a customer
    #[command(alias = "rm")]
    Delete(IdArg),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VEHICLES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VehiclesArgs {
    #[command(subcommand)]
    pub command: VehiclesCommand,
}

#[derive(Debug, Args)]
pub struct VehicleFields {
    /// License plate
    #[arg(long)]
    pub plate: Option<String>,

    /// Vehicle type id
    #[arg(long)]
    pub vehicle_type: Option<String>,

    /// Owning customer id
    #[arg(long)]
    pub owner: Option<String>,

    /// Color
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum VehiclesCommand {
    /// List vehicles
    #[command(alias = "ls")]
    List(PageArgs),

    /// Show one vehicle
    Get(IdArg),

    /// Register a vehicle
    Create(VehicleFields),

    /// Update a vehicle
    Update {
        /// Vehicle id
        id: String,

        #[command(flatten)]
        fields: VehicleFields,
    },

    /// Delete a vehicle
    #[command(alias = "rm")]
    Delete(IdArg),
}

#[derive(Debug, Args)]
pub struct VehicleTypesArgs {
    #[command(subcommand)]
    pub command: VehicleTypesCommand,
}

#[derive(Debug, Args)]
pub struct VehicleTypeFields {
    /// Type name
    #[arg(long)]
    pub name: Option<String>,

    /// Monthly pass price
    #[arg(long)]
    pub monthly_price: Option<f64>,

    /// Per-visit price
    #[arg(long)]
    pub per_visit_price: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum VehicleTypesCommand {
    /// List vehicle types
    #[command(alias = "ls")]
    List,

    /// Create a vehicle type
    Create(VehicleTypeFields),

    /// Update a vehicle type
    Update {
        /// Vehicle type id
        id: String,

        #[command(flatten)]
        fields: VehicleTypeFields,
    },

    /// Delete a vehicle type
    #[command(alias = "rm")]
    Delete(IdArg),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BACK OFFICE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StaffArgs {
    #[command(subcommand)]
    pub command: StaffCommand,
}

#[derive(Debug, Args)]
pub struct StaffFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Employee code
    #[arg(long)]
    pub employee_code: Option<String>,

    /// Position
    #[arg(long)]
    pub position: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum StaffCommand {
    /// List staff
    #[command(alias = "ls")]
    List,

    /// Add a staff member
    Create(StaffFields),

    /// Update a staff member
    Update {
        /// Staff id
        id: String,

        #[command(flatten)]
        fields: StaffFields,
    },

    /// Remove a staff member
    #[command(alias = "rm")]
    Delete(IdArg),
}

#[derive(Debug, Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommand,
}

#[derive(Debug, Args)]
pub struct RoleFields {
    /// Role name
    #[arg(long)]
    pub name: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum RolesCommand {
    /// List roles
    #[command(alias = "ls")]
    List,

    /// Create a role
    Create(RoleFields),

    /// Update a role
    Update {
        /// Role id
        id: String,

        #[command(flatten)]
        fields: RoleFields,
    },

    /// Delete a role
    #[command(alias = "rm")]
    Delete(IdArg),
}

#[derive(Debug, Args)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommand,
}

#[derive(Debug, Args)]
pub struct AccountFields {
    /// Login name
    #[arg(long)]
    pub username: Option<String>,

    /// Role id
    #[arg(long)]
    pub role: Option<String>,

    /// Account status
    #[arg(long)]
    pub status: Option<String>,

    /// Prompt for a new password
    #[arg(long)]
    pub password: bool,
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    /// List accounts
    #[command(alias = "ls")]
    List,

    /// Create an account (password is prompted)
    Create(AccountFields),

    /// Update an account
    Update {
        /// Account id
        id: String,

        #[command(flatten)]
        fields: AccountFields,
    },

    /// Delete an account
    #[command(alias = "rm")]
    Delete(IdArg),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PARKING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ParkingArgs {
    #[command(subcommand)]
    pub command: ParkingCommand,
}

#[derive(Debug, Subcommand)]
pub enum ParkingCommand {
    /// List gate transactions
    #[command(alias = "ls")]
    List {
        /// Only vehicles still inside
        #[arg(long)]
        open: bool,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Record a vehicle entering
    Entry {
        /// License plate
        plate: String,

        /// Vehicle type id
        #[arg(long)]
        vehicle_type: Option<String>,
    },

    /// Record a vehicle leaving
    Exit {
        /// License plate
        plate: String,
    },

    /// Quote the fee for an open transaction
    Fee(IdArg),

    /// Entry/exit counts and revenue
    Stats {
        /// From date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// To date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FACE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FaceArgs {
    #[command(subcommand)]
    pub command: FaceCommand,
}

#[derive(Debug, Subcommand)]
pub enum FaceCommand {
    /// Identify the customer in a photo
    Recognize {
        /// Image file
        image: PathBuf,
    },

    /// Enroll a customer's face
    Register {
        /// Customer id
        user_id: String,

        /// Image file
        image: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: api_url, username, token, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
