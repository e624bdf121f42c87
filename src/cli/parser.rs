use crate::export::PosterFormat;
use crate::models::product::MovementKind;
use clap::{Parser, Subcommand};

/// Command-line interface definition for gymdesk
/// Front-desk and admin client for a gym backend
#[derive(Parser)]
#[command(
    name = "gymdesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Gym front-desk admin: attendance tokens, QR posters, members, plans, inventory and notices",
    long_about = None
)]
pub struct Cli {
    /// Use a different configuration file (the session is stored next to it)
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Debug logging on stderr
    #[arg(global = true, long, short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the configuration file with defaults
    Init {
        #[arg(long, help = "Overwrite an existing configuration file")]
        force: bool,
    },

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// Attendance panel: sessions, check-in token, CSV export and QR poster
    #[command(subcommand)]
    Attendance(AttendanceCmd),

    /// Members and their assigned plans
    #[command(subcommand)]
    Members(MembersCmd),

    /// Workout templates, days and exercises
    #[command(subcommand)]
    Templates(TemplatesCmd),

    /// Products, stock movements and quick sales
    #[command(subcommand)]
    Inventory(InventoryCmd),

    /// Notices shown to members
    #[command(subcommand)]
    Notices(NoticesCmd),
}

#[derive(Subcommand)]
pub enum AttendanceCmd {
    /// Recent sessions and the current token, loaded together
    Panel,

    /// Most recent check-in sessions
    Sessions {
        #[arg(long, help = "How many sessions to show (default from config)")]
        limit: Option<usize>,
    },

    /// Show the current check-in token of the location
    Token,

    /// Replace the location's check-in token
    Rotate,

    /// Export the recent sessions to CSV
    ExportCsv {
        #[arg(long, value_name = "DIR", help = "Output directory (default from config)")]
        dir: Option<String>,

        #[arg(long, help = "How many sessions to export (default from config)")]
        limit: Option<usize>,
    },

    /// Generate the printable check-in poster
    Poster {
        #[arg(long, value_enum, default_value = "pdf")]
        format: PosterFormat,

        #[arg(long, value_name = "DIR", help = "Output directory (default from config)")]
        dir: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum MembersCmd {
    /// List members, newest first
    List,

    /// Add a member
    Add {
        full_name: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Activate or deactivate a member
    Toggle { id: String },

    /// Delete a member
    Delete { id: String },

    /// Plans assigned to a member, plus the templates available to assign
    Plans { member_id: String },

    /// Assign a workout template to a member
    Assign {
        member_id: String,

        #[arg(long = "template", value_name = "TEMPLATE_ID")]
        template_id: String,

        #[arg(long = "start", value_name = "YYYY-MM-DD", help = "Start date (default: today)")]
        start_date: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove an assigned plan
    Unassign {
        member_id: String,
        assignment_id: String,
    },
}

#[derive(Subcommand)]
pub enum TemplatesCmd {
    /// List workout templates
    List,

    /// Create a workout template
    Add {
        name: String,

        #[arg(long)]
        goal: Option<String>,

        #[arg(long)]
        level: Option<String>,
    },

    /// Days of a template
    Days { template_id: String },

    /// Add a day to a template
    AddDay {
        template_id: String,

        #[arg(long = "index", value_name = "N")]
        day_index: String,

        #[arg(long)]
        name: Option<String>,
    },

    /// Exercises of a day
    Exercises { day_id: String },

    /// Add an exercise to a day
    AddExercise {
        day_id: String,

        name: String,

        #[arg(long = "muscle")]
        muscle_group: Option<String>,

        #[arg(long)]
        sets: Option<String>,

        #[arg(long)]
        reps: Option<String>,

        #[arg(long = "rest", value_name = "SECONDS")]
        rest_seconds: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long = "order", value_name = "N", help = "Position in the day (default: last)")]
        order_index: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum InventoryCmd {
    /// Products with their current stock
    List,

    /// Add a product
    Add {
        name: String,

        #[arg(long)]
        sku: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long = "tax", value_name = "PCT")]
        tax_pct: Option<String>,
    },

    /// Record a stock purchase or adjustment
    Stock {
        product_id: String,

        #[arg(long, value_enum, default_value = "purchase")]
        kind: MovementKind,

        #[arg(long, allow_hyphen_values = true, help = "Non-zero quantity; negative to adjust down")]
        qty: String,

        #[arg(long)]
        note: Option<String>,
    },

    /// Quick cash sale of one product
    Sell {
        product_id: String,

        #[arg(long, default_value = "1")]
        qty: String,

        #[arg(long = "price", help = "Unit price (default: product price)")]
        unit_price: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum NoticesCmd {
    /// List notices (active ones unless --all)
    List {
        #[arg(long, help = "Include expired and future notices")]
        all: bool,
    },

    /// Post a notice for the next 24 hours
    Post {
        #[arg(long)]
        title: String,

        #[arg(long)]
        message: String,
    },

    /// Delete a notice
    Delete { id: String },
}
