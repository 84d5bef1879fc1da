//! Clap derive structures for the `lectern` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lectern -- back office for the church platform admin API
#[derive(Debug, Parser)]
#[command(
    name = "lectern",
    version,
    about = "Administer a church platform from the command line",
    long_about = "Manage announcements, sermons, events, the homepage layout and the\n\
        category tree of a church platform through its admin REST API.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "LECTERN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Admin API root, e.g. https://church.example/api/admin (overrides profile)
    #[arg(long, short = 'u', env = "LECTERN_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Anti-forgery token sent as X-CSRF-TOKEN
    #[arg(long, env = "LECTERN_CSRF_TOKEN", global = true, hide_env = true)]
    pub csrf_token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LECTERN_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "LECTERN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (0 waits indefinitely)
    #[arg(long, env = "LECTERN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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
    /// Plain text, one value per line (scripting)
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
    /// Manage announcements
    #[command(alias = "ann")]
    Announcements(ResourceArgs),

    /// Manage blog posts
    Posts(ResourceArgs),

    /// Manage sermons (audio and thumbnail uploads)
    Sermons(ResourceArgs),

    /// Manage library books (cover and file uploads)
    Books(ResourceArgs),

    /// Manage events
    Events(ResourceArgs),

    /// Moderate prayer requests
    #[command(alias = "prayers")]
    PrayerRequests(ResourceArgs),

    /// View and record donations
    Donations(ResourceArgs),

    /// Manage admin users
    Users(ResourceArgs),

    /// Manage roles and permissions
    Roles(ResourceArgs),

    /// Manage navigation menus
    Menus(MenusArgs),

    /// Customize the homepage widget layout
    #[command(alias = "w")]
    Widgets(WidgetsArgs),

    /// Manage the category tree
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Manage the stored sign-in session
    Session(SessionArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List one page of records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single record
    #[command(alias = "get")]
    Show {
        /// Record ID
        id: String,
    },

    /// Create a record
    Create(FormArgs),

    /// Update a record; unspecified fields keep their current values
    Update {
        /// Record ID
        id: String,

        #[command(flatten)]
        form: FormArgs,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record ID
        id: String,
    },

    /// Run a status action (e.g. approve, reject, toggle-featured)
    Action {
        /// Record ID
        id: String,

        /// Action name
        action: String,

        /// Extra body fields as key=value
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

/// Pagination and filtering for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Query filter sent to the server, e.g. status=pending
    #[arg(long, short = 'f', value_name = "KEY=VALUE")]
    pub filter: Vec<String>,
}

/// Form input shared by create and update.
#[derive(Debug, Args)]
pub struct FormArgs {
    /// Set a form field (repeatable)
    #[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Load form fields from a JSON object file (applied before --set)
    #[arg(long, short = 'F', value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Attach a file to a file field (repeatable)
    #[arg(long = "file", value_name = "FIELD=PATH")]
    pub files: Vec<String>,
}

// ── Menus ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MenusArgs {
    #[command(subcommand)]
    pub command: MenusCommand,
}

#[derive(Debug, Subcommand)]
pub enum MenusCommand {
    #[command(flatten)]
    Common(ResourceCommand),

    /// Move a menu item to a new position and save the menu
    MoveItem {
        /// Menu ID
        id: String,

        /// Current position (0-based)
        from: usize,

        /// Target position (0-based)
        to: usize,

        /// Reorder within the children of this top-level item
        #[arg(long, value_name = "INDEX")]
        parent: Option<usize>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WIDGETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WidgetsArgs {
    /// Apply the change locally and show the result without publishing
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: WidgetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum WidgetsCommand {
    /// Show the current layout in render order
    #[command(alias = "ls")]
    Show,

    /// Flip a widget's enabled flag
    Toggle {
        /// Widget position (0-based)
        index: usize,
    },

    /// Move a widget to a new position
    #[command(alias = "mv")]
    Move {
        /// Current position (0-based)
        from: usize,

        /// Target position (0-based)
        to: usize,
    },

    /// Change one widget setting
    Set {
        /// Widget position (0-based)
        index: usize,

        /// Setting key
        key: String,

        /// New value (typed like the current value)
        value: String,
    },

    /// Enable every widget
    EnableAll,

    /// Disable every widget
    DisableAll,

    /// Replace the layout with the server defaults
    Reset,

    /// Edit the layout interactively, publishing on request
    Edit,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATEGORIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    /// Restrict to one category type (post, page, sermon, book, bible-study)
    #[arg(long = "type", short = 't', global = true, value_name = "TYPE")]
    pub category_type: Option<String>,

    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// Show the category hierarchy
    Tree {
        /// List flat rows instead of the nested tree
        #[arg(long)]
        flat: bool,
    },

    /// Count categories per type
    Counts,

    /// List valid parent choices
    Parents {
        /// Category being edited (excludes it and its descendants)
        #[arg(long, value_name = "ID")]
        editing: Option<String>,
    },

    /// Create a top-level category
    Create {
        /// Category name
        #[arg(long, short = 'n')]
        name: String,

        /// Parent category ID
        #[arg(long, value_name = "ID")]
        parent: Option<String>,

        /// Extra form fields as key=value
        #[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Create a child that inherits its parent's type
    AddChild {
        /// Parent category ID
        parent: String,

        /// Category name
        #[arg(long, short = 'n')]
        name: String,

        /// Extra form fields as key=value
        #[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Update a category
    Update {
        /// Category ID
        id: String,

        /// Form fields as key=value
        #[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Delete a category and its subtree
    #[command(alias = "rm")]
    Delete {
        /// Category ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Show the stored session
    Show,

    /// Store a bearer token (prompted when omitted)
    SetToken {
        /// Token value
        token: Option<String>,

        /// Display name of the signed-in user
        #[arg(long)]
        name: Option<String>,

        /// Email of the signed-in user
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,
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

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Key: base_url, csrf_token_env, ca_cert, insecure, timeout
        key: String,

        /// New value
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a CSRF token in the system keyring
    SetCsrf {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
