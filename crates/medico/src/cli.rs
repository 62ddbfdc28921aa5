//! Clap derive structures for the `medico` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// medico -- administer médicos and their clínicas from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "medico",
    version,
    about = "Manage médicos and their clínicas from the command line",
    long_about = "A CLI for the médico/clínica registry backend.\n\n\
        Lists, creates, edits and deletes médicos, and creates or updates\n\
        the clínicas associated with each one.",
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
    #[arg(long, short = 'p', env = "MEDICO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Base API URL (overrides profile)
    #[arg(long, env = "MEDICO_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides profile, env var and keyring)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MEDICO_OUTPUT",
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
    #[arg(long, short = 'k', env = "MEDICO_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (defaults to the profile value)
    #[arg(long, env = "MEDICO_TIMEOUT", global = true)]
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
    /// Manage médicos
    #[command(alias = "med", alias = "m")]
    Medicos(MedicosArgs),

    /// Manage the clínicas of a médico
    #[command(alias = "cli", alias = "c")]
    Clinicas(ClinicasArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MÉDICOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MedicosArgs {
    #[command(subcommand)]
    pub command: MedicosCommand,
}

#[derive(Debug, Subcommand)]
pub enum MedicosCommand {
    /// List all médicos with their clínicas
    #[command(alias = "ls")]
    List,

    /// Show one médico
    #[command(alias = "get")]
    Show {
        /// Médico id
        id: String,
    },

    /// Create a médico, optionally with a first clínica
    Create(CreateMedicoArgs),

    /// Edit a médico's fields
    Edit {
        /// Médico id
        id: String,

        #[command(flatten)]
        fields: MedicoFieldArgs,
    },

    /// Delete a médico
    #[command(alias = "rm")]
    Delete {
        /// Médico id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct CreateMedicoArgs {
    /// Full name
    #[arg(long)]
    pub nome: String,

    /// CRM registration number
    #[arg(long)]
    pub crm: String,

    /// Specialty
    #[arg(long)]
    pub especialidade: String,

    /// Also create a clínica with this razão social
    #[arg(long)]
    pub clinica_razao_social: Option<String>,

    /// CEP of the clínica
    #[arg(long)]
    pub clinica_cep: Option<String>,

    /// CNPJ of the clínica
    #[arg(long)]
    pub clinica_cnpj: Option<String>,
}

/// Field overrides for `medicos edit`; unset flags keep the current value.
#[derive(Debug, Args)]
pub struct MedicoFieldArgs {
    #[arg(long)]
    pub nome: Option<String>,

    #[arg(long)]
    pub crm: Option<String>,

    #[arg(long)]
    pub especialidade: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLÍNICAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClinicasArgs {
    #[command(subcommand)]
    pub command: ClinicasCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClinicasCommand {
    /// List the clínicas of a médico
    #[command(alias = "ls")]
    List {
        /// Médico id
        medico_id: String,
    },

    /// Create a clínica for a médico
    Create {
        /// Médico id
        medico_id: String,

        #[command(flatten)]
        fields: ClinicaFieldArgs,
    },

    /// Update a clínica (unset flags keep the current value)
    Update {
        /// Médico id
        medico_id: String,

        /// Clínica id
        clinica_id: String,

        #[command(flatten)]
        fields: ClinicaFieldArgs,
    },
}

#[derive(Debug, Args)]
pub struct ClinicaFieldArgs {
    #[arg(long)]
    pub razao_social: Option<String>,

    #[arg(long)]
    pub cep: Option<String>,

    #[arg(long)]
    pub cnpj: Option<String>,
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

    /// Display current configuration (tokens masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
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
