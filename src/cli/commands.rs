use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "run",
    about = "Convention-driven ops workflows from per-directory meta.json files",
    version
)]
pub struct Cli {
    /// Target environment
    #[arg(short = 'c', long = "cible", global = true, default_value = "local")]
    pub cible: String,

    /// Directory to operate from (defaults to the current directory)
    #[arg(short = 'p', long = "path", global = true)]
    pub path: Option<PathBuf>,

    /// Name of the env file used by the secret chain
    #[arg(long = "env-filename", global = true)]
    pub env_filename: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Docker image workflows
    Docker {
        #[command(subcommand)]
        action: DockerAction,
    },

    /// Terraform component workflows
    Terraform {
        #[command(subcommand)]
        action: TerraformAction,
    },

    /// Kubernetes cluster workflows
    Cluster {
        #[command(subcommand)]
        action: ClusterAction,
    },

    /// Hasura migration workflows
    Hasura {
        #[command(subcommand)]
        action: HasuraAction,
    },

    /// Vault secret sync
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// GitHub Actions workflows
    Action {
        #[command(subcommand)]
        action: ActionAction,
    },

    /// Run a custom script from the descriptor's script root
    Script {
        /// Script name
        name: String,

        /// Arguments forwarded to the script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,

        /// Run with RUN_ENV=development
        #[arg(long)]
        dev: bool,

        /// Run with RUN_ENV=test
        #[arg(long)]
        test: bool,
    },

    /// Cloudflare tunnel
    Tunnel {
        #[command(subcommand)]
        action: TunnelAction,
    },

    /// Skaffold workflows
    Skaffold {
        #[command(subcommand)]
        action: SkaffoldAction,
    },

    /// Vercel deployments
    Vercel {
        #[command(subcommand)]
        action: VercelAction,
    },

    /// Run an npm script with the secret chain loaded
    Npm {
        /// Script name from package.json
        script: String,

        /// Arguments forwarded after --
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Workstation setup
    Machine {
        #[command(subcommand)]
        action: MachineAction,
    },

    /// Repository and descriptor helpers
    Utils {
        #[command(subcommand)]
        action: UtilsAction,
    },

    /// Tool configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum DockerAction {
    /// Build the image for the current descriptor
    Build,

    /// Push the image for the current descriptor
    Push,

    /// Multi-arch build and manifest publish
    Buildx {
        /// Platforms to build for
        #[arg(long, default_values = ["linux/amd64", "linux/arm64"])]
        platform: Vec<String>,
    },

    /// Bring the compose stack up
    Compose {
        /// Tear the stack down instead
        #[arg(long)]
        down: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum TerraformAction {
    /// Init, plan and apply
    Apply {
        /// Apply every terraform component under the source root
        #[arg(long)]
        all: bool,

        /// Abort the batch at the first failing component
        #[arg(long)]
        fail_fast: bool,
    },

    /// Init and destroy
    Destroy {
        /// Destroy every terraform component under the source root
        #[arg(long)]
        all: bool,

        /// Abort the batch at the first failing component
        #[arg(long)]
        fail_fast: bool,
    },

    /// Pass through to terraform state (pull, push, mv, import)
    State {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },

    /// Print the computed backend configuration
    Env,

    /// Remove a stale backend lock object
    Unlock,
}

#[derive(Subcommand, Clone)]
pub enum ClusterAction {
    /// Fetch cluster credentials into the local kubeconfig
    Connect {
        /// Cluster zone
        #[arg(long)]
        zone: Option<String>,
    },

    /// Deploy every cluster app, priority group by priority group
    Deploy {
        /// Abort the batch at the first failing app
        #[arg(long)]
        fail_fast: bool,
    },

    /// Remove every cluster app
    Remove {
        /// Abort the batch at the first failing app
        #[arg(long)]
        fail_fast: bool,
    },

    /// Sync TLS material from vault into a TLS secret
    Certs,

    /// Publish the secret chain as a generic secret
    Secrets,

    /// Restart a pod's deployment
    Pod {
        /// Deployment name (defaults to cluster.app)
        name: Option<String>,
    },

    /// Point the current context at a namespace
    Namespace {
        /// Namespace (defaults to cluster.namespace)
        name: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum HasuraAction {
    /// Open the hasura console
    Console,

    /// Migration workflows
    Migrate {
        #[command(subcommand)]
        action: HasuraMigrateAction,
    },

    /// Apply metadata
    Metadata,
}

#[derive(Subcommand, Clone)]
pub enum HasuraMigrateAction {
    /// Create a migration from the current server state
    Create {
        /// Migration name
        name: String,
    },

    /// Apply pending migrations and metadata
    Apply,

    /// Squash migrations from a version into one
    Squash {
        /// Version to squash from
        #[arg(long)]
        from: String,

        /// Name of the squashed migration
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum VaultAction {
    /// Vault KV secret sync
    Kv {
        #[command(subcommand)]
        action: VaultKvAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum VaultKvAction {
    /// Pull secrets from vault into the local env file
    Import,

    /// Push the local env file chain into vault
    Export,
}

#[derive(Subcommand, Clone)]
pub enum ActionAction {
    /// Simulate a workflow locally with act
    Local {
        /// Job to run
        #[arg(short, long)]
        job: Option<String>,

        /// Event payload file
        #[arg(short, long)]
        event: Option<PathBuf>,
    },

    /// Dispatch a workflow on GitHub and watch the run
    Remote {
        /// Workflow file or name
        workflow: String,

        /// Git ref to run on
        #[arg(long)]
        r#ref: Option<String>,
    },

    /// Push the secret chain as repository secrets
    Secrets,

    /// Print the environment the secret chain resolves to
    Env,
}

#[derive(Subcommand, Clone)]
pub enum TunnelAction {
    /// Generate the ingress config and run the tunnel
    Run,
}

#[derive(Subcommand, Clone)]
pub enum SkaffoldAction {
    /// skaffold dev
    Dev,

    /// skaffold run
    Run,
}

#[derive(Subcommand, Clone)]
pub enum VercelAction {
    /// List deployments
    List,

    /// Show logs of a deployment
    Logs {
        /// Deployment URL or id
        deployment: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum MachineAction {
    /// Probe every wrapped CLI and print a readiness table
    Init,
}

#[derive(Subcommand, Clone)]
pub enum UtilsAction {
    /// Current branch and short status
    Git,

    /// Run the conventional dev script
    Dev,

    /// Print a fresh short id
    Nanoid,

    /// Descriptor helpers
    Meta {
        #[command(subcommand)]
        action: MetaAction,
    },

    /// Interactive conventional commit
    Commit,

    /// List every descriptor under the source root
    Dependencies,

    /// Print the enclosing project root
    Repo,
}

#[derive(Subcommand, Clone)]
pub enum MetaAction {
    /// Interactively scaffold a meta.json
    Create,

    /// Change a descriptor field (dot-nested)
    Change {
        /// Property, e.g. cluster.tls
        property: String,

        /// Value, parsed as JSON when possible
        value: String,
    },

    /// Add a descriptor field (alias of change)
    Add {
        /// Property, e.g. docker.image
        property: String,

        /// Value, parsed as JSON when possible
        value: String,
    },

    /// Assign ids to descriptors missing one
    Ids,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Config key (source_root, docker.registry, terraform.bucket, hasura.endpoint_env, vault.address)
        key: String,

        /// Value to set
        value: String,
    },
}
