use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Create the counter on the base ledger
    CreateCounter,
    /// Increment the counter
    Increment {
        /// Send to the ephemeral endpoint
        #[arg(long)]
        ephemeral: bool,
    },
    /// Move the counter into its compressed delegation record
    Delegate,
    /// Restore the counter from its compressed delegation record
    Undelegate,
    /// Commit the counter on the ephemeral layer and hand it back
    ScheduleUndelegate,
    /// Top up the payer's balance on the ephemeral layer
    FundEphemeralBalance,
    /// Print owners, counter values and the actions they allow
    Status,
    /// Follow owner changes on both ledgers until interrupted
    Watch,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::CreateCounter => "create-counter",
            Commands::Increment { .. } => "increment",
            Commands::Delegate => "delegate",
            Commands::Undelegate => "undelegate",
            Commands::ScheduleUndelegate => "schedule-undelegate",
            Commands::FundEphemeralBalance => "fund-ephemeral-balance",
            Commands::Status => "status",
            Commands::Watch => "watch",
        }
    }

    /// Whether the command signs and sends a transaction.
    pub fn sends_transaction(&self) -> bool {
        !matches!(self, Commands::Status | Commands::Watch)
    }
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    #[arg(long, global = true, env = "DELEGATION_RPC_URL", default_value = "http://localhost:8899")]
    pub rpc_url: String,

    #[arg(long, global = true, env = "DELEGATION_WS_URL", default_value = "ws://localhost:8900")]
    pub ws_url: String,

    #[arg(
        long,
        global = true,
        env = "DELEGATION_EPHEMERAL_RPC_URL",
        default_value = "http://localhost:7799"
    )]
    pub ephemeral_rpc_url: String,

    #[arg(
        long,
        global = true,
        env = "DELEGATION_EPHEMERAL_WS_URL",
        default_value = "ws://localhost:7800"
    )]
    pub ephemeral_ws_url: String,

    #[arg(
        long,
        global = true,
        env = "DELEGATION_INDEXER_URL",
        default_value = "http://localhost:8784"
    )]
    pub indexer_url: String,

    #[arg(long, global = true, env = "DELEGATION_INDEXER_API_KEY")]
    pub indexer_api_key: Option<String>,

    /// Payer keypair file, defaults to ~/.config/solana/id.json
    #[arg(long, global = true, env = "DELEGATION_KEYPAIR")]
    pub keypair: Option<String>,

    #[arg(long, global = true, env = "DELEGATION_COUNTER_PROGRAM_ID")]
    pub counter_program_id: Option<String>,

    #[arg(long, global = true, env = "DELEGATION_COMPRESSED_DELEGATION_PROGRAM_ID")]
    pub compressed_delegation_program_id: Option<String>,

    #[arg(long, global = true, env = "DELEGATION_VALIDATOR")]
    pub validator: Option<String>,

    /// Resolve the address tree through the indexer instead of using the
    /// default tree
    #[arg(long, global = true, env = "DELEGATION_ADDRESS_TREE_FROM_INDEXER")]
    pub address_tree_from_indexer: bool,

    /// Write new state to the latest v2 state tree instead of the address
    /// tree queue
    #[arg(long, global = true, env = "DELEGATION_OUTPUT_TO_STATE_TREE")]
    pub output_to_state_tree: bool,

    #[arg(long, global = true, env = "DELEGATION_INDEXER_MAX_RETRIES", default_value = "10")]
    pub indexer_max_retries: u32,

    /// Cluster used in explorer links
    #[arg(long, global = true, env = "DELEGATION_CLUSTER", default_value = "custom")]
    pub cluster: String,

    /// Send even if the observed ownership does not allow the action
    #[arg(long, global = true)]
    pub force: bool,

    /// Log through env_logger without a log file
    #[arg(long, global = true, env = "DELEGATION_PLAIN_LOGS")]
    pub plain_logs: bool,
}
