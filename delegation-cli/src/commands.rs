use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context as _};
use counter_delegation_client::{
    delegation::{BuiltDelegation, DelegationError, DelegationInstructionBuilder},
    indexer::PhotonIndexer,
    ownership::{
        spawn_counter_subscriptions, ActionGates, OwnerPrograms, OwnershipState, OwnershipTracker,
    },
    rpc::{
        build_explorer_url, RpcConnection, RpcConnectionConfig, RpcError, SolanaRpcConnection,
    },
    DelegationConfig,
};
use solana_sdk::signature::{Keypair, Signature, Signer};
use tracing::{error, info};

use crate::{
    cli::{Cli, Commands},
    config::ConfigError,
};

type Builder = DelegationInstructionBuilder<PhotonIndexer, SolanaRpcConnection>;

/// Connections shared by all commands.
pub struct Context {
    pub config: DelegationConfig,
    pub base: Arc<SolanaRpcConnection>,
    pub ephemeral: Arc<SolanaRpcConnection>,
    pub indexer: Arc<PhotonIndexer>,
    pub tracker: Arc<OwnershipTracker>,
}

impl Context {
    pub fn new(config: DelegationConfig) -> Self {
        let base = Arc::new(SolanaRpcConnection::new(RpcConnectionConfig::new(
            &config.rpc_url,
        )));
        let ephemeral = Arc::new(SolanaRpcConnection::new(RpcConnectionConfig::new(
            &config.ephemeral_rpc_url,
        )));
        let indexer = Arc::new(
            PhotonIndexer::new(config.indexer_url.clone(), config.indexer_api_key.clone())
                .with_retry_config(config.retry_config.clone()),
        );
        let tracker = Arc::new(OwnershipTracker::new(
            config.counter_address(),
            OwnerPrograms::from(&config),
        ));
        Self {
            config,
            base,
            ephemeral,
            indexer,
            tracker,
        }
    }

    pub fn builder(&self, payer: &Keypair) -> Builder {
        DelegationInstructionBuilder::new(
            self.indexer.clone(),
            self.base.clone(),
            self.config.clone(),
        )
        .with_payer(payer.pubkey())
    }
}

/// Loads the payer keypair for commands that send a transaction. Read-only
/// commands never touch the keypair file.
pub fn load_payer(cli: &Cli) -> Result<Option<Keypair>, ConfigError> {
    if cli.command.sends_transaction() {
        cli.global.payer().map(Some)
    } else {
        Ok(None)
    }
}

/// Whether the observed ownership allows `command`. Commands that send
/// nothing are always allowed.
pub fn is_allowed(command: &Commands, gates: &ActionGates) -> bool {
    match command {
        Commands::Delegate => gates.delegate,
        Commands::Undelegate => gates.undelegate,
        Commands::ScheduleUndelegate => gates.schedule_undelegate,
        Commands::Increment { ephemeral: true } => gates.increment_ephemeral,
        Commands::Increment { ephemeral: false } => gates.increment_mainnet,
        Commands::CreateCounter
        | Commands::FundEphemeralBalance
        | Commands::Status
        | Commands::Watch => true,
    }
}

pub fn format_state(state: &OwnershipState) -> String {
    let gates = state.gates();
    format!(
        "mainnet owner: {:?}\nmainnet counter: {:?}\nephemeral owner: {:?}\nephemeral counter: {:?}\n\
         allowed: delegate={} undelegate={} increment={} increment --ephemeral={} schedule-undelegate={}",
        state.mainnet_owner,
        state.mainnet_counter,
        state.ephemeral_owner,
        state.ephemeral_counter,
        gates.delegate,
        gates.undelegate,
        gates.increment_mainnet,
        gates.increment_ephemeral,
        gates.schedule_undelegate,
    )
}

/// Explorer link of a failed transaction, if its signature can be
/// recovered from the error.
pub fn failure_explorer_url(error: &RpcError, cluster: &str) -> Option<String> {
    error
        .signature()
        .map(|signature| build_explorer_url(&signature, cluster))
}

async fn send<R: RpcConnection>(
    ctx: &Context,
    payer: &Keypair,
    rpc: &R,
    built: BuiltDelegation,
) -> anyhow::Result<Signature> {
    let result = rpc
        .create_and_send_transaction(&built.instructions, &payer.pubkey(), &[payer])
        .await;
    match result {
        Ok(signature) => {
            info!("Confirmed {}", signature);
            println!("{}", build_explorer_url(&signature, &ctx.config.cluster));
            Ok(signature)
        }
        Err(e) => {
            error!("Transaction failed: {}", e);
            if let Some(url) = failure_explorer_url(&e, &ctx.config.cluster) {
                eprintln!("{}", url);
            }
            Err(e.into())
        }
    }
}

async fn watch(ctx: &Context) -> anyhow::Result<()> {
    let handle = spawn_counter_subscriptions(ctx.tracker.clone(), &ctx.config);
    let mut last = ctx.tracker.snapshot();
    println!("{}", format_state(&last));

    let mut interval = tokio::time::interval(Duration::from_millis(500));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let state = ctx.tracker.snapshot();
                if state != last {
                    println!("{}", format_state(&state));
                    last = state;
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for ctrl-c")?;
                info!("Stopping subscriptions");
                break;
            }
        }
    }
    handle.shutdown().await;
    Ok(())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.global.delegation_config()?;
    let payer = load_payer(&cli)?;
    let ctx = Context::new(config);

    let state = ctx
        .tracker
        .fetch(ctx.base.as_ref(), ctx.ephemeral.as_ref())
        .await?;
    if !cli.global.force && !is_allowed(&cli.command, &state.gates()) {
        return Err(anyhow!(
            "{} is not allowed in the current state, use --force to send anyway\n{}",
            cli.command.name(),
            format_state(&state)
        ));
    }

    match (cli.command, payer) {
        (Commands::Status, _) => {
            println!("{}", format_state(&state));
        }
        (Commands::Watch, _) => watch(&ctx).await?,
        (command, Some(payer)) => execute(&ctx, &payer, command).await?,
        (command, None) => return Err(anyhow!("{} requires a payer keypair", command.name())),
    }
    Ok(())
}

async fn execute(ctx: &Context, payer: &Keypair, command: Commands) -> anyhow::Result<()> {
    let builder = ctx.builder(payer);
    match command {
        Commands::CreateCounter => {
            send(ctx, payer, ctx.base.as_ref(), builder.create_counter()?).await?;
        }
        Commands::Increment { ephemeral } => {
            let rpc = if ephemeral { &ctx.ephemeral } else { &ctx.base };
            send(ctx, payer, rpc.as_ref(), builder.increment_counter()?).await?;
        }
        Commands::Delegate => {
            let built = builder.delegate().await.map_err(describe)?;
            send(ctx, payer, ctx.base.as_ref(), built).await?;
        }
        Commands::Undelegate => {
            let built = builder.undelegate().await.map_err(describe)?;
            send(ctx, payer, ctx.base.as_ref(), built).await?;
        }
        Commands::ScheduleUndelegate => {
            send(ctx, payer, ctx.ephemeral.as_ref(), builder.schedule_undelegate()?).await?;
        }
        Commands::FundEphemeralBalance => {
            send(ctx, payer, ctx.base.as_ref(), builder.fund_ephemeral_balance()?).await?;
        }
        Commands::Status | Commands::Watch => {}
    }
    Ok(())
}

fn describe(error: DelegationError) -> anyhow::Error {
    if error.is_precondition() {
        anyhow!("Invalid input: {}", error)
    } else {
        anyhow::Error::new(error)
    }
}
