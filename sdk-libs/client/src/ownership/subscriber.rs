use std::{str::FromStr, sync::Arc, time::Duration};

use counter_delegation_sdk::Pubkey;
use futures::StreamExt;
use solana_account_decoder::{UiAccount, UiAccountData, UiAccountEncoding};
use solana_client::{
    nonblocking::pubsub_client::PubsubClient,
    rpc_config::RpcAccountInfoConfig,
    rpc_response::Response as RpcResponse,
};
use solana_sdk::commitment_config::CommitmentConfig;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, error, info, warn};

use super::{
    tracker::{Layer, OwnershipTracker},
    OwnershipError,
};
use crate::config::DelegationConfig;

/// Receives decoded account notifications.
pub trait SubscriptionHandler: Send + Sync {
    fn handle_update(
        &self,
        layer: Layer,
        owner: &Pubkey,
        data: &[u8],
    ) -> Result<(), OwnershipError>;
}

impl SubscriptionHandler for OwnershipTracker {
    fn handle_update(
        &self,
        layer: Layer,
        owner: &Pubkey,
        data: &[u8],
    ) -> Result<(), OwnershipError> {
        self.apply_update(layer, owner, data).map(|_| ())
    }
}

/// Configuration for WebSocket reconnection with exponential backoff
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    pub fn next_delay(&self, current_delay: Duration) -> Duration {
        Duration::from_secs_f64(
            (current_delay.as_secs_f64() * self.backoff_multiplier)
                .min(self.max_delay.as_secs_f64()),
        )
    }
}

/// Result of a single connection session
enum ConnectionResult {
    Shutdown,
    /// Stream closed unexpectedly, reconnect.
    StreamClosed,
}

/// Subscribes to a single account on one ledger and forwards every
/// notification to its handler. Reconnects with exponential backoff on
/// connection loss.
pub struct AccountSubscriber<H: SubscriptionHandler> {
    ws_url: String,
    account: Pubkey,
    layer: Layer,
    handler: Arc<H>,
    reconnect_config: ReconnectConfig,
    shutdown_rx: broadcast::Receiver<()>,
}

impl<H: SubscriptionHandler + 'static> AccountSubscriber<H> {
    pub fn new(
        ws_url: String,
        account: Pubkey,
        layer: Layer,
        handler: Arc<H>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            ws_url,
            account,
            layer,
            handler,
            reconnect_config: ReconnectConfig::default(),
            shutdown_rx,
        }
    }

    pub fn with_reconnect_config(mut self, reconnect_config: ReconnectConfig) -> Self {
        self.reconnect_config = reconnect_config;
        self
    }

    pub async fn run(&mut self) {
        info!(
            "Starting {:?} subscriber for {} at {}",
            self.layer, self.account, self.ws_url
        );

        let mut current_delay = self.reconnect_config.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            match self.run_connection().await {
                Ok(ConnectionResult::Shutdown) => {
                    info!("{:?} subscriber stopped", self.layer);
                    return;
                }
                Ok(ConnectionResult::StreamClosed) => {
                    attempt += 1;
                    warn!(
                        "{:?} connection lost (attempt {}), reconnecting in {:?}...",
                        self.layer, attempt, current_delay
                    );
                }
                Err(e) => {
                    attempt += 1;
                    warn!(
                        "{:?} connection error (attempt {}): {}, reconnecting in {:?}...",
                        self.layer, attempt, e, current_delay
                    );
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(current_delay) => {}
                _ = self.shutdown_rx.recv() => {
                    info!("Shutdown signal received for {:?} subscriber during reconnect backoff", self.layer);
                    return;
                }
            }

            current_delay = self.reconnect_config.next_delay(current_delay);
        }
    }

    async fn run_connection(&mut self) -> Result<ConnectionResult, OwnershipError> {
        let pubsub_client = PubsubClient::new(&self.ws_url).await?;

        let (mut subscription, unsubscribe) = pubsub_client
            .account_subscribe(
                &self.account,
                Some(RpcAccountInfoConfig {
                    encoding: Some(UiAccountEncoding::Base64),
                    commitment: Some(CommitmentConfig::confirmed()),
                    data_slice: None,
                    min_context_slot: None,
                }),
            )
            .await?;

        info!(
            "{:?} subscription established for {}",
            self.layer, self.account
        );

        loop {
            tokio::select! {
                result = subscription.next() => {
                    match result {
                        Some(response) => self.handle_account_update(response),
                        None => {
                            error!("{:?} subscription stream closed unexpectedly", self.layer);
                            unsubscribe().await;
                            return Ok(ConnectionResult::StreamClosed);
                        }
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    info!("Shutdown signal received for {:?} subscriber", self.layer);
                    unsubscribe().await;
                    return Ok(ConnectionResult::Shutdown);
                }
            }
        }
    }

    fn handle_account_update(&self, response: RpcResponse<UiAccount>) {
        let result = decode_ui_account(&response.value).and_then(|(owner, data)| {
            self.handler.handle_update(self.layer, &owner, &data)
        });
        match result {
            Ok(()) => debug!(
                "Updated {:?} counter {} at slot {}",
                self.layer, self.account, response.context.slot
            ),
            Err(e) => error!(
                "Failed to apply {:?} update for {}: {}",
                self.layer, self.account, e
            ),
        }
    }
}

/// Owner and raw data of a base64 encoded account notification.
pub fn decode_ui_account(account: &UiAccount) -> Result<(Pubkey, Vec<u8>), OwnershipError> {
    let owner = Pubkey::from_str(&account.owner)
        .map_err(|_| OwnershipError::InvalidOwner(account.owner.clone()))?;
    let data = match &account.data {
        UiAccountData::Binary(data, UiAccountEncoding::Base64) => base64::decode(data)?,
        _ => return Err(OwnershipError::UnexpectedEncoding(account.owner.clone())),
    };
    Ok((owner, data))
}

/// Running base and ephemeral subscriptions of one tracker. Dropping the
/// handle signals both to stop.
pub struct SubscriptionHandle {
    shutdown_tx: broadcast::Sender<()>,
    tasks: Vec<JoinHandle<()>>,
}

impl SubscriptionHandle {
    /// Signals shutdown and waits for both subscribers to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(());
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                error!("Subscriber task failed: {:?}", e);
            }
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Subscribes `tracker` to the counter on the base and the ephemeral
/// ledger of `config`.
pub fn spawn_counter_subscriptions(
    tracker: Arc<OwnershipTracker>,
    config: &DelegationConfig,
) -> SubscriptionHandle {
    let (shutdown_tx, _) = broadcast::channel(1);
    let tasks = [
        (config.ws_url.clone(), Layer::Base),
        (config.ephemeral_ws_url.clone(), Layer::Ephemeral),
    ]
    .into_iter()
    .map(|(ws_url, layer)| {
        let mut subscriber = AccountSubscriber::new(
            ws_url,
            tracker.counter(),
            layer,
            tracker.clone(),
            shutdown_tx.subscribe(),
        );
        tokio::spawn(async move { subscriber.run().await })
    })
    .collect();

    SubscriptionHandle { shutdown_tx, tasks }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ui_account(owner: &Pubkey, data: UiAccountData) -> UiAccount {
        UiAccount {
            lamports: 1,
            data,
            owner: owner.to_string(),
            executable: false,
            rent_epoch: 0,
            space: None,
        }
    }

    #[test]
    fn test_next_delay() {
        let config = ReconnectConfig::default();
        let mut delay = config.initial_delay;
        let mut delays = vec![];
        for _ in 0..8 {
            delays.push(delay.as_secs());
            delay = config.next_delay(delay);
        }
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 32, 60, 60]);
    }

    #[test]
    fn test_decode_ui_account() {
        let owner = Pubkey::new_unique();
        let account = ui_account(
            &owner,
            UiAccountData::Binary(base64::encode([1u8, 2, 3]), UiAccountEncoding::Base64),
        );
        assert_eq!(decode_ui_account(&account).unwrap(), (owner, vec![1, 2, 3]));

        let account = ui_account(
            &owner,
            UiAccountData::Binary("3yZe7d".to_string(), UiAccountEncoding::Base58),
        );
        assert!(matches!(
            decode_ui_account(&account),
            Err(OwnershipError::UnexpectedEncoding(_))
        ));
    }
}
