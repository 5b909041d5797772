use crate::{Config, SnapshotMode};
use commonware_codec::Encode;
use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    Digestible, Signer,
};
use hotpotato_types::{
    Code, CommitResponse, InitResponse, QueryResponse, Snapshot, State, Status, Transaction,
    TxResponse,
};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Version metadata reported to the consensus engine.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Initialized,
    Running,
}

/// The application façade: owns the current game state and a session key,
/// and wires the consensus callbacks to the execution layer.
///
/// Deliver and end-block mutate through `&mut self`, so a given block's
/// transitions are applied by a single writer in engine order. Check and
/// query read the last committed snapshot through one atomic reference load
/// and never observe a state mid-transition.
pub struct Application {
    config: Config,
    signer: PrivateKey,
    lifecycle: Lifecycle,

    /// State advanced by the current block's deliver/end-block calls.
    working: State,
    /// Snapshot served to check/query readers; replaced wholesale at commit.
    committed: RwLock<Arc<State>>,
}

impl Application {
    pub fn new(config: Config, signer: PrivateKey) -> Self {
        Self {
            config,
            signer,
            lifecycle: Lifecycle::Uninitialized,
            working: State::default(),
            committed: RwLock::new(Arc::new(State::default())),
        }
    }

    /// The session key query responses are signed with, distinct from any
    /// player key.
    pub fn identity(&self) -> PublicKey {
        self.signer.public_key()
    }

    fn committed(&self) -> Arc<State> {
        self.committed.read().expect("state snapshot lock poisoned").clone()
    }

    fn publish(&self, state: State) {
        *self.committed.write().expect("state snapshot lock poisoned") = Arc::new(state);
    }

    /// Install the empty initial state and report version metadata.
    pub fn init(&mut self) -> InitResponse {
        self.working = State::default();
        self.publish(State::default());
        self.lifecycle = Lifecycle::Initialized;
        info!(version = VERSION, "initialized");

        InitResponse {
            version: VERSION.to_string(),
            app_hash: self.working.digest(),
        }
    }

    /// Pre-consensus dry run against the last committed state. Advisory
    /// only: acceptance here never binds deliver, and no state is mutated.
    pub fn check(&self, tx: &[u8]) -> TxResponse {
        if self.lifecycle == Lifecycle::Uninitialized {
            return TxResponse::reject("application not initialized");
        }

        let transaction = match Transaction::decode_authenticated(tx) {
            Ok(transaction) => transaction,
            Err(err) => {
                debug!(error = %err, "check rejected submission");
                return TxResponse::reject(err.to_string());
            }
        };
        match hotpotato_execution::validate(&self.committed(), &transaction) {
            Ok(()) => TxResponse::ok(),
            Err(err) => TxResponse::reject(err.to_string()),
        }
    }

    /// Consensus-ordered application of a transaction. Authoritative and
    /// independent of any earlier check outcome: re-validates, then replaces
    /// the working state on success; on failure the working state is left
    /// fully untouched.
    pub fn deliver(&mut self, tx: &[u8]) -> TxResponse {
        if self.lifecycle == Lifecycle::Uninitialized {
            return TxResponse::reject("application not initialized");
        }
        self.lifecycle = Lifecycle::Running;

        let transaction = match Transaction::decode_authenticated(tx) {
            Ok(transaction) => transaction,
            Err(err) => {
                debug!(error = %err, "deliver rejected submission");
                return TxResponse::reject(err.to_string());
            }
        };
        match hotpotato_execution::deliver(&self.working, &transaction) {
            Ok(next) => {
                self.working = next;
                TxResponse::ok()
            }
            Err(err) => {
                debug!(error = %err, "transaction rejected");
                TxResponse::reject(err.to_string())
            }
        }
    }

    /// Run the block-boundary blow-up policy.
    pub fn end_block(&mut self, height: u64) {
        debug_assert!(self.lifecycle != Lifecycle::Uninitialized);
        self.lifecycle = Lifecycle::Running;
        self.working =
            hotpotato_execution::end_block(&self.working, height, self.config.blow_up_interval);
    }

    /// Publish the working state as the new committed snapshot and return
    /// the hash replicas compare to confirm agreement.
    pub fn commit(&mut self) -> CommitResponse {
        debug_assert!(self.lifecycle != Lifecycle::Uninitialized);
        let app_hash = self.working.digest();
        self.publish(self.working.clone());

        CommitResponse { app_hash }
    }

    /// Serve a consistent snapshot of the last committed state. Repeated
    /// calls between commits return identical bytes.
    pub fn query(&self) -> QueryResponse {
        let snapshot = self.committed();
        let height = snapshot.last_block_height;
        let value = match self.config.snapshot_mode {
            SnapshotMode::Signed => {
                Snapshot::sign(&self.signer, height, (*snapshot).clone())
                    .encode()
                    .to_vec()
            }
            SnapshotMode::Summary => Status::from_state(&snapshot).encode().to_vec(),
        };

        QueryResponse {
            code: Code::Ok,
            value,
            height,
        }
    }
}
