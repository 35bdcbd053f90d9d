//! # Deposit Dispatch
//!
//! The single entry point for advance requests. Exactly six base-layer
//! senders mean anything to this ledger (five asset portals and the
//! address relay) and each maps to exactly one handler. Everything
//! else is rejected without side effects.
//!
//! The dispatcher is also the ledger's error boundary: any error a
//! handler raises while crediting a deposit becomes a plain `Reject`
//! here, so a malformed or adversarial payload can never propagate a
//! failure into the outer request loop. Handlers validate before they
//! mutate, so a rejected request leaves no partial state behind.
//!
//! One asymmetry is documented policy: a fungible deposit whose success
//! flag is `false` decodes cleanly and credits nothing, and the request
//! is still *accepted*. The portal's notification was valid even though
//! the underlying base-layer transfer was not.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::address::Address;
use crate::config::PortalConfig;
use crate::deposit::FungibleDepositLayout;
use crate::ops;
use crate::registry::ApplicationAddressRegistry;
use crate::wallet::AssetLedger;

// ---------------------------------------------------------------------------
// Advance requests
// ---------------------------------------------------------------------------

/// Pass-through metadata attached to every advance request.
///
/// The ledger interprets none of it; applications may.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceMetadata {
    /// Base-layer block the input was included in.
    pub block_number: u64,
    /// Base-layer timestamp of that block.
    pub timestamp: u64,
    /// Rollup epoch index.
    pub epoch_index: u64,
    /// Input index within the epoch.
    pub input_index: u64,
    /// Chain id of the base layer.
    pub chain_id: u64,
}

/// One state-changing input delivered by the outer coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceRequest {
    /// Base-layer sender. Parsing into [`Address`] canonicalizes it, so
    /// lookups in the route table are representation-independent.
    pub sender: Address,
    /// Raw input payload.
    #[serde(with = "crate::voucher::hex_bytes")]
    pub payload: Vec<u8>,
    /// Uninterpreted metadata.
    #[serde(default)]
    pub metadata: AdvanceMetadata,
}

/// The ledger's verdict on an advance request, reported back to the
/// outer coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchOutcome {
    /// The request was handled; any credit it described is applied.
    Accept,
    /// The request was not for this ledger or failed validation; no
    /// state changed.
    Reject,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Which operation module a routed sender selects.
#[derive(Clone, Copy, Debug)]
enum AssetHandler {
    Native,
    Fungible,
    NonFungible,
    SemiFungibleSingle,
    SemiFungibleBatch,
    Relay,
}

/// Routes advance requests to asset handlers by sender address.
///
/// A constructed value, owned by the wallet app rather than held as
/// process-wide state. Two ledgers with different configs coexist in
/// one process.
#[derive(Clone, Debug)]
pub struct DepositDispatcher {
    routes: HashMap<Address, AssetHandler>,
    fungible_layout: FungibleDepositLayout,
}

impl DepositDispatcher {
    /// Builds the six-entry route table from a deployment config.
    pub fn new(config: &PortalConfig) -> Self {
        let routes = HashMap::from([
            (config.native_portal, AssetHandler::Native),
            (config.fungible_portal, AssetHandler::Fungible),
            (config.non_fungible_portal, AssetHandler::NonFungible),
            (config.semi_fungible_portal, AssetHandler::SemiFungibleSingle),
            (
                config.semi_fungible_batch_portal,
                AssetHandler::SemiFungibleBatch,
            ),
            (config.address_relay, AssetHandler::Relay),
        ]);
        Self {
            routes,
            fungible_layout: config.fungible_layout,
        }
    }

    /// Handles one advance request against the given ledger state.
    ///
    /// Never panics and never leaves partial state: the outcome is
    /// `Accept` with the full credit applied, or `Reject` with nothing
    /// applied.
    pub fn dispatch(
        &self,
        ledger: &mut AssetLedger,
        registry: &mut ApplicationAddressRegistry,
        request: &AdvanceRequest,
    ) -> DispatchOutcome {
        let Some(handler) = self.routes.get(&request.sender) else {
            debug!(sender = %request.sender, "sender is not a routed portal, rejecting");
            return DispatchOutcome::Reject;
        };

        let result = match handler {
            AssetHandler::Native => ops::native::deposit(ledger, &request.payload),
            AssetHandler::Fungible => {
                ops::fungible::deposit(ledger, &request.payload, self.fungible_layout)
            }
            AssetHandler::NonFungible => {
                ops::non_fungible::deposit(ledger, &request.payload)
            }
            AssetHandler::SemiFungibleSingle => {
                ops::semi_fungible::deposit(ledger, &request.payload)
            }
            AssetHandler::SemiFungibleBatch => {
                ops::semi_fungible_batch::deposit(ledger, &request.payload)
            }
            AssetHandler::Relay => ops::relay::handle(registry, &request.payload),
        };

        match result {
            Ok(()) => {
                debug!(sender = %request.sender, handler = ?handler, "deposit accepted");
                DispatchOutcome::Accept
            }
            Err(error) => {
                warn!(sender = %request.sender, %error, "deposit rejected");
                DispatchOutcome::Reject
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayPolicy;
    use primitive_types::U256;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn word(value: u64) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[24..].copy_from_slice(&value.to_be_bytes());
        out
    }

    fn request(sender: Address, payload: Vec<u8>) -> AdvanceRequest {
        AdvanceRequest {
            sender,
            payload,
            metadata: AdvanceMetadata::default(),
        }
    }

    fn native_payload(sender: Address, value: u64) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(sender.as_bytes());
        p.extend_from_slice(&word(value));
        p
    }

    struct Fixture {
        config: PortalConfig,
        dispatcher: DepositDispatcher,
        ledger: AssetLedger,
        registry: ApplicationAddressRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_config(PortalConfig::default())
        }

        fn with_config(config: PortalConfig) -> Self {
            let dispatcher = DepositDispatcher::new(&config);
            let registry = ApplicationAddressRegistry::new(config.relay_policy);
            Self {
                config,
                dispatcher,
                ledger: AssetLedger::new(),
                registry,
            }
        }

        fn dispatch(&mut self, request: &AdvanceRequest) -> DispatchOutcome {
            self.dispatcher
                .dispatch(&mut self.ledger, &mut self.registry, request)
        }
    }

    #[test]
    fn routed_native_deposit_is_accepted_and_credited() {
        let mut fx = Fixture::new();
        let sender = addr(0xAA);
        let req = request(fx.config.native_portal, native_payload(sender, 123_456));

        assert_eq!(fx.dispatch(&req), DispatchOutcome::Accept);
        assert_eq!(
            fx.ledger.native_balance(&sender),
            U256::from(123_456u64)
        );
    }

    #[test]
    fn unrouted_sender_is_rejected_without_side_effects() {
        let mut fx = Fixture::new();
        let req = request(addr(0x99), native_payload(addr(0xAA), 5));

        assert_eq!(fx.dispatch(&req), DispatchOutcome::Reject);
        assert!(fx.ledger.is_empty());
        assert_eq!(fx.registry.get(), None);
    }

    #[test]
    fn malformed_payload_is_rejected_without_side_effects() {
        let mut fx = Fixture::new();
        let req = request(fx.config.native_portal, vec![0xde, 0xad]);

        assert_eq!(fx.dispatch(&req), DispatchOutcome::Reject);
        assert!(fx.ledger.is_empty());
    }

    #[test]
    fn failed_fungible_flag_is_accepted_but_credits_nothing() {
        let mut fx = Fixture::new();
        let mut payload = vec![0u8];
        payload.extend_from_slice(addr(0x11).as_bytes());
        payload.extend_from_slice(addr(0x22).as_bytes());
        payload.extend_from_slice(&word(500));
        let req = request(fx.config.fungible_portal, payload);

        assert_eq!(fx.dispatch(&req), DispatchOutcome::Accept);
        assert!(fx.ledger.is_empty());
    }

    #[test]
    fn relay_is_routed_to_the_registry() {
        let mut fx = Fixture::new();
        let req = request(fx.config.address_relay, addr(0xD0).as_bytes().to_vec());

        assert_eq!(fx.dispatch(&req), DispatchOutcome::Accept);
        assert_eq!(fx.registry.get(), Some(addr(0xD0)));
    }

    #[test]
    fn repeated_relay_rejected_under_strict_policy() {
        let config = PortalConfig {
            relay_policy: RelayPolicy::RejectRepeated,
            ..PortalConfig::default()
        };
        let mut fx = Fixture::with_config(config);
        let relay = fx.config.address_relay;

        assert_eq!(
            fx.dispatch(&request(relay, addr(0x01).as_bytes().to_vec())),
            DispatchOutcome::Accept
        );
        assert_eq!(
            fx.dispatch(&request(relay, addr(0x02).as_bytes().to_vec())),
            DispatchOutcome::Reject
        );
        assert_eq!(fx.registry.get(), Some(addr(0x01)));
    }

    #[test]
    fn two_dispatchers_are_fully_isolated() {
        let mut a = Fixture::new();
        let mut b = Fixture::new();
        let sender = addr(0xAA);

        let req = request(a.config.native_portal, native_payload(sender, 10));
        a.dispatch(&req);

        assert_eq!(a.ledger.native_balance(&sender), U256::from(10u64));
        assert!(b.ledger.is_empty());
        b.dispatch(&req);
        assert_eq!(a.ledger.native_balance(&sender), U256::from(10u64));
        assert_eq!(b.ledger.native_balance(&sender), U256::from(10u64));
    }

    #[test]
    fn outcome_serializes_as_lowercase_strings() {
        assert_eq!(
            serde_json::to_string(&DispatchOutcome::Accept).unwrap(),
            "\"accept\""
        );
        assert_eq!(
            serde_json::to_string(&DispatchOutcome::Reject).unwrap(),
            "\"reject\""
        );
    }
}
