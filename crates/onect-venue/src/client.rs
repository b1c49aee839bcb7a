//! The venue client: trait seam plus the reqwest implementation.
//!
//! A client is constructed with a signer (normally the primary wallet).
//! After a successful link the delegate is installed wholesale via
//! [`VenueClient::set_linked_signer`]; from then on order placement is
//! signed by the delegate and the primary wallet is never prompted
//! again. Link authorizations themselves are always signed by the
//! construction signer.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, PrimitiveSignature};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use onect_core::{
    AccountSummary, LinkResult, OpenOrdersResult, OrderReceipt, OrderRequest, Subaccount,
    WalletProvider, X18,
};

use crate::eip712::{self, sign_execute};
use crate::error::{VenueError, VenueResult};
use crate::network::VenueNetwork;
use crate::nonce::{OrderNonceGenerator, SystemClock};
use crate::wire::{
    Envelope, ExecuteData, ExecuteRequest, LinkSignerTx, LinkedSignerRateLimitData, NoncesData,
    OrderTx, OrdersData, QueryRequest, SignedLinkSigner, SignedPlaceOrder, SubaccountInfoData,
};

/// Label under which a delegate is linked. The venue keys the linked
/// signer by the owning subaccount, so the delegate itself carries an
/// empty name; the delegate replaces any previous one rather than
/// appending.
pub const LINKED_SIGNER_NAME: &str = "";

/// Default timeout for gateway requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Linked-signer record with the venue's remaining link allowance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Currently linked signer address (zero if none).
    pub signer: Address,
    /// Remaining permitted link operations.
    pub remaining_txs: u64,
    /// Seconds until the allowance replenishes.
    pub wait_time: u64,
}

/// Async client seam for the venue gateway.
#[async_trait]
pub trait VenueClient: Send + Sync {
    /// Address of the construction signer.
    fn signer_address(&self) -> Address;

    /// Replace the trading signer wholesale. `None` reverts order
    /// signing to the construction signer.
    fn set_linked_signer(&self, signer: Option<Arc<dyn WalletProvider>>);

    /// Authorize `delegate` as the linked signer for `subaccount`.
    /// The authorization is signed by the construction signer. Venue
    /// non-"success" statuses are ordinary outcomes, not errors.
    async fn link_signer(
        &self,
        subaccount: &Subaccount,
        delegate: Address,
    ) -> VenueResult<LinkResult>;

    /// Query the linked-signer record and remaining link allowance.
    async fn linked_signer_rate_limit(
        &self,
        subaccount: &Subaccount,
    ) -> VenueResult<RateLimitStatus>;

    /// Existence and health figures for a subaccount.
    async fn subaccount_info(&self, subaccount: &Subaccount) -> VenueResult<AccountSummary>;

    /// Open orders per product id (possibly empty lists).
    async fn open_orders(
        &self,
        subaccount: &Subaccount,
        product_ids: &[u32],
    ) -> VenueResult<OpenOrdersResult>;

    /// Place an order, signed by the linked signer when one is
    /// installed. Venue rejection surfaces as `VenueError::Rejected`.
    async fn place_order(&self, request: &OrderRequest) -> VenueResult<OrderReceipt>;
}

/// reqwest-backed gateway client.
pub struct RestVenueClient {
    network: VenueNetwork,
    http: Client,
    signer: Arc<dyn WalletProvider>,
    linked_signer: RwLock<Option<Arc<dyn WalletProvider>>>,
    nonces: OrderNonceGenerator<SystemClock>,
}

impl RestVenueClient {
    /// Create a client for `network`, signing as `signer`.
    ///
    /// # Errors
    /// Returns `VenueError::HttpClient` if the HTTP client cannot be
    /// built.
    pub fn new(network: VenueNetwork, signer: Arc<dyn WalletProvider>) -> VenueResult<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| VenueError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            network,
            http,
            signer,
            linked_signer: RwLock::new(None),
            nonces: OrderNonceGenerator::default(),
        })
    }

    #[must_use]
    pub fn network(&self) -> VenueNetwork {
        self.network
    }

    /// The signer used for order placement: the linked delegate when
    /// installed, otherwise the construction signer.
    fn order_signer(&self) -> Arc<dyn WalletProvider> {
        self.linked_signer
            .read()
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.signer))
    }

    async fn query<T: DeserializeOwned>(&self, request: &QueryRequest) -> VenueResult<Envelope<T>> {
        let url = format!("{}/query", self.network.gateway_url());
        debug!(url = %url, "Venue query");
        self.post(&url, request).await
    }

    async fn execute(&self, request: &ExecuteRequest) -> VenueResult<Envelope<ExecuteData>> {
        let url = format!("{}/execute", self.network.gateway_url());
        debug!(url = %url, "Venue execute");
        self.post(&url, request).await
    }

    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> VenueResult<Envelope<T>> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| VenueError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VenueError::HttpClient(format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| VenueError::HttpClient(format!("Failed to parse response: {e}")))
    }

    /// Fetch the owner's subaccount tx nonce (link authorizations are
    /// sequenced by it).
    async fn tx_nonce(&self, owner: Address) -> VenueResult<u64> {
        let envelope: Envelope<NoncesData> = self
            .query(&QueryRequest::Nonces {
                address: owner.to_string(),
            })
            .await?;
        Ok(envelope.into_result()?.tx_nonce)
    }
}

#[async_trait]
impl VenueClient for RestVenueClient {
    fn signer_address(&self) -> Address {
        self.signer.address()
    }

    fn set_linked_signer(&self, signer: Option<Arc<dyn WalletProvider>>) {
        *self.linked_signer.write() = signer;
    }

    async fn link_signer(
        &self,
        subaccount: &Subaccount,
        delegate: Address,
    ) -> VenueResult<LinkResult> {
        let nonce = self.tx_nonce(subaccount.owner).await?;
        let delegate_sub = Subaccount::new(delegate, LINKED_SIGNER_NAME)?;

        let payload = eip712::LinkSigner {
            sender: subaccount.to_bytes32(),
            signer: delegate_sub.to_bytes32(),
            nonce,
        };
        let signature = sign_execute(self.signer.as_ref(), self.network, &payload).await?;

        info!(
            subaccount = %subaccount,
            delegate = %delegate,
            "Submitting link-signer authorization"
        );

        let request = ExecuteRequest::LinkSigner(SignedLinkSigner {
            tx: LinkSignerTx {
                sender: subaccount.to_hex(),
                signer: delegate_sub.to_hex(),
                nonce: nonce.to_string(),
            },
            signature: encode_signature(&signature),
        });

        let envelope = self.execute(&request).await?;
        if envelope.is_success() {
            Ok(LinkResult::Success)
        } else {
            Ok(LinkResult::Failure(envelope.failure_reason()))
        }
    }

    async fn linked_signer_rate_limit(
        &self,
        subaccount: &Subaccount,
    ) -> VenueResult<RateLimitStatus> {
        let envelope: Envelope<LinkedSignerRateLimitData> = self
            .query(&QueryRequest::LinkedSignerRateLimit {
                subaccount: subaccount.to_hex(),
            })
            .await?;
        let data = envelope.into_result()?;
        Ok(RateLimitStatus {
            signer: address_from_bytes32_hex(&data.signer)?,
            remaining_txs: data.remaining_txs,
            wait_time: data.wait_time,
        })
    }

    async fn subaccount_info(&self, subaccount: &Subaccount) -> VenueResult<AccountSummary> {
        let envelope: Envelope<SubaccountInfoData> = self
            .query(&QueryRequest::SubaccountInfo {
                subaccount: subaccount.to_hex(),
            })
            .await?;
        Ok(envelope.into_result()?.into_summary())
    }

    async fn open_orders(
        &self,
        subaccount: &Subaccount,
        product_ids: &[u32],
    ) -> VenueResult<OpenOrdersResult> {
        let envelope: Envelope<OrdersData> = self
            .query(&QueryRequest::Orders {
                sender: subaccount.to_hex(),
                product_ids: product_ids.to_vec(),
            })
            .await?;
        envelope.into_result()?.into_result()
    }

    async fn place_order(&self, request: &OrderRequest) -> VenueResult<OrderReceipt> {
        let now_secs = Utc::now().timestamp() as u64;
        let expiration = request.expiration.encode_at(now_secs);
        let price_x18 = X18::from_decimal(request.price)?;
        let amount_x18 = X18::from_decimal(request.amount)?;
        let nonce = self.nonces.next();

        let payload = eip712::Order {
            sender: request.subaccount.to_bytes32(),
            priceX18: price_x18.raw(),
            amount: amount_x18.raw(),
            expiration,
            nonce,
        };
        let signer = self.order_signer();
        let signature = sign_execute(signer.as_ref(), self.network, &payload).await?;

        info!(
            subaccount = %request.subaccount,
            product_id = request.product_id,
            price = %request.price,
            amount = %request.amount,
            "Submitting order"
        );

        let wire = ExecuteRequest::PlaceOrder(SignedPlaceOrder {
            product_id: request.product_id,
            order: OrderTx {
                sender: request.subaccount.to_hex(),
                price_x18: price_x18.to_string(),
                amount: amount_x18.to_string(),
                expiration: expiration.to_string(),
                nonce: nonce.to_string(),
            },
            signature: encode_signature(&signature),
        });

        let data = self.execute(&wire).await?.into_result()?;
        Ok(OrderReceipt {
            digest: data.digest.unwrap_or_default(),
            product_id: request.product_id,
            subaccount: request.subaccount.clone(),
        })
    }
}

fn encode_signature(signature: &PrimitiveSignature) -> String {
    format!("0x{}", hex::encode(signature.as_bytes()))
}

/// Extract the address from a bytes32 sender hex string. Accepts a
/// plain 20-byte address as well.
fn address_from_bytes32_hex(s: &str) -> VenueResult<Address> {
    let bytes = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| VenueError::InvalidResponse(format!("bad signer field: {e}")))?;
    if bytes.len() != 20 && bytes.len() != 32 {
        return Err(VenueError::InvalidResponse(format!(
            "signer field has {} bytes",
            bytes.len()
        )));
    }
    Ok(Address::from_slice(&bytes[..20]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use onect_core::LocalWallet;

    // Well-known test private key (DO NOT use in production).
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_address_from_bytes32_hex() {
        let owner: Address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
            .parse()
            .unwrap();
        let sub = Subaccount::new(owner, "default").unwrap();

        assert_eq!(address_from_bytes32_hex(&sub.to_hex()).unwrap(), owner);
        assert_eq!(
            address_from_bytes32_hex("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap(),
            owner
        );
        assert!(address_from_bytes32_hex("0x1234").is_err());
    }

    #[test]
    fn test_order_signer_defaults_to_construction_signer() {
        let primary = Arc::new(LocalWallet::from_hex(TEST_PRIVATE_KEY).unwrap());
        let client = RestVenueClient::new(VenueNetwork::ArbitrumSepolia, primary.clone()).unwrap();

        assert_eq!(client.order_signer().address(), primary.address());
        assert_eq!(client.signer_address(), primary.address());
    }

    #[test]
    fn test_set_linked_signer_replaces_wholesale() {
        let primary = Arc::new(LocalWallet::from_hex(TEST_PRIVATE_KEY).unwrap());
        let delegate = Arc::new(
            LocalWallet::from_hex(
                "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
            )
            .unwrap(),
        );
        let client = RestVenueClient::new(VenueNetwork::ArbitrumSepolia, primary.clone()).unwrap();

        client.set_linked_signer(Some(delegate.clone()));
        assert_eq!(client.order_signer().address(), delegate.address());

        client.set_linked_signer(None);
        assert_eq!(client.order_signer().address(), primary.address());
    }
}
