//! # Checkout Flow
//!
//! State machine for the redirect-based checkout round trip:
//!
//! ```text
//! Idle -> Creating -> Redirected -> Executing -> Succeeded
//!            |            (external)    |     \-> PaidNotListed (sell only)
//!            \-> Failed                 \-> Failed
//! ```
//!
//! Control leaves the process at `Redirected`: the buyer is on the
//! processor's hosted approval page and the only re-entry signal is the
//! redirect callback carrying `paymentId` and `PayerID`. There is no
//! timeout and no cancellation; a buyer who never returns leaves the flow
//! non-terminal and the processor expires the authorization on its own
//! schedule.
//!
//! For the sell flow, payment capture and listing creation are not
//! transactional with each other: a captured payment whose listing insert
//! fails lands in `PaidNotListed`, which must stay distinct from both
//! `Succeeded` and `Failed`. No automatic refund is attempted.

use crate::error::MarketResult;
use crate::gateway::{PaymentGateway, RedirectUrls};
use crate::listing::{Listing, ListingDraft};
use crate::payment::{validate_items, CapturedPayment, PaymentItem};
use crate::store::ListingStore;
use serde::Serialize;
use tracing::{info, warn};

/// What a successful capture should trigger
#[derive(Debug, Clone)]
pub enum CheckoutKind {
    /// Buy flow: success is reported, nothing else happens
    Buy,
    /// Sell flow: success additionally creates the listing
    Sell { draft: ListingDraft },
}

/// Flow state, terminal in `Succeeded`, `PaidNotListed`, and `Failed`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    Idle,
    Creating,
    /// Payment created; the buyer must be navigated to `approval_url`
    Redirected {
        payment_id: String,
        approval_url: String,
    },
    Executing {
        payment_id: String,
    },
    /// Payment captured; `listing` is present for the sell flow
    Succeeded {
        payment: CapturedPayment,
        listing: Option<Listing>,
    },
    /// Payment captured but the dependent listing insert failed.
    /// The buyer has paid; surface this distinctly from `Failed`.
    PaidNotListed {
        payment: CapturedPayment,
        reason: String,
    },
    Failed {
        reason: String,
    },
}

impl CheckoutState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckoutState::Succeeded { .. }
                | CheckoutState::PaidNotListed { .. }
                | CheckoutState::Failed { .. }
        )
    }

    /// True when money changed hands, regardless of what came after
    pub fn is_paid(&self) -> bool {
        matches!(
            self,
            CheckoutState::Succeeded { .. } | CheckoutState::PaidNotListed { .. }
        )
    }
}

/// Client-side orchestration of one checkout attempt
pub struct CheckoutFlow {
    kind: CheckoutKind,
    /// Present on the pre-redirect side; the post-redirect side only has
    /// the processor's identifiers
    item: Option<PaymentItem>,
    state: CheckoutState,
    resumed: bool,
}

impl CheckoutFlow {
    /// Start a buy flow for a single product reference
    pub fn buy(item: PaymentItem) -> Self {
        Self {
            kind: CheckoutKind::Buy,
            item: Some(item),
            state: CheckoutState::Idle,
            resumed: false,
        }
    }

    /// Start a sell flow: the listing fee item plus the draft to publish
    /// once the fee is captured
    pub fn sell(item: PaymentItem, draft: ListingDraft) -> Self {
        Self {
            kind: CheckoutKind::Sell { draft },
            item: Some(item),
            state: CheckoutState::Idle,
            resumed: false,
        }
    }

    /// Rebuild a buy flow on the post-redirect side, where the original
    /// product reference is no longer in hand. Only `resume` is valid.
    pub fn returning_buy() -> Self {
        Self {
            kind: CheckoutKind::Buy,
            item: None,
            state: CheckoutState::Idle,
            resumed: false,
        }
    }

    /// Rebuild a sell flow on the post-redirect side
    pub fn returning_sell(draft: ListingDraft) -> Self {
        Self {
            kind: CheckoutKind::Sell { draft },
            item: None,
            state: CheckoutState::Idle,
            resumed: false,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Approval URL to navigate to, once `Redirected`
    pub fn approval_url(&self) -> Option<&str> {
        match &self.state {
            CheckoutState::Redirected { approval_url, .. } => Some(approval_url),
            _ => None,
        }
    }

    /// `Idle -> Creating -> Redirected | Failed`
    ///
    /// Validates the item locally first; invalid input fails the flow
    /// without contacting the processor. A create response lacking an
    /// approval link also fails here, so there is never a navigation
    /// without a destination.
    pub async fn begin(
        &mut self,
        gateway: &dyn PaymentGateway,
        urls: &RedirectUrls,
    ) -> &CheckoutState {
        if !matches!(self.state, CheckoutState::Idle) {
            return &self.state;
        }

        let Some(item) = self.item.clone() else {
            self.state = CheckoutState::Failed {
                reason: "no product reference to check out".to_string(),
            };
            return &self.state;
        };

        let items = std::slice::from_ref(&item);
        if let Err(e) = validate_items(items) {
            self.state = CheckoutState::Failed {
                reason: e.to_string(),
            };
            return &self.state;
        }

        self.state = CheckoutState::Creating;

        match gateway.create_payment(items, urls).await {
            Ok(created) => {
                info!(
                    payment_id = %created.id,
                    provider = gateway.provider_name(),
                    "payment created, redirecting to approval page"
                );
                self.state = CheckoutState::Redirected {
                    payment_id: created.id,
                    approval_url: created.approval_url,
                };
            }
            Err(e) => {
                warn!(error = %e, "payment creation failed");
                self.state = CheckoutState::Failed {
                    reason: e.to_string(),
                };
            }
        }

        &self.state
    }

    /// `Redirected -> Executing -> Succeeded | PaidNotListed | Failed`
    ///
    /// The one re-entry point after the external redirect. One-shot: a
    /// repeated call (page refresh re-delivering the same identifiers)
    /// returns the already-reached state and performs no second gateway
    /// call.
    pub async fn resume(
        &mut self,
        gateway: &dyn PaymentGateway,
        store: &dyn ListingStore,
        payment_id: &str,
        payer_id: &str,
    ) -> &CheckoutState {
        if self.resumed || self.state.is_terminal() {
            return &self.state;
        }
        self.resumed = true;

        self.state = CheckoutState::Executing {
            payment_id: payment_id.to_string(),
        };

        let payment = match gateway.execute_payment(payment_id, payer_id).await {
            Ok(payment) => payment,
            Err(e) => {
                warn!(payment_id, error = %e, "payment execution failed");
                self.state = CheckoutState::Failed {
                    reason: e.to_string(),
                };
                return &self.state;
            }
        };

        info!(payment_id = %payment.id, state = %payment.state, "payment captured");

        self.state = match &self.kind {
            CheckoutKind::Buy => CheckoutState::Succeeded {
                payment,
                listing: None,
            },
            CheckoutKind::Sell { draft } => {
                match publish_listing(store, draft.clone()).await {
                    Ok(listing) => CheckoutState::Succeeded {
                        payment,
                        listing: Some(listing),
                    },
                    Err(e) => {
                        warn!(payment_id = %payment.id, error = %e,
                              "payment captured but listing creation failed");
                        CheckoutState::PaidNotListed {
                            payment,
                            reason: e.to_string(),
                        }
                    }
                }
            }
        };

        &self.state
    }
}

async fn publish_listing(
    store: &dyn ListingStore,
    draft: ListingDraft,
) -> MarketResult<Listing> {
    draft.validate()?;
    store.create_listing(draft).await
}
