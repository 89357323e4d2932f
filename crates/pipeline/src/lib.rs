//! The intent routing and fulfillment pipeline.
//!
//! One inbound message runs through one strictly sequential invocation:
//! journal the inbound turn, classify, fulfill the intent, journal the
//! outbound turn, reply. Every sub-failure is absorbed and degraded except a
//! failed order append, which surfaces as `PipelineError`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use borong_core::domain::inventory::AvailabilityResult;
use borong_core::domain::message::InboundMessage;
use borong_core::domain::turn::ConversationTurn;
use borong_core::errors::PipelineError;
use borong_core::{replies, Intent};
use borong_db::ConversationLog;
use borong_remote::RemoteIntentClient;
use borong_store::{CatalogStore, InventoryOracle, OrderStore};

/// Terminal payload of one pipeline invocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PipelineOutcome {
    pub intent: Intent,
    pub reply: String,
    pub metadata: serde_json::Value,
}

pub struct MessagePipeline {
    remote: Arc<RemoteIntentClient>,
    oracle: InventoryOracle,
    orders: Arc<dyn OrderStore>,
    log: Arc<dyn ConversationLog>,
}

impl MessagePipeline {
    pub fn new(
        remote: Arc<RemoteIntentClient>,
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        log: Arc<dyn ConversationLog>,
    ) -> Self {
        Self { remote, oracle: InventoryOracle::new(catalog), orders, log }
    }

    /// Processes one inbound message to completion. Cancellation is not
    /// supported mid-flight; the invocation either returns an outcome or the
    /// single propagating order-persistence error.
    pub async fn process(
        &self,
        message: &InboundMessage,
    ) -> Result<PipelineOutcome, PipelineError> {
        let correlation_id = Uuid::new_v4();

        self.journal(
            &correlation_id,
            ConversationTurn::inbound(
                &message.channel,
                &message.sender_id,
                &message.text,
                &message.locale,
            ),
        )
        .await;

        let classified = self.remote.detect_intent(&message.text).await;
        info!(
            event_name = "pipeline.message.classified",
            correlation_id = %correlation_id,
            intent = %classified.as_inner(),
            source = classified.source(),
            "inbound message classified"
        );
        let intent = classified.into_inner();

        let (reply, metadata) = match intent {
            Intent::Faq => {
                let answer = self.remote.answer_faq(&message.text).await.into_inner();
                (answer, json!({}))
            }
            Intent::Inventory => {
                let query =
                    self.remote.extract_inventory_query(&message.text).await.into_inner();

                let availability = match self.oracle.check_availability(&query).await {
                    Ok(availability) => availability,
                    Err(error) => {
                        warn!(
                            event_name = "pipeline.inventory.degraded",
                            correlation_id = %correlation_id,
                            error = %error,
                            "availability check failed, replying as no-match"
                        );
                        AvailabilityResult::no_match()
                    }
                };

                let reply = replies::availability(&query, &availability);
                (reply, json!({ "query": query, "availability": availability }))
            }
            Intent::Order => {
                let order = self
                    .remote
                    .extract_order(
                        &message.text,
                        &message.sender_id,
                        message.display_name.as_deref(),
                    )
                    .await
                    .into_inner();

                // The one step whose failure crosses the pipeline boundary:
                // claiming "order recorded" without a persisted row would be
                // worse than an explicit error.
                self.orders.append_order(&order).await?;

                let reply = replies::order_recorded(&order);
                (reply, json!({ "order": order }))
            }
            Intent::General => (replies::greeting(), json!({})),
        };

        self.journal(
            &correlation_id,
            ConversationTurn::outbound(
                &message.channel,
                &message.sender_id,
                &reply,
                &message.locale,
                intent,
                metadata.clone(),
            ),
        )
        .await;

        Ok(PipelineOutcome { intent, reply, metadata })
    }

    /// Failure-absorbing journal boundary: log-sink health never affects the
    /// primary control flow.
    async fn journal(&self, correlation_id: &Uuid, turn: ConversationTurn) {
        if let Err(error) = self.log.append(&turn).await {
            warn!(
                event_name = "pipeline.journal.degraded",
                correlation_id = %correlation_id,
                direction = turn.direction.as_str(),
                error = %error,
                "conversation journal append failed"
            );
        }
    }
}
