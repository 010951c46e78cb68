use serde_json::Value as JsonValue;

use crate::EventEnvelope;

/// A projection builds a read model from the append-only event log.
///
/// Read models are disposable: they can be cleared and rebuilt by replaying
/// envelopes. Implementations must be idempotent, since the same envelope may
/// arrive more than once (once from the synchronous command path, again from
/// a bus subscriber or a replay). Envelopes of other aggregate types are
/// ignored.
pub trait Projection: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Stable projection name, used in logs.
    fn name(&self) -> &'static str;

    /// Apply one envelope to the read model.
    fn apply_envelope(&self, envelope: &EventEnvelope<JsonValue>) -> Result<(), Self::Error>;

    /// Drop all read-model state (and cursors) ahead of a replay.
    fn reset(&self);

    /// Rebuild from scratch by replaying envelopes in stream order.
    fn rebuild(
        &self,
        envelopes: impl IntoIterator<Item = EventEnvelope<JsonValue>>,
    ) -> Result<(), Self::Error>
    where
        Self: Sized,
    {
        self.reset();

        let mut envs: Vec<_> = envelopes.into_iter().collect();
        envs.sort_by_key(|e| (e.aggregate_id(), e.sequence_number()));

        for env in &envs {
            self.apply_envelope(env)?;
        }
        Ok(())
    }
}
