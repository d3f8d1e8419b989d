//! # Condition gate.
//!
//! Evaluates the optional guard before anything else runs. A missing guard
//! passes. A guard that evaluates to `false` skips the whole run, teardown
//! included. An evaluation error is the one fault that propagates at once.

use std::sync::Arc;

use crate::{
    error::Fault,
    events::{Bus, Event, EventKind},
    probes::Condition,
};

/// Returns `Ok(true)` if the run should proceed.
pub(crate) async fn check(condition: Option<&Arc<dyn Condition>>, bus: &Bus) -> Result<bool, Fault> {
    let Some(condition) = condition else {
        return Ok(true);
    };
    let pass = condition
        .eval()
        .await
        .map_err(|error| Fault::Condition { error })?;
    if !pass {
        bus.publish(
            Event::new(EventKind::ConditionSkipped).with_reason("Condition failed - skipping tests"),
        );
    }
    Ok(pass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StepError;
    use crate::probes::ConditionFn;

    #[tokio::test]
    async fn missing_guard_passes() {
        assert_eq!(check(None, &Bus::new(4)).await, Ok(true));
    }

    #[tokio::test]
    async fn false_guard_skips_with_notice() {
        let bus = Bus::new(4);
        let mut rx = bus.subscribe();
        let guard: Arc<dyn Condition> = ConditionFn::arc(|| async { Ok::<_, StepError>(false) });

        assert_eq!(check(Some(&guard), &bus).await, Ok(false));
        assert_eq!(rx.try_recv().unwrap().kind, EventKind::ConditionSkipped);
    }

    #[tokio::test]
    async fn evaluation_error_propagates() {
        let guard: Arc<dyn Condition> =
            ConditionFn::arc(|| async { Err::<bool, _>(StepError::fail("no url")) });
        assert_eq!(
            check(Some(&guard), &Bus::new(4)).await,
            Err(Fault::Condition {
                error: StepError::fail("no url")
            })
        );
    }
}
