use slotwise_core::{Capability, SlotwiseError};

fn is_timeout(e: &SlotwiseError) -> bool {
    matches!(
        e,
        SlotwiseError::ProviderTimeout { .. } | SlotwiseError::AllProvidersTimedOut { .. }
    )
}

/// Collapse a set of provider errors into a uniform `SlotwiseError` outcome.
///
/// Rules:
/// - If `attempted_any` is false → `Unsupported(capability)`.
/// - If all errors are timeouts → `AllProvidersTimedOut(capability)`.
/// - If `not_found_what` is `Some` and all errors are `NotFound` → `NotFound(what)`.
/// - A single remaining error is returned as is.
/// - Else → `AllProvidersFailed(errors)`.
pub fn collapse_errors(
    capability: Capability,
    attempted_any: bool,
    mut errors: Vec<SlotwiseError>,
    not_found_what: Option<String>,
) -> SlotwiseError {
    if !attempted_any {
        return SlotwiseError::unsupported(capability.to_string());
    }
    if !errors.is_empty() && errors.iter().all(is_timeout) {
        return SlotwiseError::AllProvidersTimedOut {
            capability: capability.to_string(),
        };
    }
    if let Some(what) = not_found_what
        && !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, SlotwiseError::NotFound { .. }))
    {
        return SlotwiseError::not_found(what);
    }
    if errors.len() == 1 {
        return errors.remove(0);
    }
    SlotwiseError::AllProvidersFailed(errors)
}
