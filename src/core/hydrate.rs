//! Context hydration
//!
//! Fills in the clinical context a resource needs before it is submitted:
//! `subject` from the session's patient, and `encounter` plus `period` from
//! the session's encounter. Hydration is additive. An element the resource
//! already declares is never touched and its identifier is never resolved,
//! so hydrating twice is the same as hydrating once.
//!
//! Identifiers are resolved before anything is sent. A missing identifier
//! fails the whole operation with [`EmrError::MissingIdentifier`], so a
//! partially hydrated resource never reaches the server.

use crate::adapters::session::SessionHandle;
use crate::domain::{ContextKind, EmrError, Period, Reference, Result, SessionResource};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Resolve a context identifier, failing when the session has none
///
/// Empty and whitespace-only identifiers count as missing.
pub async fn require_identifier(session: &dyn SessionHandle, kind: ContextKind) -> Result<String> {
    match session.context_id(kind).await? {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(EmrError::MissingIdentifier(kind)),
    }
}

/// Hydrate `resource` with the session's patient and encounter context
///
/// The encounter period is stamped with the current time.
pub async fn hydrate(session: &dyn SessionHandle, resource: &mut SessionResource) -> Result<()> {
    hydrate_at(session, resource, Utc::now()).await
}

/// Hydrate with an explicit timestamp for the encounter period
pub async fn hydrate_at(
    session: &dyn SessionHandle,
    resource: &mut SessionResource,
    now: DateTime<Utc>,
) -> Result<()> {
    let patient_id = if resource.contains("subject") {
        None
    } else {
        Some(require_identifier(session, ContextKind::Patient).await?)
    };
    let encounter_id = if resource.contains("encounter") {
        None
    } else {
        Some(require_identifier(session, ContextKind::Encounter).await?)
    };

    if let Some(patient_id) = patient_id {
        resource.insert_if_absent("subject", reference_value("Patient", &patient_id)?);
    }

    if let Some(encounter_id) = encounter_id {
        resource.insert_if_absent(
            "encounter",
            Value::Array(vec![reference_value("Encounter", &encounter_id)?]),
        );

        let instant = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        resource.insert_if_absent("period", serde_json::to_value(Period::at(instant))?);
    }

    tracing::debug!(
        resource_type = resource.resource_type().unwrap_or("unknown"),
        "Hydrated resource with session context"
    );

    Ok(())
}

/// Add an `author` reference to the session's user, unless already present
pub async fn hydrate_author(
    session: &dyn SessionHandle,
    resource: &mut SessionResource,
) -> Result<()> {
    if resource.contains("author") {
        return Ok(());
    }

    let user_id = require_identifier(session, ContextKind::User).await?;
    resource.insert_if_absent(
        "author",
        Value::Array(vec![reference_value("Practitioner", &user_id)?]),
    );
    Ok(())
}

fn reference_value(resource_type: &str, id: &str) -> Result<Value> {
    Ok(serde_json::to_value(Reference::to(resource_type, id))?)
}
