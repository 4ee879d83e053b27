//! Resource transformation
//!
//! Structural, field-preserving conversion between the canonical
//! [`Resource`] shape and the raw [`SessionResource`] the transport uses. No
//! clinical element is added, dropped or rewritten here; context enrichment
//! is the hydrator's job.
//!
//! For any canonical resource `r`:
//!
//! ```
//! use emrlink::core::transform::{to_canonical, to_session_shape};
//! use emrlink::domain::Resource;
//! use serde_json::json;
//!
//! let r = Resource::new("Observation").with_field("status", json!("final"));
//! let back: Resource = to_canonical(to_session_shape(&r).unwrap()).unwrap();
//! assert_eq!(back, r);
//! ```

use crate::domain::{EmrError, Resource, Result, SessionResource};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Convert a canonical resource into the session shape
///
/// # Errors
///
/// Returns [`EmrError::MalformedResource`] if the resource has an empty
/// `resourceType`, or if `fields` carries `resourceType` or `id`.
pub fn to_session_shape(resource: &Resource) -> Result<SessionResource> {
    if resource.resource_type.trim().is_empty() {
        return Err(EmrError::MalformedResource(
            "resourceType cannot be empty".to_string(),
        ));
    }
    if let Some(key) = resource.reserved_field() {
        return Err(EmrError::MalformedResource(format!(
            "{key} must not be set as a plain element of {}",
            resource.resource_type
        )));
    }

    let value = serde_json::to_value(resource)?;
    SessionResource::from_value(value).map_err(|other| {
        EmrError::MalformedResource(format!("resource did not serialize to an object: {other}"))
    })
}

/// Convert a session-shape resource into a canonical type
///
/// `T` is usually [`Resource`], but any deserializable FHIR type works.
///
/// # Errors
///
/// - [`EmrError::MalformedResource`] if `resourceType` is missing or not a
///   non-empty string
/// - [`EmrError::Serialization`] if the object does not fit `T`
pub fn to_canonical<T: DeserializeOwned>(resource: SessionResource) -> Result<T> {
    let resource_type = resource
        .resource_type()
        .ok_or_else(|| {
            EmrError::MalformedResource("resource has no resourceType discriminant".to_string())
        })?
        .to_string();

    serde_json::from_value(resource.into_value()).map_err(|e| {
        EmrError::Serialization(format!("{resource_type} does not match the requested shape: {e}"))
    })
}

/// Narrow a raw response body to the session shape
///
/// Used on whatever a session returns; anything that is not an object with a
/// `resourceType` is reported as an invalid response.
pub fn session_resource_from_response(body: Value) -> Result<SessionResource> {
    let resource = SessionResource::from_value(body).map_err(|other| {
        let kind = match other {
            Value::Null => "an empty body".to_string(),
            other => format!("a non-object body: {other}"),
        };
        EmrError::InvalidResponse(format!("expected a FHIR resource, got {kind}"))
    })?;

    if resource.resource_type().is_none() {
        return Err(EmrError::InvalidResponse(
            "response has no resourceType".to_string(),
        ));
    }

    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_round_trip_preserves_nested_elements() {
        let resource: Resource = serde_json::from_value(json!({
            "resourceType": "Encounter",
            "id": "enc-1",
            "status": "in-progress",
            "class": {"system": "http://terminology.hl7.org/CodeSystem/v3-ActCode", "code": "AMB"},
            "participant": [{"individual": {"reference": "Practitioner/p1"}}],
            "extension": []
        }))
        .unwrap();

        let session = to_session_shape(&resource).unwrap();
        assert_eq!(session.resource_type(), Some("Encounter"));
        assert_eq!(session.get("id"), Some(&json!("enc-1")));

        let back: Resource = to_canonical(session).unwrap();
        assert_eq!(back, resource);
    }

    #[test]
    fn test_to_session_shape_rejects_empty_type() {
        let result = to_session_shape(&Resource::new(" "));
        assert!(matches!(result, Err(EmrError::MalformedResource(_))));
    }

    #[test]
    fn test_to_session_shape_rejects_reserved_elements() {
        let mut resource = Resource::new("Observation");
        resource
            .fields
            .insert("resourceType".to_string(), json!("Patient"));
        let err = to_session_shape(&resource).unwrap_err();
        assert!(matches!(err, EmrError::MalformedResource(ref msg) if msg.contains("resourceType")));

        let mut resource = Resource::new("Observation");
        resource.fields.insert("id".to_string(), json!(42));
        assert!(matches!(
            to_session_shape(&resource),
            Err(EmrError::MalformedResource(_))
        ));
    }

    #[test]
    fn test_round_trip_with_id_set_as_element() {
        let resource = Resource::new("Observation")
            .with_field("id", json!("obs-3"))
            .with_field("status", json!("final"));
        let back: Resource = to_canonical(to_session_shape(&resource).unwrap()).unwrap();
        assert_eq!(back, resource);
    }

    #[test]
    fn test_to_canonical_requires_resource_type() {
        let session = SessionResource::from_value(json!({"status": "final"})).unwrap();
        let result = to_canonical::<Resource>(session);
        assert!(matches!(result, Err(EmrError::MalformedResource(_))));
    }

    #[test]
    fn test_to_canonical_into_typed_struct() {
        #[derive(Debug, Deserialize)]
        struct Patient {
            id: String,
            #[serde(default)]
            gender: Option<String>,
        }

        let session = SessionResource::from_value(json!({
            "resourceType": "Patient",
            "id": "pat-7",
            "gender": "female"
        }))
        .unwrap();

        let patient: Patient = to_canonical(session).unwrap();
        assert_eq!(patient.id, "pat-7");
        assert_eq!(patient.gender.as_deref(), Some("female"));
    }

    #[test]
    fn test_response_validation() {
        assert!(matches!(
            session_resource_from_response(Value::Null),
            Err(EmrError::InvalidResponse(_))
        ));
        assert!(matches!(
            session_resource_from_response(json!({"issue": []})),
            Err(EmrError::InvalidResponse(_))
        ));
        assert!(session_resource_from_response(json!({"resourceType": "Observation"})).is_ok());
    }
}
