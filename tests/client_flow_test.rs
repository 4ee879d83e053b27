//! Integration tests for the vendor client against an in-memory session

mod common;

use common::{CreateReply, MockSession};
use emrlink::adapters::emr::{EmrClient, FHIR_JSON};
use emrlink::adapters::session::{SessionHandle, StaticLauncher};
use emrlink::config::SessionConfig;
use emrlink::domain::{ContextKind, EmrError, Resource, SessionError, VendorTag};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::json;
use std::sync::Arc;

const CERNER_URL: &str = "https://fhir-ehr-code.cerner.com/r4/ec2458f2-1e24-41c8-b71b-0e701af7583d";
const EPIC_URL: &str = "https://fhir.epic.com/interconnect-fhir-oauth/api/FHIR/R4";

fn observation() -> Resource {
    Resource::new("Observation")
        .with_field("status", json!("final"))
        .with_field("code", json!({"text": "Heart rate"}))
        .with_field("valueQuantity", json!({"value": 72, "unit": "beats/min"}))
}

fn client(session: &Arc<MockSession>) -> EmrClient {
    EmrClient::from_session(session.clone() as Arc<dyn SessionHandle>).unwrap()
}

#[tokio::test]
async fn test_create_hydrates_and_returns_canonical() {
    let session = Arc::new(MockSession::new(EPIC_URL));
    let client = client(&session);

    let created = client.create(&observation(), None).await.unwrap();
    assert_eq!(created.resource_type, "Observation");
    assert_eq!(created.id.as_deref(), Some("created-1"));
    assert_eq!(created.get("subject"), Some(&json!({"reference": "Patient/12724066"})));
    assert_eq!(
        created.get("encounter"),
        Some(&json!([{"reference": "Encounter/97939518"}]))
    );

    let period = created.get("period").unwrap();
    assert_eq!(period["start"], period["end"]);
    assert!(period["start"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_create_adds_only_context_fields() {
    let session = Arc::new(MockSession::new(EPIC_URL));
    let client = client(&session);

    client.create(&observation(), None).await.unwrap();

    let (submitted, options) = session.created().remove(0);
    let mut keys: Vec<&str> = submitted.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "code",
            "encounter",
            "period",
            "resourceType",
            "status",
            "subject",
            "valueQuantity"
        ]
    );
    assert_eq!(options.url, "Observation");
    assert_eq!(options.method, reqwest::Method::POST);
}

#[tokio::test]
async fn test_create_keeps_declared_context() {
    let session = Arc::new(MockSession::new(EPIC_URL).without_encounter());
    let client = client(&session);

    let resource = observation()
        .with_field("subject", json!({"reference": "Patient/other"}))
        .with_field("encounter", json!([{"reference": "Encounter/other"}]));

    let created = client.create(&resource, None).await.unwrap();
    assert_eq!(created.get("subject"), Some(&json!({"reference": "Patient/other"})));
    assert!(!created.has_field("period"));
}

#[tokio::test]
async fn test_create_missing_identifier_sends_nothing() {
    let session = Arc::new(MockSession::new(EPIC_URL).without_encounter());
    let client = client(&session);

    let err = client.create(&observation(), None).await.unwrap_err();
    assert!(matches!(
        err,
        EmrError::MissingIdentifier(ContextKind::Encounter)
    ));
    assert!(session.created().is_empty());
}

#[tokio::test]
async fn test_cerner_create_without_user_sends_nothing() {
    let session = Arc::new(MockSession::new(CERNER_URL).without_user());
    let client = client(&session);

    let err = client.create(&observation(), None).await.unwrap_err();
    assert!(matches!(err, EmrError::MissingIdentifier(ContextKind::User)));
    assert!(session.created().is_empty());
}

#[tokio::test]
async fn test_create_rejects_conflicting_resource_type_element() {
    let session = Arc::new(MockSession::new(EPIC_URL));
    let resource = observation().with_field("resourceType", json!("Patient"));

    let err = client(&session).create(&resource, None).await.unwrap_err();
    assert!(matches!(err, EmrError::MalformedResource(_)));
    assert!(session.created().is_empty());
}

#[tokio::test]
async fn test_create_failure_wraps_cause() {
    let session = Arc::new(MockSession::new(EPIC_URL).with_reply(CreateReply::Fail(422)));
    let client = client(&session);

    let err = client.create(&observation(), None).await.unwrap_err();
    match err {
        EmrError::CreateFailed {
            ref resource_type,
            ref source,
        } => {
            assert_eq!(resource_type, "Observation");
            assert!(matches!(
                **source,
                EmrError::Session(SessionError::RequestFailed { status: 422, .. })
            ));
        }
        other => panic!("expected CreateFailed, got {other:?}"),
    }
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_create_rejects_response_without_resource_type() {
    let session = Arc::new(
        MockSession::new(EPIC_URL).with_reply(CreateReply::Body(json!({"id": "x"}))),
    );
    let client = client(&session);

    assert!(matches!(
        client.create(&observation(), None).await,
        Err(EmrError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_create_rejects_empty_response() {
    let session = Arc::new(
        MockSession::new(EPIC_URL).with_reply(CreateReply::Body(serde_json::Value::Null)),
    );
    let client = client(&session);

    assert!(matches!(
        client.create(&observation(), None).await,
        Err(EmrError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_cerner_create_adds_author() {
    let session = Arc::new(MockSession::new(CERNER_URL));
    let client = client(&session);
    assert_eq!(client.vendor().tag(), VendorTag::Cerner);

    let created = client.create(&observation(), None).await.unwrap();
    assert_eq!(
        created.get("author"),
        Some(&json!([{"reference": "Practitioner/12742069"}]))
    );
}

#[tokio::test]
async fn test_epic_create_does_not_add_author() {
    let session = Arc::new(MockSession::new(EPIC_URL));
    let created = client(&session).create(&observation(), None).await.unwrap();
    assert!(!created.has_field("author"));
}

#[tokio::test]
async fn test_create_header_merge() {
    let session = Arc::new(MockSession::new(EPIC_URL));
    let client = client(&session);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert("x-request-id", HeaderValue::from_static("abc"));

    client.create(&observation(), Some(headers)).await.unwrap();

    let (_, options) = session.created().remove(0);
    // content-type and prefer are mandatory on Epic, accept is not
    assert_eq!(options.headers[CONTENT_TYPE], FHIR_JSON);
    assert_eq!(options.headers["prefer"], "return=representation");
    assert_eq!(options.headers[ACCEPT], "application/json");
    assert_eq!(options.headers["x-request-id"], "abc");
}

#[tokio::test]
async fn test_read_applies_read_headers() {
    let session = Arc::new(MockSession::new(CERNER_URL));
    let client = client(&session);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));

    let observation = client.read("Observation/obs-1", Some(headers)).await.unwrap();
    assert_eq!(observation.id.as_deref(), Some("obs-1"));

    let request = session.requests().remove(0);
    assert_eq!(request.url, "Observation/obs-1");
    assert_eq!(request.headers[ACCEPT], FHIR_JSON);
}

#[tokio::test]
async fn test_practitioner_read_rejects_patient() {
    let session = Arc::new(
        MockSession::new(CERNER_URL)
            .with_user_resource(json!({"resourceType": "Patient", "id": "12724066"})),
    );
    let client = client(&session);

    assert!(matches!(
        client.get_practitioner_read().await,
        Err(EmrError::UnexpectedResourceType { .. })
    ));
}

#[tokio::test]
async fn test_context_reads() {
    let session = Arc::new(MockSession::new(EPIC_URL));
    let client = client(&session);

    let practitioner = client.get_practitioner_read().await.unwrap();
    assert_eq!(practitioner.resource_type, "Practitioner");

    let patient = client.get_patient_read().await.unwrap();
    assert_eq!(patient.id.as_deref(), Some("12724066"));

    let encounter = client.get_encounter_read().await.unwrap();
    assert_eq!(encounter.id.as_deref(), Some("97939518"));
}

#[tokio::test]
async fn test_identical_surface_across_vendors() {
    for url in [
        EPIC_URL,
        CERNER_URL,
        "https://staging-fhir.ecwcloud.com/fhir/r4/FFBJCD",
        "https://api.preview.platform.athenahealth.com/fhir/r4",
        "https://ap22sandbox.fhirapi.athenahealth.com/demoAPIServer/fhir/r4",
        "https://launch.smarthealthit.org/v/r4/fhir",
    ] {
        let session = Arc::new(MockSession::new(url));
        let client = client(&session);

        let created = client.create(&observation(), None).await.unwrap();
        assert!(created.has_field("subject"), "{url}");
        assert_eq!(
            client.endpoints().is_ok(),
            client.vendor().tag() != VendorTag::Smart,
            "{url}"
        );
    }
}

#[tokio::test]
async fn test_connect_through_launcher() {
    let launcher = StaticLauncher::new(SessionConfig {
        server_url: "https://api.preview.platform.athenahealth.com/fhir/r4".to_string(),
        ..Default::default()
    });

    let client = EmrClient::connect(&launcher).await.unwrap();
    assert_eq!(client.vendor().tag(), VendorTag::Athena);
    assert!(client.endpoints().unwrap().token.contains("athenahealth.com"));
}

#[tokio::test]
async fn test_connect_falls_back_to_token_claims() {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let payload = URL_SAFE_NO_PAD.encode(r#"{"epic.dstu2.patient":"T1"}"#);
    let launcher = StaticLauncher::new(SessionConfig {
        server_url: "https://fhir.hospital.example.org/api/FHIR/R4".to_string(),
        id_token: Some(emrlink::config::secret_string(format!(
            "eyJhbGciOiJSUzI1NiJ9.{payload}.c2ln"
        ))),
        ..Default::default()
    });

    let client = EmrClient::connect(&launcher).await.unwrap();
    assert_eq!(client.vendor().tag(), VendorTag::Epic);
}

#[tokio::test]
async fn test_connect_unknown_vendor_fails() {
    let launcher = StaticLauncher::new(SessionConfig {
        server_url: "https://fhir.hospital.example.org/r4".to_string(),
        ..Default::default()
    });

    assert!(matches!(
        EmrClient::connect(&launcher).await,
        Err(EmrError::UnsupportedVendor(VendorTag::None))
    ));
}
