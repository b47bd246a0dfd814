//! Integration tests for the PubChem gateway against a mock PUG-REST server.

use chemly_core::{
    CompoundGateway, IdentifierKind, LookupError, MoleculeRecord, PubChemGateway,
};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

const PROPERTY_SUFFIX: &str =
    "property/IUPACName,SMILES,MolecularWeight,MolecularFormula,XLogP,HBondDonorCount,HBondAcceptorCount/JSON";

fn aspirin_body() -> serde_json::Value {
    serde_json::json!({
        "PropertyTable": {
            "Properties": [{
                "CID": 2244,
                "MolecularFormula": "C9H8O4",
                "MolecularWeight": "180.16",
                "SMILES": "CC(=O)OC1=CC=CC=C1C(=O)O",
                "IUPACName": "2-acetyloxybenzoic acid",
                "XLogP": 1.2,
                "HBondDonorCount": 1,
                "HBondAcceptorCount": 4
            }]
        }
    })
}

fn gateway_for(server: &wiremock::MockServer) -> PubChemGateway {
    PubChemGateway::with_base_url(format!("{}/rest/pug", server.uri())).unwrap()
}

// ==================== Property Lookup Tests ====================

#[tokio::test]
async fn test_pubchem_resolves_name_with_all_attributes() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(format!("/rest/pug/compound/name/aspirin/{PROPERTY_SUFFIX}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(aspirin_body()))
        .expect(1)
        .mount(&server)
        .await;

    let raw = gateway_for(&server)
        .resolve("aspirin", IdentifierKind::Name)
        .await
        .unwrap()
        .expect("aspirin should resolve");

    assert_eq!(raw.database_id, 2244);
    assert_eq!(raw.name.as_deref(), Some("2-acetyloxybenzoic acid"));
    assert_eq!(
        raw.structural_notation.as_deref(),
        Some("CC(=O)OC1=CC=CC=C1C(=O)O")
    );
    assert_eq!(raw.molecular_mass.as_deref(), Some("180.16"));
    assert_eq!(raw.molecular_formula.as_deref(), Some("C9H8O4"));
    assert_eq!(raw.log_p, Some(1.2));
    assert_eq!(raw.hydrogen_donor_count, Some(1));
    assert_eq!(raw.hydrogen_acceptor_count, Some(4));
}

#[tokio::test]
async fn test_pubchem_routes_numeric_id_to_cid_namespace() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(format!("/rest/pug/compound/cid/2244/{PROPERTY_SUFFIX}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(aspirin_body()))
        .expect(1)
        .mount(&server)
        .await;

    let raw = gateway_for(&server)
        .resolve("2244", IdentifierKind::NumericId)
        .await
        .unwrap();

    assert_eq!(raw.map(|r| r.database_id), Some(2244));
}

#[tokio::test]
async fn test_pubchem_routes_smiles_as_single_encoded_segment() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path_regex(r"^/rest/pug/compound/smiles/C%3DO/property/[^/]+/JSON$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "PropertyTable": {
                "Properties": [{ "CID": 712, "SMILES": "C=O", "MolecularWeight": "30.026" }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let raw = gateway_for(&server)
        .resolve("C=O", IdentifierKind::StructuralNotation)
        .await
        .unwrap()
        .expect("formaldehyde should resolve");

    assert_eq!(raw.database_id, 712);
    assert_eq!(raw.molecular_mass.as_deref(), Some("30.026"));
    assert!(raw.log_p.is_none());
}

#[tokio::test]
async fn test_pubchem_encodes_spaces_in_names() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(format!(
            "/rest/pug/compound/name/salicylic%20acid/{PROPERTY_SUFFIX}"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "PropertyTable": { "Properties": [{ "CID": 338 }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let raw = gateway_for(&server)
        .resolve("salicylic acid", IdentifierKind::Name)
        .await
        .unwrap();

    assert_eq!(raw.map(|r| r.database_id), Some(338));
}

#[tokio::test]
async fn test_pubchem_missing_iupac_name_falls_back_to_identifier_in_record() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(format!("/rest/pug/compound/cid/962/{PROPERTY_SUFFIX}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "PropertyTable": {
                "Properties": [{ "CID": 962, "MolecularFormula": "H2O", "MolecularWeight": "18.015" }]
            }
        })))
        .mount(&server)
        .await;

    let raw = gateway_for(&server)
        .resolve("962", IdentifierKind::NumericId)
        .await
        .unwrap()
        .unwrap();
    let record = MoleculeRecord::from_raw(raw, "962");

    assert_eq!(record.display_name(), "962");
    assert_eq!(record.molecular_formula(), Some("H2O"));
}

// ==================== No Match Tests ====================

#[tokio::test]
async fn test_pubchem_not_found_is_no_match() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path_regex(r"^/rest/pug/compound/name/Unobtainium123/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "Fault": { "Code": "PUGREST.NotFound", "Message": "No CID found" }
        })))
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .resolve("Unobtainium123", IdentifierKind::Name)
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_pubchem_empty_property_list_is_no_match() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path_regex(r"^/rest/pug/compound/name/nothing/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "PropertyTable": { "Properties": [] }
        })))
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .resolve("nothing", IdentifierKind::Name)
        .await
        .unwrap();

    assert!(result.is_none());
}

// ==================== Failure Tests ====================

#[tokio::test]
async fn test_pubchem_server_error_is_http_status_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .resolve("aspirin", IdentifierKind::Name)
        .await
        .unwrap_err();

    assert!(
        matches!(err, LookupError::HttpStatus { status: 503, .. }),
        "got {err:?}"
    );
    assert!(err.to_string().contains("pacing interval"));
}

#[tokio::test]
async fn test_pubchem_malformed_json_is_protocol_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .resolve("aspirin", IdentifierKind::Name)
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Protocol { .. }), "got {err:?}");
    assert!(err.to_string().contains("aspirin"));
}

#[tokio::test]
async fn test_pubchem_unreachable_host_is_transport_error() {
    let gateway = PubChemGateway::with_base_url("http://127.0.0.1:9/rest/pug").unwrap();

    let err = gateway
        .resolve("aspirin", IdentifierKind::Name)
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Transport { .. }), "got {err:?}");
}

// ==================== Structure Fetch Tests ====================

#[tokio::test]
async fn test_pubchem_fetches_3d_sdf() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/rest/pug/compound/cid/2244/SDF"))
        .and(query_param("record_type", "3d"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"2244\n  -OEChem-\n$$$$\n".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let payload = gateway_for(&server).fetch_structure_3d(2244).await.unwrap();

    assert_eq!(payload.as_deref(), Some(&b"2244\n  -OEChem-\n$$$$\n"[..]));
}

#[tokio::test]
async fn test_pubchem_missing_3d_record_is_none() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/rest/pug/compound/cid/5359596/SDF"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let payload = gateway_for(&server)
        .fetch_structure_3d(5_359_596)
        .await
        .unwrap();

    assert!(payload.is_none());
}

#[tokio::test]
async fn test_pubchem_empty_3d_body_is_none() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/rest/pug/compound/cid/962/SDF"))
        .and(query_param("record_type", "3d"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::new()))
        .expect(1)
        .mount(&server)
        .await;

    let payload = gateway_for(&server).fetch_structure_3d(962).await.unwrap();

    assert!(payload.is_none());
}
