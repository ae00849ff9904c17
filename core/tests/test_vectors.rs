//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected results. Comparing parsed JSON (not raw strings) avoids false
//! negatives from field-ordering differences.

use std::collections::BTreeMap;

use fleet_core::{
    Acp, HttpMethod, HttpResponse, ListRequest, ListResult, OperationError, ResourceClient,
    ResourceTable,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ResourceClient {
    ResourceClient::new(BASE_URL, ResourceTable::fleet())
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let request: ListRequest = serde_json::from_value(case["request"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list(&request).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.body.is_none(), "{name}: body should be None");

        let query: BTreeMap<String, String> = req.query.iter().cloned().collect();
        let expected_query: BTreeMap<String, String> =
            serde_json::from_value(expected_req["query"].clone()).unwrap();
        assert_eq!(query, expected_query, "{name}: query");

        // Verify build is repeatable
        assert_eq!(c.build_list(&request).unwrap(), req, "{name}: repeatable");

        // Verify parse
        let list: ListResult<Value> = c.parse_list(simulated(case)).unwrap();
        let ids: Vec<u64> = list.data.iter().map(|r| r["id"].as_u64().unwrap()).collect();
        let expected_ids: Vec<u64> =
            serde_json::from_value(case["expected_result"]["ids"].clone()).unwrap();
        assert_eq!(ids, expected_ids, "{name}: ids");
        assert_eq!(list.total, case["expected_result"]["total"].as_u64().unwrap(), "{name}: total");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = OperationError::new(
            case["expected_error"]["message"].as_str().unwrap(),
            case["expected_error"]["status_code"].as_u64().unwrap() as u16,
        );

        let err = c.parse_list::<Value>(simulated(case)).unwrap_err();
        assert_eq!(err, expected, "{name}: list");
        let err = c.parse_get_one::<Value>(simulated(case)).unwrap_err();
        assert_eq!(err, expected, "{name}: get one");
        let err = c.parse_create::<Value>(simulated(case)).unwrap_err();
        assert_eq!(err, expected, "{name}: create");
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let raw = include_str!("../../test-vectors/get.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let resource = case["resource"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_get_one(resource, id).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let record: Option<Acp> = c.parse_get_one(simulated(case)).unwrap();
        let expected: Option<Acp> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(record, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let raw = include_str!("../../test-vectors/create.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let resource = case["resource"].as_str().unwrap();
        let input = &case["input"];
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_create(resource, input, None).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let acp: Acp = c.parse_create(simulated(case)).unwrap();
        let expected: Acp = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(acp, expected, "{name}: parsed result");
    }
}
