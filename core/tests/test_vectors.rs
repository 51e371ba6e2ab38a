//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use todo_core::{
    ApiError, Character, CharacterClient, CreateTodo, HttpMethod, HttpRequest, HttpResponse, TodoClient,
    TodoId, TodoItem, UpdateTodo,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

/// Compare a built request with `expected_request`. Headers and body are
/// only checked when the vector names them; otherwise they must be absent.
fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    match expected.get("headers") {
        Some(headers) => {
            let expected_headers: Vec<(String, String)> = headers
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect();
            assert_eq!(req.headers, expected_headers, "{name}: headers");
        }
        None if expected.get("body").is_none() => assert!(req.headers.is_empty(), "{name}: headers"),
        None => {}
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn input_id(case: &Value) -> TodoId {
    TodoId(case["input_id"].as_u64().unwrap())
}

fn check_expected_error(name: &str, err: ApiError, expected: &Value) {
    match expected.as_str().unwrap() {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: CreateTodo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_todo(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let todo = c.parse_create_todo(simulated(&case)).unwrap();
        let expected: TodoItem = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();

        check_request(name, &c.build_list_todos(), &case["expected_request"]);

        let todos = c.parse_list_todos(simulated(&case)).unwrap();
        let expected: Vec<TodoItem> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todos, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();

        check_request(name, &c.build_get_todo(input_id(&case)), &case["expected_request"]);

        let result = c.parse_get_todo(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_expected_error(name, result.unwrap_err(), expected_error);
        } else {
            let expected: TodoItem = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let input: UpdateTodo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_todo(input_id(&case), &input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let todo = c.parse_update_todo(simulated(&case)).unwrap();
        let expected: TodoItem = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();

        check_request(name, &c.build_delete_todo(input_id(&case)), &case["expected_request"]);

        let result = c.parse_delete_todo(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_expected_error(name, result.unwrap_err(), expected_error);
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

#[test]
fn character_test_vectors() {
    let c = CharacterClient::new(BASE_URL);
    for case in cases(include_str!("../../test-vectors/characters.json")) {
        let name = case["name"].as_str().unwrap();

        check_request(name, &c.build_list_characters(), &case["expected_request"]);

        let characters = c.parse_list_characters(simulated(&case)).unwrap();
        let expected: Vec<Character> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(characters, expected, "{name}: parsed result");
    }
}
