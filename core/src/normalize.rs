//! Response normalization.
//!
//! # Design
//! Each body is parsed once into a `serde_json::Value`; the list total and the
//! page contents are both read from that single value. Failed statuses never
//! escape as parse errors: the body is only inspected for a `message` string
//! and the default message is used otherwise.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{OperationError, DEFAULT_ERROR_MESSAGE};
use crate::http::HttpResponse;

/// A page of records plus the total count across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResult<T> {
    pub data: Vec<T>,
    pub total: u64,
}

/// Turn a non-2xx response into an `OperationError`.
pub fn classify_error(response: &HttpResponse) -> OperationError {
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| {
            body.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
    OperationError::new(message, response.status)
}

fn check_status(response: &HttpResponse) -> Result<(), OperationError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(classify_error(response))
    }
}

fn malformed(response: &HttpResponse, reason: impl std::fmt::Display) -> OperationError {
    OperationError::new(format!("Malformed response: {reason}"), response.status)
}

fn parse_body(response: &HttpResponse) -> Result<Value, OperationError> {
    serde_json::from_str(&response.body).map_err(|e| malformed(response, e))
}

/// Normalize a list response into page contents and total.
pub fn parse_list<T: DeserializeOwned>(
    response: &HttpResponse,
) -> Result<ListResult<T>, OperationError> {
    check_status(response)?;
    let mut body = parse_body(response)?;

    let data: Vec<T> = match body.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => Vec::new(),
        Some(data) => serde_json::from_value(data).map_err(|e| malformed(response, e))?,
    };

    let total = body
        .pointer("/pagination/total")
        .and_then(Value::as_u64)
        .unwrap_or(data.len() as u64);

    Ok(ListResult { data, total })
}

/// Normalize a single-record response. `None` means the body had no `data`.
pub fn parse_record<T: DeserializeOwned>(
    response: &HttpResponse,
) -> Result<Option<T>, OperationError> {
    check_status(response)?;
    let mut body = parse_body(response)?;

    match body.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => Ok(None),
        Some(data) => serde_json::from_value(data)
            .map(Some)
            .map_err(|e| malformed(response, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u64,
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn list_reads_data_and_total() {
        let res = response(200, r#"{"data":[{"id":1},{"id":2}],"pagination":{"total":2}}"#);
        let list: ListResult<Row> = parse_list(&res).unwrap();
        assert_eq!(list.data, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(list.total, 2);
    }

    #[test]
    fn list_total_falls_back_to_page_length() {
        let res = response(200, r#"{"data":[{"id":1}]}"#);
        let list: ListResult<Row> = parse_list(&res).unwrap();
        assert_eq!(list.total, 1);
    }

    #[test]
    fn list_total_exceeds_page_when_server_says_so() {
        let res = response(
            200,
            r#"{"data":[{"id":1}],"pagination":{"page":1,"limit":1,"total":40,"totalPages":40}}"#,
        );
        let list: ListResult<Row> = parse_list(&res).unwrap();
        assert_eq!(list.total, 40);
    }

    #[test]
    fn negative_total_falls_back_to_page_length() {
        let res = response(200, r#"{"data":[{"id":1},{"id":2}],"pagination":{"total":-5}}"#);
        let list: ListResult<Row> = parse_list(&res).unwrap();
        assert_eq!(list.total, 2);
    }

    #[test]
    fn missing_data_is_empty_page() {
        let res = response(200, r#"{"pagination":{"total":0}}"#);
        let list: ListResult<Row> = parse_list(&res).unwrap();
        assert!(list.data.is_empty());
        assert_eq!(list.total, 0);
    }

    #[test]
    fn list_preserves_server_order() {
        let res = response(200, r#"{"data":[{"id":3},{"id":1},{"id":2}]}"#);
        let list: ListResult<Row> = parse_list(&res).unwrap();
        let ids: Vec<u64> = list.data.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn error_uses_message_field() {
        let res = response(404, r#"{"message":"Not found"}"#);
        let err = parse_list::<Row>(&res).unwrap_err();
        assert_eq!(err, OperationError::new("Not found", 404));
        let err = parse_record::<Row>(&res).unwrap_err();
        assert_eq!(err, OperationError::new("Not found", 404));
    }

    #[test]
    fn error_with_non_json_body_uses_default_message() {
        let res = response(500, "<html>gateway exploded</html>");
        let err = parse_list::<Row>(&res).unwrap_err();
        assert_eq!(err.message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(err.status_code, 500);
    }

    #[test]
    fn error_with_non_string_message_uses_default() {
        let res = response(400, r#"{"message":{"field":"name"}}"#);
        let err = classify_error(&res);
        assert_eq!(err.message, DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn success_with_bad_json_is_malformed() {
        let res = response(200, "not json");
        let err = parse_list::<Row>(&res).unwrap_err();
        assert_eq!(err.status_code, 200);
        assert!(err.message.starts_with("Malformed response"));
    }

    #[test]
    fn record_without_data_is_none() {
        let res = response(200, "{}");
        assert_eq!(parse_record::<Row>(&res).unwrap(), None);
        let res = response(200, r#"{"data":null}"#);
        assert_eq!(parse_record::<Row>(&res).unwrap(), None);
    }

    #[test]
    fn record_is_read_from_data() {
        let res = response(201, r#"{"data":{"id":9}}"#);
        assert_eq!(parse_record::<Row>(&res).unwrap(), Some(Row { id: 9 }));
    }
}
