//! Uniform JSON envelope returned by every endpoint.
//!
//! Success: `{"code": 200, "message": "...", "data": ...}`
//! Error:   `{"code": 404, "message": "...", "errors": [...]}`

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessBody<T> {
    pub code: u16,
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// Offending field, if the error is tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    pub errors: Vec<ErrorDetail>,
}

/// Page of rows plus the unpaged count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListData<T> {
    pub items: Vec<T>,
    pub total_items: u64,
}

impl<T> ListData<T> {
    pub fn new(items: Vec<T>, total_items: u64) -> Self { Self { items, total_items } }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListData<U> {
        ListData { items: self.items.into_iter().map(f).collect(), total_items: self.total_items }
    }
}

impl<T> SuccessBody<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self { code: 200, message: message.into(), data }
    }
}

impl ErrorBody {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), errors: Vec::new() }
    }

    pub fn with_detail(mut self, key: Option<&str>, message: impl Into<String>) -> Self {
        self.errors.push(ErrorDetail { key: key.map(str::to_string), message: message.into() });
        self
    }

    /// Flatten `validator` failures into one detail per field message.
    pub fn with_validation(mut self, errs: &validator::ValidationErrors) -> Self {
        for (field, list) in errs.field_errors() {
            for e in list.iter() {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                self.errors.push(ErrorDetail { key: Some(field.to_string()), message: msg });
            }
        }
        self.errors.sort_by(|a, b| a.key.cmp(&b.key));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_data_uses_camel_case_total() {
        let body = SuccessBody::ok("Success", ListData::new(vec![1, 2], 7));
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v, json!({"code": 200, "message": "Success", "data": {"items": [1, 2], "totalItems": 7}}));
    }

    #[test]
    fn error_detail_omits_missing_key() {
        let body = ErrorBody::new(404, "Not found").with_detail(None, "booking 3");
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["errors"][0], json!({"message": "booking 3"}));
        assert_eq!(v["code"], 404);
    }

    #[test]
    fn list_map_keeps_total() {
        let mapped = ListData::new(vec![1, 2, 3], 10).map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total_items, 10);
    }
}
