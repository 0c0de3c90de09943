use serde::{Deserialize, Serialize};

/// Shape of a backend reply. Failures come back as `{"exception": "..."}` (often with a
/// 200 status), list endpoints wrap their rows in `{"data": [...]}` and a few endpoints
/// return their payload bare. Replies keyed by user-chosen names (price groups) are not
/// decoded through this, since a key could be `data` or `exception`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackendResponse<T> {
    Exception { exception: String },
    Data { data: T },
    Bare(T),
}

impl<T> BackendResponse<T> {
    pub fn into_result(self) -> Result<T, String> {
        match self {
            BackendResponse::Exception { exception } => Err(exception),
            BackendResponse::Data { data } => Ok(data),
            BackendResponse::Bare(value) => Ok(value),
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use super::BackendResponse;

    #[test]
    fn exception_wins_over_payload() {
        let response: BackendResponse<Vec<i32>> =
            serde_json::from_str(r#"{"exception": "server not found"}"#).unwrap();
        assert_eq!(response.into_result(), Err("server not found".to_string()));
    }

    #[test]
    fn data_envelope_is_unwrapped() {
        let response: BackendResponse<Vec<i32>> =
            serde_json::from_str(r#"{"data": [1, 2]}"#).unwrap();
        assert_eq!(response.into_result(), Ok(vec![1, 2]));
        let bare: BackendResponse<BTreeMap<String, i32>> =
            serde_json::from_str(r#"{"Potions": 4}"#).unwrap();
        assert_eq!(bare.into_result().unwrap()["Potions"], 4);
    }
}
