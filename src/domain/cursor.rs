//! Keyset pagination cursor.
//!
//! Pages are keyed by the last-seen row identity rather than an offset, so
//! rows inserted at the head between two calls never shift later pages.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Reserved key meaning "no further data". Identities start at 1, so -1 can
/// never collide with a real row. Distinct from an absent key, which means
/// "start of sequence".
pub const NONE_KEY: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorRequest {
    pub key: Option<i64>,
    pub size: i64,
}

impl CursorRequest {
    pub fn new(key: Option<i64>, size: i64) -> Self {
        CursorRequest { key, size }
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// The cursor the client should send for the page after this one.
    /// Only the key moves; the size carries over.
    pub fn next(&self, key: i64) -> CursorRequest {
        CursorRequest {
            key: Some(key),
            size: self.size,
        }
    }

    /// Rejects malformed cursors before any storage I/O happens.
    pub fn validate(&self) -> Result<()> {
        if self.size < 1 {
            return Err(AppError::Validation(format!(
                "cursor size must be >= 1, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorResponse<T> {
    pub next_cursor: CursorRequest,
    pub items: Vec<T>,
}

impl<T> CursorResponse<T> {
    /// Builds the page response. The next key is the smallest identity on
    /// the page (we read newest-first), or the sentinel when the page is
    /// empty.
    pub fn of(request: CursorRequest, items: Vec<T>, id_of: impl Fn(&T) -> i64) -> Self {
        let next_key = items.iter().map(&id_of).min().unwrap_or(NONE_KEY);
        CursorResponse {
            next_cursor: request.next(next_key),
            items,
        }
    }

    /// Re-keys this page onto another response body, keeping the cursor.
    /// Used by the push-model timeline where the cursor tracks entry ids but
    /// the items are the resolved posts.
    pub fn with_items<U>(self, items: Vec<U>) -> CursorResponse<U> {
        CursorResponse {
            next_cursor: self.next_cursor,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert!(CursorRequest::new(None, 0).validate().is_err());
        assert!(CursorRequest::new(None, -3).validate().is_err());
        assert!(CursorRequest::new(None, 1).validate().is_ok());
    }

    #[test]
    fn next_keeps_the_size() {
        let cursor = CursorRequest::new(None, 4);
        assert_eq!(cursor.next(9), CursorRequest::new(Some(9), 4));
    }

    #[test]
    fn next_key_is_min_id_or_sentinel() {
        let cursor = CursorRequest::new(None, 2);
        let page = CursorResponse::of(cursor, vec![5i64, 4], |id| *id);
        assert_eq!(page.next_cursor.key, Some(4));

        let empty: CursorResponse<i64> = CursorResponse::of(cursor, vec![], |id| *id);
        assert_eq!(empty.next_cursor.key, Some(NONE_KEY));
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let page = CursorResponse::of(CursorRequest::new(None, 2), vec![5i64], |id| *id);
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("nextCursor").is_some());
        assert_eq!(json["nextCursor"]["key"], 5);
        assert_eq!(json["nextCursor"]["size"], 2);
        assert_eq!(json["items"][0], 5);
    }
}
