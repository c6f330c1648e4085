//! Opaque pagination cursor for the feed.
//!
//! A token encodes the sort-key tuple of the last row on a page so the next
//! page resumes strictly after it, even while new rows are inserted ahead of
//! or behind that position. Tokens are mode-tagged: one minted by the
//! fallback (recency) shape is never applied to the ranked shape or vice
//! versa. A malformed, foreign, or mode-mismatched token restarts the walk
//! from the top; it is a resume marker, not a security boundary.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Post;

/// Sort key of the last row on a ranked-mode page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCursor {
    pub pinned: bool,
    pub rank: i32,
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

/// Sort key of the last row on a fallback-mode page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecencyCursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedCursor {
    Ranked(RankedCursor),
    Recency(RecencyCursor),
}

/// Wire form of the token. Timestamps travel as microseconds so the tuple
/// round-trips losslessly at the store's clock precision.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum WireCursor {
    Ranked { pinned: bool, rank: i32, ts: i64, id: Uuid },
    Recency { ts: i64, id: Uuid },
}

impl FeedCursor {
    pub fn ranked(post: &Post) -> Self {
        FeedCursor::Ranked(RankedCursor {
            pinned: post.is_pinned,
            rank: post.priority_rank,
            created_at: post.created_at,
            id: post.id,
        })
    }

    pub fn recency(post: &Post) -> Self {
        FeedCursor::Recency(RecencyCursor {
            created_at: post.created_at,
            id: post.id,
        })
    }

    pub fn as_ranked(&self) -> Option<&RankedCursor> {
        match self {
            FeedCursor::Ranked(cursor) => Some(cursor),
            FeedCursor::Recency(_) => None,
        }
    }

    pub fn as_recency(&self) -> Option<&RecencyCursor> {
        match self {
            FeedCursor::Recency(cursor) => Some(cursor),
            FeedCursor::Ranked(_) => None,
        }
    }

    pub fn encode(&self) -> String {
        let wire = match self {
            FeedCursor::Ranked(c) => WireCursor::Ranked {
                pinned: c.pinned,
                rank: c.rank,
                ts: c.created_at.timestamp_micros(),
                id: c.id,
            },
            FeedCursor::Recency(c) => WireCursor::Recency {
                ts: c.created_at.timestamp_micros(),
                id: c.id,
            },
        };

        // A tagged enum over plain fields always serializes.
        let json = serde_json::to_vec(&wire).expect("cursor serialization");
        general_purpose::STANDARD.encode(json)
    }

    /// Decode a client-supplied token. Any failure (bad base64, bad JSON,
    /// unknown tag, out-of-range timestamp) yields `None`, which restarts
    /// the walk from the start of the feed.
    pub fn decode(token: &str) -> Option<Self> {
        let raw = general_purpose::STANDARD.decode(token).ok()?;
        let wire: WireCursor = serde_json::from_slice(&raw).ok()?;

        match wire {
            WireCursor::Ranked { pinned, rank, ts, id } => {
                let created_at = DateTime::from_timestamp_micros(ts)?;
                Some(FeedCursor::Ranked(RankedCursor { pinned, rank, created_at, id }))
            }
            WireCursor::Recency { ts, id } => {
                let created_at = DateTime::from_timestamp_micros(ts)?;
                Some(FeedCursor::Recency(RecencyCursor { created_at, id }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap()
            + chrono::Duration::microseconds(123_456)
    }

    #[test]
    fn test_ranked_roundtrip() {
        let cursor = FeedCursor::Ranked(RankedCursor {
            pinned: true,
            rank: 150,
            created_at: timestamp(),
            id: Uuid::from_u128(42),
        });

        let decoded = FeedCursor::decode(&cursor.encode()).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_recency_roundtrip() {
        let cursor = FeedCursor::Recency(RecencyCursor {
            created_at: timestamp(),
            id: Uuid::from_u128(7),
        });

        let decoded = FeedCursor::decode(&cursor.encode()).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_token_is_stable_across_roundtrips() {
        let token = FeedCursor::Ranked(RankedCursor {
            pinned: false,
            rank: 500,
            created_at: timestamp(),
            id: Uuid::from_u128(9),
        })
        .encode();

        let reencoded = FeedCursor::decode(&token).unwrap().encode();
        assert_eq!(reencoded, token);
    }

    #[test]
    fn test_garbage_tokens_decode_to_none() {
        assert_eq!(FeedCursor::decode("!!!not-base64!!!"), None);
        assert_eq!(
            FeedCursor::decode(&general_purpose::STANDARD.encode("plain text")),
            None
        );
        assert_eq!(
            FeedCursor::decode(&general_purpose::STANDARD.encode(r#"{"mode":"sideways"}"#)),
            None
        );
        assert_eq!(
            FeedCursor::decode(&general_purpose::STANDARD.encode(r#"{"mode":"ranked"}"#)),
            None
        );
    }

    #[test]
    fn test_mode_tag_distinguishes_shapes() {
        let post_time = timestamp();
        let ranked = FeedCursor::Ranked(RankedCursor {
            pinned: false,
            rank: 100,
            created_at: post_time,
            id: Uuid::from_u128(1),
        });
        let recency = FeedCursor::Recency(RecencyCursor {
            created_at: post_time,
            id: Uuid::from_u128(1),
        });

        let decoded_ranked = FeedCursor::decode(&ranked.encode()).unwrap();
        let decoded_recency = FeedCursor::decode(&recency.encode()).unwrap();

        assert!(decoded_ranked.as_ranked().is_some());
        assert!(decoded_ranked.as_recency().is_none());
        assert!(decoded_recency.as_recency().is_some());
        assert!(decoded_recency.as_ranked().is_none());
    }
}
