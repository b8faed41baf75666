//! Versioned snapshots of in-flight send requests
//!
//! The shell persists exactly one value across process tear-down: the
//! current `SendRequest`, wrapped in a versioned envelope. Everything
//! else about a flow is rebuilt from the request after restore.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SendError};
use crate::request::SendRequest;

/// Key a shell stores the snapshot under
pub const SEND_REQUEST_STATE_KEY: &str = "send_request";

/// Version written into every envelope this build produces
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    request: SendRequest,
}

/// Serialize a request into a versioned snapshot string
pub fn encode(request: &SendRequest) -> Result<String> {
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        request: request.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Restore a request from a snapshot string
///
/// Rejects envelopes from a newer build and snapshots whose request no
/// longer satisfies the cross-field rules.
pub fn decode(snapshot: &str) -> Result<SendRequest> {
    let envelope: Envelope = serde_json::from_str(snapshot)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(SendError::UnsupportedSnapshot {
            version: envelope.version,
        });
    }
    envelope.request.validate()?;
    Ok(envelope.request)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tracksend_core::request::Account;
    use tracksend_core::snapshot::{SEND_REQUEST_STATE_KEY, SNAPSHOT_VERSION, decode, encode};
    use tracksend_core::{SendError, SendRequest};
    use tracksend_test_utils::SendRequestBuilder;

    fn populated_request() -> SendRequest {
        SendRequestBuilder::new(42)
            .with_account("alice@example.com")
            .with_emails("bob@example.com, carol@example.com")
            .with_share_app("com.example.app", "com.example.app.Share")
            .build()
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let request = populated_request();

        let snapshot = encode(&request).unwrap();
        let decoded = decode(&snapshot).unwrap();

        assert_eq!(decoded, request);
    }

    #[test]
    fn test_snapshot_carries_current_version() {
        let snapshot = encode(&SendRequest::new(1)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(value["version"], serde_json::json!(SNAPSHOT_VERSION));
        assert_eq!(SEND_REQUEST_STATE_KEY, "send_request");
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let snapshot = encode(&SendRequest::new(1)).unwrap();
        let tampered = snapshot.replace("\"version\":1", "\"version\":99");

        let error = decode(&tampered).unwrap_err();
        assert!(matches!(
            error,
            SendError::UnsupportedSnapshot { version: 99 }
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_snapshot() {
        let error = decode("not a snapshot").unwrap_err();

        assert!(matches!(error, SendError::MalformedSnapshot { .. }));
    }

    #[test]
    fn test_decode_rejects_request_breaking_cross_field_rules() {
        // Valid JSON, current version, but drive share without a drive
        // send must not come back to life through a snapshot.
        let snapshot = encode(&SendRequest::new(1).with_drive().with_drive_share()).unwrap();
        let tampered = snapshot.replace("\"send_drive\":true", "\"send_drive\":false");

        let error = decode(&tampered).unwrap_err();
        assert!(matches!(error, SendError::InvariantViolation { .. }));
    }

    proptest! {
        #[test]
        fn test_round_trip_over_coherent_requests(
            track_id in any::<i64>(),
            drive in any::<bool>(),
            maps in any::<bool>(),
            fusion in any::<bool>(),
            sheets in any::<bool>(),
            drive_mode in 0u8..3,
            existing_map in any::<bool>(),
            account in proptest::option::of("[a-z]{1,12}"),
        ) {
            let mut request = SendRequest::new(track_id);
            if drive {
                request = request.with_drive();
                if drive_mode == 1 {
                    request = request.with_drive_sync();
                }
                if drive_mode == 2 {
                    request = request.with_drive_share();
                }
            }
            if maps {
                request = request.with_maps();
                if existing_map {
                    request = request.with_existing_map();
                }
            }
            if fusion {
                request = request.with_fusion_tables();
            }
            if sheets {
                request = request.with_spreadsheets();
            }
            if let Some(name) = account {
                request.set_account(Account::new(&name));
            }

            let snapshot = encode(&request).unwrap();
            let decoded = decode(&snapshot).unwrap();

            prop_assert_eq!(decoded, request);
        }
    }
}
