use serde_json::Value;
use tracing::debug;

/// A feed message classified by its `type` discriminator.
///
/// Persisted kinds carry their payload as raw JSON; the handler services
/// own structural validation, so classification itself can never fail and
/// never disturbs the read loop.
#[derive(Debug)]
pub enum DecodedEnvelope {
    Welcome { simulator_version: Option<String> },
    BeaconsConfig { beacon_count: usize },
    Roster(Value),
    Telemetry(Value),
    Alert(Value),
    Unrecognized,
}

/// Classify one raw feed message. Unparseable input, a missing `type`
/// field, and unknown discriminators all map to `Unrecognized`.
pub fn decode(raw: &str) -> DecodedEnvelope {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "dropping unparseable feed message");
            return DecodedEnvelope::Unrecognized;
        }
    };

    match value.get("type").and_then(Value::as_str) {
        Some("welcome") => DecodedEnvelope::Welcome {
            simulator_version: value
                .get("simulator_version")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        Some("beacons_config") => DecodedEnvelope::BeaconsConfig {
            beacon_count: value
                .get("beacons")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        },
        Some("firefighters_list") => DecodedEnvelope::Roster(value),
        Some("tag_telemetry") => DecodedEnvelope::Telemetry(value),
        Some("alert") => DecodedEnvelope::Alert(value),
        Some(other) => {
            debug!(message_type = other, "dropping unrecognized feed message");
            DecodedEnvelope::Unrecognized
        }
        None => {
            debug!("dropping feed message without a type field");
            DecodedEnvelope::Unrecognized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_welcome() {
        let decoded = decode(r#"{"type": "welcome", "simulator_version": "2.3.1"}"#);
        match decoded {
            DecodedEnvelope::Welcome { simulator_version } => {
                assert_eq!(simulator_version.as_deref(), Some("2.3.1"));
            }
            other => panic!("expected Welcome, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_beacons_config_counts_beacons() {
        let decoded = decode(r#"{"type": "beacons_config", "beacons": [{}, {}, {}]}"#);
        match decoded {
            DecodedEnvelope::BeaconsConfig { beacon_count } => assert_eq!(beacon_count, 3),
            other => panic!("expected BeaconsConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_telemetry_carries_payload() {
        let decoded = decode(r#"{"type": "tag_telemetry", "tag_id": "TAG-01"}"#);
        match decoded {
            DecodedEnvelope::Telemetry(value) => {
                assert_eq!(value["tag_id"], "TAG-01");
            }
            other => panic!("expected Telemetry, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_unknown_type_is_unrecognized() {
        assert!(matches!(
            decode(r#"{"type": "zone_update"}"#),
            DecodedEnvelope::Unrecognized
        ));
    }

    #[test]
    fn test_decode_missing_type_is_unrecognized() {
        assert!(matches!(
            decode(r#"{"tag_id": "TAG-01"}"#),
            DecodedEnvelope::Unrecognized
        ));
    }

    #[test]
    fn test_decode_garbage_is_unrecognized() {
        assert!(matches!(decode("not json at all"), DecodedEnvelope::Unrecognized));
    }
}
