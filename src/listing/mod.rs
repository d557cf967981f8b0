use crate::compose::{self, merge};
use crate::config::AppConfig;
use crate::types::{ContainerRecord, ContainerState};
use serde_json::{Map, Value as JsonValue};
use serde_yaml::{Mapping, Value as YamlValue};
use tracing::debug;

/// Build the index listing: live containers reported by
/// `ps --format=json -a` merged with the services declared in the compose
/// files.
pub async fn build(config: &AppConfig) -> Vec<ContainerRecord> {
    let output = compose::run(&["ps", "--format=json", "-a"]).await;
    let live = parse_ps_output(&output);
    debug!("ps reported {} live containers", live.len());

    let merged = merge::load_merged(&config.compose_files, &config.working_dir);
    reconcile(live, &merged)
}

/// Parse `ps --format=json` output. Newer compose releases emit one JSON
/// object per line, older ones a single JSON array; both are accepted.
pub fn parse_ps_output(output: &str) -> Vec<Map<String, JsonValue>> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(JsonValue::Array(items)) => items.into_iter().filter_map(into_object).collect(),
        Ok(JsonValue::Object(record)) => vec![record],
        _ => trimmed
            .lines()
            .filter_map(|line| serde_json::from_str::<JsonValue>(line).ok())
            .filter_map(into_object)
            .collect(),
    }
}

fn into_object(value: JsonValue) -> Option<Map<String, JsonValue>> {
    match value {
        JsonValue::Object(record) => Some(record),
        _ => None,
    }
}

/// Combine live `ps` records with the declared services. Each service name
/// appears exactly once: live records come first (tool order) carrying
/// their compose definition when declared, then every declared service
/// without a live container is synthesized as `disabled`.
pub fn reconcile(live: Vec<Map<String, JsonValue>>, merged: &Mapping) -> Vec<ContainerRecord> {
    let declared = merged
        .get(&YamlValue::from("services"))
        .and_then(YamlValue::as_mapping);

    let mut records = Vec::with_capacity(live.len());
    for fields in live {
        let service = fields
            .get("Service")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();
        let state = ContainerState::from_label(
            fields.get("State").and_then(JsonValue::as_str).unwrap_or(""),
        );
        let compose = declared
            .and_then(|services| services.get(&YamlValue::from(service.as_str())))
            .cloned();

        records.push(ContainerRecord {
            actions: state.actions(),
            service,
            state,
            live: Some(fields),
            compose,
        });
    }

    if let Some(services) = declared {
        for (name, definition) in services {
            let Some(name) = name.as_str() else { continue };
            if records.iter().any(|r| r.service == name) {
                continue;
            }
            records.push(ContainerRecord {
                service: name.to_string(),
                state: ContainerState::Disabled,
                live: None,
                compose: Some(definition.clone()),
                actions: ContainerState::Disabled.actions(),
            });
        }
    }

    records
}
