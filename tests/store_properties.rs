use chrono::{TimeZone, Utc};
use std::time::Duration;

use labhost_core::model::{Document, Environment, HealthMethod, HealthStatus, HostFields, ProbeMethod};
use labhost_core::probe::{commit_result, ProbeResult};
use labhost_core::store::{
    add_host, delete_host, export_document, import_document, move_or_update_host, StoreError,
};
use labhost_core::validation::ValidationError;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct HostInput {
    name: String,
    ip: String,
    port: Option<u16>,
    tags: Vec<String>,
    notes: String,
    pinned: bool,
    env: usize,
    checked_at_ms: Option<i64>,
}

fn host_input() -> impl Strategy<Value = HostInput> {
    (
        "[a-z][a-z0-9-]{0,10}",
        "10\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        proptest::option::of(1u16..=65535),
        proptest::collection::vec("[a-z]{1,6}", 0..4),
        "[ -~]{0,20}",
        any::<bool>(),
        0usize..3,
        proptest::option::of(1_600_000_000_000i64..1_900_000_000_000),
    )
        .prop_map(
            |(name, ip, port, tags, notes, pinned, env, checked_at_ms)| HostInput {
                name,
                ip,
                port,
                tags,
                notes,
                pinned,
                env,
                checked_at_ms,
            },
        )
}

fn fields_of(input: &HostInput) -> HostFields {
    let mut fields = HostFields::new(&input.name, &input.ip);
    fields.port = input.port;
    fields.tags = input.tags.clone();
    fields.notes = input.notes.clone();
    fields.pinned = input.pinned;
    fields
}

fn build(inputs: &[HostInput]) -> Document {
    let mut doc = Document::default();
    doc.envs.push(Environment::new("lab-a", "Lab-A"));
    doc.envs.push(Environment::new("lab-b", "Lab-B"));
    for input in inputs {
        let env_id = doc.envs[input.env].id.clone();
        let host = add_host(&mut doc, &env_id, fields_of(input)).unwrap();
        if let Some(ms) = input.checked_at_ms {
            let record = doc.host_mut(&host.id).unwrap();
            record.health_status = HealthStatus::Online;
            record.last_health_check_at = Utc.timestamp_millis_opt(ms).single();
            record.response_time_ms = Some((ms % 3000) as u64);
            record.health_method = Some(HealthMethod::Probe(ProbeMethod::Port(22)));
        }
    }
    doc
}

proptest! {
    #[test]
    fn add_host_yields_one_new_unique_id(
        inputs in proptest::collection::vec(host_input(), 0..12),
        extra in host_input(),
    ) {
        let mut doc = build(&inputs);
        let before: Vec<String> = doc.hosts().map(|h| h.id.clone()).collect();

        let host = add_host(&mut doc, "lab-a", fields_of(&extra)).unwrap();

        prop_assert!(!before.contains(&host.id));
        prop_assert_eq!(doc.host_count(), before.len() + 1);
        prop_assert_eq!(doc.hosts().filter(|h| h.id == host.id).count(), 1);
    }

    #[test]
    fn blank_name_or_address_is_rejected_without_change(
        inputs in proptest::collection::vec(host_input(), 0..6),
        blank in "[ \t]{0,3}",
        blank_name in any::<bool>(),
    ) {
        let mut doc = build(&inputs);
        let before = doc.clone();
        let fields = if blank_name {
            HostFields::new(&blank, "10.0.0.1")
        } else {
            HostFields::new("web1", &blank)
        };

        let err = add_host(&mut doc, "default", fields).unwrap_err();

        let expected = if blank_name {
            ValidationError::EmptyName
        } else {
            ValidationError::EmptyAddress
        };
        prop_assert!(matches!(err, StoreError::Validation(ref e) if *e == expected));
        prop_assert_eq!(doc, before);
    }

    #[test]
    fn export_then_import_is_identity(inputs in proptest::collection::vec(host_input(), 0..12)) {
        let doc = build(&inputs);
        let text = export_document(&doc).unwrap();
        prop_assert_eq!(import_document(&text).unwrap(), doc);
    }

    #[test]
    fn committed_health_survives_export_import(
        inputs in proptest::collection::vec(host_input(), 1..12),
        online in proptest::collection::vec(any::<bool>(), 12),
        elapsed_ms in 0u64..20_000,
    ) {
        let mut doc = build(&inputs);
        for (host, up) in doc.hosts_mut().zip(online) {
            let result = if up {
                ProbeResult::online(ProbeMethod::Https, Duration::from_millis(elapsed_ms))
            } else {
                ProbeResult::all_failed()
            };
            commit_result(host, &result, Utc::now());
        }

        let text = export_document(&doc).unwrap();
        prop_assert_eq!(import_document(&text).unwrap(), doc);
    }

    #[test]
    fn second_delete_fails_and_changes_nothing(
        inputs in proptest::collection::vec(host_input(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut doc = build(&inputs);
        let id = doc.hosts().nth(pick.index(doc.host_count())).unwrap().id.clone();

        delete_host(&mut doc, &id).unwrap();
        let after_first = doc.clone();
        let second = delete_host(&mut doc, &id);

        prop_assert!(matches!(second, Err(StoreError::HostNotFound(_))));
        prop_assert_eq!(doc, after_first);
    }

    #[test]
    fn moved_host_appears_once_in_target(
        inputs in proptest::collection::vec(host_input(), 1..8),
        pick in any::<prop::sample::Index>(),
        target in 0usize..3,
    ) {
        let mut doc = build(&inputs);
        let host = doc.hosts().nth(pick.index(doc.host_count())).unwrap().clone();
        let target_id = doc.envs[target].id.clone();
        let total = doc.host_count();

        let mut fields = HostFields::from_record(&host);
        fields.environment_id = Some(target_id.clone());
        move_or_update_host(&mut doc, &host.id, fields).unwrap();

        let in_target = doc
            .environment(&target_id)
            .unwrap()
            .items
            .iter()
            .filter(|h| h.id == host.id)
            .count();
        prop_assert_eq!(in_target, 1);
        prop_assert_eq!(doc.host_count(), total);
        for env in doc.envs.iter().filter(|e| e.id != target_id) {
            prop_assert!(env.items.iter().all(|h| h.id != host.id));
        }
    }
}
