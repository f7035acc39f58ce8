//! Document mutations.
//!
//! Pure functions over an in-memory `Document`. Validation happens before any
//! change, so a failed call leaves the document untouched.

use uuid::Uuid;

use crate::model::{Document, Environment, HostFields, HostRecord};
use crate::validation::{validate_environment_name, validate_host_fields};

use super::error::StoreError;

/// Fresh id not used by any host or environment in `doc`.
pub fn new_id(doc: &Document) -> String {
    loop {
        let id = Uuid::new_v4().simple().to_string();
        let taken = doc.envs.iter().any(|e| e.id == id) || doc.contains_host(&id);
        if !taken {
            return id;
        }
    }
}

/// Index of the environment `env_id` names, or the first environment.
fn target_environment(doc: &mut Document, env_id: Option<&str>) -> usize {
    if doc.envs.is_empty() {
        doc.envs.push(Environment::default_environment());
    }
    env_id
        .and_then(|id| doc.envs.iter().position(|e| e.id == id))
        .unwrap_or(0)
}

/// Validate `fields` and append a new host to `environment_id` (or to the
/// first environment when that id does not resolve).
///
/// The target is taken from `environment_id`; `fields.environment_id` is not
/// consulted here.
pub fn add_host(
    doc: &mut Document,
    environment_id: &str,
    fields: HostFields,
) -> Result<HostRecord, StoreError> {
    let fields = validate_host_fields(fields)?;

    let id = new_id(doc);
    let ei = target_environment(doc, Some(environment_id));
    let env = &mut doc.envs[ei];
    let record = HostRecord::from_fields(id, env.id.clone(), fields);
    env.items.push(record.clone());

    log::info!(
        "HOST_ADDED id={} env={} name={:?}",
        record.id,
        record.environment_id,
        record.name
    );
    Ok(record)
}

/// Replace a host's editable fields, moving it when the environment changes.
///
/// `fields.environment_id` of `None` keeps the current environment; an id that
/// does not resolve falls back to the first environment, as `add_host` does.
/// Health data and the id are preserved.
pub fn move_or_update_host(
    doc: &mut Document,
    host_id: &str,
    fields: HostFields,
) -> Result<HostRecord, StoreError> {
    let fields = validate_host_fields(fields)?;
    let (source, index) = doc
        .locate(host_id)
        .ok_or_else(|| StoreError::HostNotFound(host_id.to_string()))?;

    let target = match fields.environment_id.as_deref() {
        Some(env_id) => target_environment(doc, Some(env_id)),
        None => source,
    };
    let target_id = doc.envs[target].id.clone();

    if target == source {
        let host = &mut doc.envs[source].items[index];
        host.apply_fields(target_id, fields);
        log::info!("HOST_UPDATED id={} env={}", host_id, host.environment_id);
        return Ok(host.clone());
    }

    let mut host = doc.envs[source].items.remove(index);
    host.apply_fields(target_id, fields);
    log::info!(
        "HOST_MOVED id={} from={} to={}",
        host_id,
        doc.envs[source].id,
        host.environment_id
    );
    doc.envs[target].items.push(host.clone());
    Ok(host)
}

/// Remove the first host with `host_id`. Absent ids are `HostNotFound`.
pub fn delete_host(doc: &mut Document, host_id: &str) -> Result<HostRecord, StoreError> {
    let (ei, hi) = doc
        .locate(host_id)
        .ok_or_else(|| StoreError::HostNotFound(host_id.to_string()))?;
    let removed = doc.envs[ei].items.remove(hi);
    log::info!("HOST_DELETED id={} env={}", removed.id, doc.envs[ei].id);
    Ok(removed)
}

/// Append an empty environment. Names are not de-duplicated.
pub fn add_environment(doc: &mut Document, name: &str) -> Result<Environment, StoreError> {
    let name = validate_environment_name(name)?;
    let env = Environment::new(&new_id(doc), &name);
    doc.envs.push(env.clone());
    log::info!("ENVIRONMENT_ADDED id={} name={:?}", env.id, env.name);
    Ok(env)
}

pub fn find_host<'a>(doc: &'a Document, host_id: &str) -> Option<&'a HostRecord> {
    doc.host(host_id)
}

/// Address-bar lookup: an exact id match anywhere wins, otherwise the first
/// host whose name matches case-insensitively.
pub fn resolve_host<'a>(doc: &'a Document, text: &str) -> Option<&'a HostRecord> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(host) = doc.hosts().find(|h| h.id == text) {
        return Some(host);
    }
    let wanted = text.to_lowercase();
    doc.hosts().find(|h| h.name.to_lowercase() == wanted)
}
