use labhost_core::model::{HostFields, Settings};
use labhost_core::storage::{FileBackend, DOCUMENT_KEY};
use labhost_core::store::{Store, StoreError};
use tempfile::tempdir;

#[tokio::test]
async fn test_document_survives_restart() {
    let dir = tempdir().unwrap();
    let host_id = {
        let store = Store::new(FileBackend::new(dir.path()));
        let env = store.add_environment("Lab-A").await.unwrap();
        store
            .add_host(&env.id, HostFields::new("web1", "10.0.0.1").with_tags(&["prod"]))
            .await
            .unwrap()
            .id
    };

    let store = Store::new(FileBackend::new(dir.path()));
    let doc = store.load().await;
    let host = doc.host(&host_id).unwrap();
    assert_eq!(host.name, "web1");
    assert_eq!(doc.environment_name(&host.environment_id), "Lab-A");
    assert!(dir.path().join("hostDocument.json").exists());
}

#[tokio::test]
async fn test_external_edit_makes_tracked_save_stale() {
    let dir = tempdir().unwrap();
    let store = Store::new(FileBackend::new(dir.path()));
    store
        .add_host("default", HostFields::new("web1", "10.0.0.1"))
        .await
        .unwrap();

    let tracked = store.load_tracked().await;
    let path = store.backend().path_for(DOCUMENT_KEY).unwrap();
    let edited = std::fs::read_to_string(&path)
        .unwrap()
        .replace("web1", "web1-edited");
    std::fs::write(&path, edited).unwrap();

    let err = store
        .save_tracked(&tracked.document, tracked.fingerprint.as_ref())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Stale));
    assert_eq!(store.load().await.hosts().next().unwrap().name, "web1-edited");
}

#[tokio::test]
async fn test_export_import_through_files() {
    let source_dir = tempdir().unwrap();
    let target_dir = tempdir().unwrap();
    let source = Store::new(FileBackend::new(source_dir.path()));
    source
        .add_host("default", HostFields::new("db1", "10.0.0.2").with_tags(&["dev"]))
        .await
        .unwrap();

    let export_path = source_dir.path().join("lab-ip-manager-export.json");
    std::fs::write(&export_path, source.export_json().await.unwrap()).unwrap();

    let target = Store::new(FileBackend::new(target_dir.path()));
    let text = std::fs::read_to_string(&export_path).unwrap();
    target.import_json(&text).await.unwrap();

    assert_eq!(target.load().await, source.load().await);
}

#[tokio::test]
async fn test_settings_file_is_merged_with_defaults() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("settingsDocument.json"),
        r#"{"enableHealthProbe": true, "defaultRDPPort": 0}"#,
    )
    .unwrap();

    let store = Store::new(FileBackend::new(dir.path()));
    let settings = store.load_settings().await;
    assert!(settings.enable_health_probe);
    assert_eq!(settings.default_rdp_port, 3389);
    assert_eq!(settings.default_ssh_user, Settings::default().default_ssh_user);
}
