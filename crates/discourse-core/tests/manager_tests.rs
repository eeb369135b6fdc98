use discourse_core::{
    CompileError, FileStorage, ManagerError, QueryManager, SchemaRegistry, StorageConfig,
};
use tempfile::TempDir;

fn create_test_manager() -> (QueryManager<FileStorage>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = StorageConfig {
        data_dir: temp_dir.path().to_string_lossy().to_string(),
        ..StorageConfig::default()
    };
    let storage = FileStorage::with_config(config);
    let manager = QueryManager::new(storage).unwrap();
    (manager, temp_dir)
}

fn reopen(temp: &TempDir) -> QueryManager<FileStorage> {
    let config = StorageConfig {
        data_dir: temp.path().to_string_lossy().to_string(),
        ..StorageConfig::default()
    };
    QueryManager::new(FileStorage::with_config(config)).unwrap()
}

#[test]
fn test_scratch_edits_are_persisted() {
    let (mut manager, temp) = create_test_manager();

    manager.set_return_variable("e").unwrap();
    manager.add_condition("e", "Informs", "q").unwrap();

    let reopened = reopen(&temp);
    assert_eq!(reopened.scratch().return_variable, "e");
    assert_eq!(reopened.scratch().conditions.len(), 1);
}

#[test]
fn test_update_and_remove_condition() {
    let (mut manager, _temp) = create_test_manager();

    manager.set_return_variable("e").unwrap();
    let uid = manager.add_condition("e", "Informs", "q").unwrap();

    manager.update_condition(&uid, "e", "Supports", "c").unwrap();
    assert_eq!(manager.scratch().conditions[0].relation, "Supports");
    assert_eq!(manager.scratch().conditions[0].uid, uid);

    let removed = manager.remove_condition(&uid).unwrap();
    assert_eq!(removed.target, "c");
    assert!(manager.scratch().is_empty());

    assert!(matches!(
        manager.remove_condition(&uid),
        Err(ManagerError::ConditionNotFound(_))
    ));
}

#[test]
fn test_source_candidates() {
    let (mut manager, _temp) = create_test_manager();

    manager.set_return_variable("e").unwrap();
    manager.add_condition("e", "Supports", "c").unwrap();
    manager.add_condition("c", "references", "p").unwrap();

    assert_eq!(manager.source_candidates(0), vec!["e"]);
    assert_eq!(manager.source_candidates(2), vec!["e", "c", "p"]);
}

#[test]
fn test_save_uses_next_label_and_clears_scratch() {
    let (mut manager, _temp) = create_test_manager();

    manager.set_return_variable("e").unwrap();
    manager.add_condition("e", "Informs", "q").unwrap();
    let first = manager.save_scratch(None).unwrap();
    assert_eq!(first.label, "Query 1");
    assert_eq!(first.lines, vec!["Find e Where", "e Informs q"]);
    assert!(manager.scratch().is_empty());

    manager.set_return_variable("c").unwrap();
    let second = manager.save_scratch(None).unwrap();
    assert_eq!(second.label, "Query 2");

    let custom = manager.save_scratch(Some("Tide evidence")).unwrap();
    assert_eq!(custom.label, "Tide evidence");
    assert_eq!(manager.list_saved().unwrap().len(), 3);
    assert_eq!(manager.next_label().unwrap(), "Query 3");
}

#[test]
fn test_edit_saved_moves_query_into_scratch() {
    let (mut manager, _temp) = create_test_manager();
    let registry = SchemaRegistry::with_defaults();

    manager.set_return_variable("e").unwrap();
    let original_uid = manager.add_condition("e", "Informs", "Question A").unwrap();
    manager.save_scratch(None).unwrap();

    let scratch = manager.edit_saved(&registry, "Query 1").unwrap();
    assert_eq!(scratch.return_variable, "e");
    assert_eq!(scratch.conditions[0].target, "Question A");
    assert_ne!(scratch.conditions[0].uid, original_uid);

    assert!(manager.list_saved().unwrap().is_empty());
}

#[test]
fn test_compile_saved_and_scratch() {
    let (mut manager, _temp) = create_test_manager();
    let registry = SchemaRegistry::with_defaults();

    manager.set_return_variable("e").unwrap();
    manager.add_condition("e", "is a", "Evidence").unwrap();
    let scratch = manager.compile_scratch(&registry).unwrap();
    assert!(scratch.is_executable());

    manager.save_scratch(Some("evidence")).unwrap();
    let saved = manager.compile_saved(&registry, "evidence").unwrap();
    assert_eq!(saved.body().lines().count(), 1);

    assert!(matches!(
        manager.compile_scratch(&registry),
        Err(ManagerError::Compile(CompileError::BlankReturnVariable))
    ));
}

#[test]
fn test_scratch_compilations_are_cached_until_edited() {
    let (manager, _temp) = create_test_manager();
    let mut manager = manager.with_cache_capacity(4);
    let registry = SchemaRegistry::with_defaults();

    manager.set_return_variable("e").unwrap();
    manager.add_condition("e", "is a", "Evidence").unwrap();
    let first = manager.compile_scratch(&registry).unwrap();
    assert_eq!(manager.compile_scratch(&registry).unwrap(), first);
    assert_eq!(manager.cached_compilations(), 1);

    manager.add_condition("e", "Informs", "Question A").unwrap();
    manager.compile_scratch(&registry).unwrap();
    assert_eq!(manager.cached_compilations(), 2);

}

#[test]
fn test_delete_saved() {
    let (mut manager, _temp) = create_test_manager();

    manager.set_return_variable("e").unwrap();
    manager.save_scratch(None).unwrap();
    manager.delete_saved("Query 1").unwrap();

    assert!(manager.load_saved("Query 1").is_err());
}
