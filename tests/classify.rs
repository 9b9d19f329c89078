use nightwatch::watch::{Classification, classify};
use notify::event::{
    AccessKind, CreateKind, DataChange, EventKind, MetadataKind, ModifyKind, RemoveKind,
    RenameMode,
};

#[test]
fn data_modification_triggers_a_restart() {
    let kind = EventKind::Modify(ModifyKind::Data(DataChange::Content));
    assert_eq!(classify(&kind, false), Classification::Restart);
}

#[test]
fn metadata_change_triggers_a_restart() {
    let kind = EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions));
    assert_eq!(classify(&kind, false), Classification::Restart);
}

#[test]
fn unspecific_modification_triggers_a_restart() {
    let kind = EventKind::Modify(ModifyKind::Any);
    assert_eq!(classify(&kind, false), Classification::Restart);
}

#[test]
fn creation_is_ignored_unless_new_paths_are_tracked() {
    let kind = EventKind::Create(CreateKind::File);
    assert_eq!(classify(&kind, false), Classification::Ignore);
    assert_eq!(classify(&kind, true), Classification::Restart);
}

#[test]
fn directory_creation_follows_the_same_toggle() {
    let kind = EventKind::Create(CreateKind::Folder);
    assert_eq!(classify(&kind, false), Classification::Ignore);
    assert_eq!(classify(&kind, true), Classification::Restart);
}

#[test]
fn removal_unwatches_and_restarts() {
    let kind = EventKind::Remove(RemoveKind::File);
    assert_eq!(classify(&kind, false), Classification::UnwatchAndRestart);
    assert_eq!(classify(&kind, true), Classification::UnwatchAndRestart);
}

#[test]
fn rename_bookkeeping_and_access_are_ignored() {
    let rename = EventKind::Modify(ModifyKind::Name(RenameMode::From));
    assert_eq!(classify(&rename, true), Classification::Ignore);

    let access = EventKind::Access(AccessKind::Any);
    assert_eq!(classify(&access, true), Classification::Ignore);

    assert_eq!(classify(&EventKind::Any, true), Classification::Ignore);
}
