use calcpad_core::{
    Command, CursorCommand, DocumentProcessor, DocumentStateManager, EditCommand, Interval,
    ProcessingEdit, StateChangeType, StyleLayerId,
};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

fn record(manager: &mut DocumentStateManager) -> Arc<Mutex<Vec<StateChangeType>>> {
    let seen = Arc::new(Mutex::new(Vec::<StateChangeType>::new()));
    let seen_clone = Arc::clone(&seen);
    manager.subscribe(move |change| {
        seen_clone.lock().unwrap().push(change.change_type);
    });
    seen
}

#[test]
fn test_edits_and_moves_notify_in_order() {
    let mut manager = DocumentStateManager::new("1+1");
    let seen = record(&mut manager);

    manager
        .execute(Command::Cursor(CursorCommand::LineEnd))
        .unwrap();
    manager
        .execute(Command::Edit(EditCommand::InsertNewline))
        .unwrap();
    // Nothing to move to: no notification, no version bump.
    let version = manager.version();
    manager.execute(Command::Cursor(CursorCommand::Down)).unwrap();
    assert_eq!(manager.version(), version);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            StateChangeType::CursorMoved,
            StateChangeType::DocumentModified
        ]
    );
    assert_eq!(manager.lines(), vec!["1+1".to_string(), String::new()]);
    assert!(manager.get_document_state().is_modified);
}

#[test]
fn test_style_changes_do_not_dirty_document() {
    let mut manager = DocumentStateManager::new("#tag 1");
    let seen = record(&mut manager);
    let initial_version = manager.version();

    manager.apply_processing_edits(vec![ProcessingEdit::ReplaceStyleLayer {
        layer: StyleLayerId::PATTERN_DECORATIONS,
        intervals: vec![Interval::new(0, 4, 7), Interval::new(5, 6, 8)],
    }]);

    assert_eq!(manager.get_styles_at(5), vec![8]);
    assert!(!manager.get_document_state().is_modified);
    assert_eq!(manager.version(), initial_version + 1);
    assert!(manager.has_changed_since(initial_version));

    manager.apply_processing_edits(vec![ProcessingEdit::ClearStyleLayer {
        layer: StyleLayerId::PATTERN_DECORATIONS,
    }]);
    assert!(manager.get_styles_at(0).is_empty());

    assert_eq!(
        *seen.lock().unwrap(),
        vec![StateChangeType::StyleChanged, StateChangeType::StyleChanged]
    );
}

#[test]
fn test_mark_saved_clears_modified_flag() {
    let mut manager = DocumentStateManager::empty();
    manager
        .execute(Command::Edit(EditCommand::InsertText {
            text: "3*2".to_string(),
        }))
        .unwrap();
    assert!(manager.get_document_state().is_modified);

    manager.mark_saved();
    assert!(!manager.get_document_state().is_modified);
    assert_eq!(manager.get_text(), "3*2");
}

struct FirstCharProcessor;

impl DocumentProcessor for FirstCharProcessor {
    type Error = Infallible;

    fn process(
        &mut self,
        state: &DocumentStateManager,
    ) -> Result<Vec<ProcessingEdit>, Self::Error> {
        let intervals = if state.get_text().is_empty() {
            Vec::new()
        } else {
            vec![Interval::new(0, 1, 42)]
        };
        Ok(vec![ProcessingEdit::ReplaceStyleLayer {
            layer: StyleLayerId::PATTERN_DECORATIONS,
            intervals,
        }])
    }
}

#[test]
fn test_apply_processor() {
    let mut manager = DocumentStateManager::new("abc");
    manager.apply_processor(&mut FirstCharProcessor).unwrap();
    assert_eq!(manager.get_styles_in_range(0, 3), vec![(0, 1, 42)]);
}
