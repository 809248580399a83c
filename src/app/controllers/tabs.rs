use crate::app::domain::Language;
use crate::app::infrastructure::error::Result;

/// The narrow slice of the editor widget the session is allowed to drive.
pub trait EditorHandle {
    /// Show `language`'s buffer and switch syntax mode to match.
    fn set_language(&mut self, language: Language);

    /// Reformat the content currently shown. The buffer is left untouched
    /// when the content does not parse.
    fn format(&mut self) -> Result<()>;

    /// Re-measure after the widget's geometry changed.
    fn relayout(&mut self);
}

/// Tracks which language's buffer the editor is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LanguageTabs {
    active: Language,
}

impl LanguageTabs {
    pub fn new(initial: Language) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> Language {
        self.active
    }

    /// Make `language` active. The editor's syntax mode is always
    /// re-asserted, even when the tab does not change. Returns whether the
    /// active tab changed.
    pub fn select(&mut self, language: Language, editor: Option<&mut dyn EditorHandle>) -> bool {
        let changed = self.active != language;
        self.active = language;
        if let Some(editor) = editor {
            editor.set_language(language);
        }
        if changed {
            log::debug!("active tab: {}", language.label());
        }
        changed
    }

    /// Select by tab position. Positions outside 0..3 panic.
    pub fn select_index(&mut self, index: usize, editor: Option<&mut dyn EditorHandle>) -> bool {
        self.select(Language::from_index(index), editor)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::app::infrastructure::error::AppError;
    use crate::app::services::format::FormatError;

    /// Records every call made through `EditorHandle`.
    #[derive(Clone, Default)]
    pub struct MockEditor {
        pub calls: Rc<RefCell<Vec<String>>>,
        pub language: Rc<RefCell<Option<Language>>>,
        pub fail_format: bool,
    }

    impl EditorHandle for MockEditor {
        fn set_language(&mut self, language: Language) {
            *self.language.borrow_mut() = Some(language);
            self.calls.borrow_mut().push(format!("set_language:{}", language.id()));
        }

        fn format(&mut self) -> Result<()> {
            self.calls.borrow_mut().push("format".into());
            if self.fail_format {
                return Err(AppError::Format(FormatError::Script("unexpected token".into())));
            }
            Ok(())
        }

        fn relayout(&mut self) {
            self.calls.borrow_mut().push("relayout".into());
        }
    }

    #[test]
    fn test_select_updates_active_and_syntax_mode() {
        let mut tabs = LanguageTabs::default();
        let mut editor = MockEditor::default();
        for language in Language::ALL {
            tabs.select(language, Some(&mut editor));
            assert_eq!(tabs.active(), language);
            assert_eq!(*editor.language.borrow(), Some(language));
        }
    }

    #[test]
    fn test_reselect_reasserts_syntax_mode() {
        let mut tabs = LanguageTabs::new(Language::Style);
        let mut editor = MockEditor::default();
        assert!(!tabs.select(Language::Style, Some(&mut editor)));
        assert_eq!(editor.calls.borrow().as_slice(), ["set_language:css"]);
    }

    #[test]
    fn test_select_without_editor() {
        let mut tabs = LanguageTabs::default();
        assert!(tabs.select(Language::Script, None));
        assert_eq!(tabs.active(), Language::Script);
    }

    #[test]
    fn test_select_index() {
        let mut tabs = LanguageTabs::default();
        tabs.select_index(1, None);
        assert_eq!(tabs.active(), Language::Style);
    }

    #[test]
    #[should_panic]
    fn test_select_index_out_of_range_panics() {
        LanguageTabs::default().select_index(3, None);
    }
}
