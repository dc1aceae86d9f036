//! Keyboard navigation for the search palette.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Tab,
    /// A character key with the platform modifier (Cmd on macOS, Ctrl elsewhere) held
    Shortcut(char),
    Other,
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteCommand {
    Open,
    Close,
    /// Navigate to the active result and close the palette
    Navigate(String),
    Highlight(usize),
    /// Suppress the default action, nothing else
    Swallow,
    Ignore,
}

/// Result list with one highlighted entry.
#[derive(Debug, Clone, Default)]
pub struct SearchPalette {
    paths: Vec<String>,
    active: usize,
    open: bool,
}

impl SearchPalette {
    pub fn new(paths: Vec<String>) -> Self {
        Self {
            paths,
            active: 0,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn active(&self) -> Option<&str> {
        self.paths.get(self.active).map(String::as_str)
    }

    /// New results highlight the first entry again.
    pub fn set_results(&mut self, paths: Vec<String>) {
        self.paths = paths;
        self.active = 0;
    }

    pub fn hover(&mut self, index: usize) -> PaletteCommand {
        if index < self.paths.len() {
            self.active = index;
            PaletteCommand::Highlight(index)
        } else {
            PaletteCommand::Ignore
        }
    }

    pub fn key(&mut self, key: Key) -> PaletteCommand {
        match key {
            Key::Shortcut('k') | Key::Shortcut('K') => {
                self.open = true;
                PaletteCommand::Open
            }
            _ if !self.open => PaletteCommand::Ignore,
            Key::Escape => {
                self.open = false;
                PaletteCommand::Close
            }
            Key::Tab => PaletteCommand::Swallow,
            Key::Enter => match self.active().map(str::to_string) {
                Some(path) => {
                    self.open = false;
                    PaletteCommand::Navigate(path)
                }
                None => PaletteCommand::Swallow,
            },
            Key::ArrowUp if !self.paths.is_empty() => {
                self.active = if self.active == 0 {
                    self.paths.len() - 1
                } else {
                    self.active - 1
                };
                PaletteCommand::Highlight(self.active)
            }
            Key::ArrowDown if !self.paths.is_empty() => {
                self.active = (self.active + 1) % self.paths.len();
                PaletteCommand::Highlight(self.active)
            }
            _ => PaletteCommand::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> SearchPalette {
        let mut p = SearchPalette::new(vec![
            "/jobs".to_string(),
            "/applications".to_string(),
            "/messages".to_string(),
        ]);
        p.key(Key::Shortcut('k'));
        p
    }

    #[test]
    fn arrows_wrap_around() {
        let mut p = palette();
        assert_eq!(p.key(Key::ArrowUp), PaletteCommand::Highlight(2));
        assert_eq!(p.key(Key::ArrowDown), PaletteCommand::Highlight(0));
        assert_eq!(p.key(Key::ArrowDown), PaletteCommand::Highlight(1));
    }

    #[test]
    fn enter_navigates_and_closes() {
        let mut p = palette();
        p.key(Key::ArrowDown);
        assert_eq!(
            p.key(Key::Enter),
            PaletteCommand::Navigate("/applications".to_string())
        );
        assert!(!p.is_open());
    }

    #[test]
    fn closed_palette_ignores_navigation() {
        let mut p = SearchPalette::new(vec!["/jobs".to_string()]);
        assert_eq!(p.key(Key::ArrowDown), PaletteCommand::Ignore);
        assert_eq!(p.key(Key::Shortcut('K')), PaletteCommand::Open);
    }

    #[test]
    fn new_results_reset_highlight() {
        let mut p = palette();
        p.key(Key::ArrowDown);
        p.set_results(vec!["/settings".to_string()]);
        assert_eq!(p.active(), Some("/settings"));
    }

    #[test]
    fn empty_results_and_tab() {
        let mut p = palette();
        p.set_results(vec![]);
        assert_eq!(p.key(Key::ArrowDown), PaletteCommand::Ignore);
        assert_eq!(p.key(Key::Enter), PaletteCommand::Swallow);
        assert_eq!(p.key(Key::Tab), PaletteCommand::Swallow);
        assert_eq!(p.key(Key::Escape), PaletteCommand::Close);
    }

    #[test]
    fn hover_moves_highlight() {
        let mut p = palette();
        assert_eq!(p.hover(2), PaletteCommand::Highlight(2));
        assert_eq!(p.hover(9), PaletteCommand::Ignore);
        assert_eq!(p.active(), Some("/messages"));
    }
}
