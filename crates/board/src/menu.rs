#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuItem {
    #[default]
    Edit,
    Delete,
}

impl MenuItem {
    pub const ALL: [MenuItem; 2] = [MenuItem::Edit, MenuItem::Delete];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Edit => "Edit",
            MenuItem::Delete => "Delete",
        }
    }
}

/// Per-card action menu. Choosing an item always closes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskMenu {
    open: bool,
    highlighted: MenuItem,
}

impl TaskMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> MenuItem {
        self.highlighted
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.highlighted = MenuItem::Edit;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn move_highlight(&mut self) {
        self.highlighted = match self.highlighted {
            MenuItem::Edit => MenuItem::Delete,
            MenuItem::Delete => MenuItem::Edit,
        };
    }

    pub fn choose(&mut self) -> Option<MenuItem> {
        if !self.open {
            return None;
        }
        self.open = false;
        Some(self.highlighted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choosing_closes_the_menu() {
        let mut menu = TaskMenu::default();
        assert_eq!(menu.choose(), None);

        menu.toggle();
        assert!(menu.is_open());
        menu.move_highlight();
        assert_eq!(menu.choose(), Some(MenuItem::Delete));
        assert!(!menu.is_open());
    }

    #[test]
    fn reopening_starts_on_edit() {
        let mut menu = TaskMenu::default();
        menu.toggle();
        menu.move_highlight();
        menu.toggle();
        menu.toggle();
        assert_eq!(menu.highlighted(), MenuItem::Edit);
    }
}
