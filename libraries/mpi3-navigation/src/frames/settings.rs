use crate::frame::MenuFrame;
use crate::item::{FrameContext, MenuItem};
use crate::pager::Pager;

/// Back row followed by the configured shell actions
#[derive(Debug, Clone)]
pub struct SettingsFrame {
    rows: Vec<MenuItem>,
    pager: Pager,
}

impl SettingsFrame {
    pub fn new(context: &FrameContext) -> Self {
        let rows: Vec<MenuItem> = std::iter::once(MenuItem::Back)
            .chain(
                context
                    .shell_actions
                    .iter()
                    .cloned()
                    .map(MenuItem::ShellAction),
            )
            .collect();
        let pager = Pager::new(rows.len(), context.page_size);
        Self { rows, pager }
    }
}

impl MenuFrame for SettingsFrame {
    fn title(&self) -> &str {
        "Settings"
    }

    fn pager(&self) -> &Pager {
        &self.pager
    }

    fn pager_mut(&mut self) -> &mut Pager {
        &mut self.pager
    }

    fn visible(&self) -> &[MenuItem] {
        &self.rows[self.pager.visible_range()]
    }
}
