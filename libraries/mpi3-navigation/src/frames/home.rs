use crate::frame::MenuFrame;
use crate::item::{MenuItem, MenuTarget};
use crate::pager::Pager;
use mpi3_core::{Filter, FilterField};

/// Root menu: Songs, Artists, Albums, Settings
///
/// Has no back row; the stack never pops it.
#[derive(Debug, Clone)]
pub struct HomeFrame {
    rows: Vec<MenuItem>,
    pager: Pager,
}

impl HomeFrame {
    pub fn new(page_size: usize) -> Self {
        let submenu = |label: &str, target| MenuItem::SubMenu {
            label: label.to_string(),
            target,
        };
        let rows = vec![
            submenu(
                "Songs",
                MenuTarget::Songs {
                    title: "Songs".to_string(),
                    filter: Filter::new(),
                },
            ),
            submenu(
                "Artists",
                MenuTarget::Category {
                    field: FilterField::Artist,
                    filter: Filter::new(),
                },
            ),
            submenu(
                "Albums",
                MenuTarget::Category {
                    field: FilterField::Album,
                    filter: Filter::new(),
                },
            ),
            submenu("Settings", MenuTarget::Settings),
        ];
        let pager = Pager::new(rows.len(), page_size);
        Self { rows, pager }
    }
}

impl MenuFrame for HomeFrame {
    fn title(&self) -> &str {
        "Home"
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
