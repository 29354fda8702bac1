use crate::error::Result;
use crate::frame::MenuFrame;
use crate::item::{FrameContext, MenuItem, MenuTarget};
use crate::pager::Pager;
use mpi3_core::{Filter, FilterField};

/// Distinct artists or albums under a filter
///
/// An artist opens that artist's albums; an album opens its songs. Each
/// step adds to the filter.
#[derive(Debug, Clone)]
pub struct CategoryFrame {
    title: String,
    rows: Vec<MenuItem>,
    pager: Pager,
}

impl CategoryFrame {
    pub fn new(field: FilterField, filter: Filter, context: &FrameContext) -> Result<Self> {
        let values = context.library.get_values(field, &filter)?;
        let title = match field {
            FilterField::Artist => "Artists".to_string(),
            FilterField::Album => "Albums".to_string(),
        };

        let mut rows = Vec::with_capacity(values.len() + 1);
        rows.push(MenuItem::Back);
        for value in values {
            let narrowed = filter.clone().with(field, value.clone());
            let target = match field {
                FilterField::Artist => MenuTarget::Category {
                    field: FilterField::Album,
                    filter: narrowed,
                },
                FilterField::Album => MenuTarget::Songs {
                    title: value.clone(),
                    filter: narrowed,
                },
            };
            rows.push(MenuItem::SubMenu {
                label: value,
                target,
            });
        }

        let pager = Pager::new(rows.len(), context.page_size);
        Ok(Self { title, rows, pager })
    }
}

impl MenuFrame for CategoryFrame {
    fn title(&self) -> &str {
        &self.title
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
