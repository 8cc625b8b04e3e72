use crate::engine::binder::ExternalStateBag;
use crate::engine::registry::ComponentRegistry;
use crate::engine::render_model::{ChecklistPanel, PageView};
use crate::schema::resolver::PageResolver;
use crate::schema::schema_model::{ComponentKind, PageLayout};
use crate::workflow::checklist::Checklist;

/// Render a page from the schema.
///
/// Headings are skipped in the body since the title is shown in the page
/// header. Pages with the migration layout also carry the checklist panel.
pub fn render_page(
    resolver: &PageResolver<'_>,
    registry: &ComponentRegistry,
    page_id: &str,
    external: &ExternalStateBag,
    checklist: &Checklist,
) -> PageView {
    let resolution = resolver.resolve(page_id);

    let Some(page) = resolution.data else {
        return PageView::NotFound {
            page_id: page_id.to_string(),
            is_loading: resolution.is_loading,
            message: resolution
                .error
                .unwrap_or_else(|| format!("Page not found: {}", page_id)),
        };
    };

    let components = page
        .components
        .iter()
        .enumerate()
        .filter(|(_, descriptor)| descriptor.type_name() != ComponentKind::Heading.as_str())
        .filter_map(|(index, descriptor)| registry.render(descriptor, index, external))
        .collect();

    let checklist_panel = match page.layout {
        PageLayout::Migration => Some(ChecklistPanel {
            steps: checklist.steps().to_vec(),
            completed_step_count: checklist.completed_step_count(),
        }),
        PageLayout::Default => None,
    };

    PageView::Loaded {
        page_id: page.page_id.clone(),
        title: page.title.clone(),
        description: page.description.clone(),
        layout: page.layout,
        components,
        checklist: checklist_panel,
    }
}
