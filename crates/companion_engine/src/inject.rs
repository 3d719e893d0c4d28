use companion_core::{ControlState, StatusKind};
use ego_tree::NodeId;

use crate::dom::{PageDom, PageElement};
use crate::scan::ScanRules;

pub const CHECKBOX_CLASS: &str = "companion-checkbox";
pub const BADGE_CLASS: &str = "companion-status-badge";
pub const BATCH_BUTTON_CLASS: &str = "companion-batch-send";
pub const BATCH_BUTTON_LABEL: &str = "Download Selected";
pub const SINGLE_BUTTON_CLASS: &str = "companion-send";
pub const SINGLE_BUTTON_LABEL: &str = "Send to downloader";

/// What one injection pass over a container actually inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InjectStats {
    pub rows_injected: usize,
    pub batch_button_added: bool,
}

/// Injects one checkbox per valid row and one batch button immediately
/// before the container, then marks the container. A marked container is
/// left untouched, so repeated passes never duplicate controls.
pub fn inject_controls(page: &mut PageDom, rules: &ScanRules, container: NodeId) -> InjectStats {
    if page.is_injected(container) {
        return InjectStats::default();
    }

    let mut stats = InjectStats::default();
    let rows = rules.valid_rows(page, container);
    for (row, _) in &rows {
        // Rows shared with an overlapping container may already carry one.
        if find_child_with_class(page, *row, CHECKBOX_CLASS).is_some() {
            continue;
        }
        let checkbox = PageElement::new("input")
            .with_attr("type", "checkbox")
            .with_attr("class", CHECKBOX_CLASS);
        if page.prepend_child(*row, checkbox).is_some() {
            stats.rows_injected += 1;
        }
    }

    let button = PageElement::new("button").with_attr("class", BATCH_BUTTON_CLASS);
    if let Some(button_id) = page.insert_before(container, button) {
        page.set_text(button_id, BATCH_BUTTON_LABEL);
        stats.batch_button_added = true;
    }

    page.mark_injected(container);
    stats
}

/// The page-level send button, wherever an earlier pass put it.
pub fn find_single_control(page: &PageDom) -> Option<NodeId> {
    page.elements()
        .find(|(_, element)| element.has_class(SINGLE_BUTTON_CLASS))
        .map(|(id, _)| id)
}

/// Injects the page-level send button right after the page title, once.
/// Returns the button (existing or new), or `None` when the page has no
/// title anchor to hang it on.
pub fn inject_single_control(page: &mut PageDom, rules: &ScanRules) -> Option<NodeId> {
    if let Some(existing) = find_single_control(page) {
        return Some(existing);
    }
    let title = rules.title(page)?;
    let button = PageElement::new("button").with_attr("class", SINGLE_BUTTON_CLASS);
    let button_id = page.insert_after(title, button)?;
    page.set_text(button_id, SINGLE_BUTTON_LABEL);
    Some(button_id)
}

/// The container's batch button: the immediately preceding sibling an
/// injection pass put there, if any.
pub fn find_batch_button(page: &PageDom, container: NodeId) -> Option<NodeId> {
    let button = page.prev_sibling(container)?;
    page.element(button)
        .filter(|element| element.has_class(BATCH_BUTTON_CLASS))?;
    Some(button)
}

/// Mirrors control state onto its button element: label text plus the
/// `disabled` attribute while a request is in flight or recovering.
pub fn paint_control(page: &mut PageDom, button: NodeId, state: &ControlState) {
    page.set_text(button, state.label());
    if state.is_enabled() {
        page.remove_attr(button, "disabled");
    } else {
        page.set_attr(button, "disabled", "disabled");
    }
}

/// Returns the row's badge element, creating it once right after the
/// checkbox (or as the row's first child when no checkbox exists).
pub fn ensure_badge(page: &mut PageDom, row: NodeId) -> Option<NodeId> {
    if let Some(existing) = find_child_with_class(page, row, BADGE_CLASS) {
        return Some(existing);
    }
    let badge = PageElement::new("span").with_attr("class", BADGE_CLASS);
    match find_child_with_class(page, row, CHECKBOX_CLASS) {
        Some(checkbox) => page.insert_after(checkbox, badge),
        None => page.prepend_child(row, badge),
    }
}

/// Paints the badge from the cache's verdict: text and colors are a pure
/// function of the status, with no history kept on the element.
pub fn paint_badge(page: &mut PageDom, badge: NodeId, status: StatusKind) {
    let style = status.badge_style();
    page.set_text(badge, status.badge_text());
    page.set_attr(badge, "data-background", style.background);
    page.set_attr(badge, "data-foreground", style.foreground);
}

/// Canonical URLs of every checked row inside the container.
pub fn checked_urls(page: &PageDom, rules: &ScanRules, container: NodeId) -> Vec<String> {
    rules
        .valid_rows(page, container)
        .into_iter()
        .filter(|(row, _)| row_is_checked(page, *row))
        .map(|(_, url)| url)
        .collect()
}

/// Ticks or unticks the row's injected checkbox.
pub fn set_row_checked(page: &mut PageDom, row: NodeId, checked: bool) {
    let Some(checkbox) = find_child_with_class(page, row, CHECKBOX_CLASS) else {
        return;
    };
    if checked {
        page.set_attr(checkbox, "checked", "checked");
    } else {
        page.remove_attr(checkbox, "checked");
    }
}

fn row_is_checked(page: &PageDom, row: NodeId) -> bool {
    find_child_with_class(page, row, CHECKBOX_CLASS)
        .and_then(|checkbox| page.element(checkbox))
        .is_some_and(|element| element.attr("checked").is_some())
}

fn find_child_with_class(page: &PageDom, parent: NodeId, class: &str) -> Option<NodeId> {
    page.descendant_elements(parent)
        .find(|(_, element)| element.has_class(class))
        .map(|(id, _)| id)
}
