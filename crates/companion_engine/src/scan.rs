use ego_tree::NodeId;

use crate::dom::{PageDom, PageElement};

/// Structural matching rules for locating item containers and rows.
///
/// Matching is prioritized but non-exclusive: a generic `table` and the
/// site-specific list classes are all candidates, and any element matching
/// several rules is still yielded once. The rules make no promise about the
/// host page's markup beyond best effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRules {
    pub container_tags: Vec<String>,
    pub container_classes: Vec<String>,
    pub row_tags: Vec<String>,
    pub row_classes: Vec<String>,
    /// Anchors for the page-level send control, tried in document order.
    pub title_tags: Vec<String>,
    pub title_classes: Vec<String>,
    /// A link is an item link when its resolved URL contains this segment.
    pub item_path_segment: String,
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            container_tags: vec!["table".to_string()],
            container_classes: vec![
                "bucket-items".to_string(),
                "track-list".to_string(),
                "chart-tracklist".to_string(),
            ],
            row_tags: vec!["tr".to_string()],
            row_classes: vec!["bucket-item".to_string(), "track".to_string()],
            title_tags: vec!["h1".to_string()],
            title_classes: vec![
                "interior-release-chart-title".to_string(),
                "interior-track-title".to_string(),
            ],
            item_path_segment: "/track/".to_string(),
        }
    }
}

impl ScanRules {
    fn matches_container(&self, element: &PageElement) -> bool {
        self.container_tags.iter().any(|tag| *tag == element.tag)
            || self
                .container_classes
                .iter()
                .any(|class| element.has_class(class))
    }

    fn matches_row(&self, element: &PageElement) -> bool {
        self.row_tags.iter().any(|tag| *tag == element.tag)
            || self.row_classes.iter().any(|class| element.has_class(class))
    }

    fn matches_title(&self, element: &PageElement) -> bool {
        self.title_tags.iter().any(|tag| *tag == element.tag)
            || self
                .title_classes
                .iter()
                .any(|class| element.has_class(class))
    }

    /// The first title-like element of the page, if any. This is where the
    /// page-level send control anchors.
    pub fn title(&self, page: &PageDom) -> Option<NodeId> {
        page.elements()
            .find(|(_, element)| self.matches_title(element))
            .map(|(id, _)| id)
    }

    /// Container candidates across the whole page, in document order.
    pub fn containers<'a>(&'a self, page: &'a PageDom) -> impl Iterator<Item = NodeId> + 'a {
        page.elements()
            .filter(|(_, element)| self.matches_container(element))
            .map(|(id, _)| id)
    }

    /// Row candidates inside one container. Validity (a resolvable canonical
    /// URL) is checked separately so invalid rows are skipped, never removed.
    pub fn rows<'a>(
        &'a self,
        page: &'a PageDom,
        container: NodeId,
    ) -> impl Iterator<Item = NodeId> + 'a {
        page.descendant_elements(container)
            .filter(|(_, element)| self.matches_row(element))
            .map(|(id, _)| id)
    }

    /// The row's canonical item URL: the first descendant link whose target
    /// contains the item path segment. `None` marks the row invalid.
    pub fn canonical_url(&self, page: &PageDom, row: NodeId) -> Option<String> {
        page.descendant_elements(row)
            .filter(|(_, element)| element.tag == "a")
            .filter_map(|(_, element)| element.attr("href"))
            .filter_map(|href| page.resolve_href(href))
            .find(|url| url.contains(&self.item_path_segment))
    }

    /// Rows that yield a canonical URL, paired with it.
    pub fn valid_rows(&self, page: &PageDom, container: NodeId) -> Vec<(NodeId, String)> {
        self.rows(page, container)
            .filter_map(|row| self.canonical_url(page, row).map(|url| (row, url)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ScanRules;
    use crate::dom::PageDom;

    const CHART: &str = concat!(
        "<div class=\"chart-tracklist\">",
        "<div class=\"track\"><a href=\"https://site/track/1\">one</a></div>",
        "<div class=\"track\"><a href=\"https://site/artist/2\">not a track</a></div>",
        "</div>",
    );

    #[test]
    fn class_based_containers_and_rows_match() {
        let page = PageDom::parse(CHART);
        let rules = ScanRules::default();
        let containers: Vec<_> = rules.containers(&page).collect();
        assert_eq!(containers.len(), 1);
        assert_eq!(rules.rows(&page, containers[0]).count(), 2);
    }

    #[test]
    fn rows_without_an_item_link_are_invalid() {
        let page = PageDom::parse(CHART);
        let rules = ScanRules::default();
        let container = rules.containers(&page).next().expect("container");
        let valid = rules.valid_rows(&page, container);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].1, "https://site/track/1");
    }

    #[test]
    fn title_matches_by_tag_or_class() {
        let rules = ScanRules::default();
        let by_class = PageDom::parse("<div class=\"interior-track-title\">Track</div>");
        assert!(rules.title(&by_class).is_some());
        let by_tag = PageDom::parse("<h1>Release</h1>");
        assert!(rules.title(&by_tag).is_some());
        let none = PageDom::parse(CHART);
        assert!(rules.title(&none).is_none());
    }

    #[test]
    fn first_item_link_wins() {
        let html = concat!(
            "<table><tr>",
            "<td><a href=\"https://site/track/7\">a</a></td>",
            "<td><a href=\"https://site/track/8\">b</a></td>",
            "</tr></table>",
        );
        let page = PageDom::parse(html);
        let rules = ScanRules::default();
        let container = rules.containers(&page).next().expect("container");
        let valid = rules.valid_rows(&page, container);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].1, "https://site/track/7");
    }
}
