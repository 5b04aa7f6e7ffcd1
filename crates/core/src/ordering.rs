//! Ordering rules for the editor and the rendered selection.
//!
//! Both functions are pure: they take a snapshot of the catalog and the stored
//! selection and never reorder by name or count.

use std::collections::{HashMap, HashSet};

use crate::types::{Category, CategoryId, DisplaySettings};

/// One row of the admin editor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorRow<'a> {
    pub category: &'a Category,
    /// Whether the category is part of the stored selection.
    pub selected: bool,
}

/// Arrange the full catalog for the reorderable editor list.
///
/// Selected categories come first, in stored order, followed by every other
/// category in catalog order. Stored IDs that no longer exist are ignored and a
/// category listed twice in the stored order appears once, at its first position.
#[must_use]
pub fn arrange_for_editor<'a>(
    categories: &'a [Category],
    stored_order: &[CategoryId],
) -> Vec<EditorRow<'a>> {
    let by_id: HashMap<&CategoryId, &Category> = categories.iter().map(|c| (&c.id, c)).collect();
    let mut placed: HashSet<&CategoryId> = HashSet::with_capacity(stored_order.len());
    let mut rows = Vec::with_capacity(categories.len());

    for id in stored_order {
        if let Some(category) = by_id.get(id).copied()
            && placed.insert(&category.id)
        {
            rows.push(EditorRow {
                category,
                selected: true,
            });
        }
    }

    rows.extend(
        categories
            .iter()
            .filter(|c| !placed.contains(&c.id))
            .map(|category| EditorRow {
                category,
                selected: false,
            }),
    );

    rows
}

/// Select the categories to render, in stored order.
///
/// `resolved` holds whatever the catalog returned for the stored IDs. IDs with
/// no entry are skipped silently; with `hide_empty` set, categories without
/// products are skipped too. Nothing else changes the order.
#[must_use]
pub fn select_for_display<'a>(
    settings: &DisplaySettings,
    resolved: &'a HashMap<CategoryId, Category>,
) -> Vec<&'a Category> {
    settings
        .ordered_category_ids
        .iter()
        .filter_map(|id| resolved.get(id))
        .filter(|category| !(settings.hide_empty && category.is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, product_count: u32) -> Category {
        Category {
            id: CategoryId::new(id),
            name: id.to_uppercase(),
            slug: id.to_owned(),
            product_count,
            image_url: None,
            link: format!("/product-category/{id}/"),
        }
    }

    fn ids(list: &[&str]) -> Vec<CategoryId> {
        list.iter().map(|s| CategoryId::new(*s)).collect()
    }

    fn catalog() -> Vec<Category> {
        vec![category("a", 5), category("b", 0), category("c", 2)]
    }

    fn resolved(categories: &[Category]) -> HashMap<CategoryId, Category> {
        categories.iter().map(|c| (c.id.clone(), c.clone())).collect()
    }

    fn names(selected: &[&Category]) -> Vec<String> {
        selected.iter().map(|c| c.id.to_string()).collect()
    }

    #[test]
    fn test_editor_selected_first_then_source_order() {
        let categories = catalog();
        let rows = arrange_for_editor(&categories, &ids(&["c", "a"]));

        let order: Vec<(&str, bool)> = rows
            .iter()
            .map(|r| (r.category.id.as_str(), r.selected))
            .collect();
        assert_eq!(order, vec![("c", true), ("a", true), ("b", false)]);
    }

    #[test]
    fn test_editor_empty_selection_is_source_order() {
        let categories = catalog();
        let rows = arrange_for_editor(&categories, &[]);
        let order: Vec<&str> = rows.iter().map(|r| r.category.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(rows.iter().all(|r| !r.selected));
    }

    #[test]
    fn test_editor_ignores_stale_and_duplicate_ids() {
        let categories = catalog();
        let rows = arrange_for_editor(&categories, &ids(&["gone", "b", "b", "a"]));
        let order: Vec<&str> = rows.iter().map(|r| r.category.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(rows.len(), categories.len());
    }

    #[test]
    fn test_display_hide_empty_keeps_stored_order() {
        let categories = catalog();
        let map = resolved(&categories);
        let settings = DisplaySettings {
            ordered_category_ids: ids(&["b", "c", "a"]),
            hide_empty: true,
            show_count: true,
        };

        assert_eq!(names(&select_for_display(&settings, &map)), vec!["c", "a"]);
    }

    #[test]
    fn test_display_without_hide_empty_keeps_empty_categories() {
        let categories = catalog();
        let map = resolved(&categories);
        let settings = DisplaySettings {
            ordered_category_ids: ids(&["b", "c", "a"]),
            hide_empty: false,
            show_count: false,
        };

        assert_eq!(
            names(&select_for_display(&settings, &map)),
            vec!["b", "c", "a"]
        );
    }

    #[test]
    fn test_display_skips_missing_categories() {
        let categories = catalog();
        let map = resolved(&categories);
        let settings = DisplaySettings {
            ordered_category_ids: ids(&["c", "d", "a"]),
            hide_empty: false,
            show_count: false,
        };

        assert_eq!(names(&select_for_display(&settings, &map)), vec!["c", "a"]);
    }

    #[test]
    fn test_display_is_subsequence_of_stored_order() {
        let categories = catalog();
        let map = resolved(&categories);
        let stored = ids(&["a", "x", "c", "b", "y"]);
        let settings = DisplaySettings {
            ordered_category_ids: stored.clone(),
            hide_empty: true,
            show_count: false,
        };

        let selected = select_for_display(&settings, &map);
        let mut cursor = stored.iter();
        for category in &selected {
            assert!(cursor.any(|id| *id == category.id), "order must be preserved");
            assert!(!category.is_empty());
        }
    }
}
