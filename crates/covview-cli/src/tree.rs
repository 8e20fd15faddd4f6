//! Source Tree Rendering
//!
//! Draws the flattened rows of a [`covview::TreeStore`] with box connectors.
//!
//! ## Example Output
//!
//! ```text
//! proj/
//! ├── a.cpp
//! ├── lib/
//! │   ├── util.h
//! │   └── detail/ …
//! └── main.cpp
//!
//! Total: 3 files, 2 folders (1 not expanded)
//! ```

use console::Style;
use covview::TreeRow;
use glob::Pattern;

/// Configuration for tree display
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// Only show files whose name matches (folders are always shown)
    pub filter: Option<Pattern>,
    /// Use colors
    pub use_colors: bool,
}

impl TreeConfig {
    /// Set filter pattern; an invalid pattern disables filtering
    #[must_use]
    pub fn with_filter(mut self, pattern: Option<&str>) -> Self {
        self.filter = pattern.and_then(|p| Pattern::new(p).ok());
        self
    }

    /// Set whether to use colors
    #[must_use]
    pub const fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn keeps(&self, row: &TreeRow) -> bool {
        row.is_branch
            || self
                .filter
                .as_ref()
                .map_or(true, |pattern| pattern.matches(&row.name))
    }
}

/// Counts for the summary line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeTotals {
    /// Files shown
    pub files: usize,
    /// Folders shown, root excluded
    pub folders: usize,
    /// Folders shown whose children were not listed
    pub unexpanded: usize,
}

/// Whether each row is the last child of its parent
fn last_child_flags(rows: &[TreeRow]) -> Vec<bool> {
    (0..rows.len())
        .map(|i| {
            let depth = rows[i].depth;
            rows[i + 1..]
                .iter()
                .find(|r| r.depth <= depth)
                .map_or(true, |next| next.depth < depth)
        })
        .collect()
}

/// Render depth-first rows (root first) as a tree
#[must_use]
pub fn render_tree(rows: &[TreeRow], config: &TreeConfig) -> String {
    let rows: Vec<TreeRow> = rows.iter().filter(|r| config.keeps(r)).cloned().collect();
    let Some((root, children)) = rows.split_first() else {
        return String::new();
    };

    let folder_style = Style::new().blue().bold();
    let paint_folder = |name: &str| {
        if config.use_colors {
            folder_style.clone().force_styling(true).apply_to(name).to_string()
        } else {
            name.to_string()
        }
    };

    let mut output = format!("{}/\n", paint_folder(&root.name));
    let mut totals = TreeTotals::default();
    let last = last_child_flags(children);
    // ancestors[d] is true when the ancestor at depth d + 1 was a last child
    let mut ancestors: Vec<bool> = Vec::new();

    for (row, &is_last) in children.iter().zip(&last) {
        let level = row.depth.saturating_sub(1);
        ancestors.truncate(level);
        for &done in &ancestors {
            output.push_str(if done { "    " } else { "│   " });
        }
        output.push_str(if is_last { "└── " } else { "├── " });

        if row.is_branch {
            totals.folders += 1;
            output.push_str(&paint_folder(&row.name));
            output.push('/');
            if !row.is_open {
                totals.unexpanded += 1;
                output.push_str(" …");
            }
        } else {
            totals.files += 1;
            output.push_str(&row.name);
        }
        output.push('\n');
        ancestors.push(is_last);
    }

    output.push('\n');
    output.push_str(&format!(
        "Total: {} files, {} folders ({} not expanded)\n",
        totals.files, totals.folders, totals.unexpanded
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use covview::NodeId;

    fn row(id: &str, depth: usize, name: &str, is_branch: bool, is_open: bool) -> TreeRow {
        TreeRow {
            id: NodeId::from(id),
            depth,
            name: name.to_string(),
            full_path: format!("/{name}"),
            is_branch,
            is_open,
        }
    }

    fn sample() -> Vec<TreeRow> {
        vec![
            row("root", 0, "proj", true, true),
            row("root-0", 1, "a.cpp", false, false),
            row("root-1", 1, "lib", true, true),
            row("root-1-0", 2, "util.h", false, false),
            row("root-1-1", 2, "detail", true, false),
            row("root-2", 1, "main.cpp", false, false),
        ]
    }

    #[test]
    fn test_render_connectors() {
        let text = render_tree(&sample(), &TreeConfig::default());
        let expected = "\
proj/
├── a.cpp
├── lib/
│   ├── util.h
│   └── detail/ …
└── main.cpp

Total: 3 files, 2 folders (1 not expanded)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_last_child_prefix_is_blank() {
        let rows = vec![
            row("root", 0, "proj", true, true),
            row("root-0", 1, "lib", true, true),
            row("root-0-0", 2, "x.c", false, false),
        ];
        let text = render_tree(&rows, &TreeConfig::default());
        assert!(text.contains("└── lib/\n    └── x.c\n"));
    }

    #[test]
    fn test_filter_hides_files_only() {
        let config = TreeConfig::default().with_filter(Some("*.cpp"));
        let text = render_tree(&sample(), &config);
        assert!(text.contains("a.cpp"));
        assert!(!text.contains("util.h"));
        assert!(text.contains("│   └── detail/"));
        assert!(text.contains("Total: 2 files, 2 folders"));
    }

    #[test]
    fn test_invalid_filter_is_ignored() {
        let config = TreeConfig::default().with_filter(Some("[unclosed"));
        assert!(config.filter.is_none());
    }

    #[test]
    fn test_unexpanded_root() {
        let rows = vec![row("root", 0, "proj", true, false)];
        let text = render_tree(&rows, &TreeConfig::default());
        assert_eq!(text, "proj/\n\nTotal: 0 files, 0 folders (0 not expanded)\n");
    }

    #[test]
    fn test_empty_rows() {
        assert!(render_tree(&[], &TreeConfig::default()).is_empty());
    }

    #[test]
    fn test_colored_folders() {
        let text = render_tree(&sample(), &TreeConfig::default().with_colors(true));
        assert!(text.contains('\u{1b}'));
    }
}
