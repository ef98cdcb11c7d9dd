//! Human-readable build order report.
//!
//! Packages are listed root first (reverse build order), indented by nesting
//! depth and coloured by `depth % 6`:
//!
//! ```text
//! acme/app dev [params, defines]
//!    acme/lib-b 1.0.0 [params]
//!       acme/lib-a 2.1.0 [params, web]
//! ```
//!
//! The report is presentational only; it never influences assembly.

use colored::{Color, Colorize};
use std::fmt;

use crate::assembly::BuildOrder;
use crate::constants::{TREE_COLOR_COUNT, TREE_INDENT};
use crate::package::PackageNode;

const COLORS: [Color; TREE_COLOR_COUNT] =
    [Color::Red, Color::Green, Color::Yellow, Color::Cyan, Color::Magenta, Color::Blue];

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    /// Depth from the build order; the root is 1.
    pub depth: usize,
    /// Package name.
    pub name: String,
    /// Display version.
    pub version: String,
    /// Declared categories.
    pub categories: Vec<String>,
}

impl TreeLine {
    /// Leading indentation.
    pub fn indent(&self) -> String {
        TREE_INDENT.repeat(self.depth.saturating_sub(1))
    }

    /// Colour of the package name.
    pub fn color(&self) -> Color {
        COLORS[self.depth % TREE_COLOR_COUNT]
    }

    /// Coloured rendering.
    pub fn render(&self) -> String {
        format!(
            "{}{} {} {}",
            self.indent(),
            self.name.color(self.color()).bold(),
            self.version.dimmed(),
            self.category_list()
        )
    }

    fn category_list(&self) -> String {
        format!("[{}]", self.categories.join(", "))
    }
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {} {}", self.indent(), self.name, self.version, self.category_list())
    }
}

/// Report lines, root first.
pub fn tree_lines(order: &BuildOrder, packages: &[PackageNode]) -> Vec<TreeLine> {
    order
        .iter()
        .rev()
        .filter_map(|entry| {
            let package = packages.iter().find(|p| p.name == entry.name)?;
            Some(TreeLine {
                depth: entry.depth,
                name: package.name.clone(),
                version: package.pretty_version().to_string(),
                categories: declared_categories(package),
            })
        })
        .collect()
}

/// Coloured report, one package per line.
pub fn render_tree(order: &BuildOrder, packages: &[PackageNode]) -> String {
    tree_lines(order, packages).iter().map(TreeLine::render).collect::<Vec<_>>().join("\n")
}

fn declared_categories(package: &PackageNode) -> Vec<String> {
    let mut categories: Vec<String> =
        package.files.categories().into_iter().map(String::from).collect();
    if package.is_root {
        for category in package.dev_files.categories() {
            if !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::DependencyOrderer;
    use crate::package::CategoryFiles;

    fn packages() -> Vec<PackageNode> {
        vec![
            PackageNode::new("app", "/app")
                .root()
                .with_requires(["lib-b"])
                .with_files(CategoryFiles::new().with("params", ["p.php"]))
                .with_dev_files(CategoryFiles::new().with("web", ["w.php"])),
            PackageNode::new("lib-b", "/b")
                .with_version("1.0.0")
                .with_requires(["lib-a"])
                .with_files(CategoryFiles::new().with("params", ["p.php"])),
            PackageNode::new("lib-a", "/a").with_version("2.1.0"),
        ]
    }

    #[test]
    fn test_lines_root_first_with_indentation() {
        let packages = packages();
        let order = DependencyOrderer::new(&packages).order("app");
        let lines: Vec<String> = tree_lines(&order, &packages).iter().map(ToString::to_string).collect();

        assert_eq!(
            lines,
            vec!["app dev [params, web]", "   lib-b 1.0.0 [params]", "      lib-a 2.1.0 []"]
        );
    }

    #[test]
    fn test_colour_cycles_by_depth() {
        let line = |depth| TreeLine {
            depth,
            name: "x".to_string(),
            version: "dev".to_string(),
            categories: Vec::new(),
        };
        assert_eq!(line(1).color(), Color::Green);
        assert_eq!(line(6).color(), Color::Red);
        assert_eq!(line(7).color(), line(1).color());
    }

    #[test]
    fn test_render_contains_every_package() {
        let packages = packages();
        let order = DependencyOrderer::new(&packages).order("app");
        let rendered = render_tree(&order, &packages);
        assert_eq!(rendered.lines().count(), 3);
        for name in ["app", "lib-b", "lib-a"] {
            assert!(rendered.contains(name));
        }
    }
}
