//! Tree command handler

use super::resolve_path;
use crate::commands::TreeArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{to_json, OutputFormat};
use crate::tree::{render_tree, TreeConfig};
use covview::Session;
use std::path::Path;
use tracing::warn;

/// Execute the tree command
pub async fn execute_tree(config: &CliConfig, args: &TreeArgs) -> CliResult<()> {
    let text = tree_output(config, args).await?;
    print!("{text}");
    Ok(())
}

/// Expand the tree and render it in the requested format
pub async fn tree_output(config: &CliConfig, args: &TreeArgs) -> CliResult<String> {
    let root = args
        .path
        .as_deref()
        .unwrap_or_else(|| Path::new(&config.viewer.root));
    let root = resolve_path(root)?;
    let session = Session::connect(config.viewer.clone().with_root(root))?;
    let tree = session.tree();

    // The root listing must succeed; deeper failures are reported and skipped.
    tree.expand(tree.root_id()).await?;
    for failure in tree.expand_depth(args.depth.max(1)).await {
        warn!(error = %failure, "skipping unreadable folder");
    }

    let rows = tree.loaded_rows();
    match OutputFormat::from(args.format) {
        OutputFormat::Json => Ok(to_json(&rows)? + "\n"),
        OutputFormat::Text => {
            let tree_config = TreeConfig::default()
                .with_filter(args.filter.as_deref())
                .with_colors(config.use_color());
            Ok(render_tree(&rows, &tree_config))
        }
    }
}
