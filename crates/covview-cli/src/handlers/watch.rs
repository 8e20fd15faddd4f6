//! Watch command handler
//!
//! Selects one file or folder, starts polling and re-renders on every
//! published coverage update until Ctrl-C or the update limit.

use super::resolve_path;
use crate::commands::WatchArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::handlers::annotate::line_tally;
use crate::output::{render_annotated, render_tables, render_tally};
use console::Term;
use covview::{CoverageView, SelectionTarget, Session};
use tracing::{debug, info};

/// Execute the watch command
pub async fn execute_watch(config: &CliConfig, args: &WatchArgs) -> CliResult<()> {
    let path = resolve_path(&args.target)?;
    let target = if tokio::fs::metadata(&path).await?.is_dir() {
        SelectionTarget::folder(path)
    } else {
        SelectionTarget::file(path)
    };

    let session = Session::connect(config.viewer.clone())?;
    let mut views = session.coverage().subscribe();
    session.start();
    session.select(target.clone());
    info!(selection = %target, interval_ms = config.viewer.poll_interval_ms, "watching");

    let term = Term::stdout();
    let redraw = term.is_term();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut rendered = 0usize;

    let result = loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let view = views.borrow_and_update().clone();
                let Some(frame) = render_view(&session, &view, config.use_color()).await? else {
                    continue;
                };
                if redraw {
                    term.clear_screen()?;
                }
                println!("{frame}");
                rendered += 1;
                if args.updates.is_some_and(|limit| rendered >= limit) {
                    break Ok(());
                }
            }
            _ = &mut ctrl_c => {
                debug!("interrupted");
                break Ok(());
            }
        }
    };

    session.shutdown();
    result
}

/// One frame for a published view; `None` until data has arrived
pub async fn render_view(
    session: &Session,
    view: &CoverageView,
    use_color: bool,
) -> CliResult<Option<String>> {
    match view {
        CoverageView::NoSelection | CoverageView::AwaitingFirstFetch(_) => Ok(None),
        CoverageView::Annotated { target, .. } => {
            let lines = session.annotated_selection().await?;
            Ok(Some(format!(
                "{target}\n\n{}\n{}",
                render_annotated(&lines, use_color),
                render_tally(&line_tally(&lines), use_color)
            )))
        }
        CoverageView::Summarized { target, tables } => Ok(Some(format!(
            "{target}\n\n{}",
            render_tables(tables, use_color)
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use covview::{
        FetchOutcome, FileCoverageRow, FileCoverageSnapshot, FolderCoverageSummary,
        MockCoverageServer, MockGateway, ViewerConfig,
    };
    use std::sync::Arc;

    fn session() -> Session {
        let gateway = MockGateway::new().with_file("/proj/a.cpp", "int a;\nint b;\n");
        let server = MockCoverageServer::new();
        server.push_lines("/proj/a.cpp", FileCoverageSnapshot::from_codes(&[1, 2]));
        server.push_overview(
            "/proj",
            FolderCoverageSummary {
                selected: vec![FileCoverageRow::new("/proj/a.cpp", 1, 1)],
                unselected: vec![],
            },
        );
        Session::new(
            ViewerConfig::default().with_root("/proj"),
            Arc::new(gateway),
            Arc::new(server),
        )
        .unwrap()
    }

    async fn fetch_now(session: &Session) {
        let outcome = session.coverage().issue_fetch().unwrap().await;
        assert_eq!(outcome, FetchOutcome::Applied);
    }

    #[tokio::test]
    async fn test_nothing_rendered_before_first_fetch() {
        let session = session();
        session.select(SelectionTarget::file("/proj/a.cpp"));
        let view = session.coverage().view();
        assert!(render_view(&session, &view, false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_frame() {
        let session = session();
        session.select(SelectionTarget::file("/proj/a.cpp"));
        fetch_now(&session).await;

        let frame = render_view(&session, &session.coverage().view(), false)
            .await
            .unwrap()
            .unwrap();
        assert!(frame.starts_with("/proj/a.cpp\n\n"));
        assert!(frame.contains("1 + │ int a;"));
        assert!(frame.contains("2 - │ int b;"));
        assert!(frame.ends_with("1 covered, 1 not covered, 0 unknown"));
    }

    #[tokio::test]
    async fn test_folder_frame() {
        let session = session();
        session.select(SelectionTarget::folder("/proj"));
        fetch_now(&session).await;

        let frame = render_view(&session, &session.coverage().view(), false)
            .await
            .unwrap()
            .unwrap();
        assert!(frame.starts_with("/proj/\n\nSelected (1 files)"));
        assert!(frame.contains("a.cpp"));
    }
}
