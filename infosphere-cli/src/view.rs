use std::io::{self, Write};

use infosphere_core::state::NavigatorState;

const TOP_HEADER: &str = "Discover More";

/// Names of the selected ancestors, root first.
fn breadcrumb(state: &NavigatorState) -> Vec<String> {
    state
        .levels()
        .windows(2)
        .map(|pair| {
            let id = pair[1].path.ids().last().map(|id| id.to_string());
            id.and_then(|id| {
                pair[0]
                    .nodes
                    .iter()
                    .find(|node| *node.id == *id)
                    .map(|node| node.name.to_string())
                    .or(Some(id))
            })
            .unwrap_or_default()
        })
        .collect()
}

pub fn render(state: &NavigatorState, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    if state.is_loading() {
        writeln!(out, "Loading...")?;
        return Ok(());
    }
    if let Some(err) = state.last_error() {
        writeln!(out, "! Could not load: {err}. Type r to retry.")?;
    }
    if let Some(url) = state.video() {
        writeln!(out, "> Playing {url}  (c to close)")?;
    }

    let crumbs = breadcrumb(state);
    if crumbs.is_empty() {
        writeln!(out, "{TOP_HEADER}")?;
    } else {
        writeln!(out, "{}  (b to go back)", crumbs.join(" / "))?;
    }

    let nodes = state.nodes();
    if nodes.is_empty() {
        writeln!(out, "  (nothing here)")?;
    }
    for (index, node) in nodes.iter().enumerate() {
        let marker = if node.has_video() { "  [video]" } else { "" };
        writeln!(out, "{:>3}. {}{}", index + 1, node.name, marker)?;
        if let Some(summary) = node.summary() {
            writeln!(out, "     {summary}")?;
        }
    }
    out.flush()
}
