use std::sync::Arc;

use infosphere_core::node::CatalogNode;

/// Entry of the displayed list, either by its 1-based position or by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Index(usize),
    Id(String),
}

impl Target {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(index) if index > 0 => Target::Index(index),
            _ => Target::Id(arg.to_string()),
        }
    }

    pub fn resolve(&self, nodes: &[CatalogNode]) -> Option<Arc<str>> {
        match self {
            Target::Index(index) => nodes.get(index - 1).map(|node| node.id.clone()),
            Target::Id(id) => nodes
                .iter()
                .find(|node| &*node.id == id)
                .map(|node| node.id.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Select(Target),
    Back,
    Video(Target),
    CloseVideo,
    Retry,
    Refresh,
    List,
    Help,
    Quit,
    Nothing,
}

pub const HELP: &str = "\
<n> | <id>      open entry
b, back         go up one level
v <n> | <id>    play the entry's video
c, close        close the video
r, retry        retry the failed load
f, refresh      reload this list
l, ls           show the list again
h, help         show this help
q, quit         leave";

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Nothing);
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments: {line:?}"));
        }
        let command = match (head, arg) {
            ("b" | "back", None) => Command::Back,
            ("c" | "close", None) => Command::CloseVideo,
            ("r" | "retry", None) => Command::Retry,
            ("f" | "refresh", None) => Command::Refresh,
            ("l" | "ls", None) => Command::List,
            ("h" | "help" | "?", None) => Command::Help,
            ("q" | "quit" | "exit", None) => Command::Quit,
            ("v" | "video", Some(arg)) => Command::Video(Target::parse(arg)),
            ("v" | "video", None) => return Err("video needs an entry".to_string()),
            ("o" | "open", Some(arg)) => Command::Select(Target::parse(arg)),
            (target, None) => Command::Select(Target::parse(target)),
            (head, Some(_)) => return Err(format!("unknown command: {head:?}")),
        };
        Ok(command)
    }
}
