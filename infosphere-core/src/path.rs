use std::{fmt, sync::Arc};

use crate::error::Error;

/// Collection level a list of nodes belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    Titles,
    Subtitles,
    SubSubtitles,
}

impl Level {
    pub fn collection_id(self) -> &'static str {
        match self {
            Level::Titles => "titles",
            Level::Subtitles => "subtitles",
            Level::SubSubtitles => "subsubtitles",
        }
    }

    pub fn is_top(self) -> bool {
        matches!(self, Level::Titles)
    }
}

/// Ancestor ids chosen so far.  At most two ids deep, the enum keeps deeper
/// paths unrepresentable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavigationPath {
    #[default]
    Root,
    Title(Arc<str>),
    Subtitle(Arc<str>, Arc<str>),
}

impl NavigationPath {
    pub const MAX_DEPTH: usize = 2;

    /// Build a path from a slice of ids, rejecting empty ids and paths deeper
    /// than `MAX_DEPTH`.
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Result<Self, Error> {
        if let Some(pos) = ids.iter().position(|id| id.as_ref().is_empty()) {
            return Err(Error::InvalidPath(format!("empty id at position {pos}")));
        }
        match ids {
            [] => Ok(Self::Root),
            [title] => Ok(Self::Title(title.as_ref().into())),
            [title, subtitle] => Ok(Self::Subtitle(
                title.as_ref().into(),
                subtitle.as_ref().into(),
            )),
            _ => Err(Error::InvalidPath(format!(
                "{} ids given, at most {} allowed",
                ids.len(),
                Self::MAX_DEPTH
            ))),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::Root => 0,
            Self::Title(_) => 1,
            Self::Subtitle(_, _) => 2,
        }
    }

    /// Level of the children listed at this path.
    pub fn level(&self) -> Level {
        match self {
            Self::Root => Level::Titles,
            Self::Title(_) => Level::Subtitles,
            Self::Subtitle(_, _) => Level::SubSubtitles,
        }
    }

    pub fn ids(&self) -> Vec<&Arc<str>> {
        match self {
            Self::Root => Vec::new(),
            Self::Title(title) => vec![title],
            Self::Subtitle(title, subtitle) => vec![title, subtitle],
        }
    }

    /// The path one level deeper, or `None` at the deepest level.
    pub fn child(&self, id: Arc<str>) -> Option<Self> {
        match self {
            Self::Root => Some(Self::Title(id)),
            Self::Title(title) => Some(Self::Subtitle(title.clone(), id)),
            Self::Subtitle(_, _) => None,
        }
    }

    pub fn parent(&self) -> Option<Self> {
        match self {
            Self::Root => None,
            Self::Title(_) => Some(Self::Root),
            Self::Subtitle(title, _) => Some(Self::Title(title.clone())),
        }
    }

    /// Alternating collection / document segments addressing the child
    /// collection, e.g. `titles/t1/subtitles`.
    pub fn collection_segments(&self) -> Vec<&str> {
        match self {
            Self::Root => vec![Level::Titles.collection_id()],
            Self::Title(title) => vec![
                Level::Titles.collection_id(),
                title.as_ref(),
                Level::Subtitles.collection_id(),
            ],
            Self::Subtitle(title, subtitle) => vec![
                Level::Titles.collection_id(),
                title.as_ref(),
                Level::Subtitles.collection_id(),
                subtitle.as_ref(),
                Level::SubSubtitles.collection_id(),
            ],
        }
    }
}

impl fmt::Display for NavigationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.collection_segments().join("/"))
    }
}
