use serde::Serialize;
use tide_core::PROTOCOL_SCHEME;
use url::Url;

use crate::error::{Result, SystemError};

/// Kind of catalog item a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Track,
    Album,
    Artist,
    Playlist,
    Mix,
    Video,
}

impl LinkKind {
    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "track" => Some(Self::Track),
            "album" => Some(Self::Album),
            "artist" => Some(Self::Artist),
            "playlist" => Some(Self::Playlist),
            "mix" => Some(Self::Mix),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Playlist => "playlist",
            Self::Mix => "mix",
            Self::Video => "video",
        }
    }
}

/// A parsed TIDAL link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TidalLink {
    pub kind: LinkKind,
    pub id: String,
}

impl TidalLink {
    /// Canonical `tidal://<kind>/<id>` form.
    pub fn to_uri(&self) -> String {
        format!("{PROTOCOL_SCHEME}://{}/{}", self.kind.as_str(), self.id)
    }
}

impl std::fmt::Display for TidalLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_uri())
    }
}

const WEB_HOSTS: [&str; 3] = ["tidal.com", "www.tidal.com", "listen.tidal.com"];

/// Parse a link handed over by the protocol handler or pasted by the user
///
/// Supported patterns:
/// - tidal://{kind}/{id}
/// - https://tidal.com/browse/{kind}/{id}
/// - https://tidal.com/{kind}/{id}
/// - https://listen.tidal.com/{kind}/{id}
///
/// where kind is track, album, artist, playlist, mix or video. Trailing path
/// segments and query strings are ignored.
pub fn parse_tidal_link(uri: &str) -> Result<TidalLink> {
    let parsed =
        Url::parse(uri.trim()).map_err(|e| SystemError::InvalidLink(format!("{uri}: {e}")))?;

    let path = parsed
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty());

    let mut segments: Vec<&str> = match parsed.scheme() {
        PROTOCOL_SCHEME => parsed.host_str().into_iter().chain(path).collect(),
        "http" | "https" => {
            let host = parsed.host_str().unwrap_or_default();
            if !WEB_HOSTS.contains(&host) {
                return Err(SystemError::InvalidLink(format!("unknown host '{host}'")));
            }
            path.collect()
        }
        other => {
            return Err(SystemError::InvalidLink(format!("unsupported scheme '{other}'")));
        }
    };

    if segments.first() == Some(&"browse") {
        segments.remove(0);
    }

    let kind_segment = segments
        .first()
        .ok_or_else(|| SystemError::InvalidLink(format!("{uri}: missing item kind")))?;
    let kind = LinkKind::parse(&kind_segment.to_ascii_lowercase())
        .ok_or_else(|| SystemError::InvalidLink(format!("unknown item kind '{kind_segment}'")))?;

    let id = segments
        .get(1)
        .filter(|id| id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
        .ok_or_else(|| SystemError::InvalidLink(format!("{uri}: missing or invalid id")))?;

    Ok(TidalLink {
        kind,
        id: (*id).to_string(),
    })
}
