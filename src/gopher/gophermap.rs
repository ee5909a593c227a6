//! Gophermap rendering.
//!
//! A `gophermap` file defines the menu of the directory it lives in. Each
//! line is either a directive
//!
//! ```text
//! <type><display>TAB<selector>[TAB<host>[TAB<port>]]
//! ```
//!
//! or free text, which is shown as an info (`i`) line. Lines are streamed
//! to the client one at a time as they are read.

use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWrite, BufReader};

use crate::config::Config;
use crate::gopher::item::{ItemType, MenuLine};
use crate::gopher::selector::Selector;
use crate::gopher::writer::write_menu_line;

/// Name of the per-directory menu file.
pub const GOPHERMAP: &str = "gophermap";

/// Selector prefix for links to non-gopher URLs (`hURL:https://...`).
const URL_PREFIX: &str = "URL:";

/// A structured gophermap line, borrowed from the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub item_type: ItemType,
    pub display: &'a str,
    pub selector: &'a str,
    pub host: Option<&'a str>,
    pub port: Option<&'a str>,
}

impl<'a> Directive<'a> {
    /// Parses a directive. Returns `None` for anything that should be shown
    /// as plain text: no tab, an unknown type character, or more than four
    /// fields.
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut chars = line.chars();
        let item_type = ItemType::from_char(chars.next()?)?;
        if !line.contains('\t') {
            return None;
        }

        let fields: Vec<&str> = chars.as_str().split('\t').collect();
        if fields.len() > 4 {
            return None;
        }

        Some(Self {
            item_type,
            display: fields[0],
            selector: fields[1],
            host: fields.get(2).copied().filter(|h| !h.is_empty()),
            port: fields.get(3).copied().filter(|p| !p.is_empty()),
        })
    }

    /// Selector as sent to the client. Absolute selectors, URLs and links
    /// to other hosts pass through; anything else is relative to `dir`.
    fn resolve_selector(&self, dir: &Selector) -> String {
        let selector = self.selector;
        if selector.is_empty()
            || selector.starts_with('/')
            || selector.starts_with(URL_PREFIX)
            || self.host.is_some()
        {
            selector.to_string()
        } else {
            dir.child(selector)
        }
    }

    pub fn to_menu_line(&self, dir: &Selector, cfg: &Config) -> MenuLine {
        MenuLine::new(
            self.item_type,
            self.display,
            self.resolve_selector(dir),
            self.host.unwrap_or(cfg.hostname.as_str()),
            self.port
                .map(str::to_string)
                .unwrap_or_else(|| cfg.port.to_string()),
        )
    }
}

/// Turns one gophermap line (without its line ending) into a menu line.
/// Tabs in plain text become spaces so the info line keeps its four
/// fields.
pub fn render_line(line: &str, dir: &Selector, cfg: &Config) -> MenuLine {
    match Directive::parse(line) {
        Some(directive) => directive.to_menu_line(dir, cfg),
        None => MenuLine::info(line.replace('\t', " ")),
    }
}

/// Streams the gophermap at `map_path` to `out`, returning the number of
/// lines written. Stops at the first read or write error; lines already
/// written stay written. Does not write the end-of-menu marker.
pub async fn render<W>(
    out: &mut W,
    map_path: &Path,
    dir: &Selector,
    cfg: &Config,
) -> io::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let file = File::open(map_path).await?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::with_capacity(256);
    let mut written = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let raw = String::from_utf8_lossy(&buf);
        let line = raw.trim_end_matches(['\r', '\n']);
        write_menu_line(out, &render_line(line, dir, cfg)).await?;
        written += 1;
    }

    Ok(written)
}
