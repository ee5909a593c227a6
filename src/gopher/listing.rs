//! Auto-generated directory menus, used when a directory has no gophermap.

use std::io;
use std::path::Path;

use crate::config::Config;
use crate::gopher::gophermap::GOPHERMAP;
use crate::gopher::item::{ItemType, MenuLine};
use crate::gopher::selector::Selector;

/// Builds one menu line per entry of `dir`, sorted by name, skipping the
/// gophermap file. The whole listing is collected before anything is
/// written, so a failure leaves no partial output.
///
/// Names containing a tab, CR or LF are left out: they would break the
/// menu line, and no request line can carry them as a selector anyway.
pub async fn list_directory(
    dir: &Path,
    selector: &Selector,
    cfg: &Config,
) -> io::Result<Vec<MenuLine>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == GOPHERMAP {
            continue;
        }
        if !is_menu_safe(&name) {
            tracing::debug!(name = ?name, "Skipping entry that cannot appear in a menu");
            continue;
        }

        // Follow symlinks so a link to a directory lists as one.
        let is_dir = match tokio::fs::metadata(entry.path()).await {
            Ok(meta) => meta.is_dir(),
            Err(_) => entry.file_type().await?.is_dir(),
        };
        names.push((name, is_dir));
    }

    names.sort();

    let port = cfg.port.to_string();
    let lines = names
        .into_iter()
        .map(|(name, is_dir)| {
            let item_type = if is_dir {
                ItemType::Directory
            } else {
                ItemType::for_file(Path::new(&name))
            };
            MenuLine::new(
                item_type,
                name.as_str(),
                selector.child(&name),
                cfg.hostname.as_str(),
                port.as_str(),
            )
        })
        .collect();

    Ok(lines)
}

fn is_menu_safe(name: &str) -> bool {
    !name.contains(['\t', '\r', '\n'])
}
