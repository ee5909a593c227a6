//! Maps a sanitized selector onto the filesystem and writes the response.

use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncWrite;

use crate::config::Config;
use crate::error::{GopherError, GopherResult};
use crate::gopher::gophermap::{self, GOPHERMAP};
use crate::gopher::listing::list_directory;
use crate::gopher::selector::Selector;
use crate::gopher::writer::{write_end_of_menu, write_menu};

/// What was sent for a successfully resolved request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// A rendered gophermap, with the number of lines it produced
    Gophermap(usize),
    /// An auto-generated listing, with the number of entries
    Listing(usize),
    /// Raw file contents, with the number of bytes copied
    File(u64),
}

/// Resolves `selector` under the configured root and writes the response
/// to `out`.
///
/// Directories with a `gophermap` are rendered from it and always get the
/// end-of-menu marker, even when rendering fails part way; the rendering
/// error is still returned. Other directories are listed, regular files
/// are copied verbatim. Anything else is reported as not found.
pub async fn resolve<W>(out: &mut W, selector: &Selector, cfg: &Config) -> GopherResult<Served>
where
    W: AsyncWrite + Unpin,
{
    let path = selector.to_path(&cfg.root);
    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|_| GopherError::NotFound(selector.to_string()))?;

    if meta.is_dir() {
        let map = path.join(GOPHERMAP);
        if tokio::fs::metadata(&map).await.is_ok() {
            let rendered = gophermap::render(out, &map, selector, cfg).await;
            let terminated = write_end_of_menu(out).await;

            let lines = rendered.map_err(|source| GopherError::Gophermap {
                selector: selector.to_string(),
                source,
            })?;
            terminated?;
            return Ok(Served::Gophermap(lines));
        }

        let lines = list_directory(&path, selector, cfg)
            .await
            .map_err(|source| GopherError::Listing {
                selector: selector.to_string(),
                source,
            })?;
        write_menu(out, &lines).await?;
        return Ok(Served::Listing(lines.len()));
    }

    if meta.is_file() {
        let bytes = send_file(out, &path).await?;
        return Ok(Served::File(bytes));
    }

    Err(GopherError::NotFound(selector.to_string()))
}

/// Copies the file at `path` to `out` unchanged. Bytes already sent when
/// an error occurs are not retracted.
pub async fn send_file<W>(out: &mut W, path: &Path) -> io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut file = File::open(path).await?;
    tokio::io::copy(&mut file, out).await
}
