use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::gopher::item::MenuLine;

/// Line that closes every menu.
pub const END_OF_MENU: &[u8] = b".\r\n";

fn serialize_menu(lines: &[MenuLine]) -> Vec<u8> {
    let mut buf = Vec::new();
    for line in lines {
        buf.extend_from_slice(line.to_string().as_bytes());
    }
    buf.extend_from_slice(END_OF_MENU);
    buf
}

/// Writes a single menu line.
pub async fn write_menu_line<W>(out: &mut W, line: &MenuLine) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(line.to_string().as_bytes()).await
}

pub async fn write_end_of_menu<W>(out: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(END_OF_MENU).await
}

/// Writes a complete menu, lines then terminator, in one buffer.
pub async fn write_menu<W>(out: &mut W, lines: &[MenuLine]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(&serialize_menu(lines)).await
}

/// Writes the type `3` line reported for a failed request.
pub async fn write_error<W>(out: &mut W, message: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_menu_line(out, &MenuLine::error(message)).await
}
