use std::io::Write;

use serde::Serialize;

/// Write `value` as pretty-printed JSON (2-space indent, non-ASCII left
/// unescaped) with a trailing newline. The file and stdout paths of the CLI
/// both go through here so their bytes match.
pub fn write_json<T: Serialize + ?Sized>(
    value: &T,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}
