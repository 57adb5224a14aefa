use std::io;
use std::path::Path;

use tracing::warn;

/// Read a source file as text.
///
/// Invalid UTF-8 is replaced rather than rejected; judges accept the
/// replacement characters in comments far more often than we need the
/// original bytes back.
pub fn read_text<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!(path = %path.display(), "file is not valid UTF-8; decoding lossily");
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}

/// Split text into lines without terminators (LF and CRLF both accepted)
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}

/// Overwrite `path` with `content`
pub fn write_text<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    std::fs::write(path, content)
}
