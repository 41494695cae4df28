//! Line sources and sinks around the engine.
//!
//! The engine only ever sees "lines in" and "lines out". Files, stdin and
//! stdout live behind these two traits so the pipeline can be exercised
//! without touching the filesystem. Uses mockall for mock generation in
//! test builds.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Produces the raw lines handed to the token parser.
#[cfg_attr(test, automock)]
pub trait LineSource {
    fn read_lines(&self) -> io::Result<Vec<String>>;
}

/// Receives the canonical `a.b.c.d/n` lines of a successful run.
#[cfg_attr(test, automock)]
pub trait LineSink {
    fn write_lines(&self, lines: &[String]) -> io::Result<()>;
}

/// Read lines from a file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LineSource for FileSource {
    fn read_lines(&self) -> io::Result<Vec<String>> {
        let file = std::fs::File::open(&self.path)?;
        read_all(io::BufReader::new(file))
    }
}

/// Read lines from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl LineSource for StdinSource {
    fn read_lines(&self) -> io::Result<Vec<String>> {
        read_all(io::stdin().lock())
    }
}

/// In-memory source, mostly for tests and library callers.
#[derive(Debug, Default, Clone)]
pub struct VecSource {
    lines: Vec<String>,
}

impl VecSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for VecSource {
    fn read_lines(&self) -> io::Result<Vec<String>> {
        Ok(self.lines.clone())
    }
}

/// Feed files are ASCII in theory; stray non-UTF-8 bytes become U+FFFD so
/// the parser rejects that one line instead of the whole read failing.
fn read_all<R: BufRead>(mut reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }
    Ok(lines)
}

/// Write lines to a file atomically.
///
/// Uses tempfile + rename so a crash or an aborted run never leaves a
/// half-written blocklist in place.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LineSink for FileSink {
    fn write_lines(&self, lines: &[String]) -> io::Result<()> {
        use tempfile::NamedTempFile;

        let parent_dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = io::BufWriter::new(temp_file.as_file_mut());
            write_all(&mut writer, lines)?;
            writer.flush()?;
        }
        temp_file.as_file().sync_all()?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Write lines to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_lines(&self, lines: &[String]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut writer = io::BufWriter::new(stdout.lock());
        write_all(&mut writer, lines)?;
        writer.flush()
    }
}

/// Collects written lines in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    lines: RefCell<Vec<String>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl LineSink for VecSink {
    fn write_lines(&self, lines: &[String]) -> io::Result<()> {
        self.lines.borrow_mut().extend_from_slice(lines);
        Ok(())
    }
}

fn write_all<W: Write>(writer: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
