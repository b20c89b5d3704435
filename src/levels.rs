use crate::board::Board;
use std::fmt;
use std::fs;
use std::io;

/// Error type for level parsing operations.
#[derive(Debug)]
pub enum LevelError {
    /// IO error when reading from file
    Io(io::Error),
    /// Invalid level content
    InvalidLevel(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(err) => write!(f, "IO error: {}", err),
            LevelError::InvalidLevel(msg) => write!(f, "Invalid level: {}", msg),
        }
    }
}

impl From<io::Error> for LevelError {
    fn from(err: io::Error) -> Self {
        LevelError::Io(err)
    }
}

impl From<String> for LevelError {
    fn from(err: String) -> Self {
        LevelError::InvalidLevel(err)
    }
}

/// Level 103 from the SLC documentation at www.sourcecode.se/sokoban; used
/// when no level-set file is given.
pub const EXAMPLE_LEVEL_SET: &str = r#"<Level Id="103" Width="6" Height="9">
	<L>####</L>
	<L>#.@#</L>
	<L>#.$#</L>
	<L>#$ #</L>
	<L>#  ##</L>
	<L>#   #</L>
	<L># # ##</L>
	<L># $ .#</L>
	<L>######</L>
</Level>
"#;

/// One level of a set: its declared identifier and the validated board.
#[derive(Debug)]
pub struct Level {
    pub id: String,
    pub board: Board,
}

/// A collection of levels parsed from an SLC file.
///
/// SLC is a tagged-text format: each level is opened by a line
/// `<Level Id="..." Width="..." Height="...">`, carries one `<L>...</L>`
/// line per grid row, and is closed by `</Level>`. Everything else
/// (XML headers, collection tags, blank lines) is ignored.
#[derive(Debug)]
pub struct Levels {
    levels: Vec<Level>,
}

impl Levels {
    pub fn from_text(contents: &str) -> Result<Self, LevelError> {
        let mut levels = Vec::new();
        let mut header: Option<(String, usize, usize)> = None;
        let mut rows: Vec<String> = Vec::new();

        for line in contents.lines() {
            let line = line.trim();
            // Require whitespace after the tag name so collection tags
            // such as <LevelCollection> are not mistaken for level headers.
            let opens_level = line
                .strip_prefix("<Level")
                .is_some_and(|rest| rest.starts_with(char::is_whitespace));
            if opens_level {
                if header.is_some() {
                    return Err(LevelError::InvalidLevel(
                        "nested <Level> block".to_string(),
                    ));
                }
                header = Some(parse_header(line)?);
                rows.clear();
            } else if line.starts_with("<L>") {
                if header.is_none() {
                    return Err(LevelError::InvalidLevel(
                        "grid row outside a <Level> block".to_string(),
                    ));
                }
                let row = line
                    .strip_prefix("<L>")
                    .and_then(|rest| rest.strip_suffix("</L>"))
                    .ok_or_else(|| {
                        LevelError::InvalidLevel(format!("malformed grid row: {}", line))
                    })?;
                rows.push(row.to_string());
            } else if line.starts_with("</Level>") {
                let (id, width, height) = header.take().ok_or_else(|| {
                    LevelError::InvalidLevel("</Level> without matching <Level>".to_string())
                })?;
                levels.push(build_level(id, width, height, &rows)?);
                rows.clear();
            }
        }

        if header.is_some() {
            return Err(LevelError::InvalidLevel(
                "unterminated <Level> block".to_string(),
            ));
        }

        Ok(Levels { levels })
    }

    /// Parse an SLC level-set file.
    pub fn from_file(path: &str) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_text(&contents)
    }

    /// Get the nth level (0-indexed).
    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Get the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Pull `name="value"` out of a tag line with plain string searching.
fn attr<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let pattern = format!("{}=\"", name);
    let start = line.find(&pattern)? + pattern.len();
    let end = line[start..].find('"')?;
    Some(&line[start..start + end])
}

/// `Width` and `Height` are required; `Id` is optional and falls back to
/// `"?"`, since many sets label levels only by position.
fn parse_header(line: &str) -> Result<(String, usize, usize), LevelError> {
    let id = attr(line, "Id").unwrap_or("?").to_string();
    let width = attr(line, "Width")
        .and_then(|v| v.parse::<usize>().ok())
        .ok_or_else(|| {
            LevelError::InvalidLevel(format!("missing or bad Width attribute: {}", line))
        })?;
    let height = attr(line, "Height")
        .and_then(|v| v.parse::<usize>().ok())
        .ok_or_else(|| {
            LevelError::InvalidLevel(format!("missing or bad Height attribute: {}", line))
        })?;
    Ok((id, width, height))
}

fn build_level(
    id: String,
    width: usize,
    height: usize,
    rows: &[String],
) -> Result<Level, LevelError> {
    if rows.len() != height {
        return Err(LevelError::InvalidLevel(format!(
            "level {}: declared height {} but found {} rows",
            id,
            height,
            rows.len()
        )));
    }
    let mut grid = String::new();
    for row in rows {
        if row.len() > width {
            return Err(LevelError::InvalidLevel(format!(
                "level {}: row '{}' exceeds declared width {}",
                id, row, width
            )));
        }
        // Pad short rows with floor so the board spans the declared width.
        grid.push_str(row);
        for _ in row.len()..width {
            grid.push(' ');
        }
        grid.push('\n');
    }

    let board = Board::from_text(grid.trim_end_matches('\n'))
        .map_err(|msg| LevelError::InvalidLevel(format!("level {}: {}", id, msg)))?;
    Ok(Level { id, board })
}
