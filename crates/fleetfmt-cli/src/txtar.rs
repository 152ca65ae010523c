//! Writing txtar archives, a comment followed by files each introduced
//! by a `-- name --` line.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    pub comment: String,
    pub files: Vec<(String, String)>,
}

impl Archive {
    pub fn push(&mut self, name: impl Into<String>, data: impl Into<String>) {
        self.files.push((name.into(), data.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl fmt::Display for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_terminated(f, &self.comment)?;
        for (name, data) in &self.files {
            writeln!(f, "-- {name} --")?;
            write_terminated(f, data)?;
        }
        Ok(())
    }
}

fn write_terminated(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str(text)?;
    if !text.is_empty() && !text.ends_with('\n') {
        f.write_str("\n")?;
    }
    Ok(())
}
