use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::lesson::Teacher;

/// Hand maintained `code = Display Name` table, e.g. the abbreviations
///
/// ```text
/// DIR = Dir. Eco.
/// ING = Inglese
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubjectNames {
  names: BTreeMap<String, String>,
}

impl SubjectNames {
  pub fn load(path: &Path) -> Result<Self, Error> {
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let names = parse_pairs(path, &text)?
      .into_iter()
      .map(|(_, code, name)| (code, name))
      .collect::<BTreeMap<_, _>>();
    debug!("Loaded {} subject names from '{}'", names.len(), path.display());
    Ok(Self { names })
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  pub fn get(&self, code: &str) -> Option<&str> {
    self.names.get(code).map(String::as_str)
  }
}

impl<C: Into<String>, N: Into<String>> FromIterator<(C, N)> for SubjectNames {
  fn from_iter<T: IntoIterator<Item = (C, N)>>(iter: T) -> Self {
    Self {
      names: iter
        .into_iter()
        .map(|(code, name)| (code.into(), name.into()))
        .collect(),
    }
  }
}

/// Resolves teacher fields holding several comma-joined co-teachers
/// (`"Rossi, Bianchi"` / `"Mario, Anna"`) to the one teacher the lesson is
/// filed under. Entries look like
///
/// ```text
/// Rossi, Bianchi = Bianchi, Anna
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoTeachers {
  resolved: BTreeMap<String, Teacher>,
}

impl CoTeachers {
  pub fn load(path: &Path) -> Result<Self, Error> {
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let mut resolved = BTreeMap::new();

    for (line, raw, teacher) in parse_pairs(path, &text)? {
      let (surname, given_name) = teacher.split_once(',').ok_or_else(|| Error::Lookup {
        path: path.to_path_buf(),
        line,
        entry: format!("{raw} = {teacher}"),
      })?;
      resolved.insert(normalize_key(&raw), Teacher::new(surname, given_name));
    }

    debug!("Loaded {} co-teacher entries from '{}'", resolved.len(), path.display());
    Ok(Self { resolved })
  }

  pub fn insert(&mut self, raw_surnames: &str, teacher: Teacher) {
    self.resolved.insert(normalize_key(raw_surnames), teacher);
  }

  /// Returns `None` when the surname field names a single teacher.
  pub fn resolve(&self, surnames: &str, given_names: &str) -> Option<Teacher> {
    if !surnames.contains(',') {
      return None;
    }

    if let Some(teacher) = self.resolved.get(&normalize_key(surnames)) {
      return Some(teacher.clone());
    }

    let first = |value: &str| value.split(',').next().unwrap_or_default().to_string();
    debug!("No co-teacher entry for '{}', using the first one", surnames);
    Some(Teacher::new(first(surnames), first(given_names)))
  }
}

/// `"Rossi ,Bianchi"` and `"Rossi, Bianchi"` are the same key.
fn normalize_key(value: &str) -> String {
  value
    .split(',')
    .map(str::trim)
    .collect::<Vec<_>>()
    .join(", ")
}

/// `key = value` lines with their line number; blank lines are skipped.
fn parse_pairs(path: &Path, text: &str) -> Result<Vec<(usize, String, String)>, Error> {
  let mut pairs = Vec::new();

  for (index, line) in text.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }

    match line.split_once('=') {
      Some((key, value)) if !key.trim().is_empty() => {
        pairs.push((index + 1, key.trim().to_string(), value.trim().to_string()))
      }
      _ => {
        return Err(Error::Lookup {
          path: path.to_path_buf(),
          line: index + 1,
          entry: line.to_string(),
        })
      }
    }
  }

  Ok(pairs)
}

#[cfg(test)]
mod test {
  use std::io::Write;

  use tempfile::NamedTempFile;

  use crate::error::Error;
  use crate::lesson::Teacher;

  use super::{CoTeachers, SubjectNames};

  #[test]
  fn loads_subject_names() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "DIR = Dir. Eco.\n\nING = Inglese\nSPA=Spagnolo")?;

    let names = SubjectNames::load(file.path())?;
    assert_eq!(names.get("DIR"), Some("Dir. Eco."));
    assert_eq!(names.get("ING"), Some("Inglese"));
    assert_eq!(names.get("SPA"), Some("Spagnolo"));
    assert_eq!(names.get("FIL"), None);
    Ok(())
  }

  #[test]
  fn rejects_line_without_separator() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "DIR = Dir. Eco.\nING Inglese")?;

    match SubjectNames::load(file.path()) {
      Err(Error::Lookup { line, entry, .. }) => {
        assert_eq!(line, 2);
        assert_eq!(entry, "ING Inglese");
      }
      other => panic!("unexpected {other:?}"),
    }
    Ok(())
  }

  #[test]
  fn co_teachers_from_file() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "Rossi, Bianchi = Bianchi, Anna")?;

    let co_teachers = CoTeachers::load(file.path())?;
    assert_eq!(
      co_teachers.resolve("Rossi ,Bianchi", "Mario, Anna"),
      Some(Teacher::new("Bianchi", "Anna"))
    );
    Ok(())
  }

  #[test]
  fn co_teachers_fall_back_to_first() {
    let co_teachers = CoTeachers::default();
    assert_eq!(co_teachers.resolve("Verdi", "Carla"), None);
    assert_eq!(
      co_teachers.resolve("Rossi, Bianchi", "Mario, Anna"),
      Some(Teacher::new("Rossi", "Mario"))
    );
  }
}
