use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RowError;
use crate::lookup::{CoTeachers, SubjectNames};
use crate::reader::RawRow;
use crate::schedule::Schedule;

static DURATION_REGEX: Lazy<Regex> =
  Lazy::new(|| Regex::new("^(\\d)h(\\d{2})$").expect("valid duration regex"));
static ROOM_REGEX: Lazy<Regex> =
  Lazy::new(|| Regex::new("\\(([^()]*)\\)").expect("valid room regex"));

/// Annotations EDT appends to class codes (`1As`, `1Bsa`).
const CLASS_SUFFIXES: [&str; 3] = ["sa", "s", "a"];

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Teacher {
  pub surname: String,
  pub given_name: String,
}

impl Teacher {
  pub fn new(surname: impl AsRef<str>, given_name: impl AsRef<str>) -> Self {
    Self {
      surname: surname.as_ref().trim().to_string(),
      given_name: given_name.as_ref().trim().to_string(),
    }
  }

  /// `Manini L.`
  pub fn label(&self) -> String {
    match self.given_name.chars().next() {
      Some(initial) => format!("{} {}.", self.surname, initial),
      None => self.surname.clone(),
    }
  }
}

/// `Manini, Luca`
impl Display for Teacher {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    if self.given_name.is_empty() {
      write!(f, "{}", self.surname)
    } else {
      write!(f, "{}, {}", self.surname, self.given_name)
    }
  }
}

/// The export's verbose room description, e.g. `<Aule per gruppi>Mediateca (0.45)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Room(String);

impl Room {
  pub fn new(description: impl AsRef<str>) -> Self {
    Self(description.as_ref().trim().to_string())
  }

  /// Short form for compact display: the first parenthesized part, if any.
  pub fn token(&self) -> &str {
    ROOM_REGEX
      .captures(&self.0)
      .and_then(|captures| captures.get(1))
      .map(|token| token.as_str().trim())
      .filter(|token| !token.is_empty())
      .unwrap_or(self.0.as_str())
  }
}

/// A class field classified once, consumed the same way by every expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassSpec {
  Single(String),
  /// Parallel sections sharing one subject slot, `2G/H SPA` -> `[2G, 2H]`.
  Multiple(Vec<String>),
}

impl ClassSpec {
  pub fn parse(raw: &str) -> Option<Self> {
    let value = raw
      .trim()
      .trim_start_matches('[')
      .trim_end_matches(']')
      .trim();
    let value = strip_class_suffix(value);

    if !value.contains('/') && !value.contains(' ') {
      return if is_class_code(value) {
        Some(ClassSpec::Single(value.to_string()))
      } else {
        None
      };
    }

    // "2G/H/R SPA": year digit, then group letters up to the subject
    let codes = value.split_whitespace().next()?;
    let mut chars = codes.chars();
    let year = chars.next().filter(char::is_ascii_digit)?;

    let classes = chars
      .as_str()
      .split('/')
      .map(|group| {
        let group = strip_class_suffix(group.trim());
        if !group.is_empty() && group.chars().all(|c| c.is_ascii_uppercase()) {
          Some(format!("{year}{group}"))
        } else {
          None
        }
      })
      .collect::<Option<Vec<String>>>()?;

    Some(ClassSpec::Multiple(classes))
  }

  pub fn codes(&self) -> &[String] {
    match self {
      ClassSpec::Single(code) => std::slice::from_ref(code),
      ClassSpec::Multiple(codes) => codes,
    }
  }

  pub fn is_shared(&self) -> bool {
    matches!(self, ClassSpec::Multiple(_))
  }
}

fn strip_class_suffix(value: &str) -> &str {
  for suffix in CLASS_SUFFIXES {
    if let Some(rest) = value.strip_suffix(suffix) {
      if rest.ends_with(|c: char| c.is_ascii_uppercase()) {
        return rest;
      }
    }
  }
  value
}

fn is_class_code(value: &str) -> bool {
  !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// A validated export row. It may still span several hours and classes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
  pub line: u64,
  pub hours: u8,
  pub subject_code: String,
  pub subject_name: String,
  pub teacher: Teacher,
  pub classes: ClassSpec,
  pub room: Room,
  pub day: usize,
  pub slot: usize,
}

/// One hour of one subject with one teacher in one class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lesson {
  pub line: u64,
  pub subject_code: String,
  pub subject_name: String,
  pub teacher: Teacher,
  pub class_code: String,
  /// Derived from a multi-class row.
  pub shared: bool,
  pub room: Room,
  pub day: usize,
  pub slot: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Normalized {
  pub record: Record,
  /// Non fatal findings, the record is usable anyway.
  pub warnings: Vec<RowError>,
}

pub struct Normalizer<'a> {
  schedule: &'a Schedule,
  subjects: &'a SubjectNames,
  co_teachers: &'a CoTeachers,
}

impl<'a> Normalizer<'a> {
  pub fn new(
    schedule: &'a Schedule,
    subjects: &'a SubjectNames,
    co_teachers: &'a CoTeachers,
  ) -> Self {
    Self {
      schedule,
      subjects,
      co_teachers,
    }
  }

  pub fn normalize(&self, row: &RawRow) -> Result<Normalized, RowError> {
    let line = row.line;

    let hours = parse_hours(&row.duration).ok_or_else(|| RowError::Duration {
      line,
      value: row.duration.clone(),
    })?;

    let slot = self
      .schedule
      .slot_index(&row.start_time)
      .ok_or_else(|| RowError::UnknownStartTime {
        line,
        value: row.start_time.clone(),
      })?;

    let day = self
      .schedule
      .day_index(&row.day)
      .ok_or_else(|| RowError::UnknownDay {
        line,
        value: row.day.clone(),
      })?;

    let classes = ClassSpec::parse(&row.class).ok_or_else(|| RowError::UnknownClassFormat {
      line,
      value: row.class.clone(),
    })?;

    let teacher = self
      .co_teachers
      .resolve(&row.teacher_surname, &row.teacher_given_name)
      .unwrap_or_else(|| Teacher::new(&row.teacher_surname, &row.teacher_given_name));

    let subject_code = row.subject_code.trim().to_string();
    let mut warnings = Vec::new();
    let subject_name = match self.subjects.get(&subject_code) {
      Some(name) => name.to_string(),
      None => {
        if !self.subjects.is_empty() {
          warnings.push(RowError::UnknownSubject {
            line,
            code: subject_code.clone(),
          });
        }
        let raw = row.subject_name.trim();
        if raw.is_empty() {
          subject_code.clone()
        } else {
          raw.to_string()
        }
      }
    };

    Ok(Normalized {
      record: Record {
        line,
        hours,
        subject_code,
        subject_name,
        teacher,
        classes,
        room: Room::new(&row.room),
        day,
        slot,
      },
      warnings,
    })
  }
}

/// `"2h00"` -> `2`; only the leading digit counts.
fn parse_hours(duration: &str) -> Option<u8> {
  let captures = DURATION_REGEX.captures(duration.trim())?;
  let hours = captures.get(1)?.as_str().parse::<u8>().ok()?;
  (hours > 0).then_some(hours)
}

impl Record {
  /// Duration expansion: one single-hour record per consecutive slot.
  pub fn split_hours(&self, schedule: &Schedule) -> Result<Vec<Record>, RowError> {
    let hours = usize::from(self.hours);
    if self.slot + hours > schedule.slots() {
      return Err(RowError::SlotOverflow {
        line: self.line,
        start: schedule.start_time(self.slot).unwrap_or_default().to_string(),
        hours: self.hours,
      });
    }

    Ok(
      (0..hours)
        .map(|offset| Record {
          hours: 1,
          slot: self.slot + offset,
          ..self.clone()
        })
        .collect(),
    )
  }

  /// Multi-class expansion of a record, one lesson per class, each spanning
  /// the record's first hour.
  pub fn split_classes(&self) -> Vec<Lesson> {
    let shared = self.classes.is_shared();
    self
      .classes
      .codes()
      .iter()
      .map(|class_code| Lesson {
        line: self.line,
        subject_code: self.subject_code.clone(),
        subject_name: self.subject_name.clone(),
        teacher: self.teacher.clone(),
        class_code: class_code.clone(),
        shared,
        room: self.room.clone(),
        day: self.day,
        slot: self.slot,
      })
      .collect()
  }

  /// Both expansions composed: `hours × classes` lessons. The record itself
  /// is never part of the result.
  pub fn expand(&self, schedule: &Schedule) -> Result<Vec<Lesson>, RowError> {
    Ok(
      self
        .split_hours(schedule)?
        .iter()
        .flat_map(Record::split_classes)
        .collect(),
    )
  }
}
