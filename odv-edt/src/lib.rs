use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::aggregate::{class_days, group_by};
use crate::encoding::read_detected;
use crate::grid::{Grid, Owner};
use crate::lesson::{Lesson, Normalizer, Teacher};
use crate::lookup::{CoTeachers, SubjectNames};
use crate::reader::{RawRow, Rows};
use crate::schedule::Schedule;

pub use crate::error::{Error, RowError};

pub mod aggregate;
pub mod encoding;
mod error;
pub mod grid;
pub mod lesson;
pub mod lookup;
pub mod reader;
pub mod schedule;

/// Reads EDT exports into lesson facts, one hour of one class each.
pub struct Edt {
  schedule: Schedule,
  subjects: SubjectNames,
  co_teachers: CoTeachers,
}

/// Everything one export yielded.
#[derive(Debug, Default)]
pub struct Export {
  /// Data rows read, header excluded.
  pub rows: u64,
  /// Rows naming several parallel classes.
  pub shared_rows: u64,
  pub lessons: Vec<Lesson>,
  /// Rows skipped, with the reason.
  pub rejected: Vec<RowError>,
  /// Rows used anyway, with what was wrong about them.
  pub warnings: Vec<RowError>,
}

impl Edt {
  pub fn new(schedule: Schedule, subjects: SubjectNames, co_teachers: CoTeachers) -> Self {
    Self {
      schedule,
      subjects,
      co_teachers,
    }
  }

  pub fn schedule(&self) -> &Schedule {
    &self.schedule
  }

  pub fn load(&self, path: &Path) -> Result<Export, Error> {
    let decoded = read_detected(path)?;
    info!(
      "Reading '{}', encoded with {}",
      path.display(),
      decoded.encoding.name()
    );

    let export = self.process(Rows::from_text(decoded.text));

    info!(
      "{} rows read, {} skipped, {} multi-class, {} lessons for {} classes and {} teachers",
      export.rows,
      export.rejected.len(),
      export.shared_rows,
      export.lessons.len(),
      export.classes().len(),
      export.teachers().len()
    );

    Ok(export)
  }

  /// Normalizes and expands every row. Bad rows are logged and skipped,
  /// they never stop the others.
  pub fn process(&self, rows: impl IntoIterator<Item = Result<RawRow, RowError>>) -> Export {
    let normalizer = Normalizer::new(&self.schedule, &self.subjects, &self.co_teachers);
    let mut export = Export::default();

    for row in rows {
      export.rows += 1;

      let row = match row {
        Ok(row) => row,
        Err(err) => {
          warn!(line = err.line(), "Skipping row: {}", err);
          export.rejected.push(err);
          continue;
        }
      };

      let expanded = normalizer.normalize(&row).and_then(|normalized| {
        for warning in &normalized.warnings {
          warn!(
            line = row.line,
            class = %row.class,
            subject = %row.subject_code,
            "{}",
            warning
          );
        }
        export.warnings.extend(normalized.warnings);

        let shared = normalized.record.classes.is_shared();
        let lessons = normalized.record.expand(&self.schedule)?;
        Ok((shared, lessons))
      });

      match expanded {
        Ok((shared, lessons)) => {
          if shared {
            export.shared_rows += 1;
          }
          debug!(line = row.line, "{} lessons from class '{}'", lessons.len(), row.class);
          export.lessons.extend(lessons);
        }
        Err(err) => {
          warn!(
            line = row.line,
            class = %row.class,
            subject = %row.subject_code,
            day = %row.day,
            start = %row.start_time,
            "Skipping row: {}",
            err
          );
          export.rejected.push(err);
        }
      }
    }

    export
  }
}

impl Export {
  pub fn classes(&self) -> BTreeSet<&str> {
    self
      .lessons
      .iter()
      .map(|lesson| lesson.class_code.as_str())
      .collect()
  }

  pub fn teachers(&self) -> BTreeSet<&Teacher> {
    self.lessons.iter().map(|lesson| &lesson.teacher).collect()
  }

  /// One grid per class, sorted by class code.
  pub fn class_grids(&self, schedule: &Schedule) -> Vec<Grid> {
    class_days(&self.lessons)
      .into_iter()
      .map(|(class_code, days)| {
        Grid::build(
          Owner::Class(class_code),
          schedule,
          days.into_values().flatten(),
        )
      })
      .collect()
  }

  /// One grid per teacher, sorted by surname then given name.
  pub fn teacher_grids(&self, schedule: &Schedule) -> Vec<Grid> {
    group_by(&self.lessons, |lesson| lesson.teacher.clone())
      .into_iter()
      .map(|(teacher, lessons)| Grid::build(Owner::Teacher(teacher), schedule, lessons))
      .collect()
  }
}
