use std::fmt::{Display, Formatter};

use tracing::{debug, warn};

use crate::lesson::{Lesson, Teacher};
use crate::schedule::Schedule;

/// Whose week a grid lays out.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Owner {
  Class(String),
  Teacher(Teacher),
}

impl Display for Owner {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Owner::Class(class_code) => write!(f, "{class_code}"),
      Owner::Teacher(teacher) => write!(f, "{teacher}"),
    }
  }
}

/// Lessons sharing one `(day, slot)` of a grid. Normally zero or one, more
/// when teachers co-teach or the export double books.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
  lessons: Vec<Lesson>,
}

impl Cell {
  pub fn lessons(&self) -> &[Lesson] {
    &self.lessons
  }

  pub fn is_empty(&self) -> bool {
    self.lessons.is_empty()
  }

  pub fn subject_codes(&self) -> String {
    self.join(|lesson| lesson.subject_code.clone())
  }

  pub fn subject_names(&self) -> String {
    self.join(|lesson| lesson.subject_name.clone())
  }

  pub fn teacher_surnames(&self) -> String {
    self.join(|lesson| lesson.teacher.surname.clone())
  }

  pub fn teacher_labels(&self) -> String {
    self.join(|lesson| lesson.teacher.label())
  }

  pub fn class_codes(&self) -> String {
    self.join(|lesson| lesson.class_code.clone())
  }

  /// Distinct values in placement order, `/`-joined.
  fn join<F: Fn(&Lesson) -> String>(&self, value: F) -> String {
    let mut values: Vec<String> = Vec::with_capacity(self.lessons.len());
    for lesson in &self.lessons {
      let value = value(lesson);
      if !values.contains(&value) {
        values.push(value);
      }
    }
    values.join("/")
  }
}

/// One owner's week: `days × slots` cells addressed as `[day][slot]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
  owner: Owner,
  cells: Vec<Vec<Cell>>,
}

impl Grid {
  pub fn new(owner: Owner, schedule: &Schedule) -> Self {
    Self {
      owner,
      cells: vec![vec![Cell::default(); schedule.slots()]; schedule.days()],
    }
  }

  pub fn build<'a>(
    owner: Owner,
    schedule: &Schedule,
    lessons: impl IntoIterator<Item = &'a Lesson>,
  ) -> Self {
    let mut grid = Self::new(owner, schedule);
    for lesson in lessons {
      grid.place(lesson.clone());
    }
    grid
  }

  /// Adds a lesson to its cell. Lessons already there are kept.
  pub fn place(&mut self, lesson: Lesson) -> bool {
    let cell = match self
      .cells
      .get_mut(lesson.day)
      .and_then(|day| day.get_mut(lesson.slot))
    {
      Some(cell) => cell,
      None => {
        warn!(
          line = lesson.line,
          "Lesson of {} at day {} slot {} is outside the week of {}",
          lesson.class_code,
          lesson.day,
          lesson.slot,
          self.owner
        );
        return false;
      }
    };

    if !cell.is_empty() {
      debug!(
        line = lesson.line,
        "{} has {} and {} at day {} slot {}",
        self.owner,
        cell.subject_codes(),
        lesson.subject_code,
        lesson.day,
        lesson.slot
      );
    }

    cell.lessons.push(lesson);
    true
  }

  pub fn owner(&self) -> &Owner {
    &self.owner
  }

  pub fn days(&self) -> usize {
    self.cells.len()
  }

  pub fn slots(&self) -> usize {
    self.cells.first().map(Vec::len).unwrap_or_default()
  }

  pub fn cell(&self, day: usize, slot: usize) -> Option<&Cell> {
    self.cells.get(day).and_then(|day| day.get(slot))
  }

  /// Cells of one slot across the week, a table row.
  pub fn slot_row(&self, slot: usize) -> Vec<&Cell> {
    self.cells.iter().filter_map(|day| day.get(slot)).collect()
  }

  /// All cells day after day, slot after slot, a big board row.
  pub fn week(&self) -> impl Iterator<Item = &Cell> {
    self.cells.iter().flatten()
  }
}
