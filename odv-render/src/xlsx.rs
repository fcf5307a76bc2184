use rust_xlsxwriter::{ColNum, Format, FormatAlign, RowNum, Workbook, Worksheet, XlsxError};
use tracing::debug;

use odv_edt::grid::{Cell, Grid};
use odv_edt::schedule::Schedule;

use crate::text::class_cell_text;
use crate::{filled_slots, owner_label, Error};

/// Equal neighbouring values, e.g. the hours of a double lesson.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run<'a> {
  pub start: usize,
  pub len: usize,
  pub text: &'a str,
}

pub fn runs(values: &[String]) -> Vec<Run<'_>> {
  let mut runs: Vec<Run> = Vec::new();

  for (index, value) in values.iter().enumerate() {
    match runs.last_mut() {
      Some(run) if run.text == value => run.len += 1,
      _ => runs.push(Run {
        start: index,
        len: 1,
        text: value,
      }),
    }
  }

  runs
}

/// Cells `first..=last` of one sheet row showing `text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
  pub first: ColNum,
  pub last: ColNum,
  pub text: String,
}

impl Span {
  fn new(first: ColNum, last: ColNum, text: impl Into<String>) -> Self {
    Self {
      first,
      last,
      text: text.into(),
    }
  }

  /// Merged when it covers more than one cell.
  fn write(&self, sheet: &mut Worksheet, row: RowNum, format: &Format) -> Result<(), XlsxError> {
    if self.first == self.last {
      sheet.write_string_with_format(row, self.first, &self.text, format)?;
    } else {
      sheet.merge_range(row, self.first, row, self.last, &self.text, format)?;
    }
    Ok(())
  }
}

/// Board column of a lesson, column 0 holds the row labels.
fn board_column(schedule: &Schedule, day: usize, slot: usize) -> ColNum {
  (1 + day * schedule.slots() + slot) as ColNum
}

/// The title runs over the label column and every lesson column.
pub fn title_span(schedule: &Schedule, title: &str) -> Span {
  let last = board_column(schedule, schedule.days() - 1, schedule.slots() - 1);
  Span::new(0, last, title)
}

pub fn day_spans(schedule: &Schedule) -> Vec<Span> {
  (0..schedule.days())
    .map(|day| {
      Span::new(
        board_column(schedule, day, 0),
        board_column(schedule, day, schedule.slots() - 1),
        schedule.day_title(day).unwrap_or_default(),
      )
    })
    .collect()
}

/// Filled cells of a board row, equal neighbours of one day as one span.
/// Runs stop at the end of a day.
pub fn board_spans(grid: &Grid, schedule: &Schedule) -> Vec<Span> {
  let slots = schedule.slots();
  let mut spans = Vec::new();

  for day in 0..schedule.days().min(grid.days()) {
    let values = (0..slots)
      .map(|slot| grid.cell(day, slot).map(Cell::class_codes).unwrap_or_default())
      .collect::<Vec<_>>();

    for run in runs(&values) {
      if run.text.is_empty() {
        continue;
      }
      spans.push(Span::new(
        board_column(schedule, day, run.start),
        board_column(schedule, day, run.start + run.len - 1),
        run.text,
      ));
    }
  }

  spans
}

/// The big board: a row per grid owner, a column per lesson of the week.
pub fn render_board(grids: &[Grid], schedule: &Schedule, title: &str) -> Result<Vec<u8>, Error> {
  let title_format = Format::new()
    .set_align(FormatAlign::Center)
    .set_bold()
    .set_font_size(20);
  let header_format = Format::new().set_align(FormatAlign::Center).set_bold();
  let cell_format = Format::new().set_align(FormatAlign::Center);
  let owner_format = Format::new().set_align(FormatAlign::Left);

  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name("Orario")?;
  sheet.set_column_width(0, 25)?;

  sheet.set_row_height(0, 42)?;
  title_span(schedule, title).write(sheet, 0, &title_format)?;

  sheet.set_row_height(1, 22)?;
  for span in day_spans(schedule) {
    span.write(sheet, 1, &header_format)?;
  }

  sheet.set_row_height(2, 20)?;
  for day in 0..schedule.days() {
    for slot in 0..schedule.slots() {
      let label = schedule.short_slot_label(slot).unwrap_or_default();
      sheet.write_string_with_format(2, board_column(schedule, day, slot), label, &header_format)?;
    }
  }

  for (index, grid) in grids.iter().enumerate() {
    let row = (3 + index) as RowNum;
    sheet.write_string_with_format(row, 0, owner_label(grid.owner()), &owner_format)?;
    for span in board_spans(grid, schedule) {
      span.write(sheet, row, &cell_format)?;
    }
  }

  debug!("Board with {} rows", grids.len());
  Ok(workbook.save_to_buffer()?)
}

/// One sheet holding a table block per grid: title, day names, a row per
/// start time with at least one lesson, then a blank row.
pub fn render_class_book(grids: &[Grid], schedule: &Schedule) -> Result<Vec<u8>, Error> {
  let title_format = Format::new()
    .set_align(FormatAlign::Center)
    .set_bold()
    .set_font_size(14);
  let header_format = Format::new().set_align(FormatAlign::Center).set_bold();
  let lesson_format = Format::new()
    .set_text_wrap()
    .set_align(FormatAlign::Center)
    .set_align(FormatAlign::VerticalCenter);

  let days = schedule.days();

  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name("Classi")?;
  sheet.set_column_width(0, 8)?;
  for day in 0..days {
    sheet.set_column_width((day + 1) as ColNum, 15)?;
  }

  let mut row: RowNum = 0;
  for grid in grids {
    Span::new(0, days as ColNum, owner_label(grid.owner())).write(sheet, row, &title_format)?;
    row += 1;

    for day in 0..days {
      let name = schedule.day_title(day).unwrap_or_default();
      sheet.write_string_with_format(row, (day + 1) as ColNum, name, &header_format)?;
    }
    row += 1;

    for slot in filled_slots(grid) {
      sheet.set_row_height(row, 44)?;
      let label = schedule.short_slot_label(slot).unwrap_or_default();
      sheet.write_string_with_format(row, 0, label, &header_format)?;
      for (day, cell) in grid.slot_row(slot).into_iter().enumerate() {
        sheet.write_string_with_format(
          row,
          (day + 1) as ColNum,
          class_cell_text(cell),
          &lesson_format,
        )?;
      }
      row += 1;
    }

    // blank separator
    row += 1;
  }

  debug!("Class book with {} blocks", grids.len());
  Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod test {
  use odv_edt::grid::{Grid, Owner};
  use odv_edt::lesson::{Lesson, Room, Teacher};
  use odv_edt::schedule::Schedule;

  use super::{board_spans, day_spans, render_board, render_class_book, runs, title_span, Run, Span};

  fn lesson(class_code: &str, day: usize, slot: usize) -> Lesson {
    Lesson {
      line: 2,
      subject_code: "INF".to_string(),
      subject_name: "Informatica".to_string(),
      teacher: Teacher::new("Manini", "Luca"),
      class_code: class_code.to_string(),
      shared: false,
      room: Room::new("Lab. Inf..1 (2.04)"),
      day,
      slot,
    }
  }

  #[test]
  fn runs_of_equal_values() {
    let values = ["", "2P", "2P", "3A", "", "", "2P"]
      .iter()
      .map(|value| value.to_string())
      .collect::<Vec<_>>();

    assert_eq!(
      runs(&values),
      vec![
        Run { start: 0, len: 1, text: "" },
        Run { start: 1, len: 2, text: "2P" },
        Run { start: 3, len: 1, text: "3A" },
        Run { start: 4, len: 2, text: "" },
        Run { start: 6, len: 1, text: "2P" },
      ]
    );
    assert!(runs(&[]).is_empty());
  }

  #[test]
  fn board_layout() {
    let schedule = Schedule::default();

    assert_eq!(title_span(&schedule, "Orario"), Span::new(0, 48, "Orario"));

    let days = day_spans(&schedule);
    assert_eq!(days.len(), 6);
    assert_eq!(days[0], Span::new(1, 8, "Lunedì"));
    assert_eq!(days[5], Span::new(41, 48, "Sabato"));
  }

  #[test]
  fn runs_stop_at_the_end_of_a_day() {
    let schedule = Schedule::default();
    let lessons = vec![
      lesson("2P", 0, 5),
      lesson("2P", 0, 6),
      lesson("2P", 0, 7),
      lesson("2P", 1, 0),
      lesson("2P", 1, 1),
      lesson("3A", 1, 2),
      lesson("2P", 1, 3),
    ];
    let grid = Grid::build(
      Owner::Teacher(Teacher::new("Manini", "Luca")),
      &schedule,
      &lessons,
    );

    assert_eq!(
      board_spans(&grid, &schedule),
      vec![
        Span::new(6, 8, "2P"),
        Span::new(9, 10, "2P"),
        Span::new(11, 11, "3A"),
        Span::new(12, 12, "2P"),
      ]
    );
  }

  #[test]
  fn collisions_make_their_own_run() {
    let schedule = Schedule::default();
    let lessons = vec![lesson("2G", 2, 0), lesson("2G", 2, 1), lesson("2H", 2, 1)];
    let grid = Grid::build(
      Owner::Teacher(Teacher::new("Garcia", "Maria")),
      &schedule,
      &lessons,
    );

    assert_eq!(
      board_spans(&grid, &schedule),
      vec![Span::new(17, 17, "2G"), Span::new(18, 18, "2G/2H")]
    );
  }

  #[test]
  fn board_workbook() -> anyhow::Result<()> {
    let schedule = Schedule::default();
    // a triple lesson and one running over the end of monday into tuesday
    let lessons = vec![
      lesson("2P", 0, 5),
      lesson("2P", 0, 6),
      lesson("2P", 0, 7),
      lesson("2P", 1, 0),
    ];
    let grid = Grid::build(
      Owner::Teacher(Teacher::new("Manini", "Luca")),
      &schedule,
      &lessons,
    );

    let bytes = render_board(&[grid], &schedule, "Orario")?;
    // xlsx files are zip archives
    assert_eq!(&bytes[..2], b"PK");
    Ok(())
  }

  #[test]
  fn class_book_workbook() -> anyhow::Result<()> {
    let schedule = Schedule::new(&["08h00", "09h00"])?;
    let grids = vec![
      Grid::build(Owner::Class("2P".to_string()), &schedule, &[lesson("2P", 0, 0)]),
      Grid::new(Owner::Class("3A".to_string()), &schedule),
    ];

    let bytes = render_class_book(&grids, &schedule)?;
    assert_eq!(&bytes[..2], b"PK");
    Ok(())
  }
}
