use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use csv::WriterBuilder;

use odv_edt::grid::{Cell, Grid};
use odv_edt::lesson::Teacher;
use odv_edt::schedule::Schedule;

use crate::{filled_slots, owner_label, Error};

/// `key = value` per line, in key order. Meant to be hand edited into a
/// lookup table for later runs.
pub fn render_pairs<K: Display>(pairs: &BTreeMap<K, String>) -> String {
  pairs
    .iter()
    .map(|(key, value)| format!("{key} = {value}\n"))
    .collect()
}

/// `key = a b c` per line, keys and values sorted.
pub fn render_sets<K: Display>(sets: &BTreeMap<K, BTreeSet<String>>) -> String {
  sets
    .iter()
    .map(|(key, values)| {
      let values = values.iter().map(String::as_str).collect::<Vec<_>>();
      format!("{key} = {}\n", values.join(" "))
    })
    .collect()
}

/// Class council sheet: a block per class, one `teacher subject` line per
/// pair, blocks separated by a blank line.
///
/// ```text
/// 2G
///     Garcia M.            SPA
/// ```
pub fn render_councils(councils: &BTreeMap<String, BTreeSet<(Teacher, String)>>) -> String {
  councils
    .iter()
    .map(|(class_code, pairs)| {
      let mut block = format!("{class_code}\n");
      for (teacher, subject_code) in pairs {
        block.push_str(&format!("    {:<20} {}\n", teacher.label(), subject_code));
      }
      block
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Big board as delimited text: `Manini L.,,2P,2P,...` per teacher, one
/// column per lesson of the week.
pub fn render_board_csv(grids: &[Grid]) -> Result<Vec<u8>, Error> {
  let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

  for grid in grids {
    let mut record = vec![owner_label(grid.owner())];
    record.extend(grid.week().map(Cell::class_codes));
    writer.write_record(&record)?;
  }

  writer.into_inner().map_err(|err| Error::Io(err.into_error()))
}

/// Cell text of the class timetables: subject over teacher.
pub fn class_cell_text(cell: &Cell) -> String {
  if cell.is_empty() {
    String::new()
  } else {
    format!("{}\n{}", cell.subject_names(), cell.teacher_labels())
  }
}

/// Class timetables one block after the other: title, day names, a row per
/// start time with at least one lesson, then a blank separator row.
pub fn render_class_book_csv(grids: &[Grid], schedule: &Schedule) -> Result<Vec<u8>, Error> {
  let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

  for grid in grids {
    let width = grid.days() + 1;

    let mut title = vec![String::new(); width];
    title[0] = owner_label(grid.owner());
    writer.write_record(&title)?;

    let mut header = vec![String::new()];
    header.extend((0..grid.days()).map(|day| schedule.day_title(day).unwrap_or_default()));
    writer.write_record(&header)?;

    for slot in filled_slots(grid) {
      let mut row = vec![schedule.short_slot_label(slot).unwrap_or_default()];
      row.extend(grid.slot_row(slot).into_iter().map(class_cell_text));
      writer.write_record(&row)?;
    }

    writer.write_record(vec![String::new(); width])?;
  }

  writer.into_inner().map_err(|err| Error::Io(err.into_error()))
}

#[cfg(test)]
mod test {
  use std::collections::{BTreeMap, BTreeSet};

  use odv_edt::grid::{Grid, Owner};
  use odv_edt::lesson::{Lesson, Room, Teacher};
  use odv_edt::schedule::Schedule;

  use super::{
    render_board_csv, render_class_book_csv, render_councils, render_pairs, render_sets,
  };

  fn lesson(class_code: &str, subject: &str, day: usize, slot: usize) -> Lesson {
    Lesson {
      line: 2,
      subject_code: subject.to_string(),
      subject_name: format!("{subject}."),
      teacher: Teacher::new("Manini", "Luca"),
      class_code: class_code.to_string(),
      shared: false,
      room: Room::new("Lab. Inf..1 (2.04)"),
      day,
      slot,
    }
  }

  #[test]
  fn pairs() {
    let pairs = BTreeMap::from([
      ("SPA".to_string(), "Spagnolo".to_string()),
      ("INF".to_string(), "Informatica".to_string()),
    ]);
    assert_eq!(render_pairs(&pairs), "INF = Informatica\nSPA = Spagnolo\n");
  }

  #[test]
  fn sets() {
    let sets = BTreeMap::from([
      (
        "2G".to_string(),
        BTreeSet::from(["spa".to_string(), "ITA".to_string(), "DIS".to_string()]),
      ),
      ("1A".to_string(), BTreeSet::from(["MAT".to_string()])),
    ]);
    assert_eq!(render_sets(&sets), "1A = MAT\n2G = DIS ITA spa\n");
  }

  #[test]
  fn councils() {
    let councils = BTreeMap::from([
      (
        "2G".to_string(),
        BTreeSet::from([
          (Teacher::new("Verdi", "Anna"), "ITA".to_string()),
          (Teacher::new("Garcia", "Maria"), "SPA".to_string()),
        ]),
      ),
      (
        "1A".to_string(),
        BTreeSet::from([(Teacher::new("Rossi", ""), "MAT".to_string())]),
      ),
    ]);

    assert_eq!(
      render_councils(&councils),
      "1A\n    Rossi                MAT\n\n2G\n    Garcia M.            SPA\n    Verdi A.             ITA\n"
    );
    assert_eq!(render_councils(&BTreeMap::new()), "");
  }

  #[test]
  fn board_csv() -> anyhow::Result<()> {
    let schedule = Schedule::default();
    let lessons = vec![lesson("2P", "INF", 0, 1), lesson("3A", "INF", 5, 7)];
    let grid = Grid::build(
      Owner::Teacher(Teacher::new("Manini", "Luca")),
      &schedule,
      &lessons,
    );

    let text = String::from_utf8(render_board_csv(&[grid])?)?;
    let fields = text.trim_end().split(',').collect::<Vec<_>>();
    assert_eq!(fields.len(), 1 + 6 * 8);
    assert_eq!(fields[0], "Manini L.");
    assert_eq!(fields[2], "2P");
    assert_eq!(fields[48], "3A");
    Ok(())
  }

  #[test]
  fn class_book_csv() -> anyhow::Result<()> {
    let schedule = Schedule::default();
    let lessons = vec![lesson("2P", "INF", 1, 0), lesson("2P", "ITA", 3, 0)];
    let grid = Grid::build(Owner::Class("2P".to_string()), &schedule, &lessons);

    let text = String::from_utf8(render_class_book_csv(&[grid], &schedule)?)?;
    assert_eq!(
      text,
      "2P,,,,,,\n\
       ,Lunedì,Martedì,Mercoledì,Giovedì,Venerdì,Sabato\n\
       7:50,,\"INF.\nManini L.\",,\"ITA.\nManini L.\",,\n\
       ,,,,,,\n"
    );
    Ok(())
  }
}
